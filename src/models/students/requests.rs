use serde::Deserialize;
use ts_rs::TS;

use super::entities::AssignmentScore;

/// 录入成绩请求
///
/// 以 (subject_id, assignment_name) 为键覆盖已有成绩，其余成绩保持不变。
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct RecordScoresRequest {
    pub scores: Vec<AssignmentScore>,
}
