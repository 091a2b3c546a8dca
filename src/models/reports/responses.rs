use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::students::entities::StudentProfile;

/// 单科成绩行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct SubjectReportRow {
    pub subject_id: String,
    pub subject_name: String,
    // 平时成绩（满分 50）
    pub sba_score: f64,
    // 考试成绩（满分 50）
    pub exam_score: f64,
    pub total_score: u32,
    pub grade: String,
    pub remark: String,
    // 班级排名，从 1 开始
    pub rank: usize,
}

/// 成绩报告单
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct StudentReport {
    pub student: StudentProfile,
    pub class_id: String,
    pub class_name: String,
    pub term: String,
    pub year: Option<i32>,
    pub next_term_begins: Option<chrono::NaiveDate>,
    pub number_on_roll: usize,
    pub rows: Vec<SubjectReportRow>,
    pub overall_total: u32,
    pub overall_average: f64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct ClassReportsResponse {
    pub class_id: String,
    pub term: String,
    pub reports: Vec<StudentReport>,
}
