use serde::Serialize;
use ts_rs::TS;

use super::entities::GradeSetting;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct GradingSchemeResponse {
    pub grade_settings: Vec<GradeSetting>,
    // 0-100 中未被任何区间覆盖的整数分段，如 "40-44"
    pub coverage_gaps: Vec<String>,
}
