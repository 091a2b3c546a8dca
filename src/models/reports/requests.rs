use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct ReportQuery {
    // 学期标签，如 "Term 1 2024"
    pub term: Option<String>,
}
