use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct Subject {
    pub id: String,
    pub name: String,
    // 开设该科目的班级，为空表示所有班级
    #[serde(default, alias = "classIds")]
    pub class_ids: Vec<String>,
}

impl Subject {
    pub fn is_taught_in(&self, class_id: &str) -> bool {
        self.class_ids.is_empty() || self.class_ids.iter().any(|c| c == class_id)
    }
}

/// 评估活动（如 Classwork、End of Term Exam）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct AssignmentActivity {
    pub id: String,
    pub name: String,
    #[serde(default, alias = "expectedPerTerm")]
    pub expected_per_term: u32,
    // 占比（满分 100）
    pub weight: f64,
}
