use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/promotion.ts")]
pub struct StudentRef {
    pub student_no: String,
}

/// 升级请求中的学生集合
///
/// 单个学生时为 `{student_no}`，多个学生时为从 "1" 开始编号的
/// `{students: {"1": {student_no}, "2": {student_no}}}`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export, export_to = "../frontend/src/types/generated/promotion.ts")]
pub enum PromotionPayload {
    Single { student_no: String },
    Batch { students: BTreeMap<String, StudentRef> },
}

impl PromotionPayload {
    /// 空列表返回 None
    pub fn from_student_nos<I, S>(student_nos: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut nos: Vec<String> = student_nos.into_iter().map(Into::into).collect();
        match nos.len() {
            0 => None,
            1 => Some(PromotionPayload::Single {
                student_no: nos.remove(0),
            }),
            _ => Some(PromotionPayload::Batch {
                students: nos
                    .into_iter()
                    .enumerate()
                    .map(|(i, student_no)| ((i + 1).to_string(), StudentRef { student_no }))
                    .collect(),
            }),
        }
    }

    /// 按编号顺序展开学号（"10" 排在 "9" 之后）
    pub fn student_nos(&self) -> Vec<String> {
        match self {
            PromotionPayload::Single { student_no } => vec![student_no.clone()],
            PromotionPayload::Batch { students } => {
                let mut entries: Vec<(&String, &StudentRef)> = students.iter().collect();
                entries.sort_by_key(|(key, _)| (key.parse::<u64>().unwrap_or(u64::MAX), *key));
                entries
                    .into_iter()
                    .map(|(_, s)| s.student_no.clone())
                    .collect()
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            PromotionPayload::Single { .. } => 1,
            PromotionPayload::Batch { students } => students.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 升级方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/promotion.ts")]
pub enum PromotionMode {
    // 升入紧邻的下一个班级
    Standard,
    // 跨级调整，必须填写理由
    Special,
    // 毕业班毕业
    Graduation,
}

impl PromotionMode {
    pub fn endpoint(&self) -> &'static str {
        match self {
            PromotionMode::Standard => "/api/promotions/normal",
            PromotionMode::Special => "/api/promotions/special",
            PromotionMode::Graduation => "/api/promotions/graduate",
        }
    }
}

impl std::fmt::Display for PromotionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PromotionMode::Standard => write!(f, "standard"),
            PromotionMode::Special => write!(f, "special"),
            PromotionMode::Graduation => write!(f, "graduation"),
        }
    }
}

/// 升级表单（提交前校验的输入）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/promotion.ts")]
pub struct PromotionForm {
    #[serde(default)]
    pub from_class: Option<String>,
    #[serde(default)]
    pub to_class: Option<String>,
    pub mode: PromotionMode,
    #[serde(default)]
    pub student_nos: Vec<String>,
    #[serde(default)]
    pub remarks: Option<String>,
}

/// 升级/毕业接口的请求体
#[derive(Debug, Clone, Deserialize)]
pub struct PromotionSubmission {
    #[serde(flatten)]
    pub students: PromotionPayload,
    pub from_class: String,
    #[serde(default)]
    pub to_class: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
}

impl PromotionSubmission {
    pub fn into_form(self, mode: PromotionMode) -> PromotionForm {
        PromotionForm {
            from_class: Some(self.from_class),
            to_class: self.to_class,
            mode,
            student_nos: self.students.student_nos(),
            remarks: self.remarks,
        }
    }
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/promotion.ts")]
pub struct PromotionRosterQuery {
    pub from_class: String,
    pub term: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_student_payload_shape() {
        let payload = PromotionPayload::from_student_nos(["S001"]).unwrap();
        assert_eq!(serde_json::to_value(&payload).unwrap(), json!({"student_no": "S001"}));
    }

    #[test]
    fn test_batch_payload_is_indexed_from_one() {
        let payload = PromotionPayload::from_student_nos(["S001", "S002"]).unwrap();
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"students": {"1": {"student_no": "S001"}, "2": {"student_no": "S002"}}})
        );
        assert!(PromotionPayload::from_student_nos(Vec::<String>::new()).is_none());
    }

    #[test]
    fn test_batch_order_follows_numeric_keys() {
        let nos: Vec<String> = (1..=11).map(|i| format!("S{i:03}")).collect();
        let payload = PromotionPayload::from_student_nos(nos.clone()).unwrap();
        assert_eq!(payload.len(), 11);
        assert_eq!(payload.student_nos(), nos);
    }

    #[test]
    fn test_submission_accepts_both_shapes() {
        let single: PromotionSubmission =
            serde_json::from_value(json!({"student_no": "S001", "from_class": "jhs1"})).unwrap();
        assert_eq!(single.students.student_nos(), vec!["S001"]);

        let batch: PromotionSubmission = serde_json::from_value(json!({
            "students": {"2": {"student_no": "S002"}, "1": {"student_no": "S001"}},
            "from_class": "jhs1",
            "to_class": "jhs3",
            "remarks": "Exceptional performance"
        }))
        .unwrap();
        let form = batch.into_form(PromotionMode::Special);
        assert_eq!(form.student_nos, vec!["S001", "S002"]);
        assert_eq!(form.to_class.as_deref(), Some("jhs3"));
        assert_eq!(form.mode, PromotionMode::Special);
    }
}
