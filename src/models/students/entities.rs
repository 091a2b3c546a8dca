use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 入学状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub enum AdmissionStatus {
    Admitted,
    Active,
    Graduated,
    Stopped,
}

impl AdmissionStatus {
    /// 只有在读学生可以参与升级或毕业
    pub fn is_promotable(&self) -> bool {
        matches!(self, AdmissionStatus::Admitted | AdmissionStatus::Active)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct AdmissionDetails {
    #[serde(default, alias = "classAssigned")]
    pub class_assigned: Option<String>,
    #[serde(alias = "admissionStatus")]
    pub admission_status: AdmissionStatus,
    #[serde(default, alias = "admissionDate")]
    pub admission_date: Option<chrono::NaiveDate>,
}

/// 单条作业/考试成绩（原始分 0-100）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct AssignmentScore {
    #[serde(alias = "subjectId")]
    pub subject_id: String,
    #[serde(alias = "assignmentName")]
    pub assignment_name: String,
    // 显式关联的活动，缺省时按活动名称前缀匹配
    #[serde(default, alias = "activityId", skip_serializing_if = "Option::is_none")]
    pub activity_id: Option<String>,
    pub score: f64,
}

impl AssignmentScore {
    /// 同一科目、同一活动下的同名作业视为同一条成绩
    pub fn same_assignment(&self, other: &AssignmentScore) -> bool {
        self.subject_id == other.subject_id
            && self.activity_id == other.activity_id
            && self.assignment_name.trim() == other.assignment_name.trim()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentProfile {
    #[serde(alias = "studentNo")]
    pub student_no: String,
    #[serde(alias = "firstName")]
    pub first_name: String,
    #[serde(alias = "lastName")]
    pub last_name: String,
    #[serde(default, alias = "otherNames")]
    pub other_names: Option<String>,
    #[serde(alias = "admissionDetails")]
    pub admission_details: AdmissionDetails,
    #[serde(default, alias = "assignmentScores")]
    pub assignment_scores: Vec<AssignmentScore>,
}

impl StudentProfile {
    pub fn full_name(&self) -> String {
        match self.other_names.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(other) => format!("{} {} {}", self.first_name, other, self.last_name),
            None => format!("{} {}", self.first_name, self.last_name),
        }
    }

    /// 当前所在班级，空字符串视为未分班
    pub fn class_id(&self) -> Option<&str> {
        self.admission_details
            .class_assigned
            .as_deref()
            .filter(|c| !c.trim().is_empty())
    }

    pub fn is_promotable_from(&self, class_id: &str) -> bool {
        self.admission_details.admission_status.is_promotable() && self.class_id() == Some(class_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case_profile() {
        let json = r#"{
            "student_no": "S001",
            "firstName": "Ama",
            "lastName": "Mensah",
            "admissionDetails": { "class_assigned": "jhs2", "admission_status": "Active" },
            "assignmentScores": [
                { "subject_id": "math", "assignment_name": "Classwork 1", "score": 80 }
            ]
        }"#;
        let student: StudentProfile = serde_json::from_str(json).unwrap();
        assert_eq!(student.class_id(), Some("jhs2"));
        assert_eq!(student.assignment_scores.len(), 1);
        assert!(student.assignment_scores[0].activity_id.is_none());
        assert!(student.is_promotable_from("jhs2"));
        assert!(!student.is_promotable_from("jhs3"));
    }

    #[test]
    fn test_blank_class_means_unassigned() {
        let student = StudentProfile {
            student_no: "S002".to_string(),
            first_name: "Kofi".to_string(),
            last_name: "Boateng".to_string(),
            other_names: Some("  ".to_string()),
            admission_details: AdmissionDetails {
                class_assigned: Some(String::new()),
                admission_status: AdmissionStatus::Admitted,
                admission_date: None,
            },
            assignment_scores: vec![],
        };
        assert_eq!(student.class_id(), None);
        assert_eq!(student.full_name(), "Kofi Boateng");
    }

    #[test]
    fn test_same_assignment_respects_activity() {
        let score = |name: &str, activity: Option<&str>| AssignmentScore {
            subject_id: "math".to_string(),
            assignment_name: name.to_string(),
            activity_id: activity.map(str::to_string),
            score: 50.0,
        };
        assert!(score("Classwork 1", None).same_assignment(&score("Classwork 1 ", None)));
        assert!(score("", Some("cw")).same_assignment(&score("", Some("cw"))));
        assert!(!score("", Some("cw")).same_assignment(&score("", Some("hw"))));
        assert!(!score("Classwork 1", None).same_assignment(&score("Classwork 2", None)));
    }

    #[test]
    fn test_only_admitted_and_active_are_promotable() {
        assert!(AdmissionStatus::Admitted.is_promotable());
        assert!(AdmissionStatus::Active.is_promotable());
        assert!(!AdmissionStatus::Graduated.is_promotable());
        assert!(!AdmissionStatus::Stopped.is_promotable());
    }
}
