//! 升级校验
//!
//! 提交前的校验关卡与升级标准评估，均为纯函数，不访问仓储。

use std::fmt;

use crate::models::{
    classes::entities::Class,
    grading::entities::PromotionCriteria,
    promotions::{
        requests::{PromotionForm, PromotionMode, PromotionPayload},
        responses::{Eligibility, PromotionPlan},
    },
    reports::responses::SubjectReportRow,
    students::entities::StudentProfile,
};

/// 有序班级列表，位置决定标准升级的目标班级
#[derive(Debug, Clone)]
pub struct ClassLadder {
    classes: Vec<Class>,
    terminal_class_id: String,
}

impl ClassLadder {
    pub fn new(classes: Vec<Class>, terminal_class_id: impl Into<String>) -> Self {
        Self {
            classes,
            terminal_class_id: terminal_class_id.into(),
        }
    }

    pub fn get(&self, class_id: &str) -> Option<&Class> {
        self.classes.iter().find(|c| c.id == class_id)
    }

    pub fn next_class(&self, class_id: &str) -> Option<&Class> {
        let position = self.classes.iter().position(|c| c.id == class_id)?;
        self.classes.get(position + 1)
    }

    pub fn is_terminal(&self, class_id: &str) -> bool {
        class_id == self.terminal_class_id
    }

    /// 仅毕业班提供毕业流程，同时禁用升级
    pub fn offers_graduation(&self, class_id: &str) -> bool {
        self.is_terminal(class_id)
    }
}

/// 提交前被拒绝的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromotionRejection {
    MissingFromClass,
    MissingToClass,
    UnknownClass(String),
    SameClass(String),
    NoStudentsSelected,
    NoNextClass(String),
    InvalidSequence {
        from: String,
        to: String,
        expected: String,
    },
    MissingReason,
    GraduationOnly(String),
    NotTerminalClass(String),
}

impl PromotionRejection {
    pub fn code(&self) -> &'static str {
        match self {
            PromotionRejection::MissingFromClass => "MISSING_FROM_CLASS",
            PromotionRejection::MissingToClass => "MISSING_TO_CLASS",
            PromotionRejection::UnknownClass(_) => "UNKNOWN_CLASS",
            PromotionRejection::SameClass(_) => "SAME_CLASS",
            PromotionRejection::NoStudentsSelected => "NO_STUDENTS_SELECTED",
            PromotionRejection::NoNextClass(_) => "NO_NEXT_CLASS",
            PromotionRejection::InvalidSequence { .. } => "INVALID_SEQUENCE",
            PromotionRejection::MissingReason => "MISSING_REASON",
            PromotionRejection::GraduationOnly(_) => "GRADUATION_ONLY",
            PromotionRejection::NotTerminalClass(_) => "NOT_TERMINAL_CLASS",
        }
    }
}

impl fmt::Display for PromotionRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromotionRejection::MissingFromClass => write!(f, "Please select the class to promote from"),
            PromotionRejection::MissingToClass => write!(f, "Please select the class to promote to"),
            PromotionRejection::UnknownClass(id) => write!(f, "Class '{id}' does not exist"),
            PromotionRejection::SameClass(id) => {
                write!(f, "Source and target class must differ (both are '{id}')")
            }
            PromotionRejection::NoStudentsSelected => {
                write!(f, "Please select at least one student")
            }
            PromotionRejection::NoNextClass(id) => {
                write!(f, "Class '{id}' has no next class to promote to")
            }
            PromotionRejection::InvalidSequence { from, to, expected } => write!(
                f,
                "Invalid Promotion Sequence: students in '{from}' can only be promoted to '{expected}', not '{to}'. Use special promotion instead"
            ),
            PromotionRejection::MissingReason => {
                write!(f, "A reason is required for special promotion")
            }
            PromotionRejection::GraduationOnly(id) => write!(
                f,
                "Class '{id}' is the final class; its students can only graduate"
            ),
            PromotionRejection::NotTerminalClass(id) => {
                write!(f, "Only students of the final class can graduate, not '{id}'")
            }
        }
    }
}

impl std::error::Error for PromotionRejection {}

/// 提交前校验，通过后生成提交计划
pub fn validate(form: &PromotionForm, ladder: &ClassLadder) -> Result<PromotionPlan, PromotionRejection> {
    let from = form
        .from_class
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(PromotionRejection::MissingFromClass)?;
    if ladder.get(from).is_none() {
        return Err(PromotionRejection::UnknownClass(from.to_string()));
    }

    let to_class = match form.mode {
        PromotionMode::Graduation => {
            if !ladder.is_terminal(from) {
                return Err(PromotionRejection::NotTerminalClass(from.to_string()));
            }
            None
        }
        PromotionMode::Standard | PromotionMode::Special => {
            if ladder.is_terminal(from) {
                return Err(PromotionRejection::GraduationOnly(from.to_string()));
            }
            Some(resolve_target(form, from, ladder)?)
        }
    };

    let student_nos = distinct_student_nos(&form.student_nos);
    let payload = PromotionPayload::from_student_nos(student_nos)
        .ok_or(PromotionRejection::NoStudentsSelected)?;

    let remarks = match form.mode {
        PromotionMode::Special => Some(
            form.remarks
                .as_deref()
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .ok_or(PromotionRejection::MissingReason)?
                .to_string(),
        ),
        _ => None,
    };

    Ok(PromotionPlan {
        mode: form.mode,
        endpoint: form.mode.endpoint().to_string(),
        from_class: from.to_string(),
        to_class,
        payload,
        remarks,
    })
}

fn resolve_target(
    form: &PromotionForm,
    from: &str,
    ladder: &ClassLadder,
) -> Result<String, PromotionRejection> {
    let requested = form
        .to_class
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let to = match (form.mode, requested) {
        (_, Some(to)) => to,
        // 标准升级未指定目标时默认升入下一个班级
        (PromotionMode::Standard, None) => match ladder.next_class(from) {
            Some(next) => next.id.as_str(),
            None => return Err(PromotionRejection::NoNextClass(from.to_string())),
        },
        _ => return Err(PromotionRejection::MissingToClass),
    };

    if ladder.get(to).is_none() {
        return Err(PromotionRejection::UnknownClass(to.to_string()));
    }
    if to == from {
        return Err(PromotionRejection::SameClass(from.to_string()));
    }

    if form.mode == PromotionMode::Standard {
        let expected = ladder
            .next_class(from)
            .ok_or_else(|| PromotionRejection::NoNextClass(from.to_string()))?;
        if expected.id != to {
            return Err(PromotionRejection::InvalidSequence {
                from: from.to_string(),
                to: to.to_string(),
                expected: expected.id.clone(),
            });
        }
    }

    Ok(to.to_string())
}

fn distinct_student_nos(student_nos: &[String]) -> Vec<String> {
    let mut seen = Vec::with_capacity(student_nos.len());
    for no in student_nos.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        if !seen.iter().any(|s: &String| s == no) {
            seen.push(no.to_string());
        }
    }
    seen
}

/// 可参与升级的名单：在读且属于该班级
pub fn promotable_roster(students: Vec<StudentProfile>, from_class: &str) -> Vec<StudentProfile> {
    students
        .into_iter()
        .filter(|s| s.is_promotable_from(from_class))
        .collect()
}

/// 逐项检查选中的学生是否在名单中，返回失败原因
pub fn check_selection(selected: &[String], roster: &[StudentProfile], from_class: &str) -> Vec<String> {
    selected
        .iter()
        .filter(|no| !roster.iter().any(|s| &s.student_no == *no))
        .map(|no| format!("Student {no} is not an active student of class {from_class}"))
        .collect()
}

/// 按升级标准评估单个学生
pub fn assess_eligibility(
    rows: &[SubjectReportRow],
    criteria: &PromotionCriteria,
    pass_mark: f64,
) -> Eligibility {
    let average_score = if rows.is_empty() {
        0.0
    } else {
        let sum: u32 = rows.iter().map(|r| r.total_score).sum();
        (sum as f64 / rows.len() as f64 * 100.0).round() / 100.0
    };

    let core_passed = criteria
        .core_subjects
        .iter()
        .filter(|core| {
            rows.iter()
                .any(|r| &r.subject_id == *core && r.total_score as f64 >= pass_mark)
        })
        .count() as u32;
    let core_required = criteria.min_core_subjects_to_pass;

    let mut reasons = Vec::new();
    if average_score < criteria.min_average_score {
        reasons.push(format!(
            "Average score {average_score} is below the minimum of {}",
            criteria.min_average_score
        ));
    }
    if core_passed < core_required {
        reasons.push(format!(
            "Passed {core_passed} of the {core_required} required core subjects"
        ));
    }

    Eligibility {
        eligible: reasons.is_empty(),
        average_score,
        core_passed,
        core_required,
        reasons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::students::entities::{AdmissionDetails, AdmissionStatus};

    fn ladder() -> ClassLadder {
        let classes = ["jhs1", "jhs2", "jhs3"]
            .iter()
            .map(|id| Class {
                id: id.to_string(),
                name: id.to_uppercase(),
            })
            .collect();
        ClassLadder::new(classes, "jhs3")
    }

    fn form(mode: PromotionMode, from: &str, to: Option<&str>, students: &[&str]) -> PromotionForm {
        PromotionForm {
            from_class: Some(from.to_string()),
            to_class: to.map(str::to_string),
            mode,
            student_nos: students.iter().map(|s| s.to_string()).collect(),
            remarks: None,
        }
    }

    #[test]
    fn test_standard_backwards_is_invalid_sequence() {
        let err = validate(&form(PromotionMode::Standard, "jhs2", Some("jhs1"), &["S001"]), &ladder())
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_SEQUENCE");
        assert!(err.to_string().starts_with("Invalid Promotion Sequence"));
    }

    #[test]
    fn test_standard_to_next_class() {
        let plan = validate(&form(PromotionMode::Standard, "jhs1", Some("jhs2"), &["S001"]), &ladder())
            .unwrap();
        assert_eq!(plan.to_class.as_deref(), Some("jhs2"));
        assert_eq!(plan.endpoint, "/api/promotions/normal");
        assert_eq!(
            plan.payload,
            PromotionPayload::Single {
                student_no: "S001".to_string()
            }
        );
        assert!(plan.remarks.is_none());

        let defaulted = validate(&form(PromotionMode::Standard, "jhs1", None, &["S001"]), &ladder())
            .unwrap();
        assert_eq!(defaulted.to_class.as_deref(), Some("jhs2"));
    }

    #[test]
    fn test_standard_skip_is_rejected() {
        let ladder = ClassLadder::new(
            ["kg1", "kg2", "p1"]
                .iter()
                .map(|id| Class {
                    id: id.to_string(),
                    name: id.to_string(),
                })
                .collect(),
            "jhs3",
        );
        let err = validate(&form(PromotionMode::Standard, "kg1", Some("p1"), &["S001"]), &ladder)
            .unwrap_err();
        assert_eq!(
            err,
            PromotionRejection::InvalidSequence {
                from: "kg1".to_string(),
                to: "p1".to_string(),
                expected: "kg2".to_string(),
            }
        );
    }

    #[test]
    fn test_special_requires_reason() {
        let mut special = form(PromotionMode::Special, "jhs1", Some("jhs3"), &["S001", "S002"]);
        assert_eq!(
            validate(&special, &ladder()).unwrap_err(),
            PromotionRejection::MissingReason
        );

        special.remarks = Some("   ".to_string());
        assert_eq!(
            validate(&special, &ladder()).unwrap_err(),
            PromotionRejection::MissingReason
        );

        special.remarks = Some(" Skipped a year on merit ".to_string());
        let plan = validate(&special, &ladder()).unwrap();
        assert_eq!(plan.remarks.as_deref(), Some("Skipped a year on merit"));
        assert_eq!(plan.payload.len(), 2);
        assert_eq!(plan.endpoint, "/api/promotions/special");
    }

    #[test]
    fn test_special_requires_target() {
        let mut special = form(PromotionMode::Special, "jhs1", None, &["S001"]);
        special.remarks = Some("reason".to_string());
        assert_eq!(
            validate(&special, &ladder()).unwrap_err(),
            PromotionRejection::MissingToClass
        );
    }

    #[test]
    fn test_classes_must_be_set_known_and_distinct() {
        let mut missing = form(PromotionMode::Standard, "", None, &["S001"]);
        missing.from_class = None;
        assert_eq!(
            validate(&missing, &ladder()).unwrap_err(),
            PromotionRejection::MissingFromClass
        );

        assert_eq!(
            validate(&form(PromotionMode::Standard, "shs1", None, &["S001"]), &ladder()).unwrap_err(),
            PromotionRejection::UnknownClass("shs1".to_string())
        );

        let mut same = form(PromotionMode::Special, "jhs1", Some("jhs1"), &["S001"]);
        same.remarks = Some("reason".to_string());
        assert_eq!(
            validate(&same, &ladder()).unwrap_err(),
            PromotionRejection::SameClass("jhs1".to_string())
        );
    }

    #[test]
    fn test_requires_selected_students() {
        assert_eq!(
            validate(&form(PromotionMode::Standard, "jhs1", None, &[]), &ladder()).unwrap_err(),
            PromotionRejection::NoStudentsSelected
        );
        assert_eq!(
            validate(&form(PromotionMode::Standard, "jhs1", None, &["  "]), &ladder()).unwrap_err(),
            PromotionRejection::NoStudentsSelected
        );
    }

    #[test]
    fn test_duplicate_selection_collapses() {
        let plan = validate(
            &form(PromotionMode::Standard, "jhs1", None, &["S001", "S002", "S001"]),
            &ladder(),
        )
        .unwrap();
        assert_eq!(plan.payload.student_nos(), vec!["S001", "S002"]);
    }

    #[test]
    fn test_terminal_class_is_graduation_only() {
        let ladder = ladder();
        assert!(ladder.offers_graduation("jhs3"));
        assert!(!ladder.offers_graduation("jhs2"));
        assert!(ladder.next_class("jhs3").is_none());

        let mut special = form(PromotionMode::Special, "jhs3", Some("jhs1"), &["S001"]);
        special.remarks = Some("reason".to_string());
        assert_eq!(
            validate(&special, &ladder).unwrap_err(),
            PromotionRejection::GraduationOnly("jhs3".to_string())
        );

        let plan = validate(&form(PromotionMode::Graduation, "jhs3", None, &["S001"]), &ladder)
            .unwrap();
        assert_eq!(plan.endpoint, "/api/promotions/graduate");
        assert!(plan.to_class.is_none());

        assert_eq!(
            validate(&form(PromotionMode::Graduation, "jhs2", None, &["S001"]), &ladder).unwrap_err(),
            PromotionRejection::NotTerminalClass("jhs2".to_string())
        );
    }

    fn student(no: &str, class_id: &str, status: AdmissionStatus) -> StudentProfile {
        StudentProfile {
            student_no: no.to_string(),
            first_name: "Test".to_string(),
            last_name: no.to_string(),
            other_names: None,
            admission_details: AdmissionDetails {
                class_assigned: Some(class_id.to_string()),
                admission_status: status,
                admission_date: None,
            },
            assignment_scores: vec![],
        }
    }

    #[test]
    fn test_roster_and_selection_checks() {
        let roster = promotable_roster(
            vec![
                student("S001", "jhs2", AdmissionStatus::Active),
                student("S002", "jhs2", AdmissionStatus::Admitted),
                student("S003", "jhs2", AdmissionStatus::Stopped),
                student("S004", "jhs1", AdmissionStatus::Active),
            ],
            "jhs2",
        );
        let nos: Vec<_> = roster.iter().map(|s| s.student_no.as_str()).collect();
        assert_eq!(nos, vec!["S001", "S002"]);

        let failures = check_selection(
            &["S001".to_string(), "S003".to_string(), "S404".to_string()],
            &roster,
            "jhs2",
        );
        assert_eq!(failures.len(), 2);
        assert!(failures[0].contains("S003"));
        assert!(failures[1].contains("S404"));
    }

    fn row(subject: &str, total: u32) -> SubjectReportRow {
        SubjectReportRow {
            subject_id: subject.to_string(),
            subject_name: subject.to_string(),
            sba_score: 0.0,
            exam_score: 0.0,
            total_score: total,
            grade: "N/A".to_string(),
            remark: "N/A".to_string(),
            rank: 1,
        }
    }

    #[test]
    fn test_eligibility_against_criteria() {
        let criteria = PromotionCriteria {
            min_average_score: 50.0,
            core_subjects: vec!["math".to_string(), "eng".to_string(), "sci".to_string()],
            min_core_subjects_to_pass: 2,
        };

        let strong = assess_eligibility(
            &[row("math", 70), row("eng", 55), row("sci", 40), row("art", 60)],
            &criteria,
            50.0,
        );
        assert!(strong.eligible);
        assert_eq!(strong.average_score, 56.25);
        assert_eq!(strong.core_passed, 2);

        let weak = assess_eligibility(&[row("math", 70), row("eng", 30)], &criteria, 50.0);
        assert!(!weak.eligible);
        assert_eq!(weak.average_score, 50.0);
        assert_eq!(weak.core_passed, 1);
        assert_eq!(weak.reasons.len(), 1);

        let empty = assess_eligibility(&[], &criteria, 50.0);
        assert!(!empty.eligible);
        assert_eq!(empty.reasons.len(), 2);
    }

    #[test]
    fn test_default_criteria_admit_everyone() {
        let eligibility = assess_eligibility(&[], &PromotionCriteria::default(), 50.0);
        assert!(eligibility.eligible);
    }
}
