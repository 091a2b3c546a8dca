use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{
    grading::entities::{GradeSetting, PromotionCriteria},
    students::entities::AssignmentScore,
};

static IDENTIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,32}$").expect("Invalid identifier regex"));

/// 班级ID、学号等路径参数：1-32 位字母、数字、下划线或连字符
pub fn validate_identifier(value: &str) -> Result<(), &'static str> {
    if !IDENTIFIER_RE.is_match(value) {
        return Err("Identifier must be 1-32 letters, numbers, underscores or hyphens");
    }
    Ok(())
}

/// 录入的原始分必须在 0-100 之间
pub fn validate_scores(scores: &[AssignmentScore]) -> Result<(), String> {
    if scores.is_empty() {
        return Err("At least one score is required".to_string());
    }
    for score in scores {
        if score.subject_id.trim().is_empty() {
            return Err("Subject is required for every score".to_string());
        }
        if score.assignment_name.trim().is_empty() && score.activity_id.is_none() {
            return Err(format!(
                "Assignment name is required for score in subject {}",
                score.subject_id
            ));
        }
        if !score.score.is_finite() || !(0.0..=100.0).contains(&score.score) {
            return Err(format!(
                "Score {} for '{}' must be between 0 and 100",
                score.score, score.assignment_name
            ));
        }
    }
    Ok(())
}

pub fn validate_criteria(criteria: &PromotionCriteria) -> Result<(), String> {
    if !criteria.min_average_score.is_finite()
        || !(0.0..=100.0).contains(&criteria.min_average_score)
    {
        return Err("Minimum average score must be between 0 and 100".to_string());
    }
    if criteria.min_core_subjects_to_pass as usize > criteria.core_subjects.len() {
        return Err(format!(
            "Cannot require {} core subjects when only {} are configured",
            criteria.min_core_subjects_to_pass,
            criteria.core_subjects.len()
        ));
    }
    Ok(())
}

/// 每个区间必须是 0-100 内的 "min-max"，等级不能为空
pub fn validate_grade_settings(settings: &[GradeSetting]) -> Result<(), String> {
    for setting in settings {
        if setting.grade.trim().is_empty() {
            return Err(format!("Grade is required for range '{}'", setting.range));
        }
        match setting.bounds() {
            Some((min, max)) if min >= 0.0 && max <= 100.0 => {}
            _ => {
                return Err(format!(
                    "Range '{}' of grade {} must look like 'min-max' within 0-100",
                    setting.range, setting.grade
                ));
            }
        }
    }
    Ok(())
}

/// 0-100 中没有任何等级覆盖的整数分段
pub fn grading_coverage_gaps(settings: &[GradeSetting]) -> Vec<String> {
    let mut gaps = Vec::new();
    let mut start: Option<u32> = None;

    for score in 0..=100u32 {
        let covered = settings.iter().any(|s| s.contains(score as f64));
        match (covered, start) {
            (false, None) => start = Some(score),
            (true, Some(begin)) => {
                gaps.push(format_gap(begin, score - 1));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(begin) = start {
        gaps.push(format_gap(begin, 100));
    }
    gaps
}

fn format_gap(begin: u32, end: u32) -> String {
    if begin == end {
        begin.to_string()
    } else {
        format!("{begin}-{end}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grade(grade: &str, range: &str) -> GradeSetting {
        GradeSetting {
            grade: grade.to_string(),
            range: range.to_string(),
            remarks: String::new(),
        }
    }

    fn score(value: f64) -> AssignmentScore {
        AssignmentScore {
            subject_id: "math".to_string(),
            assignment_name: "Classwork 1".to_string(),
            activity_id: None,
            score: value,
        }
    }

    #[test]
    fn test_identifier() {
        assert!(validate_identifier("jhs2").is_ok());
        assert!(validate_identifier("S-001_a").is_ok());
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("../etc").is_err());
        assert!(validate_identifier(&"a".repeat(33)).is_err());
    }

    #[test]
    fn test_scores_range() {
        assert!(validate_scores(&[score(0.0), score(100.0), score(55.5)]).is_ok());
        assert!(validate_scores(&[score(100.5)]).is_err());
        assert!(validate_scores(&[score(-1.0)]).is_err());
        assert!(validate_scores(&[score(f64::NAN)]).is_err());
        assert!(validate_scores(&[]).is_err());
    }

    #[test]
    fn test_criteria() {
        let mut criteria = PromotionCriteria {
            min_average_score: 50.0,
            core_subjects: vec!["math".to_string()],
            min_core_subjects_to_pass: 1,
        };
        assert!(validate_criteria(&criteria).is_ok());

        criteria.min_core_subjects_to_pass = 2;
        assert!(validate_criteria(&criteria).is_err());

        criteria.min_core_subjects_to_pass = 0;
        criteria.min_average_score = 120.0;
        assert!(validate_criteria(&criteria).is_err());
    }

    #[test]
    fn test_grade_settings() {
        assert!(validate_grade_settings(&[grade("A", "80-100"), grade("F", "0-39")]).is_ok());
        assert!(validate_grade_settings(&[grade("A", "80-110")]).is_err());
        assert!(validate_grade_settings(&[grade("", "0-39")]).is_err());
        assert!(validate_grade_settings(&[grade("B", "seventy")]).is_err());
    }

    #[test]
    fn test_coverage_gaps() {
        let full = [grade("A", "50-100"), grade("F", "0-49")];
        assert!(grading_coverage_gaps(&full).is_empty());

        let gappy = [grade("A", "80-100"), grade("C", "50-69"), grade("F", "1-39")];
        assert_eq!(grading_coverage_gaps(&gappy), vec!["0", "40-49", "70-79"]);

        assert_eq!(grading_coverage_gaps(&[]), vec!["0-100"]);
    }
}
