use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 等级设置：分数区间 "min-max" 对应等级与评语
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct GradeSetting {
    pub grade: String,
    pub range: String,
    #[serde(default)]
    pub remarks: String,
}

impl GradeSetting {
    /// 解析区间，格式错误返回 None
    pub fn bounds(&self) -> Option<(f64, f64)> {
        let (min, max) = self.range.split_once('-')?;
        let min: f64 = min.trim().parse().ok()?;
        let max: f64 = max.trim().parse().ok()?;
        if min > max {
            return None;
        }
        Some((min, max))
    }

    pub fn contains(&self, score: f64) -> bool {
        self.bounds()
            .map(|(min, max)| score >= min && score <= max)
            .unwrap_or(false)
    }
}

/// 升级标准（单例配置）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grading.ts")]
pub struct PromotionCriteria {
    #[serde(alias = "minAverageScore")]
    pub min_average_score: f64,
    #[serde(default, alias = "coreSubjects")]
    pub core_subjects: Vec<String>,
    #[serde(default, alias = "minCoreSubjectsToPass")]
    pub min_core_subjects_to_pass: u32,
}

impl Default for PromotionCriteria {
    fn default() -> Self {
        Self {
            min_average_score: 0.0,
            core_subjects: Vec::new(),
            min_core_subjects_to_pass: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setting(range: &str) -> GradeSetting {
        GradeSetting {
            grade: "B".to_string(),
            range: range.to_string(),
            remarks: "Credit".to_string(),
        }
    }

    #[test]
    fn test_bounds_parsing() {
        assert_eq!(setting("70-74").bounds(), Some((70.0, 74.0)));
        assert_eq!(setting(" 0 - 39 ").bounds(), Some((0.0, 39.0)));
        assert_eq!(setting("74-70").bounds(), None);
        assert_eq!(setting("seventy").bounds(), None);
    }

    #[test]
    fn test_contains_is_inclusive() {
        let b = setting("70-74");
        assert!(b.contains(70.0));
        assert!(b.contains(74.0));
        assert!(!b.contains(75.0));
        assert!(!setting("bad").contains(70.0));
    }

    #[test]
    fn test_criteria_accepts_camel_case() {
        let criteria: PromotionCriteria = serde_json::from_str(
            r#"{"minAverageScore": 45, "coreSubjects": ["math", "eng"], "minCoreSubjectsToPass": 2}"#,
        )
        .unwrap();
        assert_eq!(criteria.min_average_score, 45.0);
        assert_eq!(criteria.core_subjects.len(), 2);
        assert_eq!(criteria.min_core_subjects_to_pass, 2);
    }
}
