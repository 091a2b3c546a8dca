//! 启动种子数据
//!
//! 仓储为空时从 JSON 文档导入班级、科目、评分方案与学生等基础数据。

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info};

use super::Storage;
use crate::errors::Result;
use crate::models::{
    classes::entities::Class,
    grading::entities::{GradeSetting, PromotionCriteria},
    students::entities::StudentProfile,
    subjects::entities::{AssignmentActivity, Subject},
    terms::entities::TermInfo,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SeedDocument {
    pub classes: Vec<Class>,
    pub subjects: Vec<Subject>,
    pub activities: Vec<AssignmentActivity>,
    pub grade_settings: Vec<GradeSetting>,
    pub promotion_criteria: Option<PromotionCriteria>,
    pub terms: Vec<TermInfo>,
    pub students: Vec<StudentProfile>,
}

impl SeedDocument {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// 仓储中已有班级或学生时跳过，返回是否导入
pub async fn seed_if_empty(storage: &Arc<dyn Storage>, document: SeedDocument) -> Result<bool> {
    let existing_students = storage.count_students().await?;
    let existing_classes = storage.list_classes().await?.len();
    if existing_students > 0 || existing_classes > 0 {
        debug!(
            "Repository already has {} class(es) and {} student(s), skipping seed",
            existing_classes, existing_students
        );
        return Ok(false);
    }

    let student_count = document.students.len();
    storage.save_classes(document.classes).await?;
    storage.save_subjects(document.subjects).await?;
    storage.save_activities(document.activities).await?;
    storage.save_grade_settings(document.grade_settings).await?;
    if let Some(criteria) = document.promotion_criteria {
        storage.save_promotion_criteria(criteria).await?;
    }
    storage.save_terms(document.terms).await?;
    for student in document.students {
        storage.upsert_student(student).await?;
    }

    info!("Seeded repository with {} student(s)", student_count);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::object_cache::moka::MokaCacheWrapper;
    use crate::storage::local_cache::LocalCacheStorage;

    const SEED: &str = r#"{
        "classes": [{"id": "jhs1", "name": "JHS 1"}, {"id": "jhs2", "name": "JHS 2"}],
        "grade_settings": [{"grade": "A", "range": "80-100", "remarks": "Excellent"}],
        "promotion_criteria": {"min_average_score": 40, "core_subjects": ["math"], "min_core_subjects_to_pass": 1},
        "students": [{
            "student_no": "S001", "first_name": "Ama", "last_name": "Mensah",
            "admission_details": {"class_assigned": "jhs1", "admission_status": "Active"}
        }]
    }"#;

    #[tokio::test]
    async fn test_seed_only_once() {
        let storage: Arc<dyn Storage> = Arc::new(LocalCacheStorage::new(Arc::new(
            MokaCacheWrapper::with_capacity(256),
        )));
        let document: SeedDocument = serde_json::from_str(SEED).unwrap();
        assert!(seed_if_empty(&storage, document).await.unwrap());

        assert_eq!(storage.list_classes().await.unwrap().len(), 2);
        assert_eq!(storage.count_students().await.unwrap(), 1);
        assert_eq!(
            storage.get_promotion_criteria().await.unwrap().min_average_score,
            40.0
        );

        let again: SeedDocument = serde_json::from_str(SEED).unwrap();
        assert!(!seed_if_empty(&storage, again).await.unwrap());
    }
}
