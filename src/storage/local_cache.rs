//! 基于键值缓存的本地仓储
//!
//! 每类数据以一个 JSON 文档保存在固定键下，学生按学号单独存储并维护索引。
//! 所有写操作经由同一把异步锁串行执行，避免并发的读-改-写互相覆盖。

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use super::{BatchOutcome, Storage};
use crate::cache::ObjectCache;
use crate::errors::{Result, SchoolAdminError};
use crate::models::{
    audit::entities::AuditLogEntry,
    classes::entities::Class,
    grading::entities::{GradeSetting, PromotionCriteria},
    students::entities::{AdmissionStatus, AssignmentScore, StudentProfile},
    subjects::entities::{AssignmentActivity, Subject},
    terms::entities::TermInfo,
};

/// 固定键下的文档数（不含学生档案）
pub const FIXED_DOCUMENTS: u64 = 8;

mod keys {
    pub const CLASSES: &str = "classes";
    pub const SUBJECTS: &str = "subjects";
    pub const ACTIVITIES: &str = "activities";
    pub const GRADE_SETTINGS: &str = "grade_settings";
    pub const PROMOTION_CRITERIA: &str = "promotion_criteria";
    pub const TERMS: &str = "terms";
    pub const STUDENT_INDEX: &str = "students:index";
    pub const AUDIT_LOGS: &str = "audit_logs";

    pub fn student(student_no: &str) -> String {
        format!("student:{student_no}")
    }
}

pub struct LocalCacheStorage {
    cache: Arc<dyn ObjectCache>,
    write_lock: Mutex<()>,
}

impl LocalCacheStorage {
    pub fn new(cache: Arc<dyn ObjectCache>) -> Self {
        Self {
            cache,
            write_lock: Mutex::new(()),
        }
    }

    async fn list<T>(&self, key: &str) -> Result<Vec<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        Ok(self.cache.get_json::<Vec<T>>(key).await?.unwrap_or_default())
    }

    async fn student_index(&self) -> Result<Vec<String>> {
        self.list(keys::STUDENT_INDEX).await
    }

    /// 在写锁内重新检查：每个学生必须存在且是源班级的在读学生
    async fn load_batch(
        &self,
        student_nos: &[String],
        from_class: &str,
    ) -> Result<std::result::Result<Vec<StudentProfile>, Vec<String>>> {
        let mut students: Vec<StudentProfile> = Vec::with_capacity(student_nos.len());
        let mut failures = Vec::new();
        for no in student_nos {
            if students.iter().any(|s| &s.student_no == no) {
                continue;
            }
            match self.get_student(no).await? {
                Some(student) if student.is_promotable_from(from_class) => students.push(student),
                Some(_) => failures.push(format!(
                    "Student {no} is not an active student of class {from_class}"
                )),
                None => failures.push(format!("Student {no} not found")),
            }
        }
        if failures.is_empty() {
            Ok(Ok(students))
        } else {
            Ok(Err(failures))
        }
    }

    async fn write_student(&self, student: &StudentProfile) -> Result<()> {
        self.cache
            .insert_json(&keys::student(&student.student_no), student)
            .await
    }

    /// 逐个写入；中途失败时把已写入的学生恢复为原档案
    async fn write_batch(
        &self,
        originals: &[StudentProfile],
        updated: &[StudentProfile],
    ) -> Result<()> {
        for (written, student) in updated.iter().enumerate() {
            if let Err(e) = self.write_student(student).await {
                warn!(
                    "Batch write failed at student {}, restoring {} earlier write(s)",
                    student.student_no, written
                );
                for original in &originals[..written] {
                    if let Err(restore_err) = self.write_student(original).await {
                        error!(
                            "Failed to restore student {}: {}",
                            original.student_no, restore_err
                        );
                    }
                }
                return Err(SchoolAdminError::storage_operation(format!(
                    "Failed to write student {}, batch rolled back: {}",
                    student.student_no,
                    e.message()
                )));
            }
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Storage for LocalCacheStorage {
    async fn list_classes(&self) -> Result<Vec<Class>> {
        self.list(keys::CLASSES).await
    }

    async fn get_class(&self, class_id: &str) -> Result<Option<Class>> {
        Ok(self
            .list_classes()
            .await?
            .into_iter()
            .find(|c| c.id == class_id))
    }

    async fn save_classes(&self, classes: Vec<Class>) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.cache.insert_json(keys::CLASSES, &classes).await
    }

    async fn list_subjects(&self) -> Result<Vec<Subject>> {
        self.list(keys::SUBJECTS).await
    }

    async fn save_subjects(&self, subjects: Vec<Subject>) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.cache.insert_json(keys::SUBJECTS, &subjects).await
    }

    async fn list_activities(&self) -> Result<Vec<AssignmentActivity>> {
        self.list(keys::ACTIVITIES).await
    }

    async fn save_activities(&self, activities: Vec<AssignmentActivity>) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.cache.insert_json(keys::ACTIVITIES, &activities).await
    }

    async fn list_grade_settings(&self) -> Result<Vec<GradeSetting>> {
        self.list(keys::GRADE_SETTINGS).await
    }

    async fn save_grade_settings(&self, settings: Vec<GradeSetting>) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.cache.insert_json(keys::GRADE_SETTINGS, &settings).await
    }

    async fn get_promotion_criteria(&self) -> Result<PromotionCriteria> {
        Ok(self
            .cache
            .get_json::<PromotionCriteria>(keys::PROMOTION_CRITERIA)
            .await?
            .unwrap_or_default())
    }

    async fn save_promotion_criteria(&self, criteria: PromotionCriteria) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.cache
            .insert_json(keys::PROMOTION_CRITERIA, &criteria)
            .await
    }

    async fn list_terms(&self) -> Result<Vec<TermInfo>> {
        self.list(keys::TERMS).await
    }

    async fn save_terms(&self, terms: Vec<TermInfo>) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.cache.insert_json(keys::TERMS, &terms).await
    }

    async fn get_student(&self, student_no: &str) -> Result<Option<StudentProfile>> {
        self.cache.get_json(&keys::student(student_no)).await
    }

    async fn list_students_in_class(&self, class_id: &str) -> Result<Vec<StudentProfile>> {
        let mut students = Vec::new();
        for no in self.student_index().await? {
            if let Some(student) = self.get_student(&no).await?
                && student.class_id() == Some(class_id)
            {
                students.push(student);
            }
        }
        debug!("Loaded {} student(s) for class {}", students.len(), class_id);
        Ok(students)
    }

    async fn upsert_student(&self, student: StudentProfile) -> Result<StudentProfile> {
        if student.student_no.trim().is_empty() {
            return Err(SchoolAdminError::validation("student_no must not be empty"));
        }

        let _guard = self.write_lock.lock().await;
        // 先写档案再写索引，索引中不会出现没有档案的学号
        self.write_student(&student).await?;
        let mut index = self.student_index().await?;
        if !index.contains(&student.student_no) {
            index.push(student.student_no.clone());
            self.cache.insert_json(keys::STUDENT_INDEX, &index).await?;
        }
        Ok(student)
    }

    async fn record_scores(
        &self,
        student_no: &str,
        scores: Vec<AssignmentScore>,
    ) -> Result<Option<StudentProfile>> {
        let _guard = self.write_lock.lock().await;
        let Some(mut student) = self.get_student(student_no).await? else {
            return Ok(None);
        };

        for score in scores {
            match student
                .assignment_scores
                .iter_mut()
                .find(|s| s.same_assignment(&score))
            {
                Some(existing) => *existing = score,
                None => student.assignment_scores.push(score),
            }
        }

        self.write_student(&student).await?;
        Ok(Some(student))
    }

    async fn count_students(&self) -> Result<usize> {
        Ok(self.student_index().await?.len())
    }

    async fn promote_students(
        &self,
        student_nos: &[String],
        from_class: &str,
        to_class: &str,
    ) -> Result<BatchOutcome> {
        let _guard = self.write_lock.lock().await;
        let originals = match self.load_batch(student_nos, from_class).await? {
            Ok(students) => students,
            Err(failures) => return Ok(BatchOutcome::Rejected(failures)),
        };

        let updated: Vec<StudentProfile> = originals
            .iter()
            .cloned()
            .map(|mut student| {
                student.admission_details.class_assigned = Some(to_class.to_string());
                student
            })
            .collect();
        self.write_batch(&originals, &updated).await?;

        info!(
            "Moved {} student(s) from {} to {}",
            updated.len(),
            from_class,
            to_class
        );
        Ok(BatchOutcome::Applied(updated.len()))
    }

    async fn graduate_students(
        &self,
        student_nos: &[String],
        from_class: &str,
    ) -> Result<BatchOutcome> {
        let _guard = self.write_lock.lock().await;
        let originals = match self.load_batch(student_nos, from_class).await? {
            Ok(students) => students,
            Err(failures) => return Ok(BatchOutcome::Rejected(failures)),
        };

        // 毕业保留班级，作为历史记录
        let updated: Vec<StudentProfile> = originals
            .iter()
            .cloned()
            .map(|mut student| {
                student.admission_details.admission_status = AdmissionStatus::Graduated;
                student
            })
            .collect();
        self.write_batch(&originals, &updated).await?;

        info!("Graduated {} student(s) from {}", updated.len(), from_class);
        Ok(BatchOutcome::Applied(updated.len()))
    }

    async fn append_audit_log(&self, entry: AuditLogEntry) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut logs: Vec<AuditLogEntry> = self.list(keys::AUDIT_LOGS).await?;
        logs.push(entry);
        self.cache.insert_json(keys::AUDIT_LOGS, &logs).await
    }

    async fn list_audit_logs(&self, limit: usize) -> Result<Vec<AuditLogEntry>> {
        let logs: Vec<AuditLogEntry> = self.list(keys::AUDIT_LOGS).await?;
        Ok(logs.into_iter().rev().take(limit).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::cache::CacheResult;
    use crate::cache::object_cache::moka::MokaCacheWrapper;
    use crate::models::audit::entities::AuditAction;
    use crate::models::students::entities::AdmissionDetails;

    fn storage() -> LocalCacheStorage {
        LocalCacheStorage::new(Arc::new(MokaCacheWrapper::with_capacity(1024)))
    }

    /// 在指定次数的成功写入后拒绝一次写入，之后恢复正常
    struct FlakyCache {
        inner: MokaCacheWrapper,
        writes_left: AtomicUsize,
    }

    impl FlakyCache {
        fn new() -> Self {
            Self {
                inner: MokaCacheWrapper::with_capacity(1024),
                writes_left: AtomicUsize::new(usize::MAX),
            }
        }

        fn fail_after(&self, writes: usize) {
            self.writes_left.store(writes, Ordering::SeqCst);
        }
    }

    #[async_trait::async_trait]
    impl ObjectCache for FlakyCache {
        async fn get_raw(&self, key: &str) -> CacheResult<String> {
            self.inner.get_raw(key).await
        }

        async fn insert_raw(&self, key: String, value: String) -> Result<()> {
            match self.writes_left.load(Ordering::SeqCst) {
                0 => {
                    self.writes_left.store(usize::MAX, Ordering::SeqCst);
                    Err(SchoolAdminError::cache_connection("write refused"))
                }
                usize::MAX => self.inner.insert_raw(key, value).await,
                left => {
                    self.writes_left.store(left - 1, Ordering::SeqCst);
                    self.inner.insert_raw(key, value).await
                }
            }
        }
    }

    fn student(no: &str, class_id: &str) -> StudentProfile {
        StudentProfile {
            student_no: no.to_string(),
            first_name: "Test".to_string(),
            last_name: no.to_string(),
            other_names: None,
            admission_details: AdmissionDetails {
                class_assigned: Some(class_id.to_string()),
                admission_status: AdmissionStatus::Active,
                admission_date: None,
            },
            assignment_scores: vec![],
        }
    }

    #[tokio::test]
    async fn test_students_are_listed_by_class() {
        let storage = storage();
        storage.upsert_student(student("S001", "jhs1")).await.unwrap();
        storage.upsert_student(student("S002", "jhs2")).await.unwrap();
        storage.upsert_student(student("S003", "jhs1")).await.unwrap();
        // 重复写入不会产生重复索引
        storage.upsert_student(student("S001", "jhs1")).await.unwrap();

        let jhs1 = storage.list_students_in_class("jhs1").await.unwrap();
        let nos: Vec<_> = jhs1.iter().map(|s| s.student_no.as_str()).collect();
        assert_eq!(nos, vec!["S001", "S003"]);
        assert_eq!(storage.count_students().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_record_scores_replaces_same_assignment() {
        let storage = storage();
        storage.upsert_student(student("S001", "jhs1")).await.unwrap();

        let score = |name: &str, value: f64| AssignmentScore {
            subject_id: "math".to_string(),
            assignment_name: name.to_string(),
            activity_id: None,
            score: value,
        };
        storage
            .record_scores("S001", vec![score("Classwork 1", 60.0), score("Homework 1", 70.0)])
            .await
            .unwrap();
        let updated = storage
            .record_scores("S001", vec![score("Classwork 1", 90.0)])
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.assignment_scores.len(), 2);
        assert_eq!(updated.assignment_scores[0].score, 90.0);
        assert!(storage.record_scores("S999", vec![]).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_record_scores_keeps_activities_apart() {
        let storage = storage();
        storage.upsert_student(student("S001", "jhs1")).await.unwrap();

        let tagged = |activity: &str, value: f64| AssignmentScore {
            subject_id: "math".to_string(),
            assignment_name: String::new(),
            activity_id: Some(activity.to_string()),
            score: value,
        };
        let updated = storage
            .record_scores("S001", vec![tagged("cw", 80.0), tagged("hw", 70.0)])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.assignment_scores.len(), 2);

        let updated = storage
            .record_scores("S001", vec![tagged("hw", 75.0)])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.assignment_scores.len(), 2);
        assert_eq!(updated.assignment_scores[0].score, 80.0);
        assert_eq!(updated.assignment_scores[1].score, 75.0);
    }

    #[tokio::test]
    async fn test_promotion_is_all_or_nothing() {
        let storage = storage();
        storage.upsert_student(student("S001", "jhs1")).await.unwrap();

        let outcome = storage
            .promote_students(&["S001".to_string(), "S404".to_string()], "jhs1", "jhs2")
            .await
            .unwrap();
        assert_eq!(
            outcome,
            BatchOutcome::Rejected(vec!["Student S404 not found".to_string()])
        );
        let unchanged = storage.get_student("S001").await.unwrap().unwrap();
        assert_eq!(unchanged.class_id(), Some("jhs1"));

        let outcome = storage
            .promote_students(&["S001".to_string()], "jhs1", "jhs2")
            .await
            .unwrap();
        assert_eq!(outcome, BatchOutcome::Applied(1));
        let moved = storage.get_student("S001").await.unwrap().unwrap();
        assert_eq!(moved.class_id(), Some("jhs2"));
    }

    #[tokio::test]
    async fn test_second_overlapping_promotion_is_rejected() {
        let storage = storage();
        storage.upsert_student(student("S001", "jhs1")).await.unwrap();

        // 两个请求都以 jhs1 为源班级，先到者生效
        let first = storage
            .promote_students(&["S001".to_string()], "jhs1", "jhs2")
            .await
            .unwrap();
        assert_eq!(first, BatchOutcome::Applied(1));

        let second = storage
            .promote_students(&["S001".to_string()], "jhs1", "jhs3")
            .await
            .unwrap();
        assert_eq!(
            second,
            BatchOutcome::Rejected(vec![
                "Student S001 is not an active student of class jhs1".to_string()
            ])
        );
        let student = storage.get_student("S001").await.unwrap().unwrap();
        assert_eq!(student.class_id(), Some("jhs2"));
    }

    #[tokio::test]
    async fn test_graduation_sets_status() {
        let storage = storage();
        storage.upsert_student(student("S001", "jhs3")).await.unwrap();
        let outcome = storage
            .graduate_students(&["S001".to_string()], "jhs3")
            .await
            .unwrap();
        assert_eq!(outcome, BatchOutcome::Applied(1));
        let graduated = storage.get_student("S001").await.unwrap().unwrap();
        assert_eq!(
            graduated.admission_details.admission_status,
            AdmissionStatus::Graduated
        );
        assert_eq!(graduated.class_id(), Some("jhs3"));

        // 已毕业的学生不能再次毕业
        let again = storage
            .graduate_students(&["S001".to_string()], "jhs3")
            .await
            .unwrap();
        assert!(matches!(again, BatchOutcome::Rejected(_)));
    }

    #[tokio::test]
    async fn test_failed_write_is_reported() {
        let cache = Arc::new(FlakyCache::new());
        let storage = LocalCacheStorage::new(cache.clone());
        storage.upsert_student(student("S001", "jhs1")).await.unwrap();

        cache.fail_after(0);
        let err = storage
            .promote_students(&["S001".to_string()], "jhs1", "jhs2")
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E003");
        let unchanged = storage.get_student("S001").await.unwrap().unwrap();
        assert_eq!(unchanged.class_id(), Some("jhs1"));

        cache.fail_after(0);
        let err = storage
            .record_scores(
                "S001",
                vec![AssignmentScore {
                    subject_id: "math".to_string(),
                    assignment_name: "Classwork 1".to_string(),
                    activity_id: None,
                    score: 60.0,
                }],
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E001");
    }

    #[tokio::test]
    async fn test_failed_batch_write_restores_earlier_students() {
        let cache = Arc::new(FlakyCache::new());
        let storage = LocalCacheStorage::new(cache.clone());
        for no in ["S001", "S002", "S003"] {
            storage.upsert_student(student(no, "jhs3")).await.unwrap();
        }

        // 前两次写入成功，第三次失败
        cache.fail_after(2);
        let nos: Vec<String> = ["S001", "S002", "S003"].map(String::from).to_vec();
        let err = storage.graduate_students(&nos, "jhs3").await.unwrap_err();
        assert_eq!(err.code(), "E003");

        for no in &nos {
            let student = storage.get_student(no).await.unwrap().unwrap();
            assert_eq!(
                student.admission_details.admission_status,
                AdmissionStatus::Active
            );
        }
    }

    #[tokio::test]
    async fn test_audit_logs_newest_first() {
        let storage = storage();
        for i in 0..3 {
            storage
                .append_audit_log(AuditLogEntry::new(
                    "admin",
                    AuditAction::PromoteStudents,
                    format!("batch {i}"),
                ))
                .await
                .unwrap();
        }
        let logs = storage.list_audit_logs(2).await.unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].details, "batch 2");
        assert_eq!(logs[1].details, "batch 1");
    }

    #[tokio::test]
    async fn test_criteria_defaults_when_unset() {
        let storage = storage();
        assert_eq!(
            storage.get_promotion_criteria().await.unwrap(),
            PromotionCriteria::default()
        );
    }
}
