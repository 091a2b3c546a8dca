use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::errors::Result;
use crate::models::{
    audit::entities::AuditLogEntry,
    classes::entities::Class,
    grading::entities::{GradeSetting, PromotionCriteria},
    students::entities::{AssignmentScore, StudentProfile},
    subjects::entities::{AssignmentActivity, Subject},
    terms::entities::TermInfo,
};

pub mod local_cache;
pub mod seed;

/// 批量升级/毕业的写入结果
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    /// 全部写入，值为更新的学生数
    Applied(usize),
    /// 锁内复查未通过，逐项原因；未写入任何学生
    Rejected(Vec<String>),
}

/// 仓储接口
///
/// 报告计算与升级校验只依赖从这里取出的数据，不直接接触缓存后端。
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 班级管理方法
    // 按升级顺序列出班级
    async fn list_classes(&self) -> Result<Vec<Class>>;
    // 通过ID获取班级
    async fn get_class(&self, class_id: &str) -> Result<Option<Class>>;
    // 覆盖班级列表（顺序即升级顺序）
    async fn save_classes(&self, classes: Vec<Class>) -> Result<()>;

    /// 科目与评估活动
    async fn list_subjects(&self) -> Result<Vec<Subject>>;
    async fn save_subjects(&self, subjects: Vec<Subject>) -> Result<()>;
    async fn list_activities(&self) -> Result<Vec<AssignmentActivity>>;
    async fn save_activities(&self, activities: Vec<AssignmentActivity>) -> Result<()>;

    /// 评分方案与升级标准
    async fn list_grade_settings(&self) -> Result<Vec<GradeSetting>>;
    async fn save_grade_settings(&self, settings: Vec<GradeSetting>) -> Result<()>;
    // 未配置时返回默认标准
    async fn get_promotion_criteria(&self) -> Result<PromotionCriteria>;
    async fn save_promotion_criteria(&self, criteria: PromotionCriteria) -> Result<()>;

    /// 学期日历
    async fn list_terms(&self) -> Result<Vec<TermInfo>>;
    async fn save_terms(&self, terms: Vec<TermInfo>) -> Result<()>;

    /// 学生管理方法
    // 通过学号获取学生
    async fn get_student(&self, student_no: &str) -> Result<Option<StudentProfile>>;
    // 列出班级内所有学生（不过滤状态，含已毕业和停学）
    async fn list_students_in_class(&self, class_id: &str) -> Result<Vec<StudentProfile>>;
    // 新建或覆盖学生档案
    async fn upsert_student(&self, student: StudentProfile) -> Result<StudentProfile>;
    // 录入成绩，学生不存在时返回 None
    async fn record_scores(
        &self,
        student_no: &str,
        scores: Vec<AssignmentScore>,
    ) -> Result<Option<StudentProfile>>;
    // 学生总数
    async fn count_students(&self) -> Result<usize>;

    /// 升级与毕业
    // 在写锁内复查每个学生仍是源班级的在读学生，全部通过才写入；写入失败会回滚
    async fn promote_students(
        &self,
        student_nos: &[String],
        from_class: &str,
        to_class: &str,
    ) -> Result<BatchOutcome>;
    async fn graduate_students(
        &self,
        student_nos: &[String],
        from_class: &str,
    ) -> Result<BatchOutcome>;

    /// 审计日志
    async fn append_audit_log(&self, entry: AuditLogEntry) -> Result<()>;
    // 最新的在前
    async fn list_audit_logs(&self, limit: usize) -> Result<Vec<AuditLogEntry>>;
}

pub async fn create_storage(cache: Arc<dyn ObjectCache>) -> Result<Arc<dyn Storage>> {
    let storage = local_cache::LocalCacheStorage::new(cache);
    Ok(Arc::new(storage))
}
