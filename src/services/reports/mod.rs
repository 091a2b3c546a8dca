pub mod aggregate;
pub mod class;
pub mod get;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

pub use aggregate::ScoreAggregator;

use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::{reports::requests::ReportQuery, students::entities::StudentProfile};
use crate::storage::Storage;

pub struct ReportService {
    storage: Option<Arc<dyn Storage>>,
}

impl ReportService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 获取单个学生的成绩报告单
    pub async fn get_student_report(
        &self,
        request: &HttpRequest,
        student_no: String,
        query: ReportQuery,
    ) -> ActixResult<HttpResponse> {
        get::get_student_report(self, request, student_no, query).await
    }

    // 获取整个班级的成绩报告单
    pub async fn get_class_reports(
        &self,
        request: &HttpRequest,
        class_id: String,
        query: ReportQuery,
    ) -> ActixResult<HttpResponse> {
        class::get_class_reports(self, request, class_id, query).await
    }
}

/// 从仓储取出计算所需的全部参考数据
/// 报告用的班级名单：排名与在册人数只统计在读学生（Admitted / Active）
///
/// `subject` 为查询对象，本身不在读时也保留，以便查看毕业或停学学生的历史成绩单。
pub(crate) async fn report_roster(
    storage: &Arc<dyn Storage>,
    class_id: &str,
    subject: Option<&str>,
) -> Result<Vec<StudentProfile>> {
    Ok(storage
        .list_students_in_class(class_id)
        .await?
        .into_iter()
        .filter(|s| {
            s.admission_details.admission_status.is_promotable()
                || Some(s.student_no.as_str()) == subject
        })
        .collect())
}

pub(crate) async fn load_aggregator(storage: &Arc<dyn Storage>) -> Result<ScoreAggregator> {
    let subjects = storage.list_subjects().await?;
    let activities = storage.list_activities().await?;
    let grade_settings = storage.list_grade_settings().await?;
    let classes = storage.list_classes().await?;
    let terms = storage.list_terms().await?;

    Ok(ScoreAggregator::new(subjects, activities, grade_settings)
        .with_classes(classes)
        .with_terms(terms)
        .with_exam_activity(AppConfig::get().grading.exam_activity_name.clone()))
}

/// 未指定学期时取学期日历中的最后一个
pub(crate) async fn resolve_term_label(
    storage: &Arc<dyn Storage>,
    term: Option<String>,
) -> Result<String> {
    if let Some(term) = term.filter(|t| !t.trim().is_empty()) {
        return Ok(term);
    }
    Ok(storage
        .list_terms()
        .await?
        .last()
        .map(|t| format!("{} {}", t.name, t.year))
        .unwrap_or_default())
}
