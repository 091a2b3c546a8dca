use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::reports::requests::ReportQuery;
use crate::services::ReportService;
use crate::utils::{SafeClassId, SafeStudentNo};

// 懒加载的全局 REPORT_SERVICE 实例
static REPORT_SERVICE: Lazy<ReportService> = Lazy::new(ReportService::new_lazy);

// HTTP处理程序
pub async fn get_student_report(
    req: HttpRequest,
    student_no: SafeStudentNo,
    query: web::Query<ReportQuery>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE
        .get_student_report(&req, student_no.0, query.into_inner())
        .await
}

pub async fn get_class_reports(
    req: HttpRequest,
    class_id: SafeClassId,
    query: web::Query<ReportQuery>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE
        .get_class_reports(&req, class_id.0, query.into_inner())
        .await
}

// 配置路由
pub fn configure_reports_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/reports")
            // 先注册固定前缀，避免被 {student_no} 吞掉
            .route("/class/{class_id}", web::get().to(get_class_reports))
            .route("/{student_no}", web::get().to(get_student_report)),
    );
}
