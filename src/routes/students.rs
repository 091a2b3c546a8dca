use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::students::requests::RecordScoresRequest;
use crate::services::StudentService;
use crate::utils::SafeStudentNo;

// 懒加载的全局 STUDENT_SERVICE 实例
static STUDENT_SERVICE: Lazy<StudentService> = Lazy::new(StudentService::new_lazy);

pub async fn get_student(req: HttpRequest, student_no: SafeStudentNo) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_student(&req, student_no.0).await
}

pub async fn record_scores(
    req: HttpRequest,
    student_no: SafeStudentNo,
    body: web::Json<RecordScoresRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .record_scores(&req, student_no.0, body.into_inner())
        .await
}

// 配置路由
pub fn configure_students_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/students")
            .route("/{student_no}", web::get().to(get_student))
            .service(
                web::resource("/{student_no}/scores")
                    .wrap(middlewares::RequireActor)
                    .route(web::put().to(record_scores)),
            ),
    );
}
