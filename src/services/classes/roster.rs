use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::models::{ApiResponse, ErrorCode, classes::responses::ClassRosterResponse};

pub async fn get_class_roster(
    service: &ClassService,
    request: &HttpRequest,
    class_id: String,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let class = match storage.get_class(&class_id).await {
        Ok(Some(class)) => class,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ClassNotFound,
                "Class not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to get class information: {e}"),
                )),
            );
        }
    };

    match storage.list_students_in_class(&class_id).await {
        Ok(students) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ClassRosterResponse { class, students },
            "Class roster retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to list students: {e}"),
            )),
        ),
    }
}
