use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::config::AppConfig;
use crate::models::{ApiResponse, ErrorCode, classes::responses::ClassListResponse};

pub async fn list_classes(
    service: &ClassService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_classes().await {
        Ok(items) => {
            let response = ClassListResponse {
                items,
                terminal_class_id: AppConfig::get().promotion.terminal_class_id.clone(),
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Classes retrieved successfully",
            )))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to list classes: {e}"),
            )),
        ),
    }
}
