use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{debug, error};

use super::{PromotionService, evaluate, load_ladder};
use crate::models::{ApiResponse, ErrorCode, promotions::requests::PromotionForm};

pub async fn plan_promotion(
    service: &PromotionService,
    request: &HttpRequest,
    form: PromotionForm,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let ladder = match load_ladder(&storage).await {
        Ok(ladder) => ladder,
        Err(e) => {
            error!("Failed to load classes: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to load classes: {e}"),
                )),
            );
        }
    };

    match evaluate::validate(&form, &ladder) {
        Ok(plan) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            plan,
            "Promotion request is valid",
        ))),
        Err(rejection) => {
            debug!("Promotion plan rejected: {}", rejection.code());
            Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::PromotionRejected,
                rejection.to_string(),
            )))
        }
    }
}
