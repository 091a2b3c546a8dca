use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::SettingsService;
use crate::middlewares::RequireActor;
use crate::models::{
    ApiResponse, ErrorCode,
    audit::entities::{AuditAction, AuditLogEntry},
    grading::requests::UpdatePromotionCriteriaRequest,
};
use crate::utils::validate::validate_criteria;

pub async fn get_promotion_criteria(
    service: &SettingsService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_promotion_criteria().await {
        Ok(criteria) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            criteria,
            "Promotion criteria retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to get promotion criteria: {e}"),
            )),
        ),
    }
}

pub async fn update_promotion_criteria(
    service: &SettingsService,
    request: &HttpRequest,
    update: UpdatePromotionCriteriaRequest,
) -> ActixResult<HttpResponse> {
    let Some(actor) = RequireActor::extract_actor(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Missing actor",
        )));
    };

    let mut criteria = update.criteria;
    criteria.core_subjects = criteria
        .core_subjects
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    criteria.core_subjects.sort();
    criteria.core_subjects.dedup();

    if let Err(msg) = validate_criteria(&criteria) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::CriteriaInvalid,
            msg,
        )));
    }

    let storage = service.get_storage(request);
    if let Err(e) = storage.save_promotion_criteria(criteria.clone()).await {
        error!("Failed to save promotion criteria: {}", e);
        return Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to save promotion criteria: {e}"),
            )),
        );
    }

    let details = format!(
        "Minimum average {}, {} of {} core subject(s) required",
        criteria.min_average_score,
        criteria.min_core_subjects_to_pass,
        criteria.core_subjects.len()
    );
    info!("Promotion criteria updated by {}: {}", actor, details);
    if let Err(e) = storage
        .append_audit_log(AuditLogEntry::new(
            actor,
            AuditAction::UpdatePromotionCriteria,
            details,
        ))
        .await
    {
        error!("Failed to record audit log: {}", e);
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        criteria,
        "Promotion criteria updated successfully",
    )))
}
