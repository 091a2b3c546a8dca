use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info, warn};

use super::SettingsService;
use crate::middlewares::RequireActor;
use crate::models::{
    ApiResponse, ErrorCode,
    audit::entities::{AuditAction, AuditLogEntry},
    grading::{requests::UpdateGradingSchemeRequest, responses::GradingSchemeResponse},
};
use crate::utils::validate::{grading_coverage_gaps, validate_grade_settings};

pub async fn get_grading_scheme(
    service: &SettingsService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_grade_settings().await {
        Ok(grade_settings) => {
            let response = GradingSchemeResponse {
                coverage_gaps: grading_coverage_gaps(&grade_settings),
                grade_settings,
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Grading scheme retrieved successfully",
            )))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to get grading scheme: {e}"),
            )),
        ),
    }
}

/// 覆盖评分方案；区间缺口不阻止保存，只在响应中提示
pub async fn update_grading_scheme(
    service: &SettingsService,
    request: &HttpRequest,
    update: UpdateGradingSchemeRequest,
) -> ActixResult<HttpResponse> {
    let Some(actor) = RequireActor::extract_actor(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Missing actor",
        )));
    };

    let grade_settings = update.grade_settings;
    if let Err(msg) = validate_grade_settings(&grade_settings) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::GradingSchemeInvalid,
            msg,
        )));
    }

    let storage = service.get_storage(request);
    if let Err(e) = storage.save_grade_settings(grade_settings.clone()).await {
        error!("Failed to save grading scheme: {}", e);
        return Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to save grading scheme: {e}"),
            )),
        );
    }

    let coverage_gaps = grading_coverage_gaps(&grade_settings);
    if !coverage_gaps.is_empty() {
        warn!(
            "Grading scheme leaves totals ungraded: {}",
            coverage_gaps.join(", ")
        );
    }

    let details = format!("{} grade band(s)", grade_settings.len());
    info!("Grading scheme updated by {}: {}", actor, details);
    if let Err(e) = storage
        .append_audit_log(AuditLogEntry::new(
            actor,
            AuditAction::UpdateGradingScheme,
            details,
        ))
        .await
    {
        error!("Failed to record audit log: {}", e);
    }

    let response = GradingSchemeResponse {
        grade_settings,
        coverage_gaps,
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Grading scheme updated successfully",
    )))
}
