use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::StudentService;
use crate::middlewares::RequireActor;
use crate::models::{
    ApiResponse, ErrorCode,
    audit::entities::{AuditAction, AuditLogEntry},
    students::requests::RecordScoresRequest,
};
use crate::utils::validate::validate_scores;

pub async fn record_scores(
    service: &StudentService,
    request: &HttpRequest,
    student_no: String,
    body: RecordScoresRequest,
) -> ActixResult<HttpResponse> {
    let Some(actor) = RequireActor::extract_actor(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Missing actor",
        )));
    };

    if let Err(msg) = validate_scores(&body.scores) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ScoreInvalid,
            msg,
        )));
    }

    let storage = service.get_storage(request);
    let count = body.scores.len();

    let student = match storage.record_scores(&student_no, body.scores).await {
        Ok(Some(student)) => student,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::StudentNotFound,
                "Student not found",
            )));
        }
        Err(e) => {
            error!("Failed to record scores for {}: {}", student_no, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to record scores: {e}"),
                )),
            );
        }
    };

    let details = format!("Recorded {count} score(s) for student {student_no}");
    info!("{} by {}", details, actor);
    if let Err(e) = storage
        .append_audit_log(AuditLogEntry::new(actor, AuditAction::RecordScores, details))
        .await
    {
        error!("Failed to record audit log: {}", e);
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        student,
        "Scores recorded successfully",
    )))
}
