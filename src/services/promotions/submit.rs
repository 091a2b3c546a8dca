use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info, warn};

use super::{PromotionService, evaluate, load_ladder};
use crate::config::AppConfig;
use crate::middlewares::RequireActor;
use crate::models::{
    ApiResponse, ErrorCode,
    audit::entities::{AuditAction, AuditLogEntry},
    promotions::{
        requests::{PromotionMode, PromotionSubmission},
        responses::{PromotionPlan, PromotionResult},
    },
};
use crate::services::reports::{load_aggregator, resolve_term_label};
use crate::storage::{BatchOutcome, Storage};

pub async fn submit_promotion(
    service: &PromotionService,
    request: &HttpRequest,
    mode: PromotionMode,
    submission: PromotionSubmission,
) -> ActixResult<HttpResponse> {
    let Some(actor) = RequireActor::extract_actor(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Missing actor",
        )));
    };
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

    // 校验失败时不写入也不记审计
    let plan = match evaluate::validate(&submission.into_form(mode), &ladder) {
        Ok(plan) => plan,
        Err(rejection) => {
            warn!(
                "Rejected {} promotion by {}: {}",
                mode,
                actor,
                rejection.code()
            );
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::PromotionRejected,
                rejection.to_string(),
            )));
        }
    };
    let student_nos = plan.payload.student_nos();

    let failures = match check_items(&storage, &plan, &student_nos, service.enforces_criteria())
        .await
    {
        Ok(failures) => failures,
        Err(e) => {
            error!("Failed to check promotion roster for {}: {}", plan.from_class, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to check promotion roster: {e}"),
                )),
            );
        }
    };
    if !failures.is_empty() {
        return Ok(items_failed(mode, failures, student_nos.len()));
    }

    // 仓储在写锁内复查源班级与状态，并发提交中后到者会在这里被拒绝
    let outcome = match (&plan.mode, plan.to_class.as_deref()) {
        (PromotionMode::Graduation, _) => storage
            .graduate_students(&student_nos, &plan.from_class)
            .await,
        (_, Some(to_class)) => storage
            .promote_students(&student_nos, &plan.from_class, to_class)
            .await,
        (_, None) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::PromotionRejected,
                "Please select the class to promote to",
            )));
        }
    };

    let count = match outcome {
        Ok(BatchOutcome::Applied(count)) => count,
        Ok(BatchOutcome::Rejected(failures)) => {
            return Ok(items_failed(mode, failures, student_nos.len()));
        }
        Err(e) => {
            error!("Failed to apply {} promotion: {}", mode, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to apply promotion: {e}"),
                )),
            );
        }
    };

    let (action, details) = audit_details(&plan, count);
    info!("{} by {}", details, actor);
    if let Err(e) = storage
        .append_audit_log(AuditLogEntry::new(actor, action, details))
        .await
    {
        error!("Failed to record audit log: {}", e);
    }

    let (result, message) = match plan.mode {
        PromotionMode::Graduation => (
            PromotionResult::graduated(count),
            "Students graduated successfully",
        ),
        _ => (
            PromotionResult::promoted(count),
            "Students promoted successfully",
        ),
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(result, message)))
}

fn items_failed(mode: PromotionMode, failures: Vec<String>, selected: usize) -> HttpResponse {
    warn!(
        "{} of {} student(s) failed {} promotion checks",
        failures.len(),
        selected,
        mode
    );
    HttpResponse::UnprocessableEntity().json(ApiResponse::error_empty(
        ErrorCode::PromotionItemsFailed,
        failures,
    ))
}

/// 逐项检查：学生必须是源班级的在读学生；`enforce_criteria` 时标准升级还需达标
async fn check_items(
    storage: &std::sync::Arc<dyn Storage>,
    plan: &PromotionPlan,
    student_nos: &[String],
    enforce_criteria: bool,
) -> crate::errors::Result<Vec<String>> {
    let class_list = storage.list_students_in_class(&plan.from_class).await?;
    let roster = evaluate::promotable_roster(class_list, &plan.from_class);
    let mut failures = evaluate::check_selection(student_nos, &roster, &plan.from_class);

    if enforce_criteria && plan.mode == PromotionMode::Standard {
        let config = AppConfig::get();
        let aggregator = load_aggregator(storage).await?;
        let criteria = storage.get_promotion_criteria().await?;
        let term = resolve_term_label(storage, None).await?;

        for student_no in student_nos {
            let Some(report) = aggregator.compute_report(student_no, &term, &roster) else {
                continue;
            };
            let eligibility =
                evaluate::assess_eligibility(&report.rows, &criteria, config.grading.pass_mark);
            if !eligibility.eligible {
                failures.push(format!(
                    "Student {} does not meet the promotion criteria: {}",
                    student_no,
                    eligibility.reasons.join("; ")
                ));
            }
        }
    }

    Ok(failures)
}

fn audit_details(plan: &PromotionPlan, count: usize) -> (AuditAction, String) {
    match plan.mode {
        PromotionMode::Standard => (
            AuditAction::PromoteStudents,
            format!(
                "Promoted {} student(s) from {} to {} (standard)",
                count,
                plan.from_class,
                plan.to_class.as_deref().unwrap_or_default()
            ),
        ),
        PromotionMode::Special => (
            AuditAction::SpecialPromotion,
            format!(
                "Promoted {} student(s) from {} to {} (special): {}",
                count,
                plan.from_class,
                plan.to_class.as_deref().unwrap_or_default(),
                plan.remarks.as_deref().unwrap_or_default()
            ),
        ),
        PromotionMode::Graduation => (
            AuditAction::GraduateStudents,
            format!("Graduated {} student(s) from {}", count, plan.from_class),
        ),
    }
}
