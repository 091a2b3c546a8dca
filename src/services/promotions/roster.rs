use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::{PromotionService, evaluate, load_ladder};
use crate::config::AppConfig;
use crate::errors::SchoolAdminError;
use crate::models::{
    ApiResponse, ErrorCode,
    promotions::{
        requests::PromotionRosterQuery,
        responses::{PromotionRosterResponse, RosterCandidate},
    },
};
use crate::services::reports::{load_aggregator, resolve_term_label};

pub async fn get_roster(
    service: &PromotionService,
    request: &HttpRequest,
    query: PromotionRosterQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let from_class = query.from_class.trim().to_string();

    let prepared = async {
        let ladder = load_ladder(&storage).await?;
        let class_list = storage.list_students_in_class(&from_class).await?;
        let aggregator = load_aggregator(&storage).await?;
        let criteria = storage.get_promotion_criteria().await?;
        let term = resolve_term_label(&storage, query.term).await?;
        Ok::<_, SchoolAdminError>((ladder, class_list, aggregator, criteria, term))
    }
    .await;

    let (ladder, class_list, aggregator, criteria, term) = match prepared {
        Ok(prepared) => prepared,
        Err(e) => {
            error!("Failed to load promotion roster for {}: {}", from_class, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to load promotion roster: {e}"),
                )),
            );
        }
    };

    let Some(class) = ladder.get(&from_class).cloned() else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ClassNotFound,
            "Class not found",
        )));
    };

    let pass_mark = AppConfig::get().grading.pass_mark;
    // 候选人与排名池都只取在读学生
    let roster = evaluate::promotable_roster(class_list, &from_class);
    let candidates = roster
        .iter()
        .map(|student| {
            let rows = aggregator
                .compute_report(&student.student_no, &term, &roster)
                .map(|report| report.rows)
                .unwrap_or_default();
            RosterCandidate {
                eligibility: evaluate::assess_eligibility(&rows, &criteria, pass_mark),
                student: student.clone(),
            }
        })
        .collect();

    let graduation_only = ladder.offers_graduation(&from_class);
    let response = PromotionRosterResponse {
        next_class: if graduation_only {
            None
        } else {
            ladder.next_class(&from_class).cloned()
        },
        from_class: class,
        graduation_only,
        candidates,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Promotion roster retrieved successfully",
    )))
}
