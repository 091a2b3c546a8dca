use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::{ReportService, load_aggregator, report_roster, resolve_term_label};
use crate::models::{
    ApiResponse, ErrorCode,
    reports::{requests::ReportQuery, responses::ClassReportsResponse},
};

pub async fn get_class_reports(
    service: &ReportService,
    request: &HttpRequest,
    class_id: String,
    query: ReportQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_class(&class_id).await {
        Ok(Some(_)) => {}
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
    }

    let prepared = async {
        let aggregator = load_aggregator(&storage).await?;
        let roster = report_roster(&storage, &class_id, None).await?;
        let term = resolve_term_label(&storage, query.term).await?;
        Ok::<_, crate::errors::SchoolAdminError>((aggregator, roster, term))
    }
    .await;

    let (aggregator, roster, term) = match prepared {
        Ok(prepared) => prepared,
        Err(e) => {
            error!("Failed to prepare class reports for {}: {}", class_id, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to compute reports: {e}"),
                )),
            );
        }
    };

    let reports: Vec<_> = roster
        .iter()
        .filter_map(|s| aggregator.compute_report(&s.student_no, &term, &roster))
        .collect();
    info!(
        "Computed {} report(s) for class {} ({})",
        reports.len(),
        class_id,
        term
    );

    let response = ClassReportsResponse {
        class_id,
        term,
        reports,
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Class reports computed successfully",
    )))
}
