use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::{ReportService, load_aggregator, report_roster, resolve_term_label};
use crate::models::{ApiResponse, ErrorCode, reports::requests::ReportQuery};

pub async fn get_student_report(
    service: &ReportService,
    request: &HttpRequest,
    student_no: String,
    query: ReportQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let student = match storage.get_student(&student_no).await {
        Ok(Some(student)) => student,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::StudentNotFound,
                "Student not found",
            )));
        }
        Err(e) => {
            error!("Failed to load student {}: {}", student_no, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to load student: {e}"),
                )),
            );
        }
    };

    let Some(class_id) = student.class_id().map(str::to_string) else {
        return Ok(HttpResponse::UnprocessableEntity().json(ApiResponse::error_empty(
            ErrorCode::StudentNotAssigned,
            "Student is not assigned to a class",
        )));
    };

    let prepared = async {
        let aggregator = load_aggregator(&storage).await?;
        let roster = report_roster(&storage, &class_id, Some(student_no.as_str())).await?;
        let term = resolve_term_label(&storage, query.term).await?;
        Ok::<_, crate::errors::SchoolAdminError>((aggregator, roster, term))
    }
    .await;

    let (aggregator, roster, term) = match prepared {
        Ok(prepared) => prepared,
        Err(e) => {
            error!("Failed to prepare report for {}: {}", student_no, e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to compute report: {e}"),
                )),
            );
        }
    };

    match aggregator.compute_report(&student_no, &term, &roster) {
        Some(report) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            report,
            "Report computed successfully",
        ))),
        None => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::StudentNotFound,
            "Student not found in class roster",
        ))),
    }
}
