use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AuditService;
use crate::models::{ApiResponse, ErrorCode, audit::entities::AuditLogQuery};

const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 500;

pub async fn list_audit_logs(
    service: &AuditService,
    request: &HttpRequest,
    query: AuditLogQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    // 按动作过滤时先取全部再截断
    let fetch = if query.action.is_some() { usize::MAX } else { limit };
    match storage.list_audit_logs(fetch).await {
        Ok(logs) => {
            let logs: Vec<_> = logs
                .into_iter()
                .filter(|log| query.action.is_none_or(|action| log.action == action))
                .take(limit)
                .collect();
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                logs,
                "Audit logs retrieved successfully",
            )))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to list audit logs: {e}"),
            )),
        ),
    }
}
