use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::services::ClassService;
use crate::utils::SafeClassId;

// 懒加载的全局 CLASS_SERVICE 实例
static CLASS_SERVICE: Lazy<ClassService> = Lazy::new(ClassService::new_lazy);

pub async fn list_classes(req: HttpRequest) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.list_classes(&req).await
}

pub async fn get_class_roster(req: HttpRequest, class_id: SafeClassId) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.get_class_roster(&req, class_id.0).await
}

// 配置路由
pub fn configure_classes_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/classes")
            .route("", web::get().to(list_classes))
            .route("/{class_id}/students", web::get().to(get_class_roster)),
    );
}
