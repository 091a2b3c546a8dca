use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::grading::requests::{UpdateGradingSchemeRequest, UpdatePromotionCriteriaRequest};
use crate::services::SettingsService;

// 懒加载的全局 SETTINGS_SERVICE 实例
static SETTINGS_SERVICE: Lazy<SettingsService> = Lazy::new(SettingsService::new_lazy);

pub async fn get_promotion_criteria(req: HttpRequest) -> ActixResult<HttpResponse> {
    SETTINGS_SERVICE.get_promotion_criteria(&req).await
}

pub async fn update_promotion_criteria(
    req: HttpRequest,
    update: web::Json<UpdatePromotionCriteriaRequest>,
) -> ActixResult<HttpResponse> {
    SETTINGS_SERVICE
        .update_promotion_criteria(&req, update.into_inner())
        .await
}

pub async fn get_grading_scheme(req: HttpRequest) -> ActixResult<HttpResponse> {
    SETTINGS_SERVICE.get_grading_scheme(&req).await
}

pub async fn update_grading_scheme(
    req: HttpRequest,
    update: web::Json<UpdateGradingSchemeRequest>,
) -> ActixResult<HttpResponse> {
    SETTINGS_SERVICE
        .update_grading_scheme(&req, update.into_inner())
        .await
}

// 配置路由
pub fn configure_settings_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/settings")
            .wrap(middlewares::RequireActor)
            .route(
                "/promotion-criteria",
                web::get().to(get_promotion_criteria),
            )
            .route(
                "/promotion-criteria",
                web::put().to(update_promotion_criteria),
            )
            .route("/grading", web::get().to(get_grading_scheme))
            .route("/grading", web::put().to(update_grading_scheme)),
    );
}
