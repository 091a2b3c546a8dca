use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::promotions::requests::{
    PromotionForm, PromotionMode, PromotionRosterQuery, PromotionSubmission,
};
use crate::services::PromotionService;

// 懒加载的全局 PROMOTION_SERVICE 实例
static PROMOTION_SERVICE: Lazy<PromotionService> = Lazy::new(PromotionService::new_lazy);

// HTTP处理程序
pub async fn get_roster(
    req: HttpRequest,
    query: web::Query<PromotionRosterQuery>,
) -> ActixResult<HttpResponse> {
    PROMOTION_SERVICE.get_roster(&req, query.into_inner()).await
}

pub async fn plan_promotion(
    req: HttpRequest,
    form: web::Json<PromotionForm>,
) -> ActixResult<HttpResponse> {
    PROMOTION_SERVICE
        .plan_promotion(&req, form.into_inner())
        .await
}

pub async fn promote_normal(
    req: HttpRequest,
    submission: web::Json<PromotionSubmission>,
) -> ActixResult<HttpResponse> {
    PROMOTION_SERVICE
        .submit(&req, PromotionMode::Standard, submission.into_inner())
        .await
}

pub async fn promote_special(
    req: HttpRequest,
    submission: web::Json<PromotionSubmission>,
) -> ActixResult<HttpResponse> {
    PROMOTION_SERVICE
        .submit(&req, PromotionMode::Special, submission.into_inner())
        .await
}

pub async fn graduate(
    req: HttpRequest,
    submission: web::Json<PromotionSubmission>,
) -> ActixResult<HttpResponse> {
    PROMOTION_SERVICE
        .submit(&req, PromotionMode::Graduation, submission.into_inner())
        .await
}

// 配置路由
pub fn configure_promotions_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/promotions")
            .route("/roster", web::get().to(get_roster))
            .route("/plan", web::post().to(plan_promotion))
            .service(
                web::scope("")
                    .wrap(middlewares::RequireActor)
                    .route("/normal", web::post().to(promote_normal))
                    .route("/special", web::post().to(promote_special))
                    .route("/graduate", web::post().to(graduate)),
            ),
    );
}
