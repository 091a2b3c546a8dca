/*!
 * 操作人中间件
 *
 * 从 `X-Actor` 请求头读取操作人并写入请求扩展，供审计日志使用。
 * 缺少该请求头时返回 401。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::web;
 * use crate::middlewares::RequireActor;
 *
 * web::scope("/api/promotions")
 *     .wrap(RequireActor)
 *     .route("/normal", web::post().to(promote_normal));
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{debug, info};

use super::create_error_response;
use crate::models::ErrorCode;

pub const ACTOR_HEADER: &str = "X-Actor";
const MAX_ACTOR_LEN: usize = 64;

/// 当前请求的操作人
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor(pub String);

#[derive(Clone)]
pub struct RequireActor;

impl RequireActor {
    /// 从请求扩展中提取操作人
    /// 此函数应该在应用了RequireActor中间件的路由处理程序中使用
    pub fn extract_actor(req: &actix_web::HttpRequest) -> Option<String> {
        req.extensions().get::<Actor>().map(|actor| actor.0.clone())
    }
}

fn read_actor(req: &ServiceRequest) -> Result<Actor, &'static str> {
    let value = req
        .headers()
        .get(ACTOR_HEADER)
        .ok_or("Missing X-Actor header")?
        .to_str()
        .map_err(|_| "X-Actor header must be valid ASCII")?
        .trim();

    if value.is_empty() {
        return Err("X-Actor header must not be empty");
    }
    if value.len() > MAX_ACTOR_LEN {
        return Err("X-Actor header is too long");
    }
    Ok(Actor(value.to_string()))
}

impl<S, B> Transform<S, ServiceRequest> for RequireActor
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireActorMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireActorMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireActorMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireActorMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();

        Box::pin(async move {
            // 处理 OPTIONS 请求
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match read_actor(&req) {
                Ok(actor) => {
                    debug!("Request to {} by {}", req.path(), actor.0);
                    req.extensions_mut().insert(actor);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    info!("Actor check failed for request to {}: {}", req.path(), err);
                    Ok(req.into_response(
                        create_error_response(StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized, err)
                            .map_into_right_body(),
                    ))
                }
            }
        })
    }
}
