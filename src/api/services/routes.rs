use actix_web::web;

use super::auth::{login, user_info};
use super::geo::{lookup_ip, lookup_self};
use super::health::HealthService;
use super::history::{delete_history, list_history};
use crate::api::constants::API_PREFIX;

/// `/api` 路由（认证中间件由调用方包裹）
pub fn api_routes() -> actix_web::Scope {
    web::scope(API_PREFIX)
        .route("/login", web::post().to(login))
        .route("/user-info", web::get().to(user_info))
        .route("/geo", web::get().to(lookup_self))
        .route("/geo/", web::get().to(lookup_self))
        .route("/geo/{ip}", web::get().to(lookup_ip))
        .route("/history", web::get().to(list_history))
        .route("/history", web::delete().to(delete_history))
}

/// 健康检查路由，无需认证
pub fn health_routes() -> actix_web::Scope {
    web::scope("/health")
        .route("", web::get().to(HealthService::health_check))
        .route("", web::head().to(HealthService::health_check))
        .route("/live", web::get().to(HealthService::liveness_check))
        .route("/live", web::head().to(HealthService::liveness_check))
}
