//! 地理位置查询接口

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, web};
use tracing::debug;

use super::helpers::{error_from_geotracker, success_response};
use crate::api::constants::MSG_GEO_FAILED;
use crate::api::middleware::AuthUser;
use crate::services::{GeoIpProvider, HistoryService};
use crate::utils::ip::forwardable_peer_ip;

/// GET /api/geo
///
/// 自动检测调用方地址，不写入历史。
pub async fn lookup_self(
    req: HttpRequest,
    user: AuthUser,
    geo: web::Data<GeoIpProvider>,
) -> HttpResponse {
    let ip = if geo.forwards_client_ip() {
        forwardable_peer_ip(req.peer_addr().map(|addr| addr.ip()))
    } else {
        None
    };
    debug!("User {} auto-detect lookup (forwarded: {:?})", user.id, ip);

    match geo.lookup(ip.as_deref()).await {
        Ok(result) => success_response(&result),
        Err(e) => error_from_geotracker(&e, MSG_GEO_FAILED),
    }
}

/// GET /api/geo/{ip}
///
/// 成功后为当前用户写入一条历史记录。
pub async fn lookup_ip(
    user: AuthUser,
    path: web::Path<String>,
    geo: web::Data<GeoIpProvider>,
    history: web::Data<Arc<HistoryService>>,
) -> HttpResponse {
    let ip = path.into_inner();

    match geo.lookup(Some(&ip)).await {
        Ok(result) => {
            history.record(user.id, &ip, &result).await;
            success_response(&result)
        }
        Err(e) => error_from_geotracker(&e, MSG_GEO_FAILED),
    }
}
