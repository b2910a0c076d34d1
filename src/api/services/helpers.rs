//! Response helpers shared by all handlers

use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError, web};
use serde::Serialize;
use tracing::{debug, error};

use crate::api::constants::MSG_SERVER_ERROR;
use crate::api::types::ErrorResponse;
use crate::errors::GeoTrackerError;

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(status: StatusCode, data: &T) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(data)
}

/// 构建成功响应
pub fn success_response<T: Serialize>(data: &T) -> HttpResponse {
    json_response(StatusCode::OK, data)
}

/// 构建 `{"error": ...}` 错误响应
pub fn error_response(status: StatusCode, message: &str) -> HttpResponse {
    json_response(
        status,
        &ErrorResponse {
            error: message.to_string(),
        },
    )
}

fn status_of(err: &GeoTrackerError) -> StatusCode {
    StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// 从 GeoTrackerError 构建错误响应
///
/// 内部错误记录详情后只返回路由给定的通用消息。
pub fn error_from_geotracker(err: &GeoTrackerError, fallback: &str) -> HttpResponse {
    if err.is_internal() {
        error!("{} ({})", fallback, err.format_simple());
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, fallback);
    }

    debug!("Request rejected: {}", err);
    error_response(status_of(err), err.message())
}

/// 统一 Result → HttpResponse 转换
pub fn api_result<T: Serialize>(
    result: Result<T, GeoTrackerError>,
    fallback: &str,
) -> HttpResponse {
    match result {
        Ok(data) => success_response(&data),
        Err(e) => error_from_geotracker(&e, fallback),
    }
}

/// 请求体 JSON 解析失败时返回 400 `Invalid request`
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        debug!("Rejected malformed JSON body: {}", err);
        InternalError::from_response(
            err,
            error_response(
                StatusCode::BAD_REQUEST,
                GeoTrackerError::invalid_request().message(),
            ),
        )
        .into()
    })
}

/// 提取器等无法直接返回 HttpResponse 的位置使用
impl ResponseError for GeoTrackerError {
    fn status_code(&self) -> StatusCode {
        status_of(self)
    }

    fn error_response(&self) -> HttpResponse {
        error_from_geotracker(self, MSG_SERVER_ERROR)
    }
}
