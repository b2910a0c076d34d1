//! 查询历史接口

use std::sync::Arc;

use actix_web::{HttpResponse, web};

use super::helpers::{api_result, error_from_geotracker, success_response};
use crate::api::constants::{MSG_HISTORY_DELETE_FAILED, MSG_HISTORY_FETCH_FAILED};
use crate::api::middleware::AuthUser;
use crate::api::types::{DeleteHistoryRequest, SuccessResponse};
use crate::services::HistoryService;

/// GET /api/history
pub async fn list_history(
    user: AuthUser,
    history: web::Data<Arc<HistoryService>>,
) -> HttpResponse {
    api_result(history.list(user.id).await, MSG_HISTORY_FETCH_FAILED)
}

/// DELETE /api/history
pub async fn delete_history(
    user: AuthUser,
    history: web::Data<Arc<HistoryService>>,
    body: web::Json<DeleteHistoryRequest>,
) -> HttpResponse {
    match history.delete(user.id, &body.ids).await {
        Ok(_) => success_response(&SuccessResponse { success: true }),
        Err(e) => error_from_geotracker(&e, MSG_HISTORY_DELETE_FAILED),
    }
}
