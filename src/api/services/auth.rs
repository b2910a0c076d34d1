//! 登录与用户信息接口

use std::sync::Arc;

use actix_web::{HttpResponse, web};
use tracing::info;

use super::helpers::{error_from_geotracker, success_response};
use crate::api::constants::MSG_SERVER_ERROR;
use crate::api::middleware::AuthUser;
use crate::api::types::{LoginRequest, LoginResponse, UserInfoResponse, UserSummary};
use crate::services::AuthService;

/// POST /api/login
pub async fn login(
    auth: web::Data<Arc<AuthService>>,
    body: web::Json<LoginRequest>,
) -> HttpResponse {
    let LoginRequest { email, password } = body.into_inner();

    match auth.login(&email, &password).await {
        Ok(outcome) => {
            info!("Issued session token for user {}", outcome.user.id);
            success_response(&LoginResponse {
                token: outcome.token,
                user: UserSummary {
                    id: outcome.user.id,
                    email: outcome.user.email,
                },
            })
        }
        Err(e) => error_from_geotracker(&e, MSG_SERVER_ERROR),
    }
}

/// GET /api/user-info
pub async fn user_info(user: AuthUser) -> HttpResponse {
    success_response(&UserInfoResponse { user: user.claims })
}
