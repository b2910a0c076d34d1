use actix_service::{Service, Transform};
use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest,
    body::EitherBody,
    dev::{Payload, ServiceRequest, ServiceResponse},
    http::{Method, StatusCode},
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, error, trace};

use crate::api::constants::{LOGIN_PATH, MSG_SERVER_ERROR};
use crate::api::jwt::SessionClaims;
use crate::api::services::helpers::error_response;
use crate::errors::GeoTrackerError;
use crate::services::AuthService;

/// 已认证的调用方，由 [`UserAuth`] 写入 request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub claims: SessionClaims,
}

impl From<SessionClaims> for AuthUser {
    fn from(claims: SessionClaims) -> Self {
        Self {
            id: claims.user_id,
            email: claims.email.clone(),
            claims,
        }
    }
}

impl FromRequest for AuthUser {
    type Error = GeoTrackerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthUser>()
                .cloned()
                .ok_or_else(GeoTrackerError::missing_token),
        )
    }
}

/// Bearer 令牌提取结果
#[derive(Debug, PartialEq, Eq)]
enum BearerToken<'a> {
    Missing,
    Malformed,
    Present(&'a str),
}

/// 解析 `Authorization: Bearer <token>`
fn parse_authorization(header: Option<&str>) -> BearerToken<'_> {
    let Some(value) = header else {
        return BearerToken::Missing;
    };

    let mut parts = value.trim().splitn(2, ' ');
    let scheme = parts.next().unwrap_or_default();
    let token = parts.next().map(str::trim).unwrap_or_default();

    if token.is_empty() {
        BearerToken::Missing
    } else if scheme.eq_ignore_ascii_case("Bearer") {
        BearerToken::Present(token)
    } else {
        BearerToken::Malformed
    }
}

/// User authentication middleware
///
/// Guards every route under `/api` except login. Requests without a token
/// get `401 No token provided`; bad, tampered or expired tokens get
/// `401 Invalid token`.
#[derive(Clone, Default)]
pub struct UserAuth;

impl<S, B> Transform<S, ServiceRequest> for UserAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = UserAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(UserAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct UserAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> UserAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    fn reject(req: ServiceRequest, err: GeoTrackerError) -> ServiceResponse<EitherBody<B>> {
        debug!("Authentication failed for {}: {}", req.path(), err.message());
        req.into_response(
            error_response(StatusCode::UNAUTHORIZED, err.message()).map_into_right_body(),
        )
    }

    fn is_public_endpoint(req: &ServiceRequest) -> bool {
        req.method() == Method::OPTIONS || req.path() == LOGIN_PATH
    }
}

impl<S, B> Service<ServiceRequest> for UserAuthMiddleware<S>
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
            if Self::is_public_endpoint(&req) {
                return Ok(srv.call(req).await?.map_into_left_body());
            }

            let Some(auth) = req.app_data::<web::Data<Arc<AuthService>>>().cloned() else {
                error!("AuthService missing from app data");
                return Ok(req.into_response(
                    error_response(StatusCode::INTERNAL_SERVER_ERROR, MSG_SERVER_ERROR)
                        .map_into_right_body(),
                ));
            };

            let outcome = {
                let header = req
                    .headers()
                    .get("Authorization")
                    .and_then(|h| h.to_str().ok());

                match parse_authorization(header) {
                    BearerToken::Missing => Err(GeoTrackerError::missing_token()),
                    BearerToken::Malformed => Err(GeoTrackerError::invalid_token()),
                    BearerToken::Present(token) => auth.verify(token),
                }
            };

            let claims = match outcome {
                Ok(claims) => claims,
                Err(err) => return Ok(Self::reject(req, err)),
            };

            trace!("Authenticated user {}", claims.user_id);
            req.extensions_mut().insert(AuthUser::from(claims));

            Ok(srv.call(req).await?.map_into_left_body())
        })
    }
}
