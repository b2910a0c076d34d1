//! Blocking HTTP client (ureq)

use serde::de::DeserializeOwned;
use ureq::Agent;

use super::ClientError;
use crate::api::types::{
    DeleteHistoryRequest, ErrorResponse, LoginRequest, LoginResponse, SuccessResponse,
    UserInfoResponse,
};
use crate::services::geoip::GeoResult;
use crate::storage::HistoryEntry;

/// Server operations used by the client state machine
pub trait GeoTrackerApi {
    fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ClientError>;

    fn user_info(&self, token: &str) -> Result<UserInfoResponse, ClientError>;

    /// `None` 表示自动检测调用方地址
    fn lookup(&self, token: &str, ip: Option<&str>) -> Result<GeoResult, ClientError>;

    fn history(&self, token: &str) -> Result<Vec<HistoryEntry>, ClientError>;

    fn delete_history(&self, token: &str, ids: &[i64]) -> Result<(), ClientError>;
}

pub struct ApiClient {
    base_url: String,
    agent: Agent,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        // 非 2xx 也要读取 {"error": ...} 响应体
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn bearer(token: &str) -> String {
        format!("Bearer {}", token)
    }

    fn transport(&self, err: ureq::Error) -> ClientError {
        ClientError::Transport(format!("{}: {}", self.base_url(), err))
    }

    fn read<T: DeserializeOwned>(
        resp: ureq::http::Response<ureq::Body>,
    ) -> Result<T, ClientError> {
        let status = resp.status().as_u16();
        let mut body = resp.into_body();

        if (200..300).contains(&status) {
            return body
                .read_json::<T>()
                .map_err(|e| ClientError::Decode(e.to_string()));
        }

        let message = body
            .read_json::<ErrorResponse>()
            .map(|e| e.error)
            .unwrap_or_else(|_| format!("HTTP {}", status));
        Err(ClientError::Http { status, message })
    }
}

impl GeoTrackerApi for ApiClient {
    fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let resp = self
            .agent
            .post(&self.url("/api/login"))
            .send_json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .map_err(|e| self.transport(e))?;
        Self::read(resp)
    }

    fn user_info(&self, token: &str) -> Result<UserInfoResponse, ClientError> {
        let resp = self
            .agent
            .get(&self.url("/api/user-info"))
            .header("Authorization", Self::bearer(token))
            .call()
            .map_err(|e| self.transport(e))?;
        Self::read(resp)
    }

    fn lookup(&self, token: &str, ip: Option<&str>) -> Result<GeoResult, ClientError> {
        let path = match ip {
            Some(ip) => format!("/api/geo/{}", urlencoding::encode(ip)),
            None => "/api/geo".to_string(),
        };

        let resp = self
            .agent
            .get(&self.url(&path))
            .header("Authorization", Self::bearer(token))
            .call()
            .map_err(|e| self.transport(e))?;
        Self::read(resp)
    }

    fn history(&self, token: &str) -> Result<Vec<HistoryEntry>, ClientError> {
        let resp = self
            .agent
            .get(&self.url("/api/history"))
            .header("Authorization", Self::bearer(token))
            .call()
            .map_err(|e| self.transport(e))?;
        Self::read(resp)
    }

    fn delete_history(&self, token: &str, ids: &[i64]) -> Result<(), ClientError> {
        let resp = self
            .agent
            .delete(&self.url("/api/history"))
            .header("Authorization", Self::bearer(token))
            .force_send_body()
            .send_json(&DeleteHistoryRequest { ids: ids.to_vec() })
            .map_err(|e| self.transport(e))?;
        Self::read::<SuccessResponse>(resp).map(|_| ())
    }
}
