//! 外部 GeoIP API 实现（ip-api.com 兼容）

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, trace, warn};
use ureq::Agent;

use super::provider::{GeoLookup, GeoResult};
use crate::errors::{GeoTrackerError, Result};

/// 外部 API GeoIP Provider
///
/// 每次查询发起一次 HTTP 请求；未配置超时时使用 ureq 默认行为。
pub struct ExternalApiProvider {
    api_url_template: String,
    agent: Agent,
}

impl ExternalApiProvider {
    /// 创建外部 API Provider
    ///
    /// `api_url_template` 使用 `{ip}` 作为占位符
    pub fn new(api_url_template: &str, timeout_secs: Option<u64>) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(timeout_secs.map(Duration::from_secs))
            .build()
            .into();

        Self {
            api_url_template: api_url_template.to_string(),
            agent,
        }
    }

    /// 拼接查询 URL，空地址让上游推断调用方
    pub fn build_url(&self, ip: Option<&str>) -> String {
        let ip = ip.unwrap_or("");
        self.api_url_template.replace("{ip}", &urlencoding::encode(ip))
    }

    /// 解析上游 JSON，`status == "fail"` 视为地址无效
    ///
    /// 非对象或 `status` 不是 `success` 的响应都算上游异常。
    pub fn parse_response(json: serde_json::Value) -> Result<GeoResult> {
        if !json.is_object() {
            return Err(GeoTrackerError::upstream(
                "Unexpected GeoIP API response: not a JSON object",
            ));
        }

        if json["status"].as_str() == Some("fail") {
            trace!(
                "GeoIP API rejected address: {}",
                json["message"].as_str().unwrap_or("unknown")
            );
            return Err(GeoTrackerError::invalid_address());
        }

        let result: GeoResult = serde_json::from_value(json).map_err(|e| {
            GeoTrackerError::upstream(format!("Unexpected GeoIP API response: {}", e))
        })?;

        if !result.is_success() {
            return Err(GeoTrackerError::upstream(format!(
                "Unexpected GeoIP API status: {:?}",
                result.status
            )));
        }
        Ok(result)
    }

    /// 同步请求（在 spawn_blocking 中调用）
    fn fetch_from_api_sync(agent: Agent, url: String) -> Result<GeoResult> {
        let resp = agent.get(&url).call().map_err(|e| {
            warn!("GeoIP API request to \"{}\" failed: {}", url, e);
            GeoTrackerError::upstream(format!("GeoIP API request failed: {}", e))
        })?;

        let json: serde_json::Value = resp.into_body().read_json().map_err(|e| {
            warn!("GeoIP API response from \"{}\" parse failed: {}", url, e);
            GeoTrackerError::upstream(format!("GeoIP API response parse failed: {}", e))
        })?;

        Self::parse_response(json)
    }
}

#[async_trait]
impl GeoLookup for ExternalApiProvider {
    async fn lookup(&self, ip: Option<&str>) -> Result<GeoResult> {
        let url = self.build_url(ip);
        debug!("GeoIP lookup via {}", url);

        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || Self::fetch_from_api_sync(agent, url)).await?
    }

    fn name(&self) -> &'static str {
        "ExternalAPI"
    }
}
