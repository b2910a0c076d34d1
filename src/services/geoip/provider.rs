//! GeoIP Provider 抽象层

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::external_api::ExternalApiProvider;
use crate::config::GeoIpConfig;
use crate::errors::Result;

/// 上游返回的地理位置结果
///
/// JSON 形状与 ip-api.com 一致，`/api/geo` 原样返回给客户端。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoResult {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub region_name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default, rename = "lat")]
    pub latitude: Option<f64>,
    #[serde(default, rename = "lon")]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub isp: Option<String>,
    #[serde(default)]
    pub org: Option<String>,
    /// Autonomous system, e.g. "AS15169 Google LLC"
    #[serde(default, rename = "as")]
    pub as_number: Option<String>,
    /// 上游实际解析的地址（自动检测时即调用方地址）
    #[serde(default, rename = "query")]
    pub queried_ip: Option<String>,
}

impl GeoResult {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

/// GeoIP 查询 trait
#[async_trait]
pub trait GeoLookup: Send + Sync {
    /// 查询地址的地理位置，`None` 表示让上游推断调用方地址
    ///
    /// 上游判定地址无效时返回 `InvalidAddress`，网络或解析失败返回 `Upstream`。
    async fn lookup(&self, ip: Option<&str>) -> Result<GeoResult>;

    /// 获取 provider 名称（用于日志）
    fn name(&self) -> &'static str;
}

/// 统一 GeoIP Provider
#[derive(Clone)]
pub struct GeoIpProvider {
    inner: Arc<dyn GeoLookup>,
    forward_client_ip: bool,
}

impl GeoIpProvider {
    pub fn new(config: &GeoIpConfig) -> Self {
        let provider = ExternalApiProvider::new(&config.api_url, config.timeout_secs);
        info!("GeoIP: Initialized with {} provider", provider.name());
        Self::with_lookup(Arc::new(provider)).forward_client_ip(config.forward_client_ip)
    }

    /// 使用自定义实现（测试中注入假的上游）
    pub fn with_lookup(inner: Arc<dyn GeoLookup>) -> Self {
        Self {
            inner,
            forward_client_ip: false,
        }
    }

    /// 自动检测时是否把公网对端地址转发给上游
    pub fn forward_client_ip(mut self, enabled: bool) -> Self {
        self.forward_client_ip = enabled;
        self
    }

    pub fn forwards_client_ip(&self) -> bool {
        self.forward_client_ip
    }

    pub async fn lookup(&self, ip: Option<&str>) -> Result<GeoResult> {
        self.inner.lookup(ip).await
    }

    pub fn provider_name(&self) -> &'static str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_ip_api_payload() {
        let payload = json!({
            "status": "success",
            "country": "United States",
            "countryCode": "US",
            "region": "VA",
            "regionName": "Virginia",
            "city": "Ashburn",
            "zip": "20149",
            "lat": 39.03,
            "lon": -77.5,
            "timezone": "America/New_York",
            "isp": "Google LLC",
            "org": "Google Public DNS",
            "as": "AS15169 Google LLC",
            "query": "8.8.8.8"
        });

        let result: GeoResult = serde_json::from_value(payload).unwrap();
        assert!(result.is_success());
        assert_eq!(result.country_code.as_deref(), Some("US"));
        assert_eq!(result.region_name.as_deref(), Some("Virginia"));
        assert_eq!(result.as_number.as_deref(), Some("AS15169 Google LLC"));
        assert_eq!(result.queried_ip.as_deref(), Some("8.8.8.8"));
        assert_eq!(result.coordinates(), Some((39.03, -77.5)));
    }

    #[test]
    fn test_serialize_keeps_upstream_field_names() {
        let result = GeoResult {
            status: "success".into(),
            country_code: Some("DE".into()),
            latitude: Some(52.5),
            longitude: Some(13.4),
            as_number: Some("AS3320".into()),
            queried_ip: Some("1.2.3.4".into()),
            ..Default::default()
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["countryCode"], "DE");
        assert_eq!(value["lat"], 52.5);
        assert_eq!(value["lon"], 13.4);
        assert_eq!(value["as"], "AS3320");
        assert_eq!(value["query"], "1.2.3.4");
        assert!(value.get("message").is_none());
    }

    #[test]
    fn test_partial_payload() {
        let result: GeoResult =
            serde_json::from_value(json!({"status": "success", "query": "1.1.1.1"})).unwrap();
        assert!(result.city.is_none());
        assert!(result.coordinates().is_none());
    }
}
