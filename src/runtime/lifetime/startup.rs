use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::api::jwt::JwtService;
use crate::api::services::AppState;
use crate::services::GeoIpProvider;
use crate::storage::StorageFactory;

/// 准备服务器启动的上下文：存储（含迁移）、JWT、上游 GeoIP
pub async fn prepare_server_startup() -> Result<AppState> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let config = crate::config::get_config();

    let storage = StorageFactory::create()
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.backend_name());

    let jwt = Arc::new(JwtService::from_config(&config.auth));
    debug!("Session tokens expire after {} hours", jwt.token_ttl_hours());

    let geo = GeoIpProvider::new(&config.geoip);
    info!(
        "GeoIP provider: {} (forward client ip: {})",
        geo.provider_name(),
        geo.forwards_client_ip()
    );

    info!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );
    Ok(AppState::new(storage, jwt, geo))
}
