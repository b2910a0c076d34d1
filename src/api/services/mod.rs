pub mod auth;
pub mod geo;
pub mod health;
pub mod helpers;
pub mod history;
pub mod routes;

use std::sync::Arc;

use actix_web::web;

use crate::api::jwt::JwtService;
use crate::services::{AuthService, GeoIpProvider, HistoryService};
use crate::storage::SeaOrmStorage;

pub use health::{AppStartTime, HealthService};
pub use routes::{api_routes, health_routes};

/// 所有 handler 共享的服务实例
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<SeaOrmStorage>,
    pub jwt: Arc<JwtService>,
    pub auth: Arc<AuthService>,
    pub history: Arc<HistoryService>,
    pub geo: GeoIpProvider,
    pub started: AppStartTime,
}

impl AppState {
    pub fn new(storage: Arc<SeaOrmStorage>, jwt: Arc<JwtService>, geo: GeoIpProvider) -> Self {
        Self {
            auth: Arc::new(AuthService::new(storage.clone(), jwt.clone())),
            history: Arc::new(HistoryService::new(storage.clone())),
            storage,
            jwt,
            geo,
            started: AppStartTime {
                start_datetime: chrono::Utc::now(),
            },
        }
    }

    /// 注册 app data 与全部路由
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(helpers::json_config())
            .app_data(web::Data::new(self.storage.clone()))
            .app_data(web::Data::new(self.auth.clone()))
            .app_data(web::Data::new(self.history.clone()))
            .app_data(web::Data::new(self.geo.clone()))
            .app_data(web::Data::new(self.started.clone()))
            .service(health_routes())
            .service(api_routes().wrap(crate::api::middleware::UserAuth));
    }
}
