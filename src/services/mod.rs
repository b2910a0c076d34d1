pub mod auth_service;
pub mod geoip;
pub mod history_service;

pub use auth_service::{AuthService, LoginOutcome, register_user};
pub use geoip::{ExternalApiProvider, GeoIpProvider, GeoLookup, GeoResult};
pub use history_service::HistoryService;
