//! Geolocation gateway
//!
//! Wraps the third-party IP geolocation service behind the [`GeoLookup`]
//! trait. Each call makes exactly one upstream request: no retry, no cache.

mod external_api;
mod provider;

pub use external_api::ExternalApiProvider;
pub use provider::{GeoIpProvider, GeoLookup, GeoResult};
