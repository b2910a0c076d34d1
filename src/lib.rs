//! GeoTracker - IP geolocation lookups with per-user search history
//!
//! This library provides the HTTP service (JWT login, geolocation proxy,
//! search history) and a terminal client for it.
//!
//! # Architecture
//! - `api`: HTTP routes, middleware and wire types
//! - `services`: Authentication, geolocation and history business logic
//! - `storage`: Database backend and models
//! - `client`: HTTP client, session store and client state machine
//! - `interfaces`: Command-line handlers
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
