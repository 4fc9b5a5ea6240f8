use axum::extract::State;
use std::sync::Arc;

pub mod api;
pub mod app_env;
pub mod auth;
pub mod client;
pub mod domain;
pub mod dto;
pub mod external_connections;
pub mod logging;
pub mod persistence;
pub mod routes;
pub mod routing_utils;

/// Application state shared across all request handlers
pub struct SharedData {
    pub ext_cxn: persistence::ExternalConnectivity,
    pub session_keys: auth::SessionKeys,
}

/// Extractor alias for the application state attached to the router
pub type AppState = State<Arc<SharedData>>;
