#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web server for the NYC car theft viewer.
//!
//! Serves the search, settings, and plot endpoints behind `/api`, the
//! borough-boundaries `GeoJSON` layer, and the static map frontend. The
//! Socrata client and the settings store sit behind trait objects on
//! [`AppState`] so handlers can be exercised against canned implementations.

pub mod handlers;

use std::sync::Arc;

use actix_web::web;
use theft_map_settings::SettingsStore;
use theft_map_source::SodaClient;

/// Shared application state.
pub struct AppState {
    /// Upstream Socrata client.
    pub client: Arc<dyn SodaClient>,
    /// Persisted plot settings.
    pub settings: Arc<dyn SettingsStore>,
    /// Borough boundaries `GeoJSON` document, loaded once at startup.
    pub boundaries: serde_json::Value,
}

/// Registers the `/api` routes. Shared between the binary and handler
/// tests.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/boundaries", web::get().to(handlers::boundaries))
            .route("/search", web::post().to(handlers::search))
            .route("/settings", web::post().to(handlers::update_settings))
            .route("/plot", web::get().to(handlers::plot)),
    );
}
