#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web server binary for the NYC car theft viewer.
//!
//! Loads the borough boundaries layer and the persisted plot settings at
//! startup, then serves the REST API and the static map frontend.

use std::path::PathBuf;
use std::sync::Arc;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use theft_map_server::{AppState, configure_api};
use theft_map_settings::FileSettings;
use theft_map_source::HttpSodaClient;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let boundaries_path = PathBuf::from(
        std::env::var("BOUNDARIES_PATH")
            .unwrap_or_else(|_| "data/borough_boundaries.geojson".to_string()),
    );
    log::info!("Loading borough boundaries from {}", boundaries_path.display());
    let boundaries = theft_map_geography::load_boundaries(&boundaries_path)
        .expect("Failed to load borough boundaries");

    let settings_path =
        std::env::var("SETTINGS_PATH").unwrap_or_else(|_| "data/settings.toml".to_string());
    log::info!("Loading plot settings from {settings_path}");
    let settings = FileSettings::load(settings_path).expect("Failed to load plot settings");

    let state = web::Data::new(AppState {
        client: Arc::new(HttpSodaClient::new()),
        settings: Arc::new(settings),
        boundaries,
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure_api)
            // Serve frontend static files (production)
            .service(Files::new("/", "app/dist").index_file("index.html"))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
