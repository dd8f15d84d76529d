// File: services/meetslot_backend/src/main.rs
use meetslot_backend::{app, build_state};
use meetslot_config::load_config;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    meetslot_common::logging::init();

    let config = Arc::new(load_config()?);
    let state = build_state(config.clone()).await?;
    let app = app(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
