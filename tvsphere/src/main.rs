use std::{env, sync::Arc};

use anyhow::Result;
use axum::Router;
use log::error;
use tokio::net::TcpListener;
use tvsphere_rs::{AppState, AppStateRef, load_config, routes};

async fn build_app(app_state: &AppStateRef) -> Result<Router> {
    let root = Router::new().merge(routes::get_routes(app_state));

    Ok(root)
}

async fn app_entry() -> Result<()> {
    let config = load_config(env::var("TVSPHERE_CONFIG").unwrap_or_else(|_| "config.yml".into()))?;
    let app_state = Arc::new(AppState::new(config)?);

    // replay the last watched channel; a manual selection arriving first
    // supersedes the pending resume
    let resume_controller = app_state.controller.clone();
    tokio::spawn(async move {
        if let Err(e) = resume_controller.resume_last_channel().await {
            error!("Resume failed: {}", e);
        }
    });

    let tcp_listener = TcpListener::bind(&app_state.config.listen_addr).await?;
    axum::serve(tcp_listener, build_app(&app_state).await?).await?;

    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::init();
    if let Err(e) = app_entry().await {
        panic!("Fatal error: {}", e);
    }
}
