//! Piscine Coach · Progression Backend
//!
//! - Axum HTTP API for spaced-repetition reviews, exercise unlocking,
//!   recommendations and progress tracking
//! - Static SPA fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT              : u16 (default 3000)
//!   COACH_CONFIG_PATH : path to TOML config (program settings + optional
//!                       concept/exercise banks)
//!   LOG_LEVEL         : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT        : "pretty" (default) or "json"

mod telemetry;
mod error;
mod domain;
mod config;
mod catalog;
mod store;
mod spaced_repetition;
mod unlock;
mod recommend;
mod state;
mod protocol;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::routes::build_router;
use crate::state::AppState;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init_tracing();

    // Build shared application state (catalogs, config, completion store).
    let state = Arc::new(AppState::new());

    // Build the HTTP router with routes, CORS and tracing layers.
    let app = build_router(state.clone());

    // Read port from env or default to 3000.
    let addr: SocketAddr = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
        .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

    let listener = TcpListener::bind(addr).await?;
    info!(target: "coach_backend", %addr, "HTTP server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
