// SPDX-License-Identifier: GPL-3.0-only

//! HTTP surface.
//!
//! | Method | Path | Query |
//! |--------|------|-------|
//! | GET | /api/v1/pokemon/ | `limit`, `offset` or `page` |
//! | GET | /api/v1/pokemon/legendary/ | `limit`, `offset` or `page` |
//! | GET | /api/v1/pokemon/mythical/ | `limit`, `offset` or `page` |
//! | GET | /api/v1/pokemon/chain/{pokemon_id} | `branches`, `species` |
//! | GET | /api/v1/pokemon/type/{type_id} | `limit`, `offset` or `page` |
//! | GET | /api/v1/pokemon/generation/{generation} | `limit`, `offset` or `page` |
//! | GET | /api/v1/health | |
//!
//! With `species=true` every chain entry is overlaid with its species record;
//! where both carry a field (`order`), the species value is the one returned.

mod health;
mod pokemon;

use std::{net::SocketAddr, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::{api::PokeApi, config::Config, error::ProxyError, pipeline::Aggregator};

/// State shared by every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub aggregator: Arc<Aggregator>,
}

impl AppState {
    pub fn new(aggregator: Aggregator) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
        }
    }
}

/// Builds the whole application: routes, CORS, request tracing and the 404 fallback
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(pokemon::router())
        .merge(health::router())
        .fallback(route_not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Binds the configured address and serves until Ctrl-C
pub async fn serve(config: Config) -> Result<()> {
    let api = PokeApi::new(&config.base_url, config.upstream_timeout())
        .context("invalid upstream configuration")?;
    let state = AppState::new(Aggregator::new(api, config.fanout_limit));

    let address = SocketAddr::new(config.host, config.port);
    let listener = TcpListener::bind(address)
        .await
        .with_context(|| format!("could not bind {address}"))?;

    info!(
        mode = config.mode(),
        %address,
        upstream = %config.base_url,
        fanout_limit = config.fanout_limit,
        "server running"
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn route_not_found() -> ProxyError {
    ProxyError::NotFound("Route not found".to_string())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(err) => {
            warn!(error = %err, "could not listen for Ctrl-C, running until killed");
            std::future::pending::<()>().await;
        }
    }
}
