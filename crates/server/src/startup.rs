use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use axum::Router;
use common::utils::logging::init_logging;
use configs::{AppConfig, PlatformConfig, PlatformMode};
use dotenvy::dotenv;
use service::entity_client::{
    http::{CyodaClientConfig, CyodaHttpClient},
    memory::InMemoryEntityService,
    EntityService,
};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Pick the Entity Access Client the config asks for.
pub fn build_entity_client(cfg: &PlatformConfig) -> anyhow::Result<Arc<dyn EntityService>> {
    match cfg.mode {
        PlatformMode::Memory => {
            info!(service = "server", event = "platform_client", mode = "memory", "using in-process entity store");
            Ok(InMemoryEntityService::with_descriptors(&models::registry::descriptors()))
        }
        PlatformMode::Http => {
            let client = CyodaHttpClient::new(CyodaClientConfig {
                base_url: cfg.base_url.clone(),
                api_token: cfg.api_token.clone(),
                request_timeout: Duration::from_secs(cfg.request_timeout_secs),
            })
            .context("failed to build entity platform client")?;
            info!(service = "server", event = "platform_client", mode = "http", base_url = %cfg.base_url, "using remote entity platform");
            Ok(Arc::new(client))
        }
    }
}

pub fn build_state(cfg: &AppConfig) -> anyhow::Result<AppState> {
    let entities = build_entity_client(&cfg.platform)?;
    Ok(AppState::new(entities, Duration::from_secs(cfg.dashboard.cache_ttl_secs)))
}

pub fn build_app(state: AppState) -> Router {
    routes::build_router(state, build_cors())
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    let addr = format!("{}:{}", cfg.server.host, cfg.server.port);
    addr.parse().with_context(|| format!("invalid bind address {addr}"))
}

/// Public entry: build the app and run the HTTP server until a shutdown signal.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    let cfg = AppConfig::load_or_env()?;
    init_logging(cfg.server.json_logs);

    let app = build_app(build_state(&cfg)?);

    let addr = bind_addr(&cfg)?;
    info!(service = "server", event = "listening", %addr, "starting http server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(common::signal::shutdown_signal())
        .await?;
    info!(service = "server", event = "drained", "http server stopped");
    Ok(())
}
