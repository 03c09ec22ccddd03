// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::env;
use std::sync::Arc;

use anyhow::Result;

use tryon_node::api::{start_server, AppState};
use tryon_node::automation::BrowserDriver;
use tryon_node::config::AppConfig;
use tryon_node::orchestrator::{AutomationStrategy, Orchestrator, RemoteStrategy};
use tryon_node::remote::TryOnClient;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    tracing::info!("Starting {}", tryon_node::version::get_version_string());

    let config = AppConfig::from_env();
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {}", e))?;

    if config.api_key.is_empty() {
        tracing::warn!("TRYON_API_KEY is empty; remote API calls will be rejected upstream");
    }

    let client = TryOnClient::new(&config.api_url, &config.api_key)
        .map_err(|e| anyhow::anyhow!("remote client: {}", e))?;
    if client.health_check().await {
        tracing::info!("Remote try-on endpoint reachable");
    } else {
        tracing::warn!("Remote try-on endpoint not reachable at startup");
    }
    let remote: Arc<dyn RemoteStrategy> = Arc::new(client);

    // A disabled fallback is a deliberate deployment choice, but never a
    // silent one
    let automation: Option<Arc<dyn AutomationStrategy>> = if config.automation.enabled {
        tracing::info!(
            "Browser automation fallback enabled against {}",
            config.automation.page_url
        );
        Some(Arc::new(BrowserDriver::new(config.automation.clone())))
    } else {
        tracing::info!("Browser automation fallback disabled (AUTOMATION_ENABLED != true)");
        None
    };

    let orchestrator = Arc::new(Orchestrator::new(
        remote,
        automation,
        config.scratch_dir.clone(),
        config.quota_policy,
    ));

    start_server(config.port, AppState { orchestrator })
        .await
        .map_err(|e| anyhow::anyhow!("server error: {}", e))?;

    Ok(())
}
