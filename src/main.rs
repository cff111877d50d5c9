mod api;
mod app_state;
mod config;
mod core;
mod domain;
mod errors;
mod logging;
mod routes;
mod scheduler;
#[cfg(test)]
mod testing;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::watch;
use tracing::{error, info};

use crate::app_state::{build_app_state, AppState};
use crate::config::AppConfig;
use crate::core::cdn::cloudfront_provider::CloudFrontProvider;
use crate::core::client::cloudfront_client::build_cloudfront_client;
use crate::core::client::kube_client::build_kube_client;
use crate::core::platform::kube_platform::KubePlatform;
use crate::core::platform::platform_trait::OrchestrationPlatform;
use crate::core::state::runtime::coordination::coordination_state_repository::CoordinationStateRepository;
use crate::core::state::runtime::coordination::CoordinationRegistry;
use crate::core::state::store::redis_state_store::RedisStateStore;
use crate::core::state::store::state_store_trait::SharedStateStore;
use crate::core::webhook::webhook_registry::WebhookRegistry;
use crate::domain::rollout::coordinator::Coordinator;
use crate::domain::rollout::lock_manager::LockManager;
use crate::domain::rollout::tag_detector::TagChangeDetector;
use crate::domain::webhook::webhook_notifier::CompletionNotifier;
use crate::domain::webhook::webhook_sender::ReqwestWebhookSender;
use crate::routes::app_router;
use crate::scheduler::tasks::detect::task::DetectionContext;
use crate::scheduler::DetectionScheduler;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("Invalid configuration")?;
    let _log_guard = logging::init_tracing(config.debug_logging, config.log_dir.as_deref())?;

    let webhooks = WebhookRegistry::load(config.webhooks_config.as_deref())?;

    let store: Arc<dyn SharedStateStore> = Arc::new(RedisStateStore::open(&config.local_store)?);
    let peers = config
        .remote_stores
        .iter()
        .map(|address| RedisStateStore::open(address).map(|s| Arc::new(s) as Arc<dyn SharedStateStore>))
        .collect::<Result<Vec<_>, _>>()?;
    info!(
        local = %config.local_store,
        peers = peers.len(),
        namespace = %config.namespace,
        "Shared state stores configured"
    );

    let kube = build_kube_client().await.context("Failed to build Kubernetes client")?;
    let platform: Arc<dyn OrchestrationPlatform> = Arc::new(KubePlatform::new(kube));
    let cdn = Arc::new(CloudFrontProvider::new(build_cloudfront_client().await));

    let registry = Arc::new(CoordinationRegistry::new(CoordinationStateRepository::new().shared()));
    let coordinator = Coordinator::new(
        &config.namespace,
        platform.clone(),
        store.clone(),
        peers,
        cdn,
        CompletionNotifier::new(webhooks, Arc::new(ReqwestWebhookSender::default())),
        registry.clone(),
    );

    let scheduler = DetectionScheduler::new(
        DetectionContext {
            namespace: config.namespace.clone(),
            platform,
            detector: TagChangeDetector::new(store.clone()),
            locks: LockManager::new(store),
            coordinator: Arc::new(coordinator),
        },
        config.detect_interval,
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let server = match config.status_addr {
        Some(addr) => Some(tokio::spawn(serve_status(addr, build_app_state(registry), shutdown_rx.clone()))),
        None => None,
    };

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for shutdown signal");
        }
        info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    scheduler.run(shutdown_rx).await;

    if let Some(server) = server {
        server.await??;
    }
    info!("Stopped");
    Ok(())
}

async fn serve_status(addr: SocketAddr, state: AppState, mut shutdown: watch::Receiver<bool>) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind status server on {}", addr))?;
    info!(%addr, "Status server listening");

    axum::serve(listener, app_router().with_state(state))
        .with_graceful_shutdown(async move {
            let _ = shutdown.wait_for(|stopped| *stopped).await;
        })
        .await?;
    Ok(())
}
