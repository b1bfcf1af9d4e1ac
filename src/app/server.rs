use crate::adapters::{FileContactRepository, InMemoryContactRepository, ViaCepClient};
use crate::app::api;
use crate::config::{ConfigProvider, StorageBackend};
use crate::core::ContactService;
use crate::domain::ContactRepository;
use crate::utils::error::Result;
use std::sync::Arc;
use tokio::net::TcpListener;

/// 依設定組裝儲存與地址查詢
pub async fn build_service<C: ConfigProvider>(config: &C) -> Result<ContactService> {
    let repository: Arc<dyn ContactRepository> = match config.storage_backend()? {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory contact storage");
            Arc::new(InMemoryContactRepository::new())
        }
        StorageBackend::File(path) => {
            tracing::info!("Using file contact storage at {}", path.display());
            Arc::new(FileContactRepository::open_path(path).await?)
        }
    };

    let lookup = ViaCepClient::new(config.lookup_base_url(), config.lookup_timeout())?;
    tracing::info!("Address lookup via {}", config.lookup_base_url());

    Ok(ContactService::new(repository, Arc::new(lookup)))
}

pub async fn serve<C: ConfigProvider>(config: &C) -> Result<()> {
    let service = build_service(config).await?;
    let app = api::router(service, config.base_path());

    let listener = TcpListener::bind(config.bind_address()).await?;
    tracing::info!(
        "Listening on {} (routes under {})",
        listener.local_addr()?,
        config.base_path()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
