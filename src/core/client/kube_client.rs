use anyhow::Result;
use kube::Client;
use tracing::debug;

/// Creates a Kubernetes client from the in-cluster service account, falling
/// back to the local kubeconfig for development.
pub async fn build_kube_client() -> Result<Client> {
    let client = Client::try_default().await?;

    debug!("Kubernetes client initialized successfully");
    Ok(client)
}
