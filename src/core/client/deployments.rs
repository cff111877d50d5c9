use anyhow::Result;
use kube::api::ListParams;
use kube::{Api, Client};
use tracing::debug;

use crate::core::client::kube_resources::Deployment;

/// Fetch deployments in a specific namespace
pub async fn fetch_deployments_by_namespace(
    client: &Client,
    namespace: &str,
) -> Result<Vec<Deployment>> {
    let deployments: Api<Deployment> = Api::namespaced(client.clone(), namespace);
    let deployment_list = deployments.list(&ListParams::default()).await?;

    debug!(
        "Discovered {} deployment(s) in namespace '{}'",
        deployment_list.items.len(),
        namespace
    );
    Ok(deployment_list.items)
}

/// Fetch a single deployment by name and namespace
pub async fn fetch_deployment_by_name_and_namespace(
    client: &Client,
    namespace: &str,
    deployment_name: &str,
) -> Result<Deployment> {
    let deployments: Api<Deployment> = Api::namespaced(client.clone(), namespace);
    let deployment = deployments.get(deployment_name).await?;

    debug!("Fetched deployment: {}/{}", namespace, deployment_name);
    Ok(deployment)
}
