use anyhow::Result;
use kube::{Api, Client};
use tracing::debug;

use crate::core::client::kube_resources::Ingress;

/// Fetch a single ingress by name and namespace, `None` when it does not exist
pub async fn fetch_ingress_by_name_and_namespace(
    client: &Client,
    namespace: &str,
    name: &str,
) -> Result<Option<Ingress>> {
    let ingresses: Api<Ingress> = Api::namespaced(client.clone(), namespace);
    let ingress = ingresses.get_opt(name).await?;

    debug!("Fetched ingress: {}/{} (found: {})", namespace, name, ingress.is_some());
    Ok(ingress)
}
