use anyhow::Result;
use kube::api::ListParams;
use kube::{Api, Client};
use tracing::debug;

use crate::core::client::kube_resources::Pod;

/// Fetch pods in a namespace filtered by label selector (e.g. "app=myservice")
pub async fn fetch_pods_by_label_in_namespace(
    client: &Client,
    namespace: &str,
    label_selector: &str,
) -> Result<Vec<Pod>> {
    let pods: Api<Pod> = Api::namespaced(client.clone(), namespace);
    let lp = ListParams::default().labels(label_selector);
    let pod_list = pods.list(&lp).await?;

    debug!(
        "Found {} pod(s) with label '{}' in namespace '{}'",
        pod_list.items.len(),
        label_selector,
        namespace
    );
    Ok(pod_list.items)
}
