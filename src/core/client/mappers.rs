/// Maps kube-rs / k8s-openapi types → internal domain models
use crate::core::client::kube_resources::{Deployment, Ingress, Pod};
use crate::domain::rollout::model::{parse_image_tag, ReplicaStatus, Workload};
use crate::errors::PlatformError;

/// Rancher's workload label, used when a deployment carries no matchLabels.
pub const FALLBACK_SELECTOR_LABEL: &str = "workload.user.cattle.io/workloadselector";

/// Converts a Deployment into a Workload using its first container's image tag.
pub fn map_deployment_to_workload(deployment: &Deployment) -> Result<Workload, PlatformError> {
    let name = deployment.metadata.name.clone().unwrap_or_default();
    let namespace = deployment.metadata.namespace.clone().unwrap_or_default();
    let spec = deployment.spec.as_ref();

    let image = spec
        .and_then(|s| s.template.spec.as_ref())
        .and_then(|pod_spec| pod_spec.containers.first())
        .and_then(|c| c.image.clone())
        .ok_or_else(|| PlatformError::InvalidImage(format!("{}/{} has no container image", namespace, name)))?;

    let current_tag = parse_image_tag(&image)
        .ok_or_else(|| PlatformError::InvalidImage(format!("{} ({}/{})", image, namespace, name)))?;

    // matchLabels in BTreeMap order, so the selector string is stable
    let selector = spec
        .and_then(|s| s.selector.match_labels.as_ref())
        .filter(|labels| !labels.is_empty())
        .map(|labels| {
            labels
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join(",")
        })
        .unwrap_or_else(|| format!("{}=deployment-{}-{}", FALLBACK_SELECTOR_LABEL, namespace, name));

    Ok(Workload {
        namespace,
        name,
        current_tag,
        selector,
    })
}

/// Converts a Pod into its readiness view.
pub fn map_pod_to_replica(pod: &Pod) -> ReplicaStatus {
    let ready = pod
        .status
        .as_ref()
        .and_then(|s| s.conditions.as_ref())
        .map(|conditions| {
            conditions
                .iter()
                .any(|c| c.type_ == "Ready" && c.status == "True")
        })
        .unwrap_or(false);

    let tag = pod
        .spec
        .as_ref()
        .and_then(|s| s.containers.first())
        .and_then(|c| c.image.as_deref())
        .and_then(parse_image_tag);

    ReplicaStatus {
        name: pod.metadata.name.clone().unwrap_or_default(),
        ready,
        tag,
    }
}

/// First rule host of an ingress.
pub fn map_ingress_to_host(ingress: &Ingress) -> Option<String> {
    ingress
        .spec
        .as_ref()
        .and_then(|s| s.rules.as_ref())
        .and_then(|rules| rules.first())
        .and_then(|rule| rule.host.clone())
        .filter(|host| !host.is_empty())
}
