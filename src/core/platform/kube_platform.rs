use async_trait::async_trait;
use kube::Client;

use crate::core::client::deployments::{fetch_deployment_by_name_and_namespace, fetch_deployments_by_namespace};
use crate::core::client::ingresses::fetch_ingress_by_name_and_namespace;
use crate::core::client::mappers::{map_deployment_to_workload, map_ingress_to_host, map_pod_to_replica};
use crate::core::client::pods::fetch_pods_by_label_in_namespace;
use crate::core::platform::platform_trait::OrchestrationPlatform;
use crate::domain::rollout::model::{ReplicaStatus, Workload};
use crate::errors::PlatformError;

/// Kubernetes implementation: deployments are workloads, pods are replicas,
/// and the ingress named after the deployment carries the public host.
#[derive(Clone)]
pub struct KubePlatform {
    client: Client,
}

impl KubePlatform {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn k8s_error(err: anyhow::Error) -> PlatformError {
    PlatformError::K8sApi(format!("{:#}", err))
}

#[async_trait]
impl OrchestrationPlatform for KubePlatform {
    async fn list_workloads(&self, namespace: &str) -> Result<Vec<Result<Workload, PlatformError>>, PlatformError> {
        let deployments = fetch_deployments_by_namespace(&self.client, namespace)
            .await
            .map_err(k8s_error)?;

        Ok(deployments.iter().map(map_deployment_to_workload).collect())
    }

    async fn get_workload(&self, namespace: &str, name: &str) -> Result<Workload, PlatformError> {
        let deployment = fetch_deployment_by_name_and_namespace(&self.client, namespace, name)
            .await
            .map_err(k8s_error)?;

        map_deployment_to_workload(&deployment)
    }

    async fn list_replicas(&self, namespace: &str, selector: &str) -> Result<Vec<ReplicaStatus>, PlatformError> {
        let pods = fetch_pods_by_label_in_namespace(&self.client, namespace, selector)
            .await
            .map_err(k8s_error)?;

        Ok(pods.iter().map(map_pod_to_replica).collect())
    }

    async fn get_public_host(&self, namespace: &str, name: &str) -> Result<Option<String>, PlatformError> {
        let ingress = fetch_ingress_by_name_and_namespace(&self.client, namespace, name)
            .await
            .map_err(k8s_error)?;

        Ok(ingress.as_ref().and_then(map_ingress_to_host))
    }
}
