/// Kubernetes resource types read by the platform adapter.

pub use k8s_openapi::api::core::v1::Pod;

pub use k8s_openapi::api::apps::v1::Deployment;

pub use k8s_openapi::api::networking::v1::Ingress;
