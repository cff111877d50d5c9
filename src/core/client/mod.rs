// Kube-rs based Kubernetes client
pub mod kube_client;
pub mod kube_resources;
pub mod pods;
pub mod deployments;
pub mod ingresses;
pub mod mappers;

// Other clients
pub mod redis_client;
pub mod cloudfront_client;
