pub mod platform_trait;
pub mod kube_platform;
