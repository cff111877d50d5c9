use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};
use validator::Validate;

/// One outbound webhook definition, looked up by workload name.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct WebhookConfig {
    /// Workload name this webhook fires for.
    #[validate(length(min = 1))]
    pub name: String,
    /// Target URL. Empty or absent disables delivery.
    #[serde(default)]
    #[validate(url)]
    pub url: Option<String>,
    /// HTTP method, e.g. `POST`. Empty or absent disables delivery.
    #[serde(default)]
    pub method: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Sent as an `application/x-www-form-urlencoded` body.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

impl WebhookConfig {
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn method(&self) -> Option<&str> {
        self.method.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }
}

/// On-disk layout of the webhook definitions file.
#[derive(Debug, Default, Deserialize)]
pub struct WebhookFile {
    #[serde(default)]
    pub webhooks: Vec<WebhookConfig>,
}
