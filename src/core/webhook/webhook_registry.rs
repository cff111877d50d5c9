use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::core::webhook::webhook_config_entity::{WebhookConfig, WebhookFile};
use crate::errors::ConfigError;

/// Immutable name → webhook mapping, built once at startup and shared by
/// every coordination task.
#[derive(Debug, Clone, Default)]
pub struct WebhookRegistry {
    webhooks: Arc<HashMap<String, WebhookConfig>>,
}

impl WebhookRegistry {
    /// Later definitions with the same name replace earlier ones.
    pub fn from_configs(configs: Vec<WebhookConfig>) -> Self {
        let mut webhooks = HashMap::with_capacity(configs.len());
        for config in configs {
            if webhooks.contains_key(&config.name) {
                warn!(name = %config.name, "Duplicate webhook definition, keeping the last one");
            }
            webhooks.insert(config.name.clone(), config);
        }

        Self {
            webhooks: Arc::new(webhooks),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let file: WebhookFile = serde_json::from_str(raw)?;
        Ok(Self::from_configs(file.webhooks))
    }

    /// Loads the definitions file; no path means no webhooks.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            info!("WEBHOOKS_CONFIG not set, completion webhooks disabled");
            return Ok(Self::default());
        };

        let file_error = |message: String| ConfigError::WebhookFile {
            path: path.display().to_string(),
            message,
        };

        let raw = fs::read_to_string(path).map_err(|e| file_error(e.to_string()))?;
        let registry = Self::from_json(&raw).map_err(|e| file_error(e.to_string()))?;

        info!("Loaded {} webhook definition(s) from {}", registry.len(), path.display());
        Ok(registry)
    }

    pub fn get(&self, name: &str) -> Option<&WebhookConfig> {
        self.webhooks.get(name)
    }

    pub fn len(&self) -> usize {
        self.webhooks.len()
    }
}
