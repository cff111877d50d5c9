use std::sync::Arc;

use http::Method;
use serde::Serialize;
use tracing::{error, info, warn};
use validator::Validate;

use crate::core::webhook::webhook_config_entity::WebhookConfig;
use crate::core::webhook::webhook_registry::WebhookRegistry;
use crate::domain::webhook::webhook_sender::{WebhookRequest, WebhookSender};

/// How a completion notification ended. Never fails the task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum NotifyOutcome {
    NotConfigured,
    Invalid { reason: String },
    Delivered { status: u16 },
    Rejected { status: u16 },
    TransportFailed { reason: String },
}

/// Fires the workload's completion webhook, at most once per call.
#[derive(Clone)]
pub struct CompletionNotifier {
    registry: WebhookRegistry,
    sender: Arc<dyn WebhookSender>,
}

impl CompletionNotifier {
    pub fn new(registry: WebhookRegistry, sender: Arc<dyn WebhookSender>) -> Self {
        Self { registry, sender }
    }

    pub async fn notify(&self, workload: &str) -> NotifyOutcome {
        let Some(config) = self.registry.get(workload) else {
            info!(workload = %workload, "No completion webhook configured");
            return NotifyOutcome::NotConfigured;
        };

        let request = match build_request(config) {
            Ok(request) => request,
            Err(reason) => {
                error!(workload = %workload, reason = %reason, "Invalid completion webhook");
                return NotifyOutcome::Invalid { reason };
            }
        };

        match self.sender.send(&request).await {
            Ok(status) if (200..300).contains(&status) => {
                info!(workload = %workload, status, "Completion webhook delivered");
                NotifyOutcome::Delivered { status }
            }
            Ok(status) => {
                warn!(workload = %workload, status, "Completion webhook rejected");
                NotifyOutcome::Rejected { status }
            }
            Err(e) => {
                error!(workload = %workload, error = %e, "Completion webhook failed");
                NotifyOutcome::TransportFailed { reason: e.to_string() }
            }
        }
    }
}

fn build_request(config: &WebhookConfig) -> Result<WebhookRequest, String> {
    let url = config.url().ok_or("missing url")?;
    let method = config.method().ok_or("missing method")?;

    config.validate().map_err(|e| e.to_string())?;

    let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
        .map_err(|_| format!("unsupported method {}", method))?;

    Ok(WebhookRequest {
        url: url.to_string(),
        method,
        headers: config.headers.clone(),
        form: config.parameters.clone(),
    })
}
