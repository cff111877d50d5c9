use std::collections::BTreeMap;

use anyhow::Result;
use async_trait::async_trait;
use http::header::{HeaderName, HeaderValue};
use http::Method;
use reqwest::Client;

/// A fully resolved outbound webhook call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookRequest {
    pub url: String,
    pub method: Method,
    pub headers: BTreeMap<String, String>,
    /// Form-encoded into the body.
    pub form: BTreeMap<String, String>,
}

#[async_trait]
pub trait WebhookSender: Send + Sync {
    /// Sends once and returns the response status code.
    async fn send(&self, request: &WebhookRequest) -> Result<u16>;
}

pub struct ReqwestWebhookSender {
    client: Client,
}

impl Default for ReqwestWebhookSender {
    fn default() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

#[async_trait]
impl WebhookSender for ReqwestWebhookSender {
    async fn send(&self, request: &WebhookRequest) -> Result<u16> {
        let mut req = self
            .client
            .request(request.method.clone(), &request.url)
            .form(&request.form)
            .build()?;

        // configured headers replace defaults such as the form content type
        for (name, value) in &request.headers {
            req.headers_mut().insert(
                HeaderName::from_bytes(name.as_bytes())?,
                HeaderValue::from_str(value)?,
            );
        }

        let resp = self.client.execute(req).await?;
        Ok(resp.status().as_u16())
    }
}
