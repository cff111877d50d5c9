//! In-process doubles for the platform, CDN and webhook seams.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::core::cdn::cdn_provider_trait::{
    CdnProvider, DistributionPage, DistributionSummary, InvalidationStatus, InvalidationTicket,
};
use crate::core::platform::platform_trait::OrchestrationPlatform;
use crate::domain::rollout::model::{ReplicaStatus, Workload};
use crate::domain::webhook::webhook_sender::{WebhookRequest, WebhookSender};
use crate::errors::{CdnError, PlatformError};

pub const NAMESPACE: &str = "web";

pub fn selector_for(name: &str) -> String {
    format!("app={}", name)
}

#[derive(Default)]
pub struct FakePlatform {
    workloads: Mutex<HashMap<String, Workload>>,
    broken: Mutex<Vec<String>>,
    replicas: Mutex<HashMap<String, Vec<ReplicaStatus>>>,
    hosts: Mutex<HashMap<String, String>>,
    listing_fails: Mutex<bool>,
}

impl FakePlatform {
    pub fn add_workload(&self, name: &str, tag: &str) {
        self.workloads.lock().unwrap().insert(
            name.to_string(),
            Workload {
                namespace: NAMESPACE.to_string(),
                name: name.to_string(),
                current_tag: tag.to_string(),
                selector: selector_for(name),
            },
        );
    }

    /// A workload whose image carries no tag.
    pub fn add_broken_workload(&self, name: &str) {
        self.broken.lock().unwrap().push(name.to_string());
    }

    pub fn set_tag(&self, name: &str, tag: &str) {
        if let Some(w) = self.workloads.lock().unwrap().get_mut(name) {
            w.current_tag = tag.to_string();
        }
    }

    /// Replaces the replicas of `name` with `(ready, tag)` pairs.
    pub fn set_replicas(&self, name: &str, replicas: &[(bool, &str)]) {
        let statuses = replicas
            .iter()
            .enumerate()
            .map(|(i, (ready, tag))| ReplicaStatus {
                name: format!("{}-{}", name, i),
                ready: *ready,
                tag: Some(tag.to_string()),
            })
            .collect();
        self.replicas.lock().unwrap().insert(selector_for(name), statuses);
    }

    pub fn set_host(&self, name: &str, host: &str) {
        self.hosts.lock().unwrap().insert(name.to_string(), host.to_string());
    }

    pub fn set_listing_fails(&self, fails: bool) {
        *self.listing_fails.lock().unwrap() = fails;
    }
}

#[async_trait]
impl OrchestrationPlatform for FakePlatform {
    async fn list_workloads(&self, _namespace: &str) -> Result<Vec<Result<Workload, PlatformError>>, PlatformError> {
        if *self.listing_fails.lock().unwrap() {
            return Err(PlatformError::K8sApi("connection refused".into()));
        }
        let mut workloads: Vec<Workload> = self.workloads.lock().unwrap().values().cloned().collect();
        workloads.sort_by(|a, b| a.name.cmp(&b.name));

        let mut listed: Vec<Result<Workload, PlatformError>> = workloads.into_iter().map(Ok).collect();
        for name in self.broken.lock().unwrap().iter() {
            listed.push(Err(PlatformError::InvalidImage(format!("repo/{}", name))));
        }
        Ok(listed)
    }

    async fn get_workload(&self, _namespace: &str, name: &str) -> Result<Workload, PlatformError> {
        self.workloads
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| PlatformError::K8sApi(format!("deployments \"{}\" not found", name)))
    }

    async fn list_replicas(&self, _namespace: &str, selector: &str) -> Result<Vec<ReplicaStatus>, PlatformError> {
        Ok(self.replicas.lock().unwrap().get(selector).cloned().unwrap_or_default())
    }

    async fn get_public_host(&self, _namespace: &str, name: &str) -> Result<Option<String>, PlatformError> {
        Ok(self.hosts.lock().unwrap().get(name).cloned())
    }
}

#[derive(Debug, Clone)]
pub struct SubmittedInvalidation {
    pub distribution_id: String,
    pub invalidation_id: String,
    pub caller_reference: String,
    pub paths: Vec<String>,
    pub submitted_at: Instant,
}

/// Distributions are served in insertion order; invalidations complete
/// `completes_after` after submission, or never when unset.
#[derive(Default)]
pub struct FakeCdn {
    distributions: Mutex<Vec<DistributionSummary>>,
    completes_after: Mutex<Option<Duration>>,
    create_error: Mutex<Option<(String, String)>>,
    submitted: Mutex<Vec<SubmittedInvalidation>>,
    list_calls: AtomicU32,
    status_calls: AtomicU32,
}

impl FakeCdn {
    /// `count` filler distributions, with `host` aliased on the one at `host_at`.
    pub fn with_distributions(count: usize, host_at: Option<(usize, &str)>) -> Self {
        let cdn = Self::default();
        {
            let mut distributions = cdn.distributions.lock().unwrap();
            for i in 0..count {
                let mut aliases = vec![format!("site-{}.example.net", i)];
                if let Some((at, host)) = host_at {
                    if at == i {
                        aliases.push(host.to_string());
                    }
                }
                distributions.push(DistributionSummary {
                    id: format!("E{:04}", i),
                    aliases,
                });
            }
        }
        cdn
    }

    pub fn complete_after(&self, delay: Option<Duration>) {
        *self.completes_after.lock().unwrap() = delay;
    }

    pub fn fail_create(&self, code: &str, message: &str) {
        *self.create_error.lock().unwrap() = Some((code.to_string(), message.to_string()));
    }

    pub fn submitted(&self) -> Vec<SubmittedInvalidation> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> u32 {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> u32 {
        self.status_calls.load(Ordering::SeqCst)
    }

    fn status_of(&self, submitted_at: Instant) -> InvalidationStatus {
        match *self.completes_after.lock().unwrap() {
            Some(delay) if submitted_at.elapsed() >= delay => InvalidationStatus::Completed,
            _ => InvalidationStatus::InProgress,
        }
    }
}

#[async_trait]
impl CdnProvider for FakeCdn {
    async fn list_distributions(&self, marker: Option<&str>, max_items: i32) -> Result<DistributionPage, CdnError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let distributions = self.distributions.lock().unwrap();

        let start = match marker {
            None => 0,
            Some(marker) => distributions
                .iter()
                .position(|d| d.id == marker)
                .map(|i| i + 1)
                .unwrap_or(distributions.len()),
        };
        let end = (start + max_items.max(0) as usize).min(distributions.len());

        Ok(DistributionPage {
            items: distributions[start..end].to_vec(),
            is_truncated: end < distributions.len(),
        })
    }

    async fn create_invalidation(
        &self,
        distribution_id: &str,
        caller_reference: &str,
        paths: &[String],
    ) -> Result<InvalidationTicket, CdnError> {
        if let Some((code, message)) = self.create_error.lock().unwrap().clone() {
            return Err(CdnError::new(code, message));
        }

        let mut submitted = self.submitted.lock().unwrap();
        let invalidation_id = format!("I{}", submitted.len() + 1);
        let submitted_at = Instant::now();
        submitted.push(SubmittedInvalidation {
            distribution_id: distribution_id.to_string(),
            invalidation_id: invalidation_id.clone(),
            caller_reference: caller_reference.to_string(),
            paths: paths.to_vec(),
            submitted_at,
        });

        Ok(InvalidationTicket {
            id: invalidation_id,
            status: self.status_of(submitted_at),
        })
    }

    async fn get_invalidation(&self, _distribution_id: &str, invalidation_id: &str) -> Result<InvalidationStatus, CdnError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let submitted_at = self
            .submitted
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.invalidation_id == invalidation_id)
            .map(|s| s.submitted_at)
            .ok_or_else(|| CdnError::new("NoSuchInvalidation", invalidation_id))?;
        Ok(self.status_of(submitted_at))
    }
}

/// Captures requests and answers every one with `status`.
pub struct RecordingWebhookSender {
    status: u16,
    requests: Mutex<Vec<WebhookRequest>>,
}

impl RecordingWebhookSender {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<WebhookRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl WebhookSender for RecordingWebhookSender {
    async fn send(&self, request: &WebhookRequest) -> anyhow::Result<u16> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(self.status)
    }
}
