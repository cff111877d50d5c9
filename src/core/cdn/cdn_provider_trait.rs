use async_trait::async_trait;
use serde::Serialize;

use crate::errors::CdnError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionSummary {
    pub id: String,
    pub aliases: Vec<String>,
}

/// One page of the provider's distribution listing.
#[derive(Debug, Clone, Default)]
pub struct DistributionPage {
    pub items: Vec<DistributionSummary>,
    /// Provider reports more entries after this page.
    pub is_truncated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum InvalidationStatus {
    InProgress,
    Completed,
    Other(String),
}

impl InvalidationStatus {
    pub fn from_provider(status: &str) -> Self {
        match status {
            "InProgress" => InvalidationStatus::InProgress,
            "Completed" => InvalidationStatus::Completed,
            other => InvalidationStatus::Other(other.to_string()),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, InvalidationStatus::Completed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidationTicket {
    pub id: String,
    pub status: InvalidationStatus,
}

/// The CDN calls the invalidation driver issues.
#[async_trait]
pub trait CdnProvider: Send + Sync {
    /// Lists distributions starting after `marker` (a distribution id).
    async fn list_distributions(&self, marker: Option<&str>, max_items: i32) -> Result<DistributionPage, CdnError>;

    async fn create_invalidation(
        &self,
        distribution_id: &str,
        caller_reference: &str,
        paths: &[String],
    ) -> Result<InvalidationTicket, CdnError>;

    async fn get_invalidation(&self, distribution_id: &str, invalidation_id: &str) -> Result<InvalidationStatus, CdnError>;
}
