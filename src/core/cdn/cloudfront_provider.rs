use async_trait::async_trait;
use aws_sdk_cloudfront::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_cloudfront::types::{InvalidationBatch, Paths};
use aws_sdk_cloudfront::Client;

use crate::core::cdn::cdn_provider_trait::{
    CdnProvider, DistributionPage, DistributionSummary, InvalidationStatus, InvalidationTicket,
};
use crate::errors::CdnError;

#[derive(Clone)]
pub struct CloudFrontProvider {
    client: Client,
}

impl CloudFrontProvider {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

/// Keeps the service error code (AccessDenied, TooManyInvalidationsInProgress, ...)
/// so callers can log the classification.
fn cdn_error<E>(err: E) -> CdnError
where
    E: ProvideErrorMetadata + std::error::Error,
{
    let code = err.code().unwrap_or("Unclassified").to_string();
    CdnError::new(code, DisplayErrorContext(err).to_string())
}

#[async_trait]
impl CdnProvider for CloudFrontProvider {
    async fn list_distributions(&self, marker: Option<&str>, max_items: i32) -> Result<DistributionPage, CdnError> {
        let output = self
            .client
            .list_distributions()
            .set_marker(marker.map(str::to_string))
            .max_items(max_items)
            .send()
            .await
            .map_err(cdn_error)?;

        let Some(list) = output.distribution_list() else {
            return Ok(DistributionPage::default());
        };

        let items = list
            .items()
            .iter()
            .map(|d| DistributionSummary {
                id: d.id().to_string(),
                aliases: d
                    .aliases()
                    .map(|a| a.items().to_vec())
                    .unwrap_or_default(),
            })
            .collect();

        Ok(DistributionPage {
            items,
            is_truncated: list.next_marker().is_some(),
        })
    }

    async fn create_invalidation(
        &self,
        distribution_id: &str,
        caller_reference: &str,
        paths: &[String],
    ) -> Result<InvalidationTicket, CdnError> {
        let paths = Paths::builder()
            .quantity(paths.len() as i32)
            .set_items(Some(paths.to_vec()))
            .build()
            .map_err(|e| CdnError::new("InvalidArgument", e.to_string()))?;
        let batch = InvalidationBatch::builder()
            .paths(paths)
            .caller_reference(caller_reference)
            .build()
            .map_err(|e| CdnError::new("InvalidArgument", e.to_string()))?;

        let output = self
            .client
            .create_invalidation()
            .distribution_id(distribution_id)
            .invalidation_batch(batch)
            .send()
            .await
            .map_err(cdn_error)?;

        let invalidation = output
            .invalidation()
            .ok_or_else(|| CdnError::new("MissingBody", "CreateInvalidation returned no invalidation"))?;

        Ok(InvalidationTicket {
            id: invalidation.id().to_string(),
            status: InvalidationStatus::from_provider(invalidation.status()),
        })
    }

    async fn get_invalidation(&self, distribution_id: &str, invalidation_id: &str) -> Result<InvalidationStatus, CdnError> {
        let output = self
            .client
            .get_invalidation()
            .distribution_id(distribution_id)
            .id(invalidation_id)
            .send()
            .await
            .map_err(cdn_error)?;

        let invalidation = output
            .invalidation()
            .ok_or_else(|| CdnError::new("MissingBody", "GetInvalidation returned no invalidation"))?;

        Ok(InvalidationStatus::from_provider(invalidation.status()))
    }
}
