use tracing::debug;

use crate::core::cdn::cdn_provider_trait::CdnProvider;
use crate::errors::CoordinationError;

pub const DISTRIBUTION_PAGE_SIZE: i32 = 50;

/// Finds the distribution serving `host` by walking the provider's listing
/// page by page. The id of the last entry on a page is the next page's marker.
pub async fn resolve_distribution_id(cdn: &dyn CdnProvider, host: &str) -> Result<String, CoordinationError> {
    let mut marker: Option<String> = None;
    let mut pages = 0u32;

    loop {
        let page = cdn.list_distributions(marker.as_deref(), DISTRIBUTION_PAGE_SIZE).await?;
        pages += 1;

        if let Some(found) = page
            .items
            .iter()
            .find(|d| d.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(host)))
        {
            debug!(host = %host, distribution_id = %found.id, pages, "Resolved distribution");
            return Ok(found.id.clone());
        }

        let Some(last) = page.items.last() else {
            break;
        };
        // a marker that does not move would page forever
        if !page.is_truncated || marker.as_deref() == Some(last.id.as_str()) {
            break;
        }
        marker = Some(last.id.clone());
    }

    debug!(host = %host, pages, "No distribution aliases host");
    Err(CoordinationError::DistributionNotFound { host: host.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeCdn;

    #[tokio::test]
    async fn finds_alias_on_third_page() {
        let cdn = FakeCdn::with_distributions(150, Some((120, "a.example.com")));

        let id = resolve_distribution_id(&cdn, "a.example.com").await.unwrap();
        assert_eq!(id, "E0120");
        assert_eq!(cdn.list_calls(), 3);
    }

    #[tokio::test]
    async fn first_match_on_first_page_stops_paging() {
        let cdn = FakeCdn::with_distributions(150, Some((3, "a.example.com")));

        assert_eq!(resolve_distribution_id(&cdn, "a.example.com").await.unwrap(), "E0003");
        assert_eq!(cdn.list_calls(), 1);
    }

    #[tokio::test]
    async fn empty_listing_is_not_found() {
        let cdn = FakeCdn::default();

        let err = resolve_distribution_id(&cdn, "a.example.com").await.unwrap_err();
        assert!(matches!(err, CoordinationError::DistributionNotFound { ref host } if host == "a.example.com"));
        assert_eq!(cdn.list_calls(), 1);
    }

    #[tokio::test]
    async fn exhausted_listing_is_not_found() {
        let cdn = FakeCdn::with_distributions(100, None);

        let err = resolve_distribution_id(&cdn, "a.example.com").await.unwrap_err();
        assert!(matches!(err, CoordinationError::DistributionNotFound { .. }));
        assert_eq!(cdn.list_calls(), 2);
    }
}
