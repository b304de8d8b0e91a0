//! Multi-page collection driver
//!
//! Requests `page = 1, 2, ...` until one of:
//! - the provider reports `current >= total`
//! - a page returns no records (covers missing or inconsistent metadata)
//! - the page cap is reached

use crate::api::client::ApiClient;
use crate::SyncError;
use serde_json::Value;

/// Records gathered from a paginated endpoint
#[derive(Debug, Clone, Default)]
pub struct PageCollection {
    /// All records in provider order
    pub records: Vec<Value>,

    /// Number of page requests sent
    pub pages_requested: u32,

    /// False when collection stopped early on a failed page or the page cap
    pub complete: bool,
}

/// Drives a paginated endpoint to completion
pub struct Paginator<'a> {
    client: &'a mut ApiClient,
    max_pages: u32,
}

impl<'a> Paginator<'a> {
    pub fn new(client: &'a mut ApiClient, max_pages: u32) -> Self {
        Self {
            client,
            max_pages: max_pages.max(1),
        }
    }

    /// Collects every record of `endpoint` for `base_params`
    ///
    /// A failure on the first page is returned as an error. A failure on a
    /// later page is logged and the records gathered so far are returned with
    /// `complete == false`.
    pub async fn collect_all(
        &mut self,
        endpoint: &str,
        base_params: &[(&str, String)],
    ) -> Result<PageCollection, SyncError> {
        let mut collection = PageCollection::default();
        let mut page: u32 = 1;

        loop {
            if page > self.max_pages {
                tracing::warn!(
                    "Stopping {} after {} pages (page cap reached)",
                    endpoint,
                    self.max_pages
                );
                return Ok(collection);
            }

            let mut params = base_params.to_vec();
            params.push(("page", page.to_string()));

            collection.pages_requested += 1;
            let outcome = match self.client.fetch(endpoint, &params).await {
                Ok(response) => response.into_checked(endpoint),
                Err(e) => Err(SyncError::from(e)),
            };

            let response = match outcome {
                Ok(response) => response,
                Err(e) if page == 1 => return Err(e),
                Err(e) => {
                    tracing::warn!(
                        "Page {} of {} failed, keeping {} records from earlier pages: {}",
                        page,
                        endpoint,
                        collection.records.len(),
                        e
                    );
                    return Ok(collection);
                }
            };

            let paging = response.paging();
            let records = response.into_records();
            if records.is_empty() {
                tracing::debug!("{} page {} returned no records", endpoint, page);
                break;
            }

            collection.records.extend(records);

            let current = paging.current.unwrap_or(page);
            tracing::debug!(
                "Fetched page {}/{} of {}: {} records so far",
                current,
                paging
                    .total
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "?".to_string()),
                endpoint,
                collection.records.len()
            );

            if matches!(paging.total, Some(total) if current >= total) {
                break;
            }

            page += 1;
        }

        collection.complete = true;
        Ok(collection)
    }
}
