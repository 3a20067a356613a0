//! Catalog enrichment
//!
//! Cross-checks extracted metadata against the bibliographic catalog. The
//! lookup is best-effort: a failure, a timeout or an empty answer leaves
//! the metadata untouched and is only logged.

use crate::ports::catalog_client::CatalogClient;
use coverscan_domain::{BookMetadata, CatalogEnrichment, CatalogQuery};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub struct CatalogEnrichmentResolver {
    client: Arc<dyn CatalogClient>,
    timeout: Duration,
}

impl CatalogEnrichmentResolver {
    pub fn new(client: Arc<dyn CatalogClient>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Whether `metadata` carries enough to query the catalog with
    pub fn can_enrich(metadata: &BookMetadata) -> bool {
        CatalogQuery::from_metadata(metadata).is_some()
    }

    /// Look `metadata` up and overwrite it with the catalog's values.
    ///
    /// Returns what was overwritten, or `None` when nothing was.
    pub async fn enrich(
        &self,
        metadata: &mut BookMetadata,
        cancellation: Option<&CancellationToken>,
    ) -> Option<CatalogEnrichment> {
        let query = CatalogQuery::from_metadata(metadata)?;
        debug!("Catalog lookup: {:?}", query);

        let lookup = tokio::time::timeout(self.timeout, self.client.search(&query));
        let outcome = match cancellation {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!("Catalog lookup cancelled");
                    return None;
                }
                outcome = lookup => outcome,
            },
            None => lookup.await,
        };

        let record = match outcome {
            Ok(Ok(Some(record))) => record,
            Ok(Ok(None)) => {
                info!("Catalog returned no match for {:?}", query);
                return None;
            }
            Ok(Err(e)) => {
                warn!("Catalog lookup failed: {}", e);
                return None;
            }
            Err(_) => {
                warn!("Catalog lookup timed out after {}s", self.timeout.as_secs());
                return None;
            }
        };

        let fields = record.apply_to(metadata);
        if fields.is_empty() {
            info!("Catalog record carried no usable fields");
            return None;
        }

        info!("Catalog enriched {} field(s)", fields.len());
        Some(CatalogEnrichment {
            matched_by: query.match_kind(),
            query,
            fields,
            record,
        })
    }
}
