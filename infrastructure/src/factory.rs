//! Builds application collaborators from file configuration

use crate::catalog::GoogleBooksClient;
use crate::config::{FileCatalogConfig, FileStrandsConfig, enabled_strands};
use crate::recognizers::{HttpBarcodeReader, HttpOcrEngine, HttpVisionStrand};
use coverscan_application::{
    BarcodeStrand, CatalogClient, ImageStore, OcrStrand, StrandAdapter, StrandRegistry,
};
use coverscan_domain::StrandId;
use std::sync::Arc;
use tracing::debug;

/// Register an adapter for every `[strands.<id>]` table with an endpoint.
///
/// `barcode` and `ocr` wrap remote recognizers in the built-in strands;
/// every other id is treated as a remote vision analyzer.
pub fn build_strand_registry(
    strands: &FileStrandsConfig,
    store: Arc<dyn ImageStore>,
) -> StrandRegistry {
    let mut registry = StrandRegistry::new();

    for (id, config) in enabled_strands(strands) {
        let Some(endpoint) = config.endpoint.clone() else {
            continue;
        };
        let adapter: Arc<dyn StrandAdapter> = match id {
            StrandId::Barcode => Arc::new(BarcodeStrand::new(
                store.clone(),
                HttpBarcodeReader::new(endpoint),
            )),
            StrandId::Ocr => Arc::new(OcrStrand::new(store.clone(), HttpOcrEngine::new(endpoint))),
            _ => Arc::new(
                HttpVisionStrand::new(id.clone(), endpoint)
                    .with_cost_per_call(config.cost_per_call),
            ),
        };
        debug!("Registered strand {}", id);
        registry.register(id, adapter);
    }

    registry
}

/// The configured catalog, or `None` when disabled
pub fn build_catalog(config: &FileCatalogConfig) -> Option<Arc<dyn CatalogClient>> {
    if !config.enabled || config.base_url.trim().is_empty() {
        return None;
    }
    Some(Arc::new(
        GoogleBooksClient::new(config.base_url.clone()).with_api_key(config.api_key.clone()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileStrandConfig;
    use crate::storage::LocalImageStore;

    fn endpoint(url: &str, cost: f64) -> FileStrandConfig {
        FileStrandConfig {
            endpoint: Some(url.to_string()),
            cost_per_call: cost,
        }
    }

    #[test]
    fn test_registry_from_config() {
        let strands = FileStrandsConfig::from([
            ("barcode".to_string(), endpoint("http://localhost:1/decode", 0.0)),
            ("ocr".to_string(), endpoint("http://localhost:1/ocr", 0.0)),
            ("vision-a".to_string(), endpoint("http://localhost:1/a", 0.002)),
            ("vision-b".to_string(), FileStrandConfig::default()),
        ]);
        let registry = build_strand_registry(&strands, Arc::new(LocalImageStore::new(".")));

        assert_eq!(
            registry.ids(),
            vec![StrandId::Barcode, StrandId::Ocr, StrandId::VisionA]
        );
        assert!(registry.has_vision_strands());
        let vision = registry.get(&StrandId::VisionA).unwrap();
        assert_eq!(vision.name(), "vision-a");
        assert_eq!(vision.cost_per_call(), 0.002);
        assert_eq!(registry.get(&StrandId::Ocr).unwrap().name(), "ocr");
    }

    #[test]
    fn test_catalog_disabled() {
        let config = FileCatalogConfig {
            enabled: false,
            ..Default::default()
        };
        assert!(build_catalog(&config).is_none());
        assert!(build_catalog(&FileCatalogConfig::default()).is_some());
    }
}
