//! Application layer for coverscan
//!
//! This crate contains use cases, port definitions, registries and the
//! built-in barcode/OCR strands. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod registry;
pub mod strands;
pub mod use_cases;

// Re-export commonly used types
pub use config::BehaviorConfig;
pub use ports::{
    catalog_client::{CatalogClient, CatalogError},
    event_publisher::{DomainEvent, EventPublisher},
    image_store::{ImageStore, ImageStoreError},
    metadata_sink::{MetadataSink, NoMetadataSink, SinkError},
    progress::{NoProgress, StrandProgressNotifier},
    recognizer::{BarcodeReader, DecodedSymbol, OcrEngine, RecognizerError},
    strand_adapter::{AnalysisOptions, StrandAdapter, StrandError},
};
pub use registry::{AgentRegistry, StrandConfiguration, StrandRegistry};
pub use strands::{BarcodeStrand, OcrStrand};
pub use use_cases::enrich_metadata::CatalogEnrichmentResolver;
pub use use_cases::extraction_service::{ExtractionContext, ExtractionService, ServiceStats};
pub use use_cases::process_cover::{
    ProcessCoverError, ProcessCoverInput, ProcessCoverOutput, ProcessCoverUseCase,
};
