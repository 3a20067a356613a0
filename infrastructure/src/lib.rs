//! Infrastructure layer for coverscan
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: configuration loading, the Google Books
//! catalog, HTTP recognizers, local image storage, the JSONL metadata sink
//! and the tracing event publisher.

pub mod catalog;
pub mod config;
pub mod events;
pub mod factory;
pub mod logging;
pub mod recognizers;
pub mod storage;

pub use catalog::GoogleBooksClient;
pub use config::{ConfigError, ConfigLoader, FileConfig};
pub use events::TracingEventPublisher;
pub use factory::{build_catalog, build_strand_registry};
pub use logging::JsonlMetadataSink;
pub use recognizers::{HttpBarcodeReader, HttpOcrEngine, HttpVisionStrand};
pub use storage::LocalImageStore;
