//! Extraction artifacts
//!
//! - [`ImageLocator`] - where the cover image lives
//! - [`ExecutionResult`] - outcome of one orchestration run
//! - [`AdvancedMetadata`] - final, fully attributed record handed to storage

pub mod advanced;
pub mod locator;
pub mod result;

pub use advanced::{AdvancedMetadata, METADATA_EXTRACTED_EVENT, MetadataExtractedEvent, ProvenanceEntry};
pub use locator::ImageLocator;
pub use result::{ALL_STRANDS_FAILED, CATALOG_SOURCE, ExecutionResult, Workflow};
