//! Book domain
//!
//! Bibliographic metadata, the ISBN value object and catalog lookup types.

pub mod catalog;
pub mod isbn;
pub mod metadata;

pub use catalog::{CATALOG_CONFIDENCE, CatalogEnrichment, CatalogMatch, CatalogQuery, CatalogRecord};
pub use isbn::Isbn;
pub use metadata::{BookMetadata, MIN_USABLE_TITLE_LEN, MetadataField};
