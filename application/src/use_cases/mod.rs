//! Use cases (application services)

pub mod enrich_metadata;
pub mod extraction_service;
pub mod process_cover;
