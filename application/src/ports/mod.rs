//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod catalog_client;
pub mod event_publisher;
pub mod image_store;
pub mod metadata_sink;
pub mod progress;
pub mod recognizer;
pub mod strand_adapter;
