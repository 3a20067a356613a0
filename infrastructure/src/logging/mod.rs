//! Structured metadata logging
//!
//! Provides [`JsonlMetadataSink`], a JSONL file writer that implements
//! the [`MetadataSink`](coverscan_application::MetadataSink) port.

mod jsonl_sink;

pub use jsonl_sink::JsonlMetadataSink;
