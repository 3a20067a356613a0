//! Extraction orchestration domain
//!
//! Strategies decide which strands an agent runs and in what order.

pub mod strategy;

pub use strategy::{ExtractionStrategy, strand_order};
