//! Strand domain
//!
//! A strand is one independent recognizer (barcode scan, OCR, a vision
//! model). Strands run against the same cover image and each reports a
//! partial view of the book's metadata.

pub mod result;
pub mod strand_id;

pub use result::{StrandAnalysis, StrandConfidence, StrandResult, normalize_confidence};
pub use strand_id::StrandId;
