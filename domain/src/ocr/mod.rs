//! OCR post-processing

pub mod candidates;

pub use candidates::{
    CoverTextCandidates, OcrLine, TextCandidate, classify_lines, normalize_line, split_authors,
};
