//! Remote recognizer adapters

mod http;
mod vision;

pub use http::{HttpBarcodeReader, HttpOcrEngine};
pub use vision::HttpVisionStrand;
