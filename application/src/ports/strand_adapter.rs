//! Strand adapter port
//!
//! Defines the uniform contract every recognizer (barcode, OCR, vision
//! model) is wrapped in.

use async_trait::async_trait;
use coverscan_domain::{ImageLocator, StrandAnalysis};
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Errors a strand can fail with
///
/// Strand failures are recorded on the workflow and never abort a run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StrandError {
    #[error("Strand timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Strand cancelled")]
    Cancelled,

    #[error("No result: {0}")]
    NoResult(String),

    #[error("Image unavailable: {0}")]
    ImageUnavailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl StrandError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, StrandError::Cancelled)
    }
}

/// Per-call options handed to an adapter
#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    /// Upper bound for the call; the orchestrator enforces it as well
    pub timeout: Option<Duration>,
    pub cancellation: Option<CancellationToken>,
}

impl AnalysisOptions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }
}

/// One recognizer
///
/// Implementations must fail fast: a recognizer that could not produce
/// metadata returns `Err`, never a partially-populated success.
#[async_trait]
pub trait StrandAdapter: Send + Sync {
    /// Human-readable name of the backing recognizer
    fn name(&self) -> &str;

    /// Monetary cost of a single call
    fn cost_per_call(&self) -> f64 {
        0.0
    }

    /// Analyze the cover image at `locator`
    async fn analyze(
        &self,
        locator: &ImageLocator,
        options: &AnalysisOptions,
    ) -> Result<StrandAnalysis, StrandError>;
}
