//! JSONL file writer for extracted metadata.
//!
//! Each persisted [`AdvancedMetadata`] record becomes a single JSON line
//! carrying the book and user ids plus a `timestamp`, appended through a
//! buffered writer.

use async_trait::async_trait;
use coverscan_application::{MetadataSink, SinkError};
use coverscan_domain::AdvancedMetadata;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// JSONL metadata sink that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every record
/// and on `Drop`.
pub struct JsonlMetadataSink {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlMetadataSink {
    /// Open (or create) the log at `path` in append mode.
    ///
    /// Creates parent directories if they don't exist. Returns `None` if the
    /// file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create metadata log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open metadata log {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl MetadataSink for JsonlMetadataSink {
    async fn persist(
        &self,
        book_id: &str,
        user_id: &str,
        metadata: &AdvancedMetadata,
    ) -> Result<(), SinkError> {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        let record = serde_json::json!({
            "type": "book_metadata",
            "timestamp": timestamp,
            "bookId": book_id,
            "userId": user_id,
            "metadata": metadata,
        });
        let line =
            serde_json::to_string(&record).map_err(|e| SinkError::Serialization(e.to_string()))?;

        let mut writer = self
            .writer
            .lock()
            .map_err(|_| SinkError::Io("metadata log writer poisoned".to_string()))?;
        writeln!(writer, "{}", line).map_err(|e| SinkError::Io(e.to_string()))?;
        writer.flush().map_err(|e| SinkError::Io(e.to_string()))?;

        debug!("Persisted metadata for {} to {}", book_id, self.path.display());
        Ok(())
    }
}

impl Drop for JsonlMetadataSink {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
