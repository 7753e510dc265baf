//! Recommendation history - bounded, newest-first, write-through.
//!
//! The history lives in one key of a durable key-value store. Every mutation
//! rewrites the whole value, so what is on disk always equals what is in
//! memory.
//!
//! # Usage
//!
//! ```no_run
//! use agrosmart::history::{HistoryStore, StorageBackend};
//!
//! # fn main() -> Result<(), agrosmart::history::HistoryError> {
//! let mut store = HistoryStore::open(StorageBackend::open_file("/tmp/agrosmart"));
//! for record in store.recent(10) {
//!     println!("{} ({}%)", record.fertilizer, record.confidence);
//! }
//! let csv = store.to_csv()?;
//! store.clear()?;
//! # Ok(())
//! # }
//! ```

mod export;
mod internal;
mod storage;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::fields::Inputs;

pub use export::{to_csv_at, CSV_HEADERS};
pub use internal::{load, HistoryStore};
pub use storage::{FileStorage, MemoryStorage, StorageBackend};

/// Storage key holding the JSON-encoded history
pub const HISTORY_KEY: &str = "agrosmartHistory";

/// Maximum number of records kept
pub const HISTORY_CAPACITY: usize = 50;

/// Confidence assumed when the service does not report one
pub const DEFAULT_CONFIDENCE: f64 = 100.0;

/// One fertilizer suggestion plus the inputs that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Creation time in Unix milliseconds, bumped to stay strictly increasing
    pub id: i64,
    /// RFC 3339 UTC instant of creation
    pub timestamp: String,
    pub inputs: Inputs,
    pub fertilizer: String,
    /// Percentage in [0, 100]
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

fn default_confidence() -> f64 {
    DEFAULT_CONFIDENCE
}

impl Recommendation {
    pub fn new(
        id: i64,
        created_at: DateTime<Utc>,
        inputs: Inputs,
        fertilizer: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self {
            id,
            timestamp: created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            inputs,
            fertilizer: fertilizer.into(),
            confidence,
        }
    }

    /// Parsed creation instant, `None` if the stored timestamp is not RFC 3339
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("Failed to write history to {backend} storage: {source}")]
    Storage {
        backend: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode history: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to build CSV: {0}")]
    Csv(#[from] csv::Error),
}
