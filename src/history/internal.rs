//! History store implementation.

use chrono::{DateTime, Local, Utc};
use tracing::{debug, warn};

use super::storage::StorageBackend;
use super::{export, HistoryError, Recommendation, HISTORY_CAPACITY, HISTORY_KEY};

/// Read the persisted history.
///
/// Missing, unreadable or malformed data all yield an empty history. A
/// corrupt history is treated as no history; the caller never sees an error.
pub fn load(backend: &StorageBackend) -> Vec<Recommendation> {
    let mut records = read_all(backend);
    records.truncate(HISTORY_CAPACITY);
    records
}

/// Everything the backend holds, without the capacity cut
fn read_all(backend: &StorageBackend) -> Vec<Recommendation> {
    let raw = match backend.get(HISTORY_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(
                backend = backend.backend_name(),
                error = %e,
                "history unreadable, starting empty"
            );
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<Recommendation>>(&raw) {
        Ok(records) => records,
        Err(e) => {
            warn!(error = %e, "history corrupt, starting empty");
            Vec::new()
        }
    }
}

/// Bounded, newest-first recommendation history with write-through persistence.
///
/// Construct once per process and pass by reference to whoever needs it.
#[derive(Debug)]
pub struct HistoryStore {
    backend: StorageBackend,
    records: Vec<Recommendation>,
}

impl HistoryStore {
    /// Open the store, loading whatever the backend holds.
    ///
    /// A persisted history longer than the capacity is cut to the newest 50
    /// and written back, so storage never holds more than memory does.
    pub fn open(backend: StorageBackend) -> Self {
        let mut records = read_all(&backend);
        let stored = records.len();
        records.truncate(HISTORY_CAPACITY);

        let store = Self { backend, records };
        if stored > HISTORY_CAPACITY {
            match store.persist(&store.records) {
                Ok(()) => debug!(stored, "oversized history trimmed"),
                Err(e) => warn!(error = %e, "could not trim oversized history"),
            }
        }

        debug!(
            backend = store.backend.backend_name(),
            count = store.records.len(),
            "history loaded"
        );
        store
    }

    /// Insert `record` at the front, keep the newest 50, and persist.
    ///
    /// If the write fails the in-memory history is left untouched.
    pub fn append(&mut self, record: Recommendation) -> Result<&[Recommendation], HistoryError> {
        let mut updated = Vec::with_capacity(HISTORY_CAPACITY);
        updated.push(record);
        updated.extend(
            self.records
                .iter()
                .take(HISTORY_CAPACITY - 1)
                .cloned(),
        );

        self.persist(&updated)?;
        self.records = updated;
        debug!(count = self.records.len(), "history appended");
        Ok(self.records.as_slice())
    }

    /// Drop every record and remove the storage entry itself.
    ///
    /// Callers are expected to have confirmed with the user first.
    pub fn clear(&mut self) -> Result<(), HistoryError> {
        self.backend
            .remove(HISTORY_KEY)
            .map_err(|source| HistoryError::Storage {
                backend: self.backend.backend_name(),
                source,
            })?;
        self.records.clear();
        debug!("history cleared");
        Ok(())
    }

    /// Newest `n` records
    pub fn recent(&self, n: usize) -> &[Recommendation] {
        &self.records[..n.min(self.records.len())]
    }

    /// All records, newest first
    pub fn records(&self) -> &[Recommendation] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn backend(&self) -> &StorageBackend {
        &self.backend
    }

    /// Id for a record created at `now`: its Unix millis, bumped past the newest id.
    ///
    /// A stored id at `i64::MAX` cannot be bumped; the clock value is used instead.
    pub fn next_id(&self, now: DateTime<Utc>) -> i64 {
        let millis = now.timestamp_millis();
        match self.records.first() {
            Some(newest) if millis <= newest.id => match newest.id.checked_add(1) {
                Some(id) => id,
                None => {
                    warn!(newest = newest.id, "history id space exhausted, using clock");
                    millis
                }
            },
            _ => millis,
        }
    }

    /// Whole history as CSV, dates and times in the local timezone
    pub fn to_csv(&self) -> Result<String, HistoryError> {
        export::to_csv_at(&self.records, &Local)
    }

    fn persist(&self, records: &[Recommendation]) -> Result<(), HistoryError> {
        let encoded = serde_json::to_string(records)?;
        self.backend
            .set(HISTORY_KEY, &encoded)
            .map_err(|source| HistoryError::Storage {
                backend: self.backend.backend_name(),
                source,
            })
    }
}
