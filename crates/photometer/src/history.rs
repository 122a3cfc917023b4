//! Durable logs kept in the blob store.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use photometer_store::{BlobStore, BlobStoreExt, Result};
use tracing::{debug, info};

use crate::model::HistoryRecord;

pub const HISTORY_KEY: &str = "history";
pub const USAGE_LOG_KEY: &str = "logs";

/// Measurement history, most recent first.
///
/// Each operation is a synchronous read-modify-write under one lock, so an
/// `append` can never interleave with a `load_all` or `clear`.
pub struct PersistentLog {
    store: Arc<dyn BlobStore>,
    guard: Mutex<()>,
}

impl PersistentLog {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self {
            store,
            guard: Mutex::new(()),
        }
    }

    pub fn append(&self, record: HistoryRecord) -> Result<()> {
        let _guard = self.guard.lock().unwrap_or_else(PoisonError::into_inner);
        let mut records = self.read()?;
        records.insert(0, record);
        self.store.save_json(HISTORY_KEY, &records)?;
        debug!(len = records.len(), "history record appended");
        Ok(())
    }

    pub fn load_all(&self) -> Result<Vec<HistoryRecord>> {
        let _guard = self.guard.lock().unwrap_or_else(PoisonError::into_inner);
        self.read()
    }

    /// Irreversibly empty the history. Confirmation is the caller's job.
    pub fn clear(&self) -> Result<()> {
        let _guard = self.guard.lock().unwrap_or_else(PoisonError::into_inner);
        self.store.save_json::<[HistoryRecord]>(HISTORY_KEY, &[])?;
        info!("history cleared");
        Ok(())
    }

    fn read(&self) -> Result<Vec<HistoryRecord>> {
        Ok(self
            .store
            .load_json::<Vec<HistoryRecord>>(HISTORY_KEY)?
            .unwrap_or_default())
    }
}

/// Launch timestamps (milliseconds since the epoch), newest first.
///
/// Bookkeeping only; nothing in the measurement pipeline reads it.
pub struct UsageLog {
    store: Arc<dyn BlobStore>,
}

impl UsageLog {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }

    /// Prepend `at` and return the number of recorded launches.
    pub fn record_launch(&self, at: DateTime<Utc>) -> Result<usize> {
        let mut entries = self.entries()?;
        entries.insert(0, at.timestamp_millis());
        self.store.save_json(USAGE_LOG_KEY, &entries)?;
        Ok(entries.len())
    }

    pub fn entries(&self) -> Result<Vec<i64>> {
        Ok(self
            .store
            .load_json::<Vec<i64>>(USAGE_LOG_KEY)?
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColorType;
    use chrono::TimeZone;
    use photometer_fetch::RequestKind;
    use photometer_store::MemoryStore;

    fn record(absorbance: &str) -> HistoryRecord {
        HistoryRecord {
            request_kind: RequestKind::Both,
            concentration_text: Some("1.000 mg/L".to_string()),
            absorbance_text: Some(absorbance.to_string()),
            rgb_text: "R: 1, G: 2, B: 3".to_string(),
            color_type: ColorType::Blue,
            captured_at: Utc::now(),
        }
    }

    #[test]
    fn append_is_most_recent_first() {
        let log = PersistentLog::new(Arc::new(MemoryStore::new()));
        log.append(record("0.100")).unwrap();
        log.append(record("0.200")).unwrap();

        let all = log.load_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].absorbance_text.as_deref(), Some("0.200"));
        assert_eq!(all[1].absorbance_text.as_deref(), Some("0.100"));
    }

    #[test]
    fn clear_then_append() {
        let log = PersistentLog::new(Arc::new(MemoryStore::new()));
        log.append(record("0.100")).unwrap();

        log.clear().unwrap();
        assert!(log.load_all().unwrap().is_empty());

        let fresh = record("0.300");
        log.append(fresh.clone()).unwrap();
        assert_eq!(log.load_all().unwrap(), vec![fresh]);
    }

    #[test]
    fn empty_store_has_empty_history() {
        let log = PersistentLog::new(Arc::new(MemoryStore::new()));
        assert!(log.load_all().unwrap().is_empty());
    }

    #[test]
    fn records_without_kind_default_to_both() {
        let store = Arc::new(MemoryStore::new());
        store
            .put(
                HISTORY_KEY,
                br#"[{"concentration_text":null,"absorbance_text":"0.500","rgb_text":"R: 1, G: 1, B: 1","color_type":"orange","captured_at":"2024-05-01T08:00:00Z"}]"#,
            )
            .unwrap();

        let all = PersistentLog::new(store).load_all().unwrap();
        assert_eq!(all[0].request_kind, RequestKind::Both);
        assert_eq!(all[0].color_type, ColorType::Orange);
    }

    #[test]
    fn usage_log_prepends_launches() {
        let log = UsageLog::new(Arc::new(MemoryStore::new()));
        let first = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();

        assert_eq!(log.record_launch(first).unwrap(), 1);
        assert_eq!(log.record_launch(second).unwrap(), 2);
        assert_eq!(
            log.entries().unwrap(),
            vec![second.timestamp_millis(), first.timestamp_millis()]
        );
    }
}
