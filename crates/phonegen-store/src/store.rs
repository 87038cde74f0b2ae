//! In-memory result list with display metadata.

use std::path::Path;

use chrono::{DateTime, Local};
use tracing::info;

use phonegen_core::generator::GenerationResult;
use phonegen_core::number::PhoneNumber;

use crate::export::{export_to_path, ExportHeader};
use crate::record::{PersistedRecord, StoreError, TIMESTAMP_FORMAT, UNKNOWN};

/// Holds the most recent result list.
///
/// Replaced wholesale by a finished run or a successful load; a failed load
/// leaves it untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultStore {
    numbers: Vec<PhoneNumber>,
    operator: String,
    generation_time: String,
}

impl ResultStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            numbers: Vec::new(),
            operator: UNKNOWN.to_string(),
            generation_time: UNKNOWN.to_string(),
        }
    }

    /// Replace the contents with a run's numbers, sorted.
    pub fn replace_from_result(
        &mut self,
        result: GenerationResult,
        operator: impl Into<String>,
        generated_at: DateTime<Local>,
    ) {
        self.numbers = result.into_sorted();
        self.operator = operator.into();
        self.generation_time = generated_at.format(TIMESTAMP_FORMAT).to_string();
    }

    /// Replace the contents with a loaded record.
    pub fn replace_from_record(&mut self, record: PersistedRecord) {
        self.numbers = record.numbers;
        self.operator = record.operator;
        self.generation_time = record.generation_time;
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    #[must_use]
    pub fn numbers(&self) -> &[PhoneNumber] {
        &self.numbers
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    /// Display label of the groups the numbers came from.
    #[must_use]
    pub fn operator(&self) -> &str {
        &self.operator
    }

    #[must_use]
    pub fn generation_time(&self) -> &str {
        &self.generation_time
    }

    /// Snapshot the store as a record stamped with `saved_at`.
    #[must_use]
    pub fn to_record(&self, saved_at: DateTime<Local>) -> PersistedRecord {
        PersistedRecord::new(
            self.numbers.clone(),
            self.operator.clone(),
            self.generation_time.clone(),
            saved_at,
        )
    }

    /// Save the current list as a JSON record.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        self.to_record(Local::now()).save(path)?;
        info!(path = %path.display(), count = self.len(), "Saved numbers");
        Ok(())
    }

    /// Load a record from `path`, replacing the contents only on success.
    ///
    /// Returns the number of entries loaded.
    pub fn load(&mut self, path: &Path) -> Result<usize, StoreError> {
        let record = PersistedRecord::load(path)?;
        let count = record.count;
        self.replace_from_record(record);
        info!(path = %path.display(), count, "Loaded numbers");
        Ok(count)
    }

    /// Write the current list as a plain-text export.
    pub fn export(&self, path: &Path) -> Result<(), StoreError> {
        let generated = Local::now().format(TIMESTAMP_FORMAT).to_string();
        export_to_path(
            path,
            &self.numbers,
            ExportHeader {
                generated: &generated,
                operators: &self.operator,
            },
        )?;
        info!(path = %path.display(), count = self.len(), "Exported numbers");
        Ok(())
    }
}

impl Default for ResultStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use chrono::TimeZone;
    use phonegen_core::generator::StopReason;

    fn result(raw: &[&str]) -> GenerationResult {
        GenerationResult {
            numbers: raw
                .iter()
                .map(|s| PhoneNumber::parse(*s).unwrap())
                .collect::<HashSet<_>>(),
            attempts: raw.len() as u64,
            target: raw.len(),
            stop: StopReason::TargetReached,
        }
    }

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
    }

    #[test]
    fn starts_empty() {
        let store = ResultStore::default();
        assert!(store.is_empty());
        assert_eq!(store.operator(), UNKNOWN);
    }

    #[test]
    fn replace_sorts_and_stamps() {
        let mut store = ResultStore::new();
        store.replace_from_result(result(&["18900000000", "13812345678"]), "All", at());
        assert_eq!(store.len(), 2);
        assert_eq!(store.numbers()[0].as_str(), "13812345678");
        assert_eq!(store.operator(), "All");
        assert_eq!(store.generation_time(), "2024-01-02 03:04:05");
    }

    #[test]
    fn clear_resets() {
        let mut store = ResultStore::new();
        store.replace_from_result(result(&["13812345678"]), "All", at());
        store.clear();
        assert_eq!(store, ResultStore::new());
    }

    #[test]
    fn record_snapshot_matches_contents() {
        let mut store = ResultStore::new();
        store.replace_from_result(result(&["13812345678", "15300000001"]), "China Telecom", at());
        let record = store.to_record(at());
        assert_eq!(record.count, 2);
        assert_eq!(record.numbers, store.numbers());
        assert_eq!(record.generation_time, "2024-01-02 03:04:05");
    }
}
