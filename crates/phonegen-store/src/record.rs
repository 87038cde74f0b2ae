//! Persisted JSON record: save, load and validation.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use phonegen_core::number::PhoneNumber;

/// Schema version written into every record.
pub const RECORD_VERSION: &str = "1.0";

/// Files larger than this log a warning before they are read.
pub const LARGE_FILE_WARN_BYTES: u64 = 100 * 1024 * 1024;

/// Placeholder for metadata missing from a loaded record.
pub const UNKNOWN: &str = "unknown";

/// Timestamp format used in records and exports.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const FILENAME_STEM: &str = "phone_numbers";

/// Why a record was rejected on load.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CorruptRecord {
    #[error("not valid JSON: {0}")]
    Malformed(String),

    #[error("top level is not an object")]
    NotAMapping,

    #[error("missing required key `{0}`")]
    MissingKey(&'static str),

    #[error("`numbers` is not a list")]
    NumbersNotList,

    #[error("`count` is not a non-negative integer")]
    CountNotInteger,

    #[error("`count` says {declared} but the list holds {actual}")]
    CountMismatch { declared: u64, actual: usize },

    #[error("entry {index} is not a valid number: {value}")]
    InvalidNumber { index: usize, value: String },
}

/// Errors from record and export file operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: corrupt record: {reason}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        reason: CorruptRecord,
    },
}

impl StoreError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// The validation failure, if this is a corrupt-record error.
    #[must_use]
    pub fn corrupt_reason(&self) -> Option<&CorruptRecord> {
        match self {
            Self::Corrupt { reason, .. } => Some(reason),
            Self::Io { .. } => None,
        }
    }
}

/// On-disk form of a result list and its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedRecord {
    pub numbers: Vec<PhoneNumber>,
    pub count: usize,
    pub save_time: String,
    pub operator: String,
    pub generation_time: String,
    pub version: String,
}

impl PersistedRecord {
    /// Build a record for `numbers`, stamping `save_time` from `saved_at`.
    #[must_use]
    pub fn new(
        numbers: Vec<PhoneNumber>,
        operator: impl Into<String>,
        generation_time: impl Into<String>,
        saved_at: DateTime<Local>,
    ) -> Self {
        Self {
            count: numbers.len(),
            numbers,
            save_time: saved_at.format(TIMESTAMP_FORMAT).to_string(),
            operator: operator.into(),
            generation_time: generation_time.into(),
            version: RECORD_VERSION.to_string(),
        }
    }

    /// Parse and validate a record from raw bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CorruptRecord> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| CorruptRecord::Malformed(e.to_string()))?;
        Self::from_value(value)
    }

    /// Validate an already-parsed JSON document.
    pub fn from_value(value: Value) -> Result<Self, CorruptRecord> {
        let Value::Object(mut map) = value else {
            return Err(CorruptRecord::NotAMapping);
        };

        let numbers = map
            .remove("numbers")
            .ok_or(CorruptRecord::MissingKey("numbers"))?;
        let count = map
            .get("count")
            .ok_or(CorruptRecord::MissingKey("count"))?;
        let Value::Array(entries) = numbers else {
            return Err(CorruptRecord::NumbersNotList);
        };
        let declared = declared_count(count).ok_or(CorruptRecord::CountNotInteger)?;
        if usize::try_from(declared).ok() != Some(entries.len()) {
            return Err(CorruptRecord::CountMismatch {
                declared,
                actual: entries.len(),
            });
        }

        let numbers = validate_entries(&entries)?;
        Ok(Self {
            count: numbers.len(),
            numbers,
            save_time: text_field(&map, "save_time"),
            operator: text_field(&map, "operator"),
            generation_time: text_field(&map, "generation_time"),
            version: text_field(&map, "version"),
        })
    }

    /// Write the record as JSON to `writer`.
    pub fn write_to<W: Write>(&self, writer: W) -> io::Result<()> {
        serde_json::to_writer_pretty(writer, self).map_err(io::Error::other)
    }

    /// Save the record to `path`, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let file = File::create(path).map_err(|e| StoreError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)
            .and_then(|()| writer.flush())
            .map_err(|e| StoreError::io(path, e))?;
        debug!(path = %path.display(), count = self.count, "Record saved");
        Ok(())
    }

    /// Load and validate the record at `path`.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let size = fs::metadata(path)
            .map_err(|e| StoreError::io(path, e))?
            .len();
        if size > LARGE_FILE_WARN_BYTES {
            warn!(
                path = %path.display(),
                size_mib = size / (1024 * 1024),
                "Record file is very large; loading may take a while"
            );
        }
        let bytes = fs::read(path).map_err(|e| StoreError::io(path, e))?;
        let record = Self::from_slice(&bytes).map_err(|reason| StoreError::Corrupt {
            path: path.to_path_buf(),
            reason,
        })?;
        debug!(path = %path.display(), count = record.count, "Record loaded");
        Ok(record)
    }
}

/// `count` as a non-negative integer; integral floats such as `2.0` count.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn declared_count(count: &Value) -> Option<u64> {
    count.as_u64().or_else(|| {
        count
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f < u64::MAX as f64)
            .map(|f| f as u64)
    })
}

/// Validate every entry in parallel, reporting the first bad one.
fn validate_entries(entries: &[Value]) -> Result<Vec<PhoneNumber>, CorruptRecord> {
    let parsed: Vec<Result<PhoneNumber, CorruptRecord>> = entries
        .par_iter()
        .enumerate()
        .map(|(i, entry)| parse_entry(i + 1, entry))
        .collect();
    parsed.into_iter().collect()
}

fn parse_entry(index: usize, entry: &Value) -> Result<PhoneNumber, CorruptRecord> {
    match entry {
        Value::String(s) => {
            PhoneNumber::parse(s.as_str()).map_err(|e| CorruptRecord::InvalidNumber {
                index,
                value: e.0,
            })
        }
        other => Err(CorruptRecord::InvalidNumber {
            index,
            value: other.to_string(),
        }),
    }
}

fn text_field(map: &Map<String, Value>, key: &str) -> String {
    match map.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => UNKNOWN.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Default file name for a save or export made at `now`.
#[must_use]
pub fn default_filename(now: DateTime<Local>, extension: &str) -> String {
    format!("{FILENAME_STEM}_{}.{extension}", now.format("%Y%m%d%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn numbers(raw: &[&str]) -> Vec<PhoneNumber> {
        raw.iter().map(|s| PhoneNumber::parse(*s).unwrap()).collect()
    }

    fn sample_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
    }

    #[test]
    fn new_record_stamps_metadata() {
        let r = PersistedRecord::new(
            numbers(&["13812345678", "18900000000"]),
            "China Mobile",
            "2024-03-09 14:00:00",
            sample_time(),
        );
        assert_eq!(r.count, 2);
        assert_eq!(r.version, RECORD_VERSION);
        assert_eq!(r.save_time, "2024-03-09 14:05:07");
    }

    #[test]
    fn serialized_keys() {
        let r = PersistedRecord::new(numbers(&["13812345678"]), "All", "t", sample_time());
        let value = serde_json::to_value(&r).unwrap();
        let obj = value.as_object().unwrap();
        for key in ["numbers", "count", "save_time", "operator", "generation_time", "version"] {
            assert!(obj.contains_key(key), "missing {key}");
        }
        assert_eq!(value["numbers"], json!(["13812345678"]));
    }

    #[test]
    fn accepts_valid_document() {
        let doc = json!({
            "numbers": ["13812345678", "15300000001"],
            "count": 2,
            "save_time": "s",
            "operator": "China Telecom",
            "generation_time": "g",
            "version": "1.0"
        });
        let r = PersistedRecord::from_value(doc).unwrap();
        assert_eq!(r.numbers, numbers(&["13812345678", "15300000001"]));
        assert_eq!(r.operator, "China Telecom");
    }

    #[test]
    fn missing_metadata_reads_unknown() {
        let r = PersistedRecord::from_value(json!({ "numbers": [], "count": 0 })).unwrap();
        assert!(r.numbers.is_empty());
        assert_eq!(r.operator, UNKNOWN);
        assert_eq!(r.save_time, UNKNOWN);
        assert_eq!(r.version, UNKNOWN);
    }

    #[test]
    fn malformed_json() {
        let err = PersistedRecord::from_slice(b"{ not json").unwrap_err();
        assert!(matches!(err, CorruptRecord::Malformed(_)));
    }

    #[test]
    fn top_level_not_object() {
        let err = PersistedRecord::from_value(json!(["13812345678"])).unwrap_err();
        assert_eq!(err, CorruptRecord::NotAMapping);
    }

    #[test]
    fn missing_keys() {
        let err = PersistedRecord::from_value(json!({ "count": 0 })).unwrap_err();
        assert_eq!(err, CorruptRecord::MissingKey("numbers"));
        let err = PersistedRecord::from_value(json!({ "numbers": [] })).unwrap_err();
        assert_eq!(err, CorruptRecord::MissingKey("count"));
    }

    #[test]
    fn numbers_not_list() {
        let err =
            PersistedRecord::from_value(json!({ "numbers": "13812345678", "count": 1 })).unwrap_err();
        assert_eq!(err, CorruptRecord::NumbersNotList);
    }

    #[test]
    fn count_not_integer() {
        for count in [json!("1"), json!(-1), json!(1.5), json!(null)] {
            let err = PersistedRecord::from_value(json!({ "numbers": ["13812345678"], "count": count }))
                .unwrap_err();
            assert_eq!(err, CorruptRecord::CountNotInteger);
        }
    }

    #[test]
    fn integral_float_count_is_accepted() {
        let r = PersistedRecord::from_value(json!({
            "numbers": ["13812345678", "15300000001"],
            "count": 2.0
        }))
        .unwrap();
        assert_eq!(r.count, 2);

        let err = PersistedRecord::from_value(json!({ "numbers": ["13812345678"], "count": 3.0 }))
            .unwrap_err();
        assert_eq!(
            err,
            CorruptRecord::CountMismatch {
                declared: 3,
                actual: 1
            }
        );
    }

    #[test]
    fn count_mismatch() {
        let err = PersistedRecord::from_value(json!({ "numbers": ["13812345678"], "count": 3 }))
            .unwrap_err();
        assert_eq!(
            err,
            CorruptRecord::CountMismatch {
                declared: 3,
                actual: 1
            }
        );
    }

    #[test]
    fn first_invalid_entry_is_reported() {
        let doc = json!({
            "numbers": ["13812345678", "12012345678", "1381234", 42],
            "count": 4
        });
        let err = PersistedRecord::from_value(doc).unwrap_err();
        assert_eq!(
            err,
            CorruptRecord::InvalidNumber {
                index: 2,
                value: "12012345678".into()
            }
        );
    }

    #[test]
    fn non_string_entry_is_invalid() {
        let err = PersistedRecord::from_value(json!({ "numbers": [13812345678_u64], "count": 1 }))
            .unwrap_err();
        assert_eq!(
            err,
            CorruptRecord::InvalidNumber {
                index: 1,
                value: "13812345678".into()
            }
        );
    }

    #[test]
    fn default_filename_embeds_timestamp() {
        assert_eq!(
            default_filename(sample_time(), "json"),
            "phone_numbers_20240309140507.json"
        );
        assert_eq!(
            default_filename(sample_time(), "txt"),
            "phone_numbers_20240309140507.txt"
        );
    }

    #[test]
    fn store_error_exposes_reason() {
        let err = StoreError::Corrupt {
            path: PathBuf::from("x.json"),
            reason: CorruptRecord::NotAMapping,
        };
        assert_eq!(err.corrupt_reason(), Some(&CorruptRecord::NotAMapping));
        assert!(err.to_string().contains("x.json"));
    }
}
