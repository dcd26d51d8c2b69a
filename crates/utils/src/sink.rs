use models::{ReportFamily, Settings};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

use crate::database::{append_document, collection_path, ensure_database_dir};

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Cannot append to {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Record is not serializable: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Record did not serialize to a JSON object")]
    NotAnObject,

    #[error("Sink lock poisoned")]
    Poisoned,
}

/// Append-only write target, one logical collection per report family.
///
/// Implementations must accept concurrent appends from independent ingestion runs.
pub trait RecordSink: Send + Sync {
    fn append(&self, family: ReportFamily, fields: Map<String, Value>) -> Result<(), SinkError>;
}

/// Flattens a record into the field bag handed to a sink.
pub fn fields_of<T: Serialize>(record: &T) -> Result<Map<String, Value>, SinkError> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        _ => Err(SinkError::NotAnObject),
    }
}

/// Keeps appended records in memory. Used for dry runs and tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<(ReportFamily, Map<String, Value>)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies of the records appended so far for one family, in append order.
    pub fn records(&self, family: ReportFamily) -> Vec<Map<String, Value>> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(f, _)| *f == family)
            .map(|(_, fields)| fields.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RecordSink for MemorySink {
    fn append(&self, family: ReportFamily, fields: Map<String, Value>) -> Result<(), SinkError> {
        let mut guard = self.records.lock().map_err(|_| SinkError::Poisoned)?;
        guard.push((family, fields));
        Ok(())
    }
}

/// Writes each family to its own JSON-lines collection file inside the database directory.
pub struct CollectionFileSink {
    remainders: PathBuf,
    turnovers: PathBuf,
    // Appends from concurrent runs in this process must not interleave within a line.
    write_lock: Mutex<()>,
}

impl CollectionFileSink {
    pub fn new(
        database_dir: impl Into<PathBuf>,
        remainder_collection: &str,
        turnover_collection: &str,
    ) -> anyhow::Result<Self> {
        let dir = ensure_database_dir(database_dir.into())?;
        Ok(Self {
            remainders: collection_path(&dir, remainder_collection),
            turnovers: collection_path(&dir, turnover_collection),
            write_lock: Mutex::new(()),
        })
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        Self::new(
            settings.database_dir.clone(),
            &settings.remainder_collection,
            &settings.turnover_collection,
        )
    }

    pub fn path_for(&self, family: ReportFamily) -> &PathBuf {
        match family {
            ReportFamily::Remainder => &self.remainders,
            ReportFamily::Turnover => &self.turnovers,
        }
    }
}

impl RecordSink for CollectionFileSink {
    fn append(&self, family: ReportFamily, fields: Map<String, Value>) -> Result<(), SinkError> {
        let path = self.path_for(family);
        let _guard = self.write_lock.lock().map_err(|_| SinkError::Poisoned)?;
        append_document(path, &fields).map_err(|source| SinkError::Io {
            path: path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::read_collection;
    use serde_json::json;

    #[derive(Serialize)]
    struct Row {
        name: &'static str,
        count: f64,
    }

    #[test]
    fn test_fields_of_struct() {
        let fields = fields_of(&Row { name: "bolt", count: f64::NAN }).unwrap();
        assert_eq!(fields["name"], json!("bolt"));
        // NaN has no JSON form and is stored as null
        assert_eq!(fields["count"], Value::Null);
    }

    #[test]
    fn test_fields_of_non_object_fails() {
        assert!(matches!(fields_of(&42), Err(SinkError::NotAnObject)));
    }

    #[test]
    fn test_memory_sink_keeps_families_apart() {
        let sink = MemorySink::new();
        let fields = json!({"product_name": "bolt"}).as_object().unwrap().clone();
        sink.append(ReportFamily::Remainder, fields.clone()).unwrap();
        sink.append(ReportFamily::Turnover, fields).unwrap();
        sink.append(
            ReportFamily::Remainder,
            json!({"product_name": "nut"}).as_object().unwrap().clone(),
        )
        .unwrap();

        assert_eq!(sink.len(), 3);
        let remainders = sink.records(ReportFamily::Remainder);
        assert_eq!(remainders.len(), 2);
        assert_eq!(remainders[1]["product_name"], json!("nut"));
        assert_eq!(sink.records(ReportFamily::Turnover).len(), 1);
    }

    #[test]
    fn test_memory_sink_reads_survive_poisoned_lock() {
        let sink = MemorySink::new();
        sink.append(
            ReportFamily::Remainder,
            json!({"product_name": "bolt"}).as_object().unwrap().clone(),
        )
        .unwrap();

        let poisoned = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = sink.records.lock().unwrap();
            panic!("writer died while holding the lock");
        }));
        assert!(poisoned.is_err());

        assert_eq!(sink.len(), 1);
        assert_eq!(sink.records(ReportFamily::Remainder).len(), 1);
        assert!(matches!(
            sink.append(ReportFamily::Remainder, Map::new()),
            Err(SinkError::Poisoned)
        ));
    }

    #[test]
    fn test_collection_file_sink_appends_per_family() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CollectionFileSink::new(dir.path().join("db"), "rem", "turn").unwrap();

        let fields = json!({"product_name": "bolt", "account_code": 21})
            .as_object()
            .unwrap()
            .clone();
        sink.append(ReportFamily::Remainder, fields.clone()).unwrap();
        sink.append(ReportFamily::Remainder, fields).unwrap();

        let rem = read_collection(sink.path_for(ReportFamily::Remainder)).unwrap();
        let turn = read_collection(sink.path_for(ReportFamily::Turnover)).unwrap();
        assert_eq!(rem.len(), 2);
        assert!(turn.is_empty());
        assert!(sink
            .path_for(ReportFamily::Remainder)
            .ends_with("rem.jsonl"));
    }

    #[test]
    fn test_collection_file_sink_concurrent_appends() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CollectionFileSink::new(dir.path(), "remainders", "turnovers").unwrap();

        std::thread::scope(|scope| {
            for worker in 0..4 {
                let sink = &sink;
                scope.spawn(move || {
                    for i in 0..25 {
                        let fields = json!({"worker": worker, "row": i})
                            .as_object()
                            .unwrap()
                            .clone();
                        sink.append(ReportFamily::Turnover, fields).unwrap();
                    }
                });
            }
        });

        let docs = read_collection(sink.path_for(ReportFamily::Turnover)).unwrap();
        assert_eq!(docs.len(), 100);
    }
}
