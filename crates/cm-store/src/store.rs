//! JSON-file long-term memory store.
//!
//! One file per agent holding an array of wire records. Loads are lenient:
//! a corrupt file or record costs that data, never the process. Writes go
//! through a sibling temp file and rename so a crash mid-save cannot
//! truncate the store. Writers are not coordinated beyond that: concurrent
//! saves read-modify-write the whole file and the last rename wins.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::warn;
use uuid::Uuid;

use cm_core::constants::LTM_CAPACITY;
use cm_core::{MemoryRecord, ThoughtVector, WireRecord, apply_capacity, rank};

use crate::error::Result;

pub struct MemoryStore {
    path: PathBuf,
    capacity: usize,
}

impl MemoryStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::with_capacity(path, LTM_CAPACITY)
    }

    pub fn with_capacity(path: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            path: path.into(),
            capacity,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // --- Load ---

    /// All records currently on disk. A missing file is an empty store;
    /// undecodable content is dropped with a warning instead of failing.
    pub fn load(&self) -> Result<Vec<MemoryRecord>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let values: Vec<serde_json::Value> = match serde_json::from_str(&content) {
            Ok(values) => values,
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "memory file unreadable, starting empty"
                );
                return Ok(Vec::new());
            }
        };

        let mut records = Vec::with_capacity(values.len());
        for value in values {
            let decoded = serde_json::from_value::<WireRecord>(value)
                .ok()
                .and_then(WireRecord::into_record);
            match decoded {
                Some(record) => records.push(record),
                None => warn!(
                    path = %self.path.display(),
                    "dropping undecodable memory record"
                ),
            }
        }
        Ok(records)
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.load()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.load()?.is_empty())
    }

    // --- Save ---

    /// Append one memory and persist, evicting the least important records
    /// once the store exceeds capacity. Returns the new record's id.
    pub fn save(
        &self,
        vector: ThoughtVector,
        user_input: &str,
        response: &str,
        importance: f64,
    ) -> Result<Uuid> {
        let mut records = self.load()?;
        let record = MemoryRecord::new(vector, user_input, response, importance);
        let id = record.id;
        records.push(record);
        apply_capacity(&mut records, self.capacity);
        self.write_records(&records)?;
        Ok(id)
    }

    fn write_records(&self, records: &[MemoryRecord]) -> Result<()> {
        let wire: Vec<WireRecord> = records.iter().map(WireRecord::from_record).collect();
        let json = serde_json::to_string_pretty(&wire)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    // --- Recall ---

    /// Rank stored memories against a query vector.
    pub fn recall(
        &self,
        query: &ThoughtVector,
        top_k: usize,
        threshold: f32,
    ) -> Result<Vec<(MemoryRecord, f32)>> {
        Ok(rank(self.load()?, query, top_k, threshold))
    }

    // --- Forget ---

    /// Remove the whole store. Already-missing is fine.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
