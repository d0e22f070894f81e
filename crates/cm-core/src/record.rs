//! Long-term memory records, their wire form, and capacity eviction.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::time;
use crate::vector::ThoughtVector;

/// One persisted memory: what was said, the thought it projected to, and
/// how much it matters. Immutable once created.
#[derive(Debug, Clone)]
pub struct MemoryRecord {
    pub id: Uuid,
    pub timestamp: String,
    pub user_input: String,
    pub response: String,
    pub vector: ThoughtVector,
    pub importance: f64,
}

impl MemoryRecord {
    /// Fresh record with a v4 id and the current UTC timestamp.
    /// Importance is clamped into [0, 1].
    pub fn new(
        vector: ThoughtVector,
        user_input: impl Into<String>,
        response: impl Into<String>,
        importance: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: time::now_iso8601(),
            user_input: user_input.into(),
            response: response.into(),
            vector,
            importance: importance.clamp(0.0, 1.0),
        }
    }
}

/// On-disk shape of a record. The vector travels as base64 of its raw
/// little-endian f32 buffer so the store stays readable as plain JSON.
#[derive(Debug, Serialize, Deserialize)]
pub struct WireRecord {
    pub id: String,
    pub timestamp: String,
    pub user_input: String,
    pub response: String,
    pub vector: String,
    #[serde(default)]
    pub importance: f64,
}

impl WireRecord {
    pub fn from_record(record: &MemoryRecord) -> Self {
        Self {
            id: record.id.to_string(),
            timestamp: record.timestamp.clone(),
            user_input: record.user_input.clone(),
            response: record.response.clone(),
            vector: record.vector.to_base64(),
            importance: record.importance,
        }
    }

    /// Decode into the domain type. None when the id or the vector does
    /// not parse; one bad record never poisons the rest of the store.
    pub fn into_record(self) -> Option<MemoryRecord> {
        let id = Uuid::parse_str(&self.id).ok()?;
        let vector = ThoughtVector::from_base64(&self.vector)?;
        Some(MemoryRecord {
            id,
            timestamp: self.timestamp,
            user_input: self.user_input,
            response: self.response,
            vector,
            importance: self.importance,
        })
    }
}

/// Evict down to `capacity`: sort ascending by (importance, timestamp) and
/// keep the tail, so the least important — oldest first among ties — go
/// first. ISO-8601 timestamps compare chronologically as strings.
pub fn apply_capacity(records: &mut Vec<MemoryRecord>, capacity: usize) {
    if records.len() <= capacity {
        return;
    }
    records.sort_by(|a, b| {
        a.importance
            .total_cmp(&b.importance)
            .then_with(|| a.timestamp.cmp(&b.timestamp))
    });
    let excess = records.len() - capacity;
    records.drain(..excess);
}
