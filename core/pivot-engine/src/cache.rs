//! FILENAME: core/pivot-engine/src/cache.rs
//! Pivot Cache - Internal representation used while aggregating.
//!
//! The cache is designed for:
//! - A single O(n) scan over the source records
//! - Deterministic, first-seen ordering of buckets (no reliance on hash order)
//! - Storing each distinct bucket key once and referencing it by id
//!
//! Architecture:
//! - Each distinct key text is interned and referenced by a `KeyId`
//! - Accumulators are keyed by (row bucket, column bucket) pairs

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use dataset::{key_text, Record};

use crate::definition::{AggregationType, KEY_SEPARATOR};

// ============================================================================
// KEY INTERNING
// ============================================================================

/// A reference to an interned key within a [`KeyCache`].
pub type KeyId = u32;

/// Interns bucket key texts, handing out ids in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct KeyCache {
    /// Map from key text to its id (for deduplication during the scan).
    key_to_id: FxHashMap<String, KeyId>,

    /// Key texts indexed by id, in first-seen order.
    id_to_key: Vec<String>,
}

impl KeyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a key and returns its id plus whether it was seen for the first time.
    pub fn intern(&mut self, key: String) -> (KeyId, bool) {
        if let Some(&id) = self.key_to_id.get(&key) {
            return (id, false);
        }

        let id = self.id_to_key.len() as KeyId;
        self.id_to_key.push(key.clone());
        self.key_to_id.insert(key, id);
        (id, true)
    }

    /// Gets the key text for a given id.
    pub fn get(&self, id: KeyId) -> Option<&str> {
        self.id_to_key.get(id as usize).map(String::as_str)
    }

    /// All interned keys in first-seen order.
    pub fn keys(&self) -> &[String] {
        &self.id_to_key
    }

    pub fn len(&self) -> usize {
        self.id_to_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_key.is_empty()
    }

    /// Consumes the cache, returning keys in first-seen order.
    pub fn into_keys(self) -> Vec<String> {
        self.id_to_key
    }
}

/// Builds the key text of `record` over `fields`: each field's key text
/// (missing/null -> "N/A") joined with [`KEY_SEPARATOR`].
pub fn build_key_text(record: &Record, fields: &[String]) -> String {
    let mut key = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            key.push_str(KEY_SEPARATOR);
        }
        key.push_str(&key_text(record.get(field.as_str())));
    }
    key
}

// ============================================================================
// GROUP KEY
// ============================================================================

/// A (row bucket, column bucket) pair used to look up accumulators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupKey {
    pub row: KeyId,
    pub column: KeyId,
}

impl GroupKey {
    pub fn new(row: KeyId, column: KeyId) -> Self {
        GroupKey { row, column }
    }
}

// ============================================================================
// AGGREGATE ACCUMULATOR
// ============================================================================

/// Accumulator for computing aggregates incrementally.
/// Only numeric values are ever added; non-numbers are excluded by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateAccumulator {
    pub sum: f64,
    pub count: u64,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl AggregateAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a numeric value to the accumulator.
    pub fn add_number(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.min = Some(self.min.map_or(value, |m| m.min(value)));
        self.max = Some(self.max.map_or(value, |m| m.max(value)));
    }

    /// Computes the final aggregate value. Empty accumulators yield 0.
    pub fn compute(&self, aggregation: AggregationType) -> f64 {
        match aggregation {
            AggregationType::Sum => self.sum,
            AggregationType::Count => self.count as f64,
            AggregationType::Average => {
                if self.count > 0 {
                    self.sum / (self.count as f64)
                } else {
                    0.0
                }
            }
            AggregationType::Min => self.min.unwrap_or(0.0),
            AggregationType::Max => self.max.unwrap_or(0.0),
        }
    }

    /// Merges another accumulator into this one.
    pub fn merge(&mut self, other: &AggregateAccumulator) {
        if other.count == 0 {
            return;
        }

        self.sum += other.sum;
        self.count += other.count;

        if let Some(other_min) = other.min {
            self.min = Some(self.min.map_or(other_min, |m| m.min(other_min)));
        }
        if let Some(other_max) = other.max {
            self.max = Some(self.max.map_or(other_max, |m| m.max(other_max)));
        }
    }
}
