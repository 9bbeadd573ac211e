//! The full set of patient records, keyed by id.
//!
//! Iteration is in ascending id order. Persistence always goes through
//! [`PatientCollection::from_wire`] and [`PatientCollection::to_wire`], so a record that
//! violates its constraints can never be loaded into, or written out of, a collection.

use crate::error::{RecordError, RecordResult, ValidationErrors};
use crate::patient::{PatientFields, PatientRecord};
use records_types::PatientId;
use std::collections::BTreeMap;

/// On-disk shape: id → fields, with the id only present as the key.
pub type WireCollection = BTreeMap<String, PatientFields>;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PatientCollection {
    records: BTreeMap<PatientId, PatientRecord>,
}

impl PatientCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates every stored entry.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::CorruptRecord`] for a key that is not a valid id in canonical
    /// (trimmed) form, for two keys naming the same id, or for fields that break a
    /// constraint.
    pub fn from_wire(wire: WireCollection) -> RecordResult<Self> {
        let mut records = BTreeMap::new();
        for (raw_id, fields) in wire {
            let id = PatientId::new(&raw_id).map_err(|e| corrupt_key(&raw_id, e.to_string()))?;
            // Keys are stored verbatim; a key that only becomes valid after trimming would be
            // rewritten on the next save.
            if id.as_str() != raw_id {
                return Err(corrupt_key(
                    &raw_id,
                    "must not have leading or trailing whitespace",
                ));
            }
            let record = PatientRecord::validate(id.clone(), fields).map_err(|source| {
                RecordError::CorruptRecord {
                    id: raw_id.clone(),
                    source,
                }
            })?;
            if records.insert(id, record).is_some() {
                return Err(corrupt_key(&raw_id, "duplicates another stored id"));
            }
        }
        Ok(Self { records })
    }

    pub fn to_wire(&self) -> WireCollection {
        self.records
            .iter()
            .map(|(id, record)| (id.to_string(), record.fields().clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&PatientRecord> {
        self.records.get(id)
    }

    /// Inserts or replaces the record under its own id, returning the previous one.
    pub fn insert(&mut self, record: PatientRecord) -> Option<PatientRecord> {
        self.records.insert(record.id().clone(), record)
    }

    pub fn remove(&mut self, id: &str) -> Option<PatientRecord> {
        self.records.remove(id)
    }

    pub fn records(&self) -> impl Iterator<Item = &PatientRecord> {
        self.records.values()
    }
}

fn corrupt_key(raw_id: &str, message: impl Into<String>) -> RecordError {
    let mut source = ValidationErrors::new();
    source.push("id", message);
    RecordError::CorruptRecord {
        id: raw_id.to_string(),
        source,
    }
}

impl FromIterator<PatientRecord> for PatientCollection {
    fn from_iter<I: IntoIterator<Item = PatientRecord>>(iter: I) -> Self {
        let mut collection = Self::new();
        for record in iter {
            collection.insert(record);
        }
        collection
    }
}
