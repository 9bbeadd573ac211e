//! Patient record operations.
//!
//! Every operation reloads the full collection from the store. Mutations follow
//! load → change → save while holding a process-wide write lock, so two concurrent writers
//! can no longer overwrite each other's changes. Reads never take the lock.

use crate::error::{RecordError, RecordResult};
use crate::patch::{merge_update, PatientPatch};
use crate::patient::{NewPatient, PatientRecord};
use crate::query::{sorted_view, SortField, SortOrder};
use crate::store::PatientStore;
use crate::PatientCollection;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Pure patient data operations - no API concerns
pub struct PatientService<S> {
    store: Arc<S>,
    write_lock: Arc<Mutex<()>>,
}

// Manual impl: cloning shares the store and the lock, so `S` itself needn't be `Clone`.
impl<S> Clone for PatientService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            write_lock: Arc::clone(&self.write_lock),
        }
    }
}

impl<S: PatientStore> PatientService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // The guarded value is `()`, so a poisoned lock carries no broken state.
    fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Lists all patient records, in ascending id order.
    pub fn list_patients(&self) -> RecordResult<PatientCollection> {
        self.store.load_all()
    }

    /// Fetches a single patient.
    ///
    /// # Errors
    /// Returns [`RecordError::NotFound`] if no record has this id.
    pub fn get_patient(&self, id: &str) -> RecordResult<PatientRecord> {
        self.store
            .load_all()?
            .get(id)
            .cloned()
            .ok_or_else(|| RecordError::NotFound(id.to_string()))
    }

    /// Lists patients ordered by `sort_by` in `order`.
    ///
    /// Both parameters are checked before the store is touched.
    ///
    /// # Errors
    /// Returns [`RecordError::InvalidArgument`] for an unknown field or order.
    pub fn sorted_patients(&self, sort_by: &str, order: &str) -> RecordResult<Vec<PatientRecord>> {
        let field: SortField = sort_by.parse()?;
        let order: SortOrder = order.parse()?;

        let collection = self.store.load_all()?;
        Ok(sorted_view(&collection, field, order)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Creates a new patient.
    ///
    /// The request is validated before the collection is loaded, so a request that is both
    /// invalid and a duplicate reports the validation failure.
    ///
    /// # Errors
    /// Returns [`RecordError::Validation`] for constraint violations and
    /// [`RecordError::Duplicate`] if the id is taken.
    pub fn create_patient(&self, new: NewPatient) -> RecordResult<PatientRecord> {
        let record = PatientRecord::from_new(new)?;

        let _guard = self.lock_writes();
        let mut collection = self.store.load_all()?;
        if collection.contains(record.id().as_str()) {
            return Err(RecordError::Duplicate(record.id().to_string()));
        }
        collection.insert(record.clone());
        self.store.save_all(&collection)?;

        tracing::info!("created patient {}", record.id());
        Ok(record)
    }

    /// Applies a sparse patch to an existing patient.
    ///
    /// # Errors
    /// Returns [`RecordError::NotFound`] before merging if the id is unknown, and
    /// [`RecordError::Validation`] if the merged record breaks a constraint. Nothing is
    /// written in either case.
    pub fn update_patient(&self, id: &str, patch: PatientPatch) -> RecordResult<PatientRecord> {
        let _guard = self.lock_writes();
        let mut collection = self.store.load_all()?;
        let existing = collection
            .get(id)
            .ok_or_else(|| RecordError::NotFound(id.to_string()))?;

        let provided = patch.provided_fields();
        let updated = merge_update(existing, patch)?;
        collection.insert(updated.clone());
        self.store.save_all(&collection)?;

        tracing::info!("updated patient {} (fields: {:?})", id, provided);
        Ok(updated)
    }

    /// Removes a patient.
    ///
    /// # Errors
    /// Returns [`RecordError::NotFound`] if the id is unknown.
    pub fn delete_patient(&self, id: &str) -> RecordResult<PatientRecord> {
        let _guard = self.lock_writes();
        let mut collection = self.store.load_all()?;
        let removed = collection
            .remove(id)
            .ok_or_else(|| RecordError::NotFound(id.to_string()))?;
        self.store.save_all(&collection)?;

        tracing::info!("deleted patient {}", id);
        Ok(removed)
    }
}
