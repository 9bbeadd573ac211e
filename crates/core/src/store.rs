//! Persistence of the whole patient collection.
//!
//! Stores read and write the collection as one unit. There is no caching between calls: every
//! `load_all` goes back to the underlying resource.
//!
//! ## File layout
//!
//! ```text
//! {
//!   "P001": { "name": "...", "city": "...", "age": 28, "gender": "female",
//!             "height": 165.0, "weight": 90.0 },
//!   ...
//! }
//! ```

use crate::collection::{PatientCollection, WireCollection};
use crate::error::{RecordError, RecordResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use uuid::Uuid;

/// Backing storage for the patient collection.
pub trait PatientStore: Send + Sync {
    /// Reads the complete collection.
    ///
    /// # Errors
    /// Returns a storage error if the resource is missing, unreadable or corrupt.
    fn load_all(&self) -> RecordResult<PatientCollection>;

    /// Replaces the complete collection.
    ///
    /// # Errors
    /// Returns a storage error if the collection cannot be written.
    fn save_all(&self, collection: &PatientCollection) -> RecordResult<()>;
}

// Lets services hold a store chosen at runtime (`Box<dyn PatientStore>`).
impl<T: PatientStore + ?Sized> PatientStore for Box<T> {
    fn load_all(&self) -> RecordResult<PatientCollection> {
        (**self).load_all()
    }

    fn save_all(&self, collection: &PatientCollection) -> RecordResult<()> {
        (**self).save_all(collection)
    }
}

/// Collection stored as a single pretty-printed JSON file.
///
/// Saves write a temporary sibling file and rename it over the target, so a concurrent
/// reader sees either the old or the new collection, never a partial one.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Creates the data file holding `collection`.
    ///
    /// # Errors
    /// Returns [`RecordError::DataFileExists`] if the file exists and `overwrite` is false.
    pub fn initialise(&self, collection: &PatientCollection, overwrite: bool) -> RecordResult<()> {
        if self.exists() && !overwrite {
            return Err(RecordError::DataFileExists(self.path.clone()));
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(RecordError::FileWrite)?;
        }
        self.save_all(collection)
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "patients".into());
        self.path
            .with_file_name(format!(".{file_name}.{}.tmp", Uuid::new_v4().simple()))
    }
}

impl PatientStore for JsonFileStore {
    fn load_all(&self) -> RecordResult<PatientCollection> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(RecordError::MissingDataFile(self.path.clone()))
            }
            Err(e) => return Err(RecordError::FileRead(e)),
        };
        let wire: WireCollection =
            serde_json::from_str(&contents).map_err(RecordError::Deserialization)?;
        let collection = PatientCollection::from_wire(wire)?;

        tracing::debug!(
            "loaded {} patients from {}",
            collection.len(),
            self.path.display()
        );
        Ok(collection)
    }

    fn save_all(&self, collection: &PatientCollection) -> RecordResult<()> {
        let mut json = serde_json::to_string_pretty(&collection.to_wire())
            .map_err(RecordError::Serialization)?;
        json.push('\n');

        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, json) {
            let _ = fs::remove_file(&temp_path);
            return Err(RecordError::FileWrite(e));
        }
        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(RecordError::FileWrite(e));
        }

        tracing::debug!(
            "saved {} patients to {}",
            collection.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Collection held in process memory. Used by tests and by callers that don't need
/// durability.
///
/// The collection is kept in its wire form and revalidated on every load, so it behaves like
/// the file store apart from durability.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    wire: Mutex<WireCollection>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PatientStore for InMemoryStore {
    fn load_all(&self) -> RecordResult<PatientCollection> {
        let wire = self
            .wire
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        PatientCollection::from_wire(wire)
    }

    fn save_all(&self, collection: &PatientCollection) -> RecordResult<()> {
        *self.wire.lock().unwrap_or_else(PoisonError::into_inner) = collection.to_wire();
        Ok(())
    }
}
