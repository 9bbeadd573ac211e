//! # Records Core
//!
//! Core business logic for the patient records service.
//!
//! This crate contains pure data operations and persistence:
//! - The patient record model, its constraints and the derived BMI/verdict
//! - Sparse (partial) updates with merge-then-revalidate semantics
//! - Sorted listings
//! - Whole-collection storage behind the [`PatientStore`] trait (JSON file or in-memory)
//!
//! **No API concerns**: HTTP servers, status codes and response shaping belong in `api-rest`
//! or `api-shared`.

pub mod collection;
pub mod config;
pub mod constants;
pub mod error;
pub mod patch;
pub mod patient;
pub mod query;
pub mod service;
pub mod store;
pub mod validation;

pub use collection::{PatientCollection, WireCollection};
pub use config::{data_file_from_env_value, CoreConfig};
pub use constants::DEFAULT_PATIENT_DATA_FILE;
pub use error::{FieldViolation, RecordError, RecordResult, ValidationErrors};
pub use patch::{merge_update, PatchField, PatientPatch};
pub use patient::{
    compute_bmi, compute_verdict, Gender, NewPatient, PatientFields, PatientRecord, Verdict,
};
pub use query::{sorted_view, SortField, SortOrder};
pub use service::PatientService;
pub use store::{InMemoryStore, JsonFileStore, PatientStore};

// Re-export the id newtype used throughout the public API.
pub use records_types::{IdError, PatientId};
