//! Constants used throughout the records core crate.
//!
//! Field bounds, verdict thresholds and query vocabularies live here so the validation,
//! derivation and sorting code all agree on them.

/// Default patient data file when no explicit path is configured.
pub const DEFAULT_PATIENT_DATA_FILE: &str = "patients.json";

/// Minimum number of characters in a patient name (inclusive).
pub const NAME_MIN_CHARS: usize = 3;

/// Maximum number of characters in a patient name (inclusive).
pub const NAME_MAX_CHARS: usize = 50;

/// Ages must be strictly greater than this.
pub const AGE_EXCLUSIVE_MIN: i64 = 0;

/// Ages must be strictly less than this.
pub const AGE_EXCLUSIVE_MAX: i64 = 100;

/// BMI values below this are underweight.
pub const BMI_NORMAL_FROM: f64 = 18.5;

/// BMI values from this (inclusive) are overweight.
pub const BMI_OVERWEIGHT_FROM: f64 = 25.0;

/// BMI values from this (inclusive) are obese.
pub const BMI_OBESE_FROM: f64 = 30.0;

/// Fields accepted by the sorted listing.
pub const SORTABLE_FIELDS: [&str; 4] = ["age", "name", "height", "weight"];

/// Orders accepted by the sorted listing.
pub const SORT_ORDERS: [&str; 2] = ["asc", "desc"];
