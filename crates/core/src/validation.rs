//! Field-level validation rules.
//!
//! Each check records a violation into a shared [`ValidationErrors`] instead of returning
//! early, so a record with several bad fields reports all of them.

use crate::constants::{AGE_EXCLUSIVE_MAX, AGE_EXCLUSIVE_MIN, NAME_MAX_CHARS, NAME_MIN_CHARS};
use crate::error::ValidationErrors;

/// Validates that a patient name is between [`NAME_MIN_CHARS`] and [`NAME_MAX_CHARS`]
/// characters once surrounding whitespace is ignored.
pub fn check_name(name: &str, errors: &mut ValidationErrors) {
    let len = name.trim().chars().count();
    if len == 0 {
        errors.push("name", "must not be empty");
    } else if len < NAME_MIN_CHARS {
        errors.push(
            "name",
            format!("must be at least {NAME_MIN_CHARS} characters"),
        );
    } else if len > NAME_MAX_CHARS {
        errors.push(
            "name",
            format!("must be at most {NAME_MAX_CHARS} characters"),
        );
    }
}

pub fn check_age(age: i64, errors: &mut ValidationErrors) {
    if age <= AGE_EXCLUSIVE_MIN {
        errors.push("age", format!("must be greater than {AGE_EXCLUSIVE_MIN}"));
    } else if age >= AGE_EXCLUSIVE_MAX {
        errors.push("age", format!("must be less than {AGE_EXCLUSIVE_MAX}"));
    }
}

/// Validates a strictly positive, finite measurement.
pub fn check_positive(field: &'static str, value: f64, errors: &mut ValidationErrors) {
    if !value.is_finite() {
        errors.push(field, "must be a finite number");
    } else if value <= 0.0 {
        errors.push(field, "must be greater than 0");
    }
}
