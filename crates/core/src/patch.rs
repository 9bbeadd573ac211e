//! Sparse updates to an existing patient.
//!
//! Each patch field is tri-state: absent from the body, explicitly `null`, or carrying a value.
//! Only values overwrite; absent and `null` fields keep what the record already had. The
//! merged result is validated as a whole before anything is stored.

use crate::error::ValidationErrors;
use crate::patient::{Gender, PatientRecord};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use utoipa::ToSchema;

/// One field of a sparse patch.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum PatchField<T> {
    /// The key was not in the body.
    #[default]
    Absent,
    /// The key was present with a `null` value.
    Null,
    Value(T),
}

impl<T> PatchField<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, PatchField::Absent)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            PatchField::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Overwrites `target` only when a value was supplied.
    pub fn apply_to(self, target: &mut T) {
        if let PatchField::Value(v) = self {
            *target = v;
        }
    }
}

// Absent and null both serialize as `null`; used for schema defaults.
impl<T: Serialize> Serialize for PatchField<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.value().serialize(serializer)
    }
}

// Only called when the key is present; `#[serde(default)]` covers the absent case.
impl<'de, T> Deserialize<'de> for PatchField<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => PatchField::Value(v),
            None => PatchField::Null,
        })
    }
}

/// Request body for a partial update. Every field is optional; the id comes from the path.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, ToSchema)]
#[serde(default, deny_unknown_fields)]
pub struct PatientPatch {
    #[schema(value_type = Option<String>, example = "John Doe")]
    pub name: PatchField<String>,
    #[schema(value_type = Option<String>, example = "New York")]
    pub city: PatchField<String>,
    #[schema(value_type = Option<i64>, example = 31)]
    pub age: PatchField<i64>,
    #[schema(value_type = Option<Gender>)]
    pub gender: PatchField<Gender>,
    #[schema(value_type = Option<f64>, example = 176.0)]
    pub height: PatchField<f64>,
    #[schema(value_type = Option<f64>, example = 80.0)]
    pub weight: PatchField<f64>,
}

impl PatientPatch {
    /// Names of the fields that carry a value.
    pub fn provided_fields(&self) -> Vec<&'static str> {
        let mut provided = Vec::new();
        if self.name.value().is_some() {
            provided.push("name");
        }
        if self.city.value().is_some() {
            provided.push("city");
        }
        if self.age.value().is_some() {
            provided.push("age");
        }
        if self.gender.value().is_some() {
            provided.push("gender");
        }
        if self.height.value().is_some() {
            provided.push("height");
        }
        if self.weight.value().is_some() {
            provided.push("weight");
        }
        provided
    }
}

/// Applies `patch` to a copy of `existing` and validates the result.
///
/// `existing` is never modified, so a failed merge leaves the caller's record intact.
pub fn merge_update(
    existing: &PatientRecord,
    patch: PatientPatch,
) -> Result<PatientRecord, ValidationErrors> {
    let (id, mut fields) = existing.clone().into_parts();

    patch.name.apply_to(&mut fields.name);
    patch.city.apply_to(&mut fields.city);
    patch.age.apply_to(&mut fields.age);
    patch.gender.apply_to(&mut fields.gender);
    patch.height.apply_to(&mut fields.height);
    patch.weight.apply_to(&mut fields.weight);

    PatientRecord::validate(id, fields)
}
