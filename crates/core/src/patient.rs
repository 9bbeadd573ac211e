//! Patient record model and derived fields.
//!
//! A record is made of canonical fields (what is stored) plus two derived values, `bmi` and
//! `verdict`, which are recomputed from height and weight every time they are read and are
//! never persisted.

use crate::constants::{BMI_NORMAL_FROM, BMI_OBESE_FROM, BMI_OVERWEIGHT_FROM};
use crate::error::ValidationErrors;
use crate::validation::{check_age, check_name, check_positive};
use api_shared::PatientRes;
use records_types::PatientId;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weight-status category derived from BMI.
///
/// Variants are declared in increasing BMI order, so the derived `Ord` follows the bands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verdict {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl Verdict {
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Underweight => "Underweight",
            Verdict::Normal => "Normal",
            Verdict::Overweight => "Overweight",
            Verdict::Obese => "Obese",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body mass index for a height in centimetres and a weight in kilograms.
///
/// The result is rounded to two decimal places, half away from zero.
pub fn compute_bmi(height: f64, weight: f64) -> f64 {
    let bmi = weight / (height / 100.0).powi(2);
    (bmi * 100.0).round() / 100.0
}

/// Maps a BMI onto its band. The bands are half-open and contiguous:
/// `[0, 18.5)`, `[18.5, 25)`, `[25, 30)`, `[30, ∞)`.
pub fn compute_verdict(bmi: f64) -> Verdict {
    if bmi < BMI_NORMAL_FROM {
        Verdict::Underweight
    } else if bmi < BMI_OVERWEIGHT_FROM {
        Verdict::Normal
    } else if bmi < BMI_OBESE_FROM {
        Verdict::Overweight
    } else {
        Verdict::Obese
    }
}

/// Canonical, not yet validated patient fields.
///
/// This is also the value form in the data file, where the id is the map key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatientFields {
    pub name: String,
    pub city: String,
    pub age: i64,
    pub gender: Gender,
    /// Height in centimetres.
    pub height: f64,
    /// Weight in kilograms.
    pub weight: f64,
}

impl PatientFields {
    /// Records every constraint violation into `errors`.
    pub fn check(&self, errors: &mut ValidationErrors) {
        check_name(&self.name, errors);
        check_age(self.age, errors);
        check_positive("height", self.height, errors);
        check_positive("weight", self.weight, errors);
    }

    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        self.check(&mut errors);
        errors
    }
}

/// Request body for creating a patient.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct NewPatient {
    #[schema(example = "P006")]
    pub id: String,
    #[schema(example = "John Doe")]
    pub name: String,
    #[schema(example = "New York")]
    pub city: String,
    #[schema(example = 30)]
    pub age: i64,
    pub gender: Gender,
    /// Height in centimetres.
    #[schema(example = 175.5)]
    pub height: f64,
    /// Weight in kilograms.
    #[schema(example = 70.0)]
    pub weight: f64,
}

impl NewPatient {
    pub fn into_parts(self) -> (String, PatientFields) {
        (
            self.id,
            PatientFields {
                name: self.name,
                city: self.city,
                age: self.age,
                gender: self.gender,
                height: self.height,
                weight: self.weight,
            },
        )
    }
}

/// A patient record whose fields satisfy every constraint.
///
/// The only ways to obtain one are [`PatientRecord::validate`] and
/// [`PatientRecord::from_new`].
#[derive(Clone, Debug, PartialEq)]
pub struct PatientRecord {
    id: PatientId,
    fields: PatientFields,
}

impl PatientRecord {
    pub fn validate(id: PatientId, fields: PatientFields) -> Result<Self, ValidationErrors> {
        fields.validate().into_result(Self { id, fields })
    }

    /// Validates a create request, including its id.
    pub fn from_new(new: NewPatient) -> Result<Self, ValidationErrors> {
        let (raw_id, fields) = new.into_parts();
        let mut errors = ValidationErrors::new();

        let id = match PatientId::new(&raw_id) {
            Ok(id) => Some(id),
            Err(e) => {
                errors.push("id", e.to_string());
                None
            }
        };
        fields.check(&mut errors);

        match id {
            Some(id) if errors.is_empty() => Ok(Self { id, fields }),
            _ => Err(errors),
        }
    }

    pub fn id(&self) -> &PatientId {
        &self.id
    }

    pub fn fields(&self) -> &PatientFields {
        &self.fields
    }

    pub fn name(&self) -> &str {
        &self.fields.name
    }

    pub fn city(&self) -> &str {
        &self.fields.city
    }

    pub fn age(&self) -> i64 {
        self.fields.age
    }

    pub fn gender(&self) -> Gender {
        self.fields.gender
    }

    pub fn height(&self) -> f64 {
        self.fields.height
    }

    pub fn weight(&self) -> f64 {
        self.fields.weight
    }

    pub fn bmi(&self) -> f64 {
        compute_bmi(self.fields.height, self.fields.weight)
    }

    pub fn verdict(&self) -> Verdict {
        compute_verdict(self.bmi())
    }

    pub fn into_parts(self) -> (PatientId, PatientFields) {
        (self.id, self.fields)
    }
}

impl From<&PatientRecord> for PatientRes {
    fn from(record: &PatientRecord) -> Self {
        let bmi = record.bmi();
        PatientRes {
            id: record.id.to_string(),
            name: record.fields.name.clone(),
            city: record.fields.city.clone(),
            age: record.fields.age,
            gender: record.fields.gender.to_string(),
            height: record.fields.height,
            weight: record.fields.weight,
            bmi,
            verdict: compute_verdict(bmi).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fields() -> PatientFields {
        PatientFields {
            name: "Ananya Verma".into(),
            city: "Guwahati".into(),
            age: 28,
            gender: Gender::Female,
            height: 165.0,
            weight: 90.0,
        }
    }

    fn new_patient() -> NewPatient {
        NewPatient {
            id: "P001".into(),
            name: "Ananya Verma".into(),
            city: "Guwahati".into(),
            age: 28,
            gender: Gender::Female,
            height: 165.0,
            weight: 90.0,
        }
    }

    #[test]
    fn test_compute_bmi_known_values() {
        assert_eq!(compute_bmi(165.0, 90.0), 33.06);
        assert_eq!(compute_bmi(175.5, 70.0), 22.73);
        assert_eq!(compute_bmi(200.0, 80.0), 20.0);
    }

    #[test]
    fn test_compute_verdict_band_edges() {
        assert_eq!(compute_verdict(0.0), Verdict::Underweight);
        assert_eq!(compute_verdict(18.49), Verdict::Underweight);
        assert_eq!(compute_verdict(18.5), Verdict::Normal);
        assert_eq!(compute_verdict(24.9), Verdict::Normal);
        assert_eq!(compute_verdict(24.95), Verdict::Normal);
        assert_eq!(compute_verdict(24.99), Verdict::Normal);
        assert_eq!(compute_verdict(25.0), Verdict::Overweight);
        assert_eq!(compute_verdict(29.9), Verdict::Overweight);
        assert_eq!(compute_verdict(29.95), Verdict::Overweight);
        assert_eq!(compute_verdict(30.0), Verdict::Obese);
        assert_eq!(compute_verdict(55.0), Verdict::Obese);
    }

    #[test]
    fn test_compute_verdict_steps_through_every_band_in_order() {
        // Walk every two-decimal BMI; the verdict must never go backwards and must visit each
        // band, which rules out holes between thresholds.
        let mut seen = vec![compute_verdict(0.0)];
        for hundredths in 1..=6000u32 {
            let verdict = compute_verdict(f64::from(hundredths) / 100.0);
            let last = *seen.last().expect("seen is never empty");
            assert!(verdict >= last, "verdict regressed at {hundredths}");
            if verdict != last {
                seen.push(verdict);
            }
        }
        assert_eq!(
            seen,
            vec![
                Verdict::Underweight,
                Verdict::Normal,
                Verdict::Overweight,
                Verdict::Obese
            ]
        );
    }

    #[test]
    fn test_validate_accepts_valid_fields() {
        let record = PatientRecord::validate(PatientId::new("P001").unwrap(), fields())
            .expect("valid fields should pass");
        assert_eq!(record.id().as_str(), "P001");
        assert_eq!(record.bmi(), 33.06);
        assert_eq!(record.verdict(), Verdict::Obese);
    }

    #[test]
    fn test_validate_reports_every_violation() {
        let mut bad = fields();
        bad.name = "Al".into();
        bad.age = 0;
        bad.height = -1.0;
        bad.weight = 0.0;

        let errors = PatientRecord::validate(PatientId::new("P001").unwrap(), bad)
            .expect_err("invalid fields should fail");
        assert_eq!(errors.fields(), vec!["name", "age", "height", "weight"]);
    }

    #[test]
    fn test_from_new_reports_id_alongside_field_errors() {
        let mut new = new_patient();
        new.id = "  ".into();
        new.age = 120;

        let errors = PatientRecord::from_new(new).expect_err("should fail");
        assert_eq!(errors.fields(), vec!["id", "age"]);
    }

    #[test]
    fn test_new_patient_rejects_derived_fields_in_body() {
        let body = serde_json::json!({
            "id": "P001", "name": "Ananya Verma", "city": "Guwahati", "age": 28,
            "gender": "female", "height": 165.0, "weight": 90.0, "bmi": 12.0
        });
        let err = serde_json::from_value::<NewPatient>(body).expect_err("bmi is not an input");
        assert!(err.to_string().contains("bmi"));
    }

    #[test]
    fn test_gender_rejects_unknown_value() {
        assert!(serde_json::from_str::<Gender>("\"unknown\"").is_err());
        assert_eq!(
            serde_json::from_str::<Gender>("\"other\"").unwrap(),
            Gender::Other
        );
    }

    #[test]
    fn test_patient_res_carries_derived_fields() {
        let record = PatientRecord::from_new(new_patient()).expect("valid record");
        let res = PatientRes::from(&record);
        assert_eq!(res.id, "P001");
        assert_eq!(res.gender, "female");
        assert_eq!(res.bmi, 33.06);
        assert_eq!(res.verdict, "Obese");
    }

    proptest! {
        #[test]
        fn prop_bmi_matches_rounded_formula(height in 0.5f64..300.0, weight in 0.5f64..500.0) {
            let expected = (weight / (height / 100.0).powi(2) * 100.0).round() / 100.0;
            prop_assert_eq!(compute_bmi(height, weight), expected);
        }

        #[test]
        fn prop_bmi_is_deterministic(height in 0.5f64..300.0, weight in 0.5f64..500.0) {
            prop_assert_eq!(compute_bmi(height, weight), compute_bmi(height, weight));
        }

        #[test]
        fn prop_verdict_matches_band(bmi in 0.0f64..1000.0) {
            let expected = match bmi {
                b if b < 18.5 => Verdict::Underweight,
                b if b < 25.0 => Verdict::Normal,
                b if b < 30.0 => Verdict::Overweight,
                _ => Verdict::Obese,
            };
            prop_assert_eq!(compute_verdict(bmi), expected);
        }
    }
}
