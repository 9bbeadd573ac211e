//! Response bodies exchanged over the REST API.
//!
//! Every error leaves the service as an [`ErrorRes`] with a `detail` message, so callers can
//! rely on one shape regardless of status code.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Health check response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Liveness banner returned from `/`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct InfoRes {
    pub message: String,
    pub version: String,
}

/// Plain acknowledgement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageRes {
    pub message: String,
}

/// One field-level constraint violation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldErrorRes {
    pub field: String,
    pub message: String,
}

/// Structured error payload.
///
/// `errors` is only present for validation failures.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub detail: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldErrorRes>,
}

impl ErrorRes {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            errors: Vec::new(),
        }
    }
}

/// A patient record as presented to callers, including the derived `bmi` and `verdict`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PatientRes {
    #[schema(example = "P001")]
    pub id: String,
    #[schema(example = "Ananya Verma")]
    pub name: String,
    #[schema(example = "Guwahati")]
    pub city: String,
    #[schema(example = 28)]
    pub age: i64,
    #[schema(example = "female")]
    pub gender: String,
    /// Height in centimetres.
    #[schema(example = 165.0)]
    pub height: f64,
    /// Weight in kilograms.
    #[schema(example = 90.0)]
    pub weight: f64,
    #[schema(example = 33.06)]
    pub bmi: f64,
    #[schema(example = "Obese")]
    pub verdict: String,
}

/// Response to a successful create or update.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PatientMutationRes {
    pub message: String,
    pub patient: PatientRes,
}
