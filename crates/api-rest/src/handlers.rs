//! Route handlers.
//!
//! Handlers parse the request, delegate to [`PatientService`](records_core::PatientService) and
//! shape the response. They hold no business rules of their own.

use crate::error::ApiResult;
use crate::AppState;
use api_shared::{
    ErrorRes, HealthRes, HealthService, InfoRes, MessageRes, PatientMutationRes, PatientRes,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use records_core::{NewPatient, PatientPatch};
use serde::Deserialize;
use std::collections::BTreeMap;
use utoipa::IntoParams;

/// Query string of `/sorted-patients`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SortParams {
    /// One of `age`, `name`, `height`, `weight`.
    #[param(example = "age")]
    pub sort_by: Option<String>,
    /// `asc` or `desc`.
    #[param(example = "desc")]
    pub order: Option<String>,
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service banner", body = InfoRes)
    )
)]
#[axum::debug_handler]
pub async fn root() -> Json<InfoRes> {
    Json(HealthService::info())
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks. Does not touch the data file.
#[axum::debug_handler]
pub async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/patients",
    responses(
        (status = 200, description = "Patients by id", body = BTreeMap<String, PatientRes>),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// List all patients, keyed by id in ascending order.
#[axum::debug_handler]
pub async fn list_patients(
    State(state): State<AppState>,
) -> ApiResult<Json<BTreeMap<String, PatientRes>>> {
    let collection = state.patient_service.list_patients()?;
    let patients = collection
        .records()
        .map(|record| (record.id().to_string(), PatientRes::from(record)))
        .collect();
    Ok(Json(patients))
}

#[utoipa::path(
    get,
    path = "/patients/{id}",
    params(("id" = String, Path, description = "Patient id", example = "P001")),
    responses(
        (status = 200, description = "The patient", body = PatientRes),
        (status = 404, description = "Patient not found", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PatientRes>> {
    let record = state.patient_service.get_patient(&id)?;
    Ok(Json(PatientRes::from(&record)))
}

#[utoipa::path(
    get,
    path = "/sorted-patients",
    params(SortParams),
    responses(
        (status = 200, description = "Patients in the requested order", body = Vec<PatientRes>),
        (status = 400, description = "Invalid sort field or order", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// List patients sorted by one field.
///
/// Both parameters are required; a missing one is rejected like an unknown value. Ties keep
/// ascending id order.
#[axum::debug_handler]
pub async fn sorted_patients(
    State(state): State<AppState>,
    Query(params): Query<SortParams>,
) -> ApiResult<Json<Vec<PatientRes>>> {
    let sort_by = params.sort_by.unwrap_or_default();
    let order = params.order.unwrap_or_default();

    let records = state.patient_service.sorted_patients(&sort_by, &order)?;
    Ok(Json(records.iter().map(PatientRes::from).collect()))
}

#[utoipa::path(
    post,
    path = "/create",
    request_body = NewPatient,
    responses(
        (status = 201, description = "Patient created", body = PatientMutationRes),
        (status = 400, description = "Patient with this ID already exists", body = ErrorRes),
        (status = 422, description = "Constraint violation", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Create a new patient record
///
/// The body carries every field including `id`. Derived fields are rejected.
#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<AppState>,
    body: Result<Json<NewPatient>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<PatientMutationRes>)> {
    let Json(new) = body?;
    let record = state.patient_service.create_patient(new)?;
    Ok((
        StatusCode::CREATED,
        Json(PatientMutationRes {
            message: "Patient created successfully".into(),
            patient: PatientRes::from(&record),
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/update/{id}",
    params(("id" = String, Path, description = "Patient id", example = "P001")),
    request_body = PatientPatch,
    responses(
        (status = 200, description = "Patient updated", body = PatientMutationRes),
        (status = 404, description = "Patient not found", body = ErrorRes),
        (status = 422, description = "Merged record violates a constraint", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Apply a partial update.
///
/// Only fields present with a non-null value overwrite the stored ones.
#[axum::debug_handler]
pub async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<PatientPatch>, JsonRejection>,
) -> ApiResult<Json<PatientMutationRes>> {
    let Json(patch) = body?;
    let record = state.patient_service.update_patient(&id, patch)?;
    Ok(Json(PatientMutationRes {
        message: "Patient updated successfully".into(),
        patient: PatientRes::from(&record),
    }))
}

#[utoipa::path(
    delete,
    path = "/delete/{id}",
    params(("id" = String, Path, description = "Patient id", example = "P001")),
    responses(
        (status = 200, description = "Patient deleted", body = MessageRes),
        (status = 404, description = "Patient not found", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn delete_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageRes>> {
    state.patient_service.delete_patient(&id)?;
    Ok(Json(MessageRes {
        message: "Patient deleted successfully".into(),
    }))
}
