//! Patient endpoints.
//!
//! Each handler validates its path and body, makes exactly one call on the
//! [`ambulance_core::PatientService`] held in [`AppState`], and maps the outcome to a status.

use crate::error::{ApiError, ErrorRes};
use crate::AppState;
use ambulance_core::{Patient, PatientInput};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;

const MISSING_ID_MESSAGE: &str = "Patient ID is required";

fn required_id(patient_id: &str) -> Result<&str, ApiError> {
    if patient_id.trim().is_empty() {
        return Err(ApiError::BadRequest(MISSING_ID_MESSAGE.into()));
    }
    Ok(patient_id)
}

fn validated_input(
    payload: Result<Json<PatientInput>, JsonRejection>,
) -> Result<PatientInput, ApiError> {
    let Json(input) = payload?;
    input.validate()?;
    Ok(input)
}

#[utoipa::path(
    get,
    path = "/patients",
    tag = "patients",
    responses(
        (status = 200, description = "List of patients", body = [Patient]),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// List every patient, archived ones included.
#[axum::debug_handler]
pub async fn get_patients(State(state): State<AppState>) -> Result<Json<Vec<Patient>>, ApiError> {
    let patients = state
        .patients
        .get_all_patients()
        .await
        .map_err(ApiError::persistence("list patients"))?;
    Ok(Json(patients))
}

#[utoipa::path(
    get,
    path = "/patients/{patient_id}",
    tag = "patients",
    params(("patient_id" = String, Path, description = "Sequence number or object identifier")),
    responses(
        (status = 200, description = "Patient found", body = Patient),
        (status = 400, description = "Missing patient identifier", body = ErrorRes),
        (status = 404, description = "Patient not found"),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Fetch a single patient.
///
/// # Errors
/// Returns `404 Not Found` with an empty body when no patient matches.
#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> Result<Json<Patient>, ApiError> {
    let patient_id = required_id(&patient_id)?;
    state
        .patients
        .get_patient_by_id(patient_id)
        .await
        .map_err(ApiError::persistence("get patient"))?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

#[utoipa::path(
    post,
    path = "/patients",
    tag = "patients",
    request_body = PatientInput,
    responses(
        (status = 201, description = "Patient created", body = Patient),
        (status = 400, description = "Invalid body or missing name/condition", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Add a patient to the waiting list.
///
/// The service assigns the identifier and doctor; the status defaults to `new`.
#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<AppState>,
    payload: Result<Json<PatientInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Patient>), ApiError> {
    let input = validated_input(payload)?;
    let patient = state
        .patients
        .create_patient(input)
        .await
        .map_err(ApiError::persistence("create patient"))?;
    Ok((StatusCode::CREATED, Json(patient)))
}

#[utoipa::path(
    put,
    path = "/patients/{patient_id}",
    tag = "patients",
    params(("patient_id" = String, Path, description = "Sequence number or object identifier")),
    request_body = PatientInput,
    responses(
        (status = 200, description = "Patient updated", body = Patient),
        (status = 400, description = "Invalid body or missing name/condition", body = ErrorRes),
        (status = 404, description = "Patient not found"),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Replace a patient's details.
///
/// The identifier and doctor never change. An empty `status` keeps the stored one.
#[axum::debug_handler]
pub async fn update_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
    payload: Result<Json<PatientInput>, JsonRejection>,
) -> Result<Json<Patient>, ApiError> {
    let patient_id = required_id(&patient_id)?;
    let input = validated_input(payload)?;
    state
        .patients
        .update_patient(patient_id, input)
        .await
        .map_err(ApiError::persistence("update patient"))?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

#[utoipa::path(
    delete,
    path = "/patients/{patient_id}",
    tag = "patients",
    params(("patient_id" = String, Path, description = "Sequence number or object identifier")),
    responses(
        (status = 204, description = "Patient archived, or no such patient"),
        (status = 400, description = "Missing patient identifier", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Archive a patient. The record is kept with status `archived`.
#[axum::debug_handler]
pub async fn archive_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let patient_id = required_id(&patient_id)?;
    state
        .patients
        .archive_patient(patient_id)
        .await
        .map_err(ApiError::persistence("archive patient"))?;
    Ok(StatusCode::NO_CONTENT)
}
