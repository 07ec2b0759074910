//! Patient data model.
//!
//! [`Patient`] is what the API returns and what the service persists. [`PatientInput`] is the
//! create/update payload and deliberately carries neither an identifier nor a doctor: both are
//! owned by the persistence layer.
//!
//! The update rules live here as pure functions so that every [`crate::PatientService`]
//! implementation applies them identically:
//! - [`Patient::create`] fills the creation defaults.
//! - [`Patient::replaced_with`] builds the full replacement document for an update.

use crate::constants::{DEFAULT_DOCTOR_ID, STATUS_NEW};
use crate::error::{PatientError, PatientResult};
use chrono::NaiveDate;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// A patient on the ambulance waiting list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Either a decimal sequence number or a 24 character hex object identifier.
    #[schema(example = "42")]
    pub id: String,
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "Flu")]
    pub condition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnosis_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treatment_start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_completion_date: Option<NaiveDate>,
    #[schema(example = "new")]
    pub status: String,
    #[schema(example = "doctor1")]
    pub doctor_id: String,
}

/// Reads a string field that may be `null`, treating `null` like an absent value.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Payload accepted by the create and update operations.
///
/// Absent and `null` string fields deserialise as empty so that [`PatientInput::validate`]
/// can report them uniformly.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct PatientInput {
    #[serde(deserialize_with = "null_as_empty")]
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[serde(deserialize_with = "null_as_empty")]
    #[schema(example = "Flu")]
    pub condition: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treatment_start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_completion_date: Option<NaiveDate>,
    /// Empty on create means `"new"`; empty on update keeps the stored status.
    #[serde(deserialize_with = "null_as_empty")]
    pub status: String,
}

impl PatientInput {
    /// Checks that `name` and `condition` are present. Content is not inspected further.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::InvalidInput`] when either field is empty.
    pub fn validate(&self) -> PatientResult<()> {
        if self.name.is_empty() || self.condition.is_empty() {
            return Err(PatientError::InvalidInput(
                "Name and condition are required".into(),
            ));
        }
        Ok(())
    }
}

impl Patient {
    /// Builds a new patient from `input` under the freshly allocated `id`.
    ///
    /// The status defaults to [`STATUS_NEW`] and the doctor is always [`DEFAULT_DOCTOR_ID`].
    pub fn create(id: String, input: PatientInput) -> Self {
        let status = if input.status.is_empty() {
            STATUS_NEW.to_string()
        } else {
            input.status
        };

        Self {
            id,
            name: input.name,
            condition: input.condition,
            diagnosis_date: input.diagnosis_date,
            treatment_start_date: input.treatment_start_date,
            expected_completion_date: input.expected_completion_date,
            status,
            doctor_id: DEFAULT_DOCTOR_ID.to_string(),
        }
    }

    /// Builds the full replacement for this patient carrying the fields of `input`.
    ///
    /// `id` and `doctor_id` are taken from `self`. An empty input status keeps the current one.
    pub fn replaced_with(&self, input: PatientInput) -> Self {
        let status = if input.status.is_empty() {
            self.status.clone()
        } else {
            input.status
        };

        Self {
            id: self.id.clone(),
            name: input.name,
            condition: input.condition,
            diagnosis_date: input.diagnosis_date,
            treatment_start_date: input.treatment_start_date,
            expected_completion_date: input.expected_completion_date,
            status,
            doctor_id: self.doctor_id.clone(),
        }
    }
}

/// Stored shape of a patient.
///
/// Older records may carry only the store-native `_id` and an empty or missing `id` field,
/// so every field tolerates absence when decoding.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PatientDocument {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<ObjectId>,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub condition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnosis_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treatment_start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_completion_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub doctor_id: String,
}

impl PatientDocument {
    /// Converts to the API shape, backfilling an empty `id` from the object identifier.
    pub fn into_patient(self) -> Patient {
        let id = match (self.id.is_empty(), self.object_id) {
            (true, Some(oid)) => oid.to_hex(),
            _ => self.id,
        };

        Patient {
            id,
            name: self.name,
            condition: self.condition,
            diagnosis_date: self.diagnosis_date,
            treatment_start_date: self.treatment_start_date,
            expected_completion_date: self.expected_completion_date,
            status: self.status,
            doctor_id: self.doctor_id,
        }
    }
}

impl From<Patient> for PatientDocument {
    /// Documents written by the service never set `_id`; the store assigns it on insert and
    /// keeps it across replaces.
    fn from(patient: Patient) -> Self {
        Self {
            object_id: None,
            id: patient.id,
            name: patient.name,
            condition: patient.condition,
            diagnosis_date: patient.diagnosis_date,
            treatment_start_date: patient.treatment_start_date,
            expected_completion_date: patient.expected_completion_date,
            status: patient.status,
            doctor_id: patient.doctor_id,
        }
    }
}
