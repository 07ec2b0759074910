//! The persistence contract consumed by the request handlers.

use crate::patient::{Patient, PatientInput};
use crate::PatientResult;
use async_trait::async_trait;

/// Patient persistence operations.
///
/// "Not found" is a regular outcome, never an error: lookups return `Ok(None)` and archiving
/// an unknown patient succeeds without doing anything. Implementations must be safe to share
/// across concurrently running requests.
#[async_trait]
pub trait PatientService: Send + Sync {
    /// Returns every stored patient in store order.
    async fn get_all_patients(&self) -> PatientResult<Vec<Patient>>;

    /// Returns the patient addressed by `id`, trying the object identifier scheme first when
    /// `id` parses as one.
    async fn get_patient_by_id(&self, id: &str) -> PatientResult<Option<Patient>>;

    /// Allocates an identifier, applies creation defaults and stores the new patient.
    async fn create_patient(&self, input: PatientInput) -> PatientResult<Patient>;

    /// Replaces the patient addressed by `id`, keeping its identifier and doctor.
    ///
    /// Returns `Ok(None)` without writing anything when the patient does not exist.
    async fn update_patient(&self, id: &str, input: PatientInput)
        -> PatientResult<Option<Patient>>;

    /// Marks the patient addressed by `id` as archived. Idempotent.
    async fn archive_patient(&self, id: &str) -> PatientResult<()>;
}
