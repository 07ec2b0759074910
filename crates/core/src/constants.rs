//! Constants used throughout the ambulance core crate.
//!
//! Field names, default values, and collection names live here so the
//! persistence layer and the data model agree on them.

/// Status assigned to a patient on creation when none is supplied.
pub const STATUS_NEW: &str = "new";

/// Status set by the archive operation. Archived patients are never physically removed.
pub const STATUS_ARCHIVED: &str = "archived";

/// Doctor assigned to every newly created patient.
pub const DEFAULT_DOCTOR_ID: &str = "doctor1";

/// Name of the sequence counter used to mint patient identifiers.
pub const PATIENT_SEQUENCE: &str = "patientid";

/// Default database name.
pub const DEFAULT_DATABASE: &str = "ambulance";

/// Default collection holding patient documents.
pub const DEFAULT_PATIENTS_COLLECTION: &str = "patients";

/// Default collection holding named sequence counters.
pub const DEFAULT_COUNTERS_COLLECTION: &str = "counters";

/// Default per-operation timeout in seconds.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// Application name reported to the MongoDB server.
pub const APP_NAME: &str = "ambulance-waiting-list";

/// Document field holding the application-assigned identifier.
pub const ID_FIELD: &str = "id";

/// Document field holding the store-native identifier.
pub const OBJECT_ID_FIELD: &str = "_id";

/// Document field holding the patient status.
pub const STATUS_FIELD: &str = "status";

/// Server error code for a unique index violation.
pub const DUPLICATE_KEY_CODE: i32 = 11000;
