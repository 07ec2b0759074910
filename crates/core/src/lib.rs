//! # Ambulance Core
//!
//! Core business logic for the ambulance waiting-list service.
//!
//! This crate contains the patient data model and its persistence:
//! - Patient identifier resolution across object and sequence identifiers
//! - Durable sequence counters for minting new identifiers
//! - The [`PatientService`] contract and its MongoDB implementation
//! - The static condition catalog
//!
//! **No API concerns**: HTTP routing, status codes, and server startup belong in `api-rest`
//! and the `ambulance-run` binary.

pub mod conditions;
pub mod config;
pub mod constants;
pub mod error;
pub mod identifier;
pub mod patient;
pub mod repositories;
pub mod service;

pub use conditions::Condition;
pub use config::{MongoUriParts, StoreConfig};
pub use error::{PatientError, PatientResult};
pub use identifier::PatientKey;
pub use patient::{Patient, PatientInput};
pub use repositories::mongo::MongoPatientService;
pub use repositories::sequence::SequenceAllocator;
pub use service::PatientService;
