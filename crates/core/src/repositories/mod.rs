//! Persistence implementations.
//!
//! - [`mongo`] implements [`crate::PatientService`] on top of MongoDB.
//! - [`sequence`] mints identifiers from durable named counters.

pub(crate) mod helpers;
pub mod mongo;
pub mod sequence;
