//! Patient identifier resolution.
//!
//! Patients can be addressed by two identifier schemes:
//!
//! - **Object identifiers**: 24 hex characters, the store-native `_id` of a document. Records
//!   written before sequence numbers were introduced are only reachable this way.
//! - **Sequence identifiers**: the decimal string held in the document's `id` field, minted from
//!   the `patientid` counter by [`crate::repositories::sequence::SequenceAllocator`].
//!
//! [`PatientKey::resolve`] picks the scheme: anything that parses as an object identifier is
//! looked up by `_id`, everything else by `id`. There is no second attempt once a scheme has
//! been chosen, so a key never matches more than one kind of document field.

use crate::constants::{ID_FIELD, OBJECT_ID_FIELD};
use mongodb::bson::{doc, oid::ObjectId, Document};
use std::fmt;

/// The lookup key derived from an externally supplied patient identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PatientKey {
    /// Look up by the store-native `_id`.
    ObjectId(ObjectId),
    /// Look up by the application `id` field.
    Sequence(String),
}

impl PatientKey {
    /// Chooses the lookup scheme for `id`.
    pub fn resolve(id: &str) -> Self {
        match ObjectId::parse_str(id) {
            Ok(oid) => PatientKey::ObjectId(oid),
            Err(_) => PatientKey::Sequence(id.to_string()),
        }
    }

    /// Returns the query filter matching the document this key addresses.
    pub fn filter(&self) -> Document {
        match self {
            PatientKey::ObjectId(oid) => doc! { OBJECT_ID_FIELD: *oid },
            PatientKey::Sequence(id) => doc! { ID_FIELD: id.as_str() },
        }
    }

    pub fn is_object_id(&self) -> bool {
        matches!(self, PatientKey::ObjectId(_))
    }
}

impl fmt::Display for PatientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatientKey::ObjectId(oid) => write!(f, "_id={}", oid.to_hex()),
            PatientKey::Sequence(id) => write!(f, "id={}", id),
        }
    }
}
