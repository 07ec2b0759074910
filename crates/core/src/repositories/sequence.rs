//! Durable sequence counters.
//!
//! Each counter is one document `{_id: <name>, seq: <i64>}` in the counters collection. A value
//! is issued by a single `findOneAndUpdate` that increments and returns the post-increment
//! document, creating the counter on first use. The first value of a fresh counter is `1`.
//!
//! Values are never handed out twice, and a value whose consumer later fails is simply lost.

use super::helpers::is_duplicate_key;
use crate::{PatientError, PatientResult};
use mongodb::bson::doc;
use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};
use mongodb::{Collection, Database};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub(crate) struct SequenceCounter {
    #[serde(rename = "_id")]
    pub name: String,
    pub seq: i64,
}

/// Issues increasing integers from named counters stored in the database.
#[derive(Clone, Debug)]
pub struct SequenceAllocator {
    counters: Collection<SequenceCounter>,
}

impl SequenceAllocator {
    pub fn new(database: &Database, collection: &str) -> Self {
        Self {
            counters: database.collection(collection),
        }
    }

    /// Atomically increments the counter `name` and returns the new value.
    ///
    /// Two callers racing to create a missing counter can both attempt the upsert; the loser
    /// receives a duplicate key error and re-issues the increment once against the now
    /// existing counter.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::Database`] if the store rejects the update, or
    /// [`PatientError::SequenceUnavailable`] if it reports no document after the upsert.
    pub async fn next_sequence(&self, name: &str) -> PatientResult<i64> {
        let counter = match self.increment(name).await {
            Err(err) if is_duplicate_key(&err) => {
                tracing::debug!(
                    sequence = name,
                    "counter created concurrently, re-issuing increment"
                );
                self.increment(name).await
            }
            other => other,
        }
        .map_err(PatientError::database("increment sequence"))?;

        let counter = counter.ok_or_else(|| PatientError::SequenceUnavailable(name.to_string()))?;
        tracing::debug!(sequence = name, value = counter.seq, "sequence value issued");
        Ok(counter.seq)
    }

    async fn increment(&self, name: &str) -> mongodb::error::Result<Option<SequenceCounter>> {
        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();

        self.counters
            .find_one_and_update(
                doc! { "_id": name },
                doc! { "$inc": { "seq": 1_i64 } },
                options,
            )
            .await
    }
}
