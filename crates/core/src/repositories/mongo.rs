//! MongoDB-backed patient persistence.
//!
//! ## Storage layout
//!
//! ```text
//! <database>/
//!   patients   { _id: ObjectId, id: "42", name, condition, ..., status, doctorId }
//!   counters   { _id: "patientid", seq: 42 }
//! ```
//!
//! New patients get a sequence identifier in `id`; `_id` is left to the server. Older documents
//! may only carry `_id`, which is why lookups go through [`PatientKey`].
//!
//! Every public operation runs under the configured timeout. The driver's connection pool is
//! shared by all clones of the service, so the service is cheap to clone and needs no locking.

use super::helpers::with_deadline;
use super::sequence::SequenceAllocator;
use crate::config::StoreConfig;
use crate::constants::{APP_NAME, PATIENT_SEQUENCE, STATUS_ARCHIVED, STATUS_FIELD};
use crate::identifier::PatientKey;
use crate::patient::{Patient, PatientDocument, PatientInput};
use crate::service::PatientService;
use crate::{PatientError, PatientResult};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use std::future::Future;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct MongoPatientService {
    client: Client,
    patients: Collection<PatientDocument>,
    sequences: SequenceAllocator,
    timeout: Duration,
}

impl MongoPatientService {
    /// Connects to the store described by `cfg` and verifies the connection with a ping.
    ///
    /// # Errors
    ///
    /// Returns `PatientError` if:
    /// - the connection URI cannot be parsed,
    /// - the client cannot be created,
    /// - the server does not answer the ping within the configured timeout.
    pub async fn connect(cfg: &StoreConfig) -> PatientResult<Self> {
        let mut options = with_deadline(cfg.timeout(), "parse connection uri", async {
            ClientOptions::parse(cfg.uri())
                .await
                .map_err(PatientError::database("parse connection uri"))
        })
        .await?;
        options.app_name = Some(APP_NAME.to_string());
        options.connect_timeout = Some(cfg.timeout());
        options.server_selection_timeout = Some(cfg.timeout());

        let client =
            Client::with_options(options).map_err(PatientError::database("create client"))?;
        let service = Self::with_client(client, cfg);
        service.ping().await?;

        tracing::info!(
            database = cfg.database(),
            collection = cfg.patients_collection(),
            "connected to MongoDB"
        );
        Ok(service)
    }

    /// Builds the service on an existing client without contacting the server.
    pub fn with_client(client: Client, cfg: &StoreConfig) -> Self {
        let database = client.database(cfg.database());
        Self {
            patients: database.collection(cfg.patients_collection()),
            sequences: SequenceAllocator::new(&database, cfg.counters_collection()),
            timeout: cfg.timeout(),
            client,
        }
    }

    /// Round-trips a `ping` command to the server.
    pub async fn ping(&self) -> PatientResult<()> {
        self.within("ping database", async {
            self.client
                .database("admin")
                .run_command(doc! { "ping": 1 }, None)
                .await
                .map(|_| ())
                .map_err(PatientError::database("ping database"))
        })
        .await
    }

    /// Closes the connection pool, waiting for in-flight operations to finish.
    pub async fn shutdown(self) {
        self.client.shutdown().await;
        tracing::info!("disconnected from MongoDB");
    }

    async fn within<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = PatientResult<T>>,
    ) -> PatientResult<T> {
        with_deadline(self.timeout, operation, fut).await
    }

    /// Looks up `id` and returns the key that matched along with the patient.
    ///
    /// A document found by `_id` with an empty `id` field is returned with `id` set to the
    /// identifier the caller used.
    async fn resolve(&self, id: &str) -> PatientResult<Option<(PatientKey, Patient)>> {
        let key = PatientKey::resolve(id);
        tracing::debug!(%key, "resolving patient");

        let document = self
            .patients
            .find_one(key.filter(), None)
            .await
            .map_err(PatientError::database("find patient"))?;

        Ok(document.map(|mut document| {
            if key.is_object_id() && document.id.is_empty() {
                document.id = id.to_string();
            }
            (key, document.into_patient())
        }))
    }

    async fn list(&self) -> PatientResult<Vec<Patient>> {
        let cursor = self
            .patients
            .find(None, None)
            .await
            .map_err(PatientError::database("find patients"))?;

        let documents: Vec<PatientDocument> = cursor
            .try_collect()
            .await
            .map_err(PatientError::database("decode patients"))?;

        Ok(documents
            .into_iter()
            .map(PatientDocument::into_patient)
            .collect())
    }

    async fn insert(&self, input: PatientInput) -> PatientResult<Patient> {
        let seq = self.sequences.next_sequence(PATIENT_SEQUENCE).await?;
        let patient = Patient::create(seq.to_string(), input);

        self.patients
            .insert_one(PatientDocument::from(patient.clone()), None)
            .await
            .map_err(PatientError::database("create patient"))?;

        tracing::info!(patient_id = %patient.id, "patient created");
        Ok(patient)
    }

    async fn replace(&self, id: &str, input: PatientInput) -> PatientResult<Option<Patient>> {
        let Some((key, existing)) = self.resolve(id).await? else {
            return Ok(None);
        };

        let updated = existing.replaced_with(input);
        self.patients
            .replace_one(key.filter(), PatientDocument::from(updated.clone()), None)
            .await
            .map_err(PatientError::database("update patient"))?;

        tracing::debug!(%key, "patient replaced");
        Ok(Some(updated))
    }

    async fn archive(&self, id: &str) -> PatientResult<()> {
        let Some((key, _)) = self.resolve(id).await? else {
            tracing::debug!(patient_id = id, "archive of unknown patient ignored");
            return Ok(());
        };

        self.patients
            .update_one(
                key.filter(),
                doc! { "$set": { STATUS_FIELD: STATUS_ARCHIVED } },
                None,
            )
            .await
            .map_err(PatientError::database("archive patient"))?;

        tracing::info!(%key, "patient archived");
        Ok(())
    }
}

#[async_trait]
impl PatientService for MongoPatientService {
    async fn get_all_patients(&self) -> PatientResult<Vec<Patient>> {
        self.within("list patients", self.list()).await
    }

    async fn get_patient_by_id(&self, id: &str) -> PatientResult<Option<Patient>> {
        self.within("get patient", async {
            Ok::<_, PatientError>(self.resolve(id).await?.map(|(_, patient)| patient))
        })
        .await
    }

    async fn create_patient(&self, input: PatientInput) -> PatientResult<Patient> {
        self.within("create patient", self.insert(input)).await
    }

    async fn update_patient(
        &self,
        id: &str,
        input: PatientInput,
    ) -> PatientResult<Option<Patient>> {
        self.within("update patient", self.replace(id, input)).await
    }

    async fn archive_patient(&self, id: &str) -> PatientResult<()> {
        self.within("archive patient", self.archive(id)).await
    }
}
