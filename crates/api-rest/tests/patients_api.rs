//! Router tests backed by in-memory `PatientService` doubles.

use ambulance_core::{Patient, PatientError, PatientInput, PatientResult, PatientService};
use api_rest::{router, AppState};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tower::ServiceExt; // for `oneshot`

/// Keeps patients in insertion order and mints ids from a process-local counter.
#[derive(Default)]
struct InMemoryPatients {
    patients: Mutex<Vec<Patient>>,
    next_id: AtomicU64,
}

#[async_trait]
impl PatientService for InMemoryPatients {
    async fn get_all_patients(&self) -> PatientResult<Vec<Patient>> {
        Ok(self.patients.lock().await.clone())
    }

    async fn get_patient_by_id(&self, id: &str) -> PatientResult<Option<Patient>> {
        let patients = self.patients.lock().await;
        Ok(patients.iter().find(|p| p.id == id).cloned())
    }

    async fn create_patient(&self, input: PatientInput) -> PatientResult<Patient> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let patient = Patient::create(id.to_string(), input);
        self.patients.lock().await.push(patient.clone());
        Ok(patient)
    }

    async fn update_patient(
        &self,
        id: &str,
        input: PatientInput,
    ) -> PatientResult<Option<Patient>> {
        let mut patients = self.patients.lock().await;
        let Some(existing) = patients.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        *existing = existing.replaced_with(input);
        Ok(Some(existing.clone()))
    }

    async fn archive_patient(&self, id: &str) -> PatientResult<()> {
        let mut patients = self.patients.lock().await;
        if let Some(existing) = patients.iter_mut().find(|p| p.id == id) {
            existing.status = "archived".into();
        }
        Ok(())
    }
}

/// Fails every call the way an unreachable database would.
struct UnavailablePatients;

fn timeout(operation: &'static str) -> PatientError {
    PatientError::Timeout {
        operation,
        timeout: Duration::from_secs(10),
    }
}

#[async_trait]
impl PatientService for UnavailablePatients {
    async fn get_all_patients(&self) -> PatientResult<Vec<Patient>> {
        Err(timeout("list patients"))
    }

    async fn get_patient_by_id(&self, _id: &str) -> PatientResult<Option<Patient>> {
        Err(timeout("get patient"))
    }

    async fn create_patient(&self, _input: PatientInput) -> PatientResult<Patient> {
        Err(timeout("create patient"))
    }

    async fn update_patient(
        &self,
        _id: &str,
        _input: PatientInput,
    ) -> PatientResult<Option<Patient>> {
        Err(timeout("update patient"))
    }

    async fn archive_patient(&self, _id: &str) -> PatientResult<()> {
        Err(timeout("archive patient"))
    }
}

fn app_with(service: Arc<dyn PatientService>) -> Router {
    router(AppState::new(service), "")
}

fn app() -> Router {
    app_with(Arc::new(InMemoryPatients::default()))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

async fn create(app: &Router, body: Value) -> Value {
    let response = send(app, Method::POST, "/patients", Some(body)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

#[tokio::test]
async fn test_create_patient_applies_defaults() {
    let app = app();

    let created = create(&app, json!({"name": "Jane Doe", "condition": "Flu"})).await;

    assert_eq!(created["name"], "Jane Doe");
    assert_eq!(created["condition"], "Flu");
    assert_eq!(created["status"], "new");
    assert_eq!(created["doctorId"], "doctor1");
    assert!(!created["id"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_patient_rejects_empty_name() {
    let app = app();

    let response = send(
        &app,
        Method::POST,
        "/patients",
        Some(json!({"name": "", "condition": "Flu"})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Name and condition are required");
}

#[tokio::test]
async fn test_create_patient_rejects_malformed_body() {
    let app = app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/patients")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].is_string());

    // Wrong field type is a data error, still reported as 400.
    let response = send(
        &app,
        Method::POST,
        "/patients",
        Some(json!({"name": 7, "condition": "Flu"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Missing content type.
    let request = Request::builder()
        .method(Method::POST)
        .uri("/patients")
        .body(Body::from(r#"{"name":"Jane Doe","condition":"Flu"}"#))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_patient_round_trip() {
    let app = app();
    let created = create(
        &app,
        json!({"name": "Jane Doe", "condition": "Flu", "diagnosisDate": "2024-03-01"}),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let response = send(&app, Method::GET, &format!("/patients/{id}"), None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;
    assert_eq!(fetched, created);
    assert_eq!(fetched["diagnosisDate"], "2024-03-01");
}

#[tokio::test]
async fn test_get_unknown_patient_is_404_without_body() {
    let app = app();

    let response = send(&app, Method::GET, "/patients/12345", None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_bytes(response).await.is_empty());
}

#[tokio::test]
async fn test_blank_patient_id_is_400() {
    let app = app();

    let response = send(&app, Method::GET, "/patients/%20", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(&app, Method::DELETE, "/patients/%20", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_patients_returns_all_created() {
    let app = app();
    let response = send(&app, Method::GET, "/patients", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));

    create(&app, json!({"name": "Alice", "condition": "Flu"})).await;
    create(&app, json!({"name": "Bob", "condition": "Cold"})).await;

    let response = send(&app, Method::GET, "/patients", None).await;
    let patients = body_json(response).await;
    let names: Vec<_> = patients
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["Alice", "Bob"]);
}

#[tokio::test]
async fn test_update_keeps_status_when_empty_and_overwrites_otherwise() {
    let app = app();
    let created = create(
        &app,
        json!({"name": "Jane Doe", "condition": "Flu", "status": "waiting"}),
    )
    .await;
    let uri = format!("/patients/{}", created["id"].as_str().unwrap());

    let response = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({"name": "Jane Smith", "condition": "Cold", "status": ""})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["status"], "waiting");
    assert_eq!(updated["name"], "Jane Smith");
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["doctorId"], created["doctorId"]);

    let response = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({"name": "Jane Smith", "condition": "Cold", "status": "in-treatment"})),
    )
    .await;
    assert_eq!(body_json(response).await["status"], "in-treatment");
}

#[tokio::test]
async fn test_update_with_null_status_keeps_stored_status() {
    let app = app();
    let created = create(
        &app,
        json!({"name": "Jane Doe", "condition": "Flu", "status": "waiting"}),
    )
    .await;
    let uri = format!("/patients/{}", created["id"].as_str().unwrap());

    let response = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({"name": "Jane Doe", "condition": "Cold", "status": null})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["status"], "waiting");
    assert_eq!(updated["condition"], "Cold");
}

#[tokio::test]
async fn test_create_accepts_whitespace_name() {
    let app = app();

    let created = create(&app, json!({"name": " ", "condition": "Flu", "status": null})).await;

    assert_eq!(created["name"], " ");
    assert_eq!(created["status"], "new");
}

#[tokio::test]
async fn test_update_unknown_patient_is_404() {
    let app = app();

    let response = send(
        &app,
        Method::PUT,
        "/patients/999",
        Some(json!({"name": "Jane Doe", "condition": "Flu"})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_validates_before_lookup() {
    let app = app();

    let response = send(
        &app,
        Method::PUT,
        "/patients/999",
        Some(json!({"name": "Jane Doe", "condition": ""})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_archive_is_idempotent() {
    let app = app();
    let created = create(&app, json!({"name": "Jane Doe", "condition": "Flu"})).await;
    let uri = format!("/patients/{}", created["id"].as_str().unwrap());

    for _ in 0..2 {
        let response = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(body_bytes(response).await.is_empty());

        let fetched = body_json(send(&app, Method::GET, &uri, None).await).await;
        assert_eq!(fetched["status"], "archived");
        assert_eq!(fetched["id"], created["id"]);
        assert_eq!(fetched["doctorId"], created["doctorId"]);
    }
}

#[tokio::test]
async fn test_archive_unknown_patient_is_204() {
    let app = app();

    let response = send(&app, Method::DELETE, "/patients/does-not-exist", None).await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_persistence_failure_is_opaque_500() {
    let app = app_with(Arc::new(UnavailablePatients));
    let valid = json!({"name": "Jane Doe", "condition": "Flu"});

    let cases = [
        (Method::GET, "/patients", None),
        (Method::GET, "/patients/1", None),
        (Method::POST, "/patients", Some(valid.clone())),
        (Method::PUT, "/patients/1", Some(valid)),
        (Method::DELETE, "/patients/1", None),
    ];

    for (method, uri, body) in cases {
        let response = send(&app, method.clone(), uri, body).await;
        assert_eq!(
            response.status(),
            StatusCode::INTERNAL_SERVER_ERROR,
            "{method} {uri}"
        );
        assert_eq!(body_json(response).await, json!({"error": "Internal error"}));
    }
}

#[tokio::test]
async fn test_conditions_catalog() {
    let app = app();

    let response = send(&app, Method::GET, "/conditions", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let conditions = body_json(response).await;
    let conditions = conditions.as_array().unwrap();
    assert!(!conditions.is_empty());
    assert!(conditions.iter().all(|c| c["id"].is_string() && c["name"].is_string()));
}

#[tokio::test]
async fn test_routes_are_mounted_under_base_path() {
    let app = router(
        AppState::new(Arc::new(InMemoryPatients::default())),
        "/ambulance-wl-api",
    );

    let response = send(&app, Method::GET, "/ambulance-wl-api/patients", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, Method::GET, "/patients", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, Method::GET, "/ambulance-wl-api/openapi", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let doc = body_json(response).await;
    assert!(doc["paths"]["/patients/{patient_id}"].is_object());
    assert_eq!(doc["servers"][0]["url"], "/ambulance-wl-api");
}

#[tokio::test]
async fn test_cors_preflight_allows_localhost() {
    let app = app();

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/patients")
        .header(header::ORIGIN, "http://localhost:4200")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:4200"
    );
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
        "true"
    );
}
