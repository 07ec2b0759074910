//! # API REST
//!
//! REST API for the ambulance waiting list.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI document and Swagger UI
//! - REST-specific concerns (JSON rejections, status codes, CORS, request tracing)
//!
//! Persistence is reached only through the [`PatientService`] contract from `ambulance-core`,
//! so any implementation (MongoDB in production, doubles in tests) can back the router.

#![warn(rust_2018_idioms)]

pub mod conditions;
pub mod config;
pub mod error;
pub mod patients;

use ambulance_core::{Condition, Patient, PatientInput, PatientService};
use axum::http::{header, HeaderValue, Method};
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use config::{Environment, ServerConfig};
pub use error::{ApiError, ErrorRes};

/// Application state shared across REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub patients: Arc<dyn PatientService>,
}

impl AppState {
    pub fn new(patients: Arc<dyn PatientService>) -> Self {
        Self { patients }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Ambulance Waiting List API"),
    paths(
        patients::get_patients,
        patients::get_patient,
        patients::create_patient,
        patients::update_patient,
        patients::archive_patient,
        conditions::get_conditions,
    ),
    components(schemas(Patient, PatientInput, Condition, ErrorRes)),
    tags(
        (name = "patients", description = "Waiting-list patients"),
        (name = "conditions", description = "Condition catalog")
    )
)]
pub struct ApiDoc;

/// Returns the OpenAPI document, advertising `base_path` as the server URL when set.
pub fn openapi(base_path: &str) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    if !base_path.is_empty() {
        doc.servers = Some(vec![utoipa::openapi::Server::new(base_path)]);
    }
    doc
}

fn is_localhost_origin(origin: &HeaderValue) -> bool {
    let Ok(origin) = origin.to_str() else {
        return false;
    };
    match origin.strip_prefix("http://localhost") {
        Some("") => true,
        Some(rest) => rest
            .strip_prefix(':')
            .is_some_and(|port| !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit())),
        None => false,
    }
}

/// CORS policy admitting local front-ends on any port, with credentials.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(|origin, _| {
            is_localhost_origin(origin)
        }))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ])
        .expose_headers([header::CONTENT_LENGTH])
        .allow_credentials(true)
}

/// Builds the full application router.
///
/// Patient and condition routes plus `/openapi` and `/swagger-ui` are mounted under
/// `base_path`, which must be empty or start with `/` (see [`ServerConfig::base_path`]).
pub fn router(state: AppState, base_path: &str) -> Router {
    let doc = openapi(base_path);

    let api = Router::new()
        .route(
            "/patients",
            get(patients::get_patients).post(patients::create_patient),
        )
        .route(
            "/patients/:patient_id",
            get(patients::get_patient)
                .put(patients::update_patient)
                .delete(patients::archive_patient),
        )
        .route("/conditions", get(conditions::get_conditions))
        .route(
            "/openapi",
            get(move || {
                let doc = doc.clone();
                async move { Json(doc) }
            }),
        )
        .with_state(state);

    let app = if base_path.is_empty() {
        api
    } else {
        Router::new().nest(base_path, api)
    };

    app.merge(
        SwaggerUi::new(format!("{base_path}/swagger-ui"))
            .url(format!("{base_path}/api-docs/openapi.json"), openapi(base_path)),
    )
    .layer(cors_layer())
    .layer(TraceLayer::new_for_http())
}
