//! Condition catalog endpoint.

use ambulance_core::{conditions, Condition};
use axum::response::Json;

#[utoipa::path(
    get,
    path = "/conditions",
    tag = "conditions",
    responses(
        (
            status = 200,
            description = "Medical conditions patients can be queued for",
            body = [Condition]
        )
    )
)]
#[axum::debug_handler]
pub async fn get_conditions() -> Json<Vec<Condition>> {
    Json(conditions::catalog())
}
