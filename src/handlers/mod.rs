pub mod chaos;
pub mod fixtures;
pub mod outlets;

use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;

use crate::AppState;

pub async fn index() -> &'static str {
    "Mock API server is up and serving cursed JSON 🚀"
}

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "hell-mock-api",
            "outlets": state.fixtures.outlets.len(),
        })),
    )
}
