use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::{
    chaos::{ChaosOutcome, ChaosParams, ChaosPlan},
    error::{AppError, AppResult},
    fixtures::JsonBlob,
    AppState,
};

/// Synthetic failure returned instead of a fixture when the dice say so.
struct Fault {
    status: StatusCode,
    message: &'static str,
}

const PRODUCT_FAULT: Fault = Fault {
    status: StatusCode::INTERNAL_SERVER_ERROR,
    message: "Chaos monkey ate the product payload",
};

const OUTLET_FAULT: Fault = Fault {
    status: StatusCode::BAD_GATEWAY,
    message: "Chaos monkey broke the outlet upstream",
};

// ── GET /api/chaos/product?delayMs&failRate ───────────────────────────────────

pub async fn chaos_product(
    State(state): State<AppState>,
    query: Result<Query<ChaosParams>, QueryRejection>,
) -> AppResult<Response> {
    let plan = plan_from(&state, query)?;
    Ok(serve(plan, "product", state.fixtures.products.clone(), PRODUCT_FAULT).await)
}

// ── GET /api/chaos/outlet?delayMs&failRate ────────────────────────────────────

pub async fn chaos_outlet(
    State(state): State<AppState>,
    query: Result<Query<ChaosParams>, QueryRejection>,
) -> AppResult<Response> {
    let plan = plan_from(&state, query)?;
    Ok(serve(plan, "outlet", state.fixtures.outlets_blob.clone(), OUTLET_FAULT).await)
}

fn plan_from(
    state: &AppState,
    query: Result<Query<ChaosParams>, QueryRejection>,
) -> AppResult<ChaosPlan> {
    let Query(params) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    ChaosPlan::from_params(&params, state.chaos_max_delay)
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

async fn serve(plan: ChaosPlan, target: &str, payload: JsonBlob, fault: Fault) -> Response {
    match plan.run(target).await {
        ChaosOutcome::Pass => payload.into_response(),
        ChaosOutcome::Fail => {
            (fault.status, Json(json!({ "error": fault.message }))).into_response()
        }
    }
}
