use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};
use indexmap::IndexSet;
use serde_json::{json, Map, Value};
use tracing::info;

use crate::{
    error::{AppError, AppResult},
    filter,
    models::{FilterCriteria, Outlet, OutletField, ProjectionParams},
    AppState,
};

// ── POST /api/outlets/filter ──────────────────────────────────────────────────

/// An empty body means "no criteria"; anything else must be a JSON object.
pub async fn filter_outlets(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<(StatusCode, Json<Value>)> {
    let criteria: FilterCriteria = if body.iter().all(u8::is_ascii_whitespace) {
        FilterCriteria::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(format!("invalid filter criteria: {}", e)))?
    };

    let start = Instant::now();
    let matched = filter::filter_outlets(&state.fixtures.outlets, &criteria)?;
    let elapsed = start.elapsed();

    info!(
        matched = matched.len(),
        total = state.fixtures.outlets.len(),
        regex = criteria.regex.as_deref().unwrap_or(""),
        elapsed_us = elapsed.as_micros() as u64,
        "Filtered outlets"
    );

    Ok((
        StatusCode::OK,
        Json(json!({
            "count": matched.len(),
            "outlets": matched,
        })),
    ))
}

// ── GET /api/outlets/outletType ───────────────────────────────────────────────

pub async fn outlet_types(
    State(state): State<AppState>,
    query: Result<Query<ProjectionParams>, QueryRejection>,
) -> AppResult<Json<Vec<Value>>> {
    let Query(params) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    Ok(Json(project(
        &state.fixtures.outlets,
        OutletField::OutletType,
        params.distinct.unwrap_or(false),
    )))
}

// ── GET /api/outlets/channel ──────────────────────────────────────────────────

pub async fn channels(
    State(state): State<AppState>,
    query: Result<Query<ProjectionParams>, QueryRejection>,
) -> AppResult<Json<Vec<Value>>> {
    let Query(params) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    Ok(Json(project(
        &state.fixtures.outlets,
        OutletField::Channel,
        params.distinct.unwrap_or(false),
    )))
}

/// One single-key object per outlet. Outlets lacking the field map to `{}`,
/// unless `distinct` is set, in which case they are skipped along with repeats.
fn project(outlets: &[Outlet], field: OutletField, distinct: bool) -> Vec<Value> {
    let entry = |value: Option<&str>| {
        let mut obj = Map::new();
        if let Some(v) = value {
            obj.insert(field.key().to_string(), Value::String(v.to_string()));
        }
        Value::Object(obj)
    };

    if distinct {
        let seen: IndexSet<&str> = outlets.iter().filter_map(|o| o.field(field)).collect();
        seen.into_iter().map(|v| entry(Some(v))).collect()
    } else {
        outlets.iter().map(|o| entry(o.field(field))).collect()
    }
}
