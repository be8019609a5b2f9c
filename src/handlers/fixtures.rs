use axum::extract::State;
use tracing::debug;

use crate::{fixtures::JsonBlob, AppState};

// ── GET /api/product/hell ─────────────────────────────────────────────────────

pub async fn hell_product(State(state): State<AppState>) -> JsonBlob {
    debug!("Serving hell product fixture");
    state.fixtures.hell_product.clone()
}

// ── GET /api/outlet/hell ──────────────────────────────────────────────────────

pub async fn hell_outlet(State(state): State<AppState>) -> JsonBlob {
    debug!("Serving hell outlet fixture");
    state.fixtures.hell_outlet.clone()
}

// ── GET /api/products/portal ──────────────────────────────────────────────────

pub async fn products_portal(State(state): State<AppState>) -> JsonBlob {
    debug!("Serving portal products fixture");
    state.fixtures.products.clone()
}
