use std::path::{Path, PathBuf};

use axum::{
    body::Bytes,
    http::header,
    response::{IntoResponse, Response},
};
use serde::de::{DeserializeOwned, IgnoredAny};
use tracing::info;

use crate::models::Outlet;

pub const HELL_PRODUCT_FILE: &str = "hell-product.json";
pub const HELL_OUTLET_FILE: &str = "hell-outlet.json";
pub const PRODUCTS_FILE: &str = "products.json";
pub const OUTLETS_FILE: &str = "outletdetails.json";

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("failed to read fixture {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("fixture {} is not valid JSON of the expected shape: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The bytes of a fixture file, validated as JSON at load time and served
/// exactly as they sit on disk.
#[derive(Debug, Clone)]
pub struct JsonBlob(Bytes);

impl IntoResponse for JsonBlob {
    fn into_response(self) -> Response {
        ([(header::CONTENT_TYPE, "application/json")], self.0).into_response()
    }
}

/// Every payload the server hands out, loaded once and never mutated.
#[derive(Debug)]
pub struct Fixtures {
    pub hell_product: JsonBlob,
    pub hell_outlet: JsonBlob,
    pub products: JsonBlob,
    pub outlets: Vec<Outlet>,
    /// The outlet-details file as loaded, for the chaos outlet endpoint.
    pub outlets_blob: JsonBlob,
}

impl Fixtures {
    /// Reads and parses all fixture files under `dir`. Any missing or malformed
    /// file aborts the whole load.
    pub fn load(dir: &Path) -> Result<Self, FixtureError> {
        let (hell_product, IgnoredAny) = read_fixture(&dir.join(HELL_PRODUCT_FILE))?;
        let (hell_outlet, IgnoredAny) = read_fixture(&dir.join(HELL_OUTLET_FILE))?;
        let (products, IgnoredAny) = read_fixture(&dir.join(PRODUCTS_FILE))?;
        let (outlets_blob, outlets): (_, Vec<Outlet>) = read_fixture(&dir.join(OUTLETS_FILE))?;

        info!(
            dir = %dir.display(),
            outlets = outlets.len(),
            "Fixtures loaded"
        );

        Ok(Self {
            hell_product,
            hell_outlet,
            products,
            outlets,
            outlets_blob,
        })
    }
}

/// Reads one fixture file, returning its raw bytes and its parsed form.
fn read_fixture<T: DeserializeOwned>(path: &Path) -> Result<(JsonBlob, T), FixtureError> {
    let raw = std::fs::read(path).map_err(|source| FixtureError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed = serde_json::from_slice(&raw).map_err(|source| FixtureError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok((JsonBlob(Bytes::from(raw)), parsed))
}
