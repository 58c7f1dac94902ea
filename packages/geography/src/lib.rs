#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Borough boundary `GeoJSON` loading for the map layer.
//!
//! The boundaries file is a static `FeatureCollection` of the five borough
//! polygons. It is read once at server startup and served verbatim to the
//! frontend; the only piece the backend itself consumes is each feature's
//! `boro_name` property, which the plot flow maps back to a [`Borough`].

use std::path::Path;

use theft_map_theft_models::Borough;

/// Errors that can occur loading or interpreting boundary data.
#[derive(Debug, thiserror::Error)]
pub enum GeoError {
    /// I/O error reading the boundaries file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The boundaries file is not valid JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document or a feature is missing an expected piece.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

/// Reads the borough boundaries `GeoJSON` document and checks it carries a
/// `features` array.
///
/// # Errors
///
/// Returns [`GeoError`] if the file cannot be read, is not JSON, or has no
/// `features` array.
pub fn load_boundaries(path: &Path) -> Result<serde_json::Value, GeoError> {
    let document: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(path)?)?;

    if document["features"].as_array().is_none() {
        return Err(GeoError::Conversion {
            message: format!("No features array in boundaries file {}", path.display()),
        });
    }

    Ok(document)
}

/// Extracts the borough a boundary feature describes from its `boro_name`
/// property.
///
/// # Errors
///
/// Returns [`GeoError::Conversion`] if the property is missing or names no
/// known borough.
pub fn feature_borough(feature: &serde_json::Value) -> Result<Borough, GeoError> {
    let name = feature["properties"]["boro_name"]
        .as_str()
        .ok_or_else(|| GeoError::Conversion {
            message: "Feature has no boro_name property".to_string(),
        })?;

    name.parse().map_err(|_| GeoError::Conversion {
        message: format!("Feature names unknown borough '{name}'"),
    })
}
