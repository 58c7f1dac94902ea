#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the theft viewer server.
//!
//! Form payloads arrive as raw strings and are validated in the handlers;
//! keeping them stringly-typed here lets the handlers return the app's
//! original validation messages instead of a framework deserialization
//! error.

use serde::{Deserialize, Serialize};

/// `POST /api/search` form fields.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchForm {
    /// Selected borough form value; empty when the placeholder option is
    /// still selected.
    #[serde(default)]
    pub borough: String,
    /// Range start, `MM/DD/YYYY`.
    #[serde(default)]
    pub start_date: String,
    /// Range end, `MM/DD/YYYY`.
    #[serde(default)]
    pub end_date: String,
    /// Marker grouping mode.
    #[serde(default)]
    pub group_by: String,
}

/// `POST /api/settings` form fields.
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsForm {
    /// Plot range start, `MM/DD/YYYY`.
    #[serde(default)]
    pub plot_start_date: String,
    /// Plot range end, `MM/DD/YYYY`.
    #[serde(default)]
    pub plot_end_date: String,
    /// Bar-chart sort period.
    #[serde(default)]
    pub sort_type: String,
}

/// `GET /api/plot` query parameters, taken from the selected boundary
/// feature's properties.
#[derive(Debug, Clone, Deserialize)]
pub struct PlotQuery {
    /// `boro_name` property of the selected feature.
    pub boro_name: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiHealth {
    /// Always `true` when the server is up.
    pub healthy: bool,
    /// Crate version.
    pub version: String,
}

/// A single Plotly-style bar trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarTrace {
    /// Period labels.
    pub x: Vec<String>,
    /// Record counts per period.
    pub y: Vec<u64>,
    /// Trace type, always `"bar"`.
    #[serde(rename = "type")]
    pub trace_type: String,
}

/// Axis title wrapper for the plot layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AxisTitle {
    /// Axis label text.
    pub title: String,
}

/// Plot layout object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotLayout {
    /// Y axis labeling.
    pub yaxis: AxisTitle,
}

/// `GET /api/plot` response: title, traces, and layout for the slide-sheet
/// chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotResponse {
    /// Chart title.
    pub title: String,
    /// Chart traces; always a single bar trace.
    pub data: Vec<BarTrace>,
    /// Axis-label layout.
    pub layout: PlotLayout,
}

impl PlotResponse {
    /// Builds the single-bar-trace response the frontend chart consumes.
    #[must_use]
    pub fn bar(title: String, labels: Vec<String>, counts: Vec<u64>, y_title: &str) -> Self {
        Self {
            title,
            data: vec![BarTrace {
                x: labels,
                y: counts,
                trace_type: "bar".to_string(),
            }],
            layout: PlotLayout {
                yaxis: AxisTitle {
                    title: y_title.to_string(),
                },
            },
        }
    }
}
