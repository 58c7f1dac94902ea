#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Socrata query fetcher and row normalization for car theft complaints.
//!
//! The fetcher pages through the NYPD complaints dataset on the NYC open
//! data portal and normalizes each raw row into a [`TheftRecord`]. The HTTP
//! transport sits behind the [`SodaClient`] trait so the pagination loop can
//! be exercised against a canned source in tests.

pub mod parsing;
pub mod socrata;

use async_trait::async_trait;

pub use socrata::{HttpSodaClient, fetch_thefts};

/// Errors that can occur while fetching or normalizing source data.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A raw upstream row could not be normalized.
    #[error("Normalization error: {message}")]
    Normalization {
        /// Description of what went wrong.
        message: String,
    },
}

/// One page of a Socrata SODA query.
///
/// Implemented over `reqwest` in production ([`HttpSodaClient`]) and over
/// canned data in tests.
#[async_trait]
pub trait SodaClient: Send + Sync {
    /// Fetches `limit` rows starting at `offset`, filtered by the given
    /// `$where` clause.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the request or response decoding fails.
    async fn get_page(
        &self,
        where_clause: &str,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<serde_json::Value>, SourceError>;
}
