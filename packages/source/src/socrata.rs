//! Paginated fetcher for the NYPD complaints Socrata dataset.
//!
//! Pages through the dataset with `$limit`/`$offset`/`$where` query
//! parameters, 2000 rows at a time, and accumulates every matching row in
//! memory. Access is anonymous; Socrata throttles unauthenticated clients
//! but the viewer's result sets are small enough not to care.

use async_trait::async_trait;
use chrono::NaiveDate;
use theft_map_theft_models::{Borough, ResultSet};

use crate::{SodaClient, SourceError, parsing};

/// NYPD complaints dataset (`a9pz-ixz5`) on the NYC open data portal.
pub const NYPD_COMPLAINTS_URL: &str = "https://data.cityofnewyork.us/resource/a9pz-ixz5.json";

/// Rows requested per page.
pub const PAGE_SIZE: u64 = 2000;

/// Production [`SodaClient`] backed by `reqwest`.
pub struct HttpSodaClient {
    client: reqwest::Client,
    api_url: String,
}

impl HttpSodaClient {
    /// Client against the NYPD complaints dataset.
    #[must_use]
    pub fn new() -> Self {
        Self::with_url(NYPD_COMPLAINTS_URL)
    }

    /// Client against an arbitrary SODA resource URL.
    pub fn with_url(api_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
        }
    }
}

impl Default for HttpSodaClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SodaClient for HttpSodaClient {
    async fn get_page(
        &self,
        where_clause: &str,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<serde_json::Value>, SourceError> {
        let limit = limit.to_string();
        let offset = offset.to_string();
        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("$where", where_clause),
                ("$limit", limit.as_str()),
                ("$offset", offset.as_str()),
            ])
            .send()
            .await?;

        let records = response.error_for_status()?.json().await?;
        Ok(records)
    }
}

/// Builds the `$where` predicate filtering by borough and an inclusive
/// complaint-date range.
#[must_use]
pub fn build_where_clause(borough: Borough, start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "boro_nm='{}' AND cmplnt_fr_dt BETWEEN '{}' AND '{}'",
        borough.query_name(),
        start.format("%Y-%m-%d"),
        end.format("%Y-%m-%d")
    )
}

/// Fetches all car theft complaints for a borough over an inclusive date
/// range, normalizing each row.
///
/// Pages advance by [`PAGE_SIZE`] until the source returns a short or empty
/// page. There is no retry or timeout: the first failure aborts the fetch
/// and any rows accumulated from earlier pages are dropped.
///
/// # Errors
///
/// Returns [`SourceError`] if any page request fails or any row cannot be
/// normalized.
pub async fn fetch_thefts<C: SodaClient + ?Sized>(
    client: &C,
    borough: Borough,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<ResultSet, SourceError> {
    let where_clause = build_where_clause(borough, start, end);

    let mut records = Vec::new();
    let mut offset: u64 = 0;

    loop {
        log::info!("Fetching {borough} car theft data: offset={offset}, limit={PAGE_SIZE}");
        let page = client.get_page(&where_clause, PAGE_SIZE, offset).await?;

        let count = page.len() as u64;
        if count == 0 {
            break;
        }

        for row in &page {
            records.push(parsing::normalize_row(row)?);
        }

        if count < PAGE_SIZE {
            break;
        }
        offset += PAGE_SIZE;
    }

    log::info!("Downloaded {} {borough} car theft records total", records.len());
    Ok(ResultSet::new(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    /// Canned source that serves a fixed sequence of page sizes and records
    /// every `(limit, offset)` it is asked for.
    struct PagedClient {
        pages: Vec<usize>,
        calls: Mutex<Vec<(u64, u64)>>,
    }

    impl PagedClient {
        fn new(pages: Vec<usize>) -> Self {
            Self {
                pages,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SodaClient for PagedClient {
        async fn get_page(
            &self,
            _where_clause: &str,
            limit: u64,
            offset: u64,
        ) -> Result<Vec<serde_json::Value>, SourceError> {
            self.calls.lock().unwrap().push((limit, offset));
            let page_index = (offset / PAGE_SIZE) as usize;
            let rows = self.pages.get(page_index).copied().unwrap_or(0);
            Ok((0..rows)
                .map(|_| {
                    json!({
                        "boro_nm": "BRONX",
                        "cmplnt_fr_dt": "2024-03-11T00:00:00.000",
                        "cmplnt_fr_tm": "09:15:00",
                        "latitude": "40.8448",
                        "longitude": "-73.8648",
                    })
                })
                .collect())
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%m/%d/%Y").unwrap()
    }

    #[test]
    fn where_clause_uses_query_name_and_iso_dates() {
        let clause = build_where_clause(
            Borough::StatenIsland,
            date("01/01/2024"),
            date("09/30/2024"),
        );
        assert_eq!(
            clause,
            "boro_nm='STATEN ISLAND' AND cmplnt_fr_dt BETWEEN '2024-01-01' AND '2024-09-30'"
        );
    }

    #[tokio::test]
    async fn pagination_stops_after_short_page() {
        let client = PagedClient::new(vec![2000, 2000, 500]);
        let result = fetch_thefts(&client, Borough::Bronx, date("01/01/2024"), date("09/30/2024"))
            .await
            .unwrap();

        assert_eq!(result.len(), 4500);
        let calls = client.calls.lock().unwrap();
        assert_eq!(*calls, vec![(2000, 0), (2000, 2000), (2000, 4000)]);
    }

    #[tokio::test]
    async fn pagination_stops_on_empty_first_page() {
        let client = PagedClient::new(vec![]);
        let result = fetch_thefts(&client, Borough::Queens, date("01/01/2024"), date("01/02/2024"))
            .await
            .unwrap();

        assert!(result.is_empty());
        assert_eq!(*client.calls.lock().unwrap(), vec![(2000, 0)]);
    }

    #[tokio::test]
    async fn pagination_probes_past_exact_page_boundary() {
        // 2000 rows exactly: the full page forces one more probe that
        // comes back empty.
        let client = PagedClient::new(vec![2000]);
        let result = fetch_thefts(&client, Borough::Queens, date("01/01/2024"), date("01/02/2024"))
            .await
            .unwrap();

        assert_eq!(result.len(), 2000);
        assert_eq!(*client.calls.lock().unwrap(), vec![(2000, 0), (2000, 2000)]);
    }

    #[tokio::test]
    async fn bad_row_aborts_fetch() {
        struct BadRowClient;

        #[async_trait]
        impl SodaClient for BadRowClient {
            async fn get_page(
                &self,
                _where_clause: &str,
                _limit: u64,
                _offset: u64,
            ) -> Result<Vec<serde_json::Value>, SourceError> {
                Ok(vec![json!({"boro_nm": "BRONX"})])
            }
        }

        let err = fetch_thefts(
            &BadRowClient,
            Borough::Bronx,
            date("01/01/2024"),
            date("01/02/2024"),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, SourceError::Normalization { .. }));
    }
}
