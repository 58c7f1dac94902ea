//! Raw row parsing for the NYPD complaints dataset.
//!
//! Upstream rows arrive as loose JSON objects; these helpers pull out and
//! parse the handful of columns the viewer cares about.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use theft_map_theft_models::{Borough, TheftRecord};

use crate::SourceError;

/// Parses a Socrata datetime string (ISO 8601 with optional fractional
/// seconds) and returns its date part.
#[must_use]
pub fn parse_socrata_date(s: &str) -> Option<NaiveDate> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.date());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.date());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Parses a complaint time string (`HH:MM:SS`).
#[must_use]
pub fn parse_complaint_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M:%S").ok()
}

fn field<'a>(row: &'a serde_json::Value, name: &str) -> Result<&'a str, SourceError> {
    row[name]
        .as_str()
        .ok_or_else(|| SourceError::Normalization {
            message: format!("Missing or non-string field '{name}' in upstream row"),
        })
}

fn coordinate(row: &serde_json::Value, name: &str) -> Result<f64, SourceError> {
    field(row, name)?
        .parse::<f64>()
        .map_err(|_| SourceError::Normalization {
            message: format!("Unparseable coordinate '{name}' in upstream row"),
        })
}

/// Normalizes a raw upstream row into a [`TheftRecord`].
///
/// # Errors
///
/// Returns [`SourceError::Normalization`] if any required column is missing
/// or fails to parse. The original data feed occasionally ships rows without
/// coordinates; those surface here as an explicit error rather than a panic.
pub fn normalize_row(row: &serde_json::Value) -> Result<TheftRecord, SourceError> {
    let borough: Borough =
        field(row, "boro_nm")?
            .parse()
            .map_err(|_| SourceError::Normalization {
                message: format!("Unknown borough '{}' in upstream row", row["boro_nm"]),
            })?;

    let date_str = field(row, "cmplnt_fr_dt")?;
    let date = parse_socrata_date(date_str).ok_or_else(|| SourceError::Normalization {
        message: format!("Unparseable complaint date '{date_str}'"),
    })?;

    let time_str = field(row, "cmplnt_fr_tm")?;
    let time = parse_complaint_time(time_str).ok_or_else(|| SourceError::Normalization {
        message: format!("Unparseable complaint time '{time_str}'"),
    })?;

    Ok(TheftRecord {
        borough,
        time,
        date,
        latitude: coordinate(row, "latitude")?,
        longitude: coordinate(row, "longitude")?,
        color: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_row() -> serde_json::Value {
        json!({
            "boro_nm": "QUEENS",
            "cmplnt_fr_dt": "2024-02-05T00:00:00.000",
            "cmplnt_fr_tm": "13:45:00",
            "latitude": "40.7282",
            "longitude": "-73.7949",
        })
    }

    #[test]
    fn parses_socrata_date_with_fractional() {
        let date = parse_socrata_date("2024-01-15T00:00:00.000").unwrap();
        assert_eq!(date.to_string(), "2024-01-15");
    }

    #[test]
    fn parses_socrata_date_without_fractional() {
        let date = parse_socrata_date("2024-01-15T14:30:00").unwrap();
        assert_eq!(date.to_string(), "2024-01-15");
    }

    #[test]
    fn rejects_invalid_date() {
        assert!(parse_socrata_date("not-a-date").is_none());
    }

    #[test]
    fn normalizes_full_row() {
        let record = normalize_row(&sample_row()).unwrap();
        assert_eq!(record.borough.to_string(), "Queens");
        assert_eq!(record.date.to_string(), "2024-02-05");
        assert_eq!(record.time.to_string(), "13:45:00");
        assert!((record.latitude - 40.7282).abs() < f64::EPSILON);
        assert!((record.longitude - -73.7949).abs() < f64::EPSILON);
        assert!(record.color.is_none());
    }

    #[test]
    fn rejects_row_missing_coordinates() {
        let mut row = sample_row();
        row.as_object_mut().unwrap().remove("latitude");
        let err = normalize_row(&row).unwrap_err();
        assert!(matches!(err, SourceError::Normalization { .. }));
    }

    #[test]
    fn rejects_row_with_unknown_borough() {
        let mut row = sample_row();
        row["boro_nm"] = json!("HOBOKEN");
        let err = normalize_row(&row).unwrap_err();
        assert!(matches!(err, SourceError::Normalization { .. }));
    }

    #[test]
    fn rejects_row_with_bad_time() {
        let mut row = sample_row();
        row["cmplnt_fr_tm"] = json!("25:00:00");
        assert!(normalize_row(&row).is_err());
    }
}
