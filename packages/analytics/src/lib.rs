#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Temporal grouping and color classification for theft result sets.
//!
//! Two independent consumers of a fetched [`ResultSet`]: the grouper turns
//! it into parallel label/count sequences for a bar chart, and the
//! classifier attaches a marker color to every record and builds the legend
//! shown next to the map.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};
use theft_map_theft_models::{
    GroupBy, Legend, ResultSet, SortPeriod, TimeOfDay, weekday_label,
};

/// Errors that can occur during grouping or classification.
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    /// A mode string from an untrusted boundary did not match any known
    /// value.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of what went wrong.
        message: String,
    },
}

/// Parses a search-form grouping mode, rejecting anything outside the
/// closed set.
///
/// # Errors
///
/// Returns [`AnalyticsError::InvalidArgument`] for an unrecognized value.
pub fn parse_group_by(value: &str) -> Result<GroupBy, AnalyticsError> {
    value
        .parse()
        .map_err(|_| AnalyticsError::InvalidArgument {
            message: format!("Unknown grouping mode '{value}'"),
        })
}

/// Parses a plot sort period, rejecting anything outside the closed set.
///
/// # Errors
///
/// Returns [`AnalyticsError::InvalidArgument`] for an unrecognized value.
pub fn parse_sort_period(value: &str) -> Result<SortPeriod, AnalyticsError> {
    value
        .parse()
        .map_err(|_| AnalyticsError::InvalidArgument {
            message: format!("Unknown sort period '{value}'"),
        })
}

/// Monday of the week containing `date`.
#[must_use]
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_monday()))
}

fn week_label(start: NaiveDate) -> String {
    let end = start + Days::new(6);
    format!("{} - {}", start.format("%m/%d/%y"), end.format("%m/%d/%y"))
}

/// Buckets record counts into labeled periods for the bar chart.
///
/// Returns parallel sequences of period labels and counts, sorted ascending
/// by period start. Week labels are `"MM/DD/YY - MM/DD/YY"` ranges over the
/// Monday-starting window containing each record's date; month labels are
/// `"YYYY-MM"`. Only periods with at least one record appear — empty buckets
/// are not zero-filled, unlike the classifier's legend.
#[must_use]
pub fn group_by_period(result_set: &ResultSet, period: SortPeriod) -> (Vec<String>, Vec<u64>) {
    match period {
        SortPeriod::Week => {
            // Keyed by window start so ordering never re-parses labels.
            let mut counts: BTreeMap<NaiveDate, u64> = BTreeMap::new();
            for record in &result_set.results {
                *counts.entry(week_start(record.date)).or_insert(0) += 1;
            }
            counts
                .into_iter()
                .map(|(start, count)| (week_label(start), count))
                .unzip()
        }
        SortPeriod::Month => {
            // Zero-padded YYYY-MM sorts lexicographically == chronologically.
            let mut counts: BTreeMap<String, u64> = BTreeMap::new();
            for record in &result_set.results {
                *counts
                    .entry(record.date.format("%Y-%m").to_string())
                    .or_insert(0) += 1;
            }
            counts.into_iter().unzip()
        }
    }
}

/// Attaches a marker color to every record and builds the legend for the
/// selected grouping mode.
///
/// The legend starts with every bucket of the mode present at count zero;
/// each record increments exactly one bucket, so the legend total always
/// equals the record count.
///
/// # Errors
///
/// Returns [`AnalyticsError::InvalidArgument`] if a computed bucket label is
/// missing from the legend. The bucket tables are closed enumerations, so
/// this indicates a palette/label mismatch rather than bad input data.
pub fn classify(mut result_set: ResultSet, group_by: GroupBy) -> Result<ResultSet, AnalyticsError> {
    let mut legend = Legend::for_mode(group_by);

    for record in &mut result_set.results {
        let label = match group_by {
            GroupBy::TimeOfDay => TimeOfDay::from_time(record.time).label(),
            GroupBy::DayOfWeek => weekday_label(record.date.weekday()),
            GroupBy::Month => chrono::Month::try_from(record.date.month() as u8)
                .map_err(|_| AnalyticsError::InvalidArgument {
                    message: format!("Month out of range for date {}", record.date),
                })?
                .name(),
        };

        record.color = Some(legend.increment(label).ok_or_else(|| {
            AnalyticsError::InvalidArgument {
                message: format!("No legend bucket for label '{label}'"),
            }
        })?);
    }

    result_set.legend = Some(legend);
    Ok(result_set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use theft_map_theft_models::{Borough, TheftRecord};

    fn record(date: &str, time: &str) -> TheftRecord {
        TheftRecord {
            borough: Borough::Brooklyn,
            time: NaiveTime::parse_from_str(time, "%H:%M:%S").unwrap(),
            date: NaiveDate::parse_from_str(date, "%m/%d/%Y").unwrap(),
            latitude: 40.6782,
            longitude: -73.9442,
            color: None,
        }
    }

    fn result_set(dates: &[(&str, &str)]) -> ResultSet {
        ResultSet::new(dates.iter().map(|(d, t)| record(d, t)).collect())
    }

    #[test]
    fn week_start_is_monday() {
        // 03/13/2024 is a Wednesday.
        let start = week_start(NaiveDate::from_ymd_opt(2024, 3, 13).unwrap());
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
        assert_eq!(start.weekday(), chrono::Weekday::Mon);
        // A Monday maps to itself.
        assert_eq!(week_start(start), start);
    }

    #[test]
    fn groups_by_month() {
        let set = result_set(&[
            ("01/30/2024", "10:00:00"),
            ("02/01/2024", "10:00:00"),
            ("02/05/2024", "10:00:00"),
        ]);
        let (labels, counts) = group_by_period(&set, SortPeriod::Month);
        assert_eq!(labels, vec!["2024-01", "2024-02"]);
        assert_eq!(counts, vec![1, 2]);
    }

    #[test]
    fn month_labels_sort_across_year_boundary() {
        let set = result_set(&[
            ("01/05/2024", "10:00:00"),
            ("12/20/2023", "10:00:00"),
            ("11/02/2023", "10:00:00"),
        ]);
        let (labels, _) = group_by_period(&set, SortPeriod::Month);
        assert_eq!(labels, vec!["2023-11", "2023-12", "2024-01"]);
    }

    #[test]
    fn groups_by_week_with_monday_ranges() {
        // 03/11/2024 (Mon) and 03/13/2024 (Wed) share a window;
        // 03/18/2024 (Mon) starts the next one.
        let set = result_set(&[
            ("03/13/2024", "10:00:00"),
            ("03/11/2024", "10:00:00"),
            ("03/18/2024", "10:00:00"),
        ]);
        let (labels, counts) = group_by_period(&set, SortPeriod::Week);
        assert_eq!(labels, vec!["03/11/24 - 03/17/24", "03/18/24 - 03/24/24"]);
        assert_eq!(counts, vec![2, 1]);
    }

    #[test]
    fn week_ranges_span_seven_days() {
        let set = result_set(&[("06/15/2024", "10:00:00"), ("12/31/2023", "10:00:00")]);
        let (labels, _) = group_by_period(&set, SortPeriod::Week);
        for label in labels {
            let (start, end) = label.split_once(" - ").unwrap();
            let start = NaiveDate::parse_from_str(start, "%m/%d/%y").unwrap();
            let end = NaiveDate::parse_from_str(end, "%m/%d/%y").unwrap();
            assert_eq!(start.weekday(), chrono::Weekday::Mon);
            assert_eq!(end - start, chrono::Duration::days(6));
        }
    }

    #[test]
    fn week_windows_sort_by_start_date_not_label() {
        // Lexicographic label order would put 01/06/25 before 12/30/24.
        let set = result_set(&[("01/08/2025", "10:00:00"), ("12/31/2024", "10:00:00")]);
        let (labels, _) = group_by_period(&set, SortPeriod::Week);
        assert_eq!(labels, vec!["12/30/24 - 01/05/25", "01/06/25 - 01/12/25"]);
    }

    #[test]
    fn grouping_empty_set_is_empty() {
        let set = ResultSet::default();
        let (labels, counts) = group_by_period(&set, SortPeriod::Week);
        assert!(labels.is_empty());
        assert!(counts.is_empty());
    }

    #[test]
    fn classify_partitions_all_records() {
        let set = result_set(&[
            ("03/11/2024", "08:00:00"),
            ("03/12/2024", "13:00:00"),
            ("03/13/2024", "20:00:00"),
            ("03/14/2024", "11:59:59"),
        ]);
        for mode in [GroupBy::TimeOfDay, GroupBy::DayOfWeek, GroupBy::Month] {
            let classified = classify(set.clone(), mode).unwrap();
            let legend = classified.legend.unwrap();
            assert_eq!(legend.total(), 4, "{mode}");
            assert!(classified.results.iter().all(|r| r.color.is_some()));
        }
    }

    #[test]
    fn classify_by_time_of_day_boundaries() {
        let set = result_set(&[
            ("03/11/2024", "11:59:59"),
            ("03/11/2024", "12:00:00"),
            ("03/11/2024", "16:59:59"),
            ("03/11/2024", "17:00:00"),
        ]);
        let classified = classify(set, GroupBy::TimeOfDay).unwrap();
        let colors: Vec<_> = classified.results.iter().map(|r| r.color.unwrap()).collect();
        assert_eq!(colors, vec!["blue", "green", "green", "red"]);

        let legend = classified.legend.unwrap();
        let counts: Vec<_> = legend.buckets().iter().map(|b| (b.label, b.count)).collect();
        assert_eq!(
            counts,
            vec![("Morning", 1), ("Afternoon", 2), ("Evening", 1)]
        );
    }

    #[test]
    fn classify_by_day_of_week() {
        // 03/11/2024 is a Monday, 03/16/2024 a Saturday.
        let set = result_set(&[("03/11/2024", "10:00:00"), ("03/16/2024", "10:00:00")]);
        let classified = classify(set, GroupBy::DayOfWeek).unwrap();
        assert_eq!(classified.results[0].color, Some("blue"));
        assert_eq!(classified.results[1].color, Some("purple"));
    }

    #[test]
    fn classify_by_month_colors_and_counts() {
        let set = result_set(&[
            ("01/30/2024", "10:00:00"),
            ("02/01/2024", "10:00:00"),
            ("02/05/2024", "10:00:00"),
        ]);
        let classified = classify(set, GroupBy::Month).unwrap();
        assert_eq!(classified.results[0].color, Some("lightblue"));
        assert_eq!(classified.results[1].color, Some("lightgreen"));

        let legend = classified.legend.unwrap();
        assert_eq!(legend.buckets().len(), 12);
        let january = legend.buckets().iter().find(|b| b.label == "January").unwrap();
        assert_eq!((january.color, january.count), ("lightblue", 1));
        let march = legend.buckets().iter().find(|b| b.label == "March").unwrap();
        assert_eq!(march.count, 0);
    }

    #[test]
    fn classify_empty_set_keeps_zeroed_legend() {
        let classified = classify(ResultSet::default(), GroupBy::Month).unwrap();
        let legend = classified.legend.unwrap();
        assert_eq!(legend.buckets().len(), 12);
        assert_eq!(legend.total(), 0);
    }

    #[test]
    fn mode_parsers_reject_unknown_values() {
        assert!(matches!(
            parse_group_by("hour"),
            Err(AnalyticsError::InvalidArgument { .. })
        ));
        assert!(matches!(
            parse_sort_period("fortnight"),
            Err(AnalyticsError::InvalidArgument { .. })
        ));
        assert!(parse_group_by("day_of_week").is_ok());
        assert!(parse_sort_period("month").is_ok());
    }

    #[test]
    fn classified_set_serializes_with_legend() {
        let set = result_set(&[("03/11/2024", "08:00:00")]);
        let classified = classify(set, GroupBy::TimeOfDay).unwrap();
        let json = serde_json::to_value(&classified).unwrap();
        assert_eq!(json["results"][0]["color"], "blue");
        assert_eq!(json["legend"]["Morning"][0], "blue");
        assert_eq!(json["legend"]["Morning"][1], 1);
    }
}
