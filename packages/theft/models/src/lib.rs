#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Domain types for NYC car theft complaint records.
//!
//! Defines the normalized theft record, the five-borough enumeration, the
//! closed grouping/sorting mode sets, and the fixed color palettes used to
//! build map-marker legends. Every string-keyed mode in the original form
//! vocabulary is a Rust enum here so that an unrecognized value is a parse
//! error at the boundary instead of a lookup failure deep in a handler.

use chrono::{Month, NaiveDate, NaiveTime, Weekday};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use strum_macros::{AsRefStr, Display, EnumString};

/// One of New York City's five administrative regions.
///
/// Parses from both the search-form vocabulary (`"bronx"`,
/// `"staten_island"`, ...) and the upstream `boro_nm` column values
/// (`"BRONX"`, `"STATEN ISLAND"`, ...).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Borough {
    /// The Bronx.
    #[strum(serialize = "bronx", to_string = "Bronx")]
    #[serde(rename = "Bronx")]
    Bronx,
    /// Brooklyn.
    #[strum(serialize = "brooklyn", to_string = "Brooklyn")]
    #[serde(rename = "Brooklyn")]
    Brooklyn,
    /// Manhattan.
    #[strum(serialize = "manhattan", to_string = "Manhattan")]
    #[serde(rename = "Manhattan")]
    Manhattan,
    /// Queens.
    #[strum(serialize = "queens", to_string = "Queens")]
    #[serde(rename = "Queens")]
    Queens,
    /// Staten Island.
    #[strum(
        serialize = "staten_island",
        serialize = "staten island",
        to_string = "Staten Island"
    )]
    #[serde(rename = "Staten Island")]
    StatenIsland,
}

impl Borough {
    /// All five boroughs, in form-option order.
    #[must_use]
    pub const fn all() -> &'static [Self; 5] {
        &[
            Self::Bronx,
            Self::Brooklyn,
            Self::Manhattan,
            Self::Queens,
            Self::StatenIsland,
        ]
    }

    /// The uppercase `boro_nm` value used in upstream `$where` filters.
    ///
    /// Note the space in `"STATEN ISLAND"`: naively uppercasing the form
    /// value would produce `"STATEN_ISLAND"`, which matches nothing in the
    /// dataset.
    #[must_use]
    pub const fn query_name(self) -> &'static str {
        match self {
            Self::Bronx => "BRONX",
            Self::Brooklyn => "BROOKLYN",
            Self::Manhattan => "MANHATTAN",
            Self::Queens => "QUEENS",
            Self::StatenIsland => "STATEN ISLAND",
        }
    }
}

/// A single normalized car theft complaint.
///
/// Produced by the source fetcher from a raw upstream row. Immutable except
/// for `color`, which the classifier fills in when building a map layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TheftRecord {
    /// Borough where the complaint was filed.
    pub borough: Borough,
    /// Complaint time of day, serialized as `HH:MM:SS`.
    #[serde(serialize_with = "serialize_time")]
    pub time: NaiveTime,
    /// Complaint date, serialized as `MM/DD/YYYY`.
    #[serde(serialize_with = "serialize_us_date")]
    pub date: NaiveDate,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Display color assigned by the classifier. Absent until classified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
}

fn serialize_time<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&time.format("%H:%M:%S"))
}

fn serialize_us_date<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&date.format("%m/%d/%Y"))
}

/// An ordered set of theft records plus the legend attached after
/// classification.
///
/// Record order is whatever the upstream source returned; it is not
/// guaranteed chronological.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResultSet {
    /// The records, in upstream order.
    pub results: Vec<TheftRecord>,
    /// Bucket legend. `None` until the set has been classified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
}

impl ResultSet {
    /// Wraps a record vector with no legend.
    #[must_use]
    pub const fn new(results: Vec<TheftRecord>) -> Self {
        Self {
            results,
            legend: None,
        }
    }

    /// Number of records in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// `true` if the set holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Map-marker grouping dimension selected on the search form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum GroupBy {
    /// Morning / Afternoon / Evening segments.
    TimeOfDay,
    /// Monday through Sunday.
    DayOfWeek,
    /// January through December.
    Month,
}

/// Bar-chart bucketing period for the plot slide sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum SortPeriod {
    /// Monday-starting 7-day windows.
    Week,
    /// Calendar months (`YYYY-MM`).
    Month,
}

/// Segment of the day a complaint time falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
pub enum TimeOfDay {
    /// Before 12:00:00.
    Morning,
    /// 12:00:00 up to (not including) 17:00:00.
    Afternoon,
    /// 17:00:00 onward.
    Evening,
}

impl TimeOfDay {
    /// All segments in display order.
    #[must_use]
    pub const fn all() -> &'static [Self; 3] {
        &[Self::Morning, Self::Afternoon, Self::Evening]
    }

    /// Buckets a complaint time. Boundaries are inclusive-low,
    /// exclusive-high: 11:59:59 is Morning, 12:00:00 is Afternoon,
    /// 16:59:59 is Afternoon, 17:00:00 is Evening.
    #[must_use]
    pub fn from_time(time: NaiveTime) -> Self {
        const NOON: NaiveTime = match NaiveTime::from_hms_opt(12, 0, 0) {
            Some(t) => t,
            None => unreachable!(),
        };
        const FIVE_PM: NaiveTime = match NaiveTime::from_hms_opt(17, 0, 0) {
            Some(t) => t,
            None => unreachable!(),
        };

        if time < NOON {
            Self::Morning
        } else if time < FIVE_PM {
            Self::Afternoon
        } else {
            Self::Evening
        }
    }

    /// Display label for this segment, independent of any borrow.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Morning => "Morning",
            Self::Afternoon => "Afternoon",
            Self::Evening => "Evening",
        }
    }

    /// Marker color for this segment.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Morning => "blue",
            Self::Afternoon => "green",
            Self::Evening => "red",
        }
    }
}

/// Weekdays in legend order (Monday first).
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Months in legend order.
pub const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

/// Full English weekday name (`chrono`'s `Display` is the abbreviated form).
#[must_use]
pub const fn weekday_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Marker color for a weekday bucket.
#[must_use]
pub const fn weekday_color(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "blue",
        Weekday::Tue => "green",
        Weekday::Wed => "yellow",
        Weekday::Thu => "orange",
        Weekday::Fri => "red",
        Weekday::Sat => "purple",
        Weekday::Sun => "pink",
    }
}

/// Marker color for a month bucket.
#[must_use]
pub const fn month_color(month: Month) -> &'static str {
    match month {
        Month::January => "lightblue",
        Month::February => "lightgreen",
        Month::March => "yellow",
        Month::April => "darkblue",
        Month::May => "red",
        Month::June => "purple",
        Month::July => "pink",
        Month::August => "brown",
        Month::September => "darkgreen",
        Month::October => "orange",
        Month::November => "gray",
        Month::December => "cyan",
    }
}

/// One legend row: a bucket label, its fixed color, and how many records
/// landed in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegendBucket {
    /// Bucket display label (e.g. `"Morning"`, `"Monday"`, `"January"`).
    pub label: &'static str,
    /// Marker color for the bucket.
    pub color: &'static str,
    /// Number of classified records in the bucket.
    pub count: u64,
}

/// Ordered bucket legend for one grouping mode.
///
/// Every bucket of the mode is present from construction with a zero count
/// (3 for time-of-day, 7 for day-of-week, 12 for month); classification only
/// increments counts. Serializes as a JSON object in bucket order, each value
/// a `[color, count]` pair, matching the shape the map frontend consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Legend {
    buckets: Vec<LegendBucket>,
}

impl Legend {
    /// Builds the zero-count legend for a grouping mode.
    #[must_use]
    pub fn for_mode(mode: GroupBy) -> Self {
        let buckets = match mode {
            GroupBy::TimeOfDay => TimeOfDay::all()
                .iter()
                .map(|segment| LegendBucket {
                    label: segment.label(),
                    color: segment.color(),
                    count: 0,
                })
                .collect(),
            GroupBy::DayOfWeek => WEEKDAYS
                .iter()
                .map(|&day| LegendBucket {
                    label: weekday_label(day),
                    color: weekday_color(day),
                    count: 0,
                })
                .collect(),
            GroupBy::Month => MONTHS
                .iter()
                .map(|&month| LegendBucket {
                    label: month.name(),
                    color: month_color(month),
                    count: 0,
                })
                .collect(),
        };

        Self { buckets }
    }

    /// Increments the named bucket's count and returns its color, or `None`
    /// if no bucket carries that label.
    pub fn increment(&mut self, label: &str) -> Option<&'static str> {
        let bucket = self.buckets.iter_mut().find(|b| b.label == label)?;
        bucket.count += 1;
        Some(bucket.color)
    }

    /// The buckets in display order.
    #[must_use]
    pub fn buckets(&self) -> &[LegendBucket] {
        &self.buckets
    }

    /// Sum of all bucket counts.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.buckets.iter().map(|b| b.count).sum()
    }
}

impl Serialize for Legend {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.buckets.len()))?;
        for bucket in &self.buckets {
            map.serialize_entry(bucket.label, &(bucket.color, bucket.count))?;
        }
        map.end()
    }
}
