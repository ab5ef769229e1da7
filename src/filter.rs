//! Month/day filtering over a [`RecordSet`].

use crate::error::{ExploreError, Result};
use crate::record::{RecordSet, Schema, TripRecord, weekday_name};
use chrono::{Month, Weekday};
use std::fmt;
use tracing::debug;

/// Months covered by the bikeshare exports.
pub const FILTER_MONTHS: [Month; 6] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
];

/// At most one time dimension is active; month and day never combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterSpec {
    #[default]
    NoFilter,
    ByMonth(Month),
    ByDay(Weekday),
}

impl FilterSpec {
    /// Parses a month name (case-insensitive). Only January through June are valid.
    pub fn by_month(name: &str) -> Result<Self> {
        let name = name.trim();
        FILTER_MONTHS
            .into_iter()
            .find(|month| month.name().eq_ignore_ascii_case(name))
            .map(FilterSpec::ByMonth)
            .ok_or_else(|| {
                ExploreError::InvalidFilter(format!(
                    "{name:?} is not one of January, February, March, April, May or June"
                ))
            })
    }

    /// Parses a full weekday name (case-insensitive).
    pub fn by_day(name: &str) -> Result<Self> {
        let name = name.trim();
        [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ]
        .into_iter()
        .find(|day| weekday_name(*day).eq_ignore_ascii_case(name))
        .map(FilterSpec::ByDay)
        .ok_or_else(|| {
            ExploreError::InvalidFilter(format!("{name:?} is not a day of the week"))
        })
    }

    pub fn matches(&self, record: &TripRecord) -> bool {
        match self {
            FilterSpec::NoFilter => true,
            FilterSpec::ByMonth(month) => record.month() == *month,
            FilterSpec::ByDay(day) => record.day_of_week() == *day,
        }
    }

    /// Selects matching records from `records`, keeping file order.
    #[tracing::instrument(skip(records), fields(filter = %self, source_records = records.len()))]
    pub fn apply<'a>(&self, records: &'a RecordSet) -> FilteredView<'a> {
        let selected: Vec<&TripRecord> = records.iter().filter(|r| self.matches(r)).collect();
        debug!(selected = selected.len(), "Filter applied");

        FilteredView {
            schema: records.schema(),
            filter: *self,
            records: selected,
        }
    }
}

impl fmt::Display for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterSpec::NoFilter => f.write_str("none"),
            FilterSpec::ByMonth(month) => write!(f, "month={}", month.name()),
            FilterSpec::ByDay(day) => write!(f, "day={}", weekday_name(*day)),
        }
    }
}

/// Applies `spec` to `records`. See [`FilterSpec::apply`].
pub fn apply<'a>(records: &'a RecordSet, spec: FilterSpec) -> FilteredView<'a> {
    spec.apply(records)
}

/// Read-only ordered subset of a [`RecordSet`], borrowing its records.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    schema: Schema,
    filter: FilterSpec,
    records: Vec<&'a TripRecord>,
}

impl<'a> FilteredView<'a> {
    pub fn schema(&self) -> Schema {
        self.schema
    }

    pub fn filter(&self) -> FilterSpec {
        self.filter
    }

    pub fn records(&self) -> &[&'a TripRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a TripRecord> + '_ {
        self.records.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
