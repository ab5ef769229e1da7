//! In-memory trip record store.
//!
//! A [`RecordSet`] is read once from a bikeshare CSV export and never mutated
//! afterwards. Month, weekday, hour and duration are derived from the stored
//! timestamps on demand. Which optional demographic columns the file carries is
//! decided from the header row and exposed as a [`Schema`].

use crate::error::{ExploreError, Result};
use chrono::{Datelike, Month, NaiveDateTime, TimeDelta, Timelike, Weekday};
use serde::{Deserialize, Serialize, Serializer};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const START_TIME: &str = "Start Time";
pub const END_TIME: &str = "End Time";
pub const START_STATION: &str = "Start Station";
pub const END_STATION: &str = "End Station";
pub const USER_TYPE: &str = "User Type";
pub const GENDER: &str = "Gender";
pub const BIRTH_YEAR: &str = "Birth Year";

const REQUIRED_COLUMNS: [&str; 5] = [START_TIME, END_TIME, START_STATION, END_STATION, USER_TYPE];

/// Timestamp layouts seen in the city exports. `%.f` also matches no fraction.
const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const MONTHS: [Month; 12] = [
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

/// Full English name of a weekday ("Monday").
pub fn weekday_name(day: Weekday) -> &'static str {
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

pub(crate) fn serialize_month<S: Serializer>(
    month: &Month,
    s: S,
) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(month.name())
}

pub(crate) fn serialize_weekday<S: Serializer>(
    day: &Weekday,
    s: S,
) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(weekday_name(*day))
}

/// One bikeshare trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TripRecord {
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub start_station: String,
    pub end_station: String,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,
}

impl TripRecord {
    pub fn month(&self) -> Month {
        MONTHS[self.start_time.month0() as usize]
    }

    pub fn day_of_week(&self) -> Weekday {
        self.start_time.weekday()
    }

    pub fn hour(&self) -> u32 {
        self.start_time.hour()
    }

    /// Travel time. Negative when the export has the end before the start.
    pub fn duration(&self) -> TimeDelta {
        self.end_time - self.start_time
    }

    pub fn route(&self) -> String {
        route_label(&self.start_station, &self.end_station)
    }
}

pub fn route_label(start: &str, end: &str) -> String {
    format!("{start} TO {end}")
}

/// Optional columns present in a dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub has_gender: bool,
    pub has_birth_year: bool,
}

impl Schema {
    fn from_headers(headers: &csv::StringRecord) -> Self {
        Schema {
            has_gender: headers.iter().any(|h| h == GENDER),
            has_birth_year: headers.iter().any(|h| h == BIRTH_YEAR),
        }
    }
}

/// A single CSV row as it appears in the export, before timestamp parsing.
#[derive(Debug, Deserialize)]
struct RawTrip {
    #[serde(rename = "Start Time")]
    start_time: String,
    #[serde(rename = "End Time")]
    end_time: String,
    #[serde(rename = "Start Station")]
    start_station: String,
    #[serde(rename = "End Station")]
    end_station: String,
    #[serde(rename = "User Type")]
    user_type: Option<String>,
    #[serde(rename = "Gender", default)]
    gender: Option<String>,
    #[serde(rename = "Birth Year", default)]
    birth_year: Option<String>,
}

/// Ordered, immutable collection of trips loaded from one dataset.
#[derive(Debug, Clone)]
pub struct RecordSet {
    source: PathBuf,
    schema: Schema,
    records: Vec<TripRecord>,
}

impl RecordSet {
    pub fn from_records(
        source: impl Into<PathBuf>,
        schema: Schema,
        records: Vec<TripRecord>,
    ) -> Self {
        RecordSet {
            source: source.into(),
            schema,
            records,
        }
    }

    /// Opens and reads a CSV export. The file is closed before returning.
    #[tracing::instrument(skip(path), fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| ExploreError::data_load(path, e))?;
        Self::from_reader(file, path)
    }

    /// Reads trips from any CSV source. `source` only labels errors.
    pub fn from_reader<R: Read>(reader: R, source: impl Into<PathBuf>) -> Result<Self> {
        let source = source.into();
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr
            .headers()
            .map_err(|e| ExploreError::data_load(&source, e))?
            .clone();

        if let Some(missing) = REQUIRED_COLUMNS
            .iter()
            .find(|column| !headers.iter().any(|h| h == **column))
        {
            return Err(ExploreError::data_load(
                &source,
                format!("missing required column {missing:?}"),
            ));
        }

        let schema = Schema::from_headers(&headers);
        let mut records = Vec::new();

        for row in rdr.records() {
            let row = row.map_err(|e| ExploreError::data_load(&source, e))?;
            let line = row.position().map(|p| p.line()).unwrap_or_default();
            let raw: RawTrip = row
                .deserialize(Some(&headers))
                .map_err(|e| ExploreError::data_load(&source, e))?;
            let record = parse_trip(raw).map_err(|message| {
                ExploreError::data_load(&source, format!("line {line}: {message}"))
            })?;
            records.push(record);
        }

        info!(
            source = %source.display(),
            records = records.len(),
            has_gender = schema.has_gender,
            has_birth_year = schema.has_birth_year,
            "Trip data loaded"
        );

        Ok(RecordSet {
            source,
            schema,
            records,
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn schema(&self) -> Schema {
        self.schema
    }

    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TripRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn parse_trip(raw: RawTrip) -> std::result::Result<TripRecord, String> {
    let start_time = parse_timestamp(&raw.start_time).ok_or_else(|| {
        format!("unparseable {START_TIME} {:?}", raw.start_time)
    })?;
    let end_time = parse_timestamp(&raw.end_time)
        .ok_or_else(|| format!("unparseable {END_TIME} {:?}", raw.end_time))?;

    let birth_year = match non_blank(raw.birth_year) {
        Some(value) => Some(
            parse_year(&value).ok_or_else(|| format!("unparseable {BIRTH_YEAR} {value:?}"))?,
        ),
        None => None,
    };

    Ok(TripRecord {
        start_time,
        end_time,
        start_station: raw.start_station,
        end_station: raw.end_station,
        user_type: non_blank(raw.user_type),
        gender: non_blank(raw.gender),
        birth_year,
    })
}

pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

/// Accepts `1989` as well as the float rendering `1989.0` used by some exports.
fn parse_year(value: &str) -> Option<i32> {
    if let Ok(year) = value.parse::<i32>() {
        return Some(year);
    }
    let year = value.parse::<f64>().ok()?;
    if year.is_finite() && year.fract() == 0.0 && year.abs() <= i32::MAX as f64 {
        Some(year as i32)
    } else {
        debug!(value, "Rejected birth year");
        None
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
