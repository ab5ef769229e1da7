use crate::city::City;
use crate::error::{ExploreError, Result};
use crate::filter::FilterSpec;
use crate::record::{RecordSet, weekday_name};
use crate::stats::{DurationStats, FieldStat, StationStats, TimeStats, UserStats};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

/// All aggregations for one city and filter. A section is `None` when it
/// had no trips to summarize.
///
/// Travel times cover every trip in the dataset. Station, duration and user
/// sections cover only the trips selected by the filter.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub city: City,
    pub filter: String,
    pub total_trips: usize,
    pub trips: usize,
    pub time: Option<TimeStats>,
    pub stations: Option<StationStats>,
    pub durations: Option<DurationStats>,
    pub users: UserStats,
}

impl Report {
    #[tracing::instrument(
        skip_all,
        fields(city = %city, filter = %filter, records = records.len())
    )]
    pub fn build(city: City, records: &RecordSet, filter: FilterSpec) -> Result<Self> {
        let all = FilterSpec::NoFilter.apply(records);
        let view = filter.apply(records);
        let report = Report {
            generated_at: Utc::now(),
            city,
            filter: filter.to_string(),
            total_trips: all.len(),
            trips: view.len(),
            time: recover_empty("time", TimeStats::compute(&all))?,
            stations: recover_empty("stations", StationStats::compute(&view))?,
            durations: recover_empty("durations", DurationStats::compute(&view))?,
            users: UserStats::compute(&view)?,
        };
        info!("Report built");
        Ok(report)
    }

    /// Flattens the report into one CSV-friendly row.
    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            generated_at: self.generated_at,
            city: self.city.as_str().to_string(),
            filter: self.filter.clone(),
            trips: self.trips,
            total_trips: self.total_trips,
            common_month: self.time.as_ref().map(|t| t.month.name().to_string()),
            common_day: self
                .time
                .as_ref()
                .map(|t| weekday_name(t.day_of_week).to_string()),
            common_hour: self.time.as_ref().map(|t| t.hour),
            common_start_station: self.stations.as_ref().map(|s| s.common_start.clone()),
            common_end_station: self.stations.as_ref().map(|s| s.common_end.clone()),
            common_route: self.stations.as_ref().map(|s| s.common_route.clone()),
            total_duration_secs: self.durations.as_ref().map(|d| d.total.num_seconds()),
            mean_duration_secs: self.durations.as_ref().map(|d| d.mean.num_seconds()),
            negative_trips: self.durations.as_ref().map(|d| d.negative_trips),
            top_user_type: self.users.user_types.first().map(|(t, _)| t.clone()),
            earliest_birth_year: self.users.birth_year.available().map(|b| b.earliest),
            most_recent_birth_year: self.users.birth_year.available().map(|b| b.most_recent),
            common_birth_year: self.users.birth_year.available().map(|b| b.most_common),
            gender_available: !matches!(self.users.gender, FieldStat::Unavailable),
        }
    }
}

fn recover_empty<T>(section: &str, result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(ExploreError::EmptyDataset) => {
            warn!(section, "No trips to summarize");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// One row of the summary CSV export.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub generated_at: DateTime<Utc>,
    pub city: String,
    pub filter: String,
    pub trips: usize,
    pub total_trips: usize,
    pub common_month: Option<String>,
    pub common_day: Option<String>,
    pub common_hour: Option<u32>,
    pub common_start_station: Option<String>,
    pub common_end_station: Option<String>,
    pub common_route: Option<String>,
    pub total_duration_secs: Option<i64>,
    pub mean_duration_secs: Option<i64>,
    pub negative_trips: Option<usize>,
    pub top_user_type: Option<String>,
    pub earliest_birth_year: Option<i32>,
    pub most_recent_birth_year: Option<i32>,
    pub common_birth_year: Option<i32>,
    pub gender_available: bool,
}
