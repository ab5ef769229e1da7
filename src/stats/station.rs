use crate::error::{ExploreError, Result};
use crate::filter::FilteredView;
use crate::record::route_label;
use crate::stats::utility::mode;
use serde::Serialize;
use tracing::debug;

/// Most popular stations and trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationStats {
    pub common_start: String,
    pub common_end: String,
    /// `"{start} TO {end}"` of the most frequent station pair.
    pub common_route: String,
}

impl StationStats {
    #[tracing::instrument(name = "station_stats", skip_all, fields(records = view.len()))]
    pub fn compute(view: &FilteredView<'_>) -> Result<Self> {
        let start = mode(view.iter().map(|r| r.start_station.as_str()))
            .ok_or(ExploreError::EmptyDataset)?;
        let end = mode(view.iter().map(|r| r.end_station.as_str()))
            .ok_or(ExploreError::EmptyDataset)?;
        let (route_start, route_end) = mode(
            view.iter()
                .map(|r| (r.start_station.as_str(), r.end_station.as_str())),
        )
        .ok_or(ExploreError::EmptyDataset)?;

        let stats = StationStats {
            common_start: start.to_string(),
            common_end: end.to_string(),
            common_route: route_label(route_start, route_end),
        };
        debug!(?stats, "Station stats computed");
        Ok(stats)
    }
}
