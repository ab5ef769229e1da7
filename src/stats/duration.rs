use crate::error::{ExploreError, Result};
use crate::filter::FilteredView;
use chrono::TimeDelta;
use serde::{Serialize, Serializer};
use tracing::{debug, warn};

/// Total and average travel time.
///
/// Trips whose end precedes their start are summed as they are. They are
/// counted in `negative_trips` so callers can flag the data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DurationStats {
    pub trips: usize,
    #[serde(rename = "total_secs", serialize_with = "as_seconds")]
    pub total: TimeDelta,
    #[serde(rename = "mean_secs", serialize_with = "as_seconds")]
    pub mean: TimeDelta,
    pub negative_trips: usize,
}

impl DurationStats {
    #[tracing::instrument(name = "duration_stats", skip_all, fields(records = view.len()))]
    pub fn compute(view: &FilteredView<'_>) -> Result<Self> {
        let trips = view.len();
        if trips == 0 {
            return Err(ExploreError::EmptyDataset);
        }

        let mut total = TimeDelta::zero();
        let mut negative_trips = 0;
        for record in view.iter() {
            let duration = record.duration();
            if duration < TimeDelta::zero() {
                negative_trips += 1;
            }
            total = total + duration;
        }

        if negative_trips > 0 {
            warn!(negative_trips, "Trips ending before they start are included in totals");
        }

        let mean = match i32::try_from(trips) {
            Ok(n) => total / n,
            Err(_) => TimeDelta::milliseconds(total.num_milliseconds() / trips as i64),
        };

        let stats = DurationStats {
            trips,
            total,
            mean,
            negative_trips,
        };
        debug!(?stats, "Duration stats computed");
        Ok(stats)
    }
}

fn as_seconds<S: Serializer>(value: &TimeDelta, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_f64(value.num_milliseconds() as f64 / 1000.0)
}
