use crate::error::{ExploreError, Result};
use crate::filter::FilteredView;
use crate::record::{serialize_month, serialize_weekday};
use crate::stats::utility::mode;
use chrono::{Month, Weekday};
use serde::Serialize;
use tracing::debug;

/// Most frequent times of travel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeStats {
    #[serde(serialize_with = "serialize_month")]
    pub month: Month,
    #[serde(serialize_with = "serialize_weekday")]
    pub day_of_week: Weekday,
    pub hour: u32,
}

impl TimeStats {
    #[tracing::instrument(name = "time_stats", skip_all, fields(records = view.len()))]
    pub fn compute(view: &FilteredView<'_>) -> Result<Self> {
        let month = mode(view.iter().map(|r| r.month())).ok_or(ExploreError::EmptyDataset)?;
        let day_of_week =
            mode(view.iter().map(|r| r.day_of_week())).ok_or(ExploreError::EmptyDataset)?;
        let hour = mode(view.iter().map(|r| r.hour())).ok_or(ExploreError::EmptyDataset)?;

        let stats = TimeStats {
            month,
            day_of_week,
            hour,
        };
        debug!(?stats, "Time stats computed");
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterSpec;
    use crate::test_support::{trip, trip_set};

    #[test]
    fn test_single_trip() {
        let set = trip_set(vec![trip(
            "2017-01-01 08:00:00",
            "2017-01-01 08:10:00",
            "A",
            "B",
        )]);
        let stats = TimeStats::compute(&FilterSpec::NoFilter.apply(&set)).unwrap();

        assert_eq!(stats.month, Month::January);
        assert_eq!(stats.day_of_week, Weekday::Sun);
        assert_eq!(stats.hour, 8);
    }

    #[test]
    fn test_modes() {
        let set = trip_set(vec![
            trip("2017-03-06 17:00:00", "2017-03-06 17:10:00", "A", "B"), // Monday
            trip("2017-05-02 08:15:00", "2017-05-02 08:20:00", "A", "B"), // Tuesday
            trip("2017-05-09 17:40:00", "2017-05-09 17:50:00", "A", "B"), // Tuesday
            trip("2017-05-20 12:00:00", "2017-05-20 12:30:00", "A", "B"), // Saturday
        ]);
        let stats = TimeStats::compute(&FilterSpec::NoFilter.apply(&set)).unwrap();

        assert_eq!(stats.month, Month::May);
        assert_eq!(stats.day_of_week, Weekday::Tue);
        assert_eq!(stats.hour, 17);
    }

    #[test]
    fn test_ties_resolve_to_first_encountered() {
        let set = trip_set(vec![
            trip("2017-04-05 09:00:00", "2017-04-05 09:10:00", "A", "B"),
            trip("2017-02-05 14:00:00", "2017-02-05 14:10:00", "A", "B"),
        ]);
        let view = FilterSpec::NoFilter.apply(&set);
        let stats = TimeStats::compute(&view).unwrap();

        assert_eq!(stats.month, Month::April);
        assert_eq!(stats.day_of_week, Weekday::Wed);
        assert_eq!(stats.hour, 9);
        assert_eq!(TimeStats::compute(&view).unwrap(), stats);
    }

    #[test]
    fn test_empty_view() {
        let set = trip_set(vec![]);
        let err = TimeStats::compute(&FilterSpec::NoFilter.apply(&set)).unwrap_err();
        assert!(matches!(err, ExploreError::EmptyDataset));
    }

    #[test]
    fn test_serializes_full_names() {
        let stats = TimeStats {
            month: Month::June,
            day_of_week: Weekday::Thu,
            hour: 17,
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["month"], "June");
        assert_eq!(json["day_of_week"], "Thursday");
        assert_eq!(json["hour"], 17);
    }
}
