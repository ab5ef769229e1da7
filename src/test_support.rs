use crate::record::{RecordSet, Schema, TripRecord, parse_timestamp};

/// A subscriber trip between two stations, without demographics.
pub(crate) fn trip(start: &str, end: &str, from: &str, to: &str) -> TripRecord {
    TripRecord {
        start_time: parse_timestamp(start).expect("valid start"),
        end_time: parse_timestamp(end).expect("valid end"),
        start_station: from.to_string(),
        end_station: to.to_string(),
        user_type: Some("Subscriber".to_string()),
        gender: None,
        birth_year: None,
    }
}

/// Wraps records in a set whose schema has no optional columns.
pub(crate) fn trip_set(records: Vec<TripRecord>) -> RecordSet {
    RecordSet::from_records("test.csv", Schema::default(), records)
}
