//! Output formatting and persistence for trip statistics.
//!
//! Supports plain-text rendering for the terminal, JSON serialization, and
//! appending flat summary rows to a CSV file.

use anyhow::Result;
use chrono::TimeDelta;
use csv::WriterBuilder;
use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::record::{TripRecord, weekday_name};
use crate::stats::{
    DurationStats, FieldStat, Report, ReportSummary, StationStats, TimeStats, UserStats,
};

pub const TIME_HEADING: &str = "Calculating The Most Frequent Times of Travel...";
pub const STATION_HEADING: &str = "Calculating The Most Popular Stations and Trip...";
pub const DURATION_HEADING: &str = "Calculating Trip Duration...";
pub const USER_HEADING: &str = "Calculating User Stats...";
pub const NO_DATA: &str = "No trips match this selection.";

pub fn rule() -> String {
    "-".repeat(40)
}

/// Formats a duration as `D days HH:MM:SS`, with a leading `-` when negative.
pub fn format_duration(value: TimeDelta) -> String {
    let sign = if value < TimeDelta::zero() { "-" } else { "" };
    let secs = value.num_seconds().unsigned_abs();
    let (days, rem) = (secs / 86_400, secs % 86_400);
    format!(
        "{sign}{days} days {:02}:{:02}:{:02}",
        rem / 3600,
        (rem % 3600) / 60,
        rem % 60
    )
}

pub fn format_elapsed(elapsed: Duration) -> String {
    format!("This took {:.6} seconds.", elapsed.as_secs_f64())
}

pub fn render_time_stats(stats: &TimeStats) -> String {
    format!(
        "The most common month is: {}\n\
         The most common day is: {}\n\
         The most common start hour is: {}\n",
        stats.month.name(),
        weekday_name(stats.day_of_week),
        stats.hour
    )
}

pub fn render_station_stats(stats: &StationStats) -> String {
    format!(
        "The most common start station is: {}\n\
         The most common end station is: {}\n\
         The most common combination of start station and end station trip is: {}\n",
        stats.common_start, stats.common_end, stats.common_route
    )
}

pub fn render_duration_stats(stats: &DurationStats) -> String {
    let mut out = format!(
        "Total travel time is {}\nMean travel time is {}\n",
        format_duration(stats.total),
        format_duration(stats.mean)
    );
    if stats.negative_trips > 0 {
        let _ = writeln!(
            out,
            "Warning: {} of {} trips end before they start; they are included above.",
            stats.negative_trips, stats.trips
        );
    }
    out
}

pub fn render_user_stats(stats: &UserStats) -> String {
    let mut out = String::from("User types:\n");
    if stats.user_types.is_empty() {
        out.push_str("  (none recorded)\n");
    }
    for (user_type, count) in &stats.user_types {
        let _ = writeln!(out, "  {user_type}: {count}");
    }

    match &stats.gender {
        FieldStat::Available(counts) => {
            out.push_str("Gender:\n");
            for (gender, count) in counts {
                let _ = writeln!(out, "  {gender}: {count}");
            }
        }
        FieldStat::NoData => out.push_str("Gender: no data for this selection\n"),
        FieldStat::Unavailable => out.push_str("Gender: unavailable for this city\n"),
    }

    match &stats.birth_year {
        FieldStat::Available(years) => {
            let _ = writeln!(out, "Earliest year of birth is {}", years.earliest);
            let _ = writeln!(out, "Most recent year of birth is {}", years.most_recent);
            let _ = writeln!(out, "Most common year of birth is {}", years.most_common);
        }
        FieldStat::NoData => out.push_str("Birth year: no data for this selection\n"),
        FieldStat::Unavailable => out.push_str("Birth year: unavailable for this city\n"),
    }
    out
}

/// Renders one page of raw trips. `first_index` numbers the first line.
pub fn render_records(records: &[&TripRecord], first_index: usize) -> String {
    let mut out = String::new();
    for (offset, record) in records.iter().enumerate() {
        let _ = writeln!(
            out,
            "[{}] {} -> {} ({}) | {} TO {} | {} | gender: {} | born: {}",
            first_index + offset,
            record.start_time,
            record.end_time,
            format_duration(record.duration()),
            record.start_station,
            record.end_station,
            record.user_type.as_deref().unwrap_or("-"),
            record.gender.as_deref().unwrap_or("-"),
            record
                .birth_year
                .map(|y| y.to_string())
                .unwrap_or_else(|| "-".to_string()),
        );
    }
    out
}

/// Renders a whole report in section order.
pub fn render_report(report: &Report) -> String {
    let mut out = format!(
        "{} | filter: {} | trips: {} of {}\n{}\n",
        report.city,
        report.filter,
        report.trips,
        report.total_trips,
        rule()
    );

    let sections = [
        (TIME_HEADING, report.time.as_ref().map(render_time_stats)),
        (
            STATION_HEADING,
            report.stations.as_ref().map(render_station_stats),
        ),
        (
            DURATION_HEADING,
            report.durations.as_ref().map(render_duration_stats),
        ),
        (USER_HEADING, Some(render_user_stats(&report.users))),
    ];
    for (heading, body) in sections {
        let _ = write!(
            out,
            "\n{heading}\n\n{}{}\n",
            body.as_deref().unwrap_or(NO_DATA),
            rule()
        );
    }
    out
}

/// Logs a report using Rust's debug pretty-print format.
pub fn print_pretty(report: &Report) {
    debug!("{:#?}", report);
}

/// Writes a report as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write>(out: &mut W, report: &Report) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}

/// Appends a [`ReportSummary`] as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &Path, summary: &ReportSummary) -> Result<()> {
    let file_exists = path.exists();
    debug!(path = %path.display(), file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(summary)?;
    writer.flush()?;

    Ok(())
}
