use bikeshare_explorer::ExploreError;
use bikeshare_explorer::city::City;
use bikeshare_explorer::config::CityCatalog;
use bikeshare_explorer::filter::{FilterSpec, apply};
use bikeshare_explorer::output::{append_record, render_report};
use bikeshare_explorer::record::RecordSet;
use bikeshare_explorer::session::{Prompter, Session};
use bikeshare_explorer::stats::{
    BirthYearStats, DEFAULT_PAGE_SIZE, DurationStats, FieldStat, RecordBrowser, Report,
    StationStats, TimeStats, UserStats,
};
use chrono::{Month, TimeDelta, Weekday};
use std::collections::VecDeque;
use std::path::PathBuf;

fn fixtures() -> CityCatalog {
    CityCatalog::new(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures"))
}

#[test]
fn test_single_trip_scenario() {
    let csv = "\
Start Time,End Time,Start Station,End Station,User Type
2017-01-01 08:00:00,2017-01-01 08:10:00,A,B,Subscriber
";
    let records = RecordSet::from_reader(csv.as_bytes(), "scenario.csv").expect("valid csv");
    let view = apply(&records, FilterSpec::NoFilter);

    let time = TimeStats::compute(&view).unwrap();
    assert_eq!(time.month, Month::January);
    assert_eq!(time.day_of_week, Weekday::Sun);
    assert_eq!(time.hour, 8);

    let stations = StationStats::compute(&view).unwrap();
    assert_eq!(stations.common_start, "A");
    assert_eq!(stations.common_end, "B");
    assert_eq!(stations.common_route, "A TO B");

    let durations = DurationStats::compute(&view).unwrap();
    assert_eq!(durations.total, TimeDelta::minutes(10));
    assert_eq!(durations.mean, TimeDelta::minutes(10));

    let users = UserStats::compute(&view).unwrap();
    assert_eq!(users.user_types, vec![("Subscriber".to_string(), 1)]);
    assert_eq!(users.gender, FieldStat::Unavailable);
}

#[test]
fn test_chicago_full_pipeline() {
    let records = fixtures().load("Chicago").expect("fixture loads");
    assert_eq!(records.len(), 12);
    assert!(records.schema().has_gender);

    let report = Report::build(City::Chicago, &records, FilterSpec::NoFilter).unwrap();
    assert_eq!(report.total_trips, 12);

    let time = report.time.as_ref().unwrap();
    assert_eq!(time.month, Month::June);
    // Friday and Wednesday both occur three times; Friday is seen first.
    assert_eq!(time.day_of_week, Weekday::Fri);
    assert_eq!(time.hour, 17);

    let stations = report.stations.as_ref().unwrap();
    assert_eq!(stations.common_start, "Wood St & Hubbard St");
    assert_eq!(stations.common_end, "Damen Ave & Chicago Ave");
    assert_eq!(
        stations.common_route,
        "Wood St & Hubbard St TO Damen Ave & Chicago Ave"
    );

    let durations = report.durations.as_ref().unwrap();
    assert_eq!(durations.total, TimeDelta::seconds(8856));
    assert_eq!(durations.mean, TimeDelta::seconds(738));
    assert_eq!(durations.negative_trips, 0);

    assert_eq!(
        report.users.user_types,
        vec![("Subscriber".to_string(), 10), ("Customer".to_string(), 2)]
    );
    assert_eq!(
        report.users.gender,
        FieldStat::Available(vec![("Male".to_string(), 7), ("Female".to_string(), 3)])
    );
    assert_eq!(
        report.users.birth_year,
        FieldStat::Available(BirthYearStats {
            earliest: 1975,
            most_recent: 1992,
            most_common: 1992,
        })
    );
}

#[test]
fn test_month_filter_on_fixture() {
    let records = fixtures().load_city(City::Chicago).unwrap();
    let view = apply(&records, FilterSpec::by_month("june").unwrap());

    assert_eq!(view.len(), 4);
    assert!(view.iter().all(|r| r.month() == Month::June));

    let time = TimeStats::compute(&view).unwrap();
    assert_eq!(time.day_of_week, Weekday::Fri);
    assert_eq!(time.hour, 17);

    let stations = StationStats::compute(&view).unwrap();
    assert_eq!(stations.common_start, "Wood St & Hubbard St");
}

#[test]
fn test_new_york_negative_duration_is_kept() {
    let records = fixtures().load("new york").unwrap();
    let view = apply(&records, FilterSpec::NoFilter);
    let durations = DurationStats::compute(&view).unwrap();

    assert_eq!(durations.total, TimeDelta::seconds(1825));
    assert_eq!(durations.mean, TimeDelta::milliseconds(456_250));
    assert_eq!(durations.negative_trips, 1);

    let users = UserStats::compute(&view).unwrap();
    assert_eq!(users.user_types, vec![("Subscriber".to_string(), 3)]);
}

#[test]
fn test_washington_has_no_demographics() {
    let records = fixtures().load("WASHINGTON").unwrap();
    let view = apply(&records, FilterSpec::NoFilter);
    let users = UserStats::compute(&view).unwrap();

    assert_eq!(users.gender, FieldStat::Unavailable);
    assert_eq!(users.birth_year, FieldStat::Unavailable);
    let report = Report::build(City::Washington, &records, FilterSpec::NoFilter).unwrap();
    assert!(render_report(&report).contains("Birth year: unavailable for this city"));
}

#[test]
fn test_unknown_city() {
    assert!(matches!(
        fixtures().load("portland"),
        Err(ExploreError::UnknownCity(_))
    ));
}

#[test]
fn test_empty_filter_result_reports_empty_dataset() {
    let records = fixtures().load("washington").unwrap();
    let view = apply(&records, FilterSpec::by_day("thursday").unwrap());

    assert!(view.is_empty());
    assert!(matches!(
        TimeStats::compute(&view),
        Err(ExploreError::EmptyDataset)
    ));
    assert!(matches!(
        StationStats::compute(&view),
        Err(ExploreError::EmptyDataset)
    ));
    assert!(matches!(
        DurationStats::compute(&view),
        Err(ExploreError::EmptyDataset)
    ));
}

#[test]
fn test_browser_pages_over_twelve_records() {
    let records = fixtures().load("chicago").unwrap();
    let view = apply(&records, FilterSpec::NoFilter);
    let mut browser = RecordBrowser::new(&view);

    let mut sizes = Vec::new();
    let mut seen = Vec::new();
    for _ in 0..4 {
        let page = browser.next_page(DEFAULT_PAGE_SIZE);
        sizes.push(page.len());
        seen.extend(page.iter().map(|r| r.start_time));
    }

    assert_eq!(sizes, [5, 5, 2, 0]);
    let all: Vec<_> = records.iter().map(|r| r.start_time).collect();
    assert_eq!(seen, all);
}

#[test]
fn test_summary_csv_export() {
    let records = fixtures().load("chicago").unwrap();
    let report = Report::build(City::Chicago, &records, FilterSpec::NoFilter).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("summary.csv");
    append_record(&path, &report.summary()).unwrap();

    let mut rdr = csv::Reader::from_path(&path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    let row = rdr.records().next().unwrap().unwrap();
    let field = |name: &str| {
        let index = headers.iter().position(|h| h == name).unwrap();
        row.get(index).unwrap().to_string()
    };

    assert_eq!(field("city"), "chicago");
    assert_eq!(field("common_month"), "June");
    assert_eq!(field("total_duration_secs"), "8856");
    assert_eq!(field("common_birth_year"), "1992");
}

struct Answers(VecDeque<&'static str>);

impl Prompter for Answers {
    fn ask(&mut self, _question: &str) -> anyhow::Result<Option<String>> {
        Ok(self.0.pop_front().map(str::to_string))
    }
}

#[test]
fn test_interactive_session_over_fixtures() {
    let catalog = fixtures();
    let answers = Answers(
        [
            // All four rows fit on one page, so there is no continue prompt.
            "new york", "day", "Thursday", "yes",
            "yes",
            "washington", "none", "no", "no",
        ]
        .into_iter()
        .collect(),
    );
    let mut out = Vec::new();
    Session::new(&catalog, answers, &mut out).run().unwrap();
    let out = String::from_utf8(out).unwrap();

    assert!(out.contains("New York: 1 of 4 trips selected (filter: day=Thursday)"));
    // Raw rows are paged from the whole dataset, not the Thursday selection.
    assert!(out.contains("[0] 2017-06-11 14:55:05"));
    assert!(out.contains("[1] 2017-05-11 15:30:11"));
    assert!(out.contains("[3] 2017-05-08 19:48:29"));
    assert!(out.contains("Washington: 3 of 3 trips selected (filter: none)"));
    assert!(out.contains("Gender: unavailable for this city"));
}

#[test]
fn test_month_filter_leaves_travel_times_on_full_dataset() {
    let catalog = fixtures();
    let answers = Answers(["washington", "month", "march", "yes", "no"].into_iter().collect());
    let mut out = Vec::new();
    Session::new(&catalog, answers, &mut out).run().unwrap();
    let out = String::from_utf8(out).unwrap();

    assert!(out.contains("Washington: 1 of 3 trips selected (filter: month=March)"));
    assert!(out.contains("The most common month is: June"));
    for index in 0..3 {
        assert!(out.contains(&format!("[{index}] ")), "missing row {index}");
    }
    assert!(out.contains("The most common start station is: Jefferson Dr & 14th St SW"));
}

#[test]
fn test_report_time_section_ignores_filter() {
    let records = fixtures().load("chicago").unwrap();
    let january = FilterSpec::by_month("january").unwrap();
    let report = Report::build(City::Chicago, &records, january).unwrap();

    assert_eq!(report.total_trips, 12);
    assert_eq!(report.trips, 3);
    assert_eq!(report.time.as_ref().unwrap().month, Month::June);
    assert_eq!(
        report.durations.as_ref().unwrap().total,
        TimeDelta::seconds(416 + 534 + 1950)
    );
}
