//! Interactive exploration loop.
//!
//! Asks for a city and an optional month or day filter, loads and filters the
//! data, prints each statistic section, offers paged raw records, and repeats
//! while the user answers `yes` to the restart question. End of input at any
//! prompt ends the session.

use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::Write;
use std::time::Instant;
use tracing::{debug, error, info};

use crate::city::City;
use crate::config::CityCatalog;
use crate::error::ExploreError;
use crate::filter::{FilterSpec, FilteredView};
use crate::output::{
    DURATION_HEADING, NO_DATA, STATION_HEADING, TIME_HEADING, USER_HEADING, format_elapsed,
    render_duration_stats, render_records, render_station_stats, render_time_stats,
    render_user_stats, rule,
};
use crate::stats::{
    DEFAULT_PAGE_SIZE, DurationStats, RecordBrowser, StationStats, TimeStats, UserStats,
};

const GREETING: &str = "Hello! Let's explore some US bikeshare data!";
const CITY_QUESTION: &str = "Would you like to see data for Chicago, New York, or Washington?";
const FILTER_QUESTION: &str =
    "Would you like to filter the data by month, day, or not at all? Enter month, day or none.";
const MONTH_QUESTION: &str = "Which month - January, February, March, April, May, or June?";
const DAY_QUESTION: &str =
    "Which day - Monday, Tuesday, Wednesday, Thursday, Friday, Saturday, or Sunday?";
const CONTINUE_QUESTION: &str = "Do you wish to continue? Enter yes or no.";
const RESTART_QUESTION: &str = "Would you like to restart? Enter yes or no.";
const END_OF_DATA: &str = "You've reached the end of the trip data.";

/// Source of answers to the session's questions.
pub trait Prompter {
    /// Shows `question` and reads one answer. `None` means input is exhausted.
    fn ask(&mut self, question: &str) -> Result<Option<String>>;
}

/// Terminal prompter with line editing.
pub struct LinePrompter {
    editor: DefaultEditor,
}

impl LinePrompter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }

    fn remember(&mut self, line: &str) {
        match self.editor.add_history_entry(line) {
            Ok(added) => debug!(added, "History updated"),
            Err(e) => debug!(error = %e, "History entry not recorded"),
        }
    }
}

impl Prompter for LinePrompter {
    fn ask(&mut self, question: &str) -> Result<Option<String>> {
        match self.editor.readline(&format!("{question}\n> ")) {
            Ok(line) => {
                self.remember(&line);
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

fn is_yes(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("yes")
}

pub struct Session<'c, P, W> {
    catalog: &'c CityCatalog,
    prompter: P,
    out: W,
    page_size: usize,
}

impl<'c, P: Prompter, W: Write> Session<'c, P, W> {
    pub fn new(catalog: &'c CityCatalog, prompter: P, out: W) -> Self {
        Session {
            catalog,
            prompter,
            out,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn run(&mut self) -> Result<()> {
        writeln!(self.out, "{GREETING}")?;

        let mut iterations = 0;
        loop {
            iterations += 1;
            info!(iteration = iterations, "Session iteration started");
            if self.iteration()? == Flow::Quit {
                break;
            }
            match self.ask(RESTART_QUESTION)? {
                Some(answer) if is_yes(&answer) => continue,
                _ => break,
            }
        }

        info!(iterations, "Session finished");
        Ok(())
    }

    fn iteration(&mut self) -> Result<Flow> {
        let Some(city) = self.ask_city()? else {
            return Ok(Flow::Quit);
        };
        let Some(filter) = self.ask_filter()? else {
            return Ok(Flow::Quit);
        };
        writeln!(self.out, "{}", rule())?;

        let records = match self.catalog.load_city(city) {
            Ok(records) => records,
            Err(e @ ExploreError::DataLoad { .. }) => {
                error!(city = %city, error = %e, "Dataset load failed");
                writeln!(self.out, "Could not load data for {city}: {e}")?;
                return Ok(Flow::Continue);
            }
            Err(e) => return Err(e.into()),
        };

        // Travel times and raw rows cover the whole dataset; the remaining
        // sections see only the filtered trips.
        let all = FilterSpec::NoFilter.apply(&records);
        let view = filter.apply(&records);
        writeln!(
            self.out,
            "{city}: {} of {} trips selected (filter: {filter})",
            view.len(),
            records.len()
        )?;

        self.section(TIME_HEADING, || {
            TimeStats::compute(&all).map(|s| render_time_stats(&s))
        })?;
        self.browse(&all)?;
        self.section(STATION_HEADING, || {
            StationStats::compute(&view).map(|s| render_station_stats(&s))
        })?;
        self.section(DURATION_HEADING, || {
            DurationStats::compute(&view).map(|s| render_duration_stats(&s))
        })?;
        self.section(USER_HEADING, || {
            UserStats::compute(&view).map(|s| render_user_stats(&s))
        })?;

        Ok(Flow::Continue)
    }

    fn ask(&mut self, question: &str) -> Result<Option<String>> {
        let answer = self.prompter.ask(question)?;
        debug!(question, answer = ?answer, "Prompt answered");
        Ok(answer)
    }

    fn ask_city(&mut self) -> Result<Option<City>> {
        loop {
            let Some(answer) = self.ask(CITY_QUESTION)? else {
                return Ok(None);
            };
            match answer.parse::<City>() {
                Ok(city) => return Ok(Some(city)),
                Err(e @ ExploreError::UnknownCity(_)) => writeln!(self.out, "{e}")?,
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn ask_filter(&mut self) -> Result<Option<FilterSpec>> {
        loop {
            let Some(answer) = self.ask(FILTER_QUESTION)? else {
                return Ok(None);
            };
            match answer.trim().to_lowercase().as_str() {
                "none" | "no" | "not at all" => return Ok(Some(FilterSpec::NoFilter)),
                "month" => return self.ask_filter_value(MONTH_QUESTION, FilterSpec::by_month),
                "day" => return self.ask_filter_value(DAY_QUESTION, FilterSpec::by_day),
                _ => writeln!(self.out, "Please enter month, day or none.")?,
            }
        }
    }

    fn ask_filter_value(
        &mut self,
        question: &str,
        parse: fn(&str) -> crate::error::Result<FilterSpec>,
    ) -> Result<Option<FilterSpec>> {
        loop {
            let Some(answer) = self.ask(question)? else {
                return Ok(None);
            };
            match parse(&answer) {
                Ok(filter) => return Ok(Some(filter)),
                Err(e @ ExploreError::InvalidFilter(_)) => writeln!(self.out, "{e}")?,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Prints one statistic section. An empty selection is reported in place;
    /// any other failure aborts the session.
    fn section(
        &mut self,
        heading: &str,
        compute: impl FnOnce() -> crate::error::Result<String>,
    ) -> Result<()> {
        writeln!(self.out, "\n{heading}\n")?;
        let started = Instant::now();
        match compute() {
            Ok(text) => write!(self.out, "{text}")?,
            Err(ExploreError::EmptyDataset) => writeln!(self.out, "{NO_DATA}")?,
            Err(e) => return Err(e.into()),
        }
        writeln!(self.out, "\n{}", format_elapsed(started.elapsed()))?;
        writeln!(self.out, "{}", rule())?;
        Ok(())
    }

    fn browse(&mut self, view: &FilteredView<'_>) -> Result<()> {
        let question = format!(
            "Would you like to view {} rows of individual trip data? Enter yes or no.",
            self.page_size
        );
        match self.ask(&question)? {
            Some(answer) if is_yes(&answer) => {}
            _ => return Ok(()),
        }

        let mut browser = RecordBrowser::new(view);
        loop {
            let first = browser.position();
            let page = browser.next_page(self.page_size);
            if page.is_empty() {
                writeln!(self.out, "{END_OF_DATA}")?;
                return Ok(());
            }
            write!(self.out, "{}", render_records(page, first))?;

            if browser.is_exhausted() {
                writeln!(self.out, "{END_OF_DATA}")?;
                return Ok(());
            }
            match self.ask(CONTINUE_QUESTION)? {
                Some(answer) if is_yes(&answer) => {}
                _ => return Ok(()),
            }
        }
    }
}
