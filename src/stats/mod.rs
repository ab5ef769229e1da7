//! Trip statistics.
//!
//! Each aggregation takes a [`FilteredView`](crate::filter::FilteredView) and
//! returns a structured result; rendering lives in [`crate::output`]. Modes
//! break ties in favour of the value encountered first in view order, so the
//! same input always yields the same answer.

pub mod browser;
pub mod duration;
pub mod report;
pub mod station;
pub mod time;
pub mod users;
pub mod utility;

pub use browser::{DEFAULT_PAGE_SIZE, RecordBrowser};
pub use duration::DurationStats;
pub use report::{Report, ReportSummary};
pub use station::StationStats;
pub use time::TimeStats;
pub use users::{BirthYearStats, FieldStat, UserStats};
