use crate::error::{ExploreError, Result};
use crate::filter::FilteredView;
use crate::record::{BIRTH_YEAR, GENDER};
use crate::stats::utility::{mode, value_counts};
use serde::Serialize;
use tracing::debug;

/// Outcome of a statistic over an optional column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum FieldStat<T> {
    Available(T),
    /// The column exists but every cell in the view is blank.
    NoData,
    /// The dataset has no such column.
    Unavailable,
}

impl<T> FieldStat<T> {
    /// Turns the two recoverable conditions into their variants. Anything else propagates.
    fn from_result(result: Result<T>) -> Result<Self> {
        match result {
            Ok(value) => Ok(FieldStat::Available(value)),
            Err(ExploreError::MissingField(_)) => Ok(FieldStat::Unavailable),
            Err(ExploreError::EmptyDataset) => Ok(FieldStat::NoData),
            Err(e) => Err(e),
        }
    }

    pub fn available(&self) -> Option<&T> {
        match self {
            FieldStat::Available(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BirthYearStats {
    pub earliest: i32,
    pub most_recent: i32,
    pub most_common: i32,
}

impl BirthYearStats {
    /// Fails with `MissingField` when the dataset has no birth year column and
    /// `EmptyDataset` when the view holds no birth years.
    pub fn compute(view: &FilteredView<'_>) -> Result<Self> {
        if !view.schema().has_birth_year {
            return Err(ExploreError::MissingField(BIRTH_YEAR));
        }

        let years = || view.iter().filter_map(|r| r.birth_year);
        let earliest = years().min().ok_or(ExploreError::EmptyDataset)?;
        let most_recent = years().max().ok_or(ExploreError::EmptyDataset)?;
        let most_common = mode(years()).ok_or(ExploreError::EmptyDataset)?;

        Ok(BirthYearStats {
            earliest,
            most_recent,
            most_common,
        })
    }
}

/// Counts per gender, most common first. Same failure modes as [`BirthYearStats::compute`].
pub fn gender_counts(view: &FilteredView<'_>) -> Result<Vec<(String, usize)>> {
    if !view.schema().has_gender {
        return Err(ExploreError::MissingField(GENDER));
    }

    let counts = owned_counts(view.iter().filter_map(|r| r.gender.as_deref()));
    if counts.is_empty() {
        return Err(ExploreError::EmptyDataset);
    }
    Ok(counts)
}

fn owned_counts<'a>(values: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    value_counts(values)
        .into_iter()
        .map(|(value, count)| (value.to_string(), count))
        .collect()
}

/// Rider breakdown: user types, gender, birth years.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserStats {
    pub user_types: Vec<(String, usize)>,
    pub gender: FieldStat<Vec<(String, usize)>>,
    pub birth_year: FieldStat<BirthYearStats>,
}

impl UserStats {
    #[tracing::instrument(name = "user_stats", skip_all, fields(records = view.len()))]
    pub fn compute(view: &FilteredView<'_>) -> Result<Self> {
        let stats = UserStats {
            user_types: owned_counts(view.iter().filter_map(|r| r.user_type.as_deref())),
            gender: FieldStat::from_result(gender_counts(view))?,
            birth_year: FieldStat::from_result(BirthYearStats::compute(view))?,
        };
        debug!(?stats, "User stats computed");
        Ok(stats)
    }
}
