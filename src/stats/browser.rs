use crate::filter::FilteredView;
use crate::record::TripRecord;
use tracing::debug;

pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Cursor over the raw records of one view, used for a single browsing loop.
///
/// Every call to [`RecordBrowser::next_page`] returns exactly `page_size`
/// records, except the last page which may be shorter, then empty pages.
#[derive(Debug)]
pub struct RecordBrowser<'v, 'a> {
    view: &'v FilteredView<'a>,
    cursor: usize,
}

impl<'v, 'a> RecordBrowser<'v, 'a> {
    pub fn new(view: &'v FilteredView<'a>) -> Self {
        RecordBrowser { view, cursor: 0 }
    }

    /// Starts at `page` (zero-based) instead of the beginning.
    pub fn at_page(view: &'v FilteredView<'a>, page: usize, page_size: usize) -> Self {
        RecordBrowser {
            view,
            cursor: page.saturating_mul(page_size),
        }
    }

    pub fn next_page(&mut self, page_size: usize) -> &'v [&'a TripRecord] {
        let view: &'v FilteredView<'a> = self.view;
        let records = view.records();
        let start = self.cursor.min(records.len());
        let end = self.cursor.saturating_add(page_size).min(records.len());
        self.cursor = self.cursor.saturating_add(page_size);

        debug!(start, end, total = records.len(), "Record page served");
        &records[start..end]
    }

    /// Index of the first record the next page will return.
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.view.len()
    }
}
