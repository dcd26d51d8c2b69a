use calamine::{Data, Range};

use crate::cells::SheetView;
use crate::RowStep;

/// Per-account row classifier. Holds the parse state of one run (current subgroup and
/// any counters) and decides, row by row, what the row is.
pub trait RowGrammar {
    type Record;

    /// First worksheet row that is examined.
    fn start_row(&self) -> usize;

    fn step(&mut self, sheet: SheetView<'_>, row: usize) -> RowStep<Self::Record>;
}

/// Drives a grammar over one sheet, top to bottom, yielding records as data rows are met.
///
/// Ends at the grammar's `Stop` or at the last used row, whichever comes first.
pub struct Scan<'a, G> {
    sheet: SheetView<'a>,
    grammar: G,
    cursor: usize,
    rows: usize,
    finished: bool,
}

impl<'a, G: RowGrammar> Scan<'a, G> {
    pub fn new(range: &'a Range<Data>, grammar: G) -> Self {
        let sheet = SheetView::new(range);
        Self {
            cursor: grammar.start_row(),
            rows: sheet.row_count(),
            sheet,
            grammar,
            finished: false,
        }
    }

    /// Row the next call to `next` starts from.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn grammar(&self) -> &G {
        &self.grammar
    }

    /// True once a total row was reached (as opposed to running off the sheet).
    pub fn stopped_at_total(&self) -> bool {
        self.finished
    }
}

impl<G: RowGrammar> Iterator for Scan<'_, G> {
    type Item = G::Record;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished && self.cursor < self.rows {
            let row = self.cursor;
            match self.grammar.step(self.sheet, row) {
                RowStep::Emit { record, advance } => {
                    self.cursor += advance;
                    return Some(record);
                }
                RowStep::Skip { advance } => self.cursor += advance,
                RowStep::Stop => {
                    tracing::debug!("Total row reached at row {}", row);
                    self.finished = true;
                }
            }
        }
        None
    }
}
