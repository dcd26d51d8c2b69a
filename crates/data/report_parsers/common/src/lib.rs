//! Building blocks shared by the remainder and turnover report grammars.

pub mod cells;
pub mod filename;
pub mod grid;
pub mod names;
pub mod patterns;
pub mod scan;

pub use cells::SheetView;
pub use filename::{extract_quarter_year, extract_report_date, last_path_segment};
pub use names::normalize_name;
pub use scan::{RowGrammar, Scan};

/// Label of the grand-total row that ends every report.
pub const TOTAL_ROW_LABEL: &str = "Итого";

/// Outcome of classifying one row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowStep<R> {
    /// A data row produced a record; move the cursor by `advance` rows.
    Emit { record: R, advance: usize },
    /// Header, marker, blank or malformed row.
    Skip { advance: usize },
    /// Grand-total row, nothing below it is read.
    Stop,
}

impl<R> RowStep<R> {
    pub fn skip() -> Self {
        RowStep::Skip { advance: 1 }
    }
}
