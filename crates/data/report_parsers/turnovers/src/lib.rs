//! Grammars for quarterly turnover reports.
//!
//! Account 105 lays out count/price pairs side by side on one row. Accounts 21 and 101
//! split a product over two rows: aggregate prices first, unit counts underneath.

pub mod explicit;
pub mod paired;

pub use explicit::ExplicitGrammar;
pub use paired::{PairedGrammar, RowPair};

use calamine::{Data, Range};
use models::{AccountCode, TurnoverRecord};
use report_common::patterns::subgroup_header;
use report_common::{RowGrammar, RowStep, Scan, SheetView};

/// Reporting period of a turnover report, recovered from its filename.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Period {
    pub quarter: Option<String>,
    pub year: Option<String>,
}

impl Period {
    pub fn from_filename(filename: &str) -> Self {
        let (quarter, year) = report_common::extract_quarter_year(filename);
        if quarter.is_none() || year.is_none() {
            tracing::warn!("No quarter/year in turnover filename {:?}", filename);
        }
        Self { quarter, year }
    }
}

/// Turnover grammar for any account code.
#[derive(Debug, Clone)]
pub enum TurnoverGrammar {
    Paired(PairedGrammar),
    Explicit(ExplicitGrammar),
}

impl TurnoverGrammar {
    pub fn for_account(account: AccountCode, period: Period) -> Self {
        match subgroup_header(account) {
            Some(header) => Self::Paired(PairedGrammar::with_header(account, header, period)),
            None => Self::Explicit(ExplicitGrammar::new(period)),
        }
    }
}

impl RowGrammar for TurnoverGrammar {
    type Record = TurnoverRecord;

    fn start_row(&self) -> usize {
        match self {
            Self::Paired(g) => g.start_row(),
            Self::Explicit(g) => g.start_row(),
        }
    }

    fn step(&mut self, sheet: SheetView<'_>, row: usize) -> RowStep<TurnoverRecord> {
        match self {
            Self::Paired(g) => g.step(sheet, row),
            Self::Explicit(g) => g.step(sheet, row),
        }
    }
}

/// Parses a whole turnover sheet for the given account into records.
pub fn parse_turnovers(
    range: &Range<Data>,
    account: AccountCode,
    filename: &str,
) -> Vec<TurnoverRecord> {
    let period = Period::from_filename(filename);
    Scan::new(range, TurnoverGrammar::for_account(account, period)).collect()
}
