use models::{AccountCode, PricePoint, TurnoverRecord, PIECE_UNIT};
use regex::Regex;
use report_common::patterns::subgroup_header;
use report_common::{normalize_name, RowGrammar, RowStep, SheetView, TOTAL_ROW_LABEL};

use crate::Period;

const START_ROW: usize = 9;
const NAME_COL: usize = 0;

/// Price columns on the first row, count columns on the second: before period, debit,
/// credit, after period.
const VALUE_COLS: [usize; 4] = [10, 12, 13, 14];

/// Rows consumed by one product: price row, count row, spacer row.
const PAIR_ADVANCE: usize = 3;

/// A product spread over two rows: aggregate prices on `row`, unit counts on `row + 1`.
#[derive(Debug, Clone, Copy)]
pub struct RowPair<'a> {
    sheet: SheetView<'a>,
    row: usize,
}

impl<'a> RowPair<'a> {
    pub fn fetch(sheet: SheetView<'a>, row: usize) -> Self {
        Self { sheet, row }
    }

    pub fn price(&self, col: usize) -> f64 {
        self.sheet.read_numeric(self.row, col)
    }

    /// Count below the price. NaN past the end of the sheet.
    pub fn count(&self, col: usize) -> f64 {
        self.sheet.read_numeric(self.row + 1, col)
    }

    pub fn point(&self, col: usize) -> PricePoint {
        PricePoint::from_aggregate(self.price(col), self.count(col))
    }
}

/// Accounts 21/101 turnover layout: `<code>.<n>` rows open a subgroup, every other
/// named row inside a subgroup starts a [`RowPair`].
#[derive(Debug, Clone)]
pub struct PairedGrammar {
    account: AccountCode,
    header: &'static Regex,
    period: Period,
    subgroup: Option<String>,
}

impl PairedGrammar {
    /// `None` for account 105, which uses [`crate::ExplicitGrammar`].
    pub fn new(account: AccountCode, period: Period) -> Option<Self> {
        subgroup_header(account).map(|header| Self::with_header(account, header, period))
    }

    /// Grammar using `header` (a whole-cell `<code>.<n>` pattern) for subgroup rows.
    pub fn with_header(account: AccountCode, header: &'static Regex, period: Period) -> Self {
        Self {
            account,
            header,
            period,
            subgroup: None,
        }
    }

    pub fn subgroup(&self) -> Option<&str> {
        self.subgroup.as_deref()
    }

    fn record(&self, pair: RowPair<'_>, name: &str) -> TurnoverRecord {
        TurnoverRecord {
            product_name: normalize_name(name),
            account_code: self.account,
            subgroup: self.subgroup.clone(),
            quarter: self.period.quarter.clone(),
            year: self.period.year.clone(),
            unit: PIECE_UNIT.to_string(),
            before_period: pair.point(VALUE_COLS[0]),
            debit_movement: pair.point(VALUE_COLS[1]),
            credit_movement: pair.point(VALUE_COLS[2]),
            after_period: pair.point(VALUE_COLS[3]),
        }
    }
}

impl RowGrammar for PairedGrammar {
    type Record = TurnoverRecord;

    fn start_row(&self) -> usize {
        START_ROW
    }

    fn step(&mut self, sheet: SheetView<'_>, row: usize) -> RowStep<TurnoverRecord> {
        let Some(cell) = sheet.read_display(row, NAME_COL) else {
            return RowStep::skip();
        };

        if self.header.is_match(cell.trim()) {
            tracing::debug!("Row {}: subgroup {}", row, cell.trim());
            self.subgroup = Some(cell.trim().to_string());
            return RowStep::skip();
        }

        if cell == TOTAL_ROW_LABEL {
            return RowStep::Stop;
        }

        if self.subgroup.is_none() {
            return RowStep::skip();
        }

        let pair = RowPair::fetch(sheet, row);
        RowStep::Emit {
            record: self.record(pair, &cell),
            advance: PAIR_ADVANCE,
        }
    }
}
