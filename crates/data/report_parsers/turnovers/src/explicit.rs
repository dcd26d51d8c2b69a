use models::{AccountCode, PricePoint, TurnoverRecord};
use report_common::{normalize_name, RowGrammar, RowStep, SheetView, TOTAL_ROW_LABEL};

use crate::Period;

const START_ROW: usize = 3;
const GROUP_COL: usize = 0;
const LABEL_COL: usize = 1;
const NAME_COL: usize = 3;
const UNIT_COL: usize = 4;

/// (count, price) column pairs: before period, debit, credit, after period.
const PAIRS: [(usize, usize); 4] = [(5, 6), (7, 8), (9, 10), (11, 12)];

/// Account 105 turnover layout: one row per product, subgroup label rows have an
/// empty grouping cell.
#[derive(Debug, Clone)]
pub struct ExplicitGrammar {
    period: Period,
    subgroup: Option<String>,
}

impl ExplicitGrammar {
    pub fn new(period: Period) -> Self {
        Self {
            period,
            subgroup: None,
        }
    }

    pub fn subgroup(&self) -> Option<&str> {
        self.subgroup.as_deref()
    }
}

fn point(sheet: SheetView<'_>, row: usize, (count_col, price_col): (usize, usize)) -> PricePoint {
    PricePoint::from_aggregate(
        sheet.read_numeric(row, price_col),
        sheet.read_numeric(row, count_col),
    )
}

impl RowGrammar for ExplicitGrammar {
    type Record = TurnoverRecord;

    fn start_row(&self) -> usize {
        START_ROW
    }

    fn step(&mut self, sheet: SheetView<'_>, row: usize) -> RowStep<TurnoverRecord> {
        if sheet.is_blank(row, GROUP_COL) {
            if let Some(label) = sheet.read_display(row, LABEL_COL) {
                if let Some(first) = label.split_whitespace().next() {
                    self.subgroup = Some(first.to_string());
                    tracing::debug!("Row {}: subgroup {}", row, first);
                }
            }
            return RowStep::skip();
        }

        if sheet.read_text(row, NAME_COL) == Some(TOTAL_ROW_LABEL) {
            return RowStep::Stop;
        }

        let Some(name) = sheet.read_display(row, NAME_COL) else {
            return RowStep::skip();
        };

        RowStep::Emit {
            record: TurnoverRecord {
                product_name: normalize_name(&name),
                account_code: AccountCode::Account105,
                subgroup: self.subgroup.clone(),
                quarter: self.period.quarter.clone(),
                year: self.period.year.clone(),
                unit: sheet.read_display(row, UNIT_COL).unwrap_or_default(),
                before_period: point(sheet, row, PAIRS[0]),
                debit_movement: point(sheet, row, PAIRS[1]),
                credit_movement: point(sheet, row, PAIRS[2]),
                after_period: point(sheet, row, PAIRS[3]),
            },
            advance: 1,
        }
    }
}
