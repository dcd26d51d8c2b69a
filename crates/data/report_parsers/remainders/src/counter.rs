use models::{AccountCode, Quantity, RemainderRecord};
use report_common::cells::{render_decimal, render_id};
use report_common::{normalize_name, RowGrammar, RowStep, SheetView, TOTAL_ROW_LABEL};

const HEADER_ROWS: usize = 6;
const CODE_COL: usize = 0;
const QUANTITY_COL: usize = 2;

/// Account 105: numbers in the code column form a "group, 1, group, n" counter that
/// identifies the subgroup, text in the same column is a product row.
///
/// Counter transitions, per numeric cell `v`:
///
/// | state                          | `v`    | effect                              |
/// |--------------------------------|--------|-------------------------------------|
/// | not `is_new_subgroup`          | any    | id = `v`, `is_new_subgroup` set     |
/// | `is_new_subgroup`              | 1      | `seen_one` set                      |
/// | `is_new_subgroup`, `seen_one`  | not 1  | id = `v`, `seen_one` cleared        |
/// | `is_new_subgroup`, no 1 yet    | not 1  | both flags cleared, id kept         |
#[derive(Debug, Clone, Default)]
pub struct CounterGrammar {
    report_date: String,
    is_new_subgroup: bool,
    seen_one: bool,
    subgroup_id: Option<f64>,
}

impl CounterGrammar {
    pub fn new(report_date: impl Into<String>) -> Self {
        Self {
            report_date: report_date.into(),
            ..Self::default()
        }
    }

    /// Current subgroup id as written to records; empty before the first number.
    pub fn subgroup(&self) -> String {
        self.subgroup_id.map(render_id).unwrap_or_default()
    }

    fn observe_number(&mut self, value: f64) {
        if !self.is_new_subgroup {
            self.is_new_subgroup = true;
            self.seen_one = false;
            self.subgroup_id = Some(value);
        } else if value == 1.0 {
            self.seen_one = true;
        } else if self.seen_one {
            self.subgroup_id = Some(value);
            self.seen_one = false;
            tracing::debug!("Subgroup {}", render_id(value));
        } else {
            self.is_new_subgroup = false;
            self.seen_one = false;
        }
    }
}

impl RowGrammar for CounterGrammar {
    type Record = RemainderRecord;

    fn start_row(&self) -> usize {
        HEADER_ROWS
    }

    fn step(&mut self, sheet: SheetView<'_>, row: usize) -> RowStep<RemainderRecord> {
        if sheet.is_blank(row, CODE_COL) {
            return RowStep::skip();
        }

        let number = sheet.read_numeric(row, CODE_COL);
        if !number.is_nan() {
            self.observe_number(number);
            return RowStep::skip();
        }

        let Some(full_name) = sheet.read_text(row, CODE_COL) else {
            return RowStep::skip();
        };
        if full_name == TOTAL_ROW_LABEL {
            return RowStep::Stop;
        }

        let quantity = sheet.read_numeric(row, QUANTITY_COL);
        if quantity.is_nan() {
            tracing::trace!("Row {}: quantity is not a number, skipped", row);
            return RowStep::skip();
        }

        RowStep::Emit {
            record: RemainderRecord {
                product_name: normalize_name(full_name),
                full_name: full_name.to_string(),
                quantity_remaining: Quantity::Decimal(render_decimal(quantity)),
                subgroup: self.subgroup(),
                report_date: self.report_date.clone(),
                account_code: AccountCode::Account105,
            },
            advance: 1,
        }
    }
}
