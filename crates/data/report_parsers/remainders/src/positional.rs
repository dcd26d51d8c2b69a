use models::{AccountCode, Quantity, RemainderRecord};
use regex::Regex;
use report_common::names::strip_unit_suffix;
use report_common::patterns::subgroup_marker;
use report_common::{normalize_name, RowGrammar, RowStep, SheetView, TOTAL_ROW_LABEL};

/// Column layout of the account 21/101 remainder reports.
#[derive(Debug, Clone)]
pub struct PositionalLayout {
    pub account: AccountCode,
    pub start_row: usize,
    pub code_col: usize,
    pub name_col: usize,
    pub quantity_col: usize,
    /// Rows under a subgroup header that never hold data.
    pub rows_after_marker: usize,
    marker: &'static Regex,
}

impl PositionalLayout {
    /// Layout for accounts 21 and 101; `None` for 105, which has no positional layout.
    pub fn for_account(account: AccountCode) -> Option<Self> {
        let start_row = match account {
            AccountCode::Account21 => 8,
            AccountCode::Account101 => 9,
            AccountCode::Account105 => return None,
        };
        Some(Self {
            account,
            start_row,
            code_col: 0,
            name_col: 2,
            quantity_col: 20,
            rows_after_marker: 4,
            marker: subgroup_marker(account)?,
        })
    }
}

/// Accounts 21/101: an integer in the code column marks a data row, a `<code>.<n>`
/// cell opens a subgroup, `Итого` ends the report.
#[derive(Debug, Clone)]
pub struct PositionalGrammar {
    layout: PositionalLayout,
    marker_text: String,
    report_date: String,
    subgroup: String,
}

impl PositionalGrammar {
    pub fn new(account: AccountCode, report_date: impl Into<String>) -> Option<Self> {
        PositionalLayout::for_account(account).map(|layout| Self::with_layout(layout, report_date))
    }

    pub fn with_layout(layout: PositionalLayout, report_date: impl Into<String>) -> Self {
        Self {
            marker_text: layout.account.marker(),
            layout,
            report_date: report_date.into(),
            subgroup: String::new(),
        }
    }

    pub fn subgroup(&self) -> &str {
        &self.subgroup
    }

    fn data_row(&self, sheet: SheetView<'_>, row: usize) -> RowStep<RemainderRecord> {
        let layout = &self.layout;
        let Some(full_name) = sheet
            .read_text(row, layout.name_col)
            .filter(|n| !n.trim().is_empty())
        else {
            tracing::trace!("Row {}: no product name, skipped", row);
            return RowStep::skip();
        };

        let quantity = sheet.read_numeric(row, layout.quantity_col);
        if quantity.is_nan() {
            tracing::trace!("Row {}: quantity is not a number, skipped", row);
            return RowStep::skip();
        }

        RowStep::Emit {
            record: RemainderRecord {
                product_name: normalize_name(strip_unit_suffix(full_name)),
                full_name: full_name.to_string(),
                quantity_remaining: Quantity::Count(quantity),
                subgroup: self.subgroup.clone(),
                report_date: self.report_date.clone(),
                account_code: layout.account,
            },
            advance: 1,
        }
    }
}

impl RowGrammar for PositionalGrammar {
    type Record = RemainderRecord;

    fn start_row(&self) -> usize {
        self.layout.start_row
    }

    fn step(&mut self, sheet: SheetView<'_>, row: usize) -> RowStep<RemainderRecord> {
        let code_col = self.layout.code_col;

        if sheet.read_integer(row, code_col).is_some() {
            return self.data_row(sheet, row);
        }

        let Some(text) = sheet.read_display(row, code_col) else {
            return RowStep::skip();
        };

        if text.contains(&self.marker_text) {
            if let Some(found) = self.layout.marker.find(&text) {
                self.subgroup = found.as_str().to_string();
                tracing::debug!("Row {}: subgroup {}", row, self.subgroup);
            }
            return RowStep::Skip {
                advance: 1 + self.layout.rows_after_marker,
            };
        }

        if text == TOTAL_ROW_LABEL {
            return RowStep::Stop;
        }

        RowStep::skip()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{Data, Range};
    use report_common::grid::SheetBuilder;
    use report_common::Scan;

    const DATE: &str = "2024-06-07";

    fn data_row(builder: SheetBuilder, row: u32, code: &str, name: &str, qty: f64) -> SheetBuilder {
        builder.text(row, 0, code).text(row, 2, name).number(row, 20, qty)
    }

    fn account_21_sheet() -> Range<Data> {
        let mut b = SheetBuilder::new()
            .text(0, 0, "Ведомость остатков")
            .text(7, 0, "Код");
        b = b.text(8, 0, "Группа 21.01 Материалы");
        // rows 9..=12 belong to the group header block
        b = b.text(10, 0, "1");
        b = data_row(b, 13, "1", "Болт М10, шт", 42.0);
        b = data_row(b, 14, " 2 ", "Гайка  М10, шт", 7.5);
        b = b.text(15, 0, "Итого по группе");
        b = data_row(b, 16, "3", "Шайба", 3.0);
        b = b.text(17, 0, "Итого");
        b = data_row(b, 18, "4", "После итога, шт", 1.0);
        b.build()
    }

    #[test]
    fn test_account_21_emits_data_rows_with_subgroup() {
        let range = account_21_sheet();
        let grammar = PositionalGrammar::new(AccountCode::Account21, DATE).unwrap();
        let records: Vec<RemainderRecord> = Scan::new(&range, grammar).collect();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].product_name, "болтм10");
        assert_eq!(records[0].full_name, "Болт М10, шт");
        assert_eq!(records[0].quantity_remaining, Quantity::Count(42.0));
        assert_eq!(records[0].subgroup, "21.01");
        assert_eq!(records[0].report_date, DATE);
        assert_eq!(records[0].account_code, AccountCode::Account21);
        assert_eq!(records[1].product_name, "гайкам10");
        // "Итого по группе" is not the total row
        assert_eq!(records[2].product_name, "шайба");
    }

    #[test]
    fn test_marker_skips_four_rows() {
        let range = account_21_sheet();
        let mut grammar = PositionalGrammar::new(AccountCode::Account21, DATE).unwrap();
        let sheet = SheetView::new(&range);

        assert_eq!(grammar.step(sheet, 8), RowStep::Skip { advance: 5 });
        assert_eq!(grammar.subgroup(), "21.01");
        assert_eq!(grammar.step(sheet, 17), RowStep::Stop);
    }

    #[test]
    fn test_text_rows_leave_subgroup_unchanged() {
        let mut b = SheetBuilder::new().text(9, 0, "101.7");
        b = b.text(14, 0, "Прочее 21.5");
        b = data_row(b, 15, "1", "Стол, шт", 2.0);
        let range = b.build();

        let records: Vec<RemainderRecord> = Scan::new(
            &range,
            PositionalGrammar::new(AccountCode::Account101, DATE).unwrap(),
        )
        .collect();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].subgroup, "101.7");
        assert_eq!(records[0].account_code, AccountCode::Account101);
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let mut b = SheetBuilder::new();
        b = b.text(8, 0, "1").number(8, 20, 5.0); // no name
        b = b.text(9, 0, "2").text(9, 2, "Болт, шт").text(9, 20, "много");
        b = b.int(10, 0, 3).text(10, 2, "Гвоздь, кг").text(10, 20, "12.5");
        let range = b.build();

        let records: Vec<RemainderRecord> = Scan::new(
            &range,
            PositionalGrammar::new(AccountCode::Account21, DATE).unwrap(),
        )
        .collect();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].product_name, "гвоздь");
        assert_eq!(records[0].quantity_remaining, Quantity::Count(12.5));
        assert_eq!(records[0].subgroup, "");
    }

    #[test]
    fn test_no_layout_for_account_105() {
        assert!(PositionalLayout::for_account(AccountCode::Account105).is_none());
        assert!(PositionalGrammar::new(AccountCode::Account105, DATE).is_none());
    }
}
