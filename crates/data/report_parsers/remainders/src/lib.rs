//! Grammars for inventory-remainder reports.
//!
//! Accounts 21 and 101 share a positional layout with `<code>.<n>` subgroup headers;
//! account 105 numbers its groups with a running counter in the code column instead.

pub mod counter;
pub mod positional;

pub use counter::CounterGrammar;
pub use positional::{PositionalGrammar, PositionalLayout};

use calamine::{Data, Range};
use models::{AccountCode, RemainderRecord};
use report_common::{RowGrammar, RowStep, Scan, SheetView};

/// Remainder grammar for any account code.
#[derive(Debug, Clone)]
pub enum RemainderGrammar {
    Positional(PositionalGrammar),
    Counter(CounterGrammar),
}

impl RemainderGrammar {
    pub fn for_account(account: AccountCode, report_date: impl Into<String>) -> Self {
        match PositionalLayout::for_account(account) {
            Some(layout) => Self::Positional(PositionalGrammar::with_layout(layout, report_date)),
            None => Self::Counter(CounterGrammar::new(report_date)),
        }
    }
}

impl RowGrammar for RemainderGrammar {
    type Record = RemainderRecord;

    fn start_row(&self) -> usize {
        match self {
            Self::Positional(g) => g.start_row(),
            Self::Counter(g) => g.start_row(),
        }
    }

    fn step(&mut self, sheet: SheetView<'_>, row: usize) -> RowStep<RemainderRecord> {
        match self {
            Self::Positional(g) => g.step(sheet, row),
            Self::Counter(g) => g.step(sheet, row),
        }
    }
}

/// Parses a whole remainder sheet for the given account into records.
///
/// The reporting date is taken from the filename template; see
/// [`report_common::extract_report_date`].
pub fn parse_remainders(
    range: &Range<Data>,
    account: AccountCode,
    filename: &str,
) -> Vec<RemainderRecord> {
    let report_date = report_common::extract_report_date(filename);
    Scan::new(range, RemainderGrammar::for_account(account, report_date)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use report_common::grid::SheetBuilder;

    #[test]
    fn test_grammar_per_account() {
        assert!(matches!(
            RemainderGrammar::for_account(AccountCode::Account21, ""),
            RemainderGrammar::Positional(_)
        ));
        assert!(matches!(
            RemainderGrammar::for_account(AccountCode::Account105, ""),
            RemainderGrammar::Counter(_)
        ));
        assert_eq!(RemainderGrammar::for_account(AccountCode::Account101, "").start_row(), 9);
        assert_eq!(RemainderGrammar::for_account(AccountCode::Account105, "").start_row(), 6);
    }

    #[test]
    fn test_parse_remainders_tags_report_date() {
        let range = SheetBuilder::new()
            .text(8, 0, "1")
            .text(8, 2, "Молоток, шт")
            .number(8, 20, 4.0)
            .build();

        let records = parse_remainders(
            &range,
            AccountCode::Account21,
            "D:\\in\\Ведомость остатков на 2024-03-31 сч_21.xlsx",
        );

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].report_date, "2024-03-31");
        assert_eq!(records[0].product_name, "молоток");
    }
}
