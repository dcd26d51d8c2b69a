use std::fmt;

use models::{AccountCode, ReportFamily};
use report_common::last_path_segment;

/// Filename tokens naming the ledger account of a report.
const FILENAME_TOKENS: [(&str, AccountCode); 3] = [
    ("сч_21", AccountCode::Account21),
    ("сч_101", AccountCode::Account101),
    ("сч_105", AccountCode::Account105),
];

/// Finds the account token in the last path segment of `filename`.
///
/// A token only counts when no digit follows it, so `сч_1010` names no account.
pub fn account_from_filename(filename: &str) -> Option<AccountCode> {
    let segment = last_path_segment(filename);
    FILENAME_TOKENS.iter().find_map(|(token, account)| {
        segment
            .match_indices(token)
            .any(|(pos, _)| {
                !segment[pos + token.len()..]
                    .chars()
                    .next()
                    .is_some_and(|c| c.is_ascii_digit())
            })
            .then_some(*account)
    })
}

/// Row grammar selected for one report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportGrammar {
    Remainder21,
    Remainder101,
    Remainder105,
    Turnover105,
    /// Two-row turnover layout; only accounts 21 and 101.
    TurnoverPaired(AccountCode),
}

impl ReportGrammar {
    pub fn for_report(family: ReportFamily, account: AccountCode) -> Self {
        match (family, account) {
            (ReportFamily::Remainder, AccountCode::Account21) => Self::Remainder21,
            (ReportFamily::Remainder, AccountCode::Account101) => Self::Remainder101,
            (ReportFamily::Remainder, AccountCode::Account105) => Self::Remainder105,
            (ReportFamily::Turnover, AccountCode::Account105) => Self::Turnover105,
            (ReportFamily::Turnover, paired) => Self::TurnoverPaired(paired),
        }
    }

    /// Grammar for a report of `family` named `filename`; `None` when the filename
    /// carries no known account token.
    pub fn resolve(family: ReportFamily, filename: &str) -> Option<Self> {
        account_from_filename(filename).map(|account| Self::for_report(family, account))
    }

    pub fn family(self) -> ReportFamily {
        match self {
            Self::Remainder21 | Self::Remainder101 | Self::Remainder105 => ReportFamily::Remainder,
            Self::Turnover105 | Self::TurnoverPaired(_) => ReportFamily::Turnover,
        }
    }

    pub fn account(self) -> AccountCode {
        match self {
            Self::Remainder21 => AccountCode::Account21,
            Self::Remainder101 => AccountCode::Account101,
            Self::Remainder105 | Self::Turnover105 => AccountCode::Account105,
            Self::TurnoverPaired(account) => account,
        }
    }
}

impl fmt::Display for ReportGrammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} account {}", self.family(), self.account())
    }
}
