use models::AccountCode;
use regex::Regex;
use std::sync::LazyLock;

static MARKER_21: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"21\.\d+").expect("valid regex"));
static MARKER_101: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"101\.\d+").expect("valid regex"));
static HEADER_21: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^21\.\d+$").expect("valid regex"));
static HEADER_101: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^101\.\d+$").expect("valid regex"));

pub(crate) static QUARTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+) кв\.").expect("valid regex"));
pub(crate) static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"кв\. (\d+)").expect("valid regex"));

/// `<code>.<digits>` anywhere in a cell. Account 105 reports have no such markers.
pub fn subgroup_marker(code: AccountCode) -> Option<&'static Regex> {
    match code {
        AccountCode::Account21 => Some(&*MARKER_21),
        AccountCode::Account101 => Some(&*MARKER_101),
        AccountCode::Account105 => None,
    }
}

/// `<code>.<digits>` as the whole cell.
pub fn subgroup_header(code: AccountCode) -> Option<&'static Regex> {
    match code {
        AccountCode::Account21 => Some(&*HEADER_21),
        AccountCode::Account101 => Some(&*HEADER_101),
        AccountCode::Account105 => None,
    }
}
