//! Reporting-period metadata carried in report filenames.

use crate::patterns::{QUARTER, YEAR};

/// Character offsets of the date inside a remainder report filename.
const DATE_OFFSET: usize = 22;
const DATE_LEN: usize = 10;

/// Final component of a path written with either `\` or `/` separators.
pub fn last_path_segment(filename: &str) -> &str {
    filename.rsplit(['\\', '/']).next().unwrap_or(filename)
}

/// Date at characters [22, 32) of the filename's last segment.
///
/// Tied to the remainder report naming template. Shorter names give a shorter (possibly
/// empty) string instead of failing.
pub fn extract_report_date(filename: &str) -> String {
    last_path_segment(filename)
        .chars()
        .skip(DATE_OFFSET)
        .take(DATE_LEN)
        .collect()
}

/// Quarter from `"<digits> кв."` and year from `"кв. <digits>"`, searched independently
/// in the filename's last segment.
pub fn extract_quarter_year(filename: &str) -> (Option<String>, Option<String>) {
    let name = last_path_segment(filename);
    let quarter = QUARTER
        .captures(name)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());
    let year = YEAR
        .captures(name)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());
    (quarter, year)
}

#[cfg(test)]
mod tests {
    use super::*;

    // 22 characters precede the date in the report template
    const PREFIX: &str = "Ведомость остатков на ";

    #[test]
    fn test_report_date_from_template() {
        let name = format!("C:\\uploads\\{}2024-06-07 сч_21.xlsx", PREFIX);
        assert_eq!(PREFIX.chars().count(), 22);
        assert_eq!(extract_report_date(&name), "2024-06-07");

        let unix = format!("/srv/in/{}2024-06-07_сч_105.xlsx", PREFIX);
        assert_eq!(extract_report_date(&unix), "2024-06-07");
    }

    #[test]
    fn test_report_date_on_short_name_does_not_fail() {
        assert_eq!(extract_report_date("сч_21_2024-06-07.xlsx"), "");
        assert_eq!(extract_report_date(""), "");
        assert_eq!(extract_report_date("0123456789012345678901234"), "234");
    }

    #[test]
    fn test_quarter_and_year() {
        let (q, y) = extract_quarter_year("Оборотка 2 кв. 2023 сч_21.xlsx");
        assert_eq!(q.as_deref(), Some("2"));
        assert_eq!(y.as_deref(), Some("2023"));
    }

    #[test]
    fn test_quarter_and_year_are_independent() {
        let (q, y) = extract_quarter_year("отчёт 3 кв.xlsx");
        assert_eq!(q.as_deref(), Some("3"));
        assert!(y.is_none());

        let (q, y) = extract_quarter_year("сч_105.xlsx");
        assert!(q.is_none() && y.is_none());
    }

    #[test]
    fn test_quarter_and_year_ignore_directories() {
        let (q, y) = extract_quarter_year("/srv/1 кв. 2020/Оборот 2 кв. 2024 сч_21.xlsx");
        assert_eq!(q.as_deref(), Some("2"));
        assert_eq!(y.as_deref(), Some("2024"));

        let (q, y) = extract_quarter_year("D:\\3 кв. 2019\\сч_105.xlsx");
        assert!(q.is_none() && y.is_none());
    }

    #[test]
    fn test_last_path_segment() {
        assert_eq!(last_path_segment("a\\b/c.xlsx"), "c.xlsx");
        assert_eq!(last_path_segment("c.xlsx"), "c.xlsx");
    }
}
