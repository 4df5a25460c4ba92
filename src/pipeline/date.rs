//! Document date extraction.
//!
//! Patterns are tried in priority order against the full page text; the
//! first pattern that yields a calendar-plausible date wins. Plausible
//! means year strictly between 1900 and 2100, month 1-12, day 1-31. An
//! implausible hit does not stop the search, the next pattern still gets
//! its chance.

use once_cell::sync::Lazy;
use regex::Regex;

/// Ordered date patterns. Earlier entries are more specific.
static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // Japanese and separator-delimited: 2024年3月15日, 2024/3/15, 2024-03-15, 2024.3.15
        Regex::new(r"(\d{4})[\s年/.\-]+(\d{1,2})[\s月/.\-]+(\d{1,2})日?").unwrap(),
        // Labelled dates: 作成 2024-03-15, Date: 2024/3/15
        Regex::new(r"(?:作成|発行|提出|(?i:date))[:：\s]*(\d{4})[-/](\d{1,2})[-/](\d{1,2})").unwrap(),
        // Bare space-separated triple: 2024 3 15
        Regex::new(r"(\d{4})\s+(\d{1,2})\s+(\d{1,2})").unwrap(),
    ]
});

/// Scan text for a document date and return it as `YYYYMMDD`.
pub fn extract_date(text: &str) -> Option<String> {
    for pattern in DATE_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(text) {
            let groups: Vec<u32> = caps
                .iter()
                .skip(1)
                .flatten()
                .filter_map(|m| m.as_str().parse().ok())
                .collect();
            if groups.len() < 3 {
                continue;
            }
            if let Some(formatted) = validate_date(groups[0], groups[1], groups[2]) {
                return Some(formatted);
            }
        }
    }
    None
}

/// Validate the components and format as `YYYYMMDD`.
fn validate_date(year: u32, month: u32, day: u32) -> Option<String> {
    if !(1901..=2099).contains(&year) {
        return None;
    }
    if !(1..=12).contains(&month) {
        return None;
    }
    if !(1..=31).contains(&day) {
        return None;
    }
    Some(format!("{}{:02}{:02}", year, month, day))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn japanese_era_style() {
        assert_eq!(
            extract_date("請求書 2024年3月15日 発行"),
            Some("20240315".to_string())
        );
    }

    #[test]
    fn slash_separated() {
        assert_eq!(extract_date("Invoice 2024/3/5"), Some("20240305".to_string()));
    }

    #[test]
    fn iso_style() {
        assert_eq!(
            extract_date("Created 2023-11-07 by scanner"),
            Some("20231107".to_string())
        );
    }

    #[test]
    fn labelled_date() {
        assert_eq!(
            extract_date("Date: 2024-05-20"),
            Some("20240520".to_string())
        );
    }

    #[test]
    fn labelled_japanese() {
        assert_eq!(
            extract_date("作成：2024-01-09"),
            Some("20240109".to_string())
        );
    }

    #[test]
    fn space_separated_fallback() {
        assert_eq!(extract_date("報告 2022 12 1"), Some("20221201".to_string()));
    }

    #[test]
    fn month_thirteen_rejected() {
        assert_eq!(extract_date("2024/13/05"), None);
    }

    #[test]
    fn day_thirty_two_rejected() {
        assert_eq!(extract_date("2024-01-32"), None);
    }

    #[test]
    fn year_out_of_range_rejected() {
        assert_eq!(extract_date("1899-05-05"), None);
        assert_eq!(extract_date("2100-05-05"), None);
    }

    #[test]
    fn no_date_in_text() {
        assert_eq!(extract_date("quarterly report, no dates here"), None);
    }

    #[test]
    fn first_plausible_wins() {
        // The first match of the first pattern decides.
        assert_eq!(
            extract_date("2024年6月1日 and later 2023-01-01"),
            Some("20240601".to_string())
        );
    }

    #[test]
    fn zero_padding_applied() {
        assert_eq!(extract_date("2024/1/2"), Some("20240102".to_string()));
    }
}
