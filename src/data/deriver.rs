//! Column Deriver Module
//! Computes derived fields from raw catalog columns.
//!
//! Every derivation is total: malformed input yields `None` (or the "Unknown"
//! country label), never an error, so one bad row cannot abort a batch.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

/// Label used when a title has no country listed.
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// Date-only layouts accepted by the tolerant date parser, tried in order.
const DATE_FORMATS: [&str; 6] = [
    "%B %d, %Y",
    "%b %d, %Y",
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%d-%b-%y",
    "%d %B %Y",
];

/// Date-time layouts; only the date part is kept.
const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

lazy_static! {
    static ref DIGIT_RUN: Regex = Regex::new(r"\d+").expect("valid digit regex");
}

/// Calendar components of a parsed `date_added`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarParts {
    pub date: NaiveDate,
    pub year: i32,
    pub month: u32,
}

/// First listed country, trimmed, or "Unknown".
pub fn derive_primary_country(countries: Option<&str>) -> String {
    countries
        .and_then(|raw| raw.split(',').next())
        .map(str::trim)
        .filter(|first| !first.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN_COUNTRY.to_string())
}

/// Leading run of decimal digits anywhere in the string ("90 min" -> 90).
pub fn derive_numeric_prefix(duration_raw: Option<&str>) -> Option<u32> {
    let raw = duration_raw?;
    DIGIT_RUN.find(raw)?.as_str().parse().ok()
}

/// Tolerant date parse. Unparsable input gives `None`.
pub fn derive_calendar_parts(date_added_raw: Option<&str>) -> Option<CalendarParts> {
    let raw = date_added_raw?.trim();
    if raw.is_empty() {
        return None;
    }

    let date = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATE_TIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })?;

    Some(CalendarParts {
        date,
        year: date.year(),
        month: date.month(),
    })
}

/// `year_added - release_year` when both are known. May be negative.
pub fn derive_year_gap(year_added: Option<i32>, release_year: Option<i32>) -> Option<i32> {
    Some(year_added? - release_year?)
}

/// Split a comma-delimited field into trimmed, non-empty tokens.
pub fn split_multi_value(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_country_takes_first_token() {
        assert_eq!(derive_primary_country(Some("India, USA")), "India");
        assert_eq!(derive_primary_country(Some("  France ")), "France");
    }

    #[test]
    fn primary_country_falls_back_to_unknown() {
        assert_eq!(derive_primary_country(None), UNKNOWN_COUNTRY);
        assert_eq!(derive_primary_country(Some("")), UNKNOWN_COUNTRY);
        assert_eq!(derive_primary_country(Some(" , USA")), UNKNOWN_COUNTRY);
    }

    #[test]
    fn numeric_prefix_parses_minutes_and_seasons() {
        assert_eq!(derive_numeric_prefix(Some("90 min")), Some(90));
        assert_eq!(derive_numeric_prefix(Some("3 Seasons")), Some(3));
        assert_eq!(derive_numeric_prefix(Some("1 Season")), Some(1));
        assert_eq!(derive_numeric_prefix(Some("approx. 45 min")), Some(45));
    }

    #[test]
    fn numeric_prefix_absent_without_digits() {
        assert_eq!(derive_numeric_prefix(Some("")), None);
        assert_eq!(derive_numeric_prefix(Some("min")), None);
        assert_eq!(derive_numeric_prefix(None), None);
    }

    #[test]
    fn calendar_parts_accepts_common_layouts() {
        let expected = NaiveDate::from_ymd_opt(2021, 9, 25).unwrap();
        for raw in [
            "September 25, 2021",
            " September 25, 2021 ",
            "Sep 25, 2021",
            "2021-09-25",
            "2021-09-25 10:00:00",
            "2021-09-25T10:00:00",
            "09/25/2021",
            "25-Sep-21",
            "25 September 2021",
        ] {
            let parts = derive_calendar_parts(Some(raw)).unwrap();
            assert_eq!(parts.date, expected, "layout {raw:?}");
            assert_eq!(parts.year, 2021);
            assert_eq!(parts.month, 9);
        }
    }

    #[test]
    fn calendar_parts_single_digit_day() {
        let parts = derive_calendar_parts(Some("August 4, 2017")).unwrap();
        assert_eq!((parts.year, parts.month), (2017, 8));
    }

    #[test]
    fn calendar_parts_absent_on_garbage() {
        assert_eq!(derive_calendar_parts(Some("not a date")), None);
        assert_eq!(derive_calendar_parts(Some("   ")), None);
        assert_eq!(derive_calendar_parts(None), None);
    }

    #[test]
    fn year_gap_keeps_sign() {
        assert_eq!(derive_year_gap(Some(2020), Some(2022)), Some(-2));
        assert_eq!(derive_year_gap(Some(2021), Some(2015)), Some(6));
        assert_eq!(derive_year_gap(None, Some(2015)), None);
    }

    #[test]
    fn split_multi_value_trims_and_drops_empty() {
        assert_eq!(
            split_multi_value(Some("A, B,, C ")),
            vec!["A".to_string(), "B".to_string(), "C".to_string()]
        );
        assert!(split_multi_value(None).is_empty());
        assert!(split_multi_value(Some(" , ")).is_empty());
    }
}
