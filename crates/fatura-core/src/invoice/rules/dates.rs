//! Issue date extraction.
//!
//! OCR often inserts or drops spaces around date separators, so the cascade
//! moves from strict numeric tokens to month names to a whitespace-tolerant
//! `YYYY / MM / DD` form. A token that is not a real calendar date is
//! discarded and the search continues.

use chrono::NaiveDate;
use regex::Regex;

use super::patterns::{DATE_LOOSE_YMD, DATE_MONTH_NAME, DATE_NUMERIC};
use super::{all_matches, first_match, ExtractionCandidate, FieldExtractor, Strategy};

const MONTHS: [&str; 12] = [
    "january", "february", "march", "april", "may", "june",
    "july", "august", "september", "october", "november", "december",
];

/// Date field extractor.
pub struct DateExtractor;

impl DateExtractor {
    const STRATEGIES: &'static [Strategy<NaiveDate>] = &[
        Strategy::new("numeric", numeric),
        Strategy::new("month_name", month_name),
        Strategy::new("loose_ymd", loose_ymd),
    ];

    pub fn new() -> Self {
        Self
    }

    /// Extract the issue date, falling back to `today` when nothing parses.
    pub fn extract_or(&self, text: &str, today: NaiveDate) -> NaiveDate {
        self.extract(text).map(|c| c.value).unwrap_or(today)
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = NaiveDate;

    fn extract(&self, text: &str) -> Option<ExtractionCandidate<NaiveDate>> {
        first_match(Self::STRATEGIES, text)
    }

    fn extract_all(&self, text: &str) -> Vec<ExtractionCandidate<NaiveDate>> {
        all_matches(Self::STRATEGIES, text)
    }
}

/// `DD/MM/YYYY`, `YYYY-MM-DD` and friends.
fn numeric(text: &str) -> Option<ExtractionCandidate<NaiveDate>> {
    first_valid(&DATE_NUMERIC, text, "numeric", |caps| {
        let first = &caps[1];
        let second: u32 = caps[2].parse().ok()?;
        let third = &caps[3];

        if first.len() == 4 {
            let year: i32 = first.parse().ok()?;
            let day: u32 = third.parse().ok()?;
            return NaiveDate::from_ymd_opt(year, second, day);
        }

        if first.len() > 2 {
            return None;
        }

        let leading: u32 = first.parse().ok()?;
        let year = parse_year(third)?;

        // Day-first, unless only month-first is a real date
        NaiveDate::from_ymd_opt(year, second, leading)
            .or_else(|| NaiveDate::from_ymd_opt(year, leading, second))
    })
}

/// `Mar 5, 2024`, `September 30 2023`.
fn month_name(text: &str) -> Option<ExtractionCandidate<NaiveDate>> {
    first_valid(&DATE_MONTH_NAME, text, "month_name", |caps| {
        let month = month_from_name(&caps[1])?;
        let day: u32 = caps[2].parse().ok()?;
        let year: i32 = caps[3].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    })
}

/// `2024 / 05 / 12` with whitespace around the separators.
fn loose_ymd(text: &str) -> Option<ExtractionCandidate<NaiveDate>> {
    first_valid(&DATE_LOOSE_YMD, text, "loose_ymd", |caps| {
        let compact: String = caps[0].chars().filter(|c| !c.is_whitespace()).collect();
        let parts: Vec<&str> = compact.split(['/', '-']).collect();
        if parts.len() != 3 {
            return None;
        }

        let year: i32 = parts[0].parse().ok()?;
        let month: u32 = parts[1].parse().ok()?;
        let day: u32 = parts[2].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    })
}

/// Return the first match of `pattern` that `parse` accepts.
fn first_valid(
    pattern: &Regex,
    text: &str,
    strategy_id: &'static str,
    parse: impl Fn(&regex::Captures<'_>) -> Option<NaiveDate>,
) -> Option<ExtractionCandidate<NaiveDate>> {
    pattern.captures_iter(text).find_map(|caps| {
        let date = parse(&caps)?;
        let full_match = caps.get(0)?;
        Some(
            ExtractionCandidate::new(date, full_match.as_str(), strategy_id)
                .with_position(full_match.start(), full_match.end()),
        )
    })
}

fn parse_year(s: &str) -> Option<i32> {
    let year: i32 = s.parse().ok()?;
    match s.len() {
        // Two-digit year: 00-50 is 2000s, 51-99 is 1900s
        2 if year <= 50 => Some(2000 + year),
        2 => Some(1900 + year),
        4 => Some(year),
        _ => None,
    }
}

/// Map an English month name or abbreviation (`Jan`, `Sept`, `March`) to 1-12.
fn month_from_name(name: &str) -> Option<u32> {
    let name = name.to_lowercase();
    if name == "sept" {
        return Some(9);
    }

    MONTHS
        .iter()
        .position(|full| name.len() >= 3 && full.starts_with(name.as_str()))
        .map(|i| i as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn extract(text: &str) -> Option<(NaiveDate, &'static str)> {
        DateExtractor::new().extract(text).map(|c| (c.value, c.strategy_id))
    }

    #[test]
    fn test_day_first() {
        assert_eq!(extract("Date: 15/01/2024"), Some((date(2024, 1, 15), "numeric")));
        assert_eq!(extract("05-04-2024"), Some((date(2024, 4, 5), "numeric")));
    }

    #[test]
    fn test_month_first_when_day_first_invalid() {
        assert_eq!(extract("12/31/2023"), Some((date(2023, 12, 31), "numeric")));
    }

    #[test]
    fn test_year_first() {
        assert_eq!(extract("التاريخ 2024/03/09"), Some((date(2024, 3, 9), "numeric")));
        assert_eq!(extract("2024-12-01"), Some((date(2024, 12, 1), "numeric")));
    }

    #[test]
    fn test_two_digit_year() {
        assert_eq!(extract("15/01/24"), Some((date(2024, 1, 15), "numeric")));
        assert_eq!(extract("15/01/99"), Some((date(1999, 1, 15), "numeric")));
    }

    #[test]
    fn test_month_name() {
        assert_eq!(extract("Issued Mar 5, 2024"), Some((date(2024, 3, 5), "month_name")));
        assert_eq!(extract("september 30 2023"), Some((date(2023, 9, 30), "month_name")));
        assert_eq!(extract("Sept. 1, 2022"), Some((date(2022, 9, 1), "month_name")));
    }

    #[test]
    fn test_month_name_rejects_other_words() {
        assert_eq!(extract("Marketing 12 2024"), None);
    }

    #[test]
    fn test_loose_spacing() {
        assert_eq!(extract("2024 / 05 / 12"), Some((date(2024, 5, 12), "loose_ymd")));
        assert_eq!(extract("2024- 5 -7"), Some((date(2024, 5, 7), "loose_ymd")));
    }

    #[test]
    fn test_invalid_calendar_date_falls_through() {
        // 31/02 is not a date either way round; the next token is used.
        assert_eq!(extract("31/02/2024 then 01/03/2024"), Some((date(2024, 3, 1), "numeric")));
        assert_eq!(extract("2024/13/45 or Jan 2, 2024"), Some((date(2024, 1, 2), "month_name")));
        assert_eq!(extract("99/99/9999"), None);
    }

    #[test]
    fn test_fallback_date() {
        let today = date(2026, 10, 19);
        assert_eq!(DateExtractor::new().extract_or("no date", today), today);
        assert_eq!(DateExtractor::new().extract_or("1/2/2020", today), date(2020, 2, 1));
    }

    #[test]
    fn test_month_lookup() {
        assert_eq!(month_from_name("Jan"), Some(1));
        assert_eq!(month_from_name("DECEMBER"), Some(12));
        assert_eq!(month_from_name("Sept"), Some(9));
        assert_eq!(month_from_name("ma"), None);
        assert_eq!(month_from_name("total"), None);
    }
}
