//! Total amount extraction.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::{CURRENCY_LEADING, CURRENCY_TRAILING, TOTAL_KEYWORD};
use super::{all_matches, first_match, ExtractionCandidate, FieldExtractor, Strategy};

/// Total amount extractor.
///
/// Phase A looks for a total keyword followed by a number. Phase B takes
/// the largest riyal-tagged number in the text, which on a typical invoice
/// is the grand total even when the keyword itself was misrecognized.
pub struct TotalAmountExtractor;

impl TotalAmountExtractor {
    const STRATEGIES: &'static [Strategy<Decimal>] = &[
        Strategy::new("keyword", keyword),
        Strategy::new("largest_currency", largest_currency),
    ];

    pub fn new() -> Self {
        Self
    }

    /// Extract the total, returning zero when it was not found.
    pub fn extract_or_zero(&self, text: &str) -> Decimal {
        self.extract(text).map(|c| c.value).unwrap_or(Decimal::ZERO)
    }
}

impl Default for TotalAmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for TotalAmountExtractor {
    type Output = Decimal;

    fn extract(&self, text: &str) -> Option<ExtractionCandidate<Decimal>> {
        first_match(Self::STRATEGIES, text)
    }

    fn extract_all(&self, text: &str) -> Vec<ExtractionCandidate<Decimal>> {
        all_matches(Self::STRATEGIES, text)
    }
}

/// First keyword occurrence followed by a positive amount.
fn keyword(text: &str) -> Option<ExtractionCandidate<Decimal>> {
    TOTAL_KEYWORD.captures_iter(text).find_map(|caps| {
        let amount = parse_amount(&caps[1]).filter(|a| *a > Decimal::ZERO)?;
        let full_match = caps.get(0)?;
        Some(
            ExtractionCandidate::new(amount, full_match.as_str(), "keyword")
                .with_position(full_match.start(), full_match.end()),
        )
    })
}

/// Largest amount tagged with `SAR` or `ر.س` on either side.
fn largest_currency(text: &str) -> Option<ExtractionCandidate<Decimal>> {
    CURRENCY_TRAILING
        .captures_iter(text)
        .chain(CURRENCY_LEADING.captures_iter(text))
        .filter_map(|caps| {
            let amount = parse_amount(&caps[1])?;
            let full_match = caps.get(0)?;
            Some(
                ExtractionCandidate::new(amount, full_match.as_str(), "largest_currency")
                    .with_position(full_match.start(), full_match.end()),
            )
        })
        .filter(|c| c.value > Decimal::ZERO)
        .max_by(|a, b| a.value.cmp(&b.value))
}

/// Parse an amount such as `1,250.00`, dropping thousands separators and
/// any other non-numeric characters.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    Decimal::from_str(&cleaned).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn extract(text: &str) -> Option<(Decimal, &'static str)> {
        TotalAmountExtractor::new()
            .extract(text)
            .map(|c| (c.value, c.strategy_id))
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1,250.00"), Some(dec("1250.00")));
        assert_eq!(parse_amount("12,345,678.9"), Some(dec("12345678.9")));
        assert_eq!(parse_amount("SAR 99.50"), Some(dec("99.50")));
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("1.2.3"), None);
    }

    #[test]
    fn test_keyword_with_currency() {
        assert_eq!(extract("Total: SAR 1,250.00"), Some((dec("1250.00"), "keyword")));
        assert_eq!(extract("Grand Total $ 75.5"), Some((dec("75.5"), "keyword")));
        assert_eq!(extract("Amount due (incl. VAT): 300"), Some((dec("300"), "keyword")));
    }

    #[test]
    fn test_arabic_keywords() {
        assert_eq!(extract("المجموع 99.50 ر.س"), Some((dec("99.50"), "keyword")));
        assert_eq!(extract("الإجمالي: 1,000"), Some((dec("1000"), "keyword")));
        assert_eq!(extract("المبلغ المطلوب 42.10"), Some((dec("42.10"), "keyword")));
        assert_eq!(extract("الصافي ر.س 18"), Some((dec("18"), "keyword")));
    }

    #[test]
    fn test_keyword_window_limit() {
        // More than 30 non-digit characters between keyword and number.
        let text = "Total is shown on the following page of this doc 500";
        assert_eq!(extract(text), None);
    }

    #[test]
    fn test_zero_keyword_amount_falls_through() {
        assert_eq!(
            extract("Total: 0.00\nPaid 120.00 SAR"),
            Some((dec("120.00"), "largest_currency"))
        );
    }

    #[test]
    fn test_largest_currency_fallback() {
        assert_eq!(
            extract("SAR 10.00 ... SAR 400.00"),
            Some((dec("400.00"), "largest_currency"))
        );
        assert_eq!(
            extract("item 15.00 ر.س\nitem 2,300.50 ر.س\nvat 5 SAR"),
            Some((dec("2300.50"), "largest_currency"))
        );
    }

    #[test]
    fn test_no_total() {
        assert_eq!(extract("asdkjh 1234 !!! ||"), None);
        assert_eq!(TotalAmountExtractor::new().extract_or_zero(""), Decimal::ZERO);
    }
}
