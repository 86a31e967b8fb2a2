//! Supplier name extraction.
//!
//! Works line by line. A line naming a legal entity (`شركة`, `Inc.`,
//! `Limited`, ...) wins outright; otherwise the first clean line that is not
//! an obvious header or label is taken.

use super::patterns::{ENTITY_INDICATOR, SUPPLIER_EXCLUSION};
use super::{all_matches, first_match, ExtractionCandidate, FieldExtractor, Strategy};
use crate::invoice::preprocess;

/// Candidate lines must be longer than this many characters...
const MIN_LINE_CHARS: usize = 4;
/// ...and shorter than this many.
const MAX_LINE_CHARS: usize = 60;
/// Upper bound on the length of a returned supplier name, in characters.
pub const SUPPLIER_MAX_CHARS: usize = 50;

/// Supplier name extractor.
pub struct SupplierNameExtractor {
    placeholder: String,
    max_chars: usize,
}

impl SupplierNameExtractor {
    const STRATEGIES: &'static [Strategy<String>] = &[
        Strategy::new("entity_indicator", entity_indicator),
        Strategy::new("first_clean_line", first_clean_line),
    ];

    pub fn new() -> Self {
        Self {
            placeholder: "مورد غير معروف".to_string(),
            max_chars: SUPPLIER_MAX_CHARS,
        }
    }

    /// Set the name returned when no line qualifies.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Set the maximum length of the returned name, in characters.
    /// Clamped to `1..=SUPPLIER_MAX_CHARS` so a name is never empty or over-long.
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars.clamp(1, SUPPLIER_MAX_CHARS);
        self
    }

    /// Extract the supplier name, using the placeholder when nothing
    /// qualifies. The result never exceeds the configured length.
    pub fn extract_or_placeholder(&self, text: &str) -> String {
        match self.extract(text) {
            Some(c) => self.truncate(&c.value),
            None => self.placeholder(),
        }
    }

    /// The "supplier unknown" name, truncated like any other result.
    pub fn placeholder(&self) -> String {
        self.truncate(&self.placeholder)
    }

    /// Truncate a name to the configured length.
    pub fn truncate(&self, name: &str) -> String {
        truncate_chars(name, self.max_chars)
    }
}

impl Default for SupplierNameExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for SupplierNameExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<ExtractionCandidate<String>> {
        first_match(Self::STRATEGIES, text)
    }

    fn extract_all(&self, text: &str) -> Vec<ExtractionCandidate<String>> {
        all_matches(Self::STRATEGIES, text)
    }
}

fn entity_indicator(text: &str) -> Option<ExtractionCandidate<String>> {
    candidate_lines(text)
        .find(|line| ENTITY_INDICATOR.is_match(line))
        .map(|line| ExtractionCandidate::new(line.to_string(), line, "entity_indicator"))
}

fn first_clean_line(text: &str) -> Option<ExtractionCandidate<String>> {
    candidate_lines(text)
        .find(|line| !SUPPLIER_EXCLUSION.is_match(line))
        .map(|line| ExtractionCandidate::new(line.to_string(), line, "first_clean_line"))
}

fn candidate_lines(text: &str) -> impl Iterator<Item = &str> {
    preprocess::lines(text).filter(|line| is_candidate_line(line))
}

/// Whether a trimmed line could plausibly be a company name.
pub fn is_candidate_line(line: &str) -> bool {
    let len = line.chars().count();
    len > MIN_LINE_CHARS && len < MAX_LINE_CHARS && !is_numeric_line(line) && !is_noise_line(line)
}

fn is_numeric_line(line: &str) -> bool {
    line.chars()
        .filter(|c| !c.is_whitespace())
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-' | '/' | ':' | '+'))
}

fn is_noise_line(line: &str) -> bool {
    line.chars()
        .all(|c| c.is_whitespace() || matches!(c, '|' | '!' | 'I'))
}

/// Truncate to at most `max` characters without splitting a code point.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn extract(text: &str) -> String {
        SupplierNameExtractor::new().extract_or_placeholder(text)
    }

    #[test]
    fn test_entity_indicator_wins() {
        let text = "فاتورة ضريبية\nمحل الأمانة\nشركة النور للتجارة\nالرياض";
        assert_eq!(extract(text), "شركة النور للتجارة");

        let text = "Welcome customer\nBlue Sky Technologies\n";
        assert_eq!(extract(text), "Blue Sky Technologies");
    }

    #[test]
    fn test_first_clean_line() {
        let text = "INVOICE\nDate: 2024-01-02\nمحل الأمانة للخضار\nشارع الملك فهد";
        assert_eq!(extract(text), "محل الأمانة للخضار");
    }

    #[test]
    fn test_exclusion_is_case_insensitive() {
        let text = "TOTAL DUE NOW\nbill to someone\nAl Waha Bakery";
        assert_eq!(extract(text), "Al Waha Bakery");
    }

    #[test]
    fn test_candidate_filters() {
        assert!(!is_candidate_line("abcd"));
        assert!(is_candidate_line("abcde"));
        assert!(!is_candidate_line(&"x".repeat(60)));
        assert!(is_candidate_line(&"x".repeat(59)));
        assert!(!is_candidate_line("0501 234 567"));
        assert!(!is_candidate_line("12/05/2024"));
        assert!(!is_candidate_line("|| I !! |"));
        // Length is counted in characters, not bytes.
        assert!(is_candidate_line("مؤسسة"));
    }

    #[test]
    fn test_placeholder() {
        assert_eq!(extract(""), "مورد غير معروف");
        assert_eq!(extract("1234\n||||||\nabc"), "مورد غير معروف");

        let custom = SupplierNameExtractor::new().with_placeholder("Unknown supplier");
        assert_eq!(custom.extract_or_placeholder("Total: 5"), "Unknown supplier");
    }

    #[test]
    fn test_truncation() {
        let long = format!("شركة {}", "ن".repeat(54));
        let name = extract(&long);

        assert_eq!(name.chars().count(), 50);
        assert!(long.starts_with(&name));
    }

    #[test]
    fn test_max_chars_is_clamped() {
        let long = format!("شركة {}", "ن".repeat(54));

        let wide = SupplierNameExtractor::new().with_max_chars(200);
        assert_eq!(wide.extract_or_placeholder(&long).chars().count(), SUPPLIER_MAX_CHARS);

        let zero = SupplierNameExtractor::new().with_max_chars(0);
        assert_eq!(zero.extract_or_placeholder(&long), "ش");
        assert_eq!(zero.extract_or_placeholder(""), "م");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("ab", 3), "ab");
        assert_eq!(truncate_chars("مرحبا", 2), "مر");
    }
}
