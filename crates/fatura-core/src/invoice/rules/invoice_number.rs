//! Invoice number extraction.

use rand::Rng;

use super::patterns::{INVOICE_LABELED, INVOICE_NO_PREFIX, INVOICE_REVERSED};
use super::{all_matches, first_match, ExtractionCandidate, FieldExtractor, Strategy};

/// Largest suffix of a generated placeholder number.
pub const PLACEHOLDER_MAX: u32 = 99_999;

/// Invoice number extractor.
///
/// Arabic invoices often come out of OCR with label and value swapped, so
/// both orientations are tried before the generic prefix rule.
pub struct InvoiceNumberExtractor {
    placeholder_prefix: String,
}

impl InvoiceNumberExtractor {
    const STRATEGIES: &'static [Strategy<String>] = &[
        Strategy::new("label_value", label_value),
        Strategy::new("value_label", value_label),
        Strategy::new("number_prefix", number_prefix),
    ];

    pub fn new() -> Self {
        Self {
            placeholder_prefix: "INV-".to_string(),
        }
    }

    /// Set the prefix of generated placeholder numbers.
    pub fn with_placeholder_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.placeholder_prefix = prefix.into();
        self
    }

    /// Extract the invoice number, generating a placeholder when nothing matches.
    pub fn extract_or_placeholder(&self, text: &str) -> String {
        self.extract(text)
            .map(|c| c.value)
            .unwrap_or_else(|| self.placeholder())
    }

    /// Generate `<prefix><0..=99999>`. Uniqueness is not guaranteed.
    pub fn placeholder(&self) -> String {
        let suffix = rand::thread_rng().gen_range(0..=PLACEHOLDER_MAX);
        format!("{}{}", self.placeholder_prefix, suffix)
    }
}

impl Default for InvoiceNumberExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for InvoiceNumberExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<ExtractionCandidate<String>> {
        first_match(Self::STRATEGIES, text)
    }

    fn extract_all(&self, text: &str) -> Vec<ExtractionCandidate<String>> {
        all_matches(Self::STRATEGIES, text)
    }
}

fn label_value(text: &str) -> Option<ExtractionCandidate<String>> {
    capture_token(&INVOICE_LABELED, text, "label_value")
}

fn value_label(text: &str) -> Option<ExtractionCandidate<String>> {
    capture_token(&INVOICE_REVERSED, text, "value_label")
}

fn number_prefix(text: &str) -> Option<ExtractionCandidate<String>> {
    capture_token(&INVOICE_NO_PREFIX, text, "number_prefix")
}

fn capture_token(
    pattern: &regex::Regex,
    text: &str,
    strategy_id: &'static str,
) -> Option<ExtractionCandidate<String>> {
    let caps = pattern.captures(text)?;
    let token = caps.get(1)?;
    let full_match = caps.get(0)?;

    Some(
        ExtractionCandidate::new(token.as_str().to_string(), full_match.as_str(), strategy_id)
            .with_position(full_match.start(), full_match.end()),
    )
}
