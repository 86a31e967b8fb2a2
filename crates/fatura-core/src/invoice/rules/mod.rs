//! Rule-based field extractors for bilingual invoices.
//!
//! Every field is found by an ordered cascade of strategies, most specific
//! first. The first strategy that produces a candidate wins; there is no
//! scoring across strategies beyond their order.

pub mod amounts;
pub mod dates;
pub mod invoice_number;
pub mod patterns;
pub mod supplier;

pub use amounts::{parse_amount, TotalAmountExtractor};
pub use dates::DateExtractor;
pub use invoice_number::InvoiceNumberExtractor;
pub use supplier::{SupplierNameExtractor, SUPPLIER_MAX_CHARS};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text, stopping at the first strategy that matches.
    fn extract(&self, text: &str) -> Option<ExtractionCandidate<Self::Output>>;

    /// Run every strategy and return each one's candidate, in priority order.
    fn extract_all(&self, text: &str) -> Vec<ExtractionCandidate<Self::Output>>;
}

/// A value proposed by a single strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionCandidate<T> {
    /// Parsed value.
    pub value: T,
    /// Text that was matched.
    pub raw_match: String,
    /// Identifier of the strategy that produced this candidate.
    pub strategy_id: &'static str,
    /// Byte range in the searched text.
    pub position: Option<(usize, usize)>,
}

impl<T> ExtractionCandidate<T> {
    pub fn new(value: T, raw_match: impl Into<String>, strategy_id: &'static str) -> Self {
        Self {
            value,
            raw_match: raw_match.into(),
            strategy_id,
            position: None,
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}

/// One pattern-matching rule in a field's cascade.
pub struct Strategy<T> {
    /// Stable identifier, reported on the candidate and in logs.
    pub id: &'static str,
    /// The rule itself.
    pub run: fn(&str) -> Option<ExtractionCandidate<T>>,
}

impl<T> Strategy<T> {
    pub const fn new(id: &'static str, run: fn(&str) -> Option<ExtractionCandidate<T>>) -> Self {
        Self { id, run }
    }
}

/// Try strategies in order and return the first candidate.
pub fn first_match<T>(strategies: &[Strategy<T>], text: &str) -> Option<ExtractionCandidate<T>> {
    strategies.iter().find_map(|s| (s.run)(text))
}

/// Collect the candidate of every strategy that matches.
pub fn all_matches<T>(strategies: &[Strategy<T>], text: &str) -> Vec<ExtractionCandidate<T>> {
    strategies.iter().filter_map(|s| (s.run)(text)).collect()
}
