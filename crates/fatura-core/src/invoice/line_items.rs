//! Line item synthesis.
//!
//! OCR text does not expose a reliable item table, so the whole invoice is
//! represented as a single reviewable row instead of a guessed breakdown.

use rust_decimal::Decimal;

use crate::models::invoice::LineItem;

/// Builds the line item list from the extracted total.
pub struct LineItemSynthesizer {
    summary_name: String,
    unrecognized_name: String,
}

impl LineItemSynthesizer {
    pub fn new() -> Self {
        Self {
            summary_name: "صنف عام من الفاتورة".to_string(),
            unrecognized_name: "لم يتم التعرف على الأصناف".to_string(),
        }
    }

    /// Set the names of the summary and sentinel rows.
    pub fn with_names(mut self, summary: impl Into<String>, unrecognized: impl Into<String>) -> Self {
        self.summary_name = summary.into();
        self.unrecognized_name = unrecognized.into();
        self
    }

    /// One summary row for a positive total, otherwise one zero-value sentinel row.
    pub fn synthesize(&self, total: Decimal) -> Vec<LineItem> {
        if total > Decimal::ZERO {
            vec![LineItem::summary(self.summary_name.as_str(), total)]
        } else {
            vec![LineItem::unrecognized(self.unrecognized_name.as_str())]
        }
    }

    /// Name of the sentinel row.
    pub fn unrecognized_name(&self) -> &str {
        &self.unrecognized_name
    }
}

impl Default for LineItemSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}
