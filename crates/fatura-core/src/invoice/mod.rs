//! Invoice field extraction module.

mod parser;
pub mod line_items;
pub mod preprocess;
pub mod rules;

pub use parser::{ExtractionCoordinator, ExtractionResult, InvoiceParser};

use crate::models::invoice::InvoiceRecord;

/// Trait for invoice field extractors.
///
/// Extraction is total: any input, including empty or non-invoice text,
/// yields a fully populated record.
pub trait InvoiceExtractor {
    /// Extract an invoice record from raw OCR text.
    fn extract(&self, raw_text: &str) -> InvoiceRecord;
}
