//! Extraction coordinator: runs every field extractor and assembles the record.

use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::models::config::ExtractionConfig;
use crate::models::invoice::InvoiceRecord;

use super::line_items::LineItemSynthesizer;
use super::preprocess;
use super::rules::{
    DateExtractor, ExtractionCandidate, FieldExtractor, InvoiceNumberExtractor,
    SupplierNameExtractor, TotalAmountExtractor,
};
use super::InvoiceExtractor;

/// Result of invoice extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted invoice record.
    pub record: InvoiceRecord,
    /// Fields that fell back to their default value.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for invoice parsing.
pub trait InvoiceParser {
    /// Parse an invoice from OCR text, with diagnostics.
    fn parse(&self, text: &str) -> ExtractionResult;
}

/// Runs the field extractors over normalized text and builds an
/// [`InvoiceRecord`].
///
/// Stateless between calls and safe to share across threads. Each extractor
/// is isolated: if one panics, its field takes the fallback value and the
/// others still run.
pub struct ExtractionCoordinator {
    invoice_numbers: InvoiceNumberExtractor,
    dates: DateExtractor,
    totals: TotalAmountExtractor,
    suppliers: SupplierNameExtractor,
    line_items: LineItemSynthesizer,
    /// Date used when no date is found; `None` means today.
    reference_date: Option<NaiveDate>,
}

impl ExtractionCoordinator {
    /// Create a coordinator with default settings.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    /// Create a coordinator from extraction configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            invoice_numbers: InvoiceNumberExtractor::new()
                .with_placeholder_prefix(config.invoice_number_prefix.as_str()),
            dates: DateExtractor::new(),
            totals: TotalAmountExtractor::new(),
            suppliers: SupplierNameExtractor::new()
                .with_placeholder(config.supplier_placeholder.as_str())
                .with_max_chars(config.supplier_max_chars),
            line_items: LineItemSynthesizer::new().with_names(
                config.summary_item_name.as_str(),
                config.unrecognized_item_name.as_str(),
            ),
            reference_date: None,
        }
    }

    /// Pin the fallback date instead of using the current local date.
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    fn fallback_date(&self) -> NaiveDate {
        self.reference_date
            .unwrap_or_else(|| Local::now().date_naive())
    }
}

impl Default for ExtractionCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceParser for ExtractionCoordinator {
    fn parse(&self, text: &str) -> ExtractionResult {
        let start = Instant::now();
        let mut warnings = Vec::new();

        info!("Parsing invoice from {} characters of text", text.len());

        let normalized = preprocess::normalize(text);

        let invoice_number = match isolated("invoice_number", || self.invoice_numbers.extract(&normalized)) {
            Some(c) => c.value,
            None => {
                warnings.push("Could not extract invoice number".to_string());
                self.invoice_numbers.placeholder()
            }
        };

        let date = match isolated("date", || self.dates.extract(&normalized)) {
            Some(c) => c.value,
            None => {
                warnings.push("Could not extract issue date".to_string());
                self.fallback_date()
            }
        };

        let total_amount = match isolated("total_amount", || self.totals.extract(&normalized)) {
            Some(c) => c.value,
            None => {
                warnings.push("Could not extract total amount".to_string());
                Decimal::ZERO
            }
        };

        let supplier_name = match isolated("supplier_name", || self.suppliers.extract(&normalized)) {
            Some(c) => self.suppliers.truncate(&c.value),
            None => {
                warnings.push("Could not extract supplier name".to_string());
                self.suppliers.placeholder()
            }
        };

        let is_low_confidence = total_amount.is_zero();
        let line_items = self.line_items.synthesize(total_amount);

        let record = InvoiceRecord {
            invoice_number,
            supplier_name,
            date,
            total_amount,
            line_items,
            is_low_confidence,
        };

        debug!(
            "Extracted invoice {} (total {}, low confidence: {})",
            record.invoice_number, record.total_amount, record.is_low_confidence
        );

        ExtractionResult {
            record,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

impl InvoiceExtractor for ExtractionCoordinator {
    fn extract(&self, raw_text: &str) -> InvoiceRecord {
        self.parse(raw_text).record
    }
}

/// Run one field extractor, turning a panic into "not found".
fn isolated<T>(
    field: &'static str,
    run: impl FnOnce() -> Option<ExtractionCandidate<T>>,
) -> Option<ExtractionCandidate<T>> {
    match panic::catch_unwind(AssertUnwindSafe(run)) {
        Ok(Some(candidate)) => {
            debug!(
                field,
                strategy = candidate.strategy_id,
                "Matched {:?}",
                candidate.raw_match
            );
            Some(candidate)
        }
        Ok(None) => {
            debug!(field, "No strategy matched, using fallback");
            None
        }
        Err(_) => {
            warn!(field, "Extractor panicked, using fallback");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn coordinator() -> ExtractionCoordinator {
        ExtractionCoordinator::new().with_reference_date(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap())
    }

    #[test]
    fn test_parse_full_invoice() {
        let text = r#"
            مؤسسة الريان للتجارة
            فاتورة ضريبية
            رقم الفاتورة: 10045
            التاريخ: 12/03/2024

            صنف ١   ٢٠٫٠٠ ر.س
            صنف ٢   ٣٠٫٠٠ ر.س
            الإجمالي   ٥٧٫٥٠ ر.س
        "#;

        let result = coordinator().parse(text);
        let record = result.record;

        assert_eq!(record.invoice_number, "10045");
        assert_eq!(record.supplier_name, "مؤسسة الريان للتجارة");
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 3, 12).unwrap());
        assert_eq!(record.total_amount, Decimal::new(5750, 2));
        assert!(!record.is_low_confidence);
        assert_eq!(record.line_items.len(), 1);
        assert_eq!(record.line_items[0].total_price, Decimal::new(5750, 2));
        assert!(result.warnings.is_empty());
        assert!(record.validate().is_empty());
    }

    #[test]
    fn test_all_fallbacks_reported() {
        let result = coordinator().parse("");
        let record = &result.record;

        assert!(record.invoice_number.starts_with("INV-"));
        assert_eq!(record.supplier_name, "مورد غير معروف");
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        assert_eq!(record.total_amount, Decimal::ZERO);
        assert!(record.is_low_confidence);
        assert_eq!(result.warnings.len(), 4);
    }

    #[test]
    fn test_low_confidence_only_follows_total() {
        // Number, date and supplier all fall back but the total is found.
        let record = coordinator().extract("Total: 10");

        assert!(!record.is_low_confidence);
        assert!(record.invoice_number.starts_with("INV-"));
    }

    #[test]
    fn test_from_config() {
        let config = ExtractionConfig {
            invoice_number_prefix: "TMP-".to_string(),
            supplier_placeholder: "Unknown supplier".to_string(),
            supplier_max_chars: 7,
            summary_item_name: "General item".to_string(),
            unrecognized_item_name: "Items not recognized".to_string(),
        };
        let record = ExtractionCoordinator::from_config(&config).extract("");

        assert!(record.invoice_number.starts_with("TMP-"));
        assert_eq!(record.supplier_name, "Unknown");
        assert_eq!(record.line_items[0].name, "Items not recognized");
    }

    #[test]
    fn test_unvalidated_supplier_length_stays_in_bounds() {
        let long = format!("Gulf Horizon Industrial Group {}", "x".repeat(25));

        for max_chars in [0, 200] {
            let config = ExtractionConfig {
                supplier_max_chars: max_chars,
                ..ExtractionConfig::default()
            };
            let record = ExtractionCoordinator::from_config(&config).extract(&long);
            let len = record.supplier_name.chars().count();

            assert!((1..=50).contains(&len), "max_chars {} gave {}", max_chars, len);
        }
    }

    #[test]
    fn test_isolated_swallows_panic() {
        let result: Option<ExtractionCandidate<String>> = isolated("test", || panic!("boom"));
        assert!(result.is_none());

        let result = isolated("test", || Some(ExtractionCandidate::new(1u8, "1", "s")));
        assert_eq!(result.map(|c| c.value), Some(1));
    }

    #[test]
    fn test_coordinator_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ExtractionCoordinator>();
    }
}
