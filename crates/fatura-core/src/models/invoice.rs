//! Invoice record produced by the extraction engine.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A structured invoice recovered from OCR text.
///
/// Every field is always populated; fields that could not be found carry
/// their documented fallback value. The record is handed to the caller for
/// human review and is not retained by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRecord {
    /// Invoice identifier, or a generated `INV-<n>` placeholder.
    pub invoice_number: String,

    /// Supplier/company name, at most 50 characters.
    pub supplier_name: String,

    /// Issue date (serialized as `YYYY-MM-DD`).
    pub date: NaiveDate,

    /// Grand total. Zero means the total was not found.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,

    /// Exactly one row: the synthesized summary item or the sentinel.
    pub line_items: Vec<LineItem>,

    /// Set when the total could not be extracted.
    pub is_low_confidence: bool,
}

/// A single line item on the invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Item description.
    pub name: String,

    /// Quantity.
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,

    /// Price per unit.
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,

    /// Total for this line.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
}

impl LineItem {
    /// A single row standing for the whole invoice.
    pub fn summary(name: impl Into<String>, total: Decimal) -> Self {
        Self {
            name: name.into(),
            quantity: Decimal::ONE,
            unit_price: total,
            total_price: total,
        }
    }

    /// The zero-value row emitted when no total was recognized.
    pub fn unrecognized(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: Decimal::ONE,
            unit_price: Decimal::ZERO,
            total_price: Decimal::ZERO,
        }
    }

    /// Whether this is a zero-value placeholder row.
    pub fn is_sentinel(&self) -> bool {
        self.unit_price.is_zero() && self.total_price.is_zero()
    }
}

impl InvoiceRecord {
    /// Check the record's internal consistency and return any issues found.
    ///
    /// Records produced by the engine are always consistent; this is meant
    /// for records that came back from the review form.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.invoice_number.trim().is_empty() {
            issues.push("Missing invoice number".to_string());
        }

        if self.supplier_name.trim().is_empty() {
            issues.push("Missing supplier name".to_string());
        }

        if self.total_amount.is_sign_negative() {
            issues.push(format!("Negative total amount ({})", self.total_amount));
        }

        if self.line_items.is_empty() {
            issues.push("No line items".to_string());
        }

        let has_sentinel = self.line_items.iter().any(LineItem::is_sentinel);
        if self.total_amount.is_zero() != has_sentinel {
            issues.push("Sentinel line item does not match the total amount".to_string());
        }

        if self.total_amount.is_zero() != self.is_low_confidence {
            issues.push("Low-confidence flag does not match the total amount".to_string());
        }

        let calculated: Decimal = self.line_items.iter().map(|i| i.total_price).sum();
        if (calculated - self.total_amount).abs() > Decimal::new(1, 2) {
            issues.push(format!(
                "Line item total ({}) differs from invoice total ({})",
                calculated, self.total_amount
            ));
        }

        issues
    }
}
