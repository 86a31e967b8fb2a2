//! Common regex patterns for bilingual (Arabic/English) invoice extraction.
//!
//! Patterns run on normalized text (see `preprocess::normalize`), so digits
//! are ASCII and whitespace inside a line is a single space. Horizontal
//! whitespace is spelled `[ \t]` wherever a match must not cross a line.

use lazy_static::lazy_static;
use regex::Regex;

/// Monetary number: `1,250.00`, `1250.5`, `99`.
pub const NUMBER: &str = r"[0-9]{1,3}(?:,[0-9]{3})+(?:\.[0-9]{1,2})?|[0-9]+(?:\.[0-9]{1,2})?";

lazy_static! {
    // Invoice number: label, separator, value containing a digit
    pub static ref INVOICE_LABELED: Regex = Regex::new(
        r"(?i)(?:invoice|bill|inv|رقم الفاتورة|الفاتورة|الرقم)[ \t]*[:.#/]+[ \t]*([A-Za-z0-9/\-]*[0-9][A-Za-z0-9/\-]*)"
    ).unwrap();

    // Invoice number: value, separator, Arabic label (right-to-left OCR order)
    pub static ref INVOICE_REVERSED: Regex = Regex::new(
        r"([A-Za-z0-9\-]{3,})[ \t]*[:.#/]+[ \t]*(?:الرقم|الفاتورة)"
    ).unwrap();

    // Invoice number: generic "No." / "Number" prefix. A bare "No" needs a
    // ":" or "#" after it so prose like "No refunds" is not a label.
    pub static ref INVOICE_NO_PREFIX: Regex = Regex::new(
        r"(?i)\b(?:(?:No\.|Number\b)[ \t]*[:#]?|No[ \t]*[:#])[ \t]*([A-Za-z0-9\-]{3,})"
    ).unwrap();

    // Dates: DD/MM/YYYY or YYYY/MM/DD, separators / or -
    pub static ref DATE_NUMERIC: Regex = Regex::new(
        r"\b([0-9]{1,4})[/\-]([0-9]{1,2})[/\-]([0-9]{2,4})\b"
    ).unwrap();

    // Dates: "Mar 5, 2024", "March 05 2024"
    pub static ref DATE_MONTH_NAME: Regex = Regex::new(
        r"(?i)\b([a-z]{3,9})\.?[ \t]+([0-9]{1,2})(?:st|nd|rd|th)?,?[ \t]+([0-9]{4})\b"
    ).unwrap();

    // Dates: "2024 / 05 / 12" with stray spaces around separators
    pub static ref DATE_LOOSE_YMD: Regex = Regex::new(
        r"\b([0-9]{4})[ \t]*[/\-][ \t]*([0-9]{1,2})[ \t]*[/\-][ \t]*([0-9]{1,2})\b"
    ).unwrap();

    // Total keyword, up to 30 non-digit characters, then the amount
    pub static ref TOTAL_KEYWORD: Regex = Regex::new(&format!(
        r"(?i)(?:\b(?:grand[ \t]+total|total|amount)|الإجمالي|الاجمالي|المجموع|المبلغ(?: المطلوب)?|الصافي)[^0-9]{{0,30}}({NUMBER})"
    )).unwrap();

    // Amount followed by a riyal marker: "400.00 SAR", "99.50 ر.س"
    pub static ref CURRENCY_TRAILING: Regex = Regex::new(&format!(
        r"({NUMBER})[ \t]*(?:(?i:SAR)\b|ر\.[ \t]?س)"
    )).unwrap();

    // Riyal marker followed by an amount: "SAR 400.00"
    pub static ref CURRENCY_LEADING: Regex = Regex::new(&format!(
        r"(?:\b(?i:SAR)|ر\.[ \t]?س)[ \t]*({NUMBER})"
    )).unwrap();

    // Supplier: legal-entity markers
    pub static ref ENTITY_INDICATOR: Regex = Regex::new(
        r"(?i)مؤسسة|شركة|متجر|group|technologies|solutions|inc\.|l\.l\.c|limited"
    ).unwrap();

    // Supplier: header/label lines that are never a supplier name
    pub static ref SUPPLIER_EXCLUSION: Regex = Regex::new(
        r"(?i)invoice|date|فاتورة|تاريخ|السادة|المكرم|إلى|to:|bill to|total|المجموع|إغلاق|موعد"
    ).unwrap();
}
