//! Core library for bilingual (Arabic/English) invoice field extraction.
//!
//! This crate provides:
//! - OCR text normalization (whitespace, line endings, Arabic-Indic digits)
//! - Cascading rule-based extractors for invoice number, date, total and supplier
//! - Summary line item synthesis and the low-confidence flag
//! - Invoice record models and configuration

pub mod error;
pub mod models;
pub mod invoice;

pub use error::{FaturaError, Result};
pub use models::config::{ExtractionConfig, FaturaConfig, OutputConfig, OutputFormat};
pub use models::invoice::{InvoiceRecord, LineItem};
pub use invoice::{ExtractionCoordinator, ExtractionResult, InvoiceExtractor, InvoiceParser};
