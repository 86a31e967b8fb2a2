//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{FaturaError, Result};
use crate::invoice::rules::SUPPLIER_MAX_CHARS;

/// Main configuration for fatura.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FaturaConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

/// Field extraction configuration.
///
/// Only fallback labels and limits are configurable; the matching rules
/// themselves are fixed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Prefix of the generated invoice number when none is found.
    pub invoice_number_prefix: String,

    /// Supplier name used when no candidate line qualifies.
    pub supplier_placeholder: String,

    /// Maximum supplier name length in characters, 1 to 50.
    pub supplier_max_chars: usize,

    /// Name of the synthesized summary line item.
    pub summary_item_name: String,

    /// Name of the sentinel line item emitted when no total is found.
    pub unrecognized_item_name: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            invoice_number_prefix: "INV-".to_string(),
            supplier_placeholder: "مورد غير معروف".to_string(),
            supplier_max_chars: 50,
            summary_item_name: "صنف عام من الفاتورة".to_string(),
            unrecognized_item_name: "لم يتم التعرف على الأصناف".to_string(),
        }
    }
}

/// Output configuration for the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Format used when none is given on the command line.
    pub default_format: OutputFormat,

    /// Pretty-print JSON output.
    pub pretty_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_format: OutputFormat::Json,
            pretty_json: true,
        }
    }
}

/// Output format for extracted records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// JSON output
    #[default]
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    /// File extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

impl FaturaConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that would make extraction output unusable.
    pub fn validate(&self) -> Result<()> {
        if !(1..=SUPPLIER_MAX_CHARS).contains(&self.extraction.supplier_max_chars) {
            return Err(FaturaError::Config(format!(
                "extraction.supplier_max_chars must be between 1 and {}",
                SUPPLIER_MAX_CHARS
            )));
        }
        if self.extraction.invoice_number_prefix.trim().is_empty() {
            return Err(FaturaError::Config(
                "extraction.invoice_number_prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: FaturaConfig =
            serde_json::from_str(r#"{"extraction": {"supplier_placeholder": "Unknown"}}"#).unwrap();

        assert_eq!(config.extraction.supplier_placeholder, "Unknown");
        assert_eq!(config.extraction.supplier_max_chars, 50);
        assert_eq!(config.extraction.invoice_number_prefix, "INV-");
        assert_eq!(config.output.default_format, OutputFormat::Json);
    }

    #[test]
    fn test_output_format_names() {
        let format: OutputFormat = serde_json::from_str(r#""csv""#).unwrap();
        assert_eq!(format, OutputFormat::Csv);
        assert_eq!(format.extension(), "csv");
        assert_eq!(OutputFormat::Text.extension(), "txt");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut config = FaturaConfig::default();
        config.output.pretty_json = false;

        config.save(&path).unwrap();
        let loaded = FaturaConfig::from_file(&path).unwrap();

        assert!(!loaded.output.pretty_json);
        assert_eq!(loaded.extraction.summary_item_name, config.extraction.summary_item_name);
    }

    #[test]
    fn test_validate_supplier_length_bounds() {
        let mut config = FaturaConfig::default();

        for bad in [0, 51, 200] {
            config.extraction.supplier_max_chars = bad;
            let err = config.validate().unwrap_err();
            assert!(matches!(err, FaturaError::Config(_)), "{}", bad);
        }

        for good in [1, 30, 50] {
            config.extraction.supplier_max_chars = good;
            assert!(config.validate().is_ok(), "{}", good);
        }
    }

    #[test]
    fn test_from_file_rejects_oversized_supplier_length() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"extraction": {"supplier_max_chars": 200}}"#).unwrap();

        let err = FaturaConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, FaturaError::Config(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = FaturaConfig::from_file(Path::new("/nonexistent/fatura.json")).unwrap_err();
        assert!(matches!(err, FaturaError::Io(_)));
    }
}
