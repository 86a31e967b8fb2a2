//! Error types for the fatura-core library.
//!
//! Field extraction never fails; these errors only come from loading and
//! saving configuration.

use thiserror::Error;

/// Main error type for the fatura library.
#[derive(Error, Debug)]
pub enum FaturaError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for the fatura library.
pub type Result<T> = std::result::Result<T, FaturaError>;
