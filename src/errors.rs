//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! All public APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, VaricullError>`.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for variant collection and stripping.
#[derive(Error, Debug)]
pub enum VaricullError {
    // ========================================================================
    // Run configuration errors
    // ========================================================================
    /// The save path carries an extension other than the collection's
    /// canonical one. Rejected before any run state is mutated.
    #[error("Invalid shader variant file extension: {0}")]
    InvalidSaveExtension(PathBuf),

    /// No capture view was available when probes had to be laid out.
    /// Fatal for the current run.
    #[error("Not found capture view")]
    CaptureViewMissing,

    // ========================================================================
    // I/O & Format Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Alias for `Result<T, VaricullError>`.
pub type Result<T> = std::result::Result<T, VaricullError>;
