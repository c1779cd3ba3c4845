// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the capture pipeline

use std::fmt;

/// Result type alias using PipelineError
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Top-level pipeline error type
#[derive(Debug, Clone)]
pub enum PipelineError {
    /// Capture source errors
    Capture(CaptureError),
    /// Color conversion errors
    Convert(ConvertError),
    /// Image encoding failed
    Encode(String),
    /// Configuration errors
    Config(String),
}

/// Capture-source-specific errors
#[derive(Debug, Clone)]
pub enum CaptureError {
    /// The underlying device could not be opened. Terminal: the core never
    /// retries, the UI collaborator decides what to do.
    OpenFailed(String),
    /// The source was closed (or never opened) when a buffer was submitted
    SourceClosed,
    /// Buffer or format does not match what the source produces
    InvalidFormat(String),
}

/// Color conversion errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    /// Frame byte length does not match the declared dimensions and format
    InvalidLength {
        /// Length required by width, height, and pixel format
        expected: usize,
        /// Length actually supplied
        actual: usize,
    },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Capture(e) => write!(f, "Capture error: {}", e),
            PipelineError::Convert(e) => write!(f, "Conversion error: {}", e),
            PipelineError::Encode(msg) => write!(f, "Encoding error: {}", msg),
            PipelineError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::OpenFailed(msg) => write!(f, "Failed to open capture source: {}", msg),
            CaptureError::SourceClosed => write!(f, "Capture source is closed"),
            CaptureError::InvalidFormat(msg) => write!(f, "Invalid format: {}", msg),
        }
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::InvalidLength { expected, actual } => write!(
                f,
                "Frame length {} does not match expected length {}",
                actual, expected
            ),
        }
    }
}

impl std::error::Error for PipelineError {}
impl std::error::Error for CaptureError {}
impl std::error::Error for ConvertError {}

// Conversions from sub-errors to PipelineError
impl From<CaptureError> for PipelineError {
    fn from(err: CaptureError) -> Self {
        PipelineError::Capture(err)
    }
}

impl From<ConvertError> for PipelineError {
    fn from(err: ConvertError) -> Self {
        PipelineError::Convert(err)
    }
}
