//! Error types for urban heat island analysis

use thiserror::Error;

/// Main error type for UHI operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("No data available: {0}")]
    DataUnavailable(String),

    #[error("Insufficient data: {available} valid points, at least {required} required")]
    InsufficientData { available: usize, required: usize },

    #[error("Computation failed: {0}")]
    Computation(String),

    #[error("Invalid raster dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Index out of bounds: ({row}, {col}) in raster of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Raster size mismatch: expected ({er}, {ec}), got ({ar}, {ac})")]
    SizeMismatch { er: usize, ec: usize, ar: usize, ac: usize },
}

/// Coarse classification of an [`Error`], used by the service boundary to
/// pick a user-facing message and status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller supplied an invalid parameter; nothing was processed.
    Parameter,
    /// The provider had no usable imagery, or every point was filtered out.
    DataUnavailable,
    /// Fewer valid points than clusters.
    InsufficientData,
    /// Internal numeric or I/O failure.
    Computation,
}

impl Error {
    /// Build an `InvalidParameter` error from any displayable value.
    pub fn invalid_parameter(
        name: &'static str,
        value: impl std::fmt::Display,
        reason: impl Into<String>,
    ) -> Self {
        Error::InvalidParameter {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidParameter { .. } => ErrorKind::Parameter,
            Error::DataUnavailable(_) => ErrorKind::DataUnavailable,
            Error::InsufficientData { .. } => ErrorKind::InsufficientData,
            Error::Computation(_)
            | Error::Io(_)
            | Error::InvalidDimensions { .. }
            | Error::IndexOutOfBounds { .. }
            | Error::SizeMismatch { .. } => ErrorKind::Computation,
        }
    }
}

impl ErrorKind {
    /// Short human-readable label for this kind.
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::Parameter => "invalid parameter",
            ErrorKind::DataUnavailable => "no data available",
            ErrorKind::InsufficientData => "insufficient data",
            ErrorKind::Computation => "internal processing failure",
        }
    }
}

/// Result type alias for UHI operations
pub type Result<T> = std::result::Result<T, Error>;
