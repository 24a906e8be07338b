//! Error types for changemask

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for changemask operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input not found: {path}")]
    InputNotFound { path: PathBuf },

    #[error(
        "Input formats must match and be either .tif or .img (got: '{before}', '{after}')"
    )]
    FormatMismatch { before: String, after: String },

    #[error(
        "Raster shape mismatch: expected {} bands x {} rows x {} cols, got {} bands x {} rows x {} cols",
        .expected.0, .expected.1, .expected.2, .actual.0, .actual.1, .actual.2
    )]
    ShapeMismatch {
        expected: (usize, usize, usize),
        actual: (usize, usize, usize),
    },

    #[error("Cannot read raster {path}: {reason}")]
    UnreadableFile { path: PathBuf, reason: String },

    #[error("Cannot write raster {path}: {reason}")]
    WriteFailure { path: PathBuf, reason: String },

    #[error("Invalid raster dimensions: {bands} bands x {rows} rows x {cols} cols")]
    InvalidDimensions {
        bands: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Index out of bounds: ({row}, {col}) in raster of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Unsupported data type: {0}")]
    UnsupportedDataType(String),

    #[error("GDAL error: {0}")]
    #[cfg(feature = "gdal")]
    Gdal(String),

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("{0}")]
    Other(String),
}

#[cfg(feature = "gdal")]
impl From<gdal::errors::GdalError> for Error {
    fn from(e: gdal::errors::GdalError) -> Self {
        Error::Gdal(e.to_string())
    }
}

impl Error {
    /// Wrap a decoder failure for `path` as [`Error::UnreadableFile`]
    pub fn unreadable(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        Error::UnreadableFile {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Wrap an encoder failure for `path` as [`Error::WriteFailure`]
    pub fn write_failure(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        Error::WriteFailure {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for changemask operations
pub type Result<T> = std::result::Result<T, Error>;
