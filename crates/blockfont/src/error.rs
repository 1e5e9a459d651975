use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FontError {
    #[error("parse error: {0}")]
    Parse(String),
    #[error("invalid font: {0}")]
    Invalid(String),
    #[error("archive error: {0}")]
    Archive(String),
    #[error("unsupported font file extension: {}", .0.display())]
    UnsupportedExtension(PathBuf),
    #[error("font '{0}' not found")]
    NotFound(String),
    #[error("nothing to export")]
    EmptyExport,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// A render option outside its documented domain.
///
/// Every variant names the offending field and the value it was given, so the
/// caller can report it without re-inspecting the options.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("invalid {field}: {value} (must be between {min} and {max})")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
    #[error("invalid scale factor: {value:.1} (must be between {min:.1} and {max:.1})")]
    ScaleOutOfRange { value: f64, min: f64, max: f64 },
    #[error("invalid {field}: {value:?} (must be a hex color like #FFFFFF)")]
    InvalidColor { field: String, value: String },
    #[error("invalid {field}: {value:?} (expected one of {expected})")]
    InvalidChoice {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl ValidationError {
    /// Name of the option that failed validation.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::OutOfRange { field, .. } => field,
            ValidationError::ScaleOutOfRange { .. } => "scale_factor",
            ValidationError::InvalidColor { field, .. } => field,
            ValidationError::InvalidChoice { field, .. } => field,
        }
    }
}

pub type Result<T> = std::result::Result<T, FontError>;
