//! Error types shared by every part of the studio.

use thiserror::Error;

/// Errors produced by palette generation, extraction, export and QR rendering.
#[derive(Error, Debug)]
pub enum Error {
    /// A color was not a 6-digit hex string (optionally prefixed with `#`).
    #[error("invalid color format: '{0}' (expected 6 hex digits, e.g. #336699)")]
    InvalidColorFormat(String),

    /// The harmony scheme tag is not one of the known schemes.
    #[error("unknown harmony scheme '{0}'")]
    UnknownHarmonyScheme(String),

    /// A requested color count was zero, negative or unreasonably large.
    #[error("invalid color count {0}")]
    InvalidCount(i64),

    /// The uploaded image could not be decoded.
    #[error("unable to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The image has no opaque pixels to sample.
    #[error("image has no opaque pixels")]
    EmptyImage,

    /// Encoding a rendered image failed.
    #[error("image encode error: {0}")]
    ImageEncode(String),

    /// The QR encoder rejected the payload (usually: too much data).
    #[error("QR encode error: {0}")]
    QrEncode(String),

    /// A QR payload is missing its required fields.
    #[error("{0}")]
    EmptyPayload(&'static str),

    /// A named option (pattern, security type, ...) had an unrecognized value.
    #[error("unknown {kind} '{value}'")]
    UnknownOption { kind: &'static str, value: String },

    /// There is nothing to export.
    #[error("no colors to export")]
    EmptyPalette,

    /// A batch CSV produced no usable rows.
    #[error("no valid QR codes found in CSV")]
    EmptyBatch,

    /// An index into a color list was out of range.
    #[error("color index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// The system random source failed.
    #[error("random source unavailable: {0}")]
    Random(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for studio operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an invalid color error for the offending input.
    pub fn invalid_color(input: impl Into<String>) -> Self {
        Self::InvalidColorFormat(input.into())
    }
}
