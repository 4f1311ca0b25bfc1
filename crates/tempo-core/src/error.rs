//! Error types for the tempo-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the tempo library.
#[derive(Error, Debug)]
pub enum TempoError {
    /// OCR service or response error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Purchase or profile storage error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors related to the external OCR service.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The service reported a processing failure.
    #[error("OCR processing failed: {0}")]
    Processing(String),

    /// The service answered without any parsed text.
    #[error("no text recognized in image")]
    NoText,

    /// The response body could not be understood.
    #[error("invalid OCR response: {0}")]
    InvalidResponse(String),

    /// The file is not an image type the service accepts.
    #[error("unsupported image type: {0}")]
    UnsupportedImage(String),

    /// No API key was configured.
    #[error("missing OCR API key (set OCR_API_KEY or ocr.api_key)")]
    MissingApiKey,
}

/// Errors related to purchase and profile storage.
#[derive(Error, Debug)]
pub enum StorageError {
    /// No user with this uid.
    #[error("user not found: {0}")]
    UserNotFound(String),

    /// A user with this uid already exists.
    #[error("user already exists: {0}")]
    DuplicateUser(String),

    /// Payload validation failed.
    #[error("invalid {field}: {reason}")]
    Invalid { field: String, reason: String },

    /// Failed to read or write the backing file.
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file is not a valid snapshot.
    #[error("corrupt storage file {}: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for the tempo library.
pub type Result<T> = std::result::Result<T, TempoError>;
