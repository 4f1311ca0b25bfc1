//! Input and response models for the external OCR service (OCR.space).

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{OcrError, TempoError};

/// Image extensions the OCR service accepts, with their MIME types.
const IMAGE_TYPES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("webp", "image/webp"),
];

/// MIME type for an image file extension.
pub fn mime_for_extension(extension: &str) -> Option<&'static str> {
    let extension = extension.to_lowercase();
    IMAGE_TYPES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, mime)| *mime)
}

/// An image ready to be sent for recognition.
#[derive(Debug, Clone)]
pub struct OcrImage {
    /// Raw file contents.
    pub bytes: Vec<u8>,
    /// MIME type derived from the file name.
    pub mime: &'static str,
    /// File name sent along with the upload.
    pub file_name: String,
}

impl OcrImage {
    /// Wrap in-memory image data.
    pub fn from_bytes(bytes: Vec<u8>, file_name: impl Into<String>) -> Result<Self, OcrError> {
        let file_name = file_name.into();
        let extension = Path::new(&file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        let mime = mime_for_extension(extension)
            .ok_or_else(|| OcrError::UnsupportedImage(file_name.clone()))?;

        if bytes.is_empty() {
            return Err(OcrError::UnsupportedImage(format!("{} is empty", file_name)));
        }

        Ok(Self {
            bytes,
            mime,
            file_name,
        })
    }

    /// Read an image file from disk.
    pub fn from_path(path: &Path) -> Result<Self, TempoError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("receipt")
            .to_string();

        // Reject by extension before reading the file
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if mime_for_extension(extension).is_none() {
            return Err(OcrError::UnsupportedImage(path.display().to_string()).into());
        }

        let bytes = std::fs::read(path)?;
        debug!("Loaded {} bytes from {}", bytes.len(), path.display());

        Ok(Self::from_bytes(bytes, file_name)?)
    }
}

/// Response body of the OCR.space `parse/image` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct OcrSpaceResponse {
    #[serde(rename = "ParsedResults", default)]
    pub parsed_results: Vec<ParsedResult>,

    #[serde(rename = "OCRExitCode", default)]
    pub exit_code: Option<i32>,

    #[serde(rename = "IsErroredOnProcessing", default)]
    pub is_errored_on_processing: bool,

    /// A string or a list of strings, depending on the failure.
    #[serde(rename = "ErrorMessage", default)]
    pub error_message: Option<serde_json::Value>,

    #[serde(rename = "ProcessingTimeInMilliseconds", default)]
    pub processing_time: Option<serde_json::Value>,
}

/// Text recognized on one page or image.
#[derive(Debug, Clone, Deserialize)]
pub struct ParsedResult {
    #[serde(rename = "ParsedText", default)]
    pub parsed_text: String,

    #[serde(rename = "FileParseExitCode", default)]
    pub file_parse_exit_code: Option<i32>,

    #[serde(rename = "ErrorMessage", default)]
    pub error_message: Option<String>,
}

impl OcrSpaceResponse {
    /// Parse a JSON response body.
    pub fn from_json(body: &str) -> Result<Self, OcrError> {
        serde_json::from_str(body).map_err(|e| OcrError::InvalidResponse(e.to_string()))
    }

    /// Error message(s) joined into one line.
    pub fn error_text(&self) -> Option<String> {
        let text = match self.error_message.as_ref()? {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Array(items) => items
                .iter()
                .filter_map(|v| v.as_str())
                .collect::<Vec<_>>()
                .join("; "),
            serde_json::Value::Null => return None,
            other => other.to_string(),
        };

        if text.trim().is_empty() { None } else { Some(text) }
    }

    /// Server-side processing time; the service sends it as a string.
    pub fn processing_time_ms(&self) -> Option<u64> {
        match self.processing_time.as_ref()? {
            serde_json::Value::String(s) => s.trim().parse().ok(),
            serde_json::Value::Number(n) => n.as_u64(),
            _ => None,
        }
    }

    /// Text of the first parsed result.
    ///
    /// Fails when the service reports an error or returns no usable text, so
    /// the extractor is never run on an empty string.
    pub fn into_text(self) -> Result<String, OcrError> {
        debug!(
            "OCR exit code {:?}, processed in {:?} ms",
            self.exit_code,
            self.processing_time_ms()
        );

        if self.is_errored_on_processing {
            let message = self.error_text().unwrap_or_else(|| match self.exit_code {
                Some(code) => format!("service returned exit code {}", code),
                None => "no error message from the service".to_string(),
            });
            warn!("OCR service reported an error: {}", message);
            return Err(OcrError::Processing(message));
        }

        let first = self.parsed_results.into_iter().next().ok_or(OcrError::NoText)?;
        if !first.parsed_text.trim().is_empty() {
            return Ok(first.parsed_text);
        }

        // Exit code 1 is a parsed file; anything else is a per-file failure
        let message = first.error_message.filter(|m| !m.trim().is_empty());
        Err(match (message, first.file_parse_exit_code) {
            (Some(message), _) => OcrError::Processing(message),
            (None, Some(code)) if code != 1 => {
                OcrError::Processing(format!("file could not be parsed (exit code {})", code))
            }
            _ => OcrError::NoText,
        })
    }
}
