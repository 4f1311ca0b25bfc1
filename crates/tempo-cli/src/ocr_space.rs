//! HTTP client for the OCR.space `parse/image` endpoint.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use tracing::{debug, info};

use tempo_core::error::OcrError;
use tempo_core::models::config::OcrConfig;
use tempo_core::ocr::{OcrImage, OcrSpaceResponse};

/// Sends receipt images to OCR.space and returns the recognized text.
pub struct OcrSpaceClient {
    client: reqwest::Client,
    config: OcrConfig,
    api_key: String,
}

impl OcrSpaceClient {
    pub fn new(config: &OcrConfig) -> anyhow::Result<Self> {
        let api_key = config.resolve_api_key().ok_or(OcrError::MissingApiKey)?;

        let client = reqwest::Client::builder()
            .user_agent(concat!("tempovale/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
            api_key,
        })
    }

    /// Upload one image and return the text of the first parsed result.
    pub async fn recognize(&self, image: &OcrImage) -> anyhow::Result<String> {
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(image.mime)?;

        let form = Form::new()
            .text("language", self.config.language.clone())
            .text("isOverlayRequired", "false")
            .text("detectOrientation", self.config.detect_orientation.to_string())
            .text("isTable", self.config.is_table.to_string())
            .part("file", part);

        info!(
            "Sending {} ({} bytes) to {}",
            image.file_name,
            image.bytes.len(),
            self.config.endpoint
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("apikey", &self.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("OCR service answered {} with {} bytes", status, body.len());

        let parsed = match OcrSpaceResponse::from_json(&body) {
            Ok(parsed) => parsed,
            Err(e) if !status.is_success() => {
                anyhow::bail!("OCR service returned HTTP {}: {}", status, e)
            }
            Err(e) => return Err(e.into()),
        };

        Ok(parsed.into_text()?)
    }
}
