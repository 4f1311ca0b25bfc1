//! Configuration structures for TempoVale.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable that overrides the configured OCR API key.
pub const OCR_API_KEY_ENV: &str = "OCR_API_KEY";

/// Main configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TempoConfig {
    /// OCR service configuration.
    pub ocr: OcrConfig,

    /// Purchase storage configuration.
    pub storage: StorageConfig,

    /// Local user identity.
    pub user: UserConfig,
}

/// OCR.space client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Parse endpoint.
    pub endpoint: String,

    /// API key. `OCR_API_KEY` takes precedence.
    pub api_key: Option<String>,

    /// OCR language code (three letters, e.g. "por").
    pub language: String,

    /// Ask the service to keep table rows on one line.
    pub is_table: bool,

    /// Let the service auto-rotate the image.
    pub detect_orientation: bool,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.ocr.space/parse/image".to_string(),
            api_key: None,
            language: "por".to_string(),
            is_table: true,
            detect_orientation: false,
            timeout_secs: 60,
        }
    }
}

impl OcrConfig {
    /// API key from the environment, falling back to the config value.
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var(OCR_API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.trim().is_empty()))
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON file holding users and purchases. Defaults to the user data dir.
    pub data_file: Option<PathBuf>,
}

/// Identity used by the local CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// Unique user id.
    pub uid: String,

    /// Contact email.
    pub email: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            uid: "local".to_string(),
            email: "local@localhost".to_string(),
        }
    }
}

impl TempoConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: TempoConfig =
            serde_json::from_str(r#"{"ocr": {"language": "eng"}}"#).unwrap();

        assert_eq!(config.ocr.language, "eng");
        assert_eq!(config.ocr.endpoint, "https://api.ocr.space/parse/image");
        assert!(config.ocr.is_table);
        assert_eq!(config.user.uid, "local");
        assert!(config.storage.data_file.is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = TempoConfig::default();
        config.ocr.timeout_secs = 5;
        config.user.uid = "someone".to_string();
        config.save(&path).unwrap();

        let loaded = TempoConfig::from_file(&path).unwrap();
        assert_eq!(loaded.ocr.timeout_secs, 5);
        assert_eq!(loaded.user.uid, "someone");
    }

    #[test]
    fn test_invalid_file_is_invalid_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();

        let err = TempoConfig::from_file(&path).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }
}
