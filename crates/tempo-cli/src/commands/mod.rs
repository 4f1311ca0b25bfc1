//! Subcommands and the state they share.

pub mod config;
pub mod convert;
pub mod history;
pub mod profile;
pub mod scan;
pub mod summary;

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use tracing::debug;

use tempo_core::models::config::TempoConfig;
use tempo_core::models::profile::User;
use tempo_core::receipt::rules::parse_receipt_amount;
use tempo_core::storage::{JsonFileStorage, Storage};

/// Output format for single reports.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum ReportFormat {
    /// Human-readable text
    Text,
    /// JSON output
    Json,
}

/// Load the configuration: explicit path, else the default file if present.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<TempoConfig> {
    if let Some(path) = config_path {
        return Ok(TempoConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Using config file {}", default_path.display());
        Ok(TempoConfig::from_file(&default_path)?)
    } else {
        Ok(TempoConfig::default())
    }
}

/// Default location of the purchase storage file.
pub fn default_data_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tempovale")
        .join("purchases.json")
}

/// Loaded configuration plus opened storage.
pub struct Session {
    pub config: TempoConfig,
    pub storage: JsonFileStorage,
}

impl Session {
    /// `--data` wins over `storage.data_file`, which wins over the default path.
    pub fn open(config_path: Option<&str>, data_path: Option<&Path>) -> anyhow::Result<Self> {
        let config = load_config(config_path)?;

        let path = data_path
            .map(Path::to_path_buf)
            .or_else(|| config.storage.data_file.clone())
            .unwrap_or_else(default_data_path);

        debug!("Using storage file {}", path.display());
        let storage = JsonFileStorage::open(path)?;

        Ok(Self { config, storage })
    }

    /// The configured local user, created on first use.
    pub fn user(&mut self) -> anyhow::Result<User> {
        let uid = self.config.user.uid.clone();
        let email = self.config.user.email.clone();
        Ok(self.storage.ensure_user(&uid, &email)?)
    }
}

/// clap value parser for BRL amounts ("45,90", "45.90", "45").
pub fn parse_amount(s: &str) -> Result<Decimal, String> {
    let value = parse_receipt_amount(s).ok_or_else(|| format!("invalid amount: {}", s))?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(format!("amount must not be negative: {}", s));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("45,90"), Ok(Decimal::new(4590, 2)));
        assert_eq!(parse_amount("40"), Ok(Decimal::from(40)));
        assert!(parse_amount("-3").is_err());
        assert!(parse_amount("abc").is_err());
    }
}
