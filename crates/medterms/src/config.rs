//! Configuration management for medterms.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::store::Seed;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "medterms";

/// Default document file name.
const DOCUMENT_FILE_NAME: &str = "MedicalTerms.json";

/// Prefix for environment overrides.
const ENV_PREFIX: &str = "MEDTERMS_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `MEDTERMS_`, `__` between levels)
/// 2. TOML config file at `~/.config/medterms/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Ingestion configuration.
    pub ingest: IngestConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the saved document.
    /// Defaults to `~/.local/share/medterms/MedicalTerms.json`
    pub document_path: Option<PathBuf>,
    /// Seed file used when no saved document exists.
    /// Defaults to the seed compiled into the binary.
    pub seed_path: Option<PathBuf>,
    /// Pretty-print the saved document.
    pub pretty: bool,
}

/// Ingestion-related configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Field delimiter for the CSV output. Must be a single ASCII character.
    pub csv_delimiter: String,
    /// Default CSV output path.
    pub csv_file: PathBuf,
    /// Default JSON output path.
    pub json_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            document_path: None, // Will be resolved to default at runtime
            seed_path: None,
            pretty: true,
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            // Spreadsheet apps in German locales expect semicolons
            csv_delimiter: ";".to_string(),
            csv_file: PathBuf::from("MedicalTerms.csv"),
            json_file: PathBuf::from("MedicalTerms.json"),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `MEDTERMS_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file).nested())
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let delimiter = &self.ingest.csv_delimiter;
        let mut chars = delimiter.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii() && !matches!(c, '"' | '\n' | '\r') => {}
            _ => {
                return Err(Error::config_validation(format!(
                    "csv_delimiter must be a single ASCII character other than a quote or newline, got {delimiter:?}"
                )));
            }
        }

        if self.ingest.csv_file.as_os_str().is_empty() {
            return Err(Error::config_validation("csv_file must not be empty"));
        }

        if self.ingest.json_file.as_os_str().is_empty() {
            return Err(Error::config_validation("json_file must not be empty"));
        }

        Ok(())
    }

    /// Get the document path, resolving defaults if not set.
    #[must_use]
    pub fn document_path(&self) -> PathBuf {
        self.storage
            .document_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DOCUMENT_FILE_NAME))
    }

    /// Get the seed source.
    #[must_use]
    pub fn seed(&self) -> Seed {
        self.storage
            .seed_path
            .clone()
            .map_or(Seed::Bundled, Seed::File)
    }

    /// Get the CSV delimiter as a byte.
    ///
    /// Falls back to `;` if the configuration was not validated.
    #[must_use]
    pub fn csv_delimiter(&self) -> u8 {
        match self.ingest.csv_delimiter.as_bytes() {
            [byte] => *byte,
            _ => b';',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.storage.document_path.is_none());
        assert!(config.storage.seed_path.is_none());
        assert!(config.storage.pretty);
        assert_eq!(config.ingest.csv_delimiter, ";");
    }

    #[test]
    fn test_default_ingest_config() {
        let ingest = IngestConfig::default();

        assert_eq!(ingest.csv_file, PathBuf::from("MedicalTerms.csv"));
        assert_eq!(ingest.json_file, PathBuf::from("MedicalTerms.json"));
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_multi_char_delimiter() {
        let mut config = Config::default();
        config.ingest.csv_delimiter = ";;".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("csv_delimiter"));
    }

    #[test]
    fn test_validate_empty_delimiter() {
        let mut config = Config::default();
        config.ingest.csv_delimiter = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_quote_delimiter() {
        let mut config = Config::default();
        config.ingest.csv_delimiter = "\"".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_non_ascii_delimiter() {
        let mut config = Config::default();
        config.ingest.csv_delimiter = "§".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_output_file() {
        let mut config = Config::default();
        config.ingest.json_file = PathBuf::new();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("json_file"));
    }

    #[test]
    fn test_csv_delimiter_byte() {
        let mut config = Config::default();
        assert_eq!(config.csv_delimiter(), b';');

        config.ingest.csv_delimiter = "\t".to_string();
        assert_eq!(config.csv_delimiter(), b'\t');
    }

    #[test]
    fn test_document_path_default() {
        let config = Config::default();
        let path = config.document_path();

        assert!(path.to_string_lossy().contains("MedicalTerms.json"));
        assert!(path.to_string_lossy().contains("medterms"));
    }

    #[test]
    fn test_document_path_custom() {
        let mut config = Config::default();
        config.storage.document_path = Some(PathBuf::from("/custom/terms.json"));

        assert_eq!(config.document_path(), PathBuf::from("/custom/terms.json"));
    }

    #[test]
    fn test_seed_default_is_bundled() {
        assert_eq!(Config::default().seed(), Seed::Bundled);
    }

    #[test]
    fn test_seed_custom() {
        let mut config = Config::default();
        config.storage.seed_path = Some(PathBuf::from("/data/seed.json"));

        assert_eq!(config.seed(), Seed::File(PathBuf::from("/data/seed.json")));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("medterms"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        // Loading from a nonexistent path should work (uses defaults)
        let result = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")));
        assert!(result.is_ok());
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[storage]\ndocument_path = \"/srv/terms.json\"\npretty = false\n\n[ingest]\ncsv_delimiter = \",\"\n",
        )
        .unwrap();

        let config = Config::load_from(Some(path)).unwrap();
        assert_eq!(config.document_path(), PathBuf::from("/srv/terms.json"));
        assert!(!config.storage.pretty);
        assert_eq!(config.csv_delimiter(), b',');
        assert_eq!(config.ingest.csv_file, PathBuf::from("MedicalTerms.csv"));
    }

    #[test]
    fn test_load_invalid_toml_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ingest]\ncsv_delimiter = \"::\"\n").unwrap();

        let result = Config::load_from(Some(path));
        assert!(matches!(result, Err(Error::ConfigValidation { .. })));
    }

    #[test]
    fn test_storage_config_deserialize() {
        let json = r#"{"seed_path": "/data/seed.json"}"#;
        let storage: StorageConfig = serde_json::from_str(json).unwrap();
        assert_eq!(storage.seed_path, Some(PathBuf::from("/data/seed.json")));
        assert!(storage.pretty);
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("csv_delimiter"));
        assert!(json.contains("document_path"));
    }
}
