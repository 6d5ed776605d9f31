//! Application configuration, read from an optional JSON file.

use crate::data::DuplicatePolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://www.star.nesdis.noaa.gov/smcd/emb/vci/VH/get_TS_admin.php";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Parameters of the per-province download.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub base_url: String,
    pub country: String,
    pub year_start: i32,
    pub year_end: i32,
    /// Aggregation type requested from the provider ("Mean", ...)
    pub aggregation: String,
    pub province_count: u32,
    pub clean_before_fetch: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            country: "UKR".to_string(),
            year_start: 1981,
            year_end: 2024,
            aggregation: "Mean".to_string(),
            province_count: 27,
            clean_before_fetch: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the raw per-province downloads
    pub raw_dir: PathBuf,
    /// Consolidated dataset written by `prepare` and read by the dashboard
    pub dataset_path: PathBuf,
    pub fetch: FetchConfig,
    pub duplicates: DuplicatePolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            raw_dir: PathBuf::from("data_csv"),
            dataset_path: PathBuf::from("all_vhi.csv"),
            fetch: FetchConfig::default(),
            duplicates: DuplicatePolicy::default(),
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Defaults when no path is given.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                let config = Self::load(path)?;
                log::info!("Loaded config from {}", path.display());
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"duplicates": "keep_last", "fetch": {{"year_end": 2020}}}}"#
        )
        .unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.duplicates, DuplicatePolicy::KeepLast);
        assert_eq!(config.fetch.year_end, 2020);
        assert_eq!(config.fetch.year_start, 1981);
        assert_eq!(config.fetch.country, "UKR");
        assert_eq!(config.dataset_path, PathBuf::from("all_vhi.csv"));
    }

    #[test]
    fn invalid_json_is_reported() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        assert!(matches!(
            AppConfig::load(file.path()),
            Err(ConfigError::Json { .. })
        ));
    }

    #[test]
    fn no_path_means_defaults() {
        let config = AppConfig::load_or_default(None).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.duplicates, DuplicatePolicy::KeepAll);
    }
}
