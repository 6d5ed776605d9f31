//! Province CSV downloader for the NOAA STAR VHI endpoint.

use crate::config::FetchConfig;
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Download failed for province {province_id}: {source}")]
    Http {
        province_id: u32,
        source: reqwest::Error,
    },
    #[error("Cannot prepare directory {path}: {source}")]
    Directory {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Templated download URL for one province.
pub fn province_url(config: &FetchConfig, province_id: u32) -> String {
    format!(
        "{}?country={}&provinceID={}&year1={}&year2={}&type={}",
        config.base_url,
        config.country,
        province_id,
        config.year_start,
        config.year_end,
        config.aggregation
    )
}

/// `VHI_province_{id}_{YYYYMMDDHHMMSS}.csv`
pub fn province_file_name(province_id: u32, timestamp: &DateTime<Local>) -> String {
    format!(
        "VHI_province_{}_{}.csv",
        province_id,
        timestamp.format("%Y%m%d%H%M%S")
    )
}

/// Create `dir` if needed and delete stale `*.csv` downloads.
pub fn clean_directory(dir: &Path) -> Result<(), FetchError> {
    let dir_err = |source| FetchError::Directory {
        path: dir.to_path_buf(),
        source,
    };

    if !dir.exists() {
        fs::create_dir_all(dir).map_err(dir_err)?;
        log::info!("Created directory {}", dir.display());
    }

    for entry in fs::read_dir(dir).map_err(dir_err)? {
        let path = entry.map_err(dir_err)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "csv") {
            fs::remove_file(&path).map_err(dir_err)?;
        }
    }

    log::info!("Directory {} cleaned of old CSV files", dir.display());
    Ok(())
}

/// Blocking downloader for all provinces.
pub struct ProvinceFetcher {
    client: reqwest::blocking::Client,
    config: FetchConfig,
}

impl ProvinceFetcher {
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()?;
        Ok(Self { client, config })
    }

    fn download(&self, province_id: u32) -> Result<Vec<u8>, FetchError> {
        let url = province_url(&self.config, province_id);
        let http_err = |source| FetchError::Http {
            province_id,
            source,
        };

        let response = self
            .client
            .get(&url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(http_err)?;
        let body = response.bytes().map_err(http_err)?;
        Ok(body.to_vec())
    }

    /// Download every province into `dir`.
    ///
    /// A network failure aborts the whole batch; files already written are
    /// left in place. A failed file write is logged and skipped.
    pub fn fetch_all(&self, dir: &Path) -> Result<Vec<PathBuf>, FetchError> {
        if self.config.clean_before_fetch {
            clean_directory(dir)?;
        } else {
            fs::create_dir_all(dir).map_err(|source| FetchError::Directory {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let mut written = Vec::new();
        for province_id in 1..=self.config.province_count {
            let body = match self.download(province_id) {
                Ok(body) => body,
                Err(e) => {
                    log::error!("{}", e);
                    return Err(e);
                }
            };

            let file_name = province_file_name(province_id, &Local::now());
            let path = dir.join(&file_name);
            match fs::write(&path, &body) {
                Ok(()) => {
                    log::info!("Downloaded {}", file_name);
                    written.push(path);
                }
                Err(e) => log::error!("Failed to write {}: {}", file_name, e),
            }
        }

        Ok(written)
    }
}
