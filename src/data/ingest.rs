//! Raw CSV Ingestion
//! Cleans per-region provider files and consolidates them into one record set.

use super::observation::{sort_observations, Observation};
use super::processor::{DataProcessor, DuplicatePolicy};
use rayon::prelude::*;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Provider value meaning "no data".
pub const SENTINEL: f64 = -1.0;

/// Free-text preamble line plus the provider header line.
const PREAMBLE_LINES: usize = 2;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Cannot read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("No CSV files in {0}")]
    NoCsvFiles(PathBuf),
    #[error("Malformed CSV in {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },
    #[error("Invalid markup pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Region id from a `VHI_province_{id}_{timestamp}.csv` file name.
pub fn region_id_from_file_name(file_name: &str) -> Option<i32> {
    file_name.split('_').nth(2)?.trim().parse().ok()
}

/// Numeric cell, with the sentinel and garbage mapped to `None`.
pub fn parse_measurement(cell: &str) -> Option<f64> {
    let value: f64 = cell.trim().parse().ok()?;
    if value == SENTINEL || !value.is_finite() {
        None
    } else {
        Some(value)
    }
}

/// Integer cell; accepts `1982` and `1982.0`, rejects fractions.
pub fn parse_integer(cell: &str) -> Option<i32> {
    let value = parse_measurement(cell)?;
    if value.fract() == 0.0 && value >= i32::MIN as f64 && value <= i32::MAX as f64 {
        Some(value as i32)
    } else {
        None
    }
}

/// Loads a directory of raw provider CSV files.
pub struct RawCsvIngester {
    markup: Regex,
    duplicates: DuplicatePolicy,
}

impl RawCsvIngester {
    pub fn new(duplicates: DuplicatePolicy) -> Result<Self, IngestError> {
        Ok(Self {
            markup: Regex::new("<.*?>")?,
            duplicates,
        })
    }

    /// Remove anything between angle brackets and trim.
    pub fn strip_markup(&self, text: &str) -> String {
        self.markup.replace_all(text, "").trim().to_string()
    }

    /// Clean one provider file into observations tagged with its region id.
    pub fn parse_file(&self, path: &Path) -> Result<Vec<Observation>, IngestError> {
        let region_id = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(region_id_from_file_name);
        if region_id.is_none() {
            log::warn!("No region id in file name {}", path.display());
        }

        let csv_err = |source: csv::Error| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(csv_err)?;

        let mut rows = Vec::new();
        // Byte records so a stray non-UTF-8 cell degrades to missing.
        for record in reader.byte_records().skip(PREAMBLE_LINES) {
            let record = record.map_err(csv_err)?;
            let cells: Vec<String> = record
                .iter()
                .map(|f| self.strip_markup(&String::from_utf8_lossy(f)))
                .collect();
            let cell = |idx: usize| cells.get(idx).map(String::as_str).unwrap_or("");

            rows.push(Observation {
                region_id,
                year: parse_integer(cell(0)),
                week: parse_integer(cell(1)),
                smn: parse_measurement(cell(2)),
                smt: parse_measurement(cell(3)),
                vci: parse_measurement(cell(4)),
                tci: parse_measurement(cell(5)),
                vhi: parse_measurement(cell(6)),
            });
        }

        log::debug!("Parsed {} rows from {}", rows.len(), path.display());
        Ok(rows)
    }

    /// Parse every `*.csv` file in `dir`, concatenate and sort by
    /// (region, year, week).
    pub fn load_directory(&self, dir: &Path) -> Result<Vec<Observation>, IngestError> {
        let entries = fs::read_dir(dir).map_err(|source| IngestError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "csv"))
            .collect();
        files.sort();

        if files.is_empty() {
            log::error!("No CSV files in {}", dir.display());
            return Err(IngestError::NoCsvFiles(dir.to_path_buf()));
        }

        let parsed: Vec<Vec<Observation>> = files
            .par_iter()
            .map(|path| self.parse_file(path))
            .collect::<Result<_, _>>()?;

        let mut rows: Vec<Observation> = parsed.into_iter().flatten().collect();
        sort_observations(&mut rows);

        let (rows, dropped) = DataProcessor::apply_duplicate_policy(rows, self.duplicates);
        log::info!(
            "Loaded {} rows from {} files ({} duplicates dropped)",
            rows.len(),
            files.len(),
            dropped
        );
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const RAW_FILE: &str = "\
Mean data for province= 5: Cherkasy 1982-2024<br>
<tt><pre>year,week, SMN,SMT,VCI,TCI,VHI,
1982,  2,  0.063,261.53, 55.89, 38.20, 47.04,<br>
1982,  1,  0.056,263.59, -1, 32.69, 37.75,<br>
1981, 52,  0.064,262.16, 54.28, 35.46, 44.87,<br>
</pre></tt>
";

    fn write(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).unwrap();
    }

    fn ingester() -> RawCsvIngester {
        RawCsvIngester::new(DuplicatePolicy::KeepAll).unwrap()
    }

    #[test]
    fn strips_markup_fragments() {
        let ing = ingester();
        assert_eq!(ing.strip_markup("</pre></tt>"), "");
        assert_eq!(ing.strip_markup("<tt><pre>1982"), "1982");
        assert_eq!(ing.strip_markup(" 37.75<br>"), "37.75");
    }

    #[test]
    fn sentinel_and_garbage_become_missing() {
        assert_eq!(parse_measurement("-1"), None);
        assert_eq!(parse_measurement("-1.00"), None);
        assert_eq!(parse_measurement("abc"), None);
        assert_eq!(parse_measurement(""), None);
        assert_eq!(parse_measurement("0"), Some(0.0));
        assert_eq!(parse_measurement("-0.5"), Some(-0.5));
        assert_eq!(parse_integer("1982.0"), Some(1982));
        assert_eq!(parse_integer("19.5"), None);
    }

    #[test]
    fn region_id_is_third_name_token() {
        assert_eq!(region_id_from_file_name("VHI_province_14_20240301120000.csv"), Some(14));
        assert_eq!(region_id_from_file_name("VHI_province_x_1.csv"), None);
        assert_eq!(region_id_from_file_name("notes.csv"), None);
    }

    #[test]
    fn parses_and_cleans_provider_file() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "VHI_province_5_20240101000000.csv", RAW_FILE);

        let rows = ingester()
            .parse_file(&dir.path().join("VHI_province_5_20240101000000.csv"))
            .unwrap();

        // three data lines plus the closing markup line
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r.region_id == Some(5)));

        let week1 = &rows[1];
        assert_eq!(week1.year, Some(1982));
        assert_eq!(week1.week, Some(1));
        assert_eq!(week1.vci, None);
        assert_eq!(week1.smn, Some(0.056));
        assert_eq!(week1.tci, Some(32.69));
        assert_eq!(week1.vhi, Some(37.75));

        let trailer = &rows[3];
        assert_eq!(trailer.year, None);
        assert!(trailer.measurements().iter().all(Option::is_none));
    }

    #[test]
    fn consolidates_directory_sorted() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "VHI_province_5_20240101000000.csv", RAW_FILE);
        write(dir.path(), "VHI_province_2_20240101000000.csv", RAW_FILE);
        write(dir.path(), "readme.txt", "not a csv");

        let rows = ingester().load_directory(dir.path()).unwrap();
        assert_eq!(rows.len(), 8);

        let keys: Vec<_> = rows.iter().take(4).map(Observation::key).collect();
        assert_eq!(
            keys,
            vec![
                (Some(2), Some(1981), Some(52)),
                (Some(2), Some(1982), Some(1)),
                (Some(2), Some(1982), Some(2)),
                (Some(2), None, None),
            ]
        );
        assert_eq!(rows[4].region_id, Some(5));
    }

    #[test]
    fn overlapping_downloads_follow_duplicate_policy() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "VHI_province_5_20240101000000.csv", RAW_FILE);
        write(dir.path(), "VHI_province_5_20240102000000.csv", RAW_FILE);

        let all = ingester().load_directory(dir.path()).unwrap();
        assert_eq!(all.len(), 8);

        let deduped = RawCsvIngester::new(DuplicatePolicy::KeepFirst)
            .unwrap()
            .load_directory(dir.path())
            .unwrap();
        // trailer rows lack a full key and are both kept
        assert_eq!(deduped.len(), 5);
    }

    #[test]
    fn invalid_utf8_cell_becomes_missing() {
        let dir = tempfile::tempdir().unwrap();
        let mut corrupt = Vec::new();
        for line in RAW_FILE.lines() {
            if line.contains(" 37.75") {
                corrupt.extend_from_slice(b"1982,  1,  0.056,263.59, -1, 32.69, \xFF\xFE,<br>");
            } else {
                corrupt.extend_from_slice(line.as_bytes());
            }
            corrupt.push(b'\n');
        }
        fs::write(dir.path().join("VHI_province_3_a.csv"), corrupt).unwrap();
        write(dir.path(), "VHI_province_4_a.csv", RAW_FILE);

        let rows = ingester().load_directory(dir.path()).unwrap();
        assert_eq!(rows.len(), 8);
        assert_eq!(rows.iter().filter(|r| r.region_id == Some(3)).count(), 4);
        assert_eq!(rows.iter().filter(|r| r.region_id == Some(4)).count(), 4);

        let damaged = rows
            .iter()
            .find(|r| r.key() == (Some(3), Some(1982), Some(1)))
            .unwrap();
        assert_eq!(damaged.vhi, None);
        assert_eq!(damaged.smn, Some(0.056));
        assert_eq!(damaged.tci, Some(32.69));

        let clean = rows
            .iter()
            .find(|r| r.key() == (Some(4), Some(1982), Some(1)))
            .unwrap();
        assert_eq!(clean.vhi, Some(37.75));
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "notes.txt", "nothing here");

        let err = ingester().load_directory(dir.path()).unwrap_err();
        assert!(matches!(err, IngestError::NoCsvFiles(_)));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ingester()
            .load_directory(&dir.path().join("absent"))
            .unwrap_err();
        assert!(matches!(err, IngestError::ReadDir { .. }));
    }
}
