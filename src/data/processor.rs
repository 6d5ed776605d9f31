//! Data Processor Module
//! Handles region-code remapping, duplicate handling and dataset export.

use super::observation::{Observation, REGION_COL};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Failed to write dataset: {0}")]
    Io(#[from] std::io::Error),
}

/// Provider-assigned region id -> canonical region id.
///
/// Provider ids 12 and 20 have no canonical counterpart and pass through.
pub const REGION_MAPPING: [(i32, i32); 25] = [
    (1, 22),
    (2, 24),
    (3, 23),
    (4, 25),
    (5, 3),
    (6, 4),
    (7, 8),
    (8, 19),
    (9, 20),
    (10, 21),
    (11, 9),
    (13, 10),
    (14, 11),
    (15, 12),
    (16, 13),
    (17, 14),
    (18, 15),
    (19, 16),
    (21, 17),
    (22, 18),
    (23, 6),
    (24, 1),
    (25, 2),
    (26, 7),
    (27, 5),
];

/// How rows sharing a (region, year, week) key are consolidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Preserve every row, overlapping downloads included
    #[default]
    KeepAll,
    /// Keep the row from the earliest file (by name)
    KeepFirst,
    /// Keep the row from the latest file (by name)
    KeepLast,
}

/// Handles data cleaning and transformation operations.
pub struct DataProcessor;

impl DataProcessor {
    /// Canonical id for a provider id; unmapped ids are returned unchanged.
    pub fn canonical_region(provider_id: i32) -> i32 {
        REGION_MAPPING
            .iter()
            .find(|(from, _)| *from == provider_id)
            .map(|(_, to)| *to)
            .unwrap_or(provider_id)
    }

    /// Replace provider region ids with canonical ones.
    ///
    /// A frame without a `Region_ID` column is returned unchanged.
    pub fn remap_region_ids(df: &DataFrame) -> Result<DataFrame, ProcessorError> {
        let Ok(region_col) = df.column(REGION_COL) else {
            log::warn!("Frame has no '{}' column; region ids left as-is", REGION_COL);
            return Ok(df.clone());
        };

        let ids = region_col.cast(&DataType::Int32)?;
        let remapped: Vec<Option<i32>> = ids
            .i32()?
            .into_iter()
            .map(|id| id.map(Self::canonical_region))
            .collect();

        let mut out = df.clone();
        out.with_column(Column::new(REGION_COL.into(), remapped))?;

        log::info!("Region ids remapped for {} rows", out.height());
        Ok(out)
    }

    /// Consolidate duplicate keys in rows already sorted by key.
    ///
    /// Rows missing any part of the key are never merged. Returns the kept
    /// rows and the number of rows dropped.
    pub fn apply_duplicate_policy(
        rows: Vec<Observation>,
        policy: DuplicatePolicy,
    ) -> (Vec<Observation>, usize) {
        let before = rows.len();
        let kept = match policy {
            DuplicatePolicy::KeepAll => rows,
            DuplicatePolicy::KeepFirst => {
                let mut rows = rows;
                rows.dedup_by(|later, earlier| {
                    later.has_full_key() && later.key() == earlier.key()
                });
                rows
            }
            DuplicatePolicy::KeepLast => {
                let mut out: Vec<Observation> = Vec::with_capacity(rows.len());
                for row in rows {
                    if let Some(prev) = out.last_mut() {
                        if row.has_full_key() && prev.key() == row.key() {
                            *prev = row;
                            continue;
                        }
                    }
                    out.push(row);
                }
                out
            }
        };

        let dropped = before - kept.len();
        if dropped > 0 {
            log::info!("Dropped {} duplicate rows ({:?})", dropped, policy);
        }
        (kept, dropped)
    }

    /// Write the consolidated frame as CSV with a header row.
    pub fn write_dataset(df: &DataFrame, path: &Path) -> Result<(), ProcessorError> {
        let mut file = File::create(path)?;
        let mut df = df.clone();
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut df)?;
        log::info!("Dataset written to {} ({} rows)", path.display(), df.height());
        Ok(())
    }
}
