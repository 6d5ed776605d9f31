//! Dataset Loader Module
//! Loads the consolidated VHI dataset CSV using Polars.

use super::observation::{MEASUREMENT_COLS, REGION_COL, WEEK_COL, YEAR_COL};
use polars::prelude::*;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
}

/// Read the consolidated dataset, coercing columns to the canonical types.
///
/// Unparseable cells become nulls; a missing required column is an error.
pub fn read_dataset(path: &Path) -> Result<DataFrame, LoaderError> {
    let mut columns = vec![
        col(REGION_COL).cast(DataType::Int32),
        col(YEAR_COL).cast(DataType::Int32),
        col(WEEK_COL).cast(DataType::Int32),
    ];
    columns.extend(
        MEASUREMENT_COLS
            .iter()
            .map(|name| col(*name).cast(DataType::Float64)),
    );

    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(10000))
        .with_ignore_errors(true)
        .finish()?
        .select(columns)
        .collect()?;

    Ok(df)
}

/// Holds the dataset the dashboard works on.
pub struct DatasetLoader {
    df: Option<DataFrame>,
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetLoader {
    pub fn new() -> Self {
        Self { df: None }
    }

    /// Get the number of rows in the DataFrame.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Get a reference to the loaded DataFrame.
    pub fn get_dataframe(&self) -> Option<&DataFrame> {
        self.df.as_ref()
    }

    /// Set DataFrame directly (used for async loading)
    pub fn set_dataframe(&mut self, df: DataFrame) {
        self.df = Some(df);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn reads_consolidated_csv_with_nulls() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("all_vhi.csv");
        fs::write(
            &path,
            "Region_ID,Year,Week,SMN,SMT,VCI,TCI,VHI\n\
             1,2000,1,0.05,260.1,40.0,35.0,37.5\n\
             1,2000,2,,,,,\n",
        )
        .unwrap();

        let df = read_dataset(&path).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.column("Region_ID").unwrap().dtype(), &DataType::Int32);
        assert_eq!(df.column("VHI").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("VHI").unwrap().f64().unwrap().get(1), None);

        let mut loader = DatasetLoader::new();
        assert_eq!(loader.get_row_count(), 0);
        loader.set_dataframe(df);
        assert_eq!(loader.get_row_count(), 2);
        assert!(loader.get_dataframe().is_some());
    }

    #[test]
    fn missing_column_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.csv");
        fs::write(&path, "Year,Week\n2000,1\n").unwrap();

        assert!(read_dataset(&path).is_err());
    }
}
