//! Data module - dataset preparation and loading

mod fetch;
mod ingest;
mod loader;
mod observation;
mod processor;

pub use fetch::ProvinceFetcher;
pub use ingest::RawCsvIngester;
pub use loader::{read_dataset, DatasetLoader};
pub use observation::{
    observations_to_frame, region_name, IndexSeries, Observation, REGION_COL, REGION_NAMES,
    WEEK_COL, YEAR_COL,
};
pub use processor::{DataProcessor, DuplicatePolicy};
