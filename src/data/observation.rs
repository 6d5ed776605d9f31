//! Observation Records
//! Typed rows of the consolidated VHI dataset and its column layout.

use polars::prelude::*;
use std::fmt;

pub const REGION_COL: &str = "Region_ID";
pub const YEAR_COL: &str = "Year";
pub const WEEK_COL: &str = "Week";

/// Measurement columns in file order.
pub const MEASUREMENT_COLS: [&str; 5] = ["SMN", "SMT", "VCI", "TCI", "VHI"];

/// Canonical oblast names, indexed by canonical region id.
pub const REGION_NAMES: [(i32, &str); 25] = [
    (1, "Вінницька"),
    (2, "Волинська"),
    (3, "Дніпропетровська"),
    (4, "Донецька"),
    (5, "Житомирська"),
    (6, "Закарпатська"),
    (7, "Запорізька"),
    (8, "Івано-Франківська"),
    (9, "Київська"),
    (10, "Кіровоградська"),
    (11, "Луганська"),
    (12, "Львівська"),
    (13, "Миколаївська"),
    (14, "Одеська"),
    (15, "Полтавська"),
    (16, "Рівенська"),
    (17, "Сумська"),
    (18, "Тернопільська"),
    (19, "Харківська"),
    (20, "Херсонська"),
    (21, "Хмельницька"),
    (22, "Черкаська"),
    (23, "Чернівецька"),
    (24, "Чернігівська"),
    (25, "Республіка Крим"),
];

/// Display name for a canonical region id.
pub fn region_name(region_id: i32) -> String {
    REGION_NAMES
        .iter()
        .find(|(id, _)| *id == region_id)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| format!("#{}", region_id))
}

/// Health index time series selectable in the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexSeries {
    #[default]
    Vci,
    Tci,
    Vhi,
}

impl IndexSeries {
    pub const ALL: [IndexSeries; 3] = [IndexSeries::Vci, IndexSeries::Tci, IndexSeries::Vhi];

    /// Column holding this series in the consolidated frame.
    pub fn column(&self) -> &'static str {
        match self {
            IndexSeries::Vci => "VCI",
            IndexSeries::Tci => "TCI",
            IndexSeries::Vhi => "VHI",
        }
    }
}

impl fmt::Display for IndexSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// One weekly observation for one region.
///
/// Every field is optional: raw provider files carry sentinel values and
/// markup residue that are normalized to `None` during ingestion.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Observation {
    pub region_id: Option<i32>,
    pub year: Option<i32>,
    pub week: Option<i32>,
    pub smn: Option<f64>,
    pub smt: Option<f64>,
    pub vci: Option<f64>,
    pub tci: Option<f64>,
    pub vhi: Option<f64>,
}

impl Observation {
    /// (region, year, week) identity of the row.
    pub fn key(&self) -> (Option<i32>, Option<i32>, Option<i32>) {
        (self.region_id, self.year, self.week)
    }

    /// True when region, year and week are all present.
    pub fn has_full_key(&self) -> bool {
        self.region_id.is_some() && self.year.is_some() && self.week.is_some()
    }

    /// Measurements in `MEASUREMENT_COLS` order.
    pub fn measurements(&self) -> [Option<f64>; 5] {
        [self.smn, self.smt, self.vci, self.tci, self.vhi]
    }
}

fn nulls_last(value: Option<i32>) -> (bool, i32) {
    (value.is_none(), value.unwrap_or_default())
}

/// Stable sort by (region, year, week) ascending, missing keys last.
pub fn sort_observations(rows: &mut [Observation]) {
    rows.sort_by_key(|row| {
        (
            nulls_last(row.region_id),
            nulls_last(row.year),
            nulls_last(row.week),
        )
    });
}

/// Build the consolidated frame: `Region_ID, Year, Week, SMN, SMT, VCI, TCI, VHI`.
pub fn observations_to_frame(rows: &[Observation]) -> PolarsResult<DataFrame> {
    let regions: Vec<Option<i32>> = rows.iter().map(|r| r.region_id).collect();
    let years: Vec<Option<i32>> = rows.iter().map(|r| r.year).collect();
    let weeks: Vec<Option<i32>> = rows.iter().map(|r| r.week).collect();

    let mut columns = vec![
        Column::new(REGION_COL.into(), regions),
        Column::new(YEAR_COL.into(), years),
        Column::new(WEEK_COL.into(), weeks),
    ];

    for (idx, name) in MEASUREMENT_COLS.iter().enumerate() {
        let values: Vec<Option<f64>> = rows.iter().map(|r| r.measurements()[idx]).collect();
        columns.push(Column::new((*name).into(), values));
    }

    DataFrame::new(columns)
}
