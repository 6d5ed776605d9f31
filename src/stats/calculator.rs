//! Statistics Calculator Module
//! Per-region aggregation for the comparison chart and series summaries.

use crate::dashboard::range_predicate;
use crate::data::{region_name, IndexSeries, REGION_COL};
use polars::prelude::*;
use statrs::statistics::Statistics;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Mean of a series for one region.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionAverage {
    pub region_id: i32,
    pub name: String,
    /// `None` when the region has no values in range
    pub mean: Option<f64>,
}

/// Descriptive statistics of the values shown in the table.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSummary {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for SeriesSummary {
    fn default() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            max: f64::NAN,
        }
    }
}

/// Handles statistical calculations for the dashboard.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Mean of `series` per region over the year and week ranges, ordered
    /// by region id. The region selection does not apply here.
    pub fn region_means(
        df: &DataFrame,
        series: IndexSeries,
        years: (i32, i32),
        weeks: (i32, i32),
    ) -> Result<Vec<RegionAverage>, StatsError> {
        let means = df
            .clone()
            .lazy()
            .filter(range_predicate(years, weeks).and(col(REGION_COL).is_not_null()))
            .group_by([col(REGION_COL)])
            .agg([col(series.column()).mean()])
            .sort_by_exprs(vec![col(REGION_COL)], SortMultipleOptions::default())
            .collect()?;

        let ids = means.column(REGION_COL)?.i32()?;
        let values = means.column(series.column())?.cast(&DataType::Float64)?;
        let values = values.f64()?;

        let averages = ids
            .into_iter()
            .zip(values)
            .filter_map(|(id, mean)| {
                let region_id = id?;
                Some(RegionAverage {
                    region_id,
                    name: region_name(region_id),
                    mean,
                })
            })
            .collect();

        Ok(averages)
    }

    /// Summary of the non-missing values of `series`.
    pub fn summarize(df: &DataFrame, series: IndexSeries) -> Result<SeriesSummary, StatsError> {
        let values: Vec<f64> = df
            .column(series.column())?
            .f64()?
            .into_iter()
            .flatten()
            .filter(|v| !v.is_nan())
            .collect();

        Ok(Self::compute_summary(&values))
    }

    /// Compute descriptive statistics for an array of values.
    pub fn compute_summary(values: &[f64]) -> SeriesSummary {
        if values.is_empty() {
            return SeriesSummary::default();
        }

        SeriesSummary {
            count: values.len(),
            mean: Statistics::mean(values),
            std: if values.len() > 1 {
                Statistics::std_dev(values)
            } else {
                0.0
            },
            min: Statistics::min(values),
            max: Statistics::max(values),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{observations_to_frame, Observation};
    use approx::assert_relative_eq;

    fn obs(region: i32, year: i32, week: i32, vhi: Option<f64>) -> Observation {
        Observation {
            region_id: Some(region),
            year: Some(year),
            week: Some(week),
            vhi,
            ..Default::default()
        }
    }

    #[test]
    fn means_per_region_within_ranges() {
        let df = observations_to_frame(&[
            obs(3, 2000, 1, Some(10.0)),
            obs(3, 2000, 2, Some(20.0)),
            obs(3, 2010, 1, Some(99.0)), // outside year range
            obs(1, 2001, 5, Some(40.0)),
            obs(1, 2001, 6, None),
            obs(2, 2001, 40, Some(70.0)), // outside week range
        ])
        .unwrap();

        let means =
            StatsCalculator::region_means(&df, IndexSeries::Vhi, (2000, 2005), (1, 20)).unwrap();

        assert_eq!(means.len(), 2);
        assert_eq!(means[0].region_id, 1);
        assert_eq!(means[0].name, "Вінницька");
        assert_eq!(means[0].mean, Some(40.0));
        assert_eq!(means[1].region_id, 3);
        assert_relative_eq!(means[1].mean.unwrap(), 15.0);
    }

    #[test]
    fn region_without_values_has_no_mean() {
        let df = observations_to_frame(&[obs(4, 2000, 1, None)]).unwrap();
        let means =
            StatsCalculator::region_means(&df, IndexSeries::Vhi, (2000, 2000), (1, 52)).unwrap();
        assert_eq!(means.len(), 1);
        assert_eq!(means[0].mean, None);
    }

    #[test]
    fn summary_skips_missing_values() {
        let df = observations_to_frame(&[
            obs(1, 2000, 1, Some(2.0)),
            obs(1, 2000, 2, None),
            obs(1, 2000, 3, Some(4.0)),
            obs(1, 2000, 4, Some(6.0)),
        ])
        .unwrap();

        let summary = StatsCalculator::summarize(&df, IndexSeries::Vhi).unwrap();
        assert_eq!(summary.count, 3);
        assert_relative_eq!(summary.mean, 4.0);
        assert_relative_eq!(summary.std, 2.0);
        assert_eq!(summary.min, 2.0);
        assert_eq!(summary.max, 6.0);
    }

    #[test]
    fn empty_summary_is_nan() {
        let summary = StatsCalculator::compute_summary(&[]);
        assert_eq!(summary.count, 0);
        assert!(summary.mean.is_nan());
    }
}
