//! Dashboard Filter Module
//! Applies a selection to the consolidated dataset with Polars lazy queries.

use super::selection::{Selection, SortRequest};
use crate::data::{region_name, IndexSeries, REGION_COL, WEEK_COL, YEAR_COL};
use polars::prelude::*;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Conditions shown to the user instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardWarning {
    /// Ascending and descending sort both requested
    ConflictingSort,
    /// Nothing matches the selection
    NoData,
}

impl fmt::Display for DashboardWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DashboardWarning::ConflictingSort => {
                write!(f, "Both sort directions are enabled - sorting not applied")
            }
            DashboardWarning::NoData => write!(f, "No data to plot for this selection"),
        }
    }
}

/// Filtered rows plus any warnings raised while producing them.
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    pub frame: DataFrame,
    pub warnings: Vec<DashboardWarning>,
}

/// One row of the result table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub region: String,
    pub year: Option<i32>,
    pub week: Option<i32>,
    pub value: Option<f64>,
}

/// Year and week within the inclusive ranges.
pub fn range_predicate(years: (i32, i32), weeks: (i32, i32)) -> Expr {
    col(YEAR_COL)
        .gt_eq(lit(years.0))
        .and(col(YEAR_COL).lt_eq(lit(years.1)))
        .and(col(WEEK_COL).gt_eq(lit(weeks.0)))
        .and(col(WEEK_COL).lt_eq(lit(weeks.1)))
}

/// Rows of the selected region inside the year and week ranges, ordered by
/// the selected series when exactly one sort direction is requested.
pub fn apply_selection(df: &DataFrame, selection: &Selection) -> Result<FilterOutcome, DashboardError> {
    let mut warnings = Vec::new();

    let mut lazy = df.clone().lazy().filter(
        col(REGION_COL)
            .eq(lit(selection.region_id))
            .and(range_predicate(selection.years, selection.weeks)),
    );

    let descending = match selection.sort_request() {
        SortRequest::Ascending => Some(false),
        SortRequest::Descending => Some(true),
        SortRequest::Unsorted => None,
        SortRequest::Conflicting => {
            log::warn!("{}", DashboardWarning::ConflictingSort);
            warnings.push(DashboardWarning::ConflictingSort);
            None
        }
    };

    if let Some(descending) = descending {
        lazy = lazy.sort_by_exprs(
            vec![col(selection.series.column())],
            SortMultipleOptions::default()
                .with_order_descending(descending)
                .with_nulls_last(true)
                .with_maintain_order(true),
        );
    }

    let frame = lazy.collect()?;
    if frame.height() == 0 {
        log::warn!("{}", DashboardWarning::NoData);
        warnings.push(DashboardWarning::NoData);
    }

    Ok(FilterOutcome { frame, warnings })
}

/// Table rows (region name, year, week, series value) in frame order.
pub fn table_rows(df: &DataFrame, series: IndexSeries) -> Result<Vec<TableRow>, DashboardError> {
    let regions = df.column(REGION_COL)?.i32()?;
    let years = df.column(YEAR_COL)?.i32()?;
    let weeks = df.column(WEEK_COL)?.i32()?;
    let values = df.column(series.column())?.f64()?;

    let rows = regions
        .into_iter()
        .zip(years)
        .zip(weeks)
        .zip(values)
        .map(|(((region, year), week), value)| TableRow {
            region: region.map(region_name).unwrap_or_default(),
            year,
            week,
            value,
        })
        .collect();

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::DatasetBounds;
    use crate::data::{observations_to_frame, Observation};

    fn dataset() -> DataFrame {
        let mut rows = Vec::new();
        for region in [1, 2] {
            for year in 1998..=2007 {
                for week in [1, 26, 52] {
                    rows.push(Observation {
                        region_id: Some(region),
                        year: Some(year),
                        week: Some(week),
                        vci: Some(((year * 7 + week * 3 + region) % 50) as f64),
                        vhi: Some(((year * 13 + week * 5 + region) % 60) as f64),
                        ..Default::default()
                    });
                }
            }
        }
        // a row with a missing index value
        rows.push(Observation {
            region_id: Some(1),
            year: Some(2001),
            week: Some(10),
            ..Default::default()
        });
        observations_to_frame(&rows).unwrap()
    }

    fn selection(df: &DataFrame) -> Selection {
        Selection::defaults(&DatasetBounds::from_frame(df).unwrap())
    }

    fn column_i32(df: &DataFrame, name: &str) -> Vec<Option<i32>> {
        df.column(name).unwrap().i32().unwrap().into_iter().collect()
    }

    fn column_f64(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
        df.column(name).unwrap().f64().unwrap().into_iter().collect()
    }

    #[test]
    fn vhi_ascending_for_vinnytsia_2000_2005() {
        let df = dataset();
        let mut sel = selection(&df);
        sel.series = IndexSeries::Vhi;
        sel.region_id = 1;
        sel.years = (2000, 2005);
        sel.weeks = (1, 52);
        sel.sort_ascending = true;

        let outcome = apply_selection(&df, &sel).unwrap();
        assert!(outcome.warnings.is_empty());

        let frame = &outcome.frame;
        assert_eq!(frame.height(), 6 * 3 + 1);
        assert!(column_i32(frame, "Region_ID").iter().all(|r| *r == Some(1)));
        assert!(column_i32(frame, "Year")
            .iter()
            .all(|y| matches!(y, Some(2000..=2005))));

        let vhi = column_f64(frame, "VHI");
        assert_eq!(vhi.last(), Some(&None));
        let present: Vec<f64> = vhi.iter().flatten().copied().collect();
        assert!(present.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn descending_orders_high_to_low() {
        let df = dataset();
        let mut sel = selection(&df);
        sel.sort_descending = true;

        let outcome = apply_selection(&df, &sel).unwrap();
        let vci: Vec<f64> = column_f64(&outcome.frame, "VCI").into_iter().flatten().collect();
        assert!(vci.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn conflicting_sort_returns_unsorted_with_warning() {
        let df = dataset();
        let mut sel = selection(&df);
        sel.years = (2000, 2005);
        sel.sort_ascending = true;
        sel.sort_descending = true;

        let outcome = apply_selection(&df, &sel).unwrap();
        assert_eq!(outcome.warnings, vec![DashboardWarning::ConflictingSort]);

        sel.sort_ascending = false;
        sel.sort_descending = false;
        let unsorted = apply_selection(&df, &sel).unwrap();
        assert!(outcome.frame.equals_missing(&unsorted.frame));
    }

    #[test]
    fn week_range_is_inclusive() {
        let df = dataset();
        let mut sel = selection(&df);
        sel.weeks = (26, 52);

        let outcome = apply_selection(&df, &sel).unwrap();
        let weeks = column_i32(&outcome.frame, "Week");
        assert_eq!(weeks.len(), 10 * 2);
        assert!(weeks.iter().all(|w| matches!(w, Some(26) | Some(52))));
    }

    #[test]
    fn empty_result_warns_no_data() {
        let df = dataset();
        let mut sel = selection(&df);
        sel.region_id = 17;

        let outcome = apply_selection(&df, &sel).unwrap();
        assert_eq!(outcome.frame.height(), 0);
        assert_eq!(outcome.warnings, vec![DashboardWarning::NoData]);
    }

    #[test]
    fn table_rows_carry_region_names() {
        let df = dataset();
        let mut sel = selection(&df);
        sel.years = (2001, 2001);
        sel.weeks = (1, 1);

        let outcome = apply_selection(&df, &sel).unwrap();
        let rows = table_rows(&outcome.frame, IndexSeries::Vci).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].region, "Вінницька");
        assert_eq!(rows[0].year, Some(2001));
        assert_eq!(rows[0].week, Some(1));
        assert_eq!(rows[0].value, Some(((2001 * 7 + 3 + 1) % 50) as f64));
    }
}
