//! Dashboard filter selection and its defaults.

use crate::data::{IndexSeries, REGION_NAMES, WEEK_COL, YEAR_COL};
use polars::prelude::*;

/// Inclusive year and week extents of the loaded dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetBounds {
    pub years: (i32, i32),
    pub weeks: (i32, i32),
}

fn column_extent(df: &DataFrame, name: &str) -> Option<(i32, i32)> {
    let values = df.column(name).ok()?.i32().ok()?;
    Some((values.min()?, values.max()?))
}

impl DatasetBounds {
    /// `None` when the frame has no non-null years or weeks.
    pub fn from_frame(df: &DataFrame) -> Option<Self> {
        Some(Self {
            years: column_extent(df, YEAR_COL)?,
            weeks: column_extent(df, WEEK_COL)?,
        })
    }
}

/// Requested ordering of the filtered rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortRequest {
    Unsorted,
    Ascending,
    Descending,
    /// Both toggles on; rows stay unsorted and a warning is raised
    Conflicting,
}

/// Every control of the dashboard filter panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub series: IndexSeries,
    pub region_id: i32,
    pub years: (i32, i32),
    pub weeks: (i32, i32),
    pub sort_ascending: bool,
    pub sort_descending: bool,
}

impl Selection {
    /// First series, first region, full year and week extents, no sorting.
    pub fn defaults(bounds: &DatasetBounds) -> Self {
        Self {
            series: IndexSeries::default(),
            region_id: REGION_NAMES[0].0,
            years: bounds.years,
            weeks: bounds.weeks,
            sort_ascending: false,
            sort_descending: false,
        }
    }

    pub fn sort_request(&self) -> SortRequest {
        match (self.sort_ascending, self.sort_descending) {
            (false, false) => SortRequest::Unsorted,
            (true, false) => SortRequest::Ascending,
            (false, true) => SortRequest::Descending,
            (true, true) => SortRequest::Conflicting,
        }
    }

    /// Keep each range's start at or below its end after a slider moved.
    pub fn normalize_ranges(&mut self) {
        if self.years.0 > self.years.1 {
            self.years = (self.years.1, self.years.0);
        }
        if self.weeks.0 > self.weeks.1 {
            self.weeks = (self.weeks.1, self.weeks.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> DatasetBounds {
        DatasetBounds {
            years: (1982, 2024),
            weeks: (1, 52),
        }
    }

    #[test]
    fn defaults_cover_whole_dataset() {
        let sel = Selection::defaults(&bounds());
        assert_eq!(sel.series, IndexSeries::Vci);
        assert_eq!(sel.region_id, 1);
        assert_eq!(sel.years, (1982, 2024));
        assert_eq!(sel.weeks, (1, 52));
        assert_eq!(sel.sort_request(), SortRequest::Unsorted);
    }

    #[test]
    fn both_sort_flags_conflict() {
        let mut sel = Selection::defaults(&bounds());
        sel.sort_ascending = true;
        assert_eq!(sel.sort_request(), SortRequest::Ascending);
        sel.sort_descending = true;
        assert_eq!(sel.sort_request(), SortRequest::Conflicting);
        sel.sort_ascending = false;
        assert_eq!(sel.sort_request(), SortRequest::Descending);
    }

    #[test]
    fn inverted_ranges_are_swapped() {
        let mut sel = Selection::defaults(&bounds());
        sel.years = (2010, 2000);
        sel.weeks = (30, 30);
        sel.normalize_ranges();
        assert_eq!(sel.years, (2000, 2010));
        assert_eq!(sel.weeks, (30, 30));
    }

    #[test]
    fn bounds_ignore_nulls() {
        let df = DataFrame::new(vec![
            Column::new("Year".into(), vec![Some(1990i32), None, Some(1985)]),
            Column::new("Week".into(), vec![Some(3i32), Some(52), None]),
        ])
        .unwrap();
        let b = DatasetBounds::from_frame(&df).unwrap();
        assert_eq!(b.years, (1985, 1990));
        assert_eq!(b.weeks, (3, 52));
    }

    #[test]
    fn empty_frame_has_no_bounds() {
        let df = DataFrame::new(vec![
            Column::new("Year".into(), Vec::<Option<i32>>::new()),
            Column::new("Week".into(), Vec::<Option<i32>>::new()),
        ])
        .unwrap();
        assert!(DatasetBounds::from_frame(&df).is_none());
    }
}
