//! Dashboard module - filter selection and query logic

mod filter;
mod selection;

pub use filter::{apply_selection, range_predicate, table_rows, DashboardWarning, TableRow};
pub use selection::{DatasetBounds, Selection};
