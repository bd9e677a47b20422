//! Projection engine and its year-by-year result table

mod engine;
mod table;

pub use engine::{
    compute, ProjectionConfig, ProjectionEngine, DEFAULT_BASE_YEAR, DEFAULT_HORIZON,
    DEFAULT_SUBSIDY_FRACTION, MAX_HORIZON,
};
pub use table::{revenue_column, ProjectionSummary, ProjectionTable, YearRecord, SUMMARY_COLUMNS, YEAR_COLUMN};
