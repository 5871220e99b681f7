pub mod export;
pub mod fit_engine;
pub mod linear;
pub mod stats;

pub use export::{export_fit_tables, write_fit_tables};
pub use fit_engine::{FIT_TABLE_HEADER, FitResult, FitTable, SegmentFit, fit_segments};
