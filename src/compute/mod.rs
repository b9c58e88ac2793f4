//! Time-series access, ensemble statistics and per-window tree assembly.
pub mod assembler;
pub mod ledger;
pub mod stats;

pub use assembler::{TreeAssembler, TreeRecord};
pub use ledger::{InMemorySummary, SeriesTable, SummaryFrame, SummaryProvider};
pub use stats::StatOption;
