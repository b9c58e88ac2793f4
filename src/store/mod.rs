//! Network topology storage: row types, the flat table and the per-window arena.
pub mod registry;
pub mod table;
pub mod types;

pub use registry::TopologySnapshot;
pub use table::TopologyTable;
pub use types::*;
