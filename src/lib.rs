//! Group tree model for reservoir simulation ensembles.
//!
//! A flat, time-varying well/group network table plus per-realization summary
//! vectors become a sequence of nested trees, one per validity window, carrying
//! rate and pressure series on every node.
pub mod analysis;
pub mod compute;
pub mod config;
pub mod display;
pub mod error;
pub mod model;
pub mod store;
pub mod validation;

#[cfg(feature = "python")]
mod bindings;

pub use compute::{InMemorySummary, StatOption, SummaryFrame, SummaryProvider, TreeRecord};
pub use config::GroupTreeConfig;
pub use error::{GroupTreeError, Result};
pub use model::{to_json, DatasetBlock, EnsembleGroupTreeData, TreeMode};
pub use store::{Datatype, Keyword, MetricOption, NodeRoles, NodeType, TopologyRow};

#[cfg(feature = "python")]
use pyo3::prelude::*;

// --- Module Definition ---
/// Defines the `_core` Python extension module.
#[cfg(feature = "python")]
#[pymodule]
fn _core(_py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<bindings::python::PyEnsembleGroupTree>()?;
    Ok(())
}
