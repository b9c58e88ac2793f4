use crate::compute::{InMemorySummary, StatOption, SummaryFrame};
use crate::config::GroupTreeConfig;
use crate::error::GroupTreeError;
use crate::model::{to_json, EnsembleGroupTreeData, TreeMode};
use crate::store::{NodeRoles, TopologyRow};
use chrono::NaiveDate;
use pyo3::exceptions::{PyKeyError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use std::collections::BTreeMap;

fn to_py_err(err: GroupTreeError) -> PyErr {
    match err {
        GroupTreeError::Configuration(_) | GroupTreeError::UnsupportedCombination { .. } => {
            PyValueError::new_err(err.to_string())
        }
        GroupTreeError::MissingSignals { .. } => PyKeyError::new_err(err.to_string()),
        _ => PyRuntimeError::new_err(err.to_string()),
    }
}

fn parse_node_types(node_types: &[String]) -> PyResult<NodeRoles> {
    let mut roles = NodeRoles::NONE;
    for name in node_types {
        roles.insert(name.parse().map_err(to_py_err)?);
    }
    Ok(roles)
}

#[pyclass(name = "_EnsembleGroupTree")]
pub struct PyEnsembleGroupTree {
    inner: EnsembleGroupTreeData,
}

#[pymethods]
impl PyEnsembleGroupTree {
    /// `topology_json` is a list of rows with `date`, `parent`, `child`, `keyword`,
    /// `vfp_table` and `realization`; the summary arrives column-wise.
    #[new]
    #[pyo3(signature = (config_json, topology_json, dates, realizations, columns))]
    pub fn new(
        config_json: &str,
        topology_json: &str,
        dates: Vec<String>,
        realizations: Vec<i32>,
        columns: BTreeMap<String, Vec<f64>>,
    ) -> PyResult<Self> {
        let config = GroupTreeConfig::from_json(config_json).map_err(to_py_err)?;
        let rows: Vec<TopologyRow> = serde_json::from_str(topology_json)
            .map_err(|e| PyValueError::new_err(format!("Invalid network table: {}", e)))?;
        let dates = dates
            .iter()
            .map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d"))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| PyValueError::new_err(format!("Invalid date: {}", e)))?;
        let frame = SummaryFrame::new(dates, realizations, columns).map_err(to_py_err)?;

        let inner = EnsembleGroupTreeData::new(config, rows, &InMemorySummary::new(frame)).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Returns the dataset as JSON text. `realization` selects single-realization mode.
    #[pyo3(signature = (node_types, stat_option=None, realization=None))]
    pub fn create_dataset(
        &self,
        py: Python<'_>,
        node_types: Vec<String>,
        stat_option: Option<String>,
        realization: Option<i32>,
    ) -> PyResult<String> {
        let mode = match (realization, stat_option) {
            (Some(real), _) => TreeMode::SingleRealization(real),
            (None, stat) => TreeMode::Statistics(stat.as_deref().unwrap_or("mean").parse().map_err(to_py_err)?),
        };
        let roles = parse_node_types(&node_types)?;
        py.detach(|| self.inner.create_dataset(mode, roles).and_then(|blocks| to_json(&blocks)))
            .map_err(to_py_err)
    }

    pub fn edge_options(&self, node_types: Vec<String>) -> PyResult<Vec<(String, String)>> {
        let roles = parse_node_types(&node_types)?;
        Ok(self.inner.edge_options(roles).into_iter().map(|o| (o.label, o.value.to_string())).collect())
    }

    pub fn node_options(&self) -> Vec<(String, String)> {
        self.inner.node_options().into_iter().map(|o| (o.label, o.value.to_string())).collect()
    }

    pub fn realizations(&self) -> Vec<i32> { self.inner.realizations().into_iter().collect() }

    pub fn tree_is_equal_in_all_realizations(&self) -> bool { self.inner.tree_is_equal_in_all_realizations() }

    pub fn stat_options(&self) -> Vec<String> {
        [StatOption::Mean, StatOption::P10, StatOption::P50, StatOption::P90, StatOption::Max, StatOption::Min]
            .iter()
            .map(|s| format!("{:?}", s).to_lowercase())
            .collect()
    }
}
