//! The ensemble-level group tree model and its dataset-construction entry point.
use crate::analysis::classify::{self, NodeClassifier};
use crate::analysis::requirements::{self, InjectionFlags, RequirementTable};
use crate::analysis::{topology, windows};
use crate::compute::assembler::{TreeAssembler, TreeRecord};
use crate::compute::ledger::{SeriesTable, SummaryFrame, SummaryProvider};
use crate::compute::stats::{self, StatOption};
use crate::config::GroupTreeConfig;
use crate::display::trace;
use crate::error::{GroupTreeError, Result};
use crate::store::{MetricOption, NodeRoles, TopologyRow, TopologyTable};
use crate::validation::SignalValidator;
use chrono::NaiveDate;
use parking_lot::RwLock;
use serde::Serialize;
use std::borrow::Cow;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info, instrument, trace as trace_log, Level};

/// How the time series of the ensemble are collapsed to one value per date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TreeMode {
    Statistics(StatOption),
    SingleRealization(i32),
}

/// One validity window of the output: the dates it covers and the tree drawn over them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetBlock {
    pub dates: Vec<NaiveDate>,
    pub tree: TreeRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct DatasetRequest {
    mode: TreeMode,
    node_types: NodeRoles,
}

/// Group tree data for one ensemble.
///
/// Everything derived from the topology and the summary catalogue is computed once in
/// [`EnsembleGroupTreeData::new`]; datasets are derived per request and memoized.
#[derive(Debug)]
pub struct EnsembleGroupTreeData {
    config: GroupTreeConfig,
    topology: TopologyTable,
    shared_topology: Option<TopologyTable>,
    roles: HashMap<String, NodeRoles>,
    injection: InjectionFlags,
    requirements: RequirementTable,
    summary: SummaryFrame,
    cache: RwLock<HashMap<DatasetRequest, Arc<[DatasetBlock]>>>,
}

impl EnsembleGroupTreeData {
    #[instrument(skip_all, fields(ensemble = %config.ensemble))]
    pub fn new(config: GroupTreeConfig, rows: Vec<TopologyRow>, provider: &dyn SummaryProvider) -> Result<Self> {
        config.validate()?;

        let topology = TopologyTable::new(rows).apply_config(&config);
        if topology.is_empty() {
            return Err(GroupTreeError::Configuration(format!(
                "No {} or WELSPECS rows in the network table of ensemble '{}'",
                config.tree_type, config.ensemble
            )));
        }
        topology::validate(&topology)?;

        let catalogue = provider.signal_names();
        let available: HashSet<&str> = catalogue.iter().map(String::as_str).collect();

        // 1. Classify nodes from the leaf seeds that exist.
        let seed_vectors = classify::seed_vectors(&topology, &available);
        let seeds = provider.get_values(&seed_vectors, None)?;
        let roles = NodeClassifier::new(&topology, &seeds, &config.terminal_node).classify();

        // 2. Ensemble-wide injection types.
        let any_injector = roles.iter().any(|(name, r)| *name != config.terminal_node && r.is_injector());
        let injection = if any_injector {
            let field_vectors: Vec<String> =
                InjectionFlags::vectors().into_iter().filter(|v| available.contains(v.as_str())).collect();
            InjectionFlags::compute(true, &provider.get_values(&field_vectors, None)?)
        } else {
            InjectionFlags::default()
        };

        // 3. Requirements, validated against the catalogue in one pass.
        let nodes = topology.nodes();
        let requirements = requirements::plan(&nodes, &roles, injection, &config.terminal_node)?;
        let wells = nodes.iter().filter(|(_, k)| k.is_well()).map(|(name, _)| name.as_str());
        SignalValidator::new(&catalogue).validate(&requirements, wells)?;

        // 4. Load every vector the trees can read.
        let vectors: Vec<String> =
            requirements.signals().into_iter().filter(|v| available.contains(v.as_str())).collect();
        let summary = provider.get_values(&vectors, None)?;

        let shared_topology = topology.is_equal_in_all_realizations().then(|| topology.shared());
        info!(
            nodes = nodes.len(),
            requirements = requirements.len(),
            vectors = vectors.len(),
            water_injection = injection.water,
            gas_injection = injection.gas,
            tree_equal_in_all_realizations = shared_topology.is_some(),
            "group tree model ready"
        );

        Ok(Self {
            config,
            topology,
            shared_topology,
            roles,
            injection,
            requirements,
            summary,
            cache: RwLock::new(HashMap::new()),
        })
    }

    /// Builds the chronologically ordered trees for one display request.
    ///
    /// Pure in its arguments; repeated calls return the memoized result.
    #[instrument(skip(self), fields(ensemble = %self.config.ensemble))]
    pub fn create_dataset(&self, mode: TreeMode, node_types: NodeRoles) -> Result<Arc<[DatasetBlock]>> {
        let request = DatasetRequest { mode, node_types };
        if let Some(blocks) = self.cache.read().get(&request) {
            debug!("dataset served from cache");
            return Ok(blocks.clone());
        }

        let table = self.series_table(mode)?;
        let topology = self.topology_for(mode)?;
        let terminal = self.config.terminal_node.as_str();
        let keep = |node: &str| node == terminal || self.roles.get(node).map_or(false, |r| r.intersects(node_types));

        let blocks = windows::segment(&topology, terminal, table.dates())
            .into_iter()
            .map(|window| {
                let tree = TreeAssembler::new(&window.snapshot, &table, &self.requirements, window.dates.clone())
                    .with_node_filter(&keep)
                    .assemble(terminal)?;
                Ok(DatasetBlock { dates: table.dates()[window.dates].to_vec(), tree })
            })
            .collect::<Result<Vec<_>>>()?;

        info!(windows = blocks.len(), "dataset created");
        if tracing::enabled!(Level::TRACE) {
            trace_log!("\n{}", trace::format_dataset(&blocks));
        }

        let blocks: Arc<[DatasetBlock]> = blocks.into();
        self.cache.write().insert(request, blocks.clone());
        Ok(blocks)
    }

    fn series_table(&self, mode: TreeMode) -> Result<SeriesTable> {
        match mode {
            TreeMode::Statistics(stat) => Ok(stats::aggregate(&self.summary, stat)),
            TreeMode::SingleRealization(real) => {
                if !self.realizations().contains(&real) {
                    return Err(GroupTreeError::Configuration(format!(
                        "Realization {} is not part of ensemble '{}'",
                        real, self.config.ensemble
                    )));
                }
                Ok(self.summary.for_realization(real))
            }
        }
    }

    fn topology_for(&self, mode: TreeMode) -> Result<Cow<'_, TopologyTable>> {
        match (&self.shared_topology, mode) {
            (Some(shared), _) => Ok(Cow::Borrowed(shared)),
            (None, TreeMode::SingleRealization(real)) => Ok(Cow::Owned(self.topology.for_realization(real))),
            (None, TreeMode::Statistics(_)) => Err(GroupTreeError::Configuration(format!(
                "Statistics are not available: the network differs between the realizations of ensemble '{}'",
                self.config.ensemble
            ))),
        }
    }

    /// Connection metrics selectable for the given node types.
    pub fn edge_options(&self, node_types: NodeRoles) -> Vec<MetricOption> {
        requirements::edge_options(node_types, self.injection)
    }

    pub fn node_options(&self) -> Vec<MetricOption> { requirements::node_options() }

    pub fn realizations(&self) -> BTreeSet<i32> { self.summary.realizations() }

    pub fn tree_is_equal_in_all_realizations(&self) -> bool { self.shared_topology.is_some() }

    pub fn roles(&self, node: &str) -> Option<NodeRoles> { self.roles.get(node).copied() }

    pub fn requirements(&self) -> &RequirementTable { &self.requirements }

    pub fn injection(&self) -> InjectionFlags { self.injection }

    pub fn config(&self) -> &GroupTreeConfig { &self.config }
}

/// Serializes a dataset to the JSON consumed by the tree widget.
pub fn to_json(blocks: &[DatasetBlock]) -> Result<String> {
    serde_json::to_string(blocks).map_err(|e| GroupTreeError::Serialization(e.to_string()))
}
