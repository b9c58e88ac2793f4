//! Producer/injector/other classification of every network node.
//!
//! Leaves are seeded from summary data; every other node is the union of the
//! roles of the leaves below it. The terminal node holds every role.
use super::topology;
use super::vectors::{self, WSTAT_INJECTING, WSTAT_PRODUCING};
use crate::compute::ledger::SummaryFrame;
use crate::store::{Keyword, NodeRoles, TopologyTable};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Summary vectors needed to seed the leaves of `table`.
///
/// Wells are seeded from their status vector, other leaves from their rate vectors.
/// Only vectors present in `catalogue` are returned.
pub fn seed_vectors(table: &TopologyTable, catalogue: &HashSet<&str>) -> Vec<String> {
    let leaves = topology::leaves(table);
    let mut vectors = Vec::new();
    for (name, keyword) in table.nodes() {
        if !leaves.contains(name.as_str()) {
            continue;
        }
        if keyword.is_well() {
            let wstat = vectors::well_status(&name);
            if catalogue.contains(wstat.as_str()) {
                vectors.push(wstat);
            }
        } else {
            vectors.extend(
                vectors::production_vectors(&name, keyword)
                    .into_iter()
                    .chain(vectors::injection_vectors(&name, keyword))
                    .filter(|v| catalogue.contains(v.as_str())),
            );
        }
    }
    vectors
}

pub struct NodeClassifier<'a> {
    table: &'a TopologyTable,
    seeds: &'a SummaryFrame,
    terminal_node: &'a str,
}

impl<'a> NodeClassifier<'a> {
    pub fn new(table: &'a TopologyTable, seeds: &'a SummaryFrame, terminal_node: &'a str) -> Self {
        Self { table, seeds, terminal_node }
    }

    /// Every node gets the union of the seeds of all leaves reachable from it over the
    /// union of all dates. Each node is walked on its own, so the result does not depend
    /// on visiting order even where that union is not a tree.
    pub fn classify(&self) -> HashMap<String, NodeRoles> {
        let nodes = self.table.nodes();
        let leaves = topology::leaves(self.table);
        let children = topology::child_index(self.table);
        let seeded: HashMap<&str, NodeRoles> = nodes
            .iter()
            .filter(|(name, _)| leaves.contains(name.as_str()))
            .map(|(name, keyword)| (name.as_str(), self.seed_leaf(name, *keyword)))
            .collect();

        let mut roles: HashMap<String, NodeRoles> = nodes
            .iter()
            .map(|(name, _)| (name.clone(), reachable_roles(name, &children, &seeded)))
            .collect();
        roles.insert(self.terminal_node.to_string(), NodeRoles::ALL);
        roles
    }

    fn seed_leaf(&self, name: &str, keyword: Keyword) -> NodeRoles {
        let (producer, injector) = if keyword.is_well() {
            let wstat = vectors::well_status(name);
            (
                self.seeds.any_equals(&wstat, WSTAT_PRODUCING),
                self.seeds.any_equals(&wstat, WSTAT_INJECTING),
            )
        } else {
            let production: f64 = vectors::production_vectors(name, keyword).iter().map(|v| self.seeds.sum(v)).sum();
            let injection: f64 = vectors::injection_vectors(name, keyword).iter().map(|v| self.seeds.sum(v)).sum();
            (production > 0.0, injection > 0.0)
        };
        let roles = NodeRoles::from_flags(producer, injector, !producer && !injector);
        debug!(node = %name, keyword = %keyword, ?roles, "seeded leaf");
        roles
    }
}

fn reachable_roles<'n>(
    start: &'n str,
    children: &HashMap<&'n str, Vec<&'n str>>,
    seeded: &HashMap<&str, NodeRoles>,
) -> NodeRoles {
    let mut acc = NodeRoles::NONE;
    let mut visited = HashSet::new();
    let mut stack = vec![start];
    while let Some(node) = stack.pop() {
        if !visited.insert(node) {
            continue;
        }
        if let Some(&seed) = seeded.get(node) {
            acc.insert(seed);
        }
        if let Some(below) = children.get(node) {
            stack.extend(below.iter().copied());
        }
    }
    acc
}
