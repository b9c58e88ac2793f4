use crate::error::{GroupTreeError, Result};
use crate::store::{TopologyRow, TopologyTable};
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use std::collections::{HashMap, HashSet};

/// Checks the tree invariant once at load: within every (realization, date) snapshot a
/// node is the `child` of at most one row, and following parents never loops.
pub fn validate(table: &TopologyTable) -> Result<()> {
    for ((_, date), rows) in table.groups() {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for row in &rows {
            *seen.entry(row.child.as_str()).or_insert(0) += 1;
        }
        if let Some(row) = rows.iter().find(|r| seen[r.child.as_str()] > 1) {
            return Err(GroupTreeError::AmbiguousNode {
                node: row.child.clone(),
                date: date.to_string(),
                matches: seen[row.child.as_str()],
            });
        }

        let graph = edge_graph(rows.iter().copied());
        if let Err(cycle) = toposort(&graph, None) {
            return Err(GroupTreeError::CyclicTopology {
                node: cycle.node_id().to_string(),
                date: date.to_string(),
            });
        }
    }
    Ok(())
}

fn edge_graph<'r>(rows: impl Iterator<Item = &'r TopologyRow>) -> DiGraphMap<&'r str, ()> {
    let mut graph = DiGraphMap::new();
    for row in rows {
        graph.add_node(row.child.as_str());
        if let Some(parent) = row.parent.as_deref() {
            graph.add_edge(parent, row.child.as_str(), ());
        }
    }
    graph
}

/// Parent → children over every row of the table, children distinct and in first-seen order.
pub fn child_index(table: &TopologyTable) -> HashMap<&str, Vec<&str>> {
    let mut index: HashMap<&str, Vec<&str>> = HashMap::new();
    for row in table.rows() {
        if let Some(parent) = row.parent.as_deref() {
            let children = index.entry(parent).or_default();
            if !children.contains(&row.child.as_str()) {
                children.push(row.child.as_str());
            }
        }
    }
    index
}

/// Nodes that never appear as a parent.
pub fn leaves(table: &TopologyTable) -> HashSet<&str> {
    let parents: HashSet<&str> = table.rows().iter().filter_map(|r| r.parent.as_deref()).collect();
    table
        .rows()
        .iter()
        .map(|r| r.child.as_str())
        .filter(|c| !parents.contains(c))
        .collect()
}
