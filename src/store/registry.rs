//! registry.rs
//! Per-window arena for one topology snapshot: columnar node attributes plus an
//! ordered child index, so the assembler never rescans the flat row table.

use super::types::*;
use chrono::NaiveDate;
use smallvec::SmallVec;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct TopologySnapshot {
    pub date: NaiveDate,

    // Columnar Arrays
    pub names: Vec<String>,
    pub keywords: Vec<Keyword>,
    pub vfp_tables: Vec<Option<i64>>,
    /// Number of rows naming the node as `child`. Exactly one is valid.
    pub row_counts: Vec<u32>,

    // Topology
    pub parents: Vec<Option<NodeId>>,
    pub children: Vec<SmallVec<[NodeId; 4]>>,

    index: HashMap<String, NodeId>,
}

impl TopologySnapshot {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            names: Vec::new(),
            keywords: Vec::new(),
            vfp_tables: Vec::new(),
            row_counts: Vec::new(),
            parents: Vec::new(),
            children: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Builds the arena from the rows valid at `date`.
    ///
    /// Children are kept distinct and in first-seen order. A terminal node that is only
    /// ever referenced as a parent receives an implicit GRUPTREE root row.
    pub fn build<'r>(date: NaiveDate, rows: impl IntoIterator<Item = &'r TopologyRow>, terminal_node: &str) -> Self {
        let mut snapshot = Self::empty(date);

        for row in rows {
            let child = snapshot.intern(&row.child);
            let c_idx = child.index();
            snapshot.row_counts[c_idx] += 1;
            snapshot.keywords[c_idx] = row.keyword;
            snapshot.vfp_tables[c_idx] = row.vfp_table;

            if let Some(parent_name) = &row.parent {
                let parent = snapshot.intern(parent_name);
                snapshot.parents[c_idx] = Some(parent);
                let siblings = &mut snapshot.children[parent.index()];
                if !siblings.contains(&child) {
                    siblings.push(child);
                }
            }
        }

        if let Some(root) = snapshot.lookup(terminal_node) {
            let r_idx = root.index();
            if snapshot.row_counts[r_idx] == 0 && !snapshot.children[r_idx].is_empty() {
                snapshot.row_counts[r_idx] = 1;
                snapshot.keywords[r_idx] = Keyword::Gruptree;
            }
        }

        snapshot
    }

    fn intern(&mut self, name: &str) -> NodeId {
        if let Some(&id) = self.index.get(name) {
            return id;
        }
        let id = NodeId::new(self.names.len());
        self.names.push(name.to_string());
        self.keywords.push(Keyword::Gruptree);
        self.vfp_tables.push(None);
        self.row_counts.push(0);
        self.parents.push(None);
        self.children.push(SmallVec::new());
        self.index.insert(name.to_string(), id);
        id
    }

    pub fn count(&self) -> usize { self.names.len() }

    pub fn lookup(&self, name: &str) -> Option<NodeId> { self.index.get(name).copied() }

    #[inline(always)]
    pub fn name(&self, id: NodeId) -> &str { &self.names[id.index()] }

    #[inline(always)]
    pub fn keyword(&self, id: NodeId) -> Keyword { self.keywords[id.index()] }

    #[inline(always)]
    pub fn get_children(&self, id: NodeId) -> &[NodeId] { &self.children[id.index()] }

    pub fn is_leaf(&self, id: NodeId) -> bool { self.children[id.index()].is_empty() }
}
