//! The immutable flat network table and the realization/date views taken from it.
use super::registry::TopologySnapshot;
use super::types::*;
use crate::config::GroupTreeConfig;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet, HashSet};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopologyTable {
    rows: Vec<TopologyRow>,
}

impl TopologyTable {
    pub fn new(rows: Vec<TopologyRow>) -> Self { Self { rows } }

    pub fn rows(&self) -> &[TopologyRow] { &self.rows }
    pub fn len(&self) -> usize { self.rows.len() }
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    /// Keeps WELSPECS rows plus the rows of the configured network keyword, and drops
    /// wells matching the exclusion prefixes/suffixes.
    pub fn apply_config(self, config: &GroupTreeConfig) -> Self {
        let rows = self
            .rows
            .into_iter()
            .filter(|row| row.keyword == Keyword::Welspecs || row.keyword == config.tree_type)
            .filter(|row| !(row.keyword.is_well() && config.is_excluded_well(&row.child)))
            .collect();
        Self { rows }
    }

    pub fn realizations(&self) -> BTreeSet<i32> {
        self.rows.iter().filter_map(|r| r.realization).collect()
    }

    /// Sorted, distinct topology dates.
    pub fn dates(&self) -> Vec<NaiveDate> {
        let dates: BTreeSet<NaiveDate> = self.rows.iter().map(|r| r.date).collect();
        dates.into_iter().collect()
    }

    /// True when every realization carries the same rows (ignoring the realization column),
    /// or when the table has no realization column at all.
    pub fn is_equal_in_all_realizations(&self) -> bool {
        let per_real = self.rows_by_realization();
        let mut trees = per_real.values();
        match trees.next() {
            Some(first) => trees.all(|tree| tree == first),
            None => true,
        }
    }

    fn rows_by_realization(&self) -> BTreeMap<i32, BTreeSet<(NaiveDate, Option<&str>, &str, Keyword, Option<i64>)>> {
        let mut map: BTreeMap<i32, BTreeSet<_>> = BTreeMap::new();
        for row in &self.rows {
            if let Some(real) = row.realization {
                map.entry(real).or_default().insert((
                    row.date,
                    row.parent.as_deref(),
                    row.child.as_str(),
                    row.keyword,
                    row.vfp_table,
                ));
            }
        }
        map
    }

    pub fn for_realization(&self, realization: i32) -> Self {
        let rows = self
            .rows
            .iter()
            .filter(|r| r.realization.map_or(true, |real| real == realization))
            .cloned()
            .collect();
        Self { rows }
    }

    /// One realization-free copy of the tree, for ensembles whose tree does not vary.
    /// Rows without a realization belong to every realization and are always kept.
    pub fn shared(&self) -> Self {
        let first = self.rows.iter().find_map(|r| r.realization);
        let rows = self
            .rows
            .iter()
            .filter(|r| r.realization.is_none() || r.realization == first)
            .map(|r| TopologyRow { realization: None, ..r.clone() })
            .collect();
        Self { rows }
    }

    pub fn rows_at(&self, date: NaiveDate) -> impl Iterator<Item = &TopologyRow> {
        self.rows.iter().filter(move |r| r.date == date)
    }

    pub fn snapshot(&self, date: NaiveDate, terminal_node: &str) -> TopologySnapshot {
        TopologySnapshot::build(date, self.rows_at(date), terminal_node)
    }

    /// Every distinct node with the keyword it is defined with, in first-seen order.
    /// Nodes that only ever occur as a parent are reported as GRUPTREE groups.
    pub fn nodes(&self) -> Vec<(String, Keyword)> {
        let mut seen = HashSet::new();
        let mut nodes = Vec::new();
        for row in &self.rows {
            if seen.insert(row.child.as_str()) {
                nodes.push((row.child.clone(), row.keyword));
            }
        }
        let children: HashSet<&str> = self.rows.iter().map(|r| r.child.as_str()).collect();
        for row in &self.rows {
            if let Some(parent) = row.parent.as_deref() {
                if !children.contains(parent) && seen.insert(parent) {
                    nodes.push((parent.to_string(), Keyword::Gruptree));
                }
            }
        }
        nodes
    }

    /// Groups the rows into the per-(realization, date) sets a single snapshot is built from.
    pub fn groups(&self) -> BTreeMap<(Option<i32>, NaiveDate), Vec<&TopologyRow>> {
        let mut groups: BTreeMap<_, Vec<&TopologyRow>> = BTreeMap::new();
        for row in &self.rows {
            groups.entry((row.realization, row.date)).or_default().push(row);
        }
        groups
    }
}
