//! Recursive assembly of one validity window into a nested tree record.
use super::ledger::SeriesTable;
use crate::analysis::requirements::RequirementTable;
use crate::error::{GroupTreeError, Result};
use crate::store::{edge_label, DataKind, Datatype, NodeId, NodeType, TopologySnapshot};
use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::Range;

/// One node of the output tree. Every series is aligned with the window's dates;
/// NaN marks an undefined value and serializes as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeRecord {
    pub node_label: String,
    pub node_type: NodeType,
    pub edge_label: String,
    pub connection_data: BTreeMap<Datatype, Vec<f64>>,
    pub node_data: BTreeMap<Datatype, Vec<f64>>,
    pub children: Vec<TreeRecord>,
}

impl TreeRecord {
    /// Depth-first search by label.
    pub fn find(&self, label: &str) -> Option<&TreeRecord> {
        if self.node_label == label {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(label))
    }
}

/// Rounds to 2 decimals, ties away from zero (`0.125` becomes `0.13`).
#[inline]
pub fn round2(value: f64) -> f64 { (value * 100.0).round() / 100.0 }

pub struct TreeAssembler<'a> {
    snapshot: &'a TopologySnapshot,
    table: &'a SeriesTable,
    requirements: &'a RequirementTable,
    dates: Range<usize>,
    keep: Option<&'a dyn Fn(&str) -> bool>,
}

impl<'a> TreeAssembler<'a> {
    /// `dates` indexes into `table.dates()`.
    pub fn new(
        snapshot: &'a TopologySnapshot,
        table: &'a SeriesTable,
        requirements: &'a RequirementTable,
        dates: Range<usize>,
    ) -> Self {
        Self { snapshot, table, requirements, dates, keep: None }
    }

    /// Nodes rejected by `keep` are left out together with their subtrees. The root always passes.
    pub fn with_node_filter(mut self, keep: &'a dyn Fn(&str) -> bool) -> Self {
        self.keep = Some(keep);
        self
    }

    pub fn assemble(&self, terminal_node: &str) -> Result<TreeRecord> {
        let root = self.snapshot.lookup(terminal_node).ok_or_else(|| GroupTreeError::AmbiguousNode {
            node: terminal_node.to_string(),
            date: self.snapshot.date.to_string(),
            matches: 0,
        })?;
        self.assemble_node(root)
    }

    fn assemble_node(&self, id: NodeId) -> Result<TreeRecord> {
        let name = self.snapshot.name(id);
        let matches = self.snapshot.row_counts[id.index()] as usize;
        if matches != 1 {
            return Err(GroupTreeError::AmbiguousNode {
                node: name.to_string(),
                date: self.snapshot.date.to_string(),
                matches,
            });
        }

        let keyword = self.snapshot.keyword(id);
        let node_type = if keyword.is_well() { NodeType::Well } else { NodeType::Group };

        let mut connection_data = BTreeMap::new();
        let mut node_data = BTreeMap::new();
        for req in self.requirements.for_node(name) {
            let series: Vec<f64> = self
                .dates
                .clone()
                .map(|i| self.table.get(&req.signal_name, i).map_or(f64::NAN, round2))
                .collect();
            match req.kind {
                DataKind::Connection => connection_data.insert(req.datatype, series),
                DataKind::Node => node_data.insert(req.datatype, series),
            };
        }

        let children = self
            .snapshot
            .get_children(id)
            .iter()
            .filter(|&&child| self.keep.map_or(true, |keep| keep(self.snapshot.name(child))))
            .map(|&child| self.assemble_node(child))
            .collect::<Result<Vec<_>>>()?;

        Ok(TreeRecord {
            node_label: name.to_string(),
            node_type,
            edge_label: edge_label(self.snapshot.vfp_tables[id.index()]),
            connection_data,
            node_data,
            children,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::requirements::{plan, InjectionFlags};
    use crate::store::{Keyword, NodeRoles, TopologyRow};
    use chrono::NaiveDate;
    use std::collections::HashMap;

    fn d(m: u32) -> NaiveDate { NaiveDate::from_ymd_opt(2020, m, 1).unwrap() }

    fn requirements() -> RequirementTable {
        let nodes = vec![
            ("FIELD".to_string(), Keyword::Gruptree),
            ("G1".to_string(), Keyword::Gruptree),
            ("W1".to_string(), Keyword::Welspecs),
        ];
        let roles = HashMap::from([
            ("FIELD".to_string(), NodeRoles::ALL),
            ("G1".to_string(), NodeRoles::PRODUCER),
            ("W1".to_string(), NodeRoles::PRODUCER),
        ]);
        plan(&nodes, &roles, InjectionFlags::default(), "FIELD").unwrap()
    }

    fn series() -> SeriesTable {
        let mut columns = BTreeMap::new();
        for name in ["GOPR:G1", "GGPR:G1", "GWPR:G1", "WOPR:W1", "WGPR:W1", "WWPR:W1"] {
            columns.insert(name.to_string(), vec![1.234, 2.0, 3.0]);
        }
        columns.insert("WBHP:W1".to_string(), vec![200.0, 199.556, 198.0]);
        SeriesTable { dates: vec![d(1), d(2), d(3)], columns }
    }

    fn rows() -> Vec<TopologyRow> {
        vec![
            TopologyRow::new(d(1), "FIELD", "G1", Keyword::Gruptree),
            TopologyRow::new(d(1), "G1", "W1", Keyword::Welspecs).with_vfp_table(7),
        ]
    }

    #[test]
    fn test_assemble_nested_record() {
        let snapshot = TopologySnapshot::build(d(1), &rows(), "FIELD");
        let reqs = requirements();
        let table = series();
        let tree = TreeAssembler::new(&snapshot, &table, &reqs, 1..3).assemble("FIELD").unwrap();

        assert_eq!(tree.node_label, "FIELD");
        assert_eq!(tree.node_type, NodeType::Group);
        assert!(tree.connection_data.is_empty());
        assert!(tree.node_data[&Datatype::Pressure].iter().all(|v| v.is_nan()));

        let g1 = &tree.children[0];
        assert_eq!(g1.connection_data[&Datatype::OilRate], vec![2.0, 3.0]);

        let w1 = tree.find("W1").unwrap();
        assert_eq!(w1.node_type, NodeType::Well);
        assert_eq!(w1.edge_label, "VFP 7");
        assert_eq!(w1.node_data[&Datatype::Bhp], vec![199.56, 198.0]);
        assert_eq!(w1.node_data[&Datatype::Wmctl].len(), 2);
    }

    #[test]
    fn test_values_are_rounded() {
        let snapshot = TopologySnapshot::build(d(1), &rows(), "FIELD");
        let reqs = requirements();
        let table = series();
        let tree = TreeAssembler::new(&snapshot, &table, &reqs, 0..1).assemble("FIELD").unwrap();
        assert_eq!(tree.find("G1").unwrap().connection_data[&Datatype::OilRate], vec![1.23]);
    }

    #[test]
    fn test_missing_terminal_is_ambiguous() {
        let snapshot = TopologySnapshot::build(d(1), &rows(), "FIELD");
        let reqs = requirements();
        let table = series();
        let err = TreeAssembler::new(&snapshot, &table, &reqs, 0..3).assemble("NOT_THERE").unwrap_err();
        assert_eq!(
            err,
            GroupTreeError::AmbiguousNode { node: "NOT_THERE".into(), date: "2020-01-01".into(), matches: 0 }
        );
    }

    #[test]
    fn test_duplicate_child_row_is_ambiguous() {
        let mut rows = rows();
        rows.push(TopologyRow::new(d(1), "G1", "W1", Keyword::Welspecs));
        let snapshot = TopologySnapshot::build(d(1), &rows, "FIELD");
        let reqs = requirements();
        let table = series();
        let err = TreeAssembler::new(&snapshot, &table, &reqs, 0..3).assemble("FIELD").unwrap_err();
        assert!(matches!(err, GroupTreeError::AmbiguousNode { matches: 2, .. }), "{:?}", err);
    }

    #[test]
    fn test_node_filter_drops_subtrees() {
        let snapshot = TopologySnapshot::build(d(1), &rows(), "FIELD");
        let reqs = requirements();
        let table = series();
        let keep = |name: &str| name != "G1";
        let tree = TreeAssembler::new(&snapshot, &table, &reqs, 0..3).with_node_filter(&keep).assemble("FIELD").unwrap();
        assert_eq!(tree.node_label, "FIELD");
        assert!(tree.children.is_empty());
        assert!(tree.find("W1").is_none());
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.005_1), 1.01);
        assert_eq!(round2(-7.12345), -7.12);
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(-0.125), -0.13);
        assert!(round2(f64::NAN).is_nan());
    }
}
