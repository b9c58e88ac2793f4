//! Which summary vectors every node of the ensemble needs, and as what kind of metric.
use super::vectors;
use crate::compute::ledger::SummaryFrame;
use crate::error::Result;
use crate::store::{DataKind, Datatype, Keyword, MetricOption, NodeRoles};
use serde::Serialize;
use smallvec::SmallVec;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRequirement {
    pub node_name: String,
    pub datatype: Datatype,
    pub kind: DataKind,
    pub signal_name: String,
}

/// Ensemble-wide injection types, from the field injection totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InjectionFlags {
    pub water: bool,
    pub gas: bool,
}

impl InjectionFlags {
    /// Vectors the flags are computed from.
    pub fn vectors() -> [String; 2] {
        [
            vectors::resolve(Datatype::WaterInjRate, vectors::FIELD_NODE, Keyword::Gruptree).unwrap_or_default(),
            vectors::resolve(Datatype::GasInjRate, vectors::FIELD_NODE, Keyword::Gruptree).unwrap_or_default(),
        ]
    }

    /// Only consulted when some node injects; otherwise both flags are false.
    pub fn compute(any_injector: bool, field_totals: &SummaryFrame) -> Self {
        if !any_injector {
            return Self::default();
        }
        let [water, gas] = Self::vectors();
        Self { water: field_totals.sum(&water) > 0.0, gas: field_totals.sum(&gas) > 0.0 }
    }
}

/// The per-node requirement table, computed once per ensemble.
#[derive(Debug, Clone, Default)]
pub struct RequirementTable {
    by_node: HashMap<String, SmallVec<[SummaryRequirement; 8]>>,
}

impl RequirementTable {
    pub fn for_node(&self, node_name: &str) -> &[SummaryRequirement] {
        self.by_node.get(node_name).map(|r| r.as_slice()).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SummaryRequirement> {
        self.by_node.values().flat_map(|r| r.iter())
    }

    pub fn signals(&self) -> BTreeSet<String> {
        self.iter().map(|r| r.signal_name.clone()).collect()
    }

    pub fn signals_of_kind(&self, kind: DataKind) -> BTreeSet<String> {
        self.iter().filter(|r| r.kind == kind).map(|r| r.signal_name.clone()).collect()
    }

    pub fn len(&self) -> usize { self.by_node.values().map(|r| r.len()).sum() }
    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

pub fn datatypes_for(roles: NodeRoles, keyword: Keyword, is_terminal: bool, flags: InjectionFlags) -> SmallVec<[Datatype; 8]> {
    let mut datatypes: SmallVec<[Datatype; 8]> = SmallVec::new();
    datatypes.push(Datatype::Pressure);
    if roles.is_producer() && !is_terminal {
        datatypes.extend([Datatype::OilRate, Datatype::GasRate, Datatype::WaterRate]);
    }
    if roles.is_injector() && flags.water && !is_terminal {
        datatypes.push(Datatype::WaterInjRate);
    }
    if roles.is_injector() && flags.gas && !is_terminal {
        datatypes.push(Datatype::GasInjRate);
    }
    if keyword.is_well() {
        datatypes.extend([Datatype::Bhp, Datatype::Wmctl]);
    }
    datatypes
}

pub fn plan(
    nodes: &[(String, Keyword)],
    roles: &HashMap<String, NodeRoles>,
    flags: InjectionFlags,
    terminal_node: &str,
) -> Result<RequirementTable> {
    let mut by_node = HashMap::with_capacity(nodes.len());
    for (name, keyword) in nodes {
        let node_roles = roles.get(name).copied().unwrap_or_default();
        let mut requirements = SmallVec::new();
        for datatype in datatypes_for(node_roles, *keyword, name == terminal_node, flags) {
            requirements.push(SummaryRequirement {
                node_name: name.clone(),
                datatype,
                kind: vectors::classify(datatype),
                signal_name: vectors::resolve(datatype, name, *keyword)?,
            });
        }
        by_node.insert(name.clone(), requirements);
    }
    Ok(RequirementTable { by_node })
}

/// Connection metrics selectable for the requested node types.
pub fn edge_options(node_types: NodeRoles, flags: InjectionFlags) -> Vec<MetricOption> {
    let mut options = Vec::new();
    if node_types.is_producer() {
        options.extend([Datatype::OilRate, Datatype::GasRate, Datatype::WaterRate].map(MetricOption::from));
    }
    if node_types.is_injector() && flags.water {
        options.push(Datatype::WaterInjRate.into());
    }
    if node_types.is_injector() && flags.gas {
        options.push(Datatype::GasInjRate.into());
    }
    options
}

pub fn node_options() -> Vec<MetricOption> {
    [Datatype::Pressure, Datatype::Bhp, Datatype::Wmctl].map(MetricOption::from).to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;
    use std::collections::BTreeMap;

    const BOTH: InjectionFlags = InjectionFlags { water: true, gas: true };

    #[rstest]
    #[case(NodeRoles::PRODUCER, Keyword::Gruptree, false, BOTH, vec![Datatype::OilRate, Datatype::GasRate, Datatype::WaterRate, Datatype::Pressure])]
    #[case(NodeRoles::INJECTOR, Keyword::Gruptree, false, InjectionFlags { water: true, gas: false }, vec![Datatype::WaterInjRate, Datatype::Pressure])]
    #[case(NodeRoles::OTHER, Keyword::Welspecs, false, BOTH, vec![Datatype::Pressure, Datatype::Bhp, Datatype::Wmctl])]
    #[case(NodeRoles::ALL, Keyword::Gruptree, true, BOTH, vec![Datatype::Pressure])]
    #[case(NodeRoles::PRODUCER.union(NodeRoles::INJECTOR), Keyword::Welspecs, false, BOTH,
        vec![Datatype::OilRate, Datatype::GasRate, Datatype::WaterRate, Datatype::WaterInjRate, Datatype::GasInjRate, Datatype::Pressure, Datatype::Bhp, Datatype::Wmctl])]
    fn test_datatypes_for(
        #[case] roles: NodeRoles,
        #[case] keyword: Keyword,
        #[case] terminal: bool,
        #[case] flags: InjectionFlags,
        #[case] expected: Vec<Datatype>,
    ) {
        let mut got = datatypes_for(roles, keyword, terminal, flags).to_vec();
        got.sort();
        assert_eq!(got, expected);
    }

    #[test]
    fn test_plan_resolves_signals_and_kinds() {
        let nodes = vec![("G1".to_string(), Keyword::Gruptree), ("W1".to_string(), Keyword::Welspecs)];
        let roles = HashMap::from([("G1".to_string(), NodeRoles::PRODUCER), ("W1".to_string(), NodeRoles::PRODUCER)]);
        let table = plan(&nodes, &roles, InjectionFlags::default(), "FIELD").unwrap();

        let w1: Vec<(&str, DataKind)> = table.for_node("W1").iter().map(|r| (r.signal_name.as_str(), r.kind)).collect();
        assert!(w1.contains(&("WOPR:W1", DataKind::Connection)));
        assert!(w1.contains(&("WTHP:W1", DataKind::Node)));
        assert!(w1.contains(&("WMCTL:W1", DataKind::Node)));
        assert_eq!(table.len(), 4 + 6);
        assert!(table.signals_of_kind(DataKind::Connection).contains("GWPR:G1"));
        assert!(table.for_node("UNKNOWN").is_empty());
    }

    #[test]
    fn test_injection_flags() {
        let d = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let frame = SummaryFrame::new(
            vec![d, d],
            vec![0, 1],
            BTreeMap::from([("FWIR".to_string(), vec![0.0, 10.0]), ("FGIR".to_string(), vec![0.0, 0.0])]),
        )
        .unwrap();
        assert_eq!(InjectionFlags::compute(true, &frame), InjectionFlags { water: true, gas: false });
        assert_eq!(InjectionFlags::compute(false, &frame), InjectionFlags::default());
    }

    #[test]
    fn test_option_lists() {
        let flags = InjectionFlags { water: true, gas: false };
        let values: Vec<Datatype> = edge_options(NodeRoles::ALL, flags).into_iter().map(|o| o.value).collect();
        assert_eq!(values, vec![Datatype::OilRate, Datatype::GasRate, Datatype::WaterRate, Datatype::WaterInjRate]);
        assert!(edge_options(NodeRoles::OTHER, flags).is_empty());
        assert_eq!(node_options()[1].label, "BHP");
    }
}
