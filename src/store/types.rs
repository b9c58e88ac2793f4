use crate::error::GroupTreeError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Index of a node inside one `TopologySnapshot` arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline(always)]
    pub fn index(&self) -> usize { self.0 as usize }
    pub fn new(idx: usize) -> Self { Self(idx as u32) }
}

/// The simulator keyword a network row originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Keyword {
    Welspecs,
    Gruptree,
    Branprop,
}

impl Keyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Welspecs => "WELSPECS",
            Keyword::Gruptree => "GRUPTREE",
            Keyword::Branprop => "BRANPROP",
        }
    }

    pub fn is_well(&self) -> bool { matches!(self, Keyword::Welspecs) }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Keyword {
    type Err = GroupTreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "WELSPECS" => Ok(Keyword::Welspecs),
            "GRUPTREE" => Ok(Keyword::Gruptree),
            "BRANPROP" => Ok(Keyword::Branprop),
            other => Err(GroupTreeError::Configuration(format!("Unknown network keyword '{}'", other))),
        }
    }
}

/// The closed set of quantities a tree node or connection can carry.
///
/// Declaration order is the display order of the metric maps in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Datatype {
    OilRate,
    GasRate,
    WaterRate,
    WaterInjRate,
    GasInjRate,
    Pressure,
    Bhp,
    Wmctl,
}

impl Datatype {
    pub const ALL: [Datatype; 8] = [
        Datatype::OilRate,
        Datatype::GasRate,
        Datatype::WaterRate,
        Datatype::WaterInjRate,
        Datatype::GasInjRate,
        Datatype::Pressure,
        Datatype::Bhp,
        Datatype::Wmctl,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Datatype::OilRate => "oilrate",
            Datatype::GasRate => "gasrate",
            Datatype::WaterRate => "waterrate",
            Datatype::WaterInjRate => "waterinjrate",
            Datatype::GasInjRate => "gasinjrate",
            Datatype::Pressure => "pressure",
            Datatype::Bhp => "bhp",
            Datatype::Wmctl => "wmctl",
        }
    }

    /// Human-readable label for option lists.
    pub fn label(&self) -> &'static str {
        match self {
            Datatype::OilRate => "Oil Rate",
            Datatype::GasRate => "Gas Rate",
            Datatype::WaterRate => "Water Rate",
            Datatype::WaterInjRate => "Water Inj Rate",
            Datatype::GasInjRate => "Gas Inj Rate",
            Datatype::Pressure => "Pressure",
            Datatype::Bhp => "BHP",
            Datatype::Wmctl => "WMCTL",
        }
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Whether a quantity lives on the link into a node or on the node itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKind {
    Connection,
    Node,
}

/// Independent producer/injector/other flags packed into one byte.
///
/// A node may hold several roles at once, so this is a set rather than a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct NodeRoles(u8);

impl NodeRoles {
    pub const NONE: NodeRoles = NodeRoles(0);
    pub const PRODUCER: NodeRoles = NodeRoles(0b001);
    pub const INJECTOR: NodeRoles = NodeRoles(0b010);
    pub const OTHER: NodeRoles = NodeRoles(0b100);
    pub const ALL: NodeRoles = NodeRoles(0b111);

    pub fn from_flags(producer: bool, injector: bool, other: bool) -> Self {
        let mut roles = Self::NONE;
        if producer { roles.insert(Self::PRODUCER); }
        if injector { roles.insert(Self::INJECTOR); }
        if other { roles.insert(Self::OTHER); }
        roles
    }

    #[inline]
    pub fn contains(&self, other: NodeRoles) -> bool { self.0 & other.0 == other.0 }
    #[inline]
    pub fn intersects(&self, other: NodeRoles) -> bool { self.0 & other.0 != 0 }
    pub fn insert(&mut self, other: NodeRoles) { self.0 |= other.0; }
    pub fn union(self, other: NodeRoles) -> NodeRoles { NodeRoles(self.0 | other.0) }
    pub fn is_empty(&self) -> bool { self.0 == 0 }

    pub fn is_producer(&self) -> bool { self.contains(Self::PRODUCER) }
    pub fn is_injector(&self) -> bool { self.contains(Self::INJECTOR) }
    pub fn is_other(&self) -> bool { self.contains(Self::OTHER) }
}

impl FromStr for NodeRoles {
    type Err = GroupTreeError;

    /// Parses a single role name (`producer`, `injector`, `other`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "producer" | "prod" => Ok(NodeRoles::PRODUCER),
            "injector" | "inj" => Ok(NodeRoles::INJECTOR),
            "other" => Ok(NodeRoles::OTHER),
            other => Err(GroupTreeError::Configuration(format!("Unknown node type '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    Well,
    Group,
}

/// VFP table number the simulator writes when a branch has no table.
pub const NO_VFP_TABLE: i64 = 9999;

/// Label drawn on the connection into a node.
pub fn edge_label(vfp_table: Option<i64>) -> String {
    match vfp_table {
        Some(n) if n != NO_VFP_TABLE => format!("VFP {}", n),
        _ => String::new(),
    }
}

/// One parent/child link of the network table, as delivered by the upstream loader.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TopologyRow {
    pub date: NaiveDate,
    /// Absent on the root row of the terminal node.
    pub parent: Option<String>,
    pub child: String,
    pub keyword: Keyword,
    pub vfp_table: Option<i64>,
    pub realization: Option<i32>,
}

impl TopologyRow {
    pub fn new(date: NaiveDate, parent: &str, child: &str, keyword: Keyword) -> Self {
        Self {
            date,
            parent: Some(parent.to_string()),
            child: child.to_string(),
            keyword,
            vfp_table: None,
            realization: None,
        }
    }

    pub fn with_vfp_table(mut self, vfp_table: i64) -> Self {
        self.vfp_table = Some(vfp_table);
        self
    }

    pub fn with_realization(mut self, realization: i32) -> Self {
        self.realization = Some(realization);
        self
    }
}

/// One entry of the metric selectors offered next to the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricOption {
    pub label: String,
    pub value: Datatype,
}

impl From<Datatype> for MetricOption {
    fn from(datatype: Datatype) -> Self {
        Self { label: datatype.label().to_string(), value: datatype }
    }
}
