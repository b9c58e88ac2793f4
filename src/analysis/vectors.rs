//! Summary vector naming: which simulator vector carries a given quantity for a node.
use crate::error::{GroupTreeError, Result};
use crate::store::{DataKind, Datatype, Keyword};

/// The field node uses the field-level table whatever keyword it is defined with.
pub const FIELD_NODE: &str = "FIELD";

/// Status codes of the `WSTAT` vector.
pub const WSTAT_PRODUCING: f64 = 1.0;
pub const WSTAT_INJECTING: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Table {
    Field,
    Network(Keyword),
}

fn prefix(table: Table, datatype: Datatype) -> Option<&'static str> {
    use Datatype::*;
    let name = match (table, datatype) {
        (Table::Field, OilRate) => "FOPR",
        (Table::Field, GasRate) => "FGPR",
        (Table::Field, WaterRate) => "FWPR",
        (Table::Field, WaterInjRate) => "FWIR",
        (Table::Field, GasInjRate) => "FGIR",
        (Table::Field, Pressure) => "GPR",

        (Table::Network(Keyword::Gruptree), OilRate) => "GOPR",
        (Table::Network(Keyword::Gruptree), GasRate) => "GGPR",
        (Table::Network(Keyword::Gruptree), WaterRate) => "GWPR",
        (Table::Network(Keyword::Gruptree), WaterInjRate) => "GWIR",
        (Table::Network(Keyword::Gruptree), GasInjRate) => "GGIR",
        (Table::Network(Keyword::Gruptree), Pressure) => "GPR",

        // Branch rates are the node's own production, not the sum of its inflows.
        (Table::Network(Keyword::Branprop), OilRate) => "GOPRNB",
        (Table::Network(Keyword::Branprop), GasRate) => "GGPRNB",
        (Table::Network(Keyword::Branprop), WaterRate) => "GWPRNB",
        (Table::Network(Keyword::Branprop), Pressure) => "GPR",

        (Table::Network(Keyword::Welspecs), OilRate) => "WOPR",
        (Table::Network(Keyword::Welspecs), GasRate) => "WGPR",
        (Table::Network(Keyword::Welspecs), WaterRate) => "WWPR",
        (Table::Network(Keyword::Welspecs), WaterInjRate) => "WWIR",
        (Table::Network(Keyword::Welspecs), GasInjRate) => "WGIR",
        (Table::Network(Keyword::Welspecs), Pressure) => "WTHP",
        (Table::Network(Keyword::Welspecs), Bhp) => "WBHP",
        (Table::Network(Keyword::Welspecs), Wmctl) => "WMCTL",

        _ => return None,
    };
    Some(name)
}

/// Resolves the summary vector name for `datatype` on `node_name`.
///
/// Field-level rates are unsuffixed (`FOPR`); everything else is `PREFIX:node`,
/// including field pressure (`GPR:FIELD`).
pub fn resolve(datatype: Datatype, node_name: &str, keyword: Keyword) -> Result<String> {
    let table = if node_name == FIELD_NODE { Table::Field } else { Table::Network(keyword) };
    let name = prefix(table, datatype).ok_or_else(|| GroupTreeError::UnsupportedCombination {
        keyword: match table {
            Table::Field => FIELD_NODE.to_string(),
            Table::Network(k) => k.to_string(),
        },
        datatype: datatype.to_string(),
    })?;

    match (table, classify(datatype)) {
        (Table::Field, DataKind::Connection) => Ok(name.to_string()),
        _ => Ok(format!("{}:{}", name, node_name)),
    }
}

/// Rates belong to the connection into a node; pressures and control modes to the node.
pub fn classify(datatype: Datatype) -> DataKind {
    match datatype {
        Datatype::OilRate
        | Datatype::GasRate
        | Datatype::WaterRate
        | Datatype::WaterInjRate
        | Datatype::GasInjRate => DataKind::Connection,
        Datatype::Pressure | Datatype::Bhp | Datatype::Wmctl => DataKind::Node,
    }
}

pub fn well_status(well: &str) -> String { format!("WSTAT:{}", well) }

/// Rate vectors summed to seed a leaf that is not a well.
pub fn production_vectors(node_name: &str, keyword: Keyword) -> Vec<String> {
    [Datatype::OilRate, Datatype::GasRate, Datatype::WaterRate]
        .iter()
        .filter_map(|&dt| resolve(dt, node_name, keyword).ok())
        .collect()
}

/// Injection vectors summed to seed a leaf. BRANPROP networks carry no injection.
pub fn injection_vectors(node_name: &str, keyword: Keyword) -> Vec<String> {
    if keyword == Keyword::Branprop {
        return Vec::new();
    }
    [Datatype::WaterInjRate, Datatype::GasInjRate]
        .iter()
        .filter_map(|&dt| resolve(dt, node_name, keyword).ok())
        .collect()
}
