use crate::compute::assembler::TreeRecord;
use crate::model::DatasetBlock;
use crate::store::{Datatype, NodeType};
use std::fmt::Write;

/// Renders every block of a dataset as an indented text tree, showing the first
/// value of each series.
pub fn format_dataset(blocks: &[DatasetBlock]) -> String {
    let mut output = String::new();
    for block in blocks {
        let first = block.dates.first().map(|d| d.to_string()).unwrap_or_default();
        let last = block.dates.last().map(|d| d.to_string()).unwrap_or_default();
        let _ = writeln!(output, "GROUP TREE {} .. {} ({} dates):", first, last, block.dates.len());
        let _ = writeln!(output, "--------------------------------------------------");
        output.push_str(&format_tree(&block.tree));
    }
    output
}

pub fn format_tree(root: &TreeRecord) -> String {
    let mut tracer = Tracer { output: String::new() };
    tracer.trace_node(root, "");
    tracer.output
}

struct Tracer {
    output: String,
}

impl Tracer {
    fn trace_node(&mut self, node: &TreeRecord, prefix: &str) {
        let kind = match node.node_type {
            NodeType::Well => "Well",
            NodeType::Group => "Group",
        };
        let mut line = format!("{}{} [{}]", prefix, node.node_label, kind);
        if !node.edge_label.is_empty() {
            let _ = write!(line, " <{}>", node.edge_label);
        }
        for (datatype, series) in node.connection_data.iter().chain(node.node_data.iter()) {
            let _ = write!(line, " {}={}", datatype, format_series(*datatype, series));
        }
        let _ = writeln!(self.output, "{}", line);

        let stem = build_child_stem(prefix);
        for (i, child) in node.children.iter().enumerate() {
            let connector = if i == node.children.len() - 1 { "`--" } else { "|--" };
            self.trace_node(child, &format!("{}{}", stem, connector));
        }
    }
}

fn format_series(datatype: Datatype, series: &[f64]) -> String {
    let first = match series.first() {
        None => return "[]".to_string(),
        Some(v) if v.is_nan() => "?".to_string(),
        // Control modes are integer codes.
        Some(v) if datatype == Datatype::Wmctl => format!("{}", *v as i64),
        Some(v) => format!("{:.2}", v),
    };
    if series.len() == 1 { format!("[{}]", first) } else { format!("[{}, ...]", first) }
}

fn build_child_stem(current_prefix: &str) -> String {
    current_prefix.replace("`--", "   ").replace("|--", "|  ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn leaf(label: &str) -> TreeRecord {
        TreeRecord {
            node_label: label.to_string(),
            node_type: NodeType::Well,
            edge_label: "VFP 2".to_string(),
            connection_data: BTreeMap::from([(Datatype::OilRate, vec![10.5, 11.0])]),
            node_data: BTreeMap::from([(Datatype::Bhp, vec![f64::NAN])]),
            children: vec![],
        }
    }

    #[test]
    fn test_format_tree_layout() {
        let root = TreeRecord {
            node_label: "FIELD".to_string(),
            node_type: NodeType::Group,
            edge_label: String::new(),
            connection_data: BTreeMap::new(),
            node_data: BTreeMap::new(),
            children: vec![
                TreeRecord { children: vec![leaf("W1"), leaf("W2")], ..leaf("G1") },
                leaf("W3"),
            ],
        };
        let text = format_tree(&root);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "FIELD [Group]");
        assert_eq!(lines[1], "|--G1 [Well] <VFP 2> oilrate=[10.50, ...] bhp=[?]");
        assert!(lines[2].starts_with("|  |--W1"));
        assert!(lines[3].starts_with("|  `--W2"));
        assert!(lines[4].starts_with("`--W3"));
    }
}
