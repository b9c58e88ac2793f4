//! Plugin configuration for one ensemble's group tree.
//!
//! Every field has a serde default, so an empty JSON object yields the standard
//! FIELD-rooted GRUPTREE network with no well exclusions.
use crate::error::{GroupTreeError, Result};
use crate::store::Keyword;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TERMINAL_NODE: &str = "FIELD";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupTreeConfig {
    /// Name of the ensemble the tree is built for.
    pub ensemble: String,
    /// Root of every emitted tree.
    pub terminal_node: String,
    /// Wells whose name starts with any of these are dropped before classification.
    pub excl_well_startswith: Vec<String>,
    /// Wells whose name ends with any of these are dropped before classification.
    pub excl_well_endswith: Vec<String>,
    /// Which network keyword is drawn above the wells: GRUPTREE or BRANPROP.
    pub tree_type: Keyword,
}

impl Default for GroupTreeConfig {
    fn default() -> Self {
        Self {
            ensemble: "ensemble".to_string(),
            terminal_node: DEFAULT_TERMINAL_NODE.to_string(),
            excl_well_startswith: Vec::new(),
            excl_well_endswith: Vec::new(),
            tree_type: Keyword::Gruptree,
        }
    }
}

impl GroupTreeConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)
            .map_err(|e| GroupTreeError::Configuration(format!("Invalid group tree configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.ensemble.trim().is_empty() {
            return Err(GroupTreeError::Configuration("An ensemble must be selected".into()));
        }
        if self.terminal_node.trim().is_empty() {
            return Err(GroupTreeError::Configuration("The terminal node name is empty".into()));
        }
        if self.tree_type == Keyword::Welspecs {
            return Err(GroupTreeError::Configuration(
                "tree_type must be GRUPTREE or BRANPROP, not WELSPECS".into(),
            ));
        }
        Ok(())
    }

    pub fn is_excluded_well(&self, well: &str) -> bool {
        self.excl_well_startswith.iter().any(|p| well.starts_with(p.as_str()))
            || self.excl_well_endswith.iter().any(|s| well.ends_with(s.as_str()))
    }
}
