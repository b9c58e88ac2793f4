//! Up-front check that every vector the trees will read exists in the summary.
use super::error::{ValidationError, ValidationErrorType};
use crate::analysis::requirements::RequirementTable;
use crate::analysis::vectors;
use crate::store::DataKind;
use std::collections::BTreeSet;
use tracing::warn;

/// Checks the requirement table against the provider's catalogue.
///
/// Collects every problem rather than stopping at the first.
pub struct SignalValidator<'a> {
    catalogue: &'a BTreeSet<String>,
}

impl<'a> SignalValidator<'a> {
    pub fn new(catalogue: &'a BTreeSet<String>) -> Self {
        Self { catalogue }
    }

    /// Node metrics are allowed to be missing (e.g. pressures before a well is drilled);
    /// connection rates and well status are not.
    pub fn validate<'w>(
        &self,
        requirements: &RequirementTable,
        wells: impl IntoIterator<Item = &'w str>,
    ) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        for req in requirements.iter().filter(|r| r.kind == DataKind::Connection) {
            if !self.catalogue.contains(&req.signal_name) {
                errors.push(ValidationError {
                    node_name: req.node_name.clone(),
                    signal_name: req.signal_name.clone(),
                    error_type: ValidationErrorType::MissingConnectionSignal,
                    message: format!("{} is required for the {} of '{}'", req.signal_name, req.datatype, req.node_name),
                });
            }
        }

        for well in wells {
            let wstat = vectors::well_status(well);
            if !self.catalogue.contains(&wstat) {
                errors.push(ValidationError {
                    node_name: well.to_string(),
                    signal_name: wstat,
                    error_type: ValidationErrorType::MissingWellStatus,
                    message: format!("Well '{}' has no status vector", well),
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            for e in &errors {
                warn!(node = %e.node_name, signal = %e.signal_name, "{}", e.message);
            }
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::requirements::{plan, InjectionFlags};
    use crate::error::GroupTreeError;
    use crate::store::{Keyword, NodeRoles};
    use std::collections::HashMap;

    fn requirements() -> RequirementTable {
        let nodes = vec![("G1".to_string(), Keyword::Gruptree), ("W1".to_string(), Keyword::Welspecs)];
        let roles = HashMap::from([("G1".to_string(), NodeRoles::PRODUCER), ("W1".to_string(), NodeRoles::PRODUCER)]);
        plan(&nodes, &roles, InjectionFlags::default(), "FIELD").unwrap()
    }

    #[test]
    fn test_all_missing_signals_are_reported_at_once() {
        let catalogue: BTreeSet<String> =
            ["GOPR:G1", "GGPR:G1", "WOPR:W1", "WGPR:W1", "WWPR:W1"].iter().map(|s| s.to_string()).collect();
        let errors = SignalValidator::new(&catalogue).validate(&requirements(), ["W1"]).unwrap_err();

        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(|e| e.signal_name == "GWPR:G1"
            && e.error_type == ValidationErrorType::MissingConnectionSignal));
        assert!(errors.iter().any(|e| e.signal_name == "WSTAT:W1"
            && e.error_type == ValidationErrorType::MissingWellStatus));

        let err: GroupTreeError = errors.into();
        assert_eq!(err, GroupTreeError::MissingSignals { signals: vec!["GWPR:G1".into(), "WSTAT:W1".into()] });
    }

    #[test]
    fn test_missing_node_metrics_are_tolerated() {
        let catalogue: BTreeSet<String> = ["GOPR:G1", "GGPR:G1", "GWPR:G1", "WOPR:W1", "WGPR:W1", "WWPR:W1", "WSTAT:W1"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert!(SignalValidator::new(&catalogue).validate(&requirements(), ["W1"]).is_ok());
    }
}
