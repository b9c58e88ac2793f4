//! Everything derived once per ensemble from the network table and the summary catalogue.
pub mod classify;
pub mod requirements;
pub mod topology;
pub mod vectors;
pub mod windows;

pub use classify::NodeClassifier;
pub use requirements::{InjectionFlags, RequirementTable, SummaryRequirement};
pub use windows::ValidityWindow;
