//! Variant enumeration, task planning and task execution for agcp.

pub mod artifact;
pub mod enumerate;
pub mod error;
pub mod execute;
pub mod host;
pub mod plan;
pub mod project;

pub use enumerate::{PublishableUnit, PublishingSettings, VariantEnumerator};
pub use error::EngineError;
pub use execute::{execute, update_app_info, ExecuteOptions, TaskOutcome};
pub use plan::{TaskDescriptor, TaskGraph, TaskKind, TaskPlanner, TaskRegistry};
pub use project::Project;
