pub mod loader;
pub mod schema;

pub use loader::{load_policy, load_policy_from_str, validate_policy};
pub use schema::{
    DepartmentPolicy, EfficiencyPolicy, EscalationPolicy, Policy, StatusPolicy, WorkflowTemplate,
    WorkloadPolicy,
};
