use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ConfigError;
use crate::model::{CaseFile, Department};

/// Policy tables driving every derivation: SLAs, workflow templates and the
/// numeric cut points for status, escalation, workload and efficiency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub version: String,
    pub departments: BTreeMap<Department, DepartmentPolicy>,
    pub workflows: BTreeMap<String, WorkflowTemplate>,
    #[serde(default)]
    pub status: StatusPolicy,
    #[serde(default)]
    pub escalation: EscalationPolicy,
    #[serde(default)]
    pub workload: WorkloadPolicy,
    #[serde(default)]
    pub efficiency: EfficiencyPolicy,
}

impl Policy {
    pub fn department(&self, department: Department) -> Result<&DepartmentPolicy, ConfigError> {
        self.departments
            .get(&department)
            .ok_or_else(|| ConfigError::UnknownDepartment(department.to_string()))
    }

    /// Resolves the workflow template a file runs through.
    pub fn workflow_for(&self, file: &CaseFile) -> Result<&WorkflowTemplate, ConfigError> {
        let name = match &file.workflow {
            Some(name) => name.as_str(),
            None => self.department(file.department)?.default_workflow.as_str(),
        };
        self.workflow(name)
    }

    pub fn workflow(&self, name: &str) -> Result<&WorkflowTemplate, ConfigError> {
        let template =
            self.workflows
                .get(name)
                .ok_or_else(|| ConfigError::InvalidWorkflowTemplate {
                    name: name.to_string(),
                    reason: "no such workflow".to_string(),
                })?;
        if template.stages.is_empty() {
            return Err(ConfigError::InvalidWorkflowTemplate {
                name: name.to_string(),
                reason: "workflow has no stages".to_string(),
            });
        }
        Ok(template)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentPolicy {
    /// Days a file may sit in one stage before it counts as late.
    pub sla_days: u32,
    /// Expected end-to-end days from submission; defaults to `sla_days`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turnaround_days: Option<u32>,
    pub default_workflow: String,
    /// Handling time an officer in this department is measured against.
    #[serde(default = "default_handling_target")]
    pub handling_target_days: f64,
}

impl DepartmentPolicy {
    pub fn turnaround_days(&self) -> u32 {
        self.turnaround_days.unwrap_or(self.sla_days)
    }
}

fn default_handling_target() -> f64 {
    7.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowTemplate {
    pub stages: Vec<String>,
}

/// Margins around the department SLA that separate on-time, delayed and critical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusPolicy {
    #[serde(default = "default_margin")]
    pub on_time_margin: u32,
    #[serde(default = "default_margin")]
    pub critical_margin: u32,
}

fn default_margin() -> u32 {
    2
}

impl Default for StatusPolicy {
    fn default() -> Self {
        Self {
            on_time_margin: default_margin(),
            critical_margin: default_margin(),
        }
    }
}

/// Day thresholds at which each escalation state begins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscalationPolicy {
    #[serde(default = "default_warning_at")]
    pub warning_at: u32,
    #[serde(default = "default_supervisor_at")]
    pub supervisor_at: u32,
    #[serde(default = "default_auto_escalate_at")]
    pub auto_escalate_at: u32,
    #[serde(default = "default_executive_review_at")]
    pub executive_review_at: u32,
}

fn default_warning_at() -> u32 {
    4
}

fn default_supervisor_at() -> u32 {
    6
}

fn default_auto_escalate_at() -> u32 {
    7
}

fn default_executive_review_at() -> u32 {
    10
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        Self {
            warning_at: default_warning_at(),
            supervisor_at: default_supervisor_at(),
            auto_escalate_at: default_auto_escalate_at(),
            executive_review_at: default_executive_review_at(),
        }
    }
}

/// Active-file cut points for the workload buckets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadPolicy {
    #[serde(default = "default_medium_from")]
    pub medium_from: u32,
    #[serde(default = "default_high_from")]
    pub high_from: u32,
    /// Load at which redistributing files is recommended.
    #[serde(default = "default_redistribute_at")]
    pub redistribute_at: u32,
}

fn default_medium_from() -> u32 {
    6
}

fn default_high_from() -> u32 {
    10
}

fn default_redistribute_at() -> u32 {
    12
}

impl Default for WorkloadPolicy {
    fn default() -> Self {
        Self {
            medium_from: default_medium_from(),
            high_from: default_high_from(),
            redistribute_at: default_redistribute_at(),
        }
    }
}

/// Weights of the officer efficiency score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyPolicy {
    #[serde(default = "default_handling_weight")]
    pub handling_weight: f64,
    #[serde(default = "default_baseline_adjustment")]
    pub baseline_adjustment: f64,
    /// Points per file completed this month.
    #[serde(default = "default_throughput_bonus")]
    pub throughput_bonus: f64,
    /// Active files above this count cost `overload_penalty` points each.
    #[serde(default = "default_overload_threshold")]
    pub overload_threshold: u32,
    #[serde(default = "default_overload_penalty")]
    pub overload_penalty: f64,
    #[serde(default = "default_excellent_from")]
    pub excellent_from: u32,
    #[serde(default = "default_good_from")]
    pub good_from: u32,
}

fn default_handling_weight() -> f64 {
    0.6
}

fn default_baseline_adjustment() -> f64 {
    50.0
}

fn default_throughput_bonus() -> f64 {
    0.2
}

fn default_overload_threshold() -> u32 {
    13
}

fn default_overload_penalty() -> f64 {
    1.0
}

fn default_excellent_from() -> u32 {
    90
}

fn default_good_from() -> u32 {
    75
}

impl Default for EfficiencyPolicy {
    fn default() -> Self {
        Self {
            handling_weight: default_handling_weight(),
            baseline_adjustment: default_baseline_adjustment(),
            throughput_bonus: default_throughput_bonus(),
            overload_threshold: default_overload_threshold(),
            overload_penalty: default_overload_penalty(),
            excellent_from: default_excellent_from(),
            good_from: default_good_from(),
        }
    }
}

fn department(
    sla_days: u32,
    turnaround_days: u32,
    default_workflow: &str,
    handling_target_days: f64,
) -> DepartmentPolicy {
    DepartmentPolicy {
        sla_days,
        turnaround_days: Some(turnaround_days),
        default_workflow: default_workflow.to_string(),
        handling_target_days,
    }
}

fn workflow(stages: &[&str]) -> WorkflowTemplate {
    WorkflowTemplate {
        stages: stages.iter().map(|s| s.to_string()).collect(),
    }
}

impl Default for Policy {
    fn default() -> Self {
        let mut departments = BTreeMap::new();
        departments.insert(Department::Revenue, department(5, 7, "land-registration", 7.0));
        departments.insert(Department::Planning, department(7, 10, "building-approval", 7.0));
        departments.insert(Department::Welfare, department(5, 7, "welfare-benefit", 7.0));
        departments.insert(Department::Legal, department(10, 14, "legal-opinion", 7.0));
        departments.insert(Department::Admin, department(5, 5, "transfer-order", 7.0));

        let mut workflows = BTreeMap::new();
        workflows.insert(
            "land-registration".to_string(),
            workflow(&[
                "Application Received",
                "Document Verification",
                "Officer Review",
                "Department Approval",
                "Completed",
            ]),
        );
        workflows.insert(
            "building-approval".to_string(),
            workflow(&[
                "Application Received",
                "Site Inspection",
                "Technical Review",
                "Planning Approval",
                "Completed",
            ]),
        );
        workflows.insert(
            "welfare-benefit".to_string(),
            workflow(&[
                "Application Received",
                "Document Check",
                "Eligibility Verification",
                "Approval",
                "Completed",
            ]),
        );
        workflows.insert(
            "legal-opinion".to_string(),
            workflow(&[
                "File Received",
                "Case Review",
                "Opinion Draft",
                "Final Opinion",
            ]),
        );
        workflows.insert(
            "transfer-order".to_string(),
            workflow(&[
                "Application Received",
                "Initial Processing",
                "Verification",
                "Final Approval",
                "Completed",
            ]),
        );

        Self {
            version: "1.0".to_string(),
            departments,
            workflows,
            status: StatusPolicy::default(),
            escalation: EscalationPolicy::default(),
            workload: WorkloadPolicy::default(),
            efficiency: EfficiencyPolicy::default(),
        }
    }
}
