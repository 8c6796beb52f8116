use std::path::Path;

use crate::config::schema::Policy;
use crate::error::ConfigError;

const SCHEMA_JSON: &str = include_str!("../../../../schema/policy-v1.json");

pub fn load_policy<P: AsRef<Path>>(path: P) -> Result<Policy, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    let policy = load_policy_from_str(&content)?;
    log::info!(
        "Loaded policy from {:?}: {} departments, {} workflows",
        path,
        policy.departments.len(),
        policy.workflows.len()
    );
    Ok(policy)
}

pub fn load_policy_from_str(content: &str) -> Result<Policy, ConfigError> {
    let json_value: serde_json::Value = serde_json::from_str(content)?;

    validate_schema(&json_value)?;

    let policy: Policy = serde_json::from_value(json_value)?;

    validate_policy(&policy)?;

    Ok(policy)
}

fn validate_schema(json_value: &serde_json::Value) -> Result<(), ConfigError> {
    let schema: serde_json::Value =
        serde_json::from_str(SCHEMA_JSON).map_err(|e| ConfigError::Validation {
            message: format!("Invalid embedded schema JSON: {}", e),
        })?;

    let validator = jsonschema::validator_for(&schema).map_err(|e| ConfigError::Validation {
        message: format!("Failed to compile JSON schema: {}", e),
    })?;

    let error_messages: Vec<String> = validator
        .iter_errors(json_value)
        .map(|e| e.to_string())
        .collect();
    if !error_messages.is_empty() {
        return Err(ConfigError::SchemaValidation {
            errors: error_messages.join("; "),
        });
    }

    Ok(())
}

/// Semantic checks the schema cannot express. Runs at startup so that
/// configuration mistakes surface before any file is evaluated.
pub fn validate_policy(policy: &Policy) -> Result<(), ConfigError> {
    if policy.version != "1.0" {
        return Err(ConfigError::Validation {
            message: format!("Unsupported policy version: {}", policy.version),
        });
    }

    if policy.departments.is_empty() {
        return Err(ConfigError::Validation {
            message: "Policy defines no departments".to_string(),
        });
    }

    for (name, template) in &policy.workflows {
        if template.stages.is_empty() {
            return Err(ConfigError::InvalidWorkflowTemplate {
                name: name.clone(),
                reason: "workflow has no stages".to_string(),
            });
        }
        if template.stages.iter().any(|s| s.trim().is_empty()) {
            return Err(ConfigError::InvalidWorkflowTemplate {
                name: name.clone(),
                reason: "stage names must not be empty".to_string(),
            });
        }
    }

    for (department, settings) in &policy.departments {
        if settings.sla_days == 0 {
            return Err(ConfigError::Validation {
                message: format!("{} SLA must be at least one day", department),
            });
        }
        if !settings.handling_target_days.is_finite() || settings.handling_target_days <= 0.0 {
            return Err(ConfigError::Validation {
                message: format!("{} handling target must be positive", department),
            });
        }
        policy.workflow(&settings.default_workflow)?;
    }

    let escalation = &policy.escalation;
    let thresholds = [
        escalation.warning_at,
        escalation.supervisor_at,
        escalation.auto_escalate_at,
        escalation.executive_review_at,
    ];
    if thresholds[0] == 0 || thresholds.windows(2).any(|w| w[0] >= w[1]) {
        return Err(ConfigError::Validation {
            message: format!(
                "Escalation thresholds must be positive and strictly increasing, got {:?}",
                thresholds
            ),
        });
    }

    let workload = &policy.workload;
    if workload.medium_from == 0 || workload.medium_from >= workload.high_from {
        return Err(ConfigError::Validation {
            message: format!(
                "Workload cut points must satisfy 0 < medium_from < high_from, got {} and {}",
                workload.medium_from, workload.high_from
            ),
        });
    }

    let efficiency = &policy.efficiency;
    if efficiency.good_from > efficiency.excellent_from || efficiency.excellent_from > 100 {
        return Err(ConfigError::Validation {
            message: format!(
                "Efficiency bands must satisfy good_from <= excellent_from <= 100, got {} and {}",
                efficiency.good_from, efficiency.excellent_from
            ),
        });
    }

    Ok(())
}
