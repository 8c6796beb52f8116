//! Officer workload buckets and efficiency scoring.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{EfficiencyPolicy, WorkloadPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WorkloadBucket {
    Low,
    Medium,
    High,
}

impl fmt::Display for WorkloadBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkloadBucket::Low => write!(f, "Low"),
            WorkloadBucket::Medium => write!(f, "Medium"),
            WorkloadBucket::High => write!(f, "High"),
        }
    }
}

pub fn workload_bucket(active_files: u32, policy: &WorkloadPolicy) -> WorkloadBucket {
    if active_files >= policy.high_from {
        WorkloadBucket::High
    } else if active_files >= policy.medium_from {
        WorkloadBucket::Medium
    } else {
        WorkloadBucket::Low
    }
}

pub fn needs_redistribution(active_files: u32, policy: &WorkloadPolicy) -> bool {
    active_files >= policy.redistribute_at
}

/// Figures an efficiency score is computed from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EfficiencyInputs {
    pub avg_handling_days: f64,
    pub active_files: u32,
    pub completed_this_month: u32,
}

/// Scores an officer between 0 and 100.
pub trait EfficiencyScorer {
    fn score(&self, inputs: &EfficiencyInputs, target_days: f64) -> u8;
}

/// Default scorer: faster handling relative to the department target scores
/// higher, completed files add a small bonus and active files above the
/// overload threshold cost points.
pub struct WeightedScorer<'a> {
    policy: &'a EfficiencyPolicy,
}

impl<'a> WeightedScorer<'a> {
    pub fn new(policy: &'a EfficiencyPolicy) -> Self {
        Self { policy }
    }
}

impl EfficiencyScorer for WeightedScorer<'_> {
    fn score(&self, inputs: &EfficiencyInputs, target_days: f64) -> u8 {
        let p = self.policy;
        let ratio = if target_days > 0.0 {
            (inputs.avg_handling_days / target_days).min(1.0)
        } else {
            1.0
        };

        let handling = 100.0 * (1.0 - ratio) * p.handling_weight;
        let throughput = f64::from(inputs.completed_this_month) * p.throughput_bonus;
        let overload =
            f64::from(inputs.active_files.saturating_sub(p.overload_threshold)) * p.overload_penalty;

        let raw = handling + p.baseline_adjustment + throughput - overload;
        if raw.is_nan() {
            return 0;
        }
        raw.round().clamp(0.0, 100.0) as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EfficiencyBand {
    Excellent,
    Good,
    NeedsAttention,
}

pub fn efficiency_band(score: u8, policy: &EfficiencyPolicy) -> EfficiencyBand {
    let score = u32::from(score);
    if score >= policy.excellent_from {
        EfficiencyBand::Excellent
    } else if score >= policy.good_from {
        EfficiencyBand::Good
    } else {
        EfficiencyBand::NeedsAttention
    }
}
