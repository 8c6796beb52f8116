//! Aggregate views: dashboard summary, stage bottlenecks and officer workload.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::Policy;
use crate::error::ConfigError;
use crate::model::{CaseFile, Department, Officer, StageStatus};
use crate::workflow::{
    assess, efficiency_band, generate_alerts, needs_redistribution, workload_bucket,
    AlertSummary, EfficiencyBand, EfficiencyInputs, EfficiencyScorer, FileStatus,
    WeightedScorer, WorkloadBucket,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub on_time: usize,
    pub delayed: usize,
    pub critical: usize,
}

impl StatusCounts {
    fn record(&mut self, status: FileStatus) {
        match status {
            FileStatus::OnTime => self.on_time += 1,
            FileStatus::Delayed => self.delayed += 1,
            FileStatus::Critical => self.critical += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentLoad {
    pub department: Department,
    pub total: usize,
    pub open: usize,
    pub avg_days_pending: f64,
}

/// Average time files spend in a stage, from completed stages only.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageDuration {
    pub stage: String,
    pub avg_days: f64,
    pub samples: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub as_of: DateTime<Utc>,
    pub total_files: usize,
    pub open_files: usize,
    pub closed_files: usize,
    /// Status of open files; closed files are not counted.
    pub by_status: StatusCounts,
    pub by_department: Vec<DepartmentLoad>,
    pub avg_days_pending: f64,
    /// Percent of closed files disposed of within their department turnaround.
    pub completion_rate_within_sla: f64,
    /// Percent of all files currently delayed or critical.
    pub delay_rate: f64,
    /// Mean days from submission to closing over closed files.
    pub avg_disposal_days: f64,
    pub avg_officer_efficiency: f64,
    /// Most efficient department first.
    pub department_efficiency: Vec<DepartmentEfficiency>,
    pub alerts: AlertSummary,
    /// Slowest stage first.
    pub bottlenecks: Vec<StageDuration>,
}

/// Mean officer efficiency within one department.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentEfficiency {
    pub department: Department,
    pub efficiency: f64,
    pub officers: usize,
}

/// Builds the dashboard from the files and the officer roster.
///
/// Rates are percentages rounded to one decimal and read zero when there is
/// nothing to measure.
pub fn dashboard_summary(
    files: &[&CaseFile],
    officers: &[Officer],
    policy: &Policy,
    as_of: DateTime<Utc>,
) -> Result<DashboardSummary, ConfigError> {
    let _span = tracing::debug_span!(
        "reports.dashboard",
        files = files.len(),
        officers = officers.len()
    )
    .entered();

    let mut by_status = StatusCounts::default();
    let mut departments: BTreeMap<Department, (usize, usize, u64)> = BTreeMap::new();
    let mut open_files = 0usize;
    let mut total_days = 0u64;
    let mut disposal_days = 0.0;
    let mut within_sla = 0usize;

    for file in files {
        let assessment = assess(file, policy, as_of)?;
        let entry = departments.entry(file.department).or_default();
        entry.0 += 1;
        if let Some(days) = file.disposal_days() {
            let turnaround = policy.department(file.department)?.turnaround_days();
            if days <= f64::from(turnaround) {
                within_sla += 1;
            }
            disposal_days += days;
            continue;
        }
        open_files += 1;
        total_days += u64::from(assessment.days_pending);
        by_status.record(assessment.status);
        entry.1 += 1;
        entry.2 += u64::from(assessment.days_pending);
    }

    let by_department = departments
        .into_iter()
        .map(|(department, (total, open, days))| DepartmentLoad {
            department,
            total,
            open,
            avg_days_pending: average(days as f64, open),
        })
        .collect();

    let alerts = generate_alerts(files.iter().copied(), policy, as_of)?;
    let roster = workload_report(officers, policy)?;
    let closed_files = files.len() - open_files;

    Ok(DashboardSummary {
        as_of,
        total_files: files.len(),
        open_files,
        closed_files,
        by_department,
        avg_days_pending: average(total_days as f64, open_files),
        completion_rate_within_sla: percent(within_sla, closed_files),
        delay_rate: percent(by_status.delayed + by_status.critical, files.len()),
        avg_disposal_days: average(disposal_days, closed_files),
        avg_officer_efficiency: average(
            roster.officers.iter().map(|o| f64::from(o.efficiency)).sum(),
            roster.officers.len(),
        ),
        department_efficiency: department_efficiency(&roster.officers),
        by_status,
        alerts: AlertSummary::from_alerts(&alerts),
        bottlenecks: stage_bottlenecks(files),
    })
}

/// Mean efficiency per department, highest first.
pub fn department_efficiency(officers: &[OfficerWorkload]) -> Vec<DepartmentEfficiency> {
    let mut totals: BTreeMap<Department, (f64, usize)> = BTreeMap::new();
    for officer in officers {
        let entry = totals.entry(officer.department).or_default();
        entry.0 += f64::from(officer.efficiency);
        entry.1 += 1;
    }

    let mut ranking: Vec<DepartmentEfficiency> = totals
        .into_iter()
        .map(|(department, (sum, count))| DepartmentEfficiency {
            department,
            efficiency: average(sum, count),
            officers: count,
        })
        .collect();
    ranking.sort_by(|a, b| b.efficiency.total_cmp(&a.efficiency));
    ranking
}

/// Average completed-stage duration per stage name, slowest first.
pub fn stage_bottlenecks(files: &[&CaseFile]) -> Vec<StageDuration> {
    let mut totals: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for event in files
        .iter()
        .flat_map(|f| f.events.iter())
        .filter(|e| e.status == StageStatus::Completed)
    {
        let entry = totals.entry(event.action.as_str()).or_default();
        entry.0 += event.duration_days;
        entry.1 += 1;
    }

    let mut stages: Vec<StageDuration> = totals
        .into_iter()
        .map(|(stage, (days, samples))| StageDuration {
            stage: stage.to_string(),
            avg_days: average(days, samples),
            samples,
        })
        .collect();
    // Stable sort keeps equal averages in name order.
    stages.sort_by(|a, b| b.avg_days.total_cmp(&a.avg_days));
    stages
}

// ─── Officer workload ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficerWorkload {
    pub id: String,
    pub name: String,
    pub department: Department,
    pub active_files: u32,
    pub avg_handling_days: f64,
    pub workload: WorkloadBucket,
    pub completed_this_month: u32,
    pub efficiency: u8,
    pub band: EfficiencyBand,
    pub redistribute: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadReport {
    pub officers: Vec<OfficerWorkload>,
    pub total_active_files: u64,
    pub average_load: f64,
    pub high_workload: usize,
    /// Officers whose load calls for moving files elsewhere.
    pub redistribution_candidates: Vec<String>,
    /// Highest efficiency; the earlier roster entry wins a tie.
    pub top_performer: Option<String>,
}

pub fn officer_workload(
    officer: &Officer,
    policy: &Policy,
    scorer: &dyn EfficiencyScorer,
) -> Result<OfficerWorkload, ConfigError> {
    let target = policy.department(officer.department)?.handling_target_days;
    let efficiency = scorer.score(
        &EfficiencyInputs {
            avg_handling_days: officer.avg_handling_days,
            active_files: officer.active_files,
            completed_this_month: officer.completed_this_month,
        },
        target,
    );

    Ok(OfficerWorkload {
        id: officer.id.clone(),
        name: officer.name.clone(),
        department: officer.department,
        active_files: officer.active_files,
        avg_handling_days: officer.avg_handling_days,
        workload: workload_bucket(officer.active_files, &policy.workload),
        completed_this_month: officer.completed_this_month,
        efficiency,
        band: efficiency_band(efficiency, &policy.efficiency),
        redistribute: needs_redistribution(officer.active_files, &policy.workload),
    })
}

/// Roster view scored with the policy's weighted scorer.
pub fn workload_report(officers: &[Officer], policy: &Policy) -> Result<WorkloadReport, ConfigError> {
    workload_report_with(officers, policy, &WeightedScorer::new(&policy.efficiency))
}

pub fn workload_report_with(
    officers: &[Officer],
    policy: &Policy,
    scorer: &dyn EfficiencyScorer,
) -> Result<WorkloadReport, ConfigError> {
    let rows = officers
        .iter()
        .map(|o| officer_workload(o, policy, scorer))
        .collect::<Result<Vec<_>, _>>()?;

    let total_active_files: u64 = rows.iter().map(|r| u64::from(r.active_files)).sum();
    let high_workload = rows
        .iter()
        .filter(|r| r.workload == WorkloadBucket::High)
        .count();
    let redistribution_candidates = rows
        .iter()
        .filter(|r| r.redistribute)
        .map(|r| r.id.clone())
        .collect();

    let mut top: Option<&OfficerWorkload> = None;
    for row in &rows {
        if top.map_or(true, |t| row.efficiency > t.efficiency) {
            top = Some(row);
        }
    }
    let top_performer = top.map(|r| r.id.clone());

    Ok(WorkloadReport {
        average_load: average(total_active_files as f64, rows.len()),
        officers: rows,
        total_active_files,
        high_workload,
        redistribution_candidates,
        top_performer,
    })
}

/// Mean rounded to one decimal place; zero for an empty set.
fn average(sum: f64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    (sum / count as f64 * 10.0).round() / 10.0
}

fn percent(part: usize, whole: usize) -> f64 {
    average(part as f64 * 100.0, whole)
}
