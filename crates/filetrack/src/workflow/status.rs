use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::Policy;
use crate::error::ConfigError;
use crate::model::Department;

/// Coarse SLA status used for filtering and colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    OnTime,
    Delayed,
    Critical,
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileStatus::OnTime => write!(f, "On Time"),
            FileStatus::Delayed => write!(f, "Delayed"),
            FileStatus::Critical => write!(f, "Critical"),
        }
    }
}

/// Classifies days spent in the current stage against the department SLA.
///
/// `days <= sla - on_time_margin` is on time, `days >= sla + critical_margin`
/// is critical, anything in between is delayed. When the bands overlap the
/// more severe one wins.
pub fn derive_status(
    days_pending: u32,
    department: Department,
    policy: &Policy,
) -> Result<FileStatus, ConfigError> {
    let sla = i64::from(policy.department(department)?.sla_days);
    let days = i64::from(days_pending);
    let on_time_until = sla - i64::from(policy.status.on_time_margin);
    let critical_from = sla + i64::from(policy.status.critical_margin);

    if days >= critical_from {
        Ok(FileStatus::Critical)
    } else if days <= on_time_until {
        Ok(FileStatus::OnTime)
    } else {
        Ok(FileStatus::Delayed)
    }
}

/// Status filter accepted by file listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    OnTime,
    Delayed,
    Critical,
}

impl StatusFilter {
    pub fn matches(&self, status: FileStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::OnTime => status == FileStatus::OnTime,
            StatusFilter::Delayed => status == FileStatus::Delayed,
            StatusFilter::Critical => status == FileStatus::Critical,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect();
        match key.as_str() {
            "" | "all" => Ok(StatusFilter::All),
            "ontime" => Ok(StatusFilter::OnTime),
            "delayed" => Ok(StatusFilter::Delayed),
            "critical" => Ok(StatusFilter::Critical),
            _ => Err(format!(
                "Unknown status filter '{}': expected all, on-time, delayed or critical",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StatusCase {
        department: Department,
        days: u32,
        expected: FileStatus,
    }

    // Revenue and Welfare have a 5 day SLA, Planning 7, Legal 10.
    const CASES: &[StatusCase] = &[
        StatusCase { department: Department::Revenue, days: 0, expected: FileStatus::OnTime },
        StatusCase { department: Department::Revenue, days: 2, expected: FileStatus::OnTime },
        StatusCase { department: Department::Revenue, days: 3, expected: FileStatus::OnTime },
        StatusCase { department: Department::Revenue, days: 4, expected: FileStatus::Delayed },
        StatusCase { department: Department::Welfare, days: 6, expected: FileStatus::Delayed },
        StatusCase { department: Department::Revenue, days: 7, expected: FileStatus::Critical },
        StatusCase { department: Department::Revenue, days: 400, expected: FileStatus::Critical },
        StatusCase { department: Department::Planning, days: 5, expected: FileStatus::OnTime },
        StatusCase { department: Department::Planning, days: 6, expected: FileStatus::Delayed },
        StatusCase { department: Department::Planning, days: 9, expected: FileStatus::Critical },
        StatusCase { department: Department::Legal, days: 8, expected: FileStatus::OnTime },
        StatusCase { department: Department::Legal, days: 11, expected: FileStatus::Delayed },
        StatusCase { department: Department::Legal, days: 12, expected: FileStatus::Critical },
    ];

    #[test]
    fn test_status_table() {
        let policy = Policy::default();
        for case in CASES {
            let status = derive_status(case.days, case.department, &policy).unwrap();
            assert_eq!(
                status, case.expected,
                "{} after {} days: expected {:?}, got {:?}",
                case.department, case.days, case.expected, status
            );
        }
    }

    #[test]
    fn test_status_is_total_for_known_departments() {
        let policy = Policy::default();
        for department in policy.departments.keys() {
            let mut previous = FileStatus::OnTime;
            for days in 0..60 {
                let status = derive_status(days, *department, &policy).unwrap();
                assert!(status >= previous, "status must never improve as days grow");
                previous = status;
            }
        }
    }

    #[test]
    fn test_unknown_department_fails() {
        let policy = Policy::default();
        let result = derive_status(1, Department::Reception, &policy);
        assert!(matches!(result, Err(ConfigError::UnknownDepartment(_))));
    }

    #[test]
    fn test_overlapping_bands_round_to_critical() {
        let mut policy = Policy::default();
        policy.status.on_time_margin = 0;
        policy.status.critical_margin = 0;
        // With zero margins the SLA day itself is both on time and critical.
        let status = derive_status(5, Department::Revenue, &policy).unwrap();
        assert_eq!(status, FileStatus::Critical);
        assert_eq!(
            derive_status(4, Department::Revenue, &policy).unwrap(),
            FileStatus::OnTime
        );
    }

    #[test]
    fn test_small_sla_never_underflows() {
        let mut policy = Policy::default();
        policy
            .departments
            .get_mut(&Department::Admin)
            .unwrap()
            .sla_days = 1;
        assert_eq!(
            derive_status(0, Department::Admin, &policy).unwrap(),
            FileStatus::Delayed
        );
        assert_eq!(
            derive_status(3, Department::Admin, &policy).unwrap(),
            FileStatus::Critical
        );
    }

    #[test]
    fn test_status_filter_parsing() {
        assert_eq!("all".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!("On Time".parse::<StatusFilter>().unwrap(), StatusFilter::OnTime);
        assert_eq!("on-time".parse::<StatusFilter>().unwrap(), StatusFilter::OnTime);
        assert_eq!("DELAYED".parse::<StatusFilter>().unwrap(), StatusFilter::Delayed);
        assert_eq!("critical".parse::<StatusFilter>().unwrap(), StatusFilter::Critical);
        assert!("late".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn test_status_filter_matches() {
        assert!(StatusFilter::All.matches(FileStatus::Critical));
        assert!(StatusFilter::Delayed.matches(FileStatus::Delayed));
        assert!(!StatusFilter::Delayed.matches(FileStatus::OnTime));
    }
}
