use crate::config::Policy;
use crate::error::ConfigError;
use crate::model::CaseFile;

/// Share of the file's workflow template that is completed, 0 to 100.
///
/// Only stages tagged `completed` count; the current stage does not. A
/// closed file always reports 100 and an open one never does, even after
/// running past the end of its template.
pub fn progress_percent(file: &CaseFile, policy: &Policy) -> Result<u8, ConfigError> {
    let template = policy.workflow_for(file)?;
    if file.is_closed() {
        return Ok(100);
    }
    Ok(rounded_percent(file.completed_count(), template.stages.len()).min(OPEN_CEILING))
}

const OPEN_CEILING: u8 = 99;

/// `round(100 * completed / total)`, clamped to 100. `total` must be non-zero.
fn rounded_percent(completed: usize, total: usize) -> u8 {
    debug_assert!(total > 0);
    let completed = completed.min(total);
    let percent = (200 * completed + total) / (2 * total);
    percent as u8
}
