// src/run/report.rs

use std::collections::BTreeMap;
use std::fmt;

use crate::errors::TaskError;
use crate::task::TaskName;

/// Final status of one task within a run.
#[derive(Debug)]
pub enum TaskStatus {
    /// Output artifact already existed; the task never ran.
    Skipped,
    /// The task ran and reported success.
    Succeeded,
    /// The task ran and failed.
    Failed(TaskError),
    /// Never attempted because a (transitive) dependency failed.
    UpstreamFailed { failed: TaskName },
}

impl TaskStatus {
    /// Whether this status counts towards overall run success.
    pub fn is_ok(&self) -> bool {
        matches!(self, TaskStatus::Skipped | TaskStatus::Succeeded)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Skipped => write!(f, "skipped (output already present)"),
            TaskStatus::Succeeded => write!(f, "succeeded"),
            TaskStatus::Failed(err) => write!(f, "failed: {err}"),
            TaskStatus::UpstreamFailed { failed } => {
                write!(f, "not run ('{failed}' failed upstream)")
            }
        }
    }
}

/// Per-task outcomes of one `Runner::execute` call.
///
/// Built incrementally during the run and handed back to the caller; the
/// runner keeps no state between runs.
#[derive(Debug, Default)]
pub struct RunReport {
    statuses: BTreeMap<TaskName, TaskStatus>,
}

impl RunReport {
    pub(crate) fn record(&mut self, name: impl Into<TaskName>, status: TaskStatus) {
        self.statuses.insert(name.into(), status);
    }

    pub fn status(&self, name: &str) -> Option<&TaskStatus> {
        self.statuses.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TaskStatus)> {
        self.statuses.iter().map(|(name, status)| (name.as_str(), status))
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    /// True when every task ended `Succeeded` or `Skipped`.
    pub fn success(&self) -> bool {
        self.statuses.values().all(TaskStatus::is_ok)
    }

    /// Tasks that did not succeed, for error reporting.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &TaskStatus)> {
        self.iter().filter(|(_, status)| !status.is_ok())
    }
}
