// src/task/mod.rs

//! Task abstraction.
//!
//! A task is a unit of work with a name, declared dependencies, an optional
//! output artifact, and a run action. Concrete tasks are distinct types
//! implementing [`Task`]; the scheduler composes trait objects and never
//! looks inside them.
//!
//! - [`command`] runs a shell command (the task type behind config entries).
//! - [`report`] reads upstream artifacts and writes a text summary.

use async_trait::async_trait;

use crate::artifact::ArtifactTarget;
use crate::errors::TaskError;

pub mod command;
pub mod report;

pub use command::CommandTask;
pub use report::ReportTask;

/// Public type alias for task names throughout the crate.
pub type TaskName = String;

/// A unit of work in the pipeline.
///
/// Implementations must be immutable after construction: the scheduler
/// derives completion from `output().exists()`, never from task state.
#[async_trait]
pub trait Task: Send + Sync {
    /// Unique name within a graph.
    fn name(&self) -> &str;

    /// Names of tasks that must complete before this one runs, in the order
    /// they were declared. Declaration order is the tie-break for
    /// otherwise-unordered siblings in the execution plan.
    fn dependencies(&self) -> &[TaskName];

    /// The artifact this task produces, if any.
    ///
    /// A task without an output has no way to signal completion and is
    /// re-run on every invocation; a task with an output is skipped when
    /// the artifact already exists.
    fn output(&self) -> Option<&ArtifactTarget>;

    /// Perform the work.
    ///
    /// Called only after every dependency has reported success, or was
    /// skipped with its artifact already present.
    async fn run(&self) -> Result<(), TaskError>;
}
