// src/errors.rs

//! Crate-wide error types.
//!
//! [`GraphError`] covers graph construction and plan resolution; all of its
//! variants are fatal before execution starts, so nothing is partially run.
//! [`TaskError`] covers failures inside a single task's run and stays local
//! to that task's branch of the graph.

use std::time::Duration;

use thiserror::Error;

/// Errors raised while building a task graph or resolving an execution plan.
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("duplicate task name '{0}'")]
    DuplicateTask(String),

    #[error("task '{task}' requires unknown task '{dependency}'")]
    UnknownDependency { task: String, dependency: String },

    #[error("task '{0}' requires itself")]
    SelfDependency(String),

    #[error("tasks '{first}' and '{second}' both declare output '{output}'")]
    DuplicateOutput {
        first: String,
        second: String,
        output: String,
    },

    #[error("unknown task '{0}'")]
    UnknownTask(String),

    #[error("dependency cycle: {}", .path.join(" -> "))]
    CycleDetected { path: Vec<String> },
}

/// Errors raised by a single task's `run`.
#[derive(Error, Debug)]
pub enum TaskError {
    /// Opening or accessing an artifact failed.
    #[error("artifact I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The task's command exited with a non-zero status.
    #[error("command exited with code {0}")]
    CommandFailed(i32),

    /// The task exceeded the configured per-task time limit.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// The task's own logic reported an error.
    #[error("{0}")]
    Failed(String),
}

impl TaskError {
    /// Shorthand for a task-logic failure with a message.
    pub fn failed(msg: impl Into<String>) -> Self {
        TaskError::Failed(msg.into())
    }
}
