// src/run/mod.rs

//! Plan execution.
//!
//! The runner walks an [`ExecutionPlan`] in order, skipping tasks whose
//! output artifact already exists, dispatching the rest and failing
//! dependents when an ancestor fails. With `max_parallel = 1` (the default)
//! execution follows plan order exactly; higher values let independent
//! branches overlap while dependency order is still honoured.

pub mod report;

pub use report::{RunReport, TaskStatus};

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::errors::TaskError;
use crate::graph::{ExecutionPlan, TaskGraph};
use crate::task::{Task, TaskName};

/// Knobs for one run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Maximum number of tasks in flight at once. `1` gives strictly
    /// sequential plan-order execution.
    pub max_parallel: usize,

    /// Per-task wall-clock limit; `None` means no limit.
    pub timeout: Option<Duration>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            max_parallel: 1,
            timeout: None,
        }
    }
}

/// Per-run state of a task. Exists only while `execute` is in progress;
/// nothing is carried between runs.
#[derive(Debug)]
enum RunState {
    /// In the plan, waiting on dependencies or a free slot.
    Pending,
    /// Dispatched and currently running.
    Running,
    /// Reached a terminal status.
    Done(TaskStatus),
}

/// Executes plans against a graph.
///
/// Failures never abort a run as a whole: they terminate the failed task's
/// descendants while the remaining branches continue, so artifacts from
/// healthy branches persist for the next attempt.
pub struct Runner {
    options: RunOptions,
}

impl Runner {
    pub fn new(options: RunOptions) -> Self {
        Self { options }
    }

    /// Execute every task in `plan`, returning the per-task outcomes.
    ///
    /// A task starts only once all of its dependencies are `Succeeded` or
    /// `Skipped`. A task whose output artifact already exists before it
    /// would start is recorded `Skipped` without running.
    pub async fn execute(&self, graph: &TaskGraph, plan: &ExecutionPlan) -> RunReport {
        let max_parallel = self.options.max_parallel.max(1);

        let mut states: HashMap<TaskName, RunState> = plan
            .iter()
            .map(|name| (name.to_string(), RunState::Pending))
            .collect();

        let (tx, mut rx) =
            mpsc::channel::<(TaskName, Result<(), TaskError>)>(plan.len().max(1));
        let mut running = 0usize;

        info!(tasks = plan.len(), max_parallel, "starting run");

        loop {
            // Dispatch everything currently ready, up to the parallel limit.
            while running < max_parallel {
                let Some(name) = next_ready(plan, graph, &states) else {
                    break;
                };

                let Some(task) = graph.task(&name).map(Arc::clone) else {
                    // Unreachable for a plan resolved from this graph.
                    warn!(task = %name, "task in plan but missing from graph");
                    states.insert(
                        name,
                        RunState::Done(TaskStatus::Failed(TaskError::failed(
                            "task missing from graph",
                        ))),
                    );
                    continue;
                };

                if let Some(output) = task.output() {
                    if output.exists() {
                        debug!(
                            task = %name,
                            artifact = %output.path().display(),
                            "output already present; skipping"
                        );
                        states.insert(name, RunState::Done(TaskStatus::Skipped));
                        continue;
                    }
                }

                debug!(task = %name, "dependencies satisfied; dispatching");
                states.insert(name.clone(), RunState::Running);
                running += 1;

                let tx = tx.clone();
                let limit = self.options.timeout;
                tokio::spawn(async move {
                    let result = run_with_timeout(task, limit).await;
                    let _ = tx.send((name, result)).await;
                });
            }

            if running == 0 {
                break;
            }

            let Some((name, result)) = rx.recv().await else {
                break;
            };
            running -= 1;

            match result {
                Ok(()) => {
                    debug!(task = %name, "task completed successfully");
                    states.insert(name, RunState::Done(TaskStatus::Succeeded));
                }
                Err(err) => {
                    warn!(task = %name, error = %err, "task failed; failing dependents");
                    mark_dependents_failed(graph, &mut states, &name);
                    states.insert(name, RunState::Done(TaskStatus::Failed(err)));
                }
            }
        }

        let mut run_report = RunReport::default();
        for (name, state) in states {
            match state {
                RunState::Done(status) => run_report.record(name, status),
                RunState::Pending | RunState::Running => {
                    // Unreachable for a well-formed plan; surface it rather
                    // than dropping the task from the report.
                    warn!(task = %name, "task never reached a terminal state");
                    run_report.record(
                        name,
                        TaskStatus::Failed(TaskError::failed(
                            "never reached a terminal state",
                        )),
                    );
                }
            }
        }
        run_report
    }
}

async fn run_with_timeout(
    task: Arc<dyn Task>,
    limit: Option<Duration>,
) -> Result<(), TaskError> {
    match limit {
        None => task.run().await,
        Some(limit) => match timeout(limit, task.run()).await {
            Ok(result) => result,
            Err(_) => Err(TaskError::Timeout(limit)),
        },
    }
}

/// First plan-order task that is pending with every dependency terminal and
/// counting towards success.
fn next_ready(
    plan: &ExecutionPlan,
    graph: &TaskGraph,
    states: &HashMap<TaskName, RunState>,
) -> Option<TaskName> {
    for name in plan.iter() {
        if !matches!(states.get(name), Some(RunState::Pending)) {
            continue;
        }

        let Some(task) = graph.task(name) else {
            continue;
        };

        let ready = task.dependencies().iter().all(|dep| {
            matches!(states.get(dep), Some(RunState::Done(status)) if status.is_ok())
        });

        if ready {
            return Some(name.to_string());
        }
    }
    None
}

/// Mark every not-yet-started transitive dependent of `failed` as
/// `UpstreamFailed`.
///
/// Dependents can only be `Pending` here: a task is dispatched after all of
/// its dependencies completed, so none of them can be running while an
/// ancestor is still able to fail. Sibling branches are left untouched.
fn mark_dependents_failed(
    graph: &TaskGraph,
    states: &mut HashMap<TaskName, RunState>,
    failed: &str,
) {
    let mut stack: Vec<TaskName> = graph.dependents_of(failed).to_vec();

    while let Some(name) = stack.pop() {
        if matches!(states.get(&name), Some(RunState::Pending)) {
            debug!(task = %name, failed = %failed, "dependency failed; will not run");
            states.insert(
                name.clone(),
                RunState::Done(TaskStatus::UpstreamFailed {
                    failed: failed.to_string(),
                }),
            );
            stack.extend(graph.dependents_of(&name).iter().cloned());
        }
    }
}
