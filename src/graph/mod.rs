// src/graph/mod.rs

//! Task graph representation and plan resolution.
//!
//! - [`TaskGraph`] validates the declared tasks at construction time and
//!   keeps adjacency information for scheduling and diagnostics.
//! - [`resolve`] turns a terminal task into a deterministic
//!   [`ExecutionPlan`] via depth-first post-order traversal.

pub mod resolve;

pub use resolve::ExecutionPlan;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::errors::GraphError;
use crate::task::{Task, TaskName};

/// Validated task graph.
///
/// Construction checks the declarations the scheduler relies on later:
/// names are unique, every dependency refers to a declared task, no task
/// depends on itself, and no two tasks claim the same output artifact.
/// Cycles are detected at plan resolution, where the full cycle path can be
/// reported.
pub struct TaskGraph {
    /// Task declaration order; drives deterministic iteration.
    order: Vec<TaskName>,
    tasks: HashMap<TaskName, Arc<dyn Task>>,
    /// Direct dependents, in declaration order of the depending tasks.
    dependents: HashMap<TaskName, Vec<TaskName>>,
}

impl std::fmt::Debug for TaskGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskGraph")
            .field("order", &self.order)
            .field("dependents", &self.dependents)
            .finish_non_exhaustive()
    }
}

impl TaskGraph {
    /// Build a graph from the declared tasks.
    pub fn new(declared: Vec<Arc<dyn Task>>) -> Result<Self, GraphError> {
        let mut order = Vec::with_capacity(declared.len());
        let mut tasks: HashMap<TaskName, Arc<dyn Task>> = HashMap::new();

        for task in declared {
            let name = task.name().to_string();
            if tasks.contains_key(&name) {
                return Err(GraphError::DuplicateTask(name));
            }
            order.push(name.clone());
            tasks.insert(name, task);
        }

        // Dependency references and output ownership.
        let mut outputs: HashMap<PathBuf, TaskName> = HashMap::new();
        for name in &order {
            let task = &tasks[name];

            for dep in task.dependencies() {
                if dep == name {
                    return Err(GraphError::SelfDependency(name.clone()));
                }
                if !tasks.contains_key(dep) {
                    return Err(GraphError::UnknownDependency {
                        task: name.clone(),
                        dependency: dep.clone(),
                    });
                }
            }

            if let Some(output) = task.output() {
                let path = output.path().to_path_buf();
                if let Some(first) = outputs.insert(path, name.clone()) {
                    return Err(GraphError::DuplicateOutput {
                        first,
                        second: name.clone(),
                        output: output.path().display().to_string(),
                    });
                }
            }
        }

        // Dependents adjacency, populated from the dependency lists.
        let mut dependents: HashMap<TaskName, Vec<TaskName>> = HashMap::new();
        for name in &order {
            for dep in tasks[name].dependencies() {
                dependents.entry(dep.clone()).or_default().push(name.clone());
            }
        }

        Ok(Self {
            order,
            tasks,
            dependents,
        })
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Look up a task by name.
    pub fn task(&self, name: &str) -> Option<&Arc<dyn Task>> {
        self.tasks.get(name)
    }

    /// All task names, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|s| s.as_str())
    }

    /// Immediate dependents of a task (tasks that list it in their
    /// dependencies).
    pub fn dependents_of(&self, name: &str) -> &[TaskName] {
        self.dependents
            .get(name)
            .map(|names| names.as_slice())
            .unwrap_or(&[])
    }

    /// Tasks nothing depends on; the default terminals when a run names
    /// none.
    pub fn sink_tasks(&self) -> Vec<TaskName> {
        self.order
            .iter()
            .filter(|name| self.dependents_of(name).is_empty())
            .cloned()
            .collect()
    }
}
