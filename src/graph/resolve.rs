// src/graph/resolve.rs

use std::collections::HashSet;

use tracing::debug;

use crate::errors::GraphError;
use crate::graph::TaskGraph;
use crate::task::TaskName;

/// Ordered sequence of task names satisfying the dependency partial order:
/// every task appears after all of its dependencies.
///
/// Derived per run, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPlan {
    order: Vec<TaskName>,
}

impl ExecutionPlan {
    pub fn order(&self) -> &[TaskName] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Position of a task within the plan.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.order.iter().position(|n| n == name)
    }
}

impl TaskGraph {
    /// Resolve the dependency closure of `terminal` into an execution plan.
    pub fn resolve(&self, terminal: &str) -> Result<ExecutionPlan, GraphError> {
        self.resolve_many(&[terminal])
    }

    /// Resolve several terminals into one merged plan.
    ///
    /// Dependencies shared between terminals appear exactly once. Sibling
    /// tasks with no ordering constraint between them keep the order in
    /// which they were declared as dependencies, so plans are reproducible.
    pub fn resolve_many<S: AsRef<str>>(
        &self,
        terminals: &[S],
    ) -> Result<ExecutionPlan, GraphError> {
        let mut resolver = Resolver {
            graph: self,
            resolved: HashSet::new(),
            visiting: Vec::new(),
            order: Vec::new(),
        };

        for terminal in terminals {
            let name = terminal.as_ref();
            if self.task(name).is_none() {
                return Err(GraphError::UnknownTask(name.to_string()));
            }
            resolver.visit(name)?;
        }

        debug!(tasks = resolver.order.len(), "resolved execution plan");
        Ok(ExecutionPlan {
            order: resolver.order,
        })
    }
}

/// Depth-first post-order walk.
///
/// `visiting` doubles as the current traversal path, so a back-edge can
/// report the whole cycle rather than a single involved task. `resolved`
/// keeps shared dependencies (the diamond case) from being emitted twice.
struct Resolver<'g> {
    graph: &'g TaskGraph,
    resolved: HashSet<TaskName>,
    visiting: Vec<TaskName>,
    order: Vec<TaskName>,
}

impl Resolver<'_> {
    fn visit(&mut self, name: &str) -> Result<(), GraphError> {
        if self.resolved.contains(name) {
            return Ok(());
        }

        if let Some(pos) = self.visiting.iter().position(|n| n == name) {
            let mut path: Vec<TaskName> = self.visiting[pos..].to_vec();
            path.push(name.to_string());
            return Err(GraphError::CycleDetected { path });
        }

        let deps: Vec<TaskName> = match self.graph.task(name) {
            Some(task) => task.dependencies().to_vec(),
            None => return Err(GraphError::UnknownTask(name.to_string())),
        };

        self.visiting.push(name.to_string());
        for dep in &deps {
            self.visit(dep)?;
        }
        self.visiting.pop();

        self.resolved.insert(name.to_string());
        self.order.push(name.to_string());
        Ok(())
    }
}
