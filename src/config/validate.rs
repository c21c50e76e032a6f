// src/config/validate.rs

use std::collections::HashMap;

use anyhow::{anyhow, Context, Result};
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::ConfigFile;

/// Run semantic validation against a loaded configuration.
///
/// This checks:
/// - there is at least one task
/// - `max_parallel >= 1` and `timeout` (if set) parses
/// - all `requires` entries refer to existing, different tasks
/// - no two tasks declare the same `output`
/// - the task graph has no cycles
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    ensure_has_tasks(cfg)?;
    validate_run_config(cfg)?;
    validate_task_references(cfg)?;
    validate_output_ownership(cfg)?;
    validate_acyclic(cfg)?;
    Ok(())
}

fn ensure_has_tasks(cfg: &ConfigFile) -> Result<()> {
    if cfg.task.is_empty() {
        return Err(anyhow!(
            "config must contain at least one [task.<name>] section"
        ));
    }
    Ok(())
}

fn validate_run_config(cfg: &ConfigFile) -> Result<()> {
    if cfg.config.max_parallel == 0 {
        return Err(anyhow!("[config].max_parallel must be >= 1 (got 0)"));
    }

    cfg.config
        .task_timeout()
        .map_err(|e| anyhow!(e))
        .context("invalid [config].timeout")?;

    Ok(())
}

fn validate_task_references(cfg: &ConfigFile) -> Result<()> {
    for (name, task) in cfg.task.iter() {
        for dep in task.requires.iter() {
            if !cfg.task.contains_key(dep) {
                return Err(anyhow!(
                    "task '{}' has unknown dependency '{}' in `requires`",
                    name,
                    dep
                ));
            }
            if dep == name {
                return Err(anyhow!(
                    "task '{}' cannot depend on itself in `requires`",
                    name
                ));
            }
        }
    }
    Ok(())
}

fn validate_output_ownership(cfg: &ConfigFile) -> Result<()> {
    let mut owners: HashMap<&str, &str> = HashMap::new();

    for (name, task) in cfg.task.iter() {
        if let Some(output) = task.output.as_deref() {
            if let Some(first) = owners.insert(output, name) {
                return Err(anyhow!(
                    "tasks '{}' and '{}' both declare output '{}'",
                    first,
                    name,
                    output
                ));
            }
        }
    }
    Ok(())
}

fn validate_acyclic(cfg: &ConfigFile) -> Result<()> {
    // Build a petgraph graph from the tasks and their dependencies.
    //
    // Edge direction: dependency -> dependent
    // For:
    //   [task.merge]
    //   requires = ["extract_sales"]
    // we add edge extract_sales -> merge.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for name in cfg.task.keys() {
        graph.add_node(name.as_str());
    }

    for (name, task) in cfg.task.iter() {
        for dep in task.requires.iter() {
            graph.add_edge(dep.as_str(), name.as_str(), ());
        }
    }

    // A topological sort will fail if there is a cycle.
    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => {
            let node = cycle.node_id();
            Err(anyhow!(
                "cycle detected in task graph involving task '{}'",
                node
            ))
        }
    }
}
