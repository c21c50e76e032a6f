// src/lib.rs

pub mod artifact;
pub mod cli;
pub mod config;
pub mod errors;
pub mod graph;
pub mod logging;
pub mod run;
pub mod task;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use tracing::info;

use crate::artifact::{ArtifactStore, ArtifactTarget, LocalStore};
use crate::cli::CliArgs;
use crate::config::load_and_validate;
use crate::config::model::ConfigFile;
use crate::graph::{ExecutionPlan, TaskGraph};
use crate::run::{RunOptions, RunReport, Runner};
use crate::task::{CommandTask, Task};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - an artifact store rooted at the config directory
/// - graph construction and plan resolution
/// - the runner and the final summary
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;

    let root = config_root_dir(&config_path);
    let store: Arc<dyn ArtifactStore> = Arc::new(LocalStore::new(&root));

    let graph = TaskGraph::new(tasks_from_config(&cfg, &root, &store))?;

    let terminals = match args.task {
        Some(ref task) => vec![task.clone()],
        None => graph.sink_tasks(),
    };
    let plan = graph.resolve_many(&terminals)?;

    if args.dry_run {
        print_dry_run(&cfg, &plan);
        return Ok(());
    }

    info!(terminals = ?terminals, tasks = plan.len(), "executing plan");

    let options = RunOptions {
        max_parallel: cfg.config.max_parallel,
        timeout: cfg.config.task_timeout().map_err(|e| anyhow!(e))?,
    };
    let report = Runner::new(options).execute(&graph, &plan).await;

    print_summary(&report);

    if report.success() {
        Ok(())
    } else {
        for (name, status) in report.failures() {
            eprintln!("task '{name}': {status}");
        }
        let failed = report.failures().count();
        Err(anyhow!(
            "{failed} of {} task(s) did not succeed",
            report.len()
        ))
    }
}

/// Build one command task per `[task.<name>]` entry.
fn tasks_from_config(
    cfg: &ConfigFile,
    root: &Path,
    store: &Arc<dyn ArtifactStore>,
) -> Vec<Arc<dyn Task>> {
    cfg.task
        .iter()
        .map(|(name, tc)| {
            let output = tc
                .output
                .as_ref()
                .map(|path| ArtifactTarget::new(Arc::clone(store), path));

            Arc::new(CommandTask::new(
                name.clone(),
                tc.cmd.clone(),
                root.to_path_buf(),
                tc.requires.clone(),
                output,
            )) as Arc<dyn Task>
        })
        .collect()
}

/// Directory that relative artifact paths and commands resolve against.
/// Currently: directory containing the config file, or `.`.
fn config_root_dir(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Per-task results, one line each.
fn print_summary(report: &RunReport) {
    println!("run summary ({} tasks):", report.len());
    for (name, status) in report.iter() {
        println!("  {name}: {status}");
    }
}

/// Simple dry-run output: tasks, dependencies, outputs, and the plan.
fn print_dry_run(cfg: &ConfigFile, plan: &ExecutionPlan) {
    println!("pipedag dry-run");
    println!("  config.max_parallel = {}", cfg.config.max_parallel);
    if let Some(ref timeout) = cfg.config.timeout {
        println!("  config.timeout = {timeout}");
    }
    println!();

    println!("tasks ({}):", cfg.task.len());
    for (name, task) in cfg.task.iter() {
        println!("  - {name}");
        println!("      cmd: {}", task.cmd);
        if let Some(ref output) = task.output {
            println!("      output: {output}");
        }
        if !task.requires.is_empty() {
            println!("      requires: {:?}", task.requires);
        }
    }

    println!();
    println!("plan:");
    for (idx, name) in plan.iter().enumerate() {
        println!("  {}. {name}", idx + 1);
    }
}
