use std::error::Error;
use std::sync::Arc;

use async_trait::async_trait;
use pipedag::artifact::{ArtifactStore, ArtifactTarget, MemoryStore};
use pipedag::errors::{GraphError, TaskError};
use pipedag::graph::TaskGraph;
use pipedag::task::{Task, TaskName};

type TestResult = Result<(), Box<dyn Error>>;

struct DeclaredTask {
    name: TaskName,
    requires: Vec<TaskName>,
    output: Option<ArtifactTarget>,
}

impl DeclaredTask {
    fn new(name: &str, requires: &[&str]) -> Arc<dyn Task> {
        Arc::new(Self {
            name: name.to_string(),
            requires: requires.iter().map(|s| s.to_string()).collect(),
            output: None,
        })
    }

    fn with_output(name: &str, requires: &[&str], output: ArtifactTarget) -> Arc<dyn Task> {
        Arc::new(Self {
            name: name.to_string(),
            requires: requires.iter().map(|s| s.to_string()).collect(),
            output: Some(output),
        })
    }
}

#[async_trait]
impl Task for DeclaredTask {
    fn name(&self) -> &str {
        &self.name
    }

    fn dependencies(&self) -> &[TaskName] {
        &self.requires
    }

    fn output(&self) -> Option<&ArtifactTarget> {
        self.output.as_ref()
    }

    async fn run(&self) -> Result<(), TaskError> {
        Ok(())
    }
}

#[test]
fn plan_orders_dependencies_before_dependents() -> TestResult {
    let graph = TaskGraph::new(vec![
        DeclaredTask::new("a", &[]),
        DeclaredTask::new("b", &["a"]),
        DeclaredTask::new("c", &["b"]),
    ])?;

    let plan = graph.resolve("c")?;
    assert_eq!(plan.order(), ["a", "b", "c"]);
    Ok(())
}

#[test]
fn diamond_dependency_appears_exactly_once() -> TestResult {
    // Declaration order of the extracts deliberately differs from the
    // transform's requires order.
    let graph = TaskGraph::new(vec![
        DeclaredTask::new("z", &[]),
        DeclaredTask::new("y", &[]),
        DeclaredTask::new("x", &[]),
        DeclaredTask::new("transform", &["x", "y", "z"]),
        DeclaredTask::new("report", &["transform"]),
    ])?;

    let plan = graph.resolve("report")?;
    assert_eq!(plan.order(), ["x", "y", "z", "transform", "report"]);

    let transform = plan.position("transform").ok_or("transform not in plan")?;
    for extract in ["x", "y", "z"] {
        let pos = plan.position(extract).ok_or("extract not in plan")?;
        assert!(pos < transform);
    }
    Ok(())
}

#[test]
fn sibling_order_follows_declared_requires() -> TestResult {
    let graph = TaskGraph::new(vec![
        DeclaredTask::new("x", &[]),
        DeclaredTask::new("y", &[]),
        DeclaredTask::new("t", &["y", "x"]),
    ])?;

    let plan = graph.resolve("t")?;
    assert_eq!(plan.order(), ["y", "x", "t"]);
    Ok(())
}

#[test]
fn shared_dependency_resolves_once_across_terminals() -> TestResult {
    let graph = TaskGraph::new(vec![
        DeclaredTask::new("base", &[]),
        DeclaredTask::new("left", &["base"]),
        DeclaredTask::new("right", &["base"]),
    ])?;

    let plan = graph.resolve_many(&["left", "right"])?;
    assert_eq!(plan.order(), ["base", "left", "right"]);
    Ok(())
}

#[test]
fn cycle_reports_full_path() -> TestResult {
    // Construction does not walk the graph; the cycle surfaces at resolve.
    let graph = TaskGraph::new(vec![
        DeclaredTask::new("a", &["b"]),
        DeclaredTask::new("b", &["c"]),
        DeclaredTask::new("c", &["a"]),
    ])?;

    match graph.resolve("a") {
        Err(GraphError::CycleDetected { path }) => {
            assert_eq!(path.len(), 4);
            assert_eq!(path.first().map(String::as_str), Some("a"));
            assert_eq!(path.last().map(String::as_str), Some("a"));
            assert!(path.contains(&"b".to_string()));
            assert!(path.contains(&"c".to_string()));
        }
        other => panic!("expected CycleDetected, got {other:?}"),
    }
    Ok(())
}

#[test]
fn unknown_terminal_is_rejected() -> TestResult {
    let graph = TaskGraph::new(vec![DeclaredTask::new("a", &[])])?;

    assert!(matches!(
        graph.resolve("ghost"),
        Err(GraphError::UnknownTask(name)) if name == "ghost"
    ));
    Ok(())
}

#[test]
fn construction_rejects_unknown_dependency() {
    let err = TaskGraph::new(vec![DeclaredTask::new("a", &["ghost"])]).unwrap_err();
    assert!(matches!(err, GraphError::UnknownDependency { .. }));
}

#[test]
fn construction_rejects_self_dependency() {
    let err = TaskGraph::new(vec![DeclaredTask::new("a", &["a"])]).unwrap_err();
    assert!(matches!(err, GraphError::SelfDependency(name) if name == "a"));
}

#[test]
fn construction_rejects_duplicate_names() {
    let err = TaskGraph::new(vec![
        DeclaredTask::new("a", &[]),
        DeclaredTask::new("a", &[]),
    ])
    .unwrap_err();
    assert!(matches!(err, GraphError::DuplicateTask(name) if name == "a"));
}

#[test]
fn construction_rejects_duplicate_outputs() {
    let store: Arc<dyn ArtifactStore> = Arc::new(MemoryStore::new());

    let err = TaskGraph::new(vec![
        DeclaredTask::with_output("a", &[], ArtifactTarget::new(Arc::clone(&store), "shared.csv")),
        DeclaredTask::with_output("b", &[], ArtifactTarget::new(Arc::clone(&store), "shared.csv")),
    ])
    .unwrap_err();
    assert!(matches!(err, GraphError::DuplicateOutput { .. }));
}
