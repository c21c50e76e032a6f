// src/task/report.rs

use async_trait::async_trait;

use crate::artifact::ArtifactTarget;
use crate::errors::TaskError;
use crate::task::{Task, TaskName};

/// Terminal summary task: reads every input artifact and writes one line per
/// input (path, byte count, line count) to its own output artifact.
///
/// The exact format is owned by this task, not by the scheduler; pipelines
/// wanting a different report shape supply their own task type.
pub struct ReportTask {
    name: TaskName,
    requires: Vec<TaskName>,
    inputs: Vec<ArtifactTarget>,
    output: ArtifactTarget,
}

impl ReportTask {
    pub fn new(
        name: impl Into<TaskName>,
        requires: Vec<TaskName>,
        inputs: Vec<ArtifactTarget>,
        output: ArtifactTarget,
    ) -> Self {
        Self {
            name: name.into(),
            requires,
            inputs,
            output,
        }
    }
}

#[async_trait]
impl Task for ReportTask {
    fn name(&self) -> &str {
        &self.name
    }

    fn dependencies(&self) -> &[TaskName] {
        &self.requires
    }

    fn output(&self) -> Option<&ArtifactTarget> {
        Some(&self.output)
    }

    async fn run(&self) -> Result<(), TaskError> {
        let mut summary = String::new();

        for input in &self.inputs {
            let contents = input.read_to_string()?;
            summary.push_str(&format!(
                "{}: {} bytes, {} lines\n",
                input.path().display(),
                contents.len(),
                contents.lines().count(),
            ));
        }

        self.output.write_all(summary.as_bytes())?;
        Ok(())
    }
}
