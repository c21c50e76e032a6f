// src/task/command.rs

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

use crate::artifact::ArtifactTarget;
use crate::errors::TaskError;
use crate::task::{Task, TaskName};

/// Task that runs a shell command from a working directory.
///
/// This is the task type behind `[task.<name>]` config entries. The command
/// itself is responsible for producing the declared output artifact; the
/// scheduler only consults the artifact's existence before the run.
pub struct CommandTask {
    name: TaskName,
    cmd: String,
    workdir: PathBuf,
    requires: Vec<TaskName>,
    output: Option<ArtifactTarget>,
}

impl CommandTask {
    pub fn new(
        name: impl Into<TaskName>,
        cmd: impl Into<String>,
        workdir: impl Into<PathBuf>,
        requires: Vec<TaskName>,
        output: Option<ArtifactTarget>,
    ) -> Self {
        Self {
            name: name.into(),
            cmd: cmd.into(),
            workdir: workdir.into(),
            requires,
            output,
        }
    }

    pub fn cmd(&self) -> &str {
        &self.cmd
    }
}

#[async_trait]
impl Task for CommandTask {
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
        info!(task = %self.name, cmd = %self.cmd, "starting task command");

        // Build a shell command appropriate for the platform.
        let mut cmd = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(&self.cmd);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(&self.cmd);
            c
        };

        cmd.current_dir(&self.workdir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn()?;

        // Consume both pipes so OS buffers never fill; log lines at debug.
        if let Some(stdout) = child.stdout.take() {
            spawn_line_logger(self.name.clone(), "stdout", stdout);
        }
        if let Some(stderr) = child.stderr.take() {
            spawn_line_logger(self.name.clone(), "stderr", stderr);
        }

        let status = child.wait().await?;
        let code = status.code().unwrap_or(-1);

        debug!(
            task = %self.name,
            exit_code = code,
            success = status.success(),
            "task command exited"
        );

        if status.success() {
            Ok(())
        } else {
            Err(TaskError::CommandFailed(code))
        }
    }
}

fn spawn_line_logger<R>(task: TaskName, stream: &'static str, pipe: R)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let reader = BufReader::new(pipe);
        let mut lines = reader.lines();

        while let Ok(Some(line)) = lines.next_line().await {
            debug!(task = %task, "{stream}: {line}");
        }
    });
}
