// src/config/model.rs

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [config]
/// max_parallel = 2
/// timeout = "5m"
///
/// [task.extract_sales]
/// cmd = "python scripts/extract_sales.py > data/sales.csv"
/// output = "data/sales.csv"
///
/// [task.merge]
/// cmd = "python scripts/merge.py > data/merged.csv"
/// output = "data/merged.csv"
/// requires = ["extract_sales"]
/// ```
///
/// The `[config]` section is optional and has reasonable defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    /// Global run behaviour from `[config]`.
    #[serde(default)]
    pub config: ConfigSection,

    /// All tasks from `[task.<name>]`.
    ///
    /// Keys are the task names (e.g. `"extract_sales"`, `"merge"`).
    #[serde(default)]
    pub task: BTreeMap<String, TaskConfig>,
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// Maximum number of tasks in flight at once; `1` means strictly
    /// sequential execution in plan order.
    #[serde(default = "default_max_parallel")]
    pub max_parallel: usize,

    /// Optional per-task wall-clock limit, e.g. `"500ms"`, `"30s"`, `"5m"`.
    ///
    /// Absent means no limit.
    #[serde(default)]
    pub timeout: Option<String>,
}

fn default_max_parallel() -> usize {
    1
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            max_parallel: default_max_parallel(),
            timeout: None,
        }
    }
}

impl ConfigSection {
    /// Parsed form of `timeout`.
    pub fn task_timeout(&self) -> Result<Option<Duration>, String> {
        self.timeout.as_deref().map(parse_duration).transpose()
    }
}

/// `[task.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskConfig {
    /// Shell command to execute, run from the config file's directory.
    pub cmd: String,

    /// Output artifact path, relative to the config file's directory.
    ///
    /// A task without an output cannot signal completion and therefore
    /// runs on every invocation.
    #[serde(default)]
    pub output: Option<String>,

    /// Names of tasks that must complete before this one.
    #[serde(default)]
    pub requires: Vec<String>,
}

/// Parse a duration string with a unit suffix: `ms`, `s`, `m`, or `h`.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    // Find the boundary between digits and suffix.
    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| "duration missing unit suffix".to_string())?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    match unit.as_str() {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        "m" => Ok(Duration::from_secs(value * 60)),
        "h" => Ok(Duration::from_secs(value * 60 * 60)),
        _ => Err(format!(
            "unsupported duration unit '{}'; expected ms, s, m, or h",
            unit
        )),
    }
}
