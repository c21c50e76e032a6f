use std::error::Error;
use std::fs;
use std::path::Path;

use pipedag::cli::CliArgs;
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn Error>>;

fn args(config: &Path, task: Option<&str>) -> CliArgs {
    CliArgs {
        task: task.map(|s| s.to_string()),
        config: config.display().to_string(),
        log_level: None,
        dry_run: false,
    }
}

#[tokio::test]
async fn command_pipeline_writes_artifacts() -> TestResult {
    let dir = TempDir::new()?;
    let config_path = dir.path().join("Pipedag.toml");
    fs::write(
        &config_path,
        r#"
[task.extract_a]
cmd = "echo 'id,amount' > a.csv"
output = "a.csv"

[task.extract_b]
cmd = "echo 'id,name' > b.csv"
output = "b.csv"

[task.merge]
cmd = "mkdir -p data && cat a.csv b.csv > data/merged.csv"
output = "data/merged.csv"
requires = ["extract_a", "extract_b"]
"#,
    )?;

    pipedag::run(args(&config_path, None)).await?;

    assert!(dir.path().join("a.csv").is_file());
    assert!(dir.path().join("b.csv").is_file());

    let merged = fs::read_to_string(dir.path().join("data/merged.csv"))?;
    assert!(merged.contains("id,amount"));
    assert!(merged.contains("id,name"));
    Ok(())
}

#[tokio::test]
async fn second_invocation_skips_completed_tasks() -> TestResult {
    let dir = TempDir::new()?;
    let config_path = dir.path().join("Pipedag.toml");
    fs::write(
        &config_path,
        r#"
[task.extract]
cmd = "echo fresh > out.csv"
output = "out.csv"
"#,
    )?;

    pipedag::run(args(&config_path, None)).await?;

    // Overwrite the artifact; a second run must not touch it.
    fs::write(dir.path().join("out.csv"), "sentinel\n")?;
    pipedag::run(args(&config_path, None)).await?;

    assert_eq!(fs::read_to_string(dir.path().join("out.csv"))?, "sentinel\n");
    Ok(())
}

#[tokio::test]
async fn failing_command_fails_run_and_dependents() -> TestResult {
    let dir = TempDir::new()?;
    let config_path = dir.path().join("Pipedag.toml");
    fs::write(
        &config_path,
        r#"
[task.boom]
cmd = "exit 3"
output = "never.csv"

[task.after]
cmd = "echo done > after.csv"
output = "after.csv"
requires = ["boom"]
"#,
    )?;

    let result = pipedag::run(args(&config_path, None)).await;

    assert!(result.is_err());
    assert!(!dir.path().join("never.csv").exists());
    assert!(!dir.path().join("after.csv").exists());
    Ok(())
}

#[tokio::test]
async fn named_terminal_limits_the_plan() -> TestResult {
    let dir = TempDir::new()?;
    let config_path = dir.path().join("Pipedag.toml");
    fs::write(
        &config_path,
        r#"
[task.a]
cmd = "echo a > a.csv"
output = "a.csv"

[task.b]
cmd = "cat a.csv > b.csv"
output = "b.csv"
requires = ["a"]

[task.unrelated]
cmd = "echo c > c.csv"
output = "c.csv"
"#,
    )?;

    pipedag::run(args(&config_path, Some("b"))).await?;

    assert!(dir.path().join("a.csv").is_file());
    assert!(dir.path().join("b.csv").is_file());
    assert!(!dir.path().join("c.csv").exists());
    Ok(())
}

#[tokio::test]
async fn dry_run_executes_nothing() -> TestResult {
    let dir = TempDir::new()?;
    let config_path = dir.path().join("Pipedag.toml");
    fs::write(
        &config_path,
        r#"
[task.extract]
cmd = "echo a > a.csv"
output = "a.csv"
"#,
    )?;

    let mut cli = args(&config_path, None);
    cli.dry_run = true;
    pipedag::run(cli).await?;

    assert!(!dir.path().join("a.csv").exists());
    Ok(())
}
