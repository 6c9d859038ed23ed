// tests/engine_execution.rs

mod common;
use crate::common::{diag_file, diagnostic_blocks, init_tracing, mock_engine, root, work_dir};

use std::error::Error;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tempfile::TempDir;

use silentcmd::config::{Configuration, DefaultsFile};
use silentcmd::engine::ExecutionEngine;
use silentcmd::errors::{Result as LaunchResult, SilentCmdError};
use silentcmd::exec::ProcessRunner;
use silentcmd::fs::mock::MockFileSystem;
use silentcmd::launch::{DEFAULT_POWERSHELL_PATH, FixedLocator, LaunchPlan};
use silentcmd::log_sink::LogWriter;
use silentcmd::types::{EXIT_INTERNAL_ERROR, EXIT_NO_LAUNCHER, EXIT_SUCCESS};
use silentcmd_test_utils::builders::ConfigurationBuilder;
use silentcmd_test_utils::fake_runner::RecordingRunner;

type TestResult = std::result::Result<(), Box<dyn Error>>;

fn log_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn batch_file_runs_with_raw_arguments_and_passes_exit_code_through() -> TestResult {
    init_tracing();

    let fs = MockFileSystem::new();
    let runner = RecordingRunner::exiting_with(42);
    let engine = mock_engine(&fs, FixedLocator::new(), &runner, &[]);

    let cfg = ConfigurationBuilder::new("script.bat").arguments("A B").build();
    let result = engine.execute(&cfg).await;

    assert_eq!(result.exit_code, 42);
    assert!(result.error.is_none());

    let runs = runner.runs();
    assert_eq!(runs.len(), 1);
    assert_eq!(
        runs[0].plan,
        LaunchPlan {
            launcher: PathBuf::from("script.bat"),
            command: "A B".to_string(),
        }
    );
    assert_eq!(runs[0].working_dir, None);

    Ok(())
}

#[tokio::test]
async fn child_exit_code_zero_is_success() {
    init_tracing();

    let fs = MockFileSystem::new();
    let runner = RecordingRunner::exiting_with(0);
    let engine = mock_engine(&fs, FixedLocator::new(), &runner, &[]);

    let result = engine
        .execute(&ConfigurationBuilder::new("ok.cmd").build())
        .await;

    assert_eq!(result.exit_code, EXIT_SUCCESS);
    assert!(!result.is_internal_error());
}

#[tokio::test]
async fn resolved_script_runs_from_its_own_directory() {
    init_tracing();

    let bin = root().join("bin");
    let fs = MockFileSystem::new();
    fs.add_file(bin.join("nightly.cmd"), "");
    let runner = RecordingRunner::exiting_with(0);
    let engine = mock_engine(&fs, FixedLocator::new(), &runner, &[&bin]);

    let result = engine
        .execute(&ConfigurationBuilder::new("nightly").arguments("--full").build())
        .await;

    assert_eq!(result.exit_code, 0);
    let runs = runner.runs();
    assert_eq!(runs[0].plan.launcher, bin.join("nightly.cmd"));
    assert_eq!(runs[0].plan.command, "--full");
    assert_eq!(runs[0].working_dir.as_deref(), Some(bin.as_path()));

    let blocks = diagnostic_blocks(&fs);
    assert_eq!(blocks.len(), 1);
    let block = &blocks[0];
    assert!(block.starts_with("Timestamp"));
    assert!(block.contains(&format!("Filename  : {}", bin.join("nightly.cmd").display())));
    assert!(block.contains("Arguments : --full"));
    assert!(block.contains(&format!("Directory : {}", bin.display())));
    assert!(block.contains("Exit code : 0"));
    assert!(!block.contains("Exception"));
}

#[tokio::test]
async fn relative_script_in_a_subdirectory_is_launched_by_full_path() {
    init_tracing();

    let fs = MockFileSystem::new();
    let runner = RecordingRunner::exiting_with(0);
    let engine = mock_engine(&fs, FixedLocator::new(), &runner, &[]);

    let nested = Path::new("sub").join("job.bat");
    engine
        .execute(&ConfigurationBuilder::new(&nested.to_string_lossy()).build())
        .await;

    let runs = runner.runs();
    assert_eq!(runs[0].plan.launcher, work_dir().join(&nested));
    assert_eq!(runs[0].working_dir, Some(work_dir().join("sub")));
}

#[tokio::test]
async fn unsupported_file_type_exits_with_two_without_spawning() {
    init_tracing();

    let fs = MockFileSystem::new();
    let runner = RecordingRunner::exiting_with(0);
    let engine = mock_engine(&fs, FixedLocator::new(), &runner, &[]);

    let result = engine
        .execute(&ConfigurationBuilder::new("missing.xyz").build())
        .await;

    assert_eq!(result.exit_code, EXIT_NO_LAUNCHER);
    assert_eq!(runner.run_count(), 0);

    let unsupported: Vec<_> = result
        .diagnostic_text
        .lines()
        .filter(|l| l.starts_with("Unsupported"))
        .collect();
    assert_eq!(unsupported, vec!["Unsupported : missing.xyz"]);
    assert!(result.diagnostic_text.contains("Error       : missing.xyz"));

    assert_eq!(diagnostic_blocks(&fs).len(), 1);
}

#[tokio::test]
async fn missing_interpreter_exits_with_two_without_spawning() {
    init_tracing();

    for script in ["report.py", "job.ps1"] {
        let fs = MockFileSystem::new();
        let runner = RecordingRunner::exiting_with(0);
        let engine = mock_engine(&fs, FixedLocator::new(), &runner, &[]);

        let result = engine.execute(&ConfigurationBuilder::new(script).build()).await;

        assert_eq!(result.exit_code, EXIT_NO_LAUNCHER, "{script}");
        assert_eq!(runner.run_count(), 0, "{script}");
        assert!(!result.diagnostic_text.contains("Unsupported"));
        assert!(result.diagnostic_text.contains(&format!("Error     : {script}")));
    }
}

#[tokio::test]
async fn powershell_default_install_is_used_when_lookup_fails() {
    init_tracing();

    let fs = MockFileSystem::new();
    fs.add_file(DEFAULT_POWERSHELL_PATH, "");
    let runner = RecordingRunner::exiting_with(0);
    let engine = mock_engine(&fs, FixedLocator::new(), &runner, &[]);

    let cfg = ConfigurationBuilder::new("job.ps1")
        .arguments("X /LOG:out.txt")
        .build();
    let result = engine.execute(&cfg).await;

    assert_eq!(result.exit_code, 0);
    let runs = runner.runs();
    assert_eq!(runs[0].plan.launcher, PathBuf::from(DEFAULT_POWERSHELL_PATH));
    assert_eq!(runs[0].plan.command, "-file \"job.ps1\" X /LOG:out.txt");
}

#[tokio::test]
async fn python_script_found_in_current_directory_is_quoted() {
    init_tracing();

    let python = root().join("python").join("python.exe");
    let fs = MockFileSystem::new();
    fs.add_file(&python, "");
    fs.add_file(work_dir().join("report.py"), "");
    let runner = RecordingRunner::exiting_with(3);
    let engine = mock_engine(
        &fs,
        FixedLocator::new().with("python", &python),
        &runner,
        &[],
    );

    let result = engine
        .execute(&ConfigurationBuilder::new("report.py").arguments("a b").build())
        .await;

    assert_eq!(result.exit_code, 3);
    let runs = runner.runs();
    assert_eq!(runs[0].plan.launcher, python);
    assert_eq!(
        runs[0].plan.command,
        format!("\"{}\" a b", work_dir().join("report.py").display())
    );
    assert_eq!(runs[0].working_dir, Some(work_dir()));
}

#[tokio::test]
async fn spawn_failure_exits_with_one_and_records_exception() {
    init_tracing();

    let fs = MockFileSystem::new();
    let runner = RecordingRunner::failing_to_start();
    let engine = mock_engine(&fs, FixedLocator::new(), &runner, &[]);

    let result = engine
        .execute(&ConfigurationBuilder::new("broken.bat").build())
        .await;

    assert_eq!(result.exit_code, EXIT_INTERNAL_ERROR);
    let message = result.error.clone().expect("error message must be reported");
    assert!(message.contains("broken.bat"));

    let blocks = diagnostic_blocks(&fs);
    assert_eq!(blocks.len(), 1);
    assert!(blocks[0].contains("Filename  : broken.bat"));
    assert!(blocks[0].contains(&format!("Exception : {message}")));
    assert!(!blocks[0].contains("Exit code"));
}

#[tokio::test]
async fn output_lines_are_logged_in_order_with_child_exit_code() -> TestResult {
    init_tracing();

    let dir = TempDir::new()?;
    let log = dir.path().join("out.txt");

    let fs = MockFileSystem::new();
    let runner = RecordingRunner::exiting_with(5).with_output(&["one", "two", "three"]);
    let engine = mock_engine(&fs, FixedLocator::new(), &runner, &[]);

    let cfg = ConfigurationBuilder::new("job.bat").log_file(&log).build();
    let result = engine.execute(&cfg).await;

    assert_eq!(result.exit_code, 5);
    assert_eq!(
        log_lines(&log),
        vec![
            "Starting command job.bat",
            "one",
            "two",
            "three",
            "Finished command job.bat",
        ]
    );
    Ok(())
}

#[tokio::test]
async fn log_append_keeps_previous_runs() -> TestResult {
    init_tracing();

    let dir = TempDir::new()?;
    let log = dir.path().join("out.txt");
    std::fs::write(&log, "earlier run\n")?;

    let fs = MockFileSystem::new();
    let runner = RecordingRunner::exiting_with(0).with_output(&["now"]);
    let engine = mock_engine(&fs, FixedLocator::new(), &runner, &[]);

    let appended = ConfigurationBuilder::new("job.bat")
        .log_file(&log)
        .append(true)
        .build();
    engine.execute(&appended).await;
    assert_eq!(log_lines(&log)[0], "earlier run");
    assert!(log_lines(&log).contains(&"now".to_string()));

    let truncated = ConfigurationBuilder::new("job.bat").log_file(&log).build();
    engine.execute(&truncated).await;
    assert_eq!(log_lines(&log)[0], "Starting command job.bat");
    assert!(!log_lines(&log).contains(&"earlier run".to_string()));

    Ok(())
}

#[tokio::test]
async fn unopenable_log_file_is_an_internal_error() -> TestResult {
    init_tracing();

    let dir = TempDir::new()?;
    let log = dir.path().join("no-such-dir").join("out.txt");

    let fs = MockFileSystem::new();
    let runner = RecordingRunner::exiting_with(0);
    let engine = mock_engine(&fs, FixedLocator::new(), &runner, &[]);

    let result = engine
        .execute(&ConfigurationBuilder::new("job.bat").log_file(&log).build())
        .await;

    assert_eq!(result.exit_code, EXIT_INTERNAL_ERROR);
    assert_eq!(runner.run_count(), 0);
    assert!(diagnostic_blocks(&fs)[0].contains("Exception"));
    Ok(())
}

#[tokio::test]
async fn help_exits_with_zero_without_running_anything() {
    init_tracing();

    let fs = MockFileSystem::new();
    let runner = RecordingRunner::exiting_with(9);
    let engine = mock_engine(&fs, FixedLocator::new(), &runner, &[]);

    let result = engine.execute(&ConfigurationBuilder::help().build()).await;

    assert_eq!(result.exit_code, EXIT_SUCCESS);
    assert_eq!(runner.run_count(), 0);
    assert_eq!(diagnostic_blocks(&fs).len(), 1);
}

#[tokio::test]
async fn zero_delay_neither_sleeps_nor_logs() -> TestResult {
    init_tracing();

    let dir = TempDir::new()?;
    let log = dir.path().join("out.txt");

    let fs = MockFileSystem::new();
    let runner = RecordingRunner::exiting_with(0);
    let engine = mock_engine(&fs, FixedLocator::new(), &runner, &[]);

    let started = Instant::now();
    let cfg = ConfigurationBuilder::new("job.bat")
        .log_file(&log)
        .delay(Duration::ZERO)
        .build();
    engine.execute(&cfg).await;

    assert!(runner.runs()[0].started_at - started < Duration::from_secs(1));
    assert!(!log_lines(&log).iter().any(|l| l.starts_with("Delaying execution")));
    Ok(())
}

#[tokio::test]
async fn positive_delay_is_waited_out_before_spawning() -> TestResult {
    init_tracing();

    let dir = TempDir::new()?;
    let log = dir.path().join("out.txt");

    let fs = MockFileSystem::new();
    let runner = RecordingRunner::exiting_with(0);
    let engine = mock_engine(&fs, FixedLocator::new(), &runner, &[]);

    let started = Instant::now();
    let cfg = ConfigurationBuilder::new("job.bat")
        .log_file(&log)
        .delay(Duration::from_secs(2))
        .build();
    engine.execute(&cfg).await;

    assert!(runner.runs()[0].started_at - started >= Duration::from_secs(2));
    assert_eq!(log_lines(&log)[0], "Delaying execution by 2 seconds");
    Ok(())
}

#[tokio::test]
async fn every_execution_appends_exactly_one_block() {
    init_tracing();

    let fs = MockFileSystem::new();
    let runner = RecordingRunner::exiting_with(1);
    let engine = mock_engine(&fs, FixedLocator::new(), &runner, &[]);

    engine.execute(&ConfigurationBuilder::new("a.bat").build()).await;
    engine.execute(&ConfigurationBuilder::new("b.xyz").build()).await;
    engine.execute(&ConfigurationBuilder::new("c.py").build()).await;

    let blocks = diagnostic_blocks(&fs);
    assert_eq!(blocks.len(), 3);
    assert!(blocks.iter().all(|b| b.starts_with("Timestamp")));

    let raw = fs.contents(diag_file()).unwrap_or_default();
    assert!(raw.ends_with("\n\n"));
}

#[tokio::test]
async fn rejected_configuration_still_writes_a_block() {
    init_tracing();

    let fs = MockFileSystem::new();
    let runner = RecordingRunner::exiting_with(0);
    let engine = mock_engine(&fs, FixedLocator::new(), &runner, &[]);

    let err = SilentCmdError::ConfigError("invalid /DELAY value 'soon'".to_string());
    let result = engine.reject(&err, None);

    assert_eq!(result.exit_code, EXIT_INTERNAL_ERROR);
    assert_eq!(runner.run_count(), 0);
    let blocks = diagnostic_blocks(&fs);
    assert_eq!(blocks.len(), 1);
    assert!(blocks[0].contains("Exception : Configuration error: invalid /DELAY value 'soon'"));
}

#[tokio::test]
async fn rejected_configuration_is_reported_in_the_user_log() -> TestResult {
    init_tracing();

    let dir = TempDir::new()?;
    let log = dir.path().join("out.txt");
    std::fs::write(&log, "earlier run\n")?;

    let fs = MockFileSystem::new();
    let runner = RecordingRunner::exiting_with(0);
    let engine = mock_engine(&fs, FixedLocator::new(), &runner, &[]);

    let log_option = format!("/LOG+:{}", log.display());
    let args = ["job.bat", "/DELAY:soon", log_option.as_str()];
    let err = Configuration::parse_arguments(&args, &DefaultsFile::default())
        .expect_err("a malformed delay must be rejected");
    let target = Configuration::scan_log_target(&args, &DefaultsFile::default());
    let result = engine.reject(&err, target.as_ref());

    assert_eq!(result.exit_code, EXIT_INTERNAL_ERROR);
    assert_eq!(runner.run_count(), 0);
    let lines = log_lines(&log);
    assert_eq!(lines[0], "earlier run");
    assert!(lines[1].starts_with("Error: Configuration error: invalid /DELAY value 'soon'"));
    assert_eq!(diagnostic_blocks(&fs).len(), 1);
    Ok(())
}

/// Runner that blows up mid-run.
struct PanickingRunner;

impl ProcessRunner for PanickingRunner {
    fn run<'a>(
        &'a self,
        _plan: &'a LaunchPlan,
        _working_dir: Option<&'a Path>,
        _sink: &'a LogWriter,
    ) -> Pin<Box<dyn Future<Output = LaunchResult<i32>> + Send + 'a>> {
        Box::pin(explode())
    }
}

async fn explode() -> LaunchResult<i32> {
    panic!("runner exploded")
}

#[tokio::test]
async fn diagnostic_block_survives_a_panic() {
    init_tracing();

    let fs = MockFileSystem::new();
    let engine = Arc::new(
        ExecutionEngine::new(
            Arc::new(fs.clone()),
            Arc::new(FixedLocator::new()),
            Arc::new(PanickingRunner),
            Some(diag_file()),
        )
        .with_help_presenter(|| {}),
    );

    let cfg = ConfigurationBuilder::new("job.bat").arguments("x").build();
    let handle = tokio::spawn({
        let engine = Arc::clone(&engine);
        async move { engine.execute(&cfg).await }
    });

    let joined = handle.await;
    assert!(joined.is_err_and(|e| e.is_panic()));

    let blocks = diagnostic_blocks(&fs);
    assert_eq!(blocks.len(), 1);
    assert!(blocks[0].contains("Filename  : job.bat"));
    assert!(blocks[0].contains("Arguments : x"));
}
