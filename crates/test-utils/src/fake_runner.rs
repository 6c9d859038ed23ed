use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use silentcmd::errors::{Result, SilentCmdError};
use silentcmd::exec::ProcessRunner;
use silentcmd::launch::LaunchPlan;
use silentcmd::log_sink::LogWriter;

/// One call observed by [`RecordingRunner`].
#[derive(Debug, Clone)]
pub struct RecordedRun {
    pub plan: LaunchPlan,
    pub working_dir: Option<PathBuf>,
    pub started_at: Instant,
}

#[derive(Debug, Clone)]
enum Behaviour {
    Exit(i32),
    FailToStart,
}

/// A fake runner that:
/// - records every plan it was asked to run
/// - writes the configured output lines to the sink
/// - reports a fixed exit code (or a spawn failure).
#[derive(Debug, Clone)]
pub struct RecordingRunner {
    runs: Arc<Mutex<Vec<RecordedRun>>>,
    output: Vec<String>,
    behaviour: Behaviour,
}

impl RecordingRunner {
    pub fn exiting_with(code: i32) -> Self {
        Self {
            runs: Arc::new(Mutex::new(Vec::new())),
            output: Vec::new(),
            behaviour: Behaviour::Exit(code),
        }
    }

    pub fn failing_to_start() -> Self {
        Self {
            behaviour: Behaviour::FailToStart,
            ..Self::exiting_with(0)
        }
    }

    pub fn with_output(mut self, lines: &[&str]) -> Self {
        self.output = lines.iter().map(|l| l.to_string()).collect();
        self
    }

    pub fn runs(&self) -> Vec<RecordedRun> {
        self.runs.lock().unwrap().clone()
    }

    pub fn run_count(&self) -> usize {
        self.runs.lock().unwrap().len()
    }
}

impl ProcessRunner for RecordingRunner {
    fn run<'a>(
        &'a self,
        plan: &'a LaunchPlan,
        working_dir: Option<&'a Path>,
        sink: &'a LogWriter,
    ) -> Pin<Box<dyn Future<Output = Result<i32>> + Send + 'a>> {
        Box::pin(async move {
            {
                let mut guard = self.runs.lock().unwrap();
                guard.push(RecordedRun {
                    plan: plan.clone(),
                    working_dir: working_dir.map(Path::to_path_buf),
                    started_at: Instant::now(),
                });
            }

            match self.behaviour {
                Behaviour::Exit(code) => {
                    for line in &self.output {
                        sink.write_line(line);
                    }
                    Ok(code)
                }
                Behaviour::FailToStart => Err(SilentCmdError::Spawn {
                    launcher: plan.launcher.display().to_string(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "launcher not found",
                    ),
                }),
            }
        })
    }
}
