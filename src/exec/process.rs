// src/exec/process.rs

//! Child process runner.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::errors::{Result, SilentCmdError};
use crate::launch::LaunchPlan;
use crate::log_sink::LogWriter;

use super::runner::ProcessRunner;

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Runs the launcher as a real child process.
///
/// The child never gets a console window on Windows and is never started
/// through a shell; stdin is closed and both output streams are drained into
/// the log until EOF.
#[derive(Debug, Clone, Default)]
pub struct TokioProcessRunner;

impl TokioProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessRunner for TokioProcessRunner {
    fn run<'a>(
        &'a self,
        plan: &'a LaunchPlan,
        working_dir: Option<&'a Path>,
        sink: &'a LogWriter,
    ) -> Pin<Box<dyn Future<Output = Result<i32>> + Send + 'a>> {
        Box::pin(run_plan(plan, working_dir, sink))
    }
}

async fn run_plan(plan: &LaunchPlan, working_dir: Option<&Path>, sink: &LogWriter) -> Result<i32> {
    let mut cmd = build_command(plan)?;

    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    if let Some(dir) = working_dir {
        cmd.current_dir(dir);
    }

    info!(
        launcher = %plan.launcher.display(),
        command = %plan.command,
        dir = ?working_dir,
        "starting process"
    );

    let mut child = cmd.spawn().map_err(|source| SilentCmdError::Spawn {
        launcher: plan.launcher.display().to_string(),
        source,
    })?;

    let readers: Vec<JoinHandle<()>> = [
        child
            .stdout
            .take()
            .map(|out| tokio::spawn(forward_lines(out, sink.clone(), "stdout"))),
        child
            .stderr
            .take()
            .map(|err| tokio::spawn(forward_lines(err, sink.clone(), "stderr"))),
    ]
    .into_iter()
    .flatten()
    .collect();

    let status = child.wait().await?;

    // Lines still buffered in the pipes belong to this run's log.
    for reader in readers {
        if let Err(e) = reader.await {
            warn!(error = %e, "output reader task failed");
        }
    }

    let code = status.code().unwrap_or(-1);
    info!(exit_code = code, success = status.success(), "process exited");
    Ok(code)
}

#[cfg(windows)]
fn build_command(plan: &LaunchPlan) -> Result<Command> {
    let mut cmd = Command::new(&plan.launcher);
    if !plan.command.is_empty() {
        // Interpreters parse their own command line; pass it through verbatim.
        cmd.raw_arg(&plan.command);
    }
    cmd.creation_flags(CREATE_NO_WINDOW);
    Ok(cmd)
}

#[cfg(not(windows))]
fn build_command(plan: &LaunchPlan) -> Result<Command> {
    let args = shell_words::split(&plan.command).map_err(|e| {
        SilentCmdError::ConfigError(format!(
            "cannot split command line '{}': {e}",
            plan.command
        ))
    })?;
    let mut cmd = Command::new(&plan.launcher);
    cmd.args(args);
    Ok(cmd)
}

/// Copy lines from one output stream into the log as they arrive.
///
/// Bytes are decoded lossily so a stray non-UTF-8 line cannot stop the
/// reader (and stall the child on a full pipe).
async fn forward_lines<R>(stream: R, sink: LogWriter, name: &'static str)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end_matches(['\r', '\n']);
                debug!(stream = name, "{}", line);
                sink.write_line(line);
            }
            Err(e) => {
                warn!(stream = name, error = %e, "failed reading child output");
                break;
            }
        }
    }
}
