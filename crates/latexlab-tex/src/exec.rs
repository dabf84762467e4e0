//! Child-process execution for engine passes

use latexlab_core::{LatexlabError, Result};
use std::ffi::OsString;
use std::io::{ErrorKind, Read};
use std::process::{Child, Command, Output, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Interval between `try_wait` polls while a timeout is armed
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Options for executing an engine command
#[derive(Debug, Clone)]
pub struct ExecOptions {
    pub program: String,
    pub args: Vec<OsString>,
    /// Kill the child if it runs longer than this; `None` waits forever
    pub timeout: Option<Duration>,
}

impl ExecOptions {
    /// Human-readable command line, for logs
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }
}

/// Result of engine command execution
#[derive(Debug, Clone)]
pub struct ExecResult {
    /// `None` when the child was terminated by a signal
    pub exit_code: Option<i32>,
    pub success: bool,
    /// stdout followed by stderr
    pub output: String,
    pub duration_ms: u64,
}

/// Execute the engine once, capturing its output
///
/// stdin is closed so a misbehaving engine can never sit waiting for input.
///
/// # Errors
///
/// - [`LatexlabError::EngineNotFound`] if the program cannot be located or executed
/// - [`LatexlabError::EngineTimedOut`] if `timeout` elapses first
/// - [`LatexlabError::Io`] for any other process failure
pub fn exec_engine(options: &ExecOptions) -> Result<ExecResult> {
    let start = Instant::now();

    let child = Command::new(&options.program)
        .args(&options.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| spawn_error(&options.program, e))?;

    let output = match options.timeout {
        None => child.wait_with_output()?,
        Some(limit) => wait_with_timeout(child, limit, &options.program)?,
    };

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));

    Ok(ExecResult {
        exit_code: output.status.code(),
        success: output.status.success(),
        output: combined,
        duration_ms: start.elapsed().as_millis() as u64,
    })
}

fn spawn_error(program: &str, err: std::io::Error) -> LatexlabError {
    match err.kind() {
        ErrorKind::NotFound | ErrorKind::PermissionDenied => LatexlabError::EngineNotFound {
            command: program.to_string(),
        },
        _ => LatexlabError::Io(err),
    }
}

/// Wait for `child`, killing it once `limit` has passed
///
/// Output pipes are drained on separate threads so a chatty child cannot
/// block on a full pipe while we poll.
fn wait_with_timeout(mut child: Child, limit: Duration, program: &str) -> Result<Output> {
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let stdout_reader = thread::spawn(move || drain(stdout));
    let stderr_reader = thread::spawn(move || drain(stderr));

    let deadline = Instant::now() + limit;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {}
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(e.into());
            }
        }
        if Instant::now() >= deadline {
            // The readers are left detached; they finish once the pipes close.
            let _ = child.kill();
            let _ = child.wait();
            return Err(LatexlabError::EngineTimedOut {
                command: program.to_string(),
                timeout: limit,
            });
        }
        thread::sleep(POLL_INTERVAL);
    };

    Ok(Output {
        status,
        stdout: stdout_reader.join().unwrap_or_default(),
        stderr: stderr_reader.join().unwrap_or_default(),
    })
}

fn drain(pipe: Option<impl Read>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buf);
    }
    buf
}
