//! Execution of the compiler as a child process.
use std::{
    io::{self, BufRead, BufReader, Read},
    path::Path,
    process::{Child, Command, ExitStatus, Stdio},
    sync::mpsc::{self, RecvTimeoutError},
    thread,
    time::{Duration, Instant},
};

use log::{debug, trace, warn};

use crate::{
    args::CommandLine,
    constants::*,
    error::{McsError, McsResult},
};

/// What the compiler left behind after it exited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, or `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    /// Standard output, one entry per line, without line terminators.
    pub lines: Vec<String>,
}

/// Runs the executable with the given arguments and blocks until it exits.
///
/// Only standard output is captured. Standard error goes wherever the
/// current process sends its own.
///
/// With a `timeout`, [`McsError::Timeout`] is returned once the deadline
/// passes, either because the child is still running (it is killed), or
/// because its output is still held open by a process it started.
pub fn run(
    executable: &Path,
    command_line: &CommandLine,
    timeout: Option<Duration>,
) -> McsResult<ProcessOutput> {
    if !executable.is_file() {
        return Err(McsError::MissingExecutable(executable.to_path_buf()));
    }

    let mut command = build_command(executable, command_line);
    debug!("{} {command_line}", executable.display());

    let mut child = command.spawn().map_err(McsError::Launch)?;
    let stdout = match child.stdout.take() {
        Some(stdout) => stdout,
        None => {
            kill(&mut child);
            let err = io::Error::new(io::ErrorKind::BrokenPipe, "stdout was not captured");
            return Err(err.into());
        }
    };

    let (status, lines) = match timeout {
        None => {
            // Drain to end-of-stream before waiting, so a full pipe can't stall the child.
            let lines = read_lines(stdout);
            let status = child.wait()?;
            (status, lines?)
        }
        Some(limit) => wait_with_deadline(child, stdout, limit)?,
    };

    for line in &lines {
        trace!("{line}");
    }

    Ok(ProcessOutput {
        exit_code: status.code(),
        lines,
    })
}

#[cfg(not(windows))]
fn build_command(executable: &Path, command_line: &CommandLine) -> Command {
    let mut command = Command::new(executable);
    command
        .args(command_line.argv())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit());

    command
}

#[cfg(windows)]
fn build_command(executable: &Path, command_line: &CommandLine) -> Command {
    use std::os::windows::process::CommandExt;

    let mut command = Command::new(executable);
    command
        .raw_arg(command_line.as_str())
        .creation_flags(CREATE_NO_WINDOW)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit());

    command
}

/// Reads until end-of-stream. Invalid UTF-8 is replaced rather than rejected.
fn read_lines(stream: impl Read) -> io::Result<Vec<String>> {
    let mut reader = BufReader::new(stream);
    let mut lines = Vec::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }

        while matches!(buf.last(), Some(b'\n' | b'\r')) {
            buf.pop();
        }

        lines.push(String::from_utf8_lossy(&buf).into_owned());
    }

    Ok(lines)
}

fn wait_with_deadline(
    mut child: Child,
    stdout: impl Read + Send + 'static,
    limit: Duration,
) -> McsResult<(ExitStatus, Vec<String>)> {
    let deadline = Instant::now() + limit;
    let (sender, receiver) = mpsc::channel();

    thread::spawn(move || {
        // Nobody is listening anymore once the deadline has passed.
        let _ = sender.send(read_lines(stdout));
    });

    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {}
            Err(err) => {
                kill(&mut child);
                return Err(err.into());
            }
        }

        if Instant::now() >= deadline {
            warn!("compiler exceeded {}ms, killing it", limit.as_millis());
            kill(&mut child);
            return Err(McsError::Timeout(limit));
        }

        thread::sleep(Duration::from_millis(POLL_INTERVAL_MILLIS));
    };

    // Processes started by the compiler inherit stdout and can keep it open after it exits.
    match receiver.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
        Ok(lines) => Ok((status, lines?)),
        Err(RecvTimeoutError::Timeout) => {
            warn!("compiler output still open after {}ms", limit.as_millis());
            Err(McsError::Timeout(limit))
        }
        Err(RecvTimeoutError::Disconnected) => {
            Err(io::Error::new(io::ErrorKind::Other, "output reader panicked").into())
        }
    }
}

/// Kills and reaps the child.
fn kill(child: &mut Child) {
    // The child may exit on its own between the poll and the kill.
    if let Err(err) = child.kill() {
        debug!("kill: {err}");
    }
    if let Err(err) = child.wait() {
        debug!("wait: {err}");
    }
}
