//! External command execution with captured diagnostics.

use crate::bundler::error::{Error, Result, Termination};
use std::{ffi::OsStr, process::Stdio};
use tokio::{io::AsyncReadExt, process::Command};

/// Runs `program` with `args`, capturing its stderr.
///
/// Succeeds only when the process exits with code zero. Spawn failures, wait
/// failures, nonzero exits, and signal terminations all return the same
/// [`Error::Process`], carrying the full command line, how the process
/// ended, and whatever it wrote to stderr.
pub async fn run<I, S>(program: impl AsRef<OsStr>, args: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let program = program.as_ref();
    let args: Vec<_> = args.into_iter().map(|a| a.as_ref().to_os_string()).collect();
    let command_line = command_line(program, &args);
    log::debug!("Running {}", command_line);

    let failed = |termination, stderr: String, source| Error::Process {
        command: command_line.clone(),
        termination,
        stderr,
        source,
    };

    let mut child = Command::new(program)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| failed(Termination::NotStarted, String::new(), Some(e)))?;

    let pipe = child.stderr.take();
    let mut captured = Vec::new();
    let (read, status) = tokio::join!(
        async {
            match pipe {
                Some(mut pipe) => pipe.read_to_end(&mut captured).await.map(|_| ()),
                None => Ok(()),
            }
        },
        child.wait()
    );
    let stderr = String::from_utf8_lossy(&captured).into_owned();

    let status = status.map_err(|e| failed(Termination::NotStarted, stderr.clone(), Some(e)))?;
    if let Err(e) = read {
        log::warn!("Failed to read stderr of {}: {}", command_line, e);
    }

    if status.success() {
        return Ok(());
    }

    let termination = match status.code() {
        Some(code) => Termination::ExitCode(code),
        None => signal_of(&status),
    };
    Err(failed(termination, stderr, None))
}

#[cfg(unix)]
fn signal_of(status: &std::process::ExitStatus) -> Termination {
    use std::os::unix::process::ExitStatusExt;
    status
        .signal()
        .map(Termination::Signal)
        .unwrap_or(Termination::NotStarted)
}

#[cfg(not(unix))]
fn signal_of(_status: &std::process::ExitStatus) -> Termination {
    Termination::NotStarted
}

fn command_line(program: &OsStr, args: &[std::ffi::OsString]) -> String {
    std::iter::once(program)
        .chain(args.iter().map(|a| a.as_os_str()))
        .map(|part| {
            let part = part.to_string_lossy();
            if part.is_empty() || part.contains(char::is_whitespace) {
                format!("\"{part}\"")
            } else {
                part.into_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
