//! Subprocess helpers.
//!
//! [`run`] waits for the process; [`spawn`] starts it and hands back a
//! [`PendingProcess`] to [`PendingProcess::wait`] on later, so several
//! tools can run while the pipeline carries on. A pending process dropped
//! without being waited on is killed and reaped.

use std::ffi::OsStr;
use std::process::{Child, Command, Output, Stdio};

use snafu::ResultExt;
use tracing::debug;

use crate::error::{Result, SpawnSnafu, SubprocessSnafu};

/// Run `program` with `args` to completion.
pub fn run<I, S>(program: &str, args: I) -> Result<Output>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    spawn(program, args)?.wait()
}

/// Start `program` with `args` without waiting for it.
pub fn spawn<I, S>(program: &str, args: I) -> Result<PendingProcess>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .context(SpawnSnafu { program })?;
    debug!(program, pid = child.id(), "subprocess started");
    Ok(PendingProcess { program: program.to_string(), child: Some(child) })
}

/// Wait for every process of `pending`, then return the first failure.
pub fn wait_all(pending: impl IntoIterator<Item = PendingProcess>) -> Result<()> {
    let mut first_error = None;
    for process in pending {
        if let Err(err) = process.wait() {
            first_error.get_or_insert(err);
        }
    }
    first_error.map_or(Ok(()), Err)
}

/// A started subprocess whose outcome has not been observed yet.
#[derive(Debug)]
pub struct PendingProcess {
    program: String,
    child: Option<Child>,
}

impl PendingProcess {
    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn id(&self) -> u32 {
        self.child.as_ref().map_or(0, Child::id)
    }

    /// Wait for the process; a non-zero exit is a [`crate::Error::Subprocess`]
    /// carrying its status (1 when killed by a signal).
    pub fn wait(mut self) -> Result<Output> {
        let program = std::mem::take(&mut self.program);
        let Some(child) = self.child.take() else {
            return Ok(Output { status: Default::default(), stdout: Vec::new(), stderr: Vec::new() });
        };
        let output = child.wait_with_output().context(SpawnSnafu { program: program.as_str() })?;
        debug!(program = %program, status = ?output.status.code(), "subprocess finished");
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim_end().to_string();
            return SubprocessSnafu { program, status: output.status.code().unwrap_or(1), stderr }.fail();
        }
        Ok(output)
    }
}

impl Drop for PendingProcess {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            debug!(program = %self.program, pid = child.id(), "killing unobserved subprocess");
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}
