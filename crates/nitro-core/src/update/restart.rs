//! Hand-off to a freshly installed copy of the tool
//!
//! A restart is a new top-level process, never a nested call. The only state
//! it inherits is the `--updated` flag, which makes the new process skip its
//! own update check.

use super::oracle::host_program;
use anyhow::{Context, Result};
use std::ffi::{OsStr, OsString};
use std::process::{ExitStatus, Stdio};
use tokio::process::Command as TokioCommand;

/// Command-line flag that marks a post-update run
pub const UPDATED_FLAG: &str = "--updated";

/// Flags carried into the restarted process
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestartFlags {
    pub skip_update_check: bool,
}

/// Arguments for the restarted process
///
/// Keeps the user's original arguments so a `scaffold --name Foo` run resumes
/// as the same command, drops any `--updated` already present and appends a
/// single one when the update check must be skipped.
pub fn restart_args<I, S>(forwarded: I, flags: RestartFlags) -> Vec<OsString>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut args: Vec<OsString> = forwarded
        .into_iter()
        .map(|arg| arg.as_ref().to_os_string())
        .filter(|arg| arg != UPDATED_FLAG)
        .collect();

    if flags.skip_update_check {
        args.push(OsString::from(UPDATED_FLAG));
    }

    args
}

/// Spawn `program` with the restart arguments and wait for it to finish
///
/// `program` is resolved through `PATH` (as the `.cmd` shim npm installs on
/// Windows), so the newly installed copy runs rather than the binary backing
/// the current process. Stdio is inherited;
/// the caller should exit with the returned status and do no further work.
pub async fn reinvoke_self<I, S>(program: &str, forwarded: I, flags: RestartFlags) -> Result<ExitStatus>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let args = restart_args(forwarded, flags);
    let program = host_program(program);

    TokioCommand::new(&program)
        .args(&args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .with_context(|| format!("Failed to restart {}", program))
}

/// Exit code to propagate from the restarted process
pub fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}
