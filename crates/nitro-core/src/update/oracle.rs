//! Version oracle: what is installed, what is newest, and how to install it
//!
//! `NpmOracle` answers every question through the npm CLI. Other sources
//! (see `registry`) implement the same trait so the coordinator never deals
//! with command output directly.

use super::error::QueryFailure;
use super::version::{extract_version, version_from_listing};
use colored::Colorize;
use semver::Version;
use std::process::{Output, Stdio};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command as TokioCommand;

/// Outcome of a global install
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallResult {
    pub success: bool,
}

/// Source of truth for installed and published versions
///
/// Absence is `Ok(None)`. `Err` is reserved for the mechanism itself being
/// unavailable (missing host tooling, unusable registry URL, timeouts).
#[allow(async_fn_in_trait)]
pub trait VersionOracle {
    /// Version of `package` in the global install location
    async fn installed_version(&self, package: &str) -> Result<Option<Version>, QueryFailure>;

    /// Newest version of `package` published in the registry
    async fn latest_version(&self, package: &str) -> Result<Option<Version>, QueryFailure>;

    /// Install the latest `package` globally
    async fn install(&self, package: &str) -> Result<InstallResult, QueryFailure>;
}

/// Executable name of an npm-installed command on the host platform
///
/// npm installs global commands on Windows as `.cmd` shims, which process
/// spawning does not find by bare name.
pub(crate) fn host_program(name: &str) -> String {
    if cfg!(windows) {
        format!("{}.cmd", name)
    } else {
        name.to_string()
    }
}

/// Oracle backed by the npm CLI
#[derive(Debug, Clone)]
pub struct NpmOracle {
    program: String,
}

impl Default for NpmOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl NpmOracle {
    pub fn new() -> Self {
        Self::with_program(host_program("npm"))
    }

    /// Use a specific npm executable (e.g. a pinned path or a wrapper)
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// The install command line, as shown to the user
    pub fn install_command(&self, package: &str) -> String {
        format!("{} install -g {}@latest", self.program, package)
    }

    async fn capture(&self, args: &[&str]) -> Result<Output, QueryFailure> {
        TokioCommand::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                QueryFailure::spawn(format!("{} {}", self.program, args.join(" ")), e)
            })
    }
}

impl VersionOracle for NpmOracle {
    async fn installed_version(&self, package: &str) -> Result<Option<Version>, QueryFailure> {
        // npm exits non-zero on unrelated peer problems but still prints the tree
        let output = self.capture(&["list", "--depth=0", "-g"]).await?;
        let listing = String::from_utf8_lossy(&output.stdout);
        Ok(version_from_listing(&listing, package))
    }

    async fn latest_version(&self, package: &str) -> Result<Option<Version>, QueryFailure> {
        let output = self.capture(&["view", package, "version"]).await?;
        if !output.status.success() {
            return Ok(None);
        }
        // `npm view` prints one line per matching version for ranges; take the last
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.lines().rev().find_map(extract_version))
    }

    /// Install and stream the package manager output to the terminal
    async fn install(&self, package: &str) -> Result<InstallResult, QueryFailure> {
        let cmd = self.install_command(package);
        println!();
        println!("{} {}", "Running:".dimmed(), cmd.yellow());
        println!();

        let target = format!("{}@latest", package);
        let mut child = TokioCommand::new(&self.program)
            .args(["install", "-g", target.as_str()])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| QueryFailure::spawn(cmd.clone(), e))?;

        let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
            return Err(QueryFailure::spawn(
                cmd,
                std::io::Error::other("installer output was not captured"),
            ));
        };

        let mut stdout_reader = BufReader::new(stdout).lines();
        let mut stderr_reader = BufReader::new(stderr).lines();
        let mut stdout_done = false;
        let mut stderr_done = false;

        while !(stdout_done && stderr_done) {
            tokio::select! {
                line = stdout_reader.next_line(), if !stdout_done => match line {
                    Ok(Some(line)) => println!("  {}", line),
                    Ok(None) => stdout_done = true,
                    Err(e) => {
                        eprintln!("{} {}", "Error reading stdout:".red(), e);
                        stdout_done = true;
                    }
                },
                line = stderr_reader.next_line(), if !stderr_done => match line {
                    Ok(Some(line)) => eprintln!("  {}", line.yellow()),
                    Ok(None) => stderr_done = true,
                    Err(e) => {
                        eprintln!("{} {}", "Error reading stderr:".red(), e);
                        stderr_done = true;
                    }
                },
            }
        }

        let status = child
            .wait()
            .await
            .map_err(|e| QueryFailure::spawn(cmd, e))?;
        println!();

        Ok(InstallResult {
            success: status.success(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_command() {
        let oracle = NpmOracle::with_program("npm");
        assert_eq!(
            oracle.install_command("nitro-cli"),
            "npm install -g nitro-cli@latest"
        );
    }

    #[test]
    fn test_host_program_uses_cmd_shim_on_windows() {
        if cfg!(windows) {
            assert_eq!(host_program("nitro-cli"), "nitro-cli.cmd");
        } else {
            assert_eq!(host_program("nitro-cli"), "nitro-cli");
        }
        assert_eq!(NpmOracle::new().program, host_program("npm"));
    }

    #[tokio::test]
    async fn test_missing_npm_is_query_failure() {
        let oracle = NpmOracle::with_program("definitely-not-a-real-npm-binary");

        let installed = oracle.installed_version("nitro-cli").await;
        assert!(matches!(installed, Err(QueryFailure::Spawn { .. })));

        let latest = oracle.latest_version("nitro-cli").await;
        assert!(matches!(latest, Err(QueryFailure::Spawn { .. })));

        let install = oracle.install("nitro-cli").await;
        assert!(matches!(install, Err(QueryFailure::Spawn { .. })));
    }
}
