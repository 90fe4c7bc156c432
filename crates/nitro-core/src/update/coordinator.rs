//! Update reconciliation: compare installed vs. latest and decide what to do
//!
//! One `reconcile` call issues at most one external operation at a time and
//! produces exactly one `UpdateDecision`. Nothing in here is fatal: every
//! failure degrades to "skip the update and continue".

use super::oracle::VersionOracle;
use super::version::is_newer;
use semver::Version;

/// Outcome of one reconciliation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateDecision {
    /// This run is itself a post-update restart; nothing was queried
    Skipped,
    NoLocalVersion,
    NoRemoteVersion,
    UpToDate,
    UpdateDeclinedByUser,
    UpdateFailed,
    UpdateSucceeded,
}

impl UpdateDecision {
    /// Only a successful install hands off to a fresh process
    pub fn restart_required(&self) -> bool {
        matches!(self, UpdateDecision::UpdateSucceeded)
    }
}

/// User interaction needed during reconciliation
///
/// `confirm` is the only blocking question. Implementations should treat a
/// failed or cancelled prompt as "no".
pub trait Prompter {
    fn confirm(&self, message: &str) -> bool;
    fn info(&self, message: &str);
    fn warning(&self, message: &str);
}

/// Installed and latest versions, as far as they could be determined
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionReport {
    pub installed: Option<Version>,
    pub latest: Option<Version>,
}

impl VersionReport {
    pub fn update_available(&self) -> bool {
        match (&self.installed, &self.latest) {
            (Some(installed), Some(latest)) => is_newer(installed, latest),
            _ => false,
        }
    }
}

/// Drives the self-update decision for one package
pub struct UpdateCoordinator<O, P> {
    oracle: O,
    prompter: P,
    package: String,
    upgrade_command: Option<String>,
}

impl<O: VersionOracle, P: Prompter> UpdateCoordinator<O, P> {
    pub fn new(oracle: O, prompter: P, package: impl Into<String>) -> Self {
        Self {
            oracle,
            prompter,
            package: package.into(),
            upgrade_command: None,
        }
    }

    /// Manual command suggested when the automatic install fails
    pub fn with_upgrade_command(mut self, command: impl Into<String>) -> Self {
        self.upgrade_command = Some(command.into());
        self
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn prompter(&self) -> &P {
        &self.prompter
    }

    /// Run one reconciliation pass
    ///
    /// `skip` must be true for a restarted process; it returns before any
    /// query so a restarted run can never trigger another restart.
    pub async fn reconcile(&self, skip: bool) -> UpdateDecision {
        if skip {
            return UpdateDecision::Skipped;
        }

        let installed = match self.oracle.installed_version(&self.package).await {
            Ok(Some(version)) => version,
            Ok(None) => return UpdateDecision::NoLocalVersion,
            Err(e) => {
                self.prompter
                    .warning(&format!("Could not determine installed version: {}", e));
                return UpdateDecision::NoLocalVersion;
            }
        };

        let latest = match self.oracle.latest_version(&self.package).await {
            Ok(Some(version)) => version,
            Ok(None) => return UpdateDecision::NoRemoteVersion,
            Err(e) => {
                self.prompter
                    .warning(&format!("Could not check for updates: {}", e));
                return UpdateDecision::NoRemoteVersion;
            }
        };

        self.prompter
            .info(&format!("Latest version available in the registry: {}", latest));

        if !is_newer(&installed, &latest) {
            return UpdateDecision::UpToDate;
        }

        self.prompter.info(&format!(
            "Newer version of {} available ({} -> {})",
            self.package, installed, latest
        ));

        if !self
            .prompter
            .confirm("Do you want to update package to latest version?")
        {
            return UpdateDecision::UpdateDeclinedByUser;
        }

        match self.oracle.install(&self.package).await {
            Ok(result) if result.success => UpdateDecision::UpdateSucceeded,
            Ok(_) => {
                self.warn_install_failed("the package manager reported an error");
                UpdateDecision::UpdateFailed
            }
            Err(e) => {
                self.warn_install_failed(&e.to_string());
                UpdateDecision::UpdateFailed
            }
        }
    }

    /// Query both versions without prompting or installing
    pub async fn check(&self) -> VersionReport {
        let installed = self
            .oracle
            .installed_version(&self.package)
            .await
            .unwrap_or_else(|e| {
                self.prompter
                    .warning(&format!("Could not determine installed version: {}", e));
                None
            });
        let latest = self
            .oracle
            .latest_version(&self.package)
            .await
            .unwrap_or_else(|e| {
                self.prompter
                    .warning(&format!("Could not check for updates: {}", e));
                None
            });

        VersionReport { installed, latest }
    }

    fn warn_install_failed(&self, reason: &str) {
        let mut message = format!("Update of {} failed: {}", self.package, reason);
        if let Some(command) = &self.upgrade_command {
            message.push_str(&format!("\nTry updating manually: {}", command));
        }
        self.prompter.warning(&message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::update::error::QueryFailure;
    use crate::update::oracle::InstallResult;
    use std::cell::{Cell, RefCell};

    #[derive(Debug, Clone, Copy)]
    enum Answer {
        Version(&'static str),
        Absent,
        Broken,
    }

    struct StubOracle {
        installed: Answer,
        latest: Answer,
        /// `None` means the install command cannot be spawned
        install_succeeds: Option<bool>,
        calls: RefCell<Vec<&'static str>>,
    }

    impl StubOracle {
        fn new(installed: Answer, latest: Answer) -> Self {
            Self {
                installed,
                latest,
                install_succeeds: Some(true),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn install_succeeds(mut self, outcome: Option<bool>) -> Self {
            self.install_succeeds = outcome;
            self
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.borrow().clone()
        }

        fn answer(answer: Answer) -> Result<Option<Version>, QueryFailure> {
            match answer {
                Answer::Version(v) => Ok(Some(Version::parse(v).unwrap())),
                Answer::Absent => Ok(None),
                Answer::Broken => Err(QueryFailure::spawn(
                    "npm",
                    std::io::Error::new(std::io::ErrorKind::NotFound, "npm not found"),
                )),
            }
        }
    }

    impl VersionOracle for StubOracle {
        async fn installed_version(&self, _package: &str) -> Result<Option<Version>, QueryFailure> {
            self.calls.borrow_mut().push("installed");
            Self::answer(self.installed)
        }

        async fn latest_version(&self, _package: &str) -> Result<Option<Version>, QueryFailure> {
            self.calls.borrow_mut().push("latest");
            Self::answer(self.latest)
        }

        async fn install(&self, _package: &str) -> Result<InstallResult, QueryFailure> {
            self.calls.borrow_mut().push("install");
            match self.install_succeeds {
                Some(success) => Ok(InstallResult { success }),
                None => Err(QueryFailure::spawn(
                    "npm install -g pkg@latest",
                    std::io::Error::new(std::io::ErrorKind::NotFound, "npm not found"),
                )),
            }
        }
    }

    struct StubPrompter {
        accept: bool,
        confirms: Cell<usize>,
        warnings: RefCell<Vec<String>>,
    }

    impl StubPrompter {
        fn answering(accept: bool) -> Self {
            Self {
                accept,
                confirms: Cell::new(0),
                warnings: RefCell::new(Vec::new()),
            }
        }
    }

    impl Prompter for StubPrompter {
        fn confirm(&self, _message: &str) -> bool {
            self.confirms.set(self.confirms.get() + 1);
            self.accept
        }

        fn info(&self, _message: &str) {}

        fn warning(&self, message: &str) {
            self.warnings.borrow_mut().push(message.to_string());
        }
    }

    fn coordinator(
        oracle: StubOracle,
        accept: bool,
    ) -> UpdateCoordinator<StubOracle, StubPrompter> {
        UpdateCoordinator::new(oracle, StubPrompter::answering(accept), "nitro-cli")
    }

    #[tokio::test]
    async fn test_older_installed_updates_and_restarts() {
        let pairs = [
            ("1.0.0", "1.0.1"),
            ("1.2.0", "1.3.0"),
            ("1.9.9", "2.0.0"),
            ("0.1.0", "0.10.0"),
            ("2.0.0-rc.1", "2.0.0"),
            ("2.0.0-alpha", "2.0.0-beta"),
        ];

        for (installed, latest) in pairs {
            let c = coordinator(
                StubOracle::new(Answer::Version(installed), Answer::Version(latest)),
                true,
            );
            let decision = c.reconcile(false).await;

            assert_eq!(decision, UpdateDecision::UpdateSucceeded, "{installed} -> {latest}");
            assert!(decision.restart_required());
            assert_eq!(c.prompter().confirms.get(), 1);
            assert_eq!(c.oracle().calls(), vec!["installed", "latest", "install"]);
        }
    }

    #[tokio::test]
    async fn test_up_to_date_never_prompts() {
        let pairs = [
            ("1.3.0", "1.3.0"),
            ("1.4.0", "1.3.0"),
            ("2.0.0", "2.0.0-rc.1"),
            ("1.3.0+local.1", "1.3.0"),
        ];

        for (installed, latest) in pairs {
            let c = coordinator(
                StubOracle::new(Answer::Version(installed), Answer::Version(latest)),
                true,
            );
            let decision = c.reconcile(false).await;

            assert_eq!(decision, UpdateDecision::UpToDate, "{installed} vs {latest}");
            assert!(!decision.restart_required());
            assert_eq!(c.prompter().confirms.get(), 0);
            assert_eq!(c.oracle().calls(), vec!["installed", "latest"]);
        }
    }

    #[tokio::test]
    async fn test_skip_makes_no_calls() {
        for (installed, latest) in [
            (Answer::Version("1.0.0"), Answer::Version("2.0.0")),
            (Answer::Absent, Answer::Absent),
            (Answer::Broken, Answer::Broken),
        ] {
            let c = coordinator(StubOracle::new(installed, latest), true);
            let decision = c.reconcile(true).await;

            assert_eq!(decision, UpdateDecision::Skipped);
            assert!(!decision.restart_required());
            assert!(c.oracle().calls().is_empty());
            assert_eq!(c.prompter().confirms.get(), 0);
        }
    }

    #[tokio::test]
    async fn test_absent_installed_short_circuits() {
        let c = coordinator(
            StubOracle::new(Answer::Absent, Answer::Version("2.0.0")),
            true,
        );
        assert_eq!(c.reconcile(false).await, UpdateDecision::NoLocalVersion);
        assert_eq!(c.oracle().calls(), vec!["installed"]);
        assert!(c.prompter().warnings.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_broken_installed_query_warns_and_continues() {
        let c = coordinator(
            StubOracle::new(Answer::Broken, Answer::Version("2.0.0")),
            true,
        );
        assert_eq!(c.reconcile(false).await, UpdateDecision::NoLocalVersion);
        assert_eq!(c.oracle().calls(), vec!["installed"]);
        assert_eq!(c.prompter().warnings.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_absent_or_broken_latest() {
        let c = coordinator(
            StubOracle::new(Answer::Version("1.0.0"), Answer::Absent),
            true,
        );
        assert_eq!(c.reconcile(false).await, UpdateDecision::NoRemoteVersion);
        assert_eq!(c.prompter().confirms.get(), 0);

        let c = coordinator(
            StubOracle::new(Answer::Version("1.0.0"), Answer::Broken),
            true,
        );
        assert_eq!(c.reconcile(false).await, UpdateDecision::NoRemoteVersion);
        assert_eq!(c.prompter().warnings.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_declined_never_installs() {
        let c = coordinator(
            StubOracle::new(Answer::Version("1.0.0"), Answer::Version("2.0.0")),
            false,
        );
        assert_eq!(
            c.reconcile(false).await,
            UpdateDecision::UpdateDeclinedByUser
        );
        assert_eq!(c.prompter().confirms.get(), 1);
        assert!(!c.oracle().calls().contains(&"install"));
    }

    #[tokio::test]
    async fn test_failed_install_does_not_restart() {
        for outcome in [Some(false), None] {
            let oracle = StubOracle::new(Answer::Version("1.0.0"), Answer::Version("2.0.0"))
                .install_succeeds(outcome);
            let c = coordinator(oracle, true).with_upgrade_command("npm i -g nitro-cli");
            let decision = c.reconcile(false).await;

            assert_eq!(decision, UpdateDecision::UpdateFailed);
            assert!(!decision.restart_required());
            let warnings = c.prompter().warnings.borrow();
            assert_eq!(warnings.len(), 1);
            assert!(warnings[0].contains("npm i -g nitro-cli"));
        }
    }

    #[tokio::test]
    async fn test_update_then_restarted_run_is_noop() {
        let c = coordinator(
            StubOracle::new(Answer::Version("1.2.0"), Answer::Version("1.3.0")),
            true,
        );
        let first = c.reconcile(false).await;
        assert_eq!(first, UpdateDecision::UpdateSucceeded);
        assert!(first.restart_required());

        // The restarted process sees the same (possibly stale) registry answers
        let restarted = coordinator(
            StubOracle::new(Answer::Version("1.2.0"), Answer::Version("1.3.0")),
            true,
        );
        let second = restarted.reconcile(first.restart_required()).await;
        assert_eq!(second, UpdateDecision::Skipped);
        assert!(restarted.oracle().calls().is_empty());
        assert_eq!(restarted.prompter().confirms.get(), 0);
    }

    #[tokio::test]
    async fn test_check_reports_without_prompting() {
        let c = coordinator(
            StubOracle::new(Answer::Version("1.0.0"), Answer::Version("1.1.0")),
            true,
        );
        let report = c.check().await;
        assert_eq!(report.installed, Some(Version::new(1, 0, 0)));
        assert_eq!(report.latest, Some(Version::new(1, 1, 0)));
        assert!(report.update_available());
        assert_eq!(c.prompter().confirms.get(), 0);
        assert_eq!(c.oracle().calls(), vec!["installed", "latest"]);

        let c = coordinator(StubOracle::new(Answer::Broken, Answer::Absent), true);
        let report = c.check().await;
        assert!(!report.update_available());
        assert_eq!(c.prompter().warnings.borrow().len(), 1);
    }
}
