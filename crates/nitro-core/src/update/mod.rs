//! Self-update reconciliation
//!
//! This module provides:
//! - Version scraping and comparison (`version`)
//! - Version oracles backed by the npm CLI or the registry HTTP API
//! - The `UpdateCoordinator` state machine
//! - Restart hand-off to the freshly installed binary

pub mod coordinator;
pub mod error;
pub mod oracle;
pub mod registry;
pub mod restart;
pub mod timeout;
pub mod version;

pub use coordinator::{Prompter, UpdateCoordinator, UpdateDecision, VersionReport};
pub use error::QueryFailure;
pub use oracle::{InstallResult, NpmOracle, VersionOracle};
pub use registry::RegistryOracle;
pub use restart::{reinvoke_self, restart_args, RestartFlags, UPDATED_FLAG};
pub use timeout::TimeoutOracle;

use crate::config::{Settings, VersionSource};
use crate::product::ProductConfig;
use semver::Version;

/// Oracle selected by the `update.source` setting
pub enum SourceOracle {
    Npm(NpmOracle),
    Registry(RegistryOracle),
}

impl VersionOracle for SourceOracle {
    async fn installed_version(&self, package: &str) -> Result<Option<Version>, QueryFailure> {
        match self {
            SourceOracle::Npm(oracle) => oracle.installed_version(package).await,
            SourceOracle::Registry(oracle) => oracle.installed_version(package).await,
        }
    }

    async fn latest_version(&self, package: &str) -> Result<Option<Version>, QueryFailure> {
        match self {
            SourceOracle::Npm(oracle) => oracle.latest_version(package).await,
            SourceOracle::Registry(oracle) => oracle.latest_version(package).await,
        }
    }

    async fn install(&self, package: &str) -> Result<InstallResult, QueryFailure> {
        match self {
            SourceOracle::Npm(oracle) => oracle.install(package).await,
            SourceOracle::Registry(oracle) => oracle.install(package).await,
        }
    }
}

/// Build the oracle described by `settings`, bounded by its optional timeout
pub fn oracle_from_settings<C: ProductConfig>(
    config: &C,
    settings: &Settings,
) -> Result<TimeoutOracle<SourceOracle>, QueryFailure> {
    let source = match settings.update.source {
        VersionSource::Npm => SourceOracle::Npm(NpmOracle::new()),
        VersionSource::Registry => {
            let url = settings.registry_url(config);
            SourceOracle::Registry(RegistryOracle::from_config(config, &url)?)
        }
    };

    Ok(TimeoutOracle::new(source, settings.update.timeout()))
}
