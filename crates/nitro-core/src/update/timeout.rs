//! Optional time limit around any oracle
//!
//! Reconciliation itself never imposes timeouts. Callers that need bounded
//! latency wrap their oracle here; an elapsed operation becomes
//! `QueryFailure::TimedOut` and the in-flight child process is dropped (and
//! killed, since every command is spawned with `kill_on_drop`).

use super::error::QueryFailure;
use super::oracle::{InstallResult, VersionOracle};
use semver::Version;
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

pub struct TimeoutOracle<O> {
    inner: O,
    limit: Option<Duration>,
}

impl<O: VersionOracle> TimeoutOracle<O> {
    /// Wrap `inner`; `None` passes every call straight through
    pub fn new(inner: O, limit: Option<Duration>) -> Self {
        Self { inner, limit }
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = Result<T, QueryFailure>>,
    ) -> Result<T, QueryFailure> {
        match self.limit {
            Some(limit) => timeout(limit, fut)
                .await
                .unwrap_or_else(|_| Err(QueryFailure::TimedOut { operation, limit })),
            None => fut.await,
        }
    }
}

impl<O: VersionOracle> VersionOracle for TimeoutOracle<O> {
    async fn installed_version(&self, package: &str) -> Result<Option<Version>, QueryFailure> {
        self.bounded("installed version query", self.inner.installed_version(package))
            .await
    }

    async fn latest_version(&self, package: &str) -> Result<Option<Version>, QueryFailure> {
        self.bounded("registry query", self.inner.latest_version(package))
            .await
    }

    async fn install(&self, package: &str) -> Result<InstallResult, QueryFailure> {
        self.bounded("install", self.inner.install(package)).await
    }
}
