//! Latest-version lookups against the npm registry HTTP API
//!
//! Only the "latest" question goes over HTTP. The installed version and the
//! install itself still belong to the local package manager, so those are
//! delegated to an inner `NpmOracle`.

use super::error::QueryFailure;
use super::oracle::{InstallResult, NpmOracle, VersionOracle};
use super::version::parse_version;
use crate::product::ProductConfig;
use semver::Version;
use serde::Deserialize;
use url::Url;

/// The subset of `GET /<package>/latest` we read
#[derive(Debug, Deserialize)]
struct LatestManifest {
    version: String,
}

/// Oracle that asks the registry directly for the latest published version
pub struct RegistryOracle {
    base_url: Url,
    client: reqwest::Client,
    local: NpmOracle,
}

impl RegistryOracle {
    /// Create a registry oracle with a custom user agent
    pub fn new(base_url: &str, user_agent: &str, local: NpmOracle) -> Result<Self, QueryFailure> {
        let base_url = Url::parse(base_url).map_err(|e| QueryFailure::InvalidRegistry {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            base_url,
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            local,
        })
    }

    /// Create a registry oracle from a product config and a resolved registry URL
    pub fn from_config<C: ProductConfig>(config: &C, registry_url: &str) -> Result<Self, QueryFailure> {
        Self::new(registry_url, config.user_agent(), NpmOracle::new())
    }

    /// Build `<base>/<package>/latest`, preserving query parameters
    ///
    /// Scoped names keep their `@` and get the `/` percent-encoded, which is
    /// what the registry expects (`@scope%2Fname`).
    fn latest_url(base: &Url, package: &str) -> Result<Url, QueryFailure> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| QueryFailure::InvalidRegistry {
                url: base.to_string(),
                reason: "URL cannot have path segments".to_string(),
            })?
            .pop_if_empty()
            .push(package)
            .push("latest");
        Ok(url)
    }
}

impl VersionOracle for RegistryOracle {
    async fn installed_version(&self, package: &str) -> Result<Option<Version>, QueryFailure> {
        self.local.installed_version(package).await
    }

    async fn latest_version(&self, package: &str) -> Result<Option<Version>, QueryFailure> {
        let url = Self::latest_url(&self.base_url, package)?;

        // An unreachable registry is an absent answer, not a broken mechanism
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(_) => return Ok(None),
        };
        if !response.status().is_success() {
            return Ok(None);
        }

        match response.json::<LatestManifest>().await {
            Ok(manifest) => Ok(parse_version(&manifest.version)),
            Err(_) => Ok(None),
        }
    }

    async fn install(&self, package: &str) -> Result<InstallResult, QueryFailure> {
        self.local.install(package).await
    }
}
