//! Product configuration trait for CLI binaries
//!
//! The binary implements this trait to tell the core library which npm
//! package it is distributed as, how it is launched, and where its registry
//! and settings live.

/// Configuration trait for the CLI product
///
/// Each product defines:
/// - Product identity (name, display name)
/// - Distribution (npm package name, binary name, upgrade command)
/// - Registry source and its environment override
/// - Project-level settings file name
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for env vars and the user agent)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Package name as published in the npm registry
    fn package_name(&self) -> &'static str;

    /// Executable name on `PATH`, used when restarting after an update
    fn bin_name(&self) -> &'static str;

    /// Default registry base URL for latest-version lookups
    fn default_registry_url(&self) -> &'static str;

    /// Environment variable name for overriding the registry URL
    fn registry_url_env(&self) -> &'static str;

    /// File name of the optional project-level settings file
    fn settings_file(&self) -> &'static str;

    /// URL shown in the intro banner
    fn homepage_url(&self) -> &'static str;

    /// Where contributors learn how to add their own commands
    fn contributing_hint(&self) -> &'static str;

    /// Manual upgrade command shown when an automatic update fails
    fn upgrade_command(&self) -> &'static str;

    /// User agent string for HTTP requests
    fn user_agent(&self) -> &'static str {
        self.name()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::ProductConfig;

    /// Minimal product used across unit tests
    #[derive(Clone)]
    pub struct TestProduct;

    impl ProductConfig for TestProduct {
        fn name(&self) -> &'static str {
            "testcli"
        }

        fn display_name(&self) -> &'static str {
            "Test CLI"
        }

        fn package_name(&self) -> &'static str {
            "test-cli"
        }

        fn bin_name(&self) -> &'static str {
            "test-cli"
        }

        fn default_registry_url(&self) -> &'static str {
            "https://registry.npmjs.org"
        }

        fn registry_url_env(&self) -> &'static str {
            "TESTCLI_REGISTRY_URL"
        }

        fn settings_file(&self) -> &'static str {
            "testcli.yaml"
        }

        fn homepage_url(&self) -> &'static str {
            "https://example.com"
        }

        fn contributing_hint(&self) -> &'static str {
            "See README.md"
        }

        fn upgrade_command(&self) -> &'static str {
            "npm i -g test-cli"
        }
    }
}
