//! Version scraping and comparison for installed and published releases

use regex::Regex;
use semver::Version;
use std::cmp::Ordering;
use std::sync::LazyLock;

static SEMVER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"v?(\d+\.\d+\.\d+(?:-[0-9A-Za-z.-]+)?(?:\+[0-9A-Za-z.-]+)?)").unwrap()
});

/// Parse version string, handling a leading `v`
pub fn parse_version(version_str: &str) -> Option<Version> {
    let trimmed = version_str.trim();
    let cleaned = trimmed.strip_prefix('v').unwrap_or(trimmed);
    Version::parse(cleaned).ok()
}

/// Return the first valid semantic version found anywhere in `text`
pub fn extract_version(text: &str) -> Option<Version> {
    SEMVER_PATTERN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .find_map(|m| Version::parse(m.as_str()).ok())
}

/// Find the version of `package` in the output of `npm list -g`
///
/// Lines look like `├── nitro-cli@1.2.0` or `└── @scope/pkg@2.0.0 -> ./link`.
/// The package name must start the token, so `other-nitro-cli@3.0.0` does not
/// match `nitro-cli`.
pub fn version_from_listing(listing: &str, package: &str) -> Option<Version> {
    let needle = format!("{}@", package);

    listing.lines().find_map(|line| {
        line.match_indices(&needle).find_map(|(idx, _)| {
            let starts_token = line[..idx]
                .chars()
                .next_back()
                .map_or(true, |c| c.is_whitespace());
            if starts_token {
                extract_version(&line[idx + needle.len()..])
            } else {
                None
            }
        })
    })
}

/// Whether `latest` should replace `installed`
///
/// Uses semantic-version precedence, so build metadata never triggers an update.
pub fn is_newer(installed: &Version, latest: &Version) -> bool {
    installed.cmp_precedence(latest) == Ordering::Less
}
