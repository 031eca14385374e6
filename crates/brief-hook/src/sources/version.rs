//! Installed and latest published version of the hook.

use std::cmp::Ordering;
use std::time::Duration;

use brief_rs::sources::{SourceError, SourceFuture, VersionInfo, VersionLookup};
use serde::Deserialize;
use tracing::debug;

/// Version of this binary.
pub const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

const USER_AGENT: &str = concat!("brief-hook/", env!("CARGO_PKG_VERSION"));

/// Reports the running version and, when enabled, asks a crates registry
/// for the newest stable release.
#[derive(Debug, Clone)]
pub struct RegistryVersionLookup {
    package: String,
    registry_url: String,
    current: String,
    check_updates: bool,
    timeout: Duration,
}

impl RegistryVersionLookup {
    pub fn new(package: impl Into<String>, registry_url: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            registry_url: registry_url.into(),
            current: CURRENT_VERSION.to_string(),
            check_updates: true,
            timeout: Duration::from_secs(2),
        }
    }

    /// Disable the network query; only the installed version is reported.
    pub fn with_check_updates(mut self, enabled: bool) -> Self {
        self.check_updates = enabled;
        self
    }

    /// Override the version treated as installed.
    pub fn with_current(mut self, version: impl Into<String>) -> Self {
        self.current = version.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn upgrade_command(&self) -> String {
        format!("cargo install {} --force", self.package)
    }

    async fn latest_version(&self) -> Result<String, SourceError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(self.timeout)
            .build()
            .map_err(|e| SourceError::Unavailable(format!("failed to build HTTP client: {e}")))?;

        let url = format!("{}/{}", self.registry_url.trim_end_matches('/'), self.package);
        let resp = client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(SourceError::Unavailable(format!(
                "HTTP {} from {url}",
                resp.status()
            )));
        }

        let body: RegistryResponse = resp
            .json()
            .await
            .map_err(|e: reqwest::Error| SourceError::Parse(e.to_string()))?;
        body.krate
            .max_stable_version
            .ok_or_else(|| SourceError::Parse(format!("{} has no stable release", self.package)))
    }

    fn compare(&self, latest: String) -> VersionInfo {
        let update_available = is_newer(&latest, &self.current);
        VersionInfo {
            current: self.current.clone(),
            upgrade_command: update_available.then(|| self.upgrade_command()),
            latest,
            update_available,
        }
    }
}

impl Default for RegistryVersionLookup {
    fn default() -> Self {
        Self::new("brief-hook", "https://crates.io/api/v1/crates")
    }
}

impl VersionLookup for RegistryVersionLookup {
    fn version_info(&self) -> SourceFuture<'_, VersionInfo> {
        Box::pin(async move {
            if !self.check_updates {
                return Ok(VersionInfo::current(&self.current));
            }
            let latest = self.latest_version().await?;
            debug!("Latest {} release: {latest}", self.package);
            Ok(self.compare(latest))
        })
    }
}

#[derive(Deserialize)]
struct RegistryResponse {
    #[serde(rename = "crate")]
    krate: CrateInfo,
}

#[derive(Deserialize)]
struct CrateInfo {
    max_stable_version: Option<String>,
}

/// Numeric components of a dotted version, ignoring any `-pre`/`+build` tail.
fn parse_version(version: &str) -> Option<Vec<u64>> {
    let core = version
        .trim()
        .trim_start_matches('v')
        .split(['-', '+'])
        .next()?;
    core.split('.').map(|part| part.parse().ok()).collect()
}

/// Whether `latest` is strictly newer than `current`. Unparsable versions
/// never count as an update.
fn is_newer(latest: &str, current: &str) -> bool {
    let (Some(latest), Some(current)) = (parse_version(latest), parse_version(current)) else {
        return false;
    };
    let len = latest.len().max(current.len());
    let at = |v: &[u64], i: usize| v.get(i).copied().unwrap_or(0);
    (0..len)
        .map(|i| at(&latest, i).cmp(&at(&current, i)))
        .find(|o| *o != Ordering::Equal)
        == Some(Ordering::Greater)
}
