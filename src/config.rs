use anyhow::Result;
use log::debug;
use reqwest::{Client, redirect::Policy};
use std::path::PathBuf;

use crate::{
    http::HttpClient,
    paths::{default_install_dir, installed_binary_path},
    platform::{ArtifactDescriptor, PlatformKey},
    runtime::Runtime,
};

pub const DEFAULT_REPO: &str = "gpaulo00/gpothos-generator";
pub const DEFAULT_BIN_NAME: &str = "gpothos-generator";
pub const DEFAULT_ARTIFACT_PREFIX: &str = "gpothos";
pub const DEFAULT_RELEASE_HOST: &str = "https://github.com";

/// Release version baked in at build time (see build.rs).
pub const DEFAULT_VERSION: &str = env!("BINSHIM_VERSION");

pub const ENV_REPO: &str = "BINSHIM_REPO";
pub const ENV_RELEASE: &str = "BINSHIM_RELEASE";
pub const ENV_BIN_NAME: &str = "BINSHIM_BIN_NAME";
pub const ENV_ARTIFACT_PREFIX: &str = "BINSHIM_ARTIFACT_PREFIX";
pub const ENV_INSTALL_DIR: &str = "BINSHIM_INSTALL_DIR";
pub const ENV_RELEASE_HOST: &str = "BINSHIM_RELEASE_HOST";
pub const ENV_GITHUB_TOKEN: &str = "GITHUB_TOKEN";

/// Externally supplied identity of the delegate binary and where it lives.
#[derive(Debug, Clone, PartialEq)]
pub struct ShimConfig {
    /// Repository identifier, `owner/name`.
    pub repo: String,
    pub version: String,
    /// Base name of the installed executable.
    pub bin_name: String,
    /// Leading part of every artifact name, e.g. `gpothos` in `gpothos-linux-amd64`.
    pub artifact_prefix: String,
    /// `None` means [`default_install_dir`].
    pub install_dir: Option<PathBuf>,
    pub release_host: String,
}

impl Default for ShimConfig {
    fn default() -> Self {
        Self {
            repo: DEFAULT_REPO.to_string(),
            version: DEFAULT_VERSION.to_string(),
            bin_name: DEFAULT_BIN_NAME.to_string(),
            artifact_prefix: DEFAULT_ARTIFACT_PREFIX.to_string(),
            install_dir: None,
            release_host: DEFAULT_RELEASE_HOST.to_string(),
        }
    }
}

impl ShimConfig {
    /// Defaults overridden by the `BINSHIM_*` environment variables.
    ///
    /// The delegator takes no flags, so this is its only source of settings.
    pub fn from_env<R: Runtime>(runtime: &R) -> Self {
        let var = |key: &str| runtime.env_var(key).ok().filter(|v| !v.is_empty());
        let defaults = Self::default();

        Self {
            repo: var(ENV_REPO).unwrap_or(defaults.repo),
            version: var(ENV_RELEASE).unwrap_or(defaults.version),
            bin_name: var(ENV_BIN_NAME).unwrap_or(defaults.bin_name),
            artifact_prefix: var(ENV_ARTIFACT_PREFIX).unwrap_or(defaults.artifact_prefix),
            install_dir: var(ENV_INSTALL_DIR).map(PathBuf::from),
            release_host: var(ENV_RELEASE_HOST).unwrap_or(defaults.release_host),
        }
    }

    pub fn resolve_install_dir<R: Runtime>(&self, runtime: &R) -> Result<PathBuf> {
        match &self.install_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_install_dir(runtime, &self.bin_name),
        }
    }

    pub fn binary_path<R: Runtime>(&self, runtime: &R, platform: &PlatformKey) -> Result<PathBuf> {
        let dir = self.resolve_install_dir(runtime)?;
        Ok(installed_binary_path(&dir, &self.bin_name, platform))
    }

    /// `{host}/{repo}/releases/download/v{version}/{artifact}`
    pub fn release_url(&self, artifact: &ArtifactDescriptor) -> String {
        let version = self.version.strip_prefix('v').unwrap_or(&self.version);
        format!(
            "{}/{}/releases/download/v{}/{}",
            self.release_host.trim_end_matches('/'),
            self.repo,
            version,
            artifact.name
        )
    }

    /// Builds the download client. Redirects are disabled in reqwest because
    /// [`HttpClient`] follows the single allowed hop itself.
    pub fn http_client<R: Runtime>(&self, runtime: &R) -> Result<HttpClient> {
        let token = runtime.env_var(ENV_GITHUB_TOKEN).ok().filter(|t| !t.is_empty());
        if let Some(token) = &token {
            debug!("Using {} for authentication ({} chars)", ENV_GITHUB_TOKEN, token.len());
        }

        let client = Client::builder()
            .user_agent(concat!("binshim/", env!("BINSHIM_VERSION")))
            .redirect(Policy::none())
            .build()?;

        Ok(HttpClient::new(client).with_token(token))
    }
}
