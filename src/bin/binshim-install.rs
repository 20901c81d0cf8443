use anyhow::Result;
use binshim::config::{
    DEFAULT_ARTIFACT_PREFIX, DEFAULT_BIN_NAME, DEFAULT_RELEASE_HOST, DEFAULT_REPO,
    DEFAULT_VERSION, ENV_ARTIFACT_PREFIX, ENV_BIN_NAME, ENV_INSTALL_DIR, ENV_RELEASE,
    ENV_RELEASE_HOST, ENV_REPO, ShimConfig,
};
use clap::Parser;
use std::path::PathBuf;

/// binshim-install - download the prebuilt binary for this machine
///
/// Picks the release artifact matching the host OS, CPU architecture and
/// (on Linux x64) C library, downloads it and installs it as an executable
/// that `binshim` delegates to.
///
/// If the GITHUB_TOKEN environment variable is set, it will be used for authentication.
#[derive(Parser, Debug)]
#[command(author, version = DEFAULT_VERSION, about)]
struct Cli {
    /// Repository publishing the releases, "owner/repo"
    #[arg(long, env = ENV_REPO, value_name = "OWNER/REPO", default_value = DEFAULT_REPO)]
    repo: String,

    /// Release version to install (with or without a leading "v")
    #[arg(long = "release", env = ENV_RELEASE, value_name = "VERSION", default_value = DEFAULT_VERSION)]
    release: String,

    /// Base name of the installed executable
    #[arg(long, env = ENV_BIN_NAME, value_name = "NAME", default_value = DEFAULT_BIN_NAME)]
    bin_name: String,

    /// Prefix of the release artifact names
    #[arg(long, env = ENV_ARTIFACT_PREFIX, value_name = "PREFIX", default_value = DEFAULT_ARTIFACT_PREFIX)]
    artifact_prefix: String,

    /// Directory to install the executable into
    #[arg(long, env = ENV_INSTALL_DIR, value_name = "PATH")]
    install_dir: Option<PathBuf>,

    /// Base URL of the release host
    #[arg(long, env = ENV_RELEASE_HOST, value_name = "URL", default_value = DEFAULT_RELEASE_HOST)]
    release_host: String,
}

impl From<Cli> for ShimConfig {
    fn from(cli: Cli) -> Self {
        ShimConfig {
            repo: cli.repo,
            version: cli.release,
            bin_name: cli.bin_name,
            artifact_prefix: cli.artifact_prefix,
            install_dir: cli.install_dir,
            release_host: cli.release_host,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = binshim::runtime::RealRuntime;

    binshim::install::install(runtime, cli.into()).await?;
    Ok(())
}
