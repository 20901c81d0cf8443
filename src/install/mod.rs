use anyhow::Result;
use log::debug;
use std::path::PathBuf;
use std::sync::Arc;

use crate::{
    cleanup::new_shared,
    config::ShimConfig,
    download::ArtifactFetcher,
    platform::{LibcDetector, PlatformKey, PlatformResolver, ProbeLibcDetector},
    runtime::Runtime,
};

/// Installs the delegate binary for the current machine.
/// Returns the path of the installed executable.
#[tracing::instrument(skip(runtime, config))]
pub async fn install<R: Runtime>(runtime: R, config: ShimConfig) -> Result<PathBuf> {
    let platform = PlatformKey::detect();
    debug!("Detected platform {}", platform);
    run(&runtime, &config, &platform, ProbeLibcDetector::new(&runtime)).await
}

#[tracing::instrument(skip(runtime, config, libc))]
pub async fn run<R: Runtime, D: LibcDetector>(
    runtime: &R,
    config: &ShimConfig,
    platform: &PlatformKey,
    libc: D,
) -> Result<PathBuf> {
    let resolver = PlatformResolver::new(config.artifact_prefix.as_str(), libc);
    let artifact = resolver.resolve(platform)?;

    let dest = config.binary_path(runtime, platform)?;
    let url = config.release_url(&artifact);
    let http_client = config.http_client(runtime)?;

    println!("Downloading {} from {}...", artifact, url);

    // Set up cleanup context for Ctrl-C handling
    let cleanup_ctx = new_shared();
    let cleanup_ctx_clone = Arc::clone(&cleanup_ctx);

    let ctrl_c_handler = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nInterrupted, cleaning up...");
            if let Ok(ctx) = cleanup_ctx_clone.lock() {
                ctx.cleanup();
            }
            std::process::exit(130); // Standard exit code for Ctrl-C
        }
    });

    let fetcher = ArtifactFetcher::new(runtime, &http_client, Arc::clone(&cleanup_ctx));
    let result = fetcher.fetch(&url, &dest, platform).await;

    // Abort the Ctrl-C handler since the download completed (successfully or with error)
    ctrl_c_handler.abort();

    result?;

    println!("Download complete.");
    Ok(dest)
}
