use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-env-changed=BINSHIM_VERSION");

    // Packaging metadata wins; otherwise fall back to the git tag, then the crate version.
    let version = match std::env::var("BINSHIM_VERSION") {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => git_tag_version().unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
    };

    println!("cargo:rustc-env=BINSHIM_VERSION={}", version);
}

fn git_tag_version() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--abbrev=0"])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let git_output = String::from_utf8(output.stdout).ok()?.trim().to_string();

    // Strip 'v' prefix if present (e.g., "v1.0.0" -> "1.0.0")
    let version = git_output.strip_prefix('v').unwrap_or(&git_output);
    if version.is_empty() {
        None
    } else {
        Some(version.to_string())
    }
}
