//! Build script stamping the binaries with a source revision

use std::env;
use std::process::Command;

fn git_short_hash() -> Option<String> {
    let output = Command::new("git").args(["rev-parse", "--short", "HEAD"]).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let hash = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!hash.is_empty()).then_some(hash)
}

fn main() {
    // Source tarballs and container builds have no .git; let them pass the revision in
    let revision = env::var("SOURCE_REVISION")
        .ok()
        .filter(|r| !r.trim().is_empty())
        .or_else(git_short_hash)
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=GIT_HASH={revision}");
    println!("cargo:rerun-if-env-changed=SOURCE_REVISION");
    println!("cargo:rerun-if-changed=.git/HEAD");
}
