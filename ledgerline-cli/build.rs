use std::path::Path;
use std::process::Command;

/// `git describe` output for the workspace, e.g. `3f2a91c` or `3f2a91c-dirty`.
fn describe(repo_root: &Path) -> Option<String> {
    let out = Command::new("git")
        .arg("-C")
        .arg(repo_root)
        .args(["describe", "--always", "--dirty", "--abbrev=8"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let rev = String::from_utf8(out.stdout).ok()?.trim().to_string();
    (!rev.is_empty()).then_some(rev)
}

fn main() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let repo_root = Path::new(&manifest_dir).join("..");

    let rev = describe(&repo_root).unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=LEDGERLINE_BUILD_SHA={rev}");

    for watched in [".git/HEAD", ".git/index", ".git/refs"] {
        println!("cargo:rerun-if-changed={}", repo_root.join(watched).display());
    }
}
