use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Embeds `git describe` output as `CHART_ANNOTATIONS_GIT_HASH` for `--version`.
fn main() {
    let root = PathBuf::from(env::var_os("CARGO_MANIFEST_DIR").unwrap_or_else(|| ".".into()));

    let hash = git(&root, &["describe", "--always", "--dirty", "--abbrev=8"])
        .unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=CHART_ANNOTATIONS_GIT_HASH={hash}");
    println!("cargo:rerun-if-changed=build.rs");

    // Rebuild when HEAD moves or the work tree gets dirty
    if let Some(git_dir) = git(&root, &["rev-parse", "--absolute-git-dir"]) {
        let git_dir = PathBuf::from(git_dir);
        for name in ["HEAD", "index", "packed-refs", "refs"] {
            let path = git_dir.join(name);
            if path.exists() {
                println!("cargo:rerun-if-changed={}", path.display());
            }
        }
    }
}

/// Runs git in `dir`; `None` when git is missing, fails, or prints nothing.
fn git(dir: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new("git").current_dir(dir).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8(output.stdout).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
