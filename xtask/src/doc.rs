use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::cargo::{step, OnFailure};

/// Crate whose docs are the entry point (architecture and module overview).
const ENTRY_CRATE: &str = "ecc";

/// `emulator` turns on `ecc/std`, so `ecc::mocks` and `firmware::emulator`
/// are documented alongside the `no_std` core.
const DOC_ARGS: &[&str] = &[
    "doc",
    "--workspace",
    "--no-deps",
    "--document-private-items",
    "--features",
    "firmware/emulator",
];

pub fn run(open: bool) -> Result<()> {
    println!();
    println!("{}", "📚 Building documentation...".cyan().bold());
    println!();

    step("Workspace docs (emulator features)", DOC_ARGS, OnFailure::Abort)?;

    let index = entry_index(&doc_root()?);
    if !index.is_file() {
        anyhow::bail!("{} was not generated", index.display());
    }

    if open {
        step(
            "Open docs",
            &["doc", "--no-deps", "-p", ENTRY_CRATE, "--features", "std", "--open"],
            OnFailure::Warn,
        )?;
    } else {
        println!("   {}", format!("Entry point: {}", index.display()).dimmed());
        println!("   {}", "Or run 'cargo xtask doc --open'".dimmed());
        println!();
    }

    Ok(())
}

/// `target/doc` of this workspace, as reported by cargo.
fn doc_root() -> Result<PathBuf> {
    let output = Command::new("cargo")
        .args(["metadata", "--no-deps", "--format-version", "1"])
        .output()
        .context("Failed to run cargo metadata")?;
    let metadata = String::from_utf8_lossy(&output.stdout);
    let target = target_directory(&metadata).context("cargo metadata has no target_directory")?;
    Ok(Path::new(&target).join("doc"))
}

/// Pull `"target_directory":"..."` out of `cargo metadata` JSON.
fn target_directory(metadata: &str) -> Option<String> {
    let rest = metadata.split("\"target_directory\":\"").nth(1)?;
    let end = rest.find('"')?;
    Some(rest.get(..end)?.replace("\\\\", "\\"))
}

fn entry_index(doc_root: &Path) -> PathBuf {
    doc_root.join(ENTRY_CRATE).join("index.html")
}
