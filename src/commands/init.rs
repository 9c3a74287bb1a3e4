//! `philosophy init`: write a default `philosophy.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use crossterm::style::Stylize;

use crate::config;

/// Entry point called from `main`. Writes to `--config` when given, otherwise
/// to `./philosophy.toml`.
pub fn run(target: Option<&Path>, force: bool) -> Result<()> {
    let path = match target {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir()?.join(config::FILE_NAME),
    };
    run_at(&path, force)?;
    println!("  {} {}", "Created".green().bold(), path.display());
    println!(
        "  {} {}",
        "Next".cyan().bold(),
        "run `philosophy view` to start thinking".dark_grey()
    );
    Ok(())
}

/// Write the default configuration to `path`.
pub fn run_at(path: &Path, force: bool) -> Result<PathBuf> {
    if path.exists() && !force {
        bail!(
            "{} already exists. Pass --force to overwrite it.",
            path.display()
        );
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, config::DEFAULT_CONTENTS)
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), force, "configuration written");
    Ok(path.to_path_buf())
}
