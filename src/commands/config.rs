//! `philosophy config`: print the configuration in effect.

use std::path::Path;

use anyhow::Result;

use crate::config::{self, Config};

pub fn run(config: &Config, explicit: Option<&Path>) -> Result<()> {
    let source = config::resolve_path(explicit);
    print!("{}", render(config, source.as_deref())?);
    Ok(())
}

/// The effective configuration as TOML, headed by a comment naming its source.
fn render(config: &Config, source: Option<&Path>) -> Result<String> {
    let header = match source {
        Some(path) => format!("# loaded from {}\n", path.display()),
        None => "# built-in defaults\n".to_string(),
    };
    Ok(header + &config.to_toml()?)
}
