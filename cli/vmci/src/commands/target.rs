//! `vmci target`: show the target description built from a config file.

use std::path::Path;

use anyhow::{Context, Result};

use super::build_backend;

/// Render the target description for `arch`, as text or JSON.
pub fn render(config: &Path, arch: &str, json: bool) -> Result<String> {
    let backend = build_backend(config, arch)?;
    let target = backend.target();
    if json {
        serde_json::to_string_pretty(target).context("serializing target description")
    } else {
        Ok(target.to_string())
    }
}

pub fn run(config: &Path, arch: &str, json: bool) -> Result<()> {
    println!("{}", render(config, arch, json)?);
    Ok(())
}
