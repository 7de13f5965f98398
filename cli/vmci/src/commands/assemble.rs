//! `vmci assemble`: run full backend assembly and print the report.

use std::path::Path;

use anyhow::{Context, Result};
use vmci_backend::FactoryRegistry;

use super::load_runtime;

pub fn render(config: &Path, arch: &str) -> Result<String> {
    let runtime = load_runtime(config)?;
    let registry = FactoryRegistry::builtin();
    let factory = registry.select(arch)?;
    let (_backend, report) = factory
        .assemble_with_report(&runtime)
        .with_context(|| format!("assembling {}", factory.label()))?;
    Ok(report.to_string())
}

pub fn run(config: &Path, arch: &str) -> Result<()> {
    print!("{}", render(config, arch)?);
    Ok(())
}
