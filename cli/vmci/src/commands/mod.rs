//! CLI command implementations.

pub mod archs;
pub mod assemble;
pub mod target;
pub mod template;

use std::path::Path;

use anyhow::{Context, Result};
use vmci_backend::{Backend, FactoryRegistry, HostRuntime};
use vmci_config::{load_store_toml, MemoryConfigStore};

/// Load a config file into a host runtime.
pub fn load_runtime(config: &Path) -> Result<HostRuntime<MemoryConfigStore>> {
    let store = load_store_toml(config)
        .with_context(|| format!("loading config {}", config.display()))?;
    log::debug!("loaded {} constants from {}", store.len(), config.display());
    Ok(HostRuntime::new(store))
}

/// Assemble the backend for `arch` from a config file.
pub fn build_backend(config: &Path, arch: &str) -> Result<Backend> {
    let runtime = load_runtime(config)?;
    let registry = FactoryRegistry::builtin();
    let factory = registry.select(arch)?;
    let backend = factory
        .create_backend(&runtime, None)
        .with_context(|| format!("assembling {}", factory.label()))?;
    Ok(backend)
}
