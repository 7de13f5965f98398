//! `vmci template`: print a sample runtime config file.

use anyhow::{Context, Result};
use vmci_config::{store_to_toml, MemoryConfigStore};

/// Sample constants covering capabilities, flags and layout options.
pub fn sample_store() -> MemoryConfigStore {
    MemoryConfigStore::new()
        .with("LA64", 1)
        .with("FP", 1)
        .with("LSX", 1)
        .with("LASX", 0)
        .with("UAL", 1)
        .with("useLSX", true)
        .with("useLASX", false)
        .with("useCompressedOops", true)
}

pub fn render() -> Result<String> {
    let body = store_to_toml(&sample_store()).context("serializing sample config")?;
    Ok(format!(
        "# Runtime constants read by `vmci target` and `vmci assemble`.\n\
         # Capabilities: nonzero integer means present. Flags: booleans.\n{body}"
    ))
}

pub fn run() -> Result<()> {
    print!("{}", render()?);
    Ok(())
}
