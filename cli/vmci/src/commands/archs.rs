//! `vmci archs`: list registered backend factories.

use anyhow::Result;
use vmci_backend::FactoryRegistry;

pub fn render(registry: &FactoryRegistry) -> String {
    let mut out = String::from("Available backends:\n\n");
    for factory in registry.factories() {
        out.push_str(&format!("  {:<15} {}\n", factory.architecture(), factory.label()));
    }
    out
}

pub fn run() -> Result<()> {
    print!("{}", render(&FactoryRegistry::builtin()));
    Ok(())
}
