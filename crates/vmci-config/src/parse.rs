//! TOML loading and serialization for config stores.
//!
//! A store file carries a single `[constants]` table mapping constant
//! names to integers or booleans:
//!
//! ```toml
//! [constants]
//! LA64 = 1
//! useLSX = true
//! ```

use std::io::ErrorKind;
use std::path::Path;

use crate::error::{ConfigError, Result};
use crate::store::{ConfigStore, MemoryConfigStore};

/// Read and parse a store file.
pub fn load_store_toml(path: &Path) -> Result<MemoryConfigStore> {
    let content = std::fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => ConfigError::NotFound {
            path: path.to_path_buf(),
        },
        _ => ConfigError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    parse_store_toml(&content)
}

/// Parse a store from TOML text and check its constant names.
pub fn parse_store_toml(toml_str: &str) -> Result<MemoryConfigStore> {
    let store: MemoryConfigStore = toml::from_str(toml_str)?;
    if let Some(bad) = store
        .names()
        .into_iter()
        .find(|name| name.is_empty() || name.chars().any(char::is_whitespace))
    {
        return Err(ConfigError::InvalidName {
            name: bad.to_string(),
        });
    }
    Ok(store)
}

/// Render a store back to TOML.
pub fn store_to_toml(store: &MemoryConfigStore) -> Result<String> {
    Ok(toml::to_string_pretty(store)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ConfigValue;

    #[test]
    fn parse_mixed_values() {
        let toml_str = r#"
[constants]
LA64 = 1
LSX = 0
useLSX = true
useLASX = false
"#;
        let store = parse_store_toml(toml_str).unwrap();
        assert_eq!(store.len(), 4);
        assert_eq!(store.get("LA64"), Some(ConfigValue::Int(1)));
        assert_eq!(store.get("useLASX"), Some(ConfigValue::Bool(false)));
        assert!(!store.is_set("LSX"));
    }

    #[test]
    fn parse_empty_document() {
        let store = parse_store_toml("").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn parse_rejects_string_values() {
        let toml_str = r#"
[constants]
LA64 = "yes"
"#;
        assert!(matches!(
            parse_store_toml(toml_str),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn parse_rejects_blank_names() {
        let toml_str = r#"
[constants]
"use LSX" = true
"#;
        let err = parse_store_toml(toml_str).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidName { ref name } if name == "use LSX"));
    }

    #[test]
    fn parse_invalid_returns_error() {
        assert!(parse_store_toml("this is not valid toml [[[").is_err());
    }

    #[test]
    fn serialized_store_parses_back() {
        let store = MemoryConfigStore::new()
            .with("FP", 1)
            .with("useCompressedOops", true);
        let toml_str = store_to_toml(&store).unwrap();
        assert!(toml_str.contains("[constants]"));
        assert_eq!(parse_store_toml(&toml_str).unwrap(), store);
    }

    #[test]
    fn load_not_found() {
        let result = load_store_toml(Path::new("/nonexistent/vmci.toml"));
        assert!(matches!(result.unwrap_err(), ConfigError::NotFound { .. }));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vm.toml");
        std::fs::write(&path, "[constants]\nLAM = 1\n").unwrap();

        let store = load_store_toml(&path).unwrap();
        assert!(store.is_set("LAM"));
    }
}
