//! CLI command implementations.

pub mod config;
pub mod hero;
pub mod hex_utils;
pub mod hexdump;
pub mod inventory;
pub mod locate;
pub mod profile;
pub mod shops;
pub mod spells;

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

/// Serialize to JSON, compact unless `pretty`
pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

/// Write to `output` when given, else print to stdout
pub fn emit(content: &str, output: Option<&Path>) -> Result<()> {
    if let Some(path) = output {
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        eprintln!("Wrote {}", path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    #[test]
    fn test_to_json_compact_and_pretty() {
        let value = BTreeMap::from([("m_portland_1", 3)]);
        assert_eq!(to_json(&value, false).unwrap(), r#"{"m_portland_1":3}"#);
        assert!(to_json(&value, true).unwrap().contains('\n'));
    }

    #[test]
    fn test_emit_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shops.json");
        emit("{}", Some(&path)).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }
}
