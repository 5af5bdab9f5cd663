//! Hero fingerprints and save discovery.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::DateTime;
use kbsave_core::{SaveParser, fingerprint_hash, find_most_recent_match, list_saves};

pub fn hash(name: &str) -> Result<()> {
    println!("{}", fingerprint_hash(name));
    Ok(())
}

pub fn find_match(parser: &SaveParser, hash: &str, saves: &[PathBuf]) -> Result<()> {
    let found = find_most_recent_match(parser, saves, hash)
        .with_context(|| format!("No save found for hero {hash}"))?;
    println!("{}", found.display());
    Ok(())
}

pub fn list(dir: &Path, limit: usize) -> Result<()> {
    let saves = list_saves(dir, limit)
        .with_context(|| format!("Failed to list saves in {}", dir.display()))?;

    for save in &saves {
        println!(
            "{}  {:<24} {}",
            format_timestamp(save.modified),
            save.name,
            save.path.display()
        );
    }
    eprintln!("{} saves", saves.len());
    Ok(())
}

fn format_timestamp(secs: u64) -> String {
    i64::try_from(secs)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|time| time.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00:00");
        assert_eq!(format_timestamp(1_707_047_253), "2024-02-04 11:47:33");
        assert_eq!(format_timestamp(u64::MAX), "-");
    }
}
