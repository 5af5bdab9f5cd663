use std::path::Path;

use anyhow::{Context, Result};
use kbsave_core::parse_spells_file;

use super::to_json;

pub fn run(file: &Path, pretty: bool) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let spells = parse_spells_file(&text);
    eprintln!("Parsed {} spells", spells.len());
    println!("{}", to_json(&spells, pretty)?);
    Ok(())
}
