use std::path::Path;

use anyhow::{Context, Result};
use kbsave_core::SaveParser;

use super::to_json;

pub fn run(parser: &SaveParser, save: &Path) -> Result<()> {
    let hero = parser
        .hero(save)
        .with_context(|| format!("Failed to read hero from {}", save.display()))?;

    if hero.is_empty() {
        eprintln!("No hero name found");
    }
    println!("{}", to_json(&hero, true)?);
    Ok(())
}
