//! Shop inventory export.

use std::path::Path;

use anyhow::{Context, Result};
use kbsave_core::SaveParser;

use super::{emit, to_json};

pub fn run(parser: &SaveParser, save: &Path, output: Option<&Path>, pretty: bool) -> Result<()> {
    eprintln!("kbsave {} - Shops", env!("CARGO_PKG_VERSION"));

    let report = parser
        .parse(save, None)
        .with_context(|| format!("Failed to parse save {}", save.display()))?;

    let stocked = report.shops.values().filter(|s| !s.is_empty()).count();
    eprintln!(
        "Decoded {} shops ({} with inventory)",
        report.shops.len(),
        stocked
    );

    emit(&to_json(&report.shops, pretty)?, output)
}
