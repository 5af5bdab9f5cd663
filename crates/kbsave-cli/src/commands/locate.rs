//! Shop and section layout of a save, for investigating format drift.
//!
//! ```text
//! 0x0001A2F0  named            m_portland_1
//!             units     0x0001A0C4..0x0001A1B0  (3 records)
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use kbsave_core::SaveParser;

pub fn run(parser: &SaveParser, save: &Path) -> Result<()> {
    let shops = parser
        .locate(save)
        .with_context(|| format!("Failed to parse save {}", save.display()))?;

    for shop in &shops {
        println!(
            "0x{:08X}  {:<16} {}",
            shop.location.offset,
            shop.location.kind.to_string(),
            shop.location.shop_id
        );
        for span in &shop.spans {
            println!(
                "            {:<9} 0x{:08X}..0x{:08X}  ({} records)",
                span.kind.to_string(),
                span.start,
                span.end,
                shop.inventory.section(span.kind).len()
            );
        }
    }

    eprintln!("{} shops located", shops.len());
    Ok(())
}
