//! Hero inventory export.
//!
//! Without a content database the prefix rules decide what counts as an
//! item. `--accept-prefix` narrows them to known item families.

use std::path::Path;

use anyhow::{Context, Result};
use kbsave_core::{PrefixRules, SaveParser};

use super::{emit, to_json};

pub fn run(
    parser: &SaveParser,
    save: &Path,
    accept_prefixes: &[String],
    output: Option<&Path>,
    pretty: bool,
) -> Result<()> {
    let rules = PrefixRules::hero_items().with_accept_prefixes(accept_prefixes.iter().cloned());

    let Some(inventory) = parser
        .hero_inventory(save, &rules)
        .with_context(|| format!("Failed to parse save {}", save.display()))?
    else {
        eprintln!("No hero inventory section found");
        return Ok(());
    };

    eprintln!(
        "Hero inventory @0x{:X}: {} items",
        inventory.offset,
        inventory.items.len()
    );
    emit(&to_json(&inventory, pretty)?, output)
}
