//! Items carried by the hero
//!
//! The hero's backpack uses the same `.items` encoding as shops but is not
//! followed by a shop identity. Several such sections exist (achievements,
//! talents, companions), so the one whose records best match known item
//! content wins.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ScanConfig;
use crate::content::ContentLookup;
use crate::scan::markers::ITEMS;
use crate::scan::records::{RecordEncoding, RecordScanner};
use crate::scan::sections::section_end;
use crate::scan::utils::find_all;
use crate::shop::types::{InventoryRecord, SectionSpan};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroInventory {
    /// Offset of the `.items` marker the records came from
    pub offset: usize,
    pub items: Vec<InventoryRecord>,
}

#[derive(Debug, Clone, Copy)]
pub struct HeroInventoryExtractor {
    scanner: RecordScanner,
    window: usize,
}

impl Default for HeroInventoryExtractor {
    fn default() -> Self {
        Self::new(&ScanConfig::default())
    }
}

impl HeroInventoryExtractor {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            scanner: RecordScanner::new(config),
            window: config.hero_inventory_window,
        }
    }

    /// Best `.items` section outside every shop span, or None if no section
    /// yields a known item
    pub fn extract<L>(
        &self,
        data: &[u8],
        shop_spans: &[SectionSpan],
        lookup: &L,
    ) -> Option<HeroInventory>
    where
        L: ContentLookup + ?Sized,
    {
        let mut best: Option<HeroInventory> = None;

        for offset in find_all(data, ITEMS) {
            if shop_spans.iter().any(|span| span.start <= offset && offset < span.end) {
                continue;
            }

            let limit = (offset + self.window).min(data.len());
            let end = section_end(data, offset, limit);
            let items: Vec<InventoryRecord> = self
                .scanner
                .scan(
                    data,
                    offset,
                    end,
                    ITEMS.len(),
                    RecordEncoding::PrefixedWithMetadata,
                )
                .into_iter()
                .filter(|record| lookup.is_item(&record.name))
                .collect();

            debug!(
                "Hero inventory candidate @{}..{}: {} items",
                offset,
                end,
                items.len()
            );

            let better = match &best {
                Some(current) => items.len() > current.items.len(),
                None => !items.is_empty(),
            };
            if better {
                best = Some(HeroInventory { offset, items });
            }
        }

        best
    }
}
