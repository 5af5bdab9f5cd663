use std::collections::BTreeMap;

use tracing::{debug, info};

use super::types::{SectionSpan, ShopInventory, ShopLocation};
use crate::config::ScanConfig;
use crate::scan::{RecordScanner, SectionResolver, ShopLocator};

/// A located shop together with the spans its inventory was read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledShop {
    pub location: ShopLocation,
    pub spans: Vec<SectionSpan>,
    pub inventory: ShopInventory,
}

#[derive(Debug, Clone)]
pub struct ShopInventoryAssembler {
    locator: ShopLocator,
    resolver: SectionResolver,
    scanner: RecordScanner,
}

impl Default for ShopInventoryAssembler {
    fn default() -> Self {
        Self::new(&ScanConfig::default())
    }
}

impl ShopInventoryAssembler {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            locator: ShopLocator::new(config),
            resolver: SectionResolver::new(config),
            scanner: RecordScanner::new(config),
        }
    }

    /// Inventories keyed by shop id, shops without records included
    pub fn assemble(&self, data: &[u8]) -> BTreeMap<String, ShopInventory> {
        index_by_id(self.assemble_detailed(data))
    }

    /// Every located shop in offset order
    pub fn assemble_detailed(&self, data: &[u8]) -> Vec<AssembledShop> {
        self.locator
            .locate(data)
            .into_iter()
            .map(|location| self.assemble_one(data, location))
            .collect()
    }

    fn assemble_one(&self, data: &[u8], location: ShopLocation) -> AssembledShop {
        debug!("Shop {} @{}", location.shop_id, location.offset);

        let spans = self.resolver.resolve(data, location.offset);
        let mut inventory = ShopInventory::new(location.shop_id.clone());
        for span in &spans {
            *inventory.section_mut(span.kind) = self.scanner.scan_span(data, span);
        }

        AssembledShop {
            location,
            spans,
            inventory,
        }
    }
}

/// Key assembled shops by id; a repeated id overwrites the earlier entry
pub fn index_by_id(detailed: Vec<AssembledShop>) -> BTreeMap<String, ShopInventory> {
    let mut shops = BTreeMap::new();
    for shop in detailed {
        let id = shop.inventory.shop_id.clone();
        if shops.insert(id, shop.inventory).is_some() {
            debug!(
                "Shop {} seen again @{}, keeping the later one",
                shop.location.shop_id, shop.location.offset
            );
        }
    }

    let stocked = shops.values().filter(|s| !s.is_empty()).count();
    info!(
        "Assembled {} shop inventories ({} with records)",
        shops.len(),
        stocked
    );
    shops
}
