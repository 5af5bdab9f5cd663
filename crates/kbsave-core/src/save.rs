//! Single entry point from a save on disk to its decoded report

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ScanConfig;
use crate::container::{PayloadKind, SaveSource, decode};
use crate::content::ContentLookup;
use crate::error::Result;
use crate::hero::{HeroIdentity, HeroIdentityExtractor, HeroInventory, HeroInventoryExtractor};
use crate::shop::assembler::index_by_id;
use crate::shop::{AssembledShop, ShopInventory, ShopInventoryAssembler};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveReport {
    pub shops: BTreeMap<String, ShopInventory>,
    pub hero: HeroIdentity,
    /// Only looked up when the caller supplies a content lookup
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero_inventory: Option<HeroInventory>,
}

#[derive(Debug, Clone)]
pub struct SaveParser {
    config: ScanConfig,
    assembler: ShopInventoryAssembler,
    identity: HeroIdentityExtractor,
    inventory: HeroInventoryExtractor,
}

impl Default for SaveParser {
    fn default() -> Self {
        Self::new(ScanConfig::default())
    }
}

impl SaveParser {
    pub fn new(config: ScanConfig) -> Self {
        Self {
            assembler: ShopInventoryAssembler::new(&config),
            identity: HeroIdentityExtractor::new(&config),
            inventory: HeroInventoryExtractor::new(&config),
            config,
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn open<P: AsRef<Path>>(&self, path: P) -> Result<SaveSource> {
        SaveSource::open(path, self.config.max_archive_size)
    }

    /// Decoded primary payload of a save
    pub fn decode_primary<P: AsRef<Path>>(&self, path: P) -> Result<Vec<u8>> {
        self.open(path)?.decode(PayloadKind::Primary)
    }

    /// Decode a save and extract everything from it
    pub fn parse<P: AsRef<Path>>(
        &self,
        path: P,
        lookup: Option<&dyn ContentLookup>,
    ) -> Result<SaveReport> {
        let source = self.open(path)?;
        info!("Parsing save {}", source.path().display());

        let primary = source.decode(PayloadKind::Primary)?;
        let auxiliary = source
            .try_read_raw(PayloadKind::Auxiliary)?
            .map(|raw| decode(&raw))
            .transpose()?;

        Ok(self.parse_payloads(&primary, auxiliary.as_deref(), lookup))
    }

    /// Extract from already decoded payloads
    pub fn parse_payloads(
        &self,
        primary: &[u8],
        auxiliary: Option<&[u8]>,
        lookup: Option<&dyn ContentLookup>,
    ) -> SaveReport {
        let detailed = self.assembler.assemble_detailed(primary);
        let spans: Vec<_> = detailed.iter().flat_map(|s| s.spans.iter().copied()).collect();
        let shops = index_by_id(detailed);

        let hero = self.identity.extract(primary, auxiliary);
        debug!("Hero: '{}' ({})", hero.full_name, hero.fingerprint_hash);

        let hero_inventory =
            lookup.and_then(|lookup| self.inventory.extract(primary, &spans, lookup));

        SaveReport {
            shops,
            hero,
            hero_inventory,
        }
    }

    /// Hero identity only; the primary payload is decoded only when the save
    /// has no auxiliary payload
    pub fn hero<P: AsRef<Path>>(&self, path: P) -> Result<HeroIdentity> {
        let source = self.open(path)?;
        match source.try_read_raw(PayloadKind::Auxiliary)? {
            Some(raw) => {
                let info = decode(&raw)?;
                Ok(self.identity.extract(&[], Some(info.as_slice())))
            }
            None => Ok(self.identity.from_legacy_scan(&source.decode(PayloadKind::Primary)?)),
        }
    }

    /// Located shops with their resolved spans, for inspecting a save
    pub fn locate<P: AsRef<Path>>(&self, path: P) -> Result<Vec<AssembledShop>> {
        let primary = self.decode_primary(path)?;
        Ok(self.assembler.assemble_detailed(&primary))
    }

    /// Hero inventory of a save on disk
    pub fn hero_inventory<P, L>(&self, path: P, lookup: &L) -> Result<Option<HeroInventory>>
    where
        P: AsRef<Path>,
        L: ContentLookup + ?Sized,
    {
        let primary = self.decode_primary(path)?;
        let spans: Vec<_> = self
            .assembler
            .assemble_detailed(&primary)
            .into_iter()
            .flat_map(|s| s.spans)
            .collect();
        Ok(self.inventory.extract(&primary, &spans, lookup))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::PrefixRules;
    use crate::shop::InventoryRecord;

    fn utf16(text: &str) -> Vec<u8> {
        text.encode_utf16().flat_map(|u| u.to_le_bytes()).collect()
    }

    fn prefixed(value: &str) -> Vec<u8> {
        let mut out = (value.len() as u32).to_le_bytes().to_vec();
        out.extend_from_slice(value.as_bytes());
        out
    }

    fn primary() -> Vec<u8> {
        let mut data = vec![0u8; 16];
        data.extend_from_slice(b".items");
        data.extend(prefixed("kerus_sword"));
        data.extend([0u8; 24]);
        data.extend_from_slice(b".temp");
        data.extend([0u8; 8]);

        data.extend_from_slice(b".items");
        data.extend(prefixed("flame_helmet"));
        data.extend([0u8; 24]);
        data.extend(utf16("itext_m_portland_3"));
        data.extend([0u8; 8]);
        data
    }

    fn info(name: &str) -> Vec<u8> {
        let mut out = b"name".to_vec();
        out.extend_from_slice(&(name.encode_utf16().count() as u32).to_le_bytes());
        out.extend(utf16(name));
        out
    }

    #[test]
    fn test_parse_payloads() {
        let parser = SaveParser::default();
        let rules = PrefixRules::hero_items();
        let info = info("Даэрт");
        let report = parser.parse_payloads(
            &primary(),
            Some(info.as_slice()),
            Some(&rules as &dyn ContentLookup),
        );

        assert_eq!(report.shops.len(), 1);
        assert_eq!(
            report.shops["m_portland_3"].items,
            vec![InventoryRecord::new("flame_helmet", 1)]
        );
        assert_eq!(report.hero.first_name, "Даэрт");

        // the shop's own section is not the hero's
        let inventory = report.hero_inventory.unwrap();
        assert_eq!(inventory.offset, 16);
        assert_eq!(inventory.items, vec![InventoryRecord::new("kerus_sword", 1)]);
    }

    #[test]
    fn test_hero_inventory_needs_lookup() {
        let report = SaveParser::default().parse_payloads(&primary(), None, None);
        assert!(report.hero_inventory.is_none());
        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains("hero_inventory"));
    }

    #[test]
    fn test_parse_is_idempotent() {
        let parser = SaveParser::default();
        let data = primary();
        assert_eq!(
            parser.parse_payloads(&data, None, None),
            parser.parse_payloads(&data, None, None)
        );
    }

    #[test]
    fn test_missing_save() {
        let err = SaveParser::default().parse("/nonexistent/save", None).unwrap_err();
        assert!(err.is_not_found());
    }
}
