//! Shop identity discovery
//!
//! Two addressing schemes coexist in a save:
//!
//! - named shops carry a UTF-16LE `itext_<location>_<n>` string
//! - anonymous shops carry an ASCII `building_trader@<n>` marker; their
//!   location comes from a preceding `lt` tag and their actor binding from
//!   a preceding `.actors` field

use std::collections::HashSet;

use memchr::memmem;
use tracing::{debug, info};

use super::markers::{
    ACTOR_ACTIVE_BIT, ACTORS, ACTORS_STRG_DISTANCE, LOCATION_TAG, NAMED_SHOP_PREFIX, SHOP_UNITS,
    STRG, TRADER_PREFIX,
};
use super::utils::{ascii_str, find_in, read_u32_le, rfind_in};
use crate::config::ScanConfig;
use crate::shop::types::{ShopKind, ShopLocation};

/// Exclusive bounds of an `lt` tag's name length
const LOCATION_LEN_MIN: usize = 1;
const LOCATION_LEN_MAX: usize = 100;

#[derive(Debug, Clone)]
pub struct ShopLocator {
    window_size: usize,
    window_overlap: usize,
    section_lookback: usize,
    location_lookback: usize,
    actors_lookback: usize,
}

impl Default for ShopLocator {
    fn default() -> Self {
        Self::new(&ScanConfig::default())
    }
}

impl ShopLocator {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            window_size: config.window_size.max(2),
            window_overlap: config.window_overlap,
            section_lookback: config.section_lookback,
            location_lookback: config.location_lookback,
            actors_lookback: config.actors_lookback,
        }
    }

    /// All shops in the save, sorted by offset, with distinct offsets and ids
    pub fn locate(&self, data: &[u8]) -> Vec<ShopLocation> {
        let mut found = self.locate_named(data);
        found.extend(self.locate_anonymous(data));

        found.sort_by_key(|shop| shop.offset);
        found.dedup_by_key(|shop| shop.offset);

        let mut seen = HashSet::new();
        found.retain(|shop| seen.insert(shop.shop_id.clone()));

        let named = found.iter().filter(|s| s.kind == ShopKind::Named).count();
        info!(
            "Located {} shops ({} named, {} anonymous)",
            found.len(),
            named,
            found.len() - named
        );
        found
    }

    /// Named shops, scanned in windows with a trailing overlap
    pub fn locate_named(&self, data: &[u8]) -> Vec<ShopLocation> {
        let mut shops = Vec::new();
        let mut consumed_until = 0;

        let mut window_start = 0;
        while window_start < data.len() {
            let owned_end = (window_start + self.window_size).min(data.len());
            let slice_end = (owned_end + self.window_overlap).min(data.len());
            let slice = &data[window_start..slice_end];

            for rel in memmem::find_iter(slice, NAMED_SHOP_PREFIX) {
                let offset = window_start + rel;
                if offset >= owned_end {
                    break;
                }
                if offset < consumed_until {
                    continue;
                }

                let body = utf16_identifier_run(&slice[rel + NAMED_SHOP_PREFIX.len()..]);
                if let Some((shop_id, consumed_units)) = split_named_identifier(&body) {
                    consumed_until = offset + NAMED_SHOP_PREFIX.len() + consumed_units * 2;
                    debug!("Named shop {} @{}", shop_id, offset);
                    shops.push(ShopLocation {
                        shop_id,
                        offset,
                        kind: ShopKind::Named,
                    });
                }
            }

            window_start += self.window_size;
        }

        shops
    }

    /// Anonymous shops that own the inventory sections preceding them
    pub fn locate_anonymous(&self, data: &[u8]) -> Vec<ShopLocation> {
        let mut shops = Vec::new();

        for offset in memmem::find_iter(data, TRADER_PREFIX) {
            let digits_start = offset + TRADER_PREFIX.len();
            let digits = leading_digits(&data[digits_start..]);
            if digits.is_empty() {
                continue;
            }

            if !self.owns_sections(data, offset) {
                debug!("Trader marker @{} does not own a shop section, skipping", offset);
                continue;
            }

            let Some(location) = self.location_before(data, offset) else {
                debug!("Trader marker @{} has no location tag, skipping", offset);
                continue;
            };

            let (shop_id, kind) = match self.actor_before(data, offset) {
                Some(actor) => (format!("{location}_actor_{actor}"), ShopKind::Actor),
                None => (
                    format!("{location}_building_trader_{digits}"),
                    ShopKind::BuildingTrader,
                ),
            };

            debug!("Anonymous shop {} @{}", shop_id, offset);
            shops.push(ShopLocation {
                shop_id,
                offset,
                kind,
            });
        }

        shops
    }

    /// A `.shopunits` marker precedes the trader and no other identity
    /// marker sits between them
    fn owns_sections(&self, data: &[u8], offset: usize) -> bool {
        let from = offset.saturating_sub(self.section_lookback);
        match rfind_in(data, SHOP_UNITS, from, offset) {
            Some(units) => !shop_identity_in(data, units, offset),
            None => false,
        }
    }

    /// Nearest well-formed `lt <u32 len> <ascii>` tag before `offset`
    fn location_before(&self, data: &[u8], offset: usize) -> Option<String> {
        let from = offset.saturating_sub(self.location_lookback);
        let mut end = offset;

        while let Some(tag) = rfind_in(data, LOCATION_TAG, from, end) {
            if let Some(name) = read_location_tag(data, tag, offset) {
                return Some(name.to_string());
            }
            // Still lets a tag start one byte earlier
            end = tag + LOCATION_TAG.len() - 1;
        }
        None
    }

    /// Actor id packed after the nearest `.actors` field, when marked active
    fn actor_before(&self, data: &[u8], offset: usize) -> Option<u32> {
        let from = offset.saturating_sub(self.actors_lookback);
        let actors = rfind_in(data, ACTORS, from, offset)?;
        if shop_identity_in(data, actors, offset) {
            debug!("  .actors @{} belongs to an earlier shop than @{}", actors, offset);
            return None;
        }
        let after = actors + ACTORS.len();
        let strg = find_in(data, STRG, after, after + ACTORS_STRG_DISTANCE)?;
        let packed = read_u32_le(data, strg + 8)?;

        (packed & ACTOR_ACTIVE_BIT != 0).then_some(packed & !ACTOR_ACTIVE_BIT)
    }
}

/// Whether a well-formed shop identity starts in `data[start..end]`.
///
/// Localized `itext_` keys without a trailing number and trader markers
/// without digits do not count.
pub fn shop_identity_in(data: &[u8], start: usize, end: usize) -> bool {
    let end = end.min(data.len());
    if start >= end {
        return false;
    }

    let named = memmem::find_iter(&data[start..end], NAMED_SHOP_PREFIX).any(|rel| {
        let body_start = start + rel + NAMED_SHOP_PREFIX.len();
        split_named_identifier(&utf16_identifier_run(&data[body_start..])).is_some()
    });

    named
        || memmem::find_iter(&data[start..end], TRADER_PREFIX).any(|rel| {
            let digits_start = start + rel + TRADER_PREFIX.len();
            !leading_digits(&data[digits_start..]).is_empty()
        })
}

fn read_location_tag(data: &[u8], tag: usize, limit: usize) -> Option<&str> {
    let len = read_u32_le(data, tag + LOCATION_TAG.len())? as usize;
    if len <= LOCATION_LEN_MIN || len >= LOCATION_LEN_MAX {
        return None;
    }
    let start = tag + LOCATION_TAG.len() + 4;
    let end = start + len;
    if end > limit {
        return None;
    }
    let name = ascii_str(&data[start..end])?;
    name.bytes()
        .all(is_identifier_byte)
        .then_some(name)
}

fn is_identifier_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

fn leading_digits(bytes: &[u8]) -> &str {
    let len = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    // ASCII digits are valid UTF-8
    std::str::from_utf8(&bytes[..len]).unwrap_or_default()
}

/// Maximal run of `[-A-Za-z0-9_]` UTF-16LE units
fn utf16_identifier_run(bytes: &[u8]) -> String {
    bytes
        .chunks_exact(2)
        .take_while(|unit| unit[1] == 0 && is_identifier_byte(unit[0]))
        .map(|unit| unit[0] as char)
        .collect()
}

/// Split `<location>_<digits>...` at the rightmost `_` followed by a digit.
///
/// Returns the shop id and the number of characters it spans.
pub fn split_named_identifier(body: &str) -> Option<(String, usize)> {
    let bytes = body.as_bytes();
    let split = (1..bytes.len().saturating_sub(1))
        .rev()
        .find(|&i| bytes[i] == b'_' && bytes[i + 1].is_ascii_digit())?;

    let digits = leading_digits(&bytes[split + 1..]);
    let consumed = split + 1 + digits.len();
    Some((format!("{}_{}", &body[..split], digits), consumed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16(text: &str) -> Vec<u8> {
        text.encode_utf16().flat_map(|u| u.to_le_bytes()).collect()
    }

    fn locator(window_size: usize, window_overlap: usize) -> ShopLocator {
        ShopLocator::new(&ScanConfig {
            window_size,
            window_overlap,
            ..Default::default()
        })
    }

    fn strg(value: u32) -> Vec<u8> {
        let mut out = STRG.to_vec();
        out.extend_from_slice(&8u32.to_le_bytes());
        out.extend_from_slice(&value.to_le_bytes());
        out.extend_from_slice(&[0u8; 4]);
        out
    }

    fn lt(name: &str) -> Vec<u8> {
        let mut out = LOCATION_TAG.to_vec();
        out.extend_from_slice(&(name.len() as u32).to_le_bytes());
        out.extend_from_slice(name.as_bytes());
        out
    }

    #[test]
    fn test_split_named_identifier() {
        assert_eq!(
            split_named_identifier("m_portland_12"),
            Some(("m_portland_12".to_string(), 13))
        );
        assert_eq!(
            split_named_identifier("m_zcom_start_519abc"),
            Some(("m_zcom_start_519".to_string(), 16))
        );
        assert_eq!(
            split_named_identifier("a_1_b"),
            Some(("a_1".to_string(), 3))
        );
        assert_eq!(split_named_identifier("m_portland"), None);
        assert_eq!(split_named_identifier("_5"), None);
    }

    #[test]
    fn test_named_shops_sorted_and_unique() {
        let mut data = vec![0u8; 10];
        data.extend(utf16("itext_m_portland_1"));
        data.extend([0u8; 6]);
        data.extend(utf16("itext_some-town_22"));
        data.extend([0u8; 2]);
        data.extend(utf16("itext_m_portland_1"));

        let shops = ShopLocator::default().locate(&data);
        let ids: Vec<_> = shops.iter().map(|s| s.shop_id.as_str()).collect();
        assert_eq!(ids, ["m_portland_1", "some-town_22"]);
        assert_eq!(shops[0].offset, 10);
        assert!(shops.iter().all(|s| s.kind == ShopKind::Named));
    }

    #[test]
    fn test_text_without_number_is_not_a_shop() {
        let mut data = utf16("itext_m_portland_hint");
        data.extend([0u8; 4]);
        assert!(ShopLocator::default().locate(&data).is_empty());
    }

    #[test]
    fn test_window_boundary_truncates_without_overlap() {
        // "itext_m_zcom_start_5" ends exactly on the window boundary
        let id = utf16("itext_m_zcom_start_519");
        let boundary = 64;
        let lead = boundary - utf16("itext_m_zcom_start_5").len();
        let mut data = vec![0u8; lead];
        data.extend(&id);
        data.extend([0u8; 80]);

        let truncated = locator(boundary, 0).locate_named(&data);
        assert_eq!(truncated.len(), 1);
        assert_eq!(truncated[0].shop_id, "m_zcom_start_5");

        let recovered = locator(boundary, 512).locate_named(&data);
        assert_eq!(recovered.len(), 1);
        assert_eq!(recovered[0].shop_id, "m_zcom_start_519");
        assert_eq!(recovered[0].offset, lead);
    }

    #[test]
    fn test_overlap_does_not_duplicate() {
        let mut data = vec![0u8; 60];
        data.extend(utf16("itext_aralan_3"));
        data.extend([0u8; 60]);

        let shops = locator(64, 64).locate_named(&data);
        assert_eq!(shops.len(), 1);
    }

    fn trader_fixture(actor_value: u32) -> Vec<u8> {
        let mut data = lt("m_portland");
        data.extend([0u8; 8]);
        data.extend_from_slice(b".shopunits");
        data.extend([0u8; 16]);
        data.extend_from_slice(ACTORS);
        data.extend([0u8; 3]);
        data.extend(strg(actor_value));
        data.extend([0u8; 8]);
        data.extend_from_slice(b"building_trader@31");
        data.extend([0u8; 8]);
        data
    }

    #[test]
    fn test_active_actor_shop() {
        let data = trader_fixture(0x8000_0000 | 807);
        let shops = ShopLocator::default().locate(&data);
        assert_eq!(shops.len(), 1);
        assert_eq!(shops[0].shop_id, "m_portland_actor_807");
        assert_eq!(shops[0].kind, ShopKind::Actor);
    }

    #[test]
    fn test_inactive_trader_shop() {
        let data = trader_fixture(807);
        let shops = ShopLocator::default().locate(&data);
        assert_eq!(shops[0].shop_id, "m_portland_building_trader_31");
        assert_eq!(shops[0].kind, ShopKind::BuildingTrader);
    }

    #[test]
    fn test_trader_without_shop_section_skipped() {
        let mut data = lt("m_portland");
        data.extend([0u8; 8]);
        data.extend_from_slice(b"building_trader@31");
        assert!(ShopLocator::default().locate(&data).is_empty());
    }

    #[test]
    fn test_trader_behind_another_shop_skipped() {
        let mut data = lt("m_portland");
        data.extend_from_slice(b".shopunits");
        data.extend([0u8; 4]);
        data.extend(utf16("itext_m_portland_4"));
        data.extend([0u8; 4]);
        data.extend_from_slice(b"building_trader@2");
        data.extend([0u8; 4]);

        let shops = ShopLocator::default().locate(&data);
        assert_eq!(shops.len(), 1);
        assert_eq!(shops[0].shop_id, "m_portland_4");
    }

    #[test]
    fn test_actors_field_before_inventory_sections() {
        let mut data = lt("dragondor");
        data.extend([0u8; 8]);
        data.extend_from_slice(ACTORS);
        data.extend([0u8; 3]);
        data.extend(strg(0x8000_0000 | 818));
        data.extend([0u8; 8]);
        data.extend_from_slice(b".shopunits");
        data.extend([0u8; 520]);
        data.extend_from_slice(b".spells");
        data.extend([0u8; 1200]);
        data.extend_from_slice(b"building_trader@31");
        data.extend([0u8; 8]);

        let shops = ShopLocator::default().locate(&data);
        assert_eq!(shops.len(), 1);
        assert_eq!(shops[0].shop_id, "dragondor_actor_818");
        assert_eq!(shops[0].kind, ShopKind::Actor);
    }

    #[test]
    fn test_actors_field_of_earlier_shop_ignored() {
        let mut data = lt("dragondor");
        data.extend_from_slice(ACTORS);
        data.extend([0u8; 3]);
        data.extend(strg(0x8000_0000 | 5));
        data.extend([0u8; 8]);
        data.extend(utf16("itext_dragondor_1"));
        data.extend([0u8; 8]);
        data.extend_from_slice(b".shopunits");
        data.extend([0u8; 8]);
        data.extend_from_slice(b"building_trader@31");
        data.extend([0u8; 8]);

        let shops = ShopLocator::default().locate(&data);
        let trader = shops
            .iter()
            .find(|s| s.kind != ShopKind::Named)
            .unwrap();
        assert_eq!(trader.shop_id, "dragondor_building_trader_31");
    }

    #[test]
    fn test_shop_identity_needs_number() {
        let mut data = utf16("itext_m_portland_hint");
        data.extend([0u8; 4]);
        data.extend_from_slice(b"building_trader@x");
        assert!(!shop_identity_in(&data, 0, data.len()));

        let mut named = data.clone();
        named.extend(utf16("itext_m_portland_1"));
        assert!(shop_identity_in(&named, 0, named.len()));

        let mut trader = data;
        trader.extend_from_slice(b"building_trader@7");
        assert!(shop_identity_in(&trader, 0, trader.len()));
    }

    #[test]
    fn test_malformed_location_tag_skipped() {
        let mut data = lt("good_place");
        data.extend_from_slice(b"lt\x01\x00\x00\x00x");
        data.extend_from_slice(b".shopunits");
        data.extend_from_slice(b"building_trader@9");

        let shops = ShopLocator::default().locate(&data);
        assert_eq!(shops[0].shop_id, "good_place_building_trader_9");
    }
}
