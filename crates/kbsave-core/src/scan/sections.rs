//! Section span resolution
//!
//! Each section kind is resolved on its own: its start is the nearest
//! marker of that kind before the shop, and its end is the nearest later
//! marker of any kind. No ordering between sections is assumed.

use strum::IntoEnumIterator;
use tracing::debug;

use super::locator::shop_identity_in;
use super::markers::SECTION_TERMINATORS;
use super::utils::{find_in, rfind_in};
use crate::config::ScanConfig;
use crate::shop::types::{SectionKind, SectionSpan};

#[derive(Debug, Clone, Copy)]
pub struct SectionResolver {
    lookback: usize,
}

impl Default for SectionResolver {
    fn default() -> Self {
        Self::new(&ScanConfig::default())
    }
}

impl SectionResolver {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            lookback: config.section_lookback,
        }
    }

    /// Spans of every section owned by the shop whose marker is at `shop_offset`
    pub fn resolve(&self, data: &[u8], shop_offset: usize) -> Vec<SectionSpan> {
        SectionKind::iter()
            .filter_map(|kind| self.resolve_kind(data, shop_offset, kind))
            .collect()
    }

    pub fn resolve_kind(
        &self,
        data: &[u8],
        shop_offset: usize,
        kind: SectionKind,
    ) -> Option<SectionSpan> {
        let from = shop_offset.saturating_sub(self.lookback);
        let start = rfind_in(data, kind.marker(), from, shop_offset)?;

        // A marker behind another shop's identity belongs to that shop
        if shop_identity_in(data, start, shop_offset) {
            debug!(
                "  {} @{} belongs to an earlier shop than @{}",
                kind, start, shop_offset
            );
            return None;
        }

        let end = section_end(data, start, shop_offset);
        Some(SectionSpan { kind, start, end })
    }
}

/// Nearest section marker after `start`, capped at `limit`
pub fn section_end(data: &[u8], start: usize, limit: usize) -> usize {
    SECTION_TERMINATORS
        .iter()
        .filter_map(|marker| find_in(data, marker, start + 1, limit))
        .min()
        .unwrap_or(limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16(text: &str) -> Vec<u8> {
        text.encode_utf16().flat_map(|u| u.to_le_bytes()).collect()
    }

    struct Layout {
        data: Vec<u8>,
    }

    impl Layout {
        fn new() -> Self {
            Self { data: Vec::new() }
        }

        fn push(&mut self, bytes: &[u8]) -> usize {
            let at = self.data.len();
            self.data.extend_from_slice(bytes);
            self.data.extend_from_slice(&[0u8; 16]);
            at
        }
    }

    fn span_of(spans: &[SectionSpan], kind: SectionKind) -> Option<SectionSpan> {
        spans.iter().copied().find(|s| s.kind == kind)
    }

    #[test]
    fn test_spans_end_at_next_marker() {
        let mut l = Layout::new();
        let garrison = l.push(b".garrison");
        let items = l.push(b".items");
        let units = l.push(b".shopunits");
        let spells = l.push(b".spells");
        let temp = l.push(b".temp");
        let shop = l.push(&utf16("itext_m_portland_1"));

        let spans = SectionResolver::default().resolve(&l.data, shop);
        assert_eq!(spans.len(), 4);
        assert_eq!(
            span_of(&spans, SectionKind::Garrison).unwrap(),
            SectionSpan {
                kind: SectionKind::Garrison,
                start: garrison,
                end: items
            }
        );
        assert_eq!(span_of(&spans, SectionKind::Items).unwrap().end, units);
        assert_eq!(span_of(&spans, SectionKind::Units).unwrap().end, spells);
        assert_eq!(span_of(&spans, SectionKind::Spells).unwrap().end, temp);
    }

    #[test]
    fn test_reversed_section_order() {
        let mut l = Layout::new();
        let spells = l.push(b".spells");
        let units = l.push(b".shopunits");
        let items = l.push(b".items");
        let shop = l.push(&utf16("itext_aralan_2"));

        let spans = SectionResolver::default().resolve(&l.data, shop);
        let spells_span = span_of(&spans, SectionKind::Spells).unwrap();
        let units_span = span_of(&spans, SectionKind::Units).unwrap();
        let items_span = span_of(&spans, SectionKind::Items).unwrap();

        assert_eq!((spells_span.start, spells_span.end), (spells, units));
        assert_eq!((units_span.start, units_span.end), (units, items));
        assert_eq!((items_span.start, items_span.end), (items, shop));
        assert!(span_of(&spans, SectionKind::Garrison).is_none());
    }

    #[test]
    fn test_sections_never_cross_shop_boundary() {
        let mut l = Layout::new();
        l.push(b".items");
        let spells_a = l.push(b".spells");
        let shop_a = l.push(&utf16("itext_m_portland_1"));
        let items_b = l.push(b".items");
        let shop_b = l.push(&utf16("itext_m_portland_2"));

        let resolver = SectionResolver::default();
        let spans_a = resolver.resolve(&l.data, shop_a);
        let spans_b = resolver.resolve(&l.data, shop_b);

        // shop B has no spells of its own
        assert!(span_of(&spans_b, SectionKind::Spells).is_none());
        assert_eq!(span_of(&spans_b, SectionKind::Items).unwrap().start, items_b);
        assert_eq!(span_of(&spans_a, SectionKind::Spells).unwrap().start, spells_a);

        for a in &spans_a {
            assert!(a.end <= shop_a);
            for b in &spans_b {
                assert!(!a.overlaps(b));
                assert!(b.start > shop_a);
            }
        }
    }

    #[test]
    fn test_trader_marker_also_bounds_sections() {
        let mut l = Layout::new();
        l.push(b".spells");
        l.push(b"building_trader@4");
        let shop = l.push(&utf16("itext_m_zcom_start_519"));

        let spans = SectionResolver::default().resolve(&l.data, shop);
        assert!(spans.is_empty());
    }

    #[test]
    fn test_localized_text_does_not_cut_sections() {
        let mut l = Layout::new();
        let spells = l.push(b".spells");
        l.push(&utf16("itext_m_portland_hint"));
        let shop = l.push(&utf16("itext_m_portland_1"));

        let spans = SectionResolver::default().resolve(&l.data, shop);
        let span = span_of(&spans, SectionKind::Spells).unwrap();
        assert_eq!((span.start, span.end), (spells, shop));
    }

    #[test]
    fn test_lookback_limit() {
        let mut l = Layout::new();
        l.push(b".items");
        l.data.extend(vec![0u8; 6000]);
        let shop = l.push(&utf16("itext_far_1"));

        assert!(SectionResolver::default().resolve(&l.data, shop).is_empty());
    }

    #[test]
    fn test_section_end_caps_at_limit() {
        let data = b".items.....garbage";
        assert_eq!(section_end(data, 0, 10), 10);
        assert_eq!(section_end(b".items.temp", 0, 11), 6);
    }
}
