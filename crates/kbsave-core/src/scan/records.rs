//! Inventory record extraction
//!
//! Each section kind stores its records in one of three encodings:
//!
//! ```text
//! SlashSeparated        strg <u32 len> "bowman/5/peasant/20"
//! PrefixedWithMetadata  <u32 len> "sword" ... slruck <u32 len> "0,3"
//! PrefixedWithCount     <u32 len> "spell_haste" <u32 quantity>
//! ```
//!
//! Malformed records are dropped without failing the section.

use std::collections::BTreeMap;

use tracing::debug;

use super::filter::{IdentifierFilter, MAX_QUANTITY, quantity_in_range};
use super::lexer::{NameToken, RecordLexer};
use super::markers::{SLRUCK, STRG};
use super::utils::{ascii_str, find_in, read_u32_le};
use crate::config::ScanConfig;
use crate::shop::types::{InventoryRecord, SectionKind, SectionSpan};

/// Max payload length of a slash-separated list
pub const MAX_SLASH_PAYLOAD: usize = 5000;
/// Max length of a `slruck` value
pub const MAX_SLRUCK_VALUE: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordEncoding {
    SlashSeparated,
    PrefixedWithMetadata,
    PrefixedWithCount,
}

impl RecordEncoding {
    pub fn for_section(kind: SectionKind) -> Self {
        match kind {
            SectionKind::Garrison | SectionKind::Units => Self::SlashSeparated,
            SectionKind::Items => Self::PrefixedWithMetadata,
            SectionKind::Spells => Self::PrefixedWithCount,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RecordScanner {
    filter: IdentifierFilter,
    metadata_distance: usize,
}

impl Default for RecordScanner {
    fn default() -> Self {
        Self::new(&ScanConfig::default())
    }
}

impl RecordScanner {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            filter: IdentifierFilter::new(config.min_identifier_len()),
            metadata_distance: config.item_metadata_distance,
        }
    }

    pub fn filter(&self) -> IdentifierFilter {
        self.filter
    }

    /// Scan a resolved section with the encoding its kind uses
    pub fn scan_span(&self, data: &[u8], span: &SectionSpan) -> Vec<InventoryRecord> {
        let records = self.scan(
            data,
            span.start,
            span.end,
            span.kind.marker().len(),
            RecordEncoding::for_section(span.kind),
        );
        debug!(
            "  {} @{}..{}: {} records",
            span.kind,
            span.start,
            span.end,
            records.len()
        );
        records
    }

    /// Scan `data[start..end]`, where `start` is the section marker and the
    /// records begin `marker_len` bytes later
    pub fn scan(
        &self,
        data: &[u8],
        start: usize,
        end: usize,
        marker_len: usize,
        encoding: RecordEncoding,
    ) -> Vec<InventoryRecord> {
        let end = end.min(data.len());
        if start >= end {
            return Vec::new();
        }
        match encoding {
            RecordEncoding::SlashSeparated => self.scan_slash_separated(data, start, end),
            RecordEncoding::PrefixedWithMetadata => {
                self.scan_with_metadata(data, start + marker_len, end)
            }
            RecordEncoding::PrefixedWithCount => self.scan_with_count(data, start + marker_len, end),
        }
    }

    fn scan_slash_separated(&self, data: &[u8], start: usize, end: usize) -> Vec<InventoryRecord> {
        let Some(strg) = find_in(data, STRG, start, end) else {
            return Vec::new();
        };
        let Some(len) = read_u32_le(data, strg + STRG.len()).map(|len| len as usize) else {
            return Vec::new();
        };
        if len == 0 || len > MAX_SLASH_PAYLOAD {
            return Vec::new();
        }

        let payload_start = strg + STRG.len() + 4;
        let payload_end = payload_start + len;
        if payload_end > end {
            return Vec::new();
        }
        let Some(payload) = ascii_str(&data[payload_start..payload_end]) else {
            return Vec::new();
        };

        self.parse_slash_list(payload)
    }

    /// Walk `name/qty/name/qty`; a token not followed by a number is skipped
    pub fn parse_slash_list(&self, payload: &str) -> Vec<InventoryRecord> {
        let parts: Vec<&str> = payload.split('/').collect();
        let mut records = Vec::new();

        let mut i = 0;
        while i + 1 < parts.len() {
            let name = parts[i];
            match parse_int(parts[i + 1]) {
                Some(quantity) => {
                    if self.filter.accepts(name) {
                        if let Some(quantity) = bounded_quantity(quantity) {
                            records.push(InventoryRecord::new(name, quantity));
                        }
                    }
                    i += 2;
                }
                None => i += 1,
            }
        }

        records
    }

    fn scan_with_metadata(&self, data: &[u8], start: usize, end: usize) -> Vec<InventoryRecord> {
        let mut records = Vec::new();
        let mut lexer = RecordLexer::new(data, start, end, self.filter);

        while let Some(token) = lexer.next_name() {
            let quantity = self.metadata_quantity(data, token.end, lexer.end()).unwrap_or(1);
            match bounded_quantity(quantity) {
                Some(quantity) => {
                    records.push(InventoryRecord::new(token.name, quantity));
                    lexer.accept(token.end);
                }
                None => lexer.reject(),
            }
        }

        records.sort();
        records
    }

    /// Quantity from the first well-formed `slruck "<a>,<qty>"` after a name
    fn metadata_quantity(&self, data: &[u8], from: usize, end: usize) -> Option<i64> {
        let mut pos = from;
        for _ in 0..self.metadata_distance {
            if pos + SLRUCK.len() + 4 > end {
                break;
            }
            if data[pos..].starts_with(SLRUCK) {
                if let Some(quantity) = read_slruck_value(data, pos + SLRUCK.len()) {
                    return Some(quantity);
                }
            }
            pos += 1;
        }
        None
    }

    fn scan_with_count(&self, data: &[u8], start: usize, end: usize) -> Vec<InventoryRecord> {
        let mut best: BTreeMap<&str, u32> = BTreeMap::new();
        let mut lexer = RecordLexer::new(data, start, end, self.filter);

        while let Some(token) = lexer.next_name() {
            match count_after(data, &token, lexer.end()) {
                Some(quantity) if quantity_in_range(quantity) => {
                    best.entry(token.name)
                        .and_modify(|q| *q = (*q).max(quantity))
                        .or_insert(quantity);
                    lexer.accept(token.end + 4);
                }
                _ => lexer.reject(),
            }
        }

        best.into_iter()
            .map(|(name, quantity)| InventoryRecord::new(name, quantity))
            .collect()
    }
}

fn count_after(data: &[u8], token: &NameToken<'_>, end: usize) -> Option<u32> {
    if token.end + 4 > end {
        return None;
    }
    read_u32_le(data, token.end)
}

/// `<len> "<a>,<qty>"` following a `slruck` tag; only a two-element list counts
fn read_slruck_value(data: &[u8], pos: usize) -> Option<i64> {
    let len = read_u32_le(data, pos)? as usize;
    if !(1..=MAX_SLRUCK_VALUE).contains(&len) {
        return None;
    }
    let bytes = data.get(pos + 4..pos + 4 + len)?;
    let value = ascii_str(bytes)?;
    let mut parts = value.split(',');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(quantity), None) => parse_int(quantity),
        _ => None,
    }
}

fn parse_int(token: &str) -> Option<i64> {
    token.trim().parse::<i64>().ok()
}

fn bounded_quantity(quantity: i64) -> Option<u32> {
    if quantity > 0 && quantity < MAX_QUANTITY as i64 {
        Some(quantity as u32)
    } else {
        None
    }
}
