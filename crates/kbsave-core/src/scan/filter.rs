//! Identifier acceptance rules shared by every record encoding

/// Field names the save format interleaves with real identifiers
pub const METADATA_KEYWORDS: [&str; 19] = [
    "count", "flags", "lvars", "slruck", "id", "strg", "bmd", "ugid", "temp", "hint", "label",
    "name", "image", "text", "moral", "mana", "limit", "s", "h",
];

/// Exclusive upper bound for record quantities
pub const MAX_QUANTITY: u32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifierFilter {
    min_len: usize,
}

impl Default for IdentifierFilter {
    fn default() -> Self {
        Self::new(3)
    }
}

impl IdentifierFilter {
    pub fn new(min_len: usize) -> Self {
        Self { min_len }
    }

    /// `^[a-z][a-z0-9_]*$`, long enough, and not a metadata keyword
    pub fn accepts(&self, name: &str) -> bool {
        if name.len() < self.min_len {
            return false;
        }

        let mut bytes = name.bytes();
        let Some(first) = bytes.next() else {
            return false;
        };
        if !first.is_ascii_lowercase() {
            return false;
        }
        if !bytes.all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_') {
            return false;
        }

        !METADATA_KEYWORDS.contains(&name)
    }
}

/// `0 < quantity < 10000`
pub fn quantity_in_range(quantity: u32) -> bool {
    quantity > 0 && quantity < MAX_QUANTITY
}
