use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::scan::markers;

/// The four inventory sections a shop can carry
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SectionKind {
    Garrison,
    Items,
    Units,
    Spells,
}

impl SectionKind {
    /// Byte marker opening this section
    pub fn marker(&self) -> &'static [u8] {
        match self {
            Self::Garrison => markers::GARRISON,
            Self::Items => markers::ITEMS,
            Self::Units => markers::SHOP_UNITS,
            Self::Spells => markers::SPELLS,
        }
    }
}

/// How a located shop was addressed in the save
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, IntoStaticStr, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ShopKind {
    /// `itext_<location>_<n>`
    Named,
    /// `building_trader@<n>` bound to an actor
    Actor,
    /// `building_trader@<n>` without an active actor binding
    BuildingTrader,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopLocation {
    pub shop_id: String,
    /// Offset of the identity marker in the decompressed save
    pub offset: usize,
    pub kind: ShopKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSpan {
    pub kind: SectionKind,
    /// Offset of the section marker
    pub start: usize,
    /// Exclusive end
    pub end: usize,
}

impl SectionSpan {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn overlaps(&self, other: &SectionSpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub name: String,
    pub quantity: u32,
}

impl InventoryRecord {
    pub fn new(name: impl Into<String>, quantity: u32) -> Self {
        Self {
            name: name.into(),
            quantity,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopInventory {
    pub shop_id: String,
    pub garrison: Vec<InventoryRecord>,
    pub items: Vec<InventoryRecord>,
    pub units: Vec<InventoryRecord>,
    pub spells: Vec<InventoryRecord>,
}

impl ShopInventory {
    pub fn new(shop_id: impl Into<String>) -> Self {
        Self {
            shop_id: shop_id.into(),
            ..Default::default()
        }
    }

    pub fn section(&self, kind: SectionKind) -> &[InventoryRecord] {
        match kind {
            SectionKind::Garrison => &self.garrison,
            SectionKind::Items => &self.items,
            SectionKind::Units => &self.units,
            SectionKind::Spells => &self.spells,
        }
    }

    pub fn section_mut(&mut self, kind: SectionKind) -> &mut Vec<InventoryRecord> {
        match kind {
            SectionKind::Garrison => &mut self.garrison,
            SectionKind::Items => &mut self.items,
            SectionKind::Units => &mut self.units,
            SectionKind::Spells => &mut self.spells,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.garrison.is_empty()
            && self.items.is_empty()
            && self.units.is_empty()
            && self.spells.is_empty()
    }

    pub fn record_count(&self) -> usize {
        self.garrison.len() + self.items.len() + self.units.len() + self.spells.len()
    }
}
