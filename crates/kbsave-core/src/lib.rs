//! # kbsave-core
//!
//! Heuristic decoder for King's Bounty save files.
//!
//! This crate provides:
//! - Save container decoding (directory or `.sav` archive, zlib payloads)
//! - Shop discovery for named and anonymous traders
//! - Section span resolution and inventory record scanning
//! - Hero identity and inventory recovery
//! - Profile matching by hero fingerprint
//!
//! There is no published schema for the format. Every scanner works from
//! byte patterns observed in shipped saves, with distances and limits held
//! in [`ScanConfig`].
//!
//! ## Feature Flags
//!
//! - `legacy-identifiers`: default the identifier minimum length to 5 instead
//!   of 3, as older game builds required.

pub mod config;
pub mod container;
pub mod content;
pub mod error;
pub mod hero;
pub mod profile;
pub mod save;
pub mod scan;
pub mod shop;

pub use config::ScanConfig;
pub use container::{PayloadKind, SaveSource};
pub use content::{AcceptAll, ContentLookup, PrefixRules, SpellCosts, parse_spells_file};
pub use error::{Error, Result};
pub use hero::{
    HeroIdentity, HeroIdentityExtractor, HeroInventory, HeroInventoryExtractor, fingerprint_hash,
};
pub use profile::{SaveEntry, find_most_recent_match, list_saves};
pub use save::{SaveParser, SaveReport};
pub use scan::{RecordEncoding, RecordScanner, SectionResolver, ShopLocator};
pub use shop::{
    AssembledShop, InventoryRecord, SectionKind, SectionSpan, ShopInventory,
    ShopInventoryAssembler, ShopKind, ShopLocation,
};
