//! Byte markers observed in decompressed saves
//!
//! # Shop layout
//!
//! A shop's inventory sections precede the shop's identity marker. The
//! order of the sections varies between saves, and `.temp` holds
//! non-inventory data that can look like records.
//!
//! ```text
//!   .garrison ... strg <len> "bowman/5/peasant/20"
//!   .items    ... <len> "sword" ... slruck <len> "0,3" ... <len> "shield"
//!   .shopunits .. strg <len> "knight/2"
//!   .spells   ... <len> "spell_haste" <u32 qty>
//!   .temp     ...
//!   itext_m_portland_1               (UTF-16LE)   named shop
//!   or
//!   building_trader@31               (ASCII)      anonymous shop
//! ```

/// Garrison section (slash-separated unit list)
pub const GARRISON: &[u8] = b".garrison";
/// Items section (length-prefixed names with optional `slruck` metadata)
pub const ITEMS: &[u8] = b".items";
/// Hireable units section (slash-separated unit list)
pub const SHOP_UNITS: &[u8] = b".shopunits";
/// Spells section (length-prefixed names followed by a u32 count)
pub const SPELLS: &[u8] = b".spells";
/// Non-inventory data following the inventory sections
pub const TEMP: &[u8] = b".temp";

/// Every marker that ends a section
pub const SECTION_TERMINATORS: [&[u8]; 5] = [GARRISON, ITEMS, SHOP_UNITS, SPELLS, TEMP];

/// String payload tag, followed by a u32 LE length
pub const STRG: &[u8] = b"strg";
/// Item metadata tag carrying `"<a>,<quantity>"`
pub const SLRUCK: &[u8] = b"slruck";

/// Named shop prefix: `itext_` in UTF-16LE
pub const NAMED_SHOP_PREFIX: &[u8] = b"i\0t\0e\0x\0t\0_\0";
/// Anonymous shop marker prefix (ASCII)
pub const TRADER_PREFIX: &[u8] = b"building_trader@";
/// Location tag preceding anonymous shops
pub const LOCATION_TAG: &[u8] = b"lt";
/// Actor binding field preceding active anonymous shops
pub const ACTORS: &[u8] = b".actors";

/// Bytes searched after `.actors` for its `strg` tag
pub const ACTORS_STRG_DISTANCE: usize = 60;
/// High bit of the packed actor value marks an active shop
pub const ACTOR_ACTIVE_BIT: u32 = 0x8000_0000;

/// Hero name field in the auxiliary payload
pub const NAME_FIELD: &[u8] = b"name";
/// Hero nickname field in the auxiliary payload
pub const NICKNAME_FIELD: &[u8] = b"nickname";
