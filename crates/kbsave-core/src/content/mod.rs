//! Game content helpers that sit beside the save decoder

pub mod lookup;
pub mod spells;

pub use lookup::{AcceptAll, ContentLookup, PrefixRules};
pub use spells::{SpellCosts, parse_spells_file};
