pub mod identity;
pub mod inventory;

pub use identity::{HeroIdentity, HeroIdentityExtractor, fingerprint_hash};
pub use inventory::{HeroInventory, HeroInventoryExtractor};
