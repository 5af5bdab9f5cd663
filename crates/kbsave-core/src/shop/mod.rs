//! Shop inventories and the types describing them

pub mod assembler;
pub mod types;

pub use assembler::{AssembledShop, ShopInventoryAssembler};
pub use types::{
    InventoryRecord, SectionKind, SectionSpan, ShopInventory, ShopKind, ShopLocation,
};
