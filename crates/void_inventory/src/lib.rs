//! Void Inventory - Item and Inventory System
//!
//! This crate provides the host-side item model that storage containers
//! operate on.
//!
//! # Features
//!
//! - Item kinds with quality tiers (the stack equivalence key)
//! - Item definitions and a catalog for rebuilding stacks
//! - Item stacking with max stack sizes and a host quantity cap
//! - Inventory slot lists with usable capacity and a held (cursor) stack
//!
//! # Example
//!
//! ```ignore
//! use void_inventory::prelude::*;
//!
//! let wood = ItemDefinition::new(388, "Wood")
//!     .with_category(ItemCategory::Material)
//!     .with_price(2);
//!
//! let mut inventory: Inventory = Inventory::new(36);
//! inventory.place_in_empty_slot(wood.stack(ItemQuality::Regular, 50));
//! ```

pub mod catalog;
pub mod inventory;
pub mod item;

pub mod prelude {
    pub use crate::catalog::ItemCatalog;
    pub use crate::inventory::{Inventory, SlotItem, SourceRef};
    pub use crate::item::{
        ItemCategory, ItemDefinition, ItemKind, ItemQuality, ItemStack, DEFAULT_MAX_STACK,
    };
}

pub use prelude::*;
