//! Item kinds, definitions and stacks

use serde::{Deserialize, Serialize};
use std::fmt;

/// Item category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCategory {
    /// Seeds and saplings
    Seed,
    /// Crops and forage
    Produce,
    /// Crafting and building materials
    Material,
    /// Artisan goods and cooked food
    Consumable,
    /// Fish and bait
    Fish,
    /// Minerals, gems and ores
    Mineral,
    /// Tools and weapons
    Tool,
    /// Furniture and big craftables
    Furniture,
    /// Quest items (never storable)
    Quest,
    /// Misc items
    Misc,
    /// Custom category
    Custom(u32),
}

impl Default for ItemCategory {
    fn default() -> Self {
        Self::Misc
    }
}

/// Item quality tier
///
/// The discriminants are the host's tier values; there is no tier 3.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum ItemQuality {
    #[default]
    Regular = 0,
    Silver = 1,
    Gold = 2,
    Iridium = 4,
}

impl ItemQuality {
    /// All tiers, lowest first
    pub const ALL: [ItemQuality; 4] = [Self::Regular, Self::Silver, Self::Gold, Self::Iridium];

    /// Host tier value
    pub fn value(self) -> u8 {
        self as u8
    }

    /// Parse a host tier value
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Regular),
            1 => Some(Self::Silver),
            2 => Some(Self::Gold),
            4 => Some(Self::Iridium),
            _ => None,
        }
    }
}

impl fmt::Display for ItemQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Regular => write!(f, "Regular"),
            Self::Silver => write!(f, "Silver"),
            Self::Gold => write!(f, "Gold"),
            Self::Iridium => write!(f, "Iridium"),
        }
    }
}

/// Identity of a stack: two stacks merge iff their kinds are equal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemKind {
    /// Catalog id
    pub id: u32,
    /// Quality tier
    pub quality: ItemQuality,
    /// Big craftable rather than a regular object
    pub is_big: bool,
    /// Recipe form of the item
    pub is_recipe: bool,
}

impl ItemKind {
    /// Regular-quality, small, non-recipe kind
    pub fn new(id: u32) -> Self {
        Self {
            id,
            quality: ItemQuality::Regular,
            is_big: false,
            is_recipe: false,
        }
    }

    /// Set quality
    pub fn with_quality(mut self, quality: ItemQuality) -> Self {
        self.quality = quality;
        self
    }

    /// Mark as a big craftable
    pub fn big(mut self) -> Self {
        self.is_big = true;
        self
    }

    /// Mark as a recipe
    pub fn recipe(mut self) -> Self {
        self.is_recipe = true;
        self
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} ({})", self.id, self.quality)?;
        if self.is_big {
            write!(f, " big")?;
        }
        if self.is_recipe {
            write!(f, " recipe")?;
        }
        Ok(())
    }
}

/// Item definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDefinition {
    /// Catalog id
    pub id: u32,
    /// Display name
    pub name: String,
    /// Category
    pub category: ItemCategory,
    /// Whether the id refers to a big craftable
    pub is_big: bool,
    /// Maximum stack size in an inventory slot (1 = not stackable)
    pub max_stack: u32,
    /// Base unit price
    pub price: u32,
}

impl ItemDefinition {
    /// Create a new item definition
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            category: ItemCategory::default(),
            is_big: false,
            max_stack: DEFAULT_MAX_STACK,
            price: 0,
        }
    }

    /// Set category
    pub fn with_category(mut self, category: ItemCategory) -> Self {
        self.category = category;
        self
    }

    /// Set max stack size
    pub fn with_max_stack(mut self, max: u32) -> Self {
        self.max_stack = max.max(1);
        self
    }

    /// Set unit price
    pub fn with_price(mut self, price: u32) -> Self {
        self.price = price;
        self
    }

    /// Mark as a big craftable
    pub fn big(mut self) -> Self {
        self.is_big = true;
        self
    }

    /// Check if stackable
    pub fn is_stackable(&self) -> bool {
        self.max_stack > 1
    }

    /// Create a stack of this definition
    pub fn stack(&self, quality: ItemQuality, quantity: u32) -> ItemStack {
        let kind = ItemKind {
            id: self.id,
            quality,
            is_big: self.is_big,
            is_recipe: false,
        };
        ItemStack::new(kind, self.name.clone(), quantity)
            .with_category(self.category)
            .with_max_stack(self.max_stack)
            .with_price(self.price)
    }
}

/// Default per-slot stack ceiling for regular objects
pub const DEFAULT_MAX_STACK: u32 = 999;

/// A stack of items in an inventory or bag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Equivalence key
    pub kind: ItemKind,
    /// Display name
    pub name: String,
    /// Category
    pub category: ItemCategory,
    /// Unit price
    pub price: u32,
    /// Maximum quantity per inventory slot
    pub max_stack: u32,
    /// Largest quantity the host can represent for this record
    pub representable_max: u32,
    /// Host marks the item as special (e.g. a tool upgrade in progress)
    pub special: bool,
    /// Item has been reported lost
    pub lost: bool,
    /// Item is currently held by something else (a machine, a table)
    pub attached: bool,
    quantity: u32,
}

impl ItemStack {
    /// Create a new item stack
    pub fn new(kind: ItemKind, name: impl Into<String>, quantity: u32) -> Self {
        Self {
            kind,
            name: name.into(),
            category: ItemCategory::default(),
            price: 0,
            max_stack: DEFAULT_MAX_STACK,
            representable_max: u32::MAX,
            special: false,
            lost: false,
            attached: false,
            quantity,
        }
    }

    /// Set category
    pub fn with_category(mut self, category: ItemCategory) -> Self {
        self.category = category;
        self
    }

    /// Set unit price
    pub fn with_price(mut self, price: u32) -> Self {
        self.price = price;
        self
    }

    /// Set max stack size
    pub fn with_max_stack(mut self, max: u32) -> Self {
        self.max_stack = max.max(1);
        self
    }

    /// Cap the quantity the host can store in this record
    pub fn with_representable_max(mut self, max: u32) -> Self {
        self.representable_max = max;
        self.quantity = self.quantity.min(max);
        self
    }

    /// Current quantity
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Store a new quantity, returning the value actually stored.
    ///
    /// The stored value is clamped to `representable_max`; callers compare the
    /// result against what they asked for.
    pub fn set_quantity(&mut self, quantity: u32) -> u32 {
        self.quantity = quantity.min(self.representable_max);
        self.quantity
    }

    /// Check if this stack is empty
    pub fn is_empty(&self) -> bool {
        self.quantity == 0
    }

    /// Check if stackable
    pub fn is_stackable(&self) -> bool {
        self.max_stack > 1
    }

    /// Same equivalence key (bag-internal merge rule)
    pub fn is_equivalent(&self, other: &ItemStack) -> bool {
        self.kind == other.kind
    }

    /// Same key and same unit price (inventory slot merge rule)
    pub fn can_stack_with(&self, other: &ItemStack) -> bool {
        self.kind == other.kind && self.price == other.price
    }

    /// Zero-quantity copy with the same identity
    pub fn empty_copy(&self) -> ItemStack {
        ItemStack {
            quantity: 0,
            ..self.clone()
        }
    }

    /// Add to this stack up to `max_stack` (returns overflow)
    pub fn add(&mut self, amount: u32) -> u32 {
        let before = self.quantity;
        let space = self.max_stack.saturating_sub(before);
        let stored = self.set_quantity(before.saturating_add(amount.min(space)));
        amount - stored.saturating_sub(before)
    }

    /// Remove from this stack (returns amount actually removed)
    pub fn remove(&mut self, amount: u32) -> u32 {
        let to_remove = amount.min(self.quantity);
        self.quantity -= to_remove;
        to_remove
    }
}
