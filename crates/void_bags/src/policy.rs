//! Capacity policies
//!
//! Each bag variant answers the same three questions through a small
//! strategy object: does it accept an item, how much of a kind can it hold,
//! and is it full for that kind.

use crate::config::{BagVariant, FixedBagType};
use crate::requirements::RequirementSource;
use std::fmt;
use std::sync::Arc;
use void_inventory::{ItemKind, ItemStack};

/// Capacity rule of one bag variant
pub trait CapacityRule {
    /// Variant-specific acceptance, checked after the base rule
    fn accepts(&self, item: &ItemStack) -> bool;

    /// Maximum total quantity of `kind` storable given `contents`.
    ///
    /// 0 means the bag cannot take any of this kind right now.
    fn capacity_for(&self, kind: &ItemKind, contents: &[ItemStack]) -> u32;

    /// Check if no more of `kind` fits
    fn is_full(&self, kind: &ItemKind, contents: &[ItemStack]) -> bool {
        let capacity = self.capacity_for(kind, contents);
        capacity == 0 || existing_quantity(kind, contents) >= capacity
    }
}

/// Quantity of `kind` already in `contents`
pub fn existing_quantity(kind: &ItemKind, contents: &[ItemStack]) -> u32 {
    contents
        .iter()
        .find(|stack| stack.kind == *kind)
        .map_or(0, ItemStack::quantity)
}

/// Constant per-kind quota over a whitelist
#[derive(Debug, Clone)]
pub struct FixedQuota {
    bag_type: Arc<FixedBagType>,
    quota: u32,
}

impl FixedQuota {
    /// Quota `quota` over the whitelist of `bag_type`
    pub fn new(bag_type: Arc<FixedBagType>, quota: u32) -> Self {
        Self { bag_type, quota }
    }

    /// Bag type holding the whitelist
    pub fn bag_type(&self) -> &Arc<FixedBagType> {
        &self.bag_type
    }

    /// Per-kind quota
    pub fn quota(&self) -> u32 {
        self.quota
    }
}

impl CapacityRule for FixedQuota {
    fn accepts(&self, item: &ItemStack) -> bool {
        match self.bag_type.accepted(&item.kind) {
            Some(entry) => item.is_stackable() || entry.allow_non_stackable,
            None => false,
        }
    }

    fn capacity_for(&self, kind: &ItemKind, _contents: &[ItemStack]) -> u32 {
        if self.bag_type.accepted(kind).is_some() {
            self.quota
        } else {
            0
        }
    }
}

/// Capacity taken from outstanding requirements.
///
/// Quality matching is exact: a Gold requirement is not satisfied by
/// Iridium items.
#[derive(Clone)]
pub struct RequirementQuota {
    source: Arc<dyn RequirementSource>,
}

impl RequirementQuota {
    /// Read capacity from `source`
    pub fn new(source: Arc<dyn RequirementSource>) -> Self {
        Self { source }
    }

    /// Requirement source the quota reads
    pub fn source(&self) -> &Arc<dyn RequirementSource> {
        &self.source
    }
}

impl fmt::Debug for RequirementQuota {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequirementQuota")
            .field("voided", &self.source.requirements_voided())
            .finish()
    }
}

impl CapacityRule for RequirementQuota {
    fn accepts(&self, item: &ItemStack) -> bool {
        !item.kind.is_big && !item.kind.is_recipe && self.source.is_required(item.kind.id)
    }

    fn capacity_for(&self, kind: &ItemKind, _contents: &[ItemStack]) -> u32 {
        if kind.is_big || kind.is_recipe {
            return 0;
        }
        self.source.outstanding(kind.id, kind.quality)
    }
}

/// Slot count times per-kind stack ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotQuota {
    slots: u32,
    ceiling: u32,
}

impl SlotQuota {
    /// `ceiling` is clamped to at least 1
    pub fn new(slots: u32, ceiling: u32) -> Self {
        Self {
            slots,
            ceiling: ceiling.max(1),
        }
    }

    /// Slot count
    pub fn slots(&self) -> u32 {
        self.slots
    }

    /// Units of one kind per slot
    pub fn ceiling(&self) -> u32 {
        self.ceiling
    }

    /// Slots taken by `quantity` units of one kind
    pub fn slots_used(&self, quantity: u32) -> u32 {
        quantity.div_ceil(self.ceiling)
    }

    /// Slots taken by all of `contents`
    pub fn slots_in_use(&self, contents: &[ItemStack]) -> u32 {
        contents
            .iter()
            .fold(0u32, |total, stack| {
                total.saturating_add(self.slots_used(stack.quantity()))
            })
    }

    /// Slots not taken by anything
    pub fn free_slots(&self, contents: &[ItemStack]) -> u32 {
        self.slots.saturating_sub(self.slots_in_use(contents))
    }

    /// Check if `contents` fit the slot budget
    pub fn fits(&self, contents: &[ItemStack]) -> bool {
        self.slots_in_use(contents) <= self.slots
    }

    /// Quantity `quantity` is cut to when freeing one slot
    pub fn one_slot_less(&self, quantity: u32) -> u32 {
        quantity.saturating_sub(1) / self.ceiling * self.ceiling
    }
}

impl CapacityRule for SlotQuota {
    fn accepts(&self, item: &ItemStack) -> bool {
        item.is_stackable()
    }

    fn capacity_for(&self, kind: &ItemKind, contents: &[ItemStack]) -> u32 {
        let existing = existing_quantity(kind, contents);
        self.free_slots(contents)
            .saturating_add(self.slots_used(existing))
            .saturating_mul(self.ceiling)
    }

    fn is_full(&self, kind: &ItemKind, contents: &[ItemStack]) -> bool {
        if self.free_slots(contents) > 0 {
            return false;
        }
        let existing = existing_quantity(kind, contents);
        existing == 0 || existing >= self.capacity_for(kind, contents)
    }
}

/// Capacity policy of a non-composite bag
#[derive(Debug, Clone)]
pub enum CapacityPolicy {
    FixedQuota(FixedQuota),
    Requirements(RequirementQuota),
    Slots(SlotQuota),
}

impl CapacityPolicy {
    /// Variant tag
    pub fn variant(&self) -> BagVariant {
        match self {
            Self::FixedQuota(_) => BagVariant::FixedQuota,
            Self::Requirements(_) => BagVariant::Requirements,
            Self::Slots(_) => BagVariant::Slots,
        }
    }

    /// Slot budget, for slot-based bags
    pub fn slot_quota(&self) -> Option<&SlotQuota> {
        match self {
            Self::Slots(quota) => Some(quota),
            _ => None,
        }
    }

    fn rule(&self) -> &dyn CapacityRule {
        match self {
            Self::FixedQuota(rule) => rule,
            Self::Requirements(rule) => rule,
            Self::Slots(rule) => rule,
        }
    }
}

impl CapacityRule for CapacityPolicy {
    fn accepts(&self, item: &ItemStack) -> bool {
        self.rule().accepts(item)
    }

    fn capacity_for(&self, kind: &ItemKind, contents: &[ItemStack]) -> u32 {
        self.rule().capacity_for(kind, contents)
    }

    fn is_full(&self, kind: &ItemKind, contents: &[ItemStack]) -> bool {
        self.rule().is_full(kind, contents)
    }
}
