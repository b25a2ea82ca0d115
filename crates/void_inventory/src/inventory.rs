//! Inventory slot lists
//!
//! An [`Inventory`] is an indexable list of optional entries plus a usable
//! capacity that may exceed the list length: indices in `len()..capacity()`
//! are empty slots that materialize when something is placed there.

use crate::item::{ItemKind, ItemStack};
use serde::{Deserialize, Serialize};

/// An entry that can occupy an inventory slot
///
/// Plain stacks are the common case; hosts with richer slot contents
/// (containers, tools) expose the stack view when there is one.
pub trait SlotItem {
    /// Stack view of this entry, if it is a stack
    fn as_stack(&self) -> Option<&ItemStack>;

    /// Mutable stack view of this entry, if it is a stack
    fn as_stack_mut(&mut self) -> Option<&mut ItemStack>;

    /// Wrap a stack as an entry
    fn from_stack(stack: ItemStack) -> Self;
}

impl SlotItem for ItemStack {
    fn as_stack(&self) -> Option<&ItemStack> {
        Some(self)
    }

    fn as_stack_mut(&mut self) -> Option<&mut ItemStack> {
        Some(self)
    }

    fn from_stack(stack: ItemStack) -> Self {
        stack
    }
}

/// Reference to a record in an inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceRef {
    /// A slot of the list
    Slot(usize),
    /// The stack currently held on the cursor
    Held,
}

/// Inventory slot list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory<E = ItemStack> {
    /// Inventory slots (None = empty)
    slots: Vec<Option<E>>,
    /// Usable number of slots (>= slots.len())
    capacity: usize,
    /// Stack held on the cursor
    held: Option<E>,
}

impl<E: SlotItem> Inventory<E> {
    /// Create an inventory with `capacity` empty slots
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            capacity,
            held: None,
        }
    }

    /// Create from an existing slot list; capacity never drops below its length
    pub fn with_slots(slots: Vec<Option<E>>, capacity: usize) -> Self {
        let capacity = capacity.max(slots.len());
        Self {
            slots,
            capacity,
            held: None,
        }
    }

    /// Set the held stack
    pub fn with_held(mut self, held: E) -> Self {
        self.held = Some(held);
        self
    }

    /// Usable capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Length of the materialized slot list
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if no slot holds anything
    pub fn is_empty(&self) -> bool {
        self.used_slots() == 0
    }

    /// Get number of used slots
    pub fn used_slots(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Get number of free slots, counting unmaterialized ones
    pub fn free_slots(&self) -> usize {
        self.capacity - self.used_slots()
    }

    /// Check if every usable slot is occupied
    pub fn is_full(&self) -> bool {
        self.free_slots() == 0
    }

    /// Get slot contents
    pub fn get(&self, slot: usize) -> Option<&E> {
        self.slots.get(slot)?.as_ref()
    }

    /// Get mutable slot contents
    pub fn get_mut(&mut self, slot: usize) -> Option<&mut E> {
        self.slots.get_mut(slot)?.as_mut()
    }

    /// Stack in a slot, if the slot holds one
    pub fn stack(&self, slot: usize) -> Option<&ItemStack> {
        self.get(slot)?.as_stack()
    }

    /// Mutable stack in a slot, if the slot holds one
    pub fn stack_mut(&mut self, slot: usize) -> Option<&mut ItemStack> {
        self.get_mut(slot)?.as_stack_mut()
    }

    /// Held stack
    pub fn held(&self) -> Option<&E> {
        self.held.as_ref()
    }

    /// Mutable held stack
    pub fn held_mut(&mut self) -> Option<&mut E> {
        self.held.as_mut()
    }

    /// Replace the held stack, returning the previous one
    pub fn set_held(&mut self, held: Option<E>) -> Option<E> {
        std::mem::replace(&mut self.held, held)
    }

    /// Entry named by a source reference
    pub fn entry(&self, source: SourceRef) -> Option<&E> {
        match source {
            SourceRef::Slot(slot) => self.get(slot),
            SourceRef::Held => self.held(),
        }
    }

    /// Mutable entry named by a source reference
    pub fn entry_mut(&mut self, source: SourceRef) -> Option<&mut E> {
        match source {
            SourceRef::Slot(slot) => self.get_mut(slot),
            SourceRef::Held => self.held_mut(),
        }
    }

    /// Empty the slot named by a source reference without compacting the list
    pub fn clear(&mut self, source: SourceRef) -> Option<E> {
        match source {
            SourceRef::Slot(slot) => self.clear_slot(slot),
            SourceRef::Held => self.held.take(),
        }
    }

    /// Take the contents of a slot, leaving it empty
    pub fn take(&mut self, slot: usize) -> Option<E> {
        self.slots.get_mut(slot)?.take()
    }

    /// Empty a slot in place
    pub fn clear_slot(&mut self, slot: usize) -> Option<E> {
        self.take(slot)
    }

    /// Append an entry past the end of the list.
    ///
    /// Returns the entry back if the list already fills the usable capacity.
    pub fn push(&mut self, entry: E) -> Result<usize, E> {
        if self.slots.len() >= self.capacity {
            return Err(entry);
        }
        self.slots.push(Some(entry));
        Ok(self.slots.len() - 1)
    }

    /// Put an entry into a slot.
    ///
    /// Slots past the list length are materialized; returns the entry back if
    /// the slot is outside the usable capacity.
    pub fn set(&mut self, slot: usize, entry: E) -> Result<Option<E>, E> {
        if slot >= self.capacity {
            return Err(entry);
        }
        while self.slots.len() <= slot {
            self.slots.push(None);
        }
        Ok(self.slots[slot].replace(entry))
    }

    /// First empty slot in `0..capacity`
    pub fn find_empty_slot(&self) -> Option<usize> {
        (0..self.capacity).find(|&i| self.slots.get(i).map_or(true, |s| s.is_none()))
    }

    /// Place an entry in the first empty slot
    pub fn place_in_empty_slot(&mut self, entry: E) -> Result<usize, E> {
        match self.find_empty_slot() {
            Some(slot) => self.set(slot, entry).map(|_| slot),
            None => Err(entry),
        }
    }

    /// Find slot holding a stack of `kind`
    pub fn find_item(&self, kind: &ItemKind) -> Option<usize> {
        self.slots.iter().position(|s| {
            s.as_ref()
                .and_then(SlotItem::as_stack)
                .map_or(false, |stack| stack.kind == *kind)
        })
    }

    /// Total quantity of `kind` across slots and the held stack
    pub fn total_quantity(&self, kind: &ItemKind) -> u64 {
        self.slots
            .iter()
            .chain(std::iter::once(&self.held))
            .filter_map(|s| s.as_ref().and_then(SlotItem::as_stack))
            .filter(|stack| stack.kind == *kind)
            .map(|stack| u64::from(stack.quantity()))
            .sum()
    }

    /// Get all occupied slots as iterator
    pub fn items(&self) -> impl Iterator<Item = (usize, &E)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|entry| (i, entry)))
    }
}

impl<E: SlotItem> Default for Inventory<E> {
    fn default() -> Self {
        Self::new(36)
    }
}
