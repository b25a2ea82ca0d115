//! Composite bags
//!
//! An [`OmniBag`] holds other bags rather than stacks. Children are plain
//! [`ItemBag`]s, so a composite can never hold another composite.

use crate::autofill::autofill_tier;
use crate::bag::ItemBag;
use crate::config::BagConfig;
use crate::container::{Container, HostItem};
use crate::error::{BagError, BagResult};
use crate::events::{BagEvent, EventQueue};
use crate::settings::{BagSettings, IconOverride};
use crate::size::ContainerSize;
use std::collections::BTreeMap;
use void_inventory::{Inventory, SlotItem, SourceRef};

/// A bag of bags
#[derive(Debug, Clone)]
pub struct OmniBag {
    type_id: String,
    size: ContainerSize,
    price: u32,
    children: Vec<ItemBag>,
    settings: BagSettings,
    icon: Option<IconOverride>,
    closing: bool,
    events: EventQueue,
}

impl OmniBag {
    /// Create an empty composite of the configured type
    pub fn new(config: &BagConfig, size: ContainerSize) -> BagResult<Self> {
        let type_id = config.omni_bag_type().to_string();
        let profile = config
            .size_profile(size)
            .ok_or_else(|| BagError::MissingSizeConfig {
                type_id: type_id.clone(),
                size,
            })?;
        Ok(Self {
            type_id,
            size,
            price: profile.price,
            children: Vec::new(),
            settings: BagSettings::default(),
            icon: None,
            closing: false,
            events: EventQueue::default(),
        })
    }

    /// Stable type identifier
    pub fn type_id(&self) -> &str {
        &self.type_id
    }

    /// Size class
    pub fn size(&self) -> ContainerSize {
        self.size
    }

    /// Purchase price of the composite itself
    pub fn price(&self) -> u32 {
        self.price
    }

    /// Child bags in insertion order
    pub fn children(&self) -> &[ItemBag] {
        &self.children
    }

    /// Mutable child bags
    pub fn children_mut(&mut self) -> &mut [ItemBag] {
        &mut self.children
    }

    /// Child of a given type
    pub fn child(&self, type_id: &str) -> Option<&ItemBag> {
        self.children.iter().find(|c| c.type_id() == type_id)
    }

    /// Mutable child of a given type
    pub fn child_mut(&mut self, type_id: &str) -> Option<&mut ItemBag> {
        self.children.iter_mut().find(|c| c.type_id() == type_id)
    }

    /// Check if there are no children
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of children
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Behaviour flags
    pub fn settings(&self) -> &BagSettings {
        &self.settings
    }

    /// Mutable behaviour flags
    pub fn settings_mut(&mut self) -> &mut BagSettings {
        &mut self.settings
    }

    /// Icon override
    pub fn icon(&self) -> Option<IconOverride> {
        self.icon
    }

    /// Set or clear the icon override
    pub fn set_icon(&mut self, icon: Option<IconOverride>) {
        self.icon = icon;
    }

    /// Take the pending events
    pub fn drain_events(&mut self) -> Vec<BagEvent> {
        self.events.drain()
    }

    /// Whether `child` could live in this composite
    pub fn is_valid_child(&self, child: &ItemBag) -> bool {
        child.size() <= self.size
    }

    /// Check if every child fits and no type appears twice
    pub fn has_valid_children(&self) -> bool {
        self.children.iter().enumerate().all(|(index, child)| {
            self.is_valid_child(child)
                && self.children[..index]
                    .iter()
                    .all(|other| other.type_id() != child.type_id())
        })
    }

    /// Move the bag in `slot` of `source` into the composite.
    ///
    /// Rejected when the slot does not hold a plain bag, the bag is too large,
    /// or a child of the same type is already present.
    pub fn add_child(&mut self, source: &mut Inventory<HostItem>, slot: usize) -> bool {
        let acceptable = match source.get(slot).and_then(HostItem::as_container) {
            Some(Container::Item(bag)) => {
                self.is_valid_child(bag) && self.child(bag.type_id()).is_none()
            }
            _ => false,
        };
        if !acceptable {
            return false;
        }

        match source.take(slot) {
            Some(HostItem::Bag(container)) => match *container {
                Container::Item(bag) => {
                    log::debug!("Added {} ({}) to {}", bag.type_id(), bag.size(), self.type_id);
                    self.children.push(bag);
                    self.events.push(BagEvent::ChildrenChanged);
                    true
                }
                other => {
                    let _ = source.set(slot, HostItem::bag(other));
                    false
                }
            },
            Some(other) => {
                let _ = source.set(slot, other);
                false
            }
            None => false,
        }
    }

    /// Move the child of type `type_id` into the first empty slot of `target`
    pub fn remove_child(&mut self, type_id: &str, target: &mut Inventory<HostItem>) -> bool {
        let Some(index) = self.children.iter().position(|c| c.type_id() == type_id) else {
            return false;
        };
        let Some(slot) = target.find_empty_slot() else {
            return false;
        };

        let child = self.children.remove(index);
        match target.set(slot, HostItem::bag(child)) {
            Ok(_) => {
                self.events.push(BagEvent::ChildrenChanged);
                true
            }
            Err(entry) => {
                if let HostItem::Bag(container) = entry {
                    if let Container::Item(child) = *container {
                        self.children.insert(index, child);
                    }
                }
                false
            }
        }
    }

    /// Keep at most one child per type: the largest one that fits this
    /// composite. The rest go back to `target`, one slot each.
    ///
    /// Each child is pruned into `target` first. Children that cannot be
    /// placed stay in the composite.
    pub fn prune_invalid(&mut self, target: &mut Inventory<HostItem>) -> bool {
        let mut changed = false;
        for child in &mut self.children {
            changed |= child.prune_invalid(target);
        }

        let mut best: BTreeMap<&str, usize> = BTreeMap::new();
        for (index, child) in self.children.iter().enumerate() {
            if !self.is_valid_child(child) {
                continue;
            }
            let current = best.entry(child.type_id()).or_insert(index);
            if child.size() > self.children[*current].size() {
                *current = index;
            }
        }
        let keep: Vec<usize> = best.into_values().collect();

        let mut discarded = Vec::new();
        let mut kept = Vec::new();
        for (index, child) in self.children.drain(..).enumerate() {
            if keep.contains(&index) {
                kept.push(child);
            } else {
                discarded.push(child);
            }
        }
        self.children = kept;

        let mut returned = false;
        for child in discarded {
            let (type_id, size) = (child.type_id().to_string(), child.size());
            match target.place_in_empty_slot(HostItem::bag(child)) {
                Ok(slot) => {
                    log::debug!("Returned {} ({}) to slot {}", type_id, size, slot);
                    returned = true;
                }
                Err(entry) => {
                    log::warn!("Kept {} ({}) in {}: target has no room", type_id, size, self.type_id);
                    if let HostItem::Bag(container) = entry {
                        if let Container::Item(child) = *container {
                            self.children.push(child);
                        }
                    }
                }
            }
        }

        if returned {
            self.events.push(BagEvent::ChildrenChanged);
        }
        changed || returned
    }

    /// Change size class and prune children that no longer fit
    pub fn resize(
        &mut self,
        size: ContainerSize,
        config: &BagConfig,
        target: &mut Inventory<HostItem>,
    ) -> BagResult<bool> {
        let profile = config
            .size_profile(size)
            .ok_or_else(|| BagError::MissingSizeConfig {
                type_id: self.type_id.clone(),
                size,
            })?;
        self.size = size;
        self.price = profile.price;
        Ok(self.prune_invalid(target))
    }

    /// Route the stack at `origin` into the children, in autofill tier order.
    ///
    /// Each child that accepts the item takes what it can until the requested
    /// quantity is moved.
    pub fn move_in<E: SlotItem>(
        &mut self,
        source: &mut Inventory<E>,
        origin: SourceRef,
        quantity: u32,
    ) -> u32 {
        let proto = source.entry(origin).and_then(SlotItem::as_stack).cloned();
        let Some(proto) = proto else {
            self.events.transfer(0);
            return 0;
        };

        let mut order: Vec<usize> = (0..self.children.len()).collect();
        order.sort_by_key(|&index| autofill_tier(&self.children[index]));

        let mut moved = 0u32;
        for index in order {
            if moved >= quantity {
                break;
            }
            let child = &mut self.children[index];
            if !child.is_valid_item(&proto) || child.is_full(&proto.kind) {
                continue;
            }
            moved += child.insert_from(&proto, quantity - moved, source, Some(origin));
        }

        self.events.transfer(moved);
        moved
    }

    /// Sum of the children's values, or the purchase price when empty
    pub fn total_value(&self) -> u64 {
        if self.children.is_empty() {
            return u64::from(self.price);
        }
        self.children.iter().map(ItemBag::total_value).sum()
    }

    /// Run `on_close` unless a close is already in progress
    pub fn close_view(&mut self, on_close: impl FnOnce(&mut Self)) -> bool {
        if self.closing {
            return false;
        }
        self.closing = true;
        on_close(self);
        self.closing = false;
        true
    }

    pub(crate) fn restore_child(&mut self, child: ItemBag) {
        self.children.push(child);
    }
}
