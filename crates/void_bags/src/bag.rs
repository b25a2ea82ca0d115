//! Item bags
//!
//! An [`ItemBag`] holds at most one stack per [`ItemKind`] and moves
//! quantities between itself and a host [`Inventory`]. How much of a kind it
//! may hold is decided by its [`CapacityPolicy`].
//!
//! Transfers are partial: they move as much as both sides allow and report
//! the moved quantity. A transfer that moves nothing leaves the bag and the
//! inventory untouched.

use crate::config::{BagConfig, BagVariant, SizeProfile};
use crate::error::{BagError, BagResult};
use crate::events::{BagEvent, EventQueue};
use crate::history::{now_millis, ModificationLog};
use crate::policy::{CapacityPolicy, CapacityRule, FixedQuota, RequirementQuota, SlotQuota};
use crate::requirements::RequirementSource;
use crate::settings::{BagSettings, IconOverride, SortOrder, SortProperty};
use crate::size::ContainerSize;
use std::sync::Arc;
use void_inventory::{Inventory, ItemCategory, ItemKind, ItemStack, SlotItem, SourceRef};

/// Multiplier applied to unit prices when valuing bag contents
pub const VALUE_MULTIPLIER: u64 = 2;

/// A bag of item stacks
#[derive(Debug, Clone)]
pub struct ItemBag {
    type_id: String,
    size: ContainerSize,
    policy: CapacityPolicy,
    price: u32,
    contents: Vec<ItemStack>,
    history: ModificationLog,
    settings: BagSettings,
    icon: Option<IconOverride>,
    closing: bool,
    events: EventQueue,
}

impl ItemBag {
    fn with_policy(
        type_id: impl Into<String>,
        size: ContainerSize,
        policy: CapacityPolicy,
        price: u32,
    ) -> Self {
        Self {
            type_id: type_id.into(),
            size,
            policy,
            price,
            contents: Vec::new(),
            history: ModificationLog::new(),
            settings: BagSettings::default(),
            icon: None,
            closing: false,
            events: EventQueue::default(),
        }
    }

    /// Create a fixed-quota bag of a configured type
    pub fn fixed(config: &BagConfig, type_id: &str, size: ContainerSize) -> BagResult<Self> {
        let bag_type = config
            .fixed_bag(type_id)
            .ok_or_else(|| BagError::UnknownTypeId(type_id.to_string()))?;
        if !bag_type.sizes.contains(&size) {
            return Err(BagError::InvalidSize {
                type_id: type_id.to_string(),
                size,
            });
        }
        let profile = size_profile(config, type_id, size)?;
        let policy = CapacityPolicy::FixedQuota(FixedQuota::new(bag_type.clone(), profile.quota));
        Ok(Self::with_policy(type_id, size, policy, profile.price))
    }

    /// Create a requirement-driven bag reading from `source`
    pub fn requirements(
        config: &BagConfig,
        size: ContainerSize,
        source: Arc<dyn RequirementSource>,
    ) -> BagResult<Self> {
        let bag_type = config.requirement_bag();
        if !bag_type.sizes.contains(&size) {
            return Err(BagError::InvalidSize {
                type_id: bag_type.type_id.clone(),
                size,
            });
        }
        let profile = size_profile(config, &bag_type.type_id, size)?;
        let policy = CapacityPolicy::Requirements(RequirementQuota::new(source));
        Ok(Self::with_policy(
            bag_type.type_id.clone(),
            size,
            policy,
            profile.price,
        ))
    }

    /// Create a slot-based bag (rucksack)
    pub fn rucksack(config: &BagConfig, size: ContainerSize) -> BagResult<Self> {
        let type_id = config.slot_bag_type();
        let profile = size_profile(config, type_id, size)?;
        let policy = CapacityPolicy::Slots(SlotQuota::new(profile.slots, profile.stack_ceiling));
        Ok(Self::with_policy(type_id, size, policy, profile.price))
    }

    /// Stable type identifier
    pub fn type_id(&self) -> &str {
        &self.type_id
    }

    /// Size class
    pub fn size(&self) -> ContainerSize {
        self.size
    }

    /// Variant tag
    pub fn variant(&self) -> BagVariant {
        self.policy.variant()
    }

    /// Capacity policy
    pub fn policy(&self) -> &CapacityPolicy {
        &self.policy
    }

    /// Purchase price of the bag itself
    pub fn price(&self) -> u32 {
        self.price
    }

    /// Stacks held by the bag, one per kind
    pub fn contents(&self) -> &[ItemStack] {
        &self.contents
    }

    /// Check if the bag holds nothing
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Modification log
    pub fn history(&self) -> &ModificationLog {
        &self.history
    }

    /// Behaviour flags
    pub fn settings(&self) -> &BagSettings {
        &self.settings
    }

    /// Mutable behaviour flags
    pub fn settings_mut(&mut self) -> &mut BagSettings {
        &mut self.settings
    }

    /// Builder form of setting the behaviour flags
    pub fn with_settings(mut self, settings: BagSettings) -> Self {
        self.settings = settings;
        self
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

    /// Quantity of `kind` held
    pub fn quantity_of(&self, kind: &ItemKind) -> u32 {
        self.contents
            .iter()
            .find(|stack| stack.kind == *kind)
            .map_or(0, ItemStack::quantity)
    }

    /// Whether the bag may hold this item at all
    pub fn is_valid_item(&self, item: &ItemStack) -> bool {
        is_storable(item) && self.policy.accepts(item)
    }

    /// Maximum total quantity of `kind` the bag may hold right now
    pub fn capacity_for(&self, kind: &ItemKind) -> u32 {
        self.policy.capacity_for(kind, &self.contents)
    }

    /// Check if no more of `kind` fits
    pub fn is_full(&self, kind: &ItemKind) -> bool {
        self.policy.is_full(kind, &self.contents)
    }

    /// Check if the contents fit the slot budget. Always true for bags
    /// without one.
    pub fn fits_slot_budget(&self) -> bool {
        self.policy
            .slot_quota()
            .map_or(true, |quota| quota.fits(&self.contents))
    }

    /// Sum of unit price x [`VALUE_MULTIPLIER`] x quantity, or the bag's own
    /// price when empty
    pub fn total_value(&self) -> u64 {
        if self.contents.is_empty() {
            return u64::from(self.price);
        }
        self.contents
            .iter()
            .map(|stack| u64::from(stack.price) * VALUE_MULTIPLIER * u64::from(stack.quantity()))
            .sum()
    }

    /// Move up to `quantity` of the stack at `origin` (and equivalent stacks
    /// elsewhere in `source`) into the bag.
    ///
    /// The referenced stack is drained first, then the list in slot order.
    pub fn move_in<E: SlotItem>(
        &mut self,
        source: &mut Inventory<E>,
        origin: SourceRef,
        quantity: u32,
    ) -> u32 {
        let proto = source
            .entry(origin)
            .and_then(SlotItem::as_stack)
            .cloned();
        let moved = match proto {
            Some(proto) => self.insert_from(&proto, quantity, source, Some(origin)),
            None => 0,
        };
        self.events.transfer(moved);
        moved
    }

    /// Move up to `quantity` of `kind`'s stacks from `source` in slot order
    pub fn move_in_kind<E: SlotItem>(
        &mut self,
        kind: &ItemStack,
        quantity: u32,
        source: &mut Inventory<E>,
    ) -> u32 {
        let moved = self.insert_from(kind, quantity, source, None);
        self.events.transfer(moved);
        moved
    }

    /// Batch form of [`move_in_kind`](Self::move_in_kind) over parallel lists.
    ///
    /// Fires a single notification for the aggregate.
    pub fn move_in_batch<E: SlotItem>(
        &mut self,
        kinds: &[ItemStack],
        quantities: &[u32],
        source: &mut Inventory<E>,
    ) -> BagResult<u32> {
        if kinds.len() != quantities.len() {
            return Err(BagError::BatchLengthMismatch {
                kinds: kinds.len(),
                quantities: quantities.len(),
            });
        }
        let moved = kinds
            .iter()
            .zip(quantities)
            .fold(0u32, |total, (kind, &quantity)| {
                total.saturating_add(self.insert_from(kind, quantity, source, None))
            });
        self.events.transfer(moved);
        Ok(moved)
    }

    /// Move up to `quantity` of `kind` out of the bag into `target`.
    ///
    /// Existing stacks in `target` are topped up first, then empty slots are
    /// filled in order.
    pub fn move_out<E: SlotItem>(
        &mut self,
        kind: &ItemStack,
        quantity: u32,
        target: &mut Inventory<E>,
    ) -> u32 {
        let moved = self.extract_to(kind, quantity, target);
        self.events.transfer(moved);
        moved
    }

    /// Evict stacks the bag may no longer hold into `target`.
    ///
    /// Slot-based bags are also trimmed back to their slot count. Stacks that
    /// cannot be moved stay in the bag. Returns whether anything changed.
    pub fn prune_invalid<E: SlotItem>(&mut self, target: &mut Inventory<E>) -> bool {
        let before = self.contents.len();
        self.contents.retain(|stack| !stack.is_empty());
        let mut changed = self.contents.len() != before;
        let mut moved = 0u32;

        let invalid: Vec<ItemStack> = self
            .contents
            .iter()
            .filter(|stack| !self.is_valid_item(stack))
            .cloned()
            .collect();
        for stack in invalid {
            let evicted = self.extract_to(&stack, stack.quantity(), target);
            moved = moved.saturating_add(evicted);
            if evicted < stack.quantity() {
                log::warn!(
                    "Kept {} x {} in {}: target has no room",
                    stack.quantity() - evicted,
                    stack.kind,
                    self.type_id
                );
            }
        }

        if let Some(quota) = self.policy.slot_quota().copied() {
            moved = moved.saturating_add(self.trim_to_slots(quota, target));
        }

        changed |= moved > 0;
        if moved > 0 {
            self.events.push(BagEvent::ContentsChanged { moved });
        }
        changed
    }

    /// Change size class, re-deriving size constants and pruning into `target`
    pub fn resize<E: SlotItem>(
        &mut self,
        size: ContainerSize,
        config: &BagConfig,
        target: &mut Inventory<E>,
    ) -> BagResult<bool> {
        let allowed = match &self.policy {
            CapacityPolicy::FixedQuota(quota) => quota.bag_type().sizes.contains(&size),
            CapacityPolicy::Requirements(_) => config.requirement_bag().sizes.contains(&size),
            CapacityPolicy::Slots(_) => true,
        };
        if !allowed {
            return Err(BagError::InvalidSize {
                type_id: self.type_id.clone(),
                size,
            });
        }
        let profile = size_profile(config, &self.type_id, size)?;

        match &mut self.policy {
            CapacityPolicy::FixedQuota(quota) => {
                *quota = FixedQuota::new(quota.bag_type().clone(), profile.quota);
            }
            CapacityPolicy::Requirements(_) => {}
            CapacityPolicy::Slots(quota) => {
                *quota = SlotQuota::new(profile.slots, profile.stack_ceiling);
            }
        }
        log::debug!("Resized {} from {} to {}", self.type_id, self.size, size);
        self.size = size;
        self.price = profile.price;

        Ok(self.prune_invalid(target))
    }

    /// Run `on_close` unless a close is already in progress.
    ///
    /// Returns false for a re-entrant call.
    pub fn close_view(&mut self, on_close: impl FnOnce(&mut Self)) -> bool {
        if self.closing {
            return false;
        }
        self.closing = true;
        on_close(self);
        self.closing = false;
        true
    }

    /// Check if a close is in progress
    pub fn is_closing(&self) -> bool {
        self.closing
    }

    /// Contents ordered by the configured sort settings
    pub fn sorted_contents(&self) -> Vec<&ItemStack> {
        let mut sorted: Vec<&ItemStack> = self.contents.iter().collect();
        let recency = |stack: &ItemStack| self.history.rank(&stack.kind);
        sorted.sort_by(|a, b| {
            let ordering = match self.settings.sort_property {
                SortProperty::Time => recency(*a).cmp(&recency(*b)),
                SortProperty::Name => a.name.cmp(&b.name),
                SortProperty::Id => a.kind.id.cmp(&b.kind.id),
                SortProperty::Quality => a.kind.quality.cmp(&b.kind.quality),
                SortProperty::Quantity => a.quantity().cmp(&b.quantity()),
                SortProperty::Price => a.price.cmp(&b.price),
            };
            let ordering = ordering.then_with(|| a.kind.cmp(&b.kind));
            match self.settings.sort_order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            }
        });
        sorted
    }

    pub(crate) fn push_event(&mut self, event: BagEvent) {
        self.events.push(event);
    }

    /// Append a stack while rebuilding from save data, merging duplicates
    pub(crate) fn restore_stack(&mut self, stack: ItemStack) {
        match self.contents.iter_mut().find(|s| s.is_equivalent(&stack)) {
            Some(existing) => {
                let total = existing.quantity().saturating_add(stack.quantity());
                existing.set_quantity(total);
            }
            None => self.contents.push(stack),
        }
    }

    fn slot_index(&self, kind: &ItemKind) -> Option<usize> {
        self.contents.iter().position(|stack| stack.kind == *kind)
    }

    pub(crate) fn insert_from<E: SlotItem>(
        &mut self,
        proto: &ItemStack,
        quantity: u32,
        source: &mut Inventory<E>,
        origin: Option<SourceRef>,
    ) -> u32 {
        if quantity == 0 || !self.is_valid_item(proto) {
            return 0;
        }

        let (index, created) = match self.slot_index(&proto.kind) {
            Some(index) => (index, false),
            None => {
                self.contents.push(proto.empty_copy());
                (self.contents.len() - 1, true)
            }
        };

        let held = self.contents[index].quantity();
        let mut room = self.capacity_for(&proto.kind).saturating_sub(held);
        let mut wanted = quantity;
        let mut moved = 0u32;

        if room > 0 {
            for candidate_ref in candidates(source, &proto.kind, origin) {
                if room == 0 || wanted == 0 {
                    break;
                }
                let Some(candidate) = source
                    .entry_mut(candidate_ref)
                    .and_then(|entry| entry.as_stack_mut())
                else {
                    continue;
                };

                let take = wanted.min(room).min(candidate.quantity());
                if take == 0 {
                    continue;
                }
                let added = apply_delta(&mut self.contents[index], take);
                if added == 0 {
                    break;
                }
                let left = candidate.quantity() - added;
                candidate.set_quantity(left);
                if left == 0 {
                    source.clear(candidate_ref);
                }

                moved += added;
                wanted -= added;
                room -= added;
            }
        }

        if moved > 0 {
            if let Some(evicted) = self.history.touch(proto.kind, now_millis()) {
                log::debug!("Modification log of {} evicted {}", self.type_id, evicted);
            }
            log::debug!("Moved {} x {} into {}", moved, proto.kind, self.type_id);
        } else if created {
            self.contents.remove(index);
        }
        moved
    }

    fn extract_to<E: SlotItem>(
        &mut self,
        proto: &ItemStack,
        quantity: u32,
        target: &mut Inventory<E>,
    ) -> u32 {
        if quantity == 0 {
            return 0;
        }
        let index = self
            .contents
            .iter()
            .position(|stack| stack.can_stack_with(proto))
            .or_else(|| self.contents.iter().position(|stack| stack.is_equivalent(proto)));
        let Some(index) = index else {
            return 0;
        };

        let mut to_move = self.contents[index].quantity().min(quantity);
        let mut moved = 0u32;

        // Top up stacks already in the target
        for slot in 0..target.len() {
            if to_move == 0 {
                break;
            }
            let Some(existing) = target.stack_mut(slot) else {
                continue;
            };
            if !existing.can_stack_with(&self.contents[index]) {
                continue;
            }
            let want = existing
                .max_stack
                .saturating_sub(existing.quantity())
                .min(to_move);
            if want == 0 {
                continue;
            }
            let added = apply_delta(existing, want);
            take_from(&mut self.contents[index], added);
            to_move -= added;
            moved += added;
        }

        // Fill empty slots in order
        let mut slot = 0;
        while to_move > 0 && slot < target.capacity() {
            if target.get(slot).is_some() {
                slot += 1;
                continue;
            }
            let mut record = self.contents[index].empty_copy();
            let want = record.max_stack.min(to_move);
            let added = apply_delta(&mut record, want);
            if added == 0 {
                break;
            }
            if target.set(slot, E::from_stack(record)).is_err() {
                break;
            }
            take_from(&mut self.contents[index], added);
            to_move -= added;
            moved += added;
            slot += 1;
        }

        if self.contents[index].is_empty() {
            self.contents.remove(index);
        }
        if moved > 0 {
            log::debug!("Moved {} x {} out of {}", moved, proto.kind, self.type_id);
        }
        moved
    }

    fn trim_to_slots<E: SlotItem>(&mut self, quota: SlotQuota, target: &mut Inventory<E>) -> u32 {
        let mut moved = 0u32;
        while quota.slots_in_use(&self.contents) > quota.slots() {
            let Some(last) = self.contents.last().cloned() else {
                break;
            };
            let amount = last.quantity() - quota.one_slot_less(last.quantity());
            if amount == 0 {
                break;
            }
            let evicted = self.extract_to(&last, amount, target);
            moved = moved.saturating_add(evicted);
            if evicted < amount {
                log::warn!(
                    "Stopped trimming {}: {} slots in use, {} available",
                    self.type_id,
                    quota.slots_in_use(&self.contents),
                    quota.slots()
                );
                break;
            }
        }
        moved
    }
}

/// Base acceptance rule shared by every bag
pub fn is_storable(item: &ItemStack) -> bool {
    !item.special && !item.lost && !item.attached && item.category != ItemCategory::Quest
}

fn size_profile(config: &BagConfig, type_id: &str, size: ContainerSize) -> BagResult<SizeProfile> {
    config
        .size_profile(size)
        .copied()
        .ok_or_else(|| BagError::MissingSizeConfig {
            type_id: type_id.to_string(),
            size,
        })
}

/// Source records equivalent to `kind`: the referenced one first, then the
/// list in slot order. The held stack only takes part when referenced.
fn candidates<E: SlotItem>(
    source: &Inventory<E>,
    kind: &ItemKind,
    origin: Option<SourceRef>,
) -> Vec<SourceRef> {
    let matches = |entry: Option<&E>| {
        entry
            .and_then(SlotItem::as_stack)
            .map_or(false, |stack| stack.kind == *kind)
    };

    let mut refs = Vec::new();
    if let Some(origin) = origin {
        if matches(source.entry(origin)) {
            refs.push(origin);
        }
    }
    refs.extend(
        source
            .items()
            .map(|(slot, _)| SourceRef::Slot(slot))
            .filter(|r| Some(*r) != origin && matches(source.entry(*r))),
    );
    refs
}

/// Raise `stack` by `delta`, returning what the host actually stored
fn apply_delta(stack: &mut ItemStack, delta: u32) -> u32 {
    let before = stack.quantity();
    let stored = stack.set_quantity(before.saturating_add(delta));
    let added = stored.saturating_sub(before);
    if added != delta {
        log::warn!(
            "Quantity cap on {}: asked for +{}, stored +{}",
            stack.kind,
            delta,
            added
        );
    }
    added
}

fn take_from(stack: &mut ItemStack, amount: u32) {
    let left = stack.quantity().saturating_sub(amount);
    stack.set_quantity(left);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requirements::{Requirement, RequirementIndex};
    use crate::settings::AutofillPriority;
    use crate::events::TransferCue;
    use void_inventory::{ItemDefinition, ItemQuality};

    const WOOD: u32 = 388;
    const STONE: u32 = 390;

    fn wood(quantity: u32) -> ItemStack {
        ItemDefinition::new(WOOD, "Wood")
            .with_category(ItemCategory::Material)
            .with_price(2)
            .stack(ItemQuality::Regular, quantity)
    }

    fn stone(quantity: u32) -> ItemStack {
        ItemDefinition::new(STONE, "Stone")
            .with_category(ItemCategory::Material)
            .with_price(2)
            .stack(ItemQuality::Regular, quantity)
    }

    fn construction_bag() -> ItemBag {
        ItemBag::fixed(&BagConfig::default(), "construction_bag", ContainerSize::Small).unwrap()
    }

    fn rucksack(slots: u32, ceiling: u32) -> ItemBag {
        let config = BagConfig::default().with_size_profile(
            ContainerSize::Small,
            SizeProfile {
                slots,
                stack_ceiling: ceiling,
                quota: ceiling,
                price: 100,
            },
        );
        ItemBag::rucksack(&config, ContainerSize::Small).unwrap()
    }

    #[test]
    fn test_fixed_construction() {
        let config = BagConfig::default();

        assert!(matches!(
            ItemBag::fixed(&config, "nope", ContainerSize::Small),
            Err(BagError::UnknownTypeId(_))
        ));

        let index: Arc<dyn RequirementSource> = Arc::new(RequirementIndex::new());
        assert!(matches!(
            ItemBag::requirements(&config, ContainerSize::Small, index.clone()),
            Err(BagError::InvalidSize { .. })
        ));
        assert!(ItemBag::requirements(&config, ContainerSize::Large, index).is_ok());
    }

    #[test]
    fn test_move_in_respects_quota() {
        let mut bag = construction_bag();
        let mut inv = Inventory::with_slots(vec![Some(wood(50))], 4);

        let moved = bag.move_in(&mut inv, SourceRef::Slot(0), 50);

        assert_eq!(moved, 30);
        assert_eq!(bag.quantity_of(&ItemKind::new(WOOD)), 30);
        assert_eq!(inv.stack(0).map(ItemStack::quantity), Some(20));
        assert!(bag.is_full(&ItemKind::new(WOOD)));
    }

    #[test]
    fn test_move_in_invalid_is_noop() {
        let mut bag = construction_bag();
        let mut quest = wood(5);
        quest.category = ItemCategory::Quest;
        let mut inv = Inventory::with_slots(vec![Some(quest)], 2);

        assert_eq!(bag.move_in(&mut inv, SourceRef::Slot(0), 5), 0);
        assert!(bag.is_empty());
        assert_eq!(inv.stack(0).map(ItemStack::quantity), Some(5));
        assert_eq!(
            bag.drain_events(),
            vec![BagEvent::Feedback(TransferCue::Failure)]
        );
    }

    #[test]
    fn test_move_in_zero_leaves_no_slot() {
        let mut bag = construction_bag();
        let mut inv = Inventory::with_slots(vec![Some(wood(5))], 2);

        assert_eq!(bag.move_in(&mut inv, SourceRef::Slot(0), 0), 0);
        assert!(bag.is_empty());
        assert!(bag.history().is_empty());
    }

    #[test]
    fn test_move_in_drains_origin_first() {
        let mut bag = construction_bag();
        let mut inv = Inventory::with_slots(
            vec![Some(wood(10)), Some(stone(3)), Some(wood(10)), Some(wood(10))],
            4,
        );

        let moved = bag.move_in(&mut inv, SourceRef::Slot(2), 25);

        assert_eq!(moved, 25);
        assert!(inv.get(2).is_none());
        assert!(inv.get(0).is_none());
        assert_eq!(inv.stack(3).map(ItemStack::quantity), Some(5));
        assert_eq!(inv.len(), 4);
    }

    #[test]
    fn test_held_stack_only_when_referenced() {
        let mut bag = construction_bag();
        let mut inv = Inventory::with_slots(vec![Some(wood(4))], 2).with_held(wood(6));

        assert_eq!(bag.move_in_kind(&wood(0), 10, &mut inv), 4);
        assert_eq!(inv.held().map(ItemStack::quantity), Some(6));

        assert_eq!(bag.move_in(&mut inv, SourceRef::Held, 10), 6);
        assert!(inv.held().is_none());
    }

    #[test]
    fn test_move_in_batch() {
        let mut bag = construction_bag();
        let mut inv = Inventory::with_slots(vec![Some(wood(10)), Some(stone(10))], 2);

        let moved = bag
            .move_in_batch(&[wood(0), stone(0)], &[4, 6], &mut inv)
            .unwrap();

        assert_eq!(moved, 10);
        assert_eq!(
            bag.drain_events(),
            vec![
                BagEvent::ContentsChanged { moved: 10 },
                BagEvent::Feedback(TransferCue::Success),
            ]
        );
        assert!(matches!(
            bag.move_in_batch(&[wood(0)], &[1, 2], &mut inv),
            Err(BagError::BatchLengthMismatch { kinds: 1, quantities: 2 })
        ));
    }

    #[test]
    fn test_quantity_cap_discrepancy() {
        let mut bag = construction_bag();
        let capped = wood(20).with_representable_max(20);
        let mut inv = Inventory::with_slots(vec![Some(capped.clone()), Some(capped)], 2);

        // the bag slot inherits the host cap of its prototype
        let moved = bag.move_in(&mut inv, SourceRef::Slot(0), 30);

        assert_eq!(moved, 20);
        assert_eq!(bag.quantity_of(&ItemKind::new(WOOD)), 20);
        assert_eq!(inv.total_quantity(&ItemKind::new(WOOD)), 20);
    }

    #[test]
    fn test_batch_matches_single_moves() {
        let source = || {
            Inventory::with_slots(vec![Some(wood(10)), Some(stone(10)), Some(wood(5))], 3)
        };
        let kinds = [wood(0), stone(0), wood(0)];
        let quantities = [4, 6, 8];

        let mut batched = construction_bag();
        let mut batch_inv = source();
        batched
            .move_in_batch(&kinds, &quantities, &mut batch_inv)
            .unwrap();

        let mut single = construction_bag();
        let mut single_inv = source();
        for (kind, &quantity) in kinds.iter().zip(&quantities) {
            single.move_in_kind(kind, quantity, &mut single_inv);
        }

        let contents = |bag: &ItemBag| -> Vec<(ItemKind, u32)> {
            bag.contents().iter().map(|s| (s.kind, s.quantity())).collect()
        };
        let slots = |inv: &Inventory| -> Vec<Option<u32>> {
            (0..inv.capacity()).map(|slot| inv.stack(slot).map(ItemStack::quantity)).collect()
        };
        let order = |bag: &ItemBag| -> Vec<ItemKind> {
            bag.history().iter().map(|(kind, _)| *kind).collect()
        };

        assert_eq!(contents(&batched), contents(&single));
        assert_eq!(slots(&batch_inv), slots(&single_inv));
        assert_eq!(order(&batched), order(&single));
        assert_eq!(order(&batched), vec![ItemKind::new(STONE), ItemKind::new(WOOD)]);
    }

    #[test]
    fn test_move_out_into_capped_stack() {
        let mut bag = construction_bag();
        let mut inv = Inventory::with_slots(vec![Some(wood(30))], 1);
        assert_eq!(bag.move_in(&mut inv, SourceRef::Slot(0), 30), 30);

        // the host can only store 15 in the existing stack
        let mut target = Inventory::with_slots(vec![Some(wood(10).with_representable_max(15))], 2);
        let moved = bag.move_out(&wood(0), 30, &mut target);

        assert_eq!(moved, 30);
        assert_eq!(target.stack(0).map(ItemStack::quantity), Some(15));
        assert_eq!(target.stack(1).map(ItemStack::quantity), Some(25));
        assert_eq!(target.total_quantity(&ItemKind::new(WOOD)), 40);
        assert!(bag.is_empty());
    }

    #[test]
    fn test_move_out_capped_target_full() {
        let mut bag = construction_bag();
        let mut inv = Inventory::with_slots(vec![Some(wood(30))], 1);
        bag.move_in(&mut inv, SourceRef::Slot(0), 30);

        let mut target = Inventory::with_slots(vec![Some(wood(10).with_representable_max(15))], 1);
        let moved = bag.move_out(&wood(0), 30, &mut target);

        assert_eq!(moved, 5);
        assert_eq!(bag.quantity_of(&ItemKind::new(WOOD)), 25);
        assert_eq!(
            target.total_quantity(&ItemKind::new(WOOD)) + u64::from(bag.quantity_of(&ItemKind::new(WOOD))),
            40
        );
    }

    #[test]
    fn test_move_out_merges_then_fills() {
        let mut bag = construction_bag();
        let mut inv = Inventory::with_slots(vec![Some(wood(30))], 3);
        bag.move_in(&mut inv, SourceRef::Slot(0), 30);

        let mut target = Inventory::with_slots(vec![Some(wood(990).with_max_stack(999))], 3);
        let moved = bag.move_out(&wood(0), 30, &mut target);

        assert_eq!(moved, 30);
        assert_eq!(target.stack(0).map(ItemStack::quantity), Some(999));
        assert_eq!(target.stack(1).map(ItemStack::quantity), Some(21));
        assert!(bag.is_empty());
    }

    #[test]
    fn test_move_out_price_fallback() {
        let mut bag = construction_bag();
        let mut inv = Inventory::with_slots(vec![Some(wood(10))], 1);
        bag.move_in(&mut inv, SourceRef::Slot(0), 10);

        let mut target: Inventory = Inventory::new(2);
        assert_eq!(bag.move_out(&wood(0).with_price(9), 4, &mut target), 4);
        assert_eq!(target.stack(0).map(|s| s.price), Some(2));
    }

    #[test]
    fn test_move_out_absent_is_noop() {
        let mut bag = construction_bag();
        let mut target: Inventory = Inventory::new(2);

        assert_eq!(bag.move_out(&wood(0), 4, &mut target), 0);
        assert!(target.is_empty());
    }

    #[test]
    fn test_slot_bag_trims_on_resize() {
        let config = BagConfig::default();
        let mut bag = ItemBag::rucksack(&config, ContainerSize::Medium).unwrap();
        let mut inv = Inventory::with_slots(vec![Some(wood(999)), Some(stone(999))], 2);
        // 11 slots of wood leave room for one slot of stone
        let moved = bag.move_in(&mut inv, SourceRef::Slot(0), 999)
            + bag.move_in(&mut inv, SourceRef::Slot(1), 999);
        assert_eq!(moved, 999 + 99);

        let mut target: Inventory = Inventory::new(72);
        assert!(bag.resize(ContainerSize::Small, &config, &mut target).unwrap());

        let quota = *bag.policy().slot_quota().unwrap();
        assert!(quota.fits(bag.contents()));
        let kept: u64 = bag.contents().iter().map(|s| u64::from(s.quantity())).sum();
        let returned =
            target.total_quantity(&ItemKind::new(WOOD)) + target.total_quantity(&ItemKind::new(STONE));
        assert_eq!(kept + returned, u64::from(moved));
    }

    #[test]
    fn test_trim_stops_when_target_full() {
        let config = BagConfig::default();
        let mut bag = ItemBag::rucksack(&config, ContainerSize::Medium).unwrap();
        let mut inv = Inventory::with_slots(vec![Some(wood(999))], 1);
        bag.move_in(&mut inv, SourceRef::Slot(0), 999);

        let mut target: Inventory = Inventory::new(0);
        bag.resize(ContainerSize::Small, &config, &mut target).unwrap();

        assert_eq!(bag.quantity_of(&ItemKind::new(WOOD)), 999);
    }

    #[test]
    fn test_prune_evicts_invalid() {
        let index = Arc::new(RequirementIndex::with_requirements(vec![Requirement::new(
            "Construction",
            WOOD,
            ItemQuality::Regular,
            10,
        )]));
        let mut bag =
            ItemBag::requirements(&BagConfig::default(), ContainerSize::Large, index.clone())
                .unwrap();
        let mut inv = Inventory::with_slots(vec![Some(wood(10))], 1);
        assert_eq!(bag.move_in(&mut inv, SourceRef::Slot(0), 10), 10);

        index.complete_group("Construction");
        let mut target: Inventory = Inventory::new(1);
        assert!(bag.prune_invalid(&mut target));
        assert!(bag.is_empty());
        assert_eq!(target.stack(0).map(ItemStack::quantity), Some(10));
    }

    #[test]
    fn test_close_view_latch() {
        let mut bag = construction_bag();
        let mut nested = None;

        assert!(bag.close_view(|bag| {
            nested = Some(bag.close_view(|_| {}));
        }));
        assert_eq!(nested, Some(false));
        assert!(!bag.is_closing());
    }

    #[test]
    fn test_sorted_by_time() {
        let mut bag = rucksack(6, 99).with_settings(
            BagSettings::default()
                .with_autofill(AutofillPriority::High)
                .with_sort(SortProperty::Time, SortOrder::Descending),
        );
        let mut inv = Inventory::with_slots(vec![Some(wood(5)), Some(stone(5))], 2);
        bag.move_in(&mut inv, SourceRef::Slot(1), 1);
        bag.move_in(&mut inv, SourceRef::Slot(0), 1);

        let ids: Vec<u32> = bag.sorted_contents().iter().map(|s| s.kind.id).collect();
        assert_eq!(ids, vec![WOOD, STONE]);
    }

    #[test]
    fn test_total_value() {
        let mut bag = construction_bag();
        assert_eq!(bag.total_value(), 2_000);

        let mut inv = Inventory::with_slots(vec![Some(wood(10))], 1);
        bag.move_in(&mut inv, SourceRef::Slot(0), 10);
        assert_eq!(bag.total_value(), 40);
    }
}
