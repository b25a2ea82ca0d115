//! Autofill ordering
//!
//! When a picked-up item could go into several bags, bags with autofill
//! enabled are tried tier by tier:
//!
//! | tier | bags |
//! |------|------|
//! | 0 | requirement-driven |
//! | 1 | slot-based, high priority |
//! | 2 | fixed-quota |
//! | 3 | slot-based, low priority |
//!
//! Within a tier the caller's order is kept. Composites contribute their
//! children.

use crate::bag::ItemBag;
use crate::config::BagVariant;
use crate::container::Container;
use crate::events::{BagEvent, TransferCue};
use crate::settings::AutofillPriority;
use void_inventory::{Inventory, SlotItem, SourceRef};

/// Autofill tier of a bag, lower is tried first
pub fn autofill_tier(bag: &ItemBag) -> u8 {
    match (bag.variant(), bag.settings().autofill_priority) {
        (BagVariant::Requirements, _) => 0,
        (BagVariant::Slots, AutofillPriority::High) => 1,
        (BagVariant::FixedQuota, _) => 2,
        (BagVariant::Slots, AutofillPriority::Low) => 3,
        (BagVariant::Omni, _) => u8::MAX,
    }
}

/// A bag in autofill order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutofillTarget {
    /// Index into the container list
    pub container: usize,
    /// Child index when the bag lives in a composite
    pub child: Option<usize>,
    /// Tier the bag was sorted into
    pub tier: u8,
}

impl AutofillTarget {
    /// Resolve the bag this target names
    pub fn resolve_mut<'a>(&self, containers: &'a mut [Container]) -> Option<&'a mut ItemBag> {
        let container = containers.get_mut(self.container)?;
        match (container, self.child) {
            (Container::Item(bag), None) => Some(bag),
            (Container::Omni(omni), Some(child)) => omni.children_mut().get_mut(child),
            _ => None,
        }
    }
}

/// Autofill-enabled bags of `containers`, in the order they are tried
pub fn autofill_order(containers: &[Container]) -> Vec<AutofillTarget> {
    let mut order = Vec::new();
    for (index, container) in containers.iter().enumerate() {
        match container {
            Container::Item(bag) => push_target(&mut order, bag, index, None),
            Container::Omni(omni) if omni.settings().autofill => {
                for (child_index, child) in omni.children().iter().enumerate() {
                    push_target(&mut order, child, index, Some(child_index));
                }
            }
            Container::Omni(_) => {}
        }
    }
    order.sort_by_key(|target| target.tier);
    order
}

fn push_target(order: &mut Vec<AutofillTarget>, bag: &ItemBag, container: usize, child: Option<usize>) {
    if bag.settings().autofill {
        order.push(AutofillTarget {
            container,
            child,
            tier: autofill_tier(bag),
        });
    }
}

/// Move the stack at `origin` into autofill bags until it is used up.
///
/// Only the referenced stack is consumed. Every bag that took something gets
/// a contents event; the first of them also gets the one feedback cue of the
/// pickup. Returns the total moved.
pub fn autofill<E: SlotItem>(
    containers: &mut [Container],
    source: &mut Inventory<E>,
    origin: SourceRef,
) -> u32 {
    let mut moved = 0u32;
    let mut first: Option<AutofillTarget> = None;
    for target in autofill_order(containers) {
        let Some(proto) = source.entry(origin).and_then(SlotItem::as_stack).cloned() else {
            break;
        };
        let Some(bag) = target.resolve_mut(containers) else {
            continue;
        };
        if !bag.is_valid_item(&proto) || bag.is_full(&proto.kind) {
            continue;
        }
        // asking for exactly the origin's quantity keeps other stacks untouched
        let taken = bag.insert_from(&proto, proto.quantity(), source, Some(origin));
        if taken > 0 {
            bag.push_event(BagEvent::ContentsChanged { moved: taken });
            first = first.or(Some(target));
            moved += taken;
        }
    }

    let cued = match first {
        Some(target) => target.resolve_mut(containers),
        None => None,
    };
    if let Some(bag) = cued {
        bag.push_event(BagEvent::Feedback(TransferCue::Success));
        log::debug!("Autofilled {} units", moved);
    }
    moved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BagConfig;
    use crate::omni::OmniBag;
    use crate::requirements::{Requirement, RequirementIndex};
    use crate::settings::BagSettings;
    use crate::size::ContainerSize;
    use std::sync::Arc;
    use void_inventory::{ItemDefinition, ItemKind, ItemQuality, ItemStack};

    fn stone(quantity: u32) -> ItemStack {
        ItemDefinition::new(390, "Stone").stack(ItemQuality::Regular, quantity)
    }

    fn enabled(bag: ItemBag, priority: AutofillPriority) -> ItemBag {
        bag.with_settings(BagSettings::default().with_autofill(priority))
    }

    fn containers() -> Vec<Container> {
        let config = BagConfig::default();
        let index = Arc::new(RequirementIndex::with_requirements(vec![Requirement::new(
            "Quarry",
            390,
            ItemQuality::Regular,
            10,
        )]));
        vec![
            enabled(ItemBag::rucksack(&config, ContainerSize::Small).unwrap(), AutofillPriority::Low).into(),
            enabled(
                ItemBag::fixed(&config, "construction_bag", ContainerSize::Small).unwrap(),
                AutofillPriority::Low,
            )
            .into(),
            ItemBag::fixed(&config, "ore_bag", ContainerSize::Small).unwrap().into(),
            enabled(
                ItemBag::requirements(&config, ContainerSize::Large, index).unwrap(),
                AutofillPriority::Low,
            )
            .into(),
        ]
    }

    #[test]
    fn test_order_by_tier() {
        let order = autofill_order(&containers());
        let picked: Vec<(usize, u8)> = order.iter().map(|t| (t.container, t.tier)).collect();

        // the ore bag has autofill off
        assert_eq!(picked, vec![(3, 0), (1, 2), (0, 3)]);
    }

    #[test]
    fn test_high_priority_rucksack_before_fixed() {
        let mut list = containers();
        list[0].settings_mut().autofill_priority = AutofillPriority::High;

        let tiers: Vec<usize> = autofill_order(&list).iter().map(|t| t.container).collect();
        assert_eq!(tiers, vec![3, 0, 1]);
    }

    #[test]
    fn test_composite_children_flattened() {
        let config = BagConfig::default();
        let mut omni = OmniBag::new(&config, ContainerSize::Giant).unwrap();
        omni.settings_mut().autofill = true;
        omni.restore_child(enabled(
            ItemBag::rucksack(&config, ContainerSize::Small).unwrap(),
            AutofillPriority::High,
        ));
        omni.restore_child(ItemBag::fixed(&config, "ore_bag", ContainerSize::Small).unwrap());
        let mut list = vec![Container::from(omni)];

        let order = autofill_order(&list);
        assert_eq!(order.len(), 1);
        assert_eq!(order[0].child, Some(0));
        assert_eq!(
            order[0].resolve_mut(&mut list).map(|bag| bag.type_id().to_string()),
            Some("rucksack".to_string())
        );
    }

    #[test]
    fn test_autofill_consumes_origin_only() {
        let mut list = containers();
        let mut inv: Inventory = Inventory::with_slots(vec![Some(stone(50)), Some(stone(50))], 2);

        let moved = autofill(&mut list, &mut inv, SourceRef::Slot(1));

        // 10 required, 30 construction quota, 10 into the rucksack
        assert_eq!(moved, 50);
        assert!(inv.get(1).is_none());
        assert_eq!(inv.stack(0).map(ItemStack::quantity), Some(50));
        assert_eq!(
            list[3].as_item().map(|b| b.quantity_of(&ItemKind::new(390))),
            Some(10)
        );
    }

    #[test]
    fn test_autofill_single_cue_per_pickup() {
        let mut list = containers();
        let mut inv: Inventory = Inventory::with_slots(vec![Some(stone(50))], 1);

        assert_eq!(autofill(&mut list, &mut inv, SourceRef::Slot(0)), 50);

        let events: Vec<BagEvent> = list.iter_mut().flat_map(Container::drain_events).collect();
        let cues = events
            .iter()
            .filter(|e| matches!(e, BagEvent::Feedback(_)))
            .count();
        assert_eq!(cues, 1);
        assert!(events.contains(&BagEvent::ContentsChanged { moved: 10 }));
        assert!(events.contains(&BagEvent::ContentsChanged { moved: 30 }));
    }

    #[test]
    fn test_autofill_nothing_taken_is_silent() {
        let mut list = containers();
        let wood = ItemDefinition::new(388, "Wood").stack(ItemQuality::Regular, 5);
        let mut inv: Inventory = Inventory::with_slots(vec![Some(wood)], 1);
        list[0].settings_mut().autofill = false;
        list[1].settings_mut().autofill = false;

        assert_eq!(autofill(&mut list, &mut inv, SourceRef::Slot(0)), 0);
        assert!(list.iter_mut().all(|c| c.drain_events().is_empty()));
    }
}
