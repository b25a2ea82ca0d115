//! Invariant tests for void_bags
//!
//! These tests drive bags through long operation sequences and check the
//! properties that must hold after every step.

use std::collections::HashSet;
use void_bags::*;
use void_inventory::*;

const KINDS: [u32; 5] = [330, 388, 390, 709, 771];

fn material(id: u32, quality: ItemQuality, quantity: u32) -> ItemStack {
    ItemDefinition::new(id, format!("Material {}", id))
        .with_category(ItemCategory::Material)
        .with_price(id % 7 + 1)
        .stack(quality, quantity)
}

/// Small deterministic generator so failures reproduce
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: u32) -> u32 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        ((self.0 >> 33) % u64::from(bound)) as u32
    }
}

fn random_inventory(rng: &mut Lcg, slots: usize) -> Inventory {
    let entries = (0..slots)
        .map(|_| {
            if rng.next(4) == 0 {
                None
            } else {
                let id = KINDS[rng.next(KINDS.len() as u32) as usize];
                let quality = ItemQuality::ALL[rng.next(2) as usize];
                Some(material(id, quality, rng.next(400) + 1))
            }
        })
        .collect();
    Inventory::with_slots(entries, slots + 4)
}

fn catalog() -> ItemCatalog {
    let mut catalog = ItemCatalog::new();
    for id in KINDS {
        catalog.register(
            ItemDefinition::new(id, format!("Material {}", id))
                .with_category(ItemCategory::Material)
                .with_price(id % 7 + 1),
        );
    }
    catalog
}

fn total(inv: &Inventory, bag: &ItemBag, kind: &ItemKind) -> u64 {
    inv.total_quantity(kind) + u64::from(bag.quantity_of(kind))
}

fn assert_unique_kinds(bag: &ItemBag) {
    let kinds: HashSet<ItemKind> = bag.contents().iter().map(|s| s.kind).collect();
    assert_eq!(kinds.len(), bag.contents().len(), "duplicate kind in {:?}", bag.contents());
    assert!(bag.contents().iter().all(|s| !s.is_empty()));
}

fn run_sequence(mut bag: ItemBag, seed: u64, check: impl Fn(&ItemBag)) {
    let mut rng = Lcg(seed);
    let mut inv = random_inventory(&mut rng, 16);

    for _ in 0..300 {
        let slot = rng.next(inv.len() as u32) as usize;
        let quantity = rng.next(500);
        let Some(proto) = inv.stack(slot).cloned() else {
            continue;
        };
        let kind = proto.kind;
        let before = total(&inv, &bag, &kind);

        let moved = if rng.next(2) == 0 {
            let from_inv = inv.total_quantity(&kind);
            let moved = bag.move_in(&mut inv, SourceRef::Slot(slot), quantity);
            assert_eq!(inv.total_quantity(&kind), from_inv - u64::from(moved));
            moved
        } else {
            let in_bag = bag.quantity_of(&kind);
            let moved = bag.move_out(&proto, quantity, &mut inv);
            assert_eq!(bag.quantity_of(&kind), in_bag - moved);
            moved
        };

        assert!(moved <= quantity);
        assert_eq!(total(&inv, &bag, &kind), before, "quantity created or lost");
        check(&bag);
    }
}

/// INVARIANT: A bag holds one stack per kind
#[test]
fn invariant_one_stack_per_kind() {
    let config = BagConfig::default();
    for seed in 0..8 {
        let bag = ItemBag::fixed(&config, "construction_bag", ContainerSize::Medium).unwrap();
        run_sequence(bag, seed, assert_unique_kinds);
    }
}

/// INVARIANT: Slot-based bags never use more slots than they have
#[test]
fn invariant_slot_budget() {
    let config = BagConfig::default();
    for seed in 0..8 {
        let bag = ItemBag::rucksack(&config, ContainerSize::Small).unwrap();
        run_sequence(bag, seed, |bag| {
            assert_unique_kinds(bag);
            let quota = bag.policy().slot_quota().copied().unwrap();
            assert!(quota.fits(bag.contents()), "over budget: {:?}", bag.contents());
        });
    }
}

/// INVARIANT: Shrinking a rucksack trims it back into its slot budget
/// without losing items
#[test]
fn invariant_resize_trims_to_budget() {
    let config = BagConfig::default();
    let mut rng = Lcg(42);
    let mut bag = ItemBag::rucksack(&config, ContainerSize::Giant).unwrap();
    let mut inv = random_inventory(&mut rng, 24);
    for slot in 0..inv.len() {
        bag.move_in(&mut inv, SourceRef::Slot(slot), 400);
    }
    let held: u64 = bag.contents().iter().map(|s| u64::from(s.quantity())).sum();

    let mut target: Inventory = Inventory::new(200);
    bag.resize(ContainerSize::Small, &config, &mut target).unwrap();

    let quota = bag.policy().slot_quota().copied().unwrap();
    assert!(quota.fits(bag.contents()));
    let kept: u64 = bag.contents().iter().map(|s| u64::from(s.quantity())).sum();
    let returned: u64 = target.items().map(|(_, s)| u64::from(s.quantity())).sum();
    assert_eq!(kept + returned, held);
}

/// INVARIANT: Zero-quantity and absent-kind transfers change nothing
#[test]
fn invariant_noop_transfers() {
    let config = BagConfig::default();
    let mut bag = ItemBag::fixed(&config, "construction_bag", ContainerSize::Small).unwrap();
    let mut inv: Inventory = Inventory::with_slots(vec![Some(material(388, ItemQuality::Regular, 10))], 2);

    assert_eq!(bag.move_in(&mut inv, SourceRef::Slot(0), 0), 0);
    assert_eq!(bag.move_in(&mut inv, SourceRef::Slot(1), 5), 0);
    assert_eq!(bag.move_out(&material(390, ItemQuality::Regular, 0), 5, &mut inv), 0);

    assert!(bag.is_empty());
    assert!(bag.history().is_empty());
    assert_eq!(inv.stack(0).map(ItemStack::quantity), Some(10));
    assert_eq!(inv.used_slots(), 1);
    assert!(bag
        .drain_events()
        .iter()
        .all(|e| *e == BagEvent::Feedback(TransferCue::Failure)));
}

/// INVARIANT: The modification log never grows past its cap
#[test]
fn invariant_history_bounded() {
    let config = BagConfig::default();
    let mut bag = ItemBag::rucksack(&config, ContainerSize::Massive).unwrap();
    let entries = (0..20)
        .map(|id| Some(material(1_000 + id, ItemQuality::Regular, 1)))
        .collect();
    let mut inv = Inventory::with_slots(entries, 20);

    for slot in 0..20 {
        assert_eq!(bag.move_in(&mut inv, SourceRef::Slot(slot), 1), 1);
        assert!(bag.history().len() <= HISTORY_CAPACITY);
    }

    assert_eq!(bag.history().len(), HISTORY_CAPACITY);
    assert_eq!(bag.contents().len(), 20);
    assert_eq!(bag.history().rank(&ItemKind::new(1_019)), Some(HISTORY_CAPACITY - 1));
    assert_eq!(bag.history().rank(&ItemKind::new(1_000)), None);
}

/// INVARIANT: A snapshot round trip reproduces size, flags and contents
#[test]
fn invariant_snapshot_round_trip() {
    let config = BagConfig::default();
    let mut rng = Lcg(7);
    let mut bag = ItemBag::rucksack(&config, ContainerSize::Large)
        .unwrap()
        .with_settings(BagSettings::default().with_autofill(AutofillPriority::High));
    let mut inv = random_inventory(&mut rng, 16);
    for slot in 0..inv.len() {
        bag.move_in(&mut inv, SourceRef::Slot(slot), 250);
    }

    let catalog = catalog();
    let ctx = DecodeContext {
        config: &config,
        catalog: &catalog,
        requirements: std::sync::Arc::new(RequirementIndex::new()),
    };

    let bytes = {
        let mut index = SaveIndex::new();
        index.bags.insert(0, bag.snapshot());
        index.to_bytes().unwrap()
    };
    let index = SaveIndex::from_bytes(&bytes).unwrap();
    let restored = ItemBag::from_snapshot(index.get(0).unwrap(), &ctx).unwrap();

    assert_eq!(restored.size(), bag.size());
    assert_eq!(restored.settings(), bag.settings());
    let mut expected: Vec<(ItemKind, u32)> = bag.contents().iter().map(|s| (s.kind, s.quantity())).collect();
    let mut actual: Vec<(ItemKind, u32)> = restored.contents().iter().map(|s| (s.kind, s.quantity())).collect();
    expected.sort();
    actual.sort();
    assert_eq!(actual, expected);
}

/// INVARIANT: Loading never leaves a rucksack over its slot budget, and
/// whatever it sheds lands in the holding inventory
#[test]
fn invariant_load_respects_slot_budget() {
    let config = BagConfig::default();
    let catalog = catalog();
    let ctx = DecodeContext {
        config: &config,
        catalog: &catalog,
        requirements: std::sync::Arc::new(RequirementIndex::new()),
    };

    for seed in 0..8 {
        let mut rng = Lcg(seed);
        let mut snapshot = ItemBag::rucksack(&config, ContainerSize::Small)
            .unwrap()
            .snapshot();
        for id in KINDS {
            snapshot.contents.push(StackSnapshot {
                id,
                quality: ItemQuality::Regular,
                is_big: false,
                is_recipe: false,
                quantity: rng.next(200) + 1,
            });
        }
        let saved: u64 = snapshot.contents.iter().map(|s| u64::from(s.quantity)).sum();

        let mut index = SaveIndex::new();
        index.bags.insert(0, snapshot);
        let mut inv: Inventory<HostItem> =
            Inventory::with_slots(vec![Some(HostItem::from(placeholder(0, "rucksack")))], 40);

        let report = decode_inventory(&index, &mut inv, &ctx);
        assert!(report.is_complete(), "seed {}: {:?}", seed, report);

        let bag = inv
            .get(0)
            .and_then(HostItem::as_container)
            .and_then(Container::as_item)
            .unwrap();
        assert!(bag.fits_slot_budget(), "seed {}: {:?}", seed, bag.contents());
        let kept: u64 = bag.contents().iter().map(|s| u64::from(s.quantity())).sum();
        let shed: u64 = KINDS
            .iter()
            .map(|id| inv.total_quantity(&ItemKind::new(*id)))
            .sum();
        assert_eq!(kept + shed, saved);
    }
}
