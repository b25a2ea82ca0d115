//! Bag snapshots and the placeholder codec
//!
//! Hosts that can only save plain items swap every bag for a placeholder
//! stack before saving and swap it back after loading. The placeholder's
//! catalog id is [`PLACEHOLDER_ID_OFFSET`] plus the bag's instance id; the
//! bag itself is saved as a [`BagSnapshot`] in a [`SaveIndex`].

use crate::bag::ItemBag;
use crate::config::{BagConfig, BagVariant};
use crate::container::{Container, HostItem};
use crate::error::{BagError, BagResult};
use crate::omni::OmniBag;
use crate::requirements::RequirementSource;
use crate::settings::{BagSettings, IconOverride};
use crate::size::ContainerSize;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use void_inventory::{
    Inventory, ItemCatalog, ItemKind, ItemQuality, ItemStack, SlotItem, SourceRef,
};

/// Catalog id of the placeholder for instance 0
pub const PLACEHOLDER_ID_OFFSET: u32 = 1_000_000;

/// Number of instance ids one save can hold
pub const MAX_INSTANCES: u32 = 1_000_000;

/// Instance id encoded in a placeholder kind
pub fn placeholder_instance(kind: &ItemKind) -> Option<u32> {
    if kind.is_big || kind.is_recipe {
        return None;
    }
    kind.id
        .checked_sub(PLACEHOLDER_ID_OFFSET)
        .filter(|id| *id < MAX_INSTANCES)
}

/// Placeholder stack standing in for instance `instance`
pub fn placeholder(instance: u32, type_id: &str) -> ItemStack {
    ItemStack::new(
        ItemKind::new(PLACEHOLDER_ID_OFFSET + instance),
        format!("{} #{}", type_id, instance),
        1,
    )
    .with_max_stack(1)
}

/// One saved stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackSnapshot {
    pub id: u32,
    pub quality: ItemQuality,
    pub is_big: bool,
    pub is_recipe: bool,
    pub quantity: u32,
}

impl StackSnapshot {
    /// Equivalence key of the saved stack
    pub fn kind(&self) -> ItemKind {
        ItemKind {
            id: self.id,
            quality: self.quality,
            is_big: self.is_big,
            is_recipe: self.is_recipe,
        }
    }
}

impl From<&ItemStack> for StackSnapshot {
    fn from(stack: &ItemStack) -> Self {
        Self {
            id: stack.kind.id,
            quality: stack.kind.quality,
            is_big: stack.kind.is_big,
            is_recipe: stack.kind.is_recipe,
            quantity: stack.quantity(),
        }
    }
}

/// Saved state of one bag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BagSnapshot {
    pub type_id: String,
    pub size: ContainerSize,
    #[serde(default)]
    pub settings: BagSettings,
    #[serde(default)]
    pub contents: Vec<StackSnapshot>,
    #[serde(default)]
    pub icon: Option<IconOverride>,
    /// Child bags of a composite
    #[serde(default)]
    pub children: Vec<BagSnapshot>,
}

/// What decoding needs from the host
pub struct DecodeContext<'a> {
    pub config: &'a BagConfig,
    pub catalog: &'a ItemCatalog,
    /// Index read by requirement-driven bags
    pub requirements: Arc<dyn RequirementSource>,
}

impl ItemBag {
    /// Saved state of this bag
    pub fn snapshot(&self) -> BagSnapshot {
        BagSnapshot {
            type_id: self.type_id().to_string(),
            size: self.size(),
            settings: *self.settings(),
            contents: self.contents().iter().map(StackSnapshot::from).collect(),
            icon: self.icon(),
            children: Vec::new(),
        }
    }

    /// Rebuild a bag from its saved state.
    ///
    /// Contents come back exactly as saved. [`decode_inventory`] settles the
    /// result into an inventory. Fails with [`BagError::UnknownItem`] when a
    /// saved stack's kind is not in the catalog.
    pub fn from_snapshot(snapshot: &BagSnapshot, ctx: &DecodeContext<'_>) -> BagResult<Self> {
        let config = ctx.config;
        let variant = config
            .variant_of(&snapshot.type_id)
            .ok_or_else(|| BagError::UnknownTypeId(snapshot.type_id.clone()))?;
        let mut bag = match variant {
            BagVariant::FixedQuota => ItemBag::fixed(config, &snapshot.type_id, snapshot.size)?,
            BagVariant::Requirements => {
                ItemBag::requirements(config, snapshot.size, ctx.requirements.clone())?
            }
            BagVariant::Slots => ItemBag::rucksack(config, snapshot.size)?,
            BagVariant::Omni => return Err(BagError::UnknownTypeId(snapshot.type_id.clone())),
        };

        *bag.settings_mut() = snapshot.settings;
        bag.set_icon(snapshot.icon);
        for saved in &snapshot.contents {
            if saved.quantity == 0 {
                continue;
            }
            let stack = ctx
                .catalog
                .create_stack(&saved.kind(), saved.quantity)
                .ok_or(BagError::UnknownItem(saved.kind()))?;
            bag.restore_stack(stack);
        }
        Ok(bag)
    }
}

impl OmniBag {
    /// Saved state of the composite and its children
    pub fn snapshot(&self) -> BagSnapshot {
        BagSnapshot {
            type_id: self.type_id().to_string(),
            size: self.size(),
            settings: *self.settings(),
            contents: Vec::new(),
            icon: self.icon(),
            children: self.children().iter().map(ItemBag::snapshot).collect(),
        }
    }

    /// Rebuild a composite. Nested composites are dropped.
    ///
    /// Other children come back as saved, duplicates and oversized ones
    /// included, until the composite is pruned.
    pub fn from_snapshot(snapshot: &BagSnapshot, ctx: &DecodeContext<'_>) -> BagResult<Self> {
        let mut omni = OmniBag::new(ctx.config, snapshot.size)?;
        *omni.settings_mut() = snapshot.settings;
        omni.set_icon(snapshot.icon);
        for child in &snapshot.children {
            if ctx.config.variant_of(&child.type_id) == Some(BagVariant::Omni) {
                log::warn!(
                    "Dropped nested {} from {}",
                    child.type_id,
                    snapshot.type_id
                );
                continue;
            }
            omni.restore_child(ItemBag::from_snapshot(child, ctx)?);
        }
        Ok(omni)
    }
}

impl Container {
    /// Saved state of this container
    pub fn snapshot(&self) -> BagSnapshot {
        match self {
            Self::Item(bag) => bag.snapshot(),
            Self::Omni(bag) => bag.snapshot(),
        }
    }

    /// Rebuild a container of whatever variant the type id names
    pub fn from_snapshot(snapshot: &BagSnapshot, ctx: &DecodeContext<'_>) -> BagResult<Self> {
        match ctx.config.variant_of(&snapshot.type_id) {
            Some(BagVariant::Omni) => OmniBag::from_snapshot(snapshot, ctx).map(Self::Omni),
            Some(_) => ItemBag::from_snapshot(snapshot, ctx).map(Self::Item),
            None => Err(BagError::UnknownTypeId(snapshot.type_id.clone())),
        }
    }
}

/// Saved bags keyed by instance id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveIndex {
    pub bags: BTreeMap<u32, BagSnapshot>,
}

impl SaveIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of saved bags
    pub fn len(&self) -> usize {
        self.bags.len()
    }

    /// Check if nothing is saved
    pub fn is_empty(&self) -> bool {
        self.bags.is_empty()
    }

    /// Snapshot for an instance id
    pub fn get(&self, instance: u32) -> BagResult<&BagSnapshot> {
        self.bags
            .get(&instance)
            .ok_or(BagError::MissingInstance(instance))
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> BagResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| BagError::Serialization(e.to_string()))
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> BagResult<Self> {
        serde_json::from_str(json).map_err(|e| BagError::Deserialization(e.to_string()))
    }

    /// Serialize to bytes
    pub fn to_bytes(&self) -> BagResult<Vec<u8>> {
        bincode::serialize(self).map_err(|e| BagError::Serialization(e.to_string()))
    }

    /// Deserialize from bytes
    pub fn from_bytes(bytes: &[u8]) -> BagResult<Self> {
        bincode::deserialize(bytes).map_err(|e| BagError::Deserialization(e.to_string()))
    }
}

/// Replaces bags with placeholders and collects their snapshots
#[derive(Debug, Default)]
pub struct BagEncoder {
    next_instance: u32,
    index: SaveIndex,
}

impl BagEncoder {
    /// Create an encoder with an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode every bag in `inventory`, held stack included.
    ///
    /// Returns the number of bags replaced.
    pub fn encode(&mut self, inventory: &mut Inventory<HostItem>) -> BagResult<usize> {
        let mut refs: Vec<SourceRef> = inventory
            .items()
            .filter(|(_, entry)| entry.as_container().is_some())
            .map(|(slot, _)| SourceRef::Slot(slot))
            .collect();
        if inventory.held().and_then(HostItem::as_container).is_some() {
            refs.push(SourceRef::Held);
        }

        for source in &refs {
            let Some(entry) = inventory.entry_mut(*source) else {
                continue;
            };
            let instance = self.next_instance;
            if instance >= MAX_INSTANCES {
                return Err(BagError::Serialization(format!(
                    "More than {} bags in one save",
                    MAX_INSTANCES
                )));
            }
            let Some(container) = entry.as_container() else {
                continue;
            };
            let snapshot = container.snapshot();
            *entry = HostItem::Stack(placeholder(instance, &snapshot.type_id));
            self.index.bags.insert(instance, snapshot);
            self.next_instance += 1;
        }

        if !refs.is_empty() {
            log::info!("Encoded {} bags", refs.len());
        }
        Ok(refs.len())
    }

    /// Finish encoding and take the index
    pub fn finish(self) -> SaveIndex {
        self.index
    }
}

/// Outcome of [`decode_inventory`]
#[derive(Debug, Default)]
pub struct DecodeReport {
    /// Instance ids rebuilt into bags
    pub restored: Vec<u32>,
    /// Placeholders left in place, with the reason
    pub unresolved: Vec<(u32, BagError)>,
}

impl DecodeReport {
    /// Check if every placeholder was rebuilt
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Swap placeholders in `inventory` back for the bags they stand for.
///
/// Each rebuilt bag is pruned into `inventory` before it takes its
/// placeholder's place, so slot budgets and child rules hold after loading.
/// Placeholders that cannot be rebuilt or settled stay in place and `index`
/// is left untouched, so a later attempt can retry.
pub fn decode_inventory(
    index: &SaveIndex,
    inventory: &mut Inventory<HostItem>,
    ctx: &DecodeContext<'_>,
) -> DecodeReport {
    let mut refs: Vec<(SourceRef, u32)> = inventory
        .items()
        .filter_map(|(slot, entry)| {
            let stack = entry.as_stack()?;
            placeholder_instance(&stack.kind).map(|id| (SourceRef::Slot(slot), id))
        })
        .collect();
    if let Some(id) = inventory
        .held()
        .and_then(|entry| entry.as_stack())
        .and_then(|stack| placeholder_instance(&stack.kind))
    {
        refs.push((SourceRef::Held, id));
    }

    let mut report = DecodeReport::default();
    for (source, instance) in refs {
        let rebuilt = index
            .get(instance)
            .and_then(|snapshot| Container::from_snapshot(snapshot, ctx))
            .and_then(|container| settle(container, inventory));
        match rebuilt {
            Ok((container, mut staged)) => {
                if let Some(entry) = staged.entry_mut(source) {
                    *entry = HostItem::bag(container);
                    *inventory = staged;
                    report.restored.push(instance);
                }
            }
            Err(err) => {
                log::warn!("Left placeholder for bag {} undecoded: {}", instance, err);
                report.unresolved.push((instance, err));
            }
        }
    }

    if !report.restored.is_empty() {
        log::info!("Decoded {} bags", report.restored.len());
    }
    report
}

/// Prune a rebuilt container into a copy of `inventory`.
///
/// The copy comes back only when the container ends up within its limits,
/// so a container that cannot shed enough leaves `inventory` untouched.
fn settle(
    mut container: Container,
    inventory: &Inventory<HostItem>,
) -> BagResult<(Container, Inventory<HostItem>)> {
    let mut staged = inventory.clone();
    if container.prune_invalid(&mut staged) {
        log::debug!("Pruned loaded {} into the inventory", container.type_id());
    }
    if !container.is_within_limits() {
        return Err(BagError::Unsettled {
            type_id: container.type_id().to_string(),
        });
    }
    Ok((container, staged))
}
