//! Containers and host inventory entries

use crate::bag::ItemBag;
use crate::config::BagVariant;
use crate::events::BagEvent;
use crate::omni::OmniBag;
use crate::settings::{BagSettings, IconOverride};
use crate::size::ContainerSize;
use void_inventory::{Inventory, ItemStack, SlotItem, SourceRef};

/// Any bag: a stack-holding bag or a composite of bags
#[derive(Debug, Clone)]
pub enum Container {
    Item(ItemBag),
    Omni(OmniBag),
}

impl Container {
    /// Stable type identifier
    pub fn type_id(&self) -> &str {
        match self {
            Self::Item(bag) => bag.type_id(),
            Self::Omni(bag) => bag.type_id(),
        }
    }

    /// Size class
    pub fn size(&self) -> ContainerSize {
        match self {
            Self::Item(bag) => bag.size(),
            Self::Omni(bag) => bag.size(),
        }
    }

    /// Variant tag
    pub fn variant(&self) -> BagVariant {
        match self {
            Self::Item(bag) => bag.variant(),
            Self::Omni(_) => BagVariant::Omni,
        }
    }

    /// Behaviour flags
    pub fn settings(&self) -> &BagSettings {
        match self {
            Self::Item(bag) => bag.settings(),
            Self::Omni(bag) => bag.settings(),
        }
    }

    /// Mutable behaviour flags
    pub fn settings_mut(&mut self) -> &mut BagSettings {
        match self {
            Self::Item(bag) => bag.settings_mut(),
            Self::Omni(bag) => bag.settings_mut(),
        }
    }

    /// Icon override
    pub fn icon(&self) -> Option<IconOverride> {
        match self {
            Self::Item(bag) => bag.icon(),
            Self::Omni(bag) => bag.icon(),
        }
    }

    /// Check if the container holds nothing
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Item(bag) => bag.is_empty(),
            Self::Omni(bag) => bag.is_empty(),
        }
    }

    /// Value of the contents, or the purchase price when empty
    pub fn total_value(&self) -> u64 {
        match self {
            Self::Item(bag) => bag.total_value(),
            Self::Omni(bag) => bag.total_value(),
        }
    }

    /// Move up to `quantity` of the stack at `origin` into the container
    pub fn move_in<E: SlotItem>(
        &mut self,
        source: &mut Inventory<E>,
        origin: SourceRef,
        quantity: u32,
    ) -> u32 {
        match self {
            Self::Item(bag) => bag.move_in(source, origin, quantity),
            Self::Omni(bag) => bag.move_in(source, origin, quantity),
        }
    }

    /// Evict whatever the container may no longer hold into `target`
    pub fn prune_invalid(&mut self, target: &mut Inventory<HostItem>) -> bool {
        match self {
            Self::Item(bag) => bag.prune_invalid(target),
            Self::Omni(bag) => bag.prune_invalid(target),
        }
    }

    /// Check if the slot budget and child rules hold
    pub fn is_within_limits(&self) -> bool {
        match self {
            Self::Item(bag) => bag.fits_slot_budget(),
            Self::Omni(bag) => {
                bag.has_valid_children() && bag.children().iter().all(ItemBag::fits_slot_budget)
            }
        }
    }

    /// Take the pending events
    pub fn drain_events(&mut self) -> Vec<BagEvent> {
        match self {
            Self::Item(bag) => bag.drain_events(),
            Self::Omni(bag) => bag.drain_events(),
        }
    }

    /// The stack-holding bag, if this is one
    pub fn as_item(&self) -> Option<&ItemBag> {
        match self {
            Self::Item(bag) => Some(bag),
            Self::Omni(_) => None,
        }
    }

    /// Mutable form of [`as_item`](Self::as_item)
    pub fn as_item_mut(&mut self) -> Option<&mut ItemBag> {
        match self {
            Self::Item(bag) => Some(bag),
            Self::Omni(_) => None,
        }
    }

    /// The composite, if this is one
    pub fn as_omni(&self) -> Option<&OmniBag> {
        match self {
            Self::Omni(bag) => Some(bag),
            Self::Item(_) => None,
        }
    }

    /// Mutable form of [`as_omni`](Self::as_omni)
    pub fn as_omni_mut(&mut self) -> Option<&mut OmniBag> {
        match self {
            Self::Omni(bag) => Some(bag),
            Self::Item(_) => None,
        }
    }
}

impl From<ItemBag> for Container {
    fn from(bag: ItemBag) -> Self {
        Self::Item(bag)
    }
}

impl From<OmniBag> for Container {
    fn from(bag: OmniBag) -> Self {
        Self::Omni(bag)
    }
}

/// Entry of a host inventory that may hold bags
#[derive(Debug, Clone)]
pub enum HostItem {
    Stack(ItemStack),
    Bag(Box<Container>),
}

impl HostItem {
    /// Wrap a container
    pub fn bag(container: impl Into<Container>) -> Self {
        Self::Bag(Box::new(container.into()))
    }

    /// Container view of this entry
    pub fn as_container(&self) -> Option<&Container> {
        match self {
            Self::Bag(container) => Some(container),
            Self::Stack(_) => None,
        }
    }

    /// Mutable container view of this entry
    pub fn as_container_mut(&mut self) -> Option<&mut Container> {
        match self {
            Self::Bag(container) => Some(container),
            Self::Stack(_) => None,
        }
    }
}

impl SlotItem for HostItem {
    fn as_stack(&self) -> Option<&ItemStack> {
        match self {
            Self::Stack(stack) => Some(stack),
            Self::Bag(_) => None,
        }
    }

    fn as_stack_mut(&mut self) -> Option<&mut ItemStack> {
        match self {
            Self::Stack(stack) => Some(stack),
            Self::Bag(_) => None,
        }
    }

    fn from_stack(stack: ItemStack) -> Self {
        Self::Stack(stack)
    }
}

impl From<ItemStack> for HostItem {
    fn from(stack: ItemStack) -> Self {
        Self::Stack(stack)
    }
}
