//! Void Bags - Bounded Item Containers
//!
//! Bags store stacks of items outside the host inventory. Each bag keeps one
//! stack per item kind and caps how much of a kind it takes through a
//! capacity policy.
//!
//! # Features
//!
//! - Fixed-quota bags with a per-type whitelist
//! - Requirement-driven bags sized from outstanding requirements
//! - Slot-based bags (rucksacks) with slot accounting and trimming
//! - Composite bags holding one bag per type
//! - Partial move-in/move-out transfers with a host quantity cap check
//! - Snapshots, a save index and a placeholder codec for host saves
//! - Autofill ordering across bags
//!
//! # Example
//!
//! ```ignore
//! use void_bags::prelude::*;
//! use void_inventory::prelude::*;
//!
//! let config = BagConfig::default();
//! let mut bag = ItemBag::fixed(&config, "construction_bag", ContainerSize::Small)?;
//!
//! let wood = ItemDefinition::new(388, "Wood").with_price(2);
//! let mut inventory: Inventory = Inventory::new(36);
//! inventory.place_in_empty_slot(wood.stack(ItemQuality::Regular, 50));
//!
//! let moved = bag.move_in(&mut inventory, SourceRef::Slot(0), 50);
//! assert_eq!(moved, 30);
//! ```

pub mod autofill;
pub mod bag;
pub mod config;
pub mod container;
pub mod error;
pub mod events;
pub mod history;
pub mod omni;
pub mod policy;
pub mod requirements;
pub mod settings;
pub mod size;
pub mod snapshot;

pub mod prelude {
    pub use crate::autofill::{autofill, autofill_order, autofill_tier, AutofillTarget};
    pub use crate::bag::{is_storable, ItemBag, VALUE_MULTIPLIER};
    pub use crate::config::{
        load_config, parse_config, AcceptedItem, BagConfig, BagVariant, ConfigError,
        ConfigResult, FixedBagType, RequirementBagType, SizeProfile,
    };
    pub use crate::container::{Container, HostItem};
    pub use crate::error::{BagError, BagResult};
    pub use crate::events::{BagEvent, TransferCue};
    pub use crate::history::{ModificationLog, HISTORY_CAPACITY};
    pub use crate::omni::OmniBag;
    pub use crate::policy::{CapacityPolicy, CapacityRule, FixedQuota, RequirementQuota, SlotQuota};
    pub use crate::requirements::{Requirement, RequirementIndex, RequirementSource};
    pub use crate::settings::{
        AutofillPriority, BagSettings, IconOverride, SortOrder, SortProperty,
    };
    pub use crate::size::ContainerSize;
    pub use crate::snapshot::{
        decode_inventory, placeholder, placeholder_instance, BagEncoder, BagSnapshot,
        DecodeContext, DecodeReport, SaveIndex, StackSnapshot, MAX_INSTANCES,
        PLACEHOLDER_ID_OFFSET,
    };
}

pub use prelude::*;
