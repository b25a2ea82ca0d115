//! Bag configuration - TOML to BagConfig conversion
//!
//! Size-dependent constants and the catalogue of bag types. The config is
//! read once at startup and shared read-only afterwards.
//!
//! # Config Format
//!
//! ```toml
//! slot_bag_type = "rucksack"
//! omni_bag_type = "omni_bag"
//!
//! [sizes.Small]
//! slots = 6
//! stack_ceiling = 30
//! quota = 30
//! price = 2000
//!
//! [requirement_bag]
//! type_id = "bundle_bag"
//! sizes = ["Large", "Massive"]
//!
//! [[fixed_bags]]
//! type_id = "seed_bag"
//! name = "Seed Bag"
//!
//! [[fixed_bags.items]]
//! id = 472
//! qualities = ["Regular", "Gold"]
//! ```

use crate::size::ContainerSize;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use void_inventory::{ItemKind, ItemQuality};

/// Errors from config parsing
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid size: {0}")]
    InvalidSize(String),

    #[error("Invalid quality: {0}")]
    InvalidQuality(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Which capacity rule a bag type uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BagVariant {
    /// Constant per-kind quota over a whitelist
    FixedQuota,
    /// Capacity taken from outstanding requirements
    Requirements,
    /// Slot count times per-kind stack ceiling
    Slots,
    /// Holds other bags
    Omni,
}

/// Constants for one size class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeProfile {
    /// Slot count of slot-based bags
    pub slots: u32,
    /// Per-kind stack ceiling of slot-based bags
    pub stack_ceiling: u32,
    /// Per-kind quota of fixed-quota bags
    pub quota: u32,
    /// Purchase price of a bag of this size
    pub price: u32,
}

/// Whitelist entry of a fixed-quota bag type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedItem {
    /// Catalog id
    pub id: u32,
    /// Whether the id refers to a big craftable
    pub is_big: bool,
    /// Accepted qualities (empty = any)
    pub qualities: Vec<ItemQuality>,
    /// Accept the item even though it does not stack
    pub allow_non_stackable: bool,
}

impl AcceptedItem {
    /// Any-quality entry for a regular object
    pub fn new(id: u32) -> Self {
        Self {
            id,
            is_big: false,
            qualities: Vec::new(),
            allow_non_stackable: false,
        }
    }

    /// Check if a kind is covered by this entry
    pub fn matches(&self, kind: &ItemKind) -> bool {
        self.id == kind.id
            && self.is_big == kind.is_big
            && !kind.is_recipe
            && (self.qualities.is_empty() || self.qualities.contains(&kind.quality))
    }
}

/// A fixed-quota bag type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedBagType {
    /// Stable type identifier
    pub type_id: String,
    /// Display name
    pub name: String,
    /// Sizes this type can be constructed in
    pub sizes: Vec<ContainerSize>,
    /// Accepted items
    pub items: Vec<AcceptedItem>,
}

impl FixedBagType {
    /// Whitelist entry covering `kind`
    pub fn accepted(&self, kind: &ItemKind) -> Option<&AcceptedItem> {
        self.items.iter().find(|item| item.matches(kind))
    }
}

/// The requirement-driven bag type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementBagType {
    /// Stable type identifier
    pub type_id: String,
    /// Sizes this type can be constructed in
    pub sizes: Vec<ContainerSize>,
}

/// Complete bag configuration
#[derive(Debug, Clone)]
pub struct BagConfig {
    sizes: BTreeMap<ContainerSize, SizeProfile>,
    fixed_bags: Vec<Arc<FixedBagType>>,
    requirement_bag: RequirementBagType,
    slot_bag_type: String,
    omni_bag_type: String,
}

impl BagConfig {
    /// Constants for a size class
    pub fn size_profile(&self, size: ContainerSize) -> Option<&SizeProfile> {
        self.sizes.get(&size)
    }

    /// Fixed-quota bag type by id
    pub fn fixed_bag(&self, type_id: &str) -> Option<&Arc<FixedBagType>> {
        self.fixed_bags.iter().find(|bag| bag.type_id == type_id)
    }

    /// All fixed-quota bag types
    pub fn fixed_bags(&self) -> &[Arc<FixedBagType>] {
        &self.fixed_bags
    }

    /// The requirement-driven bag type
    pub fn requirement_bag(&self) -> &RequirementBagType {
        &self.requirement_bag
    }

    /// Type id of slot-based bags
    pub fn slot_bag_type(&self) -> &str {
        &self.slot_bag_type
    }

    /// Type id of composite bags
    pub fn omni_bag_type(&self) -> &str {
        &self.omni_bag_type
    }

    /// Resolve a type id to its variant
    pub fn variant_of(&self, type_id: &str) -> Option<BagVariant> {
        if type_id == self.slot_bag_type {
            Some(BagVariant::Slots)
        } else if type_id == self.omni_bag_type {
            Some(BagVariant::Omni)
        } else if type_id == self.requirement_bag.type_id {
            Some(BagVariant::Requirements)
        } else if self.fixed_bag(type_id).is_some() {
            Some(BagVariant::FixedQuota)
        } else {
            None
        }
    }

    /// Replace the constants of one size class
    pub fn with_size_profile(mut self, size: ContainerSize, profile: SizeProfile) -> Self {
        self.sizes.insert(size, profile);
        self
    }

    /// Add or replace a fixed-quota bag type
    pub fn with_fixed_bag(mut self, bag: FixedBagType) -> Self {
        self.fixed_bags.retain(|existing| existing.type_id != bag.type_id);
        self.fixed_bags.push(Arc::new(bag));
        self
    }

    fn validate(&self) -> ConfigResult<()> {
        let mut seen = HashSet::new();
        let ids = [
            self.slot_bag_type.as_str(),
            self.omni_bag_type.as_str(),
            self.requirement_bag.type_id.as_str(),
        ]
        .into_iter()
        .chain(self.fixed_bags.iter().map(|bag| bag.type_id.as_str()));
        for id in ids {
            if id.is_empty() {
                return Err(ConfigError::Validation("empty bag type id".into()));
            }
            if !seen.insert(id) {
                return Err(ConfigError::Validation(format!(
                    "duplicate bag type id: {}",
                    id
                )));
            }
        }

        for (size, profile) in &self.sizes {
            if profile.stack_ceiling == 0 {
                return Err(ConfigError::Validation(format!(
                    "stack_ceiling of {} must be positive",
                    size
                )));
            }
        }

        Ok(())
    }
}

impl Default for BagConfig {
    fn default() -> Self {
        let profile = |slots, stack_ceiling, quota, price| SizeProfile {
            slots,
            stack_ceiling,
            quota,
            price,
        };
        let sizes = BTreeMap::from([
            (ContainerSize::Small, profile(6, 30, 30, 2_000)),
            (ContainerSize::Medium, profile(12, 99, 99, 5_000)),
            (ContainerSize::Large, profile(24, 300, 300, 20_000)),
            (ContainerSize::Giant, profile(36, 999, 999, 50_000)),
            (ContainerSize::Massive, profile(72, 9_999, 9_999, 100_000)),
        ]);

        let whitelist = |ids: &[u32]| ids.iter().copied().map(AcceptedItem::new).collect();
        let fixed_bags = vec![
            Arc::new(FixedBagType {
                type_id: "seed_bag".into(),
                name: "Seed Bag".into(),
                sizes: ContainerSize::ALL.to_vec(),
                items: whitelist(&[472, 473, 474, 475, 476, 477, 478, 479, 480, 481, 482, 483]),
            }),
            Arc::new(FixedBagType {
                type_id: "ore_bag".into(),
                name: "Ore Bag".into(),
                sizes: ContainerSize::ALL.to_vec(),
                items: whitelist(&[378, 380, 382, 384, 386, 909]),
            }),
            Arc::new(FixedBagType {
                type_id: "construction_bag".into(),
                name: "Construction Bag".into(),
                sizes: ContainerSize::ALL.to_vec(),
                items: whitelist(&[330, 388, 390, 709, 771]),
            }),
        ];

        Self {
            sizes,
            fixed_bags,
            requirement_bag: RequirementBagType {
                type_id: "bundle_bag".into(),
                sizes: vec![ContainerSize::Large, ContainerSize::Massive],
            },
            slot_bag_type: "rucksack".into(),
            omni_bag_type: "omni_bag".into(),
        }
    }
}

/// Raw TOML structure for one size class
#[derive(Debug, Deserialize)]
struct SizeToml {
    slots: u32,
    stack_ceiling: u32,
    quota: u32,
    #[serde(default)]
    price: u32,
}

/// Raw TOML structure for a whitelist entry
#[derive(Debug, Deserialize)]
struct AcceptedItemToml {
    id: u32,
    #[serde(default)]
    is_big: bool,
    #[serde(default)]
    qualities: Vec<String>,
    #[serde(default)]
    allow_non_stackable: bool,
}

/// Raw TOML structure for a fixed-quota bag type
#[derive(Debug, Deserialize)]
struct FixedBagToml {
    type_id: String,
    name: Option<String>,
    #[serde(default)]
    sizes: Vec<String>,
    #[serde(default)]
    items: Vec<AcceptedItemToml>,
}

/// Raw TOML structure for the requirement-driven bag
#[derive(Debug, Deserialize)]
struct RequirementBagToml {
    type_id: String,
    #[serde(default)]
    sizes: Vec<String>,
}

/// Root TOML structure
#[derive(Debug, Deserialize)]
struct BagConfigToml {
    slot_bag_type: String,
    omni_bag_type: String,
    #[serde(default)]
    sizes: BTreeMap<String, SizeToml>,
    requirement_bag: RequirementBagToml,
    #[serde(default)]
    fixed_bags: Vec<FixedBagToml>,
}

fn parse_size(s: &str) -> ConfigResult<ContainerSize> {
    s.parse().map_err(|_| ConfigError::InvalidSize(s.to_string()))
}

/// Empty list means every size
fn parse_sizes(raw: &[String]) -> ConfigResult<Vec<ContainerSize>> {
    if raw.is_empty() {
        return Ok(ContainerSize::ALL.to_vec());
    }
    raw.iter().map(|s| parse_size(s)).collect()
}

fn parse_quality(s: &str) -> ConfigResult<ItemQuality> {
    match s.to_lowercase().as_str() {
        "regular" => Ok(ItemQuality::Regular),
        "silver" => Ok(ItemQuality::Silver),
        "gold" => Ok(ItemQuality::Gold),
        "iridium" => Ok(ItemQuality::Iridium),
        _ => Err(ConfigError::InvalidQuality(s.to_string())),
    }
}

/// Parse a bag config from TOML string
pub fn parse_config(content: &str) -> ConfigResult<BagConfig> {
    let raw: BagConfigToml = toml::from_str(content)?;

    let sizes = raw
        .sizes
        .iter()
        .map(|(name, s)| {
            Ok((
                parse_size(name)?,
                SizeProfile {
                    slots: s.slots,
                    stack_ceiling: s.stack_ceiling,
                    quota: s.quota,
                    price: s.price,
                },
            ))
        })
        .collect::<ConfigResult<BTreeMap<_, _>>>()?;

    let fixed_bags = raw
        .fixed_bags
        .iter()
        .map(|bag| {
            let items = bag
                .items
                .iter()
                .map(|item| {
                    Ok(AcceptedItem {
                        id: item.id,
                        is_big: item.is_big,
                        qualities: item
                            .qualities
                            .iter()
                            .map(|q| parse_quality(q))
                            .collect::<ConfigResult<Vec<_>>>()?,
                        allow_non_stackable: item.allow_non_stackable,
                    })
                })
                .collect::<ConfigResult<Vec<_>>>()?;
            Ok(Arc::new(FixedBagType {
                type_id: bag.type_id.clone(),
                name: bag.name.clone().unwrap_or_else(|| bag.type_id.clone()),
                sizes: parse_sizes(&bag.sizes)?,
                items,
            }))
        })
        .collect::<ConfigResult<Vec<_>>>()?;

    let config = BagConfig {
        sizes,
        fixed_bags,
        requirement_bag: RequirementBagType {
            type_id: raw.requirement_bag.type_id,
            sizes: parse_sizes(&raw.requirement_bag.sizes)?,
        },
        slot_bag_type: raw.slot_bag_type,
        omni_bag_type: raw.omni_bag_type,
    };
    config.validate()?;
    Ok(config)
}

/// Load and parse a bag config from a file
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<BagConfig> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}
