//! Outstanding requirements index
//!
//! Requirement-driven bags size themselves from what the host still needs
//! (unfinished bundles and the like). The host owns the index and updates it
//! as requirements are fulfilled; bags only read it.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use void_inventory::{ItemKind, ItemQuality};

/// One outstanding requirement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    /// Name of the group the requirement belongs to
    pub group: String,
    /// Catalog id of the required item
    pub id: u32,
    /// Required quality tier
    pub quality: ItemQuality,
    /// Quantity still needed
    pub quantity: u32,
}

impl Requirement {
    /// Create a requirement
    pub fn new(group: impl Into<String>, id: u32, quality: ItemQuality, quantity: u32) -> Self {
        Self {
            group: group.into(),
            id,
            quality,
            quantity,
        }
    }
}

/// Read access to outstanding requirements
pub trait RequirementSource: Send + Sync {
    /// All outstanding requirements for a catalog id
    fn requirements_for(&self, id: u32) -> Vec<Requirement>;

    /// Host state that voids every requirement
    fn requirements_voided(&self) -> bool;

    /// Total quantity still needed of exactly this id and quality
    fn outstanding(&self, id: u32, quality: ItemQuality) -> u32 {
        if self.requirements_voided() {
            return 0;
        }
        self.requirements_for(id)
            .iter()
            .filter(|r| r.quality == quality)
            .fold(0u32, |total, r| total.saturating_add(r.quantity))
    }

    /// Check if anything at all is needed of this id
    fn is_required(&self, id: u32) -> bool {
        !self.requirements_voided() && !self.requirements_for(id).is_empty()
    }
}

/// Host-maintained requirements index
#[derive(Debug, Default)]
pub struct RequirementIndex {
    requirements: RwLock<Vec<Requirement>>,
    voided: AtomicBool,
}

impl RequirementIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from a list of requirements
    pub fn with_requirements(requirements: Vec<Requirement>) -> Self {
        Self {
            requirements: RwLock::new(requirements),
            voided: AtomicBool::new(false),
        }
    }

    /// Add a requirement
    pub fn add(&self, requirement: Requirement) {
        self.requirements.write().push(requirement);
    }

    /// Replace every requirement
    pub fn replace(&self, requirements: Vec<Requirement>) {
        *self.requirements.write() = requirements;
    }

    /// Drop every requirement of a group (the group was completed)
    pub fn complete_group(&self, group: &str) {
        self.requirements.write().retain(|r| r.group != group);
    }

    /// Record that `quantity` of `kind` was delivered against its requirements
    pub fn fulfill(&self, kind: &ItemKind, mut quantity: u32) {
        let mut requirements = self.requirements.write();
        for requirement in requirements
            .iter_mut()
            .filter(|r| r.id == kind.id && r.quality == kind.quality)
        {
            let delivered = quantity.min(requirement.quantity);
            requirement.quantity -= delivered;
            quantity -= delivered;
            if quantity == 0 {
                break;
            }
        }
        requirements.retain(|r| r.quantity > 0);
    }

    /// Set the host state that voids every requirement
    pub fn set_voided(&self, voided: bool) {
        self.voided.store(voided, Ordering::Relaxed);
    }

    /// Number of outstanding requirements
    pub fn len(&self) -> usize {
        self.requirements.read().len()
    }

    /// Check if nothing is outstanding
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RequirementSource for RequirementIndex {
    fn requirements_for(&self, id: u32) -> Vec<Requirement> {
        self.requirements
            .read()
            .iter()
            .filter(|r| r.id == id && r.quantity > 0)
            .cloned()
            .collect()
    }

    fn requirements_voided(&self) -> bool {
        self.voided.load(Ordering::Relaxed)
    }
}
