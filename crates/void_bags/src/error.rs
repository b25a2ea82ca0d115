//! Bag errors

use crate::size::ContainerSize;
use thiserror::Error;
use void_inventory::ItemKind;

/// Bag system errors
#[derive(Debug, Error)]
pub enum BagError {
    /// Bag type cannot be built in this size
    #[error("Bag type {type_id} does not come in size {size}")]
    InvalidSize { type_id: String, size: ContainerSize },

    /// Parallel batch lists differ in length
    #[error("Batch length mismatch: {kinds} kinds, {quantities} quantities")]
    BatchLengthMismatch { kinds: usize, quantities: usize },

    /// Type id is not in the config
    #[error("Unknown bag type: {0}")]
    UnknownTypeId(String),

    /// Config has no constants for this size
    #[error("No size config for {type_id} at size {size}")]
    MissingSizeConfig { type_id: String, size: ContainerSize },

    /// Placeholder refers to an instance the save index does not have
    #[error("No saved bag with instance id {0}")]
    MissingInstance(u32),

    /// Saved stack of a kind the item catalog does not know
    #[error("Unknown item kind: {0}")]
    UnknownItem(ItemKind),

    /// Loaded bag breaks its slot or child rules and the holding inventory
    /// has no room for what it must shed
    #[error("No room to settle loaded {type_id}")]
    Unsettled { type_id: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

/// Result type for bag operations
pub type BagResult<T> = Result<T, BagError>;
