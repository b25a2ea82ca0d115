//! Item catalog
//!
//! Definitions keyed by catalog id. Used to rebuild full stacks from the
//! bare kind + quantity pairs stored in save data.

use crate::item::{ItemDefinition, ItemKind, ItemStack};
use std::collections::HashMap;

/// Registry of item definitions
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    definitions: HashMap<u32, ItemDefinition>,
    big_definitions: HashMap<u32, ItemDefinition>,
}

impl ItemCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition, replacing any previous one with the same id
    pub fn register(&mut self, definition: ItemDefinition) {
        let table = if definition.is_big {
            &mut self.big_definitions
        } else {
            &mut self.definitions
        };
        table.insert(definition.id, definition);
    }

    /// Builder form of [`register`](Self::register)
    pub fn with(mut self, definition: ItemDefinition) -> Self {
        self.register(definition);
        self
    }

    /// Look up a regular object definition
    pub fn get(&self, id: u32) -> Option<&ItemDefinition> {
        self.definitions.get(&id)
    }

    /// Look up a definition for a kind (big craftables live in their own id space)
    pub fn definition_for(&self, kind: &ItemKind) -> Option<&ItemDefinition> {
        if kind.is_big {
            self.big_definitions.get(&kind.id)
        } else {
            self.definitions.get(&kind.id)
        }
    }

    /// Number of registered definitions
    pub fn len(&self) -> usize {
        self.definitions.len() + self.big_definitions.len()
    }

    /// Check if the catalog has no definitions
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build a stack for `kind` with the given quantity
    pub fn create_stack(&self, kind: &ItemKind, quantity: u32) -> Option<ItemStack> {
        let definition = self.definition_for(kind)?;
        let mut stack = definition.stack(kind.quality, 0);
        stack.kind = *kind;
        stack.set_quantity(quantity);
        Some(stack)
    }
}
