//! Per-bag behaviour flags

use serde::{Deserialize, Serialize};

/// Whether a slot-based bag is tried early or late by autofill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AutofillPriority {
    #[default]
    Low,
    High,
}

/// Property the bag view sorts its contents by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortProperty {
    /// Most recent modification
    #[default]
    Time,
    Name,
    Id,
    Quality,
    Quantity,
    Price,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Behaviour flags stored with a bag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BagSettings {
    /// Picked-up items are routed into this bag
    pub autofill: bool,
    /// Autofill tier for slot-based bags
    pub autofill_priority: AutofillPriority,
    /// Sort property
    pub sort_property: SortProperty,
    /// Sort direction
    pub sort_order: SortOrder,
}

impl BagSettings {
    /// Enable autofill at the given priority
    pub fn with_autofill(mut self, priority: AutofillPriority) -> Self {
        self.autofill = true;
        self.autofill_priority = priority;
        self
    }

    /// Set sorting
    pub fn with_sort(mut self, property: SortProperty, order: SortOrder) -> Self {
        self.sort_property = property;
        self.sort_order = order;
        self
    }
}

/// Icon shown instead of the bag's default texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IconOverride {
    /// Catalog id of the item whose icon is used
    pub item_id: u32,
    /// Whether the id refers to a big craftable
    pub is_big: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = BagSettings::default();

        assert!(!settings.autofill);
        assert_eq!(settings.autofill_priority, AutofillPriority::Low);
        assert_eq!(settings.sort_property, SortProperty::Time);
    }

    #[test]
    fn test_builders() {
        let settings = BagSettings::default()
            .with_autofill(AutofillPriority::High)
            .with_sort(SortProperty::Name, SortOrder::Descending);

        assert!(settings.autofill);
        assert_eq!(settings.autofill_priority, AutofillPriority::High);
        assert_eq!(settings.sort_order, SortOrder::Descending);
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_string(&BagSettings::default()).unwrap();
        let back: BagSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, BagSettings::default());
        assert!(json.contains("\"sort_property\":\"Time\""));
    }
}
