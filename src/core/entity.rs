//! Entity trait - common interface for all entity types

use serde::{de::DeserializeOwned, Serialize};

use crate::core::identity::{EntityId, EntityPrefix};

/// Common trait for all stored entities
pub trait Entity: Clone + Serialize + DeserializeOwned {
    /// The prefix used when generating ids for this kind
    const PREFIX: EntityPrefix;

    /// Human-readable kind name (e.g., "client", "project")
    const KIND: &'static str;

    /// Get the entity's unique ID
    fn id(&self) -> &EntityId;

    /// Get the entity's display name
    fn name(&self) -> &str;
}

/// A typed partial update for an entity
///
/// `None` fields are left untouched; present fields overwrite the target.
pub trait Update<T> {
    /// Apply the present fields to the target record
    fn apply(self, target: &mut T);

    /// True when no field is present
    fn is_empty(&self) -> bool;
}

/// Overwrite `slot` when `value` is present
pub(crate) fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_overwrites_only_present_values() {
        let mut name = "old".to_string();
        set(&mut name, None);
        assert_eq!(name, "old");
        set(&mut name, Some("new".to_string()));
        assert_eq!(name, "new");
    }

    #[test]
    fn test_set_can_clear_optional_field() {
        let mut address = Some("Rua A".to_string());
        set(&mut address, Some(None));
        assert_eq!(address, None);
    }
}
