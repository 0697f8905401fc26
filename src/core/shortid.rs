//! Session-local short aliases (`@1`, `@2`, ...) for listed records
//!
//! Every list command rebuilds the index from the rows it printed, so `@N`
//! always refers to the N-th row of the most recent listing. Each alias
//! remembers the kind of record it was listed as, and resolving it as any
//! other kind is an error.

use std::collections::HashMap;
use thiserror::Error;

use crate::core::identity::EntityId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShortIdError {
    #[error("Unknown short ID '{0}'; list records first")]
    Unknown(String),

    #[error("{reference} refers to a {actual}, not a {expected}")]
    WrongKind {
        reference: String,
        actual: &'static str,
        expected: &'static str,
    },
}

#[derive(Debug, Default)]
pub struct ShortIdIndex {
    entries: HashMap<u32, (&'static str, EntityId)>,
    reverse: HashMap<(&'static str, EntityId), u32>,
    next_id: u32,
}

impl ShortIdIndex {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            reverse: HashMap::new(),
            next_id: 1,
        }
    }

    /// Clear and rebuild the index with the listed IDs of one kind
    pub fn rebuild<'a>(&mut self, kind: &'static str, ids: impl IntoIterator<Item = &'a EntityId>) {
        self.entries.clear();
        self.reverse.clear();
        self.next_id = 1;

        for id in ids {
            self.add(kind, id.clone());
        }
    }

    pub fn add(&mut self, kind: &'static str, id: EntityId) -> u32 {
        let key = (kind, id);
        if let Some(&short_id) = self.reverse.get(&key) {
            return short_id;
        }

        let short_id = self.next_id.max(1);
        self.next_id = short_id + 1;
        self.entries.insert(short_id, key.clone());
        self.reverse.insert(key, short_id);
        short_id
    }

    /// Resolve `@N` to a listed ID of `kind`; anything else is taken as an ID as-is
    pub fn resolve(&self, kind: &'static str, reference: &str) -> Result<EntityId, ShortIdError> {
        let reference = reference.trim();
        let Some(num) = reference.strip_prefix('@') else {
            return Ok(EntityId::from(reference));
        };

        let (actual, id) = num
            .parse::<u32>()
            .ok()
            .and_then(|n| self.entries.get(&n))
            .ok_or_else(|| ShortIdError::Unknown(reference.to_string()))?;

        if *actual != kind {
            return Err(ShortIdError::WrongKind {
                reference: reference.to_string(),
                actual: *actual,
                expected: kind,
            });
        }
        Ok(id.clone())
    }

    pub fn get_short_id(&self, kind: &'static str, id: &EntityId) -> Option<u32> {
        self.reverse.get(&(kind, id.clone())).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
