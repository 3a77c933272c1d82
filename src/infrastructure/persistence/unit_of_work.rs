use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::trace;

use super::{ChangeTracker, PersistenceError};
use crate::domain::entities::{Media, MediaId};

/// Old and new value of one field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldChange {
    pub old: Value,
    pub new: Value,
}

/// Pending changes of one entity, keyed by field name
pub type ChangeSet = BTreeMap<String, FieldChange>;

/// Tracks the last persisted state of managed media and what changed since.
#[derive(Debug, Default)]
pub struct UnitOfWork {
    snapshots: HashMap<MediaId, Map<String, Value>>,
    change_sets: HashMap<MediaId, ChangeSet>,
}

impl UnitOfWork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_managed(&self, id: MediaId) -> bool {
        self.snapshots.contains_key(&id)
    }

    /// Record `media` as the persisted state and clear its pending changes
    pub fn mark_persisted(&mut self, media: &Media) -> Result<(), PersistenceError> {
        self.snapshots.insert(media.id, snapshot(media)?);
        self.change_sets.remove(&media.id);
        Ok(())
    }

    pub fn detach(&mut self, id: MediaId) {
        self.snapshots.remove(&id);
        self.change_sets.remove(&id);
    }

    /// Diff `media` against its snapshot, storing and returning the result
    pub fn compute_change_set(&mut self, media: &Media) -> Result<ChangeSet, PersistenceError> {
        let original =
            self.snapshots.get(&media.id).ok_or(PersistenceError::UnmanagedEntity(media.id))?;

        let current = snapshot(media)?;
        let change_set: ChangeSet = current
            .into_iter()
            .filter_map(|(field, new)| {
                let old = original.get(&field).cloned().unwrap_or(Value::Null);
                (old != new).then(|| (field, FieldChange { old, new }))
            })
            .collect();

        trace!(media_id = %media.id, fields = change_set.len(), "Computed change-set");
        self.change_sets.insert(media.id, change_set.clone());

        Ok(change_set)
    }

    pub fn change_set(&self, id: MediaId) -> Option<&ChangeSet> {
        self.change_sets.get(&id)
    }

    /// Remove and return the pending change-set of `id`
    pub fn take_change_set(&mut self, id: MediaId) -> ChangeSet {
        self.change_sets.remove(&id).unwrap_or_default()
    }
}

impl ChangeTracker for UnitOfWork {
    fn recompute_single_entity_change_set(
        &mut self,
        media: &Media,
    ) -> Result<(), PersistenceError> {
        self.compute_change_set(media).map(|_| ())
    }
}

/// Persisted fields of `media`; transient upload data is skipped by serde
fn snapshot(media: &Media) -> Result<Map<String, Value>, PersistenceError> {
    Ok(serde_json::from_value(serde_json::to_value(media)?)?)
}
