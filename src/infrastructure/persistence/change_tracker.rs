use super::PersistenceError;
use crate::domain::entities::Media;

/// Change tracking of the session flushing an entity.
///
/// Pre-update hooks may mutate the entity after its change-set was computed;
/// the dispatcher calls this so those mutations are written too.
pub trait ChangeTracker: Send {
    fn recompute_single_entity_change_set(&mut self, media: &Media)
    -> Result<(), PersistenceError>;
}

/// Tracker for persistence layers that write whole entities
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopChangeTracker;

impl ChangeTracker for NoopChangeTracker {
    fn recompute_single_entity_change_set(
        &mut self,
        _media: &Media,
    ) -> Result<(), PersistenceError> {
        Ok(())
    }
}
