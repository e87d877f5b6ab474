use super::*;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    /// Generation-checked handle to an entity in an [`EntityStore`].
    pub struct EntityKey;
}

/// Stable storage for the simulated entities. Keys stay valid until the entity is removed.
pub type EntityStore = SlotMap<EntityKey, Entity>;

/// What a cell holds per entity: the back-reference and the position seen at last classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeRecord {
    pub snapshot: Entity,
    pub key: EntityKey,
}

impl NodeRecord {
    pub fn new(key: EntityKey, snapshot: Entity) -> Self {
        Self { snapshot, key }
    }

    #[inline(always)]
    pub fn position(&self) -> Vec3 {
        self.snapshot.position
    }

    // Re-read the live entity; false once it has been removed from the store
    #[inline(always)]
    pub(crate) fn refresh(&mut self, store: &EntityStore) -> bool {
        match store.get(self.key) {
            Some(entity) => {
                self.snapshot = *entity;
                true
            }
            None => false,
        }
    }
}

pub(crate) type OutsiderVec = SmallVec<[NodeRecord; 32]>;
