//! The live object table as seen by the overlay.
//!
//! [`EntitySource`] is the capability the overlay consumes each frame: a
//! fresh, finite enumeration of entity snapshots. Ordering is unspecified.
//! [`ObjectTable`] is the in-memory implementation used by tests, the demo
//! scene and anything that replays a captured snapshot.

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::kind::ObjectKind;

// ---------------------------------------------------------------------------
// EntitySource
// ---------------------------------------------------------------------------

/// A per-frame enumeration of the host's live objects.
///
/// Each call to [`entities`](Self::entities) starts a new enumeration. The
/// yielded values are owned snapshots; callers must not assume the underlying
/// objects still exist after the frame ends.
pub trait EntitySource {
    fn entities(&self) -> Box<dyn Iterator<Item = Entity> + '_>;
}

impl EntitySource for [Entity] {
    fn entities(&self) -> Box<dyn Iterator<Item = Entity> + '_> {
        Box::new(self.iter().cloned())
    }
}

impl EntitySource for Vec<Entity> {
    fn entities(&self) -> Box<dyn Iterator<Item = Entity> + '_> {
        self.as_slice().entities()
    }
}

// ---------------------------------------------------------------------------
// ObjectTable
// ---------------------------------------------------------------------------

/// An in-memory object table keyed by `game_object_id`.
///
/// Insertion order is preserved for enumeration so frames built from the same
/// table are reproducible.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectTable {
    objects: Vec<Entity>,
}

impl ObjectTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entity, replacing any existing entity with the same
    /// `game_object_id`. Returns the replaced entity.
    pub fn insert(&mut self, entity: Entity) -> Option<Entity> {
        match self
            .objects
            .iter_mut()
            .find(|e| e.game_object_id == entity.game_object_id)
        {
            Some(slot) => Some(std::mem::replace(slot, entity)),
            None => {
                self.objects.push(entity);
                None
            }
        }
    }

    /// Remove the entity with the given id.
    pub fn remove(&mut self, game_object_id: u64) -> Option<Entity> {
        let idx = self
            .objects
            .iter()
            .position(|e| e.game_object_id == game_object_id)?;
        Some(self.objects.remove(idx))
    }

    pub fn get(&self, game_object_id: u64) -> Option<&Entity> {
        self.objects
            .iter()
            .find(|e| e.game_object_id == game_object_id)
    }

    pub fn get_mut(&mut self, game_object_id: u64) -> Option<&mut Entity> {
        self.objects
            .iter_mut()
            .find(|e| e.game_object_id == game_object_id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.objects.iter()
    }

    /// Number of objects of the given kind.
    pub fn count_kind(&self, kind: ObjectKind) -> usize {
        self.objects.iter().filter(|e| e.kind == kind).count()
    }
}

impl EntitySource for ObjectTable {
    fn entities(&self) -> Box<dyn Iterator<Item = Entity> + '_> {
        Box::new(self.objects.iter().cloned())
    }
}

impl FromIterator<Entity> for ObjectTable {
    fn from_iter<I: IntoIterator<Item = Entity>>(iter: I) -> Self {
        let mut table = ObjectTable::new();
        for entity in iter {
            table.insert(entity);
        }
        table
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
