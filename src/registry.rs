//! Table of live entities keyed by stable handles.
//!
//! The world owns exactly one registry and passes it by reference to the
//! systems that need lookups. Ids are allocated monotonically and never
//! reused, so a handle to a removed entity can only ever miss.

use std::collections::BTreeMap;

use glam::Vec2;
use tracing::debug;

use crate::entities::{Bounty, DestroyHook, DestroyMode, Entity, EntityId, EntityKind};

/// What the registry reports after destroying an entity.
#[derive(Clone, Debug, PartialEq)]
pub struct Destroyed {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: Vec2,
    pub mode: DestroyMode,
    pub hooks: Vec<DestroyHook>,
    /// Reward data, kept so points and loot survive the removal.
    pub bounty: Option<Bounty>,
}

#[derive(Debug)]
pub struct Registry {
    entities: BTreeMap<EntityId, Entity>,
    next_id: u64,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            entities: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Registers `entity` under a fresh id and returns that id.
    pub fn spawn(&mut self, mut entity: Entity) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        entity.id = id;
        debug!(%id, kind = ?entity.kind, x = entity.position.x, y = entity.position.y, "spawned");
        self.entities.insert(id, entity);
        id
    }

    /// Looks up an entity, active or not.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Looks up an entity that is currently taking part in the simulation.
    pub fn get_active(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id).filter(|e| e.active)
    }

    pub fn get_active_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id).filter(|e| e.active)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn kind_of(&self, id: EntityId) -> Option<EntityKind> {
        self.get(id).map(|e| e.kind)
    }

    /// True if `id` is an active entity of `kind`.
    pub fn is(&self, id: EntityId, kind: EntityKind) -> bool {
        self.get_active(id).is_some_and(|e| e.kind == kind)
    }

    /// Destroys an active entity according to its destroy mode.
    ///
    /// Returns `None` when the entity is unknown or already inactive, so
    /// destruction hooks fire at most once per death.
    pub fn destroy(&mut self, id: EntityId) -> Option<Destroyed> {
        let entity = self.entities.get_mut(&id).filter(|e| e.active)?;
        let destroyed = Destroyed {
            id,
            kind: entity.kind,
            position: entity.position,
            mode: entity.destroy_mode,
            hooks: entity.on_destroyed.clone(),
            bounty: entity.bounty.clone(),
        };
        match destroyed.mode {
            DestroyMode::Deactivate => entity.active = false,
            DestroyMode::Destroy => {
                self.entities.remove(&id);
            }
        }
        debug!(%id, kind = ?destroyed.kind, mode = ?destroyed.mode, "destroyed");
        Some(destroyed)
    }

    /// Brings a deactivated entity back. Returns `false` if there is nothing
    /// to reactivate.
    pub fn reactivate(&mut self, id: EntityId) -> bool {
        match self.entities.get_mut(&id) {
            Some(entity) if !entity.active => {
                entity.active = true;
                debug!(%id, kind = ?entity.kind, "reactivated");
                true
            }
            _ => false,
        }
    }

    /// Ids of active entities in spawn order.
    pub fn active_ids(&self) -> Vec<EntityId> {
        self.iter_active().map(|e| e.id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn iter_active(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values().filter(|e| e.active)
    }

    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.values_mut().filter(|e| e.active)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Drops every entity without running destruction hooks.
    pub fn clear(&mut self) {
        self.entities.clear();
    }
}
