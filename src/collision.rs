//! Axis-aligned overlap pass producing the contacts the world resolves.
//!
//! Hosts with their own physics can skip [`detect`] and hand contacts to
//! `World::resolve_contact` directly.

use glam::Vec2;

use crate::entities::{Entity, EntityId, EntityKind};
use crate::math::Aabb;
use crate::registry::Registry;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Contact {
    /// Two entities overlap.
    Entities(EntityId, EntityId),
    /// An entity touched the arena boundary. `normal` points back inside.
    Boundary { entity: EntityId, normal: Vec2 },
}

/// Whether a contact between these two kinds means anything to the game.
fn interacts(a: &Entity, b: &Entity) -> bool {
    match (a.kind, b.kind) {
        (EntityKind::Projectile, EntityKind::Drop) | (EntityKind::Drop, EntityKind::Projectile) => {
            false
        }
        (EntityKind::Projectile, EntityKind::Projectile) => match (a.projectile, b.projectile) {
            (Some(pa), Some(pb)) => pa.owner_kind != pb.owner_kind,
            _ => false,
        },
        (EntityKind::Projectile, _) => a.projectile.is_some_and(|p| p.owner != b.id),
        (_, EntityKind::Projectile) => b.projectile.is_some_and(|p| p.owner != a.id),
        (EntityKind::Drop, EntityKind::Player) | (EntityKind::Player, EntityKind::Drop) => true,
        (EntityKind::Player | EntityKind::Shield, other)
        | (other, EntityKind::Player | EntityKind::Shield) => other.is_hostile(),
        _ => false,
    }
}

/// Contact between `entity` and the arena edges, if any.
fn boundary_contact(entity: &Entity, arena: &Aabb) -> Option<Contact> {
    let bounds = entity.bounds();
    let normal = match entity.kind {
        EntityKind::Alien => {
            let (min, max) = (bounds.min(), bounds.max());
            let (arena_min, arena_max) = (arena.min(), arena.max());
            if min.y <= arena_min.y {
                Vec2::Y
            } else if max.y >= arena_max.y {
                Vec2::NEG_Y
            } else if min.x <= arena_min.x {
                Vec2::X
            } else if max.x >= arena_max.x {
                Vec2::NEG_X
            } else {
                return None;
            }
        }
        EntityKind::Projectile | EntityKind::Drop if !bounds.overlaps(arena) => {
            (arena.center - bounds.center).normalize_or_zero()
        }
        _ => return None,
    };
    Some(Contact::Boundary {
        entity: entity.id,
        normal,
    })
}

/// Lists every meaningful contact among active entities, pairs first, in
/// spawn order.
pub fn detect(registry: &Registry, arena: &Aabb) -> Vec<Contact> {
    let entities: Vec<&Entity> = registry.iter_active().collect();
    let mut contacts = Vec::new();

    for (i, a) in entities.iter().enumerate() {
        for b in entities.iter().skip(i + 1) {
            if interacts(a, b) && a.bounds().overlaps(&b.bounds()) {
                contacts.push(Contact::Entities(a.id, b.id));
            }
        }
    }

    contacts.extend(entities.iter().filter_map(|e| boundary_contact(e, arena)));
    contacts
}
