//! Ships: shooting with a cooldown and taking damage.

use glam::Vec2;
use rand::Rng;
use tracing::trace;

use crate::entities::{Entity, EntityId};
use crate::life::LifeChanged;
use crate::registry::{Destroyed, Registry};

/// Result of damaging something that has a life.
#[derive(Clone, Debug, PartialEq)]
pub struct DamageOutcome {
    pub target: EntityId,
    pub life: LifeChanged,
    /// Set when the hit emptied the life pool and the target was destroyed.
    pub destroyed: Option<Destroyed>,
}

/// Runs the shoot cooldown for one frame, scaled by the current shoot speed
/// multiplier, then restores the multiplier to its default.
pub fn tick_cooldown(entity: &mut Entity, delta: f32) {
    if let Some(shooter) = entity.shooter.as_mut() {
        shooter
            .cooldown
            .run(delta * shooter.current_shoot_speed_multiplier);
        shooter.current_shoot_speed_multiplier = shooter.default_shoot_speed_multiplier;
    }
}

/// Whether `entity` could fire right now.
pub fn can_shoot(entity: &Entity) -> bool {
    entity
        .shooter
        .as_ref()
        .is_some_and(|s| s.cooldown.is_done() && !s.projectiles.is_empty())
}

/// Fires one projectile from `shooter` along `direction`.
///
/// Does nothing while the cooldown is running. The projectile variant is
/// picked uniformly at random and spawned just outside the ship's collider.
pub fn shoot(
    registry: &mut Registry,
    shooter: EntityId,
    direction: Vec2,
    rng: &mut impl Rng,
) -> Option<EntityId> {
    let ship = registry.get_active_mut(shooter)?;
    if !can_shoot(ship) {
        return None;
    }
    let weapon = ship.shooter.as_mut()?;
    weapon.cooldown.reset();
    let template = weapon.projectiles[rng.gen_range(0..weapon.projectiles.len())].clone();

    let size = ship.bounds().size();
    let origin = ship.position + direction * size.x.max(size.y);
    let kind = ship.kind;

    let mut projectile = Entity::projectile(&template, origin, shooter, kind);
    projectile.set_direction(direction);
    let id = registry.spawn(projectile);
    trace!(%shooter, projectile = %id, name = %template.name, "shot");
    Some(id)
}

/// Subtracts `damage` from the target's life and destroys it once empty.
///
/// Unknown, inactive or lifeless targets are ignored.
pub fn take_damage(
    registry: &mut Registry,
    target: EntityId,
    damage: i32,
) -> Option<DamageOutcome> {
    let entity = registry.get_active_mut(target)?;
    let life = entity.life.as_mut()?;
    let changed = life.add(-damage);
    let destroyed = if life.is_empty() {
        registry.destroy(target)
    } else {
        None
    };
    Some(DamageOutcome {
        target,
        life: changed,
        destroyed,
    })
}
