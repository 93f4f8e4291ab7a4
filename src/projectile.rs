//! Projectile contact resolution.

use tracing::trace;

use crate::entities::{EntityId, EntityKind};
use crate::registry::{Destroyed, Registry};
use crate::ship::{take_damage, DamageOutcome};

/// What happened when a projectile touched something.
#[derive(Clone, Debug, PartialEq)]
pub struct Impact {
    pub projectile: EntityId,
    pub owner: EntityId,
    /// Damage dealt, if the other side could take it.
    pub hit: Option<DamageOutcome>,
    /// The projectile's own destruction.
    pub spent: Option<Destroyed>,
}

/// Resolves a projectile touching `other`, or touching something that is
/// not an entity at all (`None`, e.g. the arena edge).
///
/// Contacts with the owner's own kind, with shots from that same side and
/// with drops are ignored and leave the projectile alive. Any other contact spends it, whether or not the
/// other side could be damaged. Returns `None` if the projectile is gone or
/// the contact was ignored.
pub fn resolve(
    registry: &mut Registry,
    projectile: EntityId,
    other: Option<EntityId>,
) -> Option<Impact> {
    let state = registry.get_active(projectile)?.projectile?;

    let mut hit = None;
    if let Some(other) = other {
        if other == state.owner || other == projectile {
            return None;
        }
        if let Some(target) = registry.get_active(other) {
            let friendly_shot = target
                .projectile
                .is_some_and(|p| p.owner_kind == state.owner_kind);
            if target.kind == state.owner_kind || target.kind == EntityKind::Drop || friendly_shot {
                return None;
            }
            if target.is_damageable() {
                hit = take_damage(registry, other, state.damage);
            }
        }
    }

    let spent = registry.destroy(projectile);
    trace!(%projectile, owner = %state.owner, hit = hit.is_some(), "projectile spent");
    Some(Impact {
        projectile,
        owner: state.owner,
        hit,
        spent,
    })
}
