//! Timed and instant modifiers granted by collected items.
//!
//! Ships restore their current speed, acceleration and shoot multiplier to the
//! defaults every tick, so a timed effect only stays in force by re-applying
//! itself from its update hook each frame.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entities::Entity;
use crate::life::LifeChanged;
use crate::timer::Timer;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectKind {
    /// Multiplies movement speed and acceleration.
    Haste {
        speed_multiplier: f32,
        acceleration_multiplier: f32,
    },
    /// Makes the shoot cooldown run faster.
    RapidFire { speed_multiplier: f32 },
    /// Grants life immediately.
    Restoration { life: i32 },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    /// Seconds the effect stays active. Zero means the start hook runs once
    /// and the effect is never tracked.
    #[serde(default)]
    pub duration: f32,
    #[serde(flatten)]
    pub kind: EffectKind,
}

impl Effect {
    pub fn new(duration: f32, kind: EffectKind) -> Self {
        Self { duration, kind }
    }

    pub fn is_timed(&self) -> bool {
        self.duration > 0.0
    }

    pub fn name(&self) -> &'static str {
        match self.kind {
            EffectKind::Haste { .. } => "haste",
            EffectKind::RapidFire { .. } => "rapid fire",
            EffectKind::Restoration { .. } => "restoration",
        }
    }

    /// Runs once when the effect is applied.
    pub fn start(&self, target: &mut Entity) -> Option<LifeChanged> {
        match self.kind {
            EffectKind::Restoration { life } => target.life.as_mut().map(|l| l.add(life)),
            EffectKind::Haste { .. } | EffectKind::RapidFire { .. } => None,
        }
    }

    /// Runs every tick while the effect is active.
    pub fn update(&self, target: &mut Entity) {
        match self.kind {
            EffectKind::Haste {
                speed_multiplier,
                acceleration_multiplier,
            } => {
                if let Some(movement) = target.movement.as_mut() {
                    movement.current_speed = movement.default_speed * speed_multiplier;
                    movement.current_acceleration =
                        movement.default_acceleration * acceleration_multiplier;
                }
            }
            EffectKind::RapidFire { speed_multiplier } => {
                if let Some(shooter) = target.shooter.as_mut() {
                    shooter.current_shoot_speed_multiplier =
                        shooter.default_shoot_speed_multiplier * speed_multiplier;
                }
            }
            EffectKind::Restoration { .. } => {}
        }
    }

    /// Runs once when a timed effect expires.
    ///
    /// Modifiers lapse on their own at the next tick's reset, so there is
    /// nothing to undo for the current kinds.
    pub fn stop(&self, _target: &mut Entity) {}
}

/// An active timed effect and its private countdown.
#[derive(Clone, Debug)]
pub struct EffectInfo {
    pub effect: Effect,
    pub timer: Timer,
}

impl EffectInfo {
    pub fn new(effect: Effect) -> Self {
        let timer = Timer::new(effect.duration);
        Self { effect, timer }
    }
}

/// Effects currently affecting a ship. Stacking is plain re-application:
/// two hastes are two entries.
#[derive(Clone, Debug, Default)]
pub struct ActiveEffects {
    active: Vec<EffectInfo>,
}

impl ActiveEffects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EffectInfo> {
        self.active.iter()
    }

    /// Starts `effect` on `target` and tracks it if it has a duration.
    pub fn apply(&mut self, effect: Effect, target: &mut Entity) -> Option<LifeChanged> {
        let changed = effect.start(target);
        debug!(effect = effect.name(), duration = effect.duration, "effect applied");
        if effect.is_timed() {
            self.active.push(EffectInfo::new(effect));
        }
        changed
    }

    /// Runs every update hook, then stops and drops the effects whose timer
    /// completed. Returns the expired effects in application order.
    pub fn update(&mut self, delta: f32, target: &mut Entity) -> Vec<Effect> {
        let mut expired = Vec::new();
        for info in &mut self.active {
            info.effect.update(target);
            if info.timer.run(delta) {
                expired.push(info.effect.clone());
            }
        }
        if expired.is_empty() {
            return expired;
        }

        self.active.retain(|info| !info.timer.is_done());
        for effect in &expired {
            effect.stop(target);
            debug!(effect = effect.name(), "effect expired");
        }
        expired
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }
}
