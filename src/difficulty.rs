//! Difficulty curve and the per-level tuning it drives.
//!
//! Every tunable is a [`Range`] evaluated as
//! `min + (1 - e^(-curve * (level - 1))) * max`, so level 1 yields `min` and
//! higher levels approach `min + max`. A negative `max` makes a value shrink
//! as levels go up (used for cooldowns).

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

impl Range {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Evaluates the range at `level` (1-based) on the given curve.
    pub fn at(&self, curve: f32, level: u32) -> f32 {
        self.min + progress(curve, level) * self.max
    }

    /// Value the range approaches as the level grows without bound.
    pub fn limit(&self) -> f32 {
        self.min + self.max
    }
}

/// Fraction of each range's `max` unlocked at `level`, in `[0, 1)`.
pub fn progress(curve: f32, level: u32) -> f32 {
    let steps = level.saturating_sub(1) as f32;
    1.0 - (-curve * steps).exp()
}

/// Tuning that changes from one wave to the next.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelParameters {
    /// Steepness of the exponential difficulty curve.
    pub curve: f32,
    /// Probability that a formation cell spawns an alien.
    pub spawn_chance: Range,
    /// Default speed given to freshly spawned aliens.
    pub alien_speed: Range,
    /// Multiplier applied to each alien template's max life.
    pub life_multiplier: Range,
    /// Seconds between two alien shots.
    pub shoot_cooldown: Range,
    /// Speed added to every surviving alien when one of them dies.
    pub speed_delta: Range,
}

impl Default for LevelParameters {
    fn default() -> Self {
        Self {
            curve: 0.25,
            spawn_chance: Range::new(0.6, 0.4),
            alien_speed: Range::new(1.0, 2.0),
            life_multiplier: Range::new(1.0, 2.0),
            shoot_cooldown: Range::new(1.5, -1.0),
            speed_delta: Range::new(0.05, 0.1),
        }
    }
}

impl LevelParameters {
    pub fn spawn_chance(&self, level: u32) -> f32 {
        self.spawn_chance.at(self.curve, level).clamp(0.0, 1.0)
    }

    pub fn alien_speed(&self, level: u32) -> f32 {
        self.alien_speed.at(self.curve, level).max(0.0)
    }

    pub fn life_multiplier(&self, level: u32) -> f32 {
        self.life_multiplier.at(self.curve, level).max(0.0)
    }

    pub fn shoot_cooldown(&self, level: u32) -> f32 {
        self.shoot_cooldown.at(self.curve, level).max(0.0)
    }

    pub fn speed_delta(&self, level: u32) -> f32 {
        self.speed_delta.at(self.curve, level).max(0.0)
    }

    /// Rejects tuning whose values could leave the valid domain at some level.
    ///
    /// The curve stays between `min` and `min + max`, so checking both ends is
    /// enough.
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.curve.is_finite() || self.curve < 0.0 {
            return Err(ConfigError::Negative {
                field: "difficulty.curve".to_string(),
                value: self.curve,
            });
        }

        let spawn = self.spawn_chance;
        if !(spawn.min > 0.0 && spawn.limit() > 0.0) {
            return Err(ConfigError::ZeroSpawnChance(format!(
                "[{}, {}]",
                spawn.min, spawn.max
            )));
        }
        if spawn.min > 1.0 || spawn.limit() > 1.0 {
            return Err(ConfigError::OutOfRange {
                field: "difficulty.spawn_chance".to_string(),
                value: spawn.min.max(spawn.limit()),
                min: 0.0,
                max: 1.0,
            });
        }

        // A motionless formation never reaches its step-down waypoint.
        let speed = self.alien_speed;
        if !(speed.min > 0.0 && speed.limit() > 0.0) {
            return Err(ConfigError::OutOfRange {
                field: "difficulty.alien_speed".to_string(),
                value: speed.min.min(speed.limit()),
                min: f32::EPSILON,
                max: f32::MAX,
            });
        }

        let ranges = [
            ("difficulty.alien_speed", self.alien_speed),
            ("difficulty.life_multiplier", self.life_multiplier),
            ("difficulty.shoot_cooldown", self.shoot_cooldown),
            ("difficulty.speed_delta", self.speed_delta),
        ];
        for (field, range) in ranges {
            for value in [range.min, range.limit()] {
                if !value.is_finite() || value < 0.0 {
                    return Err(ConfigError::Negative {
                        field: field.to_string(),
                        value,
                    });
                }
            }
        }
        Ok(())
    }
}
