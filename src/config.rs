//! Game tuning: entity templates, formation layout and difficulty.
//!
//! Everything here is plain data loaded from JSON. [`GameConfig::validate`]
//! is the single place where numeric inputs are checked, so the simulation
//! itself never has to guard against negative durations or empty tables.

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::difficulty::LevelParameters;
use crate::effects::{Effect, EffectKind};
use crate::entities::{Item, Loot};
use crate::error::{ConfigError, ConfigResult};

// ── Templates ─────────────────────────────────────────────────────────────────

/// Collider size and movement defaults of anything that moves.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActorTemplate {
    pub half_extents: Vec2,
    pub speed: f32,
    pub acceleration: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectileTemplate {
    pub name: String,
    pub actor: ActorTemplate,
    pub damage: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShipTemplate {
    pub actor: ActorTemplate,
    pub max_life: i32,
    /// Seconds between two shots.
    pub shoot_cooldown: f32,
    pub projectiles: Vec<ProjectileTemplate>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlienTemplate {
    pub name: String,
    pub ship: ShipTemplate,
    pub points: u32,
    /// Probability in `[0, 1]` of dropping loot on death.
    #[serde(default)]
    pub drop_chance: f32,
    #[serde(default)]
    pub loot: Vec<Loot>,
}

/// An alien placed in the level that shuttles between two points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DroneConfig {
    pub alien: AlienTemplate,
    pub start: Vec2,
    pub end: Vec2,
    pub min_patrol_interval: f32,
    pub max_patrol_interval: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShieldConfig {
    pub position: Vec2,
    pub half_extents: Vec2,
    pub max_life: i32,
}

// ── Layout ────────────────────────────────────────────────────────────────────

/// Play field centred on the origin, `y` pointing up.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArenaConfig {
    pub width: f32,
    pub height: f32,
}

impl ArenaConfig {
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width, self.height) * 0.5
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub ship: ShipTemplate,
    pub position: Vec2,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FormationConfig {
    /// One alien template per row, bottom row first.
    pub rows: Vec<AlienTemplate>,
    pub columns: usize,
    pub spacing: Vec2,
    pub offset: Vec2,
    /// Distance the whole formation drops each time it turns around.
    pub vertical_step: f32,
}

impl FormationConfig {
    pub fn cell_count(&self) -> usize {
        self.rows.len() * self.columns
    }

    /// Spawn position of the cell at `column`, `row`.
    pub fn cell_position(&self, column: usize, row: usize) -> Vec2 {
        let half_columns = (self.columns / 2) as f32;
        let half_rows = (self.rows.len() / 2) as f32;
        let (x, y) = (column as f32, row as f32);
        Vec2::new(
            x - half_columns + self.offset.x + x * self.spacing.x,
            y - half_rows + self.offset.y + y * self.spacing.y,
        )
    }
}

// ── Root ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub arena: ArenaConfig,
    /// Step used by the host when calling `World::fixed_tick`.
    pub fixed_time_step: f32,
    pub player: PlayerConfig,
    pub formation: FormationConfig,
    pub difficulty: LevelParameters,
    #[serde(default)]
    pub drones: Vec<DroneConfig>,
    #[serde(default)]
    pub shields: Vec<ShieldConfig>,
    /// Falling pickup spawned by alien loot.
    pub drop: ActorTemplate,
}

impl GameConfig {
    /// Reads a JSON config file. The result is not validated yet.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        non_negative("arena.width", self.arena.width)?;
        non_negative("arena.height", self.arena.height)?;
        if !(self.fixed_time_step > 0.0) {
            return Err(ConfigError::OutOfRange {
                field: "fixed_time_step".to_string(),
                value: self.fixed_time_step,
                min: f32::EPSILON,
                max: f32::MAX,
            });
        }

        validate_ship("player", &self.player.ship)?;

        let formation = &self.formation;
        if formation.cell_count() == 0 {
            return Err(ConfigError::EmptyFormation {
                rows: formation.rows.len(),
                columns: formation.columns,
            });
        }
        non_negative("formation.vertical_step", formation.vertical_step)?;
        for alien in &formation.rows {
            validate_alien(alien)?;
        }

        self.difficulty.validate()?;

        for drone in &self.drones {
            validate_alien(&drone.alien)?;
            let field = format!("{}.patrol_interval", drone.alien.name);
            non_negative(&field, drone.min_patrol_interval)?;
            non_negative(&field, drone.max_patrol_interval)?;
            if drone.min_patrol_interval > drone.max_patrol_interval {
                return Err(ConfigError::InvertedInterval {
                    field,
                    min: drone.min_patrol_interval,
                    max: drone.max_patrol_interval,
                });
            }
        }

        for shield in &self.shields {
            non_negative("shield.max_life", shield.max_life as f32)?;
            validate_extents("shield.half_extents", shield.half_extents)?;
        }

        validate_actor("drop", &self.drop)?;
        Ok(())
    }
}

fn non_negative(field: &str, value: f32) -> ConfigResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative {
            field: field.to_string(),
            value,
        })
    }
}

fn validate_extents(field: &str, extents: Vec2) -> ConfigResult<()> {
    non_negative(field, extents.x)?;
    non_negative(field, extents.y)
}

fn validate_actor(name: &str, actor: &ActorTemplate) -> ConfigResult<()> {
    validate_extents(&format!("{name}.half_extents"), actor.half_extents)?;
    non_negative(&format!("{name}.speed"), actor.speed)?;
    non_negative(&format!("{name}.acceleration"), actor.acceleration)
}

fn validate_ship(name: &str, ship: &ShipTemplate) -> ConfigResult<()> {
    validate_actor(name, &ship.actor)?;
    non_negative(&format!("{name}.max_life"), ship.max_life as f32)?;
    non_negative(&format!("{name}.shoot_cooldown"), ship.shoot_cooldown)?;
    if ship.projectiles.is_empty() {
        return Err(ConfigError::NoProjectiles(name.to_string()));
    }
    for projectile in &ship.projectiles {
        validate_actor(&projectile.name, &projectile.actor)?;
        non_negative(&format!("{}.damage", projectile.name), projectile.damage as f32)?;
    }
    Ok(())
}

fn validate_alien(alien: &AlienTemplate) -> ConfigResult<()> {
    validate_ship(&alien.name, &alien.ship)?;
    let chance = alien.drop_chance;
    if !(0.0..=1.0).contains(&chance) {
        return Err(ConfigError::OutOfRange {
            field: format!("{}.drop_chance", alien.name),
            value: chance,
            min: 0.0,
            max: 1.0,
        });
    }
    for loot in &alien.loot {
        non_negative(&format!("{}.loot.{}", alien.name, loot.item.name), loot.weight)?;
        for effect in &loot.item.effects {
            validate_effect(&loot.item.name, effect)?;
        }
    }
    let total: f32 = alien.loot.iter().map(|l| l.weight).sum();
    if chance > 0.0 && !(total > 0.0) {
        return Err(ConfigError::EmptyLootTable(alien.name.clone()));
    }
    Ok(())
}

/// Multipliers below 1 would slow the player down or stall its cooldown.
fn validate_effect(item: &str, effect: &Effect) -> ConfigResult<()> {
    non_negative(&format!("{item}.duration"), effect.duration)?;
    let multipliers = match effect.kind {
        EffectKind::Haste {
            speed_multiplier,
            acceleration_multiplier,
        } => vec![
            ("speed_multiplier", speed_multiplier),
            ("acceleration_multiplier", acceleration_multiplier),
        ],
        EffectKind::RapidFire { speed_multiplier } => vec![("speed_multiplier", speed_multiplier)],
        EffectKind::Restoration { .. } => Vec::new(),
    };
    for (name, value) in multipliers {
        if !(value.is_finite() && value >= 1.0) {
            return Err(ConfigError::OutOfRange {
                field: format!("{item}.{name}"),
                value,
                min: 1.0,
                max: f32::MAX,
            });
        }
    }
    Ok(())
}

// ── Defaults ──────────────────────────────────────────────────────────────────

fn laser() -> ProjectileTemplate {
    ProjectileTemplate {
        name: "laser".to_string(),
        actor: ActorTemplate {
            half_extents: Vec2::new(0.05, 0.2),
            speed: 12.0,
            acceleration: 1000.0,
        },
        damage: 1,
    }
}

fn bolt() -> ProjectileTemplate {
    ProjectileTemplate {
        name: "bolt".to_string(),
        actor: ActorTemplate {
            half_extents: Vec2::new(0.08, 0.15),
            speed: 6.0,
            acceleration: 1000.0,
        },
        damage: 1,
    }
}

fn default_loot() -> Vec<Loot> {
    vec![
        Loot {
            item: Item {
                name: "Overdrive".to_string(),
                effects: vec![Effect::new(
                    5.0,
                    EffectKind::Haste {
                        speed_multiplier: 1.5,
                        acceleration_multiplier: 1.5,
                    },
                )],
            },
            weight: 2.0,
        },
        Loot {
            item: Item {
                name: "Rapid Fire".to_string(),
                effects: vec![Effect::new(
                    5.0,
                    EffectKind::RapidFire {
                        speed_multiplier: 2.0,
                    },
                )],
            },
            weight: 2.0,
        },
        Loot {
            item: Item {
                name: "Repair Kit".to_string(),
                effects: vec![Effect::new(0.0, EffectKind::Restoration { life: 1 })],
            },
            weight: 1.0,
        },
    ]
}

fn alien(name: &str, points: u32, drop_chance: f32) -> AlienTemplate {
    AlienTemplate {
        name: name.to_string(),
        ship: ShipTemplate {
            actor: ActorTemplate {
                half_extents: Vec2::new(0.35, 0.25),
                speed: 1.0,
                acceleration: 20.0,
            },
            max_life: 1,
            shoot_cooldown: 0.0,
            projectiles: vec![bolt()],
        },
        points,
        drop_chance,
        loot: default_loot(),
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        let mut drone = alien("drone", 150, 0.5);
        drone.ship.max_life = 2;
        drone.ship.actor.speed = 3.0;

        Self {
            arena: ArenaConfig {
                width: 16.0,
                height: 12.0,
            },
            fixed_time_step: 0.02,
            player: PlayerConfig {
                ship: ShipTemplate {
                    actor: ActorTemplate {
                        half_extents: Vec2::new(0.4, 0.3),
                        speed: 6.0,
                        acceleration: 40.0,
                    },
                    max_life: 3,
                    shoot_cooldown: 0.4,
                    projectiles: vec![laser()],
                },
                position: Vec2::new(0.0, -5.0),
            },
            formation: FormationConfig {
                rows: vec![
                    alien("crab", 10, 0.05),
                    alien("crab", 10, 0.05),
                    alien("squid", 20, 0.1),
                    alien("octopus", 30, 0.15),
                ],
                columns: 8,
                spacing: Vec2::new(0.4, 0.2),
                offset: Vec2::new(-0.9, 3.0),
                vertical_step: 0.5,
            },
            difficulty: LevelParameters::default(),
            drones: vec![DroneConfig {
                alien: drone,
                start: Vec2::new(-7.0, 5.4),
                end: Vec2::new(7.0, 5.4),
                min_patrol_interval: 5.0,
                max_patrol_interval: 10.0,
            }],
            shields: [-5.25, -1.75, 1.75, 5.25]
                .into_iter()
                .map(|x| ShieldConfig {
                    position: Vec2::new(x, -3.5),
                    half_extents: Vec2::new(0.8, 0.3),
                    max_life: 5,
                })
                .collect(),
            drop: ActorTemplate {
                half_extents: Vec2::new(0.25, 0.25),
                speed: 2.0,
                acceleration: 100.0,
            },
        }
    }
}
