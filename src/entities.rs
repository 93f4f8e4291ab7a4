//! Entity data: an identity plus optional capability components.
//!
//! Behaviour lives next to the systems that use it (`actor`, `ship`,
//! `projectile`, `alien`); this module only describes the data and how to
//! build it from config templates.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::{
    ActorTemplate, AlienTemplate, DroneConfig, ProjectileTemplate, ShieldConfig, ShipTemplate,
};
use crate::effects::Effect;
use crate::life::Life;
use crate::math::Aabb;
use crate::timer::Timer;

/// Stable handle allocated by the registry. Never reused within a world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Player,
    Alien,
    Drone,
    Projectile,
    Drop,
    Shield,
}

impl EntityKind {
    /// Kinds that award points and can roll loot.
    pub fn is_hostile(self) -> bool {
        matches!(self, EntityKind::Alien | EntityKind::Drone)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DestroyMode {
    /// Remove the entity from the registry.
    #[default]
    Destroy,
    /// Hide the entity but keep it registered so it can come back.
    Deactivate,
}

/// Reaction run by the world when an entity is destroyed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DestroyHook {
    /// Tell the level a formation member is gone.
    Formation,
    /// Roll the alien loot table.
    DropLoot,
    /// End the round.
    EndRound,
}

// ── Items ─────────────────────────────────────────────────────────────────────

/// A collectable bundle of effects.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub effects: Vec<Effect>,
}

/// An item with its relative drop weight.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Loot {
    pub item: Item,
    pub weight: f32,
}

// ── Components ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Movement {
    pub default_speed: f32,
    pub default_acceleration: f32,
    /// Reset to `default_speed` after every fixed tick.
    pub current_speed: f32,
    /// Reset to `default_acceleration` after every fixed tick.
    pub current_acceleration: f32,
    pub direction: Vec2,
    pub(crate) waypoint: Option<Vec2>,
    pub(crate) internal_velocity: Vec2,
}

#[derive(Clone, Debug)]
pub struct Shooter {
    pub cooldown: Timer,
    pub projectiles: Vec<ProjectileTemplate>,
    pub default_shoot_speed_multiplier: f32,
    /// Reset to the default after every tick.
    pub current_shoot_speed_multiplier: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileState {
    pub owner: EntityId,
    pub owner_kind: EntityKind,
    pub damage: i32,
}

/// Reward data carried by aliens and drones.
#[derive(Clone, Debug, PartialEq)]
pub struct Bounty {
    pub points: u32,
    pub drop_chance: f32,
    pub loot: Vec<Loot>,
}

#[derive(Clone, Debug)]
pub struct Patrol {
    pub start: Vec2,
    pub end: Vec2,
    pub min_interval: f32,
    pub max_interval: f32,
    pub timer: Timer,
}

// ── Entity ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub destroy_mode: DestroyMode,
    pub active: bool,
    pub position: Vec2,
    pub half_extents: Vec2,
    pub on_destroyed: Vec<DestroyHook>,
    pub movement: Option<Movement>,
    pub life: Option<Life>,
    pub shooter: Option<Shooter>,
    pub projectile: Option<ProjectileState>,
    pub bounty: Option<Bounty>,
    pub patrol: Option<Patrol>,
    /// Item carried by a drop.
    pub item: Option<Item>,
}

impl Entity {
    /// Bare entity; the registry assigns the id on spawn.
    pub fn new(kind: EntityKind, position: Vec2, half_extents: Vec2) -> Self {
        Self {
            id: EntityId(0),
            kind,
            destroy_mode: DestroyMode::Destroy,
            active: true,
            position,
            half_extents,
            on_destroyed: Vec::new(),
            movement: None,
            life: None,
            shooter: None,
            projectile: None,
            bounty: None,
            patrol: None,
            item: None,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.position, self.half_extents)
    }

    pub fn is_damageable(&self) -> bool {
        self.life.is_some()
    }

    pub fn with_hook(mut self, hook: DestroyHook) -> Self {
        self.on_destroyed.push(hook);
        self
    }

    fn actor(kind: EntityKind, template: &ActorTemplate, position: Vec2) -> Self {
        let mut entity = Self::new(kind, position, template.half_extents);
        entity.movement = Some(Movement::new(template.speed, template.acceleration));
        entity
    }

    fn ship(kind: EntityKind, template: &ShipTemplate, position: Vec2) -> Self {
        let mut entity = Self::actor(kind, &template.actor, position);
        entity.life = Some(Life::new(template.max_life));
        entity.shooter = Some(Shooter::new(template));
        entity
    }

    pub fn player(template: &ShipTemplate, position: Vec2) -> Self {
        Self::ship(EntityKind::Player, template, position).with_hook(DestroyHook::EndRound)
    }

    pub fn alien(template: &AlienTemplate, position: Vec2) -> Self {
        let mut entity = Self::ship(EntityKind::Alien, &template.ship, position);
        entity.bounty = Some(Bounty::new(template));
        entity.with_hook(DestroyHook::DropLoot)
    }

    /// Drones are deactivated rather than removed so they can return.
    pub fn drone(config: &DroneConfig) -> Self {
        let mut entity = Self::ship(EntityKind::Drone, &config.alien.ship, config.start);
        entity.destroy_mode = DestroyMode::Deactivate;
        entity.bounty = Some(Bounty::new(&config.alien));
        entity.patrol = Some(Patrol {
            start: config.start,
            end: config.end,
            min_interval: config.min_patrol_interval,
            max_interval: config.max_patrol_interval,
            timer: Timer::looping(config.min_patrol_interval),
        });
        entity.with_hook(DestroyHook::DropLoot)
    }

    pub fn projectile(
        template: &ProjectileTemplate,
        position: Vec2,
        owner: EntityId,
        owner_kind: EntityKind,
    ) -> Self {
        let mut entity = Self::actor(EntityKind::Projectile, &template.actor, position);
        entity.projectile = Some(ProjectileState {
            owner,
            owner_kind,
            damage: template.damage,
        });
        entity
    }

    /// Drops fall straight down.
    pub fn drop(template: &ActorTemplate, position: Vec2, item: Item) -> Self {
        let mut entity = Self::actor(EntityKind::Drop, template, position);
        if let Some(movement) = entity.movement.as_mut() {
            movement.direction = Vec2::NEG_Y;
        }
        entity.item = Some(item);
        entity
    }

    pub fn shield(config: &ShieldConfig) -> Self {
        let mut entity = Self::new(EntityKind::Shield, config.position, config.half_extents);
        entity.life = Some(Life::new(config.max_life));
        entity
    }
}

impl Movement {
    pub fn new(speed: f32, acceleration: f32) -> Self {
        Self {
            default_speed: speed,
            default_acceleration: acceleration,
            current_speed: speed,
            current_acceleration: acceleration,
            direction: Vec2::ZERO,
            waypoint: None,
            internal_velocity: Vec2::ZERO,
        }
    }
}

impl Shooter {
    pub fn new(template: &ShipTemplate) -> Self {
        Self {
            cooldown: Timer::new(template.shoot_cooldown),
            projectiles: template.projectiles.clone(),
            default_shoot_speed_multiplier: 1.0,
            current_shoot_speed_multiplier: 1.0,
        }
    }
}

impl Bounty {
    pub fn new(template: &AlienTemplate) -> Self {
        Self {
            points: template.points,
            drop_chance: template.drop_chance,
            loot: template.loot.clone(),
        }
    }
}
