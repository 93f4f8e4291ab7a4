//! The simulation root: owns every entity and runs the game one frame at a
//! time.
//!
//! A host drives the world with two calls. [`World::tick`] runs once per
//! rendered frame and handles input, cooldowns, effects and alien fire.
//! [`World::fixed_tick`] runs at [`GameConfig::fixed_time_step`] and moves
//! actors, then detects and resolves contacts. Everything the host might
//! want to show is queued as a [`GameEvent`] and read with
//! [`World::drain_events`].

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::actor;
use crate::alien::{patrol, restart_patrol, roll_loot};
use crate::collision::{self, Contact};
use crate::config::GameConfig;
use crate::effects::ActiveEffects;
use crate::entities::{DestroyHook, Entity, EntityId, EntityKind};
use crate::error::ConfigResult;
use crate::events::GameEvent;
use crate::level::{BoundaryOutcome, FormationChange, Level, LevelState};
use crate::life::{Life, LifeChanged};
use crate::math::Aabb;
use crate::projectile;
use crate::registry::{Destroyed, Registry};
use crate::ship::{self, DamageOutcome};

/// Player intent for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerInput {
    /// Horizontal axis in `[-1, 1]`.
    pub axis: f32,
    pub shoot: bool,
    /// Edge-triggered: true only on the frame the pause key went down.
    pub pause: bool,
}

#[derive(Debug)]
pub struct World {
    config: GameConfig,
    arena: Aabb,
    registry: Registry,
    level: Level,
    player: EntityId,
    drones: Vec<EntityId>,
    effects: ActiveEffects,
    score: u32,
    paused: bool,
    rng: StdRng,
    events: Vec<GameEvent>,
}

impl World {
    /// Validates `config`, spawns the player, shields and drones, and
    /// generates the first wave.
    pub fn new(config: GameConfig, seed: u64) -> ConfigResult<Self> {
        config.validate()?;

        let mut rng = StdRng::seed_from_u64(seed);
        let mut registry = Registry::new();
        let player = registry.spawn(Entity::player(&config.player.ship, config.player.position));
        for shield in &config.shields {
            registry.spawn(Entity::shield(shield));
        }
        let mut drones = Vec::with_capacity(config.drones.len());
        for drone in &config.drones {
            let mut entity = Entity::drone(drone);
            restart_patrol(&mut entity, &mut rng);
            drones.push(registry.spawn(entity));
        }

        let mut level = Level::new(config.formation.clone(), config.difficulty.clone());
        let report = level.generate(&mut registry, &mut rng);
        let arena = Aabb::new(Vec2::ZERO, config.arena.half_extents());
        info!(seed, entities = registry.len(), "world created");

        Ok(Self {
            config,
            arena,
            registry,
            level,
            player,
            drones,
            effects: ActiveEffects::new(),
            score: 0,
            paused: false,
            rng,
            events: vec![GameEvent::WaveGenerated(report)],
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn arena(&self) -> &Aabb {
        &self.arena
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn player(&self) -> EntityId {
        self.player
    }

    /// The player entity, while it is alive.
    pub fn player_entity(&self) -> Option<&Entity> {
        self.registry.get_active(self.player)
    }

    pub fn effects(&self) -> &ActiveEffects {
        &self.effects
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_over(&self) -> bool {
        self.level.state() == LevelState::Terminal
    }

    /// Takes every event queued since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Frame update ──────────────────────────────────────────────────────────

    /// Per-frame update.
    pub fn tick(&mut self, delta: f32, input: &PlayerInput) {
        if input.pause && !self.is_over() {
            self.paused = !self.paused;
            info!(paused = self.paused, "pause toggled");
            self.events.push(GameEvent::Paused(self.paused));
        }
        if self.paused || self.is_over() {
            return;
        }

        for entity in self.registry.iter_active_mut() {
            ship::tick_cooldown(entity, delta);
        }

        if let Some(player) = self.registry.get_active_mut(self.player) {
            player.set_direction(Vec2::new(input.axis.clamp(-1.0, 1.0), 0.0));
        }
        if input.shoot {
            ship::shoot(&mut self.registry, self.player, Vec2::Y, &mut self.rng);
        }

        if let Some(player) = self.registry.get_active_mut(self.player) {
            for effect in self.effects.update(delta, player) {
                self.events.push(GameEvent::EffectExpired {
                    effect: effect.name(),
                });
            }
        }

        self.level.tick(&mut self.registry, &mut self.rng, delta);
    }

    /// Fixed-rate physics update.
    pub fn fixed_tick(&mut self, delta: f32) {
        if self.paused || self.is_over() {
            return;
        }

        for entity in self.registry.iter_active_mut() {
            actor::step(entity, delta);
            patrol(entity, delta, &mut self.rng);
        }
        self.keep_player_inside();

        for contact in collision::detect(&self.registry, &self.arena) {
            self.resolve_contact(contact);
        }
    }

    fn keep_player_inside(&mut self) {
        let limit = self.arena.half_extents;
        if let Some(player) = self.registry.get_active_mut(self.player) {
            let reach = (limit - player.half_extents).max(Vec2::ZERO);
            player.position = player.position.clamp(-reach, reach);
        }
    }

    // ── Contacts ──────────────────────────────────────────────────────────────

    /// Applies the game rules to one contact. Contacts naming entities that
    /// are already gone are ignored, so a stale list is harmless.
    pub fn resolve_contact(&mut self, contact: Contact) {
        if self.is_over() {
            return;
        }
        match contact {
            Contact::Entities(a, b) => self.resolve_pair(a, b),
            Contact::Boundary { entity, normal } => self.resolve_boundary(entity, normal),
        }
    }

    fn resolve_pair(&mut self, a: EntityId, b: EntityId) {
        let (Some(kind_a), Some(kind_b)) = (
            self.registry.get_active(a).map(|e| e.kind),
            self.registry.get_active(b).map(|e| e.kind),
        ) else {
            return;
        };

        match (kind_a, kind_b) {
            (EntityKind::Projectile, _) | (_, EntityKind::Projectile) => {
                if kind_a == EntityKind::Projectile {
                    self.resolve_projectile(a, Some(b));
                }
                if kind_b == EntityKind::Projectile {
                    self.resolve_projectile(b, Some(a));
                }
            }
            (EntityKind::Drop, EntityKind::Player) => self.collect(a),
            (EntityKind::Player, EntityKind::Drop) => self.collect(b),
            (EntityKind::Player | EntityKind::Shield, other) if other.is_hostile() => {
                self.destroy(a);
            }
            (other, EntityKind::Player | EntityKind::Shield) if other.is_hostile() => {
                self.destroy(b);
            }
            _ => {}
        }
    }

    fn resolve_boundary(&mut self, entity: EntityId, normal: Vec2) {
        match self.registry.get_active(entity).map(|e| e.kind) {
            Some(EntityKind::Alien) => {
                match self
                    .level
                    .on_boundary_contact(&mut self.registry, entity, normal)
                {
                    BoundaryOutcome::Reversed(heading) => {
                        self.events.push(GameEvent::DirectionReversed(heading));
                    }
                    BoundaryOutcome::ReachedEdge => self.destroy(self.player),
                    BoundaryOutcome::Ignored => {}
                }
            }
            Some(EntityKind::Projectile) => self.resolve_projectile(entity, None),
            Some(EntityKind::Drop) => self.destroy(entity),
            _ => {}
        }
    }

    fn resolve_projectile(&mut self, projectile: EntityId, other: Option<EntityId>) {
        let Some(impact) = projectile::resolve(&mut self.registry, projectile, other) else {
            return;
        };
        if let Some(hit) = impact.hit {
            self.on_target_hit(impact.owner, hit);
        }
        if let Some(spent) = impact.spent {
            self.handle_destroyed(spent);
        }
    }

    /// Scores a hit by the player that emptied a hostile's life, then runs
    /// the target's destruction.
    fn on_target_hit(&mut self, owner: EntityId, hit: DamageOutcome) {
        self.push_life(hit.target, hit.life);
        let Some(destroyed) = hit.destroyed else {
            return;
        };
        if owner == self.player && destroyed.kind.is_hostile() {
            if let Some(bounty) = &destroyed.bounty {
                self.score += bounty.points;
                debug!(target = %hit.target, points = bounty.points, score = self.score, "scored");
                self.events.push(GameEvent::ScoreChanged { score: self.score });
            }
        }
        self.handle_destroyed(destroyed);
    }

    /// The player picks up a drop and every effect of its item is applied.
    fn collect(&mut self, drop: EntityId) {
        let Some(item) = self.registry.get_active(drop).and_then(|e| e.item.clone()) else {
            return;
        };
        self.destroy(drop);

        let Some(player) = self.registry.get_active_mut(self.player) else {
            return;
        };
        let mut changes = Vec::new();
        for effect in item.effects {
            if let Some(changed) = self.effects.apply(effect, player) {
                changes.push(changed);
            }
        }
        for changed in changes {
            self.push_life(self.player, changed);
        }
        info!(item = %item.name, "item collected");
        self.events.push(GameEvent::ItemCollected { item: item.name });
    }

    // ── Destruction ───────────────────────────────────────────────────────────

    fn destroy(&mut self, id: EntityId) {
        if let Some(destroyed) = self.registry.destroy(id) {
            self.handle_destroyed(destroyed);
        }
    }

    fn handle_destroyed(&mut self, destroyed: Destroyed) {
        self.events.push(GameEvent::Destroyed {
            entity: destroyed.id,
            kind: destroyed.kind,
            position: destroyed.position,
        });

        for hook in &destroyed.hooks {
            match hook {
                DestroyHook::Formation => self.formation_member_lost(destroyed.id),
                DestroyHook::DropLoot => {
                    let item = destroyed
                        .bounty
                        .as_ref()
                        .and_then(|bounty| roll_loot(bounty, &mut self.rng));
                    if let Some(item) = item {
                        debug!(item = %item.name, from = %destroyed.id, "loot dropped");
                        let pickup = Entity::drop(&self.config.drop, destroyed.position, item);
                        self.registry.spawn(pickup);
                    }
                }
                DestroyHook::EndRound => {
                    self.level.game_over();
                    self.events.push(GameEvent::GameOver {
                        score: self.score,
                        level: self.level.level(),
                    });
                }
            }
        }
    }

    fn formation_member_lost(&mut self, alien: EntityId) {
        let change = self
            .level
            .on_alien_destroyed(&mut self.registry, &mut self.rng, alien);
        if let FormationChange::Cleared(report) = change {
            self.events.push(GameEvent::LevelAdvanced {
                level: report.level,
            });
            self.events.push(GameEvent::WaveGenerated(report));
            self.restore_drones();
        }
    }

    /// Brings every downed drone back at full life for the new wave.
    fn restore_drones(&mut self) {
        for id in self.drones.clone() {
            if !self.registry.reactivate(id) {
                continue;
            }
            let Some(drone) = self.registry.get_mut(id) else {
                continue;
            };
            restart_patrol(drone, &mut self.rng);
            let refilled = drone.life.as_mut().map(Life::maximize);
            if let Some(changed) = refilled {
                self.push_life(id, changed);
            }
        }
    }

    fn push_life(&mut self, entity: EntityId, changed: LifeChanged) {
        self.events.push(GameEvent::LifeChanged {
            entity,
            value: changed.value,
            max_value: changed.max_value,
        });
    }

    /// Drops every entity and active effect. The world is unusable for play
    /// afterwards; build a new one to restart.
    pub fn dispose(&mut self) {
        debug!(entities = self.registry.len(), "world disposed");
        self.registry.clear();
        self.effects.clear();
        self.drones.clear();
        self.events.clear();
        self.level.game_over();
    }
}
