//! The level orchestrator: alien waves, formation movement and difficulty.
//!
//! State machine:
//!
//! ```text
//! Generating --generate--> Active --last alien destroyed--> Generating (level + 1)
//!                          Active --player destroyed / edge reached--> Terminal
//! ```
//!
//! All tuning is recomputed from the level counter through
//! [`LevelParameters`] whenever the counter changes; nothing is cached.

use glam::Vec2;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::FormationConfig;
use crate::difficulty::LevelParameters;
use crate::entities::{DestroyHook, Entity, EntityId};
use crate::life::Life;
use crate::registry::Registry;
use crate::ship;
use crate::timer::Timer;

/// Waves that roll zero aliens are re-rolled this many times before one
/// alien is placed in a random cell.
pub const MAX_GENERATION_ATTEMPTS: u32 = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelState {
    Generating,
    Active,
    Terminal,
}

/// Horizontal heading shared by the whole formation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Heading {
    Left,
    Right,
}

impl Heading {
    pub fn vector(self) -> Vec2 {
        match self {
            Heading::Left => Vec2::NEG_X,
            Heading::Right => Vec2::X,
        }
    }
}

/// Result of an alien touching the arena boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundaryOutcome {
    /// Not a formation member, already heading this way, or level over.
    Ignored,
    /// The formation turned around and stepped down.
    Reversed(Heading),
    /// An alien reached the top or bottom edge; the round is lost.
    ReachedEdge,
}

/// Result of a formation member being destroyed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FormationChange {
    NotMember,
    /// Survivors sped up by `speed_delta`.
    Thinned { remaining: usize, speed_delta: f32 },
    /// The wave was cleared and the next one generated.
    Cleared(WaveReport),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaveReport {
    pub level: u32,
    pub spawned: usize,
    pub attempts: u32,
}

#[derive(Debug)]
pub struct Level {
    formation: FormationConfig,
    parameters: LevelParameters,
    level: u32,
    state: LevelState,
    aliens: Vec<EntityId>,
    heading: Heading,
    shoot_timer: Timer,
}

impl Level {
    pub fn new(formation: FormationConfig, parameters: LevelParameters) -> Self {
        let shoot_timer = Timer::looping(parameters.shoot_cooldown(1));
        Self {
            formation,
            parameters,
            level: 1,
            state: LevelState::Generating,
            aliens: Vec::new(),
            heading: Heading::Right,
            shoot_timer,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn state(&self) -> LevelState {
        self.state
    }

    pub fn heading(&self) -> Heading {
        self.heading
    }

    /// Live formation members in spawn order.
    pub fn aliens(&self) -> &[EntityId] {
        &self.aliens
    }

    pub fn parameters(&self) -> &LevelParameters {
        &self.parameters
    }

    pub fn shoot_timer(&self) -> &Timer {
        &self.shoot_timer
    }

    pub fn is_member(&self, id: EntityId) -> bool {
        self.aliens.contains(&id)
    }

    // ── Generation ────────────────────────────────────────────────────────────

    /// Spawns a new wave for the current level.
    ///
    /// Each formation cell rolls the level's spawn chance. A wave that rolls
    /// empty is retried up to [`MAX_GENERATION_ATTEMPTS`] times; after that a
    /// single alien is placed in a random cell so the wave is never empty.
    /// A formation without cells yields an empty wave.
    pub fn generate(&mut self, registry: &mut Registry, rng: &mut impl Rng) -> WaveReport {
        self.state = LevelState::Generating;
        self.aliens.clear();
        self.heading = Heading::Right;
        self.shoot_timer = Timer::looping(self.parameters.shoot_cooldown(self.level));

        if self.formation.cell_count() == 0 {
            warn!(level = self.level, "formation has no cells, wave left empty");
            self.state = LevelState::Active;
            return WaveReport {
                level: self.level,
                spawned: 0,
                attempts: 0,
            };
        }

        let chance = self.parameters.spawn_chance(self.level);
        let mut attempts = 0;
        while self.aliens.is_empty() && attempts < MAX_GENERATION_ATTEMPTS {
            attempts += 1;
            for row in 0..self.formation.rows.len() {
                for column in 0..self.formation.columns {
                    if rng.gen::<f32>() < chance {
                        self.spawn_alien(registry, column, row);
                    }
                }
            }
        }

        if self.aliens.is_empty() {
            let cell = rng.gen_range(0..self.formation.cell_count());
            let (row, column) = (cell / self.formation.columns, cell % self.formation.columns);
            warn!(
                level = self.level,
                chance, attempts, "every generation attempt was empty, forcing one alien"
            );
            self.spawn_alien(registry, column, row);
        }

        self.state = LevelState::Active;
        let report = WaveReport {
            level: self.level,
            spawned: self.aliens.len(),
            attempts,
        };
        info!(level = report.level, aliens = report.spawned, attempts, "wave generated");
        report
    }

    fn spawn_alien(&mut self, registry: &mut Registry, column: usize, row: usize) {
        let Some(template) = self.formation.rows.get(row) else {
            return;
        };
        let position = self.formation.cell_position(column, row);
        let mut alien = Entity::alien(template, position).with_hook(DestroyHook::Formation);

        let speed = self.parameters.alien_speed(self.level);
        if let Some(movement) = alien.movement.as_mut() {
            movement.default_speed = speed;
            movement.restore_defaults();
            movement.direction = self.heading.vector();
        }
        if let Some(life) = alien.life.as_mut() {
            let scaled = template.ship.max_life as f32 * self.parameters.life_multiplier(self.level);
            *life = Life::new((scaled.round() as i32).max(1));
        }

        let id = registry.spawn(alien);
        self.aliens.push(id);
    }

    // ── Formation movement ────────────────────────────────────────────────────

    /// Handles a formation alien touching the arena boundary.
    ///
    /// `normal` points from the boundary back into the arena. A side contact
    /// whose normal differs from the current heading turns the formation that
    /// way and queues one downward step for every alien; a contact matching
    /// the heading has already been handled and is ignored. A contact on the
    /// top or bottom edge loses the round.
    pub fn on_boundary_contact(
        &mut self,
        registry: &mut Registry,
        alien: EntityId,
        normal: Vec2,
    ) -> BoundaryOutcome {
        if self.state != LevelState::Active || !self.is_member(alien) {
            return BoundaryOutcome::Ignored;
        }

        if normal.y.abs() > normal.x.abs() {
            info!(level = self.level, %alien, "formation reached the edge");
            self.state = LevelState::Terminal;
            return BoundaryOutcome::ReachedEdge;
        }

        let heading = if normal.x < 0.0 {
            Heading::Left
        } else {
            Heading::Right
        };
        if heading == self.heading {
            return BoundaryOutcome::Ignored;
        }

        self.heading = heading;
        let step = Vec2::NEG_Y * self.formation.vertical_step;
        for id in &self.aliens {
            if let Some(member) = registry.get_active_mut(*id) {
                member.set_direction(heading.vector());
                member.move_by(step);
            }
        }
        debug!(?heading, %alien, "formation reversed");
        BoundaryOutcome::Reversed(heading)
    }

    /// Removes a destroyed alien from the formation.
    ///
    /// The last one clears the wave: the level counter goes up and the next
    /// wave is generated. Otherwise every survivor speeds up.
    pub fn on_alien_destroyed(
        &mut self,
        registry: &mut Registry,
        rng: &mut impl Rng,
        alien: EntityId,
    ) -> FormationChange {
        let Some(index) = self.aliens.iter().position(|id| *id == alien) else {
            return FormationChange::NotMember;
        };
        self.aliens.remove(index);

        if self.state == LevelState::Terminal {
            return FormationChange::Thinned {
                remaining: self.aliens.len(),
                speed_delta: 0.0,
            };
        }

        if self.aliens.is_empty() {
            self.level += 1;
            info!(level = self.level, "wave cleared");
            return FormationChange::Cleared(self.generate(registry, rng));
        }

        let speed_delta = self.parameters.speed_delta(self.level);
        for id in &self.aliens {
            if let Some(movement) = registry.get_mut(*id).and_then(|e| e.movement.as_mut()) {
                movement.default_speed += speed_delta;
            }
        }
        FormationChange::Thinned {
            remaining: self.aliens.len(),
            speed_delta,
        }
    }

    // ── Shooting ──────────────────────────────────────────────────────────────

    /// Runs the shared shoot timer and, each time it elapses, makes a random
    /// formation alien fire downward. Returns the spawned projectile.
    pub fn tick(
        &mut self,
        registry: &mut Registry,
        rng: &mut impl Rng,
        delta: f32,
    ) -> Option<EntityId> {
        if self.state != LevelState::Active {
            return None;
        }
        if !self.shoot_timer.run(delta) || self.aliens.is_empty() {
            return None;
        }
        let shooter = self.aliens[rng.gen_range(0..self.aliens.len())];
        ship::shoot(registry, shooter, Vec2::NEG_Y, rng)
    }

    /// The player died; nothing else happens in this level.
    pub fn game_over(&mut self) {
        if self.state != LevelState::Terminal {
            info!(level = self.level, "game over");
        }
        self.state = LevelState::Terminal;
    }
}
