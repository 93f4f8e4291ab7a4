use approx::assert_relative_eq;
use glam::Vec2;
use space_insiders::collision::Contact;
use space_insiders::config::GameConfig;
use space_insiders::difficulty::Range;
use space_insiders::effects::{Effect, EffectKind};
use space_insiders::entities::{EntityId, EntityKind, Item, Loot};
use space_insiders::level::Heading;
use space_insiders::{ConfigError, GameEvent, PlayerInput, World};

const STEP: f32 = 0.02;

/// A single all-but-stationary alien at `alien_at`, no drones or shields, aliens that
/// never fire and a player that can shoot every frame.
fn lone_alien(alien_at: Vec2) -> GameConfig {
    let mut config = GameConfig::default();
    config.formation.rows.truncate(1);
    config.formation.columns = 1;
    config.formation.offset = alien_at;
    config.formation.rows[0].drop_chance = 0.0;
    config.difficulty.spawn_chance = Range::new(1.0, 0.0);
    config.difficulty.alien_speed = Range::new(1e-3, 0.0);
    config.difficulty.shoot_cooldown = Range::new(100.0, 0.0);
    config.player.ship.shoot_cooldown = 0.0;
    config.drones.clear();
    config.shields.clear();
    config
}

fn idle() -> PlayerInput {
    PlayerInput::default()
}

fn shoot() -> PlayerInput {
    PlayerInput {
        shoot: true,
        ..PlayerInput::default()
    }
}

fn pause() -> PlayerInput {
    PlayerInput {
        pause: true,
        ..PlayerInput::default()
    }
}

fn run_fixed(world: &mut World, steps: usize, events: &mut Vec<GameEvent>) {
    for _ in 0..steps {
        world.fixed_tick(STEP);
        events.extend(world.drain_events());
    }
}

fn first_of(world: &World, kind: EntityKind) -> EntityId {
    world
        .registry()
        .iter()
        .find(|e| e.kind == kind)
        .map(|e| e.id)
        .unwrap()
}

// ── Setup ─────────────────────────────────────────────────────────────────────

#[test]
fn new_world_generates_the_first_wave() {
    let mut world = World::new(lone_alien(Vec2::ZERO), 7).unwrap();
    let events = world.drain_events();
    assert_eq!(events.len(), 1);
    let GameEvent::WaveGenerated(report) = &events[0] else {
        panic!("unexpected {events:?}");
    };
    assert_eq!(report.level, 1);
    assert_eq!(report.spawned, 1);
    assert_eq!(world.registry().len(), 2);
    assert!(world.drain_events().is_empty());
}

#[test]
fn default_world_has_shields_and_a_drone() {
    let world = World::new(GameConfig::default(), 1).unwrap();
    let count = |kind| world.registry().iter_active().filter(|e| e.kind == kind).count();
    assert_eq!(count(EntityKind::Player), 1);
    assert_eq!(count(EntityKind::Shield), 4);
    assert_eq!(count(EntityKind::Drone), 1);
    assert!(count(EntityKind::Alien) >= 1);
    assert_eq!(world.score(), 0);
    assert!(!world.is_over());
}

#[test]
fn invalid_config_is_refused() {
    let config = GameConfig {
        fixed_time_step: 0.0,
        ..GameConfig::default()
    };
    assert!(matches!(
        World::new(config, 1),
        Err(ConfigError::OutOfRange { .. })
    ));
}

#[test]
fn same_seed_same_game() {
    let layout = |seed| {
        let world = World::new(GameConfig::default(), seed).unwrap();
        world
            .registry()
            .iter()
            .map(|e| (e.kind, e.position))
            .collect::<Vec<_>>()
    };
    assert_eq!(layout(99), layout(99));
}

// ── Scoring and waves ─────────────────────────────────────────────────────────

#[test]
fn shooting_the_last_alien_scores_and_starts_the_next_wave() {
    let mut world = World::new(lone_alien(Vec2::ZERO), 7).unwrap();
    world.drain_events();

    world.tick(0.01, &shoot());
    let mut events = world.drain_events();
    run_fixed(&mut world, 100, &mut events);

    assert_eq!(world.score(), 10);
    assert_eq!(world.level().level(), 2);
    assert!(events.contains(&GameEvent::ScoreChanged { score: 10 }));
    assert!(events.contains(&GameEvent::LevelAdvanced { level: 2 }));
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::WaveGenerated(r) if r.level == 2)));
    // The fresh wave is back in place and the shot is gone.
    assert_eq!(world.level().aliens().len(), 1);
    assert!(!world
        .registry()
        .iter()
        .any(|e| e.kind == EntityKind::Projectile));
}

#[test]
fn downed_drone_returns_with_the_next_wave() {
    let mut config = lone_alien(Vec2::new(3.0, 0.0));
    let mut drone = GameConfig::default().drones.remove(0);
    drone.alien.drop_chance = 0.0;
    drone.start = Vec2::new(0.0, 5.4);
    drone.end = drone.start;
    drone.min_patrol_interval = 100.0;
    drone.max_patrol_interval = 100.0;
    config.drones.push(drone);

    let mut world = World::new(config, 7).unwrap();
    let drone = first_of(&world, EntityKind::Drone);
    let mut events = world.drain_events();

    // Two shots straight up take the drone's two lives.
    world.tick(0.01, &shoot());
    world.tick(0.01, &shoot());
    run_fixed(&mut world, 60, &mut events);
    assert_eq!(world.score(), 150);
    assert!(world.registry().get_active(drone).is_none());

    // Slide under the alien and fire once on the way.
    let mut fired = false;
    for _ in 0..200 {
        let x = world.player_entity().unwrap().position.x;
        let input = PlayerInput {
            axis: if fired { 0.0 } else { 1.0 },
            shoot: !fired && x >= 2.8,
            pause: false,
        };
        fired |= input.shoot;
        world.tick(STEP, &input);
        run_fixed(&mut world, 1, &mut events);
        if world.level().level() == 2 {
            break;
        }
    }

    assert_eq!(world.level().level(), 2);
    assert_eq!(world.score(), 160);
    let drone = world.registry().get_active(drone).unwrap();
    assert_eq!(drone.position, Vec2::new(0.0, 5.4));
    assert_eq!(drone.life.as_ref().unwrap().value(), 2);
}

// ── Formation ─────────────────────────────────────────────────────────────────

#[test]
fn formation_turns_at_the_wall_and_steps_down() {
    let mut config = lone_alien(Vec2::new(7.5, 0.0));
    config.difficulty.alien_speed = Range::new(1.0, 0.0);
    let mut world = World::new(config, 7).unwrap();
    let alien = world.level().aliens()[0];
    let mut events = Vec::new();

    run_fixed(&mut world, 100, &mut events);

    let reversals: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, GameEvent::DirectionReversed(_)))
        .collect();
    assert_eq!(reversals, vec![&GameEvent::DirectionReversed(Heading::Left)]);
    assert_eq!(world.level().heading(), Heading::Left);

    let position = world.registry().get(alien).unwrap().position;
    assert_relative_eq!(position.y, -0.5);
    assert!(position.x < 7.5);
}

#[test]
fn alien_at_the_bottom_ends_the_game() {
    let mut config = lone_alien(Vec2::new(0.0, -5.9));
    config.player.position = Vec2::new(5.0, -5.0);
    let mut world = World::new(config, 7).unwrap();
    let mut events = world.drain_events();

    run_fixed(&mut world, 1, &mut events);
    assert!(world.is_over());
    assert!(events.contains(&GameEvent::GameOver { score: 0, level: 1 }));
}

// ── Contacts ──────────────────────────────────────────────────────────────────

#[test]
fn touching_an_alien_destroys_the_player() {
    let mut world = World::new(lone_alien(Vec2::new(0.0, -5.0)), 7).unwrap();
    let player = world.player();
    let mut events = world.drain_events();

    run_fixed(&mut world, 1, &mut events);

    assert!(world.is_over());
    assert!(world.player_entity().is_none());
    assert!(events.contains(&GameEvent::GameOver { score: 0, level: 1 }));
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::Destroyed { entity, kind: EntityKind::Player, .. } if *entity == player
    )));

    // Nothing moves any more, and pausing is refused.
    world.tick(STEP, &pause());
    run_fixed(&mut world, 10, &mut events);
    assert!(!world.is_paused());
    assert_eq!(
        events.iter().filter(|e| matches!(e, GameEvent::GameOver { .. })).count(),
        1
    );
}

#[test]
fn aliens_wreck_shields_they_touch() {
    let mut config = lone_alien(Vec2::new(-5.25, -3.5));
    config.shields = GameConfig::default().shields;
    let mut world = World::new(config, 7).unwrap();
    let shield = first_of(&world, EntityKind::Shield);
    let mut events = world.drain_events();

    run_fixed(&mut world, 1, &mut events);
    assert!(!world.registry().contains(shield));
    assert!(!world.is_over());
}

#[test]
fn collected_drop_applies_its_item() {
    let mut config = lone_alien(Vec2::ZERO);
    config.formation.rows[0].drop_chance = 1.0;
    config.formation.rows[0].loot = vec![Loot {
        item: Item {
            name: "Medkit".to_string(),
            effects: vec![
                Effect::new(
                    1.0,
                    EffectKind::Haste {
                        speed_multiplier: 1.5,
                        acceleration_multiplier: 1.5,
                    },
                ),
                Effect::new(0.0, EffectKind::Restoration { life: 1 }),
            ],
        },
        weight: 1.0,
    }];
    let mut world = World::new(config, 7).unwrap();
    let player = world.player();
    world.drain_events();

    world.tick(0.01, &shoot());
    let mut events = world.drain_events();
    run_fixed(&mut world, 200, &mut events);

    assert!(events.contains(&GameEvent::ItemCollected {
        item: "Medkit".to_string()
    }));
    assert!(events.contains(&GameEvent::LifeChanged {
        entity: player,
        value: 3,
        max_value: 3,
    }));
    assert_eq!(world.effects().len(), 1);
    assert!(!world.registry().iter().any(|e| e.kind == EntityKind::Drop));

    world.tick(1.0, &idle());
    assert!(world
        .drain_events()
        .contains(&GameEvent::EffectExpired { effect: "haste" }));
    assert!(world.effects().is_empty());
}

#[test]
fn stale_contacts_are_ignored() {
    let mut world = World::new(lone_alien(Vec2::ZERO), 7).unwrap();
    world.drain_events();
    world.resolve_contact(Contact::Entities(EntityId(500), EntityId(501)));
    world.resolve_contact(Contact::Boundary {
        entity: EntityId(500),
        normal: Vec2::X,
    });
    assert!(world.drain_events().is_empty());
}

// ── Pause and lifecycle ───────────────────────────────────────────────────────

#[test]
fn pause_freezes_the_simulation() {
    let mut world = World::new(lone_alien(Vec2::ZERO), 7).unwrap();
    world.drain_events();
    let start = world.player_entity().unwrap().position;

    world.tick(STEP, &pause());
    assert!(world.is_paused());
    assert_eq!(world.drain_events(), vec![GameEvent::Paused(true)]);

    let right = PlayerInput {
        axis: 1.0,
        ..PlayerInput::default()
    };
    for _ in 0..20 {
        world.tick(STEP, &right);
        world.fixed_tick(STEP);
    }
    assert_eq!(world.player_entity().unwrap().position, start);

    world.tick(STEP, &pause());
    assert!(!world.is_paused());
    assert_eq!(world.drain_events(), vec![GameEvent::Paused(false)]);

    for _ in 0..20 {
        world.tick(STEP, &right);
        world.fixed_tick(STEP);
    }
    assert!(world.player_entity().unwrap().position.x > start.x);
}

#[test]
fn player_stays_inside_the_arena() {
    let mut world = World::new(lone_alien(Vec2::new(0.0, 3.0)), 7).unwrap();
    let left = PlayerInput {
        axis: -1.0,
        ..PlayerInput::default()
    };
    for _ in 0..300 {
        world.tick(STEP, &left);
        world.fixed_tick(STEP);
    }
    assert_relative_eq!(world.player_entity().unwrap().position.x, -7.6);
}

#[test]
fn dispose_empties_the_world() {
    let mut world = World::new(GameConfig::default(), 3).unwrap();
    world.dispose();
    assert!(world.registry().is_empty());
    assert!(world.drain_events().is_empty());
}

#[test]
fn long_default_game_keeps_its_books_straight() {
    let mut world = World::new(GameConfig::default(), 2024).unwrap();
    let mut events = Vec::new();
    for frame in 0..3000_u32 {
        let input = PlayerInput {
            axis: if (frame / 60) % 2 == 0 { 1.0 } else { -1.0 },
            shoot: true,
            pause: false,
        };
        world.tick(STEP, &input);
        world.fixed_tick(STEP);
        events.extend(world.drain_events());
    }

    assert_eq!(world.score() % 10, 0);
    let last_score = events.iter().rev().find_map(|e| match e {
        GameEvent::ScoreChanged { score } => Some(*score),
        _ => None,
    });
    assert_eq!(last_score.unwrap_or(0), world.score());
    let game_overs = events
        .iter()
        .filter(|e| matches!(e, GameEvent::GameOver { .. }))
        .count();
    assert_eq!(game_overs, usize::from(world.is_over()));
}
