use approx::assert_relative_eq;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use space_insiders::config::GameConfig;
use space_insiders::entities::{DestroyHook, Entity, EntityKind};
use space_insiders::registry::Registry;
use space_insiders::ship;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn spawn_player(registry: &mut Registry) -> space_insiders::EntityId {
    let config = GameConfig::default();
    registry.spawn(Entity::player(&config.player.ship, Vec2::new(0.0, -5.0)))
}

// ── Damage ────────────────────────────────────────────────────────────────────

#[test]
fn damage_reduces_life_then_destroys_once() {
    let mut registry = Registry::new();
    let player = spawn_player(&mut registry);

    let first = ship::take_damage(&mut registry, player, 1).unwrap();
    assert_eq!(first.life.value, 2);
    assert!(first.destroyed.is_none());
    assert!(registry.contains(player));

    let second = ship::take_damage(&mut registry, player, 2).unwrap();
    assert_eq!(second.life.value, 0);
    let destroyed = second.destroyed.unwrap();
    assert_eq!(destroyed.id, player);
    assert_eq!(destroyed.kind, EntityKind::Player);
    assert_eq!(destroyed.hooks, vec![DestroyHook::EndRound]);

    // Gone: further damage finds nothing to hit.
    assert!(ship::take_damage(&mut registry, player, 1).is_none());
    assert!(!registry.contains(player));
}

#[test]
fn damage_ignores_lifeless_entities() {
    let mut registry = Registry::new();
    let id = registry.spawn(Entity::new(EntityKind::Drop, Vec2::ZERO, Vec2::ONE));
    assert!(ship::take_damage(&mut registry, id, 5).is_none());
    assert!(registry.contains(id));
}

// ── Shooting ──────────────────────────────────────────────────────────────────

#[test]
fn shooting_waits_for_the_cooldown() {
    let mut registry = Registry::new();
    let mut rng = seeded_rng();
    let player = spawn_player(&mut registry);

    // Cooldown of 0.4 s has not run yet.
    assert!(ship::shoot(&mut registry, player, Vec2::Y, &mut rng).is_none());

    ship::tick_cooldown(registry.get_mut(player).unwrap(), 0.4);
    let shot = ship::shoot(&mut registry, player, Vec2::Y, &mut rng).unwrap();
    assert!(ship::shoot(&mut registry, player, Vec2::Y, &mut rng).is_none());

    let projectile = registry.get(shot).unwrap();
    assert_eq!(projectile.kind, EntityKind::Projectile);
    let state = projectile.projectile.unwrap();
    assert_eq!(state.owner, player);
    assert_eq!(state.owner_kind, EntityKind::Player);
    assert_eq!(state.damage, 1);
    assert_eq!(projectile.movement.as_ref().unwrap().direction, Vec2::Y);
}

#[test]
fn projectile_spawns_clear_of_the_shooter() {
    let mut registry = Registry::new();
    let mut rng = seeded_rng();
    let player = spawn_player(&mut registry);
    ship::tick_cooldown(registry.get_mut(player).unwrap(), 1.0);

    let shot = ship::shoot(&mut registry, player, Vec2::Y, &mut rng).unwrap();
    // Player collider is 0.8 x 0.6; the larger side is the offset.
    let position = registry.get(shot).unwrap().position;
    assert_relative_eq!(position.x, 0.0);
    assert_relative_eq!(position.y, -4.2, epsilon = 1e-5);
}

#[test]
fn shoot_multiplier_speeds_up_the_cooldown_for_one_tick() {
    let mut registry = Registry::new();
    let player = spawn_player(&mut registry);
    let entity = registry.get_mut(player).unwrap();

    entity.shooter.as_mut().unwrap().current_shoot_speed_multiplier = 2.0;
    ship::tick_cooldown(entity, 0.2);
    assert!(ship::can_shoot(entity));
    assert_eq!(
        entity.shooter.as_ref().unwrap().current_shoot_speed_multiplier,
        1.0
    );
}

#[test]
fn inactive_ships_cannot_shoot() {
    let mut registry = Registry::new();
    let mut rng = seeded_rng();
    let config = GameConfig::default();
    let drone = registry.spawn(Entity::drone(&config.drones[0]));
    registry.destroy(drone).unwrap();
    assert!(ship::shoot(&mut registry, drone, Vec2::NEG_Y, &mut rng).is_none());
}
