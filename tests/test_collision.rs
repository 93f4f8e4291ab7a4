use glam::Vec2;
use space_insiders::collision::{self, Contact};
use space_insiders::config::GameConfig;
use space_insiders::entities::{Entity, EntityKind};
use space_insiders::math::Aabb;
use space_insiders::registry::Registry;

fn arena() -> Aabb {
    Aabb::new(Vec2::ZERO, Vec2::new(8.0, 6.0))
}

#[test]
fn overlapping_shot_and_alien_make_one_contact() {
    let config = GameConfig::default();
    let mut registry = Registry::new();
    let player = registry.spawn(Entity::player(&config.player.ship, Vec2::new(0.0, -5.0)));
    let alien = registry.spawn(Entity::alien(&config.formation.rows[0], Vec2::ZERO));
    let shot = registry.spawn(Entity::projectile(
        &config.player.ship.projectiles[0],
        Vec2::new(0.1, -0.2),
        player,
        EntityKind::Player,
    ));

    let contacts = collision::detect(&registry, &arena());
    assert_eq!(contacts, vec![Contact::Entities(alien, shot)]);
}

#[test]
fn shot_does_not_touch_its_owner() {
    let config = GameConfig::default();
    let mut registry = Registry::new();
    let player = registry.spawn(Entity::player(&config.player.ship, Vec2::ZERO));
    registry.spawn(Entity::projectile(
        &config.player.ship.projectiles[0],
        Vec2::ZERO,
        player,
        EntityKind::Player,
    ));
    assert!(collision::detect(&registry, &arena()).is_empty());
}

#[test]
fn aliens_do_not_collide_with_each_other() {
    let config = GameConfig::default();
    let mut registry = Registry::new();
    registry.spawn(Entity::alien(&config.formation.rows[0], Vec2::ZERO));
    registry.spawn(Entity::alien(&config.formation.rows[1], Vec2::new(0.2, 0.0)));
    assert!(collision::detect(&registry, &arena()).is_empty());
}

#[test]
fn alien_against_a_side_wall_reports_the_inward_normal() {
    let config = GameConfig::default();
    let mut registry = Registry::new();
    let right = registry.spawn(Entity::alien(&config.formation.rows[0], Vec2::new(7.8, 0.0)));
    let left = registry.spawn(Entity::alien(&config.formation.rows[0], Vec2::new(-7.8, 2.0)));

    let contacts = collision::detect(&registry, &arena());
    assert!(contacts.contains(&Contact::Boundary {
        entity: right,
        normal: Vec2::NEG_X,
    }));
    assert!(contacts.contains(&Contact::Boundary {
        entity: left,
        normal: Vec2::X,
    }));
}

#[test]
fn alien_at_the_bottom_reports_an_upward_normal() {
    let config = GameConfig::default();
    let mut registry = Registry::new();
    let alien = registry.spawn(Entity::alien(&config.formation.rows[0], Vec2::new(0.0, -5.9)));
    assert_eq!(
        collision::detect(&registry, &arena()),
        vec![Contact::Boundary {
            entity: alien,
            normal: Vec2::Y,
        }]
    );
}

#[test]
fn shot_outside_the_arena_is_reported() {
    let config = GameConfig::default();
    let mut registry = Registry::new();
    let player = registry.spawn(Entity::player(&config.player.ship, Vec2::new(0.0, -5.0)));
    let shot = registry.spawn(Entity::projectile(
        &config.player.ship.projectiles[0],
        Vec2::new(0.0, 7.0),
        player,
        EntityKind::Player,
    ));

    let contacts = collision::detect(&registry, &arena());
    assert_eq!(
        contacts,
        vec![Contact::Boundary {
            entity: shot,
            normal: Vec2::NEG_Y,
        }]
    );
}

#[test]
fn inactive_entities_are_skipped() {
    let config = GameConfig::default();
    let mut registry = Registry::new();
    let player = registry.spawn(Entity::player(&config.player.ship, Vec2::new(-7.0, 5.4)));
    let drone = registry.spawn(Entity::drone(&config.drones[0]));
    assert_eq!(
        collision::detect(&registry, &arena()),
        vec![Contact::Entities(player, drone)]
    );

    registry.destroy(drone);
    assert!(collision::detect(&registry, &arena()).is_empty());
}

#[test]
fn only_opposing_shots_meet() {
    let config = GameConfig::default();
    let mut registry = Registry::new();
    let player = registry.spawn(Entity::player(&config.player.ship, Vec2::new(0.0, -5.0)));
    let alien = registry.spawn(Entity::alien(&config.formation.rows[0], Vec2::new(0.0, 4.0)));
    let laser = &config.player.ship.projectiles[0];
    let shot = |owner, kind, at| Entity::projectile(laser, at, owner, kind);

    let first = registry.spawn(shot(player, EntityKind::Player, Vec2::ZERO));
    registry.spawn(shot(player, EntityKind::Player, Vec2::ZERO));
    let bolt = registry.spawn(shot(alien, EntityKind::Alien, Vec2::new(0.0, 0.1)));

    let contacts = collision::detect(&registry, &arena());
    assert_eq!(contacts.len(), 2);
    assert_eq!(contacts[0], Contact::Entities(first, bolt));
}
