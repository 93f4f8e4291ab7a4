use approx::assert_relative_eq;
use space_insiders::difficulty::{progress, LevelParameters, Range};
use space_insiders::error::ConfigError;

#[test]
fn first_level_uses_the_minimum() {
    let params = LevelParameters::default();
    assert_relative_eq!(params.spawn_chance(1), 0.6);
    assert_relative_eq!(params.alien_speed(1), 1.0);
    assert_relative_eq!(params.shoot_cooldown(1), 1.5);
    assert_eq!(progress(0.25, 1), 0.0);
}

#[test]
fn values_follow_the_exponential_curve() {
    let range = Range::new(1.0, 2.0);
    let expected = 1.0 + (1.0 - (-0.5_f32).exp()) * 2.0;
    assert_relative_eq!(range.at(0.25, 3), expected, epsilon = 1e-6);
}

#[test]
fn values_approach_the_limit() {
    let params = LevelParameters::default();
    assert_relative_eq!(params.alien_speed(200), 3.0, epsilon = 1e-4);
    assert_relative_eq!(params.spawn_chance(200), 1.0, epsilon = 1e-4);
}

#[test]
fn negative_max_makes_cooldowns_shrink() {
    let params = LevelParameters::default();
    let mut previous = params.shoot_cooldown(1);
    for level in 2..20 {
        let current = params.shoot_cooldown(level);
        assert!(current < previous, "level {level}: {current} >= {previous}");
        assert!(current > 0.5);
        previous = current;
    }
}

#[test]
fn flat_curve_keeps_every_level_at_the_minimum() {
    let params = LevelParameters {
        curve: 0.0,
        ..LevelParameters::default()
    };
    assert_relative_eq!(params.alien_speed(50), 1.0);
}

#[test]
fn spawn_chance_is_clamped_to_a_probability() {
    let params = LevelParameters {
        spawn_chance: Range::new(0.9, 0.5),
        ..LevelParameters::default()
    };
    assert_eq!(params.spawn_chance(100), 1.0);
}

// ── Validation ────────────────────────────────────────────────────────────────

#[test]
fn defaults_are_valid() {
    assert!(LevelParameters::default().validate().is_ok());
}

#[test]
fn zero_spawn_chance_is_rejected() {
    let params = LevelParameters {
        spawn_chance: Range::new(0.0, 0.5),
        ..LevelParameters::default()
    };
    assert!(matches!(
        params.validate(),
        Err(ConfigError::ZeroSpawnChance(_))
    ));
}

#[test]
fn cooldown_that_turns_negative_is_rejected() {
    let params = LevelParameters {
        shoot_cooldown: Range::new(1.0, -2.0),
        ..LevelParameters::default()
    };
    assert!(matches!(
        params.validate(),
        Err(ConfigError::Negative { ref field, .. }) if field == "difficulty.shoot_cooldown"
    ));
}

#[test]
fn speed_that_decays_to_zero_is_rejected() {
    let params = LevelParameters {
        alien_speed: Range::new(1.0, -1.0),
        ..LevelParameters::default()
    };
    assert!(matches!(
        params.validate(),
        Err(ConfigError::OutOfRange { ref field, value, .. })
            if field == "difficulty.alien_speed" && value == 0.0
    ));
}
