use space_insiders::life::{Life, LifeChanged};

#[test]
fn new_life_starts_full() {
    let life = Life::new(3);
    assert_eq!(life.value(), 3);
    assert_eq!(life.max_value(), 3);
    assert!(life.is_full());
    assert!(!life.is_empty());
}

#[test]
fn add_clamps_to_range() {
    let mut life = Life::new(3);
    assert_eq!(
        life.add(-5),
        LifeChanged {
            value: 0,
            max_value: 3
        }
    );
    assert!(life.is_empty());

    let _ = life.add(10);
    assert_eq!(life.value(), 3);
}

#[test]
fn clamped_writes_still_notify() {
    let mut life = Life::new(2);
    // Already full: the value does not move but a change is still reported.
    let changed = life.add(1);
    assert_eq!(changed.value, 2);
    assert_eq!(changed.max_value, 2);
}

#[test]
fn lowering_the_maximum_reclamps_the_value() {
    let mut life = Life::new(5);
    let changed = life.set_max_value(2);
    assert_eq!(changed.value, 2);
    assert_eq!(life.max_value(), 2);

    let _ = life.set_max_value(4);
    assert_eq!(life.value(), 2);
    assert!(!life.is_full());
    let _ = life.maximize();
    assert_eq!(life.value(), 4);
}

#[test]
fn negative_values_become_zero() {
    let mut life = Life::new(-1);
    assert_eq!(life.max_value(), 0);
    assert!(life.is_empty());
    let _ = life.set_value(-7);
    assert_eq!(life.value(), 0);
}

#[test]
fn huge_damage_does_not_overflow() {
    let mut life = Life::new(3);
    let _ = life.add(i32::MIN);
    assert_eq!(life.value(), 0);
}
