//! Alien-specific behaviour: loot rolls and drone patrols.

use rand::Rng;

use crate::entities::{Bounty, Entity, Item, Patrol};

/// Rolls the drop chance and, on success, picks one item by weight.
pub fn roll_loot(bounty: &Bounty, rng: &mut impl Rng) -> Option<Item> {
    if rng.gen::<f32>() >= bounty.drop_chance {
        return None;
    }

    let total: f32 = bounty.loot.iter().map(|l| l.weight.max(0.0)).sum();
    if !(total > 0.0) {
        return None;
    }

    let mut remaining = rng.gen_range(0.0..total);
    for loot in &bounty.loot {
        remaining -= loot.weight.max(0.0);
        if remaining <= 0.0 {
            return Some(loot.item.clone());
        }
    }
    // Rounding can leave a sliver past the last weight.
    bounty
        .loot
        .iter()
        .rev()
        .find(|l| l.weight > 0.0)
        .map(|l| l.item.clone())
}

impl Patrol {
    fn randomize_interval(&mut self, rng: &mut impl Rng) {
        let interval = if self.min_interval < self.max_interval {
            rng.gen_range(self.min_interval..=self.max_interval)
        } else {
            self.min_interval
        };
        self.timer.set_duration(interval);
    }
}

/// Puts a drone back at its start point with a fresh patrol interval. Used
/// when the drone spawns and whenever it is reactivated.
pub fn restart_patrol(entity: &mut Entity, rng: &mut impl Rng) {
    let Some(patrol) = entity.patrol.as_mut() else {
        return;
    };
    entity.position = patrol.start;
    patrol.randomize_interval(rng);
    patrol.timer.reset();
    entity.set_waypoint(None);
}

/// Shuttles a drone between its two points. Runs after the drone moved.
///
/// The timer only counts down while the drone is resting at one end; each
/// time it fires, a drone sitting on an end point heads for the other one.
pub fn patrol(entity: &mut Entity, delta: f32, rng: &mut impl Rng) {
    if entity.waypoint().is_some() {
        return;
    }
    let position = entity.position;
    let Some(patrol) = entity.patrol.as_mut() else {
        return;
    };
    if !patrol.timer.run(delta) {
        return;
    }

    let target = if position == patrol.start {
        Some(patrol.end)
    } else if position == patrol.end {
        Some(patrol.start)
    } else {
        None
    };
    patrol.randomize_interval(rng);
    if target.is_some() {
        entity.set_waypoint(target);
    }
}
