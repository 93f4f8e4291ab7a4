//! Actor movement: velocity blending and waypoint seeking.
//!
//! Each fixed tick an actor first blends its internal velocity toward
//! `direction * current_speed`, then moves. While a waypoint is set the
//! actor walks straight to it at `current_speed` and ignores its direction;
//! arriving clears the waypoint.

use glam::Vec2;

use crate::entities::{Entity, Movement};
use crate::math::{move_towards, move_towards_vec};

impl Movement {
    pub fn waypoint(&self) -> Option<Vec2> {
        self.waypoint
    }

    pub fn set_waypoint(&mut self, waypoint: Option<Vec2>) {
        self.waypoint = waypoint;
    }

    pub fn internal_velocity(&self) -> Vec2 {
        self.internal_velocity
    }

    /// Moves each axis of the internal velocity toward its target by at most
    /// `current_acceleration * delta`.
    fn blend_velocity(&mut self, delta: f32) {
        let target = self.direction * self.current_speed;
        let step = self.current_acceleration * delta;
        self.internal_velocity = Vec2::new(
            move_towards(self.internal_velocity.x, target.x, step),
            move_towards(self.internal_velocity.y, target.y, step),
        );
    }

    /// Puts speed and acceleration back to their defaults, so other systems
    /// can only change them for the frame they write them in.
    pub fn restore_defaults(&mut self) {
        self.current_speed = self.default_speed;
        self.current_acceleration = self.default_acceleration;
    }
}

impl Entity {
    pub fn waypoint(&self) -> Option<Vec2> {
        self.movement.as_ref().and_then(Movement::waypoint)
    }

    /// Sets a waypoint relative to the current position.
    pub fn move_by(&mut self, offset: Vec2) {
        let target = self.position + offset;
        self.set_waypoint(Some(target));
    }

    pub fn set_waypoint(&mut self, waypoint: Option<Vec2>) {
        if let Some(movement) = self.movement.as_mut() {
            movement.set_waypoint(waypoint);
        }
    }

    pub fn set_direction(&mut self, direction: Vec2) {
        if let Some(movement) = self.movement.as_mut() {
            movement.direction = direction;
        }
    }
}

/// Advances one actor by one fixed step. Entities without movement are left
/// untouched.
pub fn step(entity: &mut Entity, delta: f32) {
    let Some(movement) = entity.movement.as_mut() else {
        return;
    };

    movement.blend_velocity(delta);
    let speed = movement.current_speed;
    movement.restore_defaults();

    match movement.waypoint {
        None => entity.position += movement.internal_velocity * delta,
        Some(waypoint) => {
            let next = move_towards_vec(entity.position, waypoint, speed * delta);
            if next == waypoint {
                movement.waypoint = None;
            }
            entity.position = next;
        }
    }
}
