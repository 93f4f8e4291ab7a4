//! Engine-agnostic simulation core of a Space Invaders style shooter.
//!
//! The crate never draws or reads input. A host builds a [`World`] from a
//! [`GameConfig`], feeds it [`PlayerInput`] through `tick` and `fixed_tick`,
//! and drains [`GameEvent`]s to decide what to show.

pub mod actor;
pub mod alien;
pub mod collision;
pub mod config;
pub mod difficulty;
pub mod effects;
pub mod entities;
pub mod error;
pub mod events;
pub mod level;
pub mod life;
pub mod math;
pub mod projectile;
pub mod registry;
pub mod scores;
pub mod ship;
pub mod timer;
pub mod world;

pub use config::GameConfig;
pub use entities::{EntityId, EntityKind};
pub use error::{ConfigError, ScoreError};
pub use events::GameEvent;
pub use world::{PlayerInput, World};
