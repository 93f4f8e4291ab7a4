//! Notifications the world queues for its host.
//!
//! Nothing in the simulation renders or plays sounds; the host drains these
//! after each tick and reacts however it likes.

use glam::Vec2;

use crate::entities::{EntityId, EntityKind};
use crate::level::{Heading, WaveReport};

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    LifeChanged {
        entity: EntityId,
        value: i32,
        max_value: i32,
    },
    ScoreChanged {
        score: u32,
    },
    Destroyed {
        entity: EntityId,
        kind: EntityKind,
        position: Vec2,
    },
    WaveGenerated(WaveReport),
    LevelAdvanced {
        level: u32,
    },
    DirectionReversed(Heading),
    ItemCollected {
        item: String,
    },
    EffectExpired {
        effect: &'static str,
    },
    Paused(bool),
    GameOver {
        score: u32,
        level: u32,
    },
}
