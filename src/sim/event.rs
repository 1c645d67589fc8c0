/// Events emitted during a simulation step.
/// The presentation layer consumes these for HUD flashes and banners;
/// the core never touches presentation itself.

use crate::domain::item::{ItemKind, Lane};

/// Why a session reached its terminal state.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EndReason {
    BombHit,
    TimeOver,
    TooManyMisses,
    BossDefeated,
    Aborted,
}

impl EndReason {
    pub fn label(self) -> &'static str {
        match self {
            EndReason::BombHit => "bomb",
            EndReason::TimeOver => "time over",
            EndReason::TooManyMisses => "too many misses",
            EndReason::BossDefeated => "boss defeated",
            EndReason::Aborted => "aborted",
        }
    }
}

#[derive(Clone, Debug)]
#[allow(dead_code)]
pub enum GameEvent {
    ItemSpawned { id: u64, kind: ItemKind, lane: Lane },
    /// The item left the field uncaught. `missed` is false for bombs and
    /// rockets, which drop for free.
    ItemRemoved { id: u64, missed: bool },
    /// An item resolved against the player hitbox or an in-flight zap.
    CollisionResolved { id: u64, kind: ItemKind, points: u32 },
    ScoreChanged { score: u32, level: u32 },
    BossEngaged,
    BossDamaged { hp: u32 },
    WeaponActivated,
    WeaponExpired,
    FeedbackMessage { text: String },
    SessionEnded { score: u32, level: u32, victory: bool, reason: EndReason },
}
