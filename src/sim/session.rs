/// GameSession: the complete state of one player's run, from `start()`
/// to a terminal `stop()`.
///
/// The session owns its items, its boss, and every pending deadline
/// (weapon window, in-flight zap claims, feedback expiry). All deadlines
/// are plain millisecond timestamps compared against the `now` the
/// external scheduler passes into `tick` — nothing blocks, and `stop()`
/// cancels them all atomically so no stale timer can touch a restarted
/// session.
///
/// Failures are never errors: a bomb hit, a time-out, or an exhausted
/// miss allowance is a normal transition into `Phase::Ended`, reported
/// through `GameEvent::SessionEnded`. Invalid operations (`start` while
/// active, input while disabled, weapon without ownership) are no-ops.

use crate::domain::boss::BossState;
use crate::domain::item::{FallingItem, GunState, Lane, RewardModifier};

use super::event::{EndReason, GameEvent};

/// Score needed per level: `level = score / 1000 + 1`.
pub const POINTS_PER_LEVEL: u32 = 1000;

/// Level at which the boss phase begins.
pub const BOSS_LEVEL: u32 = 15;

/// Rate derivation saturates here; later levels only reset the clock.
const RATE_LEVEL_CAP: u32 = 9;

/// Fixed pacing while the boss is active.
const BOSS_SPAWN_RATE_MS: u64 = 700;
const BOSS_BASE_SPEED: f32 = 11.0;

/// How long a feedback line stays on screen.
const FEEDBACK_MS: u64 = 1500;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    /// Constructed but never started.
    Idle,
    /// Regular play: countdown running, normal spawn table.
    Normal,
    /// Boss active: countdown frozen, boss spawn table.
    BossFight,
    /// Terminal. Only `start()` leaves this state.
    Ended,
}

/// Per-session tuning, sourced from config.toml.
#[derive(Clone, Copy, Debug)]
pub struct SessionRules {
    pub gun_duration_ms: u64,
    /// Travel time of a zap from activation to item resolution.
    pub zap_delay_ms: u64,
    pub time_limit_secs: u32,
    /// Dev override: the gun never needs ownership and is never consumed.
    pub unlimited_gun: bool,
}

impl Default for SessionRules {
    fn default() -> Self {
        SessionRules {
            gun_duration_ms: 10_000,
            zap_delay_ms: 150,
            time_limit_secs: 60,
            unlimited_gun: false,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct StartConfig {
    pub reward: RewardModifier,
    pub start_level: u32,
    pub input_enabled: bool,
}

impl Default for StartConfig {
    fn default() -> Self {
        StartConfig {
            reward: RewardModifier::None,
            start_level: 1,
            input_enabled: true,
        }
    }
}

/// The recorded end of a run.
#[derive(Clone, Copy, Debug)]
pub struct Outcome {
    pub score: u32,
    pub level: u32,
    pub victory: bool,
    pub reason: EndReason,
}

pub struct GameSession {
    pub rules: SessionRules,
    pub phase: Phase,

    // ── Progression ──
    pub score: u32,
    pub level: u32,
    pub time_left: u32,
    pub spawn_rate_ms: u64,
    pub base_speed: f32,
    pub bombs_this_level: u32,

    // ── Player ──
    pub player_lane: Lane,
    pub missed: u32,
    pub max_misses: u32,
    pub invincible: bool,
    pub input_enabled: bool,
    pub reward: RewardModifier,
    pub gun: GunState,

    // ── Field ──
    pub items: Vec<FallingItem>,
    pub boss: Option<BossState>,

    // ── Feedback ──
    pub message: String,
    pub(crate) message_until: u64,

    // ── Bookkeeping ──
    pub(crate) last_spawn_at: u64,
    next_item_id: u64,
    pub outcome: Option<Outcome>,
}

impl GameSession {
    pub fn new(rules: SessionRules) -> Self {
        GameSession {
            rules,
            phase: Phase::Idle,
            score: 0,
            level: 1,
            time_left: rules.time_limit_secs,
            spawn_rate_ms: spawn_rate_for(1),
            base_speed: base_speed_for(1),
            bombs_this_level: 0,
            player_lane: Lane::Center,
            missed: 0,
            max_misses: 2,
            invincible: false,
            input_enabled: true,
            reward: RewardModifier::None,
            gun: GunState::default(),
            items: Vec::new(),
            boss: None,
            message: String::new(),
            message_until: 0,
            last_spawn_at: 0,
            next_item_id: 0,
            outcome: None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, Phase::Normal | Phase::BossFight)
    }

    pub fn lives_remaining(&self) -> u32 {
        self.max_misses.saturating_sub(self.missed)
    }

    /// Begin a run. No-op while one is already active. Fully resets all
    /// state from the previous run.
    pub fn start(&mut self, cfg: StartConfig, now: u64) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.is_active() {
            return events;
        }

        let start_level = cfg.start_level.max(1);
        self.phase = Phase::Normal;
        self.score = (start_level - 1) * POINTS_PER_LEVEL;
        self.level = start_level;
        self.time_left = self.rules.time_limit_secs;
        self.spawn_rate_ms = spawn_rate_for(start_level);
        self.base_speed = base_speed_for(start_level);
        self.bombs_this_level = 0;
        self.player_lane = Lane::Center;
        self.missed = 0;
        self.max_misses = if cfg.reward == RewardModifier::ExtraLife { 3 } else { 2 };
        self.invincible = false;
        self.input_enabled = cfg.input_enabled;
        self.reward = cfg.reward;
        self.gun = GunState {
            owned: cfg.reward == RewardModifier::Gun,
            active_until: None,
        };
        self.items.clear();
        self.boss = None;
        self.message.clear();
        self.message_until = 0;
        self.last_spawn_at = now;
        self.next_item_id = 0;
        self.outcome = None;

        if start_level >= BOSS_LEVEL {
            self.enter_boss(&mut events);
        }
        events
    }

    /// Terminal transition. No-op while inactive. Cancels every pending
    /// deadline so nothing fires into the next run.
    pub fn stop(&mut self, reason: EndReason, victory: bool) -> Vec<GameEvent> {
        let mut events = Vec::new();
        self.stop_into(reason, victory, &mut events);
        events
    }

    pub(crate) fn stop_into(
        &mut self,
        reason: EndReason,
        victory: bool,
        events: &mut Vec<GameEvent>,
    ) {
        if !self.is_active() {
            return;
        }
        self.phase = Phase::Ended;
        self.gun.active_until = None;
        self.message.clear();
        self.message_until = 0;
        for item in &mut self.items {
            item.claim_deadline = None;
        }
        self.outcome = Some(Outcome {
            score: self.score,
            level: self.level,
            victory,
            reason,
        });
        events.push(GameEvent::SessionEnded {
            score: self.score,
            level: self.level,
            victory,
            reason,
        });
    }

    /// Normalized lane input — the same entry point for a human source
    /// and the AI opponent. Ignored while input is disabled or the
    /// session is not running.
    pub fn set_input(&mut self, lane: Lane) {
        if !self.input_enabled || !self.is_active() {
            return;
        }
        if lane != self.player_lane {
            self.player_lane = lane;
        }
    }

    /// Fire the gun. Requires ownership (or the unlimited override), and
    /// re-activating while already active is a no-op — it does NOT reset
    /// the running window.
    pub fn activate_weapon(&mut self, now: u64) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if !self.is_active() {
            return events;
        }
        if !self.gun.owned && !self.rules.unlimited_gun {
            return events;
        }
        if self.gun.is_active(now) {
            return events;
        }
        self.gun.active_until = Some(now + self.rules.gun_duration_ms);
        if !self.rules.unlimited_gun {
            self.gun.owned = false;
        }
        events.push(GameEvent::WeaponActivated);
        self.feedback("Gun online!", now, &mut events);
        events
    }

    /// Award points and apply any level-ups they cause.
    pub fn add_score(&mut self, points: u32) -> Vec<GameEvent> {
        let mut events = Vec::new();
        self.add_score_into(points, &mut events);
        events
    }

    pub(crate) fn add_score_into(&mut self, points: u32, events: &mut Vec<GameEvent>) {
        if !self.is_active() {
            return;
        }
        self.score += points;
        let new_level = self.score / POINTS_PER_LEVEL + 1;
        events.push(GameEvent::ScoreChanged {
            score: self.score,
            level: new_level,
        });
        if new_level > self.level {
            self.level = new_level;
            self.bombs_this_level = 0;
            self.time_left = self.rules.time_limit_secs;
            if self.phase == Phase::Normal {
                // Boss pacing is fixed; only re-derive rates in normal play.
                self.spawn_rate_ms = spawn_rate_for(new_level);
                self.base_speed = base_speed_for(new_level);
                if new_level >= BOSS_LEVEL {
                    self.enter_boss(events);
                }
            }
        }
    }

    /// Switch into the boss phase. Triggers at most once per run.
    fn enter_boss(&mut self, events: &mut Vec<GameEvent>) {
        if self.boss.is_some() {
            return;
        }
        self.phase = Phase::BossFight;
        self.boss = Some(BossState::new());
        self.spawn_rate_ms = BOSS_SPAWN_RATE_MS;
        self.base_speed = BOSS_BASE_SPEED;
        events.push(GameEvent::BossEngaged);
    }

    pub(crate) fn feedback(&mut self, text: &str, now: u64, events: &mut Vec<GameEvent>) {
        self.message = text.to_string();
        self.message_until = now + FEEDBACK_MS;
        events.push(GameEvent::FeedbackMessage {
            text: text.to_string(),
        });
    }

    pub(crate) fn alloc_item_id(&mut self) -> u64 {
        let id = self.next_item_id;
        self.next_item_id += 1;
        id
    }

    /// Materialize one item on the field with a fresh id.
    pub fn spawn_item(
        &mut self,
        kind: crate::domain::item::ItemKind,
        lane: Lane,
        y: f32,
        speed: f32,
    ) -> u64 {
        let id = self.alloc_item_id();
        self.items.push(FallingItem::new(id, kind, lane, y, speed));
        id
    }
}

/// `base_speed = 2 + min(level, 9)`: level 1 → 3, saturating at 11,
/// which is exactly the boss-phase speed.
pub fn base_speed_for(level: u32) -> f32 {
    2.0 + level.min(RATE_LEVEL_CAP) as f32
}

/// `spawn_rate = 1400 − 100·min(level, 9)` ms: level 1 → 1300, floor 500.
pub fn spawn_rate_for(level: u32) -> u64 {
    1400 - 100 * level.min(RATE_LEVEL_CAP) as u64
}
