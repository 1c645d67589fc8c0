/// The tick functions: advance a session by one frame / one second.
///
/// Frame tick processing order:
///   1. Boss drift
///   2. Timed spawn
///   3. Item fall + bottom-boundary miss rule
///   4. Catch-band collision resolution (nearest item first)
///   5. Gun: claim fresh items, resolve finished zaps, expiry
///
/// Each phase may end the session; later phases are skipped once it has.
/// All randomness flows through the injected `rng` so a seeded RNG makes
/// a whole run deterministic.

use rand::Rng;

use crate::domain::collision::{self, CatchOutcome, FIELD_BOTTOM};
use crate::domain::item::ItemKind;
use crate::domain::spawner::{self, SPAWN_Y};

use super::event::{EndReason, GameEvent};
use super::session::{GameSession, Phase};

// ══════════════════════════════════════════════════════════════
// Entry points
// ══════════════════════════════════════════════════════════════

/// Frame tick, invoked once per animation frame with the scheduler's
/// current time in milliseconds.
pub fn tick(session: &mut GameSession, now: u64, rng: &mut impl Rng) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if !session.is_active() {
        return events;
    }

    if !session.message.is_empty() && now >= session.message_until {
        session.message.clear();
    }

    if let Some(boss) = session.boss.as_mut() {
        boss.advance();
    }

    if now.saturating_sub(session.last_spawn_at) >= session.spawn_rate_ms {
        spawn_one(session, now, rng, &mut events);
    }

    advance_items(session, now, &mut events);
    if !session.is_active() {
        return events;
    }

    resolve_catches(session, now, &mut events);
    if !session.is_active() {
        return events;
    }

    resolve_gun(session, now, &mut events);

    events
}

/// Countdown tick, invoked once per second. The clock only runs in the
/// Normal phase — the boss fight freezes it.
pub fn tick_1hz(session: &mut GameSession) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if session.phase != Phase::Normal {
        return events;
    }
    if session.time_left > 0 {
        session.time_left -= 1;
    }
    if session.time_left == 0 {
        session.stop_into(EndReason::TimeOver, false, &mut events);
    }
    events
}

// ══════════════════════════════════════════════════════════════
// Spawn
// ══════════════════════════════════════════════════════════════

fn spawn_one(
    session: &mut GameSession,
    now: u64,
    rng: &mut impl Rng,
    events: &mut Vec<GameEvent>,
) {
    let plan = spawner::roll(
        rng,
        session.base_speed,
        session.boss.as_ref(),
        session.bombs_this_level,
    );
    if plan.kind == ItemKind::Bomb {
        session.bombs_this_level += 1;
    }
    let id = session.spawn_item(plan.kind, plan.lane, SPAWN_Y, plan.speed);
    session.last_spawn_at = now;
    events.push(GameEvent::ItemSpawned {
        id,
        kind: plan.kind,
        lane: plan.lane,
    });
}

// ══════════════════════════════════════════════════════════════
// Fall + bottom boundary
// ══════════════════════════════════════════════════════════════

fn advance_items(session: &mut GameSession, now: u64, events: &mut Vec<GameEvent>) {
    // Dropped fruit is free during the boss fight: only a bomb can
    // lose the session once the boss is engaged.
    let miss_rule = session.phase == Phase::Normal && !session.invincible;
    let mut gone: Vec<u64> = Vec::new();
    let mut misses = 0u32;

    for item in &mut session.items {
        if item.claimed {
            continue; // frozen by an in-flight zap
        }
        item.y += item.speed;
        if item.y >= FIELD_BOTTOM {
            let missed = item.kind.counts_as_miss() && miss_rule;
            if missed {
                misses += 1;
            }
            events.push(GameEvent::ItemRemoved { id: item.id, missed });
            gone.push(item.id);
        }
    }
    session.items.retain(|i| !gone.contains(&i.id));

    if misses > 0 {
        session.missed += misses;
        session.feedback("Missed!", now, events);
        if session.missed >= session.max_misses {
            session.stop_into(EndReason::TooManyMisses, false, events);
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Catch-band collisions
// ══════════════════════════════════════════════════════════════

fn resolve_catches(session: &mut GameSession, now: u64, events: &mut Vec<GameEvent>) {
    let gun_active = session.gun.is_active(now);
    let lane = session.player_lane;

    let mut caught: Vec<(u64, ItemKind, f32)> = session
        .items
        .iter()
        .filter(|i| !i.claimed && i.lane == lane && collision::in_catch_band(i.y))
        .map(|i| (i.id, i.kind, i.y))
        .collect();
    // Nearest item (deepest y) resolves first; one resolution per item.
    caught.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal));

    for (id, kind, _) in caught {
        session.items.retain(|i| i.id != id);
        let outcome = collision::resolve(kind, gun_active, session.invincible);
        apply_outcome(session, id, kind, outcome, now, events);
        if !session.is_active() {
            return;
        }
    }
}

fn apply_outcome(
    session: &mut GameSession,
    id: u64,
    kind: ItemKind,
    outcome: CatchOutcome,
    now: u64,
    events: &mut Vec<GameEvent>,
) {
    match outcome {
        CatchOutcome::Score(points) => {
            events.push(GameEvent::CollisionResolved { id, kind, points });
            session.add_score_into(points, events);
        }
        CatchOutcome::BombDefused { points } => {
            events.push(GameEvent::CollisionResolved { id, kind, points });
            if points > 0 {
                session.add_score_into(points, events);
            }
            session.feedback("Bomb defused!", now, events);
        }
        CatchOutcome::BombHit => {
            events.push(GameEvent::CollisionResolved { id, kind, points: 0 });
            session.stop_into(EndReason::BombHit, false, events);
        }
        CatchOutcome::BossHit => {
            events.push(GameEvent::CollisionResolved { id, kind, points: 0 });
            damage_boss(session, events);
        }
    }
}

fn damage_boss(session: &mut GameSession, events: &mut Vec<GameEvent>) {
    let (defeated, hp) = match session.boss.as_mut() {
        Some(boss) => {
            boss.take_hit();
            (boss.is_defeated(), boss.hp)
        }
        // Rocket caught outside the boss phase: destroyed for nothing.
        None => return,
    };
    events.push(GameEvent::BossDamaged { hp });
    if defeated {
        session.stop_into(EndReason::BossDefeated, true, events);
    }
}

// ══════════════════════════════════════════════════════════════
// Gun
// ══════════════════════════════════════════════════════════════

fn resolve_gun(session: &mut GameSession, now: u64, events: &mut Vec<GameEvent>) {
    // Expiry first, so a closed window claims nothing this tick.
    if let Some(until) = session.gun.active_until {
        if now >= until {
            session.gun.active_until = None;
            events.push(GameEvent::WeaponExpired);
        }
    }

    if session.gun.is_active(now) {
        for item in &mut session.items {
            if !item.claimed && item.y > 0.0 {
                item.claimed = true;
                item.claim_deadline = Some(now + session.rules.zap_delay_ms);
            }
        }
    }

    // Claims in flight complete even if the window closed meanwhile.
    let due: Vec<(u64, ItemKind)> = session
        .items
        .iter()
        .filter(|i| i.claim_deadline.map_or(false, |d| now >= d))
        .map(|i| (i.id, i.kind))
        .collect();
    for (id, kind) in due {
        session.items.retain(|i| i.id != id);
        // A finished zap resolves exactly as a gun-protected catch would.
        let outcome = collision::resolve(kind, true, session.invincible);
        apply_outcome(session, id, kind, outcome, now, events);
        if !session.is_active() {
            return;
        }
    }
}
