/// Spawn policy: whether the session is in the normal or the boss phase
/// decides both the item-kind weights and the lane distribution.
///
/// All randomness comes through the injected `rng` so callers control
/// determinism (tests use a seeded RNG).

use rand::Rng;

use super::boss::{BossState, POS_MAX, POS_MIN};
use super::item::{ItemKind, Lane};

/// Items spawn this far above the visible field.
pub const SPAWN_Y: f32 = -40.0;

/// Bombs spawned per level before the table substitutes cherries.
pub const BOMB_CAP_PER_LEVEL: u32 = 5;

/// Probability that a boss-phase spawn lands in the boss's current third.
const BOSS_LANE_BIAS: f64 = 0.6;

/// One rolled spawn, ready for the session to instantiate.
#[derive(Clone, Copy, Debug)]
pub struct SpawnPlan {
    pub kind: ItemKind,
    pub lane: Lane,
    pub speed: f32,
}

/// Roll one spawn. `bombs_this_level` is the count of bombs already
/// spawned on the current level; once it reaches the cap, further bomb
/// rolls degrade to the common fruit so per-level difficulty stays
/// bounded.
pub fn roll(
    rng: &mut impl Rng,
    base_speed: f32,
    boss: Option<&BossState>,
    bombs_this_level: u32,
) -> SpawnPlan {
    let mut kind = match boss {
        Some(_) => roll_boss_kind(rng),
        None => roll_normal_kind(rng),
    };
    if kind == ItemKind::Bomb && bombs_this_level >= BOMB_CAP_PER_LEVEL {
        kind = ItemKind::Cherry;
    }

    let lane = match boss {
        // Keep rockets reachable: bias toward the boss's current third.
        Some(b) if rng.gen_bool(BOSS_LANE_BIAS) => lane_under_boss(b),
        _ => Lane::from_index(rng.gen_range(0..3)),
    };

    SpawnPlan {
        kind,
        lane,
        speed: base_speed + rng.gen::<f32>(),
    }
}

/// Normal mode: 50% cherry, 30% apple, 10% melon, 10% bomb.
fn roll_normal_kind(rng: &mut impl Rng) -> ItemKind {
    let r = rng.gen::<f64>();
    if r < 0.50 {
        ItemKind::Cherry
    } else if r < 0.80 {
        ItemKind::Apple
    } else if r < 0.90 {
        ItemKind::Melon
    } else {
        ItemKind::Bomb
    }
}

/// Boss mode: 30% rocket, 30% bomb, remaining 40% split 50/30/20 across
/// the fruit tiers.
fn roll_boss_kind(rng: &mut impl Rng) -> ItemKind {
    let r = rng.gen::<f64>();
    if r < 0.30 {
        ItemKind::Rocket
    } else if r < 0.60 {
        ItemKind::Bomb
    } else if r < 0.80 {
        ItemKind::Cherry
    } else if r < 0.92 {
        ItemKind::Apple
    } else {
        ItemKind::Melon
    }
}

/// The lane under the boss's current horizontal third.
pub fn lane_under_boss(boss: &BossState) -> Lane {
    let third = (POS_MAX - POS_MIN) / 3.0;
    if boss.pos < POS_MIN + third {
        Lane::Left
    } else if boss.pos < POS_MIN + 2.0 * third {
        Lane::Center
    } else {
        Lane::Right
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded_rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn normal_distribution_is_roughly_weighted() {
        let mut rng = seeded_rng();
        let mut counts = [0u32; 4]; // cherry, apple, melon, bomb
        for _ in 0..10_000 {
            match roll_normal_kind(&mut rng) {
                ItemKind::Cherry => counts[0] += 1,
                ItemKind::Apple => counts[1] += 1,
                ItemKind::Melon => counts[2] += 1,
                ItemKind::Bomb => counts[3] += 1,
                ItemKind::Rocket => panic!("no rockets in normal mode"),
            }
        }
        assert!((4600..5400).contains(&counts[0]), "cherries: {}", counts[0]);
        assert!((2700..3300).contains(&counts[1]), "apples: {}", counts[1]);
        assert!((800..1200).contains(&counts[2]), "melons: {}", counts[2]);
        assert!((800..1200).contains(&counts[3]), "bombs: {}", counts[3]);
    }

    #[test]
    fn boss_mode_spawns_rockets() {
        let mut rng = seeded_rng();
        let boss = BossState::new();
        let rockets = (0..10_000)
            .filter(|_| roll(&mut rng, 5.0, Some(&boss), 0).kind == ItemKind::Rocket)
            .count();
        assert!((2700..3300).contains(&rockets), "rockets: {rockets}");
    }

    #[test]
    fn bomb_cap_substitutes_cherries() {
        let mut rng = seeded_rng();
        for _ in 0..10_000 {
            let plan = roll(&mut rng, 5.0, None, BOMB_CAP_PER_LEVEL);
            assert_ne!(plan.kind, ItemKind::Bomb);
        }
    }

    #[test]
    fn speed_carries_unit_jitter() {
        let mut rng = seeded_rng();
        for _ in 0..1000 {
            let plan = roll(&mut rng, 7.0, None, 0);
            assert!(plan.speed >= 7.0 && plan.speed < 8.0);
        }
    }

    #[test]
    fn lane_tracks_boss_thirds() {
        let mut boss = BossState::new();
        boss.pos = 12.0;
        assert_eq!(lane_under_boss(&boss), Lane::Left);
        boss.pos = 50.0;
        assert_eq!(lane_under_boss(&boss), Lane::Center);
        boss.pos = 88.0;
        assert_eq!(lane_under_boss(&boss), Lane::Right);
    }

    #[test]
    fn boss_spawns_favor_the_boss_lane() {
        let mut rng = seeded_rng();
        let mut boss = BossState::new();
        boss.pos = 15.0; // firmly in the left third
        let left = (0..10_000)
            .filter(|_| roll(&mut rng, 5.0, Some(&boss), 0).lane == Lane::Left)
            .count();
        // 60% direct bias + 1/3 of the remaining 40% ≈ 73%
        assert!(left > 6500, "left-lane spawns: {left}");
    }
}
