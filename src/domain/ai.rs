/// Opponent decision policy.
///
/// The engine runs its own decision cadence (one decision per
/// `reaction_ms`), reads the target session's public state, and issues
/// inputs through the exact entry points a human source uses
/// (`set_input`, `activate_weapon`). It never reaches into the tick
/// internals.
///
/// Fairness handicap instead of perfect play: below its configured
/// survivor level the opponent is made invincible, so a weak profile
/// loses to pace, not to early accidents.

use rand::Rng;

use crate::sim::session::GameSession;

use super::item::{ItemKind, Lane};

/// Items below the field top and above this line are considered
/// reachable; anything deeper is already past saving a reaction for.
pub const REACH_LIMIT: f32 = 420.0;

/// Best lane scores at or below this are hopeless — stay put.
const STAY_THRESHOLD: i32 = -500;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Hell,
}

impl Difficulty {
    pub fn from_name(name: &str) -> Option<Difficulty> {
        match name {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            "hell" => Some(Difficulty::Hell),
            _ => None,
        }
    }

    pub fn profile(self) -> Profile {
        match self {
            Difficulty::Easy => Profile {
                reaction_ms: 800,
                error_rate: 0.30,
                min_survivor_level: 2,
            },
            Difficulty::Medium => Profile {
                reaction_ms: 500,
                error_rate: 0.10,
                min_survivor_level: 5,
            },
            Difficulty::Hard => Profile {
                reaction_ms: 200,
                error_rate: 0.0,
                min_survivor_level: 8,
            },
            Difficulty::Hell => Profile {
                reaction_ms: 50,
                error_rate: 0.0,
                min_survivor_level: 12,
            },
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Profile {
    pub reaction_ms: u64,
    pub error_rate: f64,
    pub min_survivor_level: u32,
}

pub struct AiEngine {
    difficulty: Difficulty,
    profile: Profile,
    /// Next decision deadline. None = engine stopped.
    next_decision_at: Option<u64>,
}

impl AiEngine {
    pub fn new(difficulty: Difficulty) -> Self {
        AiEngine {
            difficulty,
            profile: difficulty.profile(),
            next_decision_at: None,
        }
    }

    /// Arm the periodic decision deadline.
    pub fn start(&mut self, now: u64) {
        self.next_decision_at = Some(now + self.profile.reaction_ms);
    }

    /// Cancel the decision deadline; `poll` becomes a no-op.
    pub fn stop(&mut self) {
        self.next_decision_at = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_decision_at.is_some()
    }

    /// Called every frame by the scheduler; decides only when its own
    /// reaction interval has elapsed.
    pub fn poll(&mut self, session: &mut GameSession, now: u64, rng: &mut impl Rng) {
        match self.next_decision_at {
            Some(t) if now >= t => {}
            _ => return,
        }
        self.next_decision_at = Some(now + self.profile.reaction_ms);
        self.decide(session, now, rng);
    }

    /// One decision: score the lanes, pick one, maybe fire the gun.
    pub fn decide(&self, session: &mut GameSession, now: u64, rng: &mut impl Rng) {
        if !session.is_active() {
            return;
        }

        // Fairness floor: cannot lose below the configured skill level.
        session.invincible = session.level < self.profile.min_survivor_level;

        // On the sharp profiles, burn the gun as soon as a bomb shows up.
        if matches!(self.difficulty, Difficulty::Hard | Difficulty::Hell)
            && (session.gun.owned || session.rules.unlimited_gun)
            && bomb_in_sight(session)
        {
            let _ = session.activate_weapon(now);
        }

        let scores = lane_scores(session);

        let target = if !session.invincible && rng.gen_bool(self.profile.error_rate) {
            // Fumbled reaction: a uniformly random lane.
            Some(Lane::from_index(rng.gen_range(0..3)))
        } else {
            let (lane, best) = best_lane(&scores);
            if best <= STAY_THRESHOLD {
                None // everything reachable is catastrophic — hold position
            } else {
                Some(lane)
            }
        };

        if let Some(lane) = target {
            session.set_input(lane);
        }
    }
}

fn bomb_in_sight(session: &GameSession) -> bool {
    session
        .items
        .iter()
        .any(|i| !i.claimed && i.kind == ItemKind::Bomb && i.y > 0.0 && i.y < REACH_LIMIT)
}

/// Score each lane from its nearest reachable item:
/// empty 0, bomb -1000, rocket +500, fruit its point value.
fn lane_scores(session: &GameSession) -> [i32; 3] {
    let mut nearest: [Option<(f32, ItemKind)>; 3] = [None; 3];
    for item in &session.items {
        if item.claimed || item.y <= 0.0 || item.y >= REACH_LIMIT {
            continue;
        }
        let slot = &mut nearest[item.lane.index()];
        if slot.map_or(true, |(y, _)| item.y > y) {
            *slot = Some((item.y, item.kind));
        }
    }

    let mut scores = [0i32; 3];
    for (i, slot) in nearest.iter().enumerate() {
        scores[i] = match slot {
            None => 0,
            Some((_, ItemKind::Bomb)) => -1000,
            Some((_, ItemKind::Rocket)) => 500,
            Some((_, fruit)) => fruit.score() as i32,
        };
    }
    scores
}

/// Ties break by evaluation order: lane 0, 1, 2 — first max wins.
fn best_lane(scores: &[i32; 3]) -> (Lane, i32) {
    let mut best = 0;
    for i in 1..3 {
        if scores[i] > scores[best] {
            best = i;
        }
    }
    (Lane::from_index(best), scores[best])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::item::RewardModifier;
    use crate::sim::session::{GameSession, SessionRules, StartConfig};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded_rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn session_at_level(level: u32, reward: RewardModifier) -> GameSession {
        let mut s = GameSession::new(SessionRules::default());
        s.start(
            StartConfig {
                reward,
                start_level: level,
                ..Default::default()
            },
            0,
        );
        s.spawn_rate_ms = u64::MAX;
        s
    }

    #[test]
    fn profile_table() {
        let easy = Difficulty::Easy.profile();
        assert_eq!(easy.reaction_ms, 800);
        assert!((easy.error_rate - 0.30).abs() < f64::EPSILON);
        assert_eq!(easy.min_survivor_level, 2);

        let hell = Difficulty::Hell.profile();
        assert_eq!(hell.reaction_ms, 50);
        assert_eq!(hell.error_rate, 0.0);
        assert_eq!(hell.min_survivor_level, 12);
    }

    #[test]
    fn difficulty_names() {
        assert_eq!(Difficulty::from_name("hard"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_name("nightmare"), None);
    }

    #[test]
    fn hard_picks_the_fruit_lane_deterministically() {
        // Scenario D: bomb left, 300-point fruit center, right empty.
        let ai = AiEngine::new(Difficulty::Hard);
        let mut s = session_at_level(8, RewardModifier::None);
        s.spawn_item(ItemKind::Bomb, Lane::Left, 200.0, 0.0);
        s.spawn_item(ItemKind::Melon, Lane::Center, 200.0, 0.0);
        s.player_lane = Lane::Right;

        for _ in 0..20 {
            ai.decide(&mut s, 0, &mut seeded_rng());
            assert_eq!(s.player_lane, Lane::Center);
            s.player_lane = Lane::Right;
        }
    }

    #[test]
    fn fairness_floor_toggles_invincibility() {
        let ai = AiEngine::new(Difficulty::Medium); // survivor level 5
        let mut s = session_at_level(1, RewardModifier::None);
        ai.decide(&mut s, 0, &mut seeded_rng());
        assert!(s.invincible);

        let mut s = session_at_level(5, RewardModifier::None);
        ai.decide(&mut s, 0, &mut seeded_rng());
        assert!(!s.invincible);
    }

    #[test]
    fn stays_put_when_every_lane_is_catastrophic() {
        let ai = AiEngine::new(Difficulty::Hard);
        let mut s = session_at_level(8, RewardModifier::None);
        for lane in Lane::ALL {
            s.spawn_item(ItemKind::Bomb, lane, 300.0, 0.0);
        }
        s.player_lane = Lane::Center;
        ai.decide(&mut s, 0, &mut seeded_rng());
        assert_eq!(s.player_lane, Lane::Center);
    }

    #[test]
    fn rocket_outranks_fruit() {
        let ai = AiEngine::new(Difficulty::Hell);
        let mut s = session_at_level(15, RewardModifier::None);
        s.spawn_item(ItemKind::Melon, Lane::Left, 200.0, 0.0);
        s.spawn_item(ItemKind::Rocket, Lane::Right, 200.0, 0.0);
        ai.decide(&mut s, 0, &mut seeded_rng());
        assert_eq!(s.player_lane, Lane::Right);
    }

    #[test]
    fn tie_breaks_to_the_first_lane() {
        let ai = AiEngine::new(Difficulty::Hard);
        let mut s = session_at_level(8, RewardModifier::None);
        s.spawn_item(ItemKind::Apple, Lane::Center, 200.0, 0.0);
        s.spawn_item(ItemKind::Apple, Lane::Right, 200.0, 0.0);
        ai.decide(&mut s, 0, &mut seeded_rng());
        assert_eq!(s.player_lane, Lane::Center);
    }

    #[test]
    fn nearest_item_defines_the_lane_score() {
        let ai = AiEngine::new(Difficulty::Hard);
        let mut s = session_at_level(8, RewardModifier::None);
        // Cherry is deeper than the bomb in the same lane — the bomb is
        // still on the way, but the nearest threat/prize decides.
        s.spawn_item(ItemKind::Bomb, Lane::Left, 100.0, 0.0);
        s.spawn_item(ItemKind::Cherry, Lane::Left, 300.0, 0.0);
        s.spawn_item(ItemKind::Apple, Lane::Right, 50.0, 0.0);
        ai.decide(&mut s, 0, &mut seeded_rng());
        // Left scores as its nearest item (cherry, 100) < right (200).
        assert_eq!(s.player_lane, Lane::Right);
    }

    #[test]
    fn hard_fires_the_gun_when_a_bomb_is_visible() {
        let ai = AiEngine::new(Difficulty::Hard);
        let mut s = session_at_level(8, RewardModifier::Gun);
        s.spawn_item(ItemKind::Bomb, Lane::Left, 100.0, 0.0);
        ai.decide(&mut s, 1000, &mut seeded_rng());
        assert!(s.gun.is_active(1000));

        // Easy never does, even with the gun owned.
        let easy = AiEngine::new(Difficulty::Easy);
        let mut s = session_at_level(8, RewardModifier::Gun);
        s.spawn_item(ItemKind::Bomb, Lane::Left, 100.0, 0.0);
        easy.decide(&mut s, 1000, &mut seeded_rng());
        assert!(!s.gun.is_active(1000));
    }

    #[test]
    fn hard_fires_the_unlimited_gun_without_ownership() {
        let ai = AiEngine::new(Difficulty::Hard);
        let mut s = GameSession::new(SessionRules {
            unlimited_gun: true,
            ..Default::default()
        });
        s.start(
            StartConfig {
                start_level: 8,
                ..Default::default()
            },
            0,
        );
        s.spawn_rate_ms = u64::MAX;
        assert!(!s.gun.owned);

        s.spawn_item(ItemKind::Bomb, Lane::Left, 100.0, 0.0);
        ai.decide(&mut s, 1000, &mut seeded_rng());
        assert!(s.gun.is_active(1000));
    }

    #[test]
    fn poll_respects_the_reaction_interval() {
        let mut ai = AiEngine::new(Difficulty::Medium); // 500 ms
        let mut s = session_at_level(8, RewardModifier::None);
        s.spawn_item(ItemKind::Melon, Lane::Left, 200.0, 0.0);
        s.player_lane = Lane::Right;
        let mut rng = seeded_rng();

        ai.start(0);
        assert!(ai.is_running());
        ai.poll(&mut s, 100, &mut rng);
        assert_eq!(s.player_lane, Lane::Right, "too early to react");
        ai.poll(&mut s, 500, &mut rng);
        assert_eq!(s.player_lane, Lane::Left);

        ai.stop();
        assert!(!ai.is_running());
        s.player_lane = Lane::Right;
        ai.poll(&mut s, 5000, &mut rng);
        assert_eq!(s.player_lane, Lane::Right, "stopped engine must not act");
    }

    #[test]
    fn errors_are_suppressed_while_invincible() {
        // Easy profile at level 1 is invincible (floor 2), so the 30%
        // error roll never fires and the pick stays deterministic.
        let ai = AiEngine::new(Difficulty::Easy);
        let mut rng = seeded_rng();
        for _ in 0..50 {
            let mut s = session_at_level(1, RewardModifier::None);
            s.spawn_item(ItemKind::Melon, Lane::Center, 200.0, 0.0);
            s.player_lane = Lane::Right;
            ai.decide(&mut s, 0, &mut rng);
            assert_eq!(s.player_lane, Lane::Center);
        }
    }
}
