/// Collision resolution: the catch band and what catching each item
/// kind means. Pure functions — the session applies the outcomes.
///
/// Field geometry lives here because the catch band defines it: items
/// spawn above y = 0, fall through [0, FIELD_BOTTOM), may be caught while
/// overlapping the band near the bottom, and count as missed (or silently
/// dropped) once past FIELD_BOTTOM.

use super::item::ItemKind;

/// Vertical depth of the play field in field units.
pub const FIELD_BOTTOM: f32 = 500.0;

/// The player hitbox band, fixed near the bottom of the field.
pub const BAND_TOP: f32 = 420.0;
pub const BAND_BOTTOM: f32 = 490.0;

/// Item sprite height in field units.
pub const ITEM_HEIGHT: f32 = 36.0;

/// Inset tolerance on both band edges. Keeps grazing overlaps from
/// registering as pixel-perfect flicker catches.
const INSET: f32 = 6.0;

/// Does an item whose top edge sits at `y` overlap the catch band?
/// Both edges are tightened by the inset tolerance.
pub fn in_catch_band(y: f32) -> bool {
    y + ITEM_HEIGHT - INSET > BAND_TOP && y + INSET < BAND_BOTTOM
}

/// What resolving a caught item does to the session.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CatchOutcome {
    /// Fruit caught: award its fixed score.
    Score(u32),
    /// Bomb caught without protection: the session ends in a loss.
    BombHit,
    /// Bomb destroyed harmlessly — 200 under the gun, 0 under invincibility.
    BombDefused { points: u32 },
    /// Rocket caught: 1 boss damage, no direct score, no miss impact.
    BossHit,
}

/// Resolve a catch. Each item resolves exactly once; the caller removes
/// it from the field afterwards.
pub fn resolve(kind: ItemKind, gun_active: bool, invincible: bool) -> CatchOutcome {
    match kind {
        ItemKind::Rocket => CatchOutcome::BossHit,
        ItemKind::Bomb if gun_active => CatchOutcome::BombDefused { points: 200 },
        ItemKind::Bomb if invincible => CatchOutcome::BombDefused { points: 0 },
        ItemKind::Bomb => CatchOutcome::BombHit,
        fruit => CatchOutcome::Score(fruit.score()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_overlap_edges() {
        // Fully above the band
        assert!(!in_catch_band(300.0));
        // Centered in the band
        assert!(in_catch_band(440.0));
        // Bottom edge of the item barely inside the raw band but within
        // the inset tolerance — no catch
        assert!(!in_catch_band(BAND_TOP - ITEM_HEIGHT + 3.0));
        // Past the band, item top below the tightened bottom edge
        assert!(!in_catch_band(BAND_BOTTOM - 2.0));
    }

    #[test]
    fn fruit_awards_its_value() {
        assert_eq!(resolve(ItemKind::Melon, false, false), CatchOutcome::Score(300));
        assert_eq!(resolve(ItemKind::Cherry, true, true), CatchOutcome::Score(100));
    }

    #[test]
    fn bomb_resolution_depends_on_protection() {
        assert_eq!(resolve(ItemKind::Bomb, false, false), CatchOutcome::BombHit);
        assert_eq!(
            resolve(ItemKind::Bomb, true, false),
            CatchOutcome::BombDefused { points: 200 }
        );
        // Gun takes precedence over invincibility for the payout
        assert_eq!(
            resolve(ItemKind::Bomb, true, true),
            CatchOutcome::BombDefused { points: 200 }
        );
        assert_eq!(
            resolve(ItemKind::Bomb, false, true),
            CatchOutcome::BombDefused { points: 0 }
        );
    }

    #[test]
    fn rocket_always_hits_the_boss() {
        assert_eq!(resolve(ItemKind::Rocket, false, false), CatchOutcome::BossHit);
        assert_eq!(resolve(ItemKind::Rocket, true, false), CatchOutcome::BossHit);
    }
}
