/// Core vocabulary types: lanes, item kinds, falling items, reward
/// modifiers, the gun pickup. Pure data plus small queries — no game
/// logic lives here.

/// One of three discrete horizontal tracks items fall through.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Lane {
    Left,
    Center,
    Right,
}

impl Lane {
    pub const ALL: [Lane; 3] = [Lane::Left, Lane::Center, Lane::Right];

    pub fn index(self) -> usize {
        match self {
            Lane::Left => 0,
            Lane::Center => 1,
            Lane::Right => 2,
        }
    }

    pub fn from_index(i: usize) -> Lane {
        Lane::ALL[i % 3]
    }
}

/// What falls. Fruits carry fixed score values; bombs and rockets score
/// nothing directly (rockets pay out as boss damage).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ItemKind {
    Cherry,
    Apple,
    Melon,
    Bomb,
    Rocket,
}

impl ItemKind {
    pub fn score(self) -> u32 {
        match self {
            ItemKind::Cherry => 100,
            ItemKind::Apple => 200,
            ItemKind::Melon => 300,
            ItemKind::Bomb | ItemKind::Rocket => 0,
        }
    }

    /// Does letting this item cross the bottom boundary count as a miss?
    /// Bombs and rockets are free to drop.
    pub fn counts_as_miss(self) -> bool {
        !matches!(self, ItemKind::Bomb | ItemKind::Rocket)
    }
}

/// A falling item. `y` is the top of the item in field units
/// (negative = still above the visible field) and only ever increases
/// while the item is unclaimed.
#[derive(Clone, Debug)]
pub struct FallingItem {
    pub id: u64,
    pub kind: ItemKind,
    pub lane: Lane,
    pub y: f32,
    pub speed: f32,
    /// Set once an in-flight gun zap has claimed the item. A claimed item
    /// is frozen and cannot be missed, caught, or claimed again.
    pub claimed: bool,
    /// Deadline (ms) at which a claimed item resolves. None while unclaimed.
    pub claim_deadline: Option<u64>,
}

impl FallingItem {
    pub fn new(id: u64, kind: ItemKind, lane: Lane, y: f32, speed: f32) -> Self {
        FallingItem {
            id,
            kind,
            lane,
            y,
            speed,
            claimed: false,
            claim_deadline: None,
        }
    }
}

/// Reward modifier chosen before the session starts, consumed during play.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RewardModifier {
    None,
    /// Raises the miss allowance from 2 to 3.
    ExtraLife,
    /// Grants a single-use auto-destroy weapon.
    Gun,
}

/// The gun pickup: single-use, and once activated runs until a fixed
/// deadline, auto-claiming every item that enters the visible field.
#[derive(Clone, Copy, Debug, Default)]
pub struct GunState {
    pub owned: bool,
    /// Timestamp (ms) the weapon switches off. None = not active.
    pub active_until: Option<u64>,
}

impl GunState {
    pub fn is_active(&self, now: u64) -> bool {
        self.active_until.map_or(false, |t| now < t)
    }
}
