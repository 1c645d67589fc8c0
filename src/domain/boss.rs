/// Boss state machine.
///
/// The boss hovers above the lanes and slides horizontally, reflecting at
/// the edges of its corridor. It has no attacks of its own — pressure
/// comes from the spawn table switching to rockets and bombs — and dies
/// after catching 15 rockets thrown back at it.

/// Horizontal corridor the boss oscillates in, in percent of field width.
pub const POS_MIN: f32 = 10.0;
pub const POS_MAX: f32 = 90.0;

/// Horizontal distance covered per frame tick.
const STEP: f32 = 0.5;

pub const MAX_HP: u32 = 15;

#[derive(Clone, Debug)]
pub struct BossState {
    pub hp: u32,
    pub max_hp: u32,
    /// Horizontal position in [POS_MIN, POS_MAX].
    pub pos: f32,
    /// -1.0 or +1.0.
    dir: f32,
}

impl BossState {
    pub fn new() -> Self {
        BossState {
            hp: MAX_HP,
            max_hp: MAX_HP,
            pos: 50.0,
            dir: 1.0,
        }
    }

    /// Advance one frame: slide sideways, reflect at the corridor bounds.
    pub fn advance(&mut self) {
        self.pos += self.dir * STEP;
        if self.pos >= POS_MAX {
            self.pos = POS_MAX;
            self.dir = -1.0;
        } else if self.pos <= POS_MIN {
            self.pos = POS_MIN;
            self.dir = 1.0;
        }
    }

    /// Apply one rocket hit. HP never wraps below zero.
    pub fn take_hit(&mut self) {
        self.hp = self.hp.saturating_sub(1);
    }

    pub fn is_defeated(&self) -> bool {
        self.hp == 0
    }
}
