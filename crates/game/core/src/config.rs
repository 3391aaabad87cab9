/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Maximum upward height difference a unit can step across.
    pub jump_height: u32,
    /// Number of squeaks held in each side's hand.
    pub hand_length: usize,
    /// Turns per crumb-schedule step (`ceil(turn / crumb_step_turns)`).
    pub crumb_step_turns: u32,
    /// Crumbs added per schedule step.
    pub crumb_step_amount: u32,
    /// Upper bound of the base crumb schedule.
    pub crumb_cap: u32,
}

impl GameConfig {
    // ===== compile-time constants =====
    /// Minimum damage any hit inflicts after defense.
    pub const MINIMAL_DAMAGE_TAKEN: u32 = 1;
    /// Number of neighbors of a hex cell.
    pub const HEX_DIRECTIONS: usize = 6;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_JUMP_HEIGHT: u32 = 1;
    pub const DEFAULT_HAND_LENGTH: usize = 5;
    pub const DEFAULT_CRUMB_STEP_TURNS: u32 = 4;
    pub const DEFAULT_CRUMB_STEP_AMOUNT: u32 = 10;
    pub const DEFAULT_CRUMB_CAP: u32 = 50;

    pub fn new() -> Self {
        Self {
            jump_height: Self::DEFAULT_JUMP_HEIGHT,
            hand_length: Self::DEFAULT_HAND_LENGTH,
            crumb_step_turns: Self::DEFAULT_CRUMB_STEP_TURNS,
            crumb_step_amount: Self::DEFAULT_CRUMB_STEP_AMOUNT,
            crumb_cap: Self::DEFAULT_CRUMB_CAP,
        }
    }

    pub fn with_jump_height(mut self, jump_height: u32) -> Self {
        self.jump_height = jump_height;
        self
    }

    pub fn with_hand_length(mut self, hand_length: usize) -> Self {
        self.hand_length = hand_length;
        self
    }

    /// Base crumb grant for a turn: `min(ceil(turn / step_turns) * step_amount, cap)`.
    pub fn base_crumbs(&self, turn_count: u32) -> u32 {
        let steps = turn_count.div_ceil(self.crumb_step_turns.max(1));
        steps
            .saturating_mul(self.crumb_step_amount)
            .min(self.crumb_cap)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
