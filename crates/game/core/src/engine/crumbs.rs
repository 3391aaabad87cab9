use std::ops::RangeInclusive;

use crate::config::GameConfig;
use crate::side::{Side, SideMap};

/// Adjustments layered over the base crumb schedule.
///
/// `crumbs = max(0, floor(base * (100 + turn% + side%) / 100) + turn+ + side+)`
/// where the turn terms sum every range containing the current round.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CrumbsPerTurnModifier {
    side_percent: SideMap<i32>,
    side_adder: SideMap<i32>,
    turn_percent: Vec<(RangeInclusive<u32>, i32)>,
    turn_adder: Vec<(RangeInclusive<u32>, i32)>,
}

impl CrumbsPerTurnModifier {
    pub fn side_percent(&self, side: Side) -> i32 {
        self.side_percent[side]
    }

    pub fn side_adder(&self, side: Side) -> i32 {
        self.side_adder[side]
    }

    pub fn add_side_percent(&mut self, side: Side, percent: i32) {
        self.side_percent[side] += percent;
    }

    pub fn add_side_adder(&mut self, side: Side, amount: i32) {
        self.side_adder[side] += amount;
    }

    pub fn add_turn_percent(&mut self, turns: RangeInclusive<u32>, percent: i32) {
        self.turn_percent.push((turns, percent));
    }

    pub fn add_turn_adder(&mut self, turns: RangeInclusive<u32>, amount: i32) {
        self.turn_adder.push((turns, amount));
    }

    /// Crumbs granted to `side` at the start of its turn in round `turn_count`.
    pub fn crumbs(&self, config: &GameConfig, turn_count: u32, side: Side) -> u32 {
        let in_turn = |entries: &[(RangeInclusive<u32>, i32)]| -> i64 {
            entries
                .iter()
                .filter(|(turns, _)| turns.contains(&turn_count))
                .map(|(_, value)| i64::from(*value))
                .sum()
        };
        let base = i64::from(config.base_crumbs(turn_count));
        let percent = 100 + in_turn(&self.turn_percent) + i64::from(self.side_percent[side]);
        let scaled = (base * percent).div_euclid(100);
        let total = scaled + in_turn(&self.turn_adder) + i64::from(self.side_adder[side]);
        total.clamp(0, i64::from(u32::MAX)) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_modifier_follows_base_schedule() {
        let config = GameConfig::default();
        let modifier = CrumbsPerTurnModifier::default();
        for turn in 1..30 {
            assert_eq!(
                modifier.crumbs(&config, turn, Side::Rat),
                config.base_crumbs(turn)
            );
        }
    }

    #[test]
    fn percent_is_floored_and_side_specific() {
        let config = GameConfig::default();
        let mut modifier = CrumbsPerTurnModifier::default();
        modifier.add_side_percent(Side::Rat, 15);

        assert_eq!(modifier.crumbs(&config, 1, Side::Rat), 11);
        assert_eq!(modifier.crumbs(&config, 5, Side::Rat), 23);
        assert_eq!(modifier.crumbs(&config, 1, Side::Mouse), 10);
    }

    #[test]
    fn turn_ranges_apply_only_inside() {
        let config = GameConfig::default();
        let mut modifier = CrumbsPerTurnModifier::default();
        modifier.add_turn_adder(2..=3, 4);
        modifier.add_turn_percent(3..=3, 100);

        assert_eq!(modifier.crumbs(&config, 1, Side::Mouse), 10);
        assert_eq!(modifier.crumbs(&config, 2, Side::Mouse), 14);
        assert_eq!(modifier.crumbs(&config, 3, Side::Mouse), 24);
        assert_eq!(modifier.crumbs(&config, 4, Side::Mouse), 10);
    }

    #[test]
    fn negative_totals_clamp_to_zero() {
        let config = GameConfig::default();
        let mut modifier = CrumbsPerTurnModifier::default();
        modifier.add_side_adder(Side::Mouse, -25);
        modifier.add_side_percent(Side::Rat, -300);

        assert_eq!(modifier.crumbs(&config, 1, Side::Mouse), 0);
        assert_eq!(modifier.crumbs(&config, 1, Side::Rat), 0);
    }
}
