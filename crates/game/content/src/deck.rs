//! Refilling squeak-set deck.

use std::fmt;
use std::sync::Arc;

use squeak_core::{Deck, Dice, Squeak};
use tracing::trace;

/// Deck built from a set of `(squeak, copies)` entries.
///
/// When the pile runs out it is rebuilt from the full set and shuffled with
/// the match dice, so draws never end while the set is non-empty.
#[derive(Clone, Default)]
pub struct SqueakSetDeck {
    set: Vec<(Arc<dyn Squeak>, u32)>,
    pile: Vec<Arc<dyn Squeak>>,
}

impl SqueakSetDeck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, squeak: Arc<dyn Squeak>, copies: u32) -> Self {
        self.set.push((squeak, copies));
        self
    }

    /// Cards in one full pile.
    pub fn set_size(&self) -> usize {
        self.set.iter().map(|(_, copies)| *copies as usize).sum()
    }

    fn refill(&mut self, dice: &mut Dice<'_>) {
        self.pile = self
            .set
            .iter()
            .flat_map(|(squeak, copies)| (0..*copies).map(move |_| squeak.clone()))
            .collect();
        dice.shuffle(&mut self.pile);
        trace!(cards = self.pile.len(), "squeak set reshuffled");
    }
}

impl Deck for SqueakSetDeck {
    fn draw(&mut self, dice: &mut Dice<'_>) -> Option<Arc<dyn Squeak>> {
        if self.pile.is_empty() {
            self.refill(dice);
        }
        self.pile.pop()
    }

    fn remaining(&self) -> usize {
        self.pile.len()
    }
}

impl fmt::Debug for SqueakSetDeck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqueakSetDeck")
            .field("set", &self.set_size())
            .field("remaining", &self.pile.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use squeak_core::{EngineResult, GameManager, OddRCoord, PcgRng, SqueakKind};

    use super::*;

    struct Named(&'static str);

    impl Squeak for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn crumb_cost(&self) -> u32 {
            1
        }

        fn kind(&self) -> SqueakKind {
            SqueakKind::Trick
        }

        fn place(&self, _game: &mut GameManager, _coord: OddRCoord) -> EngineResult<bool> {
            Ok(false)
        }
    }

    fn draw_names(deck: &mut SqueakSetDeck, seed: u64, count: usize) -> Vec<String> {
        let mut rolls = 0;
        let mut dice = Dice::new(&PcgRng, seed, &mut rolls);
        (0..count)
            .filter_map(|_| deck.draw(&mut dice))
            .map(|squeak| squeak.name().to_string())
            .collect()
    }

    fn deck() -> SqueakSetDeck {
        SqueakSetDeck::new()
            .with(Arc::new(Named("a")), 2)
            .with(Arc::new(Named("b")), 1)
    }

    #[test]
    fn every_pile_is_a_permutation_of_the_set() {
        let mut deck = deck();
        assert_eq!(deck.set_size(), 3);
        assert_eq!(deck.remaining(), 0);

        let drawn = draw_names(&mut deck, 9, 6);
        for pile in drawn.chunks(3) {
            let mut pile = pile.to_vec();
            pile.sort();
            assert_eq!(pile, ["a", "a", "b"]);
        }
        assert_eq!(deck.remaining(), 0);
    }

    #[test]
    fn shuffles_are_seeded() {
        assert_eq!(draw_names(&mut deck(), 4, 9), draw_names(&mut deck(), 4, 9));
    }

    #[test]
    fn empty_set_draws_nothing() {
        let mut deck = SqueakSetDeck::new().with(Arc::new(Named("a")), 0);
        assert!(draw_names(&mut deck, 1, 3).is_empty());
    }
}
