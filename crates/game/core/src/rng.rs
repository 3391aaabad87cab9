//! RNG oracle for deterministic random number generation.
//!
//! The engine never owns a stateful generator. Every roll derives a seed from
//! the match seed plus a monotonically increasing roll counter, so the same
//! seed and the same call sequence reproduce the same deck shuffles and rolls.

/// RNG oracle for deterministic random number generation.
///
/// Implementations must be deterministic and produce the same values
/// given the same seed.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Roll a d100 (1-100 inclusive).
    fn roll_d100(&self, seed: u64) -> u32 {
        (self.next_u32(seed) % 100) + 1
    }

    /// Generate a random value in range [min, max] inclusive.
    fn range(&self, seed: u64, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        let range = max - min + 1;
        min + (self.next_u32(seed) % range)
    }
}

/// PCG random number generator (PCG-XSH-RR, 64-bit state, 32-bit output).
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::pcg_output(Self::pcg_step(seed))
    }
}

/// Compute a deterministic seed from the match seed and roll context.
///
/// * `game_seed` - Base seed set at match start
/// * `roll` - Roll counter (increments on every roll the engine makes)
/// * `context` - Disambiguates independent rolls sharing a counter value
pub fn compute_seed(game_seed: u64, roll: u64, context: u32) -> u64 {
    let mut hash = game_seed;
    hash ^= roll.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}

/// Seeded roll source handed to collaborators (decks, dodge checks).
///
/// Wraps an [`RngOracle`] with the match seed and a roll counter.
pub struct Dice<'a> {
    oracle: &'a dyn RngOracle,
    game_seed: u64,
    rolls: &'a mut u64,
}

impl<'a> Dice<'a> {
    pub fn new(oracle: &'a dyn RngOracle, game_seed: u64, rolls: &'a mut u64) -> Self {
        Self {
            oracle,
            game_seed,
            rolls,
        }
    }

    fn next_seed(&mut self, context: u32) -> u64 {
        let seed = compute_seed(self.game_seed, *self.rolls, context);
        *self.rolls += 1;
        seed
    }

    /// Uniform value in `[min, max]`.
    pub fn range(&mut self, min: u32, max: u32) -> u32 {
        let seed = self.next_seed(0);
        self.oracle.range(seed, min, max)
    }

    /// Returns true with `percent`% probability.
    pub fn chance(&mut self, percent: u32) -> bool {
        let seed = self.next_seed(1);
        self.oracle.roll_d100(seed) <= percent
    }

    /// Fisher-Yates shuffle.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.range(0, i as u32) as usize;
            items.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_value() {
        let rng = PcgRng;
        assert_eq!(rng.next_u32(42), rng.next_u32(42));
        assert_ne!(rng.next_u32(42), rng.next_u32(43));
    }

    #[test]
    fn range_is_inclusive_and_bounded() {
        let rng = PcgRng;
        for seed in 0..500 {
            let value = rng.range(seed, 3, 7);
            assert!((3..=7).contains(&value));
        }
        assert_eq!(rng.range(9, 5, 5), 5);
    }

    #[test]
    fn shuffle_is_reproducible() {
        let rng = PcgRng;
        let mut rolls_a = 0;
        let mut rolls_b = 0;
        let mut a: Vec<u32> = (0..20).collect();
        let mut b = a.clone();

        Dice::new(&rng, 7, &mut rolls_a).shuffle(&mut a);
        Dice::new(&rng, 7, &mut rolls_b).shuffle(&mut b);

        assert_eq!(a, b);
        assert_eq!(rolls_a, 19);

        let mut sorted = a.clone();
        sorted.sort();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }
}
