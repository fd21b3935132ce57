//! Seeded dice.
//!
//! Rolls are stateless: every call takes a seed derived with
//! [`compute_seed`] from the encounter seed, the action nonce, the acting
//! unit and a per-roll counter. Replaying the same commands against the same
//! seed reproduces every variance, crit, parry and status roll.

use crate::state::UnitId;

/// Source of every random roll in combat.
///
/// Stateless: equal seeds must yield equal values.
pub trait RngOracle: Send + Sync {
    /// Raw 32-bit output for `seed`.
    fn next_u32(&self, seed: u64) -> u32;

    /// 1 through 100.
    fn roll_d100(&self, seed: u64) -> u32 {
        (self.next_u32(seed) % 100) + 1
    }

    /// Uniform in `min..=max`; `min` when the range is empty or a point.
    fn range(&self, seed: u64, min: u32, max: u32) -> u32 {
        match max.checked_sub(min) {
            Some(span) if span > 0 => min + self.next_u32(seed) % (span + 1),
            _ => min,
        }
    }

    /// Succeeds with `probability` in [0, 1], at whole-percent resolution.
    fn chance(&self, seed: u64, probability: f64) -> bool {
        if probability <= 0.0 {
            return false;
        }
        if probability >= 1.0 {
            return true;
        }
        f64::from(self.roll_d100(seed)) <= probability * 100.0
    }

    /// Variance multiplier in percent, uniform in [min, max].
    fn variance_percent(&self, seed: u64, min: u32, max: u32) -> u32 {
        self.range(seed, min, max)
    }
}

/// One PCG-XSH-RR step per roll: the seed is the 64-bit state.
///
/// See <https://www.pcg-random.org/>.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    fn permute(state: u64) -> u32 {
        let shifted = (((state >> 18) ^ state) >> 27) as u32;
        shifted.rotate_right((state >> 59) as u32)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        let state = seed
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
        Self::permute(state)
    }
}

/// Fixed oracle: variance is always 100% and every d100 roll is 100, so
/// crits, parries and partial-chance rolls never succeed.
#[derive(Clone, Copy, Debug, Default)]
pub struct NeutralRng;

impl RngOracle for NeutralRng {
    fn next_u32(&self, _seed: u64) -> u32 {
        99
    }

    fn variance_percent(&self, _seed: u64, min: u32, max: u32) -> u32 {
        100u32.clamp(min, max)
    }
}

/// Fixed oracle: variance is always 100% and every d100 roll is 1, so every
/// non-zero chance succeeds.
#[derive(Clone, Copy, Debug, Default)]
pub struct LuckyRng;

impl RngOracle for LuckyRng {
    fn next_u32(&self, _seed: u64) -> u32 {
        0
    }

    fn variance_percent(&self, _seed: u64, min: u32, max: u32) -> u32 {
        100u32.clamp(min, max)
    }
}

/// Mixes the encounter seed, the action nonce, the unit being processed and
/// a per-roll counter into one roll seed.
pub fn compute_seed(game_seed: u64, nonce: u64, actor_id: u32, context: u32) -> u64 {
    let mixed = game_seed
        ^ nonce.wrapping_mul(0x9e3779b97f4a7c15)
        ^ u64::from(actor_id).wrapping_mul(0x517cc1b727220a95)
        ^ u64::from(context).wrapping_mul(0x85ebca6b);

    // murmur3 finalizer
    let mixed = (mixed ^ (mixed >> 33)).wrapping_mul(0xff51afd7ed558ccd);
    mixed ^ (mixed >> 33)
}

/// Hands out a fresh seed per roll within one action.
#[derive(Clone, Copy, Debug)]
pub struct SeedStream {
    game_seed: u64,
    nonce: u64,
    actor: UnitId,
    context: u32,
}

impl SeedStream {
    pub fn new(game_seed: u64, nonce: u64, actor: UnitId) -> Self {
        Self::with_context(game_seed, nonce, actor, 0)
    }

    /// Starts the counter at `context` to keep separate passes apart.
    pub fn with_context(game_seed: u64, nonce: u64, actor: UnitId, context: u32) -> Self {
        Self {
            game_seed,
            nonce,
            actor,
            context,
        }
    }

    pub fn next_seed(&mut self) -> u64 {
        let seed = compute_seed(self.game_seed, self.nonce, self.actor.0, self.context);
        self.context = self.context.wrapping_add(1);
        seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pcg_is_deterministic() {
        let rng = PcgRng;
        assert_eq!(rng.next_u32(42), rng.next_u32(42));
        assert_ne!(rng.next_u32(42), rng.next_u32(43));
    }

    #[test]
    fn rolls_stay_in_range() {
        let rng = PcgRng;
        for seed in 0..500 {
            let d100 = rng.roll_d100(seed);
            assert!((1..=100).contains(&d100));
            let variance = rng.variance_percent(seed, 80, 120);
            assert!((80..=120).contains(&variance));
        }
    }

    #[test]
    fn chance_edges() {
        assert!(!PcgRng.chance(1, 0.0));
        assert!(PcgRng.chance(1, 1.0));
        assert!(!NeutralRng.chance(1, 0.95));
        assert!(LuckyRng.chance(1, 0.01));
    }

    #[test]
    fn seed_stream_varies_per_roll() {
        let mut stream = SeedStream::new(9, 3, UnitId(4));
        let first = stream.next_seed();
        let second = stream.next_seed();
        assert_ne!(first, second);
        assert_eq!(first, compute_seed(9, 3, 4, 0));
    }
}
