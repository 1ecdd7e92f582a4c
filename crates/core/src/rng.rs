//! RNG module - deterministic randomness for tile spawns
//!
//! A small LCG keeps every board reproducible from its seed, which the tests
//! and benches rely on. The spawn helpers pick an empty cell and a starting
//! level for freshly spawned tiles.

use crate::types::Level;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high bits; the low bits of an LCG have short periods.
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max <= 1 {
            return 0;
        }
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// True with the given probability in percent (clamped to 0..=100).
    pub fn roll_percent(&mut self, percent: u8) -> bool {
        self.next_range(100) < percent.min(100) as u32
    }

    /// Pick one element of a non-empty slice.
    pub fn pick<T: Copy>(&mut self, items: &[T]) -> Option<T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.next_range(items.len() as u32) as usize;
        Some(items[idx])
    }

    /// Starting level for a spawned tile: 2 with `level_two_percent` chance, else 1.
    pub fn spawn_level(&mut self, level_two_percent: u8) -> Level {
        if self.roll_percent(level_two_percent) {
            2
        } else {
            1
        }
    }

    /// Current RNG state (restarting from it replays the same spawns).
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);

        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_different_seeds() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(54321);
        assert_ne!(rng1.next_u32(), rng2.next_u32());
    }

    #[test]
    fn test_zero_seed_is_usable() {
        let mut rng = SimpleRng::new(0);
        assert_eq!(rng.state(), 1);
        assert_ne!(rng.next_u32(), 0);
    }

    #[test]
    fn test_next_range_bounds() {
        let mut rng = SimpleRng::new(7);
        for _ in 0..1000 {
            assert!(rng.next_range(13) < 13);
        }
        assert_eq!(rng.next_range(0), 0);
        assert_eq!(rng.next_range(1), 0);
    }

    #[test]
    fn test_roll_percent_extremes() {
        let mut rng = SimpleRng::new(99);
        for _ in 0..200 {
            assert!(!rng.roll_percent(0));
            assert!(rng.roll_percent(100));
        }
    }

    #[test]
    fn test_spawn_level_is_one_or_two() {
        let mut rng = SimpleRng::new(3);
        let mut saw_one = false;
        let mut saw_two = false;
        for _ in 0..500 {
            match rng.spawn_level(50) {
                1 => saw_one = true,
                2 => saw_two = true,
                other => panic!("unexpected spawn level {other}"),
            }
        }
        assert!(saw_one && saw_two);
    }

    #[test]
    fn test_pick_empty_slice() {
        let mut rng = SimpleRng::new(5);
        let empty: [u8; 0] = [];
        assert_eq!(rng.pick(&empty), None);
        assert_eq!(rng.pick(&[42u8]), Some(42));
    }
}
