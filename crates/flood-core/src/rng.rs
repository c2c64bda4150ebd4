//! Simple seeded PRNG for board generation.
//!
//! Challenge budgets are computed by regenerating a board from its seed and
//! solving the copy, so the same seed must produce the same board in every
//! build. A small PCG-style generator keeps that stream under our control.

use std::sync::atomic::{AtomicU64, Ordering};

pub(crate) struct Pcg32 {
    state: u64,
}

impl Pcg32 {
    pub(crate) fn with_seed(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(1),
        }
    }

    /// Draw a seed from the platform entropy source.
    pub(crate) fn entropy_seed() -> u64 {
        let mut seed_bytes = [0u8; 8];
        getrandom::getrandom(&mut seed_bytes).unwrap_or_else(|_| {
            // Fallback: use a static counter if getrandom fails
            static COUNTER: AtomicU64 = AtomicU64::new(1);
            let counter = COUNTER.fetch_add(1, Ordering::Relaxed);
            seed_bytes = counter.to_le_bytes();
        });
        u64::from_le_bytes(seed_bytes)
    }

    fn next_u32(&mut self) -> u32 {
        // PCG-like step
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let xorshifted = (((self.state >> 18) ^ self.state) >> 27) as u32;
        let rot = (self.state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    /// Uniform color draw in `1..=max_color`.
    pub(crate) fn next_color(&mut self, max_color: u8) -> u8 {
        1 + (self.next_u32() % u32::from(max_color)) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = Pcg32::with_seed(42);
        let mut b = Pcg32::with_seed(42);
        for _ in 0..64 {
            assert_eq!(a.next_color(6), b.next_color(6));
        }
    }

    #[test]
    fn test_colors_stay_in_range() {
        for max in 1..=9u8 {
            let mut rng = Pcg32::with_seed(7);
            for _ in 0..256 {
                let color = rng.next_color(max);
                assert!(color >= 1 && color <= max);
            }
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = Pcg32::with_seed(1);
        let mut b = Pcg32::with_seed(2);
        let first: Vec<u8> = (0..32).map(|_| a.next_color(9)).collect();
        let second: Vec<u8> = (0..32).map(|_| b.next_color(9)).collect();
        assert_ne!(first, second);
    }
}
