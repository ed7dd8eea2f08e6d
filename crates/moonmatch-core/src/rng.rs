//! Random number generator abstraction for determinism.
//!
//! In production, this wraps the thread-local RNG. In tests, a seeded or
//! scripted implementation is injected so that word draws are repeatable.

use rand::Rng;

/// Abstraction over random number generation.
pub trait DeterministicRng: Send {
    /// Generate a random `u32` in the range `[min, max]` inclusive.
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32;

    /// Pick `count` distinct indices uniformly at random from `0..population`,
    /// without replacement. Returns fewer than `count` only when the
    /// population itself is smaller.
    fn sample_indices(&mut self, population: usize, count: usize) -> Vec<usize> {
        if population == 0 || count == 0 {
            return Vec::new();
        }
        let count = count.min(population);
        // Partial Fisher-Yates: the first `count` slots end up uniformly drawn.
        let mut indices: Vec<usize> = (0..population).collect();
        for i in 0..count {
            #[allow(clippy::cast_possible_truncation)]
            let j = self.next_u32_range(i as u32, (population - 1) as u32) as usize;
            indices.swap(i, j);
        }
        indices.truncate(count);
        indices
    }
}

/// Production RNG backed by the thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRng;

impl DeterministicRng for SystemRng {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        rand::rng().random_range(min..=max)
    }
}
