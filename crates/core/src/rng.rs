//! RNG module - 7-bag random piece generation
//!
//! Each bag contains one of each shape, shuffled. Draws come from the bag
//! until it is empty, then a new bag is shuffled. Every run of 7 draws
//! aligned on a bag boundary therefore holds each shape exactly once.
//!
//! The bag is owned by one engine instance, so games never share state.
//! A small LCG keeps the sequence deterministic for a given seed.

use crate::types::Shape;

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
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        // Low bits of an LCG have short periods
        (self.next_u32() >> 8) % max.max(1)
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

/// 7-bag shape generator
#[derive(Debug, Clone)]
pub struct RandomBag {
    bag: [Shape; 7],
    /// Index of the next shape to hand out
    bag_index: usize,
    rng: SimpleRng,
}

impl RandomBag {
    pub fn new(seed: u32) -> Self {
        let mut bag = Self {
            bag: Shape::ALL,
            bag_index: 7,
            rng: SimpleRng::new(seed),
        };
        bag.refill();
        bag
    }

    fn refill(&mut self) {
        self.bag = Shape::ALL;
        self.rng.shuffle(&mut self.bag);
        self.bag_index = 0;
    }

    /// Draw the next shape, reshuffling when the bag runs out
    pub fn draw(&mut self) -> Shape {
        if self.bag_index >= self.bag.len() {
            self.refill();
        }
        let shape = self.bag[self.bag_index];
        self.bag_index += 1;
        shape
    }

    /// Shapes left in the current bag
    pub fn remaining(&self) -> &[Shape] {
        &self.bag[self.bag_index..]
    }
}

impl Default for RandomBag {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);
        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_zero_seed() {
        let mut rng = SimpleRng::new(0);
        assert_ne!(rng.next_u32(), 0);
    }

    #[test]
    fn test_bag_starts_full() {
        let bag = RandomBag::new(1);
        assert_eq!(bag.remaining().len(), 7);
    }

    #[test]
    fn test_every_bag_holds_each_shape_once() {
        for seed in [1, 7, 42, 12345, 987654] {
            let mut bag = RandomBag::new(seed);
            for _ in 0..20 {
                let drawn: HashSet<Shape> = (0..7).map(|_| bag.draw()).collect();
                assert_eq!(drawn.len(), 7, "seed {}", seed);
            }
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = RandomBag::new(99);
        let mut b = RandomBag::new(99);
        for _ in 0..50 {
            assert_eq!(a.draw(), b.draw());
        }
    }

    #[test]
    fn test_bags_are_shuffled() {
        let mut bag = RandomBag::new(3);
        let orders: HashSet<Vec<Shape>> = (0..10)
            .map(|_| (0..7).map(|_| bag.draw()).collect())
            .collect();
        assert!(orders.len() > 1);
    }
}
