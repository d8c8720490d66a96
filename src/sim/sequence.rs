//! Round sequence and its generator
//!
//! Randomness comes only from an injected [`CubeSource`]; the default is a
//! seeded PCG32 so whole games can be replayed from a seed.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::error::{BloomError, Result};

/// Ordered cube indices the player has to repeat.
///
/// Append-only during a game; cleared entirely when the player loses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    steps: Vec<u32>,
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cube: u32) {
        self.steps.push(cube);
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<u32> {
        self.steps.get(position).copied()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.steps
    }

    /// Highest round reached this game
    pub fn score(&self) -> u32 {
        self.steps.len() as u32
    }
}

impl From<Vec<u32>> for Sequence {
    fn from(steps: Vec<u32>) -> Self {
        Self { steps }
    }
}

impl std::fmt::Display for Sequence {
    /// One-based cube numbers, matching the keys the player presses
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keys: Vec<String> = self.steps.iter().map(|c| (c + 1).to_string()).collect();
        write!(f, "[{}]", keys.join(", "))
    }
}

/// Source of uniformly distributed cube picks
pub trait CubeSource {
    /// A value in `0..cube_count`
    fn next_cube(&mut self, cube_count: u32) -> u32;
}

/// Seeded PCG32 cube source
#[derive(Debug, Clone)]
pub struct SeededSource {
    seed: u64,
    rng: Pcg32,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl CubeSource for SeededSource {
    fn next_cube(&mut self, cube_count: u32) -> u32 {
        self.rng.random_range(0..cube_count)
    }
}

/// Grows a [`Sequence`] by one random cube per round
pub struct SequenceGenerator {
    source: Box<dyn CubeSource>,
    cube_count: u32,
}

impl SequenceGenerator {
    pub fn new(source: Box<dyn CubeSource>, cube_count: u32) -> Result<Self> {
        if cube_count == 0 {
            return Err(BloomError::NoCubes);
        }
        Ok(Self { source, cube_count })
    }

    pub fn seeded(seed: u64, cube_count: u32) -> Result<Self> {
        Self::new(Box::new(SeededSource::new(seed)), cube_count)
    }

    pub fn cube_count(&self) -> u32 {
        self.cube_count
    }

    /// Append one cube to `sequence` and return it
    pub fn next(&mut self, sequence: &mut Sequence) -> u32 {
        // Keep values in range even for a misbehaving source
        let cube = self.source.next_cube(self.cube_count) % self.cube_count;
        sequence.push(cube);
        cube
    }
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedSource;
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_generator_appends_one() {
        let mut generator = SequenceGenerator::seeded(7, 4).unwrap();
        let mut sequence = Sequence::new();
        let first = generator.next(&mut sequence);
        assert_eq!(sequence.as_slice(), &[first]);
        let second = generator.next(&mut sequence);
        assert_eq!(sequence.as_slice(), &[first, second]);
        assert_eq!(sequence.score(), 2);
    }

    #[test]
    fn test_zero_cubes_rejected() {
        assert!(matches!(
            SequenceGenerator::seeded(1, 0),
            Err(BloomError::NoCubes)
        ));
    }

    #[test]
    fn test_scripted_source() {
        let source = ScriptedSource::new(&[2, 0, 1]);
        let mut generator = SequenceGenerator::new(Box::new(source), 4).unwrap();
        let mut sequence = Sequence::new();
        for _ in 0..4 {
            generator.next(&mut sequence);
        }
        assert_eq!(sequence.as_slice(), &[2, 0, 1, 1]);
    }

    #[test]
    fn test_out_of_range_pick_wraps() {
        let source = ScriptedSource::new(&[6]);
        let mut generator = SequenceGenerator::new(Box::new(source), 4).unwrap();
        let mut sequence = Sequence::new();
        assert_eq!(generator.next(&mut sequence), 2);
    }

    #[test]
    fn test_display_is_one_based() {
        let sequence = Sequence::from(vec![0, 3, 1]);
        assert_eq!(sequence.to_string(), "[1, 4, 2]");
    }

    proptest! {
        #[test]
        fn prop_same_seed_same_sequence(seed in any::<u64>(), len in 1usize..64) {
            let mut a = SequenceGenerator::seeded(seed, 4).unwrap();
            let mut b = SequenceGenerator::seeded(seed, 4).unwrap();
            let mut seq_a = Sequence::new();
            let mut seq_b = Sequence::new();
            for _ in 0..len {
                a.next(&mut seq_a);
                b.next(&mut seq_b);
            }
            prop_assert_eq!(&seq_a, &seq_b);
            prop_assert!(seq_a.as_slice().iter().all(|&c| c < 4));
        }
    }
}
