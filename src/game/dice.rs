//! Randomized outcome generator — uniform die rolls for the mini-games.
//!
//! Each game picks its own inclusive range (counting 1–6, jumping 1–3,
//! feeding 1–4). The generator is deliberately dumb: range policy such as the
//! feeding clamp lives with the game that needs it.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Inclusive range rolled by the counting game.
pub const COUNT_RANGE: (u8, u8) = (1, 6);
/// Inclusive range rolled by the jump game. Kept small so hop counts stay short.
pub const JUMP_RANGE: (u8, u8) = (1, 3);
/// Inclusive range rolled by the feeding game before clamping.
pub const FEED_RANGE: (u8, u8) = (1, 4);
/// Inclusive range for the number of apples at the start of a feeding round.
pub const APPLE_RANGE: (u8, u8) = (5, 10);

/// Anything that can produce a die outcome.
pub trait OutcomeSource {
    /// Roll a uniformly distributed integer in `[min, max]` inclusive.
    fn roll(&mut self, min: u8, max: u8) -> u8;
}

/// Production source: a seeded ChaCha8 stream. Not for anything secret.
#[derive(Debug, Clone)]
pub struct SeededDice {
    rng: ChaCha8Rng,
}

impl SeededDice {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl OutcomeSource for SeededDice {
    fn roll(&mut self, min: u8, max: u8) -> u8 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        self.rng.random_range(lo..=hi)
    }
}

/// Replays a fixed list of outcomes, clamped into the requested range.
/// Falls back to `min` once the script runs out.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    outcomes: VecDeque<u8>,
}

impl ScriptedDice {
    pub fn new(outcomes: impl IntoIterator<Item = u8>) -> Self {
        Self {
            outcomes: outcomes.into_iter().collect(),
        }
    }

    /// Queue another outcome at the back of the script.
    pub fn push(&mut self, outcome: u8) {
        self.outcomes.push_back(outcome);
    }

    pub fn remaining(&self) -> usize {
        self.outcomes.len()
    }
}

impl OutcomeSource for ScriptedDice {
    fn roll(&mut self, min: u8, max: u8) -> u8 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        self.outcomes
            .pop_front()
            .map(|v| v.clamp(lo, hi))
            .unwrap_or(lo)
    }
}
