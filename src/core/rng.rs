//! Injected randomness.
//!
//! The only random decision the rules make is the role deal, and it must be
//! unpredictable to players yet reproducible for tests and replays. A
//! `GameRng` is therefore supplied by whoever builds the game: a fixed seed
//! in tests, OS entropy at a real table.
//!
//! The generator's position is part of a game snapshot. Restoring a snapshot
//! continues the exact stream, so a table that is reset and restarted after
//! a restore deals the same roles it would have dealt without one.
//!
//! ```
//! use mafia_engine::core::GameRng;
//!
//! let mut table = GameRng::new(42);
//! let mut replay = GameRng::new(42);
//!
//! let mut seats = vec!["a", "b", "c", "d"];
//! let mut replayed = seats.clone();
//! table.shuffle(&mut seats);
//! replay.shuffle(&mut replayed);
//! assert_eq!(seats, replayed);
//! ```

use std::hash::{Hash, Hasher};

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};

/// Seeded ChaCha8 stream.
#[derive(Clone, Debug)]
pub struct GameRng {
    stream: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            stream: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed from the operating system. The seed never leaves the engine.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// A separate stream derived from this one's seed and a label.
    ///
    /// Derivation uses `FxHasher`, which is stable across runs, so a label
    /// always yields the same stream for the same seed.
    #[must_use]
    pub fn for_context(&self, label: &str) -> Self {
        let mut hasher = FxHasher::default();
        self.seed.hash(&mut hasher);
        label.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Uniform in-place permutation.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.stream);
    }

    /// Uniform pick; `None` for an empty slice.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.stream)
    }

    /// Current position, for snapshots.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.stream.get_word_pos(),
        }
    }

    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut stream = ChaCha8Rng::seed_from_u64(state.seed);
        stream.set_word_pos(state.word_pos);
        Self {
            stream,
            seed: state.seed,
        }
    }
}

/// Seed plus ChaCha word position. Constant size however far the stream
/// has advanced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    pub seed: u64,
    pub word_pos: u128,
}
