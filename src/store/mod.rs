//! Snapshots and the key-value store they are written to.
//!
//! The engine never talks to real storage. It encodes a [`GameSnapshot`]
//! with `bincode` and hands the bytes to a [`StateStore`], keyed by whatever
//! identifies the table (a room id, a contract address).

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{ActionRecord, GameConfig, GameRngState, PlayerId, Role, StoreError};
use crate::day::{AccusationLedger, VoteTally};
use crate::engine::MafiaGame;
use crate::events::{EventSink, SequenceCounters};
use crate::night::{Investigation, NightResolver};
use crate::phase::{Phase, PhaseMachine};
use crate::roster::Roster;
use crate::rules::GameOutcome;

/// Complete state of one game at a point in time.
///
/// Restoring a snapshot reproduces the game exactly, including the RNG
/// position and the next notification number of every audience.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub(crate) config: GameConfig,
    pub(crate) moderator: PlayerId,
    pub(crate) roster: Roster,
    pub(crate) phase: PhaseMachine,
    pub(crate) night: NightResolver,
    pub(crate) accusations: AccusationLedger,
    pub(crate) votes: VoteTally,
    pub(crate) investigations: FxHashMap<PlayerId, Vec<Investigation>>,
    pub(crate) outcome: GameOutcome,
    pub(crate) rng: GameRngState,
    pub(crate) history: Vector<ActionRecord>,
    pub(crate) sequences: SequenceCounters,
    pub(crate) next_action: u32,
}

impl GameSnapshot {
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase.phase()
    }

    #[must_use]
    pub fn round(&self) -> u32 {
        self.phase.round()
    }

    #[must_use]
    pub fn moderator(&self) -> PlayerId {
        self.moderator
    }

    /// Encode with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, StoreError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode bytes written by `to_bytes` and check that they describe a
    /// game the engine could have produced.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StoreError> {
        let snapshot: Self = bincode::deserialize(bytes)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Cross-check the parts of the snapshot against each other.
    pub fn validate(&self) -> Result<(), StoreError> {
        let corrupt = |reason: String| -> Result<(), StoreError> { Err(StoreError::Corrupt(reason)) };

        if !self.roster.is_consistent() {
            return corrupt("roster has duplicate seats or exceeds its capacity".into());
        }
        if self.roster.contains(self.moderator) {
            return corrupt(format!("moderator {} holds a seat", self.moderator));
        }
        if !self.accusations.is_consistent() {
            return corrupt("a player accused more than once".into());
        }
        if !self.votes.is_consistent() {
            return corrupt("a player voted more than once".into());
        }

        let seated = |id: PlayerId| self.roster.contains(id);
        let accused_ok = self
            .accusations
            .accusations()
            .iter()
            .all(|a| seated(a.accuser) && seated(a.accused));
        let votes_ok = self
            .votes
            .votes()
            .iter()
            .all(|v| seated(v.voter) && seated(v.candidate));
        let night_ok = Role::NIGHT_ACTORS.into_iter().all(|role| {
            self.night
                .submitted(role)
                .map_or(true, |a| seated(a.actor) && seated(a.target))
        });
        let investigations_ok = self
            .investigations
            .iter()
            .all(|(&detective, found)| seated(detective) && found.iter().all(|i| seated(i.target)));
        if !(accused_ok && votes_ok && night_ok && investigations_ok) {
            return corrupt("an action names a player who holds no seat".into());
        }
        Ok(())
    }
}

/// Opaque key-value storage.
pub trait StateStore {
    fn get(&self, key: &str) -> Option<Vec<u8>>;
    fn put(&mut self, key: &str, value: Vec<u8>);
    /// Remove a key, returning what was stored.
    fn remove(&mut self, key: &str) -> Option<Vec<u8>>;
}

/// Store backed by a hash map.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: FxHashMap<String, Vec<u8>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: &str, value: Vec<u8>) {
        self.entries.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) -> Option<Vec<u8>> {
        self.entries.remove(key)
    }
}

impl<S: EventSink> MafiaGame<S> {
    /// Write a snapshot of this game under `key`.
    pub fn save(&self, store: &mut impl StateStore, key: &str) -> Result<(), StoreError> {
        let bytes = self.snapshot().to_bytes()?;
        tracing::debug!(key, bytes = bytes.len(), "game saved");
        store.put(key, bytes);
        Ok(())
    }

    /// Restore the game stored under `key`.
    pub fn load(store: &impl StateStore, key: &str, sink: S) -> Result<Self, StoreError> {
        let bytes = store
            .get(key)
            .ok_or_else(|| StoreError::Missing(key.to_string()))?;
        let snapshot = GameSnapshot::from_bytes(&bytes)?;
        tracing::debug!(key, phase = %snapshot.phase(), round = snapshot.round(), "game loaded");
        Ok(Self::from_snapshot(snapshot, sink))
    }
}
