//! # mafia-engine
//!
//! A rules engine for Mafia, the hidden-role social deduction game.
//!
//! ## Design Principles
//!
//! 1. **Check, then act**: every operation validates completely before it
//!    touches state. A rejected call changes nothing and announces nothing.
//!
//! 2. **Information asymmetry**: roles, night actions and investigation
//!    results are hidden state. Callers read the game through per-viewer
//!    projections (`view_for`) and audience-tagged notifications.
//!
//! 3. **Injected randomness**: the role deal comes from a seeded `GameRng`,
//!    so games are reproducible and snapshots restore the exact stream.
//!
//! ## Game Flow
//!
//! Lobby -> Night -> Day -> Night -> ... -> Concluded. At night the Mafia
//! pick a victim, the Doctor protects someone and the Detective investigates
//! someone; the moderator resolves the night. By day every living player
//! accuses someone, everyone votes among the accused, and the moderator
//! closes the vote. The town wins when the last Mafia member dies; the Mafia
//! win once they are at least as many as everyone else.
//!
//! ## Modules
//!
//! - `core`: Players, roles, actions, RNG, configuration, errors, views
//! - `roster`: Seats, roles and alive flags
//! - `roles`: Role dealing
//! - `phase`: Phase state machine
//! - `night`: Night actions and their resolution
//! - `day`: Accusations and votes
//! - `rules`: Win conditions
//! - `events`: Notifications, sinks and story text
//! - `engine`: The `MafiaGame` aggregate
//! - `store`: Snapshots and key-value persistence
//! - `sim`: Random-agent simulation

pub mod core;
pub mod roster;
pub mod roles;
pub mod phase;
pub mod night;
pub mod day;
pub mod rules;
pub mod events;
pub mod engine;
pub mod store;
pub mod sim;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionRecord, ConfigError, Faction, GameConfig, GameError, GameRng, GameRngState,
    PlayerId, PlayerView, PublicParticipant, PublicState, Role, StoreError, TieBreak,
};

pub use crate::roster::{Participant, Roster};

pub use crate::roles::{RoleAssigner, RoleCounts};

pub use crate::phase::{Phase, PhaseMachine};

pub use crate::night::{Investigation, NightReport, NightResolver};

pub use crate::day::{Accusation, AccusationLedger, AccusedSet, VoteOutcome, VoteResolution, VoteTally};

pub use crate::rules::{GameOutcome, WinEvaluator};

pub use crate::events::{
    narrate, Audience, EliminationCause, EventLog, EventSink, GameEvent, Notification, NullSink,
    TracingSink,
};

pub use crate::engine::{GameBuilder, MafiaGame, Receipt};

pub use crate::store::{GameSnapshot, MemoryStore, StateStore};

pub use crate::sim::Simulation;
