//! Core types: players, roles, actions, RNG, configuration, errors, views.
//!
//! Everything here is independent of how a particular table is run; the
//! rules live in the `roster`, `roles`, `night`, `day` and `rules` modules.

pub mod player;
pub mod role;
pub mod rng;
pub mod config;
pub mod action;
pub mod error;
pub mod state;

pub use player::PlayerId;
pub use role::{Faction, Role};
pub use rng::{GameRng, GameRngState};
pub use config::{GameConfig, TieBreak, MAX_TABLE_SIZE};
pub use action::{Action, ActionRecord};
pub use error::{ConfigError, GameError, StoreError};
pub use state::{Disclosure, PlayerView, PublicParticipant, PublicState};
