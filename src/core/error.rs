//! Error types.
//!
//! Every `GameError` is a recoverable rejection of one call: the engine
//! checks all preconditions before mutating anything, so a rejected call
//! leaves the game exactly as it was.

use thiserror::Error;

use super::player::PlayerId;
use super::role::Role;
use crate::phase::Phase;

/// Why a game operation was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("{0} has already joined")]
    AlreadyJoined(PlayerId),

    #[error("game is full ({capacity} players)")]
    GameFull { capacity: usize },

    #[error("game has already started")]
    GameAlreadyStarted,

    #[error("not enough players: need {required}, have {joined}")]
    NotEnoughPlayers { required: usize, joined: usize },

    #[error("cannot do that while the game is in {0:?}")]
    InvalidPhase(Phase),

    #[error("action requires {expected:?} but the game is in {actual:?}")]
    WrongPhase { expected: Phase, actual: Phase },

    #[error("the {0:?} phase has already been advanced")]
    PhaseAlreadyAdvanced(Phase),

    #[error("{0} is not alive")]
    NotAlive(PlayerId),

    #[error("{0} is not in this game")]
    UnknownPlayer(PlayerId),

    #[error("{0} has already been eliminated")]
    AlreadyEliminated(PlayerId),

    #[error("the {0} has already acted tonight")]
    ActionAlreadySubmitted(Role),

    #[error("{0} is not a valid target")]
    InvalidTarget(PlayerId),

    #[error("{0} cannot target themselves")]
    CannotTargetSelf(PlayerId),

    #[error("{0} has already accused someone today")]
    AlreadyAccused(PlayerId),

    #[error("{0} has already voted today")]
    AlreadyVoted(PlayerId),

    #[error("{0} has not been accused today")]
    InvalidCandidate(PlayerId),

    #[error("{0} is not the moderator")]
    NotModerator(PlayerId),

    #[error("the moderator cannot join as a player")]
    ModeratorCannotJoin,

    #[error("{player} does not hold the {required} role")]
    WrongRole { player: PlayerId, required: Role },

    #[error("not every living player has accused someone yet")]
    AccusationsIncomplete,

    #[error("not every living player has voted yet")]
    VotingIncomplete,
}

/// Why a configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Why a snapshot could not be saved or restored.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("snapshot encoding failed: {0}")]
    Codec(#[from] bincode::Error),

    #[error("no snapshot stored under key {0:?}")]
    Missing(String),

    #[error("snapshot is inconsistent: {0}")]
    Corrupt(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_player() {
        let err = GameError::AlreadyJoined(PlayerId::new(3));
        assert_eq!(err.to_string(), "Player 3 has already joined");

        let err = GameError::WrongRole {
            player: PlayerId::new(1),
            required: Role::Doctor,
        };
        assert_eq!(err.to_string(), "Player 1 does not hold the Doctor role");
    }

    #[test]
    fn test_phase_errors() {
        let err = GameError::WrongPhase {
            expected: Phase::Day,
            actual: Phase::Night,
        };
        assert!(err.to_string().contains("Day"));
        assert!(err.to_string().contains("Night"));
    }
}
