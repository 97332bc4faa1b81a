//! Game configuration.
//!
//! Tables configure the engine at construction by providing a `GameConfig`.
//! Every rule the game's authors left open (table size, Mafia ratio, vote
//! ties, self-targeting) is pinned here with a default, so two engines built
//! from the same config and seed always play the same game.
//!
//! Configs can be built in code with the `with_*` builders or loaded from
//! TOML:
//!
//! ```
//! use mafia_engine::core::{GameConfig, TieBreak};
//!
//! let config = GameConfig::from_toml_str(r#"
//!     max_players = 6
//!     tie_break = "first_accused"
//! "#).unwrap();
//!
//! assert_eq!(config.max_players, 6);
//! assert_eq!(config.min_players, 4);
//! assert_eq!(config.tie_break, TieBreak::FirstAccused);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Hard ceiling on table size.
pub const MAX_TABLE_SIZE: usize = 64;

/// What a vote does when several candidates share the most votes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Nobody is eliminated; the game moves on to the next night.
    #[default]
    NoElimination,
    /// The tied candidate who was accused earliest today is eliminated.
    FirstAccused,
}

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Roster capacity.
    pub max_players: usize,

    /// Players needed before the moderator may start.
    pub min_players: usize,

    /// One Mafia is dealt per this many players (rounded down, at least one).
    pub players_per_mafia: usize,

    /// May the Doctor protect themselves?
    pub doctor_self_save: bool,

    /// Tie policy for the day vote.
    pub tie_break: TieBreak,

    /// Do Mafia members see each other's roles?
    pub mafia_sees_teammates: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_players: 8,
            min_players: 4,
            players_per_mafia: 4,
            doctor_self_save: true,
            tie_break: TieBreak::NoElimination,
            mafia_sees_teammates: true,
        }
    }
}

impl GameConfig {
    /// Create the default configuration (4-8 players, one Mafia per four).
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Set the roster capacity.
    #[must_use]
    pub fn with_max_players(mut self, max: usize) -> Self {
        self.max_players = max;
        self
    }

    /// Set the minimum number of players to start.
    #[must_use]
    pub fn with_min_players(mut self, min: usize) -> Self {
        self.min_players = min;
        self
    }

    /// Set the Mafia ratio.
    #[must_use]
    pub fn with_players_per_mafia(mut self, ratio: usize) -> Self {
        self.players_per_mafia = ratio;
        self
    }

    /// Allow or forbid Doctor self-saves.
    #[must_use]
    pub fn with_doctor_self_save(mut self, allowed: bool) -> Self {
        self.doctor_self_save = allowed;
        self
    }

    /// Set the vote tie policy.
    #[must_use]
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Show or hide Mafia teammates from each other.
    #[must_use]
    pub fn with_mafia_sees_teammates(mut self, visible: bool) -> Self {
        self.mafia_sees_teammates = visible;
        self
    }

    /// Check the config describes a playable game.
    ///
    /// A ratio below three would deal Mafia parity at four players, ending
    /// the game before the first night.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_players < 3 {
            return Err(ConfigError::Invalid(format!(
                "min_players must be at least 3, got {}",
                self.min_players
            )));
        }
        if self.max_players < self.min_players {
            return Err(ConfigError::Invalid(format!(
                "max_players ({}) is below min_players ({})",
                self.max_players, self.min_players
            )));
        }
        if self.max_players > MAX_TABLE_SIZE {
            return Err(ConfigError::Invalid(format!(
                "max_players must be at most {MAX_TABLE_SIZE}, got {}",
                self.max_players
            )));
        }
        if self.players_per_mafia < 3 {
            return Err(ConfigError::Invalid(format!(
                "players_per_mafia must be at least 3, got {}",
                self.players_per_mafia
            )));
        }
        Ok(())
    }
}
