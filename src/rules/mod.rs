//! Win conditions.
//!
//! The evaluator runs after every elimination, however it happened:
//! - Town wins when no Mafia remain alive.
//! - Mafia win when living Mafia are at least as many as everyone else alive.
//! - Otherwise the game continues.
//!
//! A decided outcome is terminal; the engine concludes the game.

use serde::{Deserialize, Serialize};

use crate::core::Faction;
use crate::roster::Roster;

/// Result of a game, or `Undecided` while it continues.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    #[default]
    Undecided,
    TownWin,
    MafiaWin,
}

impl GameOutcome {
    #[must_use]
    pub fn is_decided(self) -> bool {
        self != GameOutcome::Undecided
    }

    /// The faction that won, if any.
    #[must_use]
    pub fn winner(self) -> Option<Faction> {
        match self {
            GameOutcome::Undecided => None,
            GameOutcome::TownWin => Some(Faction::Town),
            GameOutcome::MafiaWin => Some(Faction::Mafia),
        }
    }

    /// Announcement read to the table when the game ends.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            GameOutcome::Undecided => "The game continues.",
            GameOutcome::TownWin => "The town wins! Every member of the mafia has been eliminated.",
            GameOutcome::MafiaWin => "The mafia wins! They now control the town.",
        }
    }
}

impl std::fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameOutcome::Undecided => write!(f, "undecided"),
            GameOutcome::TownWin => write!(f, "town win"),
            GameOutcome::MafiaWin => write!(f, "mafia win"),
        }
    }
}

/// Decides the outcome from the living roster.
#[derive(Clone, Copy, Debug, Default)]
pub struct WinEvaluator;

impl WinEvaluator {
    /// Evaluate the roster as it stands.
    ///
    /// ```
    /// use mafia_engine::rules::{GameOutcome, WinEvaluator};
    /// use mafia_engine::roster::Roster;
    ///
    /// // Nobody dealt in yet: no Mafia alive, but no game either.
    /// assert_eq!(WinEvaluator::evaluate(&Roster::new(8)), GameOutcome::Undecided);
    /// ```
    #[must_use]
    pub fn evaluate(roster: &Roster) -> GameOutcome {
        if roster.is_empty() {
            return GameOutcome::Undecided;
        }

        let mafia = roster.living_mafia_count();
        let others = roster.living_count() - mafia;

        if mafia == 0 {
            GameOutcome::TownWin
        } else if mafia >= others {
            GameOutcome::MafiaWin
        } else {
            GameOutcome::Undecided
        }
    }
}
