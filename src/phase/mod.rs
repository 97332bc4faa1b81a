//! Phase state machine.
//!
//! ```text
//! Lobby --start--> Night --dawn--> Day --dusk--> Night --> ...
//!                    |               |
//!                    +---conclude----+----> Concluded
//! ```
//!
//! The machine only knows which transitions are legal from which phase.
//! *When* to take them (night resolved, vote complete, win found) is decided
//! by the engine. Transitions are split into `check` and `apply` so callers
//! can validate everything before mutating anything.

use serde::{Deserialize, Serialize};

use crate::core::GameError;

/// The current stage of a game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Players are joining.
    #[default]
    Lobby,
    /// Special roles act in secret.
    Night,
    /// Everyone accuses and votes.
    Day,
    /// A faction has won. Terminal.
    Concluded,
}

impl Phase {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Phase::Concluded)
    }

    /// Is a round (night or day) in progress?
    #[must_use]
    pub const fn in_round(self) -> bool {
        matches!(self, Phase::Night | Phase::Day)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Lobby => "Lobby",
            Phase::Night => "Night",
            Phase::Day => "Day",
            Phase::Concluded => "Concluded",
        };
        f.write_str(name)
    }
}

/// A phase transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    /// Lobby -> Night, round 1.
    Start,
    /// Night -> Day, same round.
    Dawn,
    /// Day -> Night, next round.
    Dusk,
    /// Night or Day -> Concluded.
    Conclude,
    /// Anything -> Lobby.
    Reset,
}

/// Finite-state controller for the game's phases.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseMachine {
    phase: Phase,
    /// Starts at 1 on the first night; 0 in the lobby.
    round: u32,
}

impl PhaseMachine {
    /// Create a machine in the lobby.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Require a specific phase for a phase-scoped action.
    pub fn require(&self, expected: Phase) -> Result<(), GameError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(GameError::WrongPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    /// Check whether `transition` is legal right now.
    ///
    /// Asking for a transition that has just been taken (resolving the same
    /// night twice) fails with `PhaseAlreadyAdvanced` so callers racing each
    /// other can tell a duplicate from a genuinely out-of-order call.
    pub fn check(&self, transition: Transition) -> Result<(), GameError> {
        match (transition, self.phase) {
            (Transition::Start, Phase::Lobby)
            | (Transition::Dawn, Phase::Night)
            | (Transition::Dusk, Phase::Day)
            | (Transition::Conclude, Phase::Night | Phase::Day)
            | (Transition::Reset, _) => Ok(()),
            (Transition::Dawn, Phase::Day) => Err(GameError::PhaseAlreadyAdvanced(Phase::Night)),
            (Transition::Dusk, Phase::Night) if self.round > 1 => {
                Err(GameError::PhaseAlreadyAdvanced(Phase::Day))
            }
            (_, phase) => Err(GameError::InvalidPhase(phase)),
        }
    }

    /// Take a transition that `check` accepted. Returns the new phase.
    pub fn apply(&mut self, transition: Transition) -> Phase {
        debug_assert!(self.check(transition).is_ok(), "illegal {transition:?} from {:?}", self.phase);

        match transition {
            Transition::Start => {
                self.phase = Phase::Night;
                self.round = 1;
            }
            Transition::Dawn => self.phase = Phase::Day,
            Transition::Dusk => {
                self.phase = Phase::Night;
                self.round += 1;
            }
            Transition::Conclude => self.phase = Phase::Concluded,
            Transition::Reset => {
                self.phase = Phase::Lobby;
                self.round = 0;
            }
        }
        self.phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_cycle() {
        let mut machine = PhaseMachine::new();
        assert_eq!(machine.phase(), Phase::Lobby);
        assert_eq!(machine.round(), 0);

        assert_eq!(machine.apply(Transition::Start), Phase::Night);
        assert_eq!(machine.round(), 1);
        assert_eq!(machine.apply(Transition::Dawn), Phase::Day);
        assert_eq!(machine.round(), 1);
        assert_eq!(machine.apply(Transition::Dusk), Phase::Night);
        assert_eq!(machine.round(), 2);
        assert_eq!(machine.apply(Transition::Conclude), Phase::Concluded);
        assert!(machine.phase().is_terminal());
    }

    #[test]
    fn test_require() {
        let machine = PhaseMachine::new();
        assert!(machine.require(Phase::Lobby).is_ok());
        assert_eq!(
            machine.require(Phase::Night),
            Err(GameError::WrongPhase {
                expected: Phase::Night,
                actual: Phase::Lobby
            })
        );
    }

    #[test]
    fn test_start_twice_is_invalid() {
        let mut machine = PhaseMachine::new();
        machine.apply(Transition::Start);
        assert_eq!(
            machine.check(Transition::Start),
            Err(GameError::InvalidPhase(Phase::Night))
        );
    }

    #[test]
    fn test_repeated_dawn_is_already_advanced() {
        let mut machine = PhaseMachine::new();
        machine.apply(Transition::Start);
        machine.apply(Transition::Dawn);

        assert_eq!(
            machine.check(Transition::Dawn),
            Err(GameError::PhaseAlreadyAdvanced(Phase::Night))
        );
    }

    #[test]
    fn test_repeated_dusk_is_already_advanced() {
        let mut machine = PhaseMachine::new();
        machine.apply(Transition::Start);

        // Round 1 night: no day has happened yet.
        assert_eq!(
            machine.check(Transition::Dusk),
            Err(GameError::InvalidPhase(Phase::Night))
        );

        machine.apply(Transition::Dawn);
        machine.apply(Transition::Dusk);
        assert_eq!(
            machine.check(Transition::Dusk),
            Err(GameError::PhaseAlreadyAdvanced(Phase::Day))
        );
    }

    #[test]
    fn test_no_transitions_out_of_concluded() {
        let mut machine = PhaseMachine::new();
        machine.apply(Transition::Start);
        machine.apply(Transition::Conclude);

        for transition in [Transition::Start, Transition::Dawn, Transition::Dusk, Transition::Conclude] {
            assert_eq!(
                machine.check(transition),
                Err(GameError::InvalidPhase(Phase::Concluded))
            );
        }
        assert!(machine.check(Transition::Reset).is_ok());
    }

    #[test]
    fn test_reset_returns_to_lobby() {
        let mut machine = PhaseMachine::new();
        machine.apply(Transition::Start);
        machine.apply(Transition::Dawn);

        assert_eq!(machine.apply(Transition::Reset), Phase::Lobby);
        assert_eq!(machine.round(), 0);
        assert!(machine.check(Transition::Start).is_ok());
    }

    #[test]
    fn test_conclude_not_allowed_from_lobby() {
        let machine = PhaseMachine::new();
        assert_eq!(
            machine.check(Transition::Conclude),
            Err(GameError::InvalidPhase(Phase::Lobby))
        );
    }
}
