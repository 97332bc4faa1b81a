//! Action representation.
//!
//! An `Action` is one call delivered by the submission channel: the caller's
//! identity travels alongside it, never inside it, so a player cannot act on
//! someone else's behalf by forging a field.
//!
//! Actions that change the game are appended to the history as
//! `ActionRecord`s, which makes every game replayable and auditable.

use serde::{Deserialize, Serialize};

use super::player::PlayerId;

/// A complete game action.
///
/// ```
/// use mafia_engine::core::{Action, PlayerId};
///
/// let kill = Action::MafiaTarget { target: PlayerId::new(3) };
/// assert!(kill.is_night_action());
/// assert!(!Action::Start.is_night_action());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Take a seat at the table.
    Join,
    /// Deal roles and begin the first night (moderator).
    Start,
    /// Pick tonight's victim (Mafia).
    MafiaTarget { target: PlayerId },
    /// Protect someone tonight (Doctor).
    DoctorSave { target: PlayerId },
    /// Learn someone's role (Detective).
    Investigate { target: PlayerId },
    /// Close the night and apply its outcome (moderator).
    ResolveNight,
    /// Nominate someone for elimination with a stated reason.
    Accuse { accused: PlayerId, reason: String },
    /// Vote to eliminate an accused player.
    Vote { candidate: PlayerId },
    /// Close the vote and apply its outcome (moderator).
    ResolveVote,
    /// Remove a player directly (moderator).
    Eliminate { target: PlayerId },
    /// Return to the lobby with the same seats (moderator).
    Reset,
}

impl Action {
    /// Is this one of the three secret night actions?
    #[must_use]
    pub fn is_night_action(&self) -> bool {
        matches!(
            self,
            Action::MafiaTarget { .. } | Action::DoctorSave { .. } | Action::Investigate { .. }
        )
    }

    /// Can only the moderator perform this action?
    #[must_use]
    pub fn is_moderator_action(&self) -> bool {
        matches!(
            self,
            Action::Start
                | Action::ResolveNight
                | Action::ResolveVote
                | Action::Eliminate { .. }
                | Action::Reset
        )
    }

    /// Short name for logging. Never includes targets.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Action::Join => "join",
            Action::Start => "start",
            Action::MafiaTarget { .. } => "mafia_target",
            Action::DoctorSave { .. } => "doctor_save",
            Action::Investigate { .. } => "investigate",
            Action::ResolveNight => "resolve_night",
            Action::Accuse { .. } => "accuse",
            Action::Vote { .. } => "vote",
            Action::ResolveVote => "resolve_vote",
            Action::Eliminate { .. } => "eliminate",
            Action::Reset => "reset",
        }
    }
}

/// A recorded action with metadata for history tracking.
///
/// Used for:
/// - Audit of who did what, in which round
/// - Replay/debugging
/// - Snapshot restore checks
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The identity that performed the action.
    pub caller: PlayerId,

    /// The action taken.
    pub action: Action,

    /// Round number when the action was applied (0 in the lobby).
    pub round: u32,

    /// Position in the history it belongs to. The full audit history counts
    /// every action; `PublicState::history` renumbers what it shows.
    pub sequence: u32,
}

impl ActionRecord {
    /// Create a new action record.
    #[must_use]
    pub fn new(caller: PlayerId, action: Action, round: u32, sequence: u32) -> Self {
        Self {
            caller,
            action,
            round,
            sequence,
        }
    }
}
