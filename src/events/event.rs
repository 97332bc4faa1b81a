//! Game events and their audiences.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::{PlayerId, Role};
use crate::day::VoteOutcome;
use crate::night::Investigation;
use crate::phase::Phase;
use crate::rules::GameOutcome;

/// How a player left the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EliminationCause {
    /// Killed by the Mafia overnight.
    Night,
    /// Voted out during the day.
    Vote,
    /// Removed directly by the moderator.
    Moderator,
}

/// Something that happened at the table.
///
/// Events never carry a role unless their audience is entitled to it:
/// `RoleAssigned` and `InvestigationCompleted` are always private.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    PlayerJoined {
        player: PlayerId,
    },
    /// A player's own role, plus their fellow Mafia when the table allows it.
    RoleAssigned {
        player: PlayerId,
        role: Role,
        teammates: Vec<PlayerId>,
    },
    PhaseChanged {
        from: Phase,
        to: Phase,
        round: u32,
    },
    /// Public summary of a night. `saved` is set when an attack was stopped;
    /// neither the target nor the Doctor is named.
    NightResolved {
        round: u32,
        eliminated: Option<PlayerId>,
        saved: bool,
    },
    InvestigationCompleted(Investigation),
    /// Who the night's actors chose. Moderator only.
    NightSummary {
        round: u32,
        attacked: Option<PlayerId>,
        saved: Option<PlayerId>,
        investigated: Option<PlayerId>,
    },
    PlayerAccused {
        accuser: PlayerId,
        accused: PlayerId,
        reason: String,
    },
    /// Every living player has accused someone; voting is open.
    AccusationsCompleted {
        accused: Vec<PlayerId>,
    },
    VoteCast {
        voter: PlayerId,
        candidate: PlayerId,
    },
    PlayerEliminated {
        player: PlayerId,
        cause: EliminationCause,
    },
    VotingCompleted {
        tallies: Vec<(PlayerId, usize)>,
        outcome: VoteOutcome,
    },
    GameWon {
        outcome: GameOutcome,
        message: String,
    },
    /// An elimination was evaluated and nobody has won yet.
    GameContinues {
        living: usize,
    },
    GameReset,
}

impl GameEvent {
    /// Short name for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::PlayerJoined { .. } => "player_joined",
            GameEvent::RoleAssigned { .. } => "role_assigned",
            GameEvent::PhaseChanged { .. } => "phase_changed",
            GameEvent::NightResolved { .. } => "night_resolved",
            GameEvent::InvestigationCompleted(_) => "investigation_completed",
            GameEvent::NightSummary { .. } => "night_summary",
            GameEvent::PlayerAccused { .. } => "player_accused",
            GameEvent::AccusationsCompleted { .. } => "accusations_completed",
            GameEvent::VoteCast { .. } => "vote_cast",
            GameEvent::PlayerEliminated { .. } => "player_eliminated",
            GameEvent::VotingCompleted { .. } => "voting_completed",
            GameEvent::GameWon { .. } => "game_won",
            GameEvent::GameContinues { .. } => "game_continues",
            GameEvent::GameReset => "game_reset",
        }
    }
}

/// Who may see a notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Audience {
    Everyone,
    /// One player (and the moderator).
    Player(PlayerId),
    Moderator,
}

/// A numbered event addressed to an audience.
///
/// Each audience has its own numbering. Public notifications count
/// 0, 1, 2, ... without gaps, and so does each player's private stream and
/// the moderator's stream, so no viewer can infer how many notifications
/// went to someone else. Delivery order across streams is the order the
/// sink receives them in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Position in the audience's own stream.
    pub sequence: u64,
    pub audience: Audience,
    pub event: GameEvent,
}

impl Notification {
    #[must_use]
    pub fn new(sequence: u64, audience: Audience, event: GameEvent) -> Self {
        Self {
            sequence,
            audience,
            event,
        }
    }

    #[must_use]
    pub fn is_public(&self) -> bool {
        self.audience == Audience::Everyone
    }

    /// May `viewer` see this notification at a table run by `moderator`?
    #[must_use]
    pub fn is_visible_to(&self, viewer: PlayerId, moderator: PlayerId) -> bool {
        if viewer == moderator {
            return true;
        }
        match self.audience {
            Audience::Everyone => true,
            Audience::Player(player) => player == viewer,
            Audience::Moderator => false,
        }
    }
}

/// Next sequence number of every audience stream.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceCounters {
    everyone: u64,
    moderator: u64,
    players: BTreeMap<PlayerId, u64>,
}

impl SequenceCounters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The number the next notification to `audience` will get.
    #[must_use]
    pub fn peek(&self, audience: Audience) -> u64 {
        match audience {
            Audience::Everyone => self.everyone,
            Audience::Moderator => self.moderator,
            Audience::Player(player) => self.players.get(&player).copied().unwrap_or(0),
        }
    }

    /// Take the next number for `audience`.
    pub fn next(&mut self, audience: Audience) -> u64 {
        let counter = match audience {
            Audience::Everyone => &mut self.everyone,
            Audience::Moderator => &mut self.moderator,
            Audience::Player(player) => self.players.entry(player).or_insert(0),
        };
        let sequence = *counter;
        *counter += 1;
        sequence
    }
}
