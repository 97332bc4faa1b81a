//! Per-viewer projections of a game.
//!
//! ## PublicState
//!
//! Observable by everyone at the table:
//! - Phase, round, moderator
//! - Seats and who is alive (roles only once the game is over)
//! - Today's accusations and votes, the accused set
//! - Outcome
//! - Public action history (night actions are never included)
//!
//! ## PlayerView
//!
//! What one identity may know:
//! - The public state
//! - Roles disclosed to them
//! - Their own investigation results
//!
//! ## Disclosure rules
//!
//! - Everyone knows their own role.
//! - Mafia know their fellow Mafia when the table allows it.
//! - The moderator knows every role.
//! - Once the game is concluded every role is public.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::action::ActionRecord;
use super::player::PlayerId;
use super::role::Role;
use crate::day::{Accusation, Vote};
use crate::night::Investigation;
use crate::phase::Phase;
use crate::roster::Roster;
use crate::rules::GameOutcome;

/// A seat as everyone sees it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicParticipant {
    pub id: PlayerId,
    pub alive: bool,
    /// Set only when the role is public.
    pub role: Option<Role>,
}

/// Public game state - observable by all players.
///
/// Uses `im` persistent data structures so repeated snapshots of a long
/// game stay cheap.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicState {
    pub phase: Phase,
    pub round: u32,
    pub moderator: PlayerId,
    pub players: Vec<PublicParticipant>,
    pub accusations: Vec<Accusation>,
    /// Living accused, in first-accusation order.
    pub accused: Vec<PlayerId>,
    pub votes: Vec<Vote>,
    pub outcome: GameOutcome,
    /// Applied actions other than the secret night actions.
    pub history: Vector<ActionRecord>,
}

impl PublicState {
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&PublicParticipant> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Living seats in join order.
    pub fn living(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players.iter().filter(|p| p.alive).map(|p| p.id)
    }
}

/// Everything one viewer is entitled to know.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub viewer: PlayerId,
    /// The viewer's own role; `None` for the moderator and spectators.
    pub role: Option<Role>,
    /// Roles disclosed to the viewer, in join order. Includes their own.
    pub known_roles: Vec<(PlayerId, Role)>,
    /// The viewer's investigation results, oldest first.
    pub investigations: Vec<Investigation>,
    pub public: PublicState,
}

impl PlayerView {
    /// The role of `player` if the viewer is allowed to know it.
    #[must_use]
    pub fn role_of(&self, player: PlayerId) -> Option<Role> {
        self.known_roles
            .iter()
            .find(|(id, _)| *id == player)
            .map(|&(_, role)| role)
    }
}

/// Decides which roles a viewer may see.
#[derive(Clone, Copy, Debug)]
pub struct Disclosure<'a> {
    roster: &'a Roster,
    moderator: PlayerId,
    phase: Phase,
    mafia_sees_teammates: bool,
}

impl<'a> Disclosure<'a> {
    #[must_use]
    pub fn new(
        roster: &'a Roster,
        moderator: PlayerId,
        phase: Phase,
        mafia_sees_teammates: bool,
    ) -> Self {
        Self {
            roster,
            moderator,
            phase,
            mafia_sees_teammates,
        }
    }

    /// Is every role public?
    #[must_use]
    pub fn all_public(&self) -> bool {
        self.phase.is_terminal()
    }

    /// May `viewer` know the role of `subject`?
    #[must_use]
    pub fn role_visible(&self, viewer: PlayerId, subject: PlayerId) -> bool {
        if self.all_public() || viewer == self.moderator || viewer == subject {
            return true;
        }
        if !self.mafia_sees_teammates {
            return false;
        }
        let viewer_mafia = self.roster.role_of(viewer).is_some_and(Role::is_mafia);
        let subject_mafia = self.roster.role_of(subject).is_some_and(Role::is_mafia);
        viewer_mafia && subject_mafia
    }

    /// Dealt roles `viewer` may know, in join order.
    #[must_use]
    pub fn known_roles(&self, viewer: PlayerId) -> Vec<(PlayerId, Role)> {
        self.roster
            .participants()
            .iter()
            .filter(|p| p.role != Role::Unassigned && self.role_visible(viewer, p.id))
            .map(|p| (p.id, p.role))
            .collect()
    }

    /// Fellow Mafia of `viewer`, excluding the viewer.
    #[must_use]
    pub fn teammates(&self, viewer: PlayerId) -> Vec<PlayerId> {
        if !self.mafia_sees_teammates || !self.roster.role_of(viewer).is_some_and(Role::is_mafia) {
            return Vec::new();
        }
        self.roster
            .by_role(Role::Mafia)
            .map(|p| p.id)
            .filter(|&id| id != viewer)
            .collect()
    }

    /// Seats as everyone sees them.
    #[must_use]
    pub fn public_participants(&self) -> Vec<PublicParticipant> {
        let public = self.all_public();
        self.roster
            .participants()
            .iter()
            .map(|p| PublicParticipant {
                id: p.id,
                alive: p.alive,
                role: public.then_some(p.role),
            })
            .collect()
    }
}
