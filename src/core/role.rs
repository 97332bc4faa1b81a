//! Secret roles and the factions they belong to.

use serde::{Deserialize, Serialize};

/// A participant's secret role.
///
/// Every participant is `Unassigned` until the game starts. Roles are fixed
/// for the rest of the game once dealt.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    /// Joined but not dealt yet.
    #[default]
    Unassigned,
    /// Picks one victim per night.
    Mafia,
    /// Protects one participant per night.
    Doctor,
    /// Learns one participant's role per night.
    Detective,
    /// No night action.
    Townsperson,
}

impl Role {
    /// Roles dealt at game start, in a stable order.
    pub const DEALT: [Role; 4] = [Role::Mafia, Role::Doctor, Role::Detective, Role::Townsperson];

    /// Roles that act during the night.
    pub const NIGHT_ACTORS: [Role; 3] = [Role::Mafia, Role::Doctor, Role::Detective];

    /// The faction this role wins with. `None` for `Unassigned`.
    #[must_use]
    pub const fn faction(self) -> Option<Faction> {
        match self {
            Role::Unassigned => None,
            Role::Mafia => Some(Faction::Mafia),
            Role::Doctor | Role::Detective | Role::Townsperson => Some(Faction::Town),
        }
    }

    #[must_use]
    pub const fn is_mafia(self) -> bool {
        matches!(self, Role::Mafia)
    }

    /// Does this role submit a night action?
    #[must_use]
    pub const fn acts_at_night(self) -> bool {
        matches!(self, Role::Mafia | Role::Doctor | Role::Detective)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Role::Unassigned => "Unassigned",
            Role::Mafia => "Mafia",
            Role::Doctor => "Doctor",
            Role::Detective => "Detective",
            Role::Townsperson => "Townsperson",
        };
        f.write_str(name)
    }
}

/// Winning side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Town,
    Mafia,
}
