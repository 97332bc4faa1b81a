//! Roster: who is at the table, what they are, and whether they live.
//!
//! The roster exclusively owns participant records. Joining order is
//! preserved because role dealing zips the shuffled roles with it.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{GameError, PlayerId, Role};

/// A seated player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: PlayerId,
    pub role: Role,
    pub alive: bool,
}

impl Participant {
    /// A freshly joined participant: unassigned and alive.
    #[must_use]
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            role: Role::Unassigned,
            alive: true,
        }
    }
}

/// Ordered set of participants, keyed by identity.
///
/// Only the capacity and the seats are serialized; the identity index is
/// rebuilt on decode so it can never disagree with the seats.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Seats", into = "Seats")]
pub struct Roster {
    capacity: usize,
    participants: Vec<Participant>,
    /// Position of each identity in `participants`.
    index: FxHashMap<PlayerId, usize>,
}

/// Serialized form of a `Roster`.
#[derive(Serialize, Deserialize)]
struct Seats {
    capacity: usize,
    participants: Vec<Participant>,
}

impl From<Seats> for Roster {
    fn from(seats: Seats) -> Self {
        let index = seats
            .participants
            .iter()
            .enumerate()
            .map(|(position, p)| (p.id, position))
            .collect();
        Self {
            capacity: seats.capacity,
            participants: seats.participants,
            index,
        }
    }
}

impl From<Roster> for Seats {
    fn from(roster: Roster) -> Self {
        Self {
            capacity: roster.capacity,
            participants: roster.participants,
        }
    }
}

impl Roster {
    /// Create an empty roster holding at most `capacity` players.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            participants: Vec::with_capacity(capacity),
            index: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: PlayerId) -> bool {
        self.index.contains_key(&id)
    }

    #[must_use]
    pub fn get(&self, id: PlayerId) -> Option<&Participant> {
        self.index.get(&id).map(|&i| &self.participants[i])
    }

    /// All participants in join order.
    #[must_use]
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Does every identity hold exactly one seat, within capacity?
    ///
    /// Always true for rosters built through `join`; decoded rosters are
    /// checked before use.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.index.len() == self.participants.len() && self.participants.len() <= self.capacity
    }

    // === Joining ===

    /// Check a join without performing it.
    pub fn check_join(&self, id: PlayerId) -> Result<(), GameError> {
        if self.contains(id) {
            return Err(GameError::AlreadyJoined(id));
        }
        if self.len() >= self.capacity {
            return Err(GameError::GameFull {
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    /// Seat a new participant.
    pub fn join(&mut self, id: PlayerId) -> Result<(), GameError> {
        self.check_join(id)?;
        self.index.insert(id, self.participants.len());
        self.participants.push(Participant::new(id));
        Ok(())
    }

    // === Queries ===

    /// Living participants in join order.
    pub fn alive(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter().filter(|p| p.alive)
    }

    /// Identities of living participants in join order.
    #[must_use]
    pub fn living_ids(&self) -> Vec<PlayerId> {
        self.alive().map(|p| p.id).collect()
    }

    /// Participants (living or not) holding `role`.
    pub fn by_role(&self, role: Role) -> impl Iterator<Item = &Participant> {
        self.participants.iter().filter(move |p| p.role == role)
    }

    #[must_use]
    pub fn living_count(&self) -> usize {
        self.alive().count()
    }

    #[must_use]
    pub fn living_mafia_count(&self) -> usize {
        self.alive().filter(|p| p.role.is_mafia()).count()
    }

    #[must_use]
    pub fn is_alive(&self, id: PlayerId) -> bool {
        self.get(id).is_some_and(|p| p.alive)
    }

    #[must_use]
    pub fn role_of(&self, id: PlayerId) -> Option<Role> {
        self.get(id).map(|p| p.role)
    }

    /// Look up a participant who must exist and be alive.
    pub fn require_living(&self, id: PlayerId) -> Result<&Participant, GameError> {
        let participant = self.get(id).ok_or(GameError::UnknownPlayer(id))?;
        if participant.alive {
            Ok(participant)
        } else {
            Err(GameError::NotAlive(id))
        }
    }

    // === Elimination ===

    /// Check an elimination without performing it.
    pub fn check_eliminate(&self, id: PlayerId) -> Result<(), GameError> {
        match self.get(id) {
            None => Err(GameError::UnknownPlayer(id)),
            Some(p) if !p.alive => Err(GameError::AlreadyEliminated(id)),
            Some(_) => Ok(()),
        }
    }

    /// Mark a participant dead. Returns their role.
    pub fn eliminate(&mut self, id: PlayerId) -> Result<Role, GameError> {
        self.check_eliminate(id)?;
        let participant = &mut self.participants[self.index[&id]];
        participant.alive = false;
        Ok(participant.role)
    }

    // === Roles ===

    /// Deal roles in join order. `roles` must have one entry per participant.
    pub(crate) fn set_roles(&mut self, roles: &[Role]) {
        debug_assert_eq!(roles.len(), self.participants.len());
        for (participant, &role) in self.participants.iter_mut().zip(roles) {
            participant.role = role;
        }
    }

    /// Clear roles and revive everyone, keeping the seats.
    pub(crate) fn reset(&mut self) {
        for participant in &mut self.participants {
            participant.role = Role::Unassigned;
            participant.alive = true;
        }
    }
}
