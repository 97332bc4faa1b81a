//! Role dealing.
//!
//! The assigner builds the role multiset for a table size, shuffles it with
//! the game's injected RNG and zips it with the roster's join order. Every
//! permutation of the multiset is equally likely, so no seat is favoured.

use serde::{Deserialize, Serialize};

use crate::core::{GameConfig, GameRng, Role};
use crate::roster::Roster;

/// How many of each role a table gets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCounts {
    pub mafia: usize,
    pub doctor: usize,
    pub detective: usize,
    pub townsperson: usize,
}

impl RoleCounts {
    #[must_use]
    pub fn total(&self) -> usize {
        self.mafia + self.doctor + self.detective + self.townsperson
    }

    #[must_use]
    pub fn get(&self, role: Role) -> usize {
        match role {
            Role::Mafia => self.mafia,
            Role::Doctor => self.doctor,
            Role::Detective => self.detective,
            Role::Townsperson => self.townsperson,
            Role::Unassigned => 0,
        }
    }

    /// The role multiset in a stable order, ready to shuffle.
    #[must_use]
    pub fn to_deck(&self) -> Vec<Role> {
        Role::DEALT
            .iter()
            .flat_map(|&role| std::iter::repeat(role).take(self.get(role)))
            .collect()
    }
}

/// Deals roles from a table size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoleAssigner {
    players_per_mafia: usize,
}

impl RoleAssigner {
    /// Create an assigner dealing one Mafia per `players_per_mafia` players.
    #[must_use]
    pub fn new(players_per_mafia: usize) -> Self {
        Self {
            players_per_mafia: players_per_mafia.max(1),
        }
    }

    #[must_use]
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.players_per_mafia)
    }

    /// Role counts for a table of `player_count`.
    ///
    /// ```
    /// use mafia_engine::roles::RoleAssigner;
    ///
    /// let counts = RoleAssigner::new(4).counts(8);
    /// assert_eq!((counts.mafia, counts.doctor, counts.detective, counts.townsperson), (2, 1, 1, 4));
    /// ```
    #[must_use]
    pub fn counts(&self, player_count: usize) -> RoleCounts {
        let mafia = (player_count / self.players_per_mafia).max(1).min(player_count);
        let specials = if player_count >= 4 { 1 } else { 0 };
        RoleCounts {
            mafia,
            doctor: specials,
            detective: specials,
            townsperson: player_count.saturating_sub(mafia + 2 * specials),
        }
    }

    /// Shuffle a deck for `player_count` seats.
    #[must_use]
    pub fn deal(&self, player_count: usize, rng: &mut GameRng) -> Vec<Role> {
        let mut deck = self.counts(player_count).to_deck();
        rng.shuffle(&mut deck);
        deck
    }

    /// Deal roles to every seated participant, in join order.
    ///
    /// Returns the dealt roles, index-aligned with `roster.participants()`.
    pub fn assign(&self, roster: &mut Roster, rng: &mut GameRng) -> Vec<Role> {
        let deck = self.deal(roster.len(), rng);
        roster.set_roles(&deck);
        tracing::trace!(players = roster.len(), "roles dealt");
        deck
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerId;

    #[test]
    fn test_counts_by_table_size() {
        let assigner = RoleAssigner::new(4);

        let expected = [
            (3, (1, 0, 0, 2)),
            (4, (1, 1, 1, 1)),
            (5, (1, 1, 1, 2)),
            (7, (1, 1, 1, 4)),
            (8, (2, 1, 1, 4)),
            (12, (3, 1, 1, 7)),
        ];

        for (n, (mafia, doctor, detective, town)) in expected {
            let counts = assigner.counts(n);
            assert_eq!(counts.mafia, mafia, "mafia for {n}");
            assert_eq!(counts.doctor, doctor, "doctor for {n}");
            assert_eq!(counts.detective, detective, "detective for {n}");
            assert_eq!(counts.townsperson, town, "town for {n}");
            assert_eq!(counts.total(), n);
        }
    }

    #[test]
    fn test_deck_matches_counts() {
        let counts = RoleAssigner::new(4).counts(8);
        let deck = counts.to_deck();

        assert_eq!(deck.len(), 8);
        for role in Role::DEALT {
            assert_eq!(deck.iter().filter(|&&r| r == role).count(), counts.get(role));
        }
    }

    #[test]
    fn test_deal_is_deterministic_per_seed() {
        let assigner = RoleAssigner::new(4);

        let a = assigner.deal(6, &mut GameRng::new(7));
        let b = assigner.deal(6, &mut GameRng::new(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_assign_sets_every_role() {
        let mut roster = Roster::new(8);
        for id in PlayerId::range(0, 6) {
            roster.join(id).unwrap();
        }

        let dealt = RoleAssigner::new(4).assign(&mut roster, &mut GameRng::new(1));

        assert_eq!(dealt.len(), 6);
        for (participant, role) in roster.participants().iter().zip(&dealt) {
            assert_eq!(participant.role, *role);
            assert_ne!(participant.role, Role::Unassigned);
        }
    }

    #[test]
    fn test_deal_is_uniform_over_seats() {
        // With four seats each seat should hold the single Mafia card about
        // a quarter of the time.
        let assigner = RoleAssigner::new(4);
        let trials = 4000;
        let mut mafia_by_seat = [0usize; 4];

        for seed in 0..trials {
            let deck = assigner.deal(4, &mut GameRng::new(seed));
            let seat = deck.iter().position(|r| r.is_mafia()).unwrap();
            mafia_by_seat[seat] += 1;
        }

        for (seat, &count) in mafia_by_seat.iter().enumerate() {
            assert!(
                (850..=1150).contains(&count),
                "seat {seat} was Mafia {count} times out of {trials}"
            );
        }
    }
}
