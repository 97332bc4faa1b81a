//! Participant identification.
//!
//! ## PlayerId
//!
//! Opaque identifier handed to the engine by whatever authenticates callers
//! (a wallet address, a session token, a database key). The engine only
//! compares and hashes it; it never derives meaning from the value.

use serde::{Deserialize, Serialize};

/// Opaque participant identifier.
///
/// The moderator is also identified by a `PlayerId`, but never joins the
/// roster.
///
/// ```
/// use mafia_engine::core::PlayerId;
///
/// let alice = PlayerId::new(7);
/// assert_eq!(alice, PlayerId::new(7));
/// assert_ne!(alice, PlayerId::new(8));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u64);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw identifier value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Build `count` sequential IDs starting at `first`.
    ///
    /// Handy for seating a table in tests and simulations. Stops at
    /// `u64::MAX` rather than wrapping.
    ///
    /// ```
    /// use mafia_engine::core::PlayerId;
    ///
    /// let seats: Vec<_> = PlayerId::range(10, 4).collect();
    /// assert_eq!(seats.len(), 4);
    /// assert_eq!(seats[0], PlayerId::new(10));
    /// assert_eq!(seats[3], PlayerId::new(13));
    /// ```
    pub fn range(first: u64, count: usize) -> impl Iterator<Item = PlayerId> {
        (first..=u64::MAX).take(count).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

impl From<u64> for PlayerId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_basics() {
        let p0 = PlayerId::new(0);
        let p1 = PlayerId::from(1);

        assert_eq!(p0.raw(), 0);
        assert_eq!(p1.raw(), 1);
        assert_eq!(format!("{}", p1), "Player 1");
    }

    #[test]
    fn test_player_id_range() {
        let players: Vec<_> = PlayerId::range(0, 3).collect();
        assert_eq!(players, vec![PlayerId(0), PlayerId(1), PlayerId(2)]);

        assert_eq!(PlayerId::range(5, 0).count(), 0);
    }

    #[test]
    fn test_player_id_range_near_max() {
        let top: Vec<_> = PlayerId::range(u64::MAX - 1, 5).collect();
        assert_eq!(top, vec![PlayerId(u64::MAX - 1), PlayerId(u64::MAX)]);
        assert_eq!(PlayerId::range(u64::MAX, 0).count(), 0);
    }

    #[test]
    fn test_player_id_ordering_and_hash() {
        use std::collections::HashSet;

        let set: HashSet<_> = [PlayerId(3), PlayerId(3), PlayerId(4)].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert!(PlayerId(3) < PlayerId(4));
    }

    #[test]
    fn test_player_id_serialization() {
        let id = PlayerId::new(42);
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: PlayerId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
