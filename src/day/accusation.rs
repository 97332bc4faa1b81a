//! Accusation ledger.
//!
//! Every living player nominates exactly one other living player per day,
//! with a reason. Voting opens once everyone alive has accused someone.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{GameError, PlayerId};
use crate::roster::Roster;

/// A public nomination.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accusation {
    pub accuser: PlayerId,
    pub accused: PlayerId,
    pub reason: String,
}

/// Accused players in first-accusation order. Small tables rarely exceed
/// eight candidates.
pub type AccusedSet = SmallVec<[PlayerId; 8]>;

/// Today's accusations, in the order they were made.
///
/// Serializes as the list of accusations; the per-accuser index is rebuilt
/// on decode.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Accusation>", into = "Vec<Accusation>")]
pub struct AccusationLedger {
    accusations: Vec<Accusation>,
    by_accuser: FxHashMap<PlayerId, usize>,
}

impl From<Vec<Accusation>> for AccusationLedger {
    fn from(accusations: Vec<Accusation>) -> Self {
        let by_accuser = accusations
            .iter()
            .enumerate()
            .map(|(position, a)| (a.accuser, position))
            .collect();
        Self {
            accusations,
            by_accuser,
        }
    }
}

impl From<AccusationLedger> for Vec<Accusation> {
    fn from(ledger: AccusationLedger) -> Self {
        ledger.accusations
    }
}

impl AccusationLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Has every accuser exactly one accusation?
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.by_accuser.len() == self.accusations.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.accusations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accusations.is_empty()
    }

    /// All accusations in the order they were made.
    #[must_use]
    pub fn accusations(&self) -> &[Accusation] {
        &self.accusations
    }

    /// The accusation `accuser` made today, if any.
    #[must_use]
    pub fn accusation_by(&self, accuser: PlayerId) -> Option<&Accusation> {
        self.by_accuser.get(&accuser).map(|&i| &self.accusations[i])
    }

    #[must_use]
    pub fn has_accused(&self, accuser: PlayerId) -> bool {
        self.by_accuser.contains_key(&accuser)
    }

    /// Check an accusation without recording it.
    pub fn check_accuse(
        &self,
        accuser: PlayerId,
        accused: PlayerId,
        roster: &Roster,
    ) -> Result<(), GameError> {
        roster.require_living(accuser)?;
        if self.has_accused(accuser) {
            return Err(GameError::AlreadyAccused(accuser));
        }
        if accuser == accused {
            return Err(GameError::CannotTargetSelf(accuser));
        }
        roster.require_living(accused)?;
        Ok(())
    }

    /// Record an accusation.
    pub fn accuse(
        &mut self,
        accuser: PlayerId,
        accused: PlayerId,
        reason: impl Into<String>,
        roster: &Roster,
    ) -> Result<(), GameError> {
        self.check_accuse(accuser, accused, roster)?;
        self.by_accuser.insert(accuser, self.accusations.len());
        self.accusations.push(Accusation {
            accuser,
            accused,
            reason: reason.into(),
        });
        Ok(())
    }

    /// Has every living participant accused someone?
    #[must_use]
    pub fn is_complete(&self, roster: &Roster) -> bool {
        roster.alive().all(|p| self.has_accused(p.id))
    }

    /// Living accused players, deduplicated, in first-accusation order.
    #[must_use]
    pub fn accused_set(&self, roster: &Roster) -> AccusedSet {
        let mut set = AccusedSet::new();
        for accusation in &self.accusations {
            if roster.is_alive(accusation.accused) && !set.contains(&accusation.accused) {
                set.push(accusation.accused);
            }
        }
        set
    }

    /// Discard today's accusations.
    pub fn clear(&mut self) {
        self.accusations.clear();
        self.by_accuser.clear();
    }
}
