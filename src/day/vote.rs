//! Vote tally.
//!
//! Once every living player has accused someone, each living player casts
//! one vote for an accused candidate. The candidate with strictly the most
//! votes is eliminated; ties follow the configured `TieBreak`.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::accusation::AccusedSet;
use crate::core::{GameError, PlayerId, TieBreak};
use crate::roster::Roster;

/// A cast vote.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub voter: PlayerId,
    pub candidate: PlayerId,
}

/// How a closed vote came out.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteOutcome {
    /// A single candidate is eliminated.
    Eliminated(PlayerId),
    /// Several candidates share the top count and nobody is eliminated.
    Tie(SmallVec<[PlayerId; 4]>),
    /// No votes were cast for any living candidate.
    NoVotes,
}

impl VoteOutcome {
    #[must_use]
    pub fn eliminated(&self) -> Option<PlayerId> {
        match self {
            VoteOutcome::Eliminated(id) => Some(*id),
            _ => None,
        }
    }
}

/// Result of closing today's vote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteResolution {
    /// Votes per living candidate, in first-accusation order.
    pub tallies: Vec<(PlayerId, usize)>,
    pub outcome: VoteOutcome,
}

/// Today's votes. Serializes as the list of votes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Vote>", into = "Vec<Vote>")]
pub struct VoteTally {
    votes: Vec<Vote>,
    by_voter: FxHashMap<PlayerId, usize>,
}

impl From<Vec<Vote>> for VoteTally {
    fn from(votes: Vec<Vote>) -> Self {
        let by_voter = votes
            .iter()
            .enumerate()
            .map(|(position, v)| (v.voter, position))
            .collect();
        Self { votes, by_voter }
    }
}

impl From<VoteTally> for Vec<Vote> {
    fn from(tally: VoteTally) -> Self {
        tally.votes
    }
}

impl VoteTally {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Has every voter exactly one vote?
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.by_voter.len() == self.votes.len()
    }

    #[must_use]
    pub fn votes(&self) -> &[Vote] {
        &self.votes
    }

    #[must_use]
    pub fn has_voted(&self, voter: PlayerId) -> bool {
        self.by_voter.contains_key(&voter)
    }

    #[must_use]
    pub fn vote_of(&self, voter: PlayerId) -> Option<PlayerId> {
        self.by_voter.get(&voter).map(|&i| self.votes[i].candidate)
    }

    /// Check a vote without recording it.
    pub fn check_vote(
        &self,
        voter: PlayerId,
        candidate: PlayerId,
        roster: &Roster,
        accused: &AccusedSet,
    ) -> Result<(), GameError> {
        roster.require_living(voter)?;
        if self.has_voted(voter) {
            return Err(GameError::AlreadyVoted(voter));
        }
        if !accused.contains(&candidate) {
            return Err(GameError::InvalidCandidate(candidate));
        }
        Ok(())
    }

    /// Record a vote.
    pub fn vote(
        &mut self,
        voter: PlayerId,
        candidate: PlayerId,
        roster: &Roster,
        accused: &AccusedSet,
    ) -> Result<(), GameError> {
        self.check_vote(voter, candidate, roster, accused)?;
        self.by_voter.insert(voter, self.votes.len());
        self.votes.push(Vote { voter, candidate });
        Ok(())
    }

    /// Has every living participant voted?
    ///
    /// With no living candidates there is nothing to vote on, so the vote
    /// counts as complete.
    #[must_use]
    pub fn is_complete(&self, roster: &Roster, accused: &AccusedSet) -> bool {
        accused.is_empty() || roster.alive().all(|p| self.has_voted(p.id))
    }

    /// Count the votes and pick the eliminee. Pure: the caller applies it.
    ///
    /// Votes for a candidate who died after the vote was cast are dropped.
    #[must_use]
    pub fn resolve(&self, accused: &AccusedSet, tie_break: TieBreak) -> VoteResolution {
        let tallies: Vec<(PlayerId, usize)> = accused
            .iter()
            .map(|&candidate| {
                let count = self.votes.iter().filter(|v| v.candidate == candidate).count();
                (candidate, count)
            })
            .collect();

        let top = tallies.iter().map(|&(_, count)| count).max().unwrap_or(0);
        let leaders: SmallVec<[PlayerId; 4]> = tallies
            .iter()
            .filter(|&&(_, count)| count == top)
            .map(|&(candidate, _)| candidate)
            .collect();

        let outcome = if top == 0 {
            VoteOutcome::NoVotes
        } else if leaders.len() == 1 {
            VoteOutcome::Eliminated(leaders[0])
        } else {
            match tie_break {
                TieBreak::NoElimination => VoteOutcome::Tie(leaders),
                // `tallies` is in first-accusation order.
                TieBreak::FirstAccused => VoteOutcome::Eliminated(leaders[0]),
            }
        };

        VoteResolution { tallies, outcome }
    }

    /// Discard today's votes.
    pub fn clear(&mut self) {
        self.votes.clear();
        self.by_voter.clear();
    }
}
