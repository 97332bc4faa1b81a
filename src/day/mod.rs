//! Day phase: public accusations, then a vote among the accused.

mod accusation;
mod vote;

pub use accusation::{Accusation, AccusationLedger, AccusedSet};
pub use vote::{Vote, VoteOutcome, VoteResolution, VoteTally};
