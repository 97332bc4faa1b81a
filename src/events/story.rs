//! Story text for the table.
//!
//! Turns events into the lines a moderator would read aloud. Private events
//! are narrated too, for the one player who receives them; filter by
//! audience before narrating.

use crate::core::PlayerId;
use crate::day::VoteOutcome;
use crate::phase::Phase;

use super::event::{EliminationCause, GameEvent};

fn list(players: &[PlayerId]) -> String {
    players
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render one event as a line of story.
///
/// ```
/// use mafia_engine::events::{narrate, GameEvent};
///
/// let line = narrate(&GameEvent::NightResolved { round: 1, eliminated: None, saved: false });
/// assert_eq!(line, "Last night was peaceful.");
/// ```
#[must_use]
pub fn narrate(event: &GameEvent) -> String {
    match event {
        GameEvent::PlayerJoined { player } => format!("{player} has joined the game."),
        GameEvent::RoleAssigned {
            role, teammates, ..
        } => {
            if teammates.is_empty() {
                format!("You are the {role}.")
            } else {
                format!("You are the {role}. Your fellow mafia: {}.", list(teammates))
            }
        }
        GameEvent::PhaseChanged { to, round, .. } => match to {
            Phase::Lobby => "Waiting for players.".to_string(),
            Phase::Night => format!("Night {round} falls. The town goes to sleep."),
            Phase::Day => format!("Day {round} begins. The town wakes up."),
            Phase::Concluded => "The game is over.".to_string(),
        },
        GameEvent::NightResolved {
            eliminated, saved, ..
        } => match (eliminated, saved) {
            (Some(victim), _) => format!("Last night, the mafia killed {victim}."),
            (None, true) => {
                "Last night, the mafia tried to kill someone, but the doctor saved them."
                    .to_string()
            }
            (None, false) => "Last night was peaceful.".to_string(),
        },
        GameEvent::InvestigationCompleted(investigation) => {
            if investigation.is_mafia {
                format!(
                    "The detective discovered that {} is a mafia member.",
                    investigation.target
                )
            } else {
                format!(
                    "The detective found no evidence against {}.",
                    investigation.target
                )
            }
        }
        GameEvent::NightSummary {
            round,
            attacked,
            saved,
            investigated,
        } => {
            let attacked = attacked.map_or("nobody".to_string(), |p| p.to_string());
            let saved = saved.map_or("nobody".to_string(), |p| p.to_string());
            let investigated = investigated.map_or("nobody".to_string(), |p| p.to_string());
            format!(
                "Night {round}: the mafia targeted {attacked}, the doctor protected {saved} and the detective investigated {investigated}."
            )
        }
        GameEvent::PlayerAccused {
            accuser,
            accused,
            reason,
        } => {
            if reason.trim().is_empty() {
                format!("{accuser} accuses {accused}.")
            } else {
                format!("{accuser} accuses {accused}: \"{}\"", reason.trim())
            }
        }
        GameEvent::AccusationsCompleted { accused } => {
            if accused.is_empty() {
                "Accusations are closed. Nobody stands accused.".to_string()
            } else {
                format!("Accusations are closed. On trial: {}.", list(accused))
            }
        }
        GameEvent::VoteCast { voter, candidate } => format!("{voter} votes against {candidate}."),
        GameEvent::PlayerEliminated { player, cause } => match cause {
            EliminationCause::Moderator => {
                format!("{player} has been removed from the game by the moderator.")
            }
            EliminationCause::Night | EliminationCause::Vote => {
                format!("{player} has been eliminated.")
            }
        },
        GameEvent::VotingCompleted { outcome, .. } => match outcome {
            VoteOutcome::Eliminated(player) => format!("The town has voted to eliminate {player}."),
            VoteOutcome::Tie(tied) => {
                format!("The vote is tied between {}. Nobody is eliminated.", list(tied))
            }
            VoteOutcome::NoVotes => "No votes were cast. Nobody is eliminated.".to_string(),
        },
        GameEvent::GameWon { message, .. } => message.clone(),
        GameEvent::GameContinues { .. } => "The game continues.".to_string(),
        GameEvent::GameReset => "The game has been reset.".to_string(),
    }
}
