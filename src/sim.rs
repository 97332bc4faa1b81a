//! Random-agent simulation.
//!
//! Seats a table and plays every role with uniformly random legal choices.
//! Agents decide from their own `PlayerView`, so a simulated Mafia member
//! never learns more than a real one would. Used by the `mafia-sim` binary,
//! the benchmarks and the property tests.

use crate::core::{GameError, GameRng, PlayerId, Role};
use crate::engine::MafiaGame;
use crate::events::{EventLog, EventSink};
use crate::phase::Phase;
use crate::rules::GameOutcome;

const REASONS: [&str; 5] = [
    "acting suspicious",
    "too quiet",
    "voted strangely yesterday",
    "defended the wrong person",
    "gut feeling",
];

/// Drives a `MafiaGame` with random agents.
#[derive(Debug)]
pub struct Simulation<S: EventSink = EventLog> {
    game: MafiaGame<S>,
    agents: GameRng,
    max_rounds: u32,
}

impl<S: EventSink> Simulation<S> {
    /// Wrap a game. Agent choices come from their own stream of `seed`, so
    /// they never disturb the role deal.
    #[must_use]
    pub fn new(game: MafiaGame<S>, seed: u64, max_rounds: u32) -> Self {
        Self {
            game,
            agents: GameRng::new(seed).for_context("agents"),
            max_rounds,
        }
    }

    #[must_use]
    pub fn game(&self) -> &MafiaGame<S> {
        &self.game
    }

    #[must_use]
    pub fn into_game(self) -> MafiaGame<S> {
        self.game
    }

    /// Seat players `0..count`.
    pub fn seat(&mut self, count: usize) -> Result<(), GameError> {
        for player in PlayerId::range(0, count) {
            self.game.join(player)?;
        }
        Ok(())
    }

    /// Play until someone wins or the round limit passes.
    pub fn run(&mut self) -> Result<GameOutcome, GameError> {
        while !self.game.phase().is_terminal() && self.game.round() <= self.max_rounds {
            self.step()?;
        }
        Ok(self.game.outcome())
    }

    /// Play one phase to its end. Returns the new phase.
    pub fn step(&mut self) -> Result<Phase, GameError> {
        let moderator = self.game.moderator();
        match self.game.phase() {
            Phase::Lobby => {
                self.game.start(moderator)?;
            }
            Phase::Night => {
                self.play_night()?;
                self.game.resolve_night(moderator)?;
            }
            Phase::Day => {
                self.play_day()?;
                self.game.resolve_vote(moderator)?;
            }
            Phase::Concluded => {}
        }
        Ok(self.game.phase())
    }

    fn play_night(&mut self) -> Result<(), GameError> {
        let self_save = self.game.config().doctor_self_save;

        for player in self.game.living_players() {
            let view = self.game.view_for(player);
            let Some(role) = view.role else { continue };
            if !self.game.pending_night_roles().contains(&role) {
                continue;
            }

            let candidates: Vec<PlayerId> = view
                .public
                .living()
                .filter(|&id| match role {
                    Role::Mafia => id != player && !view.role_of(id).is_some_and(Role::is_mafia),
                    Role::Doctor => self_save || id != player,
                    _ => id != player,
                })
                .collect();
            let Some(&target) = self.agents.choose(&candidates) else {
                continue;
            };

            match role {
                Role::Mafia => self.game.submit_mafia_target(player, target)?,
                Role::Doctor => self.game.submit_doctor_save(player, target)?,
                Role::Detective => self.game.submit_detective_investigate(player, target)?,
                Role::Townsperson | Role::Unassigned => continue,
            };
        }
        Ok(())
    }

    fn play_day(&mut self) -> Result<(), GameError> {
        let living = self.game.living_players();

        for &player in &living {
            let others: Vec<PlayerId> = living.iter().copied().filter(|&id| id != player).collect();
            let Some(&accused) = self.agents.choose(&others) else {
                continue;
            };
            let reason = self.agents.choose(&REASONS).copied().unwrap_or_default();
            self.game.accuse(player, accused, reason)?;
        }

        let candidates = self.game.accused_set();
        for &player in &living {
            if let Some(&candidate) = self.agents.choose(&candidates) {
                self.game.vote(player, candidate)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::GameBuilder;

    const MODERATOR: PlayerId = PlayerId(1000);

    fn simulate(players: usize, seed: u64) -> Simulation {
        let config = crate::core::GameConfig::default().with_max_players(players.max(8));
        let game = GameBuilder::new(MODERATOR)
            .config(config)
            .seed(seed)
            .build()
            .unwrap();
        let mut sim = Simulation::new(game, seed, 50);
        sim.seat(players).unwrap();
        sim
    }

    #[test]
    fn test_random_games_finish() {
        for seed in 0..20 {
            let mut sim = simulate(6, seed);
            let outcome = sim.run().unwrap();
            assert!(outcome.is_decided(), "seed {seed} did not finish");
            assert_eq!(sim.game().phase(), Phase::Concluded);
        }
    }

    #[test]
    fn test_same_seed_same_game() {
        let mut a = simulate(7, 99);
        let mut b = simulate(7, 99);
        a.run().unwrap();
        b.run().unwrap();

        assert_eq!(a.game().history(), b.game().history());
        assert_eq!(a.game().sink(), b.game().sink());
    }

    #[test]
    fn test_step_walks_phases() {
        let mut sim = simulate(4, 5);
        assert_eq!(sim.step().unwrap(), Phase::Night);
        let next = sim.step().unwrap();
        assert!(matches!(next, Phase::Day | Phase::Concluded));
    }
}
