//! The game aggregate.
//!
//! `MafiaGame` owns everything about one table: the roster, the phase
//! machine, tonight's actions, today's accusations and votes, private
//! investigation results, the RNG, the audit history and the event sink.
//! Independent games are independent values.
//!
//! ## Call discipline
//!
//! Every mutating operation takes the (already authenticated) caller and
//! returns `Result<Receipt, GameError>`. All checks run before any mutation,
//! so a rejected call leaves the game and the notification stream exactly
//! as they were.
//!
//! ## Example
//!
//! ```
//! use mafia_engine::core::{GameConfig, PlayerId};
//! use mafia_engine::engine::GameBuilder;
//! use mafia_engine::phase::Phase;
//!
//! let moderator = PlayerId::new(100);
//! let mut game = GameBuilder::new(moderator).seed(7).build().unwrap();
//!
//! for id in PlayerId::range(0, 4) {
//!     game.join(id).unwrap();
//! }
//! game.start(moderator).unwrap();
//!
//! assert_eq!(game.phase(), Phase::Night);
//! assert_eq!(game.round(), 1);
//! ```

mod receipt;

use im::Vector;
use rustc_hash::FxHashMap;

use crate::core::{
    Action, ActionRecord, ConfigError, Disclosure, GameConfig, GameError, GameRng, GameRngState,
    PlayerId, PlayerView, PublicParticipant, PublicState, Role,
};
use crate::day::{Accusation, AccusationLedger, AccusedSet, VoteTally};
use crate::events::{
    Audience, EliminationCause, EventLog, EventSink, GameEvent, Notification, SequenceCounters,
};
use crate::night::{Investigation, NightResolver};
use crate::phase::{Phase, PhaseMachine, Transition};
use crate::roles::RoleAssigner;
use crate::roster::Roster;
use crate::rules::{GameOutcome, WinEvaluator};
use crate::store::GameSnapshot;

pub use receipt::Receipt;

/// Builder for creating a `MafiaGame`.
#[derive(Clone, Debug)]
pub struct GameBuilder {
    moderator: PlayerId,
    config: GameConfig,
    seed: Option<u64>,
}

impl GameBuilder {
    /// Start building a table run by `moderator`.
    #[must_use]
    pub fn new(moderator: PlayerId) -> Self {
        Self {
            moderator,
            config: GameConfig::default(),
            seed: None,
        }
    }

    #[must_use]
    pub fn config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    /// Pin the role deal. Without a seed the RNG is seeded from the OS.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build a game that keeps its notifications in an `EventLog`.
    pub fn build(self) -> Result<MafiaGame<EventLog>, ConfigError> {
        self.build_with_sink(EventLog::new())
    }

    /// Build a game that publishes to `sink`.
    pub fn build_with_sink<S: EventSink>(self, sink: S) -> Result<MafiaGame<S>, ConfigError> {
        let rng = match self.seed {
            Some(seed) => GameRng::new(seed),
            None => GameRng::from_entropy(),
        };
        MafiaGame::new(self.moderator, self.config, rng, sink)
    }
}

/// Work in progress for one operation: notifications to publish and the
/// action to record once the operation succeeds.
struct Commit {
    sequences: SequenceCounters,
    notifications: Vec<Notification>,
}

impl Commit {
    fn emit(&mut self, audience: Audience, event: GameEvent) {
        let sequence = self.sequences.next(audience);
        self.notifications
            .push(Notification::new(sequence, audience, event));
    }

    fn announce(&mut self, event: GameEvent) {
        self.emit(Audience::Everyone, event);
    }
}

/// One game of Mafia.
#[derive(Clone, Debug)]
pub struct MafiaGame<S: EventSink = EventLog> {
    config: GameConfig,
    moderator: PlayerId,
    roster: Roster,
    phase: PhaseMachine,
    night: NightResolver,
    accusations: AccusationLedger,
    votes: VoteTally,
    /// Results per Detective, oldest first.
    investigations: FxHashMap<PlayerId, Vec<Investigation>>,
    outcome: GameOutcome,
    rng: GameRng,
    history: Vector<ActionRecord>,
    sequences: SequenceCounters,
    next_action: u32,
    sink: S,
}

impl<S: EventSink> MafiaGame<S> {
    /// Create an empty table in the lobby.
    pub fn new(
        moderator: PlayerId,
        config: GameConfig,
        rng: GameRng,
        sink: S,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            roster: Roster::new(config.max_players),
            config,
            moderator,
            phase: PhaseMachine::new(),
            night: NightResolver::new(),
            accusations: AccusationLedger::new(),
            votes: VoteTally::new(),
            investigations: FxHashMap::default(),
            outcome: GameOutcome::Undecided,
            rng,
            history: Vector::new(),
            sequences: SequenceCounters::new(),
            next_action: 0,
            sink,
        })
    }

    // === Lobby ===

    /// Take a seat. Only possible in the lobby.
    pub fn join(&mut self, caller: PlayerId) -> Result<Receipt, GameError> {
        self.run(caller, Action::Join, |game, commit| {
            if game.phase.phase() != Phase::Lobby {
                return Err(GameError::GameAlreadyStarted);
            }
            if caller == game.moderator {
                return Err(GameError::ModeratorCannotJoin);
            }
            game.roster.join(caller)?;

            tracing::debug!(player = %caller, seated = game.roster.len(), "player joined");
            commit.announce(GameEvent::PlayerJoined { player: caller });
            Ok(())
        })
    }

    /// Deal roles and begin the first night (moderator).
    pub fn start(&mut self, caller: PlayerId) -> Result<Receipt, GameError> {
        self.run(caller, Action::Start, |game, commit| {
            game.require_moderator(caller)?;
            game.phase.check(Transition::Start)?;
            if game.roster.len() < game.config.min_players {
                return Err(GameError::NotEnoughPlayers {
                    required: game.config.min_players,
                    joined: game.roster.len(),
                });
            }

            RoleAssigner::from_config(&game.config).assign(&mut game.roster, &mut game.rng);

            let disclosure = Disclosure::new(
                &game.roster,
                game.moderator,
                Phase::Night,
                game.config.mafia_sees_teammates,
            );
            for participant in game.roster.participants() {
                commit.emit(
                    Audience::Player(participant.id),
                    GameEvent::RoleAssigned {
                        player: participant.id,
                        role: participant.role,
                        teammates: disclosure.teammates(participant.id),
                    },
                );
            }

            tracing::info!(
                players = game.roster.len(),
                mafia = game.roster.living_mafia_count(),
                "game started"
            );
            game.transition(commit, Transition::Start);
            Ok(())
        })
    }

    // === Night ===

    /// Choose tonight's victim (living Mafia).
    pub fn submit_mafia_target(
        &mut self,
        caller: PlayerId,
        target: PlayerId,
    ) -> Result<Receipt, GameError> {
        self.submit_night(Role::Mafia, caller, target, Action::MafiaTarget { target })
    }

    /// Protect someone tonight (living Doctor).
    pub fn submit_doctor_save(
        &mut self,
        caller: PlayerId,
        target: PlayerId,
    ) -> Result<Receipt, GameError> {
        self.submit_night(Role::Doctor, caller, target, Action::DoctorSave { target })
    }

    /// Investigate someone tonight (living Detective).
    pub fn submit_detective_investigate(
        &mut self,
        caller: PlayerId,
        target: PlayerId,
    ) -> Result<Receipt, GameError> {
        self.submit_night(Role::Detective, caller, target, Action::Investigate { target })
    }

    fn submit_night(
        &mut self,
        role: Role,
        caller: PlayerId,
        target: PlayerId,
        action: Action,
    ) -> Result<Receipt, GameError> {
        self.run(caller, action, |game, _| {
            game.phase.require(Phase::Night)?;
            game.night
                .submit(role, caller, target, &game.roster, &game.config)?;
            tracing::trace!(actor = %caller, %role, %target, "night action recorded");
            Ok(())
        })
    }

    /// Close the night: apply the attack unless it was saved, answer the
    /// investigation, then move to day (moderator).
    pub fn resolve_night(&mut self, caller: PlayerId) -> Result<Receipt, GameError> {
        self.run(caller, Action::ResolveNight, |game, commit| {
            game.require_moderator(caller)?;
            game.phase.check(Transition::Dawn)?;

            let round = game.phase.round();
            let report = game.night.resolve(&game.roster, round);
            if let Some(victim) = report.eliminated {
                game.roster.eliminate(victim)?;
            }
            game.night.clear();

            commit.announce(GameEvent::NightResolved {
                round,
                eliminated: report.eliminated,
                saved: report.attack_prevented(),
            });
            commit.emit(
                Audience::Moderator,
                GameEvent::NightSummary {
                    round,
                    attacked: report.attacked,
                    saved: report.saved,
                    investigated: report.investigation.map(|i| i.target),
                },
            );
            if let Some(investigation) = report.investigation {
                tracing::trace!(?investigation, "investigation answered");
                game.investigations
                    .entry(investigation.detective)
                    .or_default()
                    .push(investigation);
                commit.emit(
                    Audience::Player(investigation.detective),
                    GameEvent::InvestigationCompleted(investigation),
                );
            }
            tracing::info!(round, eliminated = ?report.eliminated, "night resolved");

            if let Some(victim) = report.eliminated {
                if game.settle(commit, victim, EliminationCause::Night) {
                    return Ok(());
                }
            }
            game.transition(commit, Transition::Dawn);
            Ok(())
        })
    }

    // === Day ===

    /// Publicly accuse another living player, with a reason.
    pub fn accuse(
        &mut self,
        caller: PlayerId,
        accused: PlayerId,
        reason: impl Into<String>,
    ) -> Result<Receipt, GameError> {
        let reason = reason.into();
        let action = Action::Accuse {
            accused,
            reason: reason.clone(),
        };
        self.run(caller, action, |game, commit| {
            game.phase.require(Phase::Day)?;
            game.accusations
                .accuse(caller, accused, reason.clone(), &game.roster)?;

            commit.announce(GameEvent::PlayerAccused {
                accuser: caller,
                accused,
                reason,
            });
            if game.accusations.is_complete(&game.roster) {
                game.close_accusations(commit);
            }
            Ok(())
        })
    }

    /// Vote to eliminate one of the accused.
    pub fn vote(&mut self, caller: PlayerId, candidate: PlayerId) -> Result<Receipt, GameError> {
        self.run(caller, Action::Vote { candidate }, |game, commit| {
            game.phase.require(Phase::Day)?;
            if !game.accusations.is_complete(&game.roster) {
                return Err(GameError::AccusationsIncomplete);
            }
            let accused = game.accusations.accused_set(&game.roster);
            game.votes.vote(caller, candidate, &game.roster, &accused)?;

            commit.announce(GameEvent::VoteCast {
                voter: caller,
                candidate,
            });
            Ok(())
        })
    }

    /// Close the vote, apply its elimination and move to the next night
    /// (moderator).
    pub fn resolve_vote(&mut self, caller: PlayerId) -> Result<Receipt, GameError> {
        self.run(caller, Action::ResolveVote, |game, commit| {
            game.require_moderator(caller)?;
            game.phase.check(Transition::Dusk)?;
            if !game.accusations.is_complete(&game.roster) {
                return Err(GameError::AccusationsIncomplete);
            }
            let accused = game.accusations.accused_set(&game.roster);
            if !game.votes.is_complete(&game.roster, &accused) {
                return Err(GameError::VotingIncomplete);
            }

            let resolution = game.votes.resolve(&accused, game.config.tie_break);
            let eliminated = resolution.outcome.eliminated();
            if let Some(player) = eliminated {
                game.roster.eliminate(player)?;
            }
            game.accusations.clear();
            game.votes.clear();

            tracing::info!(round = game.phase.round(), ?eliminated, "vote resolved");
            commit.announce(GameEvent::VotingCompleted {
                tallies: resolution.tallies,
                outcome: resolution.outcome,
            });

            if let Some(player) = eliminated {
                if game.settle(commit, player, EliminationCause::Vote) {
                    return Ok(());
                }
            }
            game.transition(commit, Transition::Dusk);
            Ok(())
        })
    }

    // === Moderator ===

    /// Remove a player directly, during night or day (moderator).
    pub fn eliminate(&mut self, caller: PlayerId, target: PlayerId) -> Result<Receipt, GameError> {
        self.run(caller, Action::Eliminate { target }, |game, commit| {
            game.require_moderator(caller)?;
            let phase = game.phase.phase();
            if !phase.in_round() {
                return Err(GameError::InvalidPhase(phase));
            }
            let accusations_were_complete =
                phase == Phase::Day && game.accusations.is_complete(&game.roster);
            game.roster.eliminate(target)?;

            if game.settle(commit, target, EliminationCause::Moderator) {
                return Ok(());
            }
            // The removed player may have been the last one yet to accuse.
            if phase == Phase::Day
                && !accusations_were_complete
                && game.accusations.is_complete(&game.roster)
            {
                game.close_accusations(commit);
            }
            Ok(())
        })
    }

    /// Return to the lobby with the same seats: roles cleared, everyone
    /// alive, round and ledgers discarded (moderator).
    pub fn reset_game(&mut self, caller: PlayerId) -> Result<Receipt, GameError> {
        self.run(caller, Action::Reset, |game, commit| {
            game.require_moderator(caller)?;
            game.phase.check(Transition::Reset)?;

            game.roster.reset();
            game.night.clear();
            game.accusations.clear();
            game.votes.clear();
            game.investigations.clear();
            game.outcome = GameOutcome::Undecided;

            tracing::info!(seated = game.roster.len(), "game reset");
            commit.announce(GameEvent::GameReset);
            game.transition(commit, Transition::Reset);
            Ok(())
        })
    }

    /// Apply any action on behalf of `caller`.
    pub fn apply(&mut self, caller: PlayerId, action: Action) -> Result<Receipt, GameError> {
        match action {
            Action::Join => self.join(caller),
            Action::Start => self.start(caller),
            Action::MafiaTarget { target } => self.submit_mafia_target(caller, target),
            Action::DoctorSave { target } => self.submit_doctor_save(caller, target),
            Action::Investigate { target } => self.submit_detective_investigate(caller, target),
            Action::ResolveNight => self.resolve_night(caller),
            Action::Accuse { accused, reason } => self.accuse(caller, accused, reason),
            Action::Vote { candidate } => self.vote(caller, candidate),
            Action::ResolveVote => self.resolve_vote(caller),
            Action::Eliminate { target } => self.eliminate(caller, target),
            Action::Reset => self.reset_game(caller),
        }
    }

    // === Queries ===

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn moderator(&self) -> PlayerId {
        self.moderator
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase.phase()
    }

    /// Current round; 0 in the lobby.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.phase.round()
    }

    /// Seats as everyone sees them.
    #[must_use]
    pub fn roster(&self) -> Vec<PublicParticipant> {
        self.disclosure().public_participants()
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.roster.len()
    }

    #[must_use]
    pub fn is_alive(&self, player: PlayerId) -> bool {
        self.roster.is_alive(player)
    }

    /// Living players in join order.
    #[must_use]
    pub fn living_players(&self) -> Vec<PlayerId> {
        self.roster.living_ids()
    }

    /// Today's accusations, in the order they were made.
    #[must_use]
    pub fn accusations(&self) -> &[Accusation] {
        self.accusations.accusations()
    }

    /// Living accused players in first-accusation order.
    #[must_use]
    pub fn accused_set(&self) -> AccusedSet {
        self.accusations.accused_set(&self.roster)
    }

    /// Has every living player accused someone today?
    #[must_use]
    pub fn accusations_complete(&self) -> bool {
        self.phase() == Phase::Day && self.accusations.is_complete(&self.roster)
    }

    /// Can the moderator close today's vote?
    #[must_use]
    pub fn voting_complete(&self) -> bool {
        self.accusations_complete()
            && self.votes.is_complete(&self.roster, &self.accused_set())
    }

    /// Has `voter` voted today?
    #[must_use]
    pub fn has_voted(&self, voter: PlayerId) -> bool {
        self.votes.has_voted(voter)
    }

    /// Night roles with a living holder that have not acted tonight.
    ///
    /// A moderator-side query: it reveals which roles are still in play.
    #[must_use]
    pub fn pending_night_roles(&self) -> Vec<Role> {
        if self.phase() != Phase::Night {
            return Vec::new();
        }
        Role::NIGHT_ACTORS
            .into_iter()
            .filter(|&role| {
                !self.night.has_acted(role) && self.roster.alive().any(|p| p.role == role)
            })
            .collect()
    }

    #[must_use]
    pub fn outcome(&self) -> GameOutcome {
        self.outcome
    }

    /// The latest investigation made by `viewer`, if they are a Detective.
    #[must_use]
    pub fn investigation_result(&self, viewer: PlayerId) -> Option<Investigation> {
        self.investigations(viewer).last().copied()
    }

    /// Every investigation made by `viewer`, oldest first.
    #[must_use]
    pub fn investigations(&self, viewer: PlayerId) -> &[Investigation] {
        self.investigations
            .get(&viewer)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// State visible to everyone.
    #[must_use]
    pub fn public_state(&self) -> PublicState {
        PublicState {
            phase: self.phase(),
            round: self.round(),
            moderator: self.moderator,
            players: self.roster(),
            accusations: self.accusations.accusations().to_vec(),
            accused: self.accused_set().to_vec(),
            votes: self.votes.votes().to_vec(),
            outcome: self.outcome,
            history: self.public_history(),
        }
    }

    /// Everything `viewer` is entitled to know.
    #[must_use]
    pub fn view_for(&self, viewer: PlayerId) -> PlayerView {
        let disclosure = self.disclosure();
        let investigations = if viewer == self.moderator {
            let mut all: Vec<Investigation> =
                self.investigations.values().flatten().copied().collect();
            all.sort_by_key(|i| (i.round, i.detective));
            all
        } else {
            self.investigations(viewer).to_vec()
        };

        PlayerView {
            viewer,
            role: self
                .roster
                .role_of(viewer)
                .filter(|&role| role != Role::Unassigned),
            known_roles: disclosure.known_roles(viewer),
            investigations,
            public: self.public_state(),
        }
    }

    /// Every applied action, including secret night actions.
    #[must_use]
    pub fn history(&self) -> &Vector<ActionRecord> {
        &self.history
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    #[must_use]
    pub fn into_sink(self) -> S {
        self.sink
    }

    // === Snapshots ===

    /// Capture the whole game, including the RNG position.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            config: self.config.clone(),
            moderator: self.moderator,
            roster: self.roster.clone(),
            phase: self.phase.clone(),
            night: self.night.clone(),
            accusations: self.accusations.clone(),
            votes: self.votes.clone(),
            investigations: self.investigations.clone(),
            outcome: self.outcome,
            rng: self.rng.state(),
            history: self.history.clone(),
            sequences: self.sequences.clone(),
            next_action: self.next_action,
        }
    }

    /// Rebuild a game from a snapshot, publishing future notifications to
    /// `sink`.
    #[must_use]
    pub fn from_snapshot(snapshot: GameSnapshot, sink: S) -> Self {
        Self {
            config: snapshot.config,
            moderator: snapshot.moderator,
            roster: snapshot.roster,
            phase: snapshot.phase,
            night: snapshot.night,
            accusations: snapshot.accusations,
            votes: snapshot.votes,
            investigations: snapshot.investigations,
            outcome: snapshot.outcome,
            rng: GameRng::from_state(&snapshot.rng),
            history: snapshot.history,
            sequences: snapshot.sequences,
            next_action: snapshot.next_action,
            sink,
        }
    }

    /// Position of the role-dealing RNG.
    #[must_use]
    pub fn rng_state(&self) -> GameRngState {
        self.rng.state()
    }

    // === Internals ===

    fn disclosure(&self) -> Disclosure<'_> {
        Disclosure::new(
            &self.roster,
            self.moderator,
            self.phase(),
            self.config.mafia_sees_teammates,
        )
    }

    /// History without night actions, renumbered without gaps so the
    /// numbering does not reveal how many secret actions happened.
    fn public_history(&self) -> Vector<ActionRecord> {
        self.history
            .iter()
            .filter(|record| !record.action.is_night_action())
            .zip(0..)
            .map(|(record, sequence)| ActionRecord {
                sequence,
                ..record.clone()
            })
            .collect()
    }

    fn require_moderator(&self, caller: PlayerId) -> Result<(), GameError> {
        if caller == self.moderator {
            Ok(())
        } else {
            Err(GameError::NotModerator(caller))
        }
    }

    /// Run one operation. `op` must finish every check before it mutates.
    fn run<F>(&mut self, caller: PlayerId, action: Action, op: F) -> Result<Receipt, GameError>
    where
        F: FnOnce(&mut Self, &mut Commit) -> Result<(), GameError>,
    {
        let name = action.name();
        let round = self.phase.round();
        let mut commit = Commit {
            sequences: self.sequences.clone(),
            notifications: Vec::new(),
        };

        if let Err(err) = op(self, &mut commit) {
            tracing::debug!(%caller, action = name, %err, "action rejected");
            return Err(err);
        }

        self.history
            .push_back(ActionRecord::new(caller, action, round, self.next_action));
        self.next_action += 1;
        self.sequences = commit.sequences;
        for notification in &commit.notifications {
            self.sink.publish(notification);
        }

        tracing::debug!(
            %caller,
            action = name,
            notifications = commit.notifications.len(),
            "action applied"
        );
        Ok(Receipt::new(self.moderator, commit.notifications))
    }

    fn transition(&mut self, commit: &mut Commit, transition: Transition) {
        let from = self.phase.phase();
        let to = self.phase.apply(transition);
        let round = self.phase.round();

        tracing::info!(%from, %to, round, "phase changed");
        commit.announce(GameEvent::PhaseChanged { from, to, round });
    }

    /// Announce an elimination and evaluate the win condition. Returns
    /// `true` if the game is now over.
    fn settle(&mut self, commit: &mut Commit, player: PlayerId, cause: EliminationCause) -> bool {
        tracing::info!(%player, ?cause, "player eliminated");
        commit.announce(GameEvent::PlayerEliminated { player, cause });

        let outcome = WinEvaluator::evaluate(&self.roster);
        if !outcome.is_decided() {
            commit.announce(GameEvent::GameContinues {
                living: self.roster.living_count(),
            });
            return false;
        }

        self.outcome = outcome;
        self.night.clear();
        self.accusations.clear();
        self.votes.clear();

        tracing::info!(%outcome, round = self.phase.round(), "game won");
        commit.announce(GameEvent::GameWon {
            outcome,
            message: outcome.message().to_string(),
        });
        self.transition(commit, Transition::Conclude);
        true
    }

    fn close_accusations(&self, commit: &mut Commit) {
        let accused = self.accused_set();
        tracing::debug!(accused = accused.len(), "accusations complete");
        commit.announce(GameEvent::AccusationsCompleted {
            accused: accused.to_vec(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODERATOR: PlayerId = PlayerId(100);

    fn lobby(players: usize) -> MafiaGame {
        let mut game = GameBuilder::new(MODERATOR).seed(11).build().unwrap();
        for id in PlayerId::range(0, players) {
            game.join(id).unwrap();
        }
        game
    }

    fn holder(game: &MafiaGame, role: Role) -> PlayerId {
        game.view_for(MODERATOR)
            .known_roles
            .iter()
            .find(|&&(_, r)| r == role)
            .map(|&(id, _)| id)
            .unwrap()
    }

    #[test]
    fn test_join_rules() {
        let mut game = lobby(3);

        assert_eq!(game.join(PlayerId(0)), Err(GameError::AlreadyJoined(PlayerId(0))));
        assert_eq!(game.join(MODERATOR), Err(GameError::ModeratorCannotJoin));
        assert_eq!(game.player_count(), 3);
    }

    #[test]
    fn test_start_requires_moderator_and_quorum() {
        let mut game = lobby(3);

        assert_eq!(game.start(PlayerId(0)), Err(GameError::NotModerator(PlayerId(0))));
        assert_eq!(
            game.start(MODERATOR),
            Err(GameError::NotEnoughPlayers {
                required: 4,
                joined: 3
            })
        );

        game.join(PlayerId(3)).unwrap();
        let receipt = game.start(MODERATOR).unwrap();
        assert_eq!(game.phase(), Phase::Night);

        // Four private role notifications, then the phase change.
        let private = receipt
            .notifications()
            .iter()
            .filter(|n| !n.is_public())
            .count();
        assert_eq!(private, 4);
        assert_eq!(
            receipt.events().last(),
            Some(&GameEvent::PhaseChanged {
                from: Phase::Lobby,
                to: Phase::Night,
                round: 1
            })
        );

        assert_eq!(game.start(MODERATOR), Err(GameError::InvalidPhase(Phase::Night)));
        assert_eq!(game.join(PlayerId(9)), Err(GameError::GameAlreadyStarted));
    }

    #[test]
    fn test_rejected_call_changes_nothing() {
        let mut game = lobby(4);
        game.start(MODERATOR).unwrap();
        let before_history = game.history().len();
        let before_log = game.sink().len();

        let town = holder(&game, Role::Townsperson);
        assert!(game.submit_mafia_target(town, PlayerId(0)).is_err());
        assert!(game.accuse(town, PlayerId(0), "day only").is_err());
        assert!(game.resolve_vote(MODERATOR).is_err());

        assert_eq!(game.history().len(), before_history);
        assert_eq!(game.sink().len(), before_log);
    }

    #[test]
    fn test_night_then_day() {
        let mut game = lobby(4);
        game.start(MODERATOR).unwrap();

        let mafia = holder(&game, Role::Mafia);
        let doctor = holder(&game, Role::Doctor);
        let town = holder(&game, Role::Townsperson);

        game.submit_mafia_target(mafia, town).unwrap();
        game.submit_doctor_save(doctor, doctor).unwrap();
        assert_eq!(game.pending_night_roles(), vec![Role::Detective]);

        let receipt = game.resolve_night(MODERATOR).unwrap();
        assert!(!game.is_alive(town));
        assert_eq!(game.phase(), Phase::Day);
        assert!(receipt.events().any(|e| matches!(
            e,
            GameEvent::PlayerEliminated {
                cause: EliminationCause::Night,
                ..
            }
        )));

        assert_eq!(
            game.resolve_night(MODERATOR),
            Err(GameError::PhaseAlreadyAdvanced(Phase::Night))
        );
    }

    #[test]
    fn test_vote_needs_complete_accusations() {
        let mut game = lobby(5);
        game.start(MODERATOR).unwrap();
        game.resolve_night(MODERATOR).unwrap();

        game.accuse(PlayerId(0), PlayerId(1), "nervous").unwrap();
        assert_eq!(game.vote(PlayerId(2), PlayerId(1)), Err(GameError::AccusationsIncomplete));
        assert_eq!(game.resolve_vote(MODERATOR), Err(GameError::AccusationsIncomplete));
        assert!(!game.accusations_complete());
    }

    #[test]
    fn test_moderator_elimination_can_complete_accusations() {
        let mut game = lobby(5);
        game.start(MODERATOR).unwrap();
        game.resolve_night(MODERATOR).unwrap();

        let mafia = holder(&game, Role::Mafia);
        let town: Vec<PlayerId> = game
            .living_players()
            .into_iter()
            .filter(|&id| id != mafia)
            .collect();

        // Everyone but the last townsperson accuses the Mafia.
        for &id in &town[..town.len() - 1] {
            game.accuse(id, mafia, "").unwrap();
        }
        game.accuse(mafia, town[0], "").unwrap();
        assert!(!game.accusations_complete());

        let receipt = game.eliminate(MODERATOR, town[town.len() - 1]).unwrap();
        assert!(game.accusations_complete());
        assert!(receipt
            .events()
            .any(|e| matches!(e, GameEvent::AccusationsCompleted { .. })));
    }

    #[test]
    fn test_history_records_applied_actions() {
        let mut game = lobby(4);
        game.start(MODERATOR).unwrap();

        let history = game.history();
        assert_eq!(history.len(), 5);
        assert_eq!(history[4].action, Action::Start);
        assert_eq!(history[4].round, 0);
        assert_eq!(history[4].sequence, 4);
    }

    #[test]
    fn test_each_audience_is_numbered_without_gaps() {
        let mut game = lobby(4);
        game.start(MODERATOR).unwrap();
        let detective = holder(&game, Role::Detective);
        let mafia = holder(&game, Role::Mafia);
        game.submit_detective_investigate(detective, mafia).unwrap();
        game.resolve_night(MODERATOR).unwrap();

        let stream = |audience: Audience| -> Vec<u64> {
            game.sink()
                .notifications()
                .iter()
                .filter(|n| n.audience == audience)
                .map(|n| n.sequence)
                .collect()
        };

        let public = stream(Audience::Everyone);
        assert_eq!(public, (0..public.len() as u64).collect::<Vec<_>>());
        // Role, then investigation result.
        assert_eq!(stream(Audience::Player(detective)), vec![0, 1]);
        assert_eq!(stream(Audience::Player(mafia)), vec![0]);
        assert_eq!(stream(Audience::Moderator), vec![0]);
    }

    #[test]
    fn test_moderator_gets_night_summary() {
        let mut game = lobby(4);
        game.start(MODERATOR).unwrap();
        let mafia = holder(&game, Role::Mafia);
        let doctor = holder(&game, Role::Doctor);
        let town = holder(&game, Role::Townsperson);
        game.submit_mafia_target(mafia, town).unwrap();
        game.submit_doctor_save(doctor, town).unwrap();

        let receipt = game.resolve_night(MODERATOR).unwrap();
        let summary = receipt
            .notifications()
            .iter()
            .find(|n| n.audience == Audience::Moderator)
            .unwrap();
        assert_eq!(
            summary.event,
            GameEvent::NightSummary {
                round: 1,
                attacked: Some(town),
                saved: Some(town),
                investigated: None,
            }
        );
        assert_eq!(receipt.visible_to(town).filter(|n| n.audience == Audience::Moderator).count(), 0);
    }

    #[test]
    fn test_public_history_is_renumbered() {
        let mut game = lobby(4);
        game.start(MODERATOR).unwrap();
        let doctor = holder(&game, Role::Doctor);
        game.submit_doctor_save(doctor, doctor).unwrap();
        game.resolve_night(MODERATOR).unwrap();

        assert_eq!(game.history().len(), 7);
        let public: Vec<u32> = game.public_state().history.iter().map(|r| r.sequence).collect();
        assert_eq!(public, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(game.history()[6].sequence, 6);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = GameConfig::default().with_min_players(2);
        assert!(GameBuilder::new(MODERATOR).config(config).build().is_err());
    }
}
