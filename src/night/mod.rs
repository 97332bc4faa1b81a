//! Night actions and their resolution.
//!
//! Each night the Mafia, the Doctor and the Detective may each record one
//! action. Nothing happens until the moderator resolves the night; then
//! the attack and the save are compared and the investigation is answered.
//!
//! ## Resolution rules
//!
//! - Mafia target submitted, still alive, not saved: the target dies.
//! - Mafia target equals the Doctor's save: nobody dies.
//! - No Mafia target: nobody dies.
//! - The Detective learns the target's true role whatever else happened.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{GameConfig, GameError, PlayerId, Role};
use crate::roster::Roster;

/// One recorded night action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightAction {
    pub actor: PlayerId,
    pub target: PlayerId,
}

/// What a Detective learned. Visible only to that Detective.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Investigation {
    pub detective: PlayerId,
    pub target: PlayerId,
    pub role: Role,
    pub is_mafia: bool,
    pub round: u32,
}

/// Outcome of one resolved night.
///
/// `attacked`, `saved` and `investigation` are secret; only `eliminated`
/// and `attack_prevented()` are announced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightReport {
    pub attacked: Option<PlayerId>,
    pub saved: Option<PlayerId>,
    pub eliminated: Option<PlayerId>,
    pub investigation: Option<Investigation>,
}

impl NightReport {
    /// Did the Doctor stop the attack?
    #[must_use]
    pub fn attack_prevented(&self) -> bool {
        self.attacked.is_some() && self.attacked == self.saved
    }
}

/// Collects at most one action per night role.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightResolver {
    actions: FxHashMap<Role, NightAction>,
}

impl NightResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The action recorded for `role` tonight, if any.
    #[must_use]
    pub fn submitted(&self, role: Role) -> Option<&NightAction> {
        self.actions.get(&role)
    }

    #[must_use]
    pub fn has_acted(&self, role: Role) -> bool {
        self.actions.contains_key(&role)
    }

    /// Check a night action without recording it.
    pub fn check_submit(
        &self,
        role: Role,
        actor: PlayerId,
        target: PlayerId,
        roster: &Roster,
        config: &GameConfig,
    ) -> Result<(), GameError> {
        debug_assert!(role.acts_at_night());

        let participant = roster.require_living(actor)?;
        if participant.role != role {
            return Err(GameError::WrongRole {
                player: actor,
                required: role,
            });
        }
        if self.has_acted(role) {
            return Err(GameError::ActionAlreadySubmitted(role));
        }

        match roster.get(target) {
            None => return Err(GameError::UnknownPlayer(target)),
            Some(p) if !p.alive => return Err(GameError::InvalidTarget(target)),
            Some(_) => {}
        }

        if actor == target && !(role == Role::Doctor && config.doctor_self_save) {
            return Err(GameError::CannotTargetSelf(actor));
        }
        Ok(())
    }

    /// Record a night action for `role`.
    pub fn submit(
        &mut self,
        role: Role,
        actor: PlayerId,
        target: PlayerId,
        roster: &Roster,
        config: &GameConfig,
    ) -> Result<(), GameError> {
        self.check_submit(role, actor, target, roster, config)?;
        self.actions.insert(role, NightAction { actor, target });
        Ok(())
    }

    /// Work out what tonight's actions do. Pure: the caller applies the
    /// elimination.
    #[must_use]
    pub fn resolve(&self, roster: &Roster, round: u32) -> NightReport {
        let attacked = self.submitted(Role::Mafia).map(|a| a.target);
        let saved = self.submitted(Role::Doctor).map(|a| a.target);

        // A target removed by the moderator mid-night cannot die twice.
        let eliminated = attacked.filter(|&target| Some(target) != saved && roster.is_alive(target));

        let investigation = self.submitted(Role::Detective).and_then(|action| {
            roster.role_of(action.target).map(|role| Investigation {
                detective: action.actor,
                target: action.target,
                role,
                is_mafia: role.is_mafia(),
                round,
            })
        });

        NightReport {
            attacked,
            saved,
            eliminated,
            investigation,
        }
    }

    /// Discard tonight's actions.
    pub fn clear(&mut self) {
        self.actions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAFIA: PlayerId = PlayerId(0);
    const DOCTOR: PlayerId = PlayerId(1);
    const DETECTIVE: PlayerId = PlayerId(2);
    const TOWN: PlayerId = PlayerId(3);

    fn table() -> Roster {
        let mut roster = Roster::new(8);
        for id in [MAFIA, DOCTOR, DETECTIVE, TOWN] {
            roster.join(id).unwrap();
        }
        roster.set_roles(&[Role::Mafia, Role::Doctor, Role::Detective, Role::Townsperson]);
        roster
    }

    #[test]
    fn test_unsaved_target_dies() {
        let roster = table();
        let config = GameConfig::default();
        let mut night = NightResolver::new();

        night.submit(Role::Mafia, MAFIA, TOWN, &roster, &config).unwrap();
        night.submit(Role::Doctor, DOCTOR, DETECTIVE, &roster, &config).unwrap();

        let report = night.resolve(&roster, 1);
        assert_eq!(report.eliminated, Some(TOWN));
        assert!(!report.attack_prevented());
    }

    #[test]
    fn test_saved_target_survives() {
        let roster = table();
        let config = GameConfig::default();
        let mut night = NightResolver::new();

        night.submit(Role::Mafia, MAFIA, TOWN, &roster, &config).unwrap();
        night.submit(Role::Doctor, DOCTOR, TOWN, &roster, &config).unwrap();

        let report = night.resolve(&roster, 1);
        assert_eq!(report.eliminated, None);
        assert!(report.attack_prevented());
    }

    #[test]
    fn test_no_attack_no_elimination() {
        let roster = table();
        let config = GameConfig::default();
        let mut night = NightResolver::new();

        night.submit(Role::Doctor, DOCTOR, TOWN, &roster, &config).unwrap();

        let report = night.resolve(&roster, 1);
        assert_eq!(report, NightReport {
            attacked: None,
            saved: Some(TOWN),
            eliminated: None,
            investigation: None,
        });
    }

    #[test]
    fn test_investigation_reports_true_role() {
        let roster = table();
        let config = GameConfig::default();
        let mut night = NightResolver::new();

        night.submit(Role::Detective, DETECTIVE, MAFIA, &roster, &config).unwrap();
        night.submit(Role::Mafia, MAFIA, DETECTIVE, &roster, &config).unwrap();

        let report = night.resolve(&roster, 3);
        // The Detective dies tonight but still learns the answer.
        assert_eq!(report.eliminated, Some(DETECTIVE));
        assert_eq!(report.investigation, Some(Investigation {
            detective: DETECTIVE,
            target: MAFIA,
            role: Role::Mafia,
            is_mafia: true,
            round: 3,
        }));
    }

    #[test]
    fn test_one_action_per_role() {
        let roster = table();
        let config = GameConfig::default();
        let mut night = NightResolver::new();

        night.submit(Role::Mafia, MAFIA, TOWN, &roster, &config).unwrap();
        assert_eq!(
            night.submit(Role::Mafia, MAFIA, DOCTOR, &roster, &config),
            Err(GameError::ActionAlreadySubmitted(Role::Mafia))
        );
        assert_eq!(night.submitted(Role::Mafia).unwrap().target, TOWN);
    }

    #[test]
    fn test_actor_must_hold_role() {
        let roster = table();
        let config = GameConfig::default();
        let night = NightResolver::new();

        assert_eq!(
            night.check_submit(Role::Mafia, TOWN, DOCTOR, &roster, &config),
            Err(GameError::WrongRole { player: TOWN, required: Role::Mafia })
        );
        assert_eq!(
            night.check_submit(Role::Doctor, PlayerId(42), DOCTOR, &roster, &config),
            Err(GameError::UnknownPlayer(PlayerId(42)))
        );
    }

    #[test]
    fn test_dead_actor_and_dead_target() {
        let mut roster = table();
        let config = GameConfig::default();
        let night = NightResolver::new();

        roster.eliminate(TOWN).unwrap();
        assert_eq!(
            night.check_submit(Role::Mafia, MAFIA, TOWN, &roster, &config),
            Err(GameError::InvalidTarget(TOWN))
        );

        roster.eliminate(DOCTOR).unwrap();
        assert_eq!(
            night.check_submit(Role::Doctor, DOCTOR, MAFIA, &roster, &config),
            Err(GameError::NotAlive(DOCTOR))
        );
    }

    #[test]
    fn test_self_targeting_rules() {
        let roster = table();
        let night = NightResolver::new();
        let permissive = GameConfig::default();
        let strict = GameConfig::default().with_doctor_self_save(false);

        assert_eq!(
            night.check_submit(Role::Mafia, MAFIA, MAFIA, &roster, &permissive),
            Err(GameError::CannotTargetSelf(MAFIA))
        );
        assert_eq!(
            night.check_submit(Role::Detective, DETECTIVE, DETECTIVE, &roster, &permissive),
            Err(GameError::CannotTargetSelf(DETECTIVE))
        );
        assert!(night.check_submit(Role::Doctor, DOCTOR, DOCTOR, &roster, &permissive).is_ok());
        assert_eq!(
            night.check_submit(Role::Doctor, DOCTOR, DOCTOR, &roster, &strict),
            Err(GameError::CannotTargetSelf(DOCTOR))
        );
    }

    #[test]
    fn test_target_removed_mid_night_does_not_die_twice() {
        let mut roster = table();
        let config = GameConfig::default();
        let mut night = NightResolver::new();

        night.submit(Role::Mafia, MAFIA, TOWN, &roster, &config).unwrap();
        roster.eliminate(TOWN).unwrap();

        let report = night.resolve(&roster, 1);
        assert_eq!(report.attacked, Some(TOWN));
        assert_eq!(report.eliminated, None);
    }

    #[test]
    fn test_clear() {
        let roster = table();
        let config = GameConfig::default();
        let mut night = NightResolver::new();

        night.submit(Role::Mafia, MAFIA, TOWN, &roster, &config).unwrap();
        night.clear();
        assert!(!night.has_acted(Role::Mafia));
        assert_eq!(night.resolve(&roster, 1), NightReport::default());
    }
}
