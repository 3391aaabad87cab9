//! Skill activation and the target-selection state machine.
//!
//! A resolver either finishes immediately or hands back a [`SkillTargeting`]
//! request. The request is parked in `SkillState::SelectingTargets` until
//! the player supplies coordinates or cancels; while parked, every other
//! mutator is rejected.

use std::collections::BTreeSet;
use std::mem;

use tracing::{debug, warn};

use super::GameManager;
use crate::entity::{EntityId, SkillCaster, SkillCompleted, SkillResult, SkillTargeting};
use crate::error::{EngineError, EngineResult, Resource, StateIssue, TargetIssue};
use crate::event::GameEvent;
use crate::hex::OddRCoord;

/// What the engine charges once a skill succeeds.
#[derive(Clone, Debug)]
pub(crate) struct SkillCharge {
    caster: SkillCaster,
    crumb_cost: u32,
    skill: String,
}

pub(crate) struct PendingSkill {
    charge: SkillCharge,
    targeting: SkillTargeting,
}

pub(crate) enum SkillState {
    Idle,
    SelectingTargets(PendingSkill),
}

/// Outcome of an activation or target selection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkillStatus {
    Completed(SkillCompleted),
    AwaitingTargets {
        target_count: usize,
        available_targets: Vec<OddRCoord>,
        cancelable: bool,
    },
}

/// Read-only view of a parked targeting request.
#[derive(Clone, Copy, Debug)]
pub struct TargetingView<'a> {
    pub caster: SkillCaster,
    pub target_count: usize,
    pub available_targets: &'a [OddRCoord],
    pub cancelable: bool,
}

impl GameManager {
    pub fn is_selecting_target(&self) -> bool {
        matches!(self.skill_state, SkillState::SelectingTargets(_))
    }

    pub fn skill_targeting(&self) -> Option<TargetingView<'_>> {
        match &self.skill_state {
            SkillState::Idle => None,
            SkillState::SelectingTargets(pending) => Some(TargetingView {
                caster: pending.charge.caster,
                target_count: pending.targeting.target_count(),
                available_targets: pending.targeting.available_targets(),
                cancelable: pending.targeting.is_cancelable(),
            }),
        }
    }

    /// Activates skill `skill_index` of `entity`, which must belong to the
    /// acting side.
    ///
    /// Crumbs and one skill stamina are charged only when the skill
    /// completes successfully, possibly after target selection.
    pub fn activate_skill(
        &mut self,
        entity: EntityId,
        skill_index: usize,
    ) -> EngineResult<SkillStatus> {
        self.ensure_idle()?;
        let caster = self.board.get_entity(entity)?;
        if caster.side() != Some(self.turn) {
            return Err(EngineError::InvalidTarget(TargetIssue::NotSelectable));
        }
        let skill = caster
            .skill(skill_index)
            .ok_or(EngineError::InvalidArgument("skill index out of range"))?;
        let crumb_cost = skill.crumb_cost();
        if self.crumbs < crumb_cost {
            return Err(EngineError::not_enough(
                Resource::Crumbs,
                crumb_cost,
                self.crumbs,
            ));
        }
        if caster.rodent().is_some_and(|rodent| rodent.skill_stamina == 0) {
            return Err(EngineError::not_enough(Resource::SkillStamina, 1, 0));
        }

        let charge = SkillCharge {
            caster: SkillCaster {
                entity,
                skill_index,
            },
            crumb_cost,
            skill: skill.name().to_string(),
        };
        let resolver = skill.resolver;
        debug!(%entity, skill = %charge.skill, crumb_cost, "skill activated");
        let result = resolver(self, charge.caster)?;
        self.resolve_skill(charge, result)
    }

    /// Feeds the selected coordinates to the parked callback.
    ///
    /// Selections outside `1..=target_count`, with duplicates, or with
    /// coordinates not offered are rejected and the request stays parked.
    pub fn apply_skill_callback(&mut self, targets: &[OddRCoord]) -> EngineResult<SkillStatus> {
        self.ensure_running()?;
        let SkillState::SelectingTargets(pending) = &self.skill_state else {
            return Err(EngineError::InvalidStateTransition(
                StateIssue::NotSelectingTargets,
            ));
        };
        let targeting = &pending.targeting;
        let distinct: BTreeSet<_> = targets.iter().collect();
        if targets.is_empty()
            || targets.len() > targeting.target_count()
            || distinct.len() != targets.len()
        {
            return Err(EngineError::InvalidTarget(TargetIssue::TargetCount));
        }
        if targets
            .iter()
            .any(|coord| !targeting.available_targets().contains(coord))
        {
            return Err(EngineError::InvalidTarget(TargetIssue::NotSelectable));
        }

        let SkillState::SelectingTargets(PendingSkill { charge, targeting }) =
            mem::replace(&mut self.skill_state, SkillState::Idle)
        else {
            return Err(EngineError::InvalidStateTransition(
                StateIssue::NotSelectingTargets,
            ));
        };
        let result = (targeting.callback)(self, targets)?;
        self.resolve_skill(charge, result)
    }

    /// Abandons a parked request. Nothing is charged.
    pub fn cancel_skill_targeting(&mut self) -> EngineResult<()> {
        match &self.skill_state {
            SkillState::Idle => {
                return Err(EngineError::InvalidStateTransition(
                    StateIssue::NotSelectingTargets,
                ));
            }
            SkillState::SelectingTargets(pending) if !pending.targeting.is_cancelable() => {
                return Err(EngineError::InvalidStateTransition(StateIssue::NotCancelable));
            }
            SkillState::SelectingTargets(_) => {}
        }
        if let SkillState::SelectingTargets(pending) =
            mem::replace(&mut self.skill_state, SkillState::Idle)
        {
            self.finish_skill(pending.charge, SkillCompleted::Cancelled);
        }
        Ok(())
    }

    fn resolve_skill(
        &mut self,
        charge: SkillCharge,
        result: SkillResult,
    ) -> EngineResult<SkillStatus> {
        match result {
            SkillResult::Completed(SkillCompleted::Success) => {
                self.charge_skill(&charge);
                self.finish_skill(charge, SkillCompleted::Success);
                Ok(SkillStatus::Completed(SkillCompleted::Success))
            }
            SkillResult::Completed(SkillCompleted::Cancelled) => {
                self.finish_skill(charge, SkillCompleted::Cancelled);
                Ok(SkillStatus::Completed(SkillCompleted::Cancelled))
            }
            SkillResult::AwaitingTargets(targeting) if !targeting.is_answerable() => {
                self.finish_skill(charge, SkillCompleted::Cancelled);
                Ok(SkillStatus::Completed(SkillCompleted::Cancelled))
            }
            SkillResult::AwaitingTargets(targeting) => {
                let status = SkillStatus::AwaitingTargets {
                    target_count: targeting.target_count(),
                    available_targets: targeting.available_targets().to_vec(),
                    cancelable: targeting.is_cancelable(),
                };
                debug!(
                    entity = %charge.caster.entity,
                    skill = %charge.skill,
                    targets = targeting.available_targets().len(),
                    "skill awaiting targets"
                );
                self.skill_state = SkillState::SelectingTargets(PendingSkill { charge, targeting });
                Ok(status)
            }
        }
    }

    /// Crumbs always; stamina only if the caster survived its own skill.
    fn charge_skill(&mut self, charge: &SkillCharge) {
        self.crumbs = self.crumbs.saturating_sub(charge.crumb_cost);
        if let Some(rodent) = self
            .board
            .entity_mut(charge.caster.entity)
            .ok()
            .and_then(|entity| entity.rodent.as_mut())
        {
            rodent.skill_stamina = rodent.skill_stamina.saturating_sub(1);
        }
    }

    fn finish_skill(&mut self, charge: SkillCharge, outcome: SkillCompleted) {
        if outcome == SkillCompleted::Cancelled {
            warn!(entity = %charge.caster.entity, skill = %charge.skill, "skill cancelled");
        }
        self.emit(GameEvent::SkillActivated {
            entity: charge.caster.entity,
            skill_index: charge.caster.skill_index,
            skill: charge.skill,
            outcome,
        });
    }
}
