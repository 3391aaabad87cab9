use std::collections::BTreeSet;

use tracing::{debug, trace};

use super::GameManager;
use crate::entity::EntityId;
use crate::error::{EngineError, EngineResult, Resource, TargetIssue};
use crate::feature::FeatureId;
use crate::hex::OddRCoord;
use crate::side::Side;

impl GameManager {
    /// Walks a rodent of the acting side to `target`, paying its move cost
    /// and one move stamina. Returns the path taken, start included.
    pub fn move_unit(
        &mut self,
        entity: EntityId,
        target: OddRCoord,
    ) -> EngineResult<Vec<OddRCoord>> {
        self.ensure_idle()?;
        let mover = self.board.get_entity(entity)?;
        let rodent = match mover.rodent() {
            Some(rodent) if mover.movable() && mover.side() == Some(self.turn) => rodent,
            _ => return Err(EngineError::InvalidTarget(TargetIssue::NotMovable)),
        };
        if self.crumbs < rodent.move_cost {
            return Err(EngineError::not_enough(
                Resource::Crumbs,
                rodent.move_cost,
                self.crumbs,
            ));
        }
        if rodent.move_stamina == 0 {
            return Err(EngineError::not_enough(Resource::MoveStamina, 1, 0));
        }
        self.board.tile(target)?;

        let from = mover.pos();
        let side = mover.side();
        let move_cost = rodent.move_cost;
        let speed = u32::try_from(mover.speed()).unwrap_or(0);
        if target == from {
            return Err(EngineError::InvalidTarget(TargetIssue::Occupied));
        }
        if from.distance(target) > speed {
            return Err(EngineError::InvalidTarget(TargetIssue::BeyondSpeed));
        }
        let path = self
            .board
            .path_find(entity, target)?
            .ok_or(EngineError::InvalidTarget(TargetIssue::Unreachable))?;
        if path.len().saturating_sub(1) > speed as usize {
            return Err(EngineError::InvalidTarget(TargetIssue::BeyondSpeed));
        }
        if !self.board.try_move(entity, &path)? {
            return Err(EngineError::InvalidTarget(TargetIssue::Occupied));
        }

        self.crumbs = self.crumbs.saturating_sub(move_cost);
        if let Some(rodent) = self.board.entity_mut(entity)?.rodent.as_mut() {
            rodent.move_stamina = rodent.move_stamina.saturating_sub(1);
        }
        debug!(%entity, %from, to = %target, steps = path.len() - 1, "unit moved");
        self.feature_hooks(entity, side, Some(from), Some(target))?;
        Ok(path)
    }

    /// Walks an entity to `target` ignoring speed, crumbs, stamina and turn
    /// ownership. Height steps are limited by `jump_height`, or by the
    /// board's jump height when `None`. Returns the path taken.
    pub fn move_entity_unchecked(
        &mut self,
        entity: EntityId,
        target: OddRCoord,
        jump_height: Option<u32>,
    ) -> EngineResult<Vec<OddRCoord>> {
        self.ensure_not_selecting()?;
        let mover = self.board.get_entity(entity)?;
        let (from, side) = (mover.pos(), mover.side());
        self.board.tile(target)?;
        if from == target {
            return Ok(vec![from]);
        }
        let jump_height = jump_height.unwrap_or(self.board.jump_height());
        let path = self
            .board
            .path_find_with_jump(entity, target, jump_height)?
            .ok_or(EngineError::InvalidTarget(TargetIssue::Unreachable))?;
        if !self.board.try_move(entity, &path)? {
            return Err(EngineError::InvalidTarget(TargetIssue::Occupied));
        }
        trace!(%entity, %from, to = %target, jump_height, "entity relocated");
        self.feature_hooks(entity, side, Some(from), Some(target))?;
        Ok(path)
    }

    /// Fires exit hooks for features covering `from` but not `to`, then enter
    /// hooks for features covering `to` but not `from`.
    pub(crate) fn feature_hooks(
        &mut self,
        entity: EntityId,
        side: Option<Side>,
        from: Option<OddRCoord>,
        to: Option<OddRCoord>,
    ) -> EngineResult<()> {
        let covering = |coord: Option<OddRCoord>| -> BTreeSet<FeatureId> {
            coord
                .and_then(|coord| self.board.get_tile(coord))
                .map(|tile| tile.features().iter().copied().collect())
                .unwrap_or_default()
        };
        let before = covering(from);
        let after = covering(to);

        for feature in before.difference(&after).copied() {
            let Some(behavior) = self.board.feature(feature).map(|f| f.behavior().clone()) else {
                continue;
            };
            trace!(%entity, %feature, "feature exit");
            behavior.on_entity_exit(self, feature, entity, side, to)?;
        }
        let Some(to) = to else {
            return Ok(());
        };
        for feature in after.difference(&before).copied() {
            let Some(behavior) = self.board.feature(feature).map(|f| f.behavior().clone()) else {
                continue;
            };
            trace!(%entity, %feature, "feature enter");
            behavior.on_entity_enter(self, feature, entity, to)?;
        }
        Ok(())
    }
}
