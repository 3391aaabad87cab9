use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use super::GameManager;
use crate::entity::{EntityId, EntityTemplate};
use crate::error::{EngineError, EngineResult, Resource, TargetIssue};
use crate::event::GameEvent;
use crate::hex::OddRCoord;
use crate::side::Side;
use crate::squeak::Squeak;

impl GameManager {
    /// Plays the squeak in `hand_index` of the acting side's hand at `coord`,
    /// then refills the slot from the deck.
    pub fn place_unit(&mut self, hand_index: usize, coord: OddRCoord) -> EngineResult<()> {
        self.ensure_idle()?;
        let side = self.turn;
        let squeak = self.hand_squeak(side, hand_index)?;
        let cost = squeak.crumb_cost();
        if self.crumbs < cost {
            return Err(EngineError::not_enough(Resource::Crumbs, cost, self.crumbs));
        }
        self.board.tile(coord)?;
        if squeak.is_deployment_zone_only() && !self.in_deployment_zone(side, coord) {
            return Err(EngineError::InvalidTarget(TargetIssue::NotPlacable));
        }
        if !squeak.place(self, coord)? {
            return Err(EngineError::InvalidTarget(TargetIssue::NotPlacable));
        }

        self.crumbs = self.crumbs.saturating_sub(cost);
        let drawn = self.draw_squeak(side);
        if let Some(slot) = self.hands[side].get_mut(hand_index) {
            *slot = drawn;
        }
        debug!(%side, hand_index, name = squeak.name(), %coord, cost, "squeak placed");
        self.emit(GameEvent::SqueakPlaced {
            side,
            hand_index,
            name: squeak.name().to_string(),
            coord,
        });
        Ok(())
    }

    /// Candidate coordinates for the squeak in `hand_index`: the acting
    /// side's deployment-zone tiles, or every tile for unrestricted squeaks,
    /// minus colliding tiles. The squeak itself may still refuse a spot.
    pub fn placable_coords(&self, hand_index: usize) -> EngineResult<Vec<OddRCoord>> {
        let side = self.turn;
        let squeak = self.hand_squeak(side, hand_index)?;
        let candidates: BTreeSet<OddRCoord> = if squeak.is_deployment_zone_only() {
            self.board
                .deployment_zones(Some(side))
                .flat_map(|zone| zone.shape().iter().copied())
                .collect()
        } else {
            self.board.tiles().map(|tile| tile.coord()).collect()
        };
        Ok(candidates
            .into_iter()
            .filter(|coord| !self.board.is_collision(*coord))
            .collect())
    }

    /// Adds a new entity to the board, runs feature enter hooks and then the
    /// entity's `on_summon`.
    pub fn spawn_entity(
        &mut self,
        template: &EntityTemplate,
        pos: OddRCoord,
        side: Option<Side>,
    ) -> EngineResult<EntityId> {
        self.ensure_not_selecting()?;
        let id = self.board.add_entity(template, pos, side)?;
        self.feature_hooks(id, side, None, Some(pos))?;
        let behavior = self.board.get_entity(id)?.behavior().clone();
        behavior.on_summon(self, id)?;
        Ok(id)
    }

    fn hand_squeak(&self, side: Side, hand_index: usize) -> EngineResult<Arc<dyn Squeak>> {
        self.hands[side]
            .get(hand_index)
            .ok_or(EngineError::InvalidArgument("hand index out of range"))?
            .clone()
            .ok_or(EngineError::InvalidArgument("hand slot is empty"))
    }

    fn in_deployment_zone(&self, side: Side, coord: OddRCoord) -> bool {
        self.board
            .deployment_zones(Some(side))
            .any(|zone| zone.covers(coord))
    }
}
