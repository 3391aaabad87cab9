//! Map features: lairs, deployment zones and crumb stacks.

use squeak_core::{
    EngineResult, EntityId, FeatureBehavior, FeatureId, FeatureKind, GameManager, OddRCoord, Side,
};
use tracing::debug;

/// A side's base. Losing every lair of a side ends the match.
#[derive(Clone, Copy, Debug, Default)]
pub struct Lair;

impl FeatureBehavior for Lair {
    fn name(&self) -> &'static str {
        "lair"
    }

    fn kind(&self) -> FeatureKind {
        FeatureKind::Lair
    }

    fn is_collision(&self) -> bool {
        true
    }
}

/// Tiles where a side may place its squeaks.
#[derive(Clone, Copy, Debug, Default)]
pub struct DeploymentZone;

impl FeatureBehavior for DeploymentZone {
    fn name(&self) -> &'static str {
        "deployment_zone"
    }

    fn kind(&self) -> FeatureKind {
        FeatureKind::DeploymentZone
    }

    fn is_collision(&self) -> bool {
        false
    }
}

/// Grants a crumb bonus to every side with at least one entity on it.
///
/// Holds no state of its own: occupancy is read off the board, so one
/// instance can back any number of matches.
#[derive(Clone, Copy, Debug, Default)]
pub struct CrumbsStack;

impl CrumbsStack {
    pub const BONUS_PERCENT: i32 = 10;

    /// Entities of `side` standing anywhere on `feature`.
    fn holders(game: &GameManager, feature: FeatureId, side: Side) -> EngineResult<usize> {
        let board = game.board();
        Ok(game
            .feature(feature)?
            .shape()
            .iter()
            .flat_map(|coord| board.entities_at(*coord))
            .filter(|entity| entity.side() == Some(side))
            .count())
    }
}

impl FeatureBehavior for CrumbsStack {
    fn name(&self) -> &'static str {
        "crumbs_stack"
    }

    fn is_collision(&self) -> bool {
        false
    }

    fn on_entity_enter(
        &self,
        game: &mut GameManager,
        feature: FeatureId,
        entity: EntityId,
        _coord: OddRCoord,
    ) -> EngineResult<()> {
        let Some(side) = game.entity(entity)?.side() else {
            return Ok(());
        };
        if Self::holders(game, feature, side)? == 1 {
            game.crumb_modifier_mut()
                .add_side_percent(side, Self::BONUS_PERCENT);
            debug!(%feature, %side, "crumbs stack claimed");
        }
        Ok(())
    }

    fn on_entity_exit(
        &self,
        game: &mut GameManager,
        feature: FeatureId,
        _entity: EntityId,
        side: Option<Side>,
        _coord: Option<OddRCoord>,
    ) -> EngineResult<()> {
        let Some(side) = side else {
            return Ok(());
        };
        if Self::holders(game, feature, side)? == 0 {
            game.crumb_modifier_mut()
                .add_side_percent(side, -Self::BONUS_PERCENT);
            debug!(%feature, %side, "crumbs stack abandoned");
        }
        Ok(())
    }
}
