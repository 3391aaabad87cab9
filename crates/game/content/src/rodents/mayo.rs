use std::sync::Arc;

use squeak_core::{
    EngineError, EngineResult, EntityBehavior, EntityId, EntityTemplate, GameManager, OddRCoord,
    RodentClass, RodentStats, SkillCaster, SkillDescriptor, SkillRegistry, SkillResult,
    SkillTargeting,
};
use tracing::debug;

pub const NAME: &str = "Mayo";
pub const CRUMB_COST: u32 = 7;

/// Rocket Boost clears steps up to this tall.
pub const ROCKET_BOOST_HEIGHT_LIMIT: u32 = 5;

/// Mobile specialist propelled by its squeeze bottle.
pub fn template(registry: &SkillRegistry) -> EngineResult<EntityTemplate> {
    EntityTemplate::builder(NAME)
        .description(
            "With its mighty squeeze bottle, sky's the limit. Unrivaled mobility, sub-optimal attack.",
        )
        .health(10)
        .defense(2)
        .rodent(RodentStats::new(RodentClass::Specialist, 10, 0, 2, 4, 2))
        .skill(
            SkillDescriptor::new("Rocket Boost", 2)
                .with_reach(1)
                .with_altitude(ROCKET_BOOST_HEIGHT_LIMIT),
            "rocket_boost",
        )
        .behavior(Arc::new(EscapeManeuver))
        .build(registry)
}

/// Hops to an adjacent open tile, climbing up to
/// [`ROCKET_BOOST_HEIGHT_LIMIT`]. Cancelled if the hop turns out blocked.
pub fn rocket_boost(game: &mut GameManager, caster: SkillCaster) -> EngineResult<SkillResult> {
    let pos = game.entity(caster.entity)?.pos();
    let board = game.board();
    let targets: Vec<OddRCoord> = pos
        .neighbors()
        .into_iter()
        .filter(|neighbor| board.get_tile(*neighbor).is_some() && !board.is_collision(*neighbor))
        .collect();
    let entity = caster.entity;
    Ok(SkillResult::AwaitingTargets(SkillTargeting::new(
        1,
        targets,
        move |game: &mut GameManager, targets: &[OddRCoord]| -> EngineResult<SkillResult> {
            let [target] = targets else {
                return Err(EngineError::InvalidArgument("rocket boost takes one tile"));
            };
            match game.move_entity_unchecked(entity, *target, Some(ROCKET_BOOST_HEIGHT_LIMIT)) {
                Ok(_) => Ok(SkillResult::SUCCESS),
                Err(EngineError::InvalidTarget(issue)) => {
                    debug!(%entity, %target, ?issue, "rocket boost blocked");
                    Ok(SkillResult::CANCELLED)
                }
                Err(err) => Err(err),
            }
        },
    )))
}

/// Passive: may dodge hits from attackers far away.
#[derive(Clone, Copy, Debug, Default)]
pub struct EscapeManeuver;

impl EscapeManeuver {
    pub const DODGE_PERCENT: u32 = 20;
    pub const MIN_DISTANCE: u32 = 5;
}

impl EntityBehavior for EscapeManeuver {
    fn on_damage_taken(
        &self,
        game: &mut GameManager,
        entity: EntityId,
        _damage: u32,
        source: Option<EntityId>,
    ) -> EngineResult<Option<u32>> {
        let Some(attacker) = source.and_then(|source| game.board().entity(source)) else {
            return Ok(None);
        };
        let distance = attacker.pos().distance(game.entity(entity)?.pos());
        if distance < Self::MIN_DISTANCE {
            return Ok(None);
        }
        if game.dice().chance(Self::DODGE_PERCENT) {
            debug!(%entity, distance, "attack dodged");
            return Ok(Some(0));
        }
        Ok(None)
    }
}
