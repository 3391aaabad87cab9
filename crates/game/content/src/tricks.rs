//! Trick entities summoned by trick squeaks.

use std::sync::Arc;

use squeak_core::{
    ClearSide, Damage, EngineResult, EntityBehavior, EntityId, EntityTemplate, Feature,
    FeatureId, GameManager, SkillRegistry, TimerBehavior, TimerContext,
};
use tracing::info;

pub const SUNDIAL: &str = "Sundial";
pub const SUNDIAL_CRUMB_COST: u32 = 30;

/// Enemy turns a sundial must survive before it goes off.
pub const SUNDIAL_FUSE: u32 = 5;

pub fn sundial(registry: &SkillRegistry) -> EngineResult<EntityTemplate> {
    EntityTemplate::builder(SUNDIAL)
        .description(
            "The ultimate last resort. If not destroyed within 5 enemy turns, it explodes, \
             setting every lair of its side to 1 health and killing every entity on the field.",
        )
        .health(5)
        .collision(true)
        .behavior(Arc::new(SundialBehavior))
        .build(registry)
}

/// Arms the explosion timer when summoned.
#[derive(Clone, Copy, Debug, Default)]
pub struct SundialBehavior;

impl EntityBehavior for SundialBehavior {
    fn on_summon(&self, game: &mut GameManager, entity: EntityId) -> EngineResult<()> {
        game.apply_timer(entity, ClearSide::Enemy, SUNDIAL_FUSE, Arc::new(Explosion))?;
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Explosion;

impl TimerBehavior for Explosion {
    fn name(&self) -> &'static str {
        "sundial_explosion"
    }

    fn on_timer_over(&self, game: &mut GameManager, timer: TimerContext) -> EngineResult<()> {
        if let Some(side) = game.entity(timer.entity)?.side() {
            let lairs: Vec<FeatureId> = game
                .board()
                .lairs(side)
                .filter(|lair| lair.is_damageable())
                .map(Feature::id)
                .collect();
            for lair in lairs {
                game.set_feature_health(lair, 1)?;
            }
        }

        let doomed: Vec<EntityId> = game
            .board()
            .entities()
            .filter(|entity| entity.is_damageable())
            .map(|entity| entity.id())
            .collect();
        info!(sundial = %timer.entity, casualties = doomed.len(), "sundial exploded");
        for entity in doomed {
            if game.entity(entity).is_ok() {
                game.damage_entity(entity, Damage::InstantKill)?;
            }
        }
        Ok(())
    }
}

/// Placement guard for sundial squeaks: refused once every lair of the
/// acting side is already down to 1 health.
pub fn sundial_ready(game: &GameManager) -> bool {
    game.board()
        .lairs(game.turn())
        .any(|lair| lair.health() != Some(1))
}
