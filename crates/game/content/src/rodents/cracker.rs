use std::sync::Arc;

use squeak_core::{
    EffectSpec, EngineResult, EntityBehavior, EntityId, EntityTemplate, GameManager, RodentClass,
    RodentStats, SkillCaster, SkillDescriptor, SkillRegistry, SkillResult, TurnChange,
};
use tracing::trace;

use crate::effects::AbandonedBread;
use crate::skills::{attack_of, damage_enemies, select_targets};

pub const NAME: &str = "Cracker";
pub const CRUMB_COST: u32 = 19;

/// Allies within this many tiles keep the cracker fed.
pub const BREAD_GOOD_RADIUS: u32 = 3;

/// Tank that shields with bread and may drop it for speed.
pub fn template(registry: &SkillRegistry) -> EngineResult<EntityTemplate> {
    EntityTemplate::builder(NAME)
        .description(
            "Reliable rodent using cracker as its shield. It'll defend its friends at any cost.",
        )
        .health(9)
        .defense(5)
        .height(2)
        .rodent(RodentStats::new(RodentClass::Tank, 3, 3, 2, 2, 3))
        .skill(
            SkillDescriptor::new("Bread Slap", 3)
                .with_reach(1)
                .with_altitude(0),
            "bread_slap",
        )
        .skill(SkillDescriptor::new("Abandon Bread", 1), "abandon_bread")
        .behavior(Arc::new(BreadGood))
        .build(registry)
}

/// ATK damage to an adjacent enemy.
pub fn bread_slap(game: &mut GameManager, caster: SkillCaster) -> EngineResult<SkillResult> {
    let damage = attack_of(game, caster)?;
    select_targets(game, caster, damage_enemies(caster, damage))
}

/// Drops the bread for the rest of the deployment. Cancelled if already
/// dropped.
pub fn abandon_bread(game: &mut GameManager, caster: SkillCaster) -> EngineResult<SkillResult> {
    let entity = game.entity(caster.entity)?;
    if entity.has_effect(AbandonedBread::NAME) {
        return Ok(SkillResult::CANCELLED);
    }
    let spec = EffectSpec::permanent(Arc::new(AbandonedBread)).with_intensity(entity.defense());
    game.apply_effect(caster.entity, spec)?;
    Ok(SkillResult::SUCCESS)
}

/// Passive: heals 1 at the start of its side's turn when an ally is near.
#[derive(Clone, Copy, Debug, Default)]
pub struct BreadGood;

impl EntityBehavior for BreadGood {
    fn on_turn_change(
        &self,
        game: &mut GameManager,
        entity: EntityId,
        change: TurnChange,
    ) -> EngineResult<()> {
        let cracker = game.entity(entity)?;
        let Some(side) = cracker.side() else {
            return Ok(());
        };
        if change.to != side {
            return Ok(());
        }
        let pos = cracker.pos();
        let fed = game
            .board()
            .entities_of(Some(side))
            .any(|ally| ally.id() != entity && ally.pos().distance(pos) <= BREAD_GOOD_RADIUS);
        if fed {
            let healed = game.heal_entity(entity, 1)?;
            trace!(%entity, healed, "bread good");
        }
        Ok(())
    }
}
