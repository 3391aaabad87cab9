use std::sync::Arc;

use squeak_core::{
    EffectSpec, EngineResult, EntityId, EntityTemplate, GameManager, OddRCoord, RodentClass,
    RodentStats, SkillCaster, SkillDescriptor, SkillRegistry, SkillResult, SkillTags, TargetMode,
};
use tracing::debug;

use crate::effects::{MoraleBoost, QuartermasterSoul};
use crate::skills::{
    aoe_damage, attack_of, buff_allies, defeat_caster, heal_allies, select_targets,
    select_targets_as,
};

pub const NAME: &str = "Quartermaster";
pub const CRUMB_COST: u32 = 19;

/// Blast radius around the soul bearer.
pub const MY_SOUL_RADIUS: u32 = 2;

/// Slow support that feeds and cheers adjacent allies, and can give its
/// life to one of them.
pub fn template(registry: &SkillRegistry) -> EngineResult<EntityTemplate> {
    EntityTemplate::builder(NAME)
        .description(
            "Army marches on its stomach. It'll keep distributing supplies until its last breath.",
        )
        .health(5)
        .rodent(RodentStats::new(RodentClass::Support, 1, 10, 20, 2, 1))
        .skill(
            SkillDescriptor::new("My Body", 3)
                .with_reach(1)
                .with_altitude(10)
                .with_tags(SkillTags::SUPPORT | SkillTags::NO_TARGET_FEATURE),
            "my_body",
        )
        .skill(
            SkillDescriptor::new("My Heart", 10)
                .with_reach(1)
                .with_altitude(1)
                .with_tags(SkillTags::SUPPORT | SkillTags::NO_TARGET_FEATURE),
            "my_heart",
        )
        .skill(
            SkillDescriptor::new("My Soul", 12)
                .with_reach(3)
                .with_altitude(10)
                .with_tags(SkillTags::SELF_DEFEATED),
            "my_soul",
        )
        .build(registry)
}

/// Morale Boost (+1 attack, 2 rounds) on an ally.
pub fn my_body(game: &mut GameManager, caster: SkillCaster) -> EngineResult<SkillResult> {
    let boost = EffectSpec::new(Arc::new(MoraleBoost), 2).with_intensity(1);
    select_targets(game, caster, buff_allies(boost))
}

/// Heals an ally by ATK.
pub fn my_heart(game: &mut GameManager, caster: SkillCaster) -> EngineResult<SkillResult> {
    let amount = attack_of(game, caster)?;
    select_targets(game, caster, heal_allies(amount))
}

/// Ally currently carrying this Quartermaster's soul.
pub fn soul_bearer(game: &GameManager, quartermaster: EntityId) -> Option<EntityId> {
    game.effects()
        .iter()
        .filter(|effect| effect.name() == QuartermasterSoul::NAME)
        .filter(|effect| effect.source() == Some(quartermaster))
        .find(|effect| game.is_effect_active(effect.id()))
        .map(|effect| effect.entity())
}

/// First use binds the soul to an ally. Once bound, the next use blasts
/// every enemy within [`MY_SOUL_RADIUS`] of the bearer for ATK, then the
/// Quartermaster falls.
pub fn my_soul(game: &mut GameManager, caster: SkillCaster) -> EngineResult<SkillResult> {
    if let Some(bearer) = soul_bearer(game, caster.entity) {
        let center = game.entity(bearer)?.pos();
        let amount = attack_of(game, caster)?;
        let hits = aoe_damage(game, caster, center, MY_SOUL_RADIUS, amount)?;
        let fallen = defeat_caster(game, caster)?;
        debug!(entity = %caster.entity, %bearer, hits, fallen, "soul released");
        return Ok(SkillResult::SUCCESS);
    }

    let quartermaster = caster.entity;
    select_targets_as(
        game,
        caster,
        TargetMode::Ally,
        false,
        move |game: &mut GameManager, targets: &[OddRCoord]| -> EngineResult<SkillResult> {
            let bearer = targets
                .iter()
                .map(|coord| game.get_ally_on_pos(*coord))
                .find_map(Result::transpose)
                .transpose()?;
            let Some(bearer) = bearer else {
                return Ok(SkillResult::CANCELLED);
            };
            let soul = EffectSpec::permanent(Arc::new(QuartermasterSoul)).with_source(quartermaster);
            game.apply_effect(bearer, soul)?;
            debug!(%quartermaster, %bearer, "soul entrusted");
            Ok(SkillResult::SUCCESS)
        },
    )
}
