use std::sync::Arc;

use squeak_core::{
    EffectSpec, EngineResult, EntityTemplate, GameManager, OddRCoord, RodentClass,
    RodentStats, SkillCaster, SkillDescriptor, SkillRegistry, SkillResult,
};

use crate::effects::{BrewbellyVomit, Stunned};
use crate::skills::{attack_of, damage_enemies, select_targets};

pub const NAME: &str = "Ratbert Brewbelly";
pub const CRUMB_COST: u32 = 19;

/// Rounds both the stun and the delayed bile last.
pub const VOMIT_ROUNDS: u32 = 2;

/// Unsteady duelist whose bile stuns and keeps burning.
pub fn template(registry: &SkillRegistry) -> EngineResult<EntityTemplate> {
    EntityTemplate::builder(NAME)
        .description(
            "A bloated, beer-stained brown rat who waddles unsteadily through combat.",
        )
        .health(7)
        .defense(1)
        .rodent(RodentStats::new(RodentClass::Duelist, 3, 3, 8, 2, 1))
        .skill(
            SkillDescriptor::new("Projectile Vomit", 10)
                .with_reach(6)
                .with_altitude(0),
            "projectile_vomit",
        )
        .build(registry)
}

/// ATK + 3 damage now, a stun, and ATK / 2 more when the bile wears off.
/// Repeated bile stacks into one burst.
pub fn projectile_vomit(game: &mut GameManager, caster: SkillCaster) -> EngineResult<SkillResult> {
    let attack = attack_of(game, caster)?;
    let hit = damage_enemies(caster, attack + 3);
    let bile = i32::try_from(attack / 2).unwrap_or(i32::MAX);
    select_targets(
        game,
        caster,
        move |game: &mut GameManager, targets: &[OddRCoord]| -> EngineResult<SkillResult> {
            let victims = targets
                .iter()
                .map(|coord| game.get_enemy_on_pos(*coord))
                .collect::<EngineResult<Vec<_>>>()?;
            hit(game, targets)?;
            for victim in victims.into_iter().flatten() {
                if game.board().entity(victim).is_none() {
                    continue;
                }
                game.apply_effect(
                    victim,
                    EffectSpec::new(Arc::new(Stunned), VOMIT_ROUNDS).with_source(caster.entity),
                )?;
                game.apply_effect_stacked(
                    victim,
                    EffectSpec::new(Arc::new(BrewbellyVomit), VOMIT_ROUNDS)
                        .with_intensity(bile)
                        .with_source(caster.entity),
                )?;
            }
            Ok(SkillResult::SUCCESS)
        },
    )
}
