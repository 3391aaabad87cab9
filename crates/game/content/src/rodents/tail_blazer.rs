use squeak_core::{
    EngineResult, EntityTemplate, GameManager, RodentClass, RodentStats, SkillCaster,
    SkillDescriptor, SkillRegistry, SkillResult,
};

use crate::skills::{attack_of, damage_enemies, select_targets};

pub const NAME: &str = "TailBlazer";
pub const CRUMB_COST: u32 = 7;

/// Fast vanguard with a short stab and a long throw.
pub fn template(registry: &SkillRegistry) -> EngineResult<EntityTemplate> {
    EntityTemplate::builder(NAME)
        .description("The rodent that will never deny a call for adventures.")
        .health(8)
        .defense(2)
        .rodent(RodentStats::new(RodentClass::Vanguard, 8, 3, 3, 2, 3))
        .skill(
            SkillDescriptor::new("Stab", 3).with_reach(2).with_altitude(0),
            "stab",
        )
        .skill(
            SkillDescriptor::new("Spear Launching", 7)
                .with_reach(5)
                .with_altitude(0),
            "spear_launching",
        )
        .build(registry)
}

/// ATK + 1 damage to one enemy within 2 tiles.
pub fn stab(game: &mut GameManager, caster: SkillCaster) -> EngineResult<SkillResult> {
    let damage = attack_of(game, caster)? + 1;
    select_targets(game, caster, damage_enemies(caster, damage))
}

/// ATK damage to one enemy within 5 tiles.
pub fn spear_launching(game: &mut GameManager, caster: SkillCaster) -> EngineResult<SkillResult> {
    let damage = attack_of(game, caster)?;
    select_targets(game, caster, damage_enemies(caster, damage))
}
