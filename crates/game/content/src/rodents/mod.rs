//! Built-in rodent templates and their skill resolvers.

pub mod cracker;
pub mod mayo;
pub mod quartermaster;
pub mod ratbert_brewbelly;
pub mod tail_blazer;

use squeak_core::{EngineResult, EntityTemplate, SkillRegistry};

/// Registers every built-in resolver under the name rodent templates use.
pub fn register_skills(registry: &mut SkillRegistry) -> EngineResult<()> {
    registry.register_targeted("stab", tail_blazer::stab)?;
    registry.register_targeted("spear_launching", tail_blazer::spear_launching)?;
    registry.register_targeted("bread_slap", cracker::bread_slap)?;
    registry.register_instant("abandon_bread", cracker::abandon_bread)?;
    registry.register_targeted("my_body", quartermaster::my_body)?;
    registry.register_targeted("my_heart", quartermaster::my_heart)?;
    registry.register_targeted("my_soul", quartermaster::my_soul)?;
    registry.register_targeted("rocket_boost", mayo::rocket_boost)?;
    registry.register_targeted("projectile_vomit", ratbert_brewbelly::projectile_vomit)?;
    Ok(())
}

/// Every built-in rodent, bound against `registry`.
pub fn templates(registry: &SkillRegistry) -> EngineResult<Vec<EntityTemplate>> {
    Ok(vec![
        tail_blazer::template(registry)?,
        cracker::template(registry)?,
        quartermaster::template(registry)?,
        mayo::template(registry)?,
        ratbert_brewbelly::template(registry)?,
    ])
}
