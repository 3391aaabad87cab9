//! Building blocks shared by rodent skill resolvers.
//!
//! Resolvers are plain `fn` pointers; the closures built here become the
//! target-selection callbacks they hand back to the engine. Skill tags
//! decide who may be picked, whether features count, and whether the
//! caster survives.

use std::collections::BTreeSet;

use squeak_core::{
    Damage, EffectSpec, EngineError, EngineResult, EntityId, EntitySkill, FeatureId, GameManager,
    OddRCoord, SkillCaster, SkillResult, SkillTags, SkillTargeting, TargetMode,
};
use tracing::debug;

fn skill_of(game: &GameManager, caster: SkillCaster) -> EngineResult<&EntitySkill> {
    game.entity(caster.entity)?
        .skill(caster.skill_index)
        .ok_or(EngineError::InvalidArgument("skill index out of range"))
}

pub fn tags_of(game: &GameManager, caster: SkillCaster) -> EngineResult<SkillTags> {
    Ok(skill_of(game, caster)?.tags())
}

/// Offers one target within the skill's reach and line of sight.
///
/// [`SkillTags::SUPPORT`] skills pick damageable allies, the rest damageable
/// enemies. Features are offered unless the skill is tagged
/// [`SkillTags::NO_TARGET_FEATURE`].
pub fn select_targets<F>(
    game: &GameManager,
    caster: SkillCaster,
    action: F,
) -> EngineResult<SkillResult>
where
    F: FnOnce(&mut GameManager, &[OddRCoord]) -> EngineResult<SkillResult> + Send + 'static,
{
    let tags = tags_of(game, caster)?;
    let mode = if tags.contains(SkillTags::SUPPORT) {
        TargetMode::AllyWithHp
    } else {
        TargetMode::EnemyWithHp
    };
    let features = !tags.contains(SkillTags::NO_TARGET_FEATURE);
    select_targets_as(game, caster, mode, features, action)
}

/// Like [`select_targets`] with explicit filters instead of tags.
pub fn select_targets_as<F>(
    game: &GameManager,
    caster: SkillCaster,
    mode: TargetMode,
    features_targetable: bool,
    action: F,
) -> EngineResult<SkillResult>
where
    F: FnOnce(&mut GameManager, &[OddRCoord]) -> EngineResult<SkillResult> + Send + 'static,
{
    let skill = skill_of(game, caster)?;
    let coords = game
        .board()
        .get_attackable_coords(caster.entity, &skill.descriptor)?;
    let side = game.entity(caster.entity)?.side();
    let targets = game
        .board()
        .filter_targets(coords, side, mode, features_targetable);
    Ok(SkillResult::AwaitingTargets(SkillTargeting::new(
        1, targets, action,
    )))
}

/// Caster's current attack, effects included, floored at zero.
pub fn attack_of(game: &GameManager, caster: SkillCaster) -> EngineResult<u32> {
    let attack = game.entity(caster.entity)?.attack();
    Ok(u32::try_from(attack).unwrap_or(0))
}

/// Damages the topmost enemy on `coord`, or the enemy feature beneath when
/// no enemy entity stands there and `features` allows it.
fn strike_tile(
    game: &mut GameManager,
    source: EntityId,
    coord: OddRCoord,
    amount: u32,
    features: bool,
) -> EngineResult<()> {
    if let Some(enemy) = game.get_enemy_on_pos(coord)? {
        game.damage_entity_by(enemy, Damage::Amount(amount), source)?;
    } else if let Some(feature) = game.get_feature_on_pos(coord)?.filter(|_| features) {
        game.damage_feature(feature, Damage::Amount(amount))?;
    }
    Ok(())
}

/// Damages the enemy on each selected tile, attributed to the caster.
pub fn damage_enemies(
    caster: SkillCaster,
    amount: u32,
) -> impl FnOnce(&mut GameManager, &[OddRCoord]) -> EngineResult<SkillResult> + Send + 'static {
    move |game: &mut GameManager, targets: &[OddRCoord]| -> EngineResult<SkillResult> {
        let features = !tags_of(game, caster)?.contains(SkillTags::NO_TARGET_FEATURE);
        for coord in targets {
            strike_tile(game, caster.entity, *coord, amount, features)?;
        }
        Ok(SkillResult::SUCCESS)
    }
}

/// Damages every enemy within `radius` of `center`, each at most once.
///
/// The blast floods outward from `center` and stops at holes and at tiles
/// whose total height rises more than `radius` above the center's terrain.
/// A tile without an enemy entity has its enemy feature hit instead, unless
/// the skill is tagged [`SkillTags::NO_TARGET_FEATURE`]. Returns how many
/// occupants were hit.
pub fn aoe_damage(
    game: &mut GameManager,
    caster: SkillCaster,
    center: OddRCoord,
    radius: u32,
    amount: u32,
) -> EngineResult<usize> {
    let features = !tags_of(game, caster)?.contains(SkillTags::NO_TARGET_FEATURE);
    let side = game.entity(caster.entity)?.side();
    let ceiling = i64::from(game.board().tile(center)?.height()) + i64::from(radius);
    let blast = center.get_reachable_coords(
        i32::try_from(radius).unwrap_or(i32::MAX),
        |candidate, _| {
            game.board()
                .total_height(candidate, side)
                .is_none_or(|height| i64::from(height) > ceiling)
        },
        true,
    );

    let mut struck: BTreeSet<EntityId> = BTreeSet::new();
    let mut razed: BTreeSet<FeatureId> = BTreeSet::new();
    for coord in blast {
        if let Some(enemy) = game.get_enemy_on_pos(coord)? {
            if struck.insert(enemy) {
                game.damage_entity_by(enemy, Damage::Amount(amount), caster.entity)?;
            }
            continue;
        }
        if !features {
            continue;
        }
        if let Some(feature) = game.get_feature_on_pos(coord)? {
            if razed.insert(feature) {
                game.damage_feature(feature, Damage::Amount(amount))?;
            }
        }
    }
    let hits = struck.len() + razed.len();
    debug!(entity = %caster.entity, %center, radius, amount, hits, "area damage");
    Ok(hits)
}

/// Defeats the caster if its skill is tagged [`SkillTags::SELF_DEFEATED`].
pub fn defeat_caster(game: &mut GameManager, caster: SkillCaster) -> EngineResult<bool> {
    if !tags_of(game, caster)?.contains(SkillTags::SELF_DEFEATED) {
        return Ok(false);
    }
    let report = game.damage_entity(caster.entity, Damage::InstantKill)?;
    Ok(report.died)
}

/// Heals the topmost ally on each selected tile.
pub fn heal_allies(
    amount: u32,
) -> impl FnOnce(&mut GameManager, &[OddRCoord]) -> EngineResult<SkillResult> + Send + 'static {
    move |game: &mut GameManager, targets: &[OddRCoord]| -> EngineResult<SkillResult> {
        for coord in targets {
            if let Some(ally) = game.get_ally_on_pos(*coord)? {
                game.heal_entity(ally, amount)?;
            }
        }
        Ok(SkillResult::SUCCESS)
    }
}

/// Applies `spec` to the topmost ally on each selected tile.
pub fn buff_allies(
    spec: EffectSpec,
) -> impl FnOnce(&mut GameManager, &[OddRCoord]) -> EngineResult<SkillResult> + Send + 'static {
    move |game: &mut GameManager, targets: &[OddRCoord]| -> EngineResult<SkillResult> {
        for coord in targets {
            if let Some(ally) = game.get_ally_on_pos(*coord)? {
                game.apply_effect(ally, spec.clone())?;
            }
        }
        Ok(SkillResult::SUCCESS)
    }
}
