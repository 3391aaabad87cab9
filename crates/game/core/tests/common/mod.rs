//! Shared fixtures for squeak-core integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use squeak_core::{
    ClearSide, Damage, Deck, Dice, EffectBehavior, EffectContext, EngineResult, EntityId,
    EntityTemplate, FeatureBehavior, FeatureId, FeatureKind, GameManager, Map, MapFeature,
    OddRCoord, RodentClass, RodentStats, Side, SkillCaster, SkillDescriptor, SkillRegistry,
    SkillResult, SkillTargeting, Squeak, SqueakKind, TargetMode, TimerBehavior, TimerContext,
};

pub fn at(x: i32, y: i32) -> OddRCoord {
    OddRCoord::new(x, y)
}

// ----------------------------------------------------------------------
// Features
// ----------------------------------------------------------------------

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

pub struct Zone;

impl FeatureBehavior for Zone {
    fn name(&self) -> &'static str {
        "zone"
    }

    fn kind(&self) -> FeatureKind {
        FeatureKind::DeploymentZone
    }

    fn is_collision(&self) -> bool {
        false
    }
}

/// Counts enter/exit hook calls.
#[derive(Default)]
pub struct Tripwire {
    pub enters: AtomicU32,
    pub exits: AtomicU32,
}

impl Tripwire {
    pub fn enters(&self) -> u32 {
        self.enters.load(Ordering::SeqCst)
    }

    pub fn exits(&self) -> u32 {
        self.exits.load(Ordering::SeqCst)
    }
}

impl FeatureBehavior for Tripwire {
    fn name(&self) -> &'static str {
        "tripwire"
    }

    fn is_collision(&self) -> bool {
        false
    }

    fn on_entity_enter(
        &self,
        _game: &mut GameManager,
        _feature: FeatureId,
        _entity: EntityId,
        _coord: OddRCoord,
    ) -> EngineResult<()> {
        self.enters.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn on_entity_exit(
        &self,
        _game: &mut GameManager,
        _feature: FeatureId,
        _entity: EntityId,
        _side: Option<Side>,
        _coord: Option<OddRCoord>,
    ) -> EngineResult<()> {
        self.exits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ----------------------------------------------------------------------
// Effects and timers
// ----------------------------------------------------------------------

/// Lowers speed by its intensity while active.
pub struct Slow(pub ClearSide);

impl EffectBehavior for Slow {
    fn name(&self) -> &'static str {
        "slow"
    }

    fn clear_side(&self) -> ClearSide {
        self.0
    }

    fn on_applied(
        &self,
        game: &mut GameManager,
        effect: EffectContext,
        _overriding: bool,
    ) -> EngineResult<()> {
        game.adjust_stats(effect.entity)?.add_speed(-effect.intensity);
        Ok(())
    }

    fn on_cleared(
        &self,
        game: &mut GameManager,
        effect: EffectContext,
        _overridden: bool,
    ) -> EngineResult<()> {
        game.adjust_stats(effect.entity)?.add_speed(effect.intensity);
        Ok(())
    }
}

/// Deals 2 damage to its owner when the countdown ends.
pub struct Fuse;

impl TimerBehavior for Fuse {
    fn name(&self) -> &'static str {
        "fuse"
    }

    fn on_timer_over(&self, game: &mut GameManager, timer: TimerContext) -> EngineResult<()> {
        game.damage_entity(timer.entity, Damage::Amount(2))?;
        Ok(())
    }
}

// ----------------------------------------------------------------------
// Skills and templates
// ----------------------------------------------------------------------

/// Deals 3 damage to one enemy within reach.
pub fn poke(game: &mut GameManager, caster: SkillCaster) -> EngineResult<SkillResult> {
    let entity = game.entity(caster.entity)?;
    let side = entity.side();
    let descriptor = entity
        .skill(caster.skill_index)
        .map(|skill| skill.descriptor.clone())
        .unwrap_or_else(|| SkillDescriptor::new("poke", 0));
    let coords = game.board().get_attackable_coords(caster.entity, &descriptor)?;
    let targets = game
        .board()
        .filter_targets(coords, side, TargetMode::EnemyWithHp, false);
    Ok(SkillResult::AwaitingTargets(SkillTargeting::new(
        1,
        targets,
        |game, picked| {
            if let Some(enemy) = game.get_enemy_on_pos(picked[0])? {
                game.damage_entity(enemy, Damage::Amount(3))?;
            }
            Ok(SkillResult::SUCCESS)
        },
    )))
}

/// Heals the caster by 1.
pub fn lick(game: &mut GameManager, caster: SkillCaster) -> EngineResult<SkillResult> {
    game.heal_entity(caster.entity, 1)?;
    Ok(SkillResult::SUCCESS)
}

pub fn registry() -> SkillRegistry {
    let mut registry = SkillRegistry::new();
    registry.register_targeted("poke", poke).unwrap();
    registry.register_instant("lick", lick).unwrap();
    registry
}

/// Health 6, speed 3, move cost 2, poke (reach 2, cost 3), lick (cost 1).
pub fn scout() -> EntityTemplate {
    EntityTemplate::builder("Scout")
        .health(6)
        .rodent(RodentStats::new(RodentClass::Vanguard, 3, 2, 2, 2, 2))
        .skill(SkillDescriptor::new("Poke", 3).with_reach(2), "poke")
        .skill(SkillDescriptor::new("Lick", 1), "lick")
        .build(&registry())
        .unwrap()
}

// ----------------------------------------------------------------------
// Squeaks and decks
// ----------------------------------------------------------------------

pub struct ScoutSqueak;

impl Squeak for ScoutSqueak {
    fn name(&self) -> &str {
        "Scout"
    }

    fn crumb_cost(&self) -> u32 {
        4
    }

    fn kind(&self) -> SqueakKind {
        SqueakKind::Rodent
    }

    fn place(&self, game: &mut GameManager, coord: OddRCoord) -> EngineResult<bool> {
        if game.board().is_collision(coord) {
            return Ok(false);
        }
        let side = Some(game.turn());
        game.spawn_entity(&scout(), coord, side)?;
        Ok(true)
    }
}

/// Deck that never runs out of scouts, shuffling a dummy pile on every draw
/// so the roll counter advances.
#[derive(Default)]
pub struct ScoutDeck {
    pub draws: u32,
}

impl Deck for ScoutDeck {
    fn draw(&mut self, dice: &mut Dice<'_>) -> Option<Arc<dyn Squeak>> {
        let mut pile = [0u8, 1, 2];
        dice.shuffle(&mut pile);
        self.draws += 1;
        Some(Arc::new(ScoutSqueak))
    }

    fn remaining(&self) -> usize {
        usize::MAX
    }
}

// ----------------------------------------------------------------------
// Maps
// ----------------------------------------------------------------------

/// 8x6 flat arena: a rat lair at (0, 0) and a mouse lair at (7, 5), each
/// with 10 health, plus a deployment zone per side on row 1 / row 4.
pub fn arena() -> Map {
    let mut map = Map::new(8, 6).unwrap();
    map.add_feature(
        MapFeature::new(Arc::new(Lair), vec![at(0, 0)])
            .with_health(10)
            .with_side(Side::Rat),
    );
    map.add_feature(
        MapFeature::new(Arc::new(Lair), vec![at(7, 5)])
            .with_health(10)
            .with_side(Side::Mouse),
    );
    map.add_feature(
        MapFeature::new(Arc::new(Zone), (0..3).map(|x| at(x, 1)).collect()).with_side(Side::Rat),
    );
    map.add_feature(
        MapFeature::new(Arc::new(Zone), (5..8).map(|x| at(x, 4)).collect())
            .with_side(Side::Mouse),
    );
    map
}
