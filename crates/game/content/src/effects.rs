//! Status effects used by the built-in rodents.

use squeak_core::{ClearSide, Damage, EffectBehavior, EffectContext, EngineResult, GameManager};
use tracing::debug;

/// Lowers speed by its intensity.
#[derive(Clone, Copy, Debug, Default)]
pub struct Slowness;

impl Slowness {
    pub const NAME: &'static str = "slowness";
}

impl EffectBehavior for Slowness {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn clear_side(&self) -> ClearSide {
        ClearSide::Ally
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

    fn description(&self, intensity: i32) -> String {
        format!("Slowness: speed -{intensity}")
    }
}

/// Raises attack by its intensity.
#[derive(Clone, Copy, Debug, Default)]
pub struct MoraleBoost;

impl MoraleBoost {
    pub const NAME: &'static str = "morale_boost";
}

impl EffectBehavior for MoraleBoost {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn clear_side(&self) -> ClearSide {
        ClearSide::Ally
    }

    fn on_applied(
        &self,
        game: &mut GameManager,
        effect: EffectContext,
        _overriding: bool,
    ) -> EngineResult<()> {
        game.adjust_stats(effect.entity)?.add_attack(effect.intensity);
        Ok(())
    }

    fn on_cleared(
        &self,
        game: &mut GameManager,
        effect: EffectContext,
        _overridden: bool,
    ) -> EngineResult<()> {
        game.adjust_stats(effect.entity)?.add_attack(-effect.intensity);
        Ok(())
    }

    fn description(&self, intensity: i32) -> String {
        format!("Morale Boost: attack +{intensity}")
    }
}

/// Permanent trade of defense and height for speed.
///
/// Intensity is the defense given up.
#[derive(Clone, Copy, Debug, Default)]
pub struct AbandonedBread;

impl AbandonedBread {
    pub const NAME: &'static str = "abandoned_bread";
    pub const SPEED_GAIN: i32 = 12;
    pub const HEIGHT_LOSS: i32 = 1;
}

impl EffectBehavior for AbandonedBread {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn clear_side(&self) -> ClearSide {
        ClearSide::Ally
    }

    fn on_applied(
        &self,
        game: &mut GameManager,
        effect: EffectContext,
        _overriding: bool,
    ) -> EngineResult<()> {
        game.adjust_stats(effect.entity)?
            .add_defense(-effect.intensity)
            .add_height(-Self::HEIGHT_LOSS)
            .add_speed(Self::SPEED_GAIN);
        Ok(())
    }

    fn on_cleared(
        &self,
        game: &mut GameManager,
        effect: EffectContext,
        _overridden: bool,
    ) -> EngineResult<()> {
        game.adjust_stats(effect.entity)?
            .add_defense(effect.intensity)
            .add_height(Self::HEIGHT_LOSS)
            .add_speed(-Self::SPEED_GAIN);
        Ok(())
    }

    fn description(&self, _intensity: i32) -> String {
        "Abandoned Bread".to_string()
    }
}

/// Empties both stamina meters for as long as it lasts.
#[derive(Clone, Copy, Debug, Default)]
pub struct Stunned;

impl Stunned {
    pub const NAME: &'static str = "stunned";
}

impl EffectBehavior for Stunned {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn clear_side(&self) -> ClearSide {
        ClearSide::Ally
    }

    fn on_applied(
        &self,
        game: &mut GameManager,
        effect: EffectContext,
        _overriding: bool,
    ) -> EngineResult<()> {
        game.adjust_stats(effect.entity)?.add_stun(1);
        Ok(())
    }

    fn on_cleared(
        &self,
        game: &mut GameManager,
        effect: EffectContext,
        _overridden: bool,
    ) -> EngineResult<()> {
        game.adjust_stats(effect.entity)?.add_stun(-1);
        Ok(())
    }

    fn description(&self, _intensity: i32) -> String {
        "Stunned: cannot move or use skills".to_string()
    }
}

/// Delayed bile damage equal to its intensity, dealt when it wears off.
///
/// Applied stacked, so repeated hits pile up into one later burst.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrewbellyVomit;

impl BrewbellyVomit {
    pub const NAME: &'static str = "brewbelly_vomit";
}

impl EffectBehavior for BrewbellyVomit {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn clear_side(&self) -> ClearSide {
        ClearSide::Enemy
    }

    fn on_applied(
        &self,
        _game: &mut GameManager,
        _effect: EffectContext,
        _overriding: bool,
    ) -> EngineResult<()> {
        Ok(())
    }

    fn on_cleared(
        &self,
        game: &mut GameManager,
        effect: EffectContext,
        overridden: bool,
    ) -> EngineResult<()> {
        if overridden || effect.intensity <= 0 {
            return Ok(());
        }
        let damage = Damage::Amount(effect.intensity.unsigned_abs());
        let report = match effect.source {
            Some(source) => game.damage_entity_by(effect.entity, damage, source)?,
            None => game.damage_entity(effect.entity, damage)?,
        };
        debug!(entity = %effect.entity, hp_loss = report.hp_loss, "vomit burst");
        Ok(())
    }

    fn description(&self, intensity: i32) -> String {
        format!("Vomit: takes {intensity} damage when it wears off")
    }
}

/// Marks the ally bound to a Quartermaster's My Soul. Grants 1 defense.
///
/// Permanent; the binding Quartermaster is the effect's source.
#[derive(Clone, Copy, Debug, Default)]
pub struct QuartermasterSoul;

impl QuartermasterSoul {
    pub const NAME: &'static str = "quartermaster_soul";
    pub const DEFENSE_GAIN: i32 = 1;
}

impl EffectBehavior for QuartermasterSoul {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn clear_side(&self) -> ClearSide {
        ClearSide::Ally
    }

    fn on_applied(
        &self,
        game: &mut GameManager,
        effect: EffectContext,
        _overriding: bool,
    ) -> EngineResult<()> {
        game.adjust_stats(effect.entity)?
            .add_defense(Self::DEFENSE_GAIN);
        Ok(())
    }

    fn on_cleared(
        &self,
        game: &mut GameManager,
        effect: EffectContext,
        _overridden: bool,
    ) -> EngineResult<()> {
        game.adjust_stats(effect.entity)?
            .add_defense(-Self::DEFENSE_GAIN);
        Ok(())
    }

    fn description(&self, _intensity: i32) -> String {
        "Someone entrusted their soul".to_string()
    }
}
