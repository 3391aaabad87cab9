//! Status effects.
//!
//! Effects are stored in an [`EffectArena`] keyed by [`EffectId`]. An entity
//! references only its *active* effect per name; weaker or overridden
//! same-name effects live in that active effect's suppressed stack and keep
//! ticking until they expire or resurface. The stacking rules themselves are
//! driven by [`GameManager::apply_effect`](crate::engine::GameManager::apply_effect).
mod arena;

use std::fmt;
use std::sync::Arc;

pub use arena::EffectArena;

use crate::engine::{GameManager, TurnChange};
use crate::entity::EntityId;
use crate::error::EngineResult;
use crate::side::Side;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectId(pub u32);

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "effect#{}", self.0)
    }
}

/// Turn boundary at which an effect or timer counts down, relative to its
/// owner's side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ClearSide {
    /// When the owner's opponent ends its turn.
    Enemy,
    /// When the owner's side ends its turn.
    Ally,
    /// When the side that moves second ends its turn.
    Any,
}

impl ClearSide {
    /// Whether the boundary where `departing` ends its turn counts.
    ///
    /// Owners without a side fall back to [`ClearSide::Any`].
    pub fn matches(self, owner: Option<Side>, departing: Side, second: Side) -> bool {
        match (self, owner) {
            (ClearSide::Enemy, Some(owner)) => departing == owner.other(),
            (ClearSide::Ally, Some(owner)) => departing == owner,
            _ => departing == second,
        }
    }
}

/// Snapshot of an effect handed to its hooks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EffectContext {
    pub id: EffectId,
    pub entity: EntityId,
    pub intensity: i32,
    pub duration: Option<u32>,
    /// False while suppressed beneath a stronger same-name effect.
    pub active: bool,
    /// Entity that applied the effect, if any.
    pub source: Option<EntityId>,
}

/// Per-kind effect hooks.
pub trait EffectBehavior: Send + Sync {
    /// Stacking key. Two effects with the same name never are active together.
    fn name(&self) -> &'static str;

    fn clear_side(&self) -> ClearSide;

    /// Effect became active. `overriding` is true when it displaced or
    /// replaced another same-name effect.
    fn on_applied(
        &self,
        game: &mut GameManager,
        effect: EffectContext,
        overriding: bool,
    ) -> EngineResult<()>;

    /// Effect stopped being active. `overridden` is true when a same-name
    /// effect took its place.
    fn on_cleared(
        &self,
        game: &mut GameManager,
        effect: EffectContext,
        overridden: bool,
    ) -> EngineResult<()>;

    /// Fired on every turn boundary for every scheduled effect.
    fn on_turn_change(
        &self,
        _game: &mut GameManager,
        _effect: EffectContext,
        _change: TurnChange,
    ) -> EngineResult<()> {
        Ok(())
    }

    fn description(&self, intensity: i32) -> String {
        format!("{} ({intensity})", self.name())
    }
}

/// Effect to be applied.
#[derive(Clone)]
pub struct EffectSpec {
    pub behavior: Arc<dyn EffectBehavior>,
    pub intensity: i32,
    /// Full rounds; `None` is permanent.
    pub duration: Option<u32>,
    pub source: Option<EntityId>,
}

impl EffectSpec {
    pub fn new(behavior: Arc<dyn EffectBehavior>, duration: u32) -> Self {
        Self {
            behavior,
            intensity: 0,
            duration: Some(duration),
            source: None,
        }
    }

    pub fn permanent(behavior: Arc<dyn EffectBehavior>) -> Self {
        Self {
            behavior,
            intensity: 0,
            duration: None,
            source: None,
        }
    }

    pub fn with_intensity(mut self, intensity: i32) -> Self {
        self.intensity = intensity;
        self
    }

    /// Records the entity applying the effect.
    pub fn with_source(mut self, source: EntityId) -> Self {
        self.source = Some(source);
        self
    }
}

impl fmt::Debug for EffectSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectSpec")
            .field("name", &self.behavior.name())
            .field("intensity", &self.intensity)
            .field("duration", &self.duration)
            .field("source", &self.source)
            .finish()
    }
}

/// How [`GameManager::apply_effect`](crate::engine::GameManager::apply_effect)
/// resolved a candidate effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectApplication {
    /// No same-name effect was active.
    Activated(EffectId),
    /// Stronger candidate took over; `previous` now sits suppressed beneath it.
    Overrode { active: EffectId, previous: EffectId },
    /// Equal intensity with a longer duration; the active effect was extended.
    Extended(EffectId),
    /// Weaker candidate scheduled beneath the active effect.
    Suppressed { active: EffectId, suppressed: EffectId },
    /// Intensity was added onto the active effect.
    Stacked(EffectId),
    /// Candidate had no lasting impact and was dropped.
    Ignored,
}

/// A scheduled effect.
#[derive(Clone)]
pub struct EffectInstance {
    pub(crate) id: EffectId,
    pub(crate) entity: EntityId,
    pub(crate) behavior: Arc<dyn EffectBehavior>,
    pub(crate) intensity: i32,
    pub(crate) duration: Option<u32>,
    pub(crate) source: Option<EntityId>,
    /// Same-name effects this one suppresses, in push order.
    pub(crate) suppressed: Vec<EffectId>,
}

impl EffectInstance {
    pub fn id(&self) -> EffectId {
        self.id
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn name(&self) -> &'static str {
        self.behavior.name()
    }

    pub fn clear_side(&self) -> ClearSide {
        self.behavior.clear_side()
    }

    pub fn intensity(&self) -> i32 {
        self.intensity
    }

    pub fn duration(&self) -> Option<u32> {
        self.duration
    }

    pub fn source(&self) -> Option<EntityId> {
        self.source
    }

    pub fn is_permanent(&self) -> bool {
        self.duration.is_none()
    }

    pub fn suppressed(&self) -> &[EffectId] {
        &self.suppressed
    }

    pub fn description(&self) -> String {
        self.behavior.description(self.intensity)
    }

    pub(crate) fn context(&self, active: bool) -> EffectContext {
        EffectContext {
            id: self.id,
            entity: self.entity,
            intensity: self.intensity,
            duration: self.duration,
            active,
            source: self.source,
        }
    }
}

impl fmt::Debug for EffectInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectInstance")
            .field("id", &self.id)
            .field("entity", &self.entity)
            .field("name", &self.name())
            .field("intensity", &self.intensity)
            .field("duration", &self.duration)
            .field("source", &self.source)
            .field("suppressed", &self.suppressed)
            .finish()
    }
}
