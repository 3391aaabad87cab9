//! Map-embedded objects spanning one or more tiles (lairs, deployment zones).

use std::fmt;
use std::sync::Arc;

use crate::engine::GameManager;
use crate::entity::EntityId;
use crate::error::EngineResult;
use crate::hex::OddRCoord;
use crate::side::Side;

/// Unique identifier of a feature for the lifetime of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeatureId(pub u32);

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "feature#{}", self.0)
    }
}

/// Role a feature plays in the engine's own rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum FeatureKind {
    /// Win-condition target. A side with no lairs left loses.
    Lair,
    /// Placement area for squeaks restricted to deployment zones.
    DeploymentZone,
    /// No engine-level meaning.
    Other,
}

/// Per-kind feature hooks.
pub trait FeatureBehavior: Send + Sync {
    fn name(&self) -> &'static str;

    fn kind(&self) -> FeatureKind {
        FeatureKind::Other
    }

    /// Whether the feature blocks movement onto its tiles.
    fn is_collision(&self) -> bool;

    fn on_damage_taken(&self, _feature: &Feature, _damage: u32) -> Option<u32> {
        None
    }

    /// Returning `false` vetoes the feature's destruction.
    fn on_death(&self, _feature: &Feature) -> bool {
        true
    }

    /// An entity arrived on one of the feature's tiles from outside the feature.
    fn on_entity_enter(
        &self,
        _game: &mut GameManager,
        _feature: FeatureId,
        _entity: EntityId,
        _coord: OddRCoord,
    ) -> EngineResult<()> {
        Ok(())
    }

    /// An entity left the feature entirely. `coord` is `None` when it died,
    /// in which case `side` is the only thing left to know about it.
    fn on_entity_exit(
        &self,
        _game: &mut GameManager,
        _feature: FeatureId,
        _entity: EntityId,
        _side: Option<Side>,
        _coord: Option<OddRCoord>,
    ) -> EngineResult<()> {
        Ok(())
    }
}

/// A placed feature.
#[derive(Clone)]
pub struct Feature {
    pub(crate) id: FeatureId,
    pub(crate) shape: Vec<OddRCoord>,
    pub(crate) health: Option<u32>,
    pub(crate) max_health: Option<u32>,
    pub(crate) defense: i32,
    pub(crate) side: Option<Side>,
    pub(crate) behavior: Arc<dyn FeatureBehavior>,
}

impl Feature {
    pub fn id(&self) -> FeatureId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.behavior.name()
    }

    pub fn kind(&self) -> FeatureKind {
        self.behavior.kind()
    }

    /// Absolute coordinates covered by the feature.
    pub fn shape(&self) -> &[OddRCoord] {
        &self.shape
    }

    pub fn covers(&self, coord: OddRCoord) -> bool {
        self.shape.contains(&coord)
    }

    pub fn health(&self) -> Option<u32> {
        self.health
    }

    pub fn max_health(&self) -> Option<u32> {
        self.max_health
    }

    pub fn defense(&self) -> i32 {
        self.defense
    }

    pub fn side(&self) -> Option<Side> {
        self.side
    }

    pub fn is_collision(&self) -> bool {
        self.behavior.is_collision()
    }

    pub fn is_damageable(&self) -> bool {
        self.health.is_some()
    }

    pub fn behavior(&self) -> &Arc<dyn FeatureBehavior> {
        &self.behavior
    }
}

impl fmt::Debug for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Feature")
            .field("id", &self.id)
            .field("name", &self.name())
            .field("shape", &self.shape)
            .field("health", &self.health)
            .field("defense", &self.defense)
            .field("side", &self.side)
            .finish()
    }
}
