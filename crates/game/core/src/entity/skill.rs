//! Entity skills: static descriptors bound to resolver functions.

use std::fmt;

use bitflags::bitflags;

use crate::engine::GameManager;
use crate::entity::EntityId;
use crate::error::EngineResult;
use crate::hex::OddRCoord;

bitflags! {
    /// Static properties of a skill.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct SkillTags: u8 {
        /// Features are neither offered nor hit.
        const NO_TARGET_FEATURE = 1 << 0;
        /// The caster is defeated once the skill lands.
        const SELF_DEFEATED     = 1 << 1;
        /// Targets allies instead of enemies.
        const SUPPORT           = 1 << 2;
    }
}

/// Static part of a skill.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillDescriptor {
    pub name: String,
    /// Targeting radius; `None` for skills that never select targets.
    pub reach: Option<u32>,
    /// Extra height the line of sight may clear above the caster.
    pub altitude: Option<u32>,
    pub crumb_cost: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tags: SkillTags,
}

impl SkillDescriptor {
    pub fn new(name: impl Into<String>, crumb_cost: u32) -> Self {
        Self {
            name: name.into(),
            reach: None,
            altitude: None,
            crumb_cost,
            tags: SkillTags::empty(),
        }
    }

    pub fn with_reach(mut self, reach: u32) -> Self {
        self.reach = Some(reach);
        self
    }

    pub fn with_altitude(mut self, altitude: u32) -> Self {
        self.altitude = Some(altitude);
        self
    }

    pub fn with_tags(mut self, tags: SkillTags) -> Self {
        self.tags = tags;
        self
    }
}

/// Which skill is being resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SkillCaster {
    pub entity: EntityId,
    pub skill_index: usize,
}

/// Resolver bound to a skill. Receives the manager in `Idle` state.
pub type SkillFn = fn(&mut GameManager, SkillCaster) -> EngineResult<SkillResult>;

/// Callback run once with the coordinates the player selected.
pub type SkillCallback =
    Box<dyn FnOnce(&mut GameManager, &[OddRCoord]) -> EngineResult<SkillResult> + Send>;

/// A skill descriptor bound to its resolver.
#[derive(Clone)]
pub struct EntitySkill {
    pub descriptor: SkillDescriptor,
    pub(crate) resolver: SkillFn,
}

impl EntitySkill {
    pub fn new(descriptor: SkillDescriptor, resolver: SkillFn) -> Self {
        Self {
            descriptor,
            resolver,
        }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn crumb_cost(&self) -> u32 {
        self.descriptor.crumb_cost
    }

    pub fn reach(&self) -> Option<u32> {
        self.descriptor.reach
    }

    pub fn altitude(&self) -> Option<u32> {
        self.descriptor.altitude
    }

    pub fn tags(&self) -> SkillTags {
        self.descriptor.tags
    }
}

impl fmt::Debug for EntitySkill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntitySkill")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// Final outcome of a skill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum SkillCompleted {
    Success,
    Cancelled,
}

/// What a resolver or targeting callback produced.
pub enum SkillResult {
    Completed(SkillCompleted),
    AwaitingTargets(SkillTargeting),
}

impl SkillResult {
    pub const SUCCESS: Self = Self::Completed(SkillCompleted::Success);
    pub const CANCELLED: Self = Self::Completed(SkillCompleted::Cancelled);
}

impl fmt::Debug for SkillResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed(completed) => f.debug_tuple("Completed").field(completed).finish(),
            Self::AwaitingTargets(targeting) => {
                f.debug_tuple("AwaitingTargets").field(targeting).finish()
            }
        }
    }
}

/// Request to pick up to `target_count` of `available_targets`.
pub struct SkillTargeting {
    pub(crate) target_count: usize,
    pub(crate) available_targets: Vec<OddRCoord>,
    pub(crate) callback: SkillCallback,
    pub(crate) cancelable: bool,
}

impl SkillTargeting {
    /// Cancelable by default.
    pub fn new<F>(target_count: usize, available_targets: Vec<OddRCoord>, callback: F) -> Self
    where
        F: FnOnce(&mut GameManager, &[OddRCoord]) -> EngineResult<SkillResult> + Send + 'static,
    {
        Self {
            target_count,
            available_targets,
            callback: Box::new(callback),
            cancelable: true,
        }
    }

    pub fn cancelable(mut self, cancelable: bool) -> Self {
        self.cancelable = cancelable;
        self
    }

    pub fn target_count(&self) -> usize {
        self.target_count
    }

    pub fn available_targets(&self) -> &[OddRCoord] {
        &self.available_targets
    }

    pub fn is_cancelable(&self) -> bool {
        self.cancelable
    }

    /// False when no valid selection exists: nothing offered, or zero picks
    /// allowed. The engine cancels such requests instead of parking them.
    pub fn is_answerable(&self) -> bool {
        self.target_count > 0 && !self.available_targets.is_empty()
    }
}

impl fmt::Debug for SkillTargeting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkillTargeting")
            .field("target_count", &self.target_count)
            .field("available_targets", &self.available_targets)
            .field("cancelable", &self.cancelable)
            .finish_non_exhaustive()
    }
}
