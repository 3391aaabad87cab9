//! Entities: units and tricks that occupy tiles.
//!
//! An [`Entity`] is plain data owned by the board. Per-kind behavior
//! (damage substitution, death vetoes, summon and turn hooks) lives behind an
//! [`EntityBehavior`] trait object shared by every entity built from the same
//! template. Callers read entities through the board and mutate them only
//! through [`GameManager`](crate::engine::GameManager).
mod skill;
mod template;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

pub use skill::{
    EntitySkill, SkillCallback, SkillCaster, SkillCompleted, SkillDescriptor, SkillFn,
    SkillResult, SkillTags, SkillTargeting,
};
pub use template::{EntityTemplate, EntityTemplateBuilder, SkillRegistry};

use crate::effect::EffectId;
use crate::engine::{GameManager, TurnChange};
use crate::error::EngineResult;
use crate::hex::OddRCoord;
use crate::side::Side;

/// Unique identifier of an entity for the lifetime of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Rodent class tag.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum RodentClass {
    Vanguard,
    Duelist,
    Tank,
    Specialist,
    Support,
}

/// Movement and skill economy carried by rodents only.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RodentStats {
    pub class: RodentClass,
    pub speed: i32,
    pub attack: i32,
    pub move_cost: u32,
    pub move_stamina: u32,
    pub max_move_stamina: u32,
    pub skill_stamina: u32,
    pub max_skill_stamina: u32,
    /// Active stuns. Both meters stay empty while non-zero.
    #[cfg_attr(feature = "serde", serde(default))]
    pub stun: u32,
}

impl RodentStats {
    /// Full stamina on both meters.
    pub fn new(
        class: RodentClass,
        speed: i32,
        attack: i32,
        move_cost: u32,
        move_stamina: u32,
        skill_stamina: u32,
    ) -> Self {
        Self {
            class,
            speed,
            attack,
            move_cost,
            move_stamina,
            max_move_stamina: move_stamina,
            skill_stamina,
            max_skill_stamina: skill_stamina,
            stun: 0,
        }
    }

    pub fn is_stunned(&self) -> bool {
        self.stun > 0
    }

    pub fn refill(&mut self) {
        if self.is_stunned() {
            self.drain();
            return;
        }
        self.move_stamina = self.max_move_stamina;
        self.skill_stamina = self.max_skill_stamina;
    }

    fn drain(&mut self) {
        self.move_stamina = 0;
        self.skill_stamina = 0;
    }
}

/// Per-kind hooks invoked by the engine.
///
/// All hooks have no-op defaults.
pub trait EntityBehavior: Send + Sync {
    /// May substitute the raw damage before defense is applied. A
    /// substitute of 0 is a miss. `source` is the attacking entity, if any.
    fn on_damage_taken(
        &self,
        _game: &mut GameManager,
        _entity: EntityId,
        _damage: u32,
        _source: Option<EntityId>,
    ) -> EngineResult<Option<u32>> {
        Ok(None)
    }

    /// Called when health reaches 0. Returning `false` vetoes the death.
    fn on_death(&self, _entity: &Entity) -> bool {
        true
    }

    /// Called after the entity is spawned through [`GameManager::spawn_entity`].
    fn on_summon(&self, _game: &mut GameManager, _entity: EntityId) -> EngineResult<()> {
        Ok(())
    }

    /// Called on every turn boundary, before the side flips.
    fn on_turn_change(
        &self,
        _game: &mut GameManager,
        _entity: EntityId,
        _change: TurnChange,
    ) -> EngineResult<()> {
        Ok(())
    }
}

/// Behavior of entities with no special rules.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainEntity;

impl EntityBehavior for PlainEntity {}

/// A unit, trick or obstacle on the board.
#[derive(Clone)]
pub struct Entity {
    pub(crate) id: EntityId,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) pos: OddRCoord,
    pub(crate) side: Option<Side>,
    pub(crate) health: Option<u32>,
    pub(crate) max_health: Option<u32>,
    pub(crate) defense: i32,
    pub(crate) height: i32,
    pub(crate) collision: bool,
    pub(crate) movable: bool,
    pub(crate) skills: Vec<EntitySkill>,
    pub(crate) effects: BTreeMap<&'static str, EffectId>,
    pub(crate) rodent: Option<RodentStats>,
    pub(crate) behavior: Arc<dyn EntityBehavior>,
}

impl Entity {
    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn pos(&self) -> OddRCoord {
        self.pos
    }

    pub fn side(&self) -> Option<Side> {
        self.side
    }

    /// `None` for indestructible entities.
    pub fn health(&self) -> Option<u32> {
        self.health
    }

    pub fn max_health(&self) -> Option<u32> {
        self.max_health
    }

    pub fn defense(&self) -> i32 {
        self.defense
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn collision(&self) -> bool {
        self.collision
    }

    pub fn movable(&self) -> bool {
        self.movable
    }

    pub fn skills(&self) -> &[EntitySkill] {
        &self.skills
    }

    pub fn skill(&self, index: usize) -> Option<&EntitySkill> {
        self.skills.get(index)
    }

    pub fn rodent(&self) -> Option<&RodentStats> {
        self.rodent.as_ref()
    }

    pub fn is_rodent(&self) -> bool {
        self.rodent.is_some()
    }

    /// Movement range in steps; 0 for non-rodents.
    pub fn speed(&self) -> i32 {
        self.rodent.as_ref().map_or(0, |rodent| rodent.speed)
    }

    /// Attack stat; 0 for non-rodents.
    pub fn attack(&self) -> i32 {
        self.rodent.as_ref().map_or(0, |rodent| rodent.attack)
    }

    /// Id of the active effect named `name`, if any.
    pub fn effect(&self, name: &str) -> Option<EffectId> {
        self.effects.get(name).copied()
    }

    pub fn has_effect(&self, name: &str) -> bool {
        self.effects.contains_key(name)
    }

    /// Active effects keyed by name.
    pub fn effects(&self) -> impl Iterator<Item = (&'static str, EffectId)> + '_ {
        self.effects.iter().map(|(name, id)| (*name, *id))
    }

    pub fn is_damageable(&self) -> bool {
        self.health.is_some()
    }

    pub fn behavior(&self) -> &Arc<dyn EntityBehavior> {
        &self.behavior
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("pos", &self.pos)
            .field("side", &self.side)
            .field("health", &self.health)
            .field("defense", &self.defense)
            .field("effects", &self.effects)
            .field("rodent", &self.rodent)
            .finish_non_exhaustive()
    }
}

/// Handle for effect hooks that adjust an entity's stats.
///
/// Deltas are signed so each `on_applied` can be undone exactly by the
/// matching `on_cleared`.
pub struct StatsMut<'a> {
    entity: &'a mut Entity,
}

impl<'a> StatsMut<'a> {
    pub(crate) fn new(entity: &'a mut Entity) -> Self {
        Self { entity }
    }

    pub fn add_defense(&mut self, delta: i32) -> &mut Self {
        self.entity.defense += delta;
        self
    }

    pub fn add_height(&mut self, delta: i32) -> &mut Self {
        self.entity.height += delta;
        self
    }

    /// No-op on non-rodents.
    pub fn add_speed(&mut self, delta: i32) -> &mut Self {
        if let Some(rodent) = self.entity.rodent.as_mut() {
            rodent.speed += delta;
        }
        self
    }

    /// Stacks or lifts a stun. Applying one empties both meters at once.
    /// No-op on non-rodents.
    pub fn add_stun(&mut self, delta: i32) -> &mut Self {
        if let Some(rodent) = self.entity.rodent.as_mut() {
            rodent.stun = rodent.stun.saturating_add_signed(delta);
            if rodent.is_stunned() {
                rodent.drain();
            }
        }
        self
    }

    /// No-op on non-rodents.
    pub fn add_attack(&mut self, delta: i32) -> &mut Self {
        if let Some(rodent) = self.entity.rodent.as_mut() {
            rodent.attack += delta;
        }
        self
    }

    pub fn entity(&self) -> &Entity {
        self.entity
    }
}
