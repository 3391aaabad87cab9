//! Validated entity templates and the skill resolver registry.
//!
//! Templates are the only way to create entities. All content errors surface
//! from [`EntityTemplateBuilder::build`] instead of during play.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::{Entity, EntityBehavior, EntityId, EntitySkill, PlainEntity, RodentStats};
use super::{SkillDescriptor, SkillFn};
use crate::error::{EngineError, EngineResult};
use crate::hex::OddRCoord;
use crate::side::Side;

#[derive(Clone, Copy)]
struct RegisteredSkill {
    resolver: SkillFn,
    needs_reach: bool,
}

/// Resolver name to function lookup used by data-driven templates.
#[derive(Clone, Default)]
pub struct SkillRegistry {
    resolvers: BTreeMap<String, RegisteredSkill>,
}

impl SkillRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a resolver that completes without selecting targets.
    pub fn register_instant(&mut self, name: &str, resolver: SkillFn) -> EngineResult<()> {
        self.insert(name, resolver, false)
    }

    /// Registers a resolver that selects targets within the skill's reach.
    /// Skills bound to it must declare a reach.
    pub fn register_targeted(&mut self, name: &str, resolver: SkillFn) -> EngineResult<()> {
        self.insert(name, resolver, true)
    }

    fn insert(&mut self, name: &str, resolver: SkillFn, needs_reach: bool) -> EngineResult<()> {
        if self.resolvers.contains_key(name) {
            return Err(EngineError::Configuration(format!(
                "skill resolver '{name}' registered twice"
            )));
        }
        self.resolvers.insert(
            name.to_owned(),
            RegisteredSkill {
                resolver,
                needs_reach,
            },
        );
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<SkillFn> {
        self.resolvers.get(name).map(|skill| skill.resolver)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolvers.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.resolvers.keys().map(String::as_str)
    }

    fn bind(&self, descriptor: SkillDescriptor, name: &str) -> EngineResult<EntitySkill> {
        let registered = self.resolvers.get(name).ok_or_else(|| {
            EngineError::Configuration(format!(
                "skill '{}' refers to unknown resolver '{name}'",
                descriptor.name
            ))
        })?;
        if registered.needs_reach && descriptor.reach.is_none() {
            return Err(EngineError::Configuration(format!(
                "skill '{}' selects targets but declares no reach",
                descriptor.name
            )));
        }
        Ok(EntitySkill::new(descriptor, registered.resolver))
    }
}

enum SkillSource {
    Named(String),
    Direct(SkillFn),
}

/// Blueprint for spawning entities of one kind.
#[derive(Clone)]
pub struct EntityTemplate {
    name: String,
    description: String,
    health: Option<u32>,
    defense: i32,
    height: i32,
    collision: bool,
    movable: bool,
    skills: Vec<EntitySkill>,
    rodent: Option<RodentStats>,
    behavior: Arc<dyn EntityBehavior>,
}

impl EntityTemplate {
    pub fn builder(name: impl Into<String>) -> EntityTemplateBuilder {
        EntityTemplateBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn health(&self) -> Option<u32> {
        self.health
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

    pub fn skills(&self) -> &[EntitySkill] {
        &self.skills
    }

    pub fn rodent(&self) -> Option<&RodentStats> {
        self.rodent.as_ref()
    }

    pub(crate) fn instantiate(&self, id: EntityId, pos: OddRCoord, side: Option<Side>) -> Entity {
        Entity {
            id,
            name: self.name.clone(),
            description: self.description.clone(),
            pos,
            side,
            health: self.health,
            max_health: self.health,
            defense: self.defense,
            height: self.height,
            collision: self.collision,
            movable: self.movable,
            skills: self.skills.clone(),
            effects: BTreeMap::new(),
            rodent: self.rodent.clone(),
            behavior: Arc::clone(&self.behavior),
        }
    }
}

impl std::fmt::Debug for EntityTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityTemplate")
            .field("name", &self.name)
            .field("health", &self.health)
            .field("defense", &self.defense)
            .field("skills", &self.skills)
            .field("rodent", &self.rodent)
            .finish_non_exhaustive()
    }
}

/// Builder for [`EntityTemplate`].
pub struct EntityTemplateBuilder {
    name: String,
    description: String,
    health: Option<u32>,
    defense: i32,
    height: i32,
    collision: bool,
    movable: bool,
    skills: Vec<(SkillDescriptor, SkillSource)>,
    rodent: Option<RodentStats>,
    behavior: Arc<dyn EntityBehavior>,
}

impl EntityTemplateBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            health: None,
            defense: 0,
            height: 0,
            collision: false,
            movable: false,
            skills: Vec::new(),
            rodent: None,
            behavior: Arc::new(PlainEntity),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn health(mut self, health: u32) -> Self {
        self.health = Some(health);
        self
    }

    pub fn defense(mut self, defense: i32) -> Self {
        self.defense = defense;
        self
    }

    pub fn height(mut self, height: i32) -> Self {
        self.height = height;
        self
    }

    pub fn collision(mut self, collision: bool) -> Self {
        self.collision = collision;
        self
    }

    pub fn movable(mut self, movable: bool) -> Self {
        self.movable = movable;
        self
    }

    /// Makes the template a rodent. Rodents move and collide.
    pub fn rodent(mut self, stats: RodentStats) -> Self {
        self.rodent = Some(stats);
        self.movable = true;
        self.collision = true;
        self
    }

    pub fn behavior(mut self, behavior: Arc<dyn EntityBehavior>) -> Self {
        self.behavior = behavior;
        self
    }

    /// Adds a skill bound to a resolver registered under `resolver`.
    pub fn skill(mut self, descriptor: SkillDescriptor, resolver: impl Into<String>) -> Self {
        self.skills
            .push((descriptor, SkillSource::Named(resolver.into())));
        self
    }

    /// Adds a skill bound directly to `resolver`.
    pub fn skill_fn(mut self, descriptor: SkillDescriptor, resolver: SkillFn) -> Self {
        self.skills.push((descriptor, SkillSource::Direct(resolver)));
        self
    }

    pub fn build(self, registry: &SkillRegistry) -> EngineResult<EntityTemplate> {
        if self.name.trim().is_empty() {
            return Err(EngineError::Configuration(
                "entity template has an empty name".into(),
            ));
        }
        if self.health == Some(0) {
            return Err(EngineError::Configuration(format!(
                "entity '{}' must start with positive health",
                self.name
            )));
        }

        let skills = self
            .skills
            .into_iter()
            .map(|(descriptor, source)| match source {
                SkillSource::Named(resolver) => registry.bind(descriptor, &resolver),
                SkillSource::Direct(resolver) => Ok(EntitySkill::new(descriptor, resolver)),
            })
            .collect::<EngineResult<Vec<_>>>()?;

        Ok(EntityTemplate {
            name: self.name,
            description: self.description,
            health: self.health,
            defense: self.defense,
            height: self.height,
            collision: self.collision,
            movable: self.movable,
            skills,
            rodent: self.rodent,
            behavior: self.behavior,
        })
    }
}
