use std::collections::BTreeMap;

use super::{EffectId, EffectInstance, EffectSpec};
use crate::entity::EntityId;

/// Storage for every scheduled effect, active or suppressed.
///
/// Iteration follows application order.
#[derive(Clone, Debug, Default)]
pub struct EffectArena {
    effects: BTreeMap<EffectId, EffectInstance>,
    next_id: u32,
}

impl EffectArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, entity: EntityId, spec: EffectSpec) -> EffectId {
        let id = EffectId(self.next_id);
        self.next_id += 1;
        self.effects.insert(
            id,
            EffectInstance {
                id,
                entity,
                behavior: spec.behavior,
                intensity: spec.intensity,
                duration: spec.duration,
                source: spec.source,
                suppressed: Vec::new(),
            },
        );
        id
    }

    pub fn get(&self, id: EffectId) -> Option<&EffectInstance> {
        self.effects.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: EffectId) -> Option<&mut EffectInstance> {
        self.effects.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: EffectId) -> Option<EffectInstance> {
        self.effects.remove(&id)
    }

    pub fn contains(&self, id: EffectId) -> bool {
        self.effects.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EffectInstance> {
        self.effects.values()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Snapshot of ids, for loops that run hooks.
    pub(crate) fn ids(&self) -> Vec<EffectId> {
        self.effects.keys().copied().collect()
    }

    pub fn of_entity(&self, entity: EntityId) -> impl Iterator<Item = &EffectInstance> {
        self.effects
            .values()
            .filter(move |effect| effect.entity == entity)
    }

    /// Drops every effect owned by `entity` without running hooks.
    pub(crate) fn discard_entity(&mut self, entity: EntityId) -> usize {
        let before = self.effects.len();
        self.effects.retain(|_, effect| effect.entity != entity);
        before - self.effects.len()
    }

    /// Decrements every timed effect by one round, saturating at zero.
    pub(crate) fn tick_round(&mut self) {
        for effect in self.effects.values_mut() {
            if let Some(duration) = effect.duration.as_mut() {
                *duration = duration.saturating_sub(1);
            }
        }
    }
}
