use std::cmp::Ordering;

use tracing::{debug, trace};

use super::{GameManager, TurnChange};
use crate::effect::{EffectApplication, EffectId, EffectInstance, EffectSpec};
use crate::entity::EntityId;
use crate::error::{EngineError, EngineResult};
use crate::event::GameEvent;
use crate::side::Side;

/// Whether `candidate` lasts strictly longer than `current`. Permanent
/// outlasts every timed duration and nothing outlasts permanent.
fn outlasts(candidate: Option<u32>, current: Option<u32>) -> bool {
    match (candidate, current) {
        (_, None) => false,
        (None, Some(_)) => true,
        (Some(candidate), Some(current)) => candidate > current,
    }
}

impl GameManager {
    /// Applies `spec` to `entity` following the same-name stacking rules.
    pub fn apply_effect(
        &mut self,
        entity: EntityId,
        spec: EffectSpec,
    ) -> EngineResult<EffectApplication> {
        self.ensure_not_selecting()?;
        self.apply_effect_with(entity, spec, false)
    }

    /// Like [`apply_effect`](Self::apply_effect), but a same-name active
    /// effect absorbs the candidate's intensity instead of competing with it.
    pub fn apply_effect_stacked(
        &mut self,
        entity: EntityId,
        spec: EffectSpec,
    ) -> EngineResult<EffectApplication> {
        self.ensure_not_selecting()?;
        self.apply_effect_with(entity, spec, true)
    }

    fn apply_effect_with(
        &mut self,
        entity: EntityId,
        spec: EffectSpec,
        stack: bool,
    ) -> EngineResult<EffectApplication> {
        if spec.duration == Some(0) {
            return Err(EngineError::InvalidArgument("effect duration must be positive"));
        }
        let name = spec.behavior.name();
        let Some(active_id) = self.board.get_entity(entity)?.effect(name) else {
            let id = self.effects.insert(entity, spec);
            self.board.entity_mut(entity)?.effects.insert(name, id);
            self.fire_applied(id, false)?;
            return Ok(EffectApplication::Activated(id));
        };

        if stack {
            return self.stack_onto(active_id, spec);
        }
        let active = self.effect_instance(active_id)?;
        let (current_intensity, current_duration) = (active.intensity, active.duration);
        let lasting = outlasts(spec.duration, current_duration);

        match spec.intensity.cmp(&current_intensity) {
            Ordering::Greater => {
                let id = self.effects.insert(entity, spec);
                let mut inherited = self
                    .effects
                    .get_mut(active_id)
                    .map(|previous| std::mem::take(&mut previous.suppressed))
                    .unwrap_or_default();
                inherited.push(active_id);
                if let Some(candidate) = self.effects.get_mut(id) {
                    candidate.suppressed = inherited;
                }
                self.board.entity_mut(entity)?.effects.insert(name, id);

                debug!(%entity, %id, previous = %active_id, name, "effect overridden");
                self.fire_applied(id, true)?;
                self.fire_cleared(active_id, true)?;
                Ok(EffectApplication::Overrode {
                    active: id,
                    previous: active_id,
                })
            }
            Ordering::Equal => {
                if !lasting {
                    return Ok(EffectApplication::Ignored);
                }
                if let Some(active) = self.effects.get_mut(active_id) {
                    active.duration = spec.duration;
                }
                trace!(%entity, id = %active_id, name, duration = ?spec.duration, "effect extended");
                Ok(EffectApplication::Extended(active_id))
            }
            Ordering::Less => {
                if !lasting {
                    return Ok(EffectApplication::Ignored);
                }
                let id = self.effects.insert(entity, spec);
                if let Some(active) = self.effects.get_mut(active_id) {
                    active.suppressed.push(id);
                }
                trace!(%entity, %id, beneath = %active_id, name, "effect suppressed");
                Ok(EffectApplication::Suppressed {
                    active: active_id,
                    suppressed: id,
                })
            }
        }
    }

    fn stack_onto(
        &mut self,
        active_id: EffectId,
        spec: EffectSpec,
    ) -> EngineResult<EffectApplication> {
        self.fire_cleared(active_id, true)?;
        let active = self
            .effects
            .get_mut(active_id)
            .ok_or(EngineError::InvalidArgument("unknown effect"))?;
        active.intensity += spec.intensity;
        if outlasts(spec.duration, active.duration) {
            active.duration = spec.duration;
        }
        trace!(id = %active_id, intensity = active.intensity, "effect stacked");
        self.fire_applied(active_id, true)?;
        Ok(EffectApplication::Stacked(active_id))
    }

    /// Removes an effect immediately.
    ///
    /// An active effect takes every effect it suppresses with it and fires
    /// `on_cleared(overridden = false)`; a suppressed one disappears silently.
    pub fn force_clear_effect(&mut self, id: EffectId) -> EngineResult<()> {
        self.ensure_not_selecting()?;
        self.effect_instance(id)?;
        if !self.is_effect_active(id) {
            self.unschedule_suppressed(id);
            return Ok(());
        }

        let effect = self.detach(id)?;
        for buried in &effect.suppressed {
            self.effects.remove(*buried);
        }
        debug!(entity = %effect.entity, %id, name = effect.name(), "effect force-cleared");
        self.notify_cleared(effect, false)
    }

    /// True if `id` is the effect its owner currently references by name.
    pub fn is_effect_active(&self, id: EffectId) -> bool {
        self.effects.get(id).is_some_and(|effect| {
            self.board
                .entity(effect.entity)
                .and_then(|entity| entity.effect(effect.name()))
                == Some(id)
        })
    }

    fn effect_instance(&self, id: EffectId) -> EngineResult<&EffectInstance> {
        self.effects
            .get(id)
            .ok_or(EngineError::InvalidArgument("unknown effect"))
    }

    fn fire_applied(&mut self, id: EffectId, overriding: bool) -> EngineResult<()> {
        let effect = self.effect_instance(id)?;
        let behavior = effect.behavior.clone();
        let context = effect.context(true);
        self.emit(GameEvent::EffectApplied {
            entity: context.entity,
            effect: id,
            name: behavior.name().to_string(),
            intensity: context.intensity,
            duration: context.duration,
            overriding,
        });
        behavior.on_applied(self, context, overriding)
    }

    fn fire_cleared(&mut self, id: EffectId, overridden: bool) -> EngineResult<()> {
        let effect = self.effect_instance(id)?;
        let behavior = effect.behavior.clone();
        let context = effect.context(false);
        self.emit(GameEvent::EffectCleared {
            entity: context.entity,
            effect: id,
            name: behavior.name().to_string(),
            overridden,
        });
        behavior.on_cleared(self, context, overridden)
    }

    /// Emits the clear event and runs `on_cleared` for an effect already
    /// taken out of the arena.
    fn notify_cleared(&mut self, effect: EffectInstance, overridden: bool) -> EngineResult<()> {
        self.emit(GameEvent::EffectCleared {
            entity: effect.entity,
            effect: effect.id,
            name: effect.name().to_string(),
            overridden,
        });
        effect
            .behavior
            .on_cleared(self, effect.context(false), overridden)
    }

    /// Drops an active effect from the arena and from its owner's name map.
    fn detach(&mut self, id: EffectId) -> EngineResult<EffectInstance> {
        let effect = self
            .effects
            .remove(id)
            .ok_or(EngineError::InvalidArgument("unknown effect"))?;
        let referenced = self
            .board
            .entity(effect.entity)
            .and_then(|entity| entity.effect(effect.name()))
            == Some(id);
        if referenced {
            self.board.entity_mut(effect.entity)?.effects.remove(effect.name());
        }
        Ok(effect)
    }

    /// Removes a suppressed effect from its holder's stack and the schedule.
    fn unschedule_suppressed(&mut self, id: EffectId) {
        let Some(effect) = self.effects.remove(id) else {
            return;
        };
        let holder = self
            .board
            .entity(effect.entity)
            .and_then(|entity| entity.effect(effect.name()));
        if let Some(holder) = holder.and_then(|holder| self.effects.get_mut(holder)) {
            holder.suppressed.retain(|buried| *buried != id);
        }
        trace!(%id, name = effect.name(), "suppressed effect removed");
    }

    // ------------------------------------------------------------------
    // Turn boundary
    // ------------------------------------------------------------------

    /// Fires `on_turn_change` on every scheduled effect, active or not.
    pub(super) fn effect_turn_hooks(&mut self, change: TurnChange) -> EngineResult<()> {
        for id in self.effects.ids() {
            let active = self.is_effect_active(id);
            let Some(effect) = self.effects.get(id) else {
                continue;
            };
            let behavior = effect.behavior.clone();
            let context = effect.context(active);
            behavior.on_turn_change(self, context, change)?;
        }
        Ok(())
    }

    /// Clears effects on their last round whose clear side matches the
    /// departing side. Suppressed effects go first so promotion only sees
    /// survivors.
    pub(super) fn expire_effects(&mut self, departing: Side) -> EngineResult<()> {
        let second = self.first_turn.other();
        let expiring: Vec<EffectId> = self
            .effects
            .iter()
            .filter(|effect| effect.duration.is_some_and(|duration| duration <= 1))
            .filter(|effect| {
                let owner = self.board.entity(effect.entity).and_then(|entity| entity.side());
                effect.clear_side().matches(owner, departing, second)
            })
            .map(EffectInstance::id)
            .collect();

        let (active, suppressed): (Vec<_>, Vec<_>) = expiring
            .into_iter()
            .partition(|id| self.is_effect_active(*id));
        for id in suppressed {
            self.unschedule_suppressed(id);
        }
        for id in active {
            if self.is_effect_active(id) {
                self.expire_active(id)?;
            }
        }
        Ok(())
    }

    fn expire_active(&mut self, id: EffectId) -> EngineResult<()> {
        let effect = self.effect_instance(id)?;
        let entity = effect.entity;
        let name = effect.name();

        // max_by_key keeps the last maximum, i.e. the most recently pushed.
        let promoted = effect
            .suppressed
            .iter()
            .copied()
            .filter_map(|buried| self.effects.get(buried))
            .max_by_key(|buried| buried.intensity)
            .map(EffectInstance::id);

        let Some(promoted) = promoted else {
            debug!(%entity, %id, name, "effect expired");
            let expired = self.detach(id)?;
            return self.notify_cleared(expired, false);
        };

        let mut rest = self.effect_instance(id)?.suppressed.clone();
        rest.retain(|buried| *buried != promoted);
        if let Some(next) = self.effects.get_mut(promoted) {
            next.suppressed = rest;
        }
        self.board.entity_mut(entity)?.effects.insert(name, promoted);

        let expired = self
            .effects
            .remove(id)
            .ok_or(EngineError::InvalidArgument("unknown effect"))?;
        debug!(%entity, %id, %promoted, name, "effect expired, suppressed effect promoted");
        self.fire_applied(promoted, true)?;
        self.notify_cleared(expired, true)
    }
}
