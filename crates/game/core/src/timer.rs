//! Countdown triggers attached to entities, independent of effects.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::effect::ClearSide;
use crate::engine::{GameManager, TurnChange};
use crate::entity::EntityId;
use crate::error::EngineResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimerId(pub u32);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// Snapshot of a timer handed to its hooks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerContext {
    pub id: TimerId,
    pub entity: EntityId,
    pub remaining: u32,
}

pub trait TimerBehavior: Send + Sync {
    fn name(&self) -> &'static str;

    /// Fired on every turn boundary while the timer is scheduled.
    fn on_turn_change(
        &self,
        _game: &mut GameManager,
        _timer: TimerContext,
        _change: TurnChange,
    ) -> EngineResult<()> {
        Ok(())
    }

    /// Fired once when the countdown reaches zero. The timer is already gone.
    fn on_timer_over(&self, game: &mut GameManager, timer: TimerContext) -> EngineResult<()>;
}

#[derive(Clone)]
pub struct Timer {
    pub(crate) id: TimerId,
    pub(crate) entity: EntityId,
    pub(crate) clear_side: ClearSide,
    pub(crate) duration: u32,
    pub(crate) behavior: Arc<dyn TimerBehavior>,
}

impl Timer {
    pub fn id(&self) -> TimerId {
        self.id
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn clear_side(&self) -> ClearSide {
        self.clear_side
    }

    /// Countdown boundaries left.
    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn name(&self) -> &'static str {
        self.behavior.name()
    }

    pub(crate) fn context(&self) -> TimerContext {
        TimerContext {
            id: self.id,
            entity: self.entity,
            remaining: self.duration,
        }
    }
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("id", &self.id)
            .field("entity", &self.entity)
            .field("name", &self.name())
            .field("clear_side", &self.clear_side)
            .field("duration", &self.duration)
            .finish()
    }
}

/// Timer storage in scheduling order.
#[derive(Clone, Debug, Default)]
pub struct TimerArena {
    timers: BTreeMap<TimerId, Timer>,
    next_id: u32,
}

impl TimerArena {
    pub(crate) fn insert(
        &mut self,
        entity: EntityId,
        clear_side: ClearSide,
        duration: u32,
        behavior: Arc<dyn TimerBehavior>,
    ) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.insert(
            id,
            Timer {
                id,
                entity,
                clear_side,
                duration,
                behavior,
            },
        );
        id
    }

    pub fn get(&self, id: TimerId) -> Option<&Timer> {
        self.timers.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: TimerId) -> Option<&mut Timer> {
        self.timers.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: TimerId) -> Option<Timer> {
        self.timers.remove(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Timer> {
        self.timers.values()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub(crate) fn ids(&self) -> Vec<TimerId> {
        self.timers.keys().copied().collect()
    }

    pub(crate) fn discard_entity(&mut self, entity: EntityId) -> usize {
        let before = self.timers.len();
        self.timers.retain(|_, timer| timer.entity != entity);
        before - self.timers.len()
    }
}
