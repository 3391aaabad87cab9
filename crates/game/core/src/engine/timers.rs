use std::sync::Arc;

use tracing::{debug, trace};

use super::{GameManager, TurnChange};
use crate::effect::ClearSide;
use crate::entity::EntityId;
use crate::error::{EngineError, EngineResult};
use crate::event::GameEvent;
use crate::timer::{TimerBehavior, TimerId};

impl GameManager {
    /// Schedules a countdown on `entity` that fires after `duration` matching
    /// turn boundaries.
    pub fn apply_timer(
        &mut self,
        entity: EntityId,
        clear_side: ClearSide,
        duration: u32,
        behavior: Arc<dyn TimerBehavior>,
    ) -> EngineResult<TimerId> {
        self.ensure_not_selecting()?;
        if duration == 0 {
            return Err(EngineError::InvalidArgument("timer duration must be positive"));
        }
        self.board.get_entity(entity)?;
        let name = behavior.name();
        let id = self.timers.insert(entity, clear_side, duration, behavior);
        trace!(%entity, %id, name, duration, %clear_side, "timer scheduled");
        Ok(id)
    }

    /// Runs every timer's turn hook, then counts down those whose clear side
    /// matches the departing side.
    pub(super) fn tick_timers(&mut self, change: TurnChange) -> EngineResult<()> {
        let second = self.first_turn.other();
        for id in self.timers.ids() {
            let Some(timer) = self.timers.get(id) else {
                continue;
            };
            let (behavior, context) = (timer.behavior.clone(), timer.context());
            behavior.on_turn_change(self, context, change)?;

            let Some(timer) = self.timers.get(id) else {
                continue;
            };
            let owner = self.board.entity(timer.entity).and_then(|entity| entity.side());
            if !timer.clear_side.matches(owner, change.from, second) {
                continue;
            }

            let Some(timer) = self.timers.get_mut(id) else {
                continue;
            };
            timer.duration = timer.duration.saturating_sub(1);
            if timer.duration > 0 {
                continue;
            }
            let Some(timer) = self.timers.remove(id) else {
                continue;
            };
            debug!(entity = %timer.entity, %id, name = timer.name(), "timer expired");
            self.emit(GameEvent::TimerExpired {
                entity: timer.entity,
                timer: id,
            });
            timer.behavior.on_timer_over(self, timer.context())?;
        }
        Ok(())
    }
}
