use tracing::debug;

use super::GameManager;
use crate::error::EngineResult;
use crate::event::GameEvent;
use crate::side::Side;

/// Turn boundary handed to `on_turn_change` hooks.
///
/// Hooks run before the side flips, so [`GameManager::turn`] still reports
/// `from` while they execute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnChange {
    /// Side ending its turn.
    pub from: Side,
    /// Side about to act.
    pub to: Side,
    /// Round counter before the flip.
    pub turn_count: u32,
}

impl GameManager {
    /// Ends the acting side's turn.
    ///
    /// Order: effect hooks, entity hooks, timer countdown, effect expiry,
    /// side flip (with round tick on wrap), stamina refill, crumb grant.
    pub fn end_turn(&mut self) -> EngineResult<()> {
        self.ensure_idle()?;

        let from = self.turn;
        let to = from.other();
        let change = TurnChange {
            from,
            to,
            turn_count: self.turn_count,
        };

        self.effect_turn_hooks(change)?;
        self.entity_turn_hooks(change)?;
        self.tick_timers(change)?;
        self.expire_effects(from)?;

        self.turn = to;
        if to == self.first_turn {
            self.turn_count += 1;
            self.effects.tick_round();
        }

        let refilled: Vec<_> = self.board.rodents_of(to).map(|entity| entity.id()).collect();
        for id in refilled {
            if let Some(rodent) = self.board.entity_mut(id)?.rodent.as_mut() {
                rodent.refill();
            }
        }

        let leftover_crumbs = self.crumbs;
        self.crumbs = self.crumb_modifier.crumbs(&self.config, self.turn_count, to);

        debug!(
            %from,
            %to,
            turn_count = self.turn_count,
            leftover_crumbs,
            crumbs = self.crumbs,
            "turn ended"
        );
        self.emit(GameEvent::TurnEnded {
            from,
            to,
            turn_count: self.turn_count,
            leftover_crumbs,
            new_crumbs: self.crumbs,
        });
        Ok(())
    }

    /// Entity hooks run in id order over a snapshot; entities killed by an
    /// earlier hook are skipped.
    fn entity_turn_hooks(&mut self, change: TurnChange) -> EngineResult<()> {
        let ids: Vec<_> = self.board.entities().map(|entity| entity.id()).collect();
        for id in ids {
            let Some(behavior) = self.board.entity(id).map(|entity| entity.behavior().clone())
            else {
                continue;
            };
            behavior.on_turn_change(self, id, change)?;
        }
        Ok(())
    }
}
