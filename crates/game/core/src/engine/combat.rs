use std::sync::Arc;

use tracing::{debug, info, trace};

use super::GameManager;
use crate::board::{Damage, DamageReport};
use crate::entity::EntityId;
use crate::error::EngineResult;
use crate::event::GameEvent;
use crate::feature::{FeatureId, FeatureKind};
use crate::side::Side;

impl GameManager {
    /// Damages an entity. A death removes it along with its effects and
    /// timers, and fires exit hooks on the features it stood on.
    pub fn damage_entity(
        &mut self,
        entity: EntityId,
        damage: impl Into<Damage>,
    ) -> EngineResult<DamageReport> {
        self.strike(entity, damage.into(), None)
    }

    /// Like [`damage_entity`](Self::damage_entity), attributed to `source`.
    pub fn damage_entity_by(
        &mut self,
        entity: EntityId,
        damage: impl Into<Damage>,
        source: EntityId,
    ) -> EngineResult<DamageReport> {
        self.strike(entity, damage.into(), Some(source))
    }

    fn strike(
        &mut self,
        entity: EntityId,
        damage: Damage,
        source: Option<EntityId>,
    ) -> EngineResult<DamageReport> {
        self.ensure_not_selecting()?;
        let damage = match damage {
            Damage::Amount(amount) => {
                let behavior = Arc::clone(self.board.get_entity(entity)?.behavior());
                match behavior.on_damage_taken(self, entity, amount, source)? {
                    Some(0) => return Ok(self.miss(entity, source)),
                    substitute => Damage::Amount(substitute.unwrap_or(amount)),
                }
            }
            Damage::InstantKill => Damage::InstantKill,
        };
        let target = self.board.get_entity(entity)?;
        let (pos, side) = (target.pos(), target.side());

        let report = self.board.damage_entity(entity, damage)?;
        trace!(%entity, damage = report.damage, hp_loss = report.hp_loss, "entity damaged");
        if report.died {
            let effects = self.effects.discard_entity(entity);
            let timers = self.timers.discard_entity(entity);
            trace!(%entity, effects, timers, "discarded schedules of dead entity");
            self.feature_hooks(entity, side, Some(pos), None)?;
        }
        Ok(report)
    }

    fn miss(&mut self, entity: EntityId, source: Option<EntityId>) -> DamageReport {
        debug!(%entity, ?source, "attack missed");
        self.emit(GameEvent::EntityDamaged {
            entity,
            damage: 0,
            hp_loss: 0,
        });
        DamageReport {
            damage: 0,
            hp_loss: 0,
            died: false,
            death_vetoed: false,
        }
    }

    /// Damages a feature. Destroying a side's last lair ends the match.
    pub fn damage_feature(
        &mut self,
        feature: FeatureId,
        damage: impl Into<Damage>,
    ) -> EngineResult<DamageReport> {
        self.ensure_not_selecting()?;
        let target = self.board.get_feature(feature)?;
        let (kind, side) = (target.kind(), target.side());

        let report = self.board.damage_feature(feature, damage.into())?;
        if let (true, FeatureKind::Lair, Some(side)) = (report.died, kind, side) {
            self.check_lairs(side);
        }
        Ok(report)
    }

    /// Heals up to max health; returns the amount restored.
    pub fn heal_entity(&mut self, entity: EntityId, amount: u32) -> EngineResult<u32> {
        self.ensure_not_selecting()?;
        let healed = self.board.heal_entity(entity, amount)?;
        trace!(%entity, healed, "entity healed");
        Ok(healed)
    }

    fn check_lairs(&mut self, side: Side) {
        if self.winner.is_some() || self.board.lairs(side).next().is_some() {
            return;
        }
        let winner = side.other();
        self.winner = Some(winner);
        info!(%winner, loser = %side, turn_count = self.turn_count, "game over");
        self.emit(GameEvent::GameOver { winner });
    }
}
