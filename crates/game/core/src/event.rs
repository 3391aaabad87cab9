//! Ordered domain events produced by every mutation.
//!
//! The engine appends to a FIFO [`EventQueue`]; frontends and AI drain it
//! after each call. Events are plain data and never hold references into the
//! board.

use std::collections::VecDeque;

use crate::effect::EffectId;
use crate::entity::{EntityId, SkillCompleted};
use crate::feature::FeatureId;
use crate::hex::OddRCoord;
use crate::side::Side;
use crate::timer::TimerId;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameEvent {
    EntitySpawned {
        entity: EntityId,
        name: String,
        pos: OddRCoord,
        side: Option<Side>,
    },
    EntityMoved {
        entity: EntityId,
        path: Vec<OddRCoord>,
    },
    EntityDamaged {
        entity: EntityId,
        damage: u32,
        hp_loss: u32,
    },
    EntityHealed {
        entity: EntityId,
        amount: u32,
    },
    EntityDied {
        entity: EntityId,
        pos: OddRCoord,
    },
    FeatureDamaged {
        feature: FeatureId,
        damage: u32,
        hp_loss: u32,
    },
    FeatureDied {
        feature: FeatureId,
    },
    EffectApplied {
        entity: EntityId,
        effect: EffectId,
        name: String,
        intensity: i32,
        duration: Option<u32>,
        overriding: bool,
    },
    EffectCleared {
        entity: EntityId,
        effect: EffectId,
        name: String,
        overridden: bool,
    },
    TimerExpired {
        entity: EntityId,
        timer: TimerId,
    },
    SkillActivated {
        entity: EntityId,
        skill_index: usize,
        skill: String,
        outcome: SkillCompleted,
    },
    SqueakPlaced {
        side: Side,
        hand_index: usize,
        name: String,
        coord: OddRCoord,
    },
    TurnEnded {
        from: Side,
        to: Side,
        turn_count: u32,
        leftover_crumbs: u32,
        new_crumbs: u32,
    },
    GameOver {
        winner: Side,
    },
}

/// FIFO log of [`GameEvent`]s.
#[derive(Clone, Debug, Default)]
pub struct EventQueue {
    events: VecDeque<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        tracing::trace!(?event, "event");
        self.events.push_back(event);
    }

    pub fn pop(&mut self) -> Option<GameEvent> {
        self.events.pop_front()
    }

    /// Oldest event, without removing it.
    pub fn peek(&self) -> Option<&GameEvent> {
        self.events.front()
    }

    pub fn drain(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
