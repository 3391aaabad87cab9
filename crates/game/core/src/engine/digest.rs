use sha2::{Digest, Sha256};

use super::GameManager;
use crate::hex::OddRCoord;
use crate::side::Side;

/// Fixed-width little-endian field feeder over a SHA-256 hasher.
struct StateHasher(Sha256);

impl StateHasher {
    fn u32(&mut self, value: u32) -> &mut Self {
        self.0.update(value.to_le_bytes());
        self
    }

    fn i32(&mut self, value: i32) -> &mut Self {
        self.0.update(value.to_le_bytes());
        self
    }

    fn u64(&mut self, value: u64) -> &mut Self {
        self.0.update(value.to_le_bytes());
        self
    }

    fn flag(&mut self, value: bool) -> &mut Self {
        self.0.update([u8::from(value)]);
        self
    }

    fn side(&mut self, side: Option<Side>) -> &mut Self {
        self.0.update([Side::to_index(side)]);
        self
    }

    /// `u32::MAX` stands in for "none"; real health and durations never reach it.
    fn opt(&mut self, value: Option<u32>) -> &mut Self {
        self.u32(value.unwrap_or(u32::MAX))
    }

    fn coord(&mut self, coord: OddRCoord) -> &mut Self {
        self.i32(coord.x).i32(coord.y)
    }

    /// Length-prefixed so adjacent strings cannot alias.
    fn str(&mut self, value: &str) -> &mut Self {
        self.u64(value.len() as u64);
        self.0.update(value.as_bytes());
        self
    }
}

impl GameManager {
    /// SHA-256 over every piece of state that influences future outcomes.
    ///
    /// Two managers built from the same map, decks and seed that receive the
    /// same calls produce the same digest.
    pub fn state_digest(&self) -> [u8; 32] {
        let mut h = StateHasher(Sha256::new());
        h.side(Some(self.turn))
            .side(Some(self.first_turn))
            .u32(self.turn_count)
            .u32(self.crumbs)
            .u64(self.seed)
            .u64(self.rolls)
            .side(self.winner)
            .flag(self.is_selecting_target());

        for entity in self.board.entities() {
            h.u32(entity.id.0)
                .str(&entity.name)
                .coord(entity.pos)
                .side(entity.side)
                .opt(entity.health)
                .i32(entity.defense)
                .i32(entity.height)
                .flag(entity.collision);
            if let Some(rodent) = &entity.rodent {
                h.i32(rodent.speed)
                    .i32(rodent.attack)
                    .u32(rodent.move_stamina)
                    .u32(rodent.skill_stamina)
                    .u32(rodent.stun);
            }
            for (name, effect) in entity.effects() {
                h.str(name).u32(effect.0);
            }
        }
        for feature in self.board.features() {
            h.u32(feature.id.0).opt(feature.health).side(feature.side);
        }
        for effect in self.effects.iter() {
            h.u32(effect.id.0)
                .u32(effect.entity.0)
                .str(effect.name())
                .i32(effect.intensity)
                .opt(effect.duration)
                .opt(effect.source.map(|source| source.0));
            for buried in &effect.suppressed {
                h.u32(buried.0);
            }
        }
        for timer in self.timers.iter() {
            h.u32(timer.id.0).u32(timer.entity.0).u32(timer.duration);
        }
        for (side, hand) in self.hands.iter() {
            h.side(Some(side));
            for slot in hand {
                h.str(slot.as_ref().map_or("", |squeak| squeak.name()));
            }
        }
        self.crumb_modifier_digest(&mut h);

        h.0.finalize().into()
    }

    fn crumb_modifier_digest(&self, h: &mut StateHasher) {
        for side in [Side::Rat, Side::Mouse] {
            h.i32(self.crumb_modifier.side_percent(side))
                .i32(self.crumb_modifier.side_adder(side));
        }
    }
}
