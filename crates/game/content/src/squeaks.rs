//! Squeaks that summon an entity template.

use squeak_core::{EngineResult, EntityTemplate, GameManager, OddRCoord, Squeak, SqueakKind};

/// Places `template` for the acting side on a free tile.
#[derive(Clone, Debug)]
pub struct SummonSqueak {
    template: EntityTemplate,
    crumb_cost: u32,
    kind: SqueakKind,
    ready: fn(&GameManager) -> bool,
}

fn always(_game: &GameManager) -> bool {
    true
}

impl SummonSqueak {
    pub fn rodent(template: EntityTemplate, crumb_cost: u32) -> Self {
        Self {
            template,
            crumb_cost,
            kind: SqueakKind::Rodent,
            ready: always,
        }
    }

    pub fn trick(template: EntityTemplate, crumb_cost: u32) -> Self {
        Self {
            template,
            crumb_cost,
            kind: SqueakKind::Trick,
            ready: always,
        }
    }

    /// Extra board condition checked before every placement.
    pub fn with_requirement(mut self, ready: fn(&GameManager) -> bool) -> Self {
        self.ready = ready;
        self
    }

    pub fn template(&self) -> &EntityTemplate {
        &self.template
    }
}

impl Squeak for SummonSqueak {
    fn name(&self) -> &str {
        self.template.name()
    }

    fn crumb_cost(&self) -> u32 {
        self.crumb_cost
    }

    fn kind(&self) -> SqueakKind {
        self.kind
    }

    fn place(&self, game: &mut GameManager, coord: OddRCoord) -> EngineResult<bool> {
        if !(self.ready)(game) || game.board().is_collision(coord) {
            return Ok(false);
        }
        let side = Some(game.turn());
        game.spawn_entity(&self.template, coord, side)?;
        Ok(true)
    }
}
