//! Squeaks (placeable unit and trick cards) and the deck collaborator.

use std::sync::Arc;

use crate::engine::GameManager;
use crate::error::EngineResult;
use crate::hex::OddRCoord;
use crate::rng::Dice;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum SqueakKind {
    Rodent,
    Trick,
}

/// A card held in hand.
pub trait Squeak: Send + Sync {
    fn name(&self) -> &str;

    fn crumb_cost(&self) -> u32;

    fn kind(&self) -> SqueakKind;

    /// Whether placement is limited to the placing side's deployment zones.
    fn is_deployment_zone_only(&self) -> bool {
        true
    }

    /// Puts the squeak into play at `coord`. `Ok(false)` means the spot was
    /// unusable and nothing changed.
    fn place(&self, game: &mut GameManager, coord: OddRCoord) -> EngineResult<bool>;
}

/// Source of squeaks for one side.
pub trait Deck: Send {
    /// Next squeak, or `None` when nothing can be drawn.
    fn draw(&mut self, dice: &mut Dice<'_>) -> Option<Arc<dyn Squeak>>;

    fn remaining(&self) -> usize;
}

/// Deck that never yields anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyDeck;

impl Deck for EmptyDeck {
    fn draw(&mut self, _dice: &mut Dice<'_>) -> Option<Arc<dyn Squeak>> {
        None
    }

    fn remaining(&self) -> usize {
        0
    }
}
