//! Constructed map description consumed by [`Board::new`](super::Board::new).
//!
//! File formats are handled elsewhere; a [`Map`] is already in memory.

use std::sync::Arc;

use crate::entity::EntityTemplate;
use crate::error::{EngineError, EngineResult};
use crate::feature::FeatureBehavior;
use crate::hex::OddRCoord;
use crate::side::Side;

/// Entity placed on the map before the match starts.
#[derive(Clone, Debug)]
pub struct MapEntity {
    pub template: EntityTemplate,
    pub pos: OddRCoord,
    pub side: Option<Side>,
}

/// Feature placed on the map before the match starts.
#[derive(Clone)]
pub struct MapFeature {
    pub behavior: Arc<dyn FeatureBehavior>,
    pub shape: Vec<OddRCoord>,
    pub health: Option<u32>,
    pub defense: i32,
    pub side: Option<Side>,
}

impl MapFeature {
    /// Feature covering the absolute coordinates in `shape`.
    pub fn new(behavior: Arc<dyn FeatureBehavior>, shape: Vec<OddRCoord>) -> Self {
        Self {
            behavior,
            shape,
            health: None,
            defense: 0,
            side: None,
        }
    }

    /// Feature whose `offsets` are relative to `origin`.
    pub fn at(
        behavior: Arc<dyn FeatureBehavior>,
        origin: OddRCoord,
        offsets: impl IntoIterator<Item = OddRCoord>,
    ) -> Self {
        Self::new(
            behavior,
            offsets.into_iter().map(|offset| origin + offset).collect(),
        )
    }

    pub fn with_health(mut self, health: u32) -> Self {
        self.health = Some(health);
        self
    }

    pub fn with_defense(mut self, defense: i32) -> Self {
        self.defense = defense;
        self
    }

    pub fn with_side(mut self, side: Side) -> Self {
        self.side = Some(side);
        self
    }
}

impl std::fmt::Debug for MapFeature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapFeature")
            .field("name", &self.behavior.name())
            .field("shape", &self.shape)
            .field("health", &self.health)
            .field("side", &self.side)
            .finish()
    }
}

/// Tile heights plus pre-placed entities and features.
///
/// Heights are row-major; `None` marks a hole with no tile.
#[derive(Clone, Debug)]
pub struct Map {
    pub(crate) size_x: u32,
    pub(crate) size_y: u32,
    pub(crate) heights: Vec<Option<i32>>,
    pub(crate) entities: Vec<MapEntity>,
    pub(crate) features: Vec<MapFeature>,
}

impl Map {
    /// Flat map of the given size at height 0.
    pub fn new(size_x: u32, size_y: u32) -> EngineResult<Self> {
        let cells = Self::cell_count(size_x, size_y)?;
        Self::from_heights(size_x, size_y, vec![Some(0); cells])
    }

    /// Map from row-major heights. Fails if `heights` does not match the size.
    pub fn from_heights(size_x: u32, size_y: u32, heights: Vec<Option<i32>>) -> EngineResult<Self> {
        if heights.len() != Self::cell_count(size_x, size_y)? {
            return Err(EngineError::InvalidArgument(
                "height grid does not match map dimensions",
            ));
        }
        Ok(Self {
            size_x,
            size_y,
            heights,
            entities: Vec::new(),
            features: Vec::new(),
        })
    }

    /// Tile count, rejecting grids whose coordinates would not fit an `i32`.
    fn cell_count(size_x: u32, size_y: u32) -> EngineResult<usize> {
        let too_large = EngineError::InvalidArgument("map dimensions are too large");
        if i32::try_from(size_x).is_err() || i32::try_from(size_y).is_err() {
            return Err(too_large);
        }
        size_x
            .checked_mul(size_y)
            .and_then(|cells| usize::try_from(cells).ok())
            .ok_or(too_large)
    }

    pub fn size_x(&self) -> u32 {
        self.size_x
    }

    pub fn size_y(&self) -> u32 {
        self.size_y
    }

    fn index(&self, coord: OddRCoord) -> EngineResult<usize> {
        let inside = coord.x >= 0
            && coord.y >= 0
            && (coord.x as u32) < self.size_x
            && (coord.y as u32) < self.size_y;
        if !inside {
            return Err(EngineError::out_of_bounds(coord));
        }
        Ok(coord.y as usize * self.size_x as usize + coord.x as usize)
    }

    pub fn height(&self, coord: OddRCoord) -> Option<i32> {
        self.index(coord).ok().and_then(|index| self.heights[index])
    }

    pub fn set_height(&mut self, coord: OddRCoord, height: i32) -> EngineResult<()> {
        let index = self.index(coord)?;
        self.heights[index] = Some(height);
        Ok(())
    }

    /// Removes the tile at `coord`, leaving a hole.
    pub fn remove_tile(&mut self, coord: OddRCoord) -> EngineResult<()> {
        let index = self.index(coord)?;
        self.heights[index] = None;
        Ok(())
    }

    pub fn add_entity(&mut self, template: EntityTemplate, pos: OddRCoord, side: Option<Side>) {
        self.entities.push(MapEntity {
            template,
            pos,
            side,
        });
    }

    pub fn add_feature(&mut self, feature: MapFeature) {
        self.features.push(feature);
    }

    pub fn entities(&self) -> &[MapEntity] {
        &self.entities
    }

    pub fn features(&self) -> &[MapFeature] {
        &self.features
    }
}
