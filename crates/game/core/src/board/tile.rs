use crate::entity::EntityId;
use crate::feature::FeatureId;
use crate::hex::OddRCoord;

/// One cell of the board.
///
/// Occupants are stored bottom to top; the last entry is the topmost.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    pub(crate) coord: OddRCoord,
    pub(crate) height: i32,
    pub(crate) entities: Vec<EntityId>,
    pub(crate) features: Vec<FeatureId>,
}

impl Tile {
    pub(crate) fn new(coord: OddRCoord, height: i32) -> Self {
        Self {
            coord,
            height,
            entities: Vec::new(),
            features: Vec::new(),
        }
    }

    pub fn coord(&self) -> OddRCoord {
        self.coord
    }

    /// Base terrain height.
    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn entities(&self) -> &[EntityId] {
        &self.entities
    }

    pub fn features(&self) -> &[FeatureId] {
        &self.features
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub(crate) fn remove_entity(&mut self, entity: EntityId) -> bool {
        match self.entities.iter().position(|id| *id == entity) {
            Some(index) => {
                self.entities.remove(index);
                true
            }
            None => false,
        }
    }

    pub(crate) fn remove_feature(&mut self, feature: FeatureId) {
        self.features.retain(|id| *id != feature);
    }
}
