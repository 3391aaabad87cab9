//! Map data loader.
//!
//! A map file lists the grid size, height overrides, holes, features by
//! behavior name and pre-placed entities by template name.

use std::path::Path;

use serde::{Deserialize, Serialize};
use squeak_core::{Map, MapFeature, OddRCoord, Side};

use crate::catalog::{Catalog, feature_behavior};
use crate::loaders::{LoadResult, read_file};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MapDataRon {
    size: (u32, u32),
    #[serde(default)]
    heights: Vec<((i32, i32), i32)>,
    #[serde(default)]
    holes: Vec<(i32, i32)>,
    #[serde(default)]
    features: Vec<FeatureRon>,
    #[serde(default)]
    entities: Vec<EntityRon>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FeatureRon {
    behavior: String,
    shape: Vec<(i32, i32)>,
    #[serde(default)]
    health: Option<u32>,
    #[serde(default)]
    defense: i32,
    #[serde(default)]
    side: Option<Side>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct EntityRon {
    template: String,
    pos: (i32, i32),
    #[serde(default)]
    side: Option<Side>,
}

fn coord((x, y): (i32, i32)) -> OddRCoord {
    OddRCoord::new(x, y)
}

/// Loader for map data from RON files.
pub struct MapLoader;

impl MapLoader {
    /// Load a map from a RON file, resolving entity templates in `catalog`.
    ///
    /// Board-level validation (shapes inside the grid, colliding entities)
    /// happens when the map is turned into a board.
    pub fn load(path: &Path, catalog: &Catalog) -> LoadResult<Map> {
        let content = read_file(path)?;
        let data: MapDataRon = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse map RON: {}", e))?;

        let (size_x, size_y) = data.size;
        let mut map = Map::new(size_x, size_y)
            .map_err(|e| anyhow::anyhow!("Invalid map size {:?}: {}", data.size, e))?;
        for (pos, height) in data.heights {
            map.set_height(coord(pos), height)
                .map_err(|e| anyhow::anyhow!("Invalid height entry {:?}: {}", pos, e))?;
        }
        for pos in data.holes {
            map.remove_tile(coord(pos))
                .map_err(|e| anyhow::anyhow!("Invalid hole {:?}: {}", pos, e))?;
        }

        for feature in data.features {
            let behavior = feature_behavior(&feature.behavior)
                .ok_or_else(|| anyhow::anyhow!("Unknown feature '{}'", feature.behavior))?;
            let shape = feature.shape.into_iter().map(coord).collect();
            let mut map_feature = MapFeature::new(behavior, shape).with_defense(feature.defense);
            if let Some(health) = feature.health {
                map_feature = map_feature.with_health(health);
            }
            if let Some(side) = feature.side {
                map_feature = map_feature.with_side(side);
            }
            map.add_feature(map_feature);
        }

        for entity in data.entities {
            let template = catalog
                .template(&entity.template)
                .map_err(|e| anyhow::anyhow!("Failed to place entity: {}", e))?;
            map.add_entity(template.clone(), coord(entity.pos), entity.side);
        }

        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use squeak_core::{Board, FeatureKind};
    use tempfile::TempDir;

    use super::*;

    const SKIRMISH: &str = r#"(
        size: (6, 4),
        heights: [((2, 1), 2)],
        holes: [(5, 3)],
        features: [
            (behavior: "lair", shape: [(0, 1)], health: Some(10), side: Some(Rat)),
            (behavior: "lair", shape: [(5, 1)], health: Some(10), side: Some(Mouse)),
            (behavior: "deployment_zone", shape: [(1, 0), (1, 1)], side: Some(Rat)),
            (behavior: "crumbs_stack", shape: [(3, 2)]),
        ],
        entities: [
            (template: "TailBlazer", pos: (1, 2), side: Some(Rat)),
        ],
    )"#;

    #[test]
    fn loads_terrain_features_and_entities() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("skirmish.ron");
        fs::write(&path, SKIRMISH).unwrap();

        let catalog = Catalog::builtin().unwrap();
        let map = MapLoader::load(&path, &catalog).unwrap();
        assert_eq!((map.size_x(), map.size_y()), (6, 4));
        assert_eq!(map.height(OddRCoord::new(2, 1)), Some(2));
        assert_eq!(map.height(OddRCoord::new(5, 3)), None);
        assert_eq!(map.features().len(), 4);
        assert_eq!(map.entities().len(), 1);

        let board = Board::new(map).unwrap();
        assert_eq!(board.lairs(Side::Rat).count(), 1);
        assert_eq!(
            board
                .features()
                .filter(|feature| feature.kind() == FeatureKind::DeploymentZone)
                .count(),
            1
        );
        assert!(board.get_tile(OddRCoord::new(5, 3)).is_none());
    }

    #[test]
    fn unknown_names_fail_to_load() {
        let dir = TempDir::new().unwrap();
        let catalog = Catalog::builtin().unwrap();

        let feature = dir.path().join("feature.ron");
        fs::write(&feature, r#"(size: (2, 2), features: [(behavior: "moat", shape: [])])"#)
            .unwrap();
        assert!(MapLoader::load(&feature, &catalog).is_err());

        let entity = dir.path().join("entity.ron");
        fs::write(&entity, r#"(size: (2, 2), entities: [(template: "Ferret", pos: (0, 0))])"#)
            .unwrap();
        assert!(MapLoader::load(&entity, &catalog).is_err());

        let hole = dir.path().join("hole.ron");
        fs::write(&hole, "(size: (2, 2), holes: [(7, 7)])").unwrap();
        assert!(MapLoader::load(&hole, &catalog).is_err());

        let huge = dir.path().join("huge.ron");
        fs::write(&huge, "(size: (4294967295, 2))").unwrap();
        assert!(MapLoader::load(&huge, &catalog).is_err());
    }
}
