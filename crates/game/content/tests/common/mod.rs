//! Shared fixtures for squeak-content integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use squeak_content::{Catalog, CrumbsStack, DeploymentZone, Lair};
use squeak_core::{EntityId, GameManager, Map, MapFeature, OddRCoord, Side};

pub fn at(x: i32, y: i32) -> OddRCoord {
    OddRCoord::new(x, y)
}

pub fn catalog() -> Catalog {
    Catalog::builtin().unwrap()
}

/// 8x6 flat field. Lairs at (0, 2) and (7, 2), deployment zones one column
/// inward, and a crumb stack in the middle at (3, 3).
pub fn field(catalog: &Catalog, units: &[(&str, OddRCoord, Side)]) -> Map {
    let mut map = Map::new(8, 6).unwrap();
    map.add_feature(
        MapFeature::new(Arc::new(Lair), vec![at(0, 2)])
            .with_health(10)
            .with_side(Side::Rat),
    );
    map.add_feature(
        MapFeature::new(Arc::new(Lair), vec![at(7, 2)])
            .with_health(10)
            .with_side(Side::Mouse),
    );
    map.add_feature(
        MapFeature::new(Arc::new(DeploymentZone), vec![at(1, 1), at(1, 2), at(1, 3)])
            .with_side(Side::Rat),
    );
    map.add_feature(
        MapFeature::new(Arc::new(DeploymentZone), vec![at(6, 1), at(6, 2), at(6, 3)])
            .with_side(Side::Mouse),
    );
    map.add_feature(MapFeature::new(Arc::new(CrumbsStack), vec![at(3, 3)]));
    for (name, pos, side) in units {
        map.add_entity(catalog.template(name).unwrap().clone(), *pos, Some(*side));
    }
    map
}

pub fn game(catalog: &Catalog, units: &[(&str, OddRCoord, Side)]) -> GameManager {
    GameManager::builder(field(catalog, units)).build().unwrap()
}

pub fn unit_at(game: &GameManager, coord: OddRCoord) -> EntityId {
    game.board().entities_at(coord).next().unwrap().id()
}

/// Ends both sides' turns once.
pub fn full_round(game: &mut GameManager) {
    game.end_turn().unwrap();
    game.end_turn().unwrap();
}
