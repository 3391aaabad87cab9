//! Board and tile model.
//!
//! The [`Board`] owns every entity and feature in id-keyed arenas. Tiles only
//! hold ordered id stacks, so moving or removing an occupant never leaves a
//! dangling reference. Height, collision and line-of-sight rules are expressed
//! as `is_blocked(candidate, source)` predicates fed into the hex routines.
mod map;
mod tile;

use std::collections::{BTreeMap, BTreeSet};

pub use map::{Map, MapEntity, MapFeature};
pub use tile::Tile;

use tracing::{debug, trace, warn};

use crate::config::GameConfig;
use crate::entity::{Entity, EntityId, EntityTemplate, SkillDescriptor};
use crate::error::{EngineError, EngineResult, TargetIssue};
use crate::event::{EventQueue, GameEvent};
use crate::feature::{Feature, FeatureId, FeatureKind};
use crate::hex::OddRCoord;
use crate::side::Side;

/// Incoming damage before defense.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Damage {
    Amount(u32),
    /// Removes all remaining health, ignoring defense and damage hooks.
    InstantKill,
}

impl From<u32> for Damage {
    fn from(amount: u32) -> Self {
        Self::Amount(amount)
    }
}

/// Result of a damage primitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamageReport {
    /// Damage after hooks and defense.
    pub damage: u32,
    /// Health actually removed.
    pub hp_loss: u32,
    pub died: bool,
    /// Health reached 0 but the death hook refused.
    pub death_vetoed: bool,
}

/// Which occupants make a tile a valid skill target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TargetMode {
    /// Any damageable occupant not on the caster's side.
    EnemyWithHp,
    /// Any occupant not on the caster's side.
    Enemy,
    /// Any occupant on the caster's side.
    Ally,
    /// Any damageable occupant on the caster's side.
    AllyWithHp,
    /// Any occupant at all.
    Any,
    /// Every tile on the board.
    AnyTile,
}

pub struct Board {
    size_x: u32,
    size_y: u32,
    tiles: Vec<Option<Tile>>,
    entities: BTreeMap<EntityId, Entity>,
    features: BTreeMap<FeatureId, Feature>,
    next_entity: u32,
    next_feature: u32,
    jump_height: u32,
    events: EventQueue,
}

impl Board {
    /// Builds the board with the default jump height.
    pub fn new(map: Map) -> EngineResult<Self> {
        Self::with_jump_height(map, GameConfig::DEFAULT_JUMP_HEIGHT)
    }

    /// Builds the board, spawning map entities in order and stacking every
    /// feature onto each tile of its shape.
    pub fn with_jump_height(map: Map, jump_height: u32) -> EngineResult<Self> {
        let Map {
            size_x,
            size_y,
            heights,
            entities,
            features,
        } = map;

        let tiles = heights
            .into_iter()
            .enumerate()
            .map(|(index, height)| {
                let coord = OddRCoord::new(
                    (index % size_x as usize) as i32,
                    (index / size_x as usize) as i32,
                );
                height.map(|height| Tile::new(coord, height))
            })
            .collect();

        let mut board = Self {
            size_x,
            size_y,
            tiles,
            entities: BTreeMap::new(),
            features: BTreeMap::new(),
            next_entity: 0,
            next_feature: 0,
            jump_height,
            events: EventQueue::new(),
        };

        for feature in features {
            board.add_feature(feature)?;
        }
        for entity in entities {
            board.add_entity(&entity.template, entity.pos, entity.side)?;
        }
        debug!(
            size_x,
            size_y,
            entities = board.entities.len(),
            features = board.features.len(),
            "board built"
        );
        Ok(board)
    }

    // ------------------------------------------------------------------
    // Geometry and lookup
    // ------------------------------------------------------------------

    pub fn size_x(&self) -> u32 {
        self.size_x
    }

    pub fn size_y(&self) -> u32 {
        self.size_y
    }

    pub fn jump_height(&self) -> u32 {
        self.jump_height
    }

    fn index(&self, coord: OddRCoord) -> Option<usize> {
        let inside = coord.x >= 0
            && coord.y >= 0
            && (coord.x as u32) < self.size_x
            && (coord.y as u32) < self.size_y;
        inside.then(|| coord.y as usize * self.size_x as usize + coord.x as usize)
    }

    /// `None` outside the grid or on a hole.
    pub fn get_tile(&self, coord: OddRCoord) -> Option<&Tile> {
        self.index(coord).and_then(|index| self.tiles[index].as_ref())
    }

    fn tile_mut(&mut self, coord: OddRCoord) -> Option<&mut Tile> {
        self.index(coord)
            .and_then(|index| self.tiles[index].as_mut())
    }

    /// Like [`Board::get_tile`] but fails with `InvalidPosition`.
    pub fn tile(&self, coord: OddRCoord) -> EngineResult<&Tile> {
        self.get_tile(coord)
            .ok_or(EngineError::out_of_bounds(coord))
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().flatten()
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_entity(&self, id: EntityId) -> EngineResult<&Entity> {
        self.entities.get(&id).ok_or(EngineError::EntityNotFound(id))
    }

    pub(crate) fn entity_mut(&mut self, id: EntityId) -> EngineResult<&mut Entity> {
        self.entities
            .get_mut(&id)
            .ok_or(EngineError::EntityNotFound(id))
    }

    /// Live entities in spawn order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn entities_of(&self, side: Option<Side>) -> impl Iterator<Item = &Entity> {
        self.entities.values().filter(move |entity| entity.side == side)
    }

    pub fn rodents_of(&self, side: Side) -> impl Iterator<Item = &Entity> {
        self.entities_of(Some(side))
            .filter(|entity| entity.is_rodent())
    }

    /// Entities on `coord`, bottom to top.
    pub fn entities_at(&self, coord: OddRCoord) -> impl Iterator<Item = &Entity> {
        self.get_tile(coord)
            .into_iter()
            .flat_map(|tile| tile.entities.iter())
            .filter_map(|id| self.entities.get(id))
    }

    pub fn feature(&self, id: FeatureId) -> Option<&Feature> {
        self.features.get(&id)
    }

    pub fn get_feature(&self, id: FeatureId) -> EngineResult<&Feature> {
        self.features
            .get(&id)
            .ok_or(EngineError::FeatureNotFound(id))
    }

    pub(crate) fn feature_mut(&mut self, id: FeatureId) -> EngineResult<&mut Feature> {
        self.features
            .get_mut(&id)
            .ok_or(EngineError::FeatureNotFound(id))
    }

    pub fn features(&self) -> impl Iterator<Item = &Feature> {
        self.features.values()
    }

    /// Features on `coord`, bottom to top.
    pub fn features_at(&self, coord: OddRCoord) -> impl Iterator<Item = &Feature> {
        self.get_tile(coord)
            .into_iter()
            .flat_map(|tile| tile.features.iter())
            .filter_map(|id| self.features.get(id))
    }

    pub fn lairs(&self, side: Side) -> impl Iterator<Item = &Feature> {
        self.features_of_kind(FeatureKind::Lair, Some(side))
    }

    pub fn deployment_zones(&self, side: Option<Side>) -> impl Iterator<Item = &Feature> {
        self.features_of_kind(FeatureKind::DeploymentZone, side)
    }

    fn features_of_kind(
        &self,
        kind: FeatureKind,
        side: Option<Side>,
    ) -> impl Iterator<Item = &Feature> {
        self.features
            .values()
            .filter(move |feature| feature.kind() == kind && feature.side == side)
    }

    /// Base height plus the tallest occupant not on `side`.
    pub fn total_height(&self, coord: OddRCoord, side: Option<Side>) -> Option<i32> {
        let tile = self.get_tile(coord)?;
        let tallest = self
            .entities_at(coord)
            .filter(|entity| entity.side != side)
            .map(|entity| entity.height)
            .max()
            .unwrap_or(0);
        Some(tile.height + tallest)
    }

    /// True off the board, or when a colliding entity or feature is present.
    pub fn is_collision(&self, coord: OddRCoord) -> bool {
        let Some(tile) = self.get_tile(coord) else {
            return true;
        };
        self.tile_collides(tile, true)
    }

    fn tile_collides(&self, tile: &Tile, mover_collides: bool) -> bool {
        let entity_blocks = mover_collides
            && tile
                .entities
                .iter()
                .filter_map(|id| self.entities.get(id))
                .any(|entity| entity.collision);
        entity_blocks
            || tile
                .features
                .iter()
                .filter_map(|id| self.features.get(id))
                .any(Feature::is_collision)
    }

    /// Movement predicate for a mover with the given collision flag and side.
    pub fn is_coord_blocked(
        &self,
        collision: bool,
        side: Option<Side>,
        jump_height: u32,
    ) -> impl Fn(OddRCoord, OddRCoord) -> bool + '_ {
        move |target, source| {
            let Some(target_tile) = self.get_tile(target) else {
                return true;
            };
            if self.tile_collides(target_tile, collision) {
                return true;
            }
            let (Some(target_height), Some(source_height)) = (
                self.total_height(target, side),
                self.total_height(source, side),
            ) else {
                return true;
            };
            i64::from(target_height) - i64::from(source_height) > i64::from(jump_height)
        }
    }

    // ------------------------------------------------------------------
    // Queries used by movement and targeting
    // ------------------------------------------------------------------

    /// Every coordinate `entity` can walk to within its speed.
    pub fn get_reachable_coords(&self, entity: EntityId) -> EngineResult<BTreeSet<OddRCoord>> {
        let entity = self.get_entity(entity)?;
        Ok(entity.pos.get_reachable_coords(
            entity.speed(),
            self.is_coord_blocked(entity.collision, entity.side, self.jump_height),
            false,
        ))
    }

    /// Shortest walkable path for `entity`, both endpoints included.
    pub fn path_find(
        &self,
        entity: EntityId,
        goal: OddRCoord,
    ) -> EngineResult<Option<Vec<OddRCoord>>> {
        self.path_find_with_jump(entity, goal, self.jump_height)
    }

    pub fn path_find_with_jump(
        &self,
        entity: EntityId,
        goal: OddRCoord,
        jump_height: u32,
    ) -> EngineResult<Option<Vec<OddRCoord>>> {
        let entity = self.get_entity(entity)?;
        Ok(entity.pos.path_find(
            goal,
            self.is_coord_blocked(entity.collision, entity.side, jump_height),
        ))
    }

    /// True if no tile after `start` on the line to `end`, `end` included,
    /// rises above the start's total height plus `altitude`. Off-board cells
    /// block.
    pub fn line_of_sight(
        &self,
        start: OddRCoord,
        end: OddRCoord,
        altitude: u32,
        side: Option<Side>,
    ) -> bool {
        let Some(start_height) = self.total_height(start, side) else {
            return false;
        };
        let ceiling = i64::from(start_height) + i64::from(altitude);
        start.line_draw(end).iter().skip(1).all(|coord| {
            self.total_height(*coord, side)
                .is_some_and(|height| i64::from(height) <= ceiling)
        })
    }

    /// Coordinates within `skill.reach` that `entity` has line of sight to.
    pub fn get_attackable_coords(
        &self,
        entity: EntityId,
        skill: &SkillDescriptor,
    ) -> EngineResult<Vec<OddRCoord>> {
        let entity = self.get_entity(entity)?;
        let reach = skill.reach.ok_or(EngineError::InvalidArgument(
            "attackable coords requested for a skill without reach",
        ))?;
        let reach = i32::try_from(reach).unwrap_or(i32::MAX);
        let altitude = skill.altitude.unwrap_or(0);
        Ok(entity
            .pos
            .all_in_range(reach)
            .into_iter()
            .filter(|target| self.line_of_sight(entity.pos, *target, altitude, entity.side))
            .collect())
    }

    /// Keeps the coordinates whose occupants satisfy `mode` relative to `side`.
    pub fn filter_targets(
        &self,
        coords: impl IntoIterator<Item = OddRCoord>,
        side: Option<Side>,
        mode: TargetMode,
        features_targetable: bool,
    ) -> Vec<OddRCoord> {
        coords
            .into_iter()
            .filter(|coord| {
                if self.get_tile(*coord).is_none() {
                    return false;
                }
                let entity_hit = self
                    .entities_at(*coord)
                    .any(|e| Self::matches_mode(mode, e.side, e.is_damageable(), side));
                let feature_hit = features_targetable
                    && self
                        .features_at(*coord)
                        .any(|f| Self::matches_mode(mode, f.side, f.is_damageable(), side));
                mode == TargetMode::AnyTile || entity_hit || feature_hit
            })
            .collect()
    }

    fn matches_mode(
        mode: TargetMode,
        occupant: Option<Side>,
        damageable: bool,
        side: Option<Side>,
    ) -> bool {
        match mode {
            TargetMode::EnemyWithHp => occupant != side && damageable,
            TargetMode::Enemy => occupant != side,
            TargetMode::Ally => occupant == side,
            TargetMode::AllyWithHp => occupant == side && damageable,
            TargetMode::Any | TargetMode::AnyTile => true,
        }
    }

    // ------------------------------------------------------------------
    // Mutation primitives (driven by GameManager)
    // ------------------------------------------------------------------

    pub(crate) fn events_mut(&mut self) -> &mut EventQueue {
        &mut self.events
    }

    pub fn events(&self) -> &EventQueue {
        &self.events
    }

    pub(crate) fn add_entity(
        &mut self,
        template: &EntityTemplate,
        pos: OddRCoord,
        side: Option<Side>,
    ) -> EngineResult<EntityId> {
        let id = EntityId(self.next_entity);
        let tile = self
            .tile_mut(pos)
            .ok_or(EngineError::out_of_bounds(pos))?;
        tile.entities.push(id);
        self.next_entity += 1;

        let entity = template.instantiate(id, pos, side);
        debug!(%id, name = entity.name(), %pos, ?side, "entity spawned");
        self.events.push(GameEvent::EntitySpawned {
            entity: id,
            name: entity.name.clone(),
            pos,
            side,
        });
        self.entities.insert(id, entity);
        Ok(id)
    }

    pub(crate) fn remove_entity(&mut self, id: EntityId) -> EngineResult<Entity> {
        let entity = self
            .entities
            .remove(&id)
            .ok_or(EngineError::EntityNotFound(id))?;
        if let Some(tile) = self.tile_mut(entity.pos) {
            tile.remove_entity(id);
        }
        Ok(entity)
    }

    pub(crate) fn add_feature(&mut self, feature: MapFeature) -> EngineResult<FeatureId> {
        if feature.shape.is_empty() {
            return Err(EngineError::InvalidArgument("feature shape is empty"));
        }
        if let Some(coord) = feature
            .shape
            .iter()
            .find(|coord| self.get_tile(**coord).is_none())
        {
            return Err(EngineError::out_of_bounds(*coord));
        }

        let id = FeatureId(self.next_feature);
        self.next_feature += 1;
        for coord in &feature.shape {
            if let Some(tile) = self.tile_mut(*coord) {
                tile.features.push(id);
            }
        }
        trace!(%id, name = feature.behavior.name(), "feature placed");
        self.features.insert(
            id,
            Feature {
                id,
                shape: feature.shape,
                health: feature.health,
                max_health: feature.health,
                defense: feature.defense,
                side: feature.side,
                behavior: feature.behavior,
            },
        );
        Ok(id)
    }

    fn remove_feature(&mut self, id: FeatureId) -> EngineResult<Feature> {
        let feature = self
            .features
            .remove(&id)
            .ok_or(EngineError::FeatureNotFound(id))?;
        for coord in &feature.shape {
            if let Some(tile) = self.tile_mut(*coord) {
                tile.remove_feature(id);
            }
        }
        Ok(feature)
    }

    /// Moves `entity` along `path` to its last coordinate.
    ///
    /// Returns `Ok(false)` without mutating anything if a path tile is missing
    /// or blocked. Speed and crumbs are the caller's concern.
    pub fn try_move(&mut self, entity: EntityId, path: &[OddRCoord]) -> EngineResult<bool> {
        let Some(&destination) = path.last() else {
            return Err(EngineError::InvalidArgument("movement path is empty"));
        };
        let mover = self.get_entity(entity)?;
        let start = mover.pos;
        let collision = mover.collision;

        for coord in path.iter().filter(|coord| **coord != start) {
            let Some(tile) = self.get_tile(*coord) else {
                return Ok(false);
            };
            if self.tile_collides(tile, collision) {
                return Ok(false);
            }
        }

        let lifted = self
            .tile_mut(start)
            .is_some_and(|tile| tile.remove_entity(entity));
        if !lifted {
            return Err(EngineError::missing_occupant(start));
        }
        if let Some(tile) = self.tile_mut(destination) {
            tile.entities.push(entity);
        }
        self.entity_mut(entity)?.pos = destination;

        trace!(%entity, from = %start, to = %destination, steps = path.len(), "entity moved");
        self.events.push(GameEvent::EntityMoved {
            entity,
            path: path.to_vec(),
        });
        Ok(true)
    }

    fn apply_hit(health: u32, defense: i32, raw: Damage) -> (u32, u32) {
        let damage = match raw {
            Damage::InstantKill => health,
            Damage::Amount(amount) => {
                let reduced = i64::from(amount) - i64::from(defense);
                reduced.clamp(i64::from(GameConfig::MINIMAL_DAMAGE_TAKEN), i64::from(u32::MAX)) as u32
            }
        };
        (damage, damage.min(health))
    }

    /// Damages an entity. On death the entity is removed from the board.
    pub(crate) fn damage_entity(
        &mut self,
        id: EntityId,
        damage: Damage,
    ) -> EngineResult<DamageReport> {
        let entity = self.get_entity(id)?;
        let health = entity
            .health
            .ok_or(EngineError::InvalidTarget(TargetIssue::Indestructible))?;
        let (damage, hp_loss) = Self::apply_hit(health, entity.defense, damage);

        let entity = self.entity_mut(id)?;
        let remaining = health - hp_loss;
        entity.health = Some(remaining);
        let pos = entity.pos;
        self.events.push(GameEvent::EntityDamaged {
            entity: id,
            damage,
            hp_loss,
        });

        let mut report = DamageReport {
            damage,
            hp_loss,
            died: false,
            death_vetoed: false,
        };
        if remaining > 0 {
            return Ok(report);
        }

        let entity = self.get_entity(id)?;
        if entity.behavior.on_death(entity) {
            self.remove_entity(id)?;
            debug!(%id, %pos, "entity died");
            self.events.push(GameEvent::EntityDied { entity: id, pos });
            report.died = true;
        } else {
            warn!(%id, "death vetoed");
            self.entity_mut(id)?.health = Some(1);
            report.death_vetoed = true;
        }
        Ok(report)
    }

    /// Damages a feature. On death it is removed from every tile it covers.
    pub(crate) fn damage_feature(
        &mut self,
        id: FeatureId,
        damage: Damage,
    ) -> EngineResult<DamageReport> {
        let feature = self.get_feature(id)?;
        let health = feature
            .health
            .ok_or(EngineError::InvalidTarget(TargetIssue::Indestructible))?;
        let raw = match damage {
            Damage::Amount(amount) => Damage::Amount(
                feature
                    .behavior
                    .on_damage_taken(feature, amount)
                    .unwrap_or(amount),
            ),
            Damage::InstantKill => Damage::InstantKill,
        };
        let (damage, hp_loss) = Self::apply_hit(health, feature.defense, raw);

        let remaining = health - hp_loss;
        self.feature_mut(id)?.health = Some(remaining);
        self.events.push(GameEvent::FeatureDamaged {
            feature: id,
            damage,
            hp_loss,
        });

        let mut report = DamageReport {
            damage,
            hp_loss,
            died: false,
            death_vetoed: false,
        };
        if remaining > 0 {
            return Ok(report);
        }

        let feature = self.get_feature(id)?;
        if feature.behavior.on_death(feature) {
            self.remove_feature(id)?;
            debug!(%id, "feature destroyed");
            self.events.push(GameEvent::FeatureDied { feature: id });
            report.died = true;
        } else {
            warn!(%id, "feature destruction vetoed");
            self.feature_mut(id)?.health = Some(1);
            report.death_vetoed = true;
        }
        Ok(report)
    }

    /// Heals up to max health. Returns the amount actually restored.
    pub(crate) fn heal_entity(&mut self, id: EntityId, amount: u32) -> EngineResult<u32> {
        let entity = self.entity_mut(id)?;
        let (Some(health), Some(max_health)) = (entity.health, entity.max_health) else {
            return Err(EngineError::InvalidTarget(TargetIssue::Indestructible));
        };
        let healed = amount.min(max_health.saturating_sub(health));
        entity.health = Some(health + healed);
        self.events.push(GameEvent::EntityHealed {
            entity: id,
            amount: healed,
        });
        Ok(healed)
    }
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("size_x", &self.size_x)
            .field("size_y", &self.size_y)
            .field("entities", &self.entities.len())
            .field("features", &self.features.len())
            .finish_non_exhaustive()
    }
}
