mod common;

use std::sync::{Arc, Mutex};

use common::{Fuse, Tripwire, arena, at, scout};
use squeak_core::{
    ClearSide, Damage, EngineError, EngineResult, EntityBehavior, EntityId, EntityTemplate,
    FeatureBehavior, FeatureId, GameEvent, GameManager, Map, MapFeature, OddRCoord, Resource,
    Side, SkillRegistry, StateIssue, TargetIssue, TurnChange,
};

fn turn_ends(game: &mut GameManager) -> Vec<(Side, Side, u32, u32, u32)> {
    game.drain_events()
        .into_iter()
        .filter_map(|event| match event {
            GameEvent::TurnEnded {
                from,
                to,
                turn_count,
                leftover_crumbs,
                new_crumbs,
            } => Some((from, to, turn_count, leftover_crumbs, new_crumbs)),
            _ => None,
        })
        .collect()
}

#[test]
fn crumb_schedule_and_turn_counter() {
    let mut game = GameManager::builder(arena()).build().unwrap();
    assert_eq!(game.turn(), Side::Rat);
    assert_eq!(game.turn_count(), 1);
    assert_eq!(game.crumbs(), 10);

    for _ in 0..8 {
        game.end_turn().unwrap();
    }
    let ends = turn_ends(&mut game);
    assert_eq!(ends.len(), 8);
    assert_eq!(ends[0], (Side::Rat, Side::Mouse, 1, 10, 10));
    assert_eq!(ends[1], (Side::Mouse, Side::Rat, 2, 10, 10));
    assert_eq!(ends[7], (Side::Mouse, Side::Rat, 5, 10, 20));

    assert_eq!(game.turn(), Side::Rat);
    assert_eq!(game.turn_count(), 5);
    assert_eq!(game.crumbs(), 20);
}

#[test]
fn mouse_first_wraps_on_mouse() {
    let mut game = GameManager::builder(arena())
        .first_turn(Side::Mouse)
        .build()
        .unwrap();
    game.end_turn().unwrap();
    assert_eq!((game.turn(), game.turn_count()), (Side::Rat, 1));
    game.end_turn().unwrap();
    assert_eq!((game.turn(), game.turn_count()), (Side::Mouse, 2));
}

#[test]
fn crumb_modifier_applies_to_next_grant() {
    let mut game = GameManager::builder(arena()).build().unwrap();
    game.crumb_modifier_mut().add_side_percent(Side::Mouse, 50);
    game.end_turn().unwrap();
    assert_eq!(game.crumbs(), 15);
    game.end_turn().unwrap();
    assert_eq!(game.crumbs(), 10);
}

#[test]
fn moves_charge_crumbs_and_stamina_until_refill() {
    let mut map = arena();
    map.add_entity(scout(), at(2, 2), Some(Side::Rat));
    let mut game = GameManager::builder(map).build().unwrap();
    let unit = EntityId(0);

    let path = game.move_unit(unit, at(3, 2)).unwrap();
    assert_eq!(path, vec![at(2, 2), at(3, 2)]);
    game.move_unit(unit, at(4, 2)).unwrap();
    assert_eq!(game.crumbs(), 6);
    assert_eq!(game.entity(unit).unwrap().rodent().unwrap().move_stamina, 0);
    assert_eq!(
        game.move_unit(unit, at(5, 2)),
        Err(EngineError::not_enough(Resource::MoveStamina, 1, 0))
    );

    game.end_turn().unwrap();
    game.end_turn().unwrap();
    let rodent = game.entity(unit).unwrap().rodent().unwrap();
    assert_eq!(rodent.move_stamina, 2);
    assert_eq!(game.crumbs(), 10);
}

#[test]
fn move_rejections() {
    let mut map = arena();
    map.add_entity(scout(), at(2, 2), Some(Side::Rat));
    map.add_entity(scout(), at(5, 3), Some(Side::Mouse));
    let mut game = GameManager::builder(map).build().unwrap();
    let (rat, mouse) = (EntityId(0), EntityId(1));

    assert_eq!(
        game.move_unit(mouse, at(5, 2)),
        Err(EngineError::InvalidTarget(TargetIssue::NotMovable))
    );
    assert_eq!(
        game.move_unit(rat, at(7, 2)),
        Err(EngineError::InvalidTarget(TargetIssue::BeyondSpeed))
    );
    assert!(matches!(
        game.move_unit(rat, at(9, 9)),
        Err(EngineError::InvalidPosition { .. })
    ));
    // The rat lair collides.
    assert_eq!(
        game.move_unit(rat, at(0, 0)),
        Err(EngineError::InvalidTarget(TargetIssue::Unreachable))
    );
    assert_eq!(game.crumbs(), 10);
    assert_eq!(game.entity(rat).unwrap().pos(), at(2, 2));
}

#[test]
fn feature_hooks_fire_on_crossing_the_boundary() {
    let wire = Arc::new(Tripwire::default());
    let mut map = Map::new(5, 1).unwrap();
    map.add_feature(MapFeature::new(wire.clone(), vec![at(2, 0), at(3, 0)]));
    map.add_entity(scout(), at(0, 0), Some(Side::Rat));
    let mut game = GameManager::builder(map).build().unwrap();
    let unit = EntityId(0);

    let path = game.move_entity_unchecked(unit, at(1, 0), None).unwrap();
    assert_eq!(path, vec![at(0, 0), at(1, 0)]);
    assert_eq!((wire.enters(), wire.exits()), (0, 0));
    game.move_entity_unchecked(unit, at(2, 0), None).unwrap();
    game.move_entity_unchecked(unit, at(3, 0), None).unwrap();
    assert_eq!((wire.enters(), wire.exits()), (1, 0));
    game.move_entity_unchecked(unit, at(4, 0), None).unwrap();
    assert_eq!((wire.enters(), wire.exits()), (1, 1));

    let spawned = game.spawn_entity(&scout(), at(2, 0), Some(Side::Mouse)).unwrap();
    assert_eq!(wire.enters(), 2);
    let report = game.damage_entity(spawned, Damage::InstantKill).unwrap();
    assert!(report.died);
    assert_eq!(wire.exits(), 2);
}

#[test]
fn unchecked_moves_respect_the_jump_height() {
    let mut map = Map::new(3, 1).unwrap();
    map.set_height(at(1, 0), 3).unwrap();
    map.add_entity(scout(), at(0, 0), Some(Side::Rat));
    let mut game = GameManager::builder(map).build().unwrap();
    let unit = EntityId(0);
    game.drain_events();

    assert_eq!(
        game.move_entity_unchecked(unit, at(2, 0), None),
        Err(EngineError::InvalidTarget(TargetIssue::Unreachable))
    );
    assert_eq!(game.entity(unit).unwrap().pos(), at(0, 0));
    assert!(game.drain_events().is_empty());

    let path = game.move_entity_unchecked(unit, at(2, 0), Some(3)).unwrap();
    assert_eq!(path, vec![at(0, 0), at(1, 0), at(2, 0)]);
    assert_eq!(game.entity(unit).unwrap().pos(), at(2, 0));
    assert_eq!(
        game.drain_events(),
        vec![GameEvent::EntityMoved { entity: unit, path }]
    );
}

#[test]
fn pre_placed_entities_enter_features_at_start() {
    let wire = Arc::new(Tripwire::default());
    let mut map = Map::new(3, 1).unwrap();
    map.add_feature(MapFeature::new(wire.clone(), vec![at(1, 0)]));
    map.add_entity(scout(), at(1, 0), Some(Side::Rat));
    GameManager::builder(map).build().unwrap();
    assert_eq!(wire.enters(), 1);
}

/// Records how many entities stand on the feature at each enter hook.
#[derive(Default)]
struct Headcount(Mutex<Vec<usize>>);

impl FeatureBehavior for Headcount {
    fn name(&self) -> &'static str {
        "headcount"
    }

    fn is_collision(&self) -> bool {
        false
    }

    fn on_entity_enter(
        &self,
        game: &mut GameManager,
        feature: FeatureId,
        _entity: EntityId,
        _coord: OddRCoord,
    ) -> EngineResult<()> {
        let board = game.board();
        let count = game
            .feature(feature)?
            .shape()
            .iter()
            .map(|coord| board.entities_at(*coord).count())
            .sum();
        self.0.lock().unwrap().push(count);
        Ok(())
    }
}

#[test]
fn pre_placed_entities_enter_one_at_a_time() {
    let headcount = Arc::new(Headcount::default());
    let mut map = Map::new(3, 1).unwrap();
    map.add_feature(MapFeature::new(headcount.clone(), vec![at(0, 0), at(1, 0)]));
    map.add_entity(scout(), at(0, 0), Some(Side::Rat));
    map.add_entity(scout(), at(1, 0), Some(Side::Rat));
    let game = GameManager::builder(map).build().unwrap();

    assert_eq!(*headcount.0.lock().unwrap(), [1, 2]);
    assert_eq!(game.board().entities().count(), 2);
    assert_eq!(game.entity(EntityId(1)).unwrap().pos(), at(1, 0));
}

/// Misses every attributed hit and adds 1 to anonymous ones.
struct Warded(Mutex<Vec<Option<EntityId>>>);

impl EntityBehavior for Warded {
    fn on_damage_taken(
        &self,
        _game: &mut GameManager,
        _entity: EntityId,
        damage: u32,
        source: Option<EntityId>,
    ) -> EngineResult<Option<u32>> {
        self.0.lock().unwrap().push(source);
        Ok(Some(if source.is_some() { 0 } else { damage + 1 }))
    }
}

#[test]
fn damage_hooks_see_the_attacker_and_may_miss() {
    let warded = Arc::new(Warded(Mutex::new(Vec::new())));
    let template = EntityTemplate::builder("Ward")
        .health(5)
        .behavior(warded.clone())
        .build(&SkillRegistry::new())
        .unwrap();
    let mut map = arena();
    map.add_entity(scout(), at(3, 3), Some(Side::Rat));
    map.add_entity(template, at(4, 3), Some(Side::Mouse));
    let mut game = GameManager::builder(map).build().unwrap();
    let (attacker, ward) = (EntityId(0), EntityId(1));
    game.drain_events();

    let report = game.damage_entity_by(ward, Damage::Amount(3), attacker).unwrap();
    assert_eq!((report.damage, report.hp_loss), (0, 0));
    assert_eq!(game.entity(ward).unwrap().health(), Some(5));
    assert_eq!(
        game.drain_events(),
        [GameEvent::EntityDamaged {
            entity: ward,
            damage: 0,
            hp_loss: 0
        }]
    );

    game.damage_entity(ward, Damage::Amount(3)).unwrap();
    assert_eq!(game.entity(ward).unwrap().health(), Some(1));
    game.damage_entity(ward, Damage::InstantKill).unwrap();
    assert!(game.entity(ward).is_err());
    assert_eq!(*warded.0.lock().unwrap(), [Some(attacker), None]);
}

struct Witness(Mutex<Vec<(Side, TurnChange)>>);

impl EntityBehavior for Witness {
    fn on_turn_change(
        &self,
        game: &mut GameManager,
        _entity: EntityId,
        change: TurnChange,
    ) -> EngineResult<()> {
        self.0.lock().unwrap().push((game.turn(), change));
        Ok(())
    }
}

#[test]
fn entity_turn_hooks_see_the_departing_side() {
    let witness = Arc::new(Witness(Mutex::new(Vec::new())));
    let template = EntityTemplate::builder("Totem")
        .behavior(witness.clone())
        .build(&SkillRegistry::new())
        .unwrap();
    let mut map = arena();
    map.add_entity(template, at(4, 3), None);
    let mut game = GameManager::builder(map).build().unwrap();

    game.end_turn().unwrap();
    game.end_turn().unwrap();

    let seen = witness.0.lock().unwrap().clone();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].0, Side::Rat);
    assert_eq!(
        seen[0].1,
        TurnChange {
            from: Side::Rat,
            to: Side::Mouse,
            turn_count: 1
        }
    );
    assert_eq!(seen[1].0, Side::Mouse);
    assert_eq!(seen[1].1.turn_count, 1);
}

#[test]
fn timers_count_down_on_matching_boundaries() {
    let mut map = arena();
    map.add_entity(scout(), at(3, 3), Some(Side::Rat));
    let mut game = GameManager::builder(map).build().unwrap();
    let unit = EntityId(0);

    assert_eq!(
        game.apply_timer(unit, ClearSide::Ally, 0, Arc::new(Fuse)),
        Err(EngineError::InvalidArgument("timer duration must be positive"))
    );
    let timer = game
        .apply_timer(unit, ClearSide::Ally, 2, Arc::new(Fuse))
        .unwrap();

    game.end_turn().unwrap();
    assert_eq!(game.timers().get(timer).unwrap().duration(), 1);
    game.end_turn().unwrap();
    assert_eq!(game.timers().get(timer).unwrap().duration(), 1);
    game.drain_events();

    game.end_turn().unwrap();
    assert!(game.timers().is_empty());
    assert_eq!(game.entity(unit).unwrap().health(), Some(4));
    let events = game.drain_events();
    assert!(events.contains(&GameEvent::TimerExpired {
        entity: unit,
        timer
    }));
}

#[test]
fn losing_the_last_lair_ends_the_game() {
    let mut game = GameManager::builder(arena()).build().unwrap();
    let mouse_lair = FeatureId(1);

    let report = game.damage_feature(mouse_lair, Damage::Amount(4)).unwrap();
    assert_eq!(report.hp_loss, 4);
    assert!(!game.is_game_over());

    game.damage_feature(mouse_lair, Damage::InstantKill).unwrap();
    assert_eq!(game.winner(), Some(Side::Rat));
    assert!(game.board().feature(mouse_lair).is_none());
    assert!(
        game.drain_events()
            .contains(&GameEvent::GameOver { winner: Side::Rat })
    );

    assert_eq!(
        game.end_turn(),
        Err(EngineError::InvalidStateTransition(StateIssue::GameOver))
    );
    assert!(game.legal_actions().is_empty());
}
