mod common;

use common::{arena, at, lick, scout};
use squeak_core::{
    AvailableAction, Damage, EngineError, EngineResult, EntityId, EntityTemplate, GameEvent,
    GameManager, Resource, RodentClass, RodentStats, Side, SkillCaster, SkillCompleted,
    SkillDescriptor, SkillFn, SkillRegistry, SkillResult, SkillStatus, SkillTargeting, StateIssue,
    TargetIssue,
};

const RAT: EntityId = EntityId(0);
const MOUSE: EntityId = EntityId(1);
const POKE: usize = 0;
const LICK: usize = 1;

/// Rat scout at (3, 2) next to a mouse scout at (4, 2).
fn duel() -> GameManager {
    let mut map = arena();
    map.add_entity(scout(), at(3, 2), Some(Side::Rat));
    map.add_entity(scout(), at(4, 2), Some(Side::Mouse));
    GameManager::builder(map).build().unwrap()
}

fn skill_stamina(game: &GameManager, entity: EntityId) -> u32 {
    game.entity(entity).unwrap().rodent().unwrap().skill_stamina
}

fn selecting() -> EngineError {
    EngineError::InvalidStateTransition(StateIssue::SelectingTargets)
}

/// Offers the neighbouring tile and refuses to be cancelled.
fn pin(_game: &mut GameManager, _caster: SkillCaster) -> EngineResult<SkillResult> {
    let targeting = SkillTargeting::new(1, vec![at(4, 2)], |_game, _picked| {
        Ok(SkillResult::SUCCESS)
    })
    .cancelable(false);
    Ok(SkillResult::AwaitingTargets(targeting))
}

/// Offers a tile but allows zero picks, and refuses to be cancelled.
fn stuck(_game: &mut GameManager, _caster: SkillCaster) -> EngineResult<SkillResult> {
    let targeting = SkillTargeting::new(0, vec![at(4, 2)], |_game, _picked| {
        Ok(SkillResult::SUCCESS)
    })
    .cancelable(false);
    Ok(SkillResult::AwaitingTargets(targeting))
}

fn custom(descriptor: SkillDescriptor, resolver: SkillFn) -> EntityTemplate {
    EntityTemplate::builder("Custom")
        .health(4)
        .rodent(RodentStats::new(RodentClass::Specialist, 2, 1, 2, 1, 1))
        .skill_fn(descriptor, resolver)
        .build(&SkillRegistry::new())
        .unwrap()
}

#[test]
fn targeted_skill_charges_after_selection() {
    let mut game = duel();

    let status = game.activate_skill(RAT, POKE).unwrap();
    assert_eq!(
        status,
        SkillStatus::AwaitingTargets {
            target_count: 1,
            available_targets: vec![at(4, 2)],
            cancelable: true,
        }
    );
    assert!(game.is_selecting_target());
    let view = game.skill_targeting().unwrap();
    assert_eq!(
        view.caster,
        SkillCaster {
            entity: RAT,
            skill_index: POKE
        }
    );
    assert_eq!(game.crumbs(), 10);
    game.drain_events();

    let status = game.apply_skill_callback(&[at(4, 2)]).unwrap();
    assert_eq!(status, SkillStatus::Completed(SkillCompleted::Success));
    assert!(!game.is_selecting_target());
    assert_eq!(game.entity(MOUSE).unwrap().health(), Some(3));
    assert_eq!(game.crumbs(), 7);
    assert_eq!(skill_stamina(&game, RAT), 1);
    assert_eq!(
        game.drain_events().last(),
        Some(&GameEvent::SkillActivated {
            entity: RAT,
            skill_index: POKE,
            skill: "Poke".into(),
            outcome: SkillCompleted::Success,
        })
    );
}

#[test]
fn pending_selection_blocks_other_mutators() {
    let mut game = duel();
    game.activate_skill(RAT, POKE).unwrap();

    assert_eq!(game.end_turn(), Err(selecting()));
    assert_eq!(game.move_unit(RAT, at(2, 2)), Err(selecting()));
    assert_eq!(game.activate_skill(RAT, LICK), Err(selecting()));
    assert_eq!(game.place_unit(0, at(1, 1)), Err(selecting()));
    assert_eq!(
        game.damage_entity(MOUSE, Damage::Amount(1)),
        Err(selecting())
    );
    assert!(game.is_selecting_target());
    assert_eq!(game.entity(RAT).unwrap().pos(), at(3, 2));
}

#[test]
fn bad_selections_leave_the_request_parked() {
    let mut game = duel();
    game.activate_skill(RAT, POKE).unwrap();

    let count = Err(EngineError::InvalidTarget(TargetIssue::TargetCount));
    assert_eq!(game.apply_skill_callback(&[]), count);
    assert_eq!(game.apply_skill_callback(&[at(4, 2), at(4, 2)]), count);
    assert_eq!(
        game.apply_skill_callback(&[at(5, 2)]),
        Err(EngineError::InvalidTarget(TargetIssue::NotSelectable))
    );
    assert!(game.is_selecting_target());
    assert_eq!(game.entity(MOUSE).unwrap().health(), Some(6));

    game.apply_skill_callback(&[at(4, 2)]).unwrap();
    assert_eq!(game.entity(MOUSE).unwrap().health(), Some(3));
}

#[test]
fn no_available_targets_cancels_without_charging() {
    let mut map = arena();
    map.add_entity(scout(), at(1, 2), Some(Side::Rat));
    map.add_entity(scout(), at(6, 2), Some(Side::Mouse));
    let mut game = GameManager::builder(map).build().unwrap();

    let status = game.activate_skill(RAT, POKE).unwrap();
    assert_eq!(status, SkillStatus::Completed(SkillCompleted::Cancelled));
    assert!(!game.is_selecting_target());
    assert_eq!(game.crumbs(), 10);
    assert_eq!(skill_stamina(&game, RAT), 2);
    assert!(matches!(
        game.drain_events().last(),
        Some(GameEvent::SkillActivated {
            outcome: SkillCompleted::Cancelled,
            ..
        })
    ));
}

#[test]
fn cancelling_refunds_everything() {
    let mut game = duel();
    game.activate_skill(RAT, POKE).unwrap();

    game.cancel_skill_targeting().unwrap();
    assert!(!game.is_selecting_target());
    assert_eq!(game.crumbs(), 10);
    assert_eq!(skill_stamina(&game, RAT), 2);
    assert_eq!(game.entity(MOUSE).unwrap().health(), Some(6));

    assert_eq!(
        game.cancel_skill_targeting(),
        Err(EngineError::InvalidStateTransition(
            StateIssue::NotSelectingTargets
        ))
    );
    assert_eq!(
        game.apply_skill_callback(&[at(4, 2)]),
        Err(EngineError::InvalidStateTransition(
            StateIssue::NotSelectingTargets
        ))
    );
}

#[test]
fn uncancelable_request_must_be_answered() {
    let mut map = arena();
    map.add_entity(
        custom(SkillDescriptor::new("Pin", 2), pin),
        at(3, 2),
        Some(Side::Rat),
    );
    let mut game = GameManager::builder(map).build().unwrap();

    game.activate_skill(RAT, 0).unwrap();
    assert_eq!(
        game.cancel_skill_targeting(),
        Err(EngineError::InvalidStateTransition(StateIssue::NotCancelable))
    );
    assert_eq!(
        game.legal_actions(),
        vec![AvailableAction::SelectTarget { coord: at(4, 2) }]
    );

    game.apply_skill_callback(&[at(4, 2)]).unwrap();
    assert_eq!(game.crumbs(), 8);
}

#[test]
fn zero_target_requests_cancel_instead_of_parking() {
    let mut map = arena();
    map.add_entity(
        custom(SkillDescriptor::new("Stuck", 2), stuck),
        at(3, 2),
        Some(Side::Rat),
    );
    let mut game = GameManager::builder(map).build().unwrap();

    let status = game.activate_skill(RAT, 0).unwrap();
    assert_eq!(status, SkillStatus::Completed(SkillCompleted::Cancelled));
    assert!(!game.is_selecting_target());
    assert_eq!(game.crumbs(), 10);
    game.end_turn().unwrap();
    assert_eq!(game.turn(), Side::Mouse);
}

#[test]
fn instant_skills_spend_stamina() {
    let mut game = duel();

    for expected in [(9, 1), (8, 0)] {
        let status = game.activate_skill(RAT, LICK).unwrap();
        assert_eq!(status, SkillStatus::Completed(SkillCompleted::Success));
        assert_eq!((game.crumbs(), skill_stamina(&game, RAT)), expected);
    }
    assert_eq!(
        game.activate_skill(RAT, LICK),
        Err(EngineError::not_enough(Resource::SkillStamina, 1, 0))
    );

    game.end_turn().unwrap();
    game.end_turn().unwrap();
    assert_eq!(skill_stamina(&game, RAT), 2);
}

#[test]
fn activation_rejections() {
    let mut game = duel();

    assert_eq!(
        game.activate_skill(MOUSE, POKE),
        Err(EngineError::InvalidTarget(TargetIssue::NotSelectable))
    );
    assert_eq!(
        game.activate_skill(RAT, 5),
        Err(EngineError::InvalidArgument("skill index out of range"))
    );
    assert_eq!(
        game.activate_skill(EntityId(99), POKE),
        Err(EngineError::EntityNotFound(EntityId(99)))
    );

    let mut map = arena();
    map.add_entity(
        custom(SkillDescriptor::new("Feast", 11), lick),
        at(3, 2),
        Some(Side::Rat),
    );
    let mut game = GameManager::builder(map).build().unwrap();
    assert_eq!(
        game.activate_skill(RAT, 0),
        Err(EngineError::not_enough(Resource::Crumbs, 11, 10))
    );
}

#[test]
fn legal_actions_follow_the_selection_state() {
    let mut game = duel();
    let idle = game.legal_actions();
    assert_eq!(idle[0], AvailableAction::EndTurn);
    assert!(idle.contains(&AvailableAction::ActivateSkill {
        entity: RAT,
        skill_index: POKE
    }));
    assert!(idle.contains(&AvailableAction::Move {
        entity: RAT,
        to: at(2, 2)
    }));
    assert!(!idle.iter().any(|action| matches!(
        action,
        AvailableAction::Move { entity: MOUSE, .. }
            | AvailableAction::ActivateSkill { entity: MOUSE, .. }
    )));

    game.activate_skill(RAT, POKE).unwrap();
    assert_eq!(
        game.legal_actions(),
        vec![
            AvailableAction::SelectTarget { coord: at(4, 2) },
            AvailableAction::CancelTargeting,
        ]
    );
}
