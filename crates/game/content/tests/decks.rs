mod common;

use common::{at, catalog, field};
use squeak_content::rodents::{cracker, tail_blazer};
use squeak_content::{Catalog, SqueakSetDeck};
use squeak_core::{GameManager, Side};

fn hand_names(game: &GameManager, side: Side) -> Vec<String> {
    game.hand(side)
        .iter()
        .map(|slot| slot.as_ref().map_or(String::new(), |squeak| squeak.name().to_string()))
        .collect()
}

fn dealt(catalog: &Catalog, seed: u64) -> GameManager {
    let set = [(tail_blazer::NAME, 2), (cracker::NAME, 1)];
    GameManager::builder(field(catalog, &[]))
        .deck(Side::Rat, Box::new(catalog.deck(&set).unwrap()))
        .deck(Side::Mouse, Box::new(catalog.deck(&set).unwrap()))
        .seed(seed)
        .build()
        .unwrap()
}

#[test]
fn opening_hands_refill_from_a_reshuffled_set() {
    let catalog = catalog();
    let game = dealt(&catalog, 11);

    let hand = hand_names(&game, Side::Rat);
    assert_eq!(hand.len(), 5);
    let mut first_pile = hand[..3].to_vec();
    first_pile.sort();
    assert_eq!(first_pile, ["Cracker", "TailBlazer", "TailBlazer"]);
    assert_eq!(game.deck_remaining(Side::Rat), 1);
    assert_eq!(game.deck_remaining(Side::Mouse), 1);
}

#[test]
fn dealing_follows_the_seed() {
    let catalog = catalog();
    let a = dealt(&catalog, 5);
    let b = dealt(&catalog, 5);
    assert_eq!(hand_names(&a, Side::Rat), hand_names(&b, Side::Rat));
    assert_eq!(hand_names(&a, Side::Mouse), hand_names(&b, Side::Mouse));
    assert_eq!(a.state_digest(), b.state_digest());
}

#[test]
fn placing_draws_the_next_card_into_the_slot() {
    let catalog = catalog();
    let mut game = dealt(&catalog, 2);
    let slot = hand_names(&game, Side::Rat)
        .iter()
        .position(|name| name == tail_blazer::NAME)
        .unwrap();

    game.place_unit(slot, at(1, 1)).unwrap();
    let placed = game.board().entities_at(at(1, 1)).next().unwrap();
    assert_eq!(placed.name(), tail_blazer::NAME);
    assert_eq!(placed.side(), Some(Side::Rat));
    assert!(game.hand(Side::Rat)[slot].is_some());
    assert_eq!(game.deck_remaining(Side::Rat), 0);
}

#[test]
fn empty_sets_leave_empty_slots() {
    let catalog = catalog();
    let game = GameManager::builder(field(&catalog, &[]))
        .deck(Side::Rat, Box::new(SqueakSetDeck::new()))
        .build()
        .unwrap();
    assert!(game.hand(Side::Rat).iter().all(Option::is_none));
}
