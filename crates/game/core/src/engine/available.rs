use super::GameManager;
use crate::entity::EntityId;
use crate::hex::OddRCoord;

/// A call the acting side could make right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AvailableAction {
    EndTurn,
    Move { entity: EntityId, to: OddRCoord },
    ActivateSkill { entity: EntityId, skill_index: usize },
    PlaceSqueak { hand_index: usize, coord: OddRCoord },
    /// One coordinate of a parked targeting request.
    SelectTarget { coord: OddRCoord },
    CancelTargeting,
}

impl GameManager {
    /// Enumerates legal actions for the acting side.
    ///
    /// Moves and placements are listed only when affordable. Skills are
    /// listed when affordable; the resolver may still cancel them.
    pub fn legal_actions(&self) -> Vec<AvailableAction> {
        if self.is_game_over() {
            return Vec::new();
        }
        if let Some(view) = self.skill_targeting() {
            let mut actions: Vec<_> = view
                .available_targets
                .iter()
                .map(|coord| AvailableAction::SelectTarget { coord: *coord })
                .collect();
            if view.cancelable {
                actions.push(AvailableAction::CancelTargeting);
            }
            return actions;
        }

        let mut actions = vec![AvailableAction::EndTurn];
        let side = Some(self.turn);
        for entity in self.board.entities().filter(|entity| entity.side() == side) {
            let id = entity.id();
            let can_move = entity.movable()
                && entity.rodent().is_some_and(|rodent| {
                    rodent.move_stamina > 0 && rodent.move_cost <= self.crumbs
                });
            if can_move {
                let reachable = self.board.get_reachable_coords(id).unwrap_or_default();
                actions.extend(
                    reachable
                        .into_iter()
                        .map(|to| AvailableAction::Move { entity: id, to }),
                );
            }

            let stamina_left = entity.rodent().is_none_or(|rodent| rodent.skill_stamina > 0);
            if stamina_left {
                actions.extend(
                    entity
                        .skills()
                        .iter()
                        .enumerate()
                        .filter(|(_, skill)| skill.crumb_cost() <= self.crumbs)
                        .map(|(skill_index, _)| AvailableAction::ActivateSkill {
                            entity: id,
                            skill_index,
                        }),
                );
            }
        }

        for (hand_index, slot) in self.hand(self.turn).iter().enumerate() {
            let Some(squeak) = slot else {
                continue;
            };
            if squeak.crumb_cost() > self.crumbs {
                continue;
            }
            let coords = self.placable_coords(hand_index).unwrap_or_default();
            actions.extend(
                coords
                    .into_iter()
                    .map(|coord| AvailableAction::PlaceSqueak { hand_index, coord }),
            );
        }
        actions
    }
}
