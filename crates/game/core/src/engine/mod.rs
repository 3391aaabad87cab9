//! Turn engine.
//!
//! [`GameManager`] is the single owner of all mutable match state: the board,
//! the effect and timer arenas, the crumb economy, hands and decks, and the
//! skill-targeting state machine. Its behavior is split across submodules
//! that each add an `impl GameManager` block:
//!
//! - `targeting`: skill activation and target selection
//! - `turns`: `end_turn` and turn-boundary hooks
//! - `effects`: effect stacking, expiry, promotion
//! - `timers`: timer scheduling and countdown
//! - `combat`: damage, heal, death cleanup, game over
//! - `movement`: unit movement and feature enter/exit hooks
//! - `placement`: squeak placement and spawning
//! - `available`: legal action enumeration
//! - `digest`: deterministic state hashing
mod available;
mod combat;
mod crumbs;
mod digest;
mod effects;
mod movement;
mod placement;
mod targeting;
mod timers;
mod turns;

use std::sync::Arc;

pub use available::AvailableAction;
pub use crumbs::CrumbsPerTurnModifier;
pub use targeting::{SkillStatus, TargetingView};
pub use turns::TurnChange;

use targeting::SkillState;
use tracing::debug;

use crate::board::{Board, Map, MapEntity};
use crate::config::GameConfig;
use crate::effect::EffectArena;
use crate::entity::{Entity, EntityId, StatsMut};
use crate::error::{EngineError, EngineResult, StateIssue, TargetIssue};
use crate::event::GameEvent;
use crate::feature::{Feature, FeatureId};
use crate::hex::OddRCoord;
use crate::rng::{Dice, PcgRng, RngOracle};
use crate::side::{Side, SideMap};
use crate::squeak::{Deck, EmptyDeck, Squeak};
use crate::timer::TimerArena;

/// Hand slot; `None` once the deck ran dry.
pub type HandSlot = Option<Arc<dyn Squeak>>;

/// Authoritative match state and the only mutation entry point.
pub struct GameManager {
    config: GameConfig,
    board: Board,
    effects: EffectArena,
    timers: TimerArena,
    turn: Side,
    first_turn: Side,
    turn_count: u32,
    crumbs: u32,
    hands: SideMap<Vec<HandSlot>>,
    decks: SideMap<Box<dyn Deck>>,
    crumb_modifier: CrumbsPerTurnModifier,
    rng: Arc<dyn RngOracle>,
    seed: u64,
    rolls: u64,
    skill_state: SkillState,
    winner: Option<Side>,
}

/// Builder for [`GameManager`].
pub struct GameManagerBuilder {
    map: Map,
    config: GameConfig,
    first_turn: Side,
    decks: SideMap<Box<dyn Deck>>,
    crumb_modifier: CrumbsPerTurnModifier,
    rng: Arc<dyn RngOracle>,
    seed: u64,
}

impl GameManagerBuilder {
    pub fn config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    pub fn first_turn(mut self, side: Side) -> Self {
        self.first_turn = side;
        self
    }

    pub fn deck(mut self, side: Side, deck: Box<dyn Deck>) -> Self {
        self.decks[side] = deck;
        self
    }

    pub fn crumb_modifier(mut self, modifier: CrumbsPerTurnModifier) -> Self {
        self.crumb_modifier = modifier;
        self
    }

    pub fn rng(mut self, rng: Arc<dyn RngOracle>) -> Self {
        self.rng = rng;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Builds the board, deals both hands, and grants the first side its
    /// turn-1 crumbs.
    pub fn build(self) -> EngineResult<GameManager> {
        if self.config.crumb_step_turns == 0 {
            return Err(EngineError::Configuration(
                "crumb_step_turns must be positive".into(),
            ));
        }
        let mut map = self.map;
        let placed = std::mem::take(&mut map.entities);
        let board = Board::with_jump_height(map, self.config.jump_height)?;
        let crumbs = self
            .crumb_modifier
            .crumbs(&self.config, 1, self.first_turn);

        let mut game = GameManager {
            config: self.config,
            board,
            effects: EffectArena::new(),
            timers: TimerArena::default(),
            turn: self.first_turn,
            first_turn: self.first_turn,
            turn_count: 1,
            crumbs,
            hands: SideMap::default(),
            decks: self.decks,
            crumb_modifier: self.crumb_modifier,
            rng: self.rng,
            seed: self.seed,
            rolls: 0,
            skill_state: SkillState::Idle,
            winner: None,
        };

        for side in [game.first_turn, game.first_turn.other()] {
            let hand = (0..game.config.hand_length)
                .map(|_| game.draw_squeak(side))
                .collect();
            game.hands[side] = hand;
        }

        // One at a time, so each enter hook sees only the entities placed
        // before it.
        for MapEntity { template, pos, side } in placed {
            let entity = game.board.add_entity(&template, pos, side)?;
            game.feature_hooks(entity, side, None, Some(pos))?;
        }

        debug!(
            first_turn = %game.first_turn,
            crumbs = game.crumbs,
            seed = game.seed,
            "match started"
        );
        Ok(game)
    }
}

impl GameManager {
    pub fn builder(map: Map) -> GameManagerBuilder {
        GameManagerBuilder {
            map,
            config: GameConfig::default(),
            first_turn: Side::Rat,
            decks: SideMap::<Box<dyn Deck>>::new(Box::new(EmptyDeck), Box::new(EmptyDeck)),
            crumb_modifier: CrumbsPerTurnModifier::default(),
            rng: Arc::new(PcgRng),
            seed: 0,
        }
    }

    // ------------------------------------------------------------------
    // Read-only state
    // ------------------------------------------------------------------

    /// Side currently acting.
    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn first_turn(&self) -> Side {
        self.first_turn
    }

    /// Full rounds started so far, starting at 1.
    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    /// Crumbs of the side currently acting.
    pub fn crumbs(&self) -> u32 {
        self.crumbs
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn effects(&self) -> &EffectArena {
        &self.effects
    }

    pub fn timers(&self) -> &TimerArena {
        &self.timers
    }

    pub fn hand(&self, side: Side) -> &[HandSlot] {
        &self.hands[side]
    }

    pub fn deck_remaining(&self, side: Side) -> usize {
        self.decks[side].remaining()
    }

    pub fn crumb_modifier(&self) -> &CrumbsPerTurnModifier {
        &self.crumb_modifier
    }

    /// Modifier applied to future crumb grants.
    pub fn crumb_modifier_mut(&mut self) -> &mut CrumbsPerTurnModifier {
        &mut self.crumb_modifier
    }

    pub fn is_game_over(&self) -> bool {
        self.winner.is_some()
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn entity(&self, id: EntityId) -> EngineResult<&Entity> {
        self.board.get_entity(id)
    }

    pub fn feature(&self, id: FeatureId) -> EngineResult<&Feature> {
        self.board.get_feature(id)
    }

    // ------------------------------------------------------------------
    // Event log
    // ------------------------------------------------------------------

    pub fn pop_event(&mut self) -> Option<GameEvent> {
        self.board.events_mut().pop()
    }

    pub fn peek_event(&self) -> Option<&GameEvent> {
        self.board.events().peek()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.board.events_mut().drain()
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.board.events_mut().push(event);
    }

    // ------------------------------------------------------------------
    // Randomness
    // ------------------------------------------------------------------

    /// Seeded roll source for dodge checks and similar collaborator rolls.
    pub fn dice(&mut self) -> Dice<'_> {
        Dice::new(self.rng.as_ref(), self.seed, &mut self.rolls)
    }

    fn draw_squeak(&mut self, side: Side) -> HandSlot {
        let mut dice = Dice::new(self.rng.as_ref(), self.seed, &mut self.rolls);
        self.decks[side].draw(&mut dice)
    }

    // ------------------------------------------------------------------
    // Guards
    // ------------------------------------------------------------------

    fn ensure_running(&self) -> EngineResult<()> {
        if self.winner.is_some() {
            return Err(EngineError::InvalidStateTransition(StateIssue::GameOver));
        }
        Ok(())
    }

    fn ensure_not_selecting(&self) -> EngineResult<()> {
        if self.is_selecting_target() {
            return Err(EngineError::InvalidStateTransition(
                StateIssue::SelectingTargets,
            ));
        }
        Ok(())
    }

    /// Guard for player actions: game running and no skill waiting for
    /// targets. Content primitives only check the latter so hooks can keep
    /// resolving after a lair falls.
    fn ensure_idle(&self) -> EngineResult<()> {
        self.ensure_running()?;
        self.ensure_not_selecting()
    }

    // ------------------------------------------------------------------
    // Occupant lookup relative to the acting side
    // ------------------------------------------------------------------

    /// Topmost damageable entity on `coord` not on the acting side.
    pub fn get_enemy_on_pos(&self, coord: OddRCoord) -> EngineResult<Option<EntityId>> {
        Ok(self.get_enemies_on_pos(coord)?.first().copied())
    }

    /// Every damageable entity on `coord` not on the acting side, top first.
    pub fn get_enemies_on_pos(&self, coord: OddRCoord) -> EngineResult<Vec<EntityId>> {
        let turn = Some(self.turn);
        self.occupants_top_down(coord, |entity| entity.side() != turn)
    }

    /// Topmost damageable entity on `coord` on the acting side.
    pub fn get_ally_on_pos(&self, coord: OddRCoord) -> EngineResult<Option<EntityId>> {
        let turn = Some(self.turn);
        Ok(self
            .occupants_top_down(coord, |entity| entity.side() == turn)?
            .first()
            .copied())
    }

    /// Topmost damageable entity on `coord` regardless of side.
    pub fn get_any_on_pos(&self, coord: OddRCoord) -> EngineResult<Option<EntityId>> {
        Ok(self.occupants_top_down(coord, |_| true)?.first().copied())
    }

    fn occupants_top_down(
        &self,
        coord: OddRCoord,
        keep: impl Fn(&Entity) -> bool,
    ) -> EngineResult<Vec<EntityId>> {
        let tile = self.board.tile(coord)?;
        Ok(tile
            .entities()
            .iter()
            .rev()
            .filter_map(|id| self.board.entity(*id))
            .filter(|entity| entity.is_damageable() && keep(entity))
            .map(Entity::id)
            .collect())
    }

    /// Topmost damageable feature on `coord` not on the acting side.
    pub fn get_feature_on_pos(&self, coord: OddRCoord) -> EngineResult<Option<FeatureId>> {
        let turn = Some(self.turn);
        self.feature_top_down(coord, |feature| feature.side() != turn)
    }

    /// Topmost damageable feature on `coord` on the acting side.
    pub fn get_ally_feature_on_pos(&self, coord: OddRCoord) -> EngineResult<Option<FeatureId>> {
        let turn = Some(self.turn);
        self.feature_top_down(coord, |feature| feature.side() == turn)
    }

    fn feature_top_down(
        &self,
        coord: OddRCoord,
        keep: impl Fn(&Feature) -> bool,
    ) -> EngineResult<Option<FeatureId>> {
        let tile = self.board.tile(coord)?;
        Ok(tile
            .features()
            .iter()
            .rev()
            .filter_map(|id| self.board.feature(*id))
            .find(|feature| feature.is_damageable() && keep(feature))
            .map(Feature::id))
    }

    // ------------------------------------------------------------------
    // Direct stat and health adjustments for content hooks
    // ------------------------------------------------------------------

    /// Signed stat adjustments, used by effect hooks.
    pub fn adjust_stats(&mut self, entity: EntityId) -> EngineResult<StatsMut<'_>> {
        Ok(StatsMut::new(self.board.entity_mut(entity)?))
    }

    /// Sets a feature's health, clamped to `1..=max_health`.
    pub fn set_feature_health(&mut self, feature: FeatureId, health: u32) -> EngineResult<()> {
        let feature = self.board.feature_mut(feature)?;
        let max = feature
            .max_health
            .ok_or(EngineError::InvalidTarget(TargetIssue::Indestructible))?;
        feature.health = Some(health.clamp(1, max.max(1)));
        Ok(())
    }
}

impl std::fmt::Debug for GameManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameManager")
            .field("turn", &self.turn)
            .field("turn_count", &self.turn_count)
            .field("crumbs", &self.crumbs)
            .field("board", &self.board)
            .field("effects", &self.effects.len())
            .field("timers", &self.timers.len())
            .field("selecting_target", &self.is_selecting_target())
            .field("winner", &self.winner)
            .finish_non_exhaustive()
    }
}
