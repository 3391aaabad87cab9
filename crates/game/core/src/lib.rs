//! Deterministic rules engine for hex-grid rodent tactics.
//!
//! `squeak-core` defines the board, entities, features, status effects,
//! timers and the turn/crumb economy, and exposes pure APIs shared by content
//! crates, frontends and AI players. All state mutation flows through
//! [`engine::GameManager`]; everything else is read through its queries and
//! the [`event::GameEvent`] stream.
pub mod board;
pub mod config;
pub mod effect;
pub mod engine;
pub mod entity;
pub mod error;
pub mod event;
pub mod feature;
pub mod hex;
pub mod rng;
pub mod side;
pub mod squeak;
pub mod timer;

pub use board::{Board, Damage, DamageReport, Map, MapEntity, MapFeature, TargetMode, Tile};
pub use config::GameConfig;
pub use effect::{
    ClearSide, EffectApplication, EffectArena, EffectBehavior, EffectContext, EffectId,
    EffectInstance, EffectSpec,
};
pub use engine::{
    AvailableAction, CrumbsPerTurnModifier, GameManager, GameManagerBuilder, HandSlot,
    SkillStatus, TargetingView, TurnChange,
};
pub use entity::{
    Entity, EntityBehavior, EntityId, EntitySkill, EntityTemplate, EntityTemplateBuilder,
    PlainEntity, RodentClass, RodentStats, SkillCallback, SkillCaster, SkillCompleted,
    SkillDescriptor, SkillFn, SkillRegistry, SkillResult, SkillTags, SkillTargeting, StatsMut,
};
pub use error::{
    EngineError, EngineResult, ErrorSeverity, GameError, PositionIssue, Resource, StateIssue,
    TargetIssue,
};
pub use event::{EventQueue, GameEvent};
pub use feature::{Feature, FeatureBehavior, FeatureId, FeatureKind};
pub use hex::{AxialCoord, CubeCoord, OddRCoord};
pub use rng::{Dice, PcgRng, RngOracle, compute_seed};
pub use side::{Side, SideMap};
pub use squeak::{Deck, EmptyDeck, Squeak, SqueakKind};
pub use timer::{Timer, TimerArena, TimerBehavior, TimerContext, TimerId};
