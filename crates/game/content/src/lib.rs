//! Built-in content and data loaders for the squeak engine.
//!
//! This crate provides everything `squeak-core` leaves abstract:
//! - Rodent templates and their skill resolvers
//! - Trick entities (the Sundial)
//! - Status effects such as Slowness, Stunned and the delayed vomit burst
//! - Map features (lairs, deployment zones, crumb stacks)
//! - Summoning squeaks and a refilling squeak-set deck
//! - RON/TOML loaders for maps, squeak catalogs and configuration
//!
//! Content is plain data plus behavior objects; all state lives in the
//! engine's `GameManager`.

pub mod catalog;
pub mod deck;
pub mod effects;
pub mod features;
pub mod rodents;
pub mod skills;
pub mod squeaks;
pub mod tricks;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::{Catalog, default_registry, entity_behavior, feature_behavior};
pub use deck::SqueakSetDeck;
pub use effects::{
    AbandonedBread, BrewbellyVomit, MoraleBoost, QuartermasterSoul, Slowness, Stunned,
};
pub use features::{CrumbsStack, DeploymentZone, Lair};
pub use squeaks::SummonSqueak;
pub use tricks::{Explosion, SundialBehavior};

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, MapLoader, RodentLoader};
