//! Common error infrastructure for squeak-core.
//!
//! Every fallible engine call returns [`EngineError`]. The variants follow the
//! engine's contract taxonomy: callers are expected to pre-validate through the
//! read-only query API, so in normal play an error signals a caller bug rather
//! than a recoverable runtime condition.
//!
//! # Design Principles
//!
//! - **Type Safety**: Each variant carries a typed detail payload
//! - **Severity Classification**: Errors are categorized for logging and handling
//! - **Deterministic**: No error carries allocations that depend on runtime state

use crate::entity::EntityId;
use crate::feature::FeatureId;
use crate::hex::OddRCoord;

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: The action may succeed later (e.g. after the next crumb grant)
/// - **Validation**: Invalid input that should be rejected without retry
/// - **Internal**: Unexpected state inconsistencies that require investigation
/// - **Fatal**: Content or configuration is broken and the match cannot start
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    Recoverable,
    Validation,
    Internal,
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all squeak-core errors.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Resource whose balance was too low for the requested action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Resource {
    Crumbs,
    MoveStamina,
    SkillStamina,
}

/// Why a coordinate was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PositionIssue {
    #[strum(to_string = "outside the board")]
    OutOfBounds,
    #[strum(to_string = "tile does not hold the expected occupant")]
    MissingOccupant,
}

/// Why a target (move destination, selected coordinate, placement) was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetIssue {
    #[strum(to_string = "destination is beyond the unit's speed")]
    BeyondSpeed,
    #[strum(to_string = "no path to destination")]
    Unreachable,
    #[strum(to_string = "destination tile is occupied")]
    Occupied,
    #[strum(to_string = "entity cannot move")]
    NotMovable,
    #[strum(to_string = "coordinate is not among the available targets")]
    NotSelectable,
    #[strum(to_string = "wrong number of selected targets")]
    TargetCount,
    #[strum(to_string = "squeak cannot be placed there")]
    NotPlacable,
    #[strum(to_string = "target has no health")]
    Indestructible,
}

/// Which state-machine rule a call violated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StateIssue {
    #[strum(to_string = "a skill is waiting for target selection")]
    SelectingTargets,
    #[strum(to_string = "no skill is waiting for target selection")]
    NotSelectingTargets,
    #[strum(to_string = "pending skill cannot be cancelled")]
    NotCancelable,
    #[strum(to_string = "the game is over")]
    GameOver,
}

/// Errors surfaced by the engine.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// Out-of-grid coordinate, or tile missing an expected occupant.
    #[error("invalid position {coord}: {issue}")]
    InvalidPosition {
        coord: OddRCoord,
        issue: PositionIssue,
    },

    /// Entity id does not refer to a live entity.
    #[error("entity {0} not found")]
    EntityNotFound(EntityId),

    /// Feature id does not refer to a live feature.
    #[error("feature {0} not found")]
    FeatureNotFound(FeatureId),

    /// Crumbs, move stamina, or skill stamina too low.
    #[error("insufficient {resource}: required {required}, available {available}")]
    InsufficientResource {
        resource: Resource,
        required: u32,
        available: u32,
    },

    /// Move beyond speed, unreachable path, target outside the available set.
    #[error("invalid target: {0}")]
    InvalidTarget(TargetIssue),

    /// Mutating call while target selection is pending, or the reverse.
    #[error("invalid state transition: {0}")]
    InvalidStateTransition(StateIssue),

    /// Content refers to something that does not exist. Raised at registration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Argument outside its documented domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}

impl EngineError {
    pub const fn out_of_bounds(coord: OddRCoord) -> Self {
        Self::InvalidPosition {
            coord,
            issue: PositionIssue::OutOfBounds,
        }
    }

    pub const fn missing_occupant(coord: OddRCoord) -> Self {
        Self::InvalidPosition {
            coord,
            issue: PositionIssue::MissingOccupant,
        }
    }

    pub const fn not_enough(resource: Resource, required: u32, available: u32) -> Self {
        Self::InsufficientResource {
            resource,
            required,
            available,
        }
    }
}

impl GameError for EngineError {
    fn severity(&self) -> ErrorSeverity {
        use EngineError::*;
        match self {
            InvalidPosition { .. } | EntityNotFound(_) | FeatureNotFound(_) => {
                ErrorSeverity::Validation
            }
            InsufficientResource { .. } => ErrorSeverity::Recoverable,
            InvalidTarget(_) | InvalidArgument(_) => ErrorSeverity::Validation,
            InvalidStateTransition(_) => ErrorSeverity::Internal,
            Configuration(_) => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        use EngineError::*;
        match self {
            InvalidPosition { .. } => "ENGINE_INVALID_POSITION",
            EntityNotFound(_) => "ENGINE_ENTITY_NOT_FOUND",
            FeatureNotFound(_) => "ENGINE_FEATURE_NOT_FOUND",
            InsufficientResource { .. } => "ENGINE_INSUFFICIENT_RESOURCE",
            InvalidTarget(_) => "ENGINE_INVALID_TARGET",
            InvalidStateTransition(_) => "ENGINE_INVALID_STATE_TRANSITION",
            Configuration(_) => "ENGINE_CONFIGURATION",
            InvalidArgument(_) => "ENGINE_INVALID_ARGUMENT",
        }
    }
}

/// Result alias used throughout the engine.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_follows_taxonomy() {
        let err = EngineError::not_enough(Resource::Crumbs, 5, 2);
        assert!(err.severity().is_recoverable());
        assert_eq!(err.error_code(), "ENGINE_INSUFFICIENT_RESOURCE");

        let err = EngineError::Configuration("unknown resolver 'zap'".into());
        assert!(err.severity().is_internal());
    }

    #[test]
    fn messages_include_details() {
        let err = EngineError::not_enough(Resource::MoveStamina, 1, 0);
        assert_eq!(
            err.to_string(),
            "insufficient move_stamina: required 1, available 0"
        );

        let err = EngineError::out_of_bounds(OddRCoord::new(-1, 3));
        assert_eq!(err.to_string(), "invalid position (-1, 3): outside the board");
    }
}
