//! Error types for certcheck-core

use thiserror::Error;

use crate::session::FindingState;
use crate::severity::Severity;

/// Result type alias for classification
pub type Result<T> = std::result::Result<T, EngineError>;

/// Which kind of entity failed validation at the input boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Record,
    Type,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Record => write!(f, "record"),
            EntityKind::Type => write!(f, "type"),
        }
    }
}

/// A malformed record or type. The offending entity is skipped, never fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} #{index} is missing required field `{field}`")]
pub struct InputError {
    pub kind: EntityKind,
    /// Position in the input collection
    pub index: usize,
    pub field: &'static str,
    /// The entity id, when it was present
    pub id: Option<String>,
}

/// Errors raised by the classifier itself
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// An internal invariant was violated. Findings from this run must not be shown.
    #[error("Computation defect: {0}")]
    ComputationDefect(String),
}

/// Planner contract violations, rejected before any write is attempted
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("Cannot plan this operation for a {0} group")]
    InvalidSeverity(Severity),

    #[error("No target type selected")]
    MissingTarget,

    #[error("Target type {0} is inactive")]
    InactiveTarget(String),

    #[error("Target type {0} has no name to write")]
    UnnamedTarget(String),

    #[error("Group has no records to update")]
    EmptyGroup,

    #[error("Survivor {0} is not part of the duplicate set")]
    UnknownSurvivor(String),

    #[error("Consolidation needs at least two types, got {0}")]
    TooFewTypes(usize),
}

/// Failures reported by the external store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Underlying data changed since the group was computed
    #[error("This group is stale, please refresh (missing: {})", missing_ids.join(", "))]
    WriteConflict { missing_ids: Vec<String> },

    /// Some writes landed, some did not
    #[error("Write failed for records: {}", failed_ids.join(", "))]
    PartialWrite { failed_ids: Vec<String> },

    /// Store could not be reached or refused the request
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by a review session
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Finding group {0} not found")]
    UnknownGroup(u32),

    #[error("A write is already in flight for group {0}")]
    WriteInFlight(u32),

    #[error("Writes are still in flight, refresh after they complete")]
    RefreshBlocked,

    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition { from: FindingState, to: FindingState },

    #[error("Type {0} not found in catalog")]
    UnknownType(String),

    #[error("Plan error: {0}")]
    Plan(#[from] PlanError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Classification unavailable: {0}")]
    Engine(#[from] EngineError),
}
