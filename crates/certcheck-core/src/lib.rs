//! certcheck-core: certification irregularity detection
//!
//! This library provides:
//! - Name normalization and edit-distance similarity
//! - Duplicate classification over certification records and catalog types
//! - Severity ranking, filtering, and view-local group edits
//! - Standardization and type consolidation planning
//! - Review sessions with at-most-one-in-flight writes per group
//! - Debounced re-classification after data changes
//!
//! Persistence is the caller's concern; see the traits in [`store`].

pub mod config;
pub mod detection;
pub mod error;
pub mod matching;
pub mod model;
pub mod planner;
pub mod ranking;
pub mod refresh;
pub mod session;
pub mod severity;
pub mod store;

// Re-export main types for convenience
pub use config::{ConfigError, EngineConfig, MatchingConfig, RefreshConfig};
pub use detection::{classify, Classifier, FindingGroup};
pub use error::{EngineError, EntityKind, InputError, PlanError, SessionError, StoreError};
pub use matching::{are_similar, edit_distance, normalize, similarity};
pub use model::{
    ingest, CertificationRecord, CertificationType, Dataset, RawCertificationRecord,
    RawCertificationType,
};
pub use planner::{
    plan_consolidation, plan_consolidation_for_group, plan_standardization, recommend_survivor,
    ConsolidationPlan, RepointRule, StandardizationPlan, SurvivorRecommendation,
};
pub use ranking::{filter_by_severity, remove_name, RemoveOutcome, SeverityCounts, SeverityFilter};
pub use refresh::{Debouncer, RefreshScheduler};
pub use session::{FindingState, PendingWrite, ReviewSession, WriteOutcome};
pub use severity::Severity;
pub use store::{InMemoryStore, RecordSource, TypeCatalogSource, WriteExecutor, WriteReport};

/// Returns the version of certcheck-core
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
