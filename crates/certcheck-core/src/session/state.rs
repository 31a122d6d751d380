//! Finding lifecycle state machine
//!
//! State transitions:
//! ```text
//! Detected → Reviewing → Applying → Applied
//!     │          │          │
//!     │          ↓          └──→ Reviewing (write failed)
//!     └──────→ Dismissed
//! ```
//!
//! `Detected → Applying` is also allowed for one-click apply. `Applied` and
//! `Dismissed` are terminal; only a new classification run can bring a group
//! back.

use serde::{Deserialize, Serialize};

/// Where a finding group is in a review session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FindingState {
    /// Produced by the latest classification run
    #[default]
    Detected,
    /// A user has opened the group
    Reviewing,
    /// A write is outstanding
    Applying,
    /// Write succeeded; awaiting re-classification
    Applied,
    /// User chose not to act
    Dismissed,
}

impl FindingState {
    /// Check if a state transition is valid
    pub fn can_transition_to(&self, target: &FindingState) -> bool {
        matches!(
            (self, target),
            (FindingState::Detected, FindingState::Reviewing)
                | (FindingState::Detected, FindingState::Applying)
                | (FindingState::Detected, FindingState::Dismissed)
                | (FindingState::Reviewing, FindingState::Applying)
                | (FindingState::Reviewing, FindingState::Dismissed)
                | (FindingState::Applying, FindingState::Applied)
                | (FindingState::Applying, FindingState::Reviewing)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, FindingState::Applied | FindingState::Dismissed)
    }

    /// Whether the "Apply" action should be enabled
    pub fn can_apply(&self) -> bool {
        matches!(self, FindingState::Detected | FindingState::Reviewing)
    }
}

impl std::fmt::Display for FindingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FindingState::Detected => write!(f, "DETECTED"),
            FindingState::Reviewing => write!(f, "REVIEWING"),
            FindingState::Applying => write!(f, "APPLYING"),
            FindingState::Applied => write!(f, "APPLIED"),
            FindingState::Dismissed => write!(f, "DISMISSED"),
        }
    }
}
