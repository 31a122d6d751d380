//! Finding severity.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Fixed-priority classification of a finding group.
///
/// Declaration order is presentation and fix priority, so the derived `Ord`
/// sorts `DuplicateType` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Two catalog types on one platform describe the same certification
    DuplicateType,
    /// Same owner entered the same certification more than once
    Exact,
    /// Same owner entered near-identical names
    Similar,
    /// Same owner, same name, different function labels
    FunctionMismatch,
}

impl Severity {
    /// All severities in presentation order.
    pub const ALL: [Severity; 4] = [
        Severity::DuplicateType,
        Severity::Exact,
        Severity::Similar,
        Severity::FunctionMismatch,
    ];

    /// Sort rank, lower is more urgent.
    pub fn rank(&self) -> u8 {
        match self {
            Self::DuplicateType => 0,
            Self::Exact => 1,
            Self::Similar => 2,
            Self::FunctionMismatch => 3,
        }
    }

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DuplicateType => "duplicate_type",
            Self::Exact => "exact",
            Self::Similar => "similar",
            Self::FunctionMismatch => "function_mismatch",
        }
    }

    /// Display name for UI.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::DuplicateType => "Duplicate type",
            Self::Exact => "Exact duplicate",
            Self::Similar => "Similar name",
            Self::FunctionMismatch => "Function mismatch",
        }
    }

    /// Whether the group can be fixed by standardizing its records.
    pub fn is_standardizable(&self) -> bool {
        !matches!(self, Self::DuplicateType)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized severity name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown severity: {0}")]
pub struct UnknownSeverity(pub String);

impl FromStr for Severity {
    type Err = UnknownSeverity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "duplicate_type" => Ok(Self::DuplicateType),
            // older stored filters used these spellings
            "exact" | "exact_duplicate" => Ok(Self::Exact),
            "similar" => Ok(Self::Similar),
            "function_mismatch" | "function_variation" => Ok(Self::FunctionMismatch),
            other => Err(UnknownSeverity(other.to_string())),
        }
    }
}
