//! Certification irregularity detection
//!
//! Runs four ordered passes over a record and type snapshot and returns
//! severity-ranked finding groups:
//!
//! 1. exact duplicates (same owner, name and function)
//! 2. similar names (same owner and function, names within edit tolerance)
//! 3. function mismatches (same owner and name, differing functions)
//! 4. duplicate catalog types (same platform and short name)
//!
//! Classification is a pure function of its inputs and can be re-run at will.

mod group;
mod passes;
mod suggestion;

pub use group::FindingGroup;

use crate::config::MatchingConfig;
use crate::error::{EngineError, Result};
use crate::model::{CertificationRecord, CertificationType};
use passes::{duplicate_type_pass, exact_pass, function_mismatch_pass, similar_pass, Prepared};

/// Runs detection passes with a given matching configuration
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    config: MatchingConfig,
}

impl Classifier {
    pub fn new(config: MatchingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Classify a snapshot into ordered finding groups
    ///
    /// Records missing `id` or `ownerId` and types missing `id` or
    /// `platformId` are skipped with a warning. An `Err` means the run is
    /// unusable, not that there were zero findings.
    pub fn classify(
        &self,
        records: &[CertificationRecord],
        types: &[CertificationType],
    ) -> Result<Vec<FindingGroup>> {
        let prepared: Vec<Prepared<'_>> = records
            .iter()
            .filter(|r| {
                let valid = r.is_valid();
                if !valid {
                    tracing::warn!("Skipping record without id or owner: {:?}", r.id);
                }
                valid
            })
            .map(Prepared::new)
            .collect();

        let types: Vec<CertificationType> = types
            .iter()
            .filter(|t| {
                let valid = t.is_valid();
                if !valid {
                    tracing::warn!("Skipping type without id or platform: {:?}", t.id);
                }
                valid
            })
            .cloned()
            .collect();

        let mut processed = vec![false; prepared.len()];

        let exact = exact_pass(&prepared, &types, &mut processed);
        tracing::debug!("Exact pass: {} groups", exact.len());

        let similar = similar_pass(&prepared, &types, &mut processed, &self.config)?;
        tracing::debug!("Similar pass: {} groups", similar.len());

        let mismatched = function_mismatch_pass(&prepared, &mut processed);
        tracing::debug!("Function mismatch pass: {} groups", mismatched.len());

        let duplicate_types = duplicate_type_pass(&types, &self.config);
        tracing::debug!("Duplicate type pass: {} groups", duplicate_types.len());

        let mut groups: Vec<FindingGroup> = exact
            .into_iter()
            .chain(similar)
            .chain(mismatched)
            .chain(duplicate_types)
            .collect();

        // stable: discovery order is kept within a severity
        groups.sort_by_key(|g| g.severity.rank());

        for (index, group) in groups.iter_mut().enumerate() {
            if group.severity.is_standardizable() && group.members.len() < 2 {
                return Err(EngineError::ComputationDefect(format!(
                    "{} group with {} member(s)",
                    group.severity,
                    group.members.len()
                )));
            }
            group.number = index as u32 + 1;
        }

        tracing::info!(
            "Classified {} records and {} types into {} groups",
            prepared.len(),
            types.len(),
            groups.len()
        );

        Ok(groups)
    }
}

/// Classify with the default matching configuration
pub fn classify(
    records: &[CertificationRecord],
    types: &[CertificationType],
) -> Result<Vec<FindingGroup>> {
    Classifier::default().classify(records, types)
}
