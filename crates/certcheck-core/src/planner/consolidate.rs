//! Consolidation: migrate records off duplicate catalog types onto one survivor

use serde::{Deserialize, Serialize};

use crate::detection::FindingGroup;
use crate::error::PlanError;
use crate::model::{CertificationRecord, CertificationType};
use crate::severity::Severity;

/// Records named `old_name` are renamed to `new_name`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepointRule {
    pub old_name: String,
    pub new_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidationPlan {
    pub survivor_id: String,
    pub records_to_repoint: Vec<RepointRule>,
    /// Deactivated, never deleted
    pub types_to_deactivate: Vec<String>,
}

/// Plan folding every type in `types` into the one with `survivor_id`
///
/// The survivor must be active. Records are renamed to its full name, or to
/// its short name when the full name is blank.
pub fn plan_consolidation(
    types: &[CertificationType],
    survivor_id: &str,
) -> Result<ConsolidationPlan, PlanError> {
    if types.len() < 2 {
        return Err(PlanError::TooFewTypes(types.len()));
    }
    let survivor = types
        .iter()
        .find(|t| t.id == survivor_id)
        .ok_or_else(|| PlanError::UnknownSurvivor(survivor_id.to_string()))?;
    if !survivor.is_active {
        return Err(PlanError::InactiveTarget(survivor.id.clone()));
    }
    let new_name = survivor.comparison_name().trim();
    if new_name.is_empty() {
        return Err(PlanError::UnnamedTarget(survivor.id.clone()));
    }

    let mut records_to_repoint: Vec<RepointRule> = Vec::new();
    let mut types_to_deactivate: Vec<String> = Vec::new();

    for ty in types.iter().filter(|t| t.id != survivor.id) {
        for old_name in [&ty.full_name, &ty.name] {
            if old_name.trim().is_empty() || old_name.as_str() == new_name {
                continue;
            }
            if records_to_repoint.iter().any(|r| &r.old_name == old_name) {
                continue;
            }
            records_to_repoint.push(RepointRule {
                old_name: old_name.clone(),
                new_name: new_name.to_string(),
            });
        }
        if !types_to_deactivate.contains(&ty.id) {
            types_to_deactivate.push(ty.id.clone());
        }
    }

    Ok(ConsolidationPlan {
        survivor_id: survivor.id.clone(),
        records_to_repoint,
        types_to_deactivate,
    })
}

/// [`plan_consolidation`] for a `duplicate_type` finding group
pub fn plan_consolidation_for_group(
    group: &FindingGroup,
    survivor_id: &str,
) -> Result<ConsolidationPlan, PlanError> {
    if group.severity != Severity::DuplicateType {
        return Err(PlanError::InvalidSeverity(group.severity));
    }
    plan_consolidation(&group.types, survivor_id)
}

/// How many records currently use a type's name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeUsage {
    pub type_id: String,
    pub record_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurvivorRecommendation {
    pub usage: Vec<TypeUsage>,
    /// Absent when the top count is shared; the user has to choose
    pub recommended: Option<String>,
}

/// Recommend the type most records already use (exact raw name match)
///
/// Usage is reported for every type, but only active types can be recommended.
pub fn recommend_survivor(
    types: &[CertificationType],
    records: &[CertificationRecord],
) -> SurvivorRecommendation {
    let usage: Vec<TypeUsage> = types
        .iter()
        .map(|t| TypeUsage {
            type_id: t.id.clone(),
            record_count: records
                .iter()
                .filter(|r| r.name == t.full_name || r.name == t.name)
                .count(),
        })
        .collect();

    let candidates: Vec<&TypeUsage> = usage
        .iter()
        .zip(types)
        .filter(|(_, t)| t.is_active)
        .map(|(u, _)| u)
        .collect();
    let top = candidates.iter().map(|u| u.record_count).max().unwrap_or(0);
    let mut leaders = candidates.iter().filter(|u| u.record_count == top);
    let recommended = match (leaders.next(), leaders.next()) {
        (Some(only), None) => Some(only.type_id.clone()),
        _ => None,
    };

    SurvivorRecommendation { usage, recommended }
}
