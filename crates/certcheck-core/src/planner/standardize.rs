//! Standardization: rewrite a group's records to one catalog name/function

use serde::{Deserialize, Serialize};

use crate::detection::FindingGroup;
use crate::error::PlanError;
use crate::model::CertificationType;

/// Records to update and the values to write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardizationPlan {
    pub group_number: u32,
    pub target_type_id: String,
    pub record_ids: Vec<String>,
    pub new_name: String,
    pub new_function: String,
}

/// Plan rewriting every member of `group` to `target`'s name and function
///
/// The written name is the target's full name, or its short name when the
/// full name is blank.
pub fn plan_standardization(
    group: &FindingGroup,
    target: Option<&CertificationType>,
) -> Result<StandardizationPlan, PlanError> {
    if !group.severity.is_standardizable() {
        return Err(PlanError::InvalidSeverity(group.severity));
    }
    let target = target.ok_or(PlanError::MissingTarget)?;
    if !target.is_active {
        return Err(PlanError::InactiveTarget(target.id.clone()));
    }
    let new_name = target.comparison_name().trim();
    if new_name.is_empty() {
        return Err(PlanError::UnnamedTarget(target.id.clone()));
    }
    if group.members.is_empty() {
        return Err(PlanError::EmptyGroup);
    }

    let mut record_ids: Vec<String> = Vec::with_capacity(group.members.len());
    for member in &group.members {
        if !record_ids.contains(&member.id) {
            record_ids.push(member.id.clone());
        }
    }

    Ok(StandardizationPlan {
        group_number: group.number,
        target_type_id: target.id.clone(),
        record_ids,
        new_name: new_name.to_string(),
        new_function: target.function.clone(),
    })
}
