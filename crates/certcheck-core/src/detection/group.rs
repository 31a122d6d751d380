//! Finding groups produced by a classification run

use serde::{Deserialize, Serialize};

use crate::model::{CertificationRecord, CertificationType};
use crate::severity::Severity;

/// A transient cluster of records (or catalog types) that likely represent
/// the same real-world certification.
///
/// Created fresh by every classification run and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindingGroup {
    /// Stable 1-based display number, assigned once in sorted order
    pub number: u32,
    pub severity: Severity,
    /// Distinct raw names implicated, in discovery order
    pub names: Vec<String>,
    /// Records involved (empty for `duplicate_type`)
    pub members: Vec<CertificationRecord>,
    /// Catalog types involved (only for `duplicate_type`)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<CertificationType>,
    /// Best-guess type to standardize toward
    pub suggested_type: Option<CertificationType>,
}

impl FindingGroup {
    pub(crate) fn records(
        severity: Severity,
        members: Vec<CertificationRecord>,
        suggested_type: Option<CertificationType>,
    ) -> Self {
        let names = distinct_names(members.iter().map(|m| m.name.as_str()));
        Self {
            number: 0,
            severity,
            names,
            members,
            types: Vec::new(),
            suggested_type,
        }
    }

    pub(crate) fn duplicate_types(types: Vec<CertificationType>) -> Self {
        let labels: Vec<String> = types.iter().map(|t| t.display_label()).collect();
        Self {
            number: 0,
            severity: Severity::DuplicateType,
            names: distinct_names(labels.iter().map(String::as_str)),
            members: Vec::new(),
            types,
            suggested_type: None,
        }
    }

    /// Ids of every member record, in member order
    pub fn member_ids(&self) -> Vec<&str> {
        self.members.iter().map(|m| m.id.as_str()).collect()
    }

    pub fn distinct_name_count(&self) -> usize {
        self.names.len()
    }

    /// Most recently created member; ties keep the earliest member
    pub fn most_recent_member(&self) -> Option<&CertificationRecord> {
        self.members.iter().fold(None, |best, m| match best {
            Some(b) if b.created_at >= m.created_at => Some(b),
            _ => Some(m),
        })
    }
}

/// Deduplicate raw names, keeping first occurrence order
pub(crate) fn distinct_names<'a, I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out: Vec<String> = Vec::new();
    for name in names {
        if !out.iter().any(|n| n == name) {
            out.push(name.to_string());
        }
    }
    out
}
