//! Filtering, counting, and view-local edits over finding groups.
//!
//! Nothing here touches storage; the group list is the dashboard's view.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::detection::FindingGroup;
use crate::severity::{Severity, UnknownSeverity};

/// Severity filter selected in the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeverityFilter {
    #[default]
    All,
    Only(Severity),
}

impl SeverityFilter {
    pub fn matches(&self, severity: Severity) -> bool {
        match self {
            Self::All => true,
            Self::Only(s) => *s == severity,
        }
    }
}

impl FromStr for SeverityFilter {
    type Err = UnknownSeverity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

/// Subsequence of `groups` matching `filter`, original order preserved.
pub fn filter_by_severity(groups: &[FindingGroup], filter: SeverityFilter) -> Vec<&FindingGroup> {
    groups.iter().filter(|g| filter.matches(g.severity)).collect()
}

/// Aggregate counts for dashboard display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeverityCounts {
    pub duplicate_type: usize,
    pub exact: usize,
    pub similar: usize,
    pub function_mismatch: usize,
    pub total_groups: usize,
    /// Sum of member records across groups
    pub records_implicated: usize,
}

impl SeverityCounts {
    pub fn from_groups(groups: &[FindingGroup]) -> Self {
        let mut counts = Self::default();
        for group in groups {
            match group.severity {
                Severity::DuplicateType => counts.duplicate_type += 1,
                Severity::Exact => counts.exact += 1,
                Severity::Similar => counts.similar += 1,
                Severity::FunctionMismatch => counts.function_mismatch += 1,
            }
            counts.total_groups += 1;
            counts.records_implicated += group.members.len();
        }
        counts
    }

    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::DuplicateType => self.duplicate_type,
            Severity::Exact => self.exact,
            Severity::Similar => self.similar,
            Severity::FunctionMismatch => self.function_mismatch,
        }
    }
}

/// What happened to the group after removing a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// Name and its records dropped, group still shown
    Shrunk,
    /// Fewer than two distinct names remained, group removed from the view
    Deleted,
    /// No group with that number
    GroupNotFound,
    /// Group does not list that name
    NameNotFound,
}

/// Drop one name (and the records typed with it) from a displayed group.
///
/// View-local only: the caller must never write this back to storage.
pub fn remove_name(groups: &mut Vec<FindingGroup>, number: u32, name: &str) -> RemoveOutcome {
    let Some(pos) = groups.iter().position(|g| g.number == number) else {
        return RemoveOutcome::GroupNotFound;
    };

    let group = &mut groups[pos];
    if !group.names.iter().any(|n| n == name) {
        return RemoveOutcome::NameNotFound;
    }

    group.names.retain(|n| n != name);
    group.members.retain(|m| m.name != name);
    group.types.retain(|t| t.display_label() != name);

    if group.names.len() < 2 {
        groups.remove(pos);
        RemoveOutcome::Deleted
    } else {
        RemoveOutcome::Shrunk
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CertificationRecord;

    fn group(number: u32, severity: Severity, names: &[&str]) -> FindingGroup {
        FindingGroup {
            number,
            severity,
            names: names.iter().map(|n| n.to_string()).collect(),
            members: names
                .iter()
                .enumerate()
                .map(|(i, n)| CertificationRecord::new(format!("{}-{}", number, i), *n, "Cloud", "u1"))
                .collect(),
            types: Vec::new(),
            suggested_type: None,
        }
    }

    #[test]
    fn test_filter_parse() {
        assert_eq!("ALL".parse::<SeverityFilter>().unwrap(), SeverityFilter::All);
        assert_eq!(
            "similar".parse::<SeverityFilter>().unwrap(),
            SeverityFilter::Only(Severity::Similar)
        );
        assert!("bogus".parse::<SeverityFilter>().is_err());
    }

    #[test]
    fn test_filter_preserves_order() {
        let groups = vec![
            group(1, Severity::Exact, &["A", "A"]),
            group(2, Severity::Similar, &["B", "Bb"]),
            group(3, Severity::Exact, &["C", "C"]),
        ];
        let exact = filter_by_severity(&groups, SeverityFilter::Only(Severity::Exact));
        let numbers: Vec<u32> = exact.iter().map(|g| g.number).collect();
        assert_eq!(numbers, vec![1, 3]);
        assert_eq!(filter_by_severity(&groups, SeverityFilter::All).len(), 3);
    }

    #[test]
    fn test_counts() {
        let groups = vec![
            group(1, Severity::Exact, &["A", "A"]),
            group(2, Severity::Similar, &["B", "Bb", "Bbb"]),
        ];
        let counts = SeverityCounts::from_groups(&groups);
        assert_eq!(counts.exact, 1);
        assert_eq!(counts.get(Severity::Similar), 1);
        assert_eq!(counts.duplicate_type, 0);
        assert_eq!(counts.total_groups, 2);
        assert_eq!(counts.records_implicated, 5);
    }

    #[test]
    fn test_remove_name_shrinks() {
        let mut groups = vec![group(1, Severity::Similar, &["AWS SA", "AWS S.A.", "AWS SAA"])];
        assert_eq!(remove_name(&mut groups, 1, "AWS SA"), RemoveOutcome::Shrunk);
        assert_eq!(groups[0].names, vec!["AWS S.A.", "AWS SAA"]);
        assert_eq!(groups[0].members.len(), 2);
        assert_eq!(groups[0].number, 1);
    }

    #[test]
    fn test_remove_name_deletes() {
        let mut groups = vec![
            group(1, Severity::Similar, &["AWS SA", "AWS Solutions Architect"]),
            group(2, Severity::Exact, &["PMP", "PMP"]),
        ];
        assert_eq!(remove_name(&mut groups, 1, "AWS SA"), RemoveOutcome::Deleted);
        assert_eq!(groups.len(), 1);
        // numbers are not recomputed after a deletion
        assert_eq!(groups[0].number, 2);
    }

    #[test]
    fn test_remove_name_not_found() {
        let mut groups = vec![group(1, Severity::Similar, &["A", "B"])];
        assert_eq!(remove_name(&mut groups, 9, "A"), RemoveOutcome::GroupNotFound);
        assert_eq!(remove_name(&mut groups, 1, "Z"), RemoveOutcome::NameNotFound);
        assert_eq!(groups[0].names.len(), 2);
    }
}
