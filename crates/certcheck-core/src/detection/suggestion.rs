//! Suggested-type heuristics
//!
//! Best-effort hints that always require human confirmation. Containment is
//! checked in both directions over normalized strings, so short type names can
//! match broadly.

use crate::matching::{contains_either, normalize};
use crate::model::CertificationType;

/// First active type whose full name contains, or is contained by, the group name
pub(crate) fn suggest_for_exact(
    first_name: &str,
    types: &[CertificationType],
) -> Option<CertificationType> {
    let name = normalize(first_name);
    types
        .iter()
        .filter(|t| t.is_active)
        .find(|t| contains_either(&normalize(&t.full_name), &name))
        .cloned()
}

/// First active type matching the group name by alias, or by `"{name} - {function}"`
///
/// Inactive types are skipped here too, so both record passes only ever point
/// a group at a type that standardization will accept.
pub(crate) fn suggest_for_similar(
    first_name: &str,
    function: &str,
    types: &[CertificationType],
) -> Option<CertificationType> {
    let name = normalize(first_name);
    let labelled = normalize(&format!("{} - {}", first_name, function));

    types
        .iter()
        .filter(|t| t.is_active)
        .find(|t| {
            let by_alias = t
                .aliases
                .iter()
                .any(|alias| contains_either(&normalize(alias), &name));
            by_alias
                || contains_either(&normalize(&format!("{} - {}", t.name, t.function)), &labelled)
        })
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<CertificationType> {
        vec![
            CertificationType::new("old", "aws", "SAA", "AWS Solutions Architect Associate")
                .with_function("Cloud")
                .inactive(),
            CertificationType::new("saa", "aws", "SAA", "AWS Solutions Architect Associate")
                .with_function("Cloud")
                .with_aliases(["AWS SA Associate"]),
            CertificationType::new("az104", "azure", "AZ-104", "Azure Administrator")
                .with_function("Infra"),
        ]
    }

    #[test]
    fn test_exact_suggestion_skips_inactive() {
        let suggested = suggest_for_exact("AWS Solutions Architect", &catalog()).unwrap();
        assert_eq!(suggested.id, "saa");
    }

    #[test]
    fn test_exact_suggestion_contained_by_name() {
        let suggested = suggest_for_exact("Azure Administrator (2023)", &catalog()).unwrap();
        assert_eq!(suggested.id, "az104");
    }

    #[test]
    fn test_exact_suggestion_none() {
        assert!(suggest_for_exact("PMP", &catalog()).is_none());
        assert!(suggest_for_exact("", &catalog()).is_none());
    }

    #[test]
    fn test_similar_suggestion_by_alias() {
        let suggested = suggest_for_similar("aws sa associate", "Whatever", &catalog()).unwrap();
        assert_eq!(suggested.id, "saa");
    }

    #[test]
    fn test_similar_suggestion_skips_inactive() {
        // "old" is first in catalog order and matches on name and function
        let suggested = suggest_for_similar("SAA", "Cloud", &catalog()).unwrap();
        assert_eq!(suggested.id, "saa");
    }

    #[test]
    fn test_similar_suggestion_by_name_and_function() {
        // "az 104" keeps its space, "AZ-104" loses the hyphen
        let suggested = suggest_for_similar("AZ 104", "Infra", &catalog());
        assert!(suggested.is_none());
        let suggested = suggest_for_similar("AZ-104", "Infra", &catalog()).unwrap();
        assert_eq!(suggested.id, "az104");
    }
}
