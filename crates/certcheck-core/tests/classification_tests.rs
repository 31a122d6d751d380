//! Classification integration tests
//!
//! End-to-end scenarios over records and catalog types, plus
//! property-based checks of the matching primitives.

mod common;

use certcheck_core::{
    are_similar, classify, filter_by_severity, normalize, similarity, Severity, SeverityCounts,
    SeverityFilter,
};
use common::{cert_type, load_dataset, record};
use proptest::prelude::*;
use rstest::rstest;

// === End-to-end Scenarios ===

#[test]
fn test_exact_duplicate_scenario() {
    let records = vec![
        record("1", "Azure Admin", "Infra", "u1"),
        record("2", "Azure Admin", "Infra", "u1"),
    ];
    let groups = classify(&records, &[]).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].severity, Severity::Exact);
    assert_eq!(groups[0].member_ids(), vec!["1", "2"]);
    assert_eq!(groups[0].names, vec!["Azure Admin"]);
}

#[test]
fn test_similar_name_scenario() {
    let records = vec![
        record("1", "GCP Architect", "Cloud", "u1"),
        record("2", "GCP Architecte", "Cloud", "u1"),
    ];
    let groups = classify(&records, &[]).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].severity, Severity::Similar);
    assert_eq!(groups[0].names, vec!["GCP Architect", "GCP Architecte"]);
}

#[test]
fn test_function_mismatch_scenario() {
    let records = vec![
        record("1", "PMP", "Management", "u1"),
        record("2", "PMP", "Leadership", "u1"),
    ];
    let groups = classify(&records, &[]).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].severity, Severity::FunctionMismatch);
    assert_eq!(groups[0].names, vec!["PMP"]);
    assert!(groups[0].suggested_type.is_none());
    assert_eq!(groups[0].members.len(), 2);
}

#[test]
fn test_duplicate_type_scenario() {
    let types = vec![
        cert_type("a", "p1", "SA", "Solutions Architect Pro").with_aliases(["SAP"]),
        cert_type("b", "p1", "SA", "Solutions Architect Proo"),
    ];
    let groups = classify(&[], &types).unwrap();

    assert_eq!(groups.len(), 1);
    let group = &groups[0];
    assert_eq!(group.severity, Severity::DuplicateType);
    assert!(group.members.is_empty());
    assert!(group.suggested_type.is_none());
    let ids: Vec<&str> = group.types.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(
        group.names,
        vec!["SA (Solutions Architect Pro)", "SA (Solutions Architect Proo)"]
    );
}

#[test]
fn test_duplicate_type_by_alias_overlap() {
    let types = vec![
        cert_type("a", "p1", "CKA", "Certified Kubernetes Administrator").with_aliases(["K8s Admin"]),
        cert_type("b", "p1", "CKA", "Kubernetes Admin Certification").with_aliases(["k8s admin"]),
    ];
    let groups = classify(&[], &types).unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].severity, Severity::DuplicateType);
}

#[test]
fn test_duplicate_type_far_names_not_flagged() {
    let types = vec![
        cert_type("a", "p1", "SA", "Solutions Architect Professional"),
        cert_type("b", "p1", "SA", "Security Analyst"),
    ];
    assert!(classify(&[], &types).unwrap().is_empty());
}

// === Boundaries ===

#[test]
fn test_exact_duplicates_across_owners_are_not_errors() {
    let records = vec![
        record("1", "AWS SA", "Cloud", "u1"),
        record("2", "AWS SA", "Cloud", "u2"),
    ];
    assert!(classify(&records, &[]).unwrap().is_empty());
}

#[test]
fn test_similar_names_across_functions_not_similar() {
    let records = vec![
        record("1", "GCP Architect", "Cloud", "u1"),
        record("2", "GCP Architecte", "Data", "u1"),
    ];
    assert!(classify(&records, &[]).unwrap().is_empty());
}

#[test]
fn test_exact_pass_consumes_before_similar() {
    let records = vec![
        record("1", "AWS Solutions Architect", "Cloud", "u1"),
        record("2", "AWS Solutions Architect", "Cloud", "u1"),
        record("3", "AWS Solution Architect", "Cloud", "u1"),
        record("4", "AWS Solution Architect", "Cloud", "u1"),
    ];
    let groups = classify(&records, &[]).unwrap();

    assert_eq!(groups.len(), 2);
    assert!(groups.iter().all(|g| g.severity == Severity::Exact));
    assert_eq!(groups[0].member_ids(), vec!["1", "2"]);
    assert_eq!(groups[1].member_ids(), vec!["3", "4"]);
}

#[test]
fn test_similar_group_is_anchor_relative() {
    // record 3 is 0.7 from the anchor and 0.8 from record 2, so it stays out
    let records = vec![
        record("1", "abcdefghij", "X", "u1"),
        record("2", "abcdefghiz", "X", "u1"),
        record("3", "abcdefgzzz", "X", "u1"),
    ];
    let groups = classify(&records, &[]).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].member_ids(), vec!["1", "2"]);
}

#[test]
fn test_similar_suggestion_uses_most_common_function() {
    let records = vec![
        record("1", "GCP Architect", "Cloud", "u1"),
        record("2", "GCP Architecte", "Cloud", "u1"),
    ];
    let types = vec![
        cert_type("pca", "gcp", "GCP Architect", "Professional Cloud Architect").with_function("Cloud"),
    ];
    let groups = classify(&records, &types).unwrap();
    assert_eq!(groups[0].suggested_type.as_ref().unwrap().id, "pca");
}

#[test]
fn test_missing_optional_fields() {
    let records = vec![record("1", "", "", "u1"), record("2", "", "", "u1")];
    let types = vec![cert_type("a", "p1", "", ""), cert_type("b", "p1", "", "")];
    let groups = classify(&records, &types).unwrap();

    let severities: Vec<Severity> = groups.iter().map(|g| g.severity).collect();
    assert_eq!(severities, vec![Severity::DuplicateType, Severity::Exact]);
    assert!(groups[1].suggested_type.is_none());
}

// === Ordering ===

#[test]
fn test_severity_ordering_and_filter() {
    let dataset = load_dataset("dataset.json");
    let groups = classify(&dataset.records, &dataset.types).unwrap();

    let severities: Vec<Severity> = filter_by_severity(&groups, SeverityFilter::All)
        .iter()
        .map(|g| g.severity)
        .collect();
    assert_eq!(severities, Severity::ALL.to_vec());

    let numbers: Vec<u32> = groups.iter().map(|g| g.number).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4]);
}

#[test]
fn test_fixture_findings() {
    let dataset = load_dataset("dataset.json");
    assert_eq!(dataset.skipped.len(), 2);

    let groups = classify(&dataset.records, &dataset.types).unwrap();

    let exact = &groups[1];
    assert_eq!(exact.member_ids(), vec!["r1", "r2"]);
    assert_eq!(exact.names, vec!["Azure Admin", "azure  admin"]);
    assert_eq!(exact.suggested_type.as_ref().unwrap().id, "az");
    assert_eq!(exact.most_recent_member().unwrap().id, "r2");

    let similar = &groups[2];
    assert_eq!(similar.member_ids(), vec!["r3", "r4"]);
    assert_eq!(similar.suggested_type.as_ref().unwrap().id, "pca");

    let counts = SeverityCounts::from_groups(&groups);
    assert_eq!(counts.total_groups, 4);
    assert_eq!(counts.records_implicated, 6);
}

#[test]
fn test_determinism() {
    let dataset = load_dataset("dataset.json");
    let first = classify(&dataset.records, &dataset.types).unwrap();
    let second = classify(&dataset.records, &dataset.types).unwrap();
    assert_eq!(first, second);
}

// === Matching Primitives ===

#[rstest]
#[case("AWS Solutions Architect", "AWS Solution Architect", true)]
#[case("GCP Architect", "GCP Architecte", true)]
#[case("AWS Architect", "AWS Architect", false)]
#[case("AWS Architect", "aws architect!", false)]
#[case("AWS Architect", "aws-architect", true)]
#[case("PMP", "PMI", false)]
#[case("", "", false)]
fn test_are_similar_cases(#[case] a: &str, #[case] b: &str, #[case] expected: bool) {
    assert_eq!(are_similar(a, b), expected);
}

#[rstest]
#[case("  Azure\tAdmin  ", "azure admin")]
#[case("C++ / C#", "c c")]
#[case("ITIL® 4 Foundation", "itil 4 foundation")]
#[case("", "")]
fn test_normalize_cases(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(normalize(input), expected);
}

// === Property-Based Tests ===

proptest! {
    #[test]
    fn test_normalize_idempotent(s in "[a-zA-Z0-9éüß _.,!()\\-\t]{0,40}") {
        let once = normalize(&s);
        prop_assert_eq!(normalize(&once), once.clone());
    }

    #[test]
    fn test_similarity_symmetric(a in "[a-zA-Z ]{0,20}", b in "[a-zA-Z ]{0,20}") {
        prop_assert_eq!(similarity(&a, &b), similarity(&b, &a));
    }

    #[test]
    fn test_similarity_bounded(a in "[a-zA-Z ]{0,20}", b in "[a-zA-Z ]{0,20}") {
        let score = similarity(&a, &b);
        prop_assert!((0.0..=1.0).contains(&score), "similarity out of range: {}", score);
    }

    #[test]
    fn test_self_similarity(a in "[a-zA-Z]{1,20}") {
        prop_assert_eq!(similarity(&a, &a), 1.0);
        prop_assert!(!are_similar(&a, &a));
    }

    #[test]
    fn test_classify_deterministic(
        names in prop::collection::vec("(AWS|GCP|PMP) (SA|Admin|Adminn)", 0..12),
        owners in prop::collection::vec(0u8..3, 12),
    ) {
        let records: Vec<_> = names
            .iter()
            .enumerate()
            .map(|(i, n)| record(&i.to_string(), n, "Cloud", &format!("u{}", owners[i])))
            .collect();
        let first = classify(&records, &[]).unwrap();
        let second = classify(&records, &[]).unwrap();
        prop_assert_eq!(&first, &second);

        // every record lands in at most one group
        let mut ids: Vec<&str> = first.iter().flat_map(|g| g.member_ids()).collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        prop_assert_eq!(ids.len(), total);
    }
}
