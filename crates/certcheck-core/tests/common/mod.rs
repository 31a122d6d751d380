//! Test fixtures and builders

#![allow(dead_code)]

use std::path::PathBuf;

use certcheck_core::{CertificationRecord, CertificationType, Dataset};

/// Get the path to a fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_fixtures")
        .join(name)
}

/// Load and validate a dataset fixture
pub fn load_dataset(name: &str) -> Dataset {
    let json = std::fs::read_to_string(fixture_path(name))
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", name));
    Dataset::from_json(&json).unwrap_or_else(|e| panic!("Invalid fixture {}: {}", name, e))
}

pub fn record(id: &str, name: &str, function: &str, owner: &str) -> CertificationRecord {
    CertificationRecord::new(id, name, function, owner)
}

pub fn cert_type(id: &str, platform: &str, name: &str, full_name: &str) -> CertificationType {
    CertificationType::new(id, platform, name, full_name)
}
