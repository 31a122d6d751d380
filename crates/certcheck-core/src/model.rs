//! Certification records and catalog types
//!
//! Validated value types consumed by the classifier, plus the loosely-typed
//! shapes the backend actually returns. Conversion happens once, at the input
//! boundary, and every rejected entity is reported as an [`InputError`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EntityKind, InputError};

/// One person's claim of holding a certification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificationRecord {
    pub id: String,
    /// Name as the user typed it
    pub name: String,
    /// Role or specialization label as the user typed it
    #[serde(default)]
    pub function: String,
    pub owner_id: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub validity_date: Option<NaiveDate>,
}

impl CertificationRecord {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        function: impl Into<String>,
        owner_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            function: function.into(),
            owner_id: owner_id.into(),
            created_at: None,
            validity_date: None,
        }
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Required identity fields are present.
    pub fn is_valid(&self) -> bool {
        !self.id.trim().is_empty() && !self.owner_id.trim().is_empty()
    }
}

/// A standardized, platform-specific certification in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificationType {
    pub id: String,
    pub platform_id: String,
    /// Short name
    pub name: String,
    /// Canonical long name
    #[serde(default)]
    pub full_name: String,
    /// Canonical specialization label
    #[serde(default)]
    pub function: String,
    /// Alternate strings users might have typed instead of `full_name`
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl CertificationType {
    pub fn new(
        id: impl Into<String>,
        platform_id: impl Into<String>,
        name: impl Into<String>,
        full_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            platform_id: platform_id.into(),
            name: name.into(),
            full_name: full_name.into(),
            function: String::new(),
            aliases: Vec::new(),
            is_active: true,
        }
    }

    pub fn with_function(mut self, function: impl Into<String>) -> Self {
        self.function = function.into();
        self
    }

    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Name used for near-duplicate comparison: `full_name`, or `name` when blank.
    pub fn comparison_name(&self) -> &str {
        if self.full_name.trim().is_empty() {
            &self.name
        } else {
            &self.full_name
        }
    }

    /// Label shown in a duplicate-type finding, e.g. `SA (Solutions Architect)`.
    pub fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.full_name)
    }

    pub fn is_valid(&self) -> bool {
        !self.id.trim().is_empty() && !self.platform_id.trim().is_empty()
    }
}

/// Record as returned by the backend, every field optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCertificationRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub function: Option<String>,
    pub owner_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub validity_date: Option<NaiveDate>,
}

/// Catalog type as returned by the backend, every field optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCertificationType {
    pub id: Option<String>,
    pub platform_id: Option<String>,
    pub name: Option<String>,
    pub full_name: Option<String>,
    pub function: Option<String>,
    pub aliases: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

fn required(
    value: Option<String>,
    kind: EntityKind,
    index: usize,
    field: &'static str,
    id: Option<&String>,
) -> Result<String, InputError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(InputError {
            kind,
            index,
            field,
            id: id.cloned(),
        }),
    }
}

impl RawCertificationRecord {
    /// Validate into a [`CertificationRecord`]; `index` is only used for reporting.
    pub fn validate(self, index: usize) -> Result<CertificationRecord, InputError> {
        let id = required(self.id, EntityKind::Record, index, "id", None)?;
        let owner_id = required(self.owner_id, EntityKind::Record, index, "ownerId", Some(&id))?;
        Ok(CertificationRecord {
            id,
            name: self.name.unwrap_or_default(),
            function: self.function.unwrap_or_default(),
            owner_id,
            created_at: self.created_at,
            validity_date: self.validity_date,
        })
    }
}

impl RawCertificationType {
    pub fn validate(self, index: usize) -> Result<CertificationType, InputError> {
        let id = required(self.id, EntityKind::Type, index, "id", None)?;
        let platform_id =
            required(self.platform_id, EntityKind::Type, index, "platformId", Some(&id))?;
        Ok(CertificationType {
            id,
            platform_id,
            name: self.name.unwrap_or_default(),
            full_name: self.full_name.unwrap_or_default(),
            function: self.function.unwrap_or_default(),
            aliases: self.aliases.unwrap_or_default(),
            is_active: self.is_active.unwrap_or(true),
        })
    }
}

/// A validated snapshot of records and types ready for classification.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Vec<CertificationRecord>,
    pub types: Vec<CertificationType>,
    /// Entities dropped during validation
    pub skipped: Vec<InputError>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDataset {
    records: Vec<RawCertificationRecord>,
    types: Vec<RawCertificationType>,
}

impl Dataset {
    /// Parse `{"records": [...], "types": [...]}` and validate every entity.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: RawDataset = serde_json::from_str(json)?;
        Ok(ingest(raw.records, raw.types))
    }
}

/// Validate a raw snapshot, keeping input order and collecting skips.
pub fn ingest(
    raw_records: Vec<RawCertificationRecord>,
    raw_types: Vec<RawCertificationType>,
) -> Dataset {
    let mut dataset = Dataset::default();

    for (index, raw) in raw_records.into_iter().enumerate() {
        match raw.validate(index) {
            Ok(record) => dataset.records.push(record),
            Err(e) => {
                tracing::warn!("Skipping invalid input: {}", e);
                dataset.skipped.push(e);
            }
        }
    }

    for (index, raw) in raw_types.into_iter().enumerate() {
        match raw.validate(index) {
            Ok(ty) => dataset.types.push(ty),
            Err(e) => {
                tracing::warn!("Skipping invalid input: {}", e);
                dataset.skipped.push(e);
            }
        }
    }

    dataset
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_record_defaults() {
        let raw = RawCertificationRecord {
            id: Some("r1".to_string()),
            owner_id: Some("u1".to_string()),
            ..Default::default()
        };
        let record = raw.validate(0).unwrap();
        assert_eq!(record.name, "");
        assert_eq!(record.function, "");
        assert!(record.created_at.is_none());
    }

    #[test]
    fn test_raw_record_missing_owner() {
        let raw = RawCertificationRecord {
            id: Some("r1".to_string()),
            owner_id: Some("   ".to_string()),
            ..Default::default()
        };
        let err = raw.validate(3).unwrap_err();
        assert_eq!(err.field, "ownerId");
        assert_eq!(err.index, 3);
        assert_eq!(err.id.as_deref(), Some("r1"));
    }

    #[test]
    fn test_raw_type_defaults() {
        let raw = RawCertificationType {
            id: Some("t1".to_string()),
            platform_id: Some("p1".to_string()),
            name: Some("SA".to_string()),
            ..Default::default()
        };
        let ty = raw.validate(0).unwrap();
        assert!(ty.is_active);
        assert!(ty.aliases.is_empty());
        assert_eq!(ty.comparison_name(), "SA");
    }

    #[test]
    fn test_dataset_from_json_skips_invalid() {
        let json = r#"{
            "records": [
                {"id": "1", "name": "Azure Admin", "function": "Infra", "ownerId": "u1"},
                {"name": "No Id", "ownerId": "u1"},
                {"id": "3", "name": "No Owner"}
            ],
            "types": [
                {"id": "a", "platformId": "p1", "name": "SA", "fullName": "Solutions Architect", "isActive": false},
                {"id": "b", "name": "Orphan"}
            ]
        }"#;
        let dataset = Dataset::from_json(json).unwrap();
        assert_eq!(dataset.records.len(), 1);
        assert_eq!(dataset.types.len(), 1);
        assert!(!dataset.types[0].is_active);
        assert_eq!(dataset.skipped.len(), 3);
        assert_eq!(dataset.skipped[0].kind, EntityKind::Record);
        assert_eq!(dataset.skipped[2].kind, EntityKind::Type);
        assert_eq!(dataset.skipped[2].field, "platformId");
    }

    #[test]
    fn test_display_label() {
        let ty = CertificationType::new("a", "p1", "SA", "Solutions Architect Pro");
        assert_eq!(ty.display_label(), "SA (Solutions Architect Pro)");
    }
}
