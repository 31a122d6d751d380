//! Store seams
//!
//! The engine never owns persistence. These traits are what the hosting app
//! implements over its backend; [`InMemoryStore`] is the reference
//! implementation used by the CLI and tests.

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::model::{CertificationRecord, CertificationType, Dataset};
use crate::planner::{ConsolidationPlan, StandardizationPlan};

/// Source of certification records
pub trait RecordSource {
    fn load_records(&self) -> Result<Vec<CertificationRecord>, StoreError>;
}

/// Source of catalog types
pub trait TypeCatalogSource {
    fn load_types(&self) -> Result<Vec<CertificationType>, StoreError>;
}

/// Executes planner write-sets against the store
///
/// Implementations should apply a plan atomically and report exactly which
/// records failed when they cannot.
pub trait WriteExecutor {
    fn apply_standardization(&mut self, plan: &StandardizationPlan)
        -> Result<WriteReport, StoreError>;

    fn apply_consolidation(&mut self, plan: &ConsolidationPlan) -> Result<WriteReport, StoreError>;
}

/// What a successful write changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteReport {
    pub updated_records: Vec<String>,
    pub deactivated_types: Vec<String>,
}

/// In-process store holding one snapshot
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    records: Vec<CertificationRecord>,
    types: Vec<CertificationType>,
}

impl InMemoryStore {
    pub fn new(records: Vec<CertificationRecord>, types: Vec<CertificationType>) -> Self {
        Self { records, types }
    }

    pub fn from_dataset(dataset: Dataset) -> Self {
        Self::new(dataset.records, dataset.types)
    }

    pub fn records(&self) -> &[CertificationRecord] {
        &self.records
    }

    pub fn types(&self) -> &[CertificationType] {
        &self.types
    }

    /// Remove a record, as another user deleting it would
    pub fn delete_record(&mut self, id: &str) -> Option<CertificationRecord> {
        let pos = self.records.iter().position(|r| r.id == id)?;
        Some(self.records.remove(pos))
    }
}

impl RecordSource for InMemoryStore {
    fn load_records(&self) -> Result<Vec<CertificationRecord>, StoreError> {
        Ok(self.records.clone())
    }
}

impl TypeCatalogSource for InMemoryStore {
    fn load_types(&self) -> Result<Vec<CertificationType>, StoreError> {
        Ok(self.types.clone())
    }
}

impl WriteExecutor for InMemoryStore {
    fn apply_standardization(
        &mut self,
        plan: &StandardizationPlan,
    ) -> Result<WriteReport, StoreError> {
        let missing_ids: Vec<String> = plan
            .record_ids
            .iter()
            .filter(|id| !self.records.iter().any(|r| &r.id == *id))
            .cloned()
            .collect();
        if !missing_ids.is_empty() {
            return Err(StoreError::WriteConflict { missing_ids });
        }

        let mut report = WriteReport::default();
        for record in self.records.iter_mut() {
            if plan.record_ids.contains(&record.id) {
                record.name = plan.new_name.clone();
                record.function = plan.new_function.clone();
                report.updated_records.push(record.id.clone());
            }
        }

        tracing::info!(
            "Standardized {} records to {:?}",
            report.updated_records.len(),
            plan.new_name
        );
        Ok(report)
    }

    fn apply_consolidation(&mut self, plan: &ConsolidationPlan) -> Result<WriteReport, StoreError> {
        let missing_ids: Vec<String> = std::iter::once(&plan.survivor_id)
            .chain(plan.types_to_deactivate.iter())
            .filter(|id| !self.types.iter().any(|t| &t.id == *id))
            .cloned()
            .collect();
        if !missing_ids.is_empty() {
            return Err(StoreError::WriteConflict { missing_ids });
        }

        let mut report = WriteReport::default();
        for record in self.records.iter_mut() {
            if let Some(rule) = plan
                .records_to_repoint
                .iter()
                .find(|rule| rule.old_name == record.name)
            {
                record.name = rule.new_name.clone();
                report.updated_records.push(record.id.clone());
            }
        }

        for ty in self.types.iter_mut() {
            if plan.types_to_deactivate.contains(&ty.id) {
                ty.is_active = false;
                report.deactivated_types.push(ty.id.clone());
            }
        }

        tracing::info!(
            "Consolidated into {}: {} records repointed, {} types deactivated",
            plan.survivor_id,
            report.updated_records.len(),
            report.deactivated_types.len()
        );
        Ok(report)
    }
}
