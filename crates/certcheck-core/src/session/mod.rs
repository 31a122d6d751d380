//! Review sessions
//!
//! Holds the latest classification result for one dashboard view, tracks each
//! group through its lifecycle, and guarantees at most one outstanding write
//! per group. Writes go through a two-step protocol so the caller can run the
//! actual I/O wherever it likes:
//!
//! 1. `begin_standardization` / `begin_consolidation` plan the write (failing
//!    closed) and move the group to `Applying`.
//! 2. `complete_write` records the store's answer. Success marks the group
//!    `Applied` and asks for one re-classification; failure returns the group
//!    to `Reviewing` and surfaces the error without retrying.
//!
//! A pending write that will never run is released with `abandon_write`.

mod state;

pub use state::FindingState;

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::config::EngineConfig;
use crate::detection::{Classifier, FindingGroup};
use crate::error::{PlanError, SessionError, StoreError};
use crate::model::{CertificationRecord, CertificationType};
use crate::planner::{
    plan_consolidation_for_group, plan_standardization, recommend_survivor, ConsolidationPlan,
    StandardizationPlan, SurvivorRecommendation,
};
use crate::ranking::{self, RemoveOutcome, SeverityCounts, SeverityFilter};
use crate::store::{RecordSource, TypeCatalogSource, WriteExecutor, WriteReport};

/// A planned write that has been handed to the caller for execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingWrite {
    Standardization(StandardizationPlan),
    Consolidation { group_number: u32, plan: ConsolidationPlan },
}

impl PendingWrite {
    pub fn group_number(&self) -> u32 {
        match self {
            PendingWrite::Standardization(plan) => plan.group_number,
            PendingWrite::Consolidation { group_number, .. } => *group_number,
        }
    }

    /// Run the write against an executor
    pub fn execute<W: WriteExecutor + ?Sized>(
        &self,
        executor: &mut W,
    ) -> Result<WriteReport, StoreError> {
        match self {
            PendingWrite::Standardization(plan) => executor.apply_standardization(plan),
            PendingWrite::Consolidation { plan, .. } => executor.apply_consolidation(plan),
        }
    }
}

/// Result of a successful write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    pub group_number: u32,
    pub report: WriteReport,
    /// The caller must trigger one re-classification
    pub refresh_required: bool,
}

/// One dashboard's view of the latest classification
#[derive(Debug, Default)]
pub struct ReviewSession {
    classifier: Classifier,
    groups: Vec<FindingGroup>,
    states: HashMap<u32, FindingState>,
    records: Vec<CertificationRecord>,
    types: Vec<CertificationType>,
    last_run: Option<DateTime<Utc>>,
    runs: u64,
}

impl ReviewSession {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            classifier: Classifier::new(config.matching.clone()),
            ..Default::default()
        }
    }

    pub fn groups(&self) -> &[FindingGroup] {
        &self.groups
    }

    pub fn group(&self, number: u32) -> Option<&FindingGroup> {
        self.groups.iter().find(|g| g.number == number)
    }

    pub fn state(&self, number: u32) -> Option<FindingState> {
        self.states.get(&number).copied()
    }

    pub fn types(&self) -> &[CertificationType] {
        &self.types
    }

    pub fn filtered(&self, filter: SeverityFilter) -> Vec<&FindingGroup> {
        ranking::filter_by_severity(&self.groups, filter)
    }

    pub fn counts(&self) -> SeverityCounts {
        SeverityCounts::from_groups(&self.groups)
    }

    /// When the current groups were computed
    pub fn last_run(&self) -> Option<DateTime<Utc>> {
        self.last_run
    }

    /// Number of completed classification runs
    pub fn runs(&self) -> u64 {
        self.runs
    }

    fn has_write_in_flight(&self) -> bool {
        self.states.values().any(|s| *s == FindingState::Applying)
    }

    /// Re-read both sources and re-classify
    ///
    /// Refused while any write is outstanding. On failure the previous groups
    /// are kept untouched.
    pub fn refresh<S>(&mut self, source: &S) -> Result<&[FindingGroup], SessionError>
    where
        S: RecordSource + TypeCatalogSource + ?Sized,
    {
        if self.has_write_in_flight() {
            return Err(SessionError::RefreshBlocked);
        }

        let records = source.load_records()?;
        let types = source.load_types()?;
        let groups = self.classifier.classify(&records, &types)?;

        self.states = groups
            .iter()
            .map(|g| (g.number, FindingState::Detected))
            .collect();
        self.groups = groups;
        self.records = records;
        self.types = types;
        self.last_run = Some(Utc::now());
        self.runs += 1;

        tracing::debug!("Session refresh #{}: {} groups", self.runs, self.groups.len());
        Ok(&self.groups)
    }

    fn transition(&mut self, number: u32, to: FindingState) -> Result<(), SessionError> {
        let from = self.state(number).ok_or(SessionError::UnknownGroup(number))?;
        if from == FindingState::Applying && to != FindingState::Applied && to != FindingState::Reviewing
        {
            return Err(SessionError::WriteInFlight(number));
        }
        if !from.can_transition_to(&to) {
            return Err(SessionError::InvalidTransition { from, to });
        }
        self.states.insert(number, to);
        Ok(())
    }

    fn ensure_editable(&self, number: u32) -> Result<(), SessionError> {
        match self.state(number) {
            None => Err(SessionError::UnknownGroup(number)),
            Some(FindingState::Applying) => Err(SessionError::WriteInFlight(number)),
            Some(_) => Ok(()),
        }
    }

    fn find_type(&self, type_id: &str) -> Result<&CertificationType, SessionError> {
        self.types
            .iter()
            .find(|t| t.id == type_id)
            .ok_or_else(|| SessionError::UnknownType(type_id.to_string()))
    }

    /// Mark a group as opened by the user
    pub fn begin_review(&mut self, number: u32) -> Result<(), SessionError> {
        if self.state(number) == Some(FindingState::Reviewing) {
            return Ok(());
        }
        self.transition(number, FindingState::Reviewing)
    }

    pub fn dismiss(&mut self, number: u32) -> Result<(), SessionError> {
        self.transition(number, FindingState::Dismissed)
    }

    /// View-local: drop a name from a group, deleting the group if it shrinks below two names
    pub fn remove_name(&mut self, number: u32, name: &str) -> Result<RemoveOutcome, SessionError> {
        self.ensure_editable(number)?;
        let outcome = ranking::remove_name(&mut self.groups, number, name);
        if outcome == RemoveOutcome::Deleted {
            self.states.remove(&number);
        }
        Ok(outcome)
    }

    /// View-local: override the suggested type (or clear it)
    pub fn set_suggested_type(
        &mut self,
        number: u32,
        type_id: Option<&str>,
    ) -> Result<(), SessionError> {
        self.ensure_editable(number)?;
        let suggested = type_id.map(|id| self.find_type(id).cloned()).transpose()?;

        let group = self
            .groups
            .iter_mut()
            .find(|g| g.number == number)
            .ok_or(SessionError::UnknownGroup(number))?;
        if !group.severity.is_standardizable() {
            return Err(PlanError::InvalidSeverity(group.severity).into());
        }
        group.suggested_type = suggested;
        Ok(())
    }

    /// Survivor recommendation for a duplicate-type group
    pub fn recommend_survivor(&self, number: u32) -> Result<SurvivorRecommendation, SessionError> {
        let group = self.group(number).ok_or(SessionError::UnknownGroup(number))?;
        if group.types.is_empty() {
            return Err(PlanError::InvalidSeverity(group.severity).into());
        }
        Ok(recommend_survivor(&group.types, &self.records))
    }

    /// Plan standardization toward `target_type_id` (or the group's suggestion)
    /// and mark the group `Applying`
    pub fn begin_standardization(
        &mut self,
        number: u32,
        target_type_id: Option<&str>,
    ) -> Result<PendingWrite, SessionError> {
        self.ensure_editable(number)?;
        let group = self.group(number).ok_or(SessionError::UnknownGroup(number))?;
        let target = match target_type_id {
            Some(id) => Some(self.find_type(id)?),
            None => group.suggested_type.as_ref(),
        };
        let plan = plan_standardization(group, target)?;

        self.transition(number, FindingState::Applying)?;
        Ok(PendingWrite::Standardization(plan))
    }

    /// Plan consolidation onto `survivor_id` and mark the group `Applying`
    pub fn begin_consolidation(
        &mut self,
        number: u32,
        survivor_id: &str,
    ) -> Result<PendingWrite, SessionError> {
        self.ensure_editable(number)?;
        let group = self.group(number).ok_or(SessionError::UnknownGroup(number))?;
        let plan = plan_consolidation_for_group(group, survivor_id)?;

        self.transition(number, FindingState::Applying)?;
        Ok(PendingWrite::Consolidation {
            group_number: number,
            plan,
        })
    }

    /// Record the store's answer for a pending write
    pub fn complete_write(
        &mut self,
        pending: &PendingWrite,
        result: Result<WriteReport, StoreError>,
    ) -> Result<WriteOutcome, SessionError> {
        let number = pending.group_number();
        match result {
            Ok(report) => {
                self.transition(number, FindingState::Applied)?;
                tracing::info!("Applied write for group {}", number);
                Ok(WriteOutcome {
                    group_number: number,
                    report,
                    refresh_required: true,
                })
            }
            Err(e) => {
                self.transition(number, FindingState::Reviewing)?;
                tracing::warn!("Write for group {} failed: {}", number, e);
                Err(e.into())
            }
        }
    }

    /// Give up on a pending write that was never executed
    ///
    /// The group goes back to `Reviewing`, which also unblocks `refresh`.
    pub fn abandon_write(&mut self, pending: &PendingWrite) -> Result<(), SessionError> {
        let number = pending.group_number();
        let from = self.state(number).ok_or(SessionError::UnknownGroup(number))?;
        if from != FindingState::Applying {
            return Err(SessionError::InvalidTransition {
                from,
                to: FindingState::Reviewing,
            });
        }
        self.transition(number, FindingState::Reviewing)?;
        tracing::debug!("Abandoned pending write for group {}", number);
        Ok(())
    }

    /// Plan, execute, and record a standardization in one call
    pub fn apply_standardization<W: WriteExecutor + ?Sized>(
        &mut self,
        executor: &mut W,
        number: u32,
        target_type_id: Option<&str>,
    ) -> Result<WriteOutcome, SessionError> {
        let pending = self.begin_standardization(number, target_type_id)?;
        let result = pending.execute(executor);
        self.complete_write(&pending, result)
    }

    /// Plan, execute, and record a consolidation in one call
    pub fn apply_consolidation<W: WriteExecutor + ?Sized>(
        &mut self,
        executor: &mut W,
        number: u32,
        survivor_id: &str,
    ) -> Result<WriteOutcome, SessionError> {
        let pending = self.begin_consolidation(number, survivor_id)?;
        let result = pending.execute(executor);
        self.complete_write(&pending, result)
    }
}
