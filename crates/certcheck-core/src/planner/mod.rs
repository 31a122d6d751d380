//! Write-set planning for resolving finding groups
//!
//! Planners compute what the store should change and never write anything.
//! Contract violations are rejected here, before any write is attempted.

mod consolidate;
mod standardize;

pub use consolidate::{
    plan_consolidation, plan_consolidation_for_group, recommend_survivor, ConsolidationPlan,
    RepointRule, SurvivorRecommendation, TypeUsage,
};
pub use standardize::{plan_standardization, StandardizationPlan};
