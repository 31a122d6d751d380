//! The four detection passes
//!
//! Record passes share a `processed` mask so a record lands in at most one
//! group. Each pass only marks the records it actually groups.

use std::collections::{HashMap, HashSet};

use strsim::levenshtein;

use super::group::{distinct_names, FindingGroup};
use super::suggestion::{suggest_for_exact, suggest_for_similar};
use crate::config::MatchingConfig;
use crate::error::{EngineError, Result};
use crate::matching::{are_similar_normalized, normalize, normalized_similarity};
use crate::model::{CertificationRecord, CertificationType};
use crate::severity::Severity;

/// A record with its comparison keys computed once
pub(crate) struct Prepared<'a> {
    pub record: &'a CertificationRecord,
    pub name: String,
    pub function: String,
}

impl<'a> Prepared<'a> {
    pub fn new(record: &'a CertificationRecord) -> Self {
        Self {
            record,
            name: normalize(&record.name),
            function: normalize(&record.function),
        }
    }

    fn same_owner_and_function(&self, other: &Prepared<'_>) -> bool {
        self.record.owner_id == other.record.owner_id && self.function == other.function
    }
}

fn collect(prepared: &[Prepared<'_>], indices: &[usize]) -> Vec<CertificationRecord> {
    indices.iter().map(|&i| prepared[i].record.clone()).collect()
}

/// Pass 1: same normalized name, same normalized function, same owner
pub(crate) fn exact_pass(
    prepared: &[Prepared<'_>],
    types: &[CertificationType],
    processed: &mut [bool],
) -> Vec<FindingGroup> {
    let mut groups = Vec::new();

    for i in 0..prepared.len() {
        if processed[i] {
            continue;
        }

        let anchor = &prepared[i];
        let mut indices = vec![i];
        for j in (i + 1)..prepared.len() {
            if processed[j] {
                continue;
            }
            let candidate = &prepared[j];
            if anchor.name == candidate.name && anchor.same_owner_and_function(candidate) {
                indices.push(j);
            }
        }

        if indices.len() < 2 {
            continue;
        }
        for &k in &indices {
            processed[k] = true;
        }

        let members = collect(prepared, &indices);
        let suggested = suggest_for_exact(&members[0].name, types);
        groups.push(FindingGroup::records(Severity::Exact, members, suggested));
    }

    groups
}

/// Pass 2: near-identical names, same normalized function, same owner
pub(crate) fn similar_pass(
    prepared: &[Prepared<'_>],
    types: &[CertificationType],
    processed: &mut [bool],
    config: &MatchingConfig,
) -> Result<Vec<FindingGroup>> {
    let mut groups = Vec::new();

    for i in 0..prepared.len() {
        if processed[i] {
            continue;
        }

        let anchor = &prepared[i];
        let mut indices = vec![i];
        for j in (i + 1)..prepared.len() {
            if processed[j] {
                continue;
            }
            let candidate = &prepared[j];
            if !anchor.same_owner_and_function(candidate) {
                continue;
            }

            let score = normalized_similarity(&anchor.name, &candidate.name);
            if !(0.0..=1.0).contains(&score) {
                return Err(EngineError::ComputationDefect(format!(
                    "similarity {} out of range for records {} and {}",
                    score, anchor.record.id, candidate.record.id
                )));
            }

            if are_similar_normalized(&anchor.name, &candidate.name, config.similarity_threshold) {
                indices.push(j);
            }
        }

        let names = distinct_names(indices.iter().map(|&k| prepared[k].record.name.as_str()));
        if names.len() < 2 {
            continue;
        }
        for &k in &indices {
            processed[k] = true;
        }

        let members = collect(prepared, &indices);
        let function = most_common_function(&members);
        let suggested = suggest_for_similar(&names[0], function, types);
        groups.push(FindingGroup::records(Severity::Similar, members, suggested));
    }

    Ok(groups)
}

/// Raw function with the highest count; ties go to the first occurrence
pub(crate) fn most_common_function(members: &[CertificationRecord]) -> &str {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for member in members {
        match counts.iter_mut().find(|(f, _)| *f == member.function) {
            Some((_, n)) => *n += 1,
            None => counts.push((member.function.as_str(), 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (function, n) in counts {
        if best.map_or(true, |(_, top)| n > top) {
            best = Some((function, n));
        }
    }
    best.map(|(f, _)| f).unwrap_or("")
}

/// Pass 3: same normalized name and owner, more than one distinct function
pub(crate) fn function_mismatch_pass(
    prepared: &[Prepared<'_>],
    processed: &mut [bool],
) -> Vec<FindingGroup> {
    let mut order: Vec<Vec<usize>> = Vec::new();
    let mut buckets: HashMap<(&str, &str), usize> = HashMap::new();

    for (i, p) in prepared.iter().enumerate() {
        if processed[i] {
            continue;
        }
        let key = (p.name.as_str(), p.record.owner_id.as_str());
        match buckets.get(&key) {
            Some(&slot) => order[slot].push(i),
            None => {
                buckets.insert(key, order.len());
                order.push(vec![i]);
            }
        }
    }

    let mut groups = Vec::new();
    for indices in order {
        if indices.len() < 2 {
            continue;
        }
        let functions: HashSet<&str> = indices.iter().map(|&k| prepared[k].function.as_str()).collect();
        if functions.len() < 2 {
            continue;
        }
        for &k in &indices {
            processed[k] = true;
        }

        let members = collect(prepared, &indices);
        let mut group = FindingGroup::records(Severity::FunctionMismatch, members, None);
        // one label for the bucket, as typed on its first member
        group.names.truncate(1);
        groups.push(group);
    }

    groups
}

/// Pass 4: catalog types on one platform with the same short name whose long
/// names are within the edit budget or whose aliases overlap
///
/// Buckets hold active and inactive types alike, but only a pair of active
/// types raises a finding, so a consolidated bucket stops being reported.
pub(crate) fn duplicate_type_pass(
    types: &[CertificationType],
    config: &MatchingConfig,
) -> Vec<FindingGroup> {
    let mut order: Vec<Vec<&CertificationType>> = Vec::new();
    let mut buckets: HashMap<(String, String), usize> = HashMap::new();

    for ty in types {
        let key = (ty.platform_id.clone(), normalize(&ty.name));
        match buckets.get(&key) {
            Some(&slot) => order[slot].push(ty),
            None => {
                buckets.insert(key, order.len());
                order.push(vec![ty]);
            }
        }
    }

    order
        .into_iter()
        .filter(|bucket| bucket.len() >= 2 && has_duplicate_pair(bucket, config))
        .map(|bucket| FindingGroup::duplicate_types(bucket.into_iter().cloned().collect()))
        .collect()
}

fn has_duplicate_pair(bucket: &[&CertificationType], config: &MatchingConfig) -> bool {
    let keys: Vec<(String, HashSet<String>)> = bucket
        .iter()
        .filter(|t| t.is_active)
        .map(|t| {
            let aliases = t
                .aliases
                .iter()
                .map(|a| normalize(a))
                .filter(|a| !a.is_empty())
                .collect();
            (normalize(t.comparison_name()), aliases)
        })
        .collect();

    for i in 0..keys.len() {
        for j in (i + 1)..keys.len() {
            let (name_a, aliases_a) = &keys[i];
            let (name_b, aliases_b) = &keys[j];
            if levenshtein(name_a, name_b) <= config.type_edit_distance {
                return true;
            }
            if !aliases_a.is_disjoint(aliases_b) {
                return true;
            }
        }
    }
    false
}
