//! Suggestion ranking.
//!
//! Two passes over the eligible candidates:
//! 1. Per category, keep the `cap` most expensive gifts. Uncategorized gifts
//!    share one group.
//! 2. Order the survivors by giver frequency, then cost, both descending.
//!
//! Missing cost sorts above any present cost, the way SQL `DESC` places
//! NULLs first. Gift id ascending breaks the remaining ties so equal inputs
//! always produce equal output.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::Candidate;
use crate::gift::Cost;

/// Gifts kept per category before the final ordering.
pub const DEFAULT_PER_CATEGORY_CAP: usize = 3;

/// Descending cost key: an unknown cost compares greater than any known one.
fn cost_key(candidate: &Candidate) -> (bool, Option<Cost>) {
    (candidate.cost.is_none(), candidate.cost)
}

fn by_cost_desc(a: &Candidate, b: &Candidate) -> Ordering {
    cost_key(b)
        .cmp(&cost_key(a))
        .then_with(|| a.gift_id.cmp(&b.gift_id))
}

/// Keep at most `cap` candidates per category, most expensive first.
pub fn cap_per_category(candidates: Vec<Candidate>, cap: usize) -> Vec<Candidate> {
    let mut groups: BTreeMap<Option<String>, Vec<Candidate>> = BTreeMap::new();
    for candidate in candidates {
        groups
            .entry(candidate.category.clone())
            .or_default()
            .push(candidate);
    }

    groups
        .into_values()
        .flat_map(|mut group| {
            group.sort_by(by_cost_desc);
            group.truncate(cap);
            group
        })
        .collect()
}

/// Full ranking: category cap, then giver frequency and cost.
pub fn rank(candidates: Vec<Candidate>, cap: usize) -> Vec<Candidate> {
    let mut ranked = cap_per_category(candidates, cap);
    ranked.sort_by(|a, b| {
        b.giver_frequency
            .cmp(&a.giver_frequency)
            .then_with(|| by_cost_desc(a, b))
    });
    ranked
}
