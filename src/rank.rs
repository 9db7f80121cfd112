// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Borda-style rank aggregation over the soft criteria.
//!
//! Every ranker criterion orders the good candidates on its own scale; a
//! candidate's positional index in each of those orderings is its
//! contribution, and the sum of contributions across criteria (the **index
//! sum**) decides the final order. Lower index sum wins. The final numeric
//! match score inverts that so higher is better:
//!
//! ```text
//! match_score = rankers × ranked_candidates − index_sum
//! ```
//!
//! # Comparable values
//!
//! Raw evidence scores are mapped so that ascending always means better:
//!
//! - positive-correlated criteria (typicality, MI) negate their raw value;
//! - boolean evidence maps to 1.0 (violation-style, worse) or 0.0;
//! - a candidate with no evidence for a criterion gets an explicit neutral
//!   0.0, so silence is never a penalty relative to recorded neutrality;
//! - `readability` is banded, see below.
//!
//! # The readability band
//!
//! Readability evidence is the signed CEFR level difference from the target.
//! Within the band (|diff| ≤ 1): exact matches stay at 0.0 (best), one level
//! easier maps to 1.0, one level harder to 2.0 — harder sentences rank
//! strictly worse than easier ones at equal distance. Outside the band the
//! candidate is excluded from the **whole** aggregation (every criterion,
//! not just readability) whenever readability is among the active rankers.
//! What happens to the excluded candidates afterwards is the engine's
//! [`BandedOutPolicy`](crate::config::BandedOutPolicy) decision; this stage
//! just reports them separately.

use crate::config::READABILITY;
use crate::types::{Candidate, RankedCandidate};

/// Output of [`rank`].
#[derive(Debug, Clone, Default)]
pub struct Ranked {
    /// Candidates ordered best to worst, with their match scores.
    pub ranked: Vec<RankedCandidate>,
    /// Candidates excluded by the readability band, in input order.
    pub banded_out: Vec<Candidate>,
}

/// Aggregate ranker criteria into one ordering over the good candidates.
///
/// With no active rankers the input passes through in original order with a
/// match score of zero for every candidate. Ties on index sum break by
/// original pool order, which keeps runs reproducible.
pub fn rank(good: Vec<Candidate>, rankers: &[String], positive_criteria: &[String]) -> Ranked {
    let gate_active = rankers.iter().any(|ranker| ranker == READABILITY);

    let mut competing: Vec<Candidate> = Vec::with_capacity(good.len());
    let mut banded_out: Vec<Candidate> = Vec::new();
    for candidate in good {
        if gate_active && band_excess(&candidate) > 0 {
            banded_out.push(candidate);
        } else {
            competing.push(candidate);
        }
    }

    let competing_len = competing.len();
    let mut index_sums = vec![0usize; competing_len];

    for ranker in rankers {
        // (comparable value, index into `competing`); the stable sort keeps
        // equal values in original pool order.
        let mut per_criterion: Vec<(f64, usize)> = competing
            .iter()
            .enumerate()
            .map(|(index, candidate)| (comparable_value(ranker, candidate, positive_criteria), index))
            .collect();
        per_criterion.sort_by(|a, b| a.0.total_cmp(&b.0));

        for (position, (_, index)) in per_criterion.iter().enumerate() {
            index_sums[*index] += position;
        }
    }

    let max_points = (rankers.len() * competing_len) as i64;
    let mut scored: Vec<(usize, Candidate)> = index_sums.into_iter().zip(competing).collect();
    // Stable sort: equal index sums keep original pool order.
    scored.sort_by_key(|(index_sum, _)| *index_sum);
    let ranked = scored
        .into_iter()
        .map(|(index_sum, candidate)| RankedCandidate {
            match_score: max_points - index_sum as i64,
            candidate,
        })
        .collect();

    Ranked { ranked, banded_out }
}

/// How many CEFR levels a candidate lies beyond the readability band.
///
/// Zero for candidates inside the band or without readability evidence
/// (missing evidence is neutral, a diff of zero).
pub fn band_excess(candidate: &Candidate) -> i64 {
    let diff = candidate
        .match_record
        .get(READABILITY)
        .map(|evidence| evidence.score.as_f64())
        .unwrap_or(0.0);
    (diff.abs().floor() as i64 - 1).max(0)
}

/// Map a candidate's raw score for one criterion onto the shared
/// ascending-is-better scale.
fn comparable_value(criterion: &str, candidate: &Candidate, positive_criteria: &[String]) -> f64 {
    let raw = candidate
        .match_record
        .get(criterion)
        .map(|evidence| evidence.score.as_f64())
        .unwrap_or(0.0);

    if criterion == READABILITY {
        // Callers have already banded out |diff| > 1. Exact matches stay at
        // 0.0; easier-than-target ranks ahead of harder-than-target.
        if raw == -1.0 {
            1.0
        } else if raw == 1.0 {
            2.0
        } else {
            raw
        }
    } else if positive_criteria.iter().any(|positive| positive == criterion) {
        -raw
    } else {
        raw
    }
}
