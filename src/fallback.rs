// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Quota enforcement and suboptimal backfill.
//!
//! The caller asked for N sentences. When the good set covers the quota it
//! is simply truncated (it already arrives best-to-worst). When it falls
//! short and the caller opted into `preserve_bad`, the gap is filled with
//! the least-bad rejected candidates, sorted by fewest filter violations
//! first. Good results always precede backfilled ones, whatever the scores
//! say: a sentence with violations never outranks one without.
//!
//! An empty good set with fallback disabled is a terminal "no match" — an
//! explicit error value, never a silently empty success.

use crate::types::{BadCandidate, RankedCandidate, SelectionError};

/// Apply quota and fallback policy to the ranked good set.
///
/// Backfilled candidates carry their badness (negative violation count) as
/// the match score, so consumers can tell them apart from genuine matches
/// by sign alone.
pub fn fill_quota(
    ranked_good: Vec<RankedCandidate>,
    bad: Vec<BadCandidate>,
    quota: usize,
    preserve_bad: bool,
) -> Result<Vec<RankedCandidate>, SelectionError> {
    if ranked_good.is_empty() {
        if !preserve_bad {
            return Err(SelectionError::NoMatch);
        }
        let backfilled = least_bad(bad, quota);
        if backfilled.is_empty() {
            return Err(SelectionError::NoMatch);
        }
        return Ok(backfilled);
    }

    let mut results = ranked_good;
    if results.len() >= quota {
        results.truncate(quota);
    } else if preserve_bad {
        let missing = quota - results.len();
        results.extend(least_bad(bad, missing));
    }
    // Fewer good results than requested without fallback is a reported
    // outcome, not an error.
    Ok(results)
}

/// The `limit` least-bad candidates, fewest violations first.
///
/// Descending by badness (badness is negative); ties keep input order so
/// reruns are stable.
fn least_bad(mut bad: Vec<BadCandidate>, limit: usize) -> Vec<RankedCandidate> {
    bad.sort_by_key(|entry| std::cmp::Reverse(entry.badness));
    bad.truncate(limit);
    bad.into_iter()
        .map(|entry| RankedCandidate {
            match_score: entry.badness,
            candidate: entry.candidate,
        })
        .collect()
}
