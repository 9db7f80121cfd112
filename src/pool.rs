// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Candidate pool deduplication.
//!
//! A sentence should be evaluated at most once per run, however many corpus
//! hits produced it. Frequent sentences show up repeatedly in concordance
//! windows (news boilerplate especially), and letting them through would let
//! one sentence occupy several quota slots.
//!
//! Equality is exact string equality on the fully assembled sentence text,
//! not token-level canonicalization: "Hon bakar bröd." and "hon bakar bröd."
//! are different sentences here. The first occurrence wins and keeps its
//! corpus identity and position.

use std::collections::HashSet;

use crate::types::Candidate;

/// Drop later candidates whose sentence text repeats an earlier one.
///
/// Encounter order is preserved; dropped candidates vanish entirely (not
/// merged, not counted).
pub fn dedupe(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut seen: HashSet<String> = HashSet::with_capacity(candidates.len());
    let mut unique = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if seen.insert(candidate.text.clone()) {
            unique.push(candidate);
        }
    }
    unique
}
