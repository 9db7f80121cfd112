// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The hard-filter stage: partition candidates into good and bad.
//!
//! A candidate is good when it violates no filter criterion; a single
//! violation makes it bad. The stage is total: every input candidate lands
//! in exactly one of the two sets, whatever fallback policy later decides
//! to do with the bad ones.
//!
//! A filter with no entry in a candidate's match record is a vacuous pass.
//! Evaluators only record evidence when they have something to say, so
//! absence means "no evidence of violation". Positive-correlated criteria
//! (typicality and friends) never count as violations even when listed as
//! filters; their scores are desirable magnitudes, not violation counts.

use crate::types::{BadCandidate, Candidate};

/// Output of [`partition`].
///
/// `good` keeps the input order. `bad` keeps the input order too; ordering
/// by badness is the fallback stage's job.
#[derive(Debug, Clone, Default)]
pub struct Partitioned {
    pub good: Vec<Candidate>,
    pub bad: Vec<BadCandidate>,
}

/// Partition candidates by filter violations.
///
/// Badness is the negative violation count: more violations, more negative,
/// so descending order puts the least-bad candidate first.
pub fn partition(
    candidates: Vec<Candidate>,
    filters: &[String],
    positive_criteria: &[String],
) -> Partitioned {
    let mut partitioned = Partitioned::default();
    for candidate in candidates {
        let violations = violation_count(&candidate, filters, positive_criteria);
        if violations == 0 {
            partitioned.good.push(candidate);
        } else {
            partitioned.bad.push(BadCandidate {
                badness: -violations,
                candidate,
            });
        }
    }
    partitioned
}

fn violation_count(candidate: &Candidate, filters: &[String], positive_criteria: &[String]) -> i64 {
    candidate
        .match_record
        .iter()
        .filter(|(name, evidence)| {
            filters.iter().any(|filter| filter == *name)
                && !positive_criteria.iter().any(|positive| positive == *name)
                && evidence.score.is_violation()
        })
        .count() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Evidence, KeywordInfo, MatchRecord};

    fn candidate(position: u64, evidence: &[(&str, Evidence)]) -> Candidate {
        let mut record = MatchRecord::new();
        for (name, value) in evidence {
            record.insert((*name).to_string(), value.clone());
        }
        Candidate {
            corpus: "suc3".to_string(),
            position,
            text: format!("sentence {}", position),
            left_context: String::new(),
            keyword: KeywordInfo {
                word: "w".to_string(),
                position,
                start: 0,
                end: 1,
            },
            right_context: String::new(),
            tokens: vec![],
            match_record: record,
        }
    }

    fn filters(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    #[test]
    fn clean_candidate_is_good() {
        let out = partition(vec![candidate(1, &[])], &filters(&["root"]), &[]);
        assert_eq!(out.good.len(), 1);
        assert!(out.bad.is_empty());
    }

    #[test]
    fn single_violation_makes_bad_with_badness_minus_one() {
        let pool = vec![candidate(1, &[("root", Evidence::flag(true, "no root"))])];
        let out = partition(pool, &filters(&["root"]), &[]);
        assert!(out.good.is_empty());
        assert_eq!(out.bad.len(), 1);
        assert_eq!(out.bad[0].badness, -1);
    }

    #[test]
    fn badness_counts_all_violated_filters() {
        let pool = vec![candidate(
            1,
            &[
                ("root", Evidence::flag(true, "no root")),
                ("length", Evidence::value(4.0, "4 tokens over")),
                ("elliptic", Evidence::flag(false, "subject present")),
            ],
        )];
        let out = partition(pool, &filters(&["root", "length", "elliptic"]), &[]);
        assert_eq!(out.bad[0].badness, -2);
    }

    #[test]
    fn non_filter_evidence_is_ignored() {
        let pool = vec![candidate(
            1,
            &[("typicality", Evidence::value(12.5, "MI sum"))],
        )];
        let out = partition(pool, &filters(&["root"]), &[]);
        assert_eq!(out.good.len(), 1);
    }

    #[test]
    fn positive_criteria_never_count_as_violations() {
        let positive = filters(&["typicality"]);
        let pool = vec![candidate(
            1,
            &[("typicality", Evidence::value(12.5, "MI sum"))],
        )];
        let out = partition(pool, &filters(&["typicality", "root"]), &positive);
        assert_eq!(out.good.len(), 1);
    }

    #[test]
    fn missing_filter_evidence_is_a_vacuous_pass() {
        let pool = vec![candidate(1, &[("length", Evidence::value(2.0, "short"))])];
        // "root" configured but never evaluated: pass; "length" violated: bad.
        let out = partition(pool, &filters(&["root", "length"]), &[]);
        assert_eq!(out.bad.len(), 1);
        assert_eq!(out.bad[0].badness, -1);
    }

    #[test]
    fn partition_is_total() {
        let pool: Vec<Candidate> = (0..10)
            .map(|i| {
                if i % 3 == 0 {
                    candidate(i, &[("root", Evidence::flag(true, "no root"))])
                } else {
                    candidate(i, &[])
                }
            })
            .collect();
        let out = partition(pool, &filters(&["root"]), &[]);
        assert_eq!(out.good.len() + out.bad.len(), 10);
    }

    #[test]
    fn false_flag_is_not_a_violation() {
        let pool = vec![candidate(1, &[("root", Evidence::flag(false, "has root"))])];
        let out = partition(pool, &filters(&["root"]), &[]);
        assert_eq!(out.good.len(), 1);
    }
}
