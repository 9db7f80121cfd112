// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The end-to-end selection pipeline.
//!
//! ```text
//! acquire → shuffle/cap → evaluate → classify → dedupe → partition
//!        → rank → banding policy → fill quota → finalize
//! ```
//!
//! Strictly sequential, each stage consuming the previous stage's output.
//! The engine never retries or re-queries: an insufficient result set is a
//! reported outcome, and growing the pool is the acquisition collaborator's
//! business.
//!
//! Everything the run needs is injected at construction — the candidate
//! source, the evidence evaluators (with whatever word lists or classifiers
//! they loaded), the criteria document, and the run configuration. No
//! ambient lookups, no state shared between runs.

use crate::acquire::{sample_corpora, shuffle_candidates, CandidateSource, Query};
use crate::config::{BandedOutPolicy, CriteriaConfig, RunConfig};
use crate::fallback::fill_quota;
use crate::filter::partition;
use crate::pool::dedupe;
use crate::rank::{band_excess, rank};
use crate::registry::classify;
use crate::types::{
    BadCandidate, Candidate, Evidence, ResultEntry, SelectionError, SelectionResult,
};

/// Width of the result window requested from the acquisition service.
/// Sampling happens on our side, so we ask for a generous page.
pub const SEARCH_WINDOW_END: usize = 2000;

/// An external criterion evaluator.
///
/// Pure with respect to the run: it reads a candidate's annotation plus its
/// own loaded resources and returns evidence entries to merge into the
/// candidate's match record. The engine imposes nothing about its internals,
/// only this contract.
pub trait EvidenceEvaluator {
    /// Evaluator name, for diagnostics.
    fn name(&self) -> &str;

    fn evaluate(&self, candidate: &Candidate, config: &RunConfig) -> Vec<(String, Evidence)>;
}

/// A completed selection run.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionOutcome {
    /// Ranked result entries, best first.
    pub entries: SelectionResult,
    /// The corpora actually searched after policy narrowing.
    pub corpora: Vec<String>,
    /// Service-side search time in seconds, passed through for reporting.
    pub search_secs: f64,
}

/// Owns one selection pipeline: source, evaluators, criteria, run config.
pub struct SelectionEngine<S> {
    source: S,
    evaluators: Vec<Box<dyn EvidenceEvaluator>>,
    criteria: CriteriaConfig,
    config: RunConfig,
}

impl<S: CandidateSource> SelectionEngine<S> {
    pub fn new(source: S, criteria: CriteriaConfig, config: RunConfig) -> Self {
        SelectionEngine {
            source,
            evaluators: Vec::new(),
            criteria,
            config,
        }
    }

    /// Register an evidence evaluator. Order only matters when two
    /// evaluators write the same criterion; the later one wins.
    pub fn with_evaluator(mut self, evaluator: Box<dyn EvidenceEvaluator>) -> Self {
        self.evaluators.push(evaluator);
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn criteria(&self) -> &CriteriaConfig {
        &self.criteria
    }

    /// Run the pipeline for one query.
    pub fn select(&self, query: &Query) -> Result<SelectionOutcome, SelectionError> {
        self.criteria.validate()?;
        let classified = classify(&self.criteria);
        let seed = self.config.random_seed;

        let corpora = sample_corpora(
            &self.config.corpus_policy,
            &self.config.corpus_list,
            seed,
            self.config.target_level,
        );
        let hits = self
            .source
            .fetch(&query.to_cqp(), &corpora, 0..SEARCH_WINDOW_END, seed)?;
        if hits.kwic.is_empty() {
            return Err(SelectionError::NoCandidates);
        }

        let mut candidates: Vec<Candidate> = hits
            .kwic
            .into_iter()
            .map(|kwic| kwic.into_candidate())
            .collect();
        shuffle_candidates(&mut candidates, seed);
        candidates.truncate(self.config.max_candidates);

        for candidate in &mut candidates {
            let mut merged = Vec::new();
            for evaluator in &self.evaluators {
                merged.extend(evaluator.evaluate(candidate, &self.config));
            }
            for (criterion, evidence) in merged {
                candidate.match_record.insert(criterion, evidence);
            }
        }

        let deduped = dedupe(candidates);
        let partitioned = partition(
            deduped,
            &classified.filters,
            &self.config.positive_criteria,
        );
        let ranked = rank(
            partitioned.good,
            &classified.rankers,
            &self.config.positive_criteria,
        );

        let mut bad = partitioned.bad;
        if self.config.banded_out == BandedOutPolicy::Demote {
            for candidate in ranked.banded_out {
                bad.push(BadCandidate {
                    badness: -band_excess(&candidate),
                    candidate,
                });
            }
        }

        let results = fill_quota(
            ranked.ranked,
            bad,
            self.config.requested_count,
            self.config.preserve_bad,
        )?;
        let entries = results
            .into_iter()
            .enumerate()
            .map(|(index, ranked)| ResultEntry::from_ranked(index, ranked))
            .collect();

        Ok(SelectionOutcome {
            entries,
            corpora,
            search_secs: hits.time,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquire::{Kwic, MatchSpan, SearchHits};
    use crate::types::{MatchRecord, Token};
    use std::collections::BTreeMap;
    use std::ops::Range;

    /// In-memory candidate source for pipeline tests.
    struct StaticSource {
        hits: SearchHits,
    }

    impl CandidateSource for StaticSource {
        fn fetch(
            &self,
            _cqp: &str,
            _corpora: &[String],
            _window: Range<usize>,
            _seed: Option<u64>,
        ) -> Result<SearchHits, SelectionError> {
            Ok(self.hits.clone())
        }
    }

    /// Evaluator backed by a fixed table keyed on hit position.
    struct TableEvaluator {
        table: BTreeMap<u64, Vec<(String, Evidence)>>,
    }

    impl EvidenceEvaluator for TableEvaluator {
        fn name(&self) -> &str {
            "table"
        }

        fn evaluate(&self, candidate: &Candidate, _config: &RunConfig) -> Vec<(String, Evidence)> {
            self.table
                .get(&candidate.position)
                .cloned()
                .unwrap_or_default()
        }
    }

    fn kwic(position: u64, words: &[&str]) -> Kwic {
        Kwic {
            corpus: "SUC3".to_string(),
            span: MatchSpan {
                position,
                start: 0,
                end: 1,
            },
            sentence_id: None,
            tokens: words.iter().map(|w| Token::word(*w)).collect(),
            match_info: MatchRecord::new(),
        }
    }

    fn engine_with(
        kwics: Vec<Kwic>,
        criteria_json: &str,
        config: RunConfig,
    ) -> SelectionEngine<StaticSource> {
        let source = StaticSource {
            hits: SearchHits {
                hits: kwics.len() as u64,
                kwic: kwics,
                time: 0.1,
            },
        };
        SelectionEngine::new(source, serde_json::from_str(criteria_json).unwrap(), config)
    }

    fn seeded_config() -> RunConfig {
        RunConfig {
            random_seed: Some(11),
            ..RunConfig::default()
        }
    }

    #[test]
    fn empty_acquisition_is_no_candidates_regardless_of_preserve_bad() {
        for preserve_bad in [true, false] {
            let engine = engine_with(
                vec![],
                r#"{"length": "filter"}"#,
                RunConfig {
                    preserve_bad,
                    ..seeded_config()
                },
            );
            assert_eq!(
                engine.select(&Query::lemma("bröd")),
                Err(SelectionError::NoCandidates)
            );
        }
    }

    #[test]
    fn evaluator_evidence_drives_filtering() {
        let mut table = BTreeMap::new();
        table.insert(
            1,
            vec![("length".to_string(), Evidence::value(3.0, "too short"))],
        );
        let engine = engine_with(
            vec![kwic(1, &["Kort", "."]), kwic(2, &["En", "längre", "mening", "."])],
            r#"{"length": "filter"}"#,
            RunConfig {
                requested_count: 5,
                preserve_bad: false,
                ..seeded_config()
            },
        )
        .with_evaluator(Box::new(TableEvaluator { table }));

        let outcome = engine.select(&Query::lemma("mening")).unwrap();
        assert_eq!(outcome.entries.len(), 1);
        assert_eq!(outcome.entries[0].kwic_position, 2);
    }

    #[test]
    fn duplicate_criteria_fail_before_acquisition() {
        let engine = engine_with(
            vec![kwic(1, &["En", "mening", "."])],
            r#"{"root": "filter", "well_formedness": {"root": "ranker"}}"#,
            seeded_config(),
        );
        let error = engine.select(&Query::lemma("mening")).unwrap_err();
        assert!(matches!(error, SelectionError::Config(_)));
    }

    #[test]
    fn banded_out_drop_policy_discards_off_level_candidates() {
        let mut table = BTreeMap::new();
        table.insert(
            1,
            vec![("readability".to_string(), Evidence::value(2.0, "C1"))],
        );
        let engine = engine_with(
            vec![kwic(1, &["Svår", "mening", "."]), kwic(2, &["Lagom", "mening", "."])],
            r#"{"readability": "ranker"}"#,
            RunConfig {
                preserve_bad: true,
                ..seeded_config()
            },
        )
        .with_evaluator(Box::new(TableEvaluator { table }));

        let outcome = engine.select(&Query::lemma("mening")).unwrap();
        assert_eq!(outcome.entries.len(), 1);
        assert_eq!(outcome.entries[0].kwic_position, 2);
    }

    #[test]
    fn banded_out_demote_policy_feeds_the_fallback_pool() {
        let mut table = BTreeMap::new();
        table.insert(
            1,
            vec![("readability".to_string(), Evidence::value(2.0, "C1"))],
        );
        let engine = engine_with(
            vec![kwic(1, &["Svår", "mening", "."]), kwic(2, &["Lagom", "mening", "."])],
            r#"{"readability": "ranker"}"#,
            RunConfig {
                banded_out: BandedOutPolicy::Demote,
                preserve_bad: true,
                ..seeded_config()
            },
        )
        .with_evaluator(Box::new(TableEvaluator { table }));

        let outcome = engine.select(&Query::lemma("mening")).unwrap();
        assert_eq!(outcome.entries.len(), 2);
        assert_eq!(outcome.entries[0].kwic_position, 2);
        assert_eq!(outcome.entries[1].kwic_position, 1);
        assert_eq!(outcome.entries[1].score, -1);
    }

    #[test]
    fn identical_seeds_give_identical_outcomes() {
        let pool: Vec<Kwic> = (0..30)
            .map(|i| kwic(i, &["Mening", &format!("nummer{}", i), "."]))
            .collect();
        let run = || {
            engine_with(
                pool.clone(),
                r#"{"typicality": "ranker"}"#,
                RunConfig {
                    random_seed: Some(77),
                    requested_count: 10,
                    ..RunConfig::default()
                },
            )
            .select(&Query::lemma("mening"))
            .unwrap()
        };
        let first = run();
        let second = run();
        assert_eq!(first.entries, second.entries);
    }

    #[test]
    fn pool_is_capped_at_max_candidates() {
        let pool: Vec<Kwic> = (0..50)
            .map(|i| kwic(i, &["Mening", &format!("nummer{}", i), "."]))
            .collect();
        let engine = engine_with(
            pool,
            r#"{}"#,
            RunConfig {
                max_candidates: 5,
                requested_count: 100,
                ..seeded_config()
            },
        );
        let outcome = engine.select(&Query::lemma("mening")).unwrap();
        assert_eq!(outcome.entries.len(), 5);
    }
}
