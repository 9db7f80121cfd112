// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Shared test utilities and fixtures.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::io::Write;
use std::ops::Range;

use kwicpick::{
    Candidate, CandidateSource, CorpusPolicy, Evidence, EvidenceEvaluator, Kwic, MatchRecord,
    MatchSpan, RunConfig, SearchHits, SelectionError, Token,
};

// ============================================================================
// FIXTURE BUILDERS
// ============================================================================

/// A KWIC hit over the given words, keyword at `keyword_index`.
pub fn kwic(corpus: &str, position: u64, words: &[&str], keyword_index: usize) -> Kwic {
    Kwic {
        corpus: corpus.to_string(),
        span: MatchSpan {
            position,
            start: keyword_index,
            end: keyword_index + 1,
        },
        sentence_id: None,
        tokens: words.iter().map(|word| Token::word(*word)).collect(),
        match_info: MatchRecord::new(),
    }
}

/// A fully assembled candidate, keyword on the first token.
pub fn candidate(position: u64, words: &[&str]) -> Candidate {
    kwic("SUC3", position, words, 0).into_candidate()
}

/// A candidate with evidence entries already recorded.
pub fn candidate_with(
    position: u64,
    words: &[&str],
    evidence: &[(&str, Evidence)],
) -> Candidate {
    let mut candidate = candidate(position, words);
    for (criterion, entry) in evidence {
        candidate
            .match_record
            .insert((*criterion).to_string(), entry.clone());
    }
    candidate
}

pub fn names(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}

/// A page of hits around a list of KWIC fixtures.
pub fn hits(kwics: Vec<Kwic>) -> SearchHits {
    SearchHits {
        hits: kwics.len() as u64,
        kwic: kwics,
        time: 0.05,
    }
}

// ============================================================================
// IN-MEMORY COLLABORATORS
// ============================================================================

/// Candidate source serving a fixed page of hits.
pub struct PoolSource {
    pub hits: SearchHits,
}

impl PoolSource {
    pub fn new(kwics: Vec<Kwic>) -> Self {
        PoolSource { hits: hits(kwics) }
    }
}

impl CandidateSource for PoolSource {
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

/// Evaluator producing evidence from a fixed table keyed on hit position.
pub struct EvidenceTable {
    pub table: BTreeMap<u64, Vec<(String, Evidence)>>,
}

impl EvidenceTable {
    pub fn new(rows: Vec<(u64, Vec<(&str, Evidence)>)>) -> Self {
        let table = rows
            .into_iter()
            .map(|(position, entries)| {
                let entries = entries
                    .into_iter()
                    .map(|(criterion, evidence)| (criterion.to_string(), evidence))
                    .collect();
                (position, entries)
            })
            .collect();
        EvidenceTable { table }
    }
}

impl EvidenceEvaluator for EvidenceTable {
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

// ============================================================================
// ON-DISK FIXTURES
// ============================================================================

/// Write a concordance document to a temp file for `JsonFileSource` tests.
pub fn write_concordance(hits: &SearchHits) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp file");
    let raw = serde_json::to_string(hits).expect("serialize hits");
    file.write_all(raw.as_bytes()).expect("write hits");
    file.flush().expect("flush hits");
    file
}

/// A run configuration that searches every listed corpus and shuffles with
/// a fixed seed, so tests are deterministic.
pub fn deterministic_config() -> RunConfig {
    RunConfig {
        corpus_policy: CorpusPolicy::All,
        random_seed: Some(1),
        ..RunConfig::default()
    }
}
