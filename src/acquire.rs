// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The candidate-acquisition boundary.
//!
//! The concordance service itself is an external collaborator; this module
//! owns everything up to its doorstep: rendering the CQP query expression,
//! narrowing the corpus list, mapping the service's KWIC JSON into
//! [`Candidate`]s, and the seeded shuffles that make runs reproducible.
//!
//! [`JsonFileSource`] reads a saved concordance document, which is what the
//! CLI uses and what tests feed the engine. A networked client would
//! implement [`CandidateSource`] the same way, outside this crate.

use std::collections::BTreeMap;
use std::fs;
use std::ops::Range;
use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::CefrLevel;
use crate::types::{Candidate, KeywordInfo, MatchRecord, SelectionError, Token};

// =============================================================================
// QUERY CONSTRUCTION
// =============================================================================

/// Search expression, prior to CQP rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryExpr {
    /// Match on lemma, any inflected form.
    Lemma(String),
    /// Match on the exact surface form.
    Wordform(String),
    /// Raw CQP, passed through untouched.
    Cqp(String),
}

/// A keyword query with an optional part-of-speech restriction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub expr: QueryExpr,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<String>,
}

impl Query {
    pub fn lemma(word: impl Into<String>) -> Self {
        Query {
            expr: QueryExpr::Lemma(word.into()),
            pos: None,
        }
    }

    pub fn wordform(word: impl Into<String>) -> Self {
        Query {
            expr: QueryExpr::Wordform(word.into()),
            pos: None,
        }
    }

    pub fn cqp(expr: impl Into<String>) -> Self {
        Query {
            expr: QueryExpr::Cqp(expr.into()),
            pos: None,
        }
    }

    pub fn with_pos(mut self, pos: impl Into<String>) -> Self {
        self.pos = Some(pos.into());
        self
    }

    /// Render the CQP expression the concordance service expects.
    ///
    /// The POS restriction applies to lemma and wordform queries; raw CQP
    /// is the caller's responsibility and passes through as-is.
    pub fn to_cqp(&self) -> String {
        match (&self.expr, &self.pos) {
            (QueryExpr::Lemma(word), Some(pos)) => {
                format!("[(lemma contains \"{}\") & (pos = \"{}\")]", word, pos)
            }
            (QueryExpr::Lemma(word), None) => format!("[lemma contains \"{}\"]", word),
            (QueryExpr::Wordform(word), Some(pos)) => {
                format!("[word = \"{}\" & (pos = \"{}\")]", word, pos)
            }
            (QueryExpr::Wordform(word), None) => format!("[word = \"{}\"]", word),
            (QueryExpr::Cqp(expr), _) => expr.clone(),
        }
    }
}

// =============================================================================
// KWIC MAPPING
// =============================================================================

/// The keyword span of a concordance hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSpan {
    pub position: u64,
    pub start: usize,
    pub end: usize,
}

/// One keyword-in-context hit as the concordance service serializes it.
///
/// `match_info` is optional: a freshly fetched concordance has none, while a
/// previously annotated pool saved to disk carries its evidence along and
/// can be re-ranked without re-running the evaluators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kwic {
    pub corpus: String,
    #[serde(rename = "match")]
    pub span: MatchSpan,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentence_id: Option<String>,
    pub tokens: Vec<Token>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub match_info: MatchRecord,
}

impl Kwic {
    /// Assemble a candidate: join token words into the sentence text and
    /// split left context / keyword / right context at the match span.
    pub fn into_candidate(self) -> Candidate {
        let words: Vec<&str> = self.tokens.iter().map(|token| token.word.as_str()).collect();
        let start = self.span.start.min(words.len());
        let end = self.span.end.clamp(start, words.len());

        let text = words.join(" ");
        let left_context = words[..start].join(" ");
        let keyword_word = words[start..end].join(" ");
        let right_context = words[end..].join(" ");

        Candidate {
            corpus: self.corpus,
            position: self.span.position,
            text,
            left_context,
            keyword: KeywordInfo {
                word: keyword_word,
                position: self.span.position,
                start,
                end,
            },
            right_context,
            tokens: self.tokens,
            match_record: self.match_info,
        }
    }
}

/// A page of concordance hits.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchHits {
    #[serde(default)]
    pub kwic: Vec<Kwic>,
    /// Total hits in the searched corpora, not just this page.
    #[serde(default)]
    pub hits: u64,
    /// Service-side time for the search, in seconds.
    #[serde(default)]
    pub time: f64,
}

/// Where candidates come from.
///
/// `window` is the `[start, end)` slice of the full hit list; `seed` asks
/// the service for reproducible random ordering where it supports one.
pub trait CandidateSource {
    fn fetch(
        &self,
        cqp: &str,
        corpora: &[String],
        window: Range<usize>,
        seed: Option<u64>,
    ) -> Result<SearchHits, SelectionError>;
}

/// Candidate source backed by a saved concordance JSON document.
///
/// The query expression is ignored — the file already is one query's result.
/// Corpus narrowing and windowing still apply, so the same saved pool can
/// serve differently configured runs.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileSource { path: path.into() }
    }
}

impl CandidateSource for JsonFileSource {
    fn fetch(
        &self,
        _cqp: &str,
        corpora: &[String],
        window: Range<usize>,
        _seed: Option<u64>,
    ) -> Result<SearchHits, SelectionError> {
        let raw = fs::read_to_string(&self.path).map_err(|error| {
            SelectionError::Acquisition(format!("{}: {}", self.path.display(), error))
        })?;
        let hits: SearchHits = serde_json::from_str(&raw).map_err(|error| {
            SelectionError::Acquisition(format!("{}: {}", self.path.display(), error))
        })?;
        Ok(narrow(hits, corpora, window))
    }
}

/// Apply corpus narrowing and the result window to a page of hits.
pub fn narrow(mut hits: SearchHits, corpora: &[String], window: Range<usize>) -> SearchHits {
    if !corpora.is_empty() {
        hits.kwic.retain(|kwic| {
            corpora
                .iter()
                .any(|corpus| corpus.eq_ignore_ascii_case(&kwic.corpus))
        });
    }
    let start = window.start.min(hits.kwic.len());
    let end = window.end.clamp(start, hits.kwic.len());
    hits.kwic = hits.kwic.drain(start..end).collect();
    hits
}

// =============================================================================
// CORPUS SAMPLING AND SHUFFLING
// =============================================================================

/// How the eligible corpus list is narrowed before searching.
///
/// Searching every corpus is slow and skews the pool toward the largest
/// ones, so the default samples a few. `LevelPinned` reproduces the
/// level-aware variant: beginner targets pin the easy-reader corpora first
/// and fill the remainder from a level-seeded shuffle, so every A1 run sees
/// the same corpus mix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum CorpusPolicy {
    /// Search the whole list.
    All,
    /// Seeded shuffle, then take `size` corpora (all of them when the list
    /// is no larger than `size`).
    Sample { size: usize },
    /// Pin `easy` corpora for A-level targets, fill up to `size` from the
    /// rest; non-A targets behave like `Sample` with a level-derived seed.
    LevelPinned { easy: Vec<String>, size: usize },
}

impl Default for CorpusPolicy {
    fn default() -> Self {
        CorpusPolicy::Sample { size: 4 }
    }
}

fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Narrow the corpus list according to policy.
///
/// `LevelPinned` ignores the run seed and derives its seed from the target
/// level's numeric rank, so corpus choice is stable per level across runs.
pub fn sample_corpora(
    policy: &CorpusPolicy,
    corpus_list: &[String],
    seed: Option<u64>,
    target_level: CefrLevel,
) -> Vec<String> {
    match policy {
        CorpusPolicy::All => corpus_list.to_vec(),
        CorpusPolicy::Sample { size } => sampled(corpus_list, *size, rng_for(seed)),
        CorpusPolicy::LevelPinned { easy, size } => {
            let level_rng = StdRng::seed_from_u64(target_level.rank() as u64);
            if target_level.is_a_level() {
                let mut chosen: Vec<String> = easy
                    .iter()
                    .filter(|corpus| corpus_list.contains(corpus))
                    .cloned()
                    .collect();
                let rest: Vec<String> = corpus_list
                    .iter()
                    .filter(|corpus| !chosen.contains(corpus))
                    .cloned()
                    .collect();
                let fill = size.saturating_sub(chosen.len());
                chosen.extend(sampled(&rest, fill, level_rng));
                chosen
            } else {
                sampled(corpus_list, *size, level_rng)
            }
        }
    }
}

fn sampled(corpus_list: &[String], size: usize, mut rng: impl Rng) -> Vec<String> {
    if corpus_list.len() <= size {
        return corpus_list.to_vec();
    }
    let mut shuffled = corpus_list.to_vec();
    shuffled.shuffle(&mut rng);
    shuffled.truncate(size);
    shuffled
}

/// Shuffle the candidate pool, reproducibly when a seed is given.
pub fn shuffle_candidates(candidates: &mut [Candidate], seed: Option<u64>) {
    let mut rng = rng_for(seed);
    candidates.shuffle(&mut rng);
}
