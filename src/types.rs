// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The building blocks of a selection run.
//!
//! A [`Candidate`] is one corpus sentence containing the search keyword,
//! carried from acquisition to the final ranked output. Its [`MatchRecord`]
//! holds per-criterion evidence produced by external evaluators; the core
//! only ever reads it.
//!
//! # Invariants (the stuff that breaks if you ignore it)
//!
//! - **Candidate**: `position` is unique within one selection run. It is the
//!   candidate's identity for rank bookkeeping, so a pool with repeated
//!   positions will conflate scores.
//!
//! - **MatchRecord**: absence of a key means "no evidence of violation /
//!   neutral for ranking", not "pass". Filters treat a missing key as a
//!   vacuous pass; rankers substitute an explicit neutral default.
//!
//! - **MatchRecord** is a `BTreeMap` on purpose: iteration order is part of
//!   the reproducibility contract (two runs with the same inputs must rank
//!   identically).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Per-criterion score recorded by an evaluator.
///
/// Evaluators report either a flag ("the sentence is an answer to a yes/no
/// question") or a magnitude ("3 tokens over the length limit", "summed
/// mutual-information score"). Untagged so the transport shape is a plain
/// JSON bool or number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EvidenceScore {
    /// Boolean evidence: `true` marks a violation-style signal.
    Flag(bool),
    /// Numeric evidence: magnitude of violation, or a comparable scalar
    /// for ranker criteria.
    Value(f64),
}

impl EvidenceScore {
    /// Whether this score counts as a filter violation.
    ///
    /// `Flag(true)` and any nonzero `Value` are violations; `Flag(false)`
    /// and `Value(0.0)` are not.
    pub fn is_violation(self) -> bool {
        match self {
            EvidenceScore::Flag(flag) => flag,
            EvidenceScore::Value(value) => value != 0.0,
        }
    }

    /// Numeric view used by the rank aggregator: flags map to 1.0 / 0.0.
    pub fn as_f64(self) -> f64 {
        match self {
            EvidenceScore::Flag(true) => 1.0,
            EvidenceScore::Flag(false) => 0.0,
            EvidenceScore::Value(value) => value,
        }
    }
}

/// One evidence pair: a score plus a human-readable explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub score: EvidenceScore,
    pub info: String,
}

impl Evidence {
    pub fn flag(flag: bool, info: impl Into<String>) -> Self {
        Evidence {
            score: EvidenceScore::Flag(flag),
            info: info.into(),
        }
    }

    pub fn value(value: f64, info: impl Into<String>) -> Self {
        Evidence {
            score: EvidenceScore::Value(value),
            info: info.into(),
        }
    }

    /// The neutral entry substituted for rankers with no recorded evidence.
    pub fn neutral() -> Self {
        Evidence::value(0.0, "no violations")
    }
}

/// Mapping from criterion name to evidence, built by external evaluators.
pub type MatchRecord = BTreeMap<String, Evidence>;

/// One token of the corpus annotation, carried through opaquely.
///
/// The field set follows the attributes requested from the concordance
/// service (word, lemma, POS, morphology, dependency head/relation, sense
/// identifiers, token reference). The selection core never interprets these;
/// evaluators and downstream exercise generators do.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Token {
    pub word: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lemma: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msd: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dephead: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprel: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub saldo: Vec<String>,
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl Token {
    pub fn word(word: impl Into<String>) -> Self {
        Token {
            word: word.into(),
            ..Token::default()
        }
    }
}

/// The keyword match inside a candidate sentence.
///
/// `start..end` is the token span of the keyword; `position` is the
/// corpus-assigned hit position, unique within one search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordInfo {
    pub word: String,
    pub position: u64,
    pub start: usize,
    pub end: usize,
}

/// One corpus sentence instance under evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Corpus identifier the hit came from.
    pub corpus: String,
    /// Corpus-assigned hit position; candidate identity within a run.
    pub position: u64,
    /// Fully assembled sentence text. Deduplication compares this exactly.
    pub text: String,
    /// Tokens to the left of the keyword, joined.
    pub left_context: String,
    /// Keyword span information.
    pub keyword: KeywordInfo,
    /// Tokens to the right of the keyword, joined.
    pub right_context: String,
    /// Annotated tokens, opaque to the selection core.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tokens: Vec<Token>,
    /// Per-criterion evidence merged in by evaluators.
    #[serde(default)]
    pub match_record: MatchRecord,
}

/// A rejected candidate with its badness score.
///
/// Badness is the negative count of filter violations, so sorting descending
/// puts the least-bad candidate first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadCandidate {
    pub badness: i64,
    pub candidate: Candidate,
}

/// An accepted candidate with its aggregated match score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub match_score: i64,
    pub candidate: Candidate,
}

/// One entry of the final result set, in transport shape.
///
/// Field names match the document format the selection service has always
/// emitted (`rank, score, corpus, kwic_position, sent, ...`), so existing
/// consumers keep working.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEntry {
    /// 1-based rank in the result set.
    pub rank: usize,
    /// Aggregated match score; higher is better, negative for backfilled
    /// suboptimal sentences.
    pub score: i64,
    pub corpus: String,
    pub kwic_position: u64,
    pub sent: String,
    pub sent_left: String,
    pub keyword: KeywordInfo,
    pub sent_right: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tokens: Vec<Token>,
    pub match_info: MatchRecord,
}

impl ResultEntry {
    /// Build a result entry from a ranked candidate and its 0-based index.
    pub fn from_ranked(index: usize, ranked: RankedCandidate) -> Self {
        let RankedCandidate {
            match_score,
            candidate,
        } = ranked;
        ResultEntry {
            rank: index + 1,
            score: match_score,
            corpus: candidate.corpus,
            kwic_position: candidate.position,
            sent: candidate.text,
            sent_left: candidate.left_context,
            keyword: candidate.keyword,
            sent_right: candidate.right_context,
            tokens: candidate.tokens,
            match_info: candidate.match_record,
        }
    }
}

/// The ordered result of a successful selection run.
pub type SelectionResult = Vec<ResultEntry>;

/// Terminal failure of a selection run.
///
/// Every variant is a reported outcome, not a crash: batch callers must be
/// able to continue with the next query.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionError {
    /// The acquisition service returned no hits at all.
    NoCandidates,
    /// Every candidate violated at least one filter and fallback was
    /// disabled.
    NoMatch,
    /// The acquisition collaborator failed; message surfaced verbatim.
    Acquisition(String),
    /// The criteria configuration was rejected at validation time.
    Config(ConfigError),
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionError::NoCandidates => {
                write!(f, "No sentence containing the searched term was found.")
            }
            SelectionError::NoMatch => write!(
                f,
                "No sentence matched the indicated criteria. Try using less \
                 strict criteria or retaining suboptimal sentences."
            ),
            SelectionError::Acquisition(message) => {
                write!(f, "candidate acquisition failed: {}", message)
            }
            SelectionError::Config(error) => write!(f, "invalid configuration: {}", error),
        }
    }
}

impl std::error::Error for SelectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SelectionError::Config(error) => Some(error),
            _ => None,
        }
    }
}

impl From<ConfigError> for SelectionError {
    fn from(error: ConfigError) -> Self {
        SelectionError::Config(error)
    }
}
