// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Criteria-based selection and ranking of corpus sentences.
//!
//! This crate picks good example sentences out of keyword-in-context search
//! hits. A configurable battery of criteria splits into filters, which
//! disqualify, and rankers, which order the survivors by a Borda-style
//! aggregation of per-criterion positions.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌─────────────┐
//! │ acquire.rs  │────▶│   pool.rs    │────▶│  filter.rs  │
//! │ (CandidateS-│     │  (dedupe)    │     │ (partition) │
//! │ ource, Kwic)│     └──────────────┘     └──────┬──────┘
//! └─────────────┘                                 │
//!                                                 ▼
//! ┌─────────────┐     ┌──────────────┐     ┌─────────────┐
//! │ fallback.rs │◀────│   rank.rs    │◀────│ registry.rs │
//! │ (fill_quota)│     │ (rank, bands)│     │ (classify)  │
//! └──────┬──────┘     └──────────────┘     └─────────────┘
//!        │
//!        ▼
//! ┌─────────────────────────────────────────────────────┐
//! │                     engine.rs                        │
//! │  (SelectionEngine - orchestrates the full pipeline,  │
//! │   EvidenceEvaluator plug-in seam)                    │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! `types.rs` carries the data model (Candidate, Evidence, ResultEntry) and
//! `config.rs` the criteria and run configuration documents.
//!
//! # Usage
//!
//! ```ignore
//! use kwicpick::{CriteriaConfig, JsonFileSource, Query, RunConfig, SelectionEngine};
//!
//! let engine = SelectionEngine::new(
//!     JsonFileSource::new("hits.json"),
//!     CriteriaConfig::exercise_defaults(),
//!     RunConfig::default(),
//! );
//! let outcome = engine.select(&Query::lemma("ge"))?;
//! for entry in &outcome.entries {
//!     println!("{:>3}. [{}] {}", entry.rank, entry.score, entry.sent);
//! }
//! ```

pub mod acquire;
pub mod config;
pub mod engine;
pub mod fallback;
pub mod filter;
pub mod pool;
pub mod rank;
pub mod registry;
pub mod types;

// Re-exports for public API
pub use acquire::{
    narrow, sample_corpora, shuffle_candidates, CandidateSource, CorpusPolicy, JsonFileSource,
    Kwic, MatchSpan, Query, QueryExpr, SearchHits,
};
pub use config::{
    BandedOutPolicy, CefrLevel, ConfigError, CriteriaConfig, CriteriaEntry, CriterionMode,
    RunConfig, READABILITY,
};
pub use engine::{EvidenceEvaluator, SelectionEngine, SelectionOutcome, SEARCH_WINDOW_END};
pub use fallback::fill_quota;
pub use filter::{partition, Partitioned};
pub use pool::dedupe;
pub use rank::{band_excess, rank, Ranked};
pub use registry::{classify, Classified};
pub use types::{
    BadCandidate, Candidate, Evidence, EvidenceScore, KeywordInfo, MatchRecord, RankedCandidate,
    ResultEntry, SelectionError, SelectionResult, Token,
};
