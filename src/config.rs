// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Run and criteria configuration.
//!
//! Two documents drive a selection run. The **criteria configuration** maps
//! criterion (or criterion-group) names to a scoring mode, `filter` or
//! `ranker`, with one level of grouping allowed. The **run configuration**
//! holds the knobs that are not criteria: quota, pool cap, fallback policy,
//! target CEFR level, and the corpus sampling policy.
//!
//! Everything here is plain data with serde derives. Validation happens once
//! per run, up front: a criterion defined twice is a configuration error,
//! not something to resolve silently downstream.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::acquire::CorpusPolicy;

/// Criterion name with special banding semantics in the rank aggregator.
pub const READABILITY: &str = "readability";

/// Configuration rejected at validation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The same criterion is defined more than once across groups.
    DuplicateCriterion { name: String },
    /// A CEFR level string outside A1..C2.
    UnknownLevel { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::DuplicateCriterion { name } => {
                write!(f, "criterion '{}' is defined more than once", name)
            }
            ConfigError::UnknownLevel { value } => {
                write!(f, "unknown CEFR level '{}' (expected A1..C2)", value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// CEFR proficiency level, A1 (easiest) through C2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CefrLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl CefrLevel {
    /// Numeric rank on the scale A1=1 .. C2=6, used for level differences.
    pub fn rank(self) -> i64 {
        match self {
            CefrLevel::A1 => 1,
            CefrLevel::A2 => 2,
            CefrLevel::B1 => 3,
            CefrLevel::B2 => 4,
            CefrLevel::C1 => 5,
            CefrLevel::C2 => 6,
        }
    }

    /// Whether this is a beginner (A) level; corpus pinning keys off this.
    pub fn is_a_level(self) -> bool {
        matches!(self, CefrLevel::A1 | CefrLevel::A2)
    }

    /// Signed level difference `self - target` on the numeric scale.
    pub fn diff(self, target: CefrLevel) -> i64 {
        self.rank() - target.rank()
    }
}

impl fmt::Display for CefrLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CefrLevel::A1 => "A1",
            CefrLevel::A2 => "A2",
            CefrLevel::B1 => "B1",
            CefrLevel::B2 => "B2",
            CefrLevel::C1 => "C1",
            CefrLevel::C2 => "C2",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for CefrLevel {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_uppercase().as_str() {
            "A1" => Ok(CefrLevel::A1),
            "A2" => Ok(CefrLevel::A2),
            "B1" => Ok(CefrLevel::B1),
            "B2" => Ok(CefrLevel::B2),
            "C1" => Ok(CefrLevel::C1),
            "C2" => Ok(CefrLevel::C2),
            _ => Err(ConfigError::UnknownLevel {
                value: value.to_string(),
            }),
        }
    }
}

/// Scoring mode tag for a criterion.
///
/// `Off` covers the empty or unrecognized mode strings the configuration
/// format allows: the criterion stays in the document but takes no part in
/// filtering or ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CriterionMode {
    Filter,
    Ranker,
    Off,
}

impl From<String> for CriterionMode {
    fn from(value: String) -> Self {
        match value.as_str() {
            "filter" => CriterionMode::Filter,
            "ranker" => CriterionMode::Ranker,
            _ => CriterionMode::Off,
        }
    }
}

impl From<CriterionMode> for String {
    fn from(mode: CriterionMode) -> Self {
        match mode {
            CriterionMode::Filter => "filter".to_string(),
            CriterionMode::Ranker => "ranker".to_string(),
            CriterionMode::Off => String::new(),
        }
    }
}

/// A top-level criteria entry: either a mode tag or a group of sub-criteria.
///
/// Exactly one level of nesting is permitted; groups contain only mode tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CriteriaEntry {
    Mode(CriterionMode),
    Group(BTreeMap<String, CriterionMode>),
}

/// The full criteria configuration document.
///
/// Keys are criterion or group names. `BTreeMap` keeps iteration order
/// deterministic, which the reproducibility contract relies on.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CriteriaConfig(pub BTreeMap<String, CriteriaEntry>);

impl CriteriaConfig {
    /// Reject configurations that define the same criterion twice.
    ///
    /// Group names are namespaces, not criteria; only leaf criterion names
    /// can collide. A top-level criterion and a sub-criterion with the same
    /// name collide too.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = BTreeSet::new();
        for (name, entry) in &self.0 {
            match entry {
                CriteriaEntry::Mode(_) => {
                    if !seen.insert(name.clone()) {
                        return Err(ConfigError::DuplicateCriterion { name: name.clone() });
                    }
                }
                CriteriaEntry::Group(group) => {
                    for sub_name in group.keys() {
                        if !seen.insert(sub_name.clone()) {
                            return Err(ConfigError::DuplicateCriterion {
                                name: sub_name.clone(),
                            });
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// The default criteria battery tuned for exercise-item detection.
    pub fn exercise_defaults() -> Self {
        let mut top = BTreeMap::new();

        let mut well_formedness = BTreeMap::new();
        for name in [
            "root",
            "sent_tokenization",
            "elliptic",
            "non_alpha",
            "non_lemmatized",
        ] {
            well_formedness.insert(name.to_string(), CriterionMode::Filter);
        }
        top.insert(
            "well_formedness".to_string(),
            CriteriaEntry::Group(well_formedness),
        );

        let mut isolability = BTreeMap::new();
        for name in ["struct_conn", "yn_answer", "anaphora-PN", "anaphora-AB"] {
            isolability.insert(name.to_string(), CriterionMode::Filter);
        }
        top.insert("isolability".to_string(), CriteriaEntry::Group(isolability));

        top.insert(
            READABILITY.to_string(),
            CriteriaEntry::Mode(CriterionMode::Filter),
        );
        top.insert(
            "typicality".to_string(),
            CriteriaEntry::Mode(CriterionMode::Ranker),
        );
        top.insert(
            "sensitive_voc".to_string(),
            CriteriaEntry::Mode(CriterionMode::Filter),
        );

        let mut other = BTreeMap::new();
        for name in [
            "length",
            "repkw",
            "interrogative",
            "abbrev",
            "direct_speech",
            "diff_voc_kelly",
            "out_of_svalex",
        ] {
            other.insert(name.to_string(), CriterionMode::Filter);
        }
        other.insert("proper_name".to_string(), CriterionMode::Ranker);
        // Present but inert unless a caller switches them on.
        for name in [
            "kw_position",
            "modal_verb",
            "participle",
            "sverb",
            "neg_form",
            "svalex_fr",
        ] {
            other.insert(name.to_string(), CriterionMode::Off);
        }
        top.insert("other_criteria".to_string(), CriteriaEntry::Group(other));

        CriteriaConfig(top)
    }
}

/// What to do with candidates the readability band pushed out of ranking.
///
/// The band gate removes candidates more than one CEFR level away from the
/// target from the whole rank aggregation. Whether those sentences should
/// still be eligible for the suboptimal fallback pool is a policy choice,
/// so it is one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandedOutPolicy {
    /// Discard banded-out candidates for the rest of the run.
    #[default]
    Drop,
    /// Move them to the bad pool with one badness point per level beyond
    /// the band.
    Demote,
}

fn default_corpus_list() -> Vec<String> {
    [
        "rom99",
        "flashback-resor",
        "gp2013",
        "gp2d",
        "attasidor",
        "lasbart",
        "suc3",
        "talbanken",
    ]
    .iter()
    .map(|corpus| (*corpus).to_string())
    .collect()
}

fn default_max_candidates() -> usize {
    80
}

fn default_requested_count() -> usize {
    10
}

fn default_preserve_bad() -> bool {
    true
}

fn default_target_level() -> CefrLevel {
    CefrLevel::B1
}

fn default_positive_criteria() -> Vec<String> {
    vec!["typicality".to_string(), "MI".to_string()]
}

/// Per-run configuration, independent of the criteria battery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Corpora eligible for the search.
    #[serde(default = "default_corpus_list")]
    pub corpus_list: Vec<String>,
    /// How the eligible corpora are narrowed before searching.
    #[serde(default)]
    pub corpus_policy: CorpusPolicy,
    /// Cap on the acquired pool before evidence computation.
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
    /// Quota: number of result entries requested.
    #[serde(default = "default_requested_count")]
    pub requested_count: usize,
    /// Backfill the result set from least-bad rejected candidates when the
    /// good set is smaller than the quota.
    #[serde(default = "default_preserve_bad")]
    pub preserve_bad: bool,
    /// Reference CEFR level for readability and level-correlated criteria.
    #[serde(default = "default_target_level")]
    pub target_level: CefrLevel,
    /// Criteria where a higher raw score is better, not worse.
    #[serde(default = "default_positive_criteria")]
    pub positive_criteria: Vec<String>,
    /// Fate of candidates excluded by the readability band.
    #[serde(default)]
    pub banded_out: BandedOutPolicy,
    /// Seed for candidate and corpus shuffling; set for reproducible runs.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            corpus_list: default_corpus_list(),
            corpus_policy: CorpusPolicy::default(),
            max_candidates: default_max_candidates(),
            requested_count: default_requested_count(),
            preserve_bad: default_preserve_bad(),
            target_level: default_target_level(),
            positive_criteria: default_positive_criteria(),
            banded_out: BandedOutPolicy::default(),
            random_seed: None,
        }
    }
}

impl RunConfig {
    /// Whether a criterion name is positively correlated with goodness.
    pub fn is_positive(&self, name: &str) -> bool {
        self.positive_criteria.iter().any(|positive| positive == name)
    }
}
