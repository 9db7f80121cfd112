// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Classification of criteria into hard filters and soft rankers.
//!
//! The criteria document allows one level of grouping, so a group of
//! sub-criteria can be tagged `filter`/`ranker` member by member. This
//! module flattens that into two linear name sequences. Criteria with an
//! inert mode are neither filtered nor ranked but stay in the document.
//!
//! Pure function of the configuration; no caching, so a changed config just
//! means calling [`classify`] again.

use crate::config::{CriteriaConfig, CriteriaEntry, CriterionMode};

/// The flattened classification of a criteria configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Classified {
    /// Hard acceptability criteria; any violation disqualifies.
    pub filters: Vec<String>,
    /// Soft-scoring criteria used to order acceptable candidates.
    pub rankers: Vec<String>,
}

impl Classified {
    pub fn is_filter(&self, name: &str) -> bool {
        self.filters.iter().any(|filter| filter == name)
    }

    pub fn is_ranker(&self, name: &str) -> bool {
        self.rankers.iter().any(|ranker| ranker == name)
    }
}

/// Flatten a criteria configuration into filter and ranker name sequences.
///
/// Iterates top-level entries; a mode tag classifies the key itself, a group
/// classifies each sub-key by its own tag. No recursion beyond one level.
pub fn classify(config: &CriteriaConfig) -> Classified {
    let mut classified = Classified::default();
    for (name, entry) in &config.0 {
        match entry {
            CriteriaEntry::Mode(mode) => push(&mut classified, name, *mode),
            CriteriaEntry::Group(group) => {
                for (sub_name, sub_mode) in group {
                    push(&mut classified, sub_name, *sub_mode);
                }
            }
        }
    }
    classified
}

fn push(classified: &mut Classified, name: &str, mode: CriterionMode) {
    match mode {
        CriterionMode::Filter => classified.filters.push(name.to_string()),
        CriterionMode::Ranker => classified.rankers.push(name.to_string()),
        CriterionMode::Off => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn config_from_json(raw: &str) -> CriteriaConfig {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn top_level_modes_classify_the_key() {
        let config = config_from_json(r#"{"typicality": "ranker", "length": "filter"}"#);
        let classified = classify(&config);
        assert_eq!(classified.filters, vec!["length"]);
        assert_eq!(classified.rankers, vec!["typicality"]);
    }

    #[test]
    fn groups_classify_sub_keys_not_the_group_name() {
        let config = config_from_json(
            r#"{"well_formedness": {"root": "filter", "elliptic": "filter"},
                "other_criteria": {"proper_name": "ranker"}}"#,
        );
        let classified = classify(&config);
        assert!(classified.is_filter("root"));
        assert!(classified.is_filter("elliptic"));
        assert!(classified.is_ranker("proper_name"));
        assert!(!classified.is_filter("well_formedness"));
        assert!(!classified.is_ranker("other_criteria"));
    }

    #[test]
    fn inert_modes_are_ignored() {
        let config = config_from_json(
            r#"{"svalex_fr": "", "kw_position": "skip",
                "other_criteria": {"modal_verb": ""}}"#,
        );
        let classified = classify(&config);
        assert!(classified.filters.is_empty());
        assert!(classified.rankers.is_empty());
    }

    #[test]
    fn classification_is_deterministic_over_name_order() {
        let config = config_from_json(
            r#"{"b_crit": "filter", "a_crit": "filter", "c_crit": "ranker"}"#,
        );
        let classified = classify(&config);
        assert_eq!(classified.filters, vec!["a_crit", "b_crit"]);
        assert_eq!(classified.rankers, vec!["c_crit"]);
    }

    #[test]
    fn empty_config_classifies_to_nothing() {
        let classified = classify(&CriteriaConfig(BTreeMap::new()));
        assert!(classified.filters.is_empty());
        assert!(classified.rankers.is_empty());
    }

    #[test]
    fn exercise_defaults_have_expected_split() {
        let classified = classify(&CriteriaConfig::exercise_defaults());
        assert!(classified.is_filter("root"));
        assert!(classified.is_filter("readability"));
        assert!(classified.is_filter("sensitive_voc"));
        assert!(classified.is_ranker("typicality"));
        assert!(classified.is_ranker("proper_name"));
        assert!(!classified.is_filter("modal_verb"));
        assert!(!classified.is_ranker("modal_verb"));
    }
}
