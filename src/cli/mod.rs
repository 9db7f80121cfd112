// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the kwicpick command-line interface.
//!
//! Two subcommands: `select` runs the selection pipeline over a saved
//! concordance file and prints the ranked sentences, `criteria` shows how a
//! criteria document splits into filters and rankers. Network acquisition is
//! deliberately absent; the CLI works from saved search results.

pub mod display;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "kwicpick",
    about = "Criteria-based selection and ranking of corpus sentences",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Select and rank sentences from a saved concordance file
    Select {
        /// Path to a concordance JSON document (optionally pre-annotated)
        #[arg(short, long)]
        input: String,

        /// Search keyword or raw CQP expression
        #[arg(short, long)]
        query: String,

        /// How to interpret the query: lemma, wordform or cqp
        #[arg(long, default_value = "lemma")]
        query_type: String,

        /// Part-of-speech restriction for lemma/wordform queries (e.g. NN)
        #[arg(long)]
        pos: Option<String>,

        /// Path to a criteria JSON document
        ///
        /// Maps criterion (or group) names to "filter"/"ranker". Defaults
        /// to the exercise-item battery.
        #[arg(long)]
        criteria: Option<String>,

        /// Path to a run configuration JSON document
        #[arg(long)]
        config: Option<String>,

        /// Number of sentences to return (overrides the configuration)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Random seed for a reproducible run (overrides the configuration)
        #[arg(long)]
        seed: Option<u64>,

        /// Emit the result document as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show how a criteria document classifies into filters and rankers
    Criteria {
        /// Path to a criteria JSON document; defaults to the exercise battery
        #[arg(long)]
        criteria: Option<String>,
    },
}
