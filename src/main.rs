// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use std::fs;

use clap::Parser;

use kwicpick::{
    classify, CriteriaConfig, JsonFileSource, Query, RunConfig, SelectionEngine, SelectionError,
};

mod cli;
use cli::{display, Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Select {
            input,
            query,
            query_type,
            pos,
            criteria,
            config,
            limit,
            seed,
            json,
        } => run_select(
            &input,
            &query,
            &query_type,
            pos,
            criteria.as_deref(),
            config.as_deref(),
            limit,
            seed,
            json,
        ),
        Commands::Criteria { criteria } => run_criteria(criteria.as_deref()),
    };
    if let Err(e) = result {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

fn load_criteria(path: Option<&str>) -> Result<CriteriaConfig, String> {
    match path {
        Some(path) => {
            let raw = fs::read_to_string(path).map_err(|e| format!("{}: {}", path, e))?;
            serde_json::from_str(&raw).map_err(|e| format!("{}: {}", path, e))
        }
        None => Ok(CriteriaConfig::exercise_defaults()),
    }
}

fn load_config(path: Option<&str>) -> Result<RunConfig, String> {
    match path {
        Some(path) => {
            let raw = fs::read_to_string(path).map_err(|e| format!("{}: {}", path, e))?;
            serde_json::from_str(&raw).map_err(|e| format!("{}: {}", path, e))
        }
        None => Ok(RunConfig::default()),
    }
}

fn build_query(word: &str, query_type: &str, pos: Option<String>) -> Query {
    let query = match query_type {
        "lemma" => Query::lemma(word),
        "wordform" => Query::wordform(word),
        // "cqp" and anything unrecognized: pass the expression through.
        _ => Query::cqp(word),
    };
    match pos {
        Some(pos) => query.with_pos(pos),
        None => query,
    }
}

#[allow(clippy::too_many_arguments)]
fn run_select(
    input: &str,
    query_word: &str,
    query_type: &str,
    pos: Option<String>,
    criteria_path: Option<&str>,
    config_path: Option<&str>,
    limit: Option<usize>,
    seed: Option<u64>,
    json: bool,
) -> Result<(), String> {
    let criteria = load_criteria(criteria_path)?;
    let mut config = load_config(config_path)?;
    if let Some(limit) = limit {
        config.requested_count = limit;
    }
    if let Some(seed) = seed {
        config.random_seed = Some(seed);
    }
    let classified = classify(&criteria);
    let query = build_query(query_word, query_type, pos);

    let engine = SelectionEngine::new(JsonFileSource::new(input), criteria, config);
    match engine.select(&query) {
        Ok(outcome) => {
            if json {
                let rendered = serde_json::to_string_pretty(&outcome.entries)
                    .map_err(|e| e.to_string())?;
                println!("{}", rendered);
            } else {
                display::print_results(&outcome.entries, &classified);
                println!();
                println!(
                    "{} sentence(s) from {} in {:.2}s",
                    outcome.entries.len(),
                    outcome.corpora.join(", "),
                    outcome.search_secs
                );
            }
            Ok(())
        }
        // No-result outcomes are reported data, not tool failures.
        Err(error @ (SelectionError::NoCandidates | SelectionError::NoMatch)) => {
            if json {
                println!("{{\"Error\": {}}}", serde_json::json!(error.to_string()));
            } else {
                println!("{}", error);
            }
            Ok(())
        }
        Err(error) => Err(error.to_string()),
    }
}

fn run_criteria(criteria_path: Option<&str>) -> Result<(), String> {
    let criteria = load_criteria(criteria_path)?;
    criteria.validate().map_err(|e| e.to_string())?;
    display::print_classification(&classify(&criteria));
    Ok(())
}
