// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Terminal display for ranked selection results.
//!
//! One summary line per sentence, then a per-criterion table with the
//! evidence that drove the decision. Filters are tagged `(F)` and rankers
//! `(R)` so it is obvious which entries disqualify and which only reorder.
//! Colors respect `NO_COLOR` and non-TTY pipelines.

use kwicpick::registry::Classified;
use kwicpick::types::{EvidenceScore, ResultEntry};

const RULE_WIDTH: usize = 82;

/// Whether to emit ANSI colors.
fn use_color() -> bool {
    std::env::var_os("NO_COLOR").is_none() && atty::is(atty::Stream::Stdout)
}

fn paint(text: &str, code: &str) -> String {
    if use_color() {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

fn bold(text: &str) -> String {
    paint(text, "1")
}

fn dim(text: &str) -> String {
    paint(text, "2")
}

fn red(text: &str) -> String {
    paint(text, "31")
}

fn green(text: &str) -> String {
    paint(text, "32")
}

fn rule() -> String {
    dim(&"¯".repeat(RULE_WIDTH))
}

fn score_cell(score: &EvidenceScore) -> String {
    match score {
        EvidenceScore::Flag(flag) => flag.to_string(),
        EvidenceScore::Value(value) => format!("{:.2}", value),
    }
}

/// Print the ranked result set with per-criterion match details.
pub fn print_results(entries: &[ResultEntry], classified: &Classified) {
    println!("{}", bold("------ MATCHING CORPUS HITS --------"));
    println!();
    for entry in entries {
        let score = if entry.score < 0 {
            red(&entry.score.to_string())
        } else {
            green(&entry.score.to_string())
        };
        println!(
            "{:>4}. [{}] {:^12} {}",
            entry.rank,
            score,
            entry.corpus,
            bold(&entry.sent)
        );
        if entry.match_info.is_empty() {
            continue;
        }
        println!("{}", rule());
        println!(
            "      {:<22} | {:<10} | {}",
            dim("CRITERION"),
            dim("VALUE"),
            dim("DETAILS")
        );
        for (criterion, evidence) in &entry.match_info {
            let tag = if classified.is_filter(criterion) {
                "(F)"
            } else if classified.is_ranker(criterion) {
                "(R)"
            } else {
                "   "
            };
            println!(
                "      {:<22} | {:<10} | {}",
                format!("{} {}", criterion, tag),
                score_cell(&evidence.score),
                evidence.info
            );
        }
        println!("{}", rule());
    }
}

/// Print a criteria classification, filters first.
pub fn print_classification(classified: &Classified) {
    println!("{}", bold("Filters (any violation disqualifies):"));
    if classified.filters.is_empty() {
        println!("  {}", dim("none"));
    }
    for name in &classified.filters {
        println!("  {}", name);
    }
    println!();
    println!("{}", bold("Rankers (order accepted sentences):"));
    if classified.rankers.is_empty() {
        println!("  {}", dim("none"));
    }
    for name in &classified.rankers {
        println!("  {}", name);
    }
}
