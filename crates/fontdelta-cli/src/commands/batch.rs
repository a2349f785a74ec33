//! Batch command implementation
//!
//! Reads a JSON array of matched pairs and compares them all. A pair that
//! fails is recorded with its error; the rest still run.

use std::collections::BTreeMap;
use std::fs;

use anyhow::{Context, Result};
use serde::Serialize;

use fontdelta::{FontDiff, MatchedPair};

use super::{load_font, make_differ, write_json};
use crate::cli::BatchArgs;

/// What one style produced
#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
enum StyleOutcome {
    Ok(FontDiff),
    Error(String),
}

pub fn run(args: &BatchArgs) -> Result<()> {
    let text = fs::read_to_string(&args.pairs)
        .with_context(|| format!("reading pairs from {}", args.pairs.display()))?;
    let pairs: Vec<MatchedPair> = serde_json::from_str(&text)
        .with_context(|| format!("parsing pairs from {}", args.pairs.display()))?;

    let differ = make_differ(&args.compare)?;
    log::info!("Comparing {} font pairs", pairs.len());

    let mut failed = 0;
    let outcomes: BTreeMap<String, StyleOutcome> = differ
        .diff_pairs(&pairs, load_font)
        .into_iter()
        .map(|pair| {
            let outcome = match pair.result {
                Ok(diff) => StyleOutcome::Ok(diff),
                Err(e) => {
                    failed += 1;
                    StyleOutcome::Error(e.to_string())
                },
            };
            (pair.style, outcome)
        })
        .collect();

    if failed > 0 {
        log::warn!("{failed} of {} pairs failed", pairs.len());
    }
    write_json(&outcomes, args.compare.output_file.as_deref())
}
