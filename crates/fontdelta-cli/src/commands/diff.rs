//! Diff command implementation

use std::collections::BTreeMap;

use anyhow::{Context, Result};

use fontdelta::fontdb::parse_coordinates;
use fontdelta::FontDiff;

use super::{load_font, make_differ, write_json};
use crate::cli::DiffArgs;

/// Runs the comparison; `Ok(true)` when anything changed
pub fn run(args: &DiffArgs) -> Result<bool> {
    let differ = make_differ(&args.compare)?;

    let coordinates = match &args.coords {
        Some(spec) => parse_coordinates(spec)?,
        None => BTreeMap::new(),
    };

    let before = load_font(&args.before, &coordinates)
        .with_context(|| format!("loading {}", args.before.display()))?;
    let after = load_font(&args.after, &coordinates)
        .with_context(|| format!("loading {}", args.after.display()))?;

    let diff = match &args.user_wordlist {
        Some(path) => differ.diff_fonts_with_wordlist(&before, &after, path)?,
        None => differ.diff_fonts(&before, &after)?,
    };
    summarize(&diff);

    write_json(&diff, args.compare.output_file.as_deref())?;
    Ok(!diff.is_empty())
}

fn summarize(diff: &FontDiff) {
    log::info!(
        "{} missing, {} new, {} modified glyphs",
        diff.glyphs.missing.len(),
        diff.glyphs.new.len(),
        diff.glyphs.modified.len()
    );
    for (script, words) in &diff.words {
        log::info!("{script}: {} changed words", words.len());
    }
}
