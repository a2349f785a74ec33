//! Build command implementation
//!
//! Reduces text sources to the smallest word list that still covers every
//! word the allowed characters can spell.

use std::collections::HashSet;
use std::io::{self, Write};

use anyhow::{Context, Result};

use fontdelta::fontdb::Font;
use fontdelta_core::LogReporter;
use fontdelta_corpus::{build_corpus_from_paths, write_corpus};

use crate::cli::BuildArgs;

pub fn run(args: &BuildArgs) -> Result<()> {
    let allowed = allowed_chars(args)?;
    log::info!(
        "Building corpus from {} source(s) over {} characters",
        args.inputs.len(),
        allowed.len()
    );

    let words = build_corpus_from_paths(&args.inputs, &allowed, &LogReporter)?;
    log::info!("Kept {} words", words.len());

    match &args.output_file {
        Some(path) => write_corpus(&words, path)
            .with_context(|| format!("writing corpus to {}", path.display()))?,
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            for word in &words {
                writeln!(out, "{word}")?;
            }
        },
    }
    Ok(())
}

fn allowed_chars(args: &BuildArgs) -> Result<HashSet<char>> {
    if let Some(glyphs) = &args.glyphs {
        return Ok(glyphs.chars().filter(|c| !c.is_whitespace()).collect());
    }
    let Some(path) = &args.font else {
        anyhow::bail!("either --glyphs or --font is required");
    };
    let font = Font::from_file(path)?;
    Ok(font
        .codepoints()
        .into_iter()
        .filter_map(char::from_u32)
        .filter(|c| !c.is_whitespace())
        .collect())
}
