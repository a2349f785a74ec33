//! Subcommand implementations and the setup they share

pub mod batch;
pub mod build;
pub mod diff;

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;

use fontdelta::fontdb::Font;
use fontdelta::unicode::UnicodeData;
use fontdelta::{DiffConfig, Differ, FontHandle, MemoryWordlists, WordlistDir, WordlistSource};

use crate::cli::CompareArgs;

/// Config file values with any flags laid over them
pub fn resolve_config(args: &CompareArgs) -> Result<DiffConfig> {
    let mut config: DiffConfig = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        },
        None => DiffConfig::default(),
    };

    if let Some(hash) = args.hash {
        config.hash_mode = hash.into();
    }
    if let Some(size) = args.render_size {
        config.render_size = size;
    }
    if let Some(threshold) = args.word_threshold {
        config.word_threshold = threshold;
    }
    if let Some(threshold) = args.glyph_threshold {
        config.glyph_threshold = threshold;
    }
    if let Some(count) = args.min_codepoints {
        config.min_script_codepoints = count;
    }
    if let Some(count) = args.dedup_after {
        config.dedup_after = count;
    }
    Ok(config)
}

/// A differ on the default backends
pub fn make_differ(args: &CompareArgs) -> Result<Differ> {
    let wordlists: Arc<dyn WordlistSource> = match &args.wordlists {
        Some(dir) => {
            if !dir.is_dir() {
                anyhow::bail!("word-list directory {} does not exist", dir.display());
            }
            Arc::new(WordlistDir::new(dir))
        },
        None => {
            log::warn!("No word-list directory given; only glyphs will be compared");
            Arc::new(MemoryWordlists::new())
        },
    };

    let differ = Differ::builder()
        .pipeline(fontdelta::default_pipeline()?)
        .character_data(Arc::new(UnicodeData::new()))
        .wordlists(wordlists)
        .config(resolve_config(args)?)
        .build()?;
    Ok(differ)
}

/// Opens a font and pins it to the coordinates it actually supports
pub fn load_font(
    path: &Path,
    coordinates: &BTreeMap<String, f32>,
) -> fontdelta::Result<FontHandle> {
    let font = Font::from_file(path)?;
    let resolved = font.resolve_coordinates(coordinates);
    Ok(FontHandle::new(Arc::new(font)).with_variations(resolved))
}

/// Pretty JSON to a file, or stdout when no path is given
pub fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("creating {}", path.display()))?;
            let mut out = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut out, value)?;
            writeln!(out)?;
            out.flush()?;
        },
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            serde_json::to_writer_pretty(&mut out, value)?;
            writeln!(out)?;
        },
    }
    Ok(())
}
