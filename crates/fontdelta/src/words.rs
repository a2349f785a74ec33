//! Shaping regressions found by running real words through both fonts
//!
//! Every word is shaped with both fonts to record what the shaper produced,
//! then rendered with both and compared pixel by pixel. Rendering decides:
//! two identical glyph runs can still draw differently once outlines change.
//!
//! Checking tens of thousands of words would bury a reviewer under the same
//! broken glyph over and over, so once a glyph has shown up in a changed word
//! it counts as seen; later words built only from seen glyphs are skipped.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::hash::{Hash, Hasher};

use rayon::prelude::*;
use serde::Serialize;

use fontdelta_core::{
    error::{Result, WordlistError},
    report::Diagnostic,
    types::{PositionedGlyph, ShapingResult},
    FontHandle, HashMode,
};

use crate::glyphs::by_severity;
use crate::tables::{text_direction, TextDirection};
use crate::wordlist::WordlistEntry;
use crate::Differ;

/// A word that renders differently in the second font
#[derive(Debug, Clone, Serialize)]
pub struct WordDiff {
    pub string: String,
    pub signature_before: String,
    pub signature_after: String,
    pub features: Vec<String>,
    /// Display language, when the word list's tags map to one
    pub lang: Option<String>,
    pub direction: TextDirection,
    pub diff_map: Vec<u32>,
}

impl PartialEq for WordDiff {
    fn eq(&self, other: &Self) -> bool {
        self.string == other.string
            && self.signature_before == other.signature_before
            && self.signature_after == other.signature_after
            && self.features == other.features
    }
}

impl Eq for WordDiff {}

impl Hash for WordDiff {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.string.hash(state);
        self.signature_before.hash(state);
        self.signature_after.hash(state);
        self.features.hash(state);
    }
}

/// Identity of one shaped glyph under the given mode
///
/// Advances are rounded to whole units; signatures are shaped at the font's
/// own units per em, so that is exact.
pub fn glyph_identity(glyph: &PositionedGlyph, mode: HashMode) -> String {
    match mode {
        HashMode::GidPosition => {
            format!("gid={}, pos={};", glyph.id, glyph.advance.round() as i64)
        },
        HashMode::GlyphId => format!("gid={};", glyph.id),
    }
}

/// Identities of every glyph in a shaped run, in output order
pub fn identities(shaped: &ShapingResult, mode: HashMode) -> Vec<String> {
    shaped
        .glyphs
        .iter()
        .map(|glyph| glyph_identity(glyph, mode))
        .collect()
}

/// The shaper's output as one comparable string
pub fn signature(shaped: &ShapingResult, mode: HashMode) -> String {
    identities(shaped, mode).concat()
}

/// Glyph identities already reported as part of a changed word
#[derive(Debug, Clone, Default)]
pub struct SeenGlyphs {
    counts: HashMap<String, u32>,
    threshold: u32,
}

impl SeenGlyphs {
    /// Identities count as seen once recorded `threshold` times
    pub fn new(threshold: u32) -> Self {
        Self {
            counts: HashMap::new(),
            threshold: threshold.max(1),
        }
    }

    pub fn record(&mut self, identities: &[String]) {
        for identity in identities {
            *self.counts.entry(identity.clone()).or_insert(0) += 1;
        }
    }

    /// Whether a word made of these identities can teach us nothing new
    ///
    /// A run without glyphs has nothing left to show and counts as seen.
    pub fn all_seen(&self, identities: &[String]) -> bool {
        identities
            .iter()
            .all(|id| self.counts.get(id).is_some_and(|&n| n >= self.threshold))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl Differ {
    /// Runs one word list through both fonts
    ///
    /// Entries are processed in list order so dedup decisions only depend on
    /// earlier words. The result is ordered most changed first.
    pub fn test_words(
        &self,
        entries: &[WordlistEntry],
        before: &FontHandle,
        after: &FontHandle,
        skip: &HashSet<char>,
    ) -> Result<Vec<WordDiff>> {
        let mode = self.config.hash_mode;
        let mut seen = SeenGlyphs::new(self.config.dedup_after);
        let mut found: Vec<(f64, WordDiff)> = Vec::new();
        let mut reported: HashSet<WordDiff> = HashSet::new();

        for entry in entries {
            if entry.word.chars().any(|c| skip.contains(&c)) {
                continue;
            }

            let shaped_a = self.shape_in_font_units(entry, before)?;
            let shaped_b = self.shape_in_font_units(entry, after)?;
            let ids_b = identities(&shaped_b, mode);
            if seen.all_seen(&ids_b) {
                continue;
            }

            let diff = self.compare_renders(
                &entry.word,
                entry.script.as_deref(),
                entry.lang.as_deref(),
                &entry.features,
                before,
                after,
            )?;
            if diff.score < self.config.word_threshold {
                continue;
            }

            seen.record(&ids_b);
            let word = WordDiff {
                string: entry.word.clone(),
                signature_before: signature(&shaped_a, mode),
                signature_after: ids_b.concat(),
                features: entry.features.clone(),
                lang: entry.display_lang().map(str::to_string),
                direction: text_direction(entry.script.as_deref()),
                diff_map: diff.diff_map,
            };
            if reported.insert(word.clone()) {
                found.push((diff.score, word));
            }
        }

        found.sort_by(|a, b| by_severity(a.0, b.0));
        Ok(found.into_iter().map(|(_, word)| word).collect())
    }

    /// Checks every script the first font covers well enough
    ///
    /// Scripts run in parallel, each with its own dedup state. Scripts that
    /// produced no findings are left out of the map.
    pub fn detect(
        &self,
        before: &FontHandle,
        after: &FontHandle,
        skip: &HashSet<char>,
    ) -> Result<BTreeMap<String, Vec<WordDiff>>> {
        let counts = self.chars.count_scripts(&before.font.codepoints());

        let minimum = self.config.min_script_codepoints;
        let scripts: Vec<String> = counts
            .into_iter()
            .filter_map(|(script, count)| {
                if count < minimum {
                    self.reporter.report(Diagnostic::SparseScript {
                        script,
                        codepoints: count,
                        minimum,
                    });
                    None
                } else {
                    Some(script)
                }
            })
            .collect();

        let results: Vec<Option<(String, Vec<WordDiff>)>> = scripts
            .into_par_iter()
            .map(|script| -> Result<Option<(String, Vec<WordDiff>)>> {
                let entries = match self.wordlists.load(&script) {
                    Ok(entries) => entries,
                    Err(WordlistError::NotFound { script, path }) => {
                        self.reporter
                            .report(Diagnostic::MissingWordlist { script, path });
                        return Ok(None);
                    },
                    Err(e) => return Err(e.into()),
                };
                self.reporter.report(Diagnostic::TestingWords {
                    script: script.clone(),
                    count: entries.len(),
                });
                let words = self.test_words(&entries, before, after, skip)?;
                Ok((!words.is_empty()).then_some((script, words)))
            })
            .collect::<Result<_>>()?;

        Ok(results.into_iter().flatten().collect())
    }

    /// Shapes an entry at the font's units per em so advances are font units
    fn shape_in_font_units(
        &self,
        entry: &WordlistEntry,
        font: &FontHandle,
    ) -> Result<ShapingResult> {
        let params = entry.shaping_params(
            f32::from(font.font.units_per_em()),
            font.variation_settings(),
        );
        self.pipeline.shape(&entry.word, font.font.clone(), &params)
    }
}
