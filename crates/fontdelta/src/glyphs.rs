//! Which characters came, went, or changed shape between two fonts

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashSet};

use rayon::prelude::*;
use serde::Serialize;

use fontdelta_core::{error::Result, traits::CharacterData, FontHandle};

use crate::Differ;

/// A single character as a font covers it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Glyph {
    pub character: char,
    /// Unicode name, empty when the character has none
    pub name: String,
    pub codepoint: u32,
}

impl Glyph {
    pub fn new(character: char, chars: &dyn CharacterData) -> Self {
        Self {
            character,
            name: chars.char_name(character).unwrap_or_default(),
            codepoint: character as u32,
        }
    }
}

/// A character both fonts cover but render differently
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlyphDiff {
    #[serde(flatten)]
    pub glyph: Glyph,
    pub changed_pixels: f64,
    pub diff_map: Vec<u32>,
}

/// Coverage and outline changes between two fonts
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GlyphItems {
    /// Covered before, gone after; ordered by character
    pub missing: Vec<Glyph>,
    /// Covered after only; ordered by character
    pub new: Vec<Glyph>,
    /// Most changed first
    pub modified: Vec<GlyphDiff>,
}

impl GlyphItems {
    /// Characters only one of the fonts has
    pub fn skip_chars(&self) -> HashSet<char> {
        self.missing
            .iter()
            .chain(&self.new)
            .map(|glyph| glyph.character)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.new.is_empty() && self.modified.is_empty()
    }
}

fn to_glyphs<'a>(
    codepoints: impl Iterator<Item = &'a u32>,
    chars: &dyn CharacterData,
) -> Vec<Glyph> {
    codepoints
        .filter_map(|&cp| char::from_u32(cp))
        .map(|ch| Glyph::new(ch, chars))
        .collect()
}

/// Sorts most severe first, keeping earlier entries ahead on ties
pub(crate) fn by_severity(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

impl Differ {
    /// Compares the character maps and renders of two fonts
    ///
    /// Every codepoint both fonts cover is rendered on its own with each font;
    /// the comparisons run in parallel but results keep codepoint order until
    /// the final severity sort.
    pub fn diff_glyphs(&self, before: &FontHandle, after: &FontHandle) -> Result<GlyphItems> {
        let cmap_a: BTreeSet<u32> = before.font.codepoints();
        let cmap_b: BTreeSet<u32> = after.font.codepoints();
        let chars = self.chars.as_ref();

        let missing = to_glyphs(cmap_a.difference(&cmap_b), chars);
        let new = to_glyphs(cmap_b.difference(&cmap_a), chars);

        let shared: Vec<char> = cmap_a
            .intersection(&cmap_b)
            .filter_map(|&cp| char::from_u32(cp))
            .collect();
        log::info!(
            "Comparing {} shared glyphs ({} missing, {} new)",
            shared.len(),
            missing.len(),
            new.len()
        );

        let threshold = self.config.glyph_threshold;
        let compared: Vec<Option<GlyphDiff>> = shared
            .par_iter()
            .map(|&ch| -> Result<Option<GlyphDiff>> {
                let text = ch.to_string();
                let diff = self.compare_renders(&text, None, None, &[], before, after)?;
                log::debug!("U+{:04X}: score {}", ch as u32, diff.score);
                Ok((diff.score > threshold).then(|| GlyphDiff {
                    glyph: Glyph::new(ch, chars),
                    changed_pixels: diff.score,
                    diff_map: diff.diff_map,
                }))
            })
            .collect::<Result<_>>()?;

        let mut modified: Vec<GlyphDiff> = compared.into_iter().flatten().collect();
        modified.sort_by(|a, b| by_severity(a.changed_pixels, b.changed_pixels));

        Ok(GlyphItems {
            missing,
            new,
            modified,
        })
    }
}
