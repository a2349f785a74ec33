//! The contracts that bind every backend together
//!
//! The detector never talks to HarfBuzz, Skia or ICU directly. It talks to
//! these traits, so tests can swap in stubs and callers can swap in their own
//! engines without touching a single line of comparison logic.
//!
//! ## The Players
//!
//! - [`FontRef`] - Your window into font data and its character map
//! - [`Shaper`] - Where characters become glyphs
//! - [`Renderer`] - Where glyphs become pixels
//! - [`CharacterData`] - Unicode script and name lookups

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::{error::Result, types::*, RenderParams, ShapingParams};

/// Your key to unlocking font secrets
///
/// ```ignore
/// struct MyFont {
///     data: Vec<u8>,
/// }
///
/// impl FontRef for MyFont {
///     fn data(&self) -> &[u8] {
///         &self.data
///     }
///
///     fn units_per_em(&self) -> u16 {
///         1000
///     }
///
///     fn glyph_id(&self, ch: char) -> Option<GlyphId> {
///         Some(42)
///     }
///
///     fn advance_width(&self, glyph_id: GlyphId) -> f32 {
///         500.0
///     }
/// }
/// ```
pub trait FontRef: Send + Sync {
    /// Raw font bytes as they live in the file
    ///
    /// Synthetic fonts may return an empty slice; backends then fall back
    /// to the metric methods below.
    fn data(&self) -> &[u8];

    /// Which face of a collection file [`FontRef::data`] holds; 0 for single fonts
    fn face_index(&self) -> u32 {
        0
    }

    /// The font's internal coordinate system scale
    fn units_per_em(&self) -> u16;

    /// Find the glyph that represents this character
    ///
    /// Returns None when the font doesn't contain this character.
    fn glyph_id(&self, ch: char) -> Option<GlyphId>;

    /// How wide this glyph stands in font units
    fn advance_width(&self, glyph_id: GlyphId) -> f32;

    /// How many glyphs this font contains
    fn glyph_count(&self) -> Option<u32> {
        None
    }

    /// Every codepoint the font's best character map covers
    ///
    /// The default walks the Basic Multilingual Plane through
    /// [`FontRef::glyph_id`]; real fonts override it with a cmap walk.
    fn codepoints(&self) -> BTreeSet<u32> {
        (0u32..=0xFFFF)
            .filter_map(char::from_u32)
            .filter(|ch| self.glyph_id(*ch).is_some())
            .map(u32::from)
            .collect()
    }
}

/// Where characters learn their positions
///
/// Script rules, font features and variation coordinates all meet here to
/// produce positioned glyphs. Implementations must be callable from several
/// threads at once; keep per-call state inside `shape`.
pub trait Shaper: Send + Sync {
    /// Identify yourself in logs and error messages
    fn name(&self) -> &'static str;

    /// Transform characters into positioned glyphs
    fn shape(
        &self,
        text: &str,
        font: Arc<dyn FontRef>,
        params: &ShapingParams,
    ) -> Result<ShapingResult>;
}

/// Where glyphs become visible
pub trait Renderer: Send + Sync {
    /// Your renderer's signature
    fn name(&self) -> &'static str;

    /// Rasterize shaped glyphs into a bitmap sized to their ink
    fn render(
        &self,
        shaped: &ShapingResult,
        font: Arc<dyn FontRef>,
        params: &RenderParams,
    ) -> Result<BitmapData>;
}

/// Unicode facts about individual characters
pub trait CharacterData: Send + Sync {
    /// Long Unicode script name for a codepoint, e.g. `Latin`
    ///
    /// `None` for codepoints the data doesn't know about.
    fn script_name(&self, codepoint: u32) -> Option<String>;

    /// Unicode character name, e.g. `LATIN CAPITAL LETTER A`
    fn char_name(&self, ch: char) -> Option<String>;

    /// How many of `codepoints` fall into each script
    fn count_scripts(&self, codepoints: &BTreeSet<u32>) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for &cp in codepoints {
            if let Some(script) = self.script_name(cp) {
                *counts.entry(script).or_insert(0) += 1;
            }
        }
        counts
    }
}
