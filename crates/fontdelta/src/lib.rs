//! fontdelta - did this font edit change how anything renders?
//!
//! Two versions of a font go in. Out comes:
//!
//! 1. **Glyphs** - characters only one version covers, and shared characters
//!    whose single-glyph render changed ([`glyphs`])
//! 2. **Words** - real words per script whose shaping or rendering changed,
//!    deduplicated by the glyphs involved and ranked by severity ([`words`])
//!
//! The shaper, rasterizer and Unicode data are pluggable through the
//! `fontdelta-core` traits; the default features bring harfrust, tiny-skia,
//! read-fonts and ICU4X implementations.
//!
//! # Example
//!
//! ```ignore
//! use fontdelta::{Differ, FontHandle, WordlistDir};
//!
//! let differ = Differ::builder()
//!     .pipeline(fontdelta::default_pipeline()?)
//!     .character_data(Arc::new(fontdelta::unicode::UnicodeData::new()))
//!     .wordlists(Arc::new(WordlistDir::new("wordlists")))
//!     .build()?;
//!
//! let report = differ.diff_fonts(&before, &after)?;
//! println!("{}", report.words.len());
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

pub mod batch;
pub mod glyphs;
pub mod tables;
pub mod wordlist;
pub mod words;

pub use batch::{MatchedPair, PairResult};
pub use fontdelta_core::{
    error, pixel_diff, report, DiffConfig, DiffError, FontHandle, HashMode, Pipeline, PixelDiff,
    Result,
};
pub use glyphs::{Glyph, GlyphDiff, GlyphItems};
pub use tables::TextDirection;
pub use wordlist::{MemoryWordlists, WordlistDir, WordlistEntry, WordlistSource};
pub use words::{SeenGlyphs, WordDiff};

#[cfg(feature = "fontdb")]
pub use fontdelta_fontdb as fontdb;

#[cfg(feature = "unicode")]
pub use fontdelta_unicode as unicode;

#[cfg(feature = "shape-hr")]
pub use fontdelta_shape_hr as shape_hr;

#[cfg(feature = "render-skia")]
pub use fontdelta_render_skia as render_skia;

use fontdelta_core::{
    report::{LogReporter, Reporter},
    traits::CharacterData,
    RenderParams,
};

/// Key the caller's own word list is reported under
pub const USER_WORDLIST: &str = "user";

/// Everything that changed between two fonts
#[derive(Debug, Clone, Default, Serialize)]
pub struct FontDiff {
    pub glyphs: GlyphItems,
    /// Findings per script, most changed first
    pub words: BTreeMap<String, Vec<WordDiff>>,
}

impl FontDiff {
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty() && self.words.is_empty()
    }
}

/// harfrust shaping into tiny-skia coverage bitmaps
#[cfg(all(feature = "shape-hr", feature = "render-skia"))]
pub fn default_pipeline() -> Result<Pipeline> {
    Pipeline::builder()
        .shaper(Arc::new(fontdelta_shape_hr::HarfrustShaper::new()))
        .renderer(Arc::new(fontdelta_render_skia::SkiaRenderer::new()))
        .build()
}

/// Runs glyph and word comparisons with one set of backends and settings
pub struct Differ {
    pipeline: Pipeline,
    chars: Arc<dyn CharacterData>,
    wordlists: Arc<dyn WordlistSource>,
    reporter: Arc<dyn Reporter>,
    config: DiffConfig,
}

impl Differ {
    pub fn builder() -> DifferBuilder {
        DifferBuilder::default()
    }

    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    /// Glyph comparison first; characters only one font has are then kept out
    /// of every word test
    pub fn diff_fonts(&self, before: &FontHandle, after: &FontHandle) -> Result<FontDiff> {
        let glyphs = self.diff_glyphs(before, after)?;
        let skip = glyphs.skip_chars();
        let words = self.detect(before, after, &skip)?;
        Ok(FontDiff { glyphs, words })
    }

    /// Like [`Differ::diff_fonts`], plus a word list of the caller's own
    ///
    /// Its findings land under [`USER_WORDLIST`] when there are any.
    pub fn diff_fonts_with_wordlist(
        &self,
        before: &FontHandle,
        after: &FontHandle,
        wordlist: &Path,
    ) -> Result<FontDiff> {
        let mut diff = self.diff_fonts(before, after)?;
        let entries = wordlist::read_wordlist(USER_WORDLIST, wordlist)?;
        self.reporter.report(report::Diagnostic::TestingWords {
            script: USER_WORDLIST.to_string(),
            count: entries.len(),
        });
        let words = self.test_words(&entries, before, after, &diff.glyphs.skip_chars())?;
        if !words.is_empty() {
            diff.words.insert(USER_WORDLIST.to_string(), words);
        }
        Ok(diff)
    }

    /// Renders `text` with both fonts under identical settings and compares
    pub fn compare_renders(
        &self,
        text: &str,
        script: Option<&str>,
        lang: Option<&str>,
        features: &[String],
        before: &FontHandle,
        after: &FontHandle,
    ) -> Result<PixelDiff> {
        let render = |font: &FontHandle| {
            let entry = WordlistEntry {
                word: text.to_string(),
                script: script.map(str::to_string),
                lang: lang.map(str::to_string),
                features: features.to_vec(),
                tagged: script.is_some() || lang.is_some(),
            };
            let variations = font.variation_settings();
            let shaping = entry.shaping_params(self.config.render_size, variations.clone());
            let rendering = RenderParams {
                padding: self.config.margin,
                variations,
            };
            self.pipeline
                .process(text, font.font.clone(), &shaping, &rendering)
        };

        let img_a = render(before)?;
        let img_b = render(after)?;
        Ok(pixel_diff(&img_a, &img_b))
    }
}

/// Assembles a [`Differ`]; pipeline, character data and word lists are required
#[derive(Default)]
pub struct DifferBuilder {
    pipeline: Option<Pipeline>,
    chars: Option<Arc<dyn CharacterData>>,
    wordlists: Option<Arc<dyn WordlistSource>>,
    reporter: Option<Arc<dyn Reporter>>,
    config: DiffConfig,
}

impl DifferBuilder {
    pub fn pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = Some(pipeline);
        self
    }

    pub fn character_data(mut self, chars: Arc<dyn CharacterData>) -> Self {
        self.chars = Some(chars);
        self
    }

    pub fn wordlists(mut self, wordlists: Arc<dyn WordlistSource>) -> Self {
        self.wordlists = Some(wordlists);
        self
    }

    /// Where diagnostics go; defaults to the `log` facade
    pub fn reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    pub fn config(mut self, config: DiffConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<Differ> {
        self.config.validate()?;
        let missing = |what: &str| DiffError::ConfigError(format!("No {what} configured"));
        Ok(Differ {
            pipeline: self.pipeline.ok_or_else(|| missing("pipeline"))?,
            chars: self.chars.ok_or_else(|| missing("character data"))?,
            wordlists: self.wordlists.ok_or_else(|| missing("word lists"))?,
            reporter: self.reporter.unwrap_or_else(|| Arc::new(LogReporter)),
            config: self.config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_backends() {
        let err = Differ::builder().build().err().unwrap();
        assert!(err.to_string().contains("No pipeline configured"));
    }

    #[test]
    fn test_builder_validates_config() {
        let result = Differ::builder()
            .config(DiffConfig::default().with_dedup_after(0))
            .build();
        assert!(matches!(result, Err(DiffError::ConfigError(_))));
    }

    #[test]
    fn test_empty_font_diff_serializes() {
        let json = serde_json::to_value(FontDiff::default()).unwrap();
        assert_eq!(json["glyphs"]["missing"], serde_json::json!([]));
        assert_eq!(json["words"], serde_json::json!({}));
    }
}
