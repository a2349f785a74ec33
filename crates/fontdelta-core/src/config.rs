//! Knobs for a comparison run
//!
//! The defaults are the values fontdelta ships with: a 3px render is small
//! enough to compare tens of thousands of words quickly and still large
//! enough to catch outline and spacing changes.
//!
//! # Example
//!
//! ```
//! use fontdelta_core::{DiffConfig, HashMode};
//!
//! let config = DiffConfig::default()
//!     .with_hash_mode(HashMode::GlyphId)
//!     .with_word_threshold(1e-5);
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{DiffError, Result};

/// Threshold both word and glyph checks start from
pub const DEFAULT_THRESHOLD: f64 = 0.000_002;

/// How much of each shaped glyph counts towards its identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HashMode {
    /// Glyph id and advance: catches spacing and kerning changes
    #[default]
    GidPosition,
    /// Glyph id only: catches substitution changes
    GlyphId,
}

impl std::str::FromStr for HashMode {
    type Err = DiffError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "gid-pos" | "gid-position" | "position" => Ok(HashMode::GidPosition),
            "gid" | "glyph-id" => Ok(HashMode::GlyphId),
            other => Err(DiffError::ConfigError(format!(
                "Unknown hash mode '{other}', expected gid-pos or gid"
            ))),
        }
    }
}

/// Settings shared by the glyph and word checks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Pixels per em used for every comparison render
    pub render_size: f32,
    /// Empty border around each render
    pub margin: u32,
    /// A glyph is modified when its score is strictly above this
    pub glyph_threshold: f64,
    /// A word is reported when its score reaches this
    pub word_threshold: f64,
    /// Scripts with fewer codepoints in the font are not tested
    pub min_script_codepoints: usize,
    /// Glyph identity used for signatures and dedup
    pub hash_mode: HashMode,
    /// Times a glyph identity must be seen changed before words made only of
    /// seen identities are skipped
    pub dedup_after: u32,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            render_size: 3.0,
            margin: 0,
            glyph_threshold: DEFAULT_THRESHOLD,
            word_threshold: DEFAULT_THRESHOLD,
            min_script_codepoints: 10,
            hash_mode: HashMode::GidPosition,
            dedup_after: 1,
        }
    }
}

impl DiffConfig {
    pub fn with_render_size(mut self, size: f32) -> Self {
        self.render_size = size;
        self
    }

    pub fn with_glyph_threshold(mut self, threshold: f64) -> Self {
        self.glyph_threshold = threshold;
        self
    }

    pub fn with_word_threshold(mut self, threshold: f64) -> Self {
        self.word_threshold = threshold;
        self
    }

    pub fn with_min_script_codepoints(mut self, count: usize) -> Self {
        self.min_script_codepoints = count;
        self
    }

    pub fn with_hash_mode(mut self, mode: HashMode) -> Self {
        self.hash_mode = mode;
        self
    }

    pub fn with_dedup_after(mut self, count: u32) -> Self {
        self.dedup_after = count;
        self
    }

    /// Reject settings no comparison could run with
    pub fn validate(&self) -> Result<()> {
        if !(self.render_size.is_finite() && self.render_size > 0.0) {
            return Err(DiffError::ConfigError(format!(
                "render_size must be positive, got {}",
                self.render_size
            )));
        }
        for (name, value) in [
            ("glyph_threshold", self.glyph_threshold),
            ("word_threshold", self.word_threshold),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(DiffError::ConfigError(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if self.dedup_after == 0 {
            return Err(DiffError::ConfigError(
                "dedup_after must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
