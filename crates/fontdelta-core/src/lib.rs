//! Fontdelta Core: the vocabulary every regression check speaks
//!
//! Two versions of a font go in, a list of differences comes out. This crate
//! holds the pieces that every other fontdelta crate agrees on:
//!
//! 1. **Fonts** - [`traits::FontRef`] and the [`FontHandle`] that pins variation coordinates
//! 2. **Shaping** - the [`Shaper`] contract that turns text into positioned glyphs
//! 3. **Rendering** - the [`Renderer`] contract that turns glyphs into pixels
//! 4. **Comparison** - [`pixel_diff()`], the metric that says how far two renders drift apart
//!
//! ## Build Your First Pipeline
//!
//! ```rust,no_run
//! use fontdelta_core::{Pipeline, RenderParams, ShapingParams};
//! use std::sync::Arc;
//!
//! # use fontdelta_core::traits::*;
//! # struct MyShaper;
//! # impl Shaper for MyShaper {
//! #     fn name(&self) -> &'static str { "test" }
//! #     fn shape(&self, _: &str, _: Arc<dyn FontRef>, _: &ShapingParams)
//! #         -> fontdelta_core::Result<fontdelta_core::types::ShapingResult> { unimplemented!() }
//! # }
//! # struct MyRenderer;
//! # impl Renderer for MyRenderer {
//! #     fn name(&self) -> &'static str { "test" }
//! #     fn render(&self, _: &fontdelta_core::types::ShapingResult, _: Arc<dyn FontRef>, _: &RenderParams)
//! #         -> fontdelta_core::Result<fontdelta_core::types::BitmapData> { unimplemented!() }
//! # }
//! # fn load_font() -> Arc<dyn FontRef> { unimplemented!() }
//!
//! let pipeline = Pipeline::builder()
//!     .shaper(Arc::new(MyShaper))
//!     .renderer(Arc::new(MyRenderer))
//!     .build()?;
//!
//! let before = pipeline.process("Hamburgefonstiv", load_font(), &ShapingParams::default(), &RenderParams::default())?;
//! let after = pipeline.process("Hamburgefonstiv", load_font(), &ShapingParams::default(), &RenderParams::default())?;
//! let diff = fontdelta_core::pixel_diff(&before, &after);
//! println!("changed: {}", diff.score);
//! # Ok::<(), fontdelta_core::DiffError>(())
//! ```
//!
//! Data flows through the types in [`types`]; diagnostics flow through a
//! [`report::Reporter`] handed to each component.

use std::collections::BTreeMap;
use std::sync::Arc;

pub mod config;
pub mod error;
pub mod pipeline;
pub mod pixel_diff;
pub mod report;
pub mod traits;

pub use config::{DiffConfig, HashMode};
pub use error::{DiffError, Result};
pub use pipeline::{Pipeline, PipelineBuilder};
pub use pixel_diff::{pixel_diff, PixelDiff};
pub use report::{Diagnostic, LogReporter, MemoryReporter, Reporter};
pub use traits::{CharacterData, FontRef, Renderer, Shaper};

/// The data structures that move between shaping, rendering and comparison
pub mod types {
    /// Unique identifier for a glyph within a font
    pub type GlyphId = u32;

    /// Which way the text flows
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Direction {
        LeftToRight,
        RightToLeft,
        TopToBottom,
        BottomToTop,
    }

    /// A glyph that knows exactly where it belongs
    #[derive(Debug, Clone, PartialEq)]
    pub struct PositionedGlyph {
        pub id: GlyphId,
        pub x: f32,
        pub y: f32,
        pub advance: f32,
        pub cluster: u32,
    }

    /// What emerges after shaping: glyphs positioned and ready to render
    #[derive(Debug, Clone)]
    pub struct ShapingResult {
        pub glyphs: Vec<PositionedGlyph>,
        pub advance_width: f32,
        pub advance_height: f32,
        pub direction: Direction,
    }

    impl ShapingResult {
        /// A result with no glyphs, sized for the requested em
        pub fn empty(size: f32, direction: Direction) -> Self {
            Self {
                glyphs: Vec::new(),
                advance_width: 0.0,
                advance_height: size,
                direction,
            }
        }
    }

    /// Raw pixel data from rasterized text
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct BitmapData {
        pub width: u32,
        pub height: u32,
        pub format: BitmapFormat,
        pub data: Vec<u8>,
    }

    /// How pixels are arranged in the bitmap
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum BitmapFormat {
        /// Four 8-bit channels per pixel
        Rgba8,
        /// One 8-bit coverage value per pixel
        Gray8,
    }

    impl BitmapFormat {
        pub const fn channels(self) -> usize {
            match self {
                BitmapFormat::Rgba8 => 4,
                BitmapFormat::Gray8 => 1,
            }
        }
    }

    /// One pixel as stored in its bitmap
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Pixel {
        Gray(u8),
        Rgba([u8; 4]),
    }

    impl Pixel {
        /// The pixel seen as RGBA; gray values become opaque gray
        pub fn to_rgba(self) -> [u8; 4] {
            match self {
                Pixel::Gray(v) => [v, v, v, 255],
                Pixel::Rgba(px) => px,
            }
        }
    }

    impl BitmapData {
        /// A zero-area bitmap
        pub fn empty(format: BitmapFormat) -> Self {
            Self {
                width: 0,
                height: 0,
                format,
                data: Vec::new(),
            }
        }

        /// Reads the pixel at `(x, y)`, `None` outside the bitmap or past the data
        pub fn pixel(&self, x: u32, y: u32) -> Option<Pixel> {
            if x >= self.width || y >= self.height {
                return None;
            }
            let channels = self.format.channels();
            let idx = (y as usize * self.width as usize + x as usize) * channels;
            let px = self.data.get(idx..idx + channels)?;
            Some(match self.format {
                BitmapFormat::Gray8 => Pixel::Gray(px[0]),
                BitmapFormat::Rgba8 => Pixel::Rgba([px[0], px[1], px[2], px[3]]),
            })
        }
    }
}

/// How shaping should behave
#[derive(Debug, Clone)]
pub struct ShapingParams {
    /// Pixels per em; pass the font's units per em to get advances in font units
    pub size: f32,
    /// `None` lets the shaper guess from the text
    pub direction: Option<types::Direction>,
    pub language: Option<String>,
    pub script: Option<String>,
    pub features: Vec<(String, u32)>,
    pub variations: Vec<(String, f32)>,
}

impl Default for ShapingParams {
    fn default() -> Self {
        Self {
            size: 16.0,
            direction: None,
            language: None,
            script: None,
            features: Vec::new(),
            variations: Vec::new(),
        }
    }
}

/// How rendering should look
#[derive(Debug, Clone, Default)]
pub struct RenderParams {
    /// Empty pixels added around the ink on every side
    pub padding: u32,
    /// Variable font variations like [("wght", 700.0), ("wdth", 100.0)]
    pub variations: Vec<(String, f32)>,
}

/// A font plus the instance it should be compared at
///
/// Static fonts leave `variations` as `None`; variable font instances carry
/// their axis coordinates here so shaping and rendering agree on them.
#[derive(Clone)]
pub struct FontHandle {
    pub font: Arc<dyn FontRef>,
    pub variations: Option<BTreeMap<String, f32>>,
}

impl FontHandle {
    pub fn new(font: Arc<dyn FontRef>) -> Self {
        Self {
            font,
            variations: None,
        }
    }

    /// Pins the handle to a variable font instance
    pub fn with_variations(mut self, coordinates: BTreeMap<String, f32>) -> Self {
        self.variations = if coordinates.is_empty() {
            None
        } else {
            Some(coordinates)
        };
        self
    }

    /// Axis settings in the shape backends expect
    pub fn variation_settings(&self) -> Vec<(String, f32)> {
        self.variations
            .iter()
            .flatten()
            .map(|(tag, value)| (tag.clone(), *value))
            .collect()
    }
}

impl std::fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontHandle")
            .field("units_per_em", &self.font.units_per_em())
            .field("variations", &self.variations)
            .finish()
    }
}
