//! Where fonts come to life: loading and character maps for fontdelta
//!
//! Fonts store their raw data and create parsers on demand. This avoids
//! self-referential structs and properly supports TTC font collections with
//! multiple faces.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use read_fonts::{FontRef as ReadFontRef, TableProvider};
use skrifa::MetadataProvider;

use fontdelta_core::{
    error::{FontLoadError, Result},
    traits::FontRef as DeltaFontRef,
};

/// A font that's been brought into memory, ready to shape text
///
/// For TTC collections, the `face_index` specifies which face to use.
pub struct Font {
    data: Vec<u8>,
    face_index: u32,
    units_per_em: u16,
}

impl Font {
    /// Opens a font file from disk and makes it usable
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_file_index(path, 0)
    }

    /// Opens a specific face from a font file (for TTC collections)
    pub fn from_file_index(path: impl AsRef<Path>, face_index: u32) -> Result<Self> {
        let data = fs::read(path.as_ref())
            .map_err(|_| FontLoadError::FileNotFound(path.as_ref().display().to_string()))?;

        Self::from_data_index(data, face_index)
    }

    /// Turns raw font bytes into something we can work with
    pub fn from_data(data: Vec<u8>) -> Result<Self> {
        Self::from_data_index(data, 0)
    }

    /// Turns raw font bytes into a specific face (for TTC collections)
    pub fn from_data_index(data: Vec<u8>, face_index: u32) -> Result<Self> {
        // Validate the font data by attempting to parse it
        let font_ref =
            ReadFontRef::from_index(&data, face_index).map_err(|_| FontLoadError::InvalidData)?;

        let units_per_em = font_ref
            .head()
            .map(|head| head.units_per_em())
            .unwrap_or(1000);

        Ok(Font {
            data,
            face_index,
            units_per_em,
        })
    }

    /// Returns the face index for TTC collections (0 for single fonts)
    pub fn face_index(&self) -> u32 {
        self.face_index
    }

    /// Creates a FontRef on-demand for parsing operations
    fn font_ref(&self) -> Option<ReadFontRef<'_>> {
        ReadFontRef::from_index(&self.data, self.face_index).ok()
    }

    /// Finds which glyph draws this character
    pub fn glyph_id(&self, ch: char) -> Option<u32> {
        self.font_ref()
            .and_then(|font| font.charmap().map(ch).map(|gid| gid.to_u32()))
    }

    /// Horizontal advance in font units
    pub fn advance_width(&self, glyph_id: u32) -> f32 {
        self.font_ref()
            .and_then(|font| {
                let hmtx = font.hmtx().ok()?;
                let glyph = read_fonts::types::GlyphId::new(glyph_id);
                hmtx.advance(glyph).map(f32::from)
            })
            .unwrap_or(0.0)
    }

    /// Counts how many different glyphs this font contains
    pub fn glyph_count(&self) -> Option<u32> {
        self.font_ref()
            .and_then(|font| font.maxp().ok().map(|maxp| maxp.num_glyphs() as u32))
    }

    /// Every codepoint in the font's best character map
    ///
    /// skrifa picks the same subtable a shaper would: the full-repertoire
    /// Unicode table when present, the BMP table otherwise.
    pub fn codepoints(&self) -> BTreeSet<u32> {
        self.font_ref()
            .map(|font| {
                font.charmap()
                    .mappings()
                    .map(|(codepoint, _gid)| codepoint)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Variation axes as `(tag, min, default, max)`; empty for static fonts
    pub fn axes(&self) -> Vec<(String, f32, f32, f32)> {
        self.font_ref()
            .map(|font| {
                font.axes()
                    .iter()
                    .map(|axis| {
                        (
                            axis.tag().to_string(),
                            axis.min_value(),
                            axis.default_value(),
                            axis.max_value(),
                        )
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Fit requested coordinates to the axes this font actually has
    ///
    /// Static fonts drop every coordinate. Unknown axes are dropped and values
    /// outside an axis range are clamped, both with a warning.
    pub fn resolve_coordinates(&self, requested: &BTreeMap<String, f32>) -> BTreeMap<String, f32> {
        let axes = self.axes();
        if axes.is_empty() {
            if !requested.is_empty() {
                log::warn!("Font is static but coordinates provided - ignoring");
            }
            return BTreeMap::new();
        }

        let mut resolved = BTreeMap::new();
        for (tag, value) in requested {
            match axes.iter().find(|(axis, ..)| axis == tag) {
                Some((_, min, _default, max)) => {
                    let clamped = value.clamp(*min, *max);
                    if (clamped - value).abs() > 0.001 {
                        log::warn!(
                            "Coordinate for axis '{}' clamped from {} to {} (font bounds: [{}, {}])",
                            tag,
                            value,
                            clamped,
                            min,
                            max
                        );
                    }
                    resolved.insert(tag.clone(), clamped);
                },
                None => log::warn!("Axis '{}' not found in font - ignoring", tag),
            }
        }
        resolved
    }
}

impl DeltaFontRef for Font {
    fn data(&self) -> &[u8] {
        &self.data
    }

    fn face_index(&self) -> u32 {
        self.face_index
    }

    fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    fn glyph_id(&self, ch: char) -> Option<u32> {
        self.glyph_id(ch)
    }

    fn advance_width(&self, glyph_id: u32) -> f32 {
        self.advance_width(glyph_id)
    }

    fn glyph_count(&self) -> Option<u32> {
        self.glyph_count()
    }

    fn codepoints(&self) -> BTreeSet<u32> {
        self.codepoints()
    }
}

/// Parses instance coordinates written as `wght=700,wdth=100`
///
/// Whitespace around entries is ignored; an empty string means no
/// coordinates.
pub fn parse_coordinates(spec: &str) -> Result<BTreeMap<String, f32>> {
    let mut coords = BTreeMap::new();
    for entry in spec.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (tag, value) = entry
            .split_once('=')
            .ok_or_else(|| FontLoadError::InvalidCoordinates(entry.to_string()))?;
        let tag = tag.trim();
        if tag.is_empty() || tag.len() > 4 {
            return Err(FontLoadError::InvalidCoordinates(entry.to_string()).into());
        }
        let value: f32 = value
            .trim()
            .parse()
            .map_err(|_| FontLoadError::InvalidCoordinates(entry.to_string()))?;
        coords.insert(tag.to_string(), value);
    }
    Ok(coords)
}

/// Writes coordinates back in the form [`parse_coordinates`] reads
pub fn format_coordinates(coords: &BTreeMap<String, f32>) -> String {
    coords
        .iter()
        .map(|(tag, value)| format!("{tag}={value}"))
        .collect::<Vec<_>>()
        .join(",")
}
