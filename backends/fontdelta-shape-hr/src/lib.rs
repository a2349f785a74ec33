//! Pure Rust text shaping backend using harfrust
//!
//! Harfrust is a pure Rust port of HarfBuzz, providing text shaping without
//! any C dependencies. Word lists name OpenType script and language tags
//! (`dev2`, `FRA`); this backend maps them onto what harfrust expects and
//! lets harfrust guess whatever the caller leaves out.

use std::str::FromStr;
use std::sync::Arc;

use harfrust::{
    Direction as HrDirection, Feature, FontRef as HrFontRef, GlyphBuffer, Language, Script,
    ShaperData, ShaperInstance, Tag, UnicodeBuffer, Variation,
};

use fontdelta_core::{
    error::{Result, ShapingError},
    traits::{FontRef, Shaper},
    types::{Direction, PositionedGlyph, ShapingResult},
    ShapingParams,
};

/// Pure Rust text shaping powered by harfrust
#[derive(Debug, Default, Clone, Copy)]
pub struct HarfrustShaper;

impl HarfrustShaper {
    /// Creates a new harfrust shaper ready to handle any script
    pub fn new() -> Self {
        Self
    }

    /// Translates our direction enum to harfrust's format
    fn to_hr_direction(dir: Direction) -> HrDirection {
        match dir {
            Direction::LeftToRight => HrDirection::LeftToRight,
            Direction::RightToLeft => HrDirection::RightToLeft,
            Direction::TopToBottom => HrDirection::TopToBottom,
            Direction::BottomToTop => HrDirection::BottomToTop,
        }
    }

    fn from_hr_direction(dir: HrDirection) -> Direction {
        match dir {
            HrDirection::RightToLeft => Direction::RightToLeft,
            HrDirection::TopToBottom => Direction::TopToBottom,
            HrDirection::BottomToTop => Direction::BottomToTop,
            _ => Direction::LeftToRight,
        }
    }

    /// Parse a 4-character tag string into a harfrust Tag
    fn parse_tag(tag_str: &str) -> Option<Tag> {
        if tag_str.len() == 4 {
            let bytes = tag_str.as_bytes();
            Some(Tag::new(&[bytes[0], bytes[1], bytes[2], bytes[3]]))
        } else {
            None
        }
    }

    /// Resolve an OpenType script tag (`latn`, `dev2`) to a Unicode script
    ///
    /// The second-generation Indic tags share their script with the first
    /// generation; `DFLT` and unknown tags resolve to nothing so the buffer
    /// guesses instead.
    pub fn script_from_tag(tag: &str) -> Option<Script> {
        let iso = match tag {
            "bng2" => "Beng",
            "dev2" => "Deva",
            "gjr2" => "Gujr",
            "gur2" => "Guru",
            "knd2" => "Knda",
            "mlm2" => "Mlym",
            "ory2" => "Orya",
            "tml2" => "Taml",
            "tel2" => "Telu",
            "mym2" => "Mymr",
            "DFLT" | "dflt" => return None,
            other => other,
        };
        let mut title = String::with_capacity(4);
        for (i, ch) in iso.chars().enumerate() {
            if i == 0 {
                title.push(ch.to_ascii_uppercase());
            } else {
                title.push(ch.to_ascii_lowercase());
            }
        }
        Self::parse_tag(&title).and_then(Script::from_iso15924_tag)
    }

    /// Basic cmap-and-advance shaping for fonts that carry no data
    fn fallback_shape(
        &self,
        text: &str,
        font: Arc<dyn FontRef>,
        params: &ShapingParams,
    ) -> ShapingResult {
        let mut glyphs = Vec::new();
        let mut x_offset = 0.0;
        let scale = params.size / font.units_per_em().max(1) as f32;

        for (cluster, ch) in text.char_indices() {
            if let Some(glyph_id) = font.glyph_id(ch) {
                let advance = font.advance_width(glyph_id) * scale;
                glyphs.push(PositionedGlyph {
                    id: glyph_id,
                    x: x_offset,
                    y: 0.0,
                    advance,
                    cluster: cluster as u32,
                });
                x_offset += advance;
            }
        }

        ShapingResult {
            glyphs,
            advance_width: x_offset,
            advance_height: params.size,
            direction: params.direction.unwrap_or(Direction::LeftToRight),
        }
    }

    /// Extract positioned glyphs from harfrust's GlyphBuffer
    fn extract_glyphs(buffer: &GlyphBuffer, ppem: f32, upem: u16) -> (Vec<PositionedGlyph>, f32) {
        let mut glyphs = Vec::new();
        let mut x_offset = 0.0;
        let scale = ppem / upem.max(1) as f32;

        let positions = buffer.glyph_positions();
        let infos = buffer.glyph_infos();

        for (info, pos) in infos.iter().zip(positions.iter()) {
            glyphs.push(PositionedGlyph {
                id: info.glyph_id,
                x: x_offset + (pos.x_offset as f32 * scale),
                y: pos.y_offset as f32 * scale,
                advance: pos.x_advance as f32 * scale,
                cluster: info.cluster,
            });

            x_offset += pos.x_advance as f32 * scale;
        }

        (glyphs, x_offset)
    }
}

impl Shaper for HarfrustShaper {
    fn name(&self) -> &'static str {
        "harfrust"
    }

    fn shape(
        &self,
        text: &str,
        font: Arc<dyn FontRef>,
        params: &ShapingParams,
    ) -> Result<ShapingResult> {
        if text.is_empty() {
            return Ok(ShapingResult::empty(
                params.size,
                params.direction.unwrap_or(Direction::LeftToRight),
            ));
        }

        let font_data = font.data();
        if font_data.is_empty() {
            // No font data? Fall back to basic shaping
            return Ok(self.fallback_shape(text, font, params));
        }

        let hr_font = HrFontRef::from_index(font_data, font.face_index())
            .map_err(|_| ShapingError::InvalidFont)?;

        // Create ShaperData - this caches font tables and is expensive
        let shaper_data = ShaperData::new(&hr_font);

        let instance = if !params.variations.is_empty() {
            let variations: Vec<Variation> = params
                .variations
                .iter()
                .filter_map(|(tag_str, value)| {
                    Self::parse_tag(tag_str).map(|tag| Variation { tag, value: *value })
                })
                .collect();
            Some(ShaperInstance::from_variations(&hr_font, variations))
        } else {
            None
        };

        let mut builder = shaper_data.shaper(&hr_font);
        if let Some(ref inst) = instance {
            builder = builder.instance(Some(inst));
        }
        builder = builder.point_size(Some(params.size));
        let shaper = builder.build();

        let mut buffer = UnicodeBuffer::new();
        buffer.push_str(text);
        if let Some(direction) = params.direction {
            buffer.set_direction(Self::to_hr_direction(direction));
        }

        if let Some(ref lang) = params.language {
            match Language::from_str(lang) {
                Ok(language) => buffer.set_language(language),
                Err(_) => log::debug!("Ignoring unparseable language '{}'", lang),
            }
        }

        if let Some(ref script_str) = params.script {
            match Self::script_from_tag(script_str) {
                Some(script) => buffer.set_script(script),
                None => log::debug!("Script tag '{}' left for harfrust to guess", script_str),
            }
        }

        // Fills in whatever was not set explicitly
        buffer.guess_segment_properties();
        let direction = Self::from_hr_direction(buffer.direction());

        let features: Vec<Feature> = params
            .features
            .iter()
            .filter_map(|(name, value)| {
                Self::parse_tag(name).map(|tag| Feature {
                    tag,
                    value: *value,
                    start: 0,
                    end: u32::MAX,
                })
            })
            .collect();

        let output = shaper.shape(buffer, &features);

        let upem = font.units_per_em();
        let (glyphs, advance_width) = Self::extract_glyphs(&output, params.size, upem);

        Ok(ShapingResult {
            glyphs,
            advance_width,
            advance_height: params.size,
            direction,
        })
    }
}
