//! Deterministic stand-ins for fonts and backends
//!
//! Fonts carry a one-byte id as their data. The stub renderer draws every
//! glyph as a single pixel whose gray level it looks up by `(font id, gid)`,
//! so tests can change one glyph's "outline" without touching the cmap.

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use fontdelta::{
    report::{MemoryReporter, Reporter},
    DiffConfig, Differ, FontHandle, MemoryWordlists, Pipeline,
};
use fontdelta_core::{
    traits::{CharacterData, FontRef, Renderer, Shaper},
    types::{BitmapData, BitmapFormat, Direction, PositionedGlyph, ShapingResult},
    RenderParams, Result, ShapingParams,
};

pub const DEFAULT_INK: u8 = 128;

pub struct StubFont {
    id: u8,
    cmap: BTreeMap<char, (u32, f32)>,
}

impl StubFont {
    /// Lowercase and uppercase ASCII plus `é`, each 500 units wide
    pub fn latin(id: u8) -> Self {
        let cmap = ('a'..='z')
            .chain('A'..='Z')
            .chain(['é'])
            .enumerate()
            .map(|(i, ch)| (ch, (i as u32 + 1, 500.0)))
            .collect();
        Self { id, cmap }
    }

    pub fn without(mut self, ch: char) -> Self {
        self.cmap.remove(&ch);
        self
    }

    pub fn with_advance(mut self, ch: char, advance: f32) -> Self {
        if let Some(entry) = self.cmap.get_mut(&ch) {
            entry.1 = advance;
        }
        self
    }

    pub fn with_digits(mut self) -> Self {
        let next = self.cmap.len() as u32 + 1;
        for (i, ch) in ('0'..='9').enumerate() {
            self.cmap.insert(ch, (next + i as u32, 500.0));
        }
        self
    }

    pub fn gid(&self, ch: char) -> u32 {
        self.cmap.get(&ch).map_or(0, |(gid, _)| *gid)
    }

    pub fn handle(self) -> FontHandle {
        FontHandle::new(Arc::new(self))
    }
}

impl FontRef for StubFont {
    fn data(&self) -> &[u8] {
        std::slice::from_ref(&self.id)
    }

    fn units_per_em(&self) -> u16 {
        1000
    }

    fn glyph_id(&self, ch: char) -> Option<u32> {
        self.cmap.get(&ch).map(|(gid, _)| *gid)
    }

    fn advance_width(&self, glyph_id: u32) -> f32 {
        self.cmap
            .values()
            .find(|(gid, _)| *gid == glyph_id)
            .map_or(0.0, |(_, advance)| *advance)
    }

    fn codepoints(&self) -> BTreeSet<u32> {
        self.cmap.keys().map(|&ch| ch as u32).collect()
    }
}

/// One glyph per character, `.notdef` for anything unmapped
pub struct StubShaper;

impl Shaper for StubShaper {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn shape(
        &self,
        text: &str,
        font: Arc<dyn FontRef>,
        params: &ShapingParams,
    ) -> Result<ShapingResult> {
        let scale = params.size / f32::from(font.units_per_em());
        let mut x = 0.0;
        let mut glyphs = Vec::new();
        for (cluster, ch) in text.char_indices() {
            let id = font.glyph_id(ch).unwrap_or(0);
            let advance = font.advance_width(id) * scale;
            glyphs.push(PositionedGlyph {
                id,
                x,
                y: 0.0,
                advance,
                cluster: cluster as u32,
            });
            x += advance;
        }
        Ok(ShapingResult {
            glyphs,
            advance_width: x,
            advance_height: params.size,
            direction: params.direction.unwrap_or(Direction::LeftToRight),
        })
    }
}

/// A one-row bitmap, one pixel per glyph
#[derive(Default)]
pub struct StubRenderer {
    ink: HashMap<(u8, u32), u8>,
}

impl StubRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `gid` in font `font_id` draw with a different gray level
    pub fn with_ink(mut self, font_id: u8, gid: u32, value: u8) -> Self {
        self.ink.insert((font_id, gid), value);
        self
    }
}

impl Renderer for StubRenderer {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn render(
        &self,
        shaped: &ShapingResult,
        font: Arc<dyn FontRef>,
        _params: &RenderParams,
    ) -> Result<BitmapData> {
        let id = font.data().first().copied().unwrap_or(0);
        let data: Vec<u8> = shaped
            .glyphs
            .iter()
            .map(|g| {
                // Advances are drawn too, so spacing edits show up as pixels
                let base = *self.ink.get(&(id, g.id)).unwrap_or(&DEFAULT_INK);
                base.wrapping_add((g.advance * 10.0) as u8)
            })
            .collect();
        Ok(BitmapData {
            width: data.len() as u32,
            height: 1,
            format: BitmapFormat::Gray8,
            data,
        })
    }
}

/// ASCII and Latin-1 letters are Latin, digits are Common
pub struct StubCharacters;

impl CharacterData for StubCharacters {
    fn script_name(&self, codepoint: u32) -> Option<String> {
        let ch = char::from_u32(codepoint)?;
        if ch.is_ascii_digit() {
            Some("Common".into())
        } else if ch.is_alphabetic() && (codepoint < 0x250) {
            Some("Latin".into())
        } else {
            None
        }
    }

    fn char_name(&self, ch: char) -> Option<String> {
        match ch {
            'A' => Some("LATIN CAPITAL LETTER A".into()),
            'é' => Some("LATIN SMALL LETTER E WITH ACUTE".into()),
            _ => None,
        }
    }
}

pub fn pipeline(renderer: StubRenderer) -> Pipeline {
    Pipeline::builder()
        .shaper(Arc::new(StubShaper))
        .renderer(Arc::new(renderer))
        .build()
        .unwrap()
}

pub fn make_differ(
    renderer: StubRenderer,
    wordlists: MemoryWordlists,
    config: DiffConfig,
) -> (Differ, Arc<MemoryReporter>) {
    let reporter = Arc::new(MemoryReporter::new());
    let differ = Differ::builder()
        .pipeline(pipeline(renderer))
        .character_data(Arc::new(StubCharacters))
        .wordlists(Arc::new(wordlists))
        .reporter(reporter.clone() as Arc<dyn Reporter>)
        .config(config)
        .build()
        .unwrap();
    (differ, reporter)
}
