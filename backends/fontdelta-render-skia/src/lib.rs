//! Skia Renderer - coverage rasterization via tiny-skia
//!
//! Glyph outlines come from skrifa, become kurbo paths and are filled by
//! tiny-skia with anti-aliasing. The output is a single 8-bit coverage
//! channel: regression checks compare ink, not color.

use std::sync::Arc;

use kurbo::Shape;
use skrifa::MetadataProvider;

use fontdelta_core::{
    error::{RenderError, Result},
    traits::{FontRef, Renderer},
    types::{BitmapData, BitmapFormat, ShapingResult},
    RenderParams,
};

/// tiny-skia powered renderer producing coverage bitmaps
pub struct SkiaRenderer {
    /// Maximum canvas dimension to prevent memory exhaustion
    max_size: u32,
}

impl SkiaRenderer {
    pub fn new() -> Self {
        Self { max_size: 65535 }
    }

    /// Converts a single glyph from outline to coverage mask
    ///
    /// Returns `Ok(None)` for glyphs without ink, such as spaces.
    fn render_glyph(
        &self,
        font_ref: &skrifa::FontRef<'_>,
        glyph_id: u32,
        font_size: f32,
        location: &skrifa::instance::Location,
    ) -> Result<Option<GlyphBitmap>> {
        use kurbo::{BezPath, PathEl};
        use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Transform};

        let outlines = font_ref.outline_glyphs();
        let gid = skrifa::GlyphId::new(glyph_id);

        let glyph = outlines
            .get(gid)
            .ok_or(RenderError::GlyphNotFound(glyph_id))?;

        let mut path = BezPath::new();
        let mut pen = PathPen { path: &mut path };

        // Unhinted outlines at the exact size we need
        let size = skrifa::instance::Size::new(font_size);
        let settings = skrifa::outline::DrawSettings::unhinted(size, location.coords());

        glyph
            .draw(settings, &mut pen)
            .map_err(|_| RenderError::OutlineExtractionFailed(glyph_id))?;

        if path.elements().is_empty() {
            return Ok(None);
        }

        let bbox = path.bounding_box();

        // Guard against malformed glyphs that could crash the renderer
        if ![bbox.x0, bbox.y0, bbox.x1, bbox.y1]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(RenderError::PathBuildingFailed.into());
        }
        if bbox.width() == 0.0 || bbox.height() == 0.0 {
            return Ok(None);
        }

        // Snap the box outwards to whole pixels so the mask and its bearings agree
        let left = bbox.x0.floor();
        let top = bbox.y1.ceil();
        let width = ((bbox.x1.ceil() - left) as u32).max(1);
        let height = ((top - bbox.y0.floor()) as u32).max(1);

        log::debug!(
            "Skia: glyph_id={}, bbox=({}, {}, {}, {}), size={}x{}",
            glyph_id,
            bbox.x0,
            bbox.y0,
            bbox.x1,
            bbox.y1,
            width,
            height
        );

        let mut builder = PathBuilder::new();
        for element in path.elements() {
            match *element {
                PathEl::MoveTo(p) => builder.move_to(p.x as f32, p.y as f32),
                PathEl::LineTo(p) => builder.line_to(p.x as f32, p.y as f32),
                PathEl::QuadTo(ctrl, end) => {
                    builder.quad_to(ctrl.x as f32, ctrl.y as f32, end.x as f32, end.y as f32)
                },
                PathEl::CurveTo(c1, c2, end) => builder.cubic_to(
                    c1.x as f32,
                    c1.y as f32,
                    c2.x as f32,
                    c2.y as f32,
                    end.x as f32,
                    end.y as f32,
                ),
                PathEl::ClosePath => builder.close(),
            }
        }

        let skia_path = builder.finish().ok_or(RenderError::PathBuildingFailed)?;

        let mut pixmap = Pixmap::new(width, height)
            .ok_or(RenderError::PixmapCreationFailed { width, height })?;

        let paint = Paint {
            anti_alias: true,
            ..Default::default()
        };

        // Fonts are y-up, bitmaps y-down; shift the snapped box to the origin
        let transform = Transform::from_scale(1.0, -1.0).post_translate(-left as f32, top as f32);

        pixmap.fill_path(&skia_path, &paint, FillRule::Winding, transform, None);

        // Only alpha matters for coverage
        let mask = pixmap.data().chunks_exact(4).map(|px| px[3]).collect();

        Ok(Some(GlyphBitmap {
            width,
            height,
            mask,
            bearing_x: left as i32,
            bearing_y: top as i32,
        }))
    }
}

impl Default for SkiaRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Build variation location from params
fn build_location(
    font_ref: &skrifa::FontRef<'_>,
    variations: &[(String, f32)],
) -> skrifa::instance::Location {
    if variations.is_empty() {
        return skrifa::instance::Location::default();
    }

    let settings: Vec<(&str, f32)> = variations
        .iter()
        .map(|(tag, value)| (tag.as_str(), *value))
        .collect();

    font_ref.axes().location(settings)
}

impl Renderer for SkiaRenderer {
    fn name(&self) -> &'static str {
        "skia"
    }

    fn render(
        &self,
        shaped: &ShapingResult,
        font: Arc<dyn FontRef>,
        params: &RenderParams,
    ) -> Result<BitmapData> {
        let padding = params.padding as f32;
        let glyph_size = shaped.advance_height;

        // Phase 1: rasterize every glyph to learn the vertical extent
        let mut rendered_glyphs: Vec<RenderedGlyph> = Vec::new();
        let mut min_y: f32 = 0.0; // Relative to baseline
        let mut max_y: f32 = 0.0;

        if !shaped.glyphs.is_empty() {
            let font_ref = skrifa::FontRef::from_index(font.data(), font.face_index())
                .map_err(|_| RenderError::InvalidFont)?;
            let location = build_location(&font_ref, &params.variations);

            for glyph in &shaped.glyphs {
                let Some(bitmap) =
                    self.render_glyph(&font_ref, glyph.id, glyph_size, &location)?
                else {
                    continue;
                };
                let glyph_top = glyph.y + bitmap.bearing_y as f32;
                let glyph_bottom = glyph_top - bitmap.height as f32;
                max_y = max_y.max(glyph_top);
                min_y = min_y.min(glyph_bottom);

                rendered_glyphs.push(RenderedGlyph {
                    bitmap,
                    glyph_x: glyph.x,
                    glyph_y: glyph.y,
                });
            }
        }

        // Phase 2: canvas spans the advance horizontally and the ink vertically
        let width = (shaped.advance_width.max(0.0) + padding * 2.0).ceil() as u32;
        let height = ((max_y - min_y) + padding * 2.0).ceil() as u32;

        if width > self.max_size || height > self.max_size {
            return Err(RenderError::InvalidDimensions { width, height }.into());
        }

        let mut canvas = vec![0u8; width as usize * height as usize];
        let baseline_y = padding + max_y;

        // Phase 3: composite coverage, saturating where glyphs overlap
        for rg in rendered_glyphs {
            let bitmap = &rg.bitmap;
            let x = (rg.glyph_x + padding).round() as i32 + bitmap.bearing_x;
            let y = (baseline_y - rg.glyph_y).round() as i32 - bitmap.bearing_y;

            for gy in 0..bitmap.height {
                let canvas_y = y + gy as i32;
                if canvas_y < 0 || canvas_y >= height as i32 {
                    continue;
                }
                for gx in 0..bitmap.width {
                    let canvas_x = x + gx as i32;
                    if canvas_x < 0 || canvas_x >= width as i32 {
                        continue;
                    }
                    let coverage = bitmap.mask[(gy * bitmap.width + gx) as usize];
                    if coverage == 0 {
                        continue;
                    }
                    let idx = canvas_y as usize * width as usize + canvas_x as usize;
                    canvas[idx] = canvas[idx].saturating_add(coverage);
                }
            }
        }

        Ok(BitmapData {
            width,
            height,
            format: BitmapFormat::Gray8,
            data: canvas,
        })
    }
}

/// A rendered glyph ready for compositing
struct RenderedGlyph {
    bitmap: GlyphBitmap,
    glyph_x: f32,
    glyph_y: f32,
}

/// A glyph coverage mask with everything needed for positioning
struct GlyphBitmap {
    width: u32,
    height: u32,
    mask: Vec<u8>,
    bearing_x: i32, // Horizontal offset from origin to left edge
    bearing_y: i32, // Vertical offset from baseline to top edge
}

/// Bridge between skrifa's outline commands and kurbo's path format
struct PathPen<'a> {
    path: &'a mut kurbo::BezPath,
}

impl skrifa::outline::OutlinePen for PathPen<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        self.path.move_to((x as f64, y as f64));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.path.line_to((x as f64, y as f64));
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.path.quad_to((cx0 as f64, cy0 as f64), (x as f64, y as f64));
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.path.curve_to(
            (cx0 as f64, cy0 as f64),
            (cx1 as f64, cy1 as f64),
            (x as f64, y as f64),
        );
    }

    fn close(&mut self) {
        self.path.close_path();
    }
}
