//! The engine that drives text through shaping and rendering

// this_file: crates/fontdelta-core/src/pipeline.rs

use std::sync::Arc;

use crate::{
    error::{DiffError, Result},
    traits::{FontRef, Renderer, Shaper},
    types::{BitmapData, ShapingResult},
    RenderParams, ShapingParams,
};

/// Pipeline for text rendering: Shape → Render
///
/// Every comparison in fontdelta runs the same text through the same
/// pipeline twice, once per font version, so both sides see identical
/// shaping and rasterization settings.
///
/// ```ignore
/// use fontdelta_core::Pipeline;
///
/// let pipeline = Pipeline::builder()
///     .shaper(Arc::new(HarfrustShaper::new()))
///     .renderer(Arc::new(SkiaRenderer::new()))
///     .build()?;
///
/// let bitmap = pipeline.process("Hello", font, &shaping_params, &render_params)?;
/// ```
#[derive(Clone)]
pub struct Pipeline {
    shaper: Option<Arc<dyn Shaper>>,
    renderer: Option<Arc<dyn Renderer>>,
}

impl Pipeline {
    /// Start building a new pipeline
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Shape text without rendering it
    pub fn shape(
        &self,
        text: &str,
        font: Arc<dyn FontRef>,
        shaping_params: &ShapingParams,
    ) -> Result<ShapingResult> {
        let shaper = self
            .shaper
            .as_ref()
            .ok_or_else(|| DiffError::ConfigError("No shaper configured".into()))?;
        shaper.shape(text, font, shaping_params)
    }

    /// Send text through shaping and rendering and get the pixels
    pub fn process(
        &self,
        text: &str,
        font: Arc<dyn FontRef>,
        shaping_params: &ShapingParams,
        render_params: &RenderParams,
    ) -> Result<BitmapData> {
        let renderer = self
            .renderer
            .as_ref()
            .ok_or_else(|| DiffError::ConfigError("No renderer configured".into()))?;

        // Shape → Render
        let shaped = self.shape(text, font.clone(), shaping_params)?;
        log::trace!(
            "{} shaped {:?} into {} glyphs",
            self.shaper_name(),
            text,
            shaped.glyphs.len()
        );
        renderer.render(&shaped, font, render_params)
    }

    /// Name of the configured shaper, for diagnostics
    pub fn shaper_name(&self) -> &'static str {
        self.shaper.as_ref().map_or("none", |s| s.name())
    }
}

/// Build pipelines your way, piece by piece
pub struct PipelineBuilder {
    shaper: Option<Arc<dyn Shaper>>,
    renderer: Option<Arc<dyn Renderer>>,
}

impl PipelineBuilder {
    /// Start with a clean slate
    pub fn new() -> Self {
        Self {
            shaper: None,
            renderer: None,
        }
    }

    /// Choose who turns characters into glyphs
    pub fn shaper(mut self, shaper: Arc<dyn Shaper>) -> Self {
        self.shaper = Some(shaper);
        self
    }

    /// Choose who turns glyphs into pixels
    pub fn renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Create the pipeline, ready to run
    pub fn build(self) -> Result<Pipeline> {
        Ok(Pipeline {
            shaper: self.shaper,
            renderer: self.renderer,
        })
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BitmapFormat, Direction, PositionedGlyph};

    struct MockShaper;
    impl Shaper for MockShaper {
        fn name(&self) -> &'static str {
            "MockShaper"
        }
        fn shape(
            &self,
            text: &str,
            _font: Arc<dyn FontRef>,
            params: &ShapingParams,
        ) -> Result<ShapingResult> {
            Ok(ShapingResult {
                glyphs: text
                    .chars()
                    .enumerate()
                    .map(|(i, c)| PositionedGlyph {
                        id: c as u32,
                        x: i as f32 * 10.0,
                        y: 0.0,
                        advance: 10.0,
                        cluster: i as u32,
                    })
                    .collect(),
                advance_width: text.len() as f32 * 10.0,
                advance_height: params.size,
                direction: Direction::LeftToRight,
            })
        }
    }

    struct MockRenderer;
    impl Renderer for MockRenderer {
        fn name(&self) -> &'static str {
            "MockRenderer"
        }
        fn render(
            &self,
            shaped: &ShapingResult,
            _font: Arc<dyn FontRef>,
            _params: &RenderParams,
        ) -> Result<BitmapData> {
            let width = shaped.advance_width as u32 + 1;
            let height = shaped.advance_height as u32 + 1;
            Ok(BitmapData {
                width,
                height,
                format: BitmapFormat::Gray8,
                data: vec![0u8; (width * height) as usize],
            })
        }
    }

    struct MockFont;
    impl FontRef for MockFont {
        fn data(&self) -> &[u8] {
            &[]
        }
        fn units_per_em(&self) -> u16 {
            1000
        }
        fn glyph_id(&self, ch: char) -> Option<u32> {
            Some(ch as u32)
        }
        fn advance_width(&self, _glyph_id: u32) -> f32 {
            500.0
        }
    }

    #[test]
    fn test_pipeline_builder() {
        let pipeline = Pipeline::builder()
            .shaper(Arc::new(MockShaper))
            .renderer(Arc::new(MockRenderer))
            .build();

        assert!(pipeline.is_ok());
    }

    #[test]
    fn test_pipeline_process() {
        let pipeline = match Pipeline::builder()
            .shaper(Arc::new(MockShaper))
            .renderer(Arc::new(MockRenderer))
            .build()
        {
            Ok(pipeline) => pipeline,
            Err(e) => unreachable!("pipeline build failed: {e}"),
        };

        let params = ShapingParams {
            size: 3.0,
            ..Default::default()
        };
        let result = pipeline.process(
            "Hello",
            Arc::new(MockFont),
            &params,
            &RenderParams::default(),
        );
        match result {
            Ok(bitmap) => {
                assert_eq!(bitmap.width, 51);
                assert_eq!(bitmap.height, 4);
            },
            Err(e) => unreachable!("pipeline process failed: {e}"),
        }
    }

    #[test]
    fn test_pipeline_missing_shaper() {
        let pipeline = match Pipeline::builder().renderer(Arc::new(MockRenderer)).build() {
            Ok(pipeline) => pipeline,
            Err(e) => unreachable!("pipeline build failed: {e}"),
        };

        let result = pipeline.process(
            "Hello",
            Arc::new(MockFont),
            &ShapingParams::default(),
            &RenderParams::default(),
        );
        assert!(matches!(result, Err(DiffError::ConfigError(_))));
        assert_eq!(pipeline.shaper_name(), "none");
    }

    #[test]
    fn test_pipeline_missing_renderer() {
        let pipeline = match Pipeline::builder().shaper(Arc::new(MockShaper)).build() {
            Ok(pipeline) => pipeline,
            Err(e) => unreachable!("pipeline build failed: {e}"),
        };

        // Shaping alone still works
        let shaped = pipeline.shape("Hi", Arc::new(MockFont), &ShapingParams::default());
        assert!(shaped.is_ok());

        let result = pipeline.process(
            "Hello",
            Arc::new(MockFont),
            &ShapingParams::default(),
            &RenderParams::default(),
        );
        assert!(result.is_err());
    }
}
