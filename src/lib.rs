//! MultiTables rendering engine
//!
//! Turns a composition of nested, resizable grid elements (lists → rows →
//! sections) into a single raster image. Each section holds text, an image,
//! or nothing.
//!
//! # Pipeline
//!
//! - **Geometry**: [`rendering::layout::resolve`] converts the tree into pixel
//!   rectangles at a scale factor (pixels per logical unit)
//! - **Display list**: [`rendering::paint::build_display_list`] orders
//!   backgrounds, content and border strokes
//! - **Raster**: [`rendering::raster::rasterize`] paints the list into a [`Bitmap`]
//!
//! Every step is a pure function of the composition snapshot; rendering the
//! same snapshot twice yields byte-identical bitmaps.
//!
//! # Example
//!
//! ```no_run
//! use multitables::model::Composition;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut composition = Composition::new();
//! composition.add_list();
//! let bitmap = multitables::render(&composition, 10.0)?;
//! std::fs::write("table.png", bitmap.to_png()?)?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub use error::{Error, LayoutError, Result};

pub mod document;
pub mod model;
pub mod preview;
pub mod rendering;

pub use rendering::Bitmap;

use log::debug;

use model::Composition;
use rendering::layout::{resolve, LayoutTree};
use rendering::paint::build_display_list;
use rendering::raster::rasterize;
use rendering::text::{text_renderer, GlyphBackend, TextRenderer};

/// Logical font sizes are divided by this before scaling, so the default
/// size 14 renders at 35px on the default scale of 10.
pub const FONT_CALIBRATION: f32 = 4.0;

/// Border stroke thickness per logical unit (2px at scale 10)
pub const BORDER_PER_UNIT: f64 = 0.2;

/// Configuration for a [`Renderer`]
///
/// The defaults match the reference output: 10 pixels per logical unit,
/// black ink on white cells and 2px borders.
///
/// # Examples
///
/// ```
/// let cfg = multitables::RenderConfig::default();
/// assert_eq!(cfg.border_px(cfg.scale), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Pixels per logical unit
    pub scale: f64,
    /// Divisor applied to logical font sizes
    pub font_calibration: f32,
    /// Border thickness per logical unit; strokes are never thinner than 1px
    pub border_per_unit: f64,
    /// Cell background
    pub background: (u8, u8, u8, u8),
    /// Text and border colour
    pub ink: (u8, u8, u8, u8),
    /// Largest canvas side, in pixels, a render may allocate
    pub max_canvas_side: u32,
    /// Glyph source used by [`Renderer::new`]
    pub glyphs: GlyphBackend,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            scale: 10.0,
            font_calibration: FONT_CALIBRATION,
            border_per_unit: BORDER_PER_UNIT,
            background: (255, 255, 255, 255),
            ink: (0, 0, 0, 255),
            max_canvas_side: 16384,
            glyphs: GlyphBackend::default(),
        }
    }
}

impl RenderConfig {
    /// Border stroke thickness in pixels at `scale`.
    pub fn border_px(&self, scale: f64) -> u32 {
        ((self.border_per_unit * scale).round() as u32).max(1)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(Error::ConfigError(format!("scale must be positive, got {}", self.scale)));
        }
        if !self.font_calibration.is_finite() || self.font_calibration <= 0.0 {
            return Err(Error::ConfigError(format!(
                "font calibration must be positive, got {}",
                self.font_calibration
            )));
        }
        if !self.border_per_unit.is_finite() || self.border_per_unit < 0.0 {
            return Err(Error::ConfigError(format!(
                "border thickness must not be negative, got {}",
                self.border_per_unit
            )));
        }
        if self.max_canvas_side == 0 {
            return Err(Error::ConfigError("max canvas side must be non-zero".into()));
        }
        Ok(())
    }
}

/// Renders compositions with a fixed configuration and text backend.
pub struct Renderer {
    config: RenderConfig,
    text: Box<dyn TextRenderer>,
}

impl Renderer {
    /// Create a renderer using the glyph backend named in `config`.
    pub fn new(config: RenderConfig) -> Result<Self> {
        let text = text_renderer(config.glyphs);
        Self::with_text_renderer(config, text)
    }

    pub fn with_text_renderer(config: RenderConfig, text: Box<dyn TextRenderer>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, text })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Resolve geometry only.
    pub fn layout(&self, composition: &Composition) -> Result<LayoutTree> {
        Ok(resolve(composition, self.config.scale)?)
    }

    /// Lay out and paint `composition`.
    pub fn render(&mut self, composition: &Composition) -> Result<Bitmap> {
        let layout = self.layout(composition)?;
        let commands = build_display_list(composition, &layout, &self.config);
        let bitmap = rasterize(
            layout.canvas,
            &commands,
            self.text.as_mut(),
            self.config.background,
            self.config.max_canvas_side,
        )?;
        debug!("rendered {}x{} bitmap", bitmap.width, bitmap.height);
        Ok(bitmap)
    }
}

/// Render `composition` at `scale` pixels per logical unit with default settings.
pub fn render(composition: &Composition, scale: f64) -> Result<Bitmap> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(LayoutError::InvalidScale(scale).into());
    }
    Renderer::new(RenderConfig { scale, ..Default::default() })?.render(composition)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RenderConfig::default();
        assert_eq!(config.scale, 10.0);
        assert_eq!(config.font_calibration, 4.0);
        assert_eq!(config.border_px(config.scale), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn border_never_thinner_than_one_pixel() {
        let config = RenderConfig::default();
        assert_eq!(config.border_px(1.0), 1);
        assert_eq!(config.border_px(30.0), 6);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cfg = RenderConfig { font_calibration: 0.0, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(Error::ConfigError(_))));
        let cfg = RenderConfig { scale: -1.0, ..Default::default() };
        assert!(Renderer::new(cfg).is_err());
    }

    #[test]
    fn render_rejects_bad_scale_before_rendering() {
        let err = render(&Composition::new(), 0.0).unwrap_err();
        assert!(matches!(err, Error::Layout(LayoutError::InvalidScale(_))));
    }
}
