//! Text measurement and glyph coverage.
//!
//! A [`TextRenderer`] lays out a string wrapped to a maximum width and returns
//! a [`TextBlock`]: its pixel size plus the ink coverage relative to the
//! block's top-left corner. The rasterizer positions and blends the block.

use crate::Result;

/// Line height as a multiple of the pixel font size
pub const LINE_HEIGHT_FACTOR: f32 = 1.2;

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub family: String,
    pub size_px: f32,
}

/// A run of ink pixels with uniform coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InkSpan {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub alpha: u8,
}

/// Laid-out text ready to be painted at an origin.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextBlock {
    pub width: u32,
    pub height: u32,
    pub spans: Vec<InkSpan>,
}

impl TextBlock {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

pub trait TextRenderer {
    fn layout(&mut self, text: &str, style: &TextStyle, max_width: u32) -> Result<TextBlock>;
}

/// Which glyph source a renderer should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GlyphBackend {
    /// System fonts through cosmic-text
    #[default]
    Cosmic,
    /// Solid boxes with fixed metrics, independent of installed fonts
    Block,
}

pub fn text_renderer(backend: GlyphBackend) -> Box<dyn TextRenderer> {
    match backend {
        #[cfg(feature = "cosmic")]
        GlyphBackend::Cosmic => Box::new(cosmic::CosmicTextRenderer::new()),
        #[cfg(not(feature = "cosmic"))]
        GlyphBackend::Cosmic => {
            log::warn!("built without the `cosmic` feature; using block glyphs");
            Box::new(BlockTextRenderer)
        }
        GlyphBackend::Block => Box::new(BlockTextRenderer),
    }
}

/// Deterministic renderer drawing every glyph as a filled box.
///
/// Advance is 0.6 × the pixel size and lines are [`LINE_HEIGHT_FACTOR`] ×
/// the pixel size. Words wrap greedily; a word longer than a line is split.
/// Lines are centered within the widest line.
#[derive(Debug, Default, Clone, Copy)]
pub struct BlockTextRenderer;

impl BlockTextRenderer {
    fn metrics(size_px: f32) -> (u32, u32) {
        let advance = (size_px * 0.6).round().max(1.0) as u32;
        let line = (size_px * LINE_HEIGHT_FACTOR).round().max(1.0) as u32;
        (advance, line)
    }

    fn wrap(text: &str, per_line: usize) -> Vec<String> {
        let mut lines = Vec::new();
        for paragraph in text.lines() {
            let mut cur = String::new();
            for word in paragraph.split_whitespace() {
                let mut word: Vec<char> = word.chars().collect();
                while word.len() > per_line {
                    if !cur.is_empty() {
                        lines.push(std::mem::take(&mut cur));
                    }
                    lines.push(word.drain(..per_line).collect());
                }
                if word.is_empty() {
                    continue;
                }
                let needed = if cur.is_empty() {
                    word.len()
                } else {
                    cur.chars().count() + 1 + word.len()
                };
                if needed > per_line {
                    lines.push(std::mem::take(&mut cur));
                }
                if !cur.is_empty() {
                    cur.push(' ');
                }
                cur.extend(word);
            }
            lines.push(cur);
        }
        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        lines
    }
}

impl TextRenderer for BlockTextRenderer {
    fn layout(&mut self, text: &str, style: &TextStyle, max_width: u32) -> Result<TextBlock> {
        let (advance, line_height) = Self::metrics(style.size_px);
        let per_line = (max_width / advance).max(1) as usize;
        let lines = Self::wrap(text, per_line);
        if lines.is_empty() {
            return Ok(TextBlock::default());
        }

        let inset_x = advance / 6;
        let inset_y = line_height / 6;
        let glyph_w = advance.saturating_sub(2 * inset_x).max(1);
        let glyph_h = line_height.saturating_sub(2 * inset_y).max(1);

        let line_widths: Vec<u32> =
            lines.iter().map(|l| l.chars().count() as u32 * advance).collect();
        let width = line_widths.iter().copied().max().unwrap_or(0);

        let mut spans = Vec::new();
        for (row, (line, line_width)) in lines.iter().zip(&line_widths).enumerate() {
            let top = row as u32 * line_height + inset_y;
            // each line is centered within the widest one
            let offset = (width - line_width) / 2;
            for (col, ch) in line.chars().enumerate() {
                if ch.is_whitespace() {
                    continue;
                }
                spans.push(InkSpan {
                    x: (offset + col as u32 * advance + inset_x) as i32,
                    y: top as i32,
                    width: glyph_w,
                    height: glyph_h,
                    alpha: u8::MAX,
                });
            }
        }

        Ok(TextBlock { width, height: lines.len() as u32 * line_height, spans })
    }
}

#[cfg(feature = "cosmic")]
pub mod cosmic {
    //! System-font text through cosmic-text.

    use std::sync::{Mutex, OnceLock};

    use cosmic_text::{
        Align, Attrs, Buffer, Color, Family, FontSystem, Metrics, Shaping, SwashCache,
    };
    use log::debug;

    use super::{InkSpan, TextBlock, TextRenderer, TextStyle, LINE_HEIGHT_FACTOR};
    use crate::{Error, Result};

    /// Font discovery is expensive, so every renderer shares one font system.
    static FONT_SYSTEM: OnceLock<Mutex<FontSystem>> = OnceLock::new();

    fn font_system() -> &'static Mutex<FontSystem> {
        FONT_SYSTEM.get_or_init(|| Mutex::new(FontSystem::new()))
    }

    fn has_family(font_system: &FontSystem, family: &str) -> bool {
        font_system
            .db()
            .faces()
            .any(|face| face.families.iter().any(|(name, _)| name.eq_ignore_ascii_case(family)))
    }

    /// Whether any font face was discovered on this system.
    pub fn has_system_fonts() -> bool {
        font_system().lock().map(|fs| fs.db().faces().next().is_some()).unwrap_or(false)
    }

    pub struct CosmicTextRenderer {
        swash_cache: SwashCache,
    }

    impl CosmicTextRenderer {
        pub fn new() -> Self {
            Self { swash_cache: SwashCache::new() }
        }
    }

    impl Default for CosmicTextRenderer {
        fn default() -> Self {
            Self::new()
        }
    }

    impl TextRenderer for CosmicTextRenderer {
        fn layout(&mut self, text: &str, style: &TextStyle, max_width: u32) -> Result<TextBlock> {
            let mut font_system = font_system()
                .lock()
                .map_err(|_| Error::RenderError("font system lock poisoned".into()))?;

            let family = if has_family(&font_system, &style.family) {
                Family::Name(&style.family)
            } else {
                debug!("font family {:?} not installed; using sans-serif", style.family);
                Family::SansSerif
            };

            let metrics = Metrics::new(style.size_px, style.size_px * LINE_HEIGHT_FACTOR);
            let mut buffer = Buffer::new(&mut font_system, metrics);
            buffer.set_size(&mut font_system, Some(max_width as f32), None);
            buffer.set_text(&mut font_system, text, Attrs::new().family(family), Shaping::Advanced);
            for line in buffer.lines.iter_mut() {
                line.set_align(Some(Align::Center));
            }
            buffer.shape_until_scroll(&mut font_system, false);

            let mut height = 0.0f32;
            for run in buffer.layout_runs() {
                height = height.max(run.line_top + metrics.line_height);
            }
            // Lines are already centered across the full wrap width.
            let width = if height > 0.0 { max_width } else { 0 };

            let mut spans = Vec::new();
            let ink = Color::rgba(0, 0, 0, 255);
            buffer.draw(&mut font_system, &mut self.swash_cache, ink, |x, y, w, h, color| {
                if color.a() > 0 {
                    spans.push(InkSpan { x, y, width: w, height: h, alpha: color.a() });
                }
            });

            Ok(TextBlock { width, height: height.ceil() as u32, spans })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(px: f32) -> TextStyle {
        TextStyle { family: "Arial".into(), size_px: px }
    }

    #[test]
    fn block_single_glyph_metrics() {
        let block = BlockTextRenderer.layout("A", &style(35.0), 250).unwrap();
        assert_eq!((block.width, block.height), (21, 42));
        assert_eq!(block.spans, vec![InkSpan { x: 3, y: 7, width: 15, height: 28, alpha: 255 }]);
    }

    #[test]
    fn block_wraps_to_max_width() {
        // advance 6 → five glyphs per 30px line
        let block = BlockTextRenderer.layout("abc defg hi", &style(10.0), 30).unwrap();
        assert_eq!(block.height, 3 * 12);
        assert!(block.width <= 30);
    }

    #[test]
    fn block_centers_short_lines() {
        let block = BlockTextRenderer.layout("abcdefghijk i", &style(35.0), 250).unwrap();
        assert_eq!((block.width, block.height), (231, 84));
        let last = block.spans.last().unwrap();
        assert_eq!((last.x, last.y), (108, 49));
        assert_eq!(block.spans[0].x, 3);
    }

    #[test]
    fn block_splits_overlong_words() {
        let lines = BlockTextRenderer::wrap("abcdefgh", 3);
        assert_eq!(lines, ["abc", "def", "gh"]);
        let lines = BlockTextRenderer::wrap("xy abcdefg", 4);
        assert_eq!(lines, ["xy", "abcd", "efg"]);
    }

    #[test]
    fn block_keeps_explicit_line_breaks() {
        let lines = BlockTextRenderer::wrap("one\ntwo", 10);
        assert_eq!(lines, ["one", "two"]);
    }

    #[test]
    fn blank_text_is_an_empty_block() {
        let block = BlockTextRenderer.layout("   ", &style(12.0), 100).unwrap();
        assert!(block.is_empty());
        assert!(block.spans.is_empty());
    }
}
