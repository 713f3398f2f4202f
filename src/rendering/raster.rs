//! Rasterizer: executes a display list into an RGBA canvas

use image::{imageops, Rgba, RgbaImage};
use log::debug;

use crate::rendering::image::{letterbox, scale_to};
use crate::rendering::layout::{Rect, Size};
use crate::rendering::paint::PaintCommand;
use crate::rendering::text::{TextBlock, TextRenderer};
use crate::rendering::Bitmap;
use crate::{Error, Result};

/// Pixel buffer being painted. Owned by exactly one render call.
pub struct Canvas {
    pixels: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32, fill: (u8, u8, u8, u8)) -> Self {
        let (r, g, b, a) = fill;
        Self { pixels: RgbaImage::from_pixel(width, height, Rgba([r, g, b, a])) }
    }

    fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.pixels.width(), self.pixels.height())
    }

    pub fn fill_rect(&mut self, rect: Rect, rgba: (u8, u8, u8, u8)) {
        let Some(r) = rect.intersect(&self.bounds()) else { return };
        let px = Rgba([rgba.0, rgba.1, rgba.2, rgba.3]);
        for y in r.y..r.bottom() {
            for x in r.x..r.right() {
                self.pixels.put_pixel(x as u32, y as u32, px);
            }
        }
    }

    /// Blend `rgba` at `alpha` coverage over `rect`, clipped to `clip`.
    fn blend_rect(&mut self, rect: Rect, clip: Rect, rgba: (u8, u8, u8, u8), alpha: u8) {
        let Some(r) = rect.intersect(&clip).and_then(|r| r.intersect(&self.bounds())) else {
            return;
        };
        let a = u32::from(alpha) * u32::from(rgba.3) / 255;
        for y in r.y..r.bottom() {
            for x in r.x..r.right() {
                let dst = self.pixels.get_pixel_mut(x as u32, y as u32);
                let [dr, dg, db, da] = dst.0;
                dst.0 = [
                    mix(rgba.0, dr, a),
                    mix(rgba.1, dg, a),
                    mix(rgba.2, db, a),
                    (a + u32::from(da) * (255 - a) / 255) as u8,
                ];
            }
        }
    }

    fn draw_text(&mut self, block: &TextBlock, cell: Rect, rgba: (u8, u8, u8, u8)) {
        let origin_x = cell.x + (cell.width as i32 - block.width as i32) / 2;
        let origin_y = cell.y + (cell.height as i32 - block.height as i32) / 2;
        for span in &block.spans {
            let rect = Rect::new(origin_x + span.x, origin_y + span.y, span.width, span.height);
            self.blend_rect(rect, cell, rgba, span.alpha);
        }
    }

    fn draw_image(&mut self, image: &RgbaImage, cell: Rect) {
        let Some(dest) = letterbox(image.width(), image.height(), cell) else { return };
        let scaled = scale_to(image, dest.width, dest.height);
        imageops::overlay(&mut self.pixels, &scaled, i64::from(dest.x), i64::from(dest.y));
    }

    pub fn into_bitmap(self) -> Bitmap {
        Bitmap::from_pixels(self.pixels)
    }
}

fn mix(src: u8, dst: u8, a: u32) -> u8 {
    ((u32::from(src) * a + u32::from(dst) * (255 - a) + 127) / 255) as u8
}

/// Paint `commands` in order onto a fresh `size` canvas filled with `fill`.
///
/// Fails without returning a partial bitmap when the canvas exceeds
/// `max_side` pixels on either axis or text layout fails.
pub fn rasterize(
    size: Size,
    commands: &[PaintCommand],
    text: &mut dyn TextRenderer,
    fill: (u8, u8, u8, u8),
    max_side: u32,
) -> Result<Bitmap> {
    if size.width == 0 || size.height == 0 {
        return Err(Error::RenderError(format!("empty canvas {}x{}", size.width, size.height)));
    }
    if size.width > max_side || size.height > max_side {
        return Err(Error::RenderError(format!(
            "canvas {}x{} exceeds the {}px limit",
            size.width, size.height, max_side
        )));
    }

    let mut canvas = Canvas::new(size.width, size.height, fill);
    for cmd in commands {
        match cmd {
            PaintCommand::SolidRect { rect, rgba } => canvas.fill_rect(*rect, *rgba),
            PaintCommand::Text { cell, text: content, style, rgba } => {
                let block = text.layout(content, style, cell.width)?;
                if !block.is_empty() {
                    canvas.draw_text(&block, *cell, *rgba);
                }
            }
            PaintCommand::Image { cell, image } => canvas.draw_image(image, *cell),
        }
    }

    debug!("rasterized {} command(s) into {}x{}", commands.len(), size.width, size.height);
    Ok(canvas.into_bitmap())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::text::{BlockTextRenderer, TextStyle};

    const WHITE: (u8, u8, u8, u8) = (255, 255, 255, 255);
    const BLACK: (u8, u8, u8, u8) = (0, 0, 0, 255);

    #[test]
    fn rasterize_returns_canvas_of_requested_size() {
        let size = Size { width: 128, height: 64 };
        let s = rasterize(size, &[], &mut BlockTextRenderer, WHITE, 1024).unwrap();
        assert_eq!(s.width, 128);
        assert_eq!(s.height, 64);
        assert_eq!(s.pixel(10, 10), Some([255, 255, 255, 255]));
    }

    #[test]
    fn oversized_canvas_is_rejected() {
        let size = Size { width: 2048, height: 8 };
        let res = rasterize(size, &[], &mut BlockTextRenderer, WHITE, 1024);
        assert!(matches!(res, Err(Error::RenderError(_))));
    }

    #[test]
    fn solid_rect_is_clipped_to_canvas() {
        let cmds = [PaintCommand::SolidRect { rect: Rect::new(-5, 6, 20, 20), rgba: BLACK }];
        let size = Size { width: 10, height: 10 };
        let s = rasterize(size, &cmds, &mut BlockTextRenderer, WHITE, 64).unwrap();
        assert_eq!(s.pixel(0, 9), Some([0, 0, 0, 255]));
        assert_eq!(s.pixel(0, 5), Some([255, 255, 255, 255]));
    }

    #[test]
    fn text_is_centered_in_its_cell() {
        let cmds = [PaintCommand::Text {
            cell: Rect::new(0, 0, 250, 250),
            text: "A".into(),
            style: TextStyle { family: "Arial".into(), size_px: 35.0 },
            rgba: BLACK,
        }];
        let size = Size { width: 250, height: 250 };
        let s = rasterize(size, &cmds, &mut BlockTextRenderer, WHITE, 1024).unwrap();
        // block is 21x42 at (114, 104); glyph box inset by (3, 7)
        assert_eq!(s.pixel(117, 111), Some([0, 0, 0, 255]));
        assert_eq!(s.pixel(131, 138), Some([0, 0, 0, 255]));
        assert_eq!(s.pixel(116, 111), Some([255, 255, 255, 255]));
        assert_eq!(s.pixel(132, 125), Some([255, 255, 255, 255]));
    }

    #[test]
    fn wrapped_lines_are_each_centered() {
        let cmds = [PaintCommand::Text {
            cell: Rect::new(0, 0, 250, 250),
            text: "abcdefghijk i".into(),
            style: TextStyle { family: "Arial".into(), size_px: 35.0 },
            rgba: BLACK,
        }];
        let size = Size { width: 250, height: 250 };
        let s = rasterize(size, &cmds, &mut BlockTextRenderer, WHITE, 1024).unwrap();
        // block is 231x84 at (9, 83); the lone "i" sits 105px into its line
        assert_eq!(s.pixel(12, 90), Some([0, 0, 0, 255]));
        assert_eq!(s.pixel(117, 132), Some([0, 0, 0, 255]));
        assert_eq!(s.pixel(131, 159), Some([0, 0, 0, 255]));
        assert_eq!(s.pixel(116, 132), Some([255, 255, 255, 255]));
        assert!((0..116).all(|x| s.pixel(x, 146) == Some([255, 255, 255, 255])));
    }

    #[test]
    fn partial_coverage_blends() {
        let mut canvas = Canvas::new(2, 1, WHITE);
        canvas.blend_rect(Rect::new(0, 0, 1, 1), Rect::new(0, 0, 2, 1), BLACK, 128);
        let bmp = canvas.into_bitmap();
        assert_eq!(bmp.pixel(0, 0), Some([127, 127, 127, 255]));
        assert_eq!(bmp.pixel(1, 0), Some([255, 255, 255, 255]));
    }
}
