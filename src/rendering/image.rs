//! Image decoding and aspect-preserving placement.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::rendering::layout::Rect;
use crate::Result;

/// Decodes image files into RGBA pixels.
pub trait ImageDecoder {
    fn decode(&self, path: &Path) -> Result<RgbaImage>;
}

/// Decoder backed by the `image` crate's format detection.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsImageDecoder;

impl ImageDecoder for FsImageDecoder {
    fn decode(&self, path: &Path) -> Result<RgbaImage> {
        let img = image::ImageReader::open(path)?.with_guessed_format()?.decode()?;
        Ok(img.to_rgba8())
    }
}

/// Letterbox `src_width`×`src_height` into `cell`.
///
/// An image wider than the cell spans the full cell width and is centered
/// vertically; otherwise it spans the full height and is centered
/// horizontally. Returns `None` when either side is empty.
pub fn letterbox(src_width: u32, src_height: u32, cell: Rect) -> Option<Rect> {
    if src_width == 0 || src_height == 0 || cell.width == 0 || cell.height == 0 {
        return None;
    }
    let (sw, sh) = (u64::from(src_width), u64::from(src_height));
    let (cw, ch) = (u64::from(cell.width), u64::from(cell.height));

    // sw/sh > cw/ch, compared without division
    if sw * ch > sh * cw {
        let height = ((cw * sh + sw / 2) / sw).clamp(1, ch) as u32;
        let y = cell.y + ((cell.height - height) / 2) as i32;
        Some(Rect::new(cell.x, y, cell.width, height))
    } else {
        let width = ((ch * sw + sh / 2) / sh).clamp(1, cw) as u32;
        let x = cell.x + ((cell.width - width) / 2) as i32;
        Some(Rect::new(x, cell.y, width, cell.height))
    }
}

/// Scale `src` to exactly `width`×`height`.
pub fn scale_to(src: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if src.width() == width && src.height() == height {
        return src.clone();
    }
    imageops::resize(src, width, height, FilterType::Triangle)
}
