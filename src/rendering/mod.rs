//! Rendering pipeline: geometry resolution, display list, rasterization.

pub mod image;
pub mod layout;
pub mod paint;
pub mod raster;
pub mod text;

use std::io::Cursor;

use ::image::{ImageFormat, RgbaImage};
use base64::Engine as _;
use sha2::{Digest, Sha256};

use crate::Result;

/// A finished RGBA raster of a composition.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub pixels: RgbaImage,
}

impl Bitmap {
    pub fn from_pixels(pixels: RgbaImage) -> Self {
        Self { width: pixels.width(), height: pixels.height(), pixels }
    }

    /// RGBA of the pixel at (`x`, `y`), or `None` outside the bitmap.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        (x < self.width && y < self.height).then(|| self.pixels.get_pixel(x, y).0)
    }

    /// Raw RGBA bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.pixels.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)?;
        Ok(out)
    }

    pub fn to_data_uri(&self) -> Result<String> {
        let png = self.to_png()?;
        Ok(format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(png)
        ))
    }

    /// Hex SHA-256 over the dimensions and raw pixels.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.width.to_le_bytes());
        hasher.update(self.height.to_le_bytes());
        hasher.update(self.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_output_has_signature() {
        let bmp =
            Bitmap::from_pixels(RgbaImage::from_pixel(4, 3, ::image::Rgba([255, 255, 255, 255])));
        let png = bmp.to_png().unwrap();
        assert_eq!(&png[0..8], b"\x89PNG\r\n\x1a\n");
        assert!(bmp.to_data_uri().unwrap().starts_with("data:image/png;base64,"));
    }

    #[test]
    fn digest_depends_on_dimensions() {
        let a = Bitmap::from_pixels(RgbaImage::new(4, 1));
        let b = Bitmap::from_pixels(RgbaImage::new(2, 2));
        assert_eq!(a.as_bytes(), b.as_bytes());
        assert_ne!(a.digest(), b.digest());
        assert_eq!(a.pixel(3, 0), Some([0, 0, 0, 0]));
        assert_eq!(a.pixel(4, 0), None);
    }
}
