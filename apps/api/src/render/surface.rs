//! Rendered surface — the rasterized document preview handed over by the client.

use image::{DynamicImage, GenericImageView};

use crate::render::ExportError;

/// A decoded pixel buffer. Pagination only reads its dimensions.
#[derive(Debug, Clone)]
pub struct RenderSurface {
    image: DynamicImage,
}

impl RenderSurface {
    /// Decodes PNG/JPEG (or any format the `image` crate can sniff) from raw bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, ExportError> {
        if bytes.is_empty() {
            return Err(ExportError::Rasterization("surface is empty".to_string()));
        }
        let image = image::load_from_memory(bytes)
            .map_err(|e| ExportError::Rasterization(format!("failed to decode image: {e}")))?;
        Ok(Self { image })
    }

    pub fn width(&self) -> u32 {
        self.image.dimensions().0
    }

    pub fn height(&self) -> u32 {
        self.image.dimensions().1
    }

    pub fn has_alpha(&self) -> bool {
        self.image.color().has_alpha()
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }
}

#[cfg(test)]
pub mod testing {
    use std::io::Cursor;

    use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage, Rgba, RgbaImage};

    /// Encodes a solid RGB image as PNG.
    pub fn png_rgb(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([240, 240, 240]));
        encode(DynamicImage::ImageRgb8(img))
    }

    /// Encodes a half-transparent RGBA image as PNG.
    pub fn png_rgba(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 128]));
        encode(DynamicImage::ImageRgba8(img))
    }

    fn encode(img: DynamicImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
            .unwrap();
        bytes
    }
}
