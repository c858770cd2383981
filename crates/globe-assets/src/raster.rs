//! Decoded texture rasters.

use image::RgbaImage;
use image::imageops::FilterType;

use crate::error::LoadError;

/// A decoded RGBA8 raster ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    /// Human-readable origin (URL, path, or `"procedural"`).
    pub label: String,
    /// Pixel data, row-major from the top-left corner.
    pub pixels: RgbaImage,
    /// Reduced levels below `pixels`, each half the size of the one before.
    /// Empty until [`with_mips`](Self::with_mips) runs.
    pub mips: Vec<RgbaImage>,
}

/// Number of mip levels down to 1x1, counting the base level.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

impl TextureImage {
    /// Wrap an existing raster.
    pub fn new(label: impl Into<String>, pixels: RgbaImage) -> Self {
        Self {
            label: label.into(),
            pixels,
            mips: Vec::new(),
        }
    }

    /// Fill in the mip chain with a triangle filter. Meant to run on a
    /// loader thread so uploads only copy.
    pub fn with_mips(mut self) -> Self {
        let count = mip_level_count(self.width(), self.height()) as usize;
        let mut mips: Vec<RgbaImage> = Vec::with_capacity(count.saturating_sub(1));
        for _ in 1..count {
            let previous = mips.last().unwrap_or(&self.pixels);
            let w = (previous.width() / 2).max(1);
            let h = (previous.height() / 2).max(1);
            let next = image::imageops::resize(previous, w, h, FilterType::Triangle);
            mips.push(next);
        }
        self.mips = mips;
        self
    }

    /// Every level from the base down, in upload order.
    pub fn levels(&self) -> impl Iterator<Item = &RgbaImage> {
        std::iter::once(&self.pixels).chain(&self.mips)
    }

    pub fn level_count(&self) -> u32 {
        1 + self.mips.len() as u32
    }

    /// Decode PNG or JPEG bytes into an RGBA8 raster.
    pub fn decode(label: impl Into<String>, bytes: &[u8]) -> Result<Self, LoadError> {
        let label = label.into();
        let decoded = image::load_from_memory(bytes).map_err(|source| LoadError::Decode {
            label: label.clone(),
            source,
        })?;
        Ok(Self::new(label, decoded.to_rgba8()))
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Raw RGBA bytes, `width * height * 4` long.
    pub fn as_bytes(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    /// An image with zero pixels carries nothing to sample.
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}
