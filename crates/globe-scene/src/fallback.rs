//! Procedural stand-in for the planet colour map, used when the real one
//! cannot be fetched: an ocean gradient with five ellipse "continents".
//!
//! The ellipses are decorative and make no attempt at geography.

use globe_assets::TextureImage;
use image::{Rgba, RgbaImage};

pub const FALLBACK_WIDTH: u32 = 1024;
pub const FALLBACK_HEIGHT: u32 = 512;

/// Ocean colour at the top edge.
pub const OCEAN_TOP: [u8; 3] = [0x0d, 0x47, 0xa1];
/// Ocean colour at the bottom edge.
pub const OCEAN_BOTTOM: [u8; 3] = [0x19, 0x76, 0xd2];
pub const LAND: [u8; 3] = [0x4c, 0xaf, 0x50];

/// Axis-aligned ellipse in raster pixel coordinates.
#[derive(Clone, Copy, Debug)]
pub struct Ellipse {
    pub cx: f32,
    pub cy: f32,
    pub rx: f32,
    pub ry: f32,
}

impl Ellipse {
    const fn new(cx: f32, cy: f32, rx: f32, ry: f32) -> Self {
        Self { cx, cy, rx, ry }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        let dx = (x - self.cx) / self.rx;
        let dy = (y - self.cy) / self.ry;
        dx * dx + dy * dy <= 1.0
    }
}

/// Africa, Eurasia, North America, South America, Australia.
pub const CONTINENTS: [Ellipse; 5] = [
    Ellipse::new(400.0, 280.0, 80.0, 120.0),
    Ellipse::new(600.0, 200.0, 160.0, 120.0),
    Ellipse::new(200.0, 160.0, 100.0, 80.0),
    Ellipse::new(300.0, 360.0, 60.0, 100.0),
    Ellipse::new(800.0, 380.0, 60.0, 50.0),
];

/// Ocean gradient colour at pixel row `y`, sampled at the pixel centre.
pub fn ocean_color(y: u32) -> [u8; 3] {
    let t = (y as f32 + 0.5) / FALLBACK_HEIGHT as f32;
    std::array::from_fn(|i| {
        let a = OCEAN_TOP[i] as f32;
        let b = OCEAN_BOTTOM[i] as f32;
        (a + (b - a) * t).round() as u8
    })
}

/// Render the 1024x512 fallback map. Deterministic; no I/O.
pub fn procedural_earth() -> TextureImage {
    let pixels = RgbaImage::from_fn(FALLBACK_WIDTH, FALLBACK_HEIGHT, |x, y| {
        let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
        let [r, g, b] = if CONTINENTS.iter().any(|e| e.contains(px, py)) {
            LAND
        } else {
            ocean_color(y)
        };
        Rgba([r, g, b, 255])
    });
    TextureImage::new("procedural", pixels).with_mips()
}
