//! Logical window size plus device pixel ratio.

/// Drawing surface dimensions.
///
/// Logical size is what layout sees; the drawing buffer is the physical
/// pixel grid actually rendered, `floor(logical * pixel_ratio)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    width: u32,
    height: u32,
    pixel_ratio: f64,
}

impl Viewport {
    /// Dimensions are clamped to at least 1; a non-finite or non-positive
    /// ratio becomes 1.
    pub fn new(width: u32, height: u32, pixel_ratio: f64) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            pixel_ratio: sanitize_ratio(pixel_ratio),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    /// Width / height of the logical size.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
    }

    pub fn set_pixel_ratio(&mut self, ratio: f64) {
        self.pixel_ratio = sanitize_ratio(ratio);
    }

    /// Physical pixel size of the render target.
    pub fn drawing_buffer_size(&self) -> (u32, u32) {
        let scale = |v: u32| ((v as f64 * self.pixel_ratio).floor() as u32).max(1);
        (scale(self.width), scale(self.height))
    }
}

fn sanitize_ratio(ratio: f64) -> f64 {
    if ratio.is_finite() && ratio > 0.0 {
        ratio
    } else {
        1.0
    }
}
