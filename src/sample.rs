use crate::color::Rgba;
use crate::error::PaintError;
use crate::math::Point;
use crate::placement::{map_point, map_to_image_space, Rect};

/// Read-only access to a decoded image.
pub trait PixelSource {
    fn dimensions(&self) -> (u32, u32);

    /// The pixel at `(x, y)`. Callers guarantee `x < width` and `y < height`.
    fn pixel(&self, x: u32, y: u32) -> Rgba;
}

/// A row-major RGBA image held in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceImage {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl SourceImage {
    /// Wraps tightly packed RGBA8 bytes, four per pixel.
    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8]) -> Result<Self, PaintError> {
        let expected = width as usize * height as usize * 4;
        if bytes.len() != expected {
            return Err(PaintError::ImageDataLength {
                expected,
                actual: bytes.len(),
            });
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|px| Rgba::new(px[0], px[1], px[2], px[3]))
            .collect();
        Ok(SourceImage {
            width,
            height,
            pixels,
        })
    }

    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Rgba) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        SourceImage {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl PixelSource for SourceImage {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn pixel(&self, x: u32, y: u32) -> Rgba {
        self.pixels[y as usize * self.width as usize + x as usize]
    }
}

/// Color of the image pixel drawn under `point`, with edge pixels extended outward for points
/// outside `rect`.
pub fn sample_color<S: PixelSource + ?Sized>(
    point: Point,
    image: &S,
    rect: &Rect,
) -> Result<Rgba, PaintError> {
    let (w, h) = image.dimensions();
    let (x, y) = map_to_image_space(point, rect, w, h)?;
    Ok(image.pixel(x, y))
}

/// An image bound to its placement, validated once so that individual samples cannot fail.
#[derive(Clone, Copy)]
pub struct ColorSampler<'a> {
    image: &'a dyn PixelSource,
    rect: Rect,
}

impl<'a> ColorSampler<'a> {
    pub fn new(image: &'a dyn PixelSource, rect: Rect) -> Result<Self, PaintError> {
        let (w, h) = image.dimensions();
        if rect.is_empty() || w == 0 || h == 0 {
            return Err(PaintError::InvalidPlacement);
        }
        Ok(ColorSampler { image, rect })
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn sample(&self, point: Point) -> Rgba {
        let (w, h) = self.image.dimensions();
        let (x, y) = map_point(point, &self.rect, w, h);
        self.image.pixel(x, y)
    }
}

impl std::fmt::Debug for ColorSampler<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColorSampler")
            .field("image", &self.image.dimensions())
            .field("rect", &self.rect)
            .finish()
    }
}

/// Encodes each pixel's own coordinates in its color so tests can read back where a sample came
/// from.
#[cfg(test)]
pub(crate) fn coordinate_image(width: u32, height: u32) -> SourceImage {
    SourceImage::from_fn(width, height, |x, y| Rgba::opaque(x as u8, y as u8, 0))
}
