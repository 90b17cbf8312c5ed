//! Mapping between canvas space and source-image space.
//!
//! The source image is drawn letterboxed inside the canvas at some [`Rect`]; sampling a canvas
//! point means finding where that point falls inside the rect and scaling the result up to image
//! pixels.

use crate::error::PaintError;
use crate::math::Point;

/// Axis-aligned rectangle in canvas space. `width` and `height` are never negative.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// The degenerate rect used when no image is present.
    pub const ZERO: Rect = Rect::new(0, 0, 0, 0);

    pub const fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        let width = if width < 0 { 0 } else { width };
        let height = if height < 0 { 0 } else { height };
        Rect {
            left,
            top,
            width,
            height,
        }
    }

    /// Centers an image of intrinsic size `image` (scaled by `scale`) inside a
    /// `canvas_width`x`canvas_height` canvas. Returns [`Rect::ZERO`] when there is no image.
    pub fn placement(
        canvas_width: i32,
        canvas_height: i32,
        image: Option<(u32, u32)>,
        (scale_x, scale_y): (f64, f64),
    ) -> Rect {
        let Some((image_w, image_h)) = image else {
            return Rect::ZERO;
        };
        let actual_w = (f64::from(image_w) * scale_x).round() as i32;
        let actual_h = (f64::from(image_h) * scale_y).round() as i32;
        let left = (canvas_width - actual_w) / 2;
        let top = (canvas_height - actual_h) / 2;
        Rect::new(left, top, actual_w, actual_h)
    }

    pub fn right(&self) -> i32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.top + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x < self.right() && p.y >= self.top && p.y < self.bottom()
    }

    /// Grows the rect by `margin` on every side.
    pub fn inflate(&self, margin: i32) -> Rect {
        Rect::new(
            self.left - margin,
            self.top - margin,
            self.width + 2 * margin,
            self.height + 2 * margin,
        )
    }
}

/// The uniform scale that fits an image inside the canvas while preserving its aspect ratio.
/// Images smaller than the canvas are scaled up.
pub fn fit_scale(canvas: (i32, i32), image: (u32, u32)) -> f64 {
    let (canvas_w, canvas_h) = canvas;
    let (image_w, image_h) = image;
    if image_w == 0 || image_h == 0 || canvas_w <= 0 || canvas_h <= 0 {
        return 0.0;
    }
    f64::min(
        f64::from(canvas_w) / f64::from(image_w),
        f64::from(canvas_h) / f64::from(image_h),
    )
}

/// Maps a canvas point to the image pixel drawn under it.
///
/// Points outside `rect` are clamped to the nearest edge pixel rather than rejected. Fails with
/// [`PaintError::InvalidPlacement`] if `rect` or the image has zero area.
pub fn map_to_image_space(
    point: Point,
    rect: &Rect,
    image_width: u32,
    image_height: u32,
) -> Result<(u32, u32), PaintError> {
    if rect.is_empty() || image_width == 0 || image_height == 0 {
        return Err(PaintError::InvalidPlacement);
    }
    Ok(map_point(point, rect, image_width, image_height))
}

/// [`map_to_image_space`] without the checks, for callers that have already rejected an empty
/// `rect` or image.
pub(crate) fn map_point(
    point: Point,
    rect: &Rect,
    image_width: u32,
    image_height: u32,
) -> (u32, u32) {
    (
        map_axis(point.x, rect.left, rect.width, image_width),
        map_axis(point.y, rect.top, rect.height, image_height),
    )
}

fn map_axis(v: i32, start: i32, extent: i32, pixels: u32) -> u32 {
    let fraction = (f64::from(v) - f64::from(start)) / f64::from(extent);
    let index = (f64::from(pixels) * fraction) as i64;
    index.clamp(0, i64::from(pixels.max(1)) - 1) as u32
}
