//! The stateful painting surface: pointer events in, pixels out.

use std::sync::Arc;

use crate::canvas::Canvas;
use crate::color::Rgba;
use crate::config::Config;
use crate::error::PaintError;
use crate::math::{speed, Point};
use crate::placement::{fit_scale, Rect};
use crate::rand::Random;
use crate::sample::{ColorSampler, SourceImage};
use crate::stroke::{synthesize_stroke, BrushType, StrokeCommand, StrokeParams};

/// Speed range used for both endpoints of every `fill` stroke.
const FILL_SPEED_MIN: f64 = 1.5;
const FILL_SPEED_MAX: f64 = 2.0;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerSample {
    pub position: Point,
    pub time_ms: i64,
}

#[derive(Debug, Copy, Clone, PartialEq)]
enum StrokeState {
    Idle,
    Stroking {
        last: PointerSample,
        /// `None` until the first move after a pointer-down.
        last_speed: Option<f64>,
    },
}

/// Owns the canvas and the pointer state; borrows the source image through an [`Arc`].
///
/// Every method runs to completion before returning. A call that fails leaves the canvas exactly
/// as it was.
pub struct Session<R> {
    canvas: Canvas,
    image: Option<Arc<SourceImage>>,
    placement: Rect,
    brush: BrushType,
    params: StrokeParams,
    background: Rgba,
    state: StrokeState,
    rng: R,
}

impl<R> std::fmt::Debug for Session<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("canvas", &self.canvas)
            .field("placement", &self.placement)
            .field("brush", &self.brush)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<R: Random> Session<R> {
    /// Creates a session with a blank `width`x`height` canvas and no image.
    pub fn new(width: i32, height: i32, config: &Config, rng: R) -> Result<Self, PaintError> {
        let background = config.background();
        Ok(Session {
            canvas: Canvas::new(width, height, background)?,
            image: None,
            placement: Rect::ZERO,
            brush: BrushType::default(),
            params: config.stroke_params(),
            background,
            state: StrokeState::Idle,
            rng,
        })
    }

    /// Resizes the canvas, keeping what overlaps. If an image is bound, its fit-center placement
    /// is recomputed for the new size.
    pub fn resize_canvas(&mut self, width: i32, height: i32) -> Result<(), PaintError> {
        self.canvas.resize(width, height)?;
        if let Some(image) = &self.image {
            self.placement = fit_center(&self.canvas, image);
        }
        Ok(())
    }

    /// Binds `image` and places it fit-center on the canvas. `None` unbinds it.
    pub fn set_source_image(&mut self, image: Option<Arc<SourceImage>>) {
        self.placement = match &image {
            Some(image) => fit_center(&self.canvas, image),
            None => Rect::ZERO,
        };
        self.image = image;
        tracing::debug!(placement = ?self.placement, "bound source image");
    }

    /// Overrides the placement rect, for hosts that lay the image out themselves.
    pub fn set_placement(&mut self, rect: Rect) {
        self.placement = rect;
    }

    pub fn placement(&self) -> Rect {
        self.placement
    }

    pub fn set_brush_type(&mut self, brush: BrushType) {
        self.brush = brush;
    }

    pub fn brush_type(&self) -> BrushType {
        self.brush
    }

    pub fn is_stroking(&self) -> bool {
        matches!(self.state, StrokeState::Stroking { .. })
    }

    pub fn on_pointer_down(&mut self, position: Point, time_ms: i64) {
        self.state = StrokeState::Stroking {
            last: PointerSample { position, time_ms },
            last_speed: None,
        };
        tracing::debug!(?position, time_ms, "pointer down");
    }

    /// Draws the stroke from the previous sample to `position`, returning how many commands were
    /// applied.
    ///
    /// A time delta that is zero, negative or too large for an `i64` is rejected and the previous
    /// sample kept. When no image is placed the pointer is still tracked, but nothing is drawn.
    pub fn on_pointer_move(&mut self, position: Point, time_ms: i64) -> Result<usize, PaintError> {
        let StrokeState::Stroking { last, last_speed } = self.state else {
            return Err(PaintError::PointerNotDown);
        };
        let delta_ms = time_ms.checked_sub(last.time_ms).ok_or(PaintError::TimestampOverflow {
            last_ms: last.time_ms,
            now_ms: time_ms,
        })?;
        let speed = speed(last.position, position, delta_ms)?;
        self.state = StrokeState::Stroking {
            last: PointerSample { position, time_ms },
            last_speed: Some(speed),
        };
        // The first move of a stroke has no earlier speed to blend from.
        let from_speed = last_speed.unwrap_or(speed);
        let commands = self.synthesize((last.position, position), (from_speed, speed))?;
        self.canvas.apply_all(&commands);
        Ok(commands.len())
    }

    pub fn on_pointer_up(&mut self) {
        if self.is_stroking() {
            tracing::debug!("pointer up");
        }
        self.state = StrokeState::Idle;
    }

    /// Scatters `count` short random strokes over the placed image, each spanning at most
    /// `jitter` pixels per axis. Pointer state is left alone.
    pub fn fill(&mut self, count: usize, jitter: i32) -> Result<usize, PaintError> {
        let rect = self.placement;
        // Fail up front, so that even an empty fill reports a missing image.
        let image = self.image.as_deref().ok_or(PaintError::InvalidPlacement)?;
        ColorSampler::new(image, rect)?;
        let jitter = f64::from(jitter.max(0));
        let mut applied = 0;
        for _ in 0..count {
            let endpoints = random_segment(&mut self.rng, rect, jitter);
            let from_speed = self.rng.uniform(FILL_SPEED_MIN, FILL_SPEED_MAX);
            let to_speed = self.rng.uniform(FILL_SPEED_MIN, FILL_SPEED_MAX);
            let commands = self.synthesize(endpoints, (from_speed, to_speed))?;
            self.canvas.apply_all(&commands);
            applied += commands.len();
        }
        tracing::debug!(count, applied, "filled canvas");
        Ok(applied)
    }

    /// Paints over everything with the configured background color.
    pub fn clear(&mut self) {
        self.canvas.clear(self.background);
        tracing::debug!("cleared canvas");
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// A copy of the canvas with the placement border drawn on top, for presentation. The
    /// painting itself is untouched.
    pub fn render_with_border(&self) -> Canvas {
        let mut frame = self.canvas.clone();
        frame.draw_border(&self.placement);
        frame
    }

    fn synthesize(
        &mut self,
        endpoints: (Point, Point),
        speeds: (f64, f64),
    ) -> Result<Vec<StrokeCommand>, PaintError> {
        let image = self.image.as_deref().ok_or(PaintError::InvalidPlacement)?;
        let sampler = ColorSampler::new(image, self.placement)?;
        Ok(synthesize_stroke(
            endpoints,
            speeds,
            self.brush,
            &sampler,
            &self.params,
            &mut self.rng,
        ))
    }
}

/// A start point inside `rect` and an end point at most `jitter` away from it on each axis.
/// Coordinates are truncated only after the offset is added.
fn random_segment(rng: &mut impl Random, rect: Rect, jitter: f64) -> (Point, Point) {
    let x0 = (rng.uniform(0.0, f64::from(rect.width)) + f64::from(rect.left)) as i32;
    let y0 = (rng.uniform(0.0, f64::from(rect.height)) + f64::from(rect.top)) as i32;
    let x1 = (f64::from(x0) + rng.uniform(-jitter, jitter)) as i32;
    let y1 = (f64::from(y0) + rng.uniform(-jitter, jitter)) as i32;
    (Point::new(x0, y0), Point::new(x1, y1))
}

fn fit_center(canvas: &Canvas, image: &SourceImage) -> Rect {
    let (canvas_w, canvas_h) = (canvas.width(), canvas.height());
    let image_size = (image.width(), image.height());
    let scale = fit_scale((canvas_w, canvas_h), image_size);
    Rect::placement(canvas_w, canvas_h, Some(image_size), (scale, scale))
}
