//! The off-screen pixel buffer strokes are composited onto.
//!
//! Pixels are stored as premultiplied `0xAARRGGBB` words (the layout of [`raqote::DrawTarget`]).
//! Commands are rasterized anti-aliased and blended source-over, strictly in the order they are
//! applied.

use raqote::{
    DrawOptions, DrawTarget, LineCap, LineJoin, PathBuilder, SolidSource, Source, StrokeStyle,
};

use crate::color::Rgba;
use crate::error::PaintError;
use crate::math::Point;
use crate::placement::Rect;
use crate::stroke::{LineStyle, StrokeCommand};

const BORDER_WIDTH: f32 = 3.0;
const BORDER_ALPHA: u8 = 150;

pub struct Canvas {
    dt: DrawTarget,
    background: Rgba,
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("background", &self.background)
            .finish()
    }
}

impl Canvas {
    /// Creates a canvas filled with `background` (forced opaque).
    pub fn new(width: i32, height: i32, background: Rgba) -> Result<Self, PaintError> {
        check_dimensions(width, height)?;
        let mut canvas = Canvas {
            dt: DrawTarget::new(width, height),
            background: background.with_alpha(0xff),
        };
        canvas.clear(canvas.background);
        tracing::debug!(width, height, "created canvas");
        Ok(canvas)
    }

    pub fn width(&self) -> i32 {
        self.dt.width()
    }

    pub fn height(&self) -> i32 {
        self.dt.height()
    }

    pub fn background(&self) -> Rgba {
        self.background
    }

    /// Replaces the buffer with one of the new size. The overlapping top-left region is kept;
    /// anything newly exposed is filled with the background color.
    pub fn resize(&mut self, width: i32, height: i32) -> Result<(), PaintError> {
        check_dimensions(width, height)?;
        let (old_w, old_h) = (self.width(), self.height());
        let mut dt = DrawTarget::new(width, height);
        dt.clear(solid(self.background));

        let copy_w = old_w.min(width) as usize;
        let copy_h = old_h.min(height) as usize;
        let (old_stride, new_stride) = (old_w as usize, width as usize);
        let old = self.dt.get_data();
        let new = dt.get_data_mut();
        for y in 0..copy_h {
            new[y * new_stride..y * new_stride + copy_w]
                .copy_from_slice(&old[y * old_stride..y * old_stride + copy_w]);
        }

        self.dt = dt;
        tracing::debug!(old_w, old_h, width, height, "resized canvas");
        Ok(())
    }

    /// Fills the whole buffer with `background` at full opacity.
    pub fn clear(&mut self, background: Rgba) {
        self.dt.clear(solid(background.with_alpha(0xff)));
    }

    /// Rasterizes one command. Geometry that cannot reach the canvas is dropped, and what is left
    /// is clipped to the canvas plus the brush reach before it is handed to the rasterizer.
    pub fn apply(&mut self, command: &StrokeCommand) {
        match *command {
            StrokeCommand::Line {
                from,
                to,
                width,
                color,
                style,
            } => {
                if !(width > 0.0) {
                    return;
                }
                let half = (width / 2.0).min(self.max_reach());
                // Square caps reach furthest along a diagonal; one more pixel covers antialiasing.
                let bounds = self.bounds(f64::from(half) * std::f64::consts::SQRT_2 + 1.0);
                let src = Source::Solid(solid(color));
                if from == to {
                    // A zero-length stroke still leaves a cap-shaped mark.
                    if !bounds.contains(from) {
                        return;
                    }
                    let (x, y) = (from.x as f32, from.y as f32);
                    match style {
                        LineStyle::Round => self.fill_circle(x, y, half, &src),
                        LineStyle::Square => self.dt.fill_rect(
                            x - half,
                            y - half,
                            2.0 * half,
                            2.0 * half,
                            &src,
                            &DrawOptions::new(),
                        ),
                    }
                    return;
                }
                let Some(((x0, y0), (x1, y1))) = bounds.clip(from, to) else {
                    return;
                };
                let mut pb = PathBuilder::new();
                pb.move_to(x0, y0);
                pb.line_to(x1, y1);
                let path = pb.finish();
                self.dt.stroke(
                    &path,
                    &src,
                    &stroke_style(2.0 * half, style),
                    &DrawOptions::new(),
                );
            }
            StrokeCommand::Splatter {
                center,
                radius,
                color,
            } => {
                if !(radius > 0.0) {
                    return;
                }
                let radius = radius.min(self.max_reach());
                if !self.bounds(f64::from(radius) + 1.0).contains(center) {
                    return;
                }
                let src = Source::Solid(solid(color));
                self.fill_circle(center.x as f32, center.y as f32, radius, &src);
            }
        }
    }

    /// Applies `commands` in order; later commands paint over earlier ones.
    pub fn apply_all<'a>(&mut self, commands: impl IntoIterator<Item = &'a StrokeCommand>) {
        for command in commands {
            self.apply(command);
        }
    }

    /// Outlines `rect` with the translucent black frame shown around the source image.
    pub fn draw_border(&mut self, rect: &Rect) {
        if rect.is_empty() {
            return;
        }
        let mut pb = PathBuilder::new();
        pb.rect(
            rect.left as f32,
            rect.top as f32,
            rect.width as f32,
            rect.height as f32,
        );
        let path = pb.finish();
        let style = StrokeStyle {
            width: BORDER_WIDTH,
            ..StrokeStyle::default()
        };
        let src = Source::Solid(solid(Rgba::BLACK.with_alpha(BORDER_ALPHA)));
        self.dt.stroke(&path, &src, &style, &DrawOptions::new());
    }

    /// The unpremultiplied color at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgba> {
        if x < 0 || y < 0 || x >= self.width() || y >= self.height() {
            return None;
        }
        let index = y as usize * self.width() as usize + x as usize;
        Some(Rgba::from_premultiplied_argb(self.dt.get_data()[index]))
    }

    /// Raw premultiplied ARGB words, row-major.
    pub fn data(&self) -> &[u32] {
        self.dt.get_data()
    }

    /// Unpremultiplied RGBA bytes, row-major, for handing to an encoder.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.dt
            .get_data()
            .iter()
            .flat_map(|&px| <[u8; 4]>::from(Rgba::from_premultiplied_argb(px)))
            .collect()
    }

    /// Encodes the canvas as an RGBA PNG at `path`.
    pub fn write_png<P: AsRef<std::path::Path>>(&self, path: P) -> image::ImageResult<()> {
        image::save_buffer_with_format(
            path,
            &self.to_rgba8(),
            self.width() as u32,
            self.height() as u32,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
    }

    /// Largest half-width or radius drawn as given; wider brushes are drawn at this size. Keeps
    /// every coordinate inside the rasterizer's 16.16 fixed-point range.
    fn max_reach(&self) -> f32 {
        self.width().max(self.height()) as f32
    }

    /// The canvas grown by `reach` on every side.
    fn bounds(&self, reach: f64) -> Bounds {
        Bounds {
            min_x: -reach,
            min_y: -reach,
            max_x: f64::from(self.width()) + reach,
            max_y: f64::from(self.height()) + reach,
        }
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, src: &Source) {
        let mut pb = PathBuilder::new();
        pb.arc(x, y, radius, 0.0, 2.0 * std::f32::consts::PI);
        pb.close();
        let path = pb.finish();
        self.dt.fill(&path, src, &DrawOptions::new());
    }
}

impl Clone for Canvas {
    fn clone(&self) -> Self {
        let mut dt = DrawTarget::new(self.width(), self.height());
        dt.get_data_mut().copy_from_slice(self.dt.get_data());
        Canvas {
            dt,
            background: self.background,
        }
    }
}

#[derive(Debug, Copy, Clone)]
struct Bounds {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Bounds {
    fn contains(&self, p: Point) -> bool {
        let (x, y) = (f64::from(p.x), f64::from(p.y));
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// The part of the segment `from`-`to` inside the box (Liang-Barsky), or `None` if the
    /// segment misses it. Endpoints already inside come back unchanged.
    fn clip(&self, from: Point, to: Point) -> Option<((f32, f32), (f32, f32))> {
        let (x, y) = (f64::from(from.x), f64::from(from.y));
        let (dx, dy) = (f64::from(to.x) - x, f64::from(to.y) - y);
        let (mut t0, mut t1) = (0.0f64, 1.0f64);
        for (p, q) in [
            (-dx, x - self.min_x),
            (dx, self.max_x - x),
            (-dy, y - self.min_y),
            (dy, self.max_y - y),
        ] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
            } else if p < 0.0 {
                t0 = t0.max(q / p);
            } else {
                t1 = t1.min(q / p);
            }
        }
        if t0 > t1 {
            return None;
        }
        let at = |t: f64| ((x + t * dx) as f32, (y + t * dy) as f32);
        Some((at(t0), at(t1)))
    }
}

fn check_dimensions(width: i32, height: i32) -> Result<(), PaintError> {
    if width <= 0 || height <= 0 {
        return Err(PaintError::InvalidDimensions {
            width: i64::from(width),
            height: i64::from(height),
        });
    }
    Ok(())
}

fn solid(color: Rgba) -> SolidSource {
    SolidSource::from_unpremultiplied_argb(color.a, color.r, color.g, color.b)
}

fn stroke_style(width: f32, style: LineStyle) -> StrokeStyle {
    let (cap, join) = match style {
        LineStyle::Square => (LineCap::Square, LineJoin::Miter),
        LineStyle::Round => (LineCap::Round, LineJoin::Round),
    };
    StrokeStyle {
        width,
        cap,
        join,
        ..StrokeStyle::default()
    }
}
