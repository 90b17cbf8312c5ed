//! Turns one pointer movement into a sequence of draw commands.
//!
//! A movement from `from` to `to` is cut into sub-segments roughly `step_length` canvas units
//! long. Each sub-segment gets its own speed (interpolated between the two endpoint speeds), its
//! own color (sampled from the source image under the sub-segment's end) and, for splatter
//! brushes, its own random offset.

use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::math::{dist, interpolate, interpolate_point, Point};
use crate::rand::Random;
use crate::sample::ColorSampler;

pub const DEFAULT_STROKE_ALPHA: u8 = 150;
pub const DEFAULT_STEP_LENGTH: f64 = 10.0;

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum BrushType {
    #[default]
    Square,
    Circle,
    CircleSplatter,
}

impl BrushType {
    pub fn line_style(self) -> LineStyle {
        match self {
            BrushType::Square => LineStyle::Square,
            BrushType::Circle | BrushType::CircleSplatter => LineStyle::Round,
        }
    }

    pub fn is_splatter(self) -> bool {
        matches!(self, BrushType::CircleSplatter)
    }
}

/// How the ends and joints of a line segment are rasterized.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum LineStyle {
    /// Square caps, mitered joins.
    Square,
    /// Round caps, round joins.
    Round,
}

/// A single, self-contained drawing instruction. Everything needed to rasterize it travels with
/// the command; the compositor keeps no paint state between commands.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum StrokeCommand {
    Line {
        from: Point,
        to: Point,
        width: f32,
        color: Rgba,
        style: LineStyle,
    },
    Splatter {
        center: Point,
        radius: f32,
        color: Rgba,
    },
}

impl StrokeCommand {
    pub fn color(&self) -> Rgba {
        match *self {
            StrokeCommand::Line { color, .. } | StrokeCommand::Splatter { color, .. } => color,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StrokeParams {
    /// Alpha applied to every stroke, regardless of speed.
    pub alpha: u8,
    /// Target length of one sub-segment, in canvas units. Always positive.
    pub step_length: f64,
}

impl Default for StrokeParams {
    fn default() -> Self {
        StrokeParams {
            alpha: DEFAULT_STROKE_ALPHA,
            step_length: DEFAULT_STEP_LENGTH,
        }
    }
}

pub fn line_width(speed: f64) -> f64 {
    speed * 10.0
}

pub fn splatter_radius(speed: f64) -> f64 {
    (speed * 50.0).sqrt()
}

/// Full width of the square that splatter dots are scattered across.
pub fn splatter_span(speed: f64) -> f64 {
    speed * 20.0
}

/// Number of sub-segments for a movement of length `distance`; never less than one.
pub fn step_count(distance: f64, step_length: f64) -> usize {
    ((distance / step_length).floor() as usize).max(1)
}

/// Synthesizes the commands for one movement.
///
/// Sub-points are generated walking from `to` back toward `from`: the first command starts at
/// `to`, and the last command ends exactly at `from`, drawn with `from_speed`. Splatter jitter is
/// drawn from `rng`, two deviates (x then y) per sub-segment.
pub fn synthesize_stroke<R: Random + ?Sized>(
    (from, to): (Point, Point),
    (from_speed, to_speed): (f64, f64),
    brush: BrushType,
    sampler: &ColorSampler<'_>,
    params: &StrokeParams,
    rng: &mut R,
) -> Vec<StrokeCommand> {
    let steps = step_count(dist(from, to), params.step_length);
    let mut commands = Vec::with_capacity(steps);
    let mut prev = to;
    for i in 0..steps {
        let alpha = (i + 1) as f64 / steps as f64;
        let speed = interpolate(from_speed, to_speed, alpha);
        let next = interpolate_point(from, to, alpha);
        let color = sampler.sample(next).with_alpha(params.alpha);
        commands.push(segment(prev, next, speed, color, brush, rng));
        prev = next;
    }
    tracing::trace!(?from, ?to, steps, ?brush, "synthesized stroke");
    commands
}

fn segment<R: Random + ?Sized>(
    prev: Point,
    next: Point,
    speed: f64,
    color: Rgba,
    brush: BrushType,
    rng: &mut R,
) -> StrokeCommand {
    if brush.is_splatter() {
        let half = splatter_span(speed) / 2.0;
        let dx = rng.uniform(-half, half) as i32;
        let dy = rng.uniform(-half, half) as i32;
        StrokeCommand::Splatter {
            center: next.offset(dx, dy),
            radius: splatter_radius(speed) as f32,
            color,
        }
    } else {
        StrokeCommand::Line {
            from: prev,
            to: next,
            width: line_width(speed) as f32,
            color,
            style: brush.line_style(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::Rect;
    use crate::rand::{Cycle, Rng};
    use crate::sample::coordinate_image;

    fn run(
        from: (i32, i32),
        to: (i32, i32),
        speeds: (f64, f64),
        brush: BrushType,
        rng: &mut impl Random,
    ) -> Vec<StrokeCommand> {
        let img = coordinate_image(200, 100);
        let sampler = ColorSampler::new(&img, Rect::new(0, 0, 200, 100)).unwrap();
        synthesize_stroke(
            (from.into(), to.into()),
            speeds,
            brush,
            &sampler,
            &StrokeParams::default(),
            rng,
        )
    }

    #[test]
    fn test_step_count() {
        const TEST_CASES: &[(f64, usize)] = &[
            (0.0, 1),
            (9.99, 1),
            (10.0, 1),
            (19.99, 1),
            (20.0, 2),
            (100.0, 10),
            (105.0, 10),
        ];
        for &(distance, want) in TEST_CASES {
            let got = step_count(distance, DEFAULT_STEP_LENGTH);
            if got != want {
                panic!("step_count({}): got {}, want {}", distance, got, want);
            }
        }
    }

    #[test]
    fn test_zero_length_stroke_emits_one_command() {
        for brush in [BrushType::Square, BrushType::Circle, BrushType::CircleSplatter] {
            let cmds = run((40, 40), (40, 40), (1.0, 1.0), brush, &mut Cycle::new(&[0.5]));
            assert_eq!(cmds.len(), 1, "{:?}", brush);
        }
        let cmds = run((40, 40), (40, 40), (1.0, 1.0), BrushType::Circle, &mut Rng::from_u64(0));
        assert_eq!(
            cmds[0],
            StrokeCommand::Line {
                from: Point::new(40, 40),
                to: Point::new(40, 40),
                width: 10.0,
                color: Rgba::new(40, 40, 0, DEFAULT_STROKE_ALPHA),
                style: LineStyle::Round,
            }
        );
    }

    #[test]
    fn test_distance_100_emits_ten_commands() {
        let cmds = run((0, 0), (60, 80), (1.0, 2.0), BrushType::Square, &mut Rng::from_u64(0));
        assert_eq!(cmds.len(), 10);
    }

    #[test]
    fn test_walks_from_to_back_toward_from() {
        let cmds = run((0, 0), (100, 0), (1.0, 1.0), BrushType::Square, &mut Rng::from_u64(0));
        let ends: Vec<(Point, Point)> = cmds
            .iter()
            .map(|c| match *c {
                StrokeCommand::Line { from, to, .. } => (from, to),
                StrokeCommand::Splatter { .. } => panic!("unexpected splatter"),
            })
            .collect();
        assert_eq!(ends.len(), 10);
        assert_eq!(ends[0], (Point::new(100, 0), Point::new(90, 0)));
        assert_eq!(ends[9].1, Point::new(0, 0));
        for pair in ends.windows(2) {
            assert_eq!(pair[0].1, pair[1].0, "segments must chain");
        }
    }

    #[test]
    fn test_speed_interpolation_direction() {
        // Last sub-segment carries `from_speed`, the first one is closest to `to_speed`.
        let cmds = run((0, 0), (20, 0), (3.0, 1.0), BrushType::Square, &mut Rng::from_u64(0));
        let widths: Vec<f32> = cmds
            .iter()
            .map(|c| match *c {
                StrokeCommand::Line { width, .. } => width,
                StrokeCommand::Splatter { .. } => panic!("unexpected splatter"),
            })
            .collect();
        assert_eq!(widths, vec![20.0, 30.0]);
    }

    #[test]
    fn test_color_sampled_at_sub_point_with_fixed_alpha() {
        let cmds = run((10, 10), (10, 50), (0.5, 4.0), BrushType::Circle, &mut Rng::from_u64(0));
        assert_eq!(cmds.len(), 4);
        let colors: Vec<Rgba> = cmds.iter().map(StrokeCommand::color).collect();
        assert_eq!(
            colors,
            vec![
                Rgba::new(10, 40, 0, DEFAULT_STROKE_ALPHA),
                Rgba::new(10, 30, 0, DEFAULT_STROKE_ALPHA),
                Rgba::new(10, 20, 0, DEFAULT_STROKE_ALPHA),
                Rgba::new(10, 10, 0, DEFAULT_STROKE_ALPHA),
            ]
        );
    }

    #[test]
    fn test_brush_sizes_at_speed_two() {
        for brush in [BrushType::Square, BrushType::Circle] {
            let cmds = run((5, 5), (5, 5), (2.0, 2.0), brush, &mut Rng::from_u64(0));
            match cmds[0] {
                StrokeCommand::Line { width, style, .. } => {
                    assert_eq!(width, 20.0);
                    assert_eq!(style, brush.line_style());
                }
                StrokeCommand::Splatter { .. } => panic!("unexpected splatter"),
            }
        }
        let cmds = run((5, 5), (5, 5), (2.0, 2.0), BrushType::CircleSplatter, &mut Cycle::new(&[0.5]));
        match cmds[0] {
            StrokeCommand::Splatter { radius, center, .. } => {
                assert!((radius - 10.0).abs() < 1e-6, "radius {}", radius);
                assert_eq!(center, Point::new(5, 5));
            }
            StrokeCommand::Line { .. } => panic!("expected splatter"),
        }
    }

    #[test]
    fn test_splatter_jitter_bounds() {
        // span = 2.0 * 20 = 40, so offsets come from [-20, 20).
        let cmds = run(
            (50, 50),
            (50, 50),
            (2.0, 2.0),
            BrushType::CircleSplatter,
            &mut Cycle::new(&[0.0, 0.75]),
        );
        match cmds[0] {
            StrokeCommand::Splatter { center, color, .. } => {
                assert_eq!(center, Point::new(30, 60));
                // Color comes from the sub-point, not the jittered center.
                assert_eq!(color, Rgba::new(50, 50, 0, DEFAULT_STROKE_ALPHA));
            }
            StrokeCommand::Line { .. } => panic!("expected splatter"),
        }

        let mut rng = Rng::from_u64(99);
        for _ in 0..200 {
            let cmds = run((100, 50), (160, 50), (2.0, 2.0), BrushType::CircleSplatter, &mut rng);
            for cmd in cmds {
                let StrokeCommand::Splatter { center, .. } = cmd else {
                    panic!("expected splatter");
                };
                assert!((80..=180).contains(&center.x), "{:?}", center);
                assert!((30..=70).contains(&center.y), "{:?}", center);
            }
        }
    }
}
