use crate::error::PaintError;

/// An integer position in canvas space.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Point::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Point::new(x, y)
    }
}

/// Euclidean distance between two points.
pub fn dist(from: Point, to: Point) -> f64 {
    let dx = f64::from(to.x) - f64::from(from.x);
    let dy = f64::from(to.y) - f64::from(from.y);
    (dx * dx + dy * dy).sqrt()
}

/// Blends `u` and `v` so that `alpha == 0.0` yields `v` and `alpha == 1.0` yields `u`.
///
/// Note the argument order: the *first* argument is the one weighted by `alpha`. Stroke synthesis
/// depends on this ordering, so don't "fix" it.
pub fn interpolate(u: f64, v: f64, alpha: f64) -> f64 {
    u * alpha + v * (1.0 - alpha)
}

/// Componentwise [`interpolate`], truncated toward zero.
pub fn interpolate_point(from: Point, to: Point, alpha: f64) -> Point {
    Point::new(
        interpolate(f64::from(from.x), f64::from(to.x), alpha) as i32,
        interpolate(f64::from(from.y), f64::from(to.y), alpha) as i32,
    )
}

/// Pointer speed in canvas units per millisecond.
///
/// Fails with [`PaintError::DivisionByZero`] when both samples share a timestamp, and with
/// [`PaintError::TimeWentBackwards`] when `delta_ms` is negative.
pub fn speed(from: Point, to: Point, delta_ms: i64) -> Result<f64, PaintError> {
    match delta_ms {
        0 => Err(PaintError::DivisionByZero),
        d if d < 0 => Err(PaintError::TimeWentBackwards {
            delta_ms: d.unsigned_abs(),
        }),
        d => Ok(dist(from, to) / d as f64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dist() {
        const TEST_CASES: &[((i32, i32), (i32, i32), f64)] = &[
            ((0, 0), (0, 0), 0.0),
            ((0, 0), (3, 4), 5.0),
            ((-3, -4), (0, 0), 5.0),
            ((10, 20), (15, 32), 13.0),
            ((7, 7), (7, 107), 100.0),
        ];
        for &(a, b, want) in TEST_CASES {
            let got = dist(a.into(), b.into());
            if got != want {
                panic!("dist({:?}, {:?}): got {}, want {}", a, b, got, want);
            }
            assert_eq!(dist(b.into(), a.into()), got, "dist must be symmetric");
        }
    }

    #[test]
    fn test_dist_to_self_is_zero() {
        for p in [(0, 0), (1, -1), (i32::MAX, i32::MIN), (-250, 4000)] {
            assert_eq!(dist(p.into(), p.into()), 0.0);
        }
    }

    #[test]
    fn test_interpolate_endpoints() {
        for &(u, v) in &[(0.0, 1.0), (3.5, -2.0), (1e9, 7.0), (-4.0, -4.0)] {
            assert_eq!(interpolate(u, v, 0.0), v);
            assert_eq!(interpolate(u, v, 1.0), u);
        }
        assert_eq!(interpolate(10.0, 20.0, 0.25), 17.5);
    }

    #[test]
    fn test_interpolate_point_truncates() {
        let from = Point::new(0, 0);
        let to = Point::new(10, -10);
        // alpha weights `from`, so alpha = 0.25 lands three quarters of the way to `to`.
        assert_eq!(interpolate_point(from, to, 0.25), Point::new(7, -7));
        assert_eq!(interpolate_point(from, to, 1.0), from);
        assert_eq!(interpolate_point(from, to, 0.0), to);
        assert_eq!(
            interpolate_point(Point::new(1, 1), Point::new(2, 2), 0.5),
            Point::new(1, 1)
        );
    }

    #[test]
    fn test_speed() {
        assert_eq!(speed(Point::new(0, 0), Point::new(30, 40), 10), Ok(5.0));
        assert_eq!(speed(Point::new(5, 5), Point::new(5, 5), 16), Ok(0.0));
        assert_eq!(
            speed(Point::new(0, 0), Point::new(1, 1), 0),
            Err(PaintError::DivisionByZero)
        );
        assert_eq!(
            speed(Point::new(0, 0), Point::new(1, 1), -5),
            Err(PaintError::TimeWentBackwards { delta_ms: 5 })
        );
        assert_eq!(
            speed(Point::new(0, 0), Point::new(1, 1), i64::MIN),
            Err(PaintError::TimeWentBackwards {
                delta_ms: 1 << 63
            })
        );
    }
}
