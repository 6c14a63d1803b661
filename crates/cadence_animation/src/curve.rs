//! Easing curves for animation progress shaping

use std::fmt;

/// Caller-supplied curve function mapping normalized time to progress.
pub type CurveFn = Box<dyn Fn(f64) -> f64>;

/// Shapes how the normalized time of a cycle maps to reported progress.
///
/// Named curves satisfy `f(0) = 0` and `f(1) = 1`. Curve output is delivered
/// to progress callbacks without clamping, so [`Curve::CubicBezier`] and
/// [`Curve::Custom`] curves may intentionally overshoot the unit range for
/// bounce and spring-back effects.
#[derive(Default)]
pub enum Curve {
    #[default]
    Linear,
    /// Slow start (zero derivative at `t = 0`).
    EaseIn,
    /// Slow finish (zero derivative at `t = 1`).
    EaseOut,
    /// Slow at both ends, faster in the middle.
    EaseInOut,
    /// CSS-style cubic bezier through `(0,0)`, `(x1,y1)`, `(x2,y2)`, `(1,1)`.
    CubicBezier(f64, f64, f64, f64),
    /// Arbitrary shaping function.
    Custom(CurveFn),
}

impl Curve {
    /// Apply the curve to a normalized time value (0.0 to 1.0).
    pub fn apply(&self, t: f64) -> f64 {
        match self {
            Curve::Linear => t,
            Curve::EaseIn => t * t * t,
            Curve::EaseOut => 1.0 - (1.0 - t).powi(3),
            Curve::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Curve::CubicBezier(x1, y1, x2, y2) => cubic_bezier(t, *x1, *y1, *x2, *y2),
            Curve::Custom(f) => f(t),
        }
    }

    /// Wrap an arbitrary shaping function.
    pub fn custom(f: impl Fn(f64) -> f64 + 'static) -> Self {
        Curve::Custom(Box::new(f))
    }
}

impl fmt::Debug for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Curve::Linear => write!(f, "Linear"),
            Curve::EaseIn => write!(f, "EaseIn"),
            Curve::EaseOut => write!(f, "EaseOut"),
            Curve::EaseInOut => write!(f, "EaseInOut"),
            Curve::CubicBezier(x1, y1, x2, y2) => {
                write!(f, "CubicBezier({x1}, {y1}, {x2}, {y2})")
            }
            Curve::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// CSS-style cubic bezier: find the parameter whose x coordinate matches the
/// input time, then report the y coordinate there.
///
/// Control x values in `[0,1]` make the x polynomial monotonic, so plain
/// bisection always converges. Evaluated in f64 to keep per-frame output
/// jitter-free.
fn cubic_bezier(t: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    // Endpoints are exact regardless of control points.
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
    let mut p = t;
    for _ in 0..48 {
        let x = bezier_axis(p, x1, x2);
        if (x - t).abs() < 1e-7 {
            break;
        }
        if x < t {
            lo = p;
        } else {
            hi = p;
        }
        p = 0.5 * (lo + hi);
    }
    bezier_axis(p, y1, y2)
}

/// One-dimensional cubic bezier with endpoints pinned at 0 and 1.
fn bezier_axis(p: f64, c1: f64, c2: f64) -> f64 {
    let u = 1.0 - p;
    3.0 * u * u * p * c1 + 3.0 * u * p * p * c2 + p * p * p
}
