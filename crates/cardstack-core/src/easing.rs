//! Easing functions for transition timing.
//!
//! CSS-compatible timing curves:
//! - Linear
//! - EaseIn, EaseOut, EaseInOut (the standard named bezier curves)
//! - CubicBezier (custom control points)
//!
//! The deck defaults to `EaseOut`: dismissals and entries start fast and
//! decelerate into their final pose.

use serde::{Deserialize, Serialize};

/// Easing function mapping linear progress (0.0 to 1.0) to eased progress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EasingFunction {
    /// Linear interpolation (no easing).
    Linear,

    /// Slow start, accelerating.
    /// Equivalent to `cubic-bezier(0.42, 0, 1, 1)`.
    EaseIn,

    /// Fast start, decelerating.
    /// Equivalent to `cubic-bezier(0, 0, 0.58, 1)`.
    EaseOut,

    /// Slow start and end, fast middle.
    /// Equivalent to `cubic-bezier(0.42, 0, 0.58, 1)`.
    EaseInOut,

    /// Custom cubic bezier curve with control points (x1, y1) and (x2, y2).
    /// x values must be in [0, 1].
    CubicBezier { x1: f32, y1: f32, x2: f32, y2: f32 },
}

impl Default for EasingFunction {
    fn default() -> Self {
        Self::EaseOut
    }
}

impl EasingFunction {
    /// Create a custom cubic bezier easing function.
    pub fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self::CubicBezier { x1, y1, x2, y2 }
    }

    /// Evaluate the easing function at the given progress.
    ///
    /// Input is clamped to [0, 1]. Output is 0 at 0 and 1 at 1 for every
    /// curve; between the endpoints bezier curves may overshoot.
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => bezier(0.42, 0.0, 1.0, 1.0, t),
            Self::EaseOut => bezier(0.0, 0.0, 0.58, 1.0, t),
            Self::EaseInOut => bezier(0.42, 0.0, 0.58, 1.0, t),
            Self::CubicBezier { x1, y1, x2, y2 } => bezier(*x1, *y1, *x2, *y2, t),
        }
    }
}

/// Evaluate a cubic bezier timing curve at progress `x`.
///
/// The curve runs from (0, 0) to (1, 1) with control points (x1, y1) and
/// (x2, y2); `x` is curve-time progress and the result is the y value at the
/// parameter where the curve's x equals the input.
fn bezier(x1: f32, y1: f32, x2: f32, y2: f32, x: f32) -> f32 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let u = solve_curve_x(x1, x2, x);
    sample(y1, y2, u)
}

/// Sample one axis of the bezier at parameter `u`.
#[inline]
fn sample(p1: f32, p2: f32, u: f32) -> f32 {
    // Polynomial form with implicit endpoints 0 and 1.
    let c = 3.0 * p1;
    let b = 3.0 * (p2 - p1) - c;
    let a = 1.0 - c - b;
    ((a * u + b) * u + c) * u
}

#[inline]
fn sample_derivative(p1: f32, p2: f32, u: f32) -> f32 {
    let c = 3.0 * p1;
    let b = 3.0 * (p2 - p1) - c;
    let a = 1.0 - c - b;
    (3.0 * a * u + 2.0 * b) * u + c
}

/// Find the curve parameter whose x coordinate equals `x`.
///
/// Newton-Raphson with a bisection fallback for flat derivatives.
fn solve_curve_x(x1: f32, x2: f32, x: f32) -> f32 {
    let mut u = x;
    for _ in 0..8 {
        let err = sample(x1, x2, u) - x;
        if err.abs() < 1e-5 {
            return u;
        }
        let d = sample_derivative(x1, x2, u);
        if d.abs() < 1e-6 {
            break;
        }
        u -= err / d;
    }

    let mut lo = 0.0f32;
    let mut hi = 1.0f32;
    u = x;
    while hi - lo > 1e-5 {
        let err = sample(x1, x2, u) - x;
        if err > 0.0 {
            hi = u;
        } else {
            lo = u;
        }
        u = (lo + hi) / 2.0;
    }
    u
}
