//! Interpolation for animatable values.
//!
//! The `Interpolate` trait is the mechanism behind every transition: an
//! in-flight animation holds a start and end value and asks for the blend at
//! the eased progress each frame.

use crate::transform::{CardPose, CardTransform};

/// Trait for values that can be blended between two endpoints.
pub trait Interpolate: Sized {
    /// Interpolate from self towards `to`.
    ///
    /// At t = 0.0 the result equals self, at t = 1.0 it equals `to`.
    fn interpolate(&self, to: &Self, t: f32) -> Self;
}

#[inline]
fn lerp_f64(from: f64, to: f64, t: f32) -> f64 {
    from + (to - from) * t as f64
}

#[inline]
fn lerp_f32(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

impl Interpolate for f64 {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        lerp_f64(*self, *to, t)
    }
}

impl Interpolate for f32 {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        lerp_f32(*self, *to, t)
    }
}

impl Interpolate for [f64; 3] {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        [
            lerp_f64(self[0], to[0], t),
            lerp_f64(self[1], to[1], t),
            lerp_f64(self[2], to[2], t),
        ]
    }
}

impl Interpolate for CardTransform {
    /// Componentwise blend of translation and scale.
    ///
    /// Exact because card transforms never carry rotation or skew.
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        Self {
            translate: self.translate.interpolate(&to.translate, t),
            scale: self.scale.interpolate(&to.scale, t),
        }
    }
}

impl Interpolate for CardPose {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        Self {
            transform: self.transform.interpolate(&to.transform, t),
            opacity: self.opacity.interpolate(&to.opacity, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_endpoints() {
        assert_eq!(0.0f64.interpolate(&10.0, 0.0), 0.0);
        assert_eq!(0.0f64.interpolate(&10.0, 1.0), 10.0);
        assert_eq!(0.0f64.interpolate(&10.0, 0.5), 5.0);
    }

    #[test]
    fn test_pose_endpoints() {
        let a = CardPose::faded(CardTransform::translate(100.0, 0.0, 0.0));
        let b = CardPose::rest(CardTransform::identity());
        assert_eq!(a.interpolate(&b, 0.0), a);
        assert_eq!(a.interpolate(&b, 1.0), b);
    }

    #[test]
    fn test_pose_midpoint() {
        let a = CardPose::faded(CardTransform::translate(100.0, 0.0, 0.0));
        let b = CardPose::rest(CardTransform::identity());
        let mid = a.interpolate(&b, 0.5);
        assert_eq!(mid.transform.translate, [50.0, 0.0, 0.0]);
        assert!((mid.opacity - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_transform_scale_blend() {
        let a = CardTransform::scale(1.0, 1.0, 1.0);
        let b = CardTransform::scale(0.98, 1.0, 1.0);
        let mid = a.interpolate(&b, 0.5);
        assert!((mid.scale[0] - 0.99).abs() < 1e-9);
    }
}
