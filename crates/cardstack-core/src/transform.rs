//! Card transforms and the resting stack layout.
//!
//! A card's layer is positioned with a 3D affine transform. The deck only
//! ever translates and scales cards, so the transform is stored decomposed
//! instead of as a full 4x4 matrix:
//!
//! ```text
//! | sx  0   0   tx |
//! | 0   sy  0   ty |
//! | 0   0   sz  tz |
//! | 0   0   0   1  |
//! ```
//!
//! Composition follows layer-transform conventions: `then_translate` and
//! `then_scale` post-multiply, i.e. they apply in the transform's local
//! space, so a horizontal offset added to a scaled-down card moves it less
//! than the same offset on an unscaled card.

use serde::{Deserialize, Serialize};

/// A 3D affine transform restricted to translation and scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardTransform {
    /// Translation along x, y, z, in points.
    pub translate: [f64; 3],
    /// Scale along x, y, z.
    pub scale: [f64; 3],
}

impl Default for CardTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl CardTransform {
    /// Create an identity transform (no change).
    pub fn identity() -> Self {
        Self {
            translate: [0.0; 3],
            scale: [1.0; 3],
        }
    }

    /// Create a translation transform.
    pub fn translate(tx: f64, ty: f64, tz: f64) -> Self {
        Self {
            translate: [tx, ty, tz],
            scale: [1.0; 3],
        }
    }

    /// Create a scale transform.
    pub fn scale(sx: f64, sy: f64, sz: f64) -> Self {
        Self {
            translate: [0.0; 3],
            scale: [sx, sy, sz],
        }
    }

    /// Apply a further translation in this transform's local space.
    ///
    /// The offset is multiplied by the current scale, matching the behavior
    /// of post-multiplying a layer transform with a translation matrix.
    pub fn then_translate(mut self, dx: f64, dy: f64, dz: f64) -> Self {
        self.translate[0] += self.scale[0] * dx;
        self.translate[1] += self.scale[1] * dy;
        self.translate[2] += self.scale[2] * dz;
        self
    }

    /// Apply a further scale in this transform's local space.
    pub fn then_scale(mut self, sx: f64, sy: f64, sz: f64) -> Self {
        self.scale[0] *= sx;
        self.scale[1] *= sy;
        self.scale[2] *= sz;
        self
    }

    /// Check whether this is the identity transform.
    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// The transform as a column-major 4x4 matrix, ready for a render layer.
    pub fn matrix(&self) -> [[f64; 4]; 4] {
        let [tx, ty, tz] = self.translate;
        let [sx, sy, sz] = self.scale;
        [
            [sx, 0.0, 0.0, 0.0],
            [0.0, sy, 0.0, 0.0],
            [0.0, 0.0, sz, 0.0],
            [tx, ty, tz, 1.0],
        ]
    }

    /// Transform a point.
    pub fn apply_point(&self, x: f64, y: f64, z: f64) -> [f64; 3] {
        [
            self.scale[0] * x + self.translate[0],
            self.scale[1] * y + self.translate[1],
            self.scale[2] * z + self.translate[2],
        ]
    }
}

/// The transform + opacity pair applied to a card's layer.
///
/// Poses are the unit of animation: transitions interpolate between a start
/// pose and an end pose, and gestures produce one pose per visible card per
/// input event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardPose {
    /// The layer transform.
    pub transform: CardTransform,
    /// The layer opacity, 0.0 (invisible) to 1.0 (opaque).
    pub opacity: f32,
}

impl Default for CardPose {
    fn default() -> Self {
        Self::rest(CardTransform::identity())
    }
}

impl CardPose {
    /// A fully opaque pose with the given transform.
    pub fn rest(transform: CardTransform) -> Self {
        Self {
            transform,
            opacity: 1.0,
        }
    }

    /// A fully transparent pose with the given transform.
    pub fn faded(transform: CardTransform) -> Self {
        Self {
            transform,
            opacity: 0.0,
        }
    }
}

/// The resting layout of the deck: a pure mapping from front-to-back stack
/// position to the transform a card holds while nothing is in flight.
///
/// Position 0 is the top/front card and sits untransformed. Each position
/// behind it is nudged down by `increment_y` and narrowed by `scale_x`,
/// producing the perspective-like fan. Positions at or beyond
/// `visible_depth` are left at identity: they are hidden behind the fan, so
/// computing distinct transforms for them would be wasted work.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackLayout {
    /// Horizontal scale removed per position (card at position p is scaled
    /// by `1 - scale_x * p` on the x axis).
    pub scale_x: f64,
    /// Vertical offset added per position, in points.
    pub increment_y: f64,
    /// Positions at or beyond this depth keep the identity transform.
    pub visible_depth: usize,
}

impl Default for StackLayout {
    fn default() -> Self {
        Self {
            scale_x: 0.01,
            increment_y: 8.0,
            visible_depth: 3,
        }
    }
}

impl StackLayout {
    /// The resting transform for a card at the given front-to-back position.
    pub fn transform_for_position(&self, position: usize) -> CardTransform {
        if position >= self.visible_depth {
            return CardTransform::identity();
        }
        let p = position as f64;
        CardTransform::identity()
            .then_translate(0.0, self.increment_y * p, 0.0)
            .then_scale(1.0 - self.scale_x * p, 1.0, 1.0)
    }

    /// The resting pose (opaque) for a card at the given position.
    pub fn pose_for_position(&self, position: usize) -> CardPose {
        CardPose::rest(self.transform_for_position(position))
    }
}
