//! cardstack-core: primitives for the stacked-card widget.
//!
//! This crate provides:
//! - **Transforms**: `CardTransform`, the translate/scale 3D affine transform
//!   applied to a card's render layer, and `CardPose`, the transform + opacity
//!   pair the deck animates as a unit
//! - **Stack layout**: `StackLayout`, the pure position → transform mapping
//!   for cards resting in the deck
//! - **Easing**: CSS-compatible timing curves for transitions
//! - **Interpolation**: the `Interpolate` trait used to blend poses
//!
//! Everything here is deterministic and free of side effects; the widget
//! runtime lives in `cardstack-deck`.

pub mod easing;
pub mod interpolate;
pub mod transform;

pub use easing::EasingFunction;
pub use interpolate::Interpolate;
pub use transform::{CardPose, CardTransform, StackLayout};
