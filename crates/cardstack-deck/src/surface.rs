//! The render-layer collaborator.

use cardstack_core::CardPose;

use crate::stack::CardId;

/// A rendering surface that can host card elements.
///
/// The deck owns all pose computation and timing; the surface only needs to
/// add and remove elements and apply a transform/opacity pair. `set_pose`
/// is synchronous — animated motion is produced by the deck calling it with
/// interpolated poses on every update tick, so the surface's visual state
/// never diverges from the deck's logical state.
pub trait CardSurface {
    /// Add the card's element to the container at the given front-to-back
    /// position, pinned to the container's content margins.
    fn attach_card(&mut self, card: CardId, position: usize);

    /// Remove the card's element from the container.
    fn detach_card(&mut self, card: CardId);

    /// Apply a pose to the card's layer.
    fn set_pose(&mut self, card: CardId, pose: &CardPose);
}
