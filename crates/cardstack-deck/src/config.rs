//! Deck configuration.

use cardstack_core::StackLayout;
use serde::{Deserialize, Serialize};

use crate::transition::TransitionSpec;

/// Tunables for the deck: geometry, gesture threshold, layout and timing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    /// Width of a card in points. Drag percentages and off-screen offsets
    /// are derived from it.
    pub card_width: f64,
    /// Extra distance past the card width used for off-screen exit and
    /// entry poses, so a card clears the container edge entirely.
    pub exit_overshoot: f64,
    /// Fraction of the card width a rightward drag must exceed (strictly)
    /// to commit a dismissal.
    pub commit_threshold: f64,
    /// The resting stack layout.
    pub layout: StackLayout,
    /// Timing applied to every deck transition.
    pub transition: TransitionSpec,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            card_width: 320.0,
            exit_overshoot: 100.0,
            commit_threshold: 0.35,
            layout: StackLayout::default(),
            transition: TransitionSpec::default(),
        }
    }
}

impl DeckConfig {
    /// Horizontal distance that puts a card fully off screen.
    pub fn exit_offset(&self) -> f64 {
        self.card_width + self.exit_overshoot
    }
}
