//! Drag tracking for the top card.
//!
//! The tracker is a small state machine:
//! - `Idle → Tracking` when a drag begins on the armed (top) card
//! - `Tracking → Resolving` when the drag ends, is cancelled, or fails
//! - `Resolving → Idle` once the outcome is decided: past the commit
//!   threshold the dragged card is dismissed, otherwise every card snaps
//!   back to its resting pose
//!
//! While tracking, the dragged card follows the finger horizontally and the
//! cards beneath it creep up toward the vacated top slot, with the effect
//! falling off by depth.

use cardstack_core::{CardPose, CardTransform, StackLayout};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::DeckConfig;
use crate::stack::CardId;

/// Phase of a drag event delivered by the input collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragPhase {
    Began,
    Changed,
    Ended,
    Cancelled,
    Failed,
}

/// One drag input event: a phase plus the translation of the pointer
/// relative to the dragged element, in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragEvent {
    pub phase: DragPhase,
    pub translation: [f64; 2],
}

impl DragEvent {
    pub fn new(phase: DragPhase, translation: [f64; 2]) -> Self {
        Self { phase, translation }
    }
}

/// Observable tracker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GesturePhase {
    #[default]
    Idle,
    Tracking,
    Resolving,
}

/// The ephemeral state of one active drag.
#[derive(Debug, Clone, Copy)]
struct GestureSession {
    card: CardId,
    dx: f64,
}

/// Outcome of a finished drag.
#[derive(Debug, Clone, PartialEq)]
pub enum DragResolution {
    /// The drag passed the commit threshold: dismiss the dragged card,
    /// starting from its dragged-out pose.
    Commit { card: CardId, dx: f64 },
    /// Below the threshold (or cancelled): every visible card animates back
    /// to its resting pose from the listed dragged poses.
    SnapBack { poses: Vec<(usize, CardPose)> },
}

/// Tracks at most one drag on the top card and turns drag input into poses.
#[derive(Debug)]
pub struct GestureTracker {
    layout: StackLayout,
    card_width: f64,
    commit_threshold: f64,
    phase: GesturePhase,
    session: Option<GestureSession>,
}

impl GestureTracker {
    pub fn new(config: &DeckConfig) -> Self {
        Self {
            layout: config.layout,
            card_width: config.card_width,
            commit_threshold: config.commit_threshold,
            phase: GesturePhase::Idle,
            session: None,
        }
    }

    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    /// The card currently being dragged, if any.
    pub fn active_card(&self) -> Option<CardId> {
        self.session.map(|session| session.card)
    }

    /// Start tracking a drag on the given card.
    ///
    /// A second drag while one is in flight is ignored: only one pointer is
    /// tracked at a time.
    pub fn begin(&mut self, card: CardId) {
        if self.phase != GesturePhase::Idle {
            warn!(?card, "ignoring drag begin while a drag is already tracked");
            return;
        }
        self.phase = GesturePhase::Tracking;
        self.session = Some(GestureSession { card, dx: 0.0 });
    }

    /// Record a drag movement and produce the pose of every visible card.
    ///
    /// Returns an empty list when no drag is tracked.
    pub fn drag_update(
        &mut self,
        translation: [f64; 2],
        stack_len: usize,
    ) -> Vec<(usize, CardPose)> {
        let Some(session) = self.session.as_mut() else {
            warn!("drag update with no tracked drag");
            return Vec::new();
        };
        session.dx = translation[0];
        self.frame_poses(stack_len)
    }

    /// Finish the drag and decide its outcome.
    ///
    /// `can_commit` is false for cancelled/failed gestures, which always
    /// snap back regardless of distance. Returns `None` when no drag was
    /// being tracked.
    pub fn resolve(
        &mut self,
        translation: [f64; 2],
        stack_len: usize,
        can_commit: bool,
    ) -> Option<DragResolution> {
        let session = self.session?;
        self.phase = GesturePhase::Resolving;

        let dx = translation[0];
        // The threshold is signed and exclusive: only a rightward drag past
        // 35% of the card width commits.
        let resolution = if can_commit && dx / self.card_width > self.commit_threshold {
            DragResolution::Commit {
                card: session.card,
                dx,
            }
        } else {
            self.session = Some(GestureSession { dx, ..session });
            DragResolution::SnapBack {
                poses: self.frame_poses(stack_len),
            }
        };

        self.session = None;
        self.phase = GesturePhase::Idle;
        Some(resolution)
    }

    /// Drop any tracked drag without resolving it.
    pub fn reset(&mut self) {
        self.session = None;
        self.phase = GesturePhase::Idle;
    }

    /// The pose of every visible card for the current drag displacement.
    ///
    /// Position 0 follows the pointer as a pure horizontal translation. Each
    /// deeper position p gets its resting transform pulled up by
    /// `increment_y * pct` where `pct = clamp(|dx| / width * 2 / p, 0, 1)`.
    /// Position 0 is excluded from that loop, which also keeps the division
    /// by p well-defined; the raw-p denominator makes the falloff steep and
    /// is kept as the deck's characteristic feel.
    fn frame_poses(&self, stack_len: usize) -> Vec<(usize, CardPose)> {
        let Some(session) = self.session else {
            return Vec::new();
        };
        let dx = session.dx;

        let mut poses = Vec::with_capacity(stack_len);
        if stack_len == 0 {
            return poses;
        }
        poses.push((0, CardPose::rest(CardTransform::translate(dx, 0.0, 0.0))));
        for p in 1..stack_len {
            let pct = (dx.abs() / self.card_width * 2.0 / p as f64).clamp(0.0, 1.0);
            let transform = self
                .layout
                .transform_for_position(p)
                .then_translate(0.0, -(self.layout.increment_y * pct), 0.0);
            poses.push((p, CardPose::rest(transform)));
        }
        poses
    }
}
