//! Animated card transitions.
//!
//! The engine owns every in-flight pose animation. Callers start a
//! transition with a start pose, an end pose and a spec; the driving loop
//! advances the engine with `update(delta_ms)`, reads the per-frame poses
//! off `animating_poses`, and drains completion events afterwards. Each
//! transition is identified by a `TransitionToken` that appears in exactly
//! one `Finished` event.
//!
//! A card is either at rest or animating one transition. Starting a second
//! transition on an animating card is a programming defect in the caller
//! and panics; transitions on distinct cards are independent. In-flight
//! transitions cannot be cancelled — a known gap, acceptable because every
//! deck transition is short and the facade serializes the operations that
//! start them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use cardstack_core::{CardPose, CardTransform, EasingFunction, Interpolate};
use serde::{Deserialize, Serialize};

use crate::events::{EventQueue, TransitionEvent};
use crate::stack::CardId;

/// Unique identifier for one transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransitionToken(pub u64);

impl TransitionToken {
    /// Generate a new unique token.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for TransitionToken {
    fn default() -> Self {
        Self::new()
    }
}

/// The role a transition plays in the deck choreography.
///
/// The kind does not change how the animation runs — every transition
/// interpolates pose to pose — but the facade dispatches on it when the
/// completion event arrives: `Out` recycles the dismissed card, `OutRight`
/// chains into the move-to-front splice, entries re-arm the drag listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    /// A recycled card slides in at the back of the stack.
    InFromBottom,
    /// A card slides in from the right edge to the front.
    InFromRight,
    /// A card slides in from the left edge to the front.
    InFromLeft,
    /// A card drops in from above to the front.
    InFromTop,
    /// The top card flies off to the right and leaves the stack.
    Out,
    /// A card flies off to the right without leaving the stack; first half
    /// of the move-to-front sequence.
    OutRight,
    /// A card returns to its resting stack pose (snap-back and reflow).
    Settle,
}

impl TransitionKind {
    /// Whether this kind brings a card into the stack.
    pub fn is_entry(&self) -> bool {
        matches!(
            self,
            Self::InFromBottom | Self::InFromRight | Self::InFromLeft | Self::InFromTop
        )
    }

    /// Whether this kind carries a card off screen.
    pub fn is_exit(&self) -> bool {
        matches!(self, Self::Out | Self::OutRight)
    }

    /// The direction an entering card starts from, as a unit offset.
    ///
    /// `None` for non-entry kinds. The recycled back-of-stack entry comes in
    /// from the right edge like a front entry, just at the back position's
    /// transform.
    fn entry_direction(&self) -> Option<(f64, f64)> {
        match self {
            Self::InFromBottom | Self::InFromRight => Some((1.0, 0.0)),
            Self::InFromLeft => Some((-1.0, 0.0)),
            Self::InFromTop => Some((0.0, -1.0)),
            Self::Out | Self::OutRight | Self::Settle => None,
        }
    }

    /// Start and end poses for an entry transition landing on `rest`.
    ///
    /// The card starts fully transparent, offset off screen by
    /// `exit_offset` in the kind's direction (in the rest transform's local
    /// space), and ends opaque at `rest`. `None` for non-entry kinds.
    pub fn entry_poses(
        &self,
        rest: CardTransform,
        exit_offset: f64,
    ) -> Option<(CardPose, CardPose)> {
        let (dx, dy) = self.entry_direction()?;
        let start = CardPose::faded(rest.then_translate(dx * exit_offset, dy * exit_offset, 0.0));
        Some((start, CardPose::rest(rest)))
    }
}

/// Timing for a transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionSpec {
    /// Duration in milliseconds.
    pub duration_ms: f32,
    /// Easing curve.
    pub easing: EasingFunction,
}

impl Default for TransitionSpec {
    fn default() -> Self {
        Self {
            duration_ms: 200.0,
            easing: EasingFunction::EaseOut,
        }
    }
}

impl TransitionSpec {
    pub fn new(duration_ms: f32) -> Self {
        Self {
            duration_ms,
            ..Self::default()
        }
    }

    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }
}

/// Runtime state of one in-flight transition.
#[derive(Debug, Clone)]
pub struct ActiveCardTransition {
    pub token: TransitionToken,
    pub card: CardId,
    pub kind: TransitionKind,
    pub from: CardPose,
    pub to: CardPose,
    pub duration_ms: f32,
    pub easing: EasingFunction,
    elapsed_ms: f32,
    finished: bool,
}

impl ActiveCardTransition {
    fn new(card: CardId, kind: TransitionKind, from: CardPose, to: CardPose, spec: &TransitionSpec) -> Self {
        Self {
            token: TransitionToken::new(),
            card,
            kind,
            from,
            to,
            duration_ms: spec.duration_ms,
            easing: spec.easing,
            elapsed_ms: 0.0,
            finished: false,
        }
    }

    /// Advance by `delta_ms`. Returns `true` while still running.
    fn update(&mut self, delta_ms: f32) -> bool {
        if self.finished {
            return false;
        }
        self.elapsed_ms += delta_ms;
        if self.elapsed_ms >= self.duration_ms {
            self.finished = true;
            return false;
        }
        true
    }

    /// Linear progress, 0.0 to 1.0.
    pub fn progress(&self) -> f32 {
        if self.duration_ms > 0.0 {
            (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    /// The pose at the current eased progress. Exactly `to` once finished.
    pub fn current_pose(&self) -> CardPose {
        if self.finished {
            return self.to;
        }
        let eased = self.easing.evaluate(self.progress());
        self.from.interpolate(&self.to, eased)
    }
}

/// Owns and advances every in-flight card transition.
#[derive(Debug, Default)]
pub struct TransitionEngine {
    /// Active transitions by token.
    active: HashMap<TransitionToken, ActiveCardTransition>,
    /// Token of the transition animating each card. At most one per card.
    card_index: HashMap<CardId, TransitionToken>,
    events: EventQueue<TransitionEvent>,
}

impl TransitionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start animating `card` from one pose to another.
    ///
    /// # Panics
    ///
    /// Panics if the card already has a transition in flight; callers must
    /// let a card reach rest before starting its next transition.
    pub fn start(
        &mut self,
        card: CardId,
        kind: TransitionKind,
        from: CardPose,
        to: CardPose,
        spec: &TransitionSpec,
    ) -> TransitionToken {
        if let Some(token) = self.card_index.get(&card) {
            let current = &self.active[token];
            panic!(
                "card {card:?} already has a {:?} transition in flight; \
                 cannot start {kind:?}",
                current.kind
            );
        }

        let transition = ActiveCardTransition::new(card, kind, from, to, spec);
        let token = transition.token;
        self.events.push(TransitionEvent::Started { token, card, kind });
        self.card_index.insert(card, token);
        self.active.insert(token, transition);
        token
    }

    /// Advance all transitions by `delta_ms` milliseconds.
    ///
    /// Finished transitions are removed and reported once via a `Finished`
    /// event carrying their guaranteed end pose.
    pub fn update(&mut self, delta_ms: f32) {
        if self.active.is_empty() {
            return;
        }

        let mut finished = Vec::new();
        for (token, transition) in self.active.iter_mut() {
            if !transition.update(delta_ms) {
                finished.push(*token);
            }
        }
        // Report in start order so chained completions stay deterministic.
        finished.sort_by_key(|token| token.0);

        for token in finished {
            if let Some(transition) = self.active.remove(&token) {
                self.card_index.remove(&transition.card);
                self.events.push(TransitionEvent::Finished {
                    token,
                    card: transition.card,
                    kind: transition.kind,
                    final_pose: transition.to,
                });
            }
        }
    }

    /// Current pose of every animating card.
    pub fn animating_poses(&self) -> impl Iterator<Item = (CardId, CardPose)> + '_ {
        self.active
            .values()
            .map(|transition| (transition.card, transition.current_pose()))
    }

    /// Whether the given card has a transition in flight.
    pub fn is_animating(&self, card: CardId) -> bool {
        self.card_index.contains_key(&card)
    }

    /// Whether any transition is in flight.
    pub fn has_active(&self) -> bool {
        !self.active.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Look up an in-flight transition.
    pub fn transition(&self, token: TransitionToken) -> Option<&ActiveCardTransition> {
        self.active.get(&token)
    }

    /// Drain all pending lifecycle events in arrival order.
    pub fn drain_events(&mut self) -> impl Iterator<Item = TransitionEvent> + '_ {
        self.events.drain()
    }

    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Drop every transition and pending event.
    pub fn clear(&mut self) {
        self.active.clear();
        self.card_index.clear();
        self.events.clear();
    }
}

static_assertions::assert_impl_all!(TransitionEngine: Send);

#[cfg(test)]
mod tests {
    use super::*;
    use cardstack_core::CardTransform;

    fn poses() -> (CardPose, CardPose) {
        (
            CardPose::faded(CardTransform::translate(400.0, 0.0, 0.0)),
            CardPose::rest(CardTransform::identity()),
        )
    }

    #[test]
    fn test_start_and_progress() {
        let mut engine = TransitionEngine::new();
        let (from, to) = poses();
        let spec = TransitionSpec::new(100.0).with_easing(EasingFunction::Linear);
        let token = engine.start(CardId(1), TransitionKind::InFromRight, from, to, &spec);

        assert!(engine.is_animating(CardId(1)));
        assert_eq!(engine.active_count(), 1);

        engine.update(50.0);
        let transition = engine.transition(token).unwrap();
        let pose = transition.current_pose();
        assert!((pose.transform.translate[0] - 200.0).abs() < 1e-6);
        assert!((pose.opacity - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_completion_is_reported_once() {
        let mut engine = TransitionEngine::new();
        let (from, to) = poses();
        let token = engine.start(
            CardId(1),
            TransitionKind::Out,
            from,
            to,
            &TransitionSpec::new(100.0),
        );

        engine.update(150.0);
        assert!(!engine.is_animating(CardId(1)));

        let events: Vec<_> = engine.drain_events().collect();
        let finished: Vec<_> = events
            .iter()
            .filter(|event| matches!(event, TransitionEvent::Finished { .. }))
            .collect();
        assert_eq!(finished.len(), 1);
        assert_eq!(finished[0].token(), token);

        // Further updates report nothing new.
        engine.update(100.0);
        assert!(engine.drain_events().next().is_none());
    }

    #[test]
    fn test_finished_event_carries_end_pose() {
        let mut engine = TransitionEngine::new();
        let (from, to) = poses();
        engine.start(
            CardId(1),
            TransitionKind::Settle,
            from,
            to,
            &TransitionSpec::new(50.0),
        );
        engine.update(60.0);

        let finished = engine
            .drain_events()
            .find_map(|event| match event {
                TransitionEvent::Finished { final_pose, .. } => Some(final_pose),
                _ => None,
            })
            .unwrap();
        assert_eq!(finished, to);
    }

    #[test]
    fn test_zero_duration_finishes_on_first_update() {
        let mut engine = TransitionEngine::new();
        let (from, to) = poses();
        engine.start(
            CardId(1),
            TransitionKind::Settle,
            from,
            to,
            &TransitionSpec::new(0.0),
        );
        engine.update(0.0);
        assert!(!engine.has_active());
    }

    #[test]
    #[should_panic(expected = "already has a")]
    fn test_double_start_panics() {
        let mut engine = TransitionEngine::new();
        let (from, to) = poses();
        let spec = TransitionSpec::default();
        engine.start(CardId(1), TransitionKind::Out, from, to, &spec);
        engine.start(CardId(1), TransitionKind::Settle, from, to, &spec);
    }

    #[test]
    fn test_independent_cards() {
        let mut engine = TransitionEngine::new();
        let (from, to) = poses();
        engine.start(CardId(1), TransitionKind::Settle, from, to, &TransitionSpec::new(50.0));
        engine.start(CardId(2), TransitionKind::Settle, from, to, &TransitionSpec::new(200.0));

        engine.update(100.0);
        assert!(!engine.is_animating(CardId(1)));
        assert!(engine.is_animating(CardId(2)));
    }

    #[test]
    fn test_completion_order_follows_start_order() {
        let mut engine = TransitionEngine::new();
        let (from, to) = poses();
        let first = engine.start(CardId(1), TransitionKind::Settle, from, to, &TransitionSpec::new(50.0));
        let second = engine.start(CardId(2), TransitionKind::Settle, from, to, &TransitionSpec::new(50.0));

        engine.update(60.0);
        let finished: Vec<_> = engine
            .drain_events()
            .filter(|event| matches!(event, TransitionEvent::Finished { .. }))
            .map(|event| event.token())
            .collect();
        assert_eq!(finished, vec![first, second]);
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut engine = TransitionEngine::new();
        let (from, to) = poses();
        engine.start(CardId(1), TransitionKind::Out, from, to, &TransitionSpec::default());
        engine.clear();
        assert!(!engine.has_active());
        assert!(!engine.has_pending_events());
    }

    #[test]
    fn test_entry_poses_per_direction() {
        let rest = CardTransform::identity();
        let offset = 420.0;

        let (from, to) = TransitionKind::InFromRight.entry_poses(rest, offset).unwrap();
        assert_eq!(from.transform.translate, [420.0, 0.0, 0.0]);
        assert_eq!(from.opacity, 0.0);
        assert_eq!(to, CardPose::rest(rest));

        let (from, _) = TransitionKind::InFromLeft.entry_poses(rest, offset).unwrap();
        assert_eq!(from.transform.translate, [-420.0, 0.0, 0.0]);

        let (from, _) = TransitionKind::InFromTop.entry_poses(rest, offset).unwrap();
        assert_eq!(from.transform.translate, [0.0, -420.0, 0.0]);

        assert!(TransitionKind::Out.entry_poses(rest, offset).is_none());
        assert!(TransitionKind::Settle.entry_poses(rest, offset).is_none());
    }

    #[test]
    fn test_entry_offset_is_scaled_by_the_rest_transform() {
        // A back-of-stack entry starts from a narrowed transform, so the
        // off-screen offset shrinks with it.
        let rest = CardTransform::identity()
            .then_translate(0.0, 16.0, 0.0)
            .then_scale(0.98, 1.0, 1.0);
        let (from, _) = TransitionKind::InFromBottom.entry_poses(rest, 100.0).unwrap();
        assert!((from.transform.translate[0] - 98.0).abs() < 1e-9);
        assert_eq!(from.transform.translate[1], 16.0);
    }

    #[test]
    fn test_spec_serde_round_trip() {
        let spec = TransitionSpec::new(250.0).with_easing(EasingFunction::EaseInOut);
        let json = serde_json::to_string(&spec).unwrap();
        let parsed: TransitionSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(spec, parsed);
    }
}
