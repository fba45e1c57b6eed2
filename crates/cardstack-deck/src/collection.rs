//! The card collection facade.
//!
//! `CardCollection` composes the stack state, gesture tracker and transition
//! engine behind the widget's public surface:
//!
//! ```text
//! CardCollection
//!   ├── StackState        (who is visible, in what order)
//!   ├── GestureTracker    (drag input → per-card poses / commit decision)
//!   ├── TransitionEngine  (in-flight pose animations + completion events)
//!   ├── CardSource        (external: card identities by index)
//!   └── CardSurface       (external: elements + applied poses)
//! ```
//!
//! Everything runs on one thread. The driving loop feeds drag events in and
//! calls `update(delta_ms)` each frame; `update` advances the engine, pushes
//! interpolated poses to the surface, and then processes completion events
//! one at a time — each completion performs its stack mutation against the
//! state exactly as the preceding operation left it.
//!
//! Contract violations (no data source, out-of-range selection, a second
//! transition on an animating card) panic loudly rather than corrupt the
//! stack; transient input anomalies are absorbed with a snap-back.

use std::collections::HashMap;

use cardstack_core::{CardPose, CardTransform};
use tracing::warn;

use crate::config::DeckConfig;
use crate::events::{DeckEvent, EventQueue, TransitionEvent};
use crate::gesture::{DragEvent, DragPhase, DragResolution, GesturePhase, GestureTracker};
use crate::source::CardSource;
use crate::stack::{CardId, StackState};
use crate::surface::CardSurface;
use crate::transition::{TransitionEngine, TransitionKind};

/// The stacked-card widget.
pub struct CardCollection<S: CardSurface> {
    config: DeckConfig,
    stack: StackState,
    tracker: GestureTracker,
    engine: TransitionEngine,
    surface: S,
    source: Option<Box<dyn CardSource>>,
    /// The card holding the single drag listener; always the top card.
    armed: Option<CardId>,
    /// Last pose applied to each attached card's layer.
    current_poses: HashMap<CardId, CardPose>,
    events: EventQueue<DeckEvent>,
}

impl<S: CardSurface> CardCollection<S> {
    pub fn new(surface: S, config: DeckConfig) -> Self {
        Self {
            tracker: GestureTracker::new(&config),
            config,
            stack: StackState::new(),
            engine: TransitionEngine::new(),
            surface,
            source: None,
            armed: None,
            current_poses: HashMap::new(),
            events: EventQueue::new(),
        }
    }

    /// Replace the data source and rebuild the visible stack from it.
    ///
    /// Every card in `0..source.count()` is attached at its index, posed per
    /// the stack layout, and the drag listener is armed on the top card.
    pub fn set_source(&mut self, source: Box<dyn CardSource>) {
        let existing: Vec<CardId> = self.stack.entries().map(|entry| entry.id).collect();
        for card in existing {
            self.surface.detach_card(card);
        }
        self.stack.clear();
        self.current_poses.clear();
        self.engine.clear();
        self.tracker.reset();
        self.events.clear();

        self.source = Some(source);

        let count = self.source().count();
        for index in 0..count {
            let card = self.source().card_at(index);
            if let Err(err) = self.stack.attach(card, index) {
                panic!("data source produced an invalid card list: {err}");
            }
            self.surface.attach_card(card, index);
        }

        let resting: Vec<(usize, CardId)> = self.positions();
        for (position, card) in resting {
            let pose = self.config.layout.pose_for_position(position);
            self.push_pose(card, pose);
        }

        self.arm_top();
    }

    /// Move the card carrying `stack_index` to the front of the deck.
    ///
    /// Runs the two-phase compound transition: the target flies off to the
    /// right, the cards it passed shift back by one, and the target slides
    /// back in on top. Selecting the current top card is a no-op.
    ///
    /// # Panics
    ///
    /// Panics when no data source is set or `stack_index` is outside
    /// `(0, count)`; callers must validate their input first.
    pub fn select_card(&mut self, stack_index: usize) {
        let count = self.source().count();
        if stack_index == 0 || stack_index >= count {
            panic!("select index {stack_index} is out of range for {count} cards");
        }
        let top_index = self.stack.entries().next().map(|entry| entry.stack_index);
        if top_index == Some(stack_index) {
            return;
        }
        let Some(target) = self.stack.card_with_index(stack_index) else {
            panic!("no attached card carries stack index {stack_index}");
        };
        let position = self
            .stack
            .position_of(target)
            .expect("target card is attached");

        let from = self
            .current_poses
            .get(&target)
            .copied()
            .unwrap_or_else(|| self.config.layout.pose_for_position(position));
        let to = self.exit_pose();
        self.engine
            .start(target, TransitionKind::OutRight, from, to, &self.config.transition);
    }

    /// Dismiss the top card, as a discrete alternative to dragging it out.
    pub fn advance(&mut self) {
        let _ = self.source(); // recycling on completion needs a source
        let Some(top) = self.stack.top_card() else {
            warn!("advance on an empty deck");
            return;
        };
        if self.engine.is_animating(top) {
            warn!(?top, "ignoring advance while the top card is in transition");
            return;
        }
        let from = self
            .current_poses
            .get(&top)
            .copied()
            .unwrap_or_else(|| self.config.layout.pose_for_position(0));
        self.start_out(top, from);
    }

    /// Feed one drag event from the input collaborator.
    pub fn handle_drag(&mut self, event: DragEvent) {
        match event.phase {
            DragPhase::Began => {
                let Some(card) = self.armed else {
                    warn!("drag began with no armed card");
                    return;
                };
                if self.engine.is_animating(card) {
                    warn!(?card, "ignoring drag while the top card is in transition");
                    return;
                }
                self.tracker.begin(card);
                self.apply_drag_frame(event.translation);
            }
            DragPhase::Changed => {
                if self.tracker.active_card().is_none() {
                    return;
                }
                self.apply_drag_frame(event.translation);
            }
            DragPhase::Ended => self.resolve_drag(event.translation, true),
            DragPhase::Cancelled | DragPhase::Failed => {
                self.resolve_drag(event.translation, false)
            }
        }
    }

    /// Advance animations by `delta_ms` milliseconds and process whatever
    /// completed.
    pub fn update(&mut self, delta_ms: f32) {
        self.engine.update(delta_ms);

        let animating: Vec<(CardId, CardPose)> = self.engine.animating_poses().collect();
        for (card, pose) in animating {
            self.push_pose(card, pose);
        }

        let events: Vec<TransitionEvent> = self.engine.drain_events().collect();
        for event in events {
            if let TransitionEvent::Finished {
                card,
                kind,
                final_pose,
                ..
            } = event
            {
                // Pin the end state before touching logical state.
                self.push_pose(card, final_pose);
                self.complete_transition(card, kind);
            }
        }
    }

    /// Drain pending deck notifications.
    pub fn drain_events(&mut self) -> impl Iterator<Item = DeckEvent> + '_ {
        self.events.drain()
    }

    pub fn top_card(&self) -> Option<CardId> {
        self.stack.top_card()
    }

    /// The card currently holding the drag listener.
    pub fn armed_card(&self) -> Option<CardId> {
        self.armed
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Whether any transition is in flight.
    pub fn is_animating(&self) -> bool {
        self.engine.has_active()
    }

    pub fn gesture_phase(&self) -> GesturePhase {
        self.tracker.phase()
    }

    /// The pose last applied to a card's layer.
    pub fn current_pose(&self, card: CardId) -> Option<CardPose> {
        self.current_poses.get(&card).copied()
    }

    pub fn config(&self) -> &DeckConfig {
        &self.config
    }

    pub fn stack(&self) -> &StackState {
        &self.stack
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    fn source(&self) -> &dyn CardSource {
        match &self.source {
            Some(source) => source.as_ref(),
            None => panic!("card collection has no data source"),
        }
    }

    fn positions(&self) -> Vec<(usize, CardId)> {
        self.stack
            .entries()
            .enumerate()
            .map(|(position, entry)| (position, entry.id))
            .collect()
    }

    fn exit_pose(&self) -> CardPose {
        CardPose::rest(
            CardTransform::identity().then_translate(self.config.exit_offset(), 0.0, 0.0),
        )
    }

    fn push_pose(&mut self, card: CardId, pose: CardPose) {
        self.surface.set_pose(card, &pose);
        self.current_poses.insert(card, pose);
    }

    /// Point the single drag listener at the current top card.
    fn arm_top(&mut self) {
        self.armed = self.stack.top_card();
    }

    fn start_out(&mut self, card: CardId, from: CardPose) {
        let to = self.exit_pose();
        self.engine
            .start(card, TransitionKind::Out, from, to, &self.config.transition);
    }

    fn apply_drag_frame(&mut self, translation: [f64; 2]) {
        let stack_len = self.stack.len();
        let frames = self.tracker.drag_update(translation, stack_len);
        for (position, pose) in frames {
            if let Some(card) = self.stack.card_at(position) {
                self.push_pose(card, pose);
            }
        }
    }

    fn resolve_drag(&mut self, translation: [f64; 2], can_commit: bool) {
        let stack_len = self.stack.len();
        match self.tracker.resolve(translation, stack_len, can_commit) {
            None => {}
            Some(DragResolution::Commit { card, dx }) => {
                let from = CardPose::rest(CardTransform::translate(dx, 0.0, 0.0));
                self.start_out(card, from);
            }
            Some(DragResolution::SnapBack { poses }) => {
                for (position, from) in poses {
                    let Some(card) = self.stack.card_at(position) else {
                        continue;
                    };
                    if self.engine.is_animating(card) {
                        continue;
                    }
                    let to = self.config.layout.pose_for_position(position);
                    if from == to {
                        continue;
                    }
                    self.engine
                        .start(card, TransitionKind::Settle, from, to, &self.config.transition);
                }
            }
        }
    }

    fn complete_transition(&mut self, card: CardId, kind: TransitionKind) {
        match kind {
            TransitionKind::Out => self.complete_out(card),
            TransitionKind::OutRight => self.complete_out_right(card),
            TransitionKind::InFromBottom => {
                self.events.push(DeckEvent::CardPresented { card });
                self.arm_top();
            }
            TransitionKind::InFromRight
            | TransitionKind::InFromLeft
            | TransitionKind::InFromTop => {
                self.events.push(DeckEvent::CardSelected { card });
                self.arm_top();
            }
            TransitionKind::Settle => {}
        }
    }

    /// The top card finished flying out: drop it, reflow the rest, and bring
    /// a recycled card in at the back.
    fn complete_out(&mut self, card: CardId) {
        let entry = match self.stack.detach(card) {
            Ok(entry) => entry,
            Err(err) => panic!("dismissal completed for a detached card: {err}"),
        };
        self.surface.detach_card(card);
        self.current_poses.remove(&card);

        self.settle_to_rest(None);

        // Refetch by the index the dismissed card held; whatever the source
        // returns takes the back position.
        let recycled = self.source().card_at(entry.stack_index);
        let back = self.stack.len();
        if let Err(err) = self.stack.attach(recycled, back) {
            panic!("data source returned a card that is already attached: {err}");
        }
        self.surface.attach_card(recycled, back);

        let rest = self.config.layout.transform_for_position(back);
        let (from, to) = TransitionKind::InFromBottom
            .entry_poses(rest, self.config.exit_offset())
            .expect("InFromBottom is an entry kind");
        self.push_pose(recycled, from);
        self.engine.start(
            recycled,
            TransitionKind::InFromBottom,
            from,
            to,
            &self.config.transition,
        );

        self.events.push(DeckEvent::CardDismissed { card });
        self.arm_top();
    }

    /// Phase two of move-to-front: splice the flown-out card in at position
    /// 0, shift the cards it passed, and slide it back in on top.
    fn complete_out_right(&mut self, card: CardId) {
        if let Err(err) = self.stack.detach(card) {
            panic!("move-to-front completed for a detached card: {err}");
        }
        self.stack
            .attach(card, 0)
            .expect("attaching at the front cannot fail");
        self.surface.detach_card(card);
        self.surface.attach_card(card, 0);

        self.settle_to_rest(Some(card));

        let rest = self.config.layout.transform_for_position(0);
        let (from, to) = TransitionKind::InFromRight
            .entry_poses(rest, self.config.exit_offset())
            .expect("InFromRight is an entry kind");
        self.push_pose(card, from);
        self.engine.start(
            card,
            TransitionKind::InFromRight,
            from,
            to,
            &self.config.transition,
        );

        self.arm_top();
    }

    /// Animate every attached, idle card back to its resting stack pose.
    fn settle_to_rest(&mut self, skip: Option<CardId>) {
        let positions = self.positions();
        for (position, card) in positions {
            if Some(card) == skip || self.engine.is_animating(card) {
                continue;
            }
            let to = self.config.layout.pose_for_position(position);
            let from = self.current_poses.get(&card).copied().unwrap_or(to);
            if from == to {
                self.push_pose(card, to);
                continue;
            }
            self.engine
                .start(card, TransitionKind::Settle, from, to, &self.config.transition);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullSurface;

    impl CardSurface for NullSurface {
        fn attach_card(&mut self, _card: CardId, _position: usize) {}
        fn detach_card(&mut self, _card: CardId) {}
        fn set_pose(&mut self, _card: CardId, _pose: &CardPose) {}
    }

    struct FixedSource(Vec<CardId>);

    impl CardSource for FixedSource {
        fn count(&self) -> usize {
            self.0.len()
        }

        fn card_at(&self, index: usize) -> CardId {
            self.0[index]
        }
    }

    fn deck() -> CardCollection<NullSurface> {
        let mut deck = CardCollection::new(NullSurface, DeckConfig::default());
        deck.set_source(Box::new(FixedSource(vec![CardId(0), CardId(1), CardId(2)])));
        deck
    }

    #[test]
    #[should_panic(expected = "no data source")]
    fn test_select_without_source_panics() {
        let mut deck = CardCollection::new(NullSurface, DeckConfig::default());
        deck.select_card(1);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_select_index_zero_panics() {
        let mut deck = deck();
        deck.select_card(0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_select_index_past_count_panics() {
        let mut deck = deck();
        deck.select_card(3);
    }

    #[test]
    fn test_rebuild_arms_top_card() {
        let deck = deck();
        assert_eq!(deck.len(), 3);
        assert_eq!(deck.top_card(), Some(CardId(0)));
        assert_eq!(deck.armed_card(), Some(CardId(0)));
    }

    #[test]
    fn test_rebuild_applies_resting_poses() {
        let deck = deck();
        let pose = deck.current_pose(CardId(1)).unwrap();
        assert_eq!(pose.transform.translate, [0.0, 8.0, 0.0]);
        assert_eq!(pose.transform.scale, [0.99, 1.0, 1.0]);
    }

    #[test]
    fn test_drag_without_begin_is_ignored() {
        let mut deck = deck();
        deck.handle_drag(DragEvent::new(DragPhase::Changed, [50.0, 0.0]));
        assert_eq!(deck.gesture_phase(), GesturePhase::Idle);
        assert!(!deck.is_animating());
    }

    #[test]
    fn test_advance_on_empty_deck_is_ignored() {
        let mut deck = CardCollection::new(NullSurface, DeckConfig::default());
        deck.set_source(Box::new(FixedSource(Vec::new())));
        deck.advance();
        assert!(!deck.is_animating());
    }
}
