//! Lifecycle events for transitions and the deck.
//!
//! Transition completion is delivered as drained events rather than stored
//! callbacks: the engine queues an event carrying the transition token when
//! an animation finishes, and the facade processes the queue on its own
//! update tick. A token appears in exactly one `Finished` event, which makes
//! completion handling idempotent regardless of when the queue is drained.

use std::collections::VecDeque;

use cardstack_core::CardPose;
use serde::{Deserialize, Serialize};

use crate::stack::CardId;
use crate::transition::{TransitionKind, TransitionToken};

/// Event emitted when a card transition changes state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransitionEvent {
    /// The transition has started.
    Started {
        token: TransitionToken,
        card: CardId,
        kind: TransitionKind,
    },
    /// The transition ran to completion. Carries the guaranteed end pose so
    /// the processor can pin the card's visual state before mutating
    /// logical state.
    Finished {
        token: TransitionToken,
        card: CardId,
        kind: TransitionKind,
        final_pose: CardPose,
    },
}

impl TransitionEvent {
    /// The card this event is about.
    pub fn card(&self) -> CardId {
        match self {
            Self::Started { card, .. } | Self::Finished { card, .. } => *card,
        }
    }

    /// The transition token this event is about.
    pub fn token(&self) -> TransitionToken {
        match self {
            Self::Started { token, .. } | Self::Finished { token, .. } => *token,
        }
    }

    /// The transition kind this event is about.
    pub fn kind(&self) -> TransitionKind {
        match self {
            Self::Started { kind, .. } | Self::Finished { kind, .. } => *kind,
        }
    }
}

/// Deck-level notification for the embedding application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeckEvent {
    /// The top card was dismissed and left the stack.
    CardDismissed { card: CardId },
    /// A recycled card finished entering and rests at the back.
    CardPresented { card: CardId },
    /// A selected card finished its move to the front.
    CardSelected { card: CardId },
}

/// FIFO queue of events collected during updates.
#[derive(Debug)]
pub struct EventQueue<T> {
    events: VecDeque<T>,
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self {
            events: VecDeque::new(),
        }
    }
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: T) {
        self.events.push_back(event);
    }

    pub fn pop(&mut self) -> Option<T> {
        self.events.pop_front()
    }

    /// Peek at the next event without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.events.front()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drain all pending events in arrival order.
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.events.drain(..)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_order() {
        let mut queue = EventQueue::new();
        queue.push(1);
        queue.push(2);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop(), Some(1));
        assert_eq!(queue.pop(), Some(2));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn test_queue_drain() {
        let mut queue = EventQueue::new();
        queue.push("a");
        queue.push("b");
        let drained: Vec<_> = queue.drain().collect();
        assert_eq!(drained, vec!["a", "b"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_peek_does_not_remove() {
        let mut queue = EventQueue::new();
        queue.push(9);
        assert_eq!(queue.peek(), Some(&9));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_event_accessors() {
        let event = TransitionEvent::Started {
            token: TransitionToken(3),
            card: CardId(1),
            kind: TransitionKind::Out,
        };
        assert_eq!(event.card(), CardId(1));
        assert_eq!(event.token(), TransitionToken(3));
        assert_eq!(event.kind(), TransitionKind::Out);
    }

    #[test]
    fn test_event_serialization() {
        let event = TransitionEvent::Finished {
            token: TransitionToken(42),
            card: CardId(5),
            kind: TransitionKind::InFromBottom,
            final_pose: CardPose::default(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("in_from_bottom"));
        let parsed: TransitionEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, parsed);
    }

    #[test]
    fn test_deck_event_serialization() {
        let event = DeckEvent::CardDismissed { card: CardId(2) };
        let json = serde_json::to_string(&event).unwrap();
        let parsed: DeckEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, parsed);
    }
}
