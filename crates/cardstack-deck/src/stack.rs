//! Visible-stack bookkeeping.
//!
//! The stack is an explicit front-to-back list of card entries plus a
//! per-card `stack_index`. Mutations come in whole operations with a clear
//! before/after contract (`attach`, `detach`, `reindex_after_insert_before`)
//! rather than ad-hoc index twiddling, so a completed operation always
//! leaves every visible card's index equal to its position.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque identity of a card owned by the external data source.
///
/// The deck never inspects card content; it only tracks identity and stack
/// index and reports the identity back to its collaborators.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CardId(pub u64);

/// Errors from stack mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StackError {
    /// The requested attach position is past the end of the stack.
    #[error("position {position} is out of range for a stack of {len} cards")]
    PositionOutOfRange { position: usize, len: usize },

    /// The card is not part of the visible stack.
    #[error("card {0:?} is not attached to the stack")]
    NotAttached(CardId),

    /// The card is already part of the visible stack.
    #[error("card {0:?} is already attached to the stack")]
    AlreadyAttached(CardId),
}

/// One visible card: its identity and its stack index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackEntry {
    pub id: CardId,
    /// Front-to-back rank; 0 is the top card. Equal to the entry's position
    /// whenever no mutation is mid-flight.
    pub stack_index: usize,
}

/// The ordered set of currently-visible cards, front-to-back.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StackState {
    cards: Vec<StackEntry>,
}

impl StackState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of visible cards.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// The card at position 0, if any.
    pub fn top_card(&self) -> Option<CardId> {
        self.cards.first().map(|entry| entry.id)
    }

    /// The card at the given front-to-back position.
    pub fn card_at(&self, position: usize) -> Option<CardId> {
        self.cards.get(position).map(|entry| entry.id)
    }

    /// The front-to-back position of the given card.
    pub fn position_of(&self, card: CardId) -> Option<usize> {
        self.cards.iter().position(|entry| entry.id == card)
    }

    /// The visible card carrying the given stack index.
    pub fn card_with_index(&self, stack_index: usize) -> Option<CardId> {
        self.cards
            .iter()
            .find(|entry| entry.stack_index == stack_index)
            .map(|entry| entry.id)
    }

    pub fn contains(&self, card: CardId) -> bool {
        self.position_of(card).is_some()
    }

    /// Iterate entries front-to-back.
    pub fn entries(&self) -> impl Iterator<Item = &StackEntry> {
        self.cards.iter()
    }

    /// Insert a card at the given front-to-back position.
    ///
    /// Every card at or behind that position shifts back by one (its stack
    /// index increments). Position `len` appends at the back.
    pub fn attach(&mut self, card: CardId, position: usize) -> Result<(), StackError> {
        if position > self.cards.len() {
            return Err(StackError::PositionOutOfRange {
                position,
                len: self.cards.len(),
            });
        }
        if self.contains(card) {
            return Err(StackError::AlreadyAttached(card));
        }
        self.reindex_after_insert_before(position);
        self.cards.insert(
            position,
            StackEntry {
                id: card,
                stack_index: position,
            },
        );
        debug_assert!(self.indices_match_positions());
        Ok(())
    }

    /// Remove a card from the visible stack.
    ///
    /// Every card behind it shifts forward by one (its stack index
    /// decrements). Returns the removed entry with the index it held.
    pub fn detach(&mut self, card: CardId) -> Result<StackEntry, StackError> {
        let position = self
            .position_of(card)
            .ok_or(StackError::NotAttached(card))?;
        let entry = self.cards.remove(position);
        for behind in &mut self.cards[position..] {
            behind.stack_index -= 1;
        }
        debug_assert!(self.indices_match_positions());
        Ok(entry)
    }

    /// Increment the stack index of every visible card whose index is at or
    /// behind `position`, making room for a card spliced in before them.
    pub fn reindex_after_insert_before(&mut self, position: usize) {
        for entry in &mut self.cards {
            if entry.stack_index >= position {
                entry.stack_index += 1;
            }
        }
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.cards.clear();
    }

    fn indices_match_positions(&self) -> bool {
        self.cards
            .iter()
            .enumerate()
            .all(|(position, entry)| entry.stack_index == position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(n: u64) -> CardId {
        CardId(n)
    }

    fn indices(stack: &StackState) -> Vec<(CardId, usize)> {
        stack
            .entries()
            .map(|entry| (entry.id, entry.stack_index))
            .collect()
    }

    #[test]
    fn test_attach_in_order() {
        let mut stack = StackState::new();
        for n in 0..3 {
            stack.attach(card(n), n as usize).unwrap();
        }
        assert_eq!(stack.len(), 3);
        assert_eq!(stack.top_card(), Some(card(0)));
        assert_eq!(
            indices(&stack),
            vec![(card(0), 0), (card(1), 1), (card(2), 2)]
        );
    }

    #[test]
    fn test_attach_at_front_shifts_back() {
        let mut stack = StackState::new();
        stack.attach(card(1), 0).unwrap();
        stack.attach(card(2), 1).unwrap();
        stack.attach(card(0), 0).unwrap();
        assert_eq!(
            indices(&stack),
            vec![(card(0), 0), (card(1), 1), (card(2), 2)]
        );
    }

    #[test]
    fn test_attach_out_of_range() {
        let mut stack = StackState::new();
        assert_eq!(
            stack.attach(card(0), 1),
            Err(StackError::PositionOutOfRange { position: 1, len: 0 })
        );
    }

    #[test]
    fn test_attach_twice_is_rejected() {
        let mut stack = StackState::new();
        stack.attach(card(0), 0).unwrap();
        assert_eq!(
            stack.attach(card(0), 1),
            Err(StackError::AlreadyAttached(card(0)))
        );
    }

    #[test]
    fn test_detach_shifts_forward() {
        let mut stack = StackState::new();
        for n in 0..3 {
            stack.attach(card(n), n as usize).unwrap();
        }
        let removed = stack.detach(card(0)).unwrap();
        assert_eq!(removed.stack_index, 0);
        assert_eq!(indices(&stack), vec![(card(1), 0), (card(2), 1)]);
    }

    #[test]
    fn test_detach_middle() {
        let mut stack = StackState::new();
        for n in 0..4 {
            stack.attach(card(n), n as usize).unwrap();
        }
        stack.detach(card(1)).unwrap();
        assert_eq!(
            indices(&stack),
            vec![(card(0), 0), (card(2), 1), (card(3), 2)]
        );
    }

    #[test]
    fn test_detach_unknown() {
        let mut stack = StackState::new();
        assert_eq!(stack.detach(card(9)), Err(StackError::NotAttached(card(9))));
    }

    #[test]
    fn test_move_to_front_via_detach_attach() {
        // The splice used by the move-to-front transition.
        let mut stack = StackState::new();
        for n in 0..3 {
            stack.attach(card(n), n as usize).unwrap();
        }
        stack.detach(card(2)).unwrap();
        stack.attach(card(2), 0).unwrap();
        assert_eq!(
            indices(&stack),
            vec![(card(2), 0), (card(0), 1), (card(1), 2)]
        );
    }

    #[test]
    fn test_card_with_index() {
        let mut stack = StackState::new();
        for n in 0..3 {
            stack.attach(card(n), n as usize).unwrap();
        }
        assert_eq!(stack.card_with_index(1), Some(card(1)));
        assert_eq!(stack.card_with_index(5), None);
    }
}
