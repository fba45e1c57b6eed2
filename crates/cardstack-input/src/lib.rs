//! cardstack-input: winit pointer/touch bridge for the deck.
//!
//! Translates raw winit input primitives into the deck's `DragEvent`s.
//! The adapter tracks at most one pointer — the first mouse press or touch
//! wins and later pointers are ignored until it lifts — and reports
//! translations relative to the press origin, which is what the gesture
//! tracker expects.
//!
//! The embedding window loop stays in charge of event delivery; it forwards
//! the relevant pieces of each `WindowEvent` here and feeds whatever comes
//! back into `CardCollection::handle_drag`.

use cardstack_deck::{DragEvent, DragPhase};
use winit::event::{ElementState, MouseButton, TouchPhase};

/// The pointer the adapter is currently following.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ActivePointer {
    Mouse,
    Touch { id: u64 },
}

/// Turns mouse and touch input into drag events for the deck.
#[derive(Debug, Default)]
pub struct PointerAdapter {
    /// Last known cursor position, tracked even while no button is down so
    /// a press can use it as the drag origin.
    cursor: [f64; 2],
    active: Option<ActivePointer>,
    origin: [f64; 2],
}

impl PointerAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a drag is currently being tracked.
    pub fn is_tracking(&self) -> bool {
        self.active.is_some()
    }

    /// Feed a cursor movement.
    pub fn on_cursor_moved(&mut self, position: [f64; 2]) -> Option<DragEvent> {
        self.cursor = position;
        match self.active {
            Some(ActivePointer::Mouse) => Some(DragEvent::new(
                DragPhase::Changed,
                self.translation(position),
            )),
            _ => None,
        }
    }

    /// Feed a mouse button change. Only the left button drags cards.
    pub fn on_mouse_input(
        &mut self,
        state: ElementState,
        button: MouseButton,
    ) -> Option<DragEvent> {
        if button != MouseButton::Left {
            return None;
        }
        match state {
            ElementState::Pressed => {
                if self.active.is_some() {
                    return None;
                }
                self.active = Some(ActivePointer::Mouse);
                self.origin = self.cursor;
                Some(DragEvent::new(DragPhase::Began, [0.0, 0.0]))
            }
            ElementState::Released => {
                if self.active != Some(ActivePointer::Mouse) {
                    return None;
                }
                self.active = None;
                Some(DragEvent::new(
                    DragPhase::Ended,
                    self.translation(self.cursor),
                ))
            }
        }
    }

    /// Feed a touch. Touches carry their own position and id.
    pub fn on_touch(
        &mut self,
        phase: TouchPhase,
        position: [f64; 2],
        id: u64,
    ) -> Option<DragEvent> {
        match phase {
            TouchPhase::Started => {
                if self.active.is_some() {
                    return None;
                }
                self.active = Some(ActivePointer::Touch { id });
                self.origin = position;
                Some(DragEvent::new(DragPhase::Began, [0.0, 0.0]))
            }
            TouchPhase::Moved => {
                if self.active != Some(ActivePointer::Touch { id }) {
                    return None;
                }
                Some(DragEvent::new(
                    DragPhase::Changed,
                    self.translation(position),
                ))
            }
            TouchPhase::Ended => {
                if self.active != Some(ActivePointer::Touch { id }) {
                    return None;
                }
                self.active = None;
                Some(DragEvent::new(DragPhase::Ended, self.translation(position)))
            }
            TouchPhase::Cancelled => {
                if self.active != Some(ActivePointer::Touch { id }) {
                    return None;
                }
                self.active = None;
                Some(DragEvent::new(
                    DragPhase::Cancelled,
                    self.translation(position),
                ))
            }
        }
    }

    /// Forget any tracked pointer, e.g. when the window loses focus.
    ///
    /// Returns the cancellation to forward so the deck snaps back.
    pub fn cancel(&mut self) -> Option<DragEvent> {
        self.active.take().map(|_| {
            DragEvent::new(DragPhase::Cancelled, self.translation(self.cursor))
        })
    }

    fn translation(&self, position: [f64; 2]) -> [f64; 2] {
        [position[0] - self.origin[0], position[1] - self.origin[1]]
    }
}
