//! cardstack-deck: the stacked-card widget runtime.
//!
//! A deck of cards is rendered as a perspective-like fan: the top card sits
//! untransformed and each card behind it is nudged down and narrowed. The
//! top card can be dragged horizontally; past a commit threshold it flies
//! off to the right, the stack reflows, and a recycled card slides in at
//! the back. Any visible card can also be moved to the front with an
//! animated two-phase transition.
//!
//! # Architecture
//!
//! ```text
//! CardCollection (facade)
//!   ├── StackState        ordered cards + stack-index bookkeeping
//!   ├── GestureTracker    drag input → poses, commit/snap-back decision
//!   ├── TransitionEngine  pose animations, tokens, completion events
//!   └── traits: CardSource (data), CardSurface (rendering)
//! ```
//!
//! The deck is single-threaded and event-driven: feed it `DragEvent`s, call
//! [`CardCollection::update`] once per frame with the elapsed milliseconds,
//! and drain [`DeckEvent`]s to observe dismissals and selections. Transform
//! math and timing curves live in `cardstack-core` and are re-exported here.

pub mod collection;
pub mod config;
pub mod events;
pub mod gesture;
pub mod source;
pub mod stack;
pub mod surface;
pub mod transition;

pub use cardstack_core::{CardPose, CardTransform, EasingFunction, Interpolate, StackLayout};

pub use collection::CardCollection;
pub use config::DeckConfig;
pub use events::{DeckEvent, EventQueue, TransitionEvent};
pub use gesture::{DragEvent, DragPhase, DragResolution, GesturePhase, GestureTracker};
pub use source::CardSource;
pub use stack::{CardId, StackEntry, StackError, StackState};
pub use transition::{
    ActiveCardTransition, TransitionEngine, TransitionKind, TransitionSpec, TransitionToken,
};
pub use surface::CardSurface;
