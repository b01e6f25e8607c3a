//! Pointer, wheel and touch handling for the venue canvas
//!
//! [`Controller`] is a synchronous state machine: each [`InputEvent`] either
//! moves an item, changes the [`ViewTransform`], or does nothing.

pub mod controller;
pub mod gesture;
pub mod transform;

pub use controller::{Controller, DragState, InputEvent, Response};
pub use gesture::DoubleTapDetector;
pub use transform::{ViewConfig, ViewTransform};
