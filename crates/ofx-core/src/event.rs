#![forbid(unsafe_code)]

//! Canonical host events.
//!
//! The embedding environment translates its native input (DOM events, window
//! system callbacks, test scripts) into [`Event`] values and hands them to a
//! component's `handle_event`. Coordinates are in surface pixels relative to
//! the host viewport, matching `clientX`/`clientY` style input.

/// Canonical input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// A pointer (mouse, pen, touch) event.
    Pointer(PointerEvent),

    /// The component's container was resized.
    Resize {
        /// New container width in pixels.
        width: u16,
        /// New container height in pixels.
        height: u16,
    },
}

/// A pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// The type of pointer event.
    pub kind: PointerEventKind,

    /// X coordinate in pixels.
    pub x: f32,

    /// Y coordinate in pixels.
    pub y: f32,
}

impl PointerEvent {
    /// Create a new pointer event.
    #[must_use]
    pub const fn new(kind: PointerEventKind, x: f32, y: f32) -> Self {
        Self { kind, x, y }
    }

    /// Shorthand for a move event.
    #[must_use]
    pub const fn moved(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::Moved, x, y)
    }

    /// Shorthand for a primary-button press.
    #[must_use]
    pub const fn down(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::Down, x, y)
    }
}

/// Kinds of pointer events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    /// Pointer moved.
    Moved,
    /// Primary button pressed.
    Down,
}

impl From<PointerEvent> for Event {
    fn from(event: PointerEvent) -> Self {
        Event::Pointer(event)
    }
}
