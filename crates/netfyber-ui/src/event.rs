//! Host events delivered to [`crate::App::dispatch`].

use crate::dom::ElementId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Other(String),
}

impl Key {
    /// Maps a DOM `KeyboardEvent.key` value.
    #[must_use]
    pub fn from_dom(key: &str) -> Self {
        match key {
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            other => Key::Other(other.to_owned()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Click(ElementId),
    /// A form is about to be submitted.
    Submit(ElementId),
    KeyDown(Key),
    /// Touch start or mouse down. `x` is the horizontal screen position.
    PointerDown { target: ElementId, x: f64 },
    PointerMove { x: f64 },
    PointerUp { x: f64 },
    PointerCancel,
    /// The viewport was resized; read the new width through the DOM.
    Resize,
    /// An observed element crossed into view.
    Intersect { el: ElementId, ratio: f64 },
    /// The page is going away.
    Unmount,
    /// An error or rejected promise nothing else handled.
    UncaughtError(String),
}

/// What the host should do with the native event after dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[must_use]
pub struct Dispatch {
    pub prevent_default: bool,
}

impl Dispatch {
    pub const CONTINUE: Self = Self {
        prevent_default: false,
    };
    pub const PREVENT: Self = Self {
        prevent_default: true,
    };
}
