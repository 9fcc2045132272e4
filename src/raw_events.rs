//! Events posted by native backends.

use crate::events::{KeyEvent, KeyModifiers, MouseButton};
use crate::rect::Rect;
use crate::window::WindowId;
use cgmath::{Point2, Vector2};

/// A raw event from the platform, in window pixels.
///
/// Native callbacks may post these from any thread; the [`Host`](crate::Host) applies them to the
/// tree on the UI thread.
#[derive(Debug, Clone, PartialEq)]
pub enum RawEvent {
    MouseMove {
        window: WindowId,
        location: Point2<f64>,
        modifiers: KeyModifiers,
    },
    MouseDown {
        window: WindowId,
        button: MouseButton,
        location: Point2<f64>,
        modifiers: KeyModifiers,
    },
    MouseUp {
        window: WindowId,
        button: MouseButton,
        location: Point2<f64>,
        modifiers: KeyModifiers,
    },
    /// The pointer left the window.
    MouseLeave { window: WindowId },
    Key { window: WindowId, event: KeyEvent },
    /// The client area was resized.
    Resize {
        window: WindowId,
        size: Vector2<f64>,
    },
    /// The window moved to a display with a different scale factor.
    ScaleFactorChanged { window: WindowId, scale_factor: f64 },
    /// The platform took pointer capture away.
    CaptureLost,
    /// Part of a window needs repainting.
    Paint { window: WindowId, dirty: Rect },
}

impl RawEvent {
    /// The window the event is addressed to, if any.
    pub fn window(&self) -> Option<WindowId> {
        match self {
            RawEvent::MouseMove { window, .. }
            | RawEvent::MouseDown { window, .. }
            | RawEvent::MouseUp { window, .. }
            | RawEvent::MouseLeave { window }
            | RawEvent::Key { window, .. }
            | RawEvent::Resize { window, .. }
            | RawEvent::ScaleFactorChanged { window, .. }
            | RawEvent::Paint { window, .. } => Some(*window),
            RawEvent::CaptureLost => None,
        }
    }
}
