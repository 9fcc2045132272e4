//! Events.

use cgmath::Point2;
use core::fmt;
use parking_lot::Mutex;
use std::sync::Arc;

/// Kinds of mouse events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventType {
    Down,
    Up,
    Move,
    Enter,
    Leave,
}

/// Mouse buttons.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Primary = 0,
    Secondary = 1,
    Middle = 2,
}

/// Modifier key state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyModifiers {
    /// Whether any shift key is pressed.
    pub shift: bool,

    /// Whether any control key is pressed.
    pub control: bool,

    /// Whether any option key or alt key is pressed.
    pub option: bool,

    /// Whether any command key or meta key is pressed.
    pub command: bool,
}

/// A mouse event as seen by one view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseEvent {
    pub kind: MouseEventType,

    /// The button that changed state; `None` for moves, enters and leaves.
    pub button: Option<MouseButton>,

    /// Event location relative to the receiving view’s origin.
    pub location: Point2<f64>,

    /// Event location in the window coordinate system.
    pub window_location: Point2<f64>,

    pub modifiers: KeyModifiers,
}

impl MouseEvent {
    /// Returns true for a press of the primary button.
    pub fn is_primary_down(&self) -> bool {
        self.kind == MouseEventType::Down && self.button == Some(MouseButton::Primary)
    }
}

/// Kinds of key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEventType {
    Down,
    Up,
}

/// A key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub kind: KeyEventType,
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

/// A key, as far as event routing cares.
///
/// Keys that produce text are reported by the character they produce without modifiers; keys the
/// core has no use for carry the backend's native key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    /// Moves keyboard focus unless a view consumes it.
    Tab,
    Return,
    Other(u32),
}

/// Identifies a handler connected to a [`Signal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

/// A shared event handler.
///
/// Returns true if the handler consumed the event.
pub struct EventHandler<Args>(Arc<Mutex<dyn FnMut(&Args) -> bool + Send>>);

impl<Args> Clone for EventHandler<Args> {
    fn clone(&self) -> Self {
        EventHandler(Arc::clone(&self.0))
    }
}

impl<Args> EventHandler<Args> {
    pub fn new<F: 'static + FnMut(&Args) -> bool + Send>(handler: F) -> Self {
        EventHandler(Arc::new(Mutex::new(handler)))
    }

    pub fn call(&self, args: &Args) -> bool {
        let mut handler = self.0.lock();
        (&mut *handler)(args)
    }
}

impl<Args> fmt::Debug for EventHandler<Args> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "EventHandler<{}>", core::any::type_name::<Args>())
    }
}

struct SignalInner<Args> {
    next_id: u64,
    handlers: Vec<(ConnectionId, EventHandler<Args>)>,
}

/// A list of handlers notified in connection order.
///
/// Clones share the same handler list.
pub struct Signal<Args> {
    inner: Arc<Mutex<SignalInner<Args>>>,
}

impl<Args> Clone for Signal<Args> {
    fn clone(&self) -> Self {
        Signal {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<Args> Default for Signal<Args> {
    fn default() -> Self {
        Signal::new()
    }
}

impl<Args> Signal<Args> {
    pub fn new() -> Self {
        Signal {
            inner: Arc::new(Mutex::new(SignalInner {
                next_id: 0,
                handlers: Vec::new(),
            })),
        }
    }

    /// Connects a notification handler.
    pub fn connect<F: 'static + FnMut(&Args) + Send>(&self, mut handler: F) -> ConnectionId {
        self.connect_handler(EventHandler::new(move |args| {
            handler(args);
            false
        }))
    }

    /// Connects a handler that may consume the event by returning true.
    pub fn connect_consuming<F: 'static + FnMut(&Args) -> bool + Send>(
        &self,
        handler: F,
    ) -> ConnectionId {
        self.connect_handler(EventHandler::new(handler))
    }

    fn connect_handler(&self, handler: EventHandler<Args>) -> ConnectionId {
        let mut inner = self.inner.lock();
        let id = ConnectionId(inner.next_id);
        inner.next_id += 1;
        inner.handlers.push((id, handler));
        id
    }

    /// Removes a handler. Returns false if it was not connected.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        let mut inner = self.inner.lock();
        let len = inner.handlers.len();
        inner.handlers.retain(|(i, _)| *i != id);
        inner.handlers.len() != len
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().handlers.is_empty()
    }

    /// Calls handlers in order until one consumes the event.
    ///
    /// Returns true if the event was consumed. Handlers may connect or disconnect handlers on this
    /// signal while it is being emitted.
    pub fn emit(&self, args: &Args) -> bool {
        let handlers: Vec<_> = self
            .inner
            .lock()
            .handlers
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect();
        handlers.iter().any(|handler| handler.call(args))
    }
}

impl<Args> fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Signal<{}>({} handlers)",
            core::any::type_name::<Args>(),
            self.inner.lock().handlers.len()
        )
    }
}
