use crate::backend::Backend;
use crate::config::Theme;
use crate::events::MouseEventType;
use crate::raw_events::RawEvent;
use crate::tree::ViewTree;
use crossbeam::channel::{self, Receiver, Sender, TryRecvError};
use tracing::{trace, warn};

/// Connects a view tree to a native backend.
///
/// The backend’s event callbacks post [`RawEvent`]s through a sender obtained from
/// [`Host::event_sender`]; [`Host::poll`] applies them to the tree.
pub struct Host {
    pub tree: ViewTree,
    event_recv: Receiver<RawEvent>,
    event_sender: Sender<RawEvent>,
}

impl Host {
    pub fn new(backend: Box<dyn Backend>) -> Host {
        Host::with_theme(backend, Theme::default())
    }

    pub fn with_theme(backend: Box<dyn Backend>, theme: Theme) -> Host {
        let (event_sender, event_recv) = channel::unbounded();

        Host {
            tree: ViewTree::with_theme(backend, theme),
            event_recv,
            event_sender,
        }
    }

    /// Returns a sender for posting raw events from native callbacks.
    pub fn event_sender(&self) -> Sender<RawEvent> {
        self.event_sender.clone()
    }

    /// Receives all events from the event queue and updates the tree accordingly.
    ///
    /// Returns the number of events handled.
    pub fn poll(&mut self) -> usize {
        let mut count = 0;
        loop {
            match self.event_recv.try_recv() {
                Ok(event) => {
                    self.recv_raw_event(event);
                    count += 1;
                }
                // the host holds a sender, so the queue never disconnects
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        count
    }

    fn recv_raw_event(&mut self, event: RawEvent) {
        if let Some(window) = event.window() {
            if self.tree.window(window).is_none() {
                warn!(?window, ?event, "dropping event for unknown window");
                return;
            }
        }
        trace!(?event, "raw event");

        match event {
            RawEvent::MouseMove {
                window,
                location,
                modifiers,
            } => self.tree.dispatch_mouse_move(window, location, modifiers),
            RawEvent::MouseDown {
                window,
                button,
                location,
                modifiers,
            } => {
                self.tree.dispatch_mouse_button(
                    window,
                    MouseEventType::Down,
                    button,
                    location,
                    modifiers,
                );
            }
            RawEvent::MouseUp {
                window,
                button,
                location,
                modifiers,
            } => {
                self.tree.dispatch_mouse_button(
                    window,
                    MouseEventType::Up,
                    button,
                    location,
                    modifiers,
                );
            }
            RawEvent::MouseLeave { window } => self.tree.dispatch_mouse_leave(window),
            RawEvent::Key { window, event } => {
                self.tree.dispatch_key(window, event);
            }
            RawEvent::Resize { window, size } => self.tree.resize_window(window, size),
            RawEvent::ScaleFactorChanged {
                window,
                scale_factor,
            } => self.tree.set_window_scale_factor(window, scale_factor),
            RawEvent::CaptureLost => self.tree.capture_lost(),
            RawEvent::Paint { window, dirty } => {
                let surface = match self.tree.window(window) {
                    Some(window) => window.surface(),
                    None => return,
                };
                let mut painter = self.tree.backend_mut().begin_paint(surface);
                self.tree.draw_window(window, &mut *painter, dirty);
            }
        }
    }
}
