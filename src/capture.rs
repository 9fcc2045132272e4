//! Pointer capture.

use crate::tree::ViewTree;
use crate::view::ViewId;
use tracing::debug;

/// Tracks which view holds pointer capture.
///
/// At most one view holds capture at a time. Acquiring always succeeds and evicts the previous
/// holder; the caller is responsible for telling the evicted view.
#[derive(Debug, Clone, Default)]
pub struct CaptureCoordinator {
    holder: Option<ViewId>,
}

impl CaptureCoordinator {
    pub fn new() -> CaptureCoordinator {
        CaptureCoordinator { holder: None }
    }

    /// Gives capture to a view and returns the view that lost it, if any.
    ///
    /// Re-acquiring by the current holder evicts nobody.
    pub fn acquire(&mut self, view: ViewId) -> Option<ViewId> {
        self.holder.replace(view).filter(|previous| *previous != view)
    }

    /// Releases capture if `view` holds it. Returns false otherwise.
    pub fn release(&mut self, view: ViewId) -> bool {
        if self.holder == Some(view) {
            self.holder = None;
            true
        } else {
            false
        }
    }

    pub fn is_captured(&self, view: ViewId) -> bool {
        self.holder == Some(view)
    }

    pub fn holder(&self) -> Option<ViewId> {
        self.holder
    }

    /// Drops capture without a release request, e.g. when the platform took it away.
    pub(crate) fn clear(&mut self) -> Option<ViewId> {
        self.holder.take()
    }
}

impl ViewTree {
    /// Routes all pointer events of the view’s window to the view.
    ///
    /// A previous holder is notified through its `on_capture_lost` handlers. Views outside a
    /// window cannot capture the pointer.
    pub fn set_capture(&mut self, view: ViewId) {
        let (window, surface) = match self.view_window_surface(view) {
            Some(found) => found,
            None => {
                debug!(?view, "ignoring capture request from a view outside a window");
                return;
            }
        };

        let evicted = self.capture.acquire(view);
        if let Some(previous) = evicted {
            if let Some((previous_window, previous_surface)) = self.view_window_surface(previous) {
                if previous_window != window {
                    self.backend.release_capture(previous_surface);
                }
            }
        }
        self.backend.set_capture(surface);
        debug!(?view, ?evicted, "pointer captured");

        if let Some(previous) = evicted {
            self.notify_capture_lost(previous);
        }
    }

    /// Releases capture if the view holds it. Does not notify the view.
    pub fn release_capture(&mut self, view: ViewId) {
        if !self.capture.release(view) {
            return;
        }
        if let Some((_, surface)) = self.view_window_surface(view) {
            self.backend.release_capture(surface);
        }
        debug!(?view, "pointer released");
    }

    pub fn has_capture(&self, view: ViewId) -> bool {
        self.capture.is_captured(view)
    }

    pub fn captured_view(&self) -> Option<ViewId> {
        self.capture.holder()
    }

    /// Handles the platform revoking capture behind the tree’s back.
    pub fn capture_lost(&mut self) {
        if let Some(view) = self.capture.clear() {
            debug!(?view, "pointer capture revoked");
            self.notify_capture_lost(view);
        }
    }

    fn notify_capture_lost(&self, view: ViewId) {
        if let Some(view) = self.nodes.get(&view) {
            view.handlers.on_capture_lost.emit(&());
        }
    }
}
