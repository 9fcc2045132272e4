//! Keyboard focus.
//!
//! The backend owns focus; these methods only ask it to move and read it back.

use crate::tree::ViewTree;
use crate::view::ViewId;
use crate::window::WindowId;
use tracing::{debug, trace};

struct FocusSearch {
    focused: Option<ViewId>,
    focus_on_next: bool,
    found: Option<ViewId>,
}

impl ViewTree {
    /// Gives keyboard focus to a view.
    ///
    /// Does nothing unless the view is focusable and in a window.
    pub fn focus(&mut self, view: ViewId) {
        let focusable = self.get(view).map_or(false, |v| v.is_focusable());
        let (_, surface) = match self.view_window_surface(view) {
            Some(found) if focusable => found,
            _ => {
                trace!(?view, "ignoring focus request");
                return;
            }
        };

        let previous = self.backend.focused_view(surface);
        if previous == Some(view) {
            return;
        }
        self.backend.set_focus(surface, Some(view));
        if let Some(previous) = previous {
            self.invalidate(previous);
        }
        self.invalidate(view);
        debug!(?view, ?previous, "focus changed");
    }

    pub fn has_focus(&self, view: ViewId) -> bool {
        self.view_window_surface(view)
            .map_or(false, |(_, surface)| self.backend.focused_view(surface) == Some(view))
    }

    pub fn focused_view(&self, window: WindowId) -> Option<ViewId> {
        self.backend.focused_view(self.window_surface(window)?)
    }

    /// Clears focus if the view has it.
    pub fn remove_focus(&mut self, view: ViewId) {
        if !self.has_focus(view) {
            return;
        }
        if let Some((_, surface)) = self.view_window_surface(view) {
            self.backend.set_focus(surface, None);
        }
        self.invalidate(view);
        debug!(?view, "focus removed");
    }

    /// Moves focus to the next (or previous) visible focusable view in tree order, wrapping
    /// around at the end.
    pub fn advance_focus(&mut self, window: WindowId, reverse: bool) {
        let root = match self.content_view(window) {
            Some(root) => root,
            None => return,
        };

        let focused = self.focused_view(window);
        let mut search = FocusSearch {
            focused,
            focus_on_next: focused.is_none(),
            found: None,
        };
        self.find_next_focus(root, reverse, &mut search);

        if search.found.is_none() && focused.is_some() {
            // wrap around
            search.focused = None;
            search.focus_on_next = true;
            self.find_next_focus(root, reverse, &mut search);
        }

        if let Some(next) = search.found {
            self.focus(next);
        }
    }

    fn find_next_focus(&self, container: ViewId, reverse: bool, search: &mut FocusSearch) -> bool {
        let mut found = false;
        self.for_each_child(container, reverse, &mut |child| {
            let view = match self.get(child) {
                Some(view) if view.is_visible() => view,
                _ => return true,
            };
            if view.is_container() && self.find_next_focus(child, reverse, search) {
                found = true;
                return false;
            }
            if search.focused == Some(child) {
                search.focus_on_next = true;
            } else if search.focus_on_next && view.is_focusable() && !view.is_disabled() {
                search.found = Some(child);
                found = true;
                return false;
            }
            true
        });
        found
    }
}
