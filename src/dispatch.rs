//! Routing of pointer and keyboard events into the view tree.

use crate::events::{
    KeyCode, KeyEvent, KeyEventType, KeyModifiers, MouseButton, MouseEvent, MouseEventType,
};
use crate::tree::ViewTree;
use crate::view::{ControlState, ViewId};
use crate::window::WindowId;
use cgmath::{EuclideanSpace, Point2};
use tracing::trace;

impl ViewTree {
    fn make_mouse_event(
        &self,
        view: ViewId,
        kind: MouseEventType,
        button: Option<MouseButton>,
        location: Point2<f64>,
        modifiers: KeyModifiers,
    ) -> MouseEvent {
        let origin = self
            .get(view)
            .map_or(Point2::origin(), |view| view.size_allocation().origin);
        MouseEvent {
            kind,
            button,
            location: location - origin.to_vec(),
            window_location: location,
            modifiers,
        }
    }

    /// The capture holder, if it is in the given window.
    fn capture_holder_in(&self, window: WindowId) -> Option<ViewId> {
        let holder = self.capture.holder()?;
        match self.get(holder)?.window() {
            Some(w) if w == window => Some(holder),
            _ => None,
        }
    }

    /// The views under a point, outermost first.
    fn hover_path_at(&self, window: WindowId, location: Point2<f64>) -> Vec<ViewId> {
        let root = match self.content_view(window) {
            Some(root) => root,
            None => return Vec::new(),
        };
        let mut path = Vec::new();
        let mut current = self.hit_test(root, location);
        while let Some(view) = current {
            path.push(view);
            current = if view == root {
                None
            } else {
                self.get(view).and_then(|v| v.parent())
            };
        }
        path.reverse();
        path
    }

    fn state_of(&self, view: ViewId) -> Option<ControlState> {
        self.get(view).map(|view| view.state())
    }

    fn update_hover(
        &mut self,
        window: WindowId,
        path: Vec<ViewId>,
        location: Point2<f64>,
        modifiers: KeyModifiers,
    ) {
        let old = match self.windows.get_mut(&window) {
            Some(w) => core::mem::take(&mut w.hover_path),
            None => return,
        };
        for view in old.iter().rev() {
            if !path.contains(view) {
                let event =
                    self.make_mouse_event(*view, MouseEventType::Leave, None, location, modifiers);
                self.mouse_leave(*view, &event);
            }
        }
        for view in &path {
            if !old.contains(view) {
                let event =
                    self.make_mouse_event(*view, MouseEventType::Enter, None, location, modifiers);
                self.mouse_enter(*view, &event);
            }
        }
        if let Some(w) = self.windows.get_mut(&window) {
            w.hover_path = path;
        }
    }

    fn mouse_enter(&mut self, view: ViewId, event: &MouseEvent) {
        let before = match self.get_mut(view) {
            Some(v) => {
                let before = v.state();
                v.base_mouse_enter();
                before
            }
            None => return,
        };
        self.call_widget(view, |widget, v| widget.on_mouse_enter(v, event));
        if self.state_of(view) != Some(before) {
            self.invalidate(view);
        }
        if let Some(v) = self.get(view) {
            v.handlers.on_mouse_enter.clone().emit(event);
        }
    }

    fn mouse_leave(&mut self, view: ViewId, event: &MouseEvent) {
        let before = match self.get_mut(view) {
            Some(v) => {
                let before = v.state();
                v.base_mouse_leave();
                before
            }
            None => return,
        };
        self.call_widget(view, |widget, v| widget.on_mouse_leave(v, event));
        if self.state_of(view) != Some(before) {
            self.invalidate(view);
        }
        if let Some(v) = self.get(view) {
            v.handlers.on_mouse_leave.clone().emit(event);
        }
    }

    /// Base click handling followed by the widget hook. Returns true if consumed.
    fn mouse_click(&mut self, view: ViewId, event: &MouseEvent) -> bool {
        let (disabled, focusable) = match self.get(view) {
            Some(v) => (v.is_disabled(), v.is_focusable()),
            None => return false,
        };
        if disabled {
            return true;
        }
        if focusable && event.is_primary_down() {
            self.focus(view);
        }

        let handlers = match (self.get(view), event.kind) {
            (Some(v), MouseEventType::Down) => v.handlers.on_mouse_down.clone(),
            (Some(v), MouseEventType::Up) => v.handlers.on_mouse_up.clone(),
            _ => return false,
        };
        if handlers.emit(event) {
            return true;
        }

        let before = self.state_of(view);
        let consumed = self
            .call_widget(view, |widget, v| widget.on_mouse_click(v, event))
            .unwrap_or(false);
        if self.state_of(view) != before {
            self.invalidate(view);
        }
        consumed
    }

    /// Handles pointer motion inside a window, in window pixels.
    ///
    /// Updates hover state along the path to the deepest view under the pointer. While a view
    /// holds capture, it receives the motion directly and hover state is frozen.
    pub fn dispatch_mouse_move(
        &mut self,
        window: WindowId,
        location: Point2<f64>,
        modifiers: KeyModifiers,
    ) {
        match self.windows.get_mut(&window) {
            Some(w) => w.pointer = location,
            None => return,
        }

        let target = match self.capture_holder_in(window) {
            Some(holder) => Some(holder),
            None => {
                let path = self.hover_path_at(window, location);
                let target = path.last().copied();
                self.update_hover(window, path, location, modifiers);
                target
            }
        };
        if let Some(target) = target {
            let event =
                self.make_mouse_event(target, MouseEventType::Move, None, location, modifiers);
            if let Some(v) = self.get(target) {
                v.handlers.on_mouse_move.clone().emit(&event);
            }
        }
    }

    /// Handles the pointer leaving a window.
    pub fn dispatch_mouse_leave(&mut self, window: WindowId) {
        let location = match self.windows.get(&window) {
            Some(w) => w.pointer,
            None => return,
        };
        if self.capture_holder_in(window).is_some() {
            return;
        }
        self.update_hover(window, Vec::new(), location, KeyModifiers::default());
    }

    /// Handles a button press or release, in window pixels. Returns true if a view consumed it.
    ///
    /// The event goes to the capture holder if there is one. Otherwise it bubbles from the deepest
    /// view under the pointer towards the root; at each level the view itself gets a chance to
    /// consume it, then its parent container’s adapter.
    pub fn dispatch_mouse_button(
        &mut self,
        window: WindowId,
        kind: MouseEventType,
        button: MouseButton,
        location: Point2<f64>,
        modifiers: KeyModifiers,
    ) -> bool {
        if let Some(holder) = self.capture_holder_in(window) {
            let event = self.make_mouse_event(holder, kind, Some(button), location, modifiers);
            return self.mouse_click(holder, &event);
        }

        let root = match self.content_view(window) {
            Some(root) => root,
            None => return false,
        };
        let mut current = match self.hit_test(root, location) {
            Some(view) => view,
            None => return false,
        };
        loop {
            let event = self.make_mouse_event(current, kind, Some(button), location, modifiers);
            if self.mouse_click(current, &event) {
                trace!(view = ?current, ?kind, "click consumed");
                return true;
            }
            let parent = match self.get(current).and_then(|v| v.parent()) {
                Some(parent) if current != root => parent,
                _ => return false,
            };
            let child = current;
            let consumed = self
                .call_adapter(parent, |adapter, tree| {
                    adapter.on_child_click(tree, parent, child, &event)
                })
                .unwrap_or(false);
            if consumed {
                trace!(view = ?parent, ?kind, "click consumed by container");
                return true;
            }
            current = parent;
        }
    }

    /// Handles a key event. Returns true if it was consumed.
    ///
    /// The event goes to the focused view and bubbles up to the root. An unconsumed Tab press
    /// moves focus (backwards with Shift).
    pub fn dispatch_key(&mut self, window: WindowId, event: KeyEvent) -> bool {
        let mut current = self.focused_view(window);
        while let Some(view) = current {
            let (handlers, parent) = match self.get(view) {
                Some(v) => match event.kind {
                    KeyEventType::Down => (v.handlers.on_key_down.clone(), v.parent()),
                    KeyEventType::Up => (v.handlers.on_key_up.clone(), v.parent()),
                },
                None => break,
            };
            if handlers.emit(&event) {
                return true;
            }
            current = parent;
        }

        if event.kind == KeyEventType::Down && event.code == KeyCode::Tab {
            self.advance_focus(window, event.modifiers.shift);
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::Orientation;
    use crate::headless::HeadlessBackend;
    use crate::rect::Rect;
    use cgmath::Vector2;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn setup() -> (ViewTree, WindowId, ViewId, ViewId) {
        let mut tree = ViewTree::new(Box::new(HeadlessBackend::new()));
        let window = tree.create_window(Vector2::new(100., 100.)).unwrap();
        let root = tree.create_box(Orientation::Vertical);
        let inner = tree.create_box(Orientation::Vertical);
        let leaf = tree.create_view();
        tree.add_child_view(root, inner).unwrap();
        tree.add_child_view(inner, leaf).unwrap();
        tree.set_content_view(window, root).unwrap();
        tree.size_allocate(inner, Rect::from_xywh(0., 0., 50., 50.));
        tree.size_allocate(leaf, Rect::from_xywh(10., 10., 20., 20.));
        (tree, window, inner, leaf)
    }

    fn record(log: &Arc<Mutex<Vec<String>>>, name: &'static str) -> impl FnMut(&MouseEvent) {
        let log = Arc::clone(log);
        move |event| log.lock().push(format!("{} {:?}", name, event.kind))
    }

    #[test]
    fn hover_enters_outermost_first_and_leaves_deepest_first() {
        let (mut tree, window, inner, leaf) = setup();
        let log = Arc::new(Mutex::new(Vec::new()));
        for (view, name) in [(inner, "inner"), (leaf, "leaf")] {
            let handlers = &tree.get(view).unwrap().handlers;
            handlers.on_mouse_enter.connect(record(&log, name));
            handlers.on_mouse_leave.connect(record(&log, name));
        }

        tree.dispatch_mouse_move(window, Point2::new(15., 15.), KeyModifiers::default());
        assert_eq!(tree.get(leaf).unwrap().state(), ControlState::Hovered);
        tree.dispatch_mouse_move(window, Point2::new(80., 80.), KeyModifiers::default());
        assert_eq!(tree.get(leaf).unwrap().state(), ControlState::Normal);

        assert_eq!(
            *log.lock(),
            vec!["inner Enter", "leaf Enter", "leaf Leave", "inner Leave"]
        );
    }

    #[test]
    fn clicks_bubble_until_consumed() {
        let (mut tree, window, inner, leaf) = setup();
        let log = Arc::new(Mutex::new(Vec::new()));
        let l = Arc::clone(&log);
        tree.get(leaf).unwrap().handlers.on_mouse_down.connect(move |event| {
            l.lock().push(format!("leaf {:?}", event.location));
        });
        let l = Arc::clone(&log);
        tree.get(inner)
            .unwrap()
            .handlers
            .on_mouse_down
            .connect_consuming(move |event| {
                l.lock().push(format!("inner {:?}", event.location));
                true
            });

        let consumed = tree.dispatch_mouse_button(
            window,
            MouseEventType::Down,
            MouseButton::Primary,
            Point2::new(15., 15.),
            KeyModifiers::default(),
        );
        assert!(consumed);
        assert_eq!(
            *log.lock(),
            vec![
                format!("leaf {:?}", Point2::new(5., 5.)),
                format!("inner {:?}", Point2::new(15., 15.)),
            ]
        );
    }

    #[test]
    fn disabled_views_swallow_clicks() {
        let (mut tree, window, inner, leaf) = setup();
        let log = Arc::new(Mutex::new(Vec::new()));
        tree.get(inner)
            .unwrap()
            .handlers
            .on_mouse_down
            .connect(record(&log, "inner"));
        tree.set_enabled(leaf, false);

        assert!(tree.dispatch_mouse_button(
            window,
            MouseEventType::Down,
            MouseButton::Primary,
            Point2::new(15., 15.),
            KeyModifiers::default(),
        ));
        assert!(log.lock().is_empty());
    }

    #[test]
    fn captured_view_receives_pointer_events_outside_its_bounds() {
        let (mut tree, window, inner, leaf) = setup();
        let log = Arc::new(Mutex::new(Vec::new()));
        tree.get(leaf).unwrap().handlers.on_mouse_up.connect(record(&log, "leaf"));
        tree.get(inner).unwrap().handlers.on_mouse_up.connect(record(&log, "inner"));
        tree.set_capture(leaf);

        tree.dispatch_mouse_button(
            window,
            MouseEventType::Up,
            MouseButton::Primary,
            Point2::new(90., 90.),
            KeyModifiers::default(),
        );
        assert_eq!(*log.lock(), vec!["leaf Up"]);
    }

    #[test]
    fn focusable_views_take_focus_on_primary_press() {
        let (mut tree, window, _, leaf) = setup();
        tree.set_focusable(leaf, true);
        tree.dispatch_mouse_button(
            window,
            MouseEventType::Down,
            MouseButton::Secondary,
            Point2::new(15., 15.),
            KeyModifiers::default(),
        );
        assert_eq!(tree.focused_view(window), None);
        tree.dispatch_mouse_button(
            window,
            MouseEventType::Down,
            MouseButton::Primary,
            Point2::new(15., 15.),
            KeyModifiers::default(),
        );
        assert_eq!(tree.focused_view(window), Some(leaf));
    }

    #[test]
    fn keys_bubble_from_the_focused_view() {
        let (mut tree, window, inner, leaf) = setup();
        tree.set_focusable(leaf, true);
        tree.focus(leaf);
        let log = Arc::new(Mutex::new(Vec::new()));
        let l = Arc::clone(&log);
        tree.get(inner)
            .unwrap()
            .handlers
            .on_key_down
            .connect_consuming(move |event| {
                l.lock().push(event.code);
                event.code == KeyCode::Return
            });

        let key = |code| KeyEvent {
            kind: KeyEventType::Down,
            code,
            modifiers: KeyModifiers::default(),
        };
        assert!(tree.dispatch_key(window, key(KeyCode::Return)));
        assert!(!tree.dispatch_key(window, key(KeyCode::Char('a'))));
        assert_eq!(*log.lock(), vec![KeyCode::Return, KeyCode::Char('a')]);
    }

    #[test]
    fn only_the_tab_key_moves_focus() {
        let (mut tree, window, _, leaf) = setup();
        tree.set_focusable(leaf, true);
        let key = |code| KeyEvent {
            kind: KeyEventType::Down,
            code,
            modifiers: KeyModifiers::default(),
        };

        assert!(!tree.dispatch_key(window, key(KeyCode::Other(0x35))));
        assert!(!tree.dispatch_key(window, key(KeyCode::Char('\t'))));
        assert_eq!(tree.focused_view(window), None);

        assert!(tree.dispatch_key(window, key(KeyCode::Tab)));
        assert_eq!(tree.focused_view(window), Some(leaf));
    }
}
