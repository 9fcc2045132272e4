//! The view tree.

use crate::backend::{Backend, SurfaceId, SurfaceKind};
use crate::capture::CaptureCoordinator;
use crate::color::Color;
use crate::config::Theme;
use crate::container::{for_each_in, Adapter, BoxLayout, ContainerImpl, Orientation};
use crate::error::{Error, Result};
use crate::font::Font;
use crate::painter::Painter;
use crate::rect::Rect;
use crate::view::{ControlState, ViewId, ViewImpl, Widget};
use crate::window::{WindowId, WindowImpl};
use cgmath::{EuclideanSpace, Point2, Vector2, Zero};
use core::fmt;
use std::collections::HashMap;
use tracing::{debug, trace};

/// An arena of platform views and the windows they are attached to.
///
/// Views refer to each other by [`ViewId`]; a parent does not own its children. All mutation goes
/// through the tree so that invalidation, visibility, focus and capture stay consistent.
pub struct ViewTree {
    pub(crate) nodes: HashMap<ViewId, ViewImpl>,
    pub(crate) windows: HashMap<WindowId, WindowImpl>,
    pub(crate) backend: Box<dyn Backend>,
    pub(crate) capture: CaptureCoordinator,
    theme: Theme,
}

impl ViewTree {
    pub fn new(backend: Box<dyn Backend>) -> ViewTree {
        ViewTree::with_theme(backend, Theme::default())
    }

    pub fn with_theme(backend: Box<dyn Backend>, theme: Theme) -> ViewTree {
        ViewTree {
            nodes: HashMap::new(),
            windows: HashMap::new(),
            backend,
            capture: CaptureCoordinator::new(),
            theme,
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn backend(&self) -> &dyn Backend {
        &*self.backend
    }

    pub fn backend_mut(&mut self) -> &mut dyn Backend {
        &mut *self.backend
    }

    pub fn contains(&self, id: ViewId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: ViewId) -> Option<&ViewImpl> {
        self.nodes.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: ViewId) -> Option<&mut ViewImpl> {
        self.nodes.get_mut(&id)
    }

    fn new_view_impl(&self) -> ViewImpl {
        ViewImpl::new(
            self.theme.font.clone(),
            self.theme.text_color,
            self.theme.background_color,
        )
    }

    fn insert(&mut self, view: ViewImpl) -> ViewId {
        let id = view.id();
        trace!(?id, "created view");
        self.nodes.insert(id, view);
        id
    }

    /// Creates a plain view.
    pub fn create_view(&mut self) -> ViewId {
        let view = self.new_view_impl();
        self.insert(view)
    }

    /// Creates a view with custom drawing and input hooks.
    pub fn create_widget_view(&mut self, widget: Box<dyn Widget>) -> ViewId {
        let mut view = self.new_view_impl();
        view.widget = Some(widget);
        self.insert(view)
    }

    /// Creates a container laid out by the given adapter.
    pub fn create_container(&mut self, adapter: Box<dyn Adapter>) -> ViewId {
        let mut view = self.new_view_impl();
        view.container = Some(ContainerImpl::new(adapter));
        self.insert(view)
    }

    /// Creates a container with the default stacking layout.
    pub fn create_box(&mut self, orientation: Orientation) -> ViewId {
        self.create_container(Box::new(BoxLayout::new(orientation)))
    }

    /// Creates a view backed by its own native control surface.
    pub fn create_native_view(&mut self) -> Result<ViewId> {
        let surface = self.backend.new_surface(SurfaceKind::Control, Rect::zero())?;
        let mut view = self.new_view_impl();
        view.surface = Some(surface);
        Ok(self.insert(view))
    }

    /// Destroys a view and everything below it.
    ///
    /// The view is removed from its parent first, so a page view destroyed this way also leaves
    /// its tab.
    pub fn destroy_view(&mut self, id: ViewId) -> Result<()> {
        if !self.nodes.contains_key(&id) {
            return Err(Error::NoSuchView(id));
        }
        self.detach(id)?;
        for window in self.windows.values_mut() {
            if window.content_view == Some(id) {
                window.content_view = None;
            }
        }
        self.destroy_subtree(id);
        Ok(())
    }

    fn destroy_subtree(&mut self, id: ViewId) {
        self.call_adapter(id, |adapter, tree| adapter.destroy(tree, id));
        for child in self.children_of(id) {
            self.destroy_subtree(child);
        }

        self.remove_focus(id);
        self.release_capture(id);
        self.invalidate(id);
        for window in self.windows.values_mut() {
            window.hover_path.retain(|view| *view != id);
        }

        if let Some(view) = self.nodes.remove(&id) {
            if let Some(surface) = view.surface {
                self.backend.destroy_surface(surface);
            }
        }
        trace!(?id, "destroyed view");
    }

    // - structure

    /// The storage children of a container, in insertion order.
    ///
    /// Composite adapters may enumerate other views; see [`ViewTree::for_each_child`].
    pub fn children(&self, container: ViewId) -> &[ViewId] {
        self.nodes
            .get(&container)
            .and_then(|view| view.container.as_ref())
            .map_or(&[][..], |container| container.children.as_slice())
    }

    /// Enumerates a container’s children in adapter-defined order until `callback` returns false.
    pub fn for_each_child(
        &self,
        container: ViewId,
        reverse: bool,
        callback: &mut dyn FnMut(ViewId) -> bool,
    ) {
        let impl_ = match self.nodes.get(&container).and_then(|v| v.container.as_ref()) {
            Some(impl_) => impl_,
            None => return,
        };
        match &impl_.adapter {
            Some(adapter) => adapter.for_each(self, container, reverse, callback),
            None => for_each_in(&impl_.children, reverse, callback),
        }
    }

    pub(crate) fn children_of(&self, container: ViewId) -> Vec<ViewId> {
        let mut children = Vec::new();
        self.for_each_child(container, false, &mut |child| {
            children.push(child);
            true
        });
        children
    }

    pub fn has_child(&self, container: ViewId, child: ViewId) -> bool {
        let impl_ = match self.nodes.get(&container).and_then(|v| v.container.as_ref()) {
            Some(impl_) => impl_,
            None => return false,
        };
        match &impl_.adapter {
            Some(adapter) => adapter.has_child(self, container, child),
            None => impl_.children.contains(&child),
        }
    }

    /// Returns true if `ancestor` is a strict ancestor of `view`.
    pub fn is_ancestor(&self, ancestor: ViewId, view: ViewId) -> bool {
        let mut current = self.nodes.get(&view).and_then(|v| v.parent);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(&id).and_then(|v| v.parent);
        }
        false
    }

    pub fn add_child_view(&mut self, container: ViewId, child: ViewId) -> Result<()> {
        self.add_child_view_at(container, child, usize::MAX)
    }

    /// Inserts a child at an index (clamped to the child count), detaching it from any previous
    /// parent first.
    pub fn add_child_view_at(
        &mut self,
        container: ViewId,
        child: ViewId,
        index: usize,
    ) -> Result<()> {
        if !self.nodes.contains_key(&child) {
            return Err(Error::NoSuchView(child));
        }
        let accepts = match self.nodes.get(&container) {
            None => return Err(Error::NoSuchView(container)),
            Some(view) => match &view.container {
                Some(impl_) => impl_.adapter.as_ref().map_or(true, |a| a.accepts_children()),
                None => false,
            },
        };
        if !accepts {
            return Err(Error::NotAContainer(container));
        }

        let cycle = child == container || self.is_ancestor(child, container);
        debug_assert!(!cycle, "adding {:?} to {:?} would create a cycle", child, container);
        if cycle {
            return Err(Error::Cycle(child));
        }

        if self.nodes.get(&child).and_then(|v| v.parent).is_some() {
            self.detach(child)?;
        }
        if let Some(impl_) = self.container_mut(container) {
            let index = index.min(impl_.children.len());
            impl_.children.insert(index, child);
        }
        self.set_parent(child, Some(container));
        self.layout(container);
        debug!(?child, ?container, "added child view");
        Ok(())
    }

    /// Removes a child from a container. Does nothing if it is not a child of the container.
    pub fn remove_child_view(&mut self, container: ViewId, child: ViewId) -> Result<()> {
        let parent = self.nodes.get(&child).ok_or(Error::NoSuchView(child))?.parent;
        if parent != Some(container) {
            trace!(?child, ?container, "remove_child_view: not a child");
            return Ok(());
        }
        self.detach(child)
    }

    /// Removes a view from whatever parent it has.
    pub fn detach(&mut self, child: ViewId) -> Result<()> {
        let parent = match self.nodes.get(&child) {
            Some(view) => match view.parent {
                Some(parent) => parent,
                None => return Ok(()),
            },
            None => return Err(Error::NoSuchView(child)),
        };

        let in_storage = match self.container_mut(parent) {
            Some(impl_) => match impl_.children.iter().position(|c| *c == child) {
                Some(index) => {
                    impl_.children.remove(index);
                    true
                }
                None => false,
            },
            None => false,
        };
        if !in_storage {
            self.call_adapter(parent, |adapter, tree| {
                adapter.remove_child(tree, parent, child)
            });
        }
        if self.nodes.get(&child).and_then(|v| v.parent) == Some(parent) {
            self.set_parent(child, None);
        }
        if in_storage {
            self.layout(parent);
        }
        debug!(?child, ?parent, "detached view");
        Ok(())
    }

    /// Updates the parent link of a view and propagates window, visibility and scale factor into
    /// its subtree.
    ///
    /// This does not touch any container’s child list; adapters use it for views they track
    /// themselves.
    pub fn set_parent(&mut self, child: ViewId, parent: Option<ViewId>) {
        let window = parent
            .and_then(|parent| self.nodes.get(&parent))
            .and_then(|parent| parent.window);
        match self.nodes.get_mut(&child) {
            Some(view) => view.parent = parent,
            None => return,
        }
        self.attach(child, window);
        self.invalidate(child);
    }

    /// Moves a subtree into a window (or out of all windows).
    pub(crate) fn attach(&mut self, id: ViewId, window: Option<WindowId>) {
        let (old_window, parent) = match self.nodes.get(&id) {
            Some(view) => (view.window, view.parent),
            None => return,
        };
        let parent_tree_visible = parent
            .and_then(|parent| self.nodes.get(&parent))
            .map_or(true, |parent| parent.tree_visible);

        if old_window != window {
            self.remove_focus(id);
            self.release_capture(id);
            if let Some(old) = old_window.and_then(|w| self.windows.get_mut(&w)) {
                old.hover_path.retain(|view| *view != id);
            }
        }

        let new_scale = window
            .and_then(|w| self.windows.get(&w))
            .map(|w| w.scale_factor);
        let parent_surface = self.native_parent_surface(id, window);
        let view = match self.nodes.get_mut(&id) {
            Some(view) => view,
            None => return,
        };
        view.window = window;
        view.tree_visible = view.visible && parent_tree_visible;
        if let Some(scale) = new_scale {
            if scale != view.scale_factor {
                view.size_allocation = view
                    .size_allocation
                    .scale_to_nearest(scale / view.scale_factor);
                view.scale_factor = scale;
            }
        }
        if let Some(surface) = view.surface {
            self.backend.set_surface_parent(surface, parent_surface);
        }

        // children first so containers lay out already rescaled children
        for child in self.children_of(id) {
            self.attach(child, window);
        }
        self.dpi_changed(id);
    }

    /// The surface a native view nests in: the closest native ancestor, or else the window.
    fn native_parent_surface(&self, id: ViewId, window: Option<WindowId>) -> Option<SurfaceId> {
        let mut current = self.nodes.get(&id).and_then(|v| v.parent);
        while let Some(ancestor) = current {
            let view = self.nodes.get(&ancestor)?;
            if let Some(surface) = view.surface {
                return Some(surface);
            }
            current = view.parent;
        }
        self.window_surface(window?)
    }

    pub(crate) fn window_surface(&self, window: WindowId) -> Option<SurfaceId> {
        self.windows.get(&window).map(|w| w.surface)
    }

    /// The window a view is in and the window’s surface.
    pub(crate) fn view_window_surface(&self, id: ViewId) -> Option<(WindowId, SurfaceId)> {
        let window = self.nodes.get(&id)?.window?;
        Some((window, self.window_surface(window)?))
    }

    // - adapters and widgets

    fn container_mut(&mut self, id: ViewId) -> Option<&mut ContainerImpl> {
        self.nodes.get_mut(&id)?.container.as_mut()
    }

    fn take_adapter(&mut self, id: ViewId) -> Option<Box<dyn Adapter>> {
        self.container_mut(id)?.adapter.take()
    }

    /// Puts a lent-out adapter back and runs any layout requested in the meantime.
    fn restore_adapter(&mut self, id: ViewId, adapter: Box<dyn Adapter>) {
        let pending = match self.container_mut(id) {
            Some(impl_) => {
                impl_.adapter = Some(adapter);
                core::mem::replace(&mut impl_.layout_pending, false)
            }
            // destroyed while lent out
            None => false,
        };
        if pending {
            self.layout(id);
        }
    }

    /// Lends a container’s adapter out for one call.
    ///
    /// Returns `None` if the view is not a container or its adapter is already lent out.
    pub(crate) fn call_adapter<R>(
        &mut self,
        id: ViewId,
        f: impl FnOnce(&mut dyn Adapter, &mut ViewTree) -> R,
    ) -> Option<R> {
        let mut adapter = self.take_adapter(id)?;
        let result = f(&mut *adapter, self);
        self.restore_adapter(id, adapter);
        Some(result)
    }

    /// Calls `f` with a container’s adapter downcast to `A`.
    pub fn with_adapter<A: Adapter, R>(
        &mut self,
        id: ViewId,
        f: impl FnOnce(&mut A, &mut ViewTree) -> R,
    ) -> Option<R> {
        let mut adapter = self.take_adapter(id)?;
        let result = adapter
            .as_any_mut()
            .downcast_mut::<A>()
            .map(|adapter| f(adapter, self));
        self.restore_adapter(id, adapter);
        result
    }

    pub fn adapter<A: Adapter>(&self, id: ViewId) -> Option<&A> {
        self.nodes
            .get(&id)?
            .container
            .as_ref()?
            .adapter
            .as_ref()?
            .as_any()
            .downcast_ref::<A>()
    }

    /// Calls `f` with a view’s widget downcast to `W`.
    pub fn with_widget<W: Widget, R>(
        &mut self,
        id: ViewId,
        f: impl FnOnce(&mut W, &mut ViewImpl, &dyn Backend) -> R,
    ) -> Option<R> {
        let ViewTree { nodes, backend, .. } = self;
        let view = nodes.get_mut(&id)?;
        let mut widget = view.widget.take()?;
        let result = widget
            .as_any_mut()
            .downcast_mut::<W>()
            .map(|widget| f(widget, view, &**backend));
        view.widget = Some(widget);
        result
    }

    pub fn widget<W: Widget>(&self, id: ViewId) -> Option<&W> {
        self.nodes
            .get(&id)?
            .widget
            .as_ref()?
            .as_any()
            .downcast_ref::<W>()
    }

    pub(crate) fn call_widget<R>(
        &mut self,
        id: ViewId,
        f: impl FnOnce(&mut dyn Widget, &mut ViewImpl) -> R,
    ) -> Option<R> {
        let view = self.nodes.get_mut(&id)?;
        let mut widget = view.widget.take()?;
        let result = f(&mut *widget, view);
        view.widget = Some(widget);
        Some(result)
    }

    // - layout

    /// Lays out a container’s children.
    ///
    /// If the container’s adapter is currently running, the layout is deferred until it returns.
    pub fn layout(&mut self, id: ViewId) {
        let impl_ = match self.container_mut(id) {
            Some(impl_) => impl_,
            None => return,
        };
        let mut adapter = match impl_.adapter.take() {
            Some(adapter) => adapter,
            None => {
                impl_.layout_pending = true;
                trace!(?id, "deferring re-entrant layout");
                return;
            }
        };
        adapter.layout(self, id);
        self.restore_adapter(id, adapter);
    }

    /// Assigns a view its rectangle in window pixels.
    ///
    /// Repaints the old and new areas, notifies size handlers if the size changed, and lays out
    /// containers. Assigning the current allocation again does nothing.
    pub fn size_allocate(&mut self, id: ViewId, rect: Rect) {
        let (old, surface, is_container) = match self.nodes.get(&id) {
            Some(view) if view.size_allocation == rect => return,
            Some(view) => (view.size_allocation, view.surface, view.is_container()),
            None => return,
        };

        self.invalidate_rect(id, old);
        let on_size_changed = match self.nodes.get_mut(&id) {
            Some(view) => {
                view.size_allocation = rect;
                view.handlers.on_size_changed.clone()
            }
            None => return,
        };
        self.invalidate_rect(id, rect);

        if let Some(surface) = surface {
            self.backend.set_surface_bounds(surface, rect);
        }
        if old.size != rect.size {
            on_size_changed.emit(&rect.size);
        }
        if is_container {
            self.layout(id);
        }
    }

    /// The minimum size of a view, in pixels.
    pub fn minimum_size(&mut self, id: ViewId) -> Vector2<f64> {
        let (is_container, preferred, scale) = match self.nodes.get(&id) {
            Some(view) => (view.is_container(), view.preferred_size, view.scale_factor),
            None => return Vector2::zero(),
        };
        if is_container {
            self.call_adapter(id, |adapter, tree| adapter.minimum_size(tree, id))
                .unwrap_or_else(Vector2::zero)
        } else {
            preferred * scale
        }
    }

    /// Sets the natural size of a leaf view, in logical units.
    pub fn set_preferred_size(&mut self, id: ViewId, size: Vector2<f64>) {
        let parent = match self.nodes.get_mut(&id) {
            Some(view) => {
                view.preferred_size = size;
                view.parent
            }
            None => return,
        };
        if let Some(parent) = parent {
            self.layout(parent);
        }
    }

    pub fn scale_factor(&self, id: ViewId) -> f64 {
        self.nodes.get(&id).map_or(1., |view| view.scale_factor)
    }

    /// Drops cached measurements after the scale factor may have changed.
    pub(crate) fn dpi_changed(&mut self, id: ViewId) {
        self.call_widget(id, |widget, view| widget.on_dpi_changed(view));
        self.call_adapter(id, |adapter, tree| adapter.dpi_changed(tree, id));
    }

    // - appearance

    /// The visible part of a view in window pixels, clipped by all of its ancestors.
    pub fn clipped_rect(&self, id: ViewId) -> Rect {
        let view = match self.nodes.get(&id) {
            Some(view) if view.visible => view,
            _ => return Rect::zero(),
        };
        match view.parent {
            Some(parent) => view
                .size_allocation
                .intersect(self.clipped_rect(parent))
                .unwrap_or_else(Rect::zero),
            None => view.size_allocation,
        }
    }

    /// Requests a repaint of a view’s visible area.
    pub fn invalidate(&mut self, id: ViewId) {
        let rect = match self.nodes.get(&id) {
            Some(view) => view.size_allocation,
            None => return,
        };
        self.invalidate_rect(id, rect);
    }

    /// Requests a repaint of part of a view, in window pixels.
    ///
    /// The rectangle is clipped to the view’s visible area; views outside a window are ignored.
    pub fn invalidate_rect(&mut self, id: ViewId, rect: Rect) {
        let surface = match self.view_window_surface(id) {
            Some((_, surface)) => surface,
            None => return,
        };
        if let Some(dirty) = rect.intersect(self.clipped_rect(id)) {
            self.backend.invalidate(surface, dirty);
        }
    }

    pub fn set_visible(&mut self, id: ViewId, visible: bool) {
        match self.nodes.get(&id) {
            Some(view) if view.visible != visible => (),
            _ => return,
        }
        // old area first; hidden views have an empty clip
        self.invalidate(id);
        let parent = match self.nodes.get_mut(&id) {
            Some(view) => {
                view.visible = visible;
                view.parent
            }
            None => return,
        };
        self.visibility_changed(id);
        self.invalidate(id);
        if let Some(parent) = parent {
            self.layout(parent);
        }
    }

    fn visibility_changed(&mut self, id: ViewId) {
        let parent_tree_visible = self
            .nodes
            .get(&id)
            .and_then(|view| view.parent)
            .and_then(|parent| self.nodes.get(&parent))
            .map_or(true, |parent| parent.tree_visible);
        let tree_visible = match self.nodes.get_mut(&id) {
            Some(view) => {
                view.tree_visible = view.visible && parent_tree_visible;
                view.tree_visible
            }
            None => return,
        };
        if !tree_visible {
            self.remove_focus(id);
        }
        for child in self.children_of(id) {
            self.visibility_changed(child);
        }
    }

    /// Sets the visual state and repaints the view if it changed.
    pub fn set_state(&mut self, id: ViewId, state: ControlState) {
        match self.nodes.get_mut(&id) {
            Some(view) if view.state != state => view.state = state,
            _ => return,
        }
        self.invalidate(id);
    }

    /// Disabled views consume pointer events without reacting to them.
    pub fn set_enabled(&mut self, id: ViewId, enabled: bool) {
        let disabled = self.nodes.get(&id).map_or(false, |view| view.is_disabled());
        if enabled && disabled {
            self.set_state(id, ControlState::Normal);
        } else if !enabled {
            self.set_state(id, ControlState::Disabled);
        }
    }

    pub fn set_focusable(&mut self, id: ViewId, focusable: bool) {
        match self.nodes.get_mut(&id) {
            Some(view) => view.focusable = focusable,
            None => return,
        }
        if !focusable {
            self.remove_focus(id);
        }
    }

    /// Draggable views act as window captions.
    pub fn set_draggable(&mut self, id: ViewId, draggable: bool) {
        if let Some(view) = self.nodes.get_mut(&id) {
            view.draggable = draggable;
        }
    }

    pub fn set_font(&mut self, id: ViewId, font: Font) {
        match self.nodes.get_mut(&id) {
            Some(view) => view.font = font,
            None => return,
        }
        self.call_widget(id, |widget, view| widget.on_font_changed(view));
        self.call_adapter(id, |adapter, tree| adapter.font_changed(tree, id));
        self.invalidate(id);
    }

    pub fn set_color(&mut self, id: ViewId, color: Color) {
        match self.nodes.get_mut(&id) {
            Some(view) => view.color = color,
            None => return,
        }
        self.call_adapter(id, |adapter, tree| adapter.color_changed(tree, id));
        self.invalidate(id);
    }

    pub fn set_background_color(&mut self, id: ViewId, color: Color) {
        match self.nodes.get_mut(&id) {
            Some(view) => view.background_color = color,
            None => return,
        }
        self.invalidate(id);
    }

    // - painting

    /// Draws a view. The painter must already be translated to the view’s origin; `dirty` is in
    /// view coordinates.
    pub fn draw_view(&self, id: ViewId, painter: &mut dyn Painter, dirty: Rect) {
        let view = match self.nodes.get(&id) {
            Some(view) => view,
            None => return,
        };
        if let Some(adapter) = view.container.as_ref().and_then(|c| c.adapter.as_ref()) {
            adapter.draw(self, id, painter, dirty);
        } else if let Some(widget) = &view.widget {
            widget.draw(view, painter, dirty);
        } else {
            view.draw_background(painter, dirty);
        }
    }

    /// Draws a visible child of `parent`. `dirty` is in the parent’s coordinates.
    pub fn draw_child(&self, parent: ViewId, child: ViewId, painter: &mut dyn Painter, dirty: Rect) {
        let (parent_view, child_view) = match (self.nodes.get(&parent), self.nodes.get(&child)) {
            (Some(parent), Some(child)) => (parent, child),
            _ => return,
        };
        if !child_view.visible {
            return;
        }

        let rect = child_view.size_allocation - parent_view.size_allocation.origin.to_vec();
        let dirty = match dirty.intersect(rect) {
            Some(dirty) => dirty,
            None => return,
        };
        let offset = rect.origin.to_vec();
        painter.save();
        painter.translate(offset);
        painter.clip_rect(Rect::from_size(rect.size));
        self.draw_view(child, painter, dirty - offset);
        painter.restore();
    }

    /// Finds the deepest visible view under a point in window pixels, starting at `root`.
    ///
    /// Children are tested top-most first.
    pub fn hit_test(&self, root: ViewId, point: Point2<f64>) -> Option<ViewId> {
        let view = self.nodes.get(&root)?;
        if !view.visible || !view.size_allocation.contains(point) {
            return None;
        }
        if view.is_container() {
            let mut hit = None;
            self.for_each_child(root, true, &mut |child| match self.hit_test(child, point) {
                Some(found) => {
                    hit = Some(found);
                    false
                }
                None => true,
            });
            if hit.is_some() {
                return hit;
            }
        }
        Some(root)
    }
}

impl fmt::Debug for ViewTree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ViewTree")
            .field("views", &self.nodes.len())
            .field("windows", &self.windows.len())
            .field("capture", &self.capture)
            .field("theme", &self.theme)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessBackend;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn setup() -> (HeadlessBackend, ViewTree, WindowId) {
        let backend = HeadlessBackend::new();
        let mut tree = ViewTree::new(Box::new(backend.clone()));
        let window = tree.create_window(Vector2::new(200., 100.)).unwrap();
        (backend, tree, window)
    }

    #[test]
    fn reparenting_updates_both_sides() {
        let (_, mut tree, _) = setup();
        let a = tree.create_box(Orientation::Vertical);
        let b = tree.create_box(Orientation::Vertical);
        let child = tree.create_view();

        tree.add_child_view(a, child).unwrap();
        tree.add_child_view(b, child).unwrap();

        assert!(tree.children(a).is_empty());
        assert_eq!(tree.children(b), &[child]);
        assert_eq!(tree.get(child).unwrap().parent(), Some(b));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "cycle")]
    fn adding_an_ancestor_fails_fast() {
        let (_, mut tree, _) = setup();
        let outer = tree.create_box(Orientation::Vertical);
        let inner = tree.create_box(Orientation::Vertical);
        tree.add_child_view(outer, inner).unwrap();
        let _ = tree.add_child_view(inner, outer);
    }

    #[test]
    fn leaf_views_are_not_containers() {
        let (_, mut tree, _) = setup();
        let leaf = tree.create_view();
        let other = tree.create_view();
        assert_eq!(tree.add_child_view(leaf, other), Err(Error::NotAContainer(leaf)));
    }

    #[test]
    fn same_allocation_is_a_no_op() {
        let (backend, mut tree, window) = setup();
        let root = tree.create_box(Orientation::Vertical);
        tree.set_content_view(window, root).unwrap();
        let view = tree.create_view();
        tree.add_child_view(root, view).unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&calls);
        tree.get(view).unwrap().handlers.on_size_changed.connect(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        let rect = Rect::from_xywh(0., 0., 20., 20.);
        tree.size_allocate(view, rect);
        let surface = tree.window(window).unwrap().surface();
        backend.take_dirty(surface);

        tree.size_allocate(view, rect);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(backend.take_dirty(surface), None);
    }

    #[test]
    fn invalidation_is_clipped_to_ancestors() {
        let (backend, mut tree, window) = setup();
        let root = tree.create_box(Orientation::Vertical);
        tree.set_content_view(window, root).unwrap();
        let surface = tree.window(window).unwrap().surface();

        let view = tree.create_view();
        tree.add_child_view(root, view).unwrap();
        tree.size_allocate(view, Rect::from_xywh(150., 50., 100., 100.));
        backend.take_dirty(surface);

        tree.invalidate(view);
        assert_eq!(
            backend.take_dirty(surface),
            Some(Rect::from_xywh(150., 50., 50., 50.))
        );

        tree.set_visible(view, false);
        backend.take_dirty(surface);
        tree.invalidate(view);
        assert_eq!(backend.take_dirty(surface), None);
    }

    #[test]
    fn hidden_subtrees_lose_tree_visibility() {
        let (_, mut tree, _) = setup();
        let outer = tree.create_box(Orientation::Vertical);
        let inner = tree.create_box(Orientation::Vertical);
        let leaf = tree.create_view();
        tree.add_child_view(outer, inner).unwrap();
        tree.add_child_view(inner, leaf).unwrap();

        tree.set_visible(outer, false);
        assert!(tree.get(leaf).unwrap().is_visible());
        assert!(!tree.get(leaf).unwrap().is_tree_visible());

        tree.set_visible(outer, true);
        assert!(tree.get(leaf).unwrap().is_tree_visible());
    }

    #[test]
    fn destroying_a_container_destroys_its_subtree() {
        let (_, mut tree, _) = setup();
        let outer = tree.create_box(Orientation::Vertical);
        let inner = tree.create_box(Orientation::Vertical);
        let leaf = tree.create_view();
        tree.add_child_view(outer, inner).unwrap();
        tree.add_child_view(inner, leaf).unwrap();

        tree.destroy_view(inner).unwrap();
        assert!(!tree.contains(inner));
        assert!(!tree.contains(leaf));
        assert!(tree.children(outer).is_empty());
        assert_eq!(tree.destroy_view(leaf), Err(Error::NoSuchView(leaf)));
    }

    #[test]
    fn hit_test_prefers_top_most_child() {
        let (_, mut tree, window) = setup();
        let root = tree.create_box(Orientation::Vertical);
        tree.set_content_view(window, root).unwrap();
        let a = tree.create_view();
        let b = tree.create_view();
        tree.add_child_view(root, a).unwrap();
        tree.add_child_view(root, b).unwrap();
        tree.size_allocate(a, Rect::from_xywh(0., 0., 50., 50.));
        tree.size_allocate(b, Rect::from_xywh(25., 25., 50., 50.));

        assert_eq!(tree.hit_test(root, Point2::new(30., 30.)), Some(b));
        assert_eq!(tree.hit_test(root, Point2::new(10., 10.)), Some(a));
        assert_eq!(tree.hit_test(root, Point2::new(190., 90.)), Some(root));
        assert_eq!(tree.hit_test(root, Point2::new(250., 10.)), None);
    }

    #[test]
    fn native_views_follow_their_window() {
        let (backend, mut tree, window) = setup();
        let root = tree.create_box(Orientation::Vertical);
        tree.set_content_view(window, root).unwrap();
        let native = tree.create_native_view().unwrap();
        let surface = tree.get(native).unwrap().surface().unwrap();

        tree.add_child_view(root, native).unwrap();
        let window_surface = tree.window(window).unwrap().surface();
        assert_eq!(backend.state().surfaces[&surface].parent, Some(window_surface));
        assert_eq!(
            backend.state().surfaces[&surface].bounds,
            tree.get(native).unwrap().size_allocation()
        );

        tree.destroy_view(native).unwrap();
        assert!(!backend.state().surfaces.contains_key(&surface));
    }
}
