//! Containers and their layout adapters.

use crate::events::MouseEvent;
use crate::painter::Painter;
use crate::rect::Rect;
use crate::tree::ViewTree;
use crate::view::ViewId;
use cgmath::{Vector2, Zero};
use core::any::Any;
use core::fmt;

/// The container part of a view: an ordered list of children plus the adapter that lays them out.
#[derive(Debug)]
pub struct ContainerImpl {
    /// Insertion order is z-order and default iteration order.
    pub(crate) children: Vec<ViewId>,
    /// `None` while the tree has lent the adapter out for a call.
    pub(crate) adapter: Option<Box<dyn Adapter>>,
    /// Set when layout was requested while the adapter was lent out.
    pub(crate) layout_pending: bool,
}

impl ContainerImpl {
    pub(crate) fn new(adapter: Box<dyn Adapter>) -> ContainerImpl {
        ContainerImpl {
            children: Vec::new(),
            adapter: Some(adapter),
            layout_pending: false,
        }
    }
}

/// Layout, enumeration and drawing policy for a container.
///
/// Composite widgets implement this instead of subclassing the container. The tree lends the
/// adapter out while calling the `&mut self` methods, so an adapter may freely mutate the tree;
/// a layout requested for the same container in the meantime is deferred until the current call
/// returns.
pub trait Adapter: Any + fmt::Debug {
    /// Assigns a size allocation to every child, based on the container’s own allocation.
    fn layout(&mut self, tree: &mut ViewTree, container: ViewId);

    /// Enumerates children in adapter-defined order until `callback` returns false.
    ///
    /// `reverse` enumerates top-most first, for event dispatch.
    fn for_each(
        &self,
        tree: &ViewTree,
        container: ViewId,
        reverse: bool,
        callback: &mut dyn FnMut(ViewId) -> bool,
    ) {
        for_each_in(tree.children(container), reverse, callback);
    }

    /// Membership test; may include views that are only logically associated with the container.
    fn has_child(&self, tree: &ViewTree, container: ViewId, child: ViewId) -> bool {
        tree.children(container).contains(&child)
    }

    /// The smallest size, in pixels, that fits all children.
    ///
    /// Adding a child must never decrease it; removing one must never increase it.
    fn minimum_size(&mut self, tree: &mut ViewTree, container: ViewId) -> Vector2<f64>;

    /// Draws the container in its own coordinate space.
    ///
    /// The default draws the background, then every visible child in enumeration order.
    fn draw(&self, tree: &ViewTree, container: ViewId, painter: &mut dyn Painter, dirty: Rect) {
        if let Some(view) = tree.get(container) {
            view.draw_background(painter, dirty);
        }
        tree.for_each_child(container, false, &mut |child| {
            tree.draw_child(container, child, painter, dirty);
            true
        });
    }

    /// Whether plain children may be added to the container’s storage.
    fn accepts_children(&self) -> bool {
        true
    }

    /// Removes a child the container tracks outside of its storage.
    ///
    /// Returns false if the child is not one of those.
    fn remove_child(&mut self, tree: &mut ViewTree, container: ViewId, child: ViewId) -> bool {
        let _ = (tree, container, child);
        false
    }

    /// Called when a child did not consume a click, so the container can apply its own click
    /// semantics. Returns true if the event was consumed.
    fn on_child_click(
        &mut self,
        tree: &mut ViewTree,
        container: ViewId,
        child: ViewId,
        event: &MouseEvent,
    ) -> bool {
        let _ = (tree, container, child, event);
        false
    }

    /// Called after the container’s font changed.
    fn font_changed(&mut self, tree: &mut ViewTree, container: ViewId) {
        tree.layout(container);
    }

    /// Called after the container’s text color changed.
    fn color_changed(&mut self, tree: &mut ViewTree, container: ViewId) {
        let _ = (tree, container);
    }

    /// Called after the container’s scale factor may have changed.
    fn dpi_changed(&mut self, tree: &mut ViewTree, container: ViewId) {
        tree.layout(container);
    }

    /// Destroys views owned by the adapter itself. Called before the container is destroyed.
    fn destroy(&mut self, tree: &mut ViewTree, container: ViewId) {
        let _ = (tree, container);
    }

    /// For downcasting.
    fn as_any(&self) -> &dyn Any;

    /// For downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Enumerates a child list until `callback` returns false.
pub(crate) fn for_each_in(
    children: &[ViewId],
    reverse: bool,
    callback: &mut dyn FnMut(ViewId) -> bool,
) {
    if reverse {
        for child in children.iter().rev() {
            if !callback(*child) {
                break;
            }
        }
    } else {
        for child in children {
            if !callback(*child) {
                break;
            }
        }
    }
}

/// Stacking direction of a [`BoxLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

impl Orientation {
    fn main(self, size: Vector2<f64>) -> f64 {
        match self {
            Orientation::Vertical => size.y,
            Orientation::Horizontal => size.x,
        }
    }

    fn cross(self, size: Vector2<f64>) -> f64 {
        match self {
            Orientation::Vertical => size.x,
            Orientation::Horizontal => size.y,
        }
    }

    fn size(self, main: f64, cross: f64) -> Vector2<f64> {
        match self {
            Orientation::Vertical => Vector2::new(cross, main),
            Orientation::Horizontal => Vector2::new(main, cross),
        }
    }
}

/// The default adapter: stacks visible children along one axis.
///
/// Every child gets at least its minimum size along the axis and the full extent across it;
/// leftover space is shared equally.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxLayout {
    pub orientation: Orientation,
    /// Gap between children, in logical units.
    pub spacing: f64,
}

impl BoxLayout {
    pub fn new(orientation: Orientation) -> BoxLayout {
        BoxLayout {
            orientation,
            spacing: 0.,
        }
    }

    pub fn with_spacing(mut self, spacing: f64) -> BoxLayout {
        self.spacing = spacing;
        self
    }

    fn visible_children(tree: &ViewTree, container: ViewId) -> Vec<ViewId> {
        tree.children(container)
            .iter()
            .copied()
            .filter(|child| tree.get(*child).map_or(false, |view| view.is_visible()))
            .collect()
    }
}

impl Default for BoxLayout {
    fn default() -> BoxLayout {
        BoxLayout::new(Orientation::Vertical)
    }
}

impl Adapter for BoxLayout {
    fn layout(&mut self, tree: &mut ViewTree, container: ViewId) {
        let (bounds, scale) = match tree.get(container) {
            Some(view) => (view.size_allocation(), view.scale_factor()),
            None => return,
        };
        let children = BoxLayout::visible_children(tree, container);
        if children.is_empty() {
            return;
        }

        let spacing = self.spacing * scale;
        let sizes: Vec<_> = children.iter().map(|child| tree.minimum_size(*child)).collect();
        let used = sizes.iter().map(|size| self.orientation.main(*size)).sum::<f64>()
            + spacing * (children.len() - 1) as f64;
        let extra = ((self.orientation.main(bounds.size) - used) / children.len() as f64).max(0.);
        let cross = self.orientation.cross(bounds.size);

        let mut cursor = 0.;
        for (child, size) in children.iter().zip(sizes) {
            let main = self.orientation.main(size) + extra;
            let offset = self.orientation.size(cursor, 0.);
            let rect = Rect::new(bounds.origin + offset, self.orientation.size(main, cross));
            tree.size_allocate(*child, rect);
            cursor += main + spacing;
        }
    }

    fn minimum_size(&mut self, tree: &mut ViewTree, container: ViewId) -> Vector2<f64> {
        let scale = tree.scale_factor(container);
        let children = BoxLayout::visible_children(tree, container);
        if children.is_empty() {
            return Vector2::zero();
        }

        let mut main = self.spacing * scale * (children.len() - 1) as f64;
        let mut cross: f64 = 0.;
        for child in children {
            let size = tree.minimum_size(child);
            main += self.orientation.main(size);
            cross = cross.max(self.orientation.cross(size));
        }
        self.orientation.size(main, cross)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessBackend;

    fn tree() -> ViewTree {
        ViewTree::new(Box::new(HeadlessBackend::new()))
    }

    #[test]
    fn box_layout_stacks_and_shares_leftover_space() {
        let mut tree = tree();
        let container = tree.create_box(Orientation::Vertical);
        let a = tree.create_view();
        let b = tree.create_view();
        tree.set_preferred_size(a, Vector2::new(10., 20.));
        tree.set_preferred_size(b, Vector2::new(30., 40.));
        tree.add_child_view(container, a).unwrap();
        tree.add_child_view(container, b).unwrap();

        tree.size_allocate(container, Rect::from_xywh(5., 5., 100., 100.));

        assert_eq!(tree.get(a).unwrap().size_allocation(), Rect::from_xywh(5., 5., 100., 40.));
        assert_eq!(tree.get(b).unwrap().size_allocation(), Rect::from_xywh(5., 45., 100., 60.));
    }

    #[test]
    fn hidden_children_are_skipped() {
        let mut tree = tree();
        let container = tree.create_box(Orientation::Horizontal);
        let a = tree.create_view();
        let b = tree.create_view();
        tree.set_preferred_size(a, Vector2::new(10., 20.));
        tree.set_preferred_size(b, Vector2::new(30., 40.));
        tree.add_child_view(container, a).unwrap();
        tree.add_child_view(container, b).unwrap();
        assert_eq!(tree.minimum_size(container), Vector2::new(40., 40.));

        tree.set_visible(b, false);
        assert_eq!(tree.minimum_size(container), Vector2::new(10., 20.));
    }

    #[test]
    fn minimum_size_is_monotonic() {
        let mut tree = tree();
        let container = tree.create_container(Box::new(BoxLayout::new(Orientation::Vertical).with_spacing(2.)));
        let mut last = tree.minimum_size(container);
        let mut children = Vec::new();
        for i in 0..4 {
            let child = tree.create_view();
            tree.set_preferred_size(child, Vector2::new(10. * i as f64, 5.));
            tree.add_child_view(container, child).unwrap();
            children.push(child);
            let size = tree.minimum_size(container);
            assert!(size.x >= last.x && size.y >= last.y);
            last = size;
        }
        for child in children {
            tree.remove_child_view(container, child).unwrap();
            let size = tree.minimum_size(container);
            assert!(size.x <= last.x && size.y <= last.y);
            last = size;
        }
    }

    #[test]
    fn for_each_stops_early_and_reverses() {
        let mut tree = tree();
        let container = tree.create_box(Orientation::Vertical);
        let views: Vec<_> = (0..3).map(|_| tree.create_view()).collect();
        for view in &views {
            tree.add_child_view(container, *view).unwrap();
        }

        let mut seen = Vec::new();
        tree.for_each_child(container, true, &mut |child| {
            seen.push(child);
            seen.len() < 2
        });
        assert_eq!(seen, vec![views[2], views[1]]);
        assert!(tree.has_child(container, views[0]));
    }
}
