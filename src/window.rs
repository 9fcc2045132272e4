//! Windows.

use crate::backend::{SurfaceId, SurfaceKind};
use crate::error::{Error, Result};
use crate::painter::Painter;
use crate::rect::Rect;
use crate::tree::ViewTree;
use crate::view::ViewId;
use cgmath::{EuclideanSpace, Point2, Vector2};
use tracing::debug;
use uuid::Uuid;

/// A unique identifier for a window.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowId(u32, u16, u16, [u8; 8]);

impl WindowId {
    pub(crate) fn new() -> WindowId {
        let uuid = Uuid::new_v4();
        let (a, b, c, d) = uuid.as_fields();
        WindowId(a, b, c, *d)
    }
}

/// A top-level native window hosting one content view.
#[derive(Debug)]
pub struct WindowImpl {
    id: WindowId,
    pub(crate) surface: SurfaceId,
    pub(crate) content_view: Option<ViewId>,
    pub(crate) scale_factor: f64,
    /// Client area size in pixels.
    pub(crate) size: Vector2<f64>,
    /// Views under the pointer, outermost first.
    pub(crate) hover_path: Vec<ViewId>,
    /// Last known pointer location.
    pub(crate) pointer: Point2<f64>,
}

impl WindowImpl {
    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    pub fn content_view(&self) -> Option<ViewId> {
        self.content_view
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    pub fn size(&self) -> Vector2<f64> {
        self.size
    }
}

impl ViewTree {
    /// Creates a window with a client area of the given size in pixels.
    pub fn create_window(&mut self, size: Vector2<f64>) -> Result<WindowId> {
        let surface = self
            .backend
            .new_surface(SurfaceKind::Window, Rect::from_size(size))?;
        let scale_factor = self.backend.scale_factor(surface);
        let id = WindowId::new();
        self.windows.insert(
            id,
            WindowImpl {
                id,
                surface,
                content_view: None,
                scale_factor,
                size,
                hover_path: Vec::new(),
                pointer: Point2::origin(),
            },
        );
        debug!(?id, ?surface, scale_factor, "created window");
        Ok(id)
    }

    pub fn window(&self, id: WindowId) -> Option<&WindowImpl> {
        self.windows.get(&id)
    }

    /// Closes a window, destroying its content view.
    pub fn close_window(&mut self, id: WindowId) -> Result<()> {
        let content = self
            .windows
            .get(&id)
            .ok_or(Error::NoSuchWindow(id))?
            .content_view;
        if let Some(content) = content {
            self.destroy_view(content)?;
        }
        if let Some(window) = self.windows.remove(&id) {
            self.backend.destroy_surface(window.surface);
        }
        debug!(?id, "closed window");
        Ok(())
    }

    pub fn content_view(&self, id: WindowId) -> Option<ViewId> {
        self.windows.get(&id)?.content_view
    }

    /// Makes a view the root of a window, filling its client area.
    ///
    /// The previous content view is detached from the window but not destroyed.
    pub fn set_content_view(&mut self, id: WindowId, view: ViewId) -> Result<()> {
        let (old, size) = match self.windows.get(&id) {
            Some(window) => (window.content_view, window.size),
            None => return Err(Error::NoSuchWindow(id)),
        };
        if !self.nodes.contains_key(&view) {
            return Err(Error::NoSuchView(view));
        }
        if old == Some(view) {
            return Ok(());
        }

        self.detach(view)?;
        for window in self.windows.values_mut() {
            if window.content_view == Some(view) {
                window.content_view = None;
            }
        }
        if let Some(old) = old {
            self.attach(old, None);
        }
        if let Some(window) = self.windows.get_mut(&id) {
            window.content_view = Some(view);
            window.hover_path.clear();
        }
        self.attach(view, Some(id));
        self.size_allocate(view, Rect::from_size(size));
        self.invalidate(view);
        debug!(window = ?id, ?view, "set content view");
        Ok(())
    }

    /// Updates the client area size after the platform resized the window.
    pub fn resize_window(&mut self, id: WindowId, size: Vector2<f64>) {
        let content = match self.windows.get_mut(&id) {
            Some(window) => {
                window.size = size;
                window.content_view
            }
            None => return,
        };
        if let Some(content) = content {
            self.size_allocate(content, Rect::from_size(size));
        }
    }

    /// Updates the scale factor after the window moved to another display.
    ///
    /// Every attached view is rescaled and drops its cached measurements.
    pub fn set_window_scale_factor(&mut self, id: WindowId, scale_factor: f64) {
        let (content, size) = match self.windows.get_mut(&id) {
            Some(window) if window.scale_factor != scale_factor => {
                window.scale_factor = scale_factor;
                (window.content_view, window.size)
            }
            _ => return,
        };
        debug!(window = ?id, scale_factor, "scale factor changed");
        if let Some(content) = content {
            self.attach(content, Some(id));
            self.size_allocate(content, Rect::from_size(size));
            self.invalidate(content);
        }
    }

    /// Draws the dirty part of a window, in window pixels.
    pub fn draw_window(&self, id: WindowId, painter: &mut dyn Painter, dirty: Rect) {
        let content = match self.content_view(id).and_then(|view| self.nodes.get(&view)) {
            Some(content) if content.is_visible() => content,
            _ => return,
        };
        let rect = content.size_allocation();
        let dirty = match dirty.intersect(rect) {
            Some(dirty) => dirty,
            None => return,
        };
        let offset = rect.origin.to_vec();
        painter.save();
        painter.translate(offset);
        painter.clip_rect(Rect::from_size(rect.size));
        self.draw_view(content.id(), painter, dirty - offset);
        painter.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::Orientation;
    use crate::headless::HeadlessBackend;

    #[test]
    fn content_view_fills_the_window() {
        let mut tree = ViewTree::new(Box::new(HeadlessBackend::new()));
        let window = tree.create_window(Vector2::new(300., 200.)).unwrap();
        let root = tree.create_box(Orientation::Vertical);
        tree.set_content_view(window, root).unwrap();

        assert_eq!(tree.get(root).unwrap().window(), Some(window));
        assert_eq!(
            tree.get(root).unwrap().size_allocation(),
            Rect::from_xywh(0., 0., 300., 200.)
        );

        tree.resize_window(window, Vector2::new(100., 50.));
        assert_eq!(
            tree.get(root).unwrap().size_allocation(),
            Rect::from_xywh(0., 0., 100., 50.)
        );
    }

    #[test]
    fn replacing_the_content_view_detaches_the_old_one() {
        let mut tree = ViewTree::new(Box::new(HeadlessBackend::new()));
        let window = tree.create_window(Vector2::new(300., 200.)).unwrap();
        let first = tree.create_box(Orientation::Vertical);
        let second = tree.create_box(Orientation::Vertical);
        let leaf = tree.create_view();
        tree.add_child_view(first, leaf).unwrap();

        tree.set_content_view(window, first).unwrap();
        assert_eq!(tree.get(leaf).unwrap().window(), Some(window));

        tree.set_content_view(window, second).unwrap();
        assert_eq!(tree.get(leaf).unwrap().window(), None);
        assert_eq!(tree.content_view(window), Some(second));
    }

    #[test]
    fn scale_factor_changes_rescale_allocations() {
        let mut tree = ViewTree::new(Box::new(HeadlessBackend::new()));
        let window = tree.create_window(Vector2::new(300., 200.)).unwrap();
        let root = tree.create_box(Orientation::Vertical);
        let leaf = tree.create_view();
        tree.set_preferred_size(leaf, Vector2::new(10., 10.));
        tree.add_child_view(root, leaf).unwrap();
        tree.set_content_view(window, root).unwrap();

        tree.set_window_scale_factor(window, 2.);
        assert_eq!(tree.scale_factor(leaf), 2.);
        assert_eq!(tree.minimum_size(leaf), Vector2::new(20., 20.));
    }

    #[test]
    fn closing_a_window_destroys_its_views() {
        let backend = HeadlessBackend::new();
        let mut tree = ViewTree::new(Box::new(backend.clone()));
        let window = tree.create_window(Vector2::new(300., 200.)).unwrap();
        let root = tree.create_box(Orientation::Vertical);
        tree.set_content_view(window, root).unwrap();
        let surface = tree.window(window).unwrap().surface();

        tree.close_window(window).unwrap();
        assert!(!tree.contains(root));
        assert!(tree.window(window).is_none());
        assert!(!backend.state().surfaces.contains_key(&surface));
        assert_eq!(tree.close_window(window), Err(Error::NoSuchWindow(window)));
    }
}
