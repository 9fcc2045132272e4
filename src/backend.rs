//! Traits for backends.
//!
//! A backend wraps one native windowing toolkit. The core never touches native handles directly;
//! everything it needs from the platform goes through this trait.

use crate::error::Result;
use crate::font::Font;
use crate::painter::Painter;
use crate::rect::Rect;
use crate::view::ViewId;
use cgmath::Vector2;

/// A reference to a native surface in the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SurfaceId(pub u64);

/// Types of native surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    /// A top-level window; the display surface all windowless views draw into.
    Window,
    /// A native child control owned by one view.
    Control,
}

/// A backend implementation.
pub trait Backend {
    /// Creates a new native surface.
    fn new_surface(&mut self, kind: SurfaceKind, bounds: Rect) -> Result<SurfaceId>;

    /// Destroys a native surface. The surface must not be used afterwards.
    fn destroy_surface(&mut self, surface: SurfaceId);

    /// Attaches a surface to a parent surface, or detaches it.
    fn set_surface_parent(&mut self, surface: SurfaceId, parent: Option<SurfaceId>);

    /// Moves or resizes a surface, in window pixels.
    fn set_surface_bounds(&mut self, surface: SurfaceId, bounds: Rect);

    /// The scale factor of the display the surface is on.
    fn scale_factor(&self, surface: SurfaceId) -> f64;

    /// Measures text in logical units.
    fn measure_text(&self, text: &str, font: &Font) -> Vector2<f64>;

    /// Marks a region of a window dirty.
    ///
    /// Repeated requests before the next paint are expected to be coalesced by the backend.
    fn invalidate(&mut self, window: SurfaceId, rect: Rect);

    /// Creates a painter for one paint pass over a window.
    fn begin_paint(&mut self, window: SurfaceId) -> Box<dyn Painter>;

    /// Moves native keyboard focus within a window.
    fn set_focus(&mut self, window: SurfaceId, view: Option<ViewId>);

    /// Returns the view the platform considers focused in a window.
    ///
    /// This is the source of truth for focus; the core keeps no copy of it.
    fn focused_view(&self, window: SurfaceId) -> Option<ViewId>;

    /// Routes all pointer events to the window until released.
    fn set_capture(&mut self, window: SurfaceId);

    fn release_capture(&mut self, window: SurfaceId);
}
