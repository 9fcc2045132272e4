//! Platform-side views.

use crate::backend::SurfaceId;
use crate::color::Color;
use crate::container::ContainerImpl;
use crate::events::{KeyEvent, MouseEvent, Signal};
use crate::font::Font;
use crate::painter::Painter;
use crate::rect::Rect;
use crate::window::WindowId;
use cgmath::{Vector2, Zero};
use core::any::Any;
use core::fmt;
use uuid::Uuid;

/// A unique identifier for a view.
///
/// (this is just a UUID)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ViewId(u32, u16, u16, [u8; 8]);

impl ViewId {
    pub(crate) fn new() -> ViewId {
        let uuid = Uuid::new_v4();
        let (a, b, c, d) = uuid.as_fields();
        ViewId(a, b, c, *d)
    }
}

/// Visual state of a control. Exactly one applies at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlState {
    Normal,
    Hovered,
    Pressed,
    Disabled,
}

impl Default for ControlState {
    fn default() -> ControlState {
        ControlState::Normal
    }
}

/// How the window manager should treat a pointer press inside a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTestKind {
    /// Regular client area.
    Client,
    /// Pressing here drags the window.
    Caption,
}

/// Handlers a logical view may connect to.
///
/// Mouse-down, mouse-up and key handlers consume the event by returning true.
#[derive(Debug, Default)]
pub struct ViewHandlers {
    pub on_mouse_down: Signal<MouseEvent>,
    pub on_mouse_up: Signal<MouseEvent>,
    pub on_mouse_move: Signal<MouseEvent>,
    pub on_mouse_enter: Signal<MouseEvent>,
    pub on_mouse_leave: Signal<MouseEvent>,
    pub on_key_down: Signal<KeyEvent>,
    pub on_key_up: Signal<KeyEvent>,
    pub on_capture_lost: Signal<()>,
    pub on_size_changed: Signal<Vector2<f64>>,
}

/// Per-view drawing and input hooks.
///
/// Hooks only see their own view; anything that needs the rest of the tree (such as selecting a
/// tab when its item is clicked) is handled by the parent container’s adapter.
pub trait Widget: Any + fmt::Debug {
    /// Draws the view in its own coordinate space. Must not change layout.
    fn draw(&self, view: &ViewImpl, painter: &mut dyn Painter, dirty: Rect) {
        view.draw_background(painter, dirty);
    }

    /// Called after the base view has updated its state for a pointer entering it.
    fn on_mouse_enter(&mut self, view: &mut ViewImpl, event: &MouseEvent) {
        let _ = (view, event);
    }

    /// Called after the base view has updated its state for a pointer leaving it.
    fn on_mouse_leave(&mut self, view: &mut ViewImpl, event: &MouseEvent) {
        let _ = (view, event);
    }

    /// Called if the base view did not consume the click. Returns true if it was consumed.
    fn on_mouse_click(&mut self, view: &mut ViewImpl, event: &MouseEvent) -> bool {
        let _ = (view, event);
        false
    }

    /// Called after the font of the view changed.
    fn on_font_changed(&mut self, view: &mut ViewImpl) {
        let _ = view;
    }

    /// Called after the scale factor may have changed. Cached pixel measurements must be dropped.
    fn on_dpi_changed(&mut self, view: &mut ViewImpl) {
        let _ = view;
    }

    /// For downcasting.
    fn as_any(&self) -> &dyn Any;

    /// For downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// The platform realization of one logical view.
#[derive(Debug)]
pub struct ViewImpl {
    id: ViewId,
    pub(crate) parent: Option<ViewId>,
    pub(crate) window: Option<WindowId>,
    /// Native surface owned by this view, if it is backed by a native control.
    pub(crate) surface: Option<SurfaceId>,
    /// Set by the parent’s layout; never changed by the view itself.
    pub(crate) size_allocation: Rect,
    pub(crate) state: ControlState,
    pub(crate) scale_factor: f64,
    pub(crate) visible: bool,
    pub(crate) tree_visible: bool,
    pub(crate) focusable: bool,
    pub(crate) draggable: bool,
    pub(crate) font: Font,
    pub(crate) color: Color,
    pub(crate) background_color: Color,
    /// Natural size of a leaf view, in logical units.
    pub(crate) preferred_size: Vector2<f64>,
    pub(crate) container: Option<ContainerImpl>,
    pub(crate) widget: Option<Box<dyn Widget>>,
    pub handlers: ViewHandlers,
}

impl ViewImpl {
    pub(crate) fn new(font: Font, color: Color, background_color: Color) -> ViewImpl {
        ViewImpl {
            id: ViewId::new(),
            parent: None,
            window: None,
            surface: None,
            size_allocation: Rect::zero(),
            state: ControlState::Normal,
            scale_factor: 1.,
            visible: true,
            tree_visible: true,
            focusable: false,
            draggable: false,
            font,
            color,
            background_color,
            preferred_size: Vector2::zero(),
            container: None,
            widget: None,
            handlers: ViewHandlers::default(),
        }
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn parent(&self) -> Option<ViewId> {
        self.parent
    }

    pub fn window(&self) -> Option<WindowId> {
        self.window
    }

    pub fn surface(&self) -> Option<SurfaceId> {
        self.surface
    }

    pub fn size_allocation(&self) -> Rect {
        self.size_allocation
    }

    pub fn state(&self) -> ControlState {
        self.state
    }

    /// Sets the visual state. The tree repaints views whose state changed.
    pub fn set_state(&mut self, state: ControlState) {
        self.state = state;
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the view and all of its ancestors are visible.
    pub fn is_tree_visible(&self) -> bool {
        self.tree_visible
    }

    pub fn is_focusable(&self) -> bool {
        self.focusable
    }

    pub fn is_draggable(&self) -> bool {
        self.draggable
    }

    pub fn is_disabled(&self) -> bool {
        self.state == ControlState::Disabled
    }

    pub fn is_container(&self) -> bool {
        self.container.is_some()
    }

    pub fn font(&self) -> &Font {
        &self.font
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn background_color(&self) -> Color {
        self.background_color
    }

    pub fn hit_test_kind(&self) -> HitTestKind {
        if self.draggable {
            HitTestKind::Caption
        } else {
            HitTestKind::Client
        }
    }

    /// Fills the dirty region with the background color, if there is one.
    pub fn draw_background(&self, painter: &mut dyn Painter, dirty: Rect) {
        if !self.background_color.is_transparent() {
            painter.set_color(self.background_color);
            painter.fill_rect(dirty);
        }
    }

    /// Base behavior when a pointer enters the view.
    pub(crate) fn base_mouse_enter(&mut self) {
        if self.state == ControlState::Normal {
            self.state = ControlState::Hovered;
        }
    }

    /// Base behavior when a pointer leaves the view.
    pub(crate) fn base_mouse_leave(&mut self) {
        if self.state == ControlState::Hovered {
            self.state = ControlState::Normal;
        }
    }
}
