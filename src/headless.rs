//! A backend without a display.
//!
//! Records everything the core asks of the platform so it can be inspected, which makes it the
//! backend of choice for tests and for driving the core from a non-native event source.

use crate::backend::{Backend, SurfaceId, SurfaceKind};
use crate::color::Color;
use crate::error::Result;
use crate::font::Font;
use crate::painter::{Painter, TextAttributes, ThemePart, ThemeParams};
use crate::rect::Rect;
use crate::view::{ControlState, ViewId};
use cgmath::{Vector2, Zero};
use parking_lot::{Mutex, MutexGuard};
use std::collections::HashMap;
use std::sync::Arc;

/// A drawing operation, in window pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintOp {
    Fill {
        rect: Rect,
        color: Color,
    },
    Stroke {
        rect: Rect,
        color: Color,
    },
    Text {
        text: String,
        rect: Rect,
    },
    ThemePart {
        part: ThemePart,
        state: ControlState,
        rect: Rect,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceRecord {
    pub kind: SurfaceKind,
    pub parent: Option<SurfaceId>,
    pub bounds: Rect,
}

/// Everything the headless backend has recorded.
#[derive(Debug)]
pub struct HeadlessState {
    next_surface: u64,
    /// Scale factor reported for every surface.
    pub scale_factor: f64,
    pub surfaces: HashMap<SurfaceId, SurfaceRecord>,
    /// Union of the invalidated regions per window since the last take.
    pub dirty: HashMap<SurfaceId, Rect>,
    pub focus: HashMap<SurfaceId, ViewId>,
    /// The window that holds native pointer capture.
    pub capture: Option<SurfaceId>,
    pub paint_ops: Vec<PaintOp>,
}

/// A backend that records instead of rendering. Clones share state.
#[derive(Debug, Clone)]
pub struct HeadlessBackend {
    state: Arc<Mutex<HeadlessState>>,
}

impl HeadlessBackend {
    pub fn new() -> HeadlessBackend {
        HeadlessBackend::with_scale_factor(1.)
    }

    pub fn with_scale_factor(scale_factor: f64) -> HeadlessBackend {
        HeadlessBackend {
            state: Arc::new(Mutex::new(HeadlessState {
                next_surface: 1,
                scale_factor,
                surfaces: HashMap::new(),
                dirty: HashMap::new(),
                focus: HashMap::new(),
                capture: None,
                paint_ops: Vec::new(),
            })),
        }
    }

    pub fn state(&self) -> MutexGuard<HeadlessState> {
        self.state.lock()
    }

    /// Returns and clears the dirty region of a window.
    pub fn take_dirty(&self, window: SurfaceId) -> Option<Rect> {
        self.state.lock().dirty.remove(&window)
    }

    /// Returns and clears the recorded paint operations.
    pub fn take_paint_ops(&self) -> Vec<PaintOp> {
        core::mem::take(&mut self.state.lock().paint_ops)
    }
}

impl Default for HeadlessBackend {
    fn default() -> HeadlessBackend {
        HeadlessBackend::new()
    }
}

impl Backend for HeadlessBackend {
    fn new_surface(&mut self, kind: SurfaceKind, bounds: Rect) -> Result<SurfaceId> {
        let mut state = self.state.lock();
        let id = SurfaceId(state.next_surface);
        state.next_surface += 1;
        state.surfaces.insert(
            id,
            SurfaceRecord {
                kind,
                parent: None,
                bounds,
            },
        );
        Ok(id)
    }

    fn destroy_surface(&mut self, surface: SurfaceId) {
        let mut state = self.state.lock();
        state.surfaces.remove(&surface);
        state.dirty.remove(&surface);
        state.focus.remove(&surface);
        if state.capture == Some(surface) {
            state.capture = None;
        }
    }

    fn set_surface_parent(&mut self, surface: SurfaceId, parent: Option<SurfaceId>) {
        if let Some(record) = self.state.lock().surfaces.get_mut(&surface) {
            record.parent = parent;
        }
    }

    fn set_surface_bounds(&mut self, surface: SurfaceId, bounds: Rect) {
        if let Some(record) = self.state.lock().surfaces.get_mut(&surface) {
            record.bounds = bounds;
        }
    }

    fn scale_factor(&self, _: SurfaceId) -> f64 {
        self.state.lock().scale_factor
    }

    /// Every character is half an em wide; lines are 1.25 em tall.
    fn measure_text(&self, text: &str, font: &Font) -> Vector2<f64> {
        Vector2::new(
            text.chars().count() as f64 * font.size * 0.5,
            font.size * 1.25,
        )
    }

    fn invalidate(&mut self, window: SurfaceId, rect: Rect) {
        let mut state = self.state.lock();
        let dirty = state.dirty.entry(window).or_insert_with(Rect::zero);
        *dirty = dirty.union(rect);
    }

    fn begin_paint(&mut self, window: SurfaceId) -> Box<dyn Painter> {
        let clip = self
            .state
            .lock()
            .surfaces
            .get(&window)
            .map(|record| Rect::from_size(record.bounds.size));
        Box::new(HeadlessPainter {
            state: Arc::clone(&self.state),
            offset: Vector2::zero(),
            clip,
            color: Color::BLACK,
            stack: Vec::new(),
        })
    }

    fn set_focus(&mut self, window: SurfaceId, view: Option<ViewId>) {
        let mut state = self.state.lock();
        match view {
            Some(view) => state.focus.insert(window, view),
            None => state.focus.remove(&window),
        };
    }

    fn focused_view(&self, window: SurfaceId) -> Option<ViewId> {
        self.state.lock().focus.get(&window).copied()
    }

    fn set_capture(&mut self, window: SurfaceId) {
        self.state.lock().capture = Some(window);
    }

    fn release_capture(&mut self, window: SurfaceId) {
        let mut state = self.state.lock();
        if state.capture == Some(window) {
            state.capture = None;
        }
    }
}

/// Records paint operations translated into window pixels.
///
/// Operations entirely outside the clip are dropped; others are recorded unclipped.
struct HeadlessPainter {
    state: Arc<Mutex<HeadlessState>>,
    offset: Vector2<f64>,
    clip: Option<Rect>,
    color: Color,
    stack: Vec<(Vector2<f64>, Option<Rect>)>,
}

impl HeadlessPainter {
    fn record(&mut self, rect: Rect, op: impl FnOnce(Rect) -> PaintOp) {
        let rect = rect + self.offset;
        if let Some(clip) = self.clip {
            if !clip.intersects(rect) {
                return;
            }
        }
        self.state.lock().paint_ops.push(op(rect));
    }
}

impl Painter for HeadlessPainter {
    fn save(&mut self) {
        self.stack.push((self.offset, self.clip));
    }

    fn restore(&mut self) {
        if let Some((offset, clip)) = self.stack.pop() {
            self.offset = offset;
            self.clip = clip;
        }
    }

    fn translate(&mut self, offset: Vector2<f64>) {
        self.offset += offset;
    }

    fn clip_rect(&mut self, rect: Rect) {
        let rect = rect + self.offset;
        self.clip = Some(match self.clip {
            Some(clip) => clip.intersect(rect).unwrap_or_else(Rect::zero),
            None => rect,
        });
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn fill_rect(&mut self, rect: Rect) {
        let color = self.color;
        self.record(rect, |rect| PaintOp::Fill { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect) {
        let color = self.color;
        self.record(rect, |rect| PaintOp::Stroke { rect, color });
    }

    fn draw_text(&mut self, text: &str, rect: Rect, _: &TextAttributes) {
        self.record(rect, |rect| PaintOp::Text {
            text: text.to_owned(),
            rect,
        });
    }

    fn draw_theme_part(
        &mut self,
        part: ThemePart,
        state: ControlState,
        rect: Rect,
        _: &ThemeParams,
    ) {
        self.record(rect, |rect| PaintOp::ThemePart { part, state, rect });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalidations_coalesce() {
        let mut backend = HeadlessBackend::new();
        let window = backend
            .new_surface(SurfaceKind::Window, Rect::from_xywh(0., 0., 100., 100.))
            .unwrap();
        backend.invalidate(window, Rect::from_xywh(0., 0., 10., 10.));
        backend.invalidate(window, Rect::from_xywh(20., 20., 10., 10.));
        assert_eq!(backend.take_dirty(window), Some(Rect::from_xywh(0., 0., 30., 30.)));
        assert_eq!(backend.take_dirty(window), None);
    }

    #[test]
    fn painter_translates_and_clips() {
        let mut backend = HeadlessBackend::new();
        let window = backend
            .new_surface(SurfaceKind::Window, Rect::from_xywh(0., 0., 100., 100.))
            .unwrap();
        let mut painter = backend.begin_paint(window);
        painter.save();
        painter.translate(Vector2::new(10., 10.));
        painter.clip_rect(Rect::from_xywh(0., 0., 5., 5.));
        painter.fill_rect(Rect::from_xywh(0., 0., 2., 2.));
        painter.fill_rect(Rect::from_xywh(6., 6., 2., 2.));
        painter.restore();
        painter.fill_rect(Rect::from_xywh(0., 0., 1., 1.));

        assert_eq!(
            backend.take_paint_ops(),
            vec![
                PaintOp::Fill {
                    rect: Rect::from_xywh(10., 10., 2., 2.),
                    color: Color::BLACK
                },
                PaintOp::Fill {
                    rect: Rect::from_xywh(0., 0., 1., 1.),
                    color: Color::BLACK
                },
            ]
        );
    }
}
