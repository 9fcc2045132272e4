//! Surface-agnostic drawing.

use crate::color::Color;
use crate::font::Font;
use crate::rect::Rect;
use crate::view::ControlState;
use cgmath::Vector2;

/// Parts the platform theme renderer knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemePart {
    TabItem,
    TabPanel,
}

/// Extra parameters for theme rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThemeParams {
    /// Whether the part should show a focus ring.
    pub focused: bool,
}

/// Text alignment along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Start,
    Center,
    End,
}

/// How text is drawn inside a rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct TextAttributes {
    pub font: Font,
    pub color: Color,
    pub align: TextAlign,
    pub valign: TextAlign,
}

impl TextAttributes {
    pub fn new(font: Font, color: Color, align: TextAlign, valign: TextAlign) -> TextAttributes {
        TextAttributes {
            font,
            color,
            align,
            valign,
        }
    }
}

/// A drawing context bound to one native surface for the duration of one paint pass.
///
/// Coordinates are in pixels relative to the current translation. Views always draw in their own
/// coordinate space: the tree translates and clips the painter to a view’s size allocation before
/// asking it to draw.
pub trait Painter {
    /// Pushes the current translation and clip.
    fn save(&mut self);

    /// Pops the translation and clip pushed by the matching `save`.
    fn restore(&mut self);

    fn translate(&mut self, offset: Vector2<f64>);

    /// Intersects the clip with the given rectangle.
    fn clip_rect(&mut self, rect: Rect);

    fn set_color(&mut self, color: Color);

    fn fill_rect(&mut self, rect: Rect);

    fn stroke_rect(&mut self, rect: Rect);

    fn draw_text(&mut self, text: &str, rect: Rect, attributes: &TextAttributes);

    /// Draws a part using the platform theme.
    fn draw_theme_part(
        &mut self,
        part: ThemePart,
        state: ControlState,
        rect: Rect,
        params: &ThemeParams,
    );
}
