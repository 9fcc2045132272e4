//! Lateral parameters shared by every view in a tree.

use crate::color::Color;
use crate::font::Font;

/// Paddings used by the tab control, in logical units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabMetrics {
    /// Horizontal padding on each side of an item title.
    pub h_padding: f64,
    /// Vertical padding above and below an item title.
    pub v_padding: f64,
    /// How far unselected items are pushed down from the top of the strip.
    pub top_padding: f64,
    /// Padding between the panel border and the page content.
    pub content_padding: f64,
}

impl Default for TabMetrics {
    fn default() -> TabMetrics {
        TabMetrics {
            h_padding: 2.,
            v_padding: 1.,
            top_padding: 1.,
            content_padding: 5.,
        }
    }
}

/// Theme defaults for newly created views.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub font: Font,
    pub text_color: Color,
    pub background_color: Color,
    pub tab: TabMetrics,
}

impl Default for Theme {
    fn default() -> Theme {
        Theme {
            font: Font::default(),
            text_color: Color::BLACK,
            background_color: Color::TRANSPARENT,
            tab: TabMetrics::default(),
        }
    }
}
