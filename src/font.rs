use std::sync::Arc;

/// A font description.
///
/// Fonts are resolved by the backend; the core only passes them along for text measurement and
/// drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    /// Font family name.
    pub family: Arc<str>,

    /// Font size in logical points.
    pub size: f64,
}

impl Font {
    pub fn new(family: &str, size: f64) -> Font {
        Font {
            family: family.into(),
            size,
        }
    }

    /// Returns the same family at a different size.
    pub fn with_size(&self, size: f64) -> Font {
        Font {
            family: Arc::clone(&self.family),
            size,
        }
    }
}

impl Default for Font {
    fn default() -> Font {
        Font::new("sans-serif", 12.)
    }
}
