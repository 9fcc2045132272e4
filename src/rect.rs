//! Rectangles.

use cgmath::{EuclideanSpace, Point2, Vector2, Zero};
use std::ops;

/// A rectangle.
///
/// Size allocations are expressed in window pixels, i.e. after the scale factor has been applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Rectangle origin.
    pub origin: Point2<f64>,

    /// Rectangle size.
    pub size: Vector2<f64>,
}

impl Default for Rect {
    fn default() -> Rect {
        Rect::zero()
    }
}

impl Rect {
    /// Creates a new rectangle.
    pub fn new(origin: Point2<f64>, size: Vector2<f64>) -> Rect {
        Rect { origin, size }
    }

    /// Creates a rectangle from its components.
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Rect {
        Rect {
            origin: Point2::new(x, y),
            size: Vector2::new(width, height),
        }
    }

    /// Creates a rectangle at the origin with the given size.
    pub fn from_size(size: Vector2<f64>) -> Rect {
        Rect {
            origin: Point2::origin(),
            size,
        }
    }

    /// Returns a zero-sized rectangle at the origin.
    pub fn zero() -> Rect {
        Rect {
            origin: Point2::new(0., 0.),
            size: Vector2::zero(),
        }
    }

    pub fn x(&self) -> f64 {
        self.origin.x
    }

    pub fn y(&self) -> f64 {
        self.origin.y
    }

    pub fn width(&self) -> f64 {
        self.size.x
    }

    pub fn height(&self) -> f64 {
        self.size.y
    }

    pub fn right(&self) -> f64 {
        self.origin.x + self.size.x
    }

    pub fn bottom(&self) -> f64 {
        self.origin.y + self.size.y
    }

    /// Returns true if the rectangle covers no area.
    pub fn is_empty(&self) -> bool {
        self.size.x <= 0. || self.size.y <= 0.
    }

    /// Returns true if the point is inside the rectangle.
    pub fn contains(&self, point: Point2<f64>) -> bool {
        point.x >= self.origin.x
            && point.y >= self.origin.y
            && point.x < self.right()
            && point.y < self.bottom()
    }

    /// Returns true if the two rectangles intersect.
    pub fn intersects(&self, rect: Rect) -> bool {
        !self.is_empty()
            && !rect.is_empty()
            && self.origin.x < rect.right()
            && self.origin.y < rect.bottom()
            && rect.origin.x < self.right()
            && rect.origin.y < self.bottom()
    }

    /// Returns the intersection rectangle.
    pub fn intersect(&self, rect: Rect) -> Option<Rect> {
        if !self.intersects(rect) {
            return None;
        }

        let min_x = self.origin.x.max(rect.origin.x);
        let min_y = self.origin.y.max(rect.origin.y);
        let max_x = self.right().min(rect.right());
        let max_y = self.bottom().min(rect.bottom());

        Some(Rect::from_xywh(min_x, min_y, max_x - min_x, max_y - min_y))
    }

    /// Returns the smallest rectangle containing both rectangles.
    ///
    /// Empty rectangles are ignored.
    pub fn union(&self, rect: Rect) -> Rect {
        if rect.is_empty() {
            return *self;
        }
        if self.is_empty() {
            return rect;
        }

        let min_x = self.origin.x.min(rect.origin.x);
        let min_y = self.origin.y.min(rect.origin.y);
        let max_x = self.right().max(rect.right());
        let max_y = self.bottom().max(rect.bottom());

        Rect::from_xywh(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    /// Returns a new rectangle inset by the specified amount on each side.
    pub fn inset(&self, horiz: f64, vert: f64) -> Rect {
        self.inset_edges(horiz, vert, horiz, vert)
    }

    /// Returns a new rectangle inset by individual amounts per edge.
    ///
    /// The size never becomes negative.
    pub fn inset_edges(&self, left: f64, top: f64, right: f64, bottom: f64) -> Rect {
        Rect {
            origin: (self.origin.x + left, self.origin.y + top).into(),
            size: (
                (self.size.x - left - right).max(0.),
                (self.size.y - top - bottom).max(0.),
            )
                .into(),
        }
    }

    /// Returns a new rectangle moved by the given offset.
    pub fn offset(&self, offset: Vector2<f64>) -> Rect {
        Rect {
            origin: self.origin + offset,
            size: self.size,
        }
    }

    /// Returns a new rectangle with the given origin.
    pub fn with_origin(&self, origin: Point2<f64>) -> Rect {
        Rect {
            origin,
            size: self.size,
        }
    }

    /// Returns a new rectangle with the given height.
    pub fn with_height(&self, height: f64) -> Rect {
        Rect {
            origin: self.origin,
            size: (self.size.x, height).into(),
        }
    }

    /// Scales origin and size, rounding to the nearest pixel.
    pub fn scale_to_nearest(&self, factor: f64) -> Rect {
        Rect::from_xywh(
            (self.origin.x * factor).round(),
            (self.origin.y * factor).round(),
            (self.size.x * factor).round(),
            (self.size.y * factor).round(),
        )
    }
}

impl ops::Add<Vector2<f64>> for Rect {
    type Output = Rect;
    fn add(self, offset: Vector2<f64>) -> Rect {
        self.offset(offset)
    }
}

impl ops::Sub<Vector2<f64>> for Rect {
    type Output = Rect;
    fn sub(self, offset: Vector2<f64>) -> Rect {
        self.offset(-offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inset_edges_never_goes_negative() {
        let rect = Rect::from_xywh(0., 0., 10., 4.);
        let inset = rect.inset_edges(2., 3., 2., 3.);
        assert_eq!(inset.origin, Point2::new(2., 3.));
        assert_eq!(inset.size, Vector2::new(6., 0.));
        assert!(inset.is_empty());
    }

    #[test]
    fn intersection_and_union() {
        let a = Rect::from_xywh(0., 0., 10., 10.);
        let b = Rect::from_xywh(5., 5., 10., 10.);
        assert_eq!(a.intersect(b), Some(Rect::from_xywh(5., 5., 5., 5.)));
        assert_eq!(a.union(b), Rect::from_xywh(0., 0., 15., 15.));
        assert_eq!(a.intersect(Rect::from_xywh(10., 0., 5., 5.)), None);
        assert_eq!(a.union(Rect::zero()), a);
    }

    #[test]
    fn contains_is_half_open() {
        let rect = Rect::from_xywh(1., 1., 2., 2.);
        assert!(rect.contains(Point2::new(1., 1.)));
        assert!(!rect.contains(Point2::new(3., 2.)));
    }
}
