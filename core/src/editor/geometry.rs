use serde::{Deserialize, Serialize};

/// A cursor position in overlay (logical screen pixel) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The selection rectangle.
///
/// Width and height are never negative: creation only commits positive
/// deltas, and edits that would shrink below the minimum are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// A rectangle is usable for capture only with a positive area.
    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Inclusive bounding-box test.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left
            && point.x <= self.right()
            && point.y >= self.top
            && point.y <= self.bottom()
    }
}

/// Size of the screen the overlay covers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width: f64,
    pub height: f64,
}

impl ScreenSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_are_derived_from_size() {
        let rect = Rect::new(100.0, 50.0, 200.0, 150.0);
        assert_eq!(rect.right(), 300.0);
        assert_eq!(rect.bottom(), 200.0);
    }

    #[test]
    fn validity_requires_positive_area() {
        assert!(Rect::new(0.0, 0.0, 1.0, 1.0).is_valid());
        assert!(!Rect::new(10.0, 10.0, 0.0, 30.0).is_valid());
        assert!(!Rect::new(10.0, 10.0, 30.0, 0.0).is_valid());
        assert!(!Rect::default().is_valid());
    }

    #[test]
    fn contains_is_inclusive_of_edges() {
        let rect = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(rect.contains(Point::new(10.0, 10.0)));
        assert!(rect.contains(Point::new(30.0, 30.0)));
        assert!(!rect.contains(Point::new(30.5, 15.0)));
        assert!(!rect.contains(Point::new(15.0, 9.9)));
    }
}
