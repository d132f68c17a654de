//! Bounding box value type.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in page coordinate units.
///
/// Coordinates use a top-left origin: `y0` is the top edge, `y1` the bottom.
/// The constructor normalizes ordering, so `x0 <= x1` and `y0 <= y1` hold for
/// every value of this type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl BoundingBox {
    /// Create a bounding box, normalizing coordinate order.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    /// The smallest box containing both `self` and `other`.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Union over an iterator of boxes; `None` for an empty iterator.
    pub fn union_all<'a, I>(boxes: I) -> Option<BoundingBox>
    where
        I: IntoIterator<Item = &'a BoundingBox>,
    {
        boxes
            .into_iter()
            .fold(None, |acc: Option<BoundingBox>, b| match acc {
                Some(u) => Some(u.union(b)),
                None => Some(*b),
            })
    }

    /// Box width.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Box height.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_order() {
        let b = BoundingBox::new(10.0, 20.0, 5.0, 2.0);
        assert_eq!(b.x0, 5.0);
        assert_eq!(b.y0, 2.0);
        assert_eq!(b.x1, 10.0);
        assert_eq!(b.y1, 20.0);
        assert!(b.x0 <= b.x1 && b.y0 <= b.y1);
    }

    #[test]
    fn test_union() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(5.0, -5.0, 20.0, 8.0);
        let u = a.union(&b);
        assert_eq!(u, BoundingBox::new(0.0, -5.0, 20.0, 10.0));
    }

    #[test]
    fn test_union_all() {
        let boxes = vec![
            BoundingBox::new(1.0, 1.0, 2.0, 2.0),
            BoundingBox::new(0.0, 3.0, 5.0, 4.0),
        ];
        let u = BoundingBox::union_all(&boxes).unwrap();
        assert_eq!(u, BoundingBox::new(0.0, 1.0, 5.0, 4.0));

        assert!(BoundingBox::union_all(std::iter::empty()).is_none());
    }

    #[test]
    fn test_dimensions() {
        let b = BoundingBox::new(10.0, 20.0, 110.0, 50.0);
        assert_eq!(b.width(), 100.0);
        assert_eq!(b.height(), 30.0);
    }

    #[test]
    fn test_serde_round_trip() {
        let b = BoundingBox::new(1.5, 2.5, 3.5, 4.5);
        let json = serde_json::to_string(&b).unwrap();
        let back: BoundingBox = serde_json::from_str(&json).unwrap();
        assert_eq!(b, back);
    }
}
