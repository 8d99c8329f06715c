use kurbo::{Affine, Point, Rect};
use serde::{Deserialize, Serialize};

/// a rectangle spanned by two corner points, rotated around its own center.
///
/// the edges are always derived from `start`/`end` with min/max, so it
/// doesn't matter which corner the user dragged from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxShape {
    /// corner where the press-down happened, never moves
    pub start: Point,

    /// free corner, follows the finger while dragging
    pub end: Point,

    /// rotation in degrees, applied around `center()` at render time
    #[serde(default)]
    pub rotation: f64,
}

impl BoxShape {
    pub fn new(start: Point) -> Self {
        BoxShape {
            start,
            end: start,
            rotation: 0.0,
        }
    }

    pub fn left(&self) -> f64 {
        self.start.x.min(self.end.x)
    }

    pub fn right(&self) -> f64 {
        self.start.x.max(self.end.x)
    }

    pub fn top(&self) -> f64 {
        self.start.y.min(self.end.y)
    }

    pub fn bottom(&self) -> f64 {
        self.start.y.max(self.end.y)
    }

    /// the unrotated bounding rect
    pub fn rect(&self) -> Rect {
        Rect::new(self.left(), self.top(), self.right(), self.bottom())
    }

    pub fn center(&self) -> Point {
        self.rect().center()
    }

    /// hit test against the unrotated bounds (half-open on the right/bottom edge).
    /// the accumulated rotation is ignored on purpose, see the rotation gesture.
    pub fn contains(&self, p: Point) -> bool {
        self.rect().contains(p)
    }

    /// the four corners after rotating around the center, clockwise from top-left.
    pub fn corners(&self) -> [Point; 4] {
        let rect = self.rect();
        let rot = Affine::rotate_about(self.rotation.to_radians(), rect.center());
        [
            rot * Point::new(rect.x0, rect.y0),
            rot * Point::new(rect.x1, rect.y0),
            rot * Point::new(rect.x1, rect.y1),
            rot * Point::new(rect.x0, rect.y1),
        ]
    }
}

/// wrapper used to (de)serialize the whole box list in one go
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Shapes {
    pub boxes: Vec<BoxShape>,
}

impl Shapes {
    pub fn new(boxes: Vec<BoxShape>) -> Self {
        Shapes { boxes }
    }

    pub fn into_boxes(self) -> Vec<BoxShape> {
        self.boxes
    }
}
