//! Rectangle, point and anchor math shared by all placement logic.
//!
//! All geometry lives in canonical space: origin at the page's top-left
//! corner, X increasing rightward, Y increasing downward, units in points.
//! Targets with another convention convert at emission time only
//! (see `render::flip_rect`).

use crate::types::Anchor;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }

    pub fn distance_to(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A rectangular area in canonical space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X position (left edge)
    pub x: f32,
    /// Y position (top edge)
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge y coordinate (canonical space is Y-down)
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn center(&self) -> Point {
        Point::new(self.center_x(), self.center_y())
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Shrink by per-edge insets. May produce a degenerate rectangle; callers
    /// are expected to check `is_degenerate` before drawing.
    pub fn inset(&self, insets: &EdgeInsets) -> Rect {
        Rect::new(
            self.x + insets.left,
            self.y + insets.top,
            self.width - insets.left - insets.right,
            self.height - insets.top - insets.bottom,
        )
    }

    /// Grow uniformly on all sides.
    pub fn expand(&self, amount: f32) -> Rect {
        Rect::new(
            self.x - amount,
            self.y - amount,
            self.width + amount * 2.0,
            self.height + amount * 2.0,
        )
    }

    /// Zero or negative area. Degenerate rectangles mean "nothing to draw",
    /// never an error.
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Four independent edge distances in points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeInsets {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl EdgeInsets {
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// The same distance on all four edges.
    pub fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }
}

/// Map an anchor to its point within a `width × height` rectangle whose
/// origin is at (0, 0) in canonical space.
pub fn anchor_point(anchor: Anchor, width: f32, height: f32) -> Point {
    match anchor {
        Anchor::Tl => Point::new(0.0, 0.0),
        Anchor::Tr => Point::new(width, 0.0),
        Anchor::Bl => Point::new(0.0, height),
        Anchor::Br => Point::new(width, height),
        Anchor::Center => Point::new(width / 2.0, height / 2.0),
    }
}

/// Given a point that represents `anchor` of a `width × height` box, return
/// the box's top-left corner.
pub fn top_left_from_anchor(point: Point, anchor: Anchor, width: f32, height: f32) -> Point {
    match anchor {
        Anchor::Tl => point,
        Anchor::Tr => Point::new(point.x - width, point.y),
        Anchor::Bl => Point::new(point.x, point.y - height),
        Anchor::Br => Point::new(point.x - width, point.y - height),
        Anchor::Center => Point::new(point.x - width / 2.0, point.y - height / 2.0),
    }
}

/// Center a `src_width × src_height` shape inside `bounds`, scaled down if
/// needed to fit entirely while preserving aspect ratio. Used for logo
/// placement inside its reserved square.
pub fn aspect_fit(src_width: f32, src_height: f32, bounds: Rect) -> Rect {
    if src_width <= 0.0 || src_height <= 0.0 || bounds.is_degenerate() {
        return Rect::new(bounds.x, bounds.y, 0.0, 0.0);
    }
    let scale_w = bounds.width / src_width;
    let scale_h = bounds.height / src_height;
    let scale = scale_w.min(scale_h);
    let width = src_width * scale;
    let height = src_height * scale;
    Rect::new(
        bounds.x + (bounds.width - width) / 2.0,
        bounds.y + (bounds.height - height) / 2.0,
        width,
        height,
    )
}
