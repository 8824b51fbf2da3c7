//! Scannable code placement.

use crate::geometry::{Point, Rect, anchor_point, top_left_from_anchor};
use crate::model::CodeConfig;

/// Resolve the code's rectangle in canonical space.
///
/// The code is always square; rotation is applied around its center at draw
/// time and never moves the returned rectangle. The three steps below must
/// match bit for bit across both render targets — both of them call this one
/// function and only convert at emission.
pub fn resolve_code(page_width: f32, page_height: f32, code: &CodeConfig) -> Rect {
    let anchor = anchor_point(code.canvas_anchor, page_width, page_height);
    let anchored = anchor.offset(code.offset_x_pts, code.offset_y_pts);
    let top_left = top_left_from_anchor(anchored, code.code_anchor, code.size_pts, code.size_pts);
    Rect::new(top_left.x, top_left.y, code.size_pts, code.size_pts)
}

/// Whether a pointer position grabs the code.
///
/// Uses distance from the code's center with a radius of the full code size:
/// deliberately generous rather than an exact bounding-box test, so small
/// codes stay draggable.
pub fn hit_test(pointer: Point, code_rect: &Rect) -> bool {
    pointer.distance_to(code_rect.center()) < code_rect.width
}

/// Offsets after a drag: the pointer delta (in canonical points) is added to
/// the offsets in effect when the drag started — never to the anchor point.
pub fn offsets_after_drag(
    start_offset_x: f32,
    start_offset_y: f32,
    delta_x: f32,
    delta_y: f32,
) -> (f32, f32) {
    (start_offset_x + delta_x, start_offset_y + delta_y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CodeConfig;
    use crate::types::Anchor;

    fn code(size: f32, canvas: Anchor, own: Anchor, dx: f32, dy: f32) -> CodeConfig {
        CodeConfig {
            size_pts: size,
            canvas_anchor: canvas,
            code_anchor: own,
            offset_x_pts: dx,
            offset_y_pts: dy,
            ..Default::default()
        }
    }

    #[test]
    fn test_centered_code_on_business_card() {
        // 252 x 144 page, 72pt code, both anchors centered, no offset.
        let rect = resolve_code(252.0, 144.0, &code(72.0, Anchor::Center, Anchor::Center, 0.0, 0.0));
        assert_eq!((rect.x, rect.y), (90.0, 36.0));
        assert_eq!((rect.width, rect.height), (72.0, 72.0));
    }

    #[test]
    fn test_bottom_right_with_negative_offset() {
        let rect = resolve_code(252.0, 144.0, &code(72.0, Anchor::Br, Anchor::Br, -10.0, -10.0));
        assert_eq!((rect.x, rect.y), (170.0, 62.0));
    }

    #[test]
    fn test_top_left_corner() {
        let rect = resolve_code(252.0, 144.0, &code(50.0, Anchor::Tl, Anchor::Tl, 5.0, 6.0));
        assert_eq!((rect.x, rect.y), (5.0, 6.0));
    }

    #[test]
    fn test_mixed_anchors() {
        // Code's center pinned to the page's top-right corner.
        let rect = resolve_code(200.0, 100.0, &code(40.0, Anchor::Tr, Anchor::Center, 0.0, 0.0));
        assert_eq!((rect.x, rect.y), (180.0, -20.0));
    }

    #[test]
    fn test_rotation_does_not_move_rect() {
        use crate::types::Rotation;
        let mut cfg = code(72.0, Anchor::Center, Anchor::Center, 0.0, 0.0);
        let before = resolve_code(252.0, 144.0, &cfg);
        cfg.rotation = Rotation::Clockwise90;
        let after = resolve_code(252.0, 144.0, &cfg);
        assert_eq!(before, after);
    }

    #[test]
    fn test_hit_test_radius_is_generous() {
        let rect = Rect::new(90.0, 36.0, 72.0, 72.0);
        // center is (126, 72); radius is 72
        assert!(hit_test(Point::new(126.0, 72.0), &rect));
        assert!(hit_test(Point::new(126.0 + 71.0, 72.0), &rect));
        assert!(!hit_test(Point::new(126.0 + 73.0, 72.0), &rect));
        // a point just outside the box but within the radius still grabs
        assert!(hit_test(Point::new(rect.right() + 10.0, 72.0), &rect));
    }

    #[test]
    fn test_drag_accumulates_on_start_offset() {
        let (x, y) = offsets_after_drag(10.0, -5.0, 3.0, 4.0);
        assert_eq!((x, y), (13.0, -1.0));
    }
}
