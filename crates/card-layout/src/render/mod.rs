//! The dual-target render orchestrator.
//!
//! All geometry is computed once in canonical space (top-left origin,
//! Y-down). A target with the opposite vertical axis converts with the
//! `flip_*` adapter at the moment each primitive is emitted — the geometry
//! formulas themselves are never duplicated per target.

mod pipeline;

pub use pipeline::*;

use crate::geometry::{Point, Rect};
use crate::model::FontSpec;
use crate::types::{Color, Rotation};
use image::RgbaImage;

/// A minimal immediate-mode drawing surface, implemented once per target.
///
/// Coordinates arriving at these methods are always canonical; a bottom-left
/// origin implementation applies the flip internally. `draw_text` and
/// `stroke_text` receive the top-left corner of the line box and derive the
/// baseline from `metrics::baseline_offset`.
pub trait RenderSurface {
    fn measure_text(&self, text: &str, font: &FontSpec) -> f32;

    /// Fill a rectangle, optionally with rounded corners.
    fn fill_rect(&mut self, rect: Rect, color: Color, corner_radius_pts: f32);

    /// Draw a raster image scaled into `rect`.
    fn draw_image(&mut self, image: &RgbaImage, rect: Rect);

    /// Fill a run of text using the font's own color.
    fn draw_text(&mut self, text: &str, origin: Point, font: &FontSpec);

    /// Stroke glyph outlines; rendered beneath the matching fill.
    fn stroke_text(
        &mut self,
        text: &str,
        origin: Point,
        font: &FontSpec,
        color: Color,
        width_pts: f32,
    );

    /// Rotate subsequent primitives clockwise (as seen on screen) around
    /// `center`, given in canonical space. Must nest with `pop_rotation`.
    fn push_rotation(&mut self, rotation: Rotation, center: Point);

    fn pop_rotation(&mut self);
}

/// Convert a canonical Y coordinate of an element's top edge into the
/// bottom-left-origin equivalent of its bottom edge.
pub fn flip_y(page_height: f32, y: f32, element_height: f32) -> f32 {
    page_height - y - element_height
}

/// Convert a canonical rectangle into bottom-left-origin space.
pub fn flip_rect(page_height: f32, rect: Rect) -> Rect {
    Rect::new(
        rect.x,
        flip_y(page_height, rect.y, rect.height),
        rect.width,
        rect.height,
    )
}

/// Convert a canonical point (e.g. a rotation center) into
/// bottom-left-origin space.
pub fn flip_point(page_height: f32, point: Point) -> Point {
    Point::new(point.x, page_height - point.y)
}
