//! RGBA pixmap implementation of the render surface.
//!
//! The pixmap shares the engine's canonical orientation (top-left origin,
//! Y-down), so no axis flip happens here. Rotations are quarter turns, which
//! map axis-aligned rectangles to axis-aligned rectangles — the transform
//! stack stays exact, with no resampling of geometry.

use card_layout::geometry::{Point, Rect};
use card_layout::metrics;
use card_layout::render::RenderSurface;
use card_layout::{Color, FontSpec, Rotation};
use image::{Rgba, RgbaImage, imageops};
use spleen_font::{FONT_12X24, PSF2Font};
use std::collections::HashMap;

const GLYPH_WIDTH: usize = 12;
const GLYPH_HEIGHT: usize = 24;

pub struct PreviewSurface {
    pixmap: RgbaImage,
    pixels_per_pt: f32,
    transforms: Vec<(Rotation, Point)>,
    glyph_cache: HashMap<char, Vec<u8>>,
}

impl PreviewSurface {
    pub fn new(page_width_pts: f32, page_height_pts: f32, pixels_per_pt: f32) -> Self {
        let width = (page_width_pts * pixels_per_pt).round().max(1.0) as u32;
        let height = (page_height_pts * pixels_per_pt).round().max(1.0) as u32;
        Self {
            pixmap: RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0])),
            pixels_per_pt,
            transforms: Vec::new(),
            glyph_cache: HashMap::new(),
        }
    }

    pub fn into_image(self) -> RgbaImage {
        self.pixmap
    }

    /// Encode the current pixmap as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, crate::PreviewError> {
        use image::ImageEncoder;
        let mut png = Vec::new();
        image::codecs::png::PngEncoder::new(&mut png)
            .write_image(
                self.pixmap.as_raw(),
                self.pixmap.width(),
                self.pixmap.height(),
                image::ExtendedColorType::Rgba8,
            )
            .map_err(|e| crate::PreviewError::ImageEncode(e.to_string()))?;
        Ok(png)
    }

    /// Run a point through the rotation stack (clockwise quarter turns in
    /// Y-down space).
    fn map_point(&self, p: Point) -> Point {
        let mut p = p;
        for &(rotation, center) in &self.transforms {
            let dx = p.x - center.x;
            let dy = p.y - center.y;
            p = match rotation {
                Rotation::None => p,
                Rotation::Clockwise90 => Point::new(center.x - dy, center.y + dx),
                Rotation::Clockwise180 => Point::new(center.x - dx, center.y - dy),
                Rotation::Clockwise270 => Point::new(center.x + dy, center.y - dx),
            };
        }
        p
    }

    /// Quarter turns map rectangles to rectangles; the mapped rectangle is
    /// the bounding box of the two mapped opposite corners.
    fn map_rect(&self, r: Rect) -> Rect {
        let a = self.map_point(r.origin());
        let b = self.map_point(Point::new(r.right(), r.bottom()));
        let x0 = a.x.min(b.x);
        let y0 = a.y.min(b.y);
        Rect::new(x0, y0, (a.x - b.x).abs(), (a.y - b.y).abs())
    }

    fn total_turns(&self) -> u8 {
        self.transforms
            .iter()
            .fold(0u8, |acc, (rotation, _)| (acc + rotation.quarter_turns()) % 4)
    }

    fn blend_pixel(&mut self, x: i64, y: i64, color: [u8; 4]) {
        if x < 0 || y < 0 || x >= self.pixmap.width() as i64 || y >= self.pixmap.height() as i64 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        let alpha = color[3] as f32 / 255.0;
        if alpha <= 0.0 {
            return;
        }
        let dst = self.pixmap.get_pixel(x, y).0;
        let inv = 1.0 - alpha;
        let out_a = alpha + dst[3] as f32 / 255.0 * inv;
        // source-over
        let mix = |src: u8, dst_c: u8| {
            let s = src as f32 / 255.0 * alpha;
            let d = dst_c as f32 / 255.0 * (dst[3] as f32 / 255.0) * inv;
            if out_a <= 0.0 {
                0
            } else {
                (((s + d) / out_a) * 255.0).round() as u8
            }
        };
        let px = Rgba([
            mix(color[0], dst[0]),
            mix(color[1], dst[1]),
            mix(color[2], dst[2]),
            (out_a * 255.0).round() as u8,
        ]);
        self.pixmap.put_pixel(x, y, px);
    }

    fn to_px(&self, v: f32) -> f32 {
        v * self.pixels_per_pt
    }

    fn glyph_bitmap(&mut self, ch: char) -> Vec<u8> {
        if let Some(bits) = self.glyph_cache.get(&ch) {
            return bits.clone();
        }
        let mut bits = vec![0u8; GLYPH_WIDTH * GLYPH_HEIGHT];
        let utf8 = ch.to_string();
        let mut font = PSF2Font::new(FONT_12X24).unwrap();
        if let Some(glyph) = font.glyph_for_utf8(utf8.as_bytes()) {
            for (row_y, row) in glyph.enumerate() {
                for (col_x, on) in row.enumerate() {
                    if row_y < GLYPH_HEIGHT && col_x < GLYPH_WIDTH && on {
                        bits[row_y * GLYPH_WIDTH + col_x] = 1;
                    }
                }
            }
        }
        self.glyph_cache.insert(ch, bits.clone());
        bits
    }

    /// Draw one glyph box (canonical rect, points) through the transform
    /// stack.
    fn draw_glyph(&mut self, ch: char, glyph_rect: Rect, color: [u8; 4]) {
        let bits = self.glyph_bitmap(ch);
        let turns = self.total_turns();
        let mapped = self.map_rect(glyph_rect);

        let px0 = self.to_px(mapped.x).floor() as i64;
        let py0 = self.to_px(mapped.y).floor() as i64;
        let width_px = (self.to_px(mapped.width)).round().max(1.0) as i64;
        let height_px = (self.to_px(mapped.height)).round().max(1.0) as i64;

        let (bits, bw, bh) = rotate_bitmap(&bits, GLYPH_WIDTH, GLYPH_HEIGHT, turns);

        for dy in 0..height_px {
            for dx in 0..width_px {
                let sx = (dx as f32 / width_px as f32 * bw as f32) as usize;
                let sy = (dy as f32 / height_px as f32 * bh as f32) as usize;
                if sx < bw && sy < bh && bits[sy * bw + sx] != 0 {
                    self.blend_pixel(px0 + dx, py0 + dy, color);
                }
            }
        }
    }

    fn text_color(color: Color) -> [u8; 4] {
        color.to_rgba8()
    }

    fn glyph_boxes(&self, text: &str, origin: Point, font: &FontSpec) -> Vec<(char, Rect)> {
        let char_width = font.size_pts * metrics::char_width_ratio(font.family, font.weight);
        let advance = char_width + font.letter_spacing_pts;
        text.chars()
            .enumerate()
            .map(|(i, ch)| {
                let x = origin.x + i as f32 * advance;
                (ch, Rect::new(x, origin.y, char_width, font.size_pts))
            })
            .collect()
    }
}

impl RenderSurface for PreviewSurface {
    fn measure_text(&self, text: &str, font: &FontSpec) -> f32 {
        metrics::measure_text(text, font)
    }

    fn fill_rect(&mut self, rect: Rect, color: Color, corner_radius_pts: f32) {
        let mapped = self.map_rect(rect);
        if mapped.is_degenerate() {
            return;
        }
        let rgba = color.to_rgba8();
        let radius = self.to_px(
            corner_radius_pts
                .max(0.0)
                .min(rect.width.min(rect.height) / 2.0),
        );

        let x0 = self.to_px(mapped.x);
        let y0 = self.to_px(mapped.y);
        let x1 = self.to_px(mapped.right());
        let y1 = self.to_px(mapped.bottom());

        let px0 = x0.floor() as i64;
        let py0 = y0.floor() as i64;
        let px1 = x1.ceil() as i64;
        let py1 = y1.ceil() as i64;

        for py in py0..py1 {
            for px in px0..px1 {
                let sx = px as f32 + 0.5;
                let sy = py as f32 + 0.5;
                if sx < x0 || sx >= x1 || sy < y0 || sy >= y1 {
                    continue;
                }
                if radius > 0.0 && !in_rounded_rect(sx, sy, x0, y0, x1, y1, radius) {
                    continue;
                }
                self.blend_pixel(px, py, rgba);
            }
        }
    }

    fn draw_image(&mut self, image: &RgbaImage, rect: Rect) {
        let turns = self.total_turns();
        let mapped = self.map_rect(rect);
        if mapped.is_degenerate() {
            return;
        }

        let rotated: RgbaImage = match turns {
            1 => imageops::rotate90(image),
            2 => imageops::rotate180(image),
            3 => imageops::rotate270(image),
            _ => image.clone(),
        };

        let width_px = self.to_px(mapped.width).round().max(1.0) as u32;
        let height_px = self.to_px(mapped.height).round().max(1.0) as u32;
        let resized = imageops::resize(&rotated, width_px, height_px, imageops::FilterType::Triangle);

        let px0 = self.to_px(mapped.x).round() as i64;
        let py0 = self.to_px(mapped.y).round() as i64;
        for (dx, dy, pixel) in resized.enumerate_pixels() {
            self.blend_pixel(px0 + dx as i64, py0 + dy as i64, pixel.0);
        }
    }

    fn draw_text(&mut self, text: &str, origin: Point, font: &FontSpec) {
        let color = Self::text_color(font.color);
        for (ch, rect) in self.glyph_boxes(text, origin, font) {
            if ch != ' ' {
                self.draw_glyph(ch, rect, color);
            }
        }
    }

    fn stroke_text(
        &mut self,
        text: &str,
        origin: Point,
        font: &FontSpec,
        color: Color,
        width_pts: f32,
    ) {
        // Approximate the stroke by stamping the glyph in a ring of offsets.
        let rgba = Self::text_color(color);
        let w = width_pts.max(0.25);
        for (off_x, off_y) in [
            (-w, 0.0),
            (w, 0.0),
            (0.0, -w),
            (0.0, w),
            (-w, -w),
            (-w, w),
            (w, -w),
            (w, w),
        ] {
            for (ch, rect) in self.glyph_boxes(text, origin.offset(off_x, off_y), font) {
                if ch != ' ' {
                    self.draw_glyph(ch, rect, rgba);
                }
            }
        }
    }

    fn push_rotation(&mut self, rotation: Rotation, center: Point) {
        self.transforms.push((rotation, center));
    }

    fn pop_rotation(&mut self) {
        if self.transforms.pop().is_none() {
            log::warn!("pop_rotation without a matching push");
        }
    }
}

fn in_rounded_rect(sx: f32, sy: f32, x0: f32, y0: f32, x1: f32, y1: f32, radius: f32) -> bool {
    let inner_x = sx >= x0 + radius && sx <= x1 - radius;
    let inner_y = sy >= y0 + radius && sy <= y1 - radius;
    if inner_x || inner_y {
        return true;
    }
    let cx = if sx < x0 + radius { x0 + radius } else { x1 - radius };
    let cy = if sy < y0 + radius { y0 + radius } else { y1 - radius };
    let dx = sx - cx;
    let dy = sy - cy;
    dx * dx + dy * dy <= radius * radius
}

/// Rotate a 1-bit glyph bitmap by clockwise quarter turns.
fn rotate_bitmap(bits: &[u8], width: usize, height: usize, turns: u8) -> (Vec<u8>, usize, usize) {
    match turns % 4 {
        1 => {
            let mut out = vec![0u8; bits.len()];
            for y in 0..height {
                for x in 0..width {
                    // (x, y) -> (height - 1 - y, x)
                    out[x * height + (height - 1 - y)] = bits[y * width + x];
                }
            }
            (out, height, width)
        }
        2 => {
            let mut out = bits.to_vec();
            out.reverse();
            (out, width, height)
        }
        3 => {
            let mut out = vec![0u8; bits.len()];
            for y in 0..height {
                for x in 0..width {
                    // (x, y) -> (y, width - 1 - x)
                    out[(width - 1 - x) * height + y] = bits[y * width + x];
                }
            }
            (out, height, width)
        }
        _ => (bits.to_vec(), width, height),
    }
}
